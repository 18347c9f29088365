//! Command handlers.
//!
//! Each handler loads the document, runs one library call and prints the
//! result. "Nothing found" is an error so the process exits non-zero.

use super::setup::{Cli, Commands};
use anyhow::{anyhow, bail, Context, Result};
use attrkit::{
    fulldir, get_first_of, pop_first_of, traverse_with, AttrkitConfig, Smart, Traverser, Value,
};
use clap::Parser;
use flexi_logger::{Logger, LoggerHandle};
use std::fs;
use std::path::Path;

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let _logger = init_logging(cli.verbose)?;

    let config =
        AttrkitConfig::load(cli.config.as_deref()).context("failed to load configuration")?;
    log::debug!(
        "event=config_loaded path_separator={} private_prefix={}",
        config.path_separator,
        config.private_prefix
    );

    match cli.command {
        Commands::Get {
            file,
            paths,
            default,
            sep,
        } => handle_get(&file, &paths, default.as_deref(), sep.as_deref(), &config),
        Commands::First {
            file,
            keys,
            default,
        } => handle_first(&file, &keys, default.as_deref()),
        Commands::Keys { file, path } => handle_keys(&file, path.as_deref(), &config),
        Commands::Pop {
            file,
            keys,
            in_place,
        } => handle_pop(&file, &keys, in_place),
        Commands::Config => handle_config(&config),
    }
}

/// Logs go to stderr so stdout stays valid JSON.
fn init_logging(verbose: bool) -> Result<Option<LoggerHandle>> {
    if !verbose {
        return Ok(None);
    }
    let handle = Logger::try_with_env_or_str("debug")
        .context("invalid log specification")?
        .log_to_stderr()
        .format(flexi_logger::default_format)
        .start()
        .context("failed to start logger")?;
    Ok(Some(handle))
}

fn load_document(file: &Path) -> Result<Value> {
    let text = fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    Value::from_json_str(&text).with_context(|| format!("{} is not valid JSON", file.display()))
}

fn parse_default(default: Option<&str>) -> Result<Option<Value>> {
    default
        .map(|text| Value::from_json_str(text).context("--default must be a JSON value"))
        .transpose()
}

fn print_value(value: &Value) -> Result<()> {
    println!("{}", value.to_json_string_pretty()?);
    Ok(())
}

fn handle_get(
    file: &Path,
    paths: &[String],
    default: Option<&str>,
    sep: Option<&str>,
    config: &AttrkitConfig,
) -> Result<()> {
    let doc = load_document(file)?;
    let sep = sep.unwrap_or(&config.path_separator);
    let mut traverser = Traverser::with_separator(paths, sep)?;
    if let Some(default) = parse_default(default)? {
        traverser = traverser.default_value(default);
    }
    match traverser.get(&doc) {
        Some(value) => print_value(value),
        None => bail!("no value at {}", paths.join(", ")),
    }
}

fn handle_first(file: &Path, keys: &[String], default: Option<&str>) -> Result<()> {
    let doc = load_document(file)?;
    let default = parse_default(default)?;
    match get_first_of(&doc, keys).or(default.as_ref()) {
        Some(value) => print_value(value),
        None => bail!("none of {} found", keys.join(", ")),
    }
}

fn handle_keys(file: &Path, path: Option<&str>, config: &AttrkitConfig) -> Result<()> {
    let doc = load_document(file)?;
    let target = match path {
        Some(path) => traverse_with(&doc, path, &config.path_separator, &Smart)?
            .ok_or_else(|| anyhow!("no value at {}", path))?,
        None => &doc,
    };
    let names: Vec<String> = fulldir(target).into_iter().collect();
    println!("{}", serde_json::to_string_pretty(&names)?);
    Ok(())
}

fn handle_pop(file: &Path, keys: &[String], in_place: bool) -> Result<()> {
    let mut doc = load_document(file)?;
    let popped = pop_first_of(&mut doc, keys)
        .ok_or_else(|| anyhow!("none of {} found", keys.join(", ")))?;
    if in_place {
        fs::write(file, doc.to_json_string_pretty()?)
            .with_context(|| format!("failed to write {}", file.display()))?;
        log::info!("event=document_written path={}", file.display());
    }
    print_value(&popped)
}

fn handle_config(config: &AttrkitConfig) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(config)?);
    Ok(())
}
