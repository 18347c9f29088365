use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "attrkit", bin_name = "attrkit", version, disable_help_subcommand = true)]
#[command(about = "Read, search and consume values in JSON documents", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file (TOML)
    #[arg(long, global = true, value_name = "FILE", help_heading = "Options")]
    pub config: Option<PathBuf>,

    /// Verbose output (logs to stderr)
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the first path that resolves in the document
    Get {
        /// JSON document
        file: PathBuf,

        /// Paths to try, in order (e.g. `user.name`)
        #[arg(required = true)]
        paths: Vec<String>,

        /// JSON value printed when no path resolves
        #[arg(long, value_name = "JSON")]
        default: Option<String>,

        /// Path separator (overrides the configured one)
        #[arg(long, value_name = "SEP")]
        sep: Option<String>,
    },

    /// Print the first key found; a top-level array is a list of sources
    First {
        /// JSON document
        file: PathBuf,

        /// Keys to try, in order
        #[arg(required = true)]
        keys: Vec<String>,

        /// JSON value printed when no key is found
        #[arg(long, value_name = "JSON")]
        default: Option<String>,
    },

    /// List the names defined at a path
    Keys {
        /// JSON document
        file: PathBuf,

        /// Path to list (defaults to the document root)
        path: Option<String>,
    },

    /// Remove and print the first key found
    Pop {
        /// JSON document
        file: PathBuf,

        /// Keys to try, in order
        #[arg(required = true)]
        keys: Vec<String>,

        /// Write the document back without the removed key
        #[arg(long)]
        in_place: bool,
    },

    /// Print the effective configuration
    Config,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_get_with_options() {
        let cli = Cli::try_parse_from([
            "attrkit", "get", "doc.json", "a.b", "c", "--default", "0", "--sep", "/",
        ])
        .unwrap();
        match cli.command {
            Commands::Get {
                file,
                paths,
                default,
                sep,
            } => {
                assert_eq!(file, PathBuf::from("doc.json"));
                assert_eq!(paths, vec!["a.b", "c"]);
                assert_eq!(default.as_deref(), Some("0"));
                assert_eq!(sep.as_deref(), Some("/"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn global_flags_work_after_subcommand() {
        let cli = Cli::try_parse_from(["attrkit", "config", "-v", "--config", "a.toml"]).unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("a.toml")));
    }

    #[test]
    fn get_requires_a_path() {
        assert!(Cli::try_parse_from(["attrkit", "get", "doc.json"]).is_err());
    }

    #[test]
    fn pop_in_place_flag() {
        let cli = Cli::try_parse_from(["attrkit", "pop", "doc.json", "a", "--in-place"]).unwrap();
        assert!(matches!(cli.command, Commands::Pop { in_place: true, .. }));
    }
}
