//! Name listing, attribute comparison and bulk copying between targets.
//!
//! Everything here reads through the smart getter, so mappings and objects
//! can be mixed freely as sources and targets.

use crate::accessor::View;
use crate::config::AttrkitConfig;
use crate::error::{AttrError, Result};
use crate::getter::{smart_getter, smart_setter};
use crate::lookup::{get_first_of, Sources};
use crate::value::Value;
use std::collections::BTreeSet;
use std::fmt;

/// Every name defined on `obj`.
///
/// For objects this covers instance attributes, attributes of every class
/// in the chain and delegated names. For mappings it is the key set.
pub fn fulldir(obj: &Value) -> BTreeSet<String> {
    View::of(obj).names()
}

/// All `(name, value)` pairs of `obj` accepted by `filter`, sorted by name.
///
/// Names that currently resolve to nothing (a delegation whose holder is
/// missing) are skipped.
pub fn xdir<F>(obj: &Value, mut filter: F) -> Vec<(String, &Value)>
where
    F: FnMut(&str, &Value) -> bool,
{
    let getter = smart_getter(obj);
    fulldir(obj)
        .into_iter()
        .filter_map(|name| getter.get(&name).map(|value| (name, value)))
        .filter(|(name, value)| filter(name.as_str(), *value))
        .collect()
}

/// Like [`xdir`], returning only the names.
pub fn fdir<F>(obj: &Value, filter: F) -> Vec<String>
where
    F: FnMut(&str, &Value) -> bool,
{
    xdir(obj, filter).into_iter().map(|(name, _)| name).collect()
}

/// True when every name in `force_equals` reads the same on both sides and
/// every name in `force_differents` differs.
///
/// A name absent on both sides counts as equal.
pub fn validate_attrs<S: AsRef<str>>(
    source: &Value,
    target: &Value,
    force_equals: &[S],
    force_differents: &[S],
) -> bool {
    let from_source = smart_getter(source);
    let from_target = smart_getter(target);
    let same = |name: &S| from_source.get(name.as_ref()) == from_target.get(name.as_ref());
    force_equals.iter().all(same) && !force_differents.iter().any(same)
}

/// Which names [`smart_copy`] copies.
#[derive(Default)]
pub enum CopyDefaults {
    /// Every name that is not private.
    #[default]
    Public,
    /// Every name.
    All,
    /// Exactly these names; a name found in no source is copied as `Null`.
    Names(Vec<String>),
    /// Exactly these names with per-name fallbacks. A `None` fallback marks
    /// the name as required.
    Defaults(Vec<(String, Option<Value>)>),
    /// Names whose `(name, value)` the predicate accepts.
    Filter(Box<dyn Fn(&str, &Value) -> bool>),
}

impl CopyDefaults {
    pub fn names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        CopyDefaults::Names(names.into_iter().map(Into::into).collect())
    }

    pub fn filter<F>(accept: F) -> Self
    where
        F: Fn(&str, &Value) -> bool + 'static,
    {
        CopyDefaults::Filter(Box::new(accept))
    }
}

impl fmt::Debug for CopyDefaults {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CopyDefaults::Public => write!(f, "Public"),
            CopyDefaults::All => write!(f, "All"),
            CopyDefaults::Names(names) => f.debug_tuple("Names").field(names).finish(),
            CopyDefaults::Defaults(pairs) => f.debug_tuple("Defaults").field(pairs).finish(),
            CopyDefaults::Filter(_) => write!(f, "Filter(..)"),
        }
    }
}

/// `[A-Za-z_][A-Za-z0-9_]*`, extended to Unicode letters and digits.
pub fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first == '_' || first.is_alphabetic() => {
            chars.all(|c| c == '_' || c.is_alphanumeric())
        }
        _ => false,
    }
}

/// Copies the first appearance of each name in `sources` onto `target`,
/// using the default private prefix.
pub fn smart_copy<'a>(
    sources: impl Into<Sources<'a>>,
    target: &mut Value,
    defaults: &CopyDefaults,
) -> Result<()> {
    smart_copy_with(sources, target, defaults, &AttrkitConfig::default())
}

/// [`smart_copy`] with the private prefix taken from `config`.
///
/// Targets using the attribute protocol only receive names that are valid
/// identifiers; mapping targets receive every name.
pub fn smart_copy_with<'a>(
    sources: impl Into<Sources<'a>>,
    target: &mut Value,
    defaults: &CopyDefaults,
    config: &AttrkitConfig,
) -> Result<()> {
    let sources = sources.into();
    if sources.is_empty() {
        return Err(AttrError::Unsupported(
            "smart_copy requires at least one source".to_string(),
        ));
    }
    let keyed = match &*target {
        Value::Map(_) => true,
        Value::Object(_) => false,
        other => {
            return Err(AttrError::ImmutableTarget(format!(
                "cannot copy attributes into a `{}` value",
                other.type_name()
            )))
        }
    };

    let mut setter = smart_setter(target);
    let mut copy = |name: &str, value: Value| -> Result<()> {
        if keyed || is_valid_identifier(name) {
            setter.set(name, value)
        } else {
            log::trace!("event=smart_copy name={} status=skipped reason=identifier", name);
            Ok(())
        }
    };

    match defaults {
        CopyDefaults::Names(names) => {
            for name in names {
                let value = get_first_of(sources.clone(), &[name]).cloned();
                copy(name.as_str(), value.unwrap_or(Value::Null))?;
            }
            Ok(())
        }
        CopyDefaults::Defaults(pairs) => {
            for (name, fallback) in pairs {
                let value = match get_first_of(sources.clone(), &[name]) {
                    Some(found) => found.clone(),
                    None => fallback
                        .clone()
                        .ok_or_else(|| AttrError::NotFound(name.clone()))?,
                };
                copy(name.as_str(), value)?;
            }
            Ok(())
        }
        CopyDefaults::Public => copy_all(&sources, |name, _| !config.is_private(name), copy),
        CopyDefaults::All => copy_all(&sources, |_, _| true, copy),
        CopyDefaults::Filter(accept) => copy_all(&sources, |name, value| accept(name, value), copy),
    }
}

fn copy_all<A, C>(sources: &Sources<'_>, accept: A, mut copy: C) -> Result<()>
where
    A: Fn(&str, &Value) -> bool,
    C: FnMut(&str, Value) -> Result<()>,
{
    let mut seen = BTreeSet::new();
    for source in sources.iter() {
        let getter = smart_getter(source);
        for name in fulldir(source) {
            // A name is claimed by the first source defining it, copied or not.
            if !seen.insert(name.clone()) {
                continue;
            }
            if let Some(value) = getter.get(&name) {
                if accept(name.as_str(), value) {
                    copy(name.as_str(), value.clone())?;
                }
            }
        }
    }
    Ok(())
}
