//! # Path Traversal
//!
//! Walks a separator-delimited path (`"session.user.name"`) across nested
//! mappings and objects, resolving the access protocol at every level.
//!
//! - [`traverse`] / [`traverse_or`]: one-shot lookups.
//! - [`Traverser`] (via [`get_traverser`]): paths parsed once and applied to
//!   many targets. With several paths, [`Traverser::get`] returns the first
//!   that resolves; [`Traverser::extract`] returns all of them.
//!
//! Traversal stops at the first absent segment and yields the default; a
//! partially walked value is never returned. An empty path yields the target
//! itself.

use crate::config::AttrkitConfig;
use crate::error::{AttrError, Result};
use crate::getter::{Getter, Smart};
use crate::value::Value;
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_SEPARATOR: &str = ".";

/// A parsed path: zero or more non-empty segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    segments: Vec<String>,
    separator: String,
}

impl Path {
    /// Splits `path` on `sep`.
    ///
    /// The empty string is the empty path. An empty separator or an empty
    /// segment (`"a..b"`, `".a"`, `"a."`) is rejected.
    pub fn parse(path: &str, sep: &str) -> Result<Self> {
        if sep.is_empty() {
            return Err(AttrError::InvalidPath(
                "path separator must not be empty".to_string(),
            ));
        }
        let segments: Vec<String> = if path.is_empty() {
            Vec::new()
        } else {
            path.split(sep).map(str::to_string).collect()
        };
        if segments.iter().any(String::is_empty) {
            return Err(AttrError::InvalidPath(format!(
                "`{}` contains an empty segment",
                path
            )));
        }
        Ok(Self {
            segments,
            separator: sep.to_string(),
        })
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Follows the path from `obj`, reading each segment with `getter`.
    pub fn resolve<'a, G: Getter + ?Sized>(&self, obj: &'a Value, getter: &G) -> Option<&'a Value> {
        let mut current = obj;
        for segment in &self.segments {
            match getter.get(current, segment) {
                Some(next) => current = next,
                None => {
                    log::trace!(
                        "event=traverse status=miss path={} segment={}",
                        self,
                        segment
                    );
                    return None;
                }
            }
        }
        Some(current)
    }
}

impl FromStr for Path {
    type Err = AttrError;

    fn from_str(s: &str) -> Result<Self> {
        Path::parse(s, DEFAULT_SEPARATOR)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join(&self.separator))
    }
}

/// One or more precompiled paths with a shared default and getter.
#[derive(Debug, Clone)]
pub struct Traverser<G = Smart> {
    paths: Vec<Path>,
    default: Option<Value>,
    getter: G,
}

impl Traverser<Smart> {
    pub fn new<I, S>(paths: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::with_separator(paths, DEFAULT_SEPARATOR)
    }

    pub fn with_separator<I, S>(paths: I, sep: &str) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let paths = paths
            .into_iter()
            .map(|path| Path::parse(path.as_ref(), sep))
            .collect::<Result<Vec<_>>>()?;
        if paths.is_empty() {
            return Err(AttrError::InvalidPath(
                "a traverser needs at least one path".to_string(),
            ));
        }
        Ok(Self {
            paths,
            default: None,
            getter: Smart,
        })
    }

    /// Uses the separator from `config`.
    pub fn from_config<I, S>(paths: I, config: &AttrkitConfig) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::with_separator(paths, &config.path_separator)
    }
}

impl<G: Getter> Traverser<G> {
    /// Value returned when no path resolves.
    pub fn default_value(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Replaces protocol resolution for every segment.
    pub fn getter<H: Getter>(self, getter: H) -> Traverser<H> {
        Traverser {
            paths: self.paths,
            default: self.default,
            getter,
        }
    }

    pub fn paths(&self) -> &[Path] {
        &self.paths
    }

    /// First path that resolves, left to right, else the default.
    pub fn get<'a>(&'a self, obj: &'a Value) -> Option<&'a Value> {
        self.paths
            .iter()
            .find_map(|path| path.resolve(obj, &self.getter))
            .or(self.default.as_ref())
    }

    /// Every path resolved independently; absent ones yield the default.
    pub fn extract<'a>(&'a self, obj: &'a Value) -> Vec<Option<&'a Value>> {
        self.paths
            .iter()
            .map(|path| path.resolve(obj, &self.getter).or(self.default.as_ref()))
            .collect()
    }
}

/// Precompiles `paths` (separated by `.`) into a reusable [`Traverser`].
pub fn get_traverser<I, S>(paths: I) -> Result<Traverser>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    Traverser::new(paths)
}

/// Follows a `.`-separated path from `obj`. `Ok(None)` when any segment is
/// absent.
pub fn traverse<'a>(obj: &'a Value, path: &str) -> Result<Option<&'a Value>> {
    traverse_with(obj, path, DEFAULT_SEPARATOR, &Smart)
}

pub fn traverse_or<'a>(obj: &'a Value, path: &str, default: &'a Value) -> Result<&'a Value> {
    Ok(traverse(obj, path)?.unwrap_or(default))
}

/// [`traverse`] with a custom separator and getter.
pub fn traverse_with<'a, G: Getter + ?Sized>(
    obj: &'a Value,
    path: &str,
    sep: &str,
    getter: &G,
) -> Result<Option<&'a Value>> {
    Ok(Path::parse(path, sep)?.resolve(obj, getter))
}

/// Resolves every path in `paths` against `obj`, in order.
pub fn extract_attrs<'a, I, S>(obj: &'a Value, paths: I) -> Result<Vec<Option<&'a Value>>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    paths
        .into_iter()
        .map(|path| -> Result<Option<&'a Value>> {
            Ok(path.as_ref().parse::<Path>()?.resolve(obj, &Smart))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::getter::smart_getter;
    use crate::mapping;

    fn upper_getter<'v>(target: &'v Value, name: &str) -> Option<&'v Value> {
        smart_getter(target).get(&name.to_uppercase())
    }

    #[test]
    fn explicit_getter_resolves_every_segment() {
        let doc = Value::from(mapping! { "A" => mapping! { "B" => 7 } });
        assert_eq!(traverse(&doc, "a.b").unwrap(), None);
        assert_eq!(
            traverse_with(&doc, "a.b", ".", &upper_getter).unwrap(),
            Some(&Value::Int(7))
        );

        let traverser = get_traverser(["a.b"]).unwrap().getter(upper_getter);
        assert_eq!(traverser.get(&doc), Some(&Value::Int(7)));
        assert_eq!(traverser.extract(&doc), vec![Some(&Value::Int(7))]);
    }

    #[test]
    fn parse_splits_on_separator() {
        let path = Path::parse("a/b/c", "/").unwrap();
        assert_eq!(path.segments().collect::<Vec<_>>(), vec!["a", "b", "c"]);
        assert_eq!(path.to_string(), "a/b/c");
    }

    #[test]
    fn empty_string_is_empty_path() {
        let path: Path = "".parse().unwrap();
        assert!(path.is_empty());
    }

    #[test]
    fn empty_segments_are_invalid() {
        for bad in ["a..b", ".a", "a."] {
            assert!(
                matches!(bad.parse::<Path>(), Err(AttrError::InvalidPath(_))),
                "{} should be rejected",
                bad
            );
        }
        assert!(matches!(Path::parse("a", ""), Err(AttrError::InvalidPath(_))));
    }

    #[test]
    fn traverser_requires_a_path() {
        let none: [&str; 0] = [];
        assert!(matches!(get_traverser(none), Err(AttrError::InvalidPath(_))));
    }

    #[test]
    fn resolve_stops_at_first_missing_segment() {
        let value = Value::from(mapping! { "a" => mapping! { "b" => 1 } });
        let path: Path = "a.x.b".parse().unwrap();
        assert_eq!(path.resolve(&value, &Smart), None);
    }

    #[test]
    fn default_applies_per_path_in_extract() {
        let value = Value::from(mapping! { "a" => 1 });
        let traverser = get_traverser(["a", "b"]).unwrap().default_value(0);
        assert_eq!(
            traverser.extract(&value),
            vec![Some(&Value::Int(1)), Some(&Value::Int(0))]
        );
    }

    #[test]
    fn from_config_uses_configured_separator() {
        let config = AttrkitConfig {
            path_separator: "/".to_string(),
            ..Default::default()
        };
        let value = Value::from(mapping! { "a" => mapping! { "b" => 2 } });
        let traverser = Traverser::from_config(["a/b"], &config).unwrap();
        assert_eq!(traverser.get(&value), Some(&Value::Int(2)));
    }
}
