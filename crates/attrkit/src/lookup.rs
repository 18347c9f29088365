//! # Multi-Source Lookup
//!
//! Probes an ordered list of candidate keys across one or more sources.
//!
//! ## Search order
//!
//! Sources vary slowest and keys fastest: every key is tried against the
//! first source before the second source is consulted.
//!
//! ```text
//! sources = [s1, s2], keys = [k1, k2]
//! order:    s1.k1, s1.k2, s2.k1, s2.k2
//! ```
//!
//! [`iterate_over`], [`get_first_of`] and [`pop_first_of`] all follow this
//! order, so "first match wins" means the same thing everywhere.
//!
//! ## Sources
//!
//! A single [`Value::List`] passed as the source is a collection of sources;
//! any other value is one source. Explicit slices and vectors of references
//! are accepted as well.

use crate::getter::{smart_getter, smart_getter_and_deleter, SmartGetter};
use crate::value::Value;

/// Read-only sources for a lookup, in probe order.
#[derive(Debug, Clone, Default)]
pub struct Sources<'a> {
    items: Vec<&'a Value>,
}

impl<'a> Sources<'a> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Value> + '_ {
        self.items.iter().copied()
    }
}

impl<'a> From<&'a Value> for Sources<'a> {
    fn from(value: &'a Value) -> Self {
        let items = match value {
            Value::List(items) => items.iter().collect(),
            other => vec![other],
        };
        Self { items }
    }
}

impl<'a> From<Vec<&'a Value>> for Sources<'a> {
    fn from(items: Vec<&'a Value>) -> Self {
        Self { items }
    }
}

impl<'a> From<&'a [Value]> for Sources<'a> {
    fn from(items: &'a [Value]) -> Self {
        Self {
            items: items.iter().collect(),
        }
    }
}

impl<'a, const N: usize> From<[&'a Value; N]> for Sources<'a> {
    fn from(items: [&'a Value; N]) -> Self {
        Self {
            items: items.into_iter().collect(),
        }
    }
}

/// Mutable sources for [`pop_first_of`], in probe order.
#[derive(Debug, Default)]
pub struct SourcesMut<'a> {
    items: Vec<&'a mut Value>,
}

impl<'a> From<&'a mut Value> for SourcesMut<'a> {
    fn from(value: &'a mut Value) -> Self {
        let items = match value {
            Value::List(items) => items.iter_mut().collect(),
            other => vec![other],
        };
        Self { items }
    }
}

impl<'a> From<Vec<&'a mut Value>> for SourcesMut<'a> {
    fn from(items: Vec<&'a mut Value>) -> Self {
        Self { items }
    }
}

impl<'a> From<&'a mut [Value]> for SourcesMut<'a> {
    fn from(items: &'a mut [Value]) -> Self {
        Self {
            items: items.iter_mut().collect(),
        }
    }
}

impl<'a, const N: usize> From<[&'a mut Value; N]> for SourcesMut<'a> {
    fn from(items: [&'a mut Value; N]) -> Self {
        Self {
            items: items.into_iter().collect(),
        }
    }
}

/// Lazy `(key, value)` pairs for every present candidate. See the module
/// docs for the order.
#[derive(Debug, Clone)]
pub struct IterateOver<'a, 'k, K> {
    sources: std::vec::IntoIter<&'a Value>,
    keys: &'k [K],
    current: Option<SmartGetter<'a>>,
    next_key: usize,
}

impl<'a, 'k, K: AsRef<str>> Iterator for IterateOver<'a, 'k, K> {
    type Item = (&'k str, &'a Value);

    fn next(&mut self) -> Option<Self::Item> {
        let keys: &'k [K] = self.keys;
        loop {
            let getter = match self.current {
                Some(getter) => getter,
                None => {
                    let getter = smart_getter(self.sources.next()?);
                    self.current = Some(getter);
                    self.next_key = 0;
                    getter
                }
            };
            while let Some(key) = keys.get(self.next_key) {
                self.next_key += 1;
                let key = key.as_ref();
                if let Some(value) = getter.get(key) {
                    return Some((key, value));
                }
            }
            self.current = None;
        }
    }
}

/// Iterates over every present `(key, value)` across `sources` and `keys`.
///
/// Nothing is mutated; calling it again scans from scratch.
pub fn iterate_over<'a, 'k, K: AsRef<str>>(
    sources: impl Into<Sources<'a>>,
    keys: &'k [K],
) -> IterateOver<'a, 'k, K> {
    IterateOver {
        sources: sources.into().items.into_iter(),
        keys,
        current: None,
        next_key: 0,
    }
}

/// Returns the first present value among `keys` in `sources`.
///
/// `None` means nothing matched; apply a default with `unwrap_or`.
pub fn get_first_of<'a, K: AsRef<str>>(
    sources: impl Into<Sources<'a>>,
    keys: &[K],
) -> Option<&'a Value> {
    iterate_over(sources, keys).next().map(|(_, value)| value)
}

/// Like [`get_first_of`], accepting a candidate only when `pred` holds.
pub fn get_first_of_where<'a, K, P>(
    sources: impl Into<Sources<'a>>,
    keys: &[K],
    mut pred: P,
) -> Option<&'a Value>
where
    K: AsRef<str>,
    P: FnMut(&Value) -> bool,
{
    iterate_over(sources, keys)
        .find(|(_, value)| pred(*value))
        .map(|(_, value)| value)
}

/// Removes and returns the first present value among `keys` in `sources`.
///
/// Only the returned entry is removed; every other key of every source is
/// left untouched.
pub fn pop_first_of<'a, K: AsRef<str>>(
    sources: impl Into<SourcesMut<'a>>,
    keys: &[K],
) -> Option<Value> {
    for source in sources.into().items {
        let mut take = smart_getter_and_deleter(source);
        for key in keys {
            if let Some(value) = take.take(key.as_ref()) {
                log::debug!("event=pop_first_of status=found key={}", key.as_ref());
                return Some(value);
            }
        }
    }
    None
}

/// A single key, or alternatives where the first present one wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeySpec {
    Key(String),
    FirstOf(Vec<String>),
}

impl From<&str> for KeySpec {
    fn from(key: &str) -> Self {
        KeySpec::Key(key.to_string())
    }
}

impl From<String> for KeySpec {
    fn from(key: String) -> Self {
        KeySpec::Key(key)
    }
}

impl<const N: usize> From<[&str; N]> for KeySpec {
    fn from(keys: [&str; N]) -> Self {
        KeySpec::FirstOf(keys.iter().map(|k| k.to_string()).collect())
    }
}

impl From<Vec<String>> for KeySpec {
    fn from(keys: Vec<String>) -> Self {
        KeySpec::FirstOf(keys)
    }
}

/// Resolves each spec against `source`; absent specs yield `None`.
pub fn multi_getter<'a>(source: &'a Value, ids: &[KeySpec]) -> Vec<Option<&'a Value>> {
    let getter = smart_getter(source);
    ids.iter()
        .map(|id| match id {
            KeySpec::Key(key) => getter.get(key),
            KeySpec::FirstOf(keys) => keys.iter().find_map(|key| getter.get(key)),
        })
        .collect()
}
