use super::Value;
use crate::error::{AttrError, Result};
use std::collections::BTreeMap;

/// A string-keyed mapping, iterated in key order.
///
/// A read-only mapping rejects `insert` and `remove` with
/// [`AttrError::ImmutableTarget`]; reads are unaffected.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mapping {
    entries: BTreeMap<String, Value>,
    read_only: bool,
}

impl Mapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, used while constructing a mapping.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    /// Turns this mapping read-only.
    pub fn into_read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Inserts `value` under `key`, returning the previous value if any.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> Result<Option<Value>> {
        let key = key.into();
        if self.read_only {
            return Err(AttrError::ImmutableTarget(format!(
                "mapping is read-only; cannot set key `{}`",
                key
            )));
        }
        Ok(self.entries.insert(key, value.into()))
    }

    /// Removes `key`, failing with [`AttrError::NotFound`] when absent.
    pub fn remove(&mut self, key: &str) -> Result<Value> {
        if self.read_only {
            return Err(AttrError::ImmutableTarget(format!(
                "mapping is read-only; cannot delete key `{}`",
                key
            )));
        }
        self.entries
            .remove(key)
            .ok_or_else(|| AttrError::NotFound(key.to_string()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Mapping {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            read_only: false,
        }
    }
}

/// Builds a [`Mapping`] from `key => value` pairs.
///
/// ```
/// use attrkit::{mapping, Value};
///
/// let config = mapping! {
///     "name" => "demo",
///     "limits" => mapping! { "depth" => 3 },
/// };
/// assert_eq!(config.get("name"), Some(&Value::from("demo")));
/// ```
#[macro_export]
macro_rules! mapping {
    () => {
        $crate::Mapping::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {
        {
            let map = $crate::Mapping::new();
            $(
                let map = map.with($key, $value);
            )+
            map
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_remove() {
        let mut map = Mapping::new();
        assert_eq!(map.insert("a", 1).unwrap(), None);
        assert_eq!(map.insert("a", 2).unwrap(), Some(Value::Int(1)));
        assert_eq!(map.remove("a").unwrap(), Value::Int(2));
        assert!(map.is_empty());
    }

    #[test]
    fn remove_missing_is_not_found() {
        let mut map = Mapping::new();
        assert!(matches!(map.remove("nope"), Err(AttrError::NotFound(k)) if k == "nope"));
    }

    #[test]
    fn read_only_rejects_writes_but_allows_reads() {
        let mut map = Mapping::new().with("a", 1).into_read_only();
        assert_eq!(map.get("a"), Some(&Value::Int(1)));
        assert!(matches!(map.insert("b", 2), Err(AttrError::ImmutableTarget(_))));
        assert!(matches!(map.remove("a"), Err(AttrError::ImmutableTarget(_))));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn keys_are_sorted() {
        let map: Mapping = vec![("b", 2), ("a", 1), ("c", 3)].into_iter().collect();
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["a", "b", "c"]);
    }
}
