//! Bound getters and setters built on the accessor resolver.
//!
//! - [`smart_getter`]: absence is not an error; `get` returns `None`.
//! - [`strict_getter`]: absence fails with [`AttrError::AttributeMissing`].
//! - [`smart_setter`]: writes through whichever protocol the target uses.
//! - [`smart_getter_and_deleter`]: reads a name and removes it ("consume").
//!
//! The [`Getter`] and [`Setter`] traits are the override seams used by path
//! traversal and scoped transactions. [`Smart`] is the default implementation
//! that resolves each target's protocol.

use crate::accessor::{resolve, Accessor, Protocol, View};
use crate::error::{AttrError, Result};
use crate::value::Value;

/// Reads a name from an arbitrary target.
pub trait Getter {
    fn get<'v>(&self, target: &'v Value, name: &str) -> Option<&'v Value>;

    /// Reads only what the target itself stores, ignoring anything inherited.
    ///
    /// Used to snapshot attributes so that restoring them reproduces the
    /// exact prior state. Defaults to [`Getter::get`].
    fn get_own<'v>(&self, target: &'v Value, name: &str) -> Option<&'v Value> {
        self.get(target, name)
    }
}

/// Writes and removes names on an arbitrary target.
pub trait Setter {
    fn set(&self, target: &mut Value, name: &str, value: Value) -> Result<()>;
    fn delete(&self, target: &mut Value, name: &str) -> Result<Value>;
}

/// Resolves the protocol of each target it is handed.
#[derive(Debug, Clone, Copy, Default)]
pub struct Smart;

impl Getter for Smart {
    fn get<'v>(&self, target: &'v Value, name: &str) -> Option<&'v Value> {
        View::of(target).get(name)
    }

    fn get_own<'v>(&self, target: &'v Value, name: &str) -> Option<&'v Value> {
        View::of(target).get_own(name)
    }
}

impl Setter for Smart {
    fn set(&self, target: &mut Value, name: &str, value: Value) -> Result<()> {
        resolve(target).set(name, value)
    }

    fn delete(&self, target: &mut Value, name: &str) -> Result<Value> {
        resolve(target).delete(name)
    }
}

impl<F> Getter for F
where
    F: for<'v> Fn(&'v Value, &str) -> Option<&'v Value>,
{
    fn get<'v>(&self, target: &'v Value, name: &str) -> Option<&'v Value> {
        self(target, name)
    }
}

/// Non-strict getter bound to one target.
#[derive(Debug, Clone, Copy)]
pub struct SmartGetter<'a> {
    view: View<'a>,
}

pub fn smart_getter(target: &Value) -> SmartGetter<'_> {
    SmartGetter {
        view: View::of(target),
    }
}

impl<'a> SmartGetter<'a> {
    pub fn protocol(&self) -> Protocol {
        self.view.protocol()
    }

    /// Returns the value of `name`, or `None` (unset) when absent.
    pub fn get(&self, name: &str) -> Option<&'a Value> {
        self.view.get(name)
    }

    pub fn get_or(&self, name: &str, default: &'a Value) -> &'a Value {
        self.get(name).unwrap_or(default)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn strict(self) -> StrictGetter<'a> {
        StrictGetter { view: self.view }
    }
}

/// Getter that reports absence as an error.
#[derive(Debug, Clone, Copy)]
pub struct StrictGetter<'a> {
    view: View<'a>,
}

pub fn strict_getter(target: &Value) -> StrictGetter<'_> {
    smart_getter(target).strict()
}

impl<'a> StrictGetter<'a> {
    pub fn protocol(&self) -> Protocol {
        self.view.protocol()
    }

    pub fn get(&self, name: &str) -> Result<&'a Value> {
        self.view
            .get(name)
            .ok_or_else(|| AttrError::AttributeMissing(name.to_string()))
    }

    /// An explicit default still wins over the error.
    pub fn get_or(&self, name: &str, default: &'a Value) -> &'a Value {
        self.view.get(name).unwrap_or(default)
    }
}

#[derive(Debug)]
pub struct SmartSetter<'a> {
    accessor: Accessor<'a>,
}

pub fn smart_setter(target: &mut Value) -> SmartSetter<'_> {
    SmartSetter {
        accessor: resolve(target),
    }
}

impl SmartSetter<'_> {
    pub fn protocol(&self) -> Protocol {
        self.accessor.protocol()
    }

    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
        self.accessor.set(name, value)
    }
}

/// Reads a name and removes it from the target as a side effect.
#[derive(Debug)]
pub struct GetterAndDeleter<'a> {
    accessor: Accessor<'a>,
}

pub fn smart_getter_and_deleter(target: &mut Value) -> GetterAndDeleter<'_> {
    GetterAndDeleter {
        accessor: resolve(target),
    }
}

impl GetterAndDeleter<'_> {
    pub fn protocol(&self) -> Protocol {
        self.accessor.protocol()
    }

    /// Returns the value of `name` and removes it.
    ///
    /// If removal fails (the value is inherited from a class, delegated, or
    /// the target is frozen) the resolved value is still returned and the
    /// target is left as it was.
    pub fn take(&mut self, name: &str) -> Option<Value> {
        self.accessor.get(name)?;
        match self.accessor.delete(name) {
            Ok(value) => Some(value),
            Err(err) => {
                log::debug!(
                    "event=take_attribute name={} status=kept error={}",
                    name,
                    err
                );
                self.accessor.get(name).cloned()
            }
        }
    }

    pub fn take_or(&mut self, name: &str, default: impl Into<Value>) -> Value {
        self.take(name).unwrap_or_else(|| default.into())
    }
}

/// Returns the value of `name` and removes it from `target`.
pub fn popattr(target: &mut Value, name: &str) -> Option<Value> {
    smart_getter_and_deleter(target).take(name)
}

/// Sets `name` to `value` unless it is already present, then returns the
/// current value.
pub fn setdefaultattr<'a>(
    target: &'a mut Value,
    name: &str,
    value: impl Into<Value>,
) -> Result<&'a Value> {
    setdefaultattr_with(target, name, || value.into())
}

/// Like [`setdefaultattr`], but `make` only runs when `name` is absent.
pub fn setdefaultattr_with<'a, F>(target: &'a mut Value, name: &str, make: F) -> Result<&'a Value>
where
    F: FnOnce() -> Value,
{
    if !smart_getter(target).contains(name) {
        smart_setter(target).set(name, make())?;
    }
    let target: &'a Value = target;
    smart_getter(target)
        .get(name)
        .ok_or_else(|| AttrError::NotFound(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delegate::DelegatedAttribute;
    use crate::value::{Class, Object};
    use crate::mapping;

    fn person() -> Value {
        Value::from(Object::plain().with("name", "Ada").with("nick", Value::Null))
    }

    #[test]
    fn smart_getter_present_and_absent() {
        let map = Value::from(mapping! { "a" => 1 });
        let get = smart_getter(&map);
        assert_eq!(get.protocol(), Protocol::Key);
        assert_eq!(get.get("a"), Some(&Value::Int(1)));
        assert_eq!(get.get("b"), None);

        let obj = person();
        let get = smart_getter(&obj);
        assert_eq!(get.protocol(), Protocol::Attribute);
        assert_eq!(get.get("name"), Some(&Value::from("Ada")));
        assert_eq!(get.get("age"), None);
    }

    #[test]
    fn stored_null_is_not_unset() {
        let obj = person();
        let get = smart_getter(&obj);
        assert_eq!(get.get("nick"), Some(&Value::Null));
        assert!(get.contains("nick"));
        assert!(!get.contains("age"));
    }

    #[test]
    fn strict_getter_raises_on_absence() {
        let obj = person();
        let get = strict_getter(&obj);
        assert_eq!(get.get("name").unwrap(), &Value::from("Ada"));
        assert_eq!(get.get("nick").unwrap(), &Value::Null);
        assert!(matches!(get.get("age"), Err(AttrError::AttributeMissing(n)) if n == "age"));

        let fallback = Value::Int(0);
        assert_eq!(get.get_or("age", &fallback), &Value::Int(0));
    }

    #[test]
    fn setter_writes_in_place() {
        let mut map = Value::from(mapping! {});
        smart_setter(&mut map).set("k", "v").unwrap();
        assert_eq!(map, Value::from(mapping! { "k" => "v" }));

        let mut obj = Value::from(Object::plain());
        smart_setter(&mut obj).set("k", 1).unwrap();
        assert_eq!(smart_getter(&obj).get("k"), Some(&Value::Int(1)));
    }

    #[test]
    fn setter_fails_on_immutable_targets() {
        let mut frozen = Value::from(mapping! { "a" => 1 }.into_read_only());
        assert!(matches!(
            smart_setter(&mut frozen).set("a", 2),
            Err(AttrError::ImmutableTarget(_))
        ));

        let mut text = Value::from("plain string");
        assert!(matches!(
            smart_setter(&mut text).set("len", 3),
            Err(AttrError::ImmutableTarget(_))
        ));
    }

    #[test]
    fn take_consumes_the_entry() {
        let mut map = Value::from(mapping! { "a" => 1, "b" => 2 });
        let mut take = smart_getter_and_deleter(&mut map);
        assert_eq!(take.take("a"), Some(Value::Int(1)));
        assert_eq!(take.take("a"), None);
        assert_eq!(take.take_or("a", 9), Value::Int(9));
        assert_eq!(map, Value::from(mapping! { "b" => 2 }));
    }

    #[test]
    fn take_returns_value_when_removal_fails() {
        let class = Class::builder("Config").attr("level", 3).build().unwrap();
        let mut obj = Value::from(Object::new(class).with("level", 5));

        // The instance value goes first, the class value is never removed.
        assert_eq!(popattr(&mut obj, "level"), Some(Value::Int(5)));
        assert_eq!(popattr(&mut obj, "level"), Some(Value::Int(3)));
        assert_eq!(popattr(&mut obj, "level"), Some(Value::Int(3)));
        assert_eq!(popattr(&mut obj, "missing"), None);
    }

    #[test]
    fn take_from_delegated_attribute_keeps_it() {
        let class = Class::builder("Wrapper")
            .delegate("name", DelegatedAttribute::new("inner", "name"))
            .build()
            .unwrap();
        let inner = Object::plain().with("name", "wrapped");
        let mut obj = Value::from(Object::new(class).with("inner", inner));

        assert_eq!(popattr(&mut obj, "name"), Some(Value::from("wrapped")));
        assert_eq!(smart_getter(&obj).get("name"), Some(&Value::from("wrapped")));
    }

    #[test]
    fn setdefaultattr_only_fills_absent_names() {
        let mut obj = Value::from(Object::plain().with("spam", "egg"));
        assert_eq!(setdefaultattr(&mut obj, "foo", "bar").unwrap(), &Value::from("bar"));
        assert_eq!(setdefaultattr(&mut obj, "spam", "ham").unwrap(), &Value::from("egg"));
    }

    #[test]
    fn setdefaultattr_with_is_lazy() {
        let mut map = Value::from(mapping! { "a" => 1 });
        let mut calls = 0;
        setdefaultattr_with(&mut map, "a", || {
            calls += 1;
            Value::Int(2)
        })
        .unwrap();
        assert_eq!(calls, 0);

        let value = setdefaultattr_with(&mut map, "b", || {
            calls += 1;
            Value::Int(2)
        })
        .unwrap();
        assert_eq!(value, &Value::Int(2));
        assert_eq!(calls, 1);
    }

    fn upper_getter<'v>(target: &'v Value, name: &str) -> Option<&'v Value> {
        smart_getter(target).get(&name.to_uppercase())
    }

    #[test]
    fn plain_functions_are_getters() {
        let map = Value::from(mapping! { "KEY" => 1 });
        assert_eq!(Getter::get(&upper_getter, &map, "key"), Some(&Value::Int(1)));
    }

    #[test]
    fn smart_get_own_ignores_class_attributes() {
        let class = Class::builder("C").attr("shared", 1).build().unwrap();
        let obj = Value::from(Object::new(class));
        assert_eq!(Smart.get(&obj, "shared"), Some(&Value::Int(1)));
        assert_eq!(Smart.get_own(&obj, "shared"), None);
    }
}
