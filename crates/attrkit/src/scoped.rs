//! # Scoped Attribute Transactions
//!
//! Captures the state of a few names on a target, lets code change them, and
//! puts everything back when the scope ends.
//!
//! - [`save_attributes`] snapshots names; the block may change them freely.
//! - [`temp_attributes`] snapshots names and then applies new values before
//!   the block runs.
//!
//! Both return a builder. [`SaveAttributes::enter`] yields an
//! [`AttributeGuard`] that derefs to the target; `run` takes a closure and
//! handles restoration and error precedence itself.
//!
//! ## Restoration
//!
//! Each name is restored in capture order:
//!
//! - present before: its prior value is written back through the setter.
//! - absent before, present now: it is deleted.
//! - absent before, absent now: nothing happens.
//!
//! Every entry is attempted even after a failure. Failures are returned
//! together as [`AttrError::Restoration`] from [`AttributeGuard::restore`].
//! A guard dropped without an explicit restore (early return, `?`, panic)
//! restores itself and logs failures, since `Drop` cannot return them.
//!
//! Snapshots use [`Getter::get_own`], so a value that an object only
//! inherits from its class counts as absent: restoring deletes the instance
//! override and the class value shows through again.

use crate::error::{AttrError, RestorationFailures, Result};
use crate::getter::{Getter, Setter, Smart};
use crate::value::Value;
use std::ops::{Deref, DerefMut};

#[derive(Debug, Clone)]
struct Snapshot {
    name: String,
    prior: Option<Value>,
}

fn capture<G: Getter>(target: &Value, names: &[String], getter: &G) -> Vec<Snapshot> {
    names
        .iter()
        .map(|name| Snapshot {
            name: name.clone(),
            prior: getter.get_own(target, name).cloned(),
        })
        .collect()
}

fn join_names(names: &[String]) -> String {
    names.join(",")
}

/// Restores a snapshot of attributes when restored explicitly or dropped.
pub struct AttributeGuard<'a, G: Getter = Smart, S: Setter = Smart> {
    target: &'a mut Value,
    snapshot: Vec<Snapshot>,
    getter: G,
    setter: S,
    restored: bool,
}

impl<'a, G: Getter, S: Setter> AttributeGuard<'a, G, S> {
    fn new(target: &'a mut Value, snapshot: Vec<Snapshot>, getter: G, setter: S) -> Self {
        Self {
            target,
            snapshot,
            getter,
            setter,
            restored: false,
        }
    }

    /// Names captured by this guard, in capture order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.snapshot.iter().map(|entry| entry.name.as_str())
    }

    /// Restores every captured name and ends the scope.
    pub fn restore(mut self) -> Result<()> {
        self.restore_in_place()
    }

    /// Runs `body` on the target, then restores.
    ///
    /// An error from `body` is returned even if restoration also fails; the
    /// restoration error is logged in that case.
    pub fn run<R, E, F>(mut self, body: F) -> std::result::Result<R, E>
    where
        F: FnOnce(&mut Value) -> std::result::Result<R, E>,
        E: From<AttrError>,
    {
        let outcome = body(&mut *self.target);
        let restored = self.restore_in_place();
        match (outcome, restored) {
            (Ok(value), Ok(())) => Ok(value),
            (Ok(_), Err(err)) => Err(err.into()),
            (Err(err), Ok(())) => Err(err),
            (Err(err), Err(restore_err)) => {
                log::error!(
                    "event=scope_restore status=failed after_body_error=true error={}",
                    restore_err
                );
                Err(err)
            }
        }
    }

    fn restore_in_place(&mut self) -> Result<()> {
        self.restored = true;
        let mut failures = Vec::new();
        for entry in std::mem::take(&mut self.snapshot) {
            let outcome = match entry.prior {
                Some(value) => self.setter.set(&mut *self.target, &entry.name, value),
                None if self.getter.get_own(&*self.target, &entry.name).is_some() => {
                    self.setter.delete(&mut *self.target, &entry.name).map(|_| ())
                }
                None => Ok(()),
            };
            if let Err(err) = outcome {
                log::debug!(
                    "event=scope_restore name={} status=failed error={}",
                    entry.name,
                    err
                );
                failures.push(err);
            }
        }
        if failures.is_empty() {
            log::trace!("event=scope_restore status=ok");
            Ok(())
        } else {
            Err(AttrError::Restoration(RestorationFailures(failures)))
        }
    }
}

impl<G: Getter, S: Setter> Deref for AttributeGuard<'_, G, S> {
    type Target = Value;

    fn deref(&self) -> &Value {
        &*self.target
    }
}

impl<G: Getter, S: Setter> DerefMut for AttributeGuard<'_, G, S> {
    fn deref_mut(&mut self) -> &mut Value {
        &mut *self.target
    }
}

impl<G: Getter, S: Setter> Drop for AttributeGuard<'_, G, S> {
    fn drop(&mut self) {
        if self.restored {
            return;
        }
        if let Err(err) = self.restore_in_place() {
            log::error!("event=scope_restore status=failed on_drop=true error={}", err);
        }
    }
}

impl<G: Getter, S: Setter> std::fmt::Debug for AttributeGuard<'_, G, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AttributeGuard")
            .field("target", &self.target)
            .field("snapshot", &self.snapshot)
            .field("restored", &self.restored)
            .finish()
    }
}

/// Builder returned by [`save_attributes`].
pub struct SaveAttributes<'a, G = Smart, S = Smart> {
    target: &'a mut Value,
    names: Vec<String>,
    getter: G,
    setter: S,
}

/// Saves `names` on `target` so they can be restored after a block.
pub fn save_attributes<I, N>(target: &mut Value, names: I) -> SaveAttributes<'_>
where
    I: IntoIterator<Item = N>,
    N: Into<String>,
{
    SaveAttributes {
        target,
        names: names.into_iter().map(Into::into).collect(),
        getter: Smart,
        setter: Smart,
    }
}

impl<'a, G: Getter, S: Setter> SaveAttributes<'a, G, S> {
    /// Getter used for the snapshot.
    pub fn getter<H: Getter>(self, getter: H) -> SaveAttributes<'a, H, S> {
        SaveAttributes {
            target: self.target,
            names: self.names,
            getter,
            setter: self.setter,
        }
    }

    /// Setter used for restoration.
    pub fn setter<T: Setter>(self, setter: T) -> SaveAttributes<'a, G, T> {
        SaveAttributes {
            target: self.target,
            names: self.names,
            getter: self.getter,
            setter,
        }
    }

    pub fn enter(self) -> AttributeGuard<'a, G, S> {
        let snapshot = capture(&*self.target, &self.names, &self.getter);
        log::debug!("event=save_attributes names={}", join_names(&self.names));
        AttributeGuard::new(self.target, snapshot, self.getter, self.setter)
    }

    /// See [`AttributeGuard::run`].
    pub fn run<R, E, F>(self, body: F) -> std::result::Result<R, E>
    where
        F: FnOnce(&mut Value) -> std::result::Result<R, E>,
        E: From<AttrError>,
    {
        self.enter().run(body)
    }
}

/// Builder returned by [`temp_attributes`].
pub struct TempAttributes<'a, G = Smart, S = Smart> {
    target: &'a mut Value,
    values: Vec<(String, Value)>,
    getter: G,
    setter: S,
}

/// Temporarily sets each `(name, value)` pair on `target`.
pub fn temp_attributes<I, N, V>(target: &mut Value, pairs: I) -> TempAttributes<'_>
where
    I: IntoIterator<Item = (N, V)>,
    N: Into<String>,
    V: Into<Value>,
{
    TempAttributes {
        target,
        values: pairs
            .into_iter()
            .map(|(name, value)| (name.into(), value.into()))
            .collect(),
        getter: Smart,
        setter: Smart,
    }
}

impl<'a, G: Getter, S: Setter> TempAttributes<'a, G, S> {
    pub fn getter<H: Getter>(self, getter: H) -> TempAttributes<'a, H, S> {
        TempAttributes {
            target: self.target,
            values: self.values,
            getter,
            setter: self.setter,
        }
    }

    /// Setter used both to apply the temporary values and to restore.
    pub fn setter<T: Setter>(self, setter: T) -> TempAttributes<'a, G, T> {
        TempAttributes {
            target: self.target,
            values: self.values,
            getter: self.getter,
            setter,
        }
    }

    /// Snapshots the names, then applies the temporary values.
    ///
    /// If any value cannot be applied, the snapshot is restored at once and
    /// the apply error is returned.
    pub fn enter(self) -> Result<AttributeGuard<'a, G, S>> {
        let names: Vec<String> = self.values.iter().map(|(name, _)| name.clone()).collect();
        let snapshot = capture(&*self.target, &names, &self.getter);
        let mut guard = AttributeGuard::new(self.target, snapshot, self.getter, self.setter);
        for (name, value) in self.values {
            if let Err(err) = guard.setter.set(&mut *guard.target, &name, value) {
                log::debug!(
                    "event=temp_attributes name={} status=apply_failed error={}",
                    name,
                    err
                );
                if let Err(restore_err) = guard.restore_in_place() {
                    log::error!(
                        "event=scope_restore status=failed after_apply_error=true error={}",
                        restore_err
                    );
                }
                return Err(err);
            }
        }
        log::debug!("event=temp_attributes names={}", join_names(&names));
        Ok(guard)
    }

    /// See [`AttributeGuard::run`].
    pub fn run<R, E, F>(self, body: F) -> std::result::Result<R, E>
    where
        F: FnOnce(&mut Value) -> std::result::Result<R, E>,
        E: From<AttrError>,
    {
        self.enter()?.run(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::getter::{smart_getter, smart_setter};
    use crate::mapping;
    use crate::value::{Class, Object};
    use std::panic::{catch_unwind, AssertUnwindSafe};

    /// Setter that refuses to touch a fixed set of names.
    struct RefuseNames(&'static [&'static str]);

    impl Setter for RefuseNames {
        fn set(&self, target: &mut Value, name: &str, value: Value) -> Result<()> {
            if self.0.contains(&name) {
                return Err(AttrError::ImmutableTarget(format!("refused set of {}", name)));
            }
            Smart.set(target, name, value)
        }

        fn delete(&self, target: &mut Value, name: &str) -> Result<Value> {
            if self.0.contains(&name) {
                return Err(AttrError::ImmutableTarget(format!("refused delete of {}", name)));
            }
            Smart.delete(target, name)
        }
    }

    fn get<'v>(target: &'v Value, name: &str) -> Option<&'v Value> {
        smart_getter(target).get(name)
    }

    #[test]
    fn save_restores_changed_values() {
        let mut obj = Value::from(Object::plain().with("x", 1));
        {
            let mut guard = save_attributes(&mut obj, ["x"]).enter();
            smart_setter(&mut guard).set("x", 99).unwrap();
            assert_eq!(get(&guard, "x"), Some(&Value::Int(99)));
            guard.restore().unwrap();
        }
        assert_eq!(get(&obj, "x"), Some(&Value::Int(1)));
    }

    #[test]
    fn absent_names_are_deleted_again() {
        let mut map = Value::from(mapping! { "keep" => 1 });
        temp_attributes(&mut map, [("new", 2)])
            .run(|inner| -> Result<()> {
                assert_eq!(get(inner, "new"), Some(&Value::Int(2)));
                Ok(())
            })
            .unwrap();
        assert_eq!(map, Value::from(mapping! { "keep" => 1 }));
    }

    #[test]
    fn absent_and_still_absent_is_a_no_op() {
        let mut map = Value::from(mapping! {});
        let guard = save_attributes(&mut map, ["ghost"]).enter();
        assert!(guard.restore().is_ok());
    }

    #[test]
    fn restores_on_early_drop() {
        let mut obj = Value::from(Object::plain().with("x", 1));
        let failed = (|| -> Result<()> {
            let _guard = temp_attributes(&mut obj, [("x", 2)]).enter()?;
            Err(AttrError::NotFound("bail".to_string()))
        })();
        assert!(failed.is_err());
        assert_eq!(get(&obj, "x"), Some(&Value::Int(1)));
    }

    #[test]
    fn restores_after_panic() {
        let mut obj = Value::from(Object::plain().with("x", 1));
        let result = catch_unwind(AssertUnwindSafe(|| {
            let guard = temp_attributes(&mut obj, [("x", 2), ("y", 3)]).enter().unwrap();
            assert_eq!(get(&guard, "x"), Some(&Value::Int(2)));
            panic!("inside the scope");
        }));
        assert!(result.is_err());
        assert_eq!(get(&obj, "x"), Some(&Value::Int(1)));
        assert_eq!(get(&obj, "y"), None);
    }

    #[test]
    fn nested_scopes_unwind_in_order() {
        let mut obj = Value::from(Object::plain().with("x", 1));
        {
            let mut outer = temp_attributes(&mut obj, [("x", 2)]).enter().unwrap();
            {
                let inner = temp_attributes(&mut *outer, [("x", 3)]).enter().unwrap();
                assert_eq!(get(&inner, "x"), Some(&Value::Int(3)));
                inner.restore().unwrap();
            }
            assert_eq!(get(&outer, "x"), Some(&Value::Int(2)));
            outer.restore().unwrap();
        }
        assert_eq!(get(&obj, "x"), Some(&Value::Int(1)));
    }

    #[test]
    fn class_value_shows_through_after_restore() {
        let class = Class::builder("Settings").attr("level", 1).build().unwrap();
        let mut obj = Value::from(Object::new(class));
        temp_attributes(&mut obj, [("level", 5)])
            .run(|inner| -> Result<()> {
                assert_eq!(get(inner, "level"), Some(&Value::Int(5)));
                Ok(())
            })
            .unwrap();
        assert_eq!(get(&obj, "level"), Some(&Value::Int(1)));
        assert_eq!(obj.as_object().unwrap().own_attr("level"), None);
    }

    #[test]
    fn restoration_failures_are_aggregated() {
        let mut map = Value::from(mapping! { "a" => 1, "b" => 2, "c" => 3 });
        let mut guard = save_attributes(&mut map, ["a", "b", "c"])
            .setter(RefuseNames(&["a", "b"]))
            .enter();
        for name in ["a", "b", "c"] {
            smart_setter(&mut guard).set(name, 0).unwrap();
        }

        match guard.restore() {
            Err(AttrError::Restoration(failures)) => assert_eq!(failures.len(), 2),
            other => panic!("expected restoration failure, got {:?}", other),
        }
        // The entry after the failures was still restored.
        assert_eq!(get(&map, "c"), Some(&Value::Int(3)));
        assert_eq!(get(&map, "a"), Some(&Value::Int(0)));
    }

    #[test]
    fn body_error_wins_over_restoration_error() {
        let mut map = Value::from(mapping! { "a" => 1 });
        let result: Result<()> = save_attributes(&mut map, ["a"])
            .setter(RefuseNames(&["a"]))
            .run(|inner| -> Result<()> {
                smart_setter(inner).set("a", 2)?;
                Err(AttrError::Unsupported("body".to_string()))
            });
        assert!(matches!(result, Err(AttrError::Unsupported(_))));
    }

    #[test]
    fn restoration_error_surfaces_when_body_succeeds() {
        let mut map = Value::from(mapping! { "a" => 1 });
        let result: Result<i64> = save_attributes(&mut map, ["a"])
            .setter(RefuseNames(&["a"]))
            .run(|_| -> Result<i64> { Ok(7) });
        assert!(matches!(result, Err(AttrError::Restoration(_))));
    }

    fn upper_getter<'v>(target: &'v Value, name: &str) -> Option<&'v Value> {
        smart_getter(target).get(&name.to_uppercase())
    }

    #[test]
    fn snapshot_reads_through_custom_getter() {
        let mut map = Value::from(mapping! { "X" => 1, "x" => 5 });
        save_attributes(&mut map, ["x"])
            .getter(upper_getter)
            .run(|inner| -> Result<()> { smart_setter(inner).set("x", 9) })
            .unwrap();
        // The snapshot saw `X`, so `x` is restored to that value.
        assert_eq!(map, Value::from(mapping! { "X" => 1, "x" => 1 }));

        let mut map = Value::from(mapping! { "X" => 1 });
        temp_attributes(&mut map, [("x", 2)])
            .getter(upper_getter)
            .run(|inner| -> Result<()> {
                assert_eq!(get(inner, "x"), Some(&Value::Int(2)));
                Ok(())
            })
            .unwrap();
        assert_eq!(map, Value::from(mapping! { "X" => 1, "x" => 1 }));
    }

    #[test]
    fn failed_apply_restores_immediately() {
        let mut map = Value::from(mapping! { "a" => 1 });
        let result = temp_attributes(&mut map, [("a", 10), ("b", 20)])
            .setter(RefuseNames(&["b"]))
            .enter()
            .map(|_| ());
        assert!(matches!(result, Err(AttrError::ImmutableTarget(_))));
        assert_eq!(map, Value::from(mapping! { "a" => 1 }));
    }

    #[test]
    fn delegated_names_cannot_be_overridden() {
        let class = crate::delegator("Proxy", "inner", [("name", "name")])
            .build()
            .unwrap();
        let mut obj = Value::from(Object::new(class).with("inner", mapping! { "name" => "x" }));
        let result = temp_attributes(&mut obj, [("name", "y")]).enter().map(|_| ());
        assert!(matches!(result, Err(AttrError::Unsupported(_))));
        assert_eq!(get(&obj, "name"), Some(&Value::from("x")));
    }
}
