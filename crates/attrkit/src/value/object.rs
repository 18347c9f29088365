use super::{Class, ClassMember, Value};
use crate::error::{AttrError, Result};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

/// An attribute-protocol value: instance attributes backed by a [`Class`].
///
/// Reads resolve in this order:
/// 1. If the first class in the chain that defines the name delegates it,
///    the delegated attribute is read. Instance attributes cannot shadow it.
/// 2. Instance attributes.
/// 3. Class-level attributes.
#[derive(Debug, Clone)]
pub struct Object {
    class: Arc<Class>,
    attrs: BTreeMap<String, Value>,
    frozen: bool,
}

impl Object {
    pub fn new(class: Arc<Class>) -> Self {
        Self {
            class,
            attrs: BTreeMap::new(),
            frozen: false,
        }
    }

    /// An instance of the root `object` class.
    pub fn plain() -> Self {
        Self::new(Class::object())
    }

    /// Builder-style instance attribute, used while constructing an object.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    /// Rejects every later write and delete.
    pub fn into_frozen(mut self) -> Self {
        self.frozen = true;
        self
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    pub fn class(&self) -> &Arc<Class> {
        &self.class
    }

    pub fn class_name(&self) -> &str {
        self.class.name()
    }

    /// Instance attribute only, ignoring the class chain.
    pub fn own_attr(&self, name: &str) -> Option<&Value> {
        self.attrs.get(name)
    }

    pub fn own_attrs(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.attrs.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn get_attr(&self, name: &str) -> Option<&Value> {
        match self.class.lookup(name) {
            Some(ClassMember::Delegated(link)) => link.get(self),
            Some(ClassMember::Attr(value)) => self.attrs.get(name).or(Some(value)),
            None => self.attrs.get(name),
        }
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.get_attr(name).is_some()
    }

    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Result<()> {
        let name = name.into();
        if let Some(link) = self.class.delegation(&name) {
            return link.set(self, value.into());
        }
        self.check_unfrozen(&name, "set")?;
        self.attrs.insert(name, value.into());
        Ok(())
    }

    /// Removes an instance attribute and returns its value.
    ///
    /// A name that only exists at class level cannot be removed through an
    /// instance and fails with [`AttrError::ImmutableTarget`].
    pub fn del_attr(&mut self, name: &str) -> Result<Value> {
        if let Some(link) = self.class.delegation(name) {
            return link.delete(self);
        }
        self.check_unfrozen(name, "delete")?;
        match self.attrs.remove(name) {
            Some(value) => Ok(value),
            None if self.class.class_attr(name).is_some() => Err(AttrError::ImmutableTarget(
                format!("`{}` is a class attribute of `{}`", name, self.class_name()),
            )),
            None => Err(AttrError::NotFound(name.to_string())),
        }
    }

    /// Every attribute name visible on this object.
    pub fn attr_names(&self) -> BTreeSet<String> {
        let mut names = self.class.member_names();
        names.extend(self.attrs.keys().cloned());
        names
    }

    fn check_unfrozen(&self, name: &str, action: &str) -> Result<()> {
        if self.frozen {
            return Err(AttrError::ImmutableTarget(format!(
                "`{}` instance is frozen; cannot {} `{}`",
                self.class_name(),
                action,
                name
            )));
        }
        Ok(())
    }
}

impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.class, &other.class)
            && self.frozen == other.frozen
            && self.attrs == other.attrs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counter_class() -> Arc<Class> {
        Class::builder("Counter").attr("step", 1).build().unwrap()
    }

    #[test]
    fn instance_attr_shadows_class_attr() {
        let obj = Object::new(counter_class()).with("step", 5);
        assert_eq!(obj.get_attr("step"), Some(&Value::Int(5)));
        assert_eq!(obj.class().class_attr("step"), Some(&Value::Int(1)));
    }

    #[test]
    fn class_attr_visible_until_shadowed() {
        let mut obj = Object::new(counter_class());
        assert_eq!(obj.get_attr("step"), Some(&Value::Int(1)));
        assert_eq!(obj.own_attr("step"), None);

        obj.set_attr("step", 3).unwrap();
        assert_eq!(obj.get_attr("step"), Some(&Value::Int(3)));

        assert_eq!(obj.del_attr("step").unwrap(), Value::Int(3));
        assert_eq!(obj.get_attr("step"), Some(&Value::Int(1)));
    }

    #[test]
    fn deleting_class_attr_through_instance_fails() {
        let mut obj = Object::new(counter_class());
        assert!(matches!(obj.del_attr("step"), Err(AttrError::ImmutableTarget(_))));
    }

    #[test]
    fn deleting_absent_attr_is_not_found() {
        let mut obj = Object::plain();
        assert!(matches!(obj.del_attr("ghost"), Err(AttrError::NotFound(n)) if n == "ghost"));
    }

    #[test]
    fn frozen_object_rejects_writes() {
        let mut obj = Object::plain().with("x", 1).into_frozen();
        assert!(matches!(obj.set_attr("x", 2), Err(AttrError::ImmutableTarget(_))));
        assert!(matches!(obj.del_attr("x"), Err(AttrError::ImmutableTarget(_))));
        assert_eq!(obj.get_attr("x"), Some(&Value::Int(1)));
    }

    #[test]
    fn attr_names_merge_instance_and_class() {
        let obj = Object::new(counter_class()).with("count", 0);
        let names: Vec<_> = obj.attr_names().into_iter().collect();
        assert_eq!(names, vec!["count", "step"]);
    }

    #[test]
    fn equality_requires_same_class() {
        let a = Object::new(counter_class());
        let b = Object::new(counter_class());
        assert_ne!(a, b);
        assert_eq!(a.clone(), a);
    }
}
