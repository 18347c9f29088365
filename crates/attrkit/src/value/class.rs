//! Classes: shared, immutable attribute tables for objects.
//!
//! A class is assembled once with [`ClassBuilder`] and frozen behind an
//! `Arc`. It supplies class-level attributes and the delegation table read by
//! [`Object::get_attr`](super::Object::get_attr).

use super::Value;
use crate::delegate::DelegatedAttribute;
use crate::error::{AttrError, Result};
use once_cell::sync::Lazy;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

static OBJECT_CLASS: Lazy<Arc<Class>> = Lazy::new(|| {
    Arc::new(Class {
        name: "object".to_string(),
        base: None,
        attrs: BTreeMap::new(),
        delegations: BTreeMap::new(),
    })
});

/// What a class defines for a given name.
#[derive(Debug, Clone, Copy)]
pub enum ClassMember<'a> {
    Attr(&'a Value),
    Delegated(&'a DelegatedAttribute),
}

#[derive(Debug)]
pub struct Class {
    name: String,
    base: Option<Arc<Class>>,
    attrs: BTreeMap<String, Value>,
    delegations: BTreeMap<String, DelegatedAttribute>,
}

impl Class {
    pub fn builder(name: impl Into<String>) -> ClassBuilder {
        ClassBuilder::new(name)
    }

    /// The root class every other class derives from.
    pub fn object() -> Arc<Class> {
        Arc::clone(&OBJECT_CLASS)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn base(&self) -> Option<&Arc<Class>> {
        self.base.as_ref()
    }

    /// This class followed by its bases, most derived first.
    pub fn ancestors(&self) -> impl Iterator<Item = &Class> {
        std::iter::successors(Some(self), |class| class.base.as_deref())
    }

    pub fn is_subclass_of(&self, other: &Class) -> bool {
        self.ancestors().any(|class| std::ptr::eq(class, other))
    }

    /// Finds the first class in the chain defining `name`.
    pub fn lookup(&self, name: &str) -> Option<ClassMember<'_>> {
        self.ancestors().find_map(|class| {
            if let Some(link) = class.delegations.get(name) {
                Some(ClassMember::Delegated(link))
            } else {
                class.attrs.get(name).map(ClassMember::Attr)
            }
        })
    }

    /// Class-level attribute value, ignoring delegations.
    pub fn class_attr(&self, name: &str) -> Option<&Value> {
        match self.lookup(name) {
            Some(ClassMember::Attr(value)) => Some(value),
            _ => None,
        }
    }

    pub fn delegation(&self, name: &str) -> Option<&DelegatedAttribute> {
        match self.lookup(name) {
            Some(ClassMember::Delegated(link)) => Some(link),
            _ => None,
        }
    }

    /// Delegations declared directly on this class.
    pub fn delegations(&self) -> impl Iterator<Item = (&str, &DelegatedAttribute)> {
        self.delegations.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Every attribute and delegated name visible through the class chain.
    pub fn member_names(&self) -> BTreeSet<String> {
        self.ancestors()
            .flat_map(|class| class.attrs.keys().chain(class.delegations.keys()))
            .cloned()
            .collect()
    }
}

/// Assembles a [`Class`]. The result is immutable once built.
#[derive(Debug)]
pub struct ClassBuilder {
    name: String,
    base: Option<Arc<Class>>,
    attrs: BTreeMap<String, Value>,
    delegations: BTreeMap<String, DelegatedAttribute>,
}

impl ClassBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base: None,
            attrs: BTreeMap::new(),
            delegations: BTreeMap::new(),
        }
    }

    pub fn extends(mut self, base: Arc<Class>) -> Self {
        self.base = Some(base);
        self
    }

    /// Declares a class-level attribute, replacing any delegation of the
    /// same name on this class.
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        let name = name.into();
        self.delegations.remove(&name);
        self.attrs.insert(name, value.into());
        self
    }

    /// Installs a delegated attribute, replacing any class-level attribute of
    /// the same name on this class.
    pub fn delegate(mut self, name: impl Into<String>, link: DelegatedAttribute) -> Self {
        let name = name.into();
        self.attrs.remove(&name);
        self.delegations.insert(name, link);
        self
    }

    /// Builds the class.
    ///
    /// Fails with [`AttrError::InvalidDelegation`] when a delegation's holder
    /// attribute is itself delegated somewhere in the class chain.
    pub fn build(self) -> Result<Arc<Class>> {
        let class = Class {
            name: self.name,
            base: Some(self.base.unwrap_or_else(Class::object)),
            attrs: self.attrs,
            delegations: self.delegations,
        };

        for ancestor in class.ancestors() {
            for (name, link) in ancestor.delegations() {
                if let Some(ClassMember::Delegated(_)) = class.lookup(link.target_name()) {
                    return Err(AttrError::InvalidDelegation(format!(
                        "`{}.{}` reads through `{}`, which is itself delegated",
                        class.name,
                        name,
                        link.target_name()
                    )));
                }
            }
        }

        log::debug!(
            "event=class_built class={} delegations={}",
            class.name,
            class.delegations.len()
        );
        Ok(Arc::new(class))
    }
}
