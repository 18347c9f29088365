//! # Accessor Resolution
//!
//! Mappings and objects answer two different access protocols: mappings are
//! read by key, objects by attribute. The resolver inspects a target once,
//! picks the matching [`Protocol`], and hands back an [`Accessor`] exposing the
//! same three operations for either protocol:
//!
//! | Operation | Key protocol | Attribute protocol |
//! |-----------|--------------|--------------------|
//! | `get` | mapping entry | [`Object::get_attr`] |
//! | `set` | insert (fails on read-only mappings) | [`Object::set_attr`] |
//! | `delete` | remove | [`Object::del_attr`] |
//!
//! Values that are neither mappings nor objects (scalars, lists) use the
//! attribute protocol with no attributes at all: reads find nothing and writes
//! fail with [`AttrError::ImmutableTarget`].
//!
//! Resolution itself never fails; a missing name is only reported when an
//! operation runs.

use crate::error::{AttrError, Result};
use crate::value::{Mapping, Object, Value};
use std::collections::BTreeSet;

/// How a target is accessed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    /// Key-based access (mappings).
    Key,
    /// Attribute-based access (objects and everything else).
    Attribute,
}

impl Protocol {
    pub fn of(target: &Value) -> Self {
        match target {
            Value::Map(_) => Protocol::Key,
            _ => Protocol::Attribute,
        }
    }
}

/// A target resolved for reading. The protocol is decided on construction.
#[derive(Debug, Clone, Copy)]
pub(crate) enum View<'a> {
    Key(&'a Mapping),
    Object(&'a Object),
    Opaque(&'a Value),
}

impl<'a> View<'a> {
    pub(crate) fn of(target: &'a Value) -> Self {
        match target {
            Value::Map(map) => View::Key(map),
            Value::Object(obj) => View::Object(obj),
            other => View::Opaque(other),
        }
    }

    pub(crate) fn protocol(self) -> Protocol {
        match self {
            View::Key(_) => Protocol::Key,
            View::Object(_) | View::Opaque(_) => Protocol::Attribute,
        }
    }

    pub(crate) fn get(self, name: &str) -> Option<&'a Value> {
        match self {
            View::Key(map) => map.get(name),
            View::Object(obj) => obj.get_attr(name),
            View::Opaque(_) => None,
        }
    }

    /// Like `get`, but objects only report instance attributes.
    pub(crate) fn get_own(self, name: &str) -> Option<&'a Value> {
        match self {
            View::Key(map) => map.get(name),
            View::Object(obj) => obj.own_attr(name),
            View::Opaque(_) => None,
        }
    }

    pub(crate) fn names(self) -> BTreeSet<String> {
        match self {
            View::Key(map) => map.keys().map(str::to_string).collect(),
            View::Object(obj) => obj.attr_names(),
            View::Opaque(_) => BTreeSet::new(),
        }
    }
}

#[derive(Debug)]
enum ViewMut<'a> {
    Key(&'a mut Mapping),
    Object(&'a mut Object),
    Opaque(&'a Value),
}

/// The get/set/delete triple bound to one target.
///
/// Holds a mutable borrow of the target; every change made through it lands
/// on the target in place.
#[derive(Debug)]
pub struct Accessor<'a> {
    target: ViewMut<'a>,
}

/// Resolves the access protocol of `target`.
pub fn resolve(target: &mut Value) -> Accessor<'_> {
    let target = match target {
        Value::Map(map) => ViewMut::Key(map),
        Value::Object(obj) => ViewMut::Object(obj),
        other => ViewMut::Opaque(other),
    };
    Accessor { target }
}

impl<'a> Accessor<'a> {
    pub fn protocol(&self) -> Protocol {
        self.view().protocol()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.view().get(name)
    }

    pub fn get_or<'s>(&'s self, name: &str, default: &'s Value) -> &'s Value {
        self.get(name).unwrap_or(default)
    }

    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
        match &mut self.target {
            ViewMut::Key(map) => map.insert(name, value).map(|_| ()),
            ViewMut::Object(obj) => obj.set_attr(name, value),
            ViewMut::Opaque(other) => Err(AttrError::ImmutableTarget(format!(
                "`{}` values have no writable attributes; cannot set `{}`",
                other.type_name(),
                name
            ))),
        }
    }

    /// Removes `name` and returns its value.
    ///
    /// Unlike a non-strict read, a missing name is an error here
    /// ([`AttrError::NotFound`]); callers wanting delete-if-present must
    /// ignore it explicitly.
    pub fn delete(&mut self, name: &str) -> Result<Value> {
        match &mut self.target {
            ViewMut::Key(map) => map.remove(name),
            ViewMut::Object(obj) => obj.del_attr(name),
            ViewMut::Opaque(_) => Err(AttrError::NotFound(name.to_string())),
        }
    }

    /// Every name currently visible on the target.
    pub fn names(&self) -> BTreeSet<String> {
        self.view().names()
    }

    fn view(&self) -> View<'_> {
        match &self.target {
            ViewMut::Key(map) => View::Key(map),
            ViewMut::Object(obj) => View::Object(obj),
            ViewMut::Opaque(other) => View::Opaque(other),
        }
    }
}
