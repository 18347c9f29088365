//! # Attribute Delegation
//!
//! A wrapper object often needs to expose a few attributes of an object it
//! holds. Instead of copying them, its class declares [`DelegatedAttribute`]s:
//! reading `wrapper.name` reads `wrapper.<holder>.<attr>` at access time.
//!
//! Delegations are declared on a [`ClassBuilder`] and become part of the
//! immutable [`Class`](crate::Class). They are read-only: assigning or deleting
//! a delegated name fails with [`AttrError::Unsupported`].
//!
//! ```
//! use attrkit::{delegator, mapping, Object, Value};
//!
//! let class = delegator("Response", "raw", [("status", "code"), ("body", "text")])
//!     .build()
//!     .unwrap();
//! let raw = mapping! { "code" => 200, "text" => "ok" };
//! let response = Object::new(class).with("raw", raw);
//!
//! assert_eq!(response.get_attr("status"), Some(&Value::Int(200)));
//! ```

use crate::error::{AttrError, Result};
use crate::getter::smart_getter;
use crate::value::{ClassBuilder, Object, Value};

/// Forwards reads of one attribute to an attribute of a held object.
#[derive(Debug, Clone, PartialEq)]
pub struct DelegatedAttribute {
    target_name: String,
    delegated_attr: String,
    default: Option<Value>,
}

impl DelegatedAttribute {
    /// Reads `delegated_attr` from the object stored in the host's
    /// `target_name` attribute.
    pub fn new(target_name: impl Into<String>, delegated_attr: impl Into<String>) -> Self {
        Self {
            target_name: target_name.into(),
            delegated_attr: delegated_attr.into(),
            default: None,
        }
    }

    /// Value returned when the holder or the delegated attribute is absent.
    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn target_name(&self) -> &str {
        &self.target_name
    }

    pub fn delegated_attr(&self) -> &str {
        &self.delegated_attr
    }

    pub fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// Reads the delegated value through `host`.
    pub fn get<'a>(&'a self, host: &'a Object) -> Option<&'a Value> {
        host.get_attr(&self.target_name)
            .and_then(|holder| smart_getter(holder).get(&self.delegated_attr))
            .or(self.default.as_ref())
    }

    /// Delegated attributes have no write path.
    pub fn set(&self, host: &Object, _value: Value) -> Result<()> {
        Err(self.read_only(host, "set"))
    }

    /// Delegated attributes cannot be removed through the host.
    pub fn delete(&self, host: &Object) -> Result<Value> {
        Err(self.read_only(host, "delete"))
    }

    fn read_only(&self, host: &Object, action: &str) -> AttrError {
        AttrError::Unsupported(format!(
            "cannot {} `{}`: it delegates to `{}.{}` and is read-only",
            action,
            host.class_name(),
            self.target_name,
            self.delegated_attr
        ))
    }
}

/// Starts a class whose attributes in `attrs_map` are delegated to the
/// object held in `attribute`.
///
/// Each `(host_name, target_attr)` pair installs a [`DelegatedAttribute`]
/// reading `target_attr` from the holder. Further attributes, a base class or
/// extra delegations can be added to the returned builder before building.
pub fn delegator<I, K, V>(class_name: &str, attribute: &str, attrs_map: I) -> ClassBuilder
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    attrs_map
        .into_iter()
        .fold(ClassBuilder::new(class_name), |builder, (host_name, target_attr)| {
            builder.delegate(host_name, DelegatedAttribute::new(attribute, target_attr))
        })
}
