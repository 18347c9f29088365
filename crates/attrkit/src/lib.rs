//! # attrkit
//!
//! Uniform attribute access over dynamic values. Code that reads "a name from
//! a thing" should not care whether the thing is a mapping (read by key) or an
//! object (read by attribute); attrkit resolves the protocol once and exposes
//! the same operations for both.
//!
//! ## Layering
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Composite operations                                       │
//! │  - traverse / get_traverser (traverse.rs)                   │
//! │  - get_first_of / pop_first_of / iterate_over (lookup.rs)   │
//! │  - save_attributes / temp_attributes (scoped.rs)            │
//! │  - fulldir / smart_copy (introspect.rs)                     │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Getters and setters (getter.rs)                            │
//! │  - smart_getter / strict_getter / smart_setter              │
//! │  - Getter + Setter traits: the override seams               │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Accessor resolution (accessor.rs)                          │
//! │  - Mapping → key protocol, everything else → attribute      │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Value model (value/)                                       │
//! │  - Value, Mapping, Object, Class (+ delegate.rs)            │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Absence
//!
//! "Unset" is `None`. A stored [`Value::Null`] is a value like any other, so
//! every read can tell "present but null" from "not there".
//!
//! ## Example
//!
//! ```
//! use attrkit::{get_first_of, mapping, traverse, Object, Value};
//!
//! let doc = Value::from(mapping! {
//!     "user" => Object::plain().with("name", "ada"),
//! });
//! assert_eq!(traverse(&doc, "user.name").unwrap(), Some(&Value::from("ada")));
//!
//! let config = Value::from(mapping! { "a" => 1 });
//! let zero = Value::Int(0);
//! assert_eq!(get_first_of(&config, &["x", "y", "a"]).unwrap_or(&zero), &Value::Int(1));
//! ```

pub mod accessor;
pub mod config;
pub mod delegate;
pub mod error;
pub mod getter;
pub mod introspect;
pub mod lookup;
pub mod scoped;
pub mod traverse;
pub mod value;

pub use accessor::{resolve, Accessor, Protocol};
pub use config::AttrkitConfig;
pub use delegate::{delegator, DelegatedAttribute};
pub use error::{AttrError, RestorationFailures, Result};
pub use getter::{
    popattr, setdefaultattr, setdefaultattr_with, smart_getter, smart_getter_and_deleter,
    smart_setter, strict_getter, Getter, Setter, Smart,
};
pub use introspect::{
    fdir, fulldir, smart_copy, smart_copy_with, validate_attrs, xdir, CopyDefaults,
};
pub use lookup::{
    get_first_of, get_first_of_where, iterate_over, multi_getter, pop_first_of, KeySpec,
};
pub use scoped::{save_attributes, temp_attributes, AttributeGuard};
pub use traverse::{
    extract_attrs, get_traverser, traverse, traverse_or, traverse_with, Path, Traverser,
};
pub use value::{Class, ClassBuilder, ClassMember, Mapping, Object, Value};
