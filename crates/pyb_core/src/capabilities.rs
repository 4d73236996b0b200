//! Capability traits implemented by the host object model.
//!
//! The core never owns attribute storage or native memory; it only talks to
//! them through these traits.

use crate::value::Value;

/// A managed object as seen from the bridge.
pub trait PyObject: Send + Sync {
    fn type_name(&self) -> &str;

    /// The `__index__` hook. `None` means the object is not index-like.
    fn index(&self) -> Option<Value> {
        None
    }

    /// Reads a named attribute. `None` means the attribute is absent.
    fn get_attribute(&self, _name: &str) -> Option<Value> {
        None
    }
}

/// The native-side mirror of a managed string.
///
/// State behind this trait is owned by native code and may change between
/// two calls.
pub trait NativeCounterpart: Send + Sync {
    fn is_native(&self) -> bool;
}
