//! Named-field access on managed objects.

use hashbrown::HashMap;
use pyb_core::{PyObject, Value};
use std::hash::BuildHasher;

/// Reads one named attribute. Absent attributes read as `Value::None`.
pub trait AttributeSource {
    fn read_attribute(&self, name: &str) -> Value;
}

impl AttributeSource for dyn PyObject + '_ {
    fn read_attribute(&self, name: &str) -> Value {
        self.get_attribute(name).unwrap_or_default()
    }
}

impl<S: BuildHasher> AttributeSource for HashMap<String, Value, S> {
    fn read_attribute(&self, name: &str) -> Value {
        self.get(name).cloned().unwrap_or_default()
    }
}
