#![allow(dead_code)]

use hashbrown::HashMap;
use pyb_core::{PyObject, Value};

/// A datetime object whose fields live in an attribute map.
pub struct DateTimeObject {
    pub attrs: HashMap<String, Value>,
}

impl DateTimeObject {
    pub fn new(fields: [i64; 7]) -> Self {
        let names = ["_year", "_month", "_day", "_hour", "_minute", "_second", "_microsecond"];
        let attrs = names
            .iter()
            .zip(fields)
            .map(|(name, v)| (name.to_string(), Value::from_i64(v)))
            .collect();
        Self { attrs }
    }

    pub fn with(mut self, name: &str, value: Value) -> Self {
        self.attrs.insert(name.to_string(), value);
        self
    }
}

impl PyObject for DateTimeObject {
    fn type_name(&self) -> &str {
        "datetime"
    }

    fn get_attribute(&self, name: &str) -> Option<Value> {
        self.attrs.get(name).cloned()
    }
}

/// An object implementing `__index__`.
pub struct Indexable(pub Value);

impl PyObject for Indexable {
    fn type_name(&self) -> &str {
        "Indexable"
    }

    fn index(&self) -> Option<Value> {
        Some(self.0.clone())
    }
}
