//! Managed value representation seen by the bridge.

use crate::capabilities::PyObject;
use crate::text::PyStr;
use ahash::RandomState;
use num_bigint::BigInt;
use std::fmt;
use std::sync::Arc;

/// Fixed-seed hasher so string and float hashes are stable across runs.
pub fn fast_hasher() -> RandomState {
    RandomState::with_seeds(0, 0, 0, 0)
}

#[derive(Clone)]
pub enum Value {
    None,
    Bool(bool),
    Int(i64),
    BigInt(Arc<BigInt>),
    Float(f64),
    Str(PyStr),
    Object(Arc<dyn PyObject>),
}

/// Projection of a value onto the numeric kinds the equality protocol knows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumericKind<'a> {
    Bool(bool),
    Int(i64),
    BigInt(&'a BigInt),
    Float(f64),
    Other,
}

impl Default for Value {
    fn default() -> Self {
        Value::None
    }
}

impl Value {
    #[inline]
    pub fn from_i64(i: i64) -> Self {
        Value::Int(i)
    }

    #[inline]
    pub fn from_f64(f: f64) -> Self {
        Value::Float(f)
    }

    #[inline]
    pub fn from_bool(b: bool) -> Self {
        Value::Bool(b)
    }

    pub fn from_str(s: &str) -> Self {
        Value::Str(PyStr::from_str(s))
    }

    pub fn from_bigint(b: BigInt) -> Self {
        Value::BigInt(Arc::new(b))
    }

    pub fn object(obj: impl PyObject + 'static) -> Self {
        Value::Object(Arc::new(obj))
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    pub fn numeric_kind(&self) -> NumericKind<'_> {
        match self {
            Value::Bool(b) => NumericKind::Bool(*b),
            Value::Int(i) => NumericKind::Int(*i),
            Value::BigInt(b) => NumericKind::BigInt(b),
            Value::Float(f) => NumericKind::Float(*f),
            Value::None | Value::Str(_) | Value::Object(_) => NumericKind::Other,
        }
    }

    pub fn type_name(&self) -> &str {
        match self {
            Value::None => "NoneType",
            Value::Bool(_) => "bool",
            Value::Int(_) | Value::BigInt(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "str",
            Value::Object(obj) => obj.type_name(),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::None => write!(f, "None"),
            Value::Bool(b) => write!(f, "Bool({})", b),
            Value::Int(i) => write!(f, "Int({})", i),
            Value::BigInt(b) => write!(f, "BigInt({})", b),
            Value::Float(x) => write!(f, "Float({})", x),
            Value::Str(s) => write!(f, "Str({:?})", s),
            Value::Object(obj) => write!(f, "Object(<{}>)", obj.type_name()),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<BigInt> for Value {
    fn from(value: BigInt) -> Self {
        Value::from_bigint(value)
    }
}

impl From<PyStr> for Value {
    fn from(value: PyStr) -> Self {
        Value::Str(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::from_str(value)
    }
}
