//! Index coercion: turns an index-like managed value into a platform integer.

use num_traits::ToPrimitive;
use pyb_core::{BridgeError, Result, Value};

/// Accepts ints, bools and objects whose `__index__` yields an int.
pub fn cast_to_index(value: &Value) -> Result<i64> {
    match value {
        Value::Object(obj) => match obj.index() {
            // A hook returning a non-int is reported against the returned value.
            Some(inner) => index_of_int(&inner).ok_or_else(|| not_index_like(&inner))?,
            None => Err(not_index_like(value)),
        },
        other => index_of_int(other).ok_or_else(|| not_index_like(other))?,
    }
}

/// `None` if the value is not an int kind at all.
fn index_of_int(value: &Value) -> Option<Result<i64>> {
    match value {
        Value::Int(i) => Some(Ok(*i)),
        Value::Bool(b) => Some(Ok(*b as i64)),
        Value::BigInt(big) => Some(big.to_i64().ok_or_else(|| BridgeError::IndexOverflow {
            type_name: value.type_name().to_string(),
        })),
        _ => None,
    }
}

fn not_index_like(value: &Value) -> BridgeError {
    tracing::debug!(type_name = value.type_name(), "value is not index-like");
    BridgeError::type_coercion(value.type_name())
}
