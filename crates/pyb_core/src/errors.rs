//! Error type shared by the value model and the native-extension layer.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, BridgeError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BridgeError {
    /// The value is not index-like (not an int, bool, or object whose
    /// `__index__` yields an int). `type_name` names the offending value.
    #[error("'{type_name}' object cannot be interpreted as an integer")]
    TypeCoercion { type_name: String },

    #[error("cannot fit '{type_name}' into an index-sized integer")]
    IndexOverflow { type_name: String },

    /// A coerced field does not fit its slot in a packed native layout.
    #[error("field {field} = {value} does not fit its slot (max {max})")]
    RangeViolation {
        field: &'static str,
        value: i64,
        max: i64,
    },

    #[error("Index out of range: {index} (length {len})")]
    IndexOutOfRange { index: usize, len: usize },
}

impl BridgeError {
    pub fn type_coercion(type_name: impl Into<String>) -> Self {
        BridgeError::TypeCoercion {
            type_name: type_name.into(),
        }
    }

    pub fn index_out_of_range(index: usize, len: usize) -> Self {
        BridgeError::IndexOutOfRange { index, len }
    }
}
