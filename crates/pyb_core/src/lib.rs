//! Core types for the pybridge value model.
//!
//! This crate contains the types shared by every consumer of the bridge:
//! - `Value` - Managed value representation
//! - `PyStr` - String value with direct, lazy and native backings
//! - `numeric` - Float equality/hash protocol across numeric kinds
//! - `PyObject`, `NativeCounterpart` - Host capability traits

#![allow(clippy::should_implement_trait)]

pub mod capabilities;
pub mod errors;
pub mod numeric;
pub mod text;
pub mod value;

pub use capabilities::{NativeCounterpart, PyObject};
pub use errors::{BridgeError, Result};
pub use numeric::{Equality, float_eq, float_hash};
pub use text::{Interner, PyStr};
pub use value::{NumericKind, Value};
