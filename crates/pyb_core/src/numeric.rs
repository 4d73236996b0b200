//! Equality and hashing of floats against the other numeric kinds.
//!
//! Numbers that compare equal hash equal regardless of kind: an integral
//! float hashes like the int with the same value.

use crate::value::{NumericKind, Value, fast_hasher};
use num_bigint::BigInt;
use num_traits::ToPrimitive;
use std::hash::{BuildHasher, Hasher};

/// Result of a one-sided equality check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Equality {
    Equal,
    NotEqual,
    /// The operands are unrelated kinds; the caller should try the
    /// reflected comparison.
    NotComparable,
}

impl Equality {
    #[inline]
    pub fn from_bool(b: bool) -> Self {
        if b { Equality::Equal } else { Equality::NotEqual }
    }

    pub fn is_comparable(self) -> bool {
        self != Equality::NotComparable
    }

    /// Falls back to `reflected` when this side could not decide.
    pub fn or_reflected(self, reflected: impl FnOnce() -> Equality) -> Equality {
        match self {
            Equality::NotComparable => reflected(),
            decided => decided,
        }
    }

    /// Final answer once both sides have been tried: undecided means unequal.
    pub fn to_bool(self) -> bool {
        self == Equality::Equal
    }
}

pub fn float_eq(lhs: f64, other: &Value) -> Equality {
    match other.numeric_kind() {
        NumericKind::Bool(b) => Equality::from_bool(if b { lhs == 1.0 } else { lhs == 0.0 }),
        NumericKind::Int(i) => Equality::from_bool(lhs == i as f64),
        // Large ints lose precision here; accepted.
        NumericKind::BigInt(b) => Equality::from_bool(lhs == bigint_to_f64(b)),
        NumericKind::Float(f) => Equality::from_bool(lhs == f),
        NumericKind::Other => Equality::NotComparable,
    }
}

fn bigint_to_f64(b: &BigInt) -> f64 {
    b.to_f64().unwrap_or(f64::NAN)
}

pub fn float_hash(f: f64) -> i64 {
    if f % 1.0 == 0.0 {
        // Saturates outside the i64 range.
        return int_hash(f as i64);
    }
    let mut hasher = fast_hasher().build_hasher();
    hasher.write_u64(f.to_bits());
    hasher.finish() as i64
}

#[inline]
pub fn int_hash(i: i64) -> i64 {
    i
}

#[inline]
pub fn bool_hash(b: bool) -> i64 {
    int_hash(b as i64)
}

pub fn bigint_hash(b: &BigInt) -> i64 {
    match b.to_i64() {
        Some(i) => int_hash(i),
        None => {
            let mut hasher = fast_hasher().build_hasher();
            hasher.write(&b.to_signed_bytes_le());
            hasher.finish() as i64
        }
    }
}

/// Hash of any numeric value; `None` for non-numeric kinds.
pub fn numeric_hash(value: &Value) -> Option<i64> {
    match value.numeric_kind() {
        NumericKind::Bool(b) => Some(bool_hash(b)),
        NumericKind::Int(i) => Some(int_hash(i)),
        NumericKind::BigInt(b) => Some(bigint_hash(b)),
        NumericKind::Float(f) => Some(float_hash(f)),
        NumericKind::Other => None,
    }
}
