//! Packs a datetime object into the native `PyDateTime` data layout.
//!
//! Fields are packed into successive bytes, each unsigned and big-endian:
//!
//! ```text
//! byte offset
//!  0           year     2 bytes
//!  2           month    1 byte
//!  3           day      1 byte
//!  4           hour     1 byte
//!  5           minute   1 byte
//!  6           second   1 byte
//!  7           usecond  3 bytes
//! 10
//! ```
//!
//! Only the byte capacity of each slot is checked; calendar ranges are the
//! object model's business.

use crate::buffer::CByteArray;
use crate::coerce::cast_to_index;
use crate::config::{PackConfig, RangeCheck};
use crate::source::AttributeSource;
use pyb_core::{BridgeError, Result};
use std::ops::Deref;

pub const YEAR: &str = "_year";
pub const MONTH: &str = "_month";
pub const DAY: &str = "_day";
pub const HOUR: &str = "_hour";
pub const MINUTE: &str = "_minute";
pub const SECOND: &str = "_second";
pub const MICROSECOND: &str = "_microsecond";

pub const DATETIME_DATA_LEN: usize = 10;

const YEAR_BITS: u32 = 16;
const BYTE_BITS: u32 = 8;
const MICROSECOND_BITS: u32 = 24;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DateTimeFields {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    /// Only the low 24 bits are packed.
    pub microsecond: u32,
}

impl DateTimeFields {
    /// Reads and coerces each field on its own; the first failure aborts.
    pub fn read_from<S>(source: &S, config: &PackConfig) -> Result<Self>
    where
        S: AttributeSource + ?Sized,
    {
        Ok(Self {
            year: read_slot(source, YEAR, YEAR_BITS, config)? as u16,
            month: read_slot(source, MONTH, BYTE_BITS, config)? as u8,
            day: read_slot(source, DAY, BYTE_BITS, config)? as u8,
            hour: read_slot(source, HOUR, BYTE_BITS, config)? as u8,
            minute: read_slot(source, MINUTE, BYTE_BITS, config)? as u8,
            second: read_slot(source, SECOND, BYTE_BITS, config)? as u8,
            microsecond: read_slot(source, MICROSECOND, MICROSECOND_BITS, config)? as u32,
        })
    }

    pub fn pack(&self) -> DateTimeData {
        let [year_hi, year_lo] = self.year.to_be_bytes();
        let [_, usec_hi, usec_mid, usec_lo] = self.microsecond.to_be_bytes();
        DateTimeData([
            year_hi,
            year_lo,
            self.month,
            self.day,
            self.hour,
            self.minute,
            self.second,
            usec_hi,
            usec_mid,
            usec_lo,
        ])
    }
}

/// Reads the seven datetime fields off `source` and packs them.
pub fn pack_datetime<S>(source: &S, config: &PackConfig) -> Result<DateTimeData>
where
    S: AttributeSource + ?Sized,
{
    let data = DateTimeFields::read_from(source, config)?.pack();
    tracing::trace!(bytes = ?data.as_bytes(), "packed datetime");
    Ok(data)
}

fn read_slot<S>(source: &S, field: &'static str, bits: u32, config: &PackConfig) -> Result<i64>
where
    S: AttributeSource + ?Sized,
{
    let value = cast_to_index(&source.read_attribute(field))?;
    fit_slot(field, value, bits, config.range_check)
}

fn fit_slot(field: &'static str, value: i64, bits: u32, policy: RangeCheck) -> Result<i64> {
    let max = (1i64 << bits) - 1;
    let in_range = (0..=max).contains(&value);
    match policy {
        RangeCheck::DebugAssert => {
            debug_assert!(in_range, "{field} = {value} does not fit in {bits} bits");
            #[cfg(not(debug_assertions))]
            if !in_range {
                tracing::warn!(field, value, bits, "truncating out-of-range datetime field");
            }
            Ok(value & max)
        }
        RangeCheck::Strict if !in_range => Err(BridgeError::RangeViolation { field, value, max }),
        RangeCheck::Strict => Ok(value),
        RangeCheck::Truncate => {
            if !in_range {
                tracing::warn!(field, value, bits, "truncating out-of-range datetime field");
            }
            Ok(value & max)
        }
    }
}

/// The packed 10-byte datetime layout. Immutable once built.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DateTimeData([u8; DATETIME_DATA_LEN]);

impl DateTimeData {
    pub fn from_bytes(bytes: [u8; DATETIME_DATA_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; DATETIME_DATA_LEN] {
        &self.0
    }

    pub fn into_bytes(self) -> [u8; DATETIME_DATA_LEN] {
        self.0
    }

    pub fn decode(&self) -> DateTimeFields {
        let b = &self.0;
        DateTimeFields {
            year: u16::from_be_bytes([b[0], b[1]]),
            month: b[2],
            day: b[3],
            hour: b[4],
            minute: b[5],
            second: b[6],
            microsecond: u32::from_be_bytes([0, b[7], b[8], b[9]]),
        }
    }

    /// Hands the bytes over to native code.
    pub fn into_c_bytes(self) -> CByteArray {
        CByteArray::from_boxed(Box::new(self.0))
    }
}

impl Deref for DateTimeData {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_keeps_low_bits() {
        assert_eq!(fit_slot(MONTH, 0x1ff, BYTE_BITS, RangeCheck::Truncate), Ok(0xff));
        assert_eq!(fit_slot(MONTH, -1, BYTE_BITS, RangeCheck::Truncate), Ok(0xff));
    }

    #[cfg(not(debug_assertions))]
    #[test]
    fn default_policy_truncates_in_release_builds() {
        assert_eq!(fit_slot(SECOND, 0x13c, BYTE_BITS, RangeCheck::DebugAssert), Ok(0x3c));
    }

    #[test]
    fn strict_reports_slot_maximum() {
        assert_eq!(
            fit_slot(YEAR, 70000, YEAR_BITS, RangeCheck::Strict),
            Err(BridgeError::RangeViolation {
                field: YEAR,
                value: 70000,
                max: 0xffff
            })
        );
        assert_eq!(fit_slot(MICROSECOND, 0xff_ffff, MICROSECOND_BITS, RangeCheck::Strict), Ok(0xff_ffff));
    }
}
