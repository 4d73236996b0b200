//! Native-extension side of pybridge.
//!
//! Turns managed objects into the fixed binary layouts native code reads.

pub mod buffer;
pub mod coerce;
pub mod config;
pub mod datetime;
pub mod member;
pub mod source;

pub use buffer::CByteArray;
pub use coerce::cast_to_index;
pub use config::{PackConfig, RangeCheck};
pub use datetime::{DateTimeData, DateTimeFields, pack_datetime};
pub use member::{NativeMember, read_native_member};
pub use source::AttributeSource;
