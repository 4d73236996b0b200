//! Native member lookup: maps the member keys native code asks for onto
//! the producers that build them.

use crate::buffer::CByteArray;
use crate::config::PackConfig;
use crate::datetime::pack_datetime;
use crate::source::AttributeSource;
use phf::phf_map;
use pyb_core::Result;

pub const DATETIME_DATA: &str = "data";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NativeMember {
    DateTimeData,
}

static NATIVE_MEMBERS: phf::Map<&'static str, NativeMember> = phf_map! {
    "data" => NativeMember::DateTimeData,
};

impl NativeMember {
    /// `None` for keys this layer does not produce; the caller rejects them.
    pub fn lookup(key: &str) -> Option<Self> {
        let member = NATIVE_MEMBERS.get(key).copied();
        if member.is_none() {
            tracing::debug!(key, "unknown native member");
        }
        member
    }

    pub fn key(self) -> &'static str {
        match self {
            NativeMember::DateTimeData => DATETIME_DATA,
        }
    }
}

/// Builds the native representation of `member` for `source`.
pub fn read_native_member<S>(source: &S, member: NativeMember, config: &PackConfig) -> Result<CByteArray>
where
    S: AttributeSource + ?Sized,
{
    match member {
        NativeMember::DateTimeData => Ok(pack_datetime(source, config)?.into_c_bytes()),
    }
}
