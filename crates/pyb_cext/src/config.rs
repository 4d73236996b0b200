//! Packer configuration.

/// What to do when a coerced field does not fit its slot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RangeCheck {
    /// `debug_assert!` on each slot; release builds truncate.
    #[default]
    DebugAssert,
    /// Fail with `BridgeError::RangeViolation`.
    Strict,
    /// Keep the low bits of the value.
    Truncate,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct PackConfig {
    pub range_check: RangeCheck,
}

impl PackConfig {
    pub fn strict() -> Self {
        Self {
            range_check: RangeCheck::Strict,
        }
    }

    pub fn with_range_check(mut self, range_check: RangeCheck) -> Self {
        self.range_check = range_check;
        self
    }
}
