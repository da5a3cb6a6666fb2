//! Address and digit helpers for instruction execution.

use crate::api::Quirks;
use crate::memory::ADDRESS_MASK;
use crate::state::{Register, RegisterFile};

/// Splits a byte into its hundreds, tens and ones digits.
#[must_use]
pub const fn bcd(value: u8) -> [u8; 3] {
    [value / 100, (value / 10) % 10, value % 10]
}

/// Register added to the `BNNN` target.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub const fn jump_offset_register(address: u16, quirks: Quirks) -> Register {
    if quirks.jump_offset_uses_vx {
        Register::from_nibble((address >> 8) as u8)
    } else {
        Register::V0
    }
}

/// Computes the 12-bit `BNNN` target.
#[must_use]
pub fn jump_offset_target(address: u16, registers: &RegisterFile, quirks: Quirks) -> u16 {
    let offset = registers.v(jump_offset_register(address, quirks));
    address.wrapping_add(u16::from(offset)) & ADDRESS_MASK
}
