//! Register-to-register arithmetic for the `8XY_` family.

use super::FlagsUpdate;

/// `8XY_` operation selected by the low nibble.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AluOp {
    /// `VX = VY`.
    Copy,
    /// `VX |= VY`, `VF = 0`.
    Or,
    /// `VX &= VY`, `VF = 0`.
    And,
    /// `VX ^= VY`, `VF = 0`.
    Xor,
    /// `VX += VY`, `VF = carry`.
    Add,
    /// `VX -= VY`, `VF = VX >= VY`.
    Sub,
    /// `VX = VY - VX`, `VF = VY >= VX`.
    SubReverse,
    /// `VX = source >> 1`, `VF = shifted-out low bit`.
    ShiftRight,
    /// `VX = source << 1`, `VF = shifted-out high bit`.
    ShiftLeft,
}

/// Computes the new `VX` and the `VF` update for `op`.
///
/// For the shifts, `vx` is the value being shifted: the caller substitutes
/// `VY` when the legacy shift quirk is active.
#[must_use]
pub const fn compute(op: AluOp, vx: u8, vy: u8) -> (u8, FlagsUpdate) {
    match op {
        AluOp::Copy => (vy, FlagsUpdate::None),
        AluOp::Or => (vx | vy, FlagsUpdate::Clear),
        AluOp::And => (vx & vy, FlagsUpdate::Clear),
        AluOp::Xor => (vx ^ vy, FlagsUpdate::Clear),
        AluOp::Add => {
            let (sum, carry) = vx.overflowing_add(vy);
            (sum, FlagsUpdate::Set(carry))
        }
        AluOp::Sub => (vx.wrapping_sub(vy), FlagsUpdate::Set(vx >= vy)),
        AluOp::SubReverse => (vy.wrapping_sub(vx), FlagsUpdate::Set(vy >= vx)),
        AluOp::ShiftRight => (vx >> 1, FlagsUpdate::Set(vx & 0x01 != 0)),
        AluOp::ShiftLeft => (vx << 1, FlagsUpdate::Set(vx & 0x80 != 0)),
    }
}
