//! Opcode decoder.
//!
//! Every 16-bit word decodes to exactly one [`Instruction`]. Words that match
//! no known pattern become [`Instruction::Unknown`] and fault when executed,
//! so decoding itself never fails.

use std::fmt;

use crate::state::Register;

/// Decoded operation with its operand fields extracted.
///
/// `x` and `y` name the registers in the second and third nibble; `value`,
/// `mask` and `address` carry the immediate operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[allow(missing_docs)]
pub enum Instruction {
    /// `00E0`: turn every pixel off.
    ClearScreen,
    /// `00EE`: pop the return address.
    Return,
    /// `1NNN`: jump to `NNN`.
    Jump(u16),
    /// `2NNN`: push the return address and jump to `NNN`.
    Call(u16),
    /// `3XNN`: skip when `VX == NN`.
    SkipIfEqualImmediate { x: Register, value: u8 },
    /// `4XNN`: skip when `VX != NN`.
    SkipIfNotEqualImmediate { x: Register, value: u8 },
    /// `5XY_`: skip when `VX == VY`.
    SkipIfEqualRegister { x: Register, y: Register },
    /// `9XY_`: skip when `VX != VY`.
    SkipIfNotEqualRegister { x: Register, y: Register },
    /// `6XNN`: `VX = NN`.
    SetImmediate { x: Register, value: u8 },
    /// `7XNN`: `VX += NN` without touching the flag.
    AddImmediate { x: Register, value: u8 },
    /// `8XY0`: `VX = VY`.
    Copy { x: Register, y: Register },
    /// `8XY1`: `VX |= VY`.
    Or { x: Register, y: Register },
    /// `8XY2`: `VX &= VY`.
    And { x: Register, y: Register },
    /// `8XY3`: `VX ^= VY`.
    Xor { x: Register, y: Register },
    /// `8XY4`: `VX += VY` with carry.
    Add { x: Register, y: Register },
    /// `8XY5`: `VX -= VY` with no-borrow flag.
    Sub { x: Register, y: Register },
    /// `8XY6`: shift right one bit.
    ShiftRight { x: Register, y: Register },
    /// `8XY7`: `VX = VY - VX` with no-borrow flag.
    SubReverse { x: Register, y: Register },
    /// `8XYE`: shift left one bit.
    ShiftLeft { x: Register, y: Register },
    /// `ANNN`: `I = NNN`.
    SetIndex(u16),
    /// `BNNN`: jump to `NNN` plus `V0` (legacy) or `VX`, where X is the high
    /// nibble of `NNN`.
    JumpWithOffset { address: u16 },
    /// `CXNN`: `VX = random & NN`.
    Random { x: Register, mask: u8 },
    /// `DXYN`: draw `N` sprite rows from `I` at `(VX, VY)`.
    Draw { x: Register, y: Register, height: u8 },
    /// `EX9E`: skip when key `VX` is pressed.
    SkipIfKeyPressed { x: Register },
    /// `EXA1`: skip when key `VX` is not pressed.
    SkipIfKeyNotPressed { x: Register },
    /// `FX07`: `VX = delay`.
    ReadDelayTimer { x: Register },
    /// `FX0A`: block until a key is pressed and released.
    WaitForKey { x: Register },
    /// `FX15`: `delay = VX`.
    SetDelayTimer { x: Register },
    /// `FX18`: `sound = VX`.
    SetSoundTimer { x: Register },
    /// `FX1E`: `I += VX`.
    AddToIndex { x: Register },
    /// `FX29`: point `I` at the glyph for the low nibble of `VX`.
    FontCharacter { x: Register },
    /// `FX33`: store the decimal digits of `VX` at `I..I+3`.
    StoreBcd { x: Register },
    /// `FX55`: store `V0..=VX` to memory.
    StoreRegisters { x: Register },
    /// `FX65`: load `V0..=VX` from memory.
    LoadRegisters { x: Register },
    /// Word that matches no pattern.
    Unknown(u16),
}

impl Instruction {
    /// Returns `true` for words the decoder could not classify.
    #[must_use]
    pub const fn is_unknown(self) -> bool {
        matches!(self, Self::Unknown(_))
    }
}

/// Opcode field extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Fields {
    x: Register,
    y: Register,
    n: u8,
    nn: u8,
    nnn: u16,
}

impl Fields {
    #[allow(clippy::cast_possible_truncation)]
    const fn of(word: u16) -> Self {
        Self {
            x: Register::from_nibble((word >> 8) as u8),
            y: Register::from_nibble((word >> 4) as u8),
            n: (word & 0x000F) as u8,
            nn: (word & 0x00FF) as u8,
            nnn: word & 0x0FFF,
        }
    }
}

/// Stateless opcode decoder.
pub struct Decoder;

impl Decoder {
    /// Decodes a big-endian opcode word.
    #[must_use]
    pub const fn decode(word: u16) -> Instruction {
        let Fields { x, y, n, nn, nnn } = Fields::of(word);

        match word >> 12 {
            0x0 => match word {
                0x00E0 => Instruction::ClearScreen,
                0x00EE => Instruction::Return,
                _ => Instruction::Unknown(word),
            },
            0x1 => Instruction::Jump(nnn),
            0x2 => Instruction::Call(nnn),
            0x3 => Instruction::SkipIfEqualImmediate { x, value: nn },
            0x4 => Instruction::SkipIfNotEqualImmediate { x, value: nn },
            0x5 => Instruction::SkipIfEqualRegister { x, y },
            0x6 => Instruction::SetImmediate { x, value: nn },
            0x7 => Instruction::AddImmediate { x, value: nn },
            0x8 => Self::decode_alu(word, x, y, n),
            0x9 => Instruction::SkipIfNotEqualRegister { x, y },
            0xA => Instruction::SetIndex(nnn),
            0xB => Instruction::JumpWithOffset { address: nnn },
            0xC => Instruction::Random { x, mask: nn },
            0xD => Instruction::Draw { x, y, height: n },
            0xE => match nn {
                0x9E => Instruction::SkipIfKeyPressed { x },
                0xA1 => Instruction::SkipIfKeyNotPressed { x },
                _ => Instruction::Unknown(word),
            },
            _ => Self::decode_misc(word, x, nn),
        }
    }

    const fn decode_alu(word: u16, x: Register, y: Register, n: u8) -> Instruction {
        match n {
            0x0 => Instruction::Copy { x, y },
            0x1 => Instruction::Or { x, y },
            0x2 => Instruction::And { x, y },
            0x3 => Instruction::Xor { x, y },
            0x4 => Instruction::Add { x, y },
            0x5 => Instruction::Sub { x, y },
            0x6 => Instruction::ShiftRight { x, y },
            0x7 => Instruction::SubReverse { x, y },
            0xE => Instruction::ShiftLeft { x, y },
            _ => Instruction::Unknown(word),
        }
    }

    const fn decode_misc(word: u16, x: Register, nn: u8) -> Instruction {
        match nn {
            0x07 => Instruction::ReadDelayTimer { x },
            0x0A => Instruction::WaitForKey { x },
            0x15 => Instruction::SetDelayTimer { x },
            0x18 => Instruction::SetSoundTimer { x },
            0x1E => Instruction::AddToIndex { x },
            0x29 => Instruction::FontCharacter { x },
            0x33 => Instruction::StoreBcd { x },
            0x55 => Instruction::StoreRegisters { x },
            0x65 => Instruction::LoadRegisters { x },
            _ => Instruction::Unknown(word),
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::ClearScreen => write!(f, "CLS"),
            Self::Return => write!(f, "RET"),
            Self::Jump(addr) => write!(f, "JP {addr:#05X}"),
            Self::Call(addr) => write!(f, "CALL {addr:#05X}"),
            Self::SkipIfEqualImmediate { x, value } => write!(f, "SE {x:?}, {value:#04X}"),
            Self::SkipIfNotEqualImmediate { x, value } => write!(f, "SNE {x:?}, {value:#04X}"),
            Self::SkipIfEqualRegister { x, y } => write!(f, "SE {x:?}, {y:?}"),
            Self::SkipIfNotEqualRegister { x, y } => write!(f, "SNE {x:?}, {y:?}"),
            Self::SetImmediate { x, value } => write!(f, "LD {x:?}, {value:#04X}"),
            Self::AddImmediate { x, value } => write!(f, "ADD {x:?}, {value:#04X}"),
            Self::Copy { x, y } => write!(f, "LD {x:?}, {y:?}"),
            Self::Or { x, y } => write!(f, "OR {x:?}, {y:?}"),
            Self::And { x, y } => write!(f, "AND {x:?}, {y:?}"),
            Self::Xor { x, y } => write!(f, "XOR {x:?}, {y:?}"),
            Self::Add { x, y } => write!(f, "ADD {x:?}, {y:?}"),
            Self::Sub { x, y } => write!(f, "SUB {x:?}, {y:?}"),
            Self::ShiftRight { x, y } => write!(f, "SHR {x:?}, {y:?}"),
            Self::SubReverse { x, y } => write!(f, "SUBN {x:?}, {y:?}"),
            Self::ShiftLeft { x, y } => write!(f, "SHL {x:?}, {y:?}"),
            Self::SetIndex(addr) => write!(f, "LD I, {addr:#05X}"),
            Self::JumpWithOffset { address } => {
                // Offset register depends on the quirk; show both candidates.
                let vx = Register::from_nibble(address.to_be_bytes()[0]);
                write!(f, "JP V0/{vx:?}, {address:#05X}")
            }
            Self::Random { x, mask } => write!(f, "RND {x:?}, {mask:#04X}"),
            Self::Draw { x, y, height } => write!(f, "DRW {x:?}, {y:?}, {height}"),
            Self::SkipIfKeyPressed { x } => write!(f, "SKP {x:?}"),
            Self::SkipIfKeyNotPressed { x } => write!(f, "SKNP {x:?}"),
            Self::ReadDelayTimer { x } => write!(f, "LD {x:?}, DT"),
            Self::WaitForKey { x } => write!(f, "LD {x:?}, K"),
            Self::SetDelayTimer { x } => write!(f, "LD DT, {x:?}"),
            Self::SetSoundTimer { x } => write!(f, "LD ST, {x:?}"),
            Self::AddToIndex { x } => write!(f, "ADD I, {x:?}"),
            Self::FontCharacter { x } => write!(f, "LD F, {x:?}"),
            Self::StoreBcd { x } => write!(f, "LD B, {x:?}"),
            Self::StoreRegisters { x } => write!(f, "LD [I], {x:?}"),
            Self::LoadRegisters { x } => write!(f, "LD {x:?}, [I]"),
            Self::Unknown(word) => write!(f, "DATA {word:#06X}"),
        }
    }
}
