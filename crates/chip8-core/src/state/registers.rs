use crate::memory::{FETCH_WRAP_ADDRESS, PROGRAM_START};

/// Number of general-purpose registers (`V0..=VF`).
pub const REGISTER_COUNT: usize = 16;

/// General-purpose register identifier. `VF` doubles as the flag register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[repr(u8)]
#[allow(missing_docs)]
pub enum Register {
    V0 = 0x0,
    V1 = 0x1,
    V2 = 0x2,
    V3 = 0x3,
    V4 = 0x4,
    V5 = 0x5,
    V6 = 0x6,
    V7 = 0x7,
    V8 = 0x8,
    V9 = 0x9,
    VA = 0xA,
    VB = 0xB,
    VC = 0xC,
    VD = 0xD,
    VE = 0xE,
    VF = 0xF,
}

impl Register {
    /// Register written by carry, borrow, shift and collision results.
    pub const FLAG: Self = Self::VF;

    /// Ordered list of all registers.
    pub const ALL: [Self; REGISTER_COUNT] = [
        Self::V0,
        Self::V1,
        Self::V2,
        Self::V3,
        Self::V4,
        Self::V5,
        Self::V6,
        Self::V7,
        Self::V8,
        Self::V9,
        Self::VA,
        Self::VB,
        Self::VC,
        Self::VD,
        Self::VE,
        Self::VF,
    ];

    /// Returns the array index for this register (`0..=15`).
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Decodes the low nibble of `bits` into a register.
    #[must_use]
    pub const fn from_nibble(bits: u8) -> Self {
        Self::ALL[(bits & 0x0F) as usize]
    }

    /// Registers `V0..=self`, in order.
    pub fn through(self) -> impl Iterator<Item = Self> {
        Self::ALL.into_iter().take(self.index() + 1)
    }
}

/// Register file: `V0..=VF`, the index register `I`, and the program counter.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct RegisterFile {
    v: [u8; REGISTER_COUNT],
    index: u16,
    pc: u16,
}

impl Default for RegisterFile {
    fn default() -> Self {
        Self {
            v: [0; REGISTER_COUNT],
            index: 0,
            pc: PROGRAM_START,
        }
    }
}

impl RegisterFile {
    /// Reads a general-purpose register. Registers never written read as zero.
    #[must_use]
    pub const fn v(&self, reg: Register) -> u8 {
        self.v[reg.index()]
    }

    /// Writes a general-purpose register.
    pub fn set_v(&mut self, reg: Register, value: u8) {
        self.v[reg.index()] = value;
    }

    /// Reads `VF`.
    #[must_use]
    pub const fn flag(&self) -> u8 {
        self.v(Register::FLAG)
    }

    /// Writes `VF` as `0` or `1`.
    pub fn set_flag(&mut self, set: bool) {
        self.set_v(Register::FLAG, u8::from(set));
    }

    /// Returns all sixteen registers.
    #[must_use]
    pub const fn all(&self) -> &[u8; REGISTER_COUNT] {
        &self.v
    }

    /// Reads the index register `I`.
    #[must_use]
    pub const fn index(&self) -> u16 {
        self.index
    }

    /// Writes the index register `I`.
    pub fn set_index(&mut self, value: u16) {
        self.index = value;
    }

    /// Reads the program counter.
    #[must_use]
    pub const fn pc(&self) -> u16 {
        self.pc
    }

    /// Writes the program counter.
    pub fn set_pc(&mut self, value: u16) {
        self.pc = value;
    }

    /// Returns the address of the next opcode and advances past it.
    ///
    /// A program counter at or past [`FETCH_WRAP_ADDRESS`] wraps to zero
    /// before the fetch.
    pub fn fetch_pc(&mut self) -> u16 {
        if self.pc >= FETCH_WRAP_ADDRESS {
            self.pc = 0;
        }
        let pc = self.pc;
        self.pc = pc.wrapping_add(2);
        pc
    }

    /// Skips the next opcode.
    pub fn skip(&mut self) {
        self.pc = self.pc.wrapping_add(2);
    }

    /// Skips the next opcode when `condition` holds.
    pub fn skip_if(&mut self, condition: bool) {
        if condition {
            self.skip();
        }
    }

    /// Steps back one opcode so the current instruction runs again.
    pub fn rewind(&mut self) {
        self.pc = self.pc.wrapping_sub(2);
    }
}
