//! Byte-addressable 4 KiB memory with the font and program images.

/// Built-in font glyph table.
pub mod font;
/// Fixed address-space layout.
pub mod map;

pub use font::{glyph, FONT};
pub use map::{
    glyph_address, ADDRESS_MASK, FETCH_WRAP_ADDRESS, FONT_END, FONT_GLYPH_BYTES,
    FONT_GLYPH_COUNT, FONT_START, MAX_ROM_BYTES, MEMORY_BYTES, PROGRAM_START,
};

use crate::fault::ConfigError;

/// Rejects ROMs that do not fit in program memory.
///
/// # Errors
///
/// Returns [`ConfigError::RomTooLarge`] when `rom` is longer than
/// [`MAX_ROM_BYTES`].
pub const fn validate_rom(rom: &[u8]) -> Result<(), ConfigError> {
    if rom.len() > MAX_ROM_BYTES {
        return Err(ConfigError::RomTooLarge {
            len: rom.len(),
            max: MAX_ROM_BYTES,
        });
    }
    Ok(())
}

/// ROM image that is known to fit in program memory.
///
/// Deserialization goes through [`Program::new`], so a serialized ROM that is
/// too large is rejected rather than loaded.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(try_from = "Vec<u8>", into = "Vec<u8>"))]
pub struct Program {
    bytes: Box<[u8]>,
}

impl Program {
    /// Checks and copies a ROM image.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::RomTooLarge`] when `rom` is longer than
    /// [`MAX_ROM_BYTES`].
    pub fn new(rom: &[u8]) -> Result<Self, ConfigError> {
        validate_rom(rom)?;
        Ok(Self { bytes: rom.into() })
    }

    /// Raw program bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Program size in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns `true` for an empty ROM.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl TryFrom<&[u8]> for Program {
    type Error = ConfigError;

    fn try_from(rom: &[u8]) -> Result<Self, Self::Error> {
        Self::new(rom)
    }
}

impl TryFrom<Vec<u8>> for Program {
    type Error = ConfigError;

    fn try_from(rom: Vec<u8>) -> Result<Self, Self::Error> {
        validate_rom(&rom)?;
        Ok(Self {
            bytes: rom.into_boxed_slice(),
        })
    }
}

impl From<Program> for Vec<u8> {
    fn from(program: Program) -> Self {
        program.bytes.into_vec()
    }
}

/// Flat zero-initialised memory image.
///
/// Every access masks its address to 12 bits, so no address outside
/// `0x000..=0xFFF` is ever touched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Memory {
    bytes: Box<[u8]>,
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl Memory {
    /// Allocates a zeroed 4 KiB memory image.
    #[must_use]
    pub fn new() -> Self {
        Self {
            bytes: vec![0; MEMORY_BYTES].into_boxed_slice(),
        }
    }

    /// Reads one byte.
    #[must_use]
    pub fn read(&self, addr: u16) -> u8 {
        self.bytes[usize::from(addr & ADDRESS_MASK)]
    }

    /// Writes one byte.
    pub fn write(&mut self, addr: u16, value: u8) {
        self.bytes[usize::from(addr & ADDRESS_MASK)] = value;
    }

    /// Reads a big-endian opcode from `addr` and `addr + 1`.
    #[must_use]
    pub fn read_word(&self, addr: u16) -> u16 {
        u16::from_be_bytes([self.read(addr), self.read(addr.wrapping_add(1))])
    }

    /// Copies `len` bytes starting at `addr`, wrapping at the end of memory.
    #[must_use]
    pub fn read_range(&self, addr: u16, len: u16) -> Vec<u8> {
        (0..len)
            .map(|offset| self.read(addr.wrapping_add(offset)))
            .collect()
    }

    /// Returns the whole memory image.
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    /// Zeroes every byte.
    pub fn clear(&mut self) {
        self.bytes.fill(0);
    }

    /// Copies the built-in font to [`FONT_START`].
    pub fn load_font(&mut self) {
        let start = usize::from(FONT_START);
        self.bytes[start..start + FONT.len()].copy_from_slice(&FONT);
    }

    /// Copies a program to [`PROGRAM_START`].
    pub fn load_program(&mut self, program: &Program) {
        let start = usize::from(PROGRAM_START);
        self.bytes[start..start + program.len()].copy_from_slice(program.as_bytes());
    }
}
