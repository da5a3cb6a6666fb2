//! Fixed CHIP-8 address-space layout.

/// Size in bytes of the flat address space (4 KiB).
pub const MEMORY_BYTES: usize = 4096;
/// Mask applied to every data address so accesses stay inside memory.
pub const ADDRESS_MASK: u16 = 0x0FFF;
/// Inclusive start address of the built-in font glyphs.
pub const FONT_START: u16 = 0x050;
/// Bytes per font glyph.
pub const FONT_GLYPH_BYTES: u16 = 5;
/// Number of font glyphs (`0..=F`).
pub const FONT_GLYPH_COUNT: u16 = 16;
/// Exclusive end address of the built-in font glyphs.
pub const FONT_END: u16 = FONT_START + FONT_GLYPH_BYTES * FONT_GLYPH_COUNT;
/// Address programs are loaded at and execution starts from.
pub const PROGRAM_START: u16 = 0x200;
/// Largest ROM that fits between [`PROGRAM_START`] and the end of memory.
pub const MAX_ROM_BYTES: usize = MEMORY_BYTES - PROGRAM_START as usize;
/// A fetch at or past this address wraps the program counter to zero first.
pub const FETCH_WRAP_ADDRESS: u16 = 0x0FFF;

const _: () = assert_fixed_layout();

const fn assert_fixed_layout() {
    assert!(
        FONT_END <= PROGRAM_START,
        "font glyphs must end before program memory"
    );
    assert!(
        ADDRESS_MASK as usize + 1 == MEMORY_BYTES,
        "address mask must cover the whole address space"
    );
    assert!(
        FETCH_WRAP_ADDRESS as usize == MEMORY_BYTES - 1,
        "a full opcode needs two readable bytes"
    );
}

/// Returns the address of the glyph for the low nibble of `digit`.
#[must_use]
pub const fn glyph_address(digit: u8) -> u16 {
    FONT_START + FONT_GLYPH_BYTES * (digit & 0x0F) as u16
}
