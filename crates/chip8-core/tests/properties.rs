//! Property coverage for arithmetic, drawing, register transfer and timers.

#![allow(clippy::pedantic, clippy::nursery)]

use chip8_core::{
    Chip8, FrameBuffer, Keypad, MachineConfig, Quirks, Register, DISPLAY_HEIGHT, DISPLAY_WIDTH,
};
use env_logger as _;
use log as _;
use proptest::prelude::*;
use rand as _;
use rstest as _;
#[cfg(feature = "serde")]
use serde as _;
use thiserror as _;

fn rom(words: &[u16]) -> Vec<u8> {
    words.iter().flat_map(|word| word.to_be_bytes()).collect()
}

fn run_words(words: &[u16], quirks: Quirks) -> Chip8 {
    let config = MachineConfig {
        quirks,
        rng_seed: Some(1),
        ..MachineConfig::default()
    };
    let mut chip8 = Chip8::new(&rom(words), config).expect("test rom fits");
    let keys = Keypad::new();
    for _ in words {
        chip8.cpu_tick(&keys);
    }
    chip8
}

fn load(x: u8, y: u8, opcode: u16) -> [u16; 3] {
    [0x6000 | u16::from(x), 0x6100 | u16::from(y), opcode]
}

proptest! {
    #[test]
    fn add_wraps_and_flags_carry(x in any::<u8>(), y in any::<u8>()) {
        let chip8 = run_words(&load(x, y, 0x8014), Quirks::default());
        let sum = u16::from(x) + u16::from(y);
        prop_assert_eq!(chip8.registers().v(Register::V0), x.wrapping_add(y));
        prop_assert_eq!(chip8.registers().flag(), u8::from(sum > 255));
    }

    #[test]
    fn sub_wraps_and_flags_no_borrow(x in any::<u8>(), y in any::<u8>()) {
        let chip8 = run_words(&load(x, y, 0x8015), Quirks::default());
        prop_assert_eq!(chip8.registers().v(Register::V0), x.wrapping_sub(y));
        prop_assert_eq!(chip8.registers().flag(), u8::from(x >= y));
    }

    #[test]
    fn reverse_sub_wraps_and_flags_no_borrow(x in any::<u8>(), y in any::<u8>()) {
        let chip8 = run_words(&load(x, y, 0x8017), Quirks::default());
        prop_assert_eq!(chip8.registers().v(Register::V0), y.wrapping_sub(x));
        prop_assert_eq!(chip8.registers().flag(), u8::from(y >= x));
    }

    #[test]
    fn shifts_flag_the_bit_shifted_out(value in any::<u8>()) {
        let right = run_words(&load(value, 0, 0x8006), Quirks::modern());
        prop_assert_eq!(right.registers().v(Register::V0), value >> 1);
        prop_assert_eq!(right.registers().flag(), value & 1);

        let left = run_words(&load(value, 0, 0x800E), Quirks::modern());
        prop_assert_eq!(left.registers().v(Register::V0), value << 1);
        prop_assert_eq!(left.registers().flag(), value >> 7);
    }

    #[test]
    fn drawing_twice_restores_the_framebuffer(
        x in any::<u8>(),
        y in any::<u8>(),
        rows in prop::collection::vec(any::<u8>(), 0..=15),
        seed_pixels in prop::collection::vec((0..DISPLAY_WIDTH, 0..DISPLAY_HEIGHT), 0..32),
    ) {
        let mut fb = FrameBuffer::default();
        for (px, py) in seed_pixels {
            fb.set(px, py, true);
        }
        let before = fb.snapshot();

        fb.draw_sprite(x, y, &rows);
        fb.draw_sprite(x, y, &rows);

        prop_assert_eq!(fb.snapshot(), before);
    }

    #[test]
    fn clear_turns_every_pixel_off(
        pixels in prop::collection::vec((0..DISPLAY_WIDTH, 0..DISPLAY_HEIGHT), 0..64),
    ) {
        let mut fb = FrameBuffer::default();
        for (px, py) in pixels {
            fb.set(px, py, true);
        }
        fb.clear();
        prop_assert_eq!(fb.snapshot().lit_count(), 0);
    }

    #[test]
    fn store_then_load_round_trips_in_both_memory_modes(
        values in prop::array::uniform16(any::<u8>()),
        last in 0u8..16,
        index in 0x300u16..0xF00,
        advances in any::<bool>(),
    ) {
        let quirks = Quirks {
            load_store_advances_index: advances,
            ..Quirks::default()
        };
        let config = MachineConfig { quirks, rng_seed: Some(1), ..MachineConfig::default() };
        let x = u16::from(last);
        let mut chip8 = Chip8::new(&rom(&[0xF055 | (x << 8), 0xF065 | (x << 8)]), config)
            .expect("test rom fits");
        for (reg, value) in Register::ALL.iter().zip(values) {
            chip8.state_mut().registers.set_v(*reg, value);
        }
        chip8.state_mut().registers.set_index(index);
        let keys = Keypad::new();

        chip8.cpu_tick(&keys);
        let expected_index = if advances { index + x + 1 } else { index };
        prop_assert_eq!(chip8.registers().index(), expected_index);

        for reg in Register::from_nibble(last).through() {
            chip8.state_mut().registers.set_v(reg, 0);
        }
        chip8.state_mut().registers.set_index(index);
        chip8.cpu_tick(&keys);

        for (reg, value) in Register::from_nibble(last).through().zip(values) {
            prop_assert_eq!(chip8.registers().v(reg), value);
        }
    }

    #[test]
    fn timers_reach_zero_and_stay_there(delay in any::<u8>(), sound in any::<u8>(), extra in 0usize..8) {
        let mut chip8 = Chip8::new(&[], MachineConfig::default()).expect("empty rom fits");
        chip8.state_mut().timers.set_delay(delay);
        chip8.state_mut().timers.set_sound(sound);

        let ticks = usize::from(delay.max(sound)) + extra;
        let mut tone_ticks = 0usize;
        for _ in 0..ticks {
            if chip8.timer_tick().tone {
                tone_ticks += 1;
            }
        }

        prop_assert_eq!(chip8.timers().delay(), 0);
        prop_assert_eq!(chip8.timers().sound(), 0);
        prop_assert_eq!(tone_ticks, usize::from(sound.saturating_sub(1)));
    }
}
