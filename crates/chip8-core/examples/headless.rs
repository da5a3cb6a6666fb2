//! Runs a ROM without threads and prints the final frame.
//!
//! ```text
//! cargo run --example headless -- [rom-path] [cpu-ticks]
//! ```
//!
//! Without a path, a small built-in program draws the digits 0-7.

use std::env;
use std::error::Error;
use std::fs;

use chip8_core::{Chip8, Keypad, MachineConfig, TIMER_HZ};
use log::info;
use proptest as _;
use rand as _;
use rstest as _;
#[cfg(feature = "serde")]
use serde as _;
use thiserror as _;

const DEFAULT_TICKS: u64 = 2_000;

/// Draws glyphs 0-7 across the top row, then spins.
const DEMO: [u16; 9] = [
    0x6000, // LD V0, 0       digit
    0x6100, // LD V1, 0       x
    0x6202, // LD V2, 2       y
    0xF029, // LD F, V0
    0xD125, // DRW V1, V2, 5
    0x7001, // ADD V0, 1
    0x7106, // ADD V1, 6
    0x3008, // SE V0, 8
    0x1206, // JP 0x206
];

fn demo_rom() -> Vec<u8> {
    let mut rom: Vec<u8> = DEMO.iter().flat_map(|word| word.to_be_bytes()).collect();
    // 0x212: JP 0x212
    rom.extend_from_slice(&[0x12, 0x12]);
    rom
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let mut args = env::args().skip(1);
    let rom = match args.next() {
        Some(path) => fs::read(&path)?,
        None => demo_rom(),
    };
    let ticks = match args.next() {
        Some(raw) => raw.parse()?,
        None => DEFAULT_TICKS,
    };

    let config = MachineConfig {
        rng_seed: Some(0xC8),
        ..MachineConfig::default()
    };
    let cpu_per_timer = u64::from((config.cpu_hz / TIMER_HZ).max(1));
    let mut chip8 = Chip8::new(&rom, config)?;
    let keys = Keypad::new();

    for tick in 1..=ticks {
        chip8.cpu_tick(&keys);
        if tick % cpu_per_timer == 0 {
            chip8.timer_tick();
        }
    }

    let diag = chip8.diagnostics();
    info!(
        "ran {} instructions, {} faults, {} timer ticks",
        diag.instruction_count,
        diag.fault_count(),
        diag.timer_ticks
    );
    print!("{}", chip8.framebuffer().snapshot());
    Ok(())
}
