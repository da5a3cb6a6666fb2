#![no_main]

use chip8_core::{Chip8, Decoder, Keypad, MachineConfig, Quirks, MAX_ROM_BYTES};
use libfuzzer_sys::fuzz_target;

const CPU_TICKS: usize = 4_096;

fuzz_target!(|data: &[u8]| {
    if data.len() < 3 {
        return;
    }

    let quirk_bits = data[0];
    let keys = Keypad::with_pressed(&[data[1] & 0x0F, data[1] >> 4]);
    let rom = &data[2..data.len().min(MAX_ROM_BYTES + 2)];

    for pair in rom.chunks_exact(2) {
        let _ = Decoder::decode(u16::from_be_bytes([pair[0], pair[1]]));
    }

    let config = MachineConfig {
        quirks: Quirks {
            load_store_advances_index: quirk_bits & 0b001 != 0,
            shift_in_place: quirk_bits & 0b010 != 0,
            jump_offset_uses_vx: quirk_bits & 0b100 != 0,
        },
        rng_seed: Some(u64::from(quirk_bits)),
        ..MachineConfig::default()
    };
    let Ok(mut chip8) = Chip8::new(rom, config) else {
        return;
    };

    let idle = Keypad::new();
    for tick in 0..CPU_TICKS {
        let snapshot = if tick % 3 == 0 { &keys } else { &idle };
        chip8.cpu_tick(snapshot);
        if tick % 12 == 0 {
            let _ = chip8.timer_tick();
        }
    }
});
