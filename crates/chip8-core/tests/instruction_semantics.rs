//! Per-instruction behavior driven through whole-machine ticks.

#![allow(clippy::pedantic, clippy::nursery)]

use chip8_core::{
    glyph, Chip8, FaultCode, Keypad, MachineConfig, Quirks, Register, StepOutcome, FONT_START,
    PROGRAM_START,
};
use env_logger as _;
use log as _;
use proptest as _;
use rand as _;
use rstest::rstest;
#[cfg(feature = "serde")]
use serde as _;
use thiserror as _;

fn rom(words: &[u16]) -> Vec<u8> {
    words.iter().flat_map(|word| word.to_be_bytes()).collect()
}

fn machine(words: &[u16]) -> Chip8 {
    machine_with(words, Quirks::default())
}

fn machine_with(words: &[u16], quirks: Quirks) -> Chip8 {
    let config = MachineConfig {
        quirks,
        rng_seed: Some(0x5EED),
        ..MachineConfig::default()
    };
    Chip8::new(&rom(words), config).expect("test rom fits")
}

fn run(chip8: &mut Chip8, ticks: usize) {
    let keys = Keypad::new();
    for _ in 0..ticks {
        chip8.cpu_tick(&keys);
    }
}

#[test]
fn jump_moves_pc_to_target() {
    let mut chip8 = machine(&[0x1456]);
    run(&mut chip8, 1);
    assert_eq!(chip8.registers().pc(), 0x456);
}

#[test]
fn call_pushes_return_address_and_return_pops_it() {
    // 0x200: CALL 0x206; 0x202: LD V1, 1; 0x204: JP 0x204; 0x206: RET
    let mut chip8 = machine(&[0x2206, 0x6101, 0x1204, 0x00EE]);

    run(&mut chip8, 1);
    assert_eq!(chip8.registers().pc(), 0x206);
    assert_eq!(chip8.state().stack.frames(), &[0x202]);

    run(&mut chip8, 1);
    assert_eq!(chip8.registers().pc(), 0x202);
    assert!(chip8.state().stack.is_empty());

    run(&mut chip8, 1);
    assert_eq!(chip8.registers().v(Register::V1), 1);
}

#[test]
fn return_on_empty_stack_is_reported_and_skipped() {
    let mut chip8 = machine(&[0x00EE, 0x6007]);
    let keys = Keypad::new();

    let report = chip8.cpu_tick(&keys).fault().expect("empty stack");
    assert_eq!(report.code, FaultCode::StackUnderflow);
    assert_eq!(report.pc, PROGRAM_START);
    assert_eq!(chip8.registers().pc(), PROGRAM_START + 2);

    chip8.cpu_tick(&keys);
    assert_eq!(chip8.registers().v(Register::V0), 7);
}

#[rstest]
#[case::se_immediate_equal(&[0x6005, 0x3005], 4)]
#[case::se_immediate_differs(&[0x6005, 0x3006], 2)]
#[case::sne_immediate_differs(&[0x6005, 0x4006], 4)]
#[case::sne_immediate_equal(&[0x6005, 0x4005], 2)]
#[case::se_register_equal(&[0x6005, 0x6105, 0x5010], 4)]
#[case::se_register_differs(&[0x6005, 0x6106, 0x5010], 2)]
#[case::sne_register_differs(&[0x6005, 0x6106, 0x9010], 4)]
#[case::sne_register_equal(&[0x6005, 0x6105, 0x9010], 2)]
fn skip_family_advances_by_four_or_two(#[case] words: &[u16], #[case] advance: u16) {
    let mut chip8 = machine(words);
    run(&mut chip8, words.len() - 1);
    let before = chip8.registers().pc();
    run(&mut chip8, 1);
    assert_eq!(chip8.registers().pc(), before + advance);
}

#[rstest]
#[case::pressed_skp(0xE09E, &[0x4], 4)]
#[case::released_skp(0xE09E, &[], 2)]
#[case::pressed_sknp(0xE0A1, &[0x4], 2)]
#[case::released_sknp(0xE0A1, &[], 4)]
fn key_skips_use_the_tick_snapshot(
    #[case] opcode: u16,
    #[case] pressed: &[u8],
    #[case] advance: u16,
) {
    let mut chip8 = machine(&[0x6004, opcode]);
    run(&mut chip8, 1);
    chip8.cpu_tick(&Keypad::with_pressed(pressed));
    assert_eq!(chip8.registers().pc(), PROGRAM_START + 2 + advance);
}

#[rstest]
#[case::add_no_carry(0x8014, 0x10, 0x20, 0x30, 0)]
#[case::add_carry(0x8014, 0xF0, 0x20, 0x10, 1)]
#[case::sub_no_borrow(0x8015, 0x30, 0x10, 0x20, 1)]
#[case::sub_borrow(0x8015, 0x10, 0x30, 0xE0, 0)]
#[case::subn_no_borrow(0x8017, 0x10, 0x30, 0x20, 1)]
#[case::subn_borrow(0x8017, 0x30, 0x10, 0xE0, 0)]
#[case::or(0x8011, 0xF0, 0x0F, 0xFF, 0)]
#[case::and(0x8012, 0xF0, 0x3C, 0x30, 0)]
#[case::xor(0x8013, 0xFF, 0x0F, 0xF0, 0)]
fn alu_writes_result_then_flag(
    #[case] opcode: u16,
    #[case] v0: u8,
    #[case] v1: u8,
    #[case] result: u8,
    #[case] flag: u8,
) {
    let mut chip8 = machine(&[
        0x6000 | u16::from(v0),
        0x6100 | u16::from(v1),
        0x6F55,
        opcode,
    ]);
    run(&mut chip8, 4);
    assert_eq!(chip8.registers().v(Register::V0), result);
    assert_eq!(chip8.registers().flag(), flag);
}

#[test]
fn add_immediate_wraps_without_touching_flag() {
    let mut chip8 = machine(&[0x60FF, 0x6F09, 0x7002]);
    run(&mut chip8, 3);
    assert_eq!(chip8.registers().v(Register::V0), 0x01);
    assert_eq!(chip8.registers().flag(), 0x09);
}

#[test]
fn legacy_shift_reads_vy() {
    let legacy = Quirks {
        shift_in_place: false,
        ..Quirks::default()
    };
    let mut chip8 = machine_with(&[0x6001, 0x6181, 0x8016], legacy);
    run(&mut chip8, 3);
    assert_eq!(chip8.registers().v(Register::V0), 0x40);
    assert_eq!(chip8.registers().flag(), 1);
}

#[test]
fn modern_shift_ignores_vy() {
    let modern = Quirks {
        shift_in_place: true,
        ..Quirks::default()
    };
    let mut chip8 = machine_with(&[0x6081, 0x6100, 0x801E], modern);
    run(&mut chip8, 3);
    assert_eq!(chip8.registers().v(Register::V0), 0x02);
    assert_eq!(chip8.registers().flag(), 1);
}

#[rstest]
#[case::legacy_uses_v0(Quirks::legacy(), 0x302)]
#[case::modern_uses_vx(Quirks::modern(), 0x320)]
fn jump_with_offset_honors_quirk(#[case] quirks: Quirks, #[case] target: u16) {
    let mut chip8 = machine_with(&[0x6002, 0x6320, 0xB300], quirks);
    run(&mut chip8, 3);
    assert_eq!(chip8.registers().pc(), target);
}

#[rstest]
#[case(0x0)]
#[case(0x7)]
#[case(0xF)]
fn font_character_points_at_glyph(#[case] digit: u8) {
    let mut chip8 = machine(&[0x6000 | u16::from(digit), 0xF029]);
    run(&mut chip8, 2);
    let index = chip8.registers().index();
    assert_eq!(index, FONT_START + 5 * u16::from(digit));
    assert_eq!(chip8.memory().read_range(index, 5), glyph(digit));
}

#[test]
fn glyph_zero_is_the_box() {
    let mut chip8 = machine(&[0x6000, 0xF029]);
    run(&mut chip8, 2);
    let index = chip8.registers().index();
    assert_eq!(
        chip8.memory().read_range(index, 5),
        vec![0xF0, 0x90, 0x90, 0x90, 0xF0]
    );
}

#[test]
fn bcd_stores_digits_at_index() {
    let mut chip8 = machine(&[0x609C, 0xA300, 0xF033]);
    run(&mut chip8, 3);
    assert_eq!(chip8.memory().read_range(0x300, 3), vec![1, 5, 6]);
}

#[test]
fn add_to_index_uses_full_width() {
    let mut chip8 = machine(&[0x6010, 0xAFF8, 0xF01E]);
    run(&mut chip8, 3);
    assert_eq!(chip8.registers().index(), 0x1008);
}

#[test]
fn timer_opcodes_copy_values() {
    let mut chip8 = machine(&[0x6033, 0xF015, 0xF018, 0xF107]);
    run(&mut chip8, 4);
    assert_eq!(chip8.timers().delay(), 0x33);
    assert_eq!(chip8.timers().sound(), 0x33);
    assert_eq!(chip8.registers().v(Register::V1), 0x33);
}

#[test]
fn random_respects_mask() {
    let mut chip8 = machine(&[0xC00F, 0xC100]);
    run(&mut chip8, 2);
    assert_eq!(chip8.registers().v(Register::V0) & 0xF0, 0);
    assert_eq!(chip8.registers().v(Register::V1), 0);
}

#[test]
fn clear_screen_blanks_every_pixel() {
    let mut chip8 = machine(&[0xA050, 0xD005, 0x00E0]);
    run(&mut chip8, 2);
    assert!(chip8.framebuffer().snapshot().lit_count() > 0);
    run(&mut chip8, 1);
    let frame = chip8.framebuffer().snapshot();
    assert!(frame.pixels().iter().all(|lit| !lit));
}

#[test]
fn draw_clips_at_the_bottom_right_corner() {
    // V0 = 62, V1 = 30, I = glyph 8, draw 5 rows
    let mut chip8 = machine(&[0x603E, 0x611E, 0xA078, 0xD015]);
    run(&mut chip8, 4);
    let frame = chip8.framebuffer().snapshot();
    assert!(frame.get(62, 30));
    assert!(frame.get(63, 30));
    assert!(frame.get(62, 31));
    assert!(!frame.get(63, 31));
    assert_eq!(frame.lit_count(), 3);
    assert!(!frame.get(0, 0));
}

#[test]
fn unknown_opcode_reports_address_and_word() {
    let mut chip8 = machine(&[0x6001, 0xF0FF]);
    let keys = Keypad::new();
    chip8.cpu_tick(&keys);
    match chip8.cpu_tick(&keys) {
        StepOutcome::Fault(report) => {
            assert_eq!(report.code, FaultCode::UnknownOpcode);
            assert_eq!(report.pc, PROGRAM_START + 2);
        }
        other => panic!("expected a fault, got {other:?}"),
    }
    assert_eq!(chip8.registers().pc(), PROGRAM_START + 4);
}
