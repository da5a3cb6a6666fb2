//! Fetch-decode-execute pipeline.
//!
//! One call to [`step_one`] fetches the opcode at the program counter,
//! advances past it, decodes it and applies its effect. Skips, jumps, calls
//! and returns overwrite the advanced program counter; `FX0A` rewinds it
//! while waiting so the same opcode runs again next tick.
//!
//! Faulting instructions leave no side effects beyond the fetch advance.

mod alu;
mod flags;
mod helpers;

pub use alu::{compute as compute_alu, AluOp};
pub use flags::FlagsUpdate;
pub use helpers::{bcd, jump_offset_register, jump_offset_target};

use rand::{Rng, RngCore};

use crate::api::{MachineState, Quirks, StepOutcome};
use crate::decoder::{Decoder, Instruction};
use crate::fault::{FaultCode, FaultReport};
use crate::keypad::Keypad;
use crate::memory::{glyph_address, ADDRESS_MASK};
use crate::state::{KeyWaitStep, Register};

/// Inputs an instruction may consult besides the machine state.
pub struct ExecuteContext<'a> {
    /// Keyboard snapshot taken at the start of this tick.
    pub keys: &'a Keypad,
    /// Opcode behavior switches.
    pub quirks: Quirks,
    /// Source for `CXNN`.
    pub rng: &'a mut dyn RngCore,
}

/// Outcome of executing a single decoded instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExecuteOutcome {
    /// Effect applied.
    Retired,
    /// `FX0A` has not completed; the program counter was rewound.
    AwaitingKey,
    /// Instruction skipped.
    Fault(FaultCode),
}

/// Applies one decoded instruction to `state`.
///
/// The program counter must already point past the opcode.
#[allow(clippy::too_many_lines)]
pub fn execute_instruction(
    instruction: Instruction,
    state: &mut MachineState,
    ctx: &mut ExecuteContext<'_>,
) -> ExecuteOutcome {
    let regs = &mut state.registers;

    match instruction {
        Instruction::ClearScreen => state.framebuffer.clear(),
        Instruction::Return => match state.stack.pop() {
            Ok(addr) => regs.set_pc(addr),
            Err(code) => return ExecuteOutcome::Fault(code),
        },
        Instruction::Jump(addr) => regs.set_pc(addr),
        Instruction::Call(addr) => {
            if let Err(code) = state.stack.push(regs.pc()) {
                return ExecuteOutcome::Fault(code);
            }
            regs.set_pc(addr);
        }
        Instruction::SkipIfEqualImmediate { x, value } => regs.skip_if(regs.v(x) == value),
        Instruction::SkipIfNotEqualImmediate { x, value } => regs.skip_if(regs.v(x) != value),
        Instruction::SkipIfEqualRegister { x, y } => regs.skip_if(regs.v(x) == regs.v(y)),
        Instruction::SkipIfNotEqualRegister { x, y } => regs.skip_if(regs.v(x) != regs.v(y)),
        Instruction::SetImmediate { x, value } => regs.set_v(x, value),
        Instruction::AddImmediate { x, value } => regs.set_v(x, regs.v(x).wrapping_add(value)),
        Instruction::Copy { x, y } => execute_alu(state, AluOp::Copy, x, y, ctx.quirks),
        Instruction::Or { x, y } => execute_alu(state, AluOp::Or, x, y, ctx.quirks),
        Instruction::And { x, y } => execute_alu(state, AluOp::And, x, y, ctx.quirks),
        Instruction::Xor { x, y } => execute_alu(state, AluOp::Xor, x, y, ctx.quirks),
        Instruction::Add { x, y } => execute_alu(state, AluOp::Add, x, y, ctx.quirks),
        Instruction::Sub { x, y } => execute_alu(state, AluOp::Sub, x, y, ctx.quirks),
        Instruction::ShiftRight { x, y } => {
            execute_alu(state, AluOp::ShiftRight, x, y, ctx.quirks);
        }
        Instruction::SubReverse { x, y } => {
            execute_alu(state, AluOp::SubReverse, x, y, ctx.quirks);
        }
        Instruction::ShiftLeft { x, y } => {
            execute_alu(state, AluOp::ShiftLeft, x, y, ctx.quirks);
        }
        Instruction::SetIndex(addr) => regs.set_index(addr),
        Instruction::JumpWithOffset { address } => {
            let target = jump_offset_target(address, regs, ctx.quirks);
            regs.set_pc(target);
        }
        Instruction::Random { x, mask } => {
            let byte: u8 = ctx.rng.gen();
            regs.set_v(x, byte & mask);
        }
        Instruction::Draw { x, y, height } => execute_draw(state, x, y, height),
        Instruction::SkipIfKeyPressed { x } => regs.skip_if(ctx.keys.is_pressed(regs.v(x))),
        Instruction::SkipIfKeyNotPressed { x } => {
            regs.skip_if(!ctx.keys.is_pressed(regs.v(x)));
        }
        Instruction::ReadDelayTimer { x } => regs.set_v(x, state.timers.delay()),
        Instruction::WaitForKey { x } => return execute_wait_for_key(state, x, ctx.keys),
        Instruction::SetDelayTimer { x } => state.timers.set_delay(regs.v(x)),
        Instruction::SetSoundTimer { x } => state.timers.set_sound(regs.v(x)),
        Instruction::AddToIndex { x } => {
            regs.set_index(regs.index().wrapping_add(u16::from(regs.v(x))));
        }
        Instruction::FontCharacter { x } => regs.set_index(glyph_address(regs.v(x))),
        Instruction::StoreBcd { x } => {
            let base = regs.index();
            for (offset, digit) in (0u16..).zip(bcd(regs.v(x))) {
                state.memory.write(base.wrapping_add(offset), digit);
            }
        }
        Instruction::StoreRegisters { x } => {
            let base = regs.index();
            for (offset, reg) in (0u16..).zip(x.through()) {
                state.memory.write(base.wrapping_add(offset), regs.v(reg));
            }
            advance_index_after_transfer(state, x, ctx.quirks);
        }
        Instruction::LoadRegisters { x } => {
            let base = regs.index();
            for (offset, reg) in (0u16..).zip(x.through()) {
                let value = state.memory.read(base.wrapping_add(offset));
                regs.set_v(reg, value);
            }
            advance_index_after_transfer(state, x, ctx.quirks);
        }
        Instruction::Unknown(_) => return ExecuteOutcome::Fault(FaultCode::UnknownOpcode),
    }

    ExecuteOutcome::Retired
}

/// Runs one fetch-decode-execute cycle.
///
/// Faults are returned as reports; the machine is always left ready to run
/// the next instruction.
pub fn step_one(state: &mut MachineState, ctx: &mut ExecuteContext<'_>) -> StepOutcome {
    let pc = state.registers.fetch_pc();
    let opcode = state.memory.read_word(pc);
    let instruction = Decoder::decode(opcode);

    match execute_instruction(instruction, state, ctx) {
        ExecuteOutcome::Retired => StepOutcome::Retired { pc, instruction },
        ExecuteOutcome::AwaitingKey => StepOutcome::AwaitingKey { pc },
        ExecuteOutcome::Fault(code) => StepOutcome::Fault(FaultReport { code, pc, opcode }),
    }
}

fn execute_alu(state: &mut MachineState, op: AluOp, x: Register, y: Register, quirks: Quirks) {
    let regs = &mut state.registers;
    let is_shift = matches!(op, AluOp::ShiftRight | AluOp::ShiftLeft);
    let source = if is_shift && !quirks.shift_in_place {
        regs.v(y)
    } else {
        regs.v(x)
    };

    let (result, flags) = compute_alu(op, source, regs.v(y));
    regs.set_v(x, result);
    flags.apply(regs);
}

fn execute_draw(state: &mut MachineState, x: Register, y: Register, height: u8) {
    let regs = &mut state.registers;
    let rows = state
        .memory
        .read_range(regs.index() & ADDRESS_MASK, u16::from(height));
    let collision = state.framebuffer.draw_sprite(regs.v(x), regs.v(y), &rows);
    regs.set_flag(collision);
}

fn execute_wait_for_key(state: &mut MachineState, x: Register, keys: &Keypad) -> ExecuteOutcome {
    let (next, step) = state.key_wait.poll(x, keys);
    state.key_wait = next;

    match step {
        KeyWaitStep::Blocked => {
            state.registers.rewind();
            ExecuteOutcome::AwaitingKey
        }
        KeyWaitStep::Complete { register, key } => {
            state.registers.set_v(register, key);
            ExecuteOutcome::Retired
        }
    }
}

fn advance_index_after_transfer(state: &mut MachineState, x: Register, quirks: Quirks) {
    if quirks.load_store_advances_index {
        let regs = &mut state.registers;
        let count = u16::from(x as u8) + 1;
        regs.set_index(regs.index().wrapping_add(count));
    }
}
