//! CHIP-8 virtual machine core.
//!
//! A [`Chip8`] owns memory, registers, the call stack, a 64×32 framebuffer and
//! the two countdown timers. Hosts either drive it directly through
//! [`Chip8::cpu_tick`] and [`Chip8::timer_tick`], or hand it to a
//! [`Scheduler`] that runs both on their own threads and talks to the
//! outside world through [`KeyboardSource`], [`DisplaySink`] and [`ToneSink`].

/// Memory image, font table and address-space layout.
pub mod memory;
pub use memory::{
    glyph, glyph_address, validate_rom, Memory, Program, FONT, FONT_START, MAX_ROM_BYTES,
    MEMORY_BYTES, PROGRAM_START,
};

/// Register file, call stack, timers and the key-wait latch.
pub mod state;
pub use state::{
    CallStack, KeyWait, KeyWaitStep, Register, RegisterFile, Timers, REGISTER_COUNT, STACK_DEPTH,
};

/// Fault taxonomy and construction/driver errors.
pub mod fault;
pub use fault::{ConfigError, FaultClass, FaultCode, FaultReport, FrameError, SchedulerError};

/// Monochrome framebuffer and published frames.
pub mod display;
pub use display::{FrameBuffer, FrameSnapshot, DISPLAY_HEIGHT, DISPLAY_WIDTH};

/// Keyboard snapshots and the shared live keypad.
pub mod keypad;
pub use keypad::{Keypad, SharedKeypad, KEY_COUNT};

/// Opcode decoder.
pub mod decoder;
pub use decoder::{Decoder, Instruction};

/// Public host-facing API contract and integration types.
pub mod api;
pub use api::{
    DisplaySink, KeyboardSource, MachineConfig, MachineState, Quirks, StepOutcome, TimerTick,
    ToneSink,
};

/// Runtime counters.
pub mod diag;
pub use diag::DiagCounters;

/// Driver rates and pacing.
pub mod timing;
pub use timing::{tick_interval, Pacer, DEFAULT_CPU_HZ, TIMER_HZ};

/// Instruction execution pipeline.
pub mod execute;
pub use execute::{execute_instruction, step_one, ExecuteContext, ExecuteOutcome, FlagsUpdate};

/// Single-threaded machine.
pub mod machine;
pub use machine::Chip8;

/// Threaded CPU and timer drivers.
pub mod scheduler;
pub use scheduler::Scheduler;

#[cfg(test)]
use env_logger as _;
#[cfg(test)]
use proptest as _;
#[cfg(feature = "serde")]
use serde as _;
