//! Public host-facing API contracts for embedding the machine.
//!
//! Configuration, the complete machine state, per-tick outcomes, and the
//! collaborator traits the drivers talk to.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;

use crate::decoder::Instruction;
use crate::display::{FrameBuffer, FrameSnapshot};
use crate::fault::{ConfigError, FaultReport};
use crate::memory::{Memory, Program};
use crate::state::{CallStack, KeyWait, RegisterFile, Timers};
use crate::timing::DEFAULT_CPU_HZ;

/// Behavioral switches for opcodes whose meaning differs between
/// interpreters. `true` selects the modern behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Quirks {
    /// `FX55`/`FX65` advance the index register past the last register
    /// transferred. Legacy leaves the index untouched.
    pub load_store_advances_index: bool,
    /// `8XY6`/`8XYE` shift `VX` in place. Legacy copies `VY` into `VX` first.
    pub shift_in_place: bool,
    /// `BNNN` adds `VX` (X = high nibble of `NNN`). Legacy adds `V0`.
    pub jump_offset_uses_vx: bool,
}

impl Default for Quirks {
    fn default() -> Self {
        Self {
            load_store_advances_index: true,
            shift_in_place: false,
            jump_offset_uses_vx: true,
        }
    }
}

impl Quirks {
    /// Original COSMAC VIP behavior for every switch.
    #[must_use]
    pub const fn legacy() -> Self {
        Self {
            load_store_advances_index: false,
            shift_in_place: false,
            jump_offset_uses_vx: false,
        }
    }

    /// Modern behavior for every switch.
    #[must_use]
    pub const fn modern() -> Self {
        Self {
            load_store_advances_index: true,
            shift_in_place: true,
            jump_offset_uses_vx: true,
        }
    }
}

/// Top-level immutable configuration for a machine instance.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct MachineConfig {
    /// Opcode behavior switches.
    pub quirks: Quirks,
    /// CPU driver rate in instructions per second.
    pub cpu_hz: u32,
    /// Seed for `CXNN`. `None` seeds from the operating system.
    pub rng_seed: Option<u64>,
    /// Logs every executed instruction at `trace` level.
    pub tracing_enabled: bool,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            quirks: Quirks::default(),
            cpu_hz: DEFAULT_CPU_HZ,
            rng_seed: None,
            tracing_enabled: false,
        }
    }
}

impl MachineConfig {
    /// Checks the values that would make the drivers misbehave.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroCpuRate`] when `cpu_hz` is zero.
    pub const fn validate(&self) -> Result<(), ConfigError> {
        if self.cpu_hz == 0 {
            return Err(ConfigError::ZeroCpuRate);
        }
        Ok(())
    }
}

/// Complete machine state mutated by stepping.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MachineState {
    /// `V0..=VF`, `I` and the program counter.
    pub registers: RegisterFile,
    /// Flat 4 KiB memory image.
    pub memory: Memory,
    /// Return addresses pushed by `2NNN`.
    pub stack: CallStack,
    /// Display contents.
    pub framebuffer: FrameBuffer,
    /// Delay and sound timers.
    pub timers: Timers,
    /// Progress of an in-flight `FX0A`.
    pub key_wait: KeyWait,
}

impl MachineState {
    /// Creates a freshly booted state running `program`.
    #[must_use]
    pub fn boot(program: &Program) -> Self {
        let mut state = Self::default();
        state.reset_canonical(program);
        state
    }

    /// Applies power-on semantics.
    ///
    /// Memory, registers, stack, framebuffer, timers and the key latch are
    /// cleared; the font and `program` are reloaded and execution resumes at
    /// the program start.
    pub fn reset_canonical(&mut self, program: &Program) {
        self.registers = RegisterFile::default();
        self.memory.clear();
        self.memory.load_font();
        self.memory.load_program(program);
        self.stack = CallStack::default();
        self.framebuffer.clear();
        self.timers = Timers::default();
        self.key_wait = KeyWait::Idle;
    }
}

/// Output status from one CPU tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepOutcome {
    /// Instruction executed.
    Retired {
        /// Address the opcode was fetched from.
        pc: u16,
        /// Executed instruction.
        instruction: Instruction,
    },
    /// `FX0A` is still waiting; the same instruction runs again next tick.
    AwaitingKey {
        /// Address of the waiting instruction.
        pc: u16,
    },
    /// Instruction was skipped because it faulted.
    Fault(FaultReport),
}

impl StepOutcome {
    /// Returns the fault report, if this tick faulted.
    #[must_use]
    pub const fn fault(self) -> Option<FaultReport> {
        match self {
            Self::Fault(report) => Some(report),
            Self::Retired { .. } | Self::AwaitingKey { .. } => None,
        }
    }
}

/// Output of one timer/display tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerTick {
    /// Sound timer is still non-zero after the decrement.
    pub tone: bool,
    /// Framebuffer copy, present only when pixels changed since the last one.
    pub frame: Option<FrameSnapshot>,
}

/// Live keyboard state provider.
pub trait KeyboardSource: Send + Sync {
    /// Returns `true` while `key` (`0x0..=0xF`) is held down.
    fn is_pressed(&self, key: u8) -> bool;
}

/// Consumer of changed frames.
pub trait DisplaySink: Send + Sync {
    /// Receives a frame that differs from the previously presented one.
    fn present(&self, frame: &FrameSnapshot);
}

/// Consumer of the tone on/off signal.
pub trait ToneSink: Send + Sync {
    /// Called at the timer rate with whether a tone should be playing.
    fn set_tone(&self, on: bool);
}

impl DisplaySink for mpsc::Sender<FrameSnapshot> {
    fn present(&self, frame: &FrameSnapshot) {
        // Receiver gone: nobody is watching.
        let _ = self.send(frame.clone());
    }
}

/// Blocks while the channel is full, so the timer driver waits for the
/// consumer instead of losing a frame it will not publish again.
impl DisplaySink for mpsc::SyncSender<FrameSnapshot> {
    fn present(&self, frame: &FrameSnapshot) {
        let _ = self.send(frame.clone());
    }
}

impl ToneSink for AtomicBool {
    fn set_tone(&self, on: bool) {
        self.store(on, Ordering::Release);
    }
}
