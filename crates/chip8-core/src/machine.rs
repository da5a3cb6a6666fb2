//! Single-threaded machine: state, configuration, random source and counters.
//!
//! [`Chip8`] exposes the two tick operations the drivers call. Hosts that want
//! their own timing can call them directly without a [`Scheduler`].
//!
//! [`Scheduler`]: crate::scheduler::Scheduler

use log::{info, trace, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::api::{MachineConfig, MachineState, StepOutcome, TimerTick};
use crate::diag::DiagCounters;
use crate::display::{FrameBuffer, FrameSnapshot};
use crate::execute::{step_one, ExecuteContext};
use crate::fault::ConfigError;
use crate::keypad::Keypad;
use crate::memory::{Memory, Program};
use crate::state::{KeyWait, RegisterFile, Timers};

/// A CHIP-8 machine loaded with one program.
#[derive(Debug)]
pub struct Chip8 {
    config: MachineConfig,
    program: Program,
    state: MachineState,
    rng: StdRng,
    diag: DiagCounters,
}

impl Chip8 {
    /// Builds a machine and boots `rom`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::RomTooLarge`] when the ROM does not fit in
    /// program memory and [`ConfigError::ZeroCpuRate`] when `config.cpu_hz`
    /// is zero.
    pub fn new(rom: &[u8], config: MachineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let program = Program::new(rom)?;
        let state = MachineState::boot(&program);
        let rng = seeded_rng(config.rng_seed);

        info!(
            "loaded {} byte rom (cpu {} Hz, quirks {:?})",
            program.len(),
            config.cpu_hz,
            config.quirks
        );

        Ok(Self {
            config,
            program,
            state,
            rng,
            diag: DiagCounters::new(),
        })
    }

    /// Restores power-on state and reloads the program.
    ///
    /// The random source is reseeded when a seed is configured, so a reset
    /// replays identically.
    pub fn reset(&mut self) {
        self.state.reset_canonical(&self.program);
        if self.config.rng_seed.is_some() {
            self.rng = seeded_rng(self.config.rng_seed);
        }
        self.diag.reset();
    }

    /// Runs one fetch-decode-execute cycle against a keyboard snapshot.
    pub fn cpu_tick(&mut self, keys: &Keypad) -> StepOutcome {
        let mut ctx = ExecuteContext {
            keys,
            quirks: self.config.quirks,
            rng: &mut self.rng,
        };
        let outcome = step_one(&mut self.state, &mut ctx);

        match outcome {
            StepOutcome::Retired { pc, instruction } => {
                self.diag.record_instruction();
                if self.config.tracing_enabled {
                    trace!("{pc:#05X}: {instruction}");
                }
            }
            StepOutcome::AwaitingKey { .. } => self.diag.record_key_wait(),
            StepOutcome::Fault(report) => {
                warn!("{report}");
                self.diag.record_fault(report);
            }
        }

        outcome
    }

    /// Runs one timer/display cycle.
    ///
    /// Both timers are decremented, the tone signal is read after the
    /// decrement, and a frame is returned only if pixels changed.
    pub fn timer_tick(&mut self) -> TimerTick {
        let tone = self.state.timers.tick();
        let frame = self.state.framebuffer.take_snapshot();
        self.diag.record_timer_tick(frame.is_some());
        TimerTick { tone, frame }
    }

    /// Takes the framebuffer if it changed since the last take.
    pub fn take_frame(&mut self) -> Option<FrameSnapshot> {
        self.state.framebuffer.take_snapshot()
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &MachineConfig {
        &self.config
    }

    /// Loaded program.
    #[must_use]
    pub const fn program(&self) -> &Program {
        &self.program
    }

    /// Complete machine state.
    #[must_use]
    pub const fn state(&self) -> &MachineState {
        &self.state
    }

    /// Mutable machine state, for hosts and tests that poke values directly.
    pub fn state_mut(&mut self) -> &mut MachineState {
        &mut self.state
    }

    /// Register file.
    #[must_use]
    pub const fn registers(&self) -> &RegisterFile {
        &self.state.registers
    }

    /// Memory image.
    #[must_use]
    pub const fn memory(&self) -> &Memory {
        &self.state.memory
    }

    /// Display contents.
    #[must_use]
    pub const fn framebuffer(&self) -> &FrameBuffer {
        &self.state.framebuffer
    }

    /// Delay and sound timers.
    #[must_use]
    pub const fn timers(&self) -> Timers {
        self.state.timers
    }

    /// Progress of an in-flight `FX0A`.
    #[must_use]
    pub const fn key_wait(&self) -> KeyWait {
        self.state.key_wait
    }

    /// Runtime counters since the last reset.
    #[must_use]
    pub const fn diagnostics(&self) -> &DiagCounters {
        &self.diag
    }
}

fn seeded_rng(seed: Option<u64>) -> StdRng {
    seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64)
}
