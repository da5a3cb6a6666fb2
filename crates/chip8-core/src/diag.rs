//! Saturating runtime counters for hosts that want numbers instead of logs.

use crate::fault::{FaultClass, FaultReport};

/// Execution and fault counters kept by a running machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct DiagCounters {
    /// Most recent fault, if any.
    pub last_fault: Option<FaultReport>,
    /// Saturating counter for decode-class faults.
    pub fault_count_decode: u32,
    /// Saturating counter for stack-class faults.
    pub fault_count_stack: u32,
    /// Saturating counter for executed instructions.
    pub instruction_count: u64,
    /// Saturating counter for CPU ticks spent waiting on `FX0A`.
    pub key_wait_ticks: u64,
    /// Saturating counter for timer/display ticks.
    pub timer_ticks: u64,
    /// Saturating counter for published frames.
    pub frames_published: u64,
}

impl DiagCounters {
    /// Creates zeroed counters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a fault, updating the last report and its class counter.
    pub fn record_fault(&mut self, report: FaultReport) {
        self.last_fault = Some(report);
        match report.code.class() {
            FaultClass::Decode => {
                self.fault_count_decode = self.fault_count_decode.saturating_add(1);
            }
            FaultClass::Stack => {
                self.fault_count_stack = self.fault_count_stack.saturating_add(1);
            }
        }
    }

    /// Counts one executed instruction.
    #[allow(clippy::missing_const_for_fn)]
    pub fn record_instruction(&mut self) {
        self.instruction_count = self.instruction_count.saturating_add(1);
    }

    /// Counts one CPU tick spent blocked on a key.
    #[allow(clippy::missing_const_for_fn)]
    pub fn record_key_wait(&mut self) {
        self.key_wait_ticks = self.key_wait_ticks.saturating_add(1);
    }

    /// Counts one timer tick and whether it published a frame.
    #[allow(clippy::missing_const_for_fn)]
    pub fn record_timer_tick(&mut self, published_frame: bool) {
        self.timer_ticks = self.timer_ticks.saturating_add(1);
        if published_frame {
            self.frames_published = self.frames_published.saturating_add(1);
        }
    }

    /// Total faults across every class.
    #[must_use]
    pub const fn fault_count(&self) -> u32 {
        self.fault_count_decode.saturating_add(self.fault_count_stack)
    }

    /// Resets all counters.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
