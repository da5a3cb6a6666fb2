use std::fmt;

use thiserror::Error;

/// Fault classes used for diagnostics aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum FaultClass {
    /// Decoder could not classify the opcode.
    Decode,
    /// Call stack discipline was violated by the program.
    Stack,
}

/// Recoverable runtime faults raised while executing a program.
///
/// None of these stop the machine: the offending instruction is skipped, the
/// fault is reported, and execution continues at the next instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[repr(u8)]
pub enum FaultCode {
    /// Opcode does not match any known instruction pattern.
    #[error("unknown opcode")]
    UnknownOpcode = 0x01,
    /// `00EE` executed while the call stack was empty.
    #[error("return executed with an empty call stack")]
    StackUnderflow = 0x02,
    /// `2NNN` executed while the call stack was full.
    #[error("call exceeded the call stack depth")]
    StackOverflow = 0x03,
}

impl FaultCode {
    /// Converts a fault code to its stable byte value.
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Converts a stable byte value back into a fault code.
    #[must_use]
    pub const fn from_u8(code: u8) -> Option<Self> {
        match code {
            0x01 => Some(Self::UnknownOpcode),
            0x02 => Some(Self::StackUnderflow),
            0x03 => Some(Self::StackOverflow),
            _ => None,
        }
    }

    /// Returns the diagnostics fault class for this fault code.
    #[must_use]
    pub const fn class(self) -> FaultClass {
        match self {
            Self::UnknownOpcode => FaultClass::Decode,
            Self::StackUnderflow | Self::StackOverflow => FaultClass::Stack,
        }
    }
}

/// A fault together with where it was raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct FaultReport {
    /// What went wrong.
    pub code: FaultCode,
    /// Address the faulting opcode was fetched from.
    pub pc: u16,
    /// Raw faulting opcode.
    pub opcode: u16,
}

impl fmt::Display for FaultReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} at {:#05X} (opcode {:04X})",
            self.code, self.pc, self.opcode
        )
    }
}

/// Errors surfaced to the caller before a machine is allowed to run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// ROM does not fit between the program start and the end of memory.
    #[error("rom is {len} bytes but at most {max} bytes fit in program memory")]
    RomTooLarge {
        /// Size of the rejected ROM.
        len: usize,
        /// Largest ROM that fits.
        max: usize,
    },
    /// CPU driver rate of zero instructions per second.
    #[error("cpu rate must be at least 1 Hz")]
    ZeroCpuRate,
}

/// Pixel data that does not describe a `width` by `height` grid.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{width}x{height} frame cannot hold {pixels} pixels")]
pub struct FrameError {
    /// Claimed width.
    pub width: usize,
    /// Claimed height.
    pub height: usize,
    /// Number of pixels supplied.
    pub pixels: usize,
}

/// Errors raised while starting the periodic drivers.
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// The operating system refused to spawn a driver thread.
    #[error("failed to spawn the {driver} driver thread")]
    Spawn {
        /// Which driver failed to start.
        driver: &'static str,
        /// Underlying spawn error.
        #[source]
        source: std::io::Error,
    },
}
