//! Architectural CPU state model primitives.

/// Blocking key-wait state machine for `FX0A`.
pub mod key_wait;
/// Register file types and storage model.
pub mod registers;
/// Bounded return-address stack.
pub mod stack;
/// Delay and sound countdown timers.
pub mod timers;

pub use key_wait::{KeyWait, KeyWaitStep};
pub use registers::{Register, RegisterFile, REGISTER_COUNT};
pub use stack::{CallStack, STACK_DEPTH};
pub use timers::Timers;
