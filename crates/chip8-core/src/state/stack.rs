use crate::fault::FaultCode;

/// Maximum number of nested subroutine calls.
pub const STACK_DEPTH: usize = 16;

/// Return-address stack for `2NNN` / `00EE`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct CallStack {
    frames: Vec<u16>,
}

impl CallStack {
    /// Pushes a return address.
    ///
    /// # Errors
    ///
    /// Returns [`FaultCode::StackOverflow`] when [`STACK_DEPTH`] frames are
    /// already in use; the stack is left unchanged.
    pub fn push(&mut self, addr: u16) -> Result<(), FaultCode> {
        if self.frames.len() >= STACK_DEPTH {
            return Err(FaultCode::StackOverflow);
        }
        self.frames.push(addr);
        Ok(())
    }

    /// Pops the most recent return address.
    ///
    /// # Errors
    ///
    /// Returns [`FaultCode::StackUnderflow`] when the stack is empty.
    pub fn pop(&mut self) -> Result<u16, FaultCode> {
        self.frames.pop().ok_or(FaultCode::StackUnderflow)
    }

    /// Number of frames in use.
    #[must_use]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Returns `true` when no call is in progress.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Return addresses, oldest first.
    #[must_use]
    pub fn frames(&self) -> &[u16] {
        &self.frames
    }
}
