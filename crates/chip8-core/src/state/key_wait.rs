use crate::keypad::Keypad;
use crate::state::Register;

/// Progress of a blocking `FX0A` key wait across CPU ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum KeyWait {
    /// No key wait in progress.
    #[default]
    Idle,
    /// Waiting for any key to go down.
    AwaitingPress {
        /// Register that receives the key.
        register: Register,
    },
    /// A key went down; waiting for that same key to come back up.
    AwaitingRelease {
        /// Register that receives the key.
        register: Register,
        /// Latched key.
        key: u8,
    },
}

/// Result of polling a key wait for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyWaitStep {
    /// Still waiting; the instruction must run again next tick.
    Blocked,
    /// The latched key was pressed and released.
    Complete {
        /// Register that receives the key.
        register: Register,
        /// Key that completed the wait.
        key: u8,
    },
}

impl KeyWait {
    /// Returns `true` while a key wait is in progress.
    #[must_use]
    pub const fn is_waiting(self) -> bool {
        !matches!(self, Self::Idle)
    }

    /// Advances the wait against this tick's keyboard snapshot.
    ///
    /// From idle or awaiting-press, the lowest pressed key is latched. A latched
    /// key completes the wait on the first tick it is seen released, and the
    /// state returns to idle.
    #[must_use]
    pub fn poll(self, register: Register, keys: &Keypad) -> (Self, KeyWaitStep) {
        match self {
            Self::AwaitingRelease { register, key } => {
                if keys.is_pressed(key) {
                    (self, KeyWaitStep::Blocked)
                } else {
                    (Self::Idle, KeyWaitStep::Complete { register, key })
                }
            }
            Self::Idle | Self::AwaitingPress { .. } => match keys.first_pressed() {
                Some(key) => (Self::AwaitingRelease { register, key }, KeyWaitStep::Blocked),
                None => (Self::AwaitingPress { register }, KeyWaitStep::Blocked),
            },
        }
    }
}
