//! `VF` update behaviors for the arithmetic and logic instructions.

use crate::state::RegisterFile;

/// Describes how `VF` changes after an instruction writes its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlagsUpdate {
    /// `VF` is left alone.
    #[default]
    None,
    /// `VF` is zeroed.
    Clear,
    /// `VF` becomes `1` or `0`.
    Set(bool),
}

impl FlagsUpdate {
    /// Writes `VF`. Called after the result register, so the flag wins when
    /// the destination is `VF` itself.
    pub fn apply(self, registers: &mut RegisterFile) {
        match self {
            Self::None => {}
            Self::Clear => registers.set_flag(false),
            Self::Set(flag) => registers.set_flag(flag),
        }
    }
}
