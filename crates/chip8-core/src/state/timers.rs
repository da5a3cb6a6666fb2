/// Delay and sound countdown timers, decremented at 60 Hz.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Timers {
    delay: u8,
    sound: u8,
}

impl Timers {
    /// Reads the delay timer.
    #[must_use]
    pub const fn delay(self) -> u8 {
        self.delay
    }

    /// Writes the delay timer.
    pub fn set_delay(&mut self, value: u8) {
        self.delay = value;
    }

    /// Reads the sound timer.
    #[must_use]
    pub const fn sound(self) -> u8 {
        self.sound
    }

    /// Writes the sound timer.
    pub fn set_sound(&mut self, value: u8) {
        self.sound = value;
    }

    /// Returns `true` while the sound timer is running.
    #[must_use]
    pub const fn is_sounding(self) -> bool {
        self.sound > 0
    }

    /// Decrements both timers, stopping at zero.
    ///
    /// Returns whether the tone should play after the decrement.
    pub fn tick(&mut self) -> bool {
        self.delay = self.delay.saturating_sub(1);
        self.sound = self.sound.saturating_sub(1);
        self.is_sounding()
    }
}
