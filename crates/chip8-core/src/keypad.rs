//! Hexadecimal keypad state: live shared source and per-tick snapshot.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::api::KeyboardSource;

/// Number of keys on the hexadecimal keypad (`0..=F`).
pub const KEY_COUNT: usize = 16;

/// Keyboard state captured once at the start of a CPU tick.
///
/// A single instruction only ever sees one snapshot, so its input decisions
/// stay consistent while the live source keeps changing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Keypad {
    keys: [bool; KEY_COUNT],
}

impl Keypad {
    /// Snapshot with every key released.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            keys: [false; KEY_COUNT],
        }
    }

    /// Snapshot with exactly the listed keys pressed. Keys above `0xF` are
    /// ignored.
    #[must_use]
    pub fn with_pressed(pressed: &[u8]) -> Self {
        let mut keypad = Self::new();
        for &key in pressed {
            keypad.set(key, true);
        }
        keypad
    }

    /// Copies the current state of a live source.
    #[must_use]
    pub fn capture(source: &dyn KeyboardSource) -> Self {
        let mut keypad = Self::new();
        for (key, pressed) in (0u8..).zip(keypad.keys.iter_mut()) {
            *pressed = source.is_pressed(key);
        }
        keypad
    }

    /// Returns `true` when `key` is pressed. Keys above `0xF` are never
    /// pressed.
    #[must_use]
    pub fn is_pressed(&self, key: u8) -> bool {
        self.keys.get(usize::from(key)).copied().unwrap_or(false)
    }

    /// Lowest-numbered pressed key, if any.
    #[must_use]
    pub fn first_pressed(&self) -> Option<u8> {
        (0u8..).zip(self.keys).find_map(|(key, pressed)| pressed.then_some(key))
    }

    /// Sets the state of one key. Keys above `0xF` are ignored.
    pub fn set(&mut self, key: u8, pressed: bool) {
        if let Some(slot) = self.keys.get_mut(usize::from(key)) {
            *slot = pressed;
        }
    }
}

impl KeyboardSource for Keypad {
    fn is_pressed(&self, key: u8) -> bool {
        Self::is_pressed(self, key)
    }
}

/// Live keypad that input handlers on any thread can update.
#[derive(Debug, Default)]
pub struct SharedKeypad {
    keys: [AtomicBool; KEY_COUNT],
}

impl SharedKeypad {
    /// Creates a keypad with every key released.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `key` as held down. Keys above `0xF` are ignored.
    pub fn press(&self, key: u8) {
        self.set(key, true);
    }

    /// Marks `key` as released. Keys above `0xF` are ignored.
    pub fn release(&self, key: u8) {
        self.set(key, false);
    }

    /// Sets the state of one key. Keys above `0xF` are ignored.
    pub fn set(&self, key: u8, pressed: bool) {
        if let Some(slot) = self.keys.get(usize::from(key)) {
            slot.store(pressed, Ordering::Release);
        }
    }

    /// Releases every key.
    pub fn release_all(&self) {
        for slot in &self.keys {
            slot.store(false, Ordering::Release);
        }
    }
}

impl KeyboardSource for SharedKeypad {
    fn is_pressed(&self, key: u8) -> bool {
        self.keys
            .get(usize::from(key))
            .is_some_and(|slot| slot.load(Ordering::Acquire))
    }
}
