//! Driver rates and fixed-rate pacing.

use std::thread;
use std::time::{Duration, Instant};

/// Default CPU driver rate in instructions per second.
pub const DEFAULT_CPU_HZ: u32 = 700;

/// Timer and display driver rate.
pub const TIMER_HZ: u32 = 60;

/// Period of a driver running at `hz` ticks per second. Zero is treated as 1 Hz.
#[must_use]
pub fn tick_interval(hz: u32) -> Duration {
    Duration::from_secs(1) / hz.max(1)
}

/// Fixed-rate deadline tracker for a driver loop.
///
/// Deadlines advance by a whole interval each tick, so short stalls are caught
/// up instead of drifting. A stall longer than one interval resynchronises to
/// the current time rather than bursting through missed ticks.
#[derive(Debug, Clone, Copy)]
pub struct Pacer {
    interval: Duration,
    next: Instant,
}

impl Pacer {
    /// Starts pacing at `hz` with the first tick due immediately.
    #[must_use]
    pub fn new(hz: u32) -> Self {
        Self {
            interval: tick_interval(hz),
            next: Instant::now(),
        }
    }

    /// Period between ticks.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Time left until the next tick is due, zero if it is already due.
    #[must_use]
    pub fn remaining(&self, now: Instant) -> Duration {
        self.next.saturating_duration_since(now)
    }

    /// Marks the current tick as taken and schedules the next one.
    pub fn advance(&mut self, now: Instant) {
        self.next += self.interval;
        if self.next + self.interval < now {
            self.next = now;
        }
    }

    /// Sleeps until the next tick is due.
    pub fn wait(&mut self) {
        let remaining = self.remaining(Instant::now());
        if !remaining.is_zero() {
            thread::sleep(remaining);
        }
        self.advance(Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::{tick_interval, Pacer, DEFAULT_CPU_HZ, TIMER_HZ};

    #[test]
    fn timer_interval_is_one_sixtieth_second() {
        assert_eq!(tick_interval(TIMER_HZ), Duration::from_nanos(16_666_666));
    }

    #[test]
    fn cpu_interval_matches_default_rate() {
        assert_eq!(
            tick_interval(DEFAULT_CPU_HZ),
            Duration::from_secs(1) / DEFAULT_CPU_HZ
        );
    }

    #[test]
    fn zero_rate_does_not_divide_by_zero() {
        assert_eq!(tick_interval(0), Duration::from_secs(1));
    }

    #[test]
    fn first_tick_is_due_immediately() {
        let pacer = Pacer::new(TIMER_HZ);
        assert!(pacer.remaining(Instant::now()).is_zero());
    }

    #[test]
    fn advance_schedules_one_interval_ahead() {
        let mut pacer = Pacer::new(10);
        let start = Instant::now();
        pacer.advance(start);
        assert!(pacer.remaining(start) <= pacer.interval());
        assert!(pacer.remaining(start) > Duration::ZERO);
    }

    #[test]
    fn long_stall_resynchronises_to_now() {
        let mut pacer = Pacer::new(1000);
        let late = Instant::now() + Duration::from_secs(5);
        pacer.advance(late);
        assert!(pacer.remaining(late).is_zero());
        pacer.advance(late);
        assert_eq!(pacer.remaining(late), pacer.interval());
    }
}
