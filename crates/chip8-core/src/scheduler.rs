//! Threaded drivers: a CPU loop at the configured rate and a 60 Hz
//! timer/display loop, both working on one shared machine.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};

use log::{info, warn};

use crate::api::{DisplaySink, KeyboardSource, ToneSink};
use crate::fault::SchedulerError;
use crate::keypad::Keypad;
use crate::machine::Chip8;
use crate::timing::{Pacer, TIMER_HZ};

/// Owns the machine and the two driver threads.
///
/// Each driver tick holds the machine lock for exactly one operation, so a
/// CPU cycle and a timer cycle never interleave.
pub struct Scheduler {
    machine: Arc<Mutex<Chip8>>,
    keyboard: Arc<dyn KeyboardSource>,
    display: Arc<dyn DisplaySink>,
    tone: Arc<dyn ToneSink>,
    running: Arc<AtomicBool>,
    drivers: Vec<JoinHandle<()>>,
}

impl Scheduler {
    /// Wraps a machine and its collaborators. Nothing runs until
    /// [`start`](Self::start).
    #[must_use]
    pub fn new(
        machine: Chip8,
        keyboard: Arc<dyn KeyboardSource>,
        display: Arc<dyn DisplaySink>,
        tone: Arc<dyn ToneSink>,
    ) -> Self {
        Self {
            machine: Arc::new(Mutex::new(machine)),
            keyboard,
            display,
            tone,
            running: Arc::new(AtomicBool::new(false)),
            drivers: Vec::new(),
        }
    }

    /// Resets the machine and starts both drivers, stopping them first if
    /// they are already running.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::Spawn`] when a driver thread cannot be
    /// created. The scheduler is left stopped.
    pub fn start(&mut self) -> Result<(), SchedulerError> {
        self.stop();

        let cpu_hz = {
            let mut machine = lock(&self.machine);
            machine.reset();
            machine.config().cpu_hz
        };
        self.running.store(true, Ordering::Release);

        if let Err(err) = self.spawn_cpu_driver(cpu_hz) {
            self.stop();
            return Err(err);
        }
        if let Err(err) = self.spawn_timer_driver() {
            self.stop();
            return Err(err);
        }

        info!("started drivers (cpu {cpu_hz} Hz, timers {TIMER_HZ} Hz)");
        Ok(())
    }

    /// Stops both drivers, waits for them to exit and silences the tone.
    ///
    /// Safe to call when nothing is running. Once this returns the machine
    /// is no longer mutated by the drivers.
    pub fn stop(&mut self) {
        let was_running = self.running.swap(false, Ordering::AcqRel);

        for handle in self.drivers.drain(..) {
            let name = handle.thread().name().unwrap_or("driver").to_owned();
            if handle.join().is_err() {
                warn!("{name} thread panicked");
            }
        }

        self.tone.set_tone(false);
        if was_running {
            info!("stopped drivers");
        }
    }

    /// Returns `true` between a successful [`start`](Self::start) and the
    /// next [`stop`](Self::stop).
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Shared handle to the machine for inspection.
    #[must_use]
    pub fn machine(&self) -> Arc<Mutex<Chip8>> {
        Arc::clone(&self.machine)
    }

    /// Runs `f` with the machine locked.
    pub fn with_machine<R>(&self, f: impl FnOnce(&mut Chip8) -> R) -> R {
        f(&mut lock(&self.machine))
    }

    fn spawn_cpu_driver(&mut self, cpu_hz: u32) -> Result<(), SchedulerError> {
        let machine = Arc::clone(&self.machine);
        let keyboard = Arc::clone(&self.keyboard);
        let running = Arc::clone(&self.running);

        let handle = thread::Builder::new()
            .name("chip8-cpu".into())
            .spawn(move || {
                let mut pacer = Pacer::new(cpu_hz);
                while running.load(Ordering::Acquire) {
                    pacer.wait();
                    if !running.load(Ordering::Acquire) {
                        break;
                    }
                    let keys = Keypad::capture(keyboard.as_ref());
                    lock(&machine).cpu_tick(&keys);
                }
            })
            .map_err(|source| SchedulerError::Spawn {
                driver: "cpu",
                source,
            })?;

        self.drivers.push(handle);
        Ok(())
    }

    fn spawn_timer_driver(&mut self) -> Result<(), SchedulerError> {
        let machine = Arc::clone(&self.machine);
        let display = Arc::clone(&self.display);
        let tone = Arc::clone(&self.tone);
        let running = Arc::clone(&self.running);

        let handle = thread::Builder::new()
            .name("chip8-timer".into())
            .spawn(move || {
                let mut pacer = Pacer::new(TIMER_HZ);
                while running.load(Ordering::Acquire) {
                    pacer.wait();
                    if !running.load(Ordering::Acquire) {
                        break;
                    }
                    let tick = lock(&machine).timer_tick();
                    tone.set_tone(tick.tone);
                    if let Some(frame) = tick.frame {
                        display.present(&frame);
                    }
                }
            })
            .map_err(|source| SchedulerError::Spawn {
                driver: "timer",
                source,
            })?;

        self.drivers.push(handle);
        Ok(())
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        self.stop();
    }
}

fn lock(machine: &Mutex<Chip8>) -> MutexGuard<'_, Chip8> {
    machine.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{mpsc, Arc};
    use std::thread;
    use std::time::Duration;

    use super::Scheduler;
    use crate::api::MachineConfig;
    use crate::display::FrameSnapshot;
    use crate::keypad::SharedKeypad;
    use crate::machine::Chip8;
    use crate::memory::PROGRAM_START;

    fn scheduler(rom: &[u8]) -> (Scheduler, mpsc::Receiver<FrameSnapshot>, Arc<AtomicBool>) {
        let machine = Chip8::new(rom, MachineConfig::default()).expect("valid machine");
        let (tx, rx) = mpsc::channel();
        let tone = Arc::new(AtomicBool::new(true));
        let scheduler = Scheduler::new(
            machine,
            Arc::new(SharedKeypad::new()),
            Arc::new(tx),
            tone.clone(),
        );
        (scheduler, rx, tone)
    }

    #[test]
    fn stop_before_start_is_harmless() {
        let (mut scheduler, _rx, tone) = scheduler(&[0x12, 0x00]);
        scheduler.stop();
        scheduler.stop();
        assert!(!scheduler.is_running());
        assert!(!tone.load(Ordering::Acquire));
    }

    #[test]
    fn running_drivers_publish_the_boot_frame() {
        let (mut scheduler, rx, _tone) = scheduler(&[0x12, 0x00]);
        scheduler.start().expect("drivers start");
        assert!(scheduler.is_running());

        let frame = rx
            .recv_timeout(Duration::from_secs(2))
            .expect("cleared display is published");
        assert_eq!(frame.lit_count(), 0);

        scheduler.stop();
        assert!(!scheduler.is_running());
    }

    #[test]
    fn stop_freezes_the_machine() {
        let (mut scheduler, _rx, _tone) = scheduler(&[0x12, 0x00]);
        scheduler.start().expect("drivers start");
        thread::sleep(Duration::from_millis(30));
        scheduler.stop();

        let count = scheduler.with_machine(|chip8| chip8.diagnostics().instruction_count);
        thread::sleep(Duration::from_millis(30));
        let later = scheduler.with_machine(|chip8| chip8.diagnostics().instruction_count);
        assert_eq!(count, later);
    }

    #[test]
    fn restart_resets_the_machine() {
        let (mut scheduler, _rx, _tone) = scheduler(&[0x12, 0x00]);
        scheduler.start().expect("drivers start");
        thread::sleep(Duration::from_millis(20));
        scheduler.with_machine(|chip8| chip8.state_mut().registers.set_pc(0x300));
        scheduler.stop();

        scheduler.start().expect("drivers restart");
        scheduler.stop();
        let pc = scheduler.with_machine(|chip8| chip8.registers().pc());
        assert_eq!(pc, PROGRAM_START);
    }
}
