//! Hosted runtime: the two interrupt sources become producers on a channel
//! and the main loop blocks on it instead of executing a sleep instruction.
//!
//! ```ignore
//! let (tx, rx) = mpsc::channel();
//! let clock = Arc::new(SharedClock::new(TickAccumulator::starting_at(config.tick, config.start)));
//! let wake = Arc::new(WakeFlag::new());
//! let ticker = Ticker::spawn(TimerLine::new(clock.clone(), tx.clone()), Duration::from_micros(17_778));
//! let button = EdgeInput::new(wake.clone(), tx);
//! let mut power = ChannelSleep::new(rx);
//! let mut controller = DisplayController::new(surface, blinker, &wake);
//! run_until_closed(&mut controller, &mut power, &clock)?;
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use embedded_hal::blocking::delay::DelayMs;
use embedded_hal::digital::v2::OutputPin;

use crate::clock::SharedClock;
use crate::controller::DisplayController;
use crate::display::TextSurface;
use crate::error::Error;
use crate::power::PowerSave;
use crate::wake::WakeFlag;

/// What woke the main loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interrupt {
    Tick,
    Edge,
}

/// Timer interrupt line: advances the clock and wakes the main loop.
#[derive(Clone)]
pub struct TimerLine {
    clock: Arc<SharedClock>,
    tx: Sender<Interrupt>,
}

impl TimerLine {
    pub fn new(clock: Arc<SharedClock>, tx: Sender<Interrupt>) -> Self {
        Self { clock, tx }
    }

    /// One timer interrupt. Returns `false` once the main loop is gone.
    pub fn fire(&self) -> bool {
        self.clock.tick();
        self.tx.send(Interrupt::Tick).is_ok()
    }
}

/// Thread firing a [`TimerLine`] at a fixed period.
pub struct Ticker {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<u64>>,
}

impl Ticker {
    pub fn spawn(line: TimerLine, period: Duration) -> Self {
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = stop.clone();

        let handle = thread::spawn(move || {
            let mut fired = 0u64;
            while !stop_flag.load(Ordering::Acquire) {
                thread::sleep(period);
                if !line.fire() {
                    break;
                }
                fired += 1;
            }
            fired
        });

        Self {
            stop,
            handle: Some(handle),
        }
    }

    /// Stops the thread and returns how many ticks it fired.
    pub fn stop(mut self) -> u64 {
        self.halt()
    }

    fn halt(&mut self) -> u64 {
        self.stop.store(true, Ordering::Release);
        self.handle
            .take()
            .map(|handle| handle.join().unwrap_or(0))
            .unwrap_or(0)
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.halt();
    }
}

/// Button input: either edge raises the wake flag and wakes the main loop.
#[derive(Clone)]
pub struct EdgeInput {
    wake: Arc<WakeFlag>,
    tx: Sender<Interrupt>,
}

impl EdgeInput {
    pub fn new(wake: Arc<WakeFlag>, tx: Sender<Interrupt>) -> Self {
        Self { wake, tx }
    }

    pub fn transition(&self) -> bool {
        self.wake.raise();
        self.tx.send(Interrupt::Edge).is_ok()
    }

    /// Press and release: two edges.
    pub fn press(&self) -> bool {
        self.transition() && self.transition()
    }
}

/// [`PowerSave`] that sleeps by blocking on the interrupt channel.
///
/// Interrupts queue up in the channel while the loop is busy, so none is
/// lost between unmasking and sleeping.
pub struct ChannelSleep {
    rx: Receiver<Interrupt>,
    masked: bool,
    armed: bool,
    closed: bool,
    last_wake: Option<Interrupt>,
}

impl ChannelSleep {
    pub fn new(rx: Receiver<Interrupt>) -> Self {
        Self {
            rx,
            masked: false,
            armed: false,
            closed: false,
            last_wake: None,
        }
    }

    /// All interrupt sources have been dropped.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn is_masked(&self) -> bool {
        self.masked
    }

    pub fn last_wake(&self) -> Option<Interrupt> {
        self.last_wake
    }
}

impl PowerSave for ChannelSleep {
    fn disable_interrupts(&mut self) {
        self.masked = true;
    }

    fn arm_sleep(&mut self) {
        self.armed = true;
    }

    fn enable_interrupts(&mut self) {
        self.masked = false;
    }

    fn sleep(&mut self) {
        if !self.armed || self.closed {
            return;
        }
        match self.rx.recv() {
            Ok(interrupt) => self.last_wake = Some(interrupt),
            Err(_) => {
                self.closed = true;
                self.last_wake = None;
            }
        }
    }

    fn disarm_sleep(&mut self) {
        self.armed = false;
    }
}

/// Blocking millisecond delay on the calling thread.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdDelay;

impl DelayMs<u16> for StdDelay {
    fn delay_ms(&mut self, ms: u16) {
        thread::sleep(Duration::from_millis(ms as u64));
    }
}

/// Sleep/service loop until every interrupt source is gone. Returns the
/// number of readouts performed.
pub fn run_until_closed<S, L, D, I>(
    controller: &mut DisplayController<'_, S, L, D, I>,
    power: &mut ChannelSleep,
    clock: &SharedClock,
) -> Result<usize, Error<L::Error, S::Error>>
where
    S: TextSurface,
    L: OutputPin,
    D: DelayMs<u16>,
    I: OutputPin<Error = L::Error>,
{
    let mut readouts = 0;
    while !power.is_closed() {
        if controller.run_once(power, || clock.snapshot())?.is_some() {
            readouts += 1;
        }
    }
    Ok(readouts)
}
