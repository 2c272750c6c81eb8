use core::cell::RefCell;

use critical_section::Mutex;

use crate::config::{TickConfig, TimeOfDay};

/// Clock value at which the day starts over.
pub const DAY_WRAP_MS: u32 = 86_399_000;

/// Clock value for a time of day. The last second folds into midnight,
/// as it does when the clock wraps.
const fn day_millis(time: TimeOfDay) -> u32 {
    let ms = time.as_millis();
    if ms >= DAY_WRAP_MS {
        0
    } else {
        ms
    }
}

/// Time kept by the timer interrupt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClockState {
    /// Milliseconds since midnight
    pub now_ms: u32,
    /// Clock value the current run started from; zeroed with `now_ms` at wraparound
    pub start_ms: u32,
}

/// Copy of the clock taken in a single critical section.
pub type Snapshot = ClockState;

/// Timer subsystem: turns timer interrupts into milliseconds of the day.
#[derive(Debug, Clone)]
pub struct TickAccumulator {
    state: ClockState,
    remainder: u8,
    config: TickConfig,
}

impl TickAccumulator {
    pub const fn new(config: TickConfig) -> Self {
        Self {
            state: ClockState {
                now_ms: 0,
                start_ms: 0,
            },
            remainder: 0,
            config,
        }
    }

    pub const fn starting_at(config: TickConfig, start: TimeOfDay) -> Self {
        let ms = day_millis(start);
        Self {
            state: ClockState {
                now_ms: ms,
                start_ms: ms,
            },
            remainder: 0,
            config,
        }
    }

    /// Advances the clock by one timer period. Called from the timer interrupt.
    pub fn tick(&mut self) {
        self.remainder += 1;
        self.state.now_ms = self.state.now_ms.saturating_add(self.config.increment_ms);

        if self.remainder >= self.config.ticks_per_correction {
            self.state.now_ms = self.state.now_ms.saturating_add(self.config.correction_ms);
            self.remainder = 0;
        }

        if self.state.now_ms >= DAY_WRAP_MS {
            #[cfg(feature = "defmt")]
            defmt::debug!("day wrap at {=u32} ms", self.state.now_ms);
            self.state.now_ms = 0;
            self.state.start_ms = 0;
        }
    }

    /// Loads a new time of day and restarts the correction cycle.
    pub fn set_time(&mut self, time: TimeOfDay) {
        let ms = day_millis(time);
        self.state = ClockState {
            now_ms: ms,
            start_ms: ms,
        };
        self.remainder = 0;
    }

    pub fn snapshot(&self) -> Snapshot {
        self.state
    }

    pub fn now_ms(&self) -> u32 {
        self.state.now_ms
    }

    pub fn start_ms(&self) -> u32 {
        self.state.start_ms
    }

    /// Ticks since the last correction.
    pub fn remainder(&self) -> u8 {
        self.remainder
    }

    pub fn config(&self) -> &TickConfig {
        &self.config
    }

    /// Number of ticks, starting from a fresh correction cycle, until the
    /// accumulated time first reaches `elapsed_ms`.
    ///
    /// Returns `None` if the plan never advances the clock.
    pub fn ticks_for(config: &TickConfig, elapsed_ms: u32) -> Option<u32> {
        let cycle_ticks = config.ticks_per_correction.max(1) as u32;
        let cycle_ms = config
            .increment_ms
            .saturating_mul(cycle_ticks)
            .saturating_add(config.correction_ms);
        if cycle_ms == 0 {
            return None;
        }

        let cycles = elapsed_ms / cycle_ms;
        let mut ticks = cycles * cycle_ticks;
        let mut covered = cycles * cycle_ms;
        let mut phase = 0;
        while covered < elapsed_ms {
            phase += 1;
            ticks += 1;
            covered = covered.saturating_add(config.increment_ms);
            if phase >= cycle_ticks {
                covered = covered.saturating_add(config.correction_ms);
                phase = 0;
            }
        }
        Some(ticks)
    }
}

/// [`TickAccumulator`] shared between the timer interrupt and the main loop.
///
/// The timer interrupt is the only writer. The main loop only reads, and
/// does so through [`snapshot`](Self::snapshot), which copies the multi-word
/// state with interrupts masked so it never sees a half-applied tick.
pub struct SharedClock {
    inner: Mutex<RefCell<TickAccumulator>>,
}

impl SharedClock {
    pub const fn new(accumulator: TickAccumulator) -> Self {
        Self {
            inner: Mutex::new(RefCell::new(accumulator)),
        }
    }

    pub fn tick(&self) {
        critical_section::with(|cs| self.inner.borrow(cs).borrow_mut().tick());
    }

    pub fn snapshot(&self) -> Snapshot {
        critical_section::with(|cs| self.inner.borrow(cs).borrow().snapshot())
    }

    pub fn set_time(&self, time: TimeOfDay) {
        critical_section::with(|cs| self.inner.borrow(cs).borrow_mut().set_time(time));
    }

    pub fn remainder(&self) -> u8 {
        critical_section::with(|cs| self.inner.borrow(cs).borrow().remainder())
    }
}
