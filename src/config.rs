//! Compile-time configuration: start time, tick plan and blink timing.
//!
//! Nothing here is reconfigurable at runtime. The firmware builds one
//! [`ClockConfig`] as a `const` and hands its pieces to the timer subsystem
//! and the display controller during init.

use core::fmt;

/// Milliseconds in one second, minute and hour.
const MS_PER_SECOND: u32 = 1_000;
const SECONDS_PER_MINUTE: u32 = 60;
const SECONDS_PER_HOUR: u32 = 60 * 60;

/// Configuration errors reported by the `const` constructors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Hour, minute or second out of range
    InvalidTimeOfDay { hour: u8, minute: u8, second: u8 },

    /// Timer clock, prescaler or top value is zero
    ZeroTimerParameter,

    /// More ticks per exact-millisecond cycle than the sub-tick counter holds
    CorrectionCycleTooLong { ticks: u64 },

    /// Tick period of a second or more
    TickTooLong { ms: u64 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidTimeOfDay {
                hour,
                minute,
                second,
            } => write!(f, "invalid time of day {}:{}:{}", hour, minute, second),
            ConfigError::ZeroTimerParameter => write!(f, "timer parameters must be non-zero"),
            ConfigError::CorrectionCycleTooLong { ticks } => {
                write!(f, "correction cycle of {} ticks exceeds 255", ticks)
            }
            ConfigError::TickTooLong { ms } => write!(f, "tick period of {} ms is too long", ms),
        }
    }
}

/// Wall-clock time of day used to seed the clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimeOfDay {
    hour: u8,
    minute: u8,
    second: u8,
}

impl TimeOfDay {
    /// Midnight.
    pub const MIDNIGHT: TimeOfDay = TimeOfDay {
        hour: 0,
        minute: 0,
        second: 0,
    };

    pub const fn new(hour: u8, minute: u8, second: u8) -> Result<Self, ConfigError> {
        if hour > 23 || minute > 59 || second > 59 {
            return Err(ConfigError::InvalidTimeOfDay {
                hour,
                minute,
                second,
            });
        }
        Ok(Self {
            hour,
            minute,
            second,
        })
    }

    pub const fn hour(&self) -> u8 {
        self.hour
    }

    pub const fn minute(&self) -> u8 {
        self.minute
    }

    pub const fn second(&self) -> u8 {
        self.second
    }

    /// Milliseconds since midnight.
    pub const fn as_millis(&self) -> u32 {
        (SECONDS_PER_HOUR * self.hour as u32
            + SECONDS_PER_MINUTE * self.minute as u32
            + self.second as u32)
            * MS_PER_SECOND
    }
}

/// Hardware timer setup: input clock, prescaler and counts per interrupt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimerConfig {
    pub cpu_hz: u32,
    pub prescaler: u32,
    pub top: u32,
}

impl TimerConfig {
    /// 14.7456 MHz crystal, /1024 prescaler, 8-bit overflow: 56.25 interrupts per second.
    pub const NERDKIT: TimerConfig = TimerConfig {
        cpu_hz: 14_745_600,
        prescaler: 1024,
        top: 256,
    };

    /// Interrupt period in microseconds, rounded to nearest.
    pub const fn period_us(&self) -> u32 {
        let counts = self.prescaler as u64 * self.top as u64 * 1_000_000;
        let hz = self.cpu_hz as u64;
        if hz == 0 {
            return 0;
        }
        ((counts + hz / 2) / hz) as u32
    }

    /// Offset of the `n`th interrupt from the timer start, in whole
    /// microseconds. Scheduling against these deadlines instead of a rounded
    /// period keeps the alarm from drifting.
    pub const fn deadline_us(&self, n: u64) -> u64 {
        if self.cpu_hz == 0 {
            return 0;
        }
        let counts = self.prescaler as u128 * self.top as u128 * 1_000_000;
        (n as u128 * counts / self.cpu_hz as u128) as u64
    }
}

/// Integer plan for turning timer interrupts into milliseconds.
///
/// Every tick adds `increment_ms`. Every `ticks_per_correction` ticks the
/// accumulated fraction is made up by adding `correction_ms` once, so that
/// `increment_ms * ticks_per_correction + correction_ms` equals the true
/// duration of one correction cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TickConfig {
    pub increment_ms: u32,
    pub ticks_per_correction: u8,
    pub correction_ms: u32,
}

impl TickConfig {
    /// Exact plan for [`TimerConfig::NERDKIT`]: 9 ticks of 17 ms plus 7 ms is 160 ms.
    pub const NERDKIT: TickConfig = TickConfig {
        increment_ms: 17,
        ticks_per_correction: 9,
        correction_ms: 7,
    };

    /// Board-tuned plan: 44 ms made up every 57 ticks.
    pub const NERDKIT_EMPIRICAL: TickConfig = TickConfig {
        increment_ms: 17,
        ticks_per_correction: 57,
        correction_ms: 44,
    };

    /// One tick is exactly one millisecond.
    pub const MILLISECOND: TickConfig = TickConfig {
        increment_ms: 1,
        ticks_per_correction: 1,
        correction_ms: 0,
    };

    /// Derive the plan from the timer setup.
    ///
    /// The tick period `prescaler * top * 1000 / cpu_hz` ms is reduced to
    /// `num / den`; the correction cycle is `den` ticks long and makes up
    /// `num mod den` ms.
    pub const fn from_timer(timer: &TimerConfig) -> Result<Self, ConfigError> {
        if timer.cpu_hz == 0 || timer.prescaler == 0 || timer.top == 0 {
            return Err(ConfigError::ZeroTimerParameter);
        }

        let num = timer.prescaler as u64 * timer.top as u64 * MS_PER_SECOND as u64;
        let den = timer.cpu_hz as u64;
        let divisor = gcd(num, den);
        let (num, den) = (num / divisor, den / divisor);

        let increment = num / den;
        if increment >= MS_PER_SECOND as u64 {
            return Err(ConfigError::TickTooLong { ms: increment });
        }
        if den > u8::MAX as u64 {
            return Err(ConfigError::CorrectionCycleTooLong { ticks: den });
        }

        Ok(TickConfig {
            increment_ms: increment as u32,
            ticks_per_correction: den as u8,
            correction_ms: (num - increment * den) as u32,
        })
    }

    /// Milliseconds covered by one full correction cycle.
    pub const fn cycle_ms(&self) -> u32 {
        self.increment_ms * self.ticks_per_correction as u32 + self.correction_ms
    }
}

const fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

/// Pulse lengths and pauses used when blinking the time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BlinkTiming {
    /// On and off time of one pulse of a non-zero digit
    pub short_ms: u16,
    /// On and off time of the single pulse for digit zero
    pub long_ms: u16,
    /// Pause between the tens and ones digit
    pub digit_gap_ms: u16,
    /// Pause after the hours and after the minutes
    pub group_gap_ms: u16,
}

impl Default for BlinkTiming {
    fn default() -> Self {
        Self {
            short_ms: 255,
            long_ms: 500,
            digit_gap_ms: 255,
            group_gap_ms: 1000,
        }
    }
}

/// Everything the firmware fixes at build time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClockConfig {
    pub start: TimeOfDay,
    pub tick: TickConfig,
    pub blink: BlinkTiming,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            start: TimeOfDay::MIDNIGHT,
            tick: TickConfig::NERDKIT,
            blink: BlinkTiming::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_of_day_to_millis() {
        let t = TimeOfDay::new(21, 30, 0).unwrap();
        assert_eq!(t.as_millis(), 77_400_000);

        let t = TimeOfDay::new(22, 1, 30).unwrap();
        assert_eq!(t.as_millis(), 79_290_000);

        assert_eq!(TimeOfDay::MIDNIGHT.as_millis(), 0);
    }

    #[test]
    fn time_of_day_rejects_out_of_range() {
        for (h, m, s) in [(24, 0, 0), (0, 60, 0), (0, 0, 60)] {
            assert_eq!(
                TimeOfDay::new(h, m, s),
                Err(ConfigError::InvalidTimeOfDay {
                    hour: h,
                    minute: m,
                    second: s
                })
            );
        }
    }

    #[test]
    fn nerdkit_timer_derives_exact_plan() {
        let plan = TickConfig::from_timer(&TimerConfig::NERDKIT).unwrap();
        assert_eq!(plan, TickConfig::NERDKIT);
        assert_eq!(plan.cycle_ms(), 160);
    }

    #[test]
    fn nerdkit_period_rounds_to_micros() {
        assert_eq!(TimerConfig::NERDKIT.period_us(), 17_778);
    }

    #[test]
    fn deadlines_do_not_accumulate_rounding() {
        let timer = TimerConfig::NERDKIT;
        assert_eq!(timer.deadline_us(0), 0);
        assert_eq!(timer.deadline_us(1), 17_777);
        assert_eq!(timer.deadline_us(9), 160_000);
        // 56.25 interrupts per second
        assert_eq!(timer.deadline_us(225), 4_000_000);
    }

    #[test]
    fn whole_millisecond_timer_needs_no_correction() {
        // 16 MHz, /64, 250 counts: exactly 1 ms
        let timer = TimerConfig {
            cpu_hz: 16_000_000,
            prescaler: 64,
            top: 250,
        };
        let plan = TickConfig::from_timer(&timer).unwrap();
        assert_eq!(plan.increment_ms, 1);
        assert_eq!(plan.ticks_per_correction, 1);
        assert_eq!(plan.correction_ms, 0);
    }

    #[test]
    fn timer_errors() {
        let zero = TimerConfig {
            cpu_hz: 0,
            prescaler: 1024,
            top: 256,
        };
        assert_eq!(
            TickConfig::from_timer(&zero),
            Err(ConfigError::ZeroTimerParameter)
        );

        // 1 Hz input, /1024: over a second per tick
        let slow = TimerConfig {
            cpu_hz: 1,
            prescaler: 1024,
            top: 1,
        };
        assert!(matches!(
            TickConfig::from_timer(&slow),
            Err(ConfigError::TickTooLong { .. })
        ));

        // 1000 / 997 ms does not reduce: 997-tick cycle
        let prime = TimerConfig {
            cpu_hz: 997_000,
            prescaler: 1,
            top: 1_000,
        };
        assert_eq!(
            TickConfig::from_timer(&prime),
            Err(ConfigError::CorrectionCycleTooLong { ticks: 997 })
        );
    }
}
