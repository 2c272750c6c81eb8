//! Splitting a clock snapshot into decimal digit pairs.

use core::fmt;

const MS_PER_SECOND: u32 = 1_000;
const SECONDS_PER_HOUR: u32 = 3_600;
const MS_PER_DAY: u32 = 24 * SECONDS_PER_HOUR * MS_PER_SECOND;

/// Tens and ones of a two-digit decimal value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BcdPair {
    pub tens: u8,
    pub ones: u8,
}

impl BcdPair {
    pub const fn from_value(value: u8) -> Self {
        Self {
            tens: value / 10,
            ones: value % 10,
        }
    }

    pub const fn value(&self) -> u8 {
        self.tens * 10 + self.ones
    }
}

impl fmt::Display for BcdPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.tens, self.ones)
    }
}

/// Hours, minutes and seconds of one snapshot. Rebuilt for every readout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DecodedTime {
    pub hours: BcdPair,
    pub minutes: BcdPair,
    pub seconds: BcdPair,
    /// Sub-second part the digits drop
    pub millis: u16,
}

impl DecodedTime {
    /// Values past a full day are folded back into it, so every digit stays decimal.
    pub fn from_millis(t: u32) -> Self {
        let t = t % MS_PER_DAY;
        let total_s = t / MS_PER_SECOND;
        let hours = total_s / SECONDS_PER_HOUR;
        let minutes = (total_s - hours * SECONDS_PER_HOUR) / 60;
        let seconds = total_s % 60;

        Self {
            hours: BcdPair::from_value(hours as u8),
            minutes: BcdPair::from_value(minutes as u8),
            seconds: BcdPair::from_value(seconds as u8),
            millis: (t % MS_PER_SECOND) as u16,
        }
    }

    /// Whole seconds since midnight.
    pub fn total_seconds(&self) -> u32 {
        self.hours.value() as u32 * SECONDS_PER_HOUR
            + self.minutes.value() as u32 * 60
            + self.seconds.value() as u32
    }
}

impl fmt::Display for DecodedTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.hours, self.minutes, self.seconds)
    }
}
