//! Blinking digits on the LED.
//!
//! A digit is a run of pulses: zero is one long pulse, any other digit N is
//! N short pulses. Every pulse is followed by an off period as long as its
//! on period. All waiting goes through an injected `DelayMs`, so a test
//! delay observes the full schedule without sleeping.

use core::marker::PhantomData;

use embedded_hal::blocking::delay::DelayMs;
use embedded_hal::digital::v2::OutputPin;

use crate::config::BlinkTiming;
use crate::decode::{BcdPair, DecodedTime};

/// One LED pulse: high for `on_ms`, then low for `off_ms`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Pulse {
    pub on_ms: u16,
    pub off_ms: u16,
}

impl Pulse {
    const fn symmetric(ms: u16) -> Self {
        Self {
            on_ms: ms,
            off_ms: ms,
        }
    }
}

/// Pulses of a single digit, see [`digit_pulses`].
#[derive(Debug, Clone)]
pub struct DigitPulses {
    remaining: u8,
    pulse: Pulse,
}

impl Iterator for DigitPulses {
    type Item = Pulse;

    fn next(&mut self) -> Option<Pulse> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        Some(self.pulse)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining as usize, Some(self.remaining as usize))
    }
}

impl ExactSizeIterator for DigitPulses {}

/// Pulse sequence for `digit` (0..=9).
pub fn digit_pulses(digit: u8, timing: &BlinkTiming) -> DigitPulses {
    debug_assert!(digit <= 9, "not a decimal digit: {}", digit);
    if digit == 0 {
        DigitPulses {
            remaining: 1,
            pulse: Pulse::symmetric(timing.long_ms),
        }
    } else {
        DigitPulses {
            remaining: digit,
            pulse: Pulse::symmetric(timing.short_ms),
        }
    }
}

/// Placeholder for a board without a secondary indicator pin.
pub struct NoIndicator<E>(PhantomData<E>);

impl<E> OutputPin for NoIndicator<E> {
    type Error = E;

    fn set_low(&mut self) -> Result<(), E> {
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), E> {
        Ok(())
    }
}

impl<E> NoIndicator<E> {
    pub const fn new() -> Self {
        NoIndicator(PhantomData)
    }
}

/// Plays digits on the LED with timed delays.
///
/// The optional indicator pin is held high for the whole readout.
pub struct Blinker<L, D, I> {
    led: L,
    delay: D,
    indicator: I,
    timing: BlinkTiming,
}

impl<L, D> Blinker<L, D, NoIndicator<L::Error>>
where
    L: OutputPin,
    D: DelayMs<u16>,
{
    pub fn new(led: L, delay: D, timing: BlinkTiming) -> Self {
        Self {
            led,
            delay,
            indicator: NoIndicator::new(),
            timing,
        }
    }
}

impl<L, D, I> Blinker<L, D, I>
where
    L: OutputPin,
    D: DelayMs<u16>,
    I: OutputPin<Error = L::Error>,
{
    pub fn with_indicator(led: L, delay: D, indicator: I, timing: BlinkTiming) -> Self {
        Self {
            led,
            delay,
            indicator,
            timing,
        }
    }

    pub fn timing(&self) -> &BlinkTiming {
        &self.timing
    }

    pub fn pulse(&mut self, pulse: Pulse) -> Result<(), L::Error> {
        self.led.set_high()?;
        self.delay.delay_ms(pulse.on_ms);
        self.led.set_low()?;
        self.delay.delay_ms(pulse.off_ms);
        Ok(())
    }

    pub fn blink_digit(&mut self, digit: u8) -> Result<(), L::Error> {
        for pulse in digit_pulses(digit, &self.timing) {
            self.pulse(pulse)?;
        }
        Ok(())
    }

    /// Tens, a short pause, then ones.
    pub fn blink_pair(&mut self, pair: BcdPair) -> Result<(), L::Error> {
        self.blink_digit(pair.tens)?;
        self.delay.delay_ms(self.timing.digit_gap_ms);
        self.blink_digit(pair.ones)
    }

    /// Hours then minutes, each followed by the group pause. Seconds are not blinked.
    ///
    /// The indicator is lowered even when the LED fails partway through.
    pub fn blink_time(&mut self, time: &DecodedTime) -> Result<(), L::Error> {
        self.indicator.set_high()?;
        let played = self.blink_groups(time);
        let lowered = self.indicator.set_low();
        played.and(lowered)
    }

    fn blink_groups(&mut self, time: &DecodedTime) -> Result<(), L::Error> {
        self.blink_pair(time.hours)?;
        self.delay.delay_ms(self.timing.group_gap_ms);
        self.blink_pair(time.minutes)?;
        self.delay.delay_ms(self.timing.group_gap_ms);
        Ok(())
    }

    pub fn into_parts(self) -> (L, D, I) {
        (self.led, self.delay, self.indicator)
    }
}
