//! Main-loop side of the clock.
//!
//! The controller never touches the clock directly. It receives a snapshot
//! closure, which the firmware implements by locking the timer subsystem, and
//! calls it at most once per wake.

use embedded_hal::blocking::delay::DelayMs;
use embedded_hal::digital::v2::OutputPin;

use crate::blink::Blinker;
use crate::clock::Snapshot;
use crate::decode::DecodedTime;
use crate::display::{render_time, TextSurface};
use crate::error::Error;
use crate::power::{sleep_until_interrupt, PowerSave};
use crate::wake::WakeFlag;

pub struct DisplayController<'a, S, L, D, I> {
    surface: S,
    blinker: Blinker<L, D, I>,
    wake: &'a WakeFlag,
}

impl<'a, S, L, D, I> DisplayController<'a, S, L, D, I>
where
    S: TextSurface,
    L: OutputPin,
    D: DelayMs<u16>,
    I: OutputPin<Error = L::Error>,
{
    pub fn new(surface: S, blinker: Blinker<L, D, I>, wake: &'a WakeFlag) -> Self {
        Self {
            surface,
            blinker,
            wake,
        }
    }

    /// Sleeps until an interrupt, then services a pending wake event if there is one.
    pub fn run_once<P, F>(
        &mut self,
        power: &mut P,
        snapshot: F,
    ) -> Result<Option<DecodedTime>, Error<L::Error, S::Error>>
    where
        P: PowerSave,
        F: FnOnce() -> Snapshot,
    {
        sleep_until_interrupt(power);
        self.service(snapshot)
    }

    /// Runs the readout if the wake flag is raised.
    ///
    /// A wake without the flag (a timer tick) returns `Ok(None)` and has no
    /// effect. Otherwise the clock is snapshotted once, written to the
    /// surface and blinked. The LED readout runs even if the surface fails.
    /// The flag is cleared after the whole sequence, so edges arriving
    /// meanwhile (the button release) do not trigger a second readout, and
    /// a failed attempt is not repeated on every tick. The first error is
    /// returned once the surface has been cleared.
    pub fn service<F>(&mut self, snapshot: F) -> Result<Option<DecodedTime>, Error<L::Error, S::Error>>
    where
        F: FnOnce() -> Snapshot,
    {
        if !self.wake.is_raised() {
            return Ok(None);
        }

        let snap = snapshot();
        let time = DecodedTime::from_millis(snap.now_ms);

        #[cfg(feature = "defmt")]
        defmt::debug!("readout {=u32} ms -> {}", snap.now_ms, time);

        let rendered = render_time::<S, L::Error>(&mut self.surface, &time, &snap);
        let blinked = self.blinker.blink_time(&time).map_err(Error::Led);

        self.wake.clear();
        let cleared = self.surface.clear_and_home().map_err(Error::Surface);

        rendered.and(blinked).and(cleared)?;
        Ok(Some(time))
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn into_parts(self) -> (S, Blinker<L, D, I>) {
        (self.surface, self.blinker)
    }
}
