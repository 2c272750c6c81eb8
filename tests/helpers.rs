//! Recording doubles for the pins, delay and text surface.
//!
//! Every double appends to one shared [`Log`], so tests can check the
//! interleaving of LED edges, delays and display writes.

#![allow(dead_code)]

use std::cell::RefCell;
use std::convert::Infallible;
use std::rc::Rc;

use embedded_hal::blocking::delay::DelayMs;
use embedded_hal::digital::v2::OutputPin;
use oneled_clock::{BlinkTiming, Blinker, DisplayController, Pulse, TextSurface, WakeFlag};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Led(bool),
    Indicator(bool),
    Delay(u16),
    Clear,
    Line(u8),
    Write(String),
}

#[derive(Clone, Default)]
pub struct Log(Rc<RefCell<Vec<Event>>>);

impl Log {
    pub fn push(&self, event: Event) {
        self.0.borrow_mut().push(event);
    }

    pub fn events(&self) -> Vec<Event> {
        self.0.borrow().clone()
    }

    pub fn take(&self) -> Vec<Event> {
        std::mem::take(&mut *self.0.borrow_mut())
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    /// LED pulses as (on, off) durations, reconstructed from the log.
    pub fn led_pulses(&self) -> Vec<Pulse> {
        let events = self.events();
        let mut pulses = Vec::new();
        let mut i = 0;
        while i < events.len() {
            if let [Event::Led(true), Event::Delay(on), Event::Led(false), Event::Delay(off), ..] =
                &events[i..]
            {
                pulses.push(Pulse {
                    on_ms: *on,
                    off_ms: *off,
                });
                i += 4;
            } else {
                i += 1;
            }
        }
        pulses
    }

    /// Sum of all delays.
    pub fn total_delay_ms(&self) -> u32 {
        self.events()
            .iter()
            .map(|e| match e {
                Event::Delay(ms) => *ms as u32,
                _ => 0,
            })
            .sum()
    }

    pub fn writes(&self) -> Vec<(u8, String)> {
        let mut line = 0;
        let mut writes = Vec::new();
        for event in self.events() {
            match event {
                Event::Clear => line = 0,
                Event::Line(l) => line = l,
                Event::Write(text) => writes.push((line, text)),
                _ => {}
            }
        }
        writes
    }
}

pub struct RecordingLed {
    log: Log,
}

impl OutputPin for RecordingLed {
    type Error = Infallible;

    fn set_low(&mut self) -> Result<(), Infallible> {
        self.log.push(Event::Led(false));
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.log.push(Event::Led(true));
        Ok(())
    }
}

pub struct RecordingIndicator {
    log: Log,
}

impl OutputPin for RecordingIndicator {
    type Error = Infallible;

    fn set_low(&mut self) -> Result<(), Infallible> {
        self.log.push(Event::Indicator(false));
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.log.push(Event::Indicator(true));
        Ok(())
    }
}

/// Pin that fails every write.
pub struct BrokenPin;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinFault;

impl OutputPin for BrokenPin {
    type Error = PinFault;

    fn set_low(&mut self) -> Result<(), PinFault> {
        Err(PinFault)
    }

    fn set_high(&mut self) -> Result<(), PinFault> {
        Err(PinFault)
    }
}

/// LED that records edges until `edges_left` runs out, then faults.
pub struct FailingLed {
    pub log: Log,
    pub edges_left: usize,
}

impl FailingLed {
    fn edge(&mut self, on: bool) -> Result<(), PinFault> {
        if self.edges_left == 0 {
            return Err(PinFault);
        }
        self.edges_left -= 1;
        self.log.push(Event::Led(on));
        Ok(())
    }
}

impl OutputPin for FailingLed {
    type Error = PinFault;

    fn set_low(&mut self) -> Result<(), PinFault> {
        self.edge(false)
    }

    fn set_high(&mut self) -> Result<(), PinFault> {
        self.edge(true)
    }
}

/// Indicator sharing the [`PinFault`] error type, never fails.
pub struct FaultIndicator {
    pub log: Log,
}

impl OutputPin for FaultIndicator {
    type Error = PinFault;

    fn set_low(&mut self) -> Result<(), PinFault> {
        self.log.push(Event::Indicator(false));
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), PinFault> {
        self.log.push(Event::Indicator(true));
        Ok(())
    }
}

pub struct RecordingDelay {
    log: Log,
}

impl DelayMs<u16> for RecordingDelay {
    fn delay_ms(&mut self, ms: u16) {
        self.log.push(Event::Delay(ms));
    }
}

/// Character display with `N` lines that keeps its current contents.
pub struct RecordingSurface<const N: u8> {
    log: Log,
    line: u8,
    pub lines: Vec<String>,
}

impl<const N: u8> RecordingSurface<N> {
    pub fn new(log: Log) -> Self {
        Self {
            log,
            line: 0,
            lines: vec![String::new(); N as usize],
        }
    }

    pub fn is_blank(&self) -> bool {
        self.lines.iter().all(|l| l.is_empty())
    }
}

impl<const N: u8> TextSurface for RecordingSurface<N> {
    type Error = Infallible;

    const LINES: u8 = N;

    fn clear_and_home(&mut self) -> Result<(), Infallible> {
        self.log.push(Event::Clear);
        self.line = 0;
        for line in &mut self.lines {
            line.clear();
        }
        Ok(())
    }

    fn select_line(&mut self, line: u8) -> Result<(), Infallible> {
        self.log.push(Event::Line(line));
        self.line = line;
        Ok(())
    }

    fn write_str(&mut self, text: &str) -> Result<(), Infallible> {
        self.log.push(Event::Write(text.to_string()));
        self.lines[self.line as usize].push_str(text);
        Ok(())
    }
}

/// Surface that rejects everything.
pub struct BrokenSurface;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceFault;

impl TextSurface for BrokenSurface {
    type Error = SurfaceFault;

    const LINES: u8 = 2;

    fn clear_and_home(&mut self) -> Result<(), SurfaceFault> {
        Err(SurfaceFault)
    }

    fn select_line(&mut self, _line: u8) -> Result<(), SurfaceFault> {
        Err(SurfaceFault)
    }

    fn write_str(&mut self, _text: &str) -> Result<(), SurfaceFault> {
        Err(SurfaceFault)
    }
}

pub type TestBlinker = Blinker<RecordingLed, RecordingDelay, RecordingIndicator>;

pub fn create_blinker(log: &Log) -> TestBlinker {
    Blinker::with_indicator(
        RecordingLed { log: log.clone() },
        RecordingDelay { log: log.clone() },
        RecordingIndicator { log: log.clone() },
        BlinkTiming::default(),
    )
}

pub fn create_bare_blinker(log: &Log) -> Blinker<RecordingLed, RecordingDelay, oneled_clock::NoIndicator<Infallible>> {
    Blinker::new(
        RecordingLed { log: log.clone() },
        RecordingDelay { log: log.clone() },
        BlinkTiming::default(),
    )
}

pub type TestController<'a> =
    DisplayController<'a, RecordingSurface<3>, RecordingLed, RecordingDelay, RecordingIndicator>;

pub fn create_controller<'a>(log: &Log, wake: &'a WakeFlag) -> TestController<'a> {
    DisplayController::new(RecordingSurface::new(log.clone()), create_blinker(log), wake)
}
