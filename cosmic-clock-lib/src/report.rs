//! Status lines written to the serial console.

use core::fmt;

use crate::brightness::BrightnessLevel;
use crate::heartbeat::Heartbeat;
use crate::schedule::TimeOfDay;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event {
    Startup,
    ClockUnavailable,
    Brightness(BrightnessLevel),
    /// Header printed ahead of the daily result, names the trigger time.
    CalculationBanner(TimeOfDay),
    /// Degrees, printed with 4 decimals.
    Declination(f64),
    Heartbeat(Heartbeat),
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::Startup => write!(f, "Cosmic Clock Initialized..."),
            Event::ClockUnavailable => write!(f, "Couldn't find RTC!"),
            Event::Brightness(level) => write!(f, "Brightness Level: {}", level),
            Event::CalculationBanner(at) => write!(f, "--- {} DAILY CALCULATION ---", at),
            Event::Declination(degrees) => write!(f, "Declination: {:.4}", degrees),
            Event::Heartbeat(beat) => write!(f, "I'm still alive at: {}", beat),
        }
    }
}

/// Where status lines go. Any `FnMut(&Event)` closure is a reporter.
pub trait Reporter {
    fn report(&mut self, event: &Event);
}

impl<F: FnMut(&Event)> Reporter for F {
    fn report(&mut self, event: &Event) {
        self(event)
    }
}
