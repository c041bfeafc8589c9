//! Runs the appliance on the host against a simulated clock, button and light.
//!
//! Simulated time starts shortly before the 3:00 AM trigger and advances a
//! little on every clock read and by the full amount of every delay, so the
//! loop sees the same one second resolution readings it would on the board.

use std::cell::Cell;
use std::convert::Infallible;
use std::rc::Rc;

use chrono::{NaiveDate, NaiveDateTime, TimeDelta, Timelike};
use cosmic_clock_lib::{CivilTimestamp, CosmicClock, DeviceConfig, Event, TimeSource};
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{self, InputPin};
use embedded_hal::pwm::{self, SetDutyCycle};
use log::info;

/// Time spent by one trip around the loop between clock reads.
const POLL_COST_MS: i64 = 120;
const SIMULATED_POLLS: usize = 2_000;

type SimTime = Rc<Cell<NaiveDateTime>>;

fn advance(time: &SimTime, delta: TimeDelta) {
    let now = time.get();
    time.set(now.checked_add_signed(delta).unwrap_or(now));
}

struct SimClock {
    time: SimTime,
    power_lost: bool,
}

impl TimeSource for SimClock {
    type Error = Infallible;

    fn now(&mut self) -> Result<CivilTimestamp, Self::Error> {
        advance(&self.time, TimeDelta::milliseconds(POLL_COST_MS));
        Ok(self.time.get().into())
    }

    fn lost_power(&mut self) -> Result<bool, Self::Error> {
        Ok(self.power_lost)
    }

    fn adjust(&mut self, ts: &CivilTimestamp) -> Result<(), Self::Error> {
        if let Some(t) = ts.to_naive() {
            self.time.set(t);
        }
        self.power_lost = false;
        Ok(())
    }
}

struct SimDelay {
    time: SimTime,
}

impl DelayNs for SimDelay {
    fn delay_ns(&mut self, ns: u32) {
        advance(&self.time, TimeDelta::nanoseconds(ns.into()));
    }
}

/// Held down for the first second of every third minute.
struct SimButton {
    time: SimTime,
}

impl digital::ErrorType for SimButton {
    type Error = Infallible;
}

impl InputPin for SimButton {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        self.is_low().map(|low| !low)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        let t = self.time.get();
        Ok(t.minute() % 3 == 0 && t.second() == 0)
    }
}

struct SimLight;

impl pwm::ErrorType for SimLight {
    type Error = Infallible;
}

impl SetDutyCycle for SimLight {
    fn max_duty_cycle(&self) -> u16 {
        255
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Self::Error> {
        info!("PWM duty {}/255", duty);
        Ok(())
    }
}

fn main() {
    // Also picks up the library's `log` records
    tracing_subscriber::fmt::init();

    let Some(start) = NaiveDate::from_ymd_opt(2025, 6, 21).and_then(|d| d.and_hms_opt(2, 58, 30))
    else {
        return;
    };
    let time: SimTime = Rc::new(Cell::new(start));
    let seed = CivilTimestamp::from(start);

    let mut device = CosmicClock::new(
        SimClock {
            time: time.clone(),
            power_lost: true,
        },
        SimButton { time: time.clone() },
        SimLight,
        SimDelay { time: time.clone() },
        DeviceConfig::DEFAULT,
    );

    let mut console = |e: &Event| println!("{}", e);
    if device.start(&seed, &mut console).is_err() {
        return;
    }
    for _ in 0..SIMULATED_POLLS {
        if let Err(e) = device.poll(&mut console) {
            log::warn!("{}", e);
        }
    }
    info!("Simulation stopped at {}", CivilTimestamp::from(time.get()));
}
