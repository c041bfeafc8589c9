//! The appliance main loop.
//!
//! [`DeviceState`] holds everything the loop remembers between polls and its
//! [`DeviceState::step`] is a plain function of (state, clock reading), so the
//! daily behaviour can be driven with synthetic timestamps. [`CosmicClock`]
//! owns the hardware and runs one poll at a time on top of it.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::InputPin;
use embedded_hal::pwm::SetDutyCycle;

use crate::astronomy::{declination, GeoFix};
use crate::brightness::{BrightnessLevel, Dimmer, PressDetector};
use crate::heartbeat::{Heartbeat, MinuteWatch};
use crate::report::{Event, Reporter};
use crate::rtc::{CivilTimestamp, ClockError, TimeSource};
use crate::schedule::{DailyTrigger, TimeOfDay};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeviceConfig {
    pub fix: GeoFix,
    pub trigger_at: TimeOfDay,
    /// Pause after a press before the button is sampled again.
    pub debounce_ms: u32,
    /// Pause after the daily calculation so the trigger second can pass.
    pub settle_ms: u32,
}

impl DeviceConfig {
    pub const DEFAULT: DeviceConfig = DeviceConfig {
        fix: GeoFix::new(44.654380, -84.136089),
        trigger_at: TimeOfDay::new(3, 0, 0),
        debounce_ms: 50,
        settle_ms: 1000,
    };
}

impl Default for DeviceConfig {
    fn default() -> Self {
        DeviceConfig::DEFAULT
    }
}

/// What one poll produced.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Step {
    pub declination: Option<f64>,
    pub heartbeat: Option<Heartbeat>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeviceState {
    pub trigger: DailyTrigger,
    pub minutes: MinuteWatch,
    pub brightness: BrightnessLevel,
    pub button: PressDetector,
}

impl DeviceState {
    pub fn new(trigger_at: TimeOfDay) -> DeviceState {
        DeviceState {
            trigger: DailyTrigger::new(trigger_at),
            minutes: MinuteWatch::new(),
            brightness: BrightnessLevel::FULL,
            button: PressDetector::new(),
        }
    }

    pub fn step(&mut self, now: &CivilTimestamp, fix: &GeoFix) -> Step {
        Step {
            declination: self.trigger.poll(now).then(|| declination(now, fix)),
            heartbeat: self.minutes.observe(now),
        }
    }

    /// Advance to the next brightness level.
    pub fn press(&mut self) -> BrightnessLevel {
        self.brightness = self.brightness.next();
        self.brightness
    }
}

pub struct CosmicClock<T, B, P, D> {
    clock: T,
    button: B,
    light: Dimmer<P>,
    delay: D,
    config: DeviceConfig,
    state: DeviceState,
}

impl<T, B, P, D> CosmicClock<T, B, P, D>
where
    T: TimeSource,
    B: InputPin,
    P: SetDutyCycle,
    D: DelayNs,
{
    pub fn new(clock: T, button: B, pwm: P, delay: D, config: DeviceConfig) -> Self {
        CosmicClock {
            clock,
            button,
            light: Dimmer::new(pwm),
            delay,
            config,
            state: DeviceState::new(config.trigger_at),
        }
    }

    pub fn state(&self) -> &DeviceState {
        &self.state
    }

    /// Bring the clock up and switch the light on at full power.
    ///
    /// `seed` is written to the clock only when it reports a power loss. Any
    /// clock failure here is fatal: `ClockUnavailable` is reported and the
    /// error returned for the caller to halt on.
    pub fn start<R: Reporter>(
        &mut self,
        seed: &CivilTimestamp,
        reporter: &mut R,
    ) -> Result<(), ClockError<T::Error>> {
        if let Err(e) = self.seed_if_needed(seed) {
            log::error!("Clock start failed: {:?}", e);
            reporter.report(&Event::ClockUnavailable);
            return Err(ClockError::Unavailable(e));
        }
        self.set_light();
        reporter.report(&Event::Startup);
        Ok(())
    }

    fn seed_if_needed(&mut self, seed: &CivilTimestamp) -> Result<(), T::Error> {
        if self.clock.lost_power()? {
            log::warn!("Clock lost power, setting it to {}", seed);
            self.clock.adjust(seed)?;
        }
        Ok(())
    }

    /// One pass of the main loop: read the clock once, handle the button, run
    /// the daily trigger and the heartbeat.
    pub fn poll<R: Reporter>(&mut self, reporter: &mut R) -> Result<Step, ClockError<T::Error>> {
        let now = self.clock.now().map_err(ClockError::Read)?;

        let pressed = match self.button.is_low() {
            Ok(pressed) => pressed,
            Err(e) => {
                log::warn!("Button read failed: {:?}", e);
                false
            }
        };
        if self.state.button.sample(pressed) {
            self.delay.delay_ms(self.config.debounce_ms);
            let level = self.state.press();
            self.set_light();
            reporter.report(&Event::Brightness(level));
        }

        let step = self.state.step(&now, &self.config.fix);
        if let Some(degrees) = step.declination {
            log::info!("Daily calculation for {}", now);
            reporter.report(&Event::CalculationBanner(self.config.trigger_at));
            reporter.report(&Event::Declination(degrees));
            self.delay.delay_ms(self.config.settle_ms);
        }
        if let Some(beat) = step.heartbeat {
            reporter.report(&Event::Heartbeat(beat));
        }
        Ok(step)
    }

    fn set_light(&mut self) {
        if let Err(e) = self.light.apply(self.state.brightness) {
            log::warn!("Setting brightness {} failed: {:?}", self.state.brightness, e);
        }
    }

    pub fn release(self) -> (T, B, P, D) {
        (self.clock, self.button, self.light.release(), self.delay)
    }
}
