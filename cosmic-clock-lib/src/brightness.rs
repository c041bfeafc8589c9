//!
//! # Indicator light
//! The light is a single PWM driven LED stepped through 7 brightness levels by
//! a push button. Each press halves the light, and the last step turns it off:
//!
//! Level: 0,    1,   2,   3,     4,    5,     6
//! Duty:  100%, 50%, 25%, 12.5%, 6.25%, 3.125%, 0%
//!
//! Duty values are kept on an 8-bit scale (255 is fully on) and handed to the
//! PWM as a fraction of 255.
//!
//! The button pulls its pin low when pressed. A press is counted on the
//! released -> pressed transition only, so holding the button does not keep
//! stepping.

use core::fmt;

use embedded_hal::pwm::SetDutyCycle;

pub const LEVELS: usize = 7;

pub const FULL_DUTY: u8 = 255;

pub const DUTY: [u8; LEVELS] = [255, 128, 64, 32, 16, 8, 0];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BrightnessLevel(u8);

impl BrightnessLevel {
    pub const FULL: BrightnessLevel = BrightnessLevel(0);
    pub const OFF: BrightnessLevel = BrightnessLevel(LEVELS as u8 - 1);

    /// `None` for an index past the last level.
    pub const fn new(index: u8) -> Option<BrightnessLevel> {
        if (index as usize) < LEVELS {
            Some(BrightnessLevel(index))
        } else {
            None
        }
    }

    pub fn index(&self) -> u8 {
        self.0
    }

    /// The level after one more press, wrapping from off back to full.
    pub fn next(&self) -> BrightnessLevel {
        BrightnessLevel((self.0 + 1) % LEVELS as u8)
    }

    pub fn duty(&self) -> u8 {
        DUTY[self.0 as usize]
    }
}

impl fmt::Display for BrightnessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Turns raw button samples into press events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PressDetector {
    was_pressed: bool,
}

impl Default for PressDetector {
    fn default() -> Self {
        PressDetector::new()
    }
}

impl PressDetector {
    pub const fn new() -> PressDetector {
        PressDetector { was_pressed: false }
    }

    /// `pressed` is the current pin state (low = pressed). True on a new press.
    pub fn sample(&mut self, pressed: bool) -> bool {
        let edge = pressed && !self.was_pressed;
        self.was_pressed = pressed;
        edge
    }
}

pub struct Dimmer<P> {
    pwm: P,
}

impl<P> Dimmer<P> {
    pub fn new(pwm: P) -> Dimmer<P> {
        Dimmer { pwm }
    }

    pub fn release(self) -> P {
        self.pwm
    }
}

impl<P: SetDutyCycle> Dimmer<P> {
    pub fn apply(&mut self, level: BrightnessLevel) -> Result<(), P::Error> {
        self.pwm
            .set_duty_cycle_fraction(level.duty().into(), FULL_DUTY.into())
    }
}

#[cfg(test)]
mod tests {
    use core::convert::Infallible;

    use embedded_hal::pwm::ErrorType;

    use super::*;

    struct RecordingPwm {
        max: u16,
        duty: u16,
    }

    impl ErrorType for RecordingPwm {
        type Error = Infallible;
    }

    impl SetDutyCycle for RecordingPwm {
        fn max_duty_cycle(&self) -> u16 {
            self.max
        }

        fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Self::Error> {
            self.duty = duty;
            Ok(())
        }
    }

    #[test]
    fn seven_presses_wrap_back_to_full() {
        let mut level = BrightnessLevel::FULL;
        let mut seen = [0; LEVELS];
        for s in seen.iter_mut() {
            level = level.next();
            *s = level.index();
        }
        assert_eq!(seen, [1, 2, 3, 4, 5, 6, 0]);
        assert_eq!(level, BrightnessLevel::FULL);
        assert_eq!(BrightnessLevel::OFF.next(), BrightnessLevel::FULL);
    }

    #[test]
    fn duty_halves_per_level_then_turns_off() {
        let percent: [f64; LEVELS] = core::array::from_fn(|i| {
            BrightnessLevel::new(i as u8).unwrap().duty() as f64 * 100.0 / 255.0
        });
        let expected = [100.0, 50.0, 25.0, 12.5, 6.25, 3.125, 0.0];
        for (p, e) in percent.iter().zip(expected) {
            assert!((p - e).abs() < 0.2, "{p} vs {e}");
        }
        assert_eq!(BrightnessLevel::OFF.duty(), 0);
    }

    #[test]
    fn rejects_out_of_range_index() {
        assert_eq!(BrightnessLevel::new(6), Some(BrightnessLevel::OFF));
        assert_eq!(BrightnessLevel::new(7), None);
    }

    #[test]
    fn counts_only_the_press_edge() {
        let mut detector = PressDetector::new();
        let samples = [false, true, true, true, false, false, true, false];
        let presses = samples.iter().filter(|&&s| detector.sample(s)).count();
        assert_eq!(presses, 2);
    }

    #[test]
    fn dimmer_scales_duty_to_pwm_range() {
        let mut dimmer = Dimmer::new(RecordingPwm { max: 255, duty: 0 });
        dimmer.apply(BrightnessLevel::FULL).unwrap();
        assert_eq!(dimmer.pwm.duty, 255);
        dimmer.apply(BrightnessLevel::new(3).unwrap()).unwrap();
        assert_eq!(dimmer.pwm.duty, 32);

        let mut dimmer = Dimmer::new(RecordingPwm { max: 1000, duty: 7 });
        dimmer.apply(BrightnessLevel::new(1).unwrap()).unwrap();
        assert_eq!(dimmer.pwm.duty, 501);
        dimmer.apply(BrightnessLevel::OFF).unwrap();
        assert_eq!(dimmer.release().duty, 0);
    }
}
