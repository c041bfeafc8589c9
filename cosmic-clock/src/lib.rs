#![no_std]

use cosmic_clock_lib::CivilTimestamp;
use embedded_hal::pwm::{Error, ErrorKind, ErrorType, SetDutyCycle};
use esp_hal::ledc::channel::{Channel, ChannelHW};
use esp_hal::ledc::LowSpeed;

include!(concat!(env!("OUT_DIR"), "/build_time.rs"));

/// LEDC channel resolution, the timer must be configured with `Duty8Bit`.
pub const DUTY_MAX: u16 = 255;

#[derive(Debug)]
pub struct MyError(ErrorKind);

impl Error for MyError {
    fn kind(&self) -> ErrorKind {
        self.0
    }
}

/// Drives the indicator LED through a low speed LEDC channel at the raw
/// hardware duty value instead of the whole-percent `set_duty`.
pub struct LedcPwm<'d>(pub Channel<'d, LowSpeed>);

impl ErrorType for LedcPwm<'_> {
    type Error = MyError;
}

impl SetDutyCycle for LedcPwm<'_> {
    fn max_duty_cycle(&self) -> u16 {
        DUTY_MAX
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Self::Error> {
        if duty > DUTY_MAX {
            return Err(MyError(ErrorKind::Other));
        }
        self.0.set_duty_hw(duty.into());
        Ok(())
    }
}
