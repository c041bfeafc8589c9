//! Battery backed real-time clock access.
//!
//! The appliance only ever needs three things from its clock: the current time,
//! whether the time survived since it was last set, and a way to set it.
//! [`TimeSource`] captures that, and is implemented here for the MCP7940N.

use core::fmt;

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use embedded_hal_02::blocking::i2c::{Write, WriteRead};
use mcp794xx::ic::Mcp7940n;
use mcp794xx::interface::I2cInterface;
use mcp794xx::{DateTimeAccess, Mcp794xx};

/// SRAM address of the marker byte written once the time has been set.
pub const TIME_SET_ADDRESS: u8 = 0x20;
pub const TIME_SET: u8 = 0x54;

/// Wall clock reading with one second resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CivilTimestamp {
    pub year: i32,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl CivilTimestamp {
    pub const fn new(year: i32, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> Self {
        CivilTimestamp {
            year,
            month,
            day,
            hour,
            minute,
            second,
        }
    }

    /// `None` if the fields do not name a real calendar date and time.
    pub fn to_naive(&self) -> Option<NaiveDateTime> {
        NaiveDate::from_ymd_opt(self.year, self.month.into(), self.day.into())?.and_hms_opt(
            self.hour.into(),
            self.minute.into(),
            self.second.into(),
        )
    }
}

impl From<NaiveDateTime> for CivilTimestamp {
    fn from(value: NaiveDateTime) -> Self {
        CivilTimestamp {
            year: value.year(),
            month: value.month() as u8,
            day: value.day() as u8,
            hour: value.hour() as u8,
            minute: value.minute() as u8,
            second: value.second() as u8,
        }
    }
}

impl fmt::Display for CivilTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClockError<E> {
    /// The clock could not be brought up. Nothing else can run without it.
    Unavailable(E),
    /// A read or write failed after start-up.
    Read(E),
}

impl<E: fmt::Debug> fmt::Display for ClockError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClockError::Unavailable(e) => write!(f, "real-time clock unavailable: {e:?}"),
            ClockError::Read(e) => write!(f, "real-time clock access failed: {e:?}"),
        }
    }
}

pub trait TimeSource {
    type Error: fmt::Debug;

    fn now(&mut self) -> Result<CivilTimestamp, Self::Error>;

    /// True when the clock lost its reference since it was last set and the
    /// time it reports cannot be trusted.
    fn lost_power(&mut self) -> Result<bool, Self::Error>;

    fn adjust(&mut self, ts: &CivilTimestamp) -> Result<(), Self::Error>;
}

#[derive(Debug)]
pub enum Mcp7940nError<E> {
    Device(mcp794xx::Error<E>),
    /// The timestamp handed to `adjust` is not a calendar date.
    InvalidTimestamp(CivilTimestamp),
}

impl<E> From<mcp794xx::Error<E>> for Mcp7940nError<E> {
    fn from(value: mcp794xx::Error<E>) -> Self {
        Mcp7940nError::Device(value)
    }
}

/// The driver speaks the embedded-hal 0.2 blocking I2C traits.
impl<I2C, E> TimeSource for Mcp794xx<I2cInterface<I2C>, Mcp7940n>
where
    I2C: Write<Error = E> + WriteRead<Error = E>,
    E: fmt::Debug,
{
    type Error = Mcp7940nError<E>;

    fn now(&mut self) -> Result<CivilTimestamp, Self::Error> {
        Ok(self.datetime()?.into())
    }

    fn lost_power(&mut self) -> Result<bool, Self::Error> {
        // The marker lives in battery backed SRAM, it only survives if the time did
        Ok(self.read_sram_byte(TIME_SET_ADDRESS)? != TIME_SET)
    }

    fn adjust(&mut self, ts: &CivilTimestamp) -> Result<(), Self::Error> {
        let datetime = ts.to_naive().ok_or(Mcp7940nError::InvalidTimestamp(*ts))?;
        self.disable()?;
        // Wait for oscillator to stop
        while self.is_oscillator_running()? {}
        self.set_datetime(&datetime)?;
        self.enable()?;
        self.write_sram_byte(TIME_SET_ADDRESS, TIME_SET)?;
        log::info!("Clock set to {}", ts);
        Ok(())
    }
}
