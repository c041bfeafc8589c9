#![cfg_attr(not(test), no_std)]

pub mod astronomy;
pub mod brightness;
pub mod device;
pub mod heartbeat;
pub mod report;
pub mod rtc;
pub mod schedule;

pub use astronomy::{declination, julian_day_number, GeoFix};
pub use device::{CosmicClock, DeviceConfig, DeviceState, Step};
pub use report::{Event, Reporter};
pub use rtc::{CivilTimestamp, ClockError, TimeSource};
pub use schedule::{DailyTrigger, TimeOfDay};
