use core::fmt;

use crate::rtc::CivilTimestamp;

/// Hour and minute of a minute change, shown as `H:MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Heartbeat {
    pub hour: u8,
    pub minute: u8,
}

impl fmt::Display for Heartbeat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{:02}", self.hour, self.minute)
    }
}

/// Remembers the last minute seen so a heartbeat goes out once per minute.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MinuteWatch {
    last_minute: Option<u8>,
}

impl MinuteWatch {
    pub const fn new() -> MinuteWatch {
        MinuteWatch { last_minute: None }
    }

    pub fn observe(&mut self, now: &CivilTimestamp) -> Option<Heartbeat> {
        if self.last_minute == Some(now.minute) {
            return None;
        }
        self.last_minute = Some(now.minute);
        Some(Heartbeat {
            hour: now.hour,
            minute: now.minute,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(hour: u8, minute: u8, second: u8) -> CivilTimestamp {
        CivilTimestamp::new(2025, 1, 17, hour, minute, second)
    }

    #[test]
    fn first_poll_always_beats() {
        let mut watch = MinuteWatch::new();
        assert_eq!(
            watch.observe(&at(23, 0, 41)),
            Some(Heartbeat { hour: 23, minute: 0 })
        );
    }

    #[test]
    fn beats_once_per_minute() {
        let mut watch = MinuteWatch::new();
        let beats = [
            at(2, 58, 59),
            at(2, 58, 59),
            at(2, 59, 0),
            at(2, 59, 30),
            at(2, 59, 59),
            at(3, 0, 0),
            at(3, 0, 0),
        ]
        .iter()
        .filter_map(|ts| watch.observe(ts))
        .count();
        assert_eq!(beats, 3);
    }

    #[test]
    fn same_minute_in_another_hour_is_silent() {
        // Only the minute is compared, a reading exactly one hour later looks unchanged
        let mut watch = MinuteWatch::new();
        assert!(watch.observe(&at(4, 10, 0)).is_some());
        assert!(watch.observe(&at(5, 10, 0)).is_none());
    }

    #[test]
    fn pads_minutes_but_not_hours() {
        assert_eq!(Heartbeat { hour: 3, minute: 5 }.to_string(), "3:05");
        assert_eq!(Heartbeat { hour: 12, minute: 0 }.to_string(), "12:00");
        assert_eq!(Heartbeat { hour: 0, minute: 0 }.to_string(), "0:00");
        assert_eq!(Heartbeat { hour: 23, minute: 59 }.to_string(), "23:59");
    }
}
