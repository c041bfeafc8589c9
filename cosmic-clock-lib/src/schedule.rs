//! Once a day trigger driven by a polled clock.
//!
//! The clock is read many times per second and only has one second resolution,
//! so "now equals the target" holds for a whole run of polls. [`DailyTrigger`]
//! turns that level into a single edge: it fires on the first matching poll and
//! does not re-arm until a poll no longer matches.
//!
//! A poll loop that skips the target second entirely never sees a match and
//! does not fire that day. Setting the clock back across the target lets it
//! fire a second time. Both are accepted.

use core::fmt;

use crate::rtc::CivilTimestamp;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay {
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl TimeOfDay {
    pub const fn new(hour: u8, minute: u8, second: u8) -> TimeOfDay {
        TimeOfDay {
            hour,
            minute,
            second,
        }
    }

    pub fn matches(&self, ts: &CivilTimestamp) -> bool {
        ts.hour == self.hour && ts.minute == self.minute && ts.second == self.second
    }
}

/// 12 hour clock without seconds, e.g. `3:00 AM`.
impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let meridiem = if self.hour < 12 { "AM" } else { "PM" };
        let hour = match self.hour % 12 {
            0 => 12,
            h => h,
        };
        write!(f, "{}:{:02} {}", hour, self.minute, meridiem)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TriggerState {
    #[default]
    Idle,
    /// Fired on the current match, waiting for the clock to move past it.
    Fired,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyTrigger {
    target: TimeOfDay,
    state: TriggerState,
}

impl DailyTrigger {
    pub const fn new(target: TimeOfDay) -> DailyTrigger {
        DailyTrigger {
            target,
            state: TriggerState::Idle,
        }
    }

    pub fn state(&self) -> TriggerState {
        self.state
    }

    /// Feed one clock reading. Returns true on the single poll that should run
    /// the daily calculation.
    pub fn poll(&mut self, now: &CivilTimestamp) -> bool {
        let matched = self.target.matches(now);
        match (self.state, matched) {
            (TriggerState::Idle, true) => {
                self.state = TriggerState::Fired;
                log::debug!("Daily trigger fired at {}", now);
                true
            }
            (TriggerState::Fired, false) => {
                self.state = TriggerState::Idle;
                log::debug!("Daily trigger re-armed at {}", now);
                false
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const THREE_AM: TimeOfDay = TimeOfDay::new(3, 0, 0);

    fn at(day: u8, hour: u8, minute: u8, second: u8) -> CivilTimestamp {
        CivilTimestamp::new(2025, 6, day, hour, minute, second)
    }

    fn count_fires<'a>(
        trigger: &mut DailyTrigger,
        polls: impl IntoIterator<Item = &'a CivilTimestamp>,
    ) -> usize {
        polls.into_iter().filter(|ts| trigger.poll(ts)).count()
    }

    #[test]
    fn fires_once_for_many_polls_in_the_target_second() {
        let mut trigger = DailyTrigger::new(THREE_AM);
        let polls = [at(1, 3, 0, 0); 100];
        assert_eq!(count_fires(&mut trigger, &polls), 1);
        assert_eq!(trigger.state(), TriggerState::Fired);
    }

    #[test]
    fn fires_again_the_next_day() {
        let mut trigger = DailyTrigger::new(THREE_AM);
        let polls = [
            at(1, 2, 59, 59),
            at(1, 3, 0, 0),
            at(1, 3, 0, 0),
            at(1, 3, 0, 1),
            at(1, 12, 0, 0),
            at(2, 2, 59, 59),
            at(2, 3, 0, 0),
            at(2, 3, 0, 0),
            at(2, 3, 0, 1),
        ];
        assert_eq!(count_fires(&mut trigger, &polls), 2);
        assert_eq!(trigger.state(), TriggerState::Idle);
    }

    #[test]
    fn skipped_target_second_does_not_fire() {
        let mut trigger = DailyTrigger::new(THREE_AM);
        let polls = [at(1, 2, 59, 59), at(1, 3, 0, 1), at(1, 3, 0, 2)];
        assert_eq!(count_fires(&mut trigger, &polls), 0);
    }

    #[test]
    fn rearm_poll_does_not_fire() {
        let mut trigger = DailyTrigger::new(THREE_AM);
        assert!(trigger.poll(&at(1, 3, 0, 0)));
        assert!(!trigger.poll(&at(1, 3, 0, 1)));
        assert_eq!(trigger.state(), TriggerState::Idle);
    }

    #[test]
    fn other_hours_with_matching_seconds_do_not_fire() {
        let mut trigger = DailyTrigger::new(THREE_AM);
        let polls = [at(1, 4, 0, 0), at(1, 3, 1, 0), at(1, 15, 0, 0)];
        assert_eq!(count_fires(&mut trigger, &polls), 0);
    }

    #[test]
    fn clock_set_back_fires_twice_in_one_day() {
        let mut trigger = DailyTrigger::new(THREE_AM);
        let polls = [
            at(1, 3, 0, 0),
            at(1, 3, 0, 1),
            at(1, 2, 59, 58),
            at(1, 2, 59, 59),
            at(1, 3, 0, 0),
        ];
        assert_eq!(count_fires(&mut trigger, &polls), 2);
    }

    #[test]
    fn custom_target() {
        let mut trigger = DailyTrigger::new(TimeOfDay::new(21, 30, 15));
        assert!(!trigger.poll(&at(1, 3, 0, 0)));
        assert!(trigger.poll(&at(1, 21, 30, 15)));
    }

    #[test]
    fn time_of_day_twelve_hour_display() {
        assert_eq!(THREE_AM.to_string(), "3:00 AM");
        assert_eq!(TimeOfDay::new(0, 5, 0).to_string(), "12:05 AM");
        assert_eq!(TimeOfDay::new(12, 0, 0).to_string(), "12:00 PM");
        assert_eq!(TimeOfDay::new(23, 45, 10).to_string(), "11:45 PM");
    }
}
