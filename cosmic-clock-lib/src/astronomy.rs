use core_maths::CoreFloat;

use crate::rtc::CivilTimestamp;

/// Julian Day of the J2000.0 epoch, 2000-01-01 12:00.
pub const J2000: f64 = 2_451_545.0;

pub const DAYS_PER_CENTURY: f64 = 36_525.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoFix {
    pub latitude: f64,
    /// Carried for configuration only, the declination does not depend on it.
    pub longitude: f64,
}

impl GeoFix {
    pub const fn new(latitude: f64, longitude: f64) -> GeoFix {
        GeoFix {
            latitude,
            longitude,
        }
    }
}

/// Gregorian calendar date to Julian Day Number.
///
/// January and February count as months 13 and 14 of the previous year so the
/// leap day lands at the end of the year.
///
/// `A = floor(Y/100)`, `B = 2 - A + floor(A/4)`
/// `JDN = floor(365.25(Y + 4716)) + floor(30.6001(M + 1)) + D + B - 1524`
pub fn julian_day_number(year: i32, month: u8, day: u8) -> i64 {
    let (year, month) = if month <= 2 {
        (year as i64 - 1, month as i64 + 12)
    } else {
        (year as i64, month as i64)
    };
    let a = year.div_euclid(100);
    let b = 2 - a + a.div_euclid(4);
    (365.25 * (year + 4716) as f64).floor() as i64
        + (30.6001 * (month + 1) as f64).floor() as i64
        + day as i64
        + b
        - 1524
}

pub fn fractional_day(hour: u8, minute: u8, second: u8) -> f64 {
    hour as f64 / 24.0 + minute as f64 / 1440.0 + second as f64 / 86_400.0
}

/// Astronomical Julian Day (epoch at midnight) of a civil timestamp.
pub fn julian_day(ts: &CivilTimestamp) -> f64 {
    julian_day_number(ts.year, ts.month, ts.day) as f64
        + fractional_day(ts.hour, ts.minute, ts.second)
        - 0.5
}

pub fn julian_centuries(jd: f64) -> f64 {
    (jd - J2000) / DAYS_PER_CENTURY
}

/// Low precision solar coordinates, all in degrees. Longitudes are not reduced
/// to [0, 360).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolarPosition {
    pub mean_longitude: f64,
    pub mean_anomaly: f64,
    pub equation_of_center: f64,
    pub true_longitude: f64,
    pub obliquity: f64,
}

impl SolarPosition {
    /// Declination in degrees: `asin(sin(ε) sin(λ))`
    pub fn declination(&self) -> f64 {
        (self.obliquity.to_radians().sin() * self.true_longitude.to_radians().sin())
            .asin()
            .to_degrees()
    }
}

/// `t` is in Julian centuries from J2000.0.
pub fn solar_position(t: f64) -> SolarPosition {
    let mean_longitude = 280.46646 + t * (36_000.76983 + t * 0.0003032);
    let mean_anomaly = 357.52911 + t * (35_999.05029 - 0.0001537 * t);
    let m = mean_anomaly.to_radians();
    let equation_of_center = (1.914602 - t * (0.004817 + 0.000014 * t)) * m.sin()
        + (0.019993 - 0.000101 * t) * (2.0 * m).sin();
    let obliquity = 23.439291 - 0.0130041 * t;

    SolarPosition {
        mean_longitude,
        mean_anomaly,
        equation_of_center,
        true_longitude: mean_longitude + equation_of_center,
        obliquity,
    }
}

/// Declination of the Sun in degrees at `ts`.
///
/// Only good to a few hundredths of a degree, which is all the appliance
/// reports. The observer position does not enter the formula.
pub fn declination(ts: &CivilTimestamp, _fix: &GeoFix) -> f64 {
    let t = julian_centuries(julian_day(ts));
    solar_position(t).declination()
}
