use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use thiserror::Error;

/// Duration since the reference midnight of the timetable.
/// This corresponds to the "Time" notion found in gtfs stop_times.txt :
/// values above 24:00:00 are allowed, for trips running past midnight.
#[derive(
    Debug, Clone, Copy, Eq, PartialEq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct SecondsSinceDayStart {
    seconds: u32,
}

// 48h, so that a trip may run up to one full day past the reference midnight
const MAX_SECONDS_SINCE_DAY_START: u32 = 48 * 60 * 60;

#[derive(Debug, Eq, PartialEq, Clone, Copy, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct PositiveDuration {
    seconds: u32,
}

impl SecondsSinceDayStart {
    pub fn zero() -> Self {
        Self { seconds: 0 }
    }

    pub const fn from_hms(hours: u32, minutes: u32, seconds: u32) -> Self {
        Self {
            seconds: seconds + 60 * minutes + 60 * 60 * hours,
        }
    }

    pub fn from_seconds(seconds: u32) -> Option<Self> {
        if seconds > MAX_SECONDS_SINCE_DAY_START {
            None
        } else {
            Some(Self { seconds })
        }
    }

    pub fn total_seconds(&self) -> u32 {
        self.seconds
    }

    pub fn checked_sub(&self, duration: PositiveDuration) -> Option<SecondsSinceDayStart> {
        self.seconds
            .checked_sub(duration.seconds)
            .map(|seconds| Self { seconds })
    }

    pub fn duration_since(&self, earlier: &SecondsSinceDayStart) -> Option<PositiveDuration> {
        self.seconds
            .checked_sub(earlier.seconds)
            .map(|seconds| PositiveDuration { seconds })
    }
}

impl PositiveDuration {
    pub fn zero() -> Self {
        Self { seconds: 0 }
    }

    pub const fn from_hms(hours: u32, minutes: u32, seconds: u32) -> Self {
        Self {
            seconds: seconds + 60 * minutes + 60 * 60 * hours,
        }
    }

    pub const fn from_seconds(seconds: u32) -> Self {
        Self { seconds }
    }

    pub fn total_seconds(&self) -> u32 {
        self.seconds
    }

    pub fn is_zero(&self) -> bool {
        self.seconds == 0
    }
}

impl Display for SecondsSinceDayStart {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}",
            self.seconds / 60 / 60,
            self.seconds / 60 % 60,
            self.seconds % 60
        )
    }
}

impl Display for PositiveDuration {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let hours = self.seconds / (60 * 60);
        let minutes_in_secs = self.seconds % (60 * 60);
        let minutes = minutes_in_secs / 60;
        let seconds = minutes_in_secs % 60;
        if hours != 0 {
            write!(f, "{}h{:02}m{:02}s", hours, minutes, seconds)
        } else if minutes != 0 {
            write!(f, "{}m{:02}s", minutes, seconds)
        } else {
            write!(f, "{}s", seconds)
        }
    }
}

#[derive(Debug, Error, Eq, PartialEq)]
#[error("cannot parse `{0}` as a time, expected `HH:MM:SS` or `HH:MM`")]
pub struct TimeParseError(String);

impl FromStr for SecondsSinceDayStart {
    type Err = TimeParseError;

    // accepts `HH:MM:SS` or `HH:MM`, with hours possibly above 24
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || TimeParseError(s.to_string());
        let mut fields = s.split(':');
        let hours: u32 = fields.next().and_then(|f| f.parse().ok()).ok_or_else(err)?;
        let minutes: u32 = fields.next().and_then(|f| f.parse().ok()).ok_or_else(err)?;
        let seconds: u32 = match fields.next() {
            None => 0,
            Some(field) => field.parse().map_err(|_| err())?,
        };
        if fields.next().is_some() || minutes >= 60 || seconds >= 60 {
            return Err(err());
        }
        Self::from_seconds(hours * 3600 + minutes * 60 + seconds).ok_or_else(err)
    }
}

impl std::ops::Add<PositiveDuration> for SecondsSinceDayStart {
    type Output = Self;

    // saturates at the 48h cap, so an oversized duration cannot push a
    // time past the representable range
    fn add(self, rhs: PositiveDuration) -> Self::Output {
        Self {
            seconds: self
                .seconds
                .saturating_add(rhs.seconds)
                .min(MAX_SECONDS_SINCE_DAY_START),
        }
    }
}

impl std::ops::Add for PositiveDuration {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            seconds: self.seconds + rhs.seconds,
        }
    }
}

impl std::ops::Mul<u32> for PositiveDuration {
    type Output = Self;

    fn mul(self, rhs: u32) -> Self::Output {
        Self {
            seconds: self.seconds * rhs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_hms() {
        assert_eq!(
            "08:05:30".parse::<SecondsSinceDayStart>(),
            Ok(SecondsSinceDayStart::from_hms(8, 5, 30))
        );
        assert_eq!(
            "8:05".parse::<SecondsSinceDayStart>(),
            Ok(SecondsSinceDayStart::from_hms(8, 5, 0))
        );
        // past-midnight times are valid
        assert_eq!(
            "25:00:00".parse::<SecondsSinceDayStart>(),
            Ok(SecondsSinceDayStart::from_hms(25, 0, 0))
        );
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!("".parse::<SecondsSinceDayStart>().is_err());
        assert!("8".parse::<SecondsSinceDayStart>().is_err());
        assert!("08:61:00".parse::<SecondsSinceDayStart>().is_err());
        assert!("08:00:00:00".parse::<SecondsSinceDayStart>().is_err());
        assert!("49:00:00".parse::<SecondsSinceDayStart>().is_err());
    }

    #[test]
    fn display() {
        assert_eq!(
            SecondsSinceDayStart::from_hms(8, 5, 30).to_string(),
            "08:05:30"
        );
        assert_eq!(PositiveDuration::from_seconds(180).to_string(), "3m00s");
        assert_eq!(PositiveDuration::from_hms(1, 0, 5).to_string(), "1h00m05s");
    }

    #[test]
    fn add_saturates_at_the_cap() {
        let cap = SecondsSinceDayStart::from_seconds(MAX_SECONDS_SINCE_DAY_START).unwrap();
        let late = SecondsSinceDayStart::from_hms(47, 30, 0);
        assert_eq!(late + PositiveDuration::from_hms(2, 0, 0), cap);
        assert_eq!(cap + PositiveDuration::from_seconds(u32::MAX), cap);
    }

    #[test]
    fn duration_since() {
        let earlier = SecondsSinceDayStart::from_hms(8, 0, 0);
        let later = SecondsSinceDayStart::from_hms(8, 3, 0);
        assert_eq!(
            later.duration_since(&earlier),
            Some(PositiveDuration::from_seconds(180))
        );
        assert_eq!(earlier.duration_since(&later), None);
    }
}
