//! Calendar-aware offsets.
//!
//! Offsets are written as an integer magnitude followed by a unit code:
//! `y` (years) and `m` (months) are calendar offsets that respect leap years
//! and month lengths, clamping the day of month when needed
//! (2020-02-29 + `1y` = 2021-02-28). `w`, `d`, `h`, `min`, `s`, `ms` and
//! `us` are fixed durations. Units are case-insensitive, and the fixed units
//! also accept their long names (`7days`, `2weeks`, `1hour`, `30minutes`,
//! `10seconds`) along with `t` for minutes (`30T`).

use crate::error::{Result, ValidationError};
use chrono::{Months, NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A calendar or fixed-length offset applied to window bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum CalendarOffset {
    /// Whole calendar years
    Years(u32),
    /// Whole calendar months
    Months(u32),
    /// Fixed duration
    Fixed(TimeDelta),
}

impl CalendarOffset {
    /// Offset of `n` calendar years.
    pub const fn years(n: u32) -> Self {
        Self::Years(n)
    }

    /// Offset of `n` calendar months.
    pub const fn months(n: u32) -> Self {
        Self::Months(n)
    }

    /// Parse an offset such as `1y`, `6m`, `2w`, `10d`, `12h`, `30min`.
    ///
    /// # Errors
    ///
    /// [`ValidationError::InvalidStepFormat`] when the string does not start
    /// with a non-negative integer or the unit is missing or unknown.
    pub fn parse(raw: &str) -> Result<Self> {
        let invalid = || ValidationError::InvalidStepFormat(raw.to_string());

        let trimmed = raw.trim();
        let digits = trimmed
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(trimmed.len());
        if digits == 0 {
            return Err(invalid());
        }
        let magnitude: u32 = trimmed[..digits].parse().map_err(|_| invalid())?;
        let unit = trimmed[digits..].trim().to_ascii_lowercase();

        let fixed = |delta: Option<TimeDelta>| delta.map(Self::Fixed).ok_or_else(invalid);
        let n = i64::from(magnitude);
        match unit.as_str() {
            "y" => Ok(Self::Years(magnitude)),
            "m" => Ok(Self::Months(magnitude)),
            "w" | "week" | "weeks" => fixed(TimeDelta::try_weeks(n)),
            "d" | "day" | "days" => fixed(TimeDelta::try_days(n)),
            "h" | "hour" | "hours" => fixed(TimeDelta::try_hours(n)),
            "min" | "t" | "minute" | "minutes" => fixed(TimeDelta::try_minutes(n)),
            "s" | "second" | "seconds" => fixed(TimeDelta::try_seconds(n)),
            "ms" => fixed(TimeDelta::try_milliseconds(n)),
            "us" => fixed(Some(TimeDelta::microseconds(n))),
            _ => Err(invalid()),
        }
    }

    /// True for an offset that never advances a bound.
    pub fn is_zero(&self) -> bool {
        match self {
            Self::Years(n) | Self::Months(n) => *n == 0,
            Self::Fixed(delta) => delta.is_zero(),
        }
    }

    /// Apply the offset to `ts`, or `None` past chrono's representable range.
    pub fn apply(&self, ts: NaiveDateTime) -> Option<NaiveDateTime> {
        match self {
            Self::Years(n) => ts.checked_add_months(Months::new(n.checked_mul(12)?)),
            Self::Months(n) => ts.checked_add_months(Months::new(*n)),
            Self::Fixed(delta) => ts.checked_add_signed(*delta),
        }
    }
}

impl fmt::Display for CalendarOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Years(n) => write!(f, "{n}y"),
            Self::Months(n) => write!(f, "{n}m"),
            Self::Fixed(delta) => {
                if let Some(us) = delta.num_microseconds().filter(|us| us % 1_000_000 != 0) {
                    return if us % 1_000 == 0 {
                        write!(f, "{}ms", us / 1_000)
                    } else {
                        write!(f, "{us}us")
                    };
                }
                let secs = delta.num_seconds();
                if secs % (7 * 86_400) == 0 {
                    write!(f, "{}w", secs / (7 * 86_400))
                } else if secs % 86_400 == 0 {
                    write!(f, "{}d", secs / 86_400)
                } else if secs % 3_600 == 0 {
                    write!(f, "{}h", secs / 3_600)
                } else if secs % 60 == 0 {
                    write!(f, "{}min", secs / 60)
                } else {
                    write!(f, "{secs}s")
                }
            }
        }
    }
}

impl FromStr for CalendarOffset {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for CalendarOffset {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<CalendarOffset> for String {
    fn from(offset: CalendarOffset) -> Self {
        offset.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};
    use rstest::rstest;

    fn day(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_time(NaiveTime::MIN)
    }

    #[rstest]
    #[case("1y", CalendarOffset::Years(1))]
    #[case("12m", CalendarOffset::Months(12))]
    #[case("3M", CalendarOffset::Months(3))]
    #[case(" 2y ", CalendarOffset::Years(2))]
    #[case("2w", CalendarOffset::Fixed(TimeDelta::weeks(2)))]
    #[case("10d", CalendarOffset::Fixed(TimeDelta::days(10)))]
    #[case("12h", CalendarOffset::Fixed(TimeDelta::hours(12)))]
    #[case("30min", CalendarOffset::Fixed(TimeDelta::minutes(30)))]
    #[case("45s", CalendarOffset::Fixed(TimeDelta::seconds(45)))]
    #[case("0y", CalendarOffset::Years(0))]
    #[case("1D", CalendarOffset::Fixed(TimeDelta::days(1)))]
    #[case("1day", CalendarOffset::Fixed(TimeDelta::days(1)))]
    #[case("7days", CalendarOffset::Fixed(TimeDelta::days(7)))]
    #[case("2weeks", CalendarOffset::Fixed(TimeDelta::weeks(2)))]
    #[case("1 week", CalendarOffset::Fixed(TimeDelta::weeks(1)))]
    #[case("6hours", CalendarOffset::Fixed(TimeDelta::hours(6)))]
    #[case("30T", CalendarOffset::Fixed(TimeDelta::minutes(30)))]
    #[case("15minutes", CalendarOffset::Fixed(TimeDelta::minutes(15)))]
    #[case("10seconds", CalendarOffset::Fixed(TimeDelta::seconds(10)))]
    #[case("500ms", CalendarOffset::Fixed(TimeDelta::milliseconds(500)))]
    #[case("250us", CalendarOffset::Fixed(TimeDelta::microseconds(250)))]
    fn test_parse(#[case] raw: &str, #[case] expected: CalendarOffset) {
        assert_eq!(CalendarOffset::parse(raw).unwrap(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("y")]
    #[case("-1y")]
    #[case("1.5y")]
    #[case("7")]
    #[case("1q")]
    #[case("1dayz")]
    #[case("99999999999y")]
    fn test_parse_rejects(#[case] raw: &str) {
        assert!(matches!(
            CalendarOffset::parse(raw),
            Err(ValidationError::InvalidStepFormat(_))
        ));
    }

    #[test]
    fn test_years_respect_leap_days() {
        let offset = CalendarOffset::years(1);
        assert_eq!(offset.apply(day(2020, 2, 29)), Some(day(2021, 2, 28)));
        assert_eq!(offset.apply(day(2019, 3, 1)), Some(day(2020, 3, 1)));

        // 2020 is 366 days long; a fixed 365-day offset would land on Dec 31
        assert_eq!(offset.apply(day(2020, 1, 1)), Some(day(2021, 1, 1)));
    }

    #[test]
    fn test_months_clamp_to_month_end() {
        let offset = CalendarOffset::months(1);
        assert_eq!(offset.apply(day(2021, 1, 31)), Some(day(2021, 2, 28)));
        assert_eq!(offset.apply(day(2020, 1, 31)), Some(day(2020, 2, 29)));
        assert_eq!(offset.apply(day(2021, 3, 31)), Some(day(2021, 4, 30)));
    }

    #[test]
    fn test_apply_overflow_is_none() {
        assert_eq!(CalendarOffset::years(1).apply(NaiveDateTime::MAX), None);
        assert_eq!(
            CalendarOffset::Fixed(TimeDelta::days(1)).apply(NaiveDateTime::MAX),
            None
        );
    }

    #[test]
    fn test_zero() {
        assert!(CalendarOffset::years(0).is_zero());
        assert!(CalendarOffset::parse("0d").unwrap().is_zero());
        assert!(!CalendarOffset::months(1).is_zero());
    }

    #[test]
    fn test_display_roundtrips() {
        for raw in ["1y", "6m", "2w", "10d", "12h", "30min", "45s", "500ms", "250us"] {
            let offset = CalendarOffset::parse(raw).unwrap();
            assert_eq!(offset.to_string(), raw);
        }
    }

    #[test]
    fn test_long_units_display_short() {
        assert_eq!(CalendarOffset::parse("7days").unwrap().to_string(), "1w");
        assert_eq!(CalendarOffset::parse("30T").unwrap().to_string(), "30min");
        assert_eq!(CalendarOffset::parse("1500ms").unwrap().to_string(), "1500ms");
        assert_eq!(CalendarOffset::parse("2000ms").unwrap().to_string(), "2s");
    }

    #[test]
    fn test_serde_as_string() {
        let json = serde_json::to_string(&CalendarOffset::months(3)).unwrap();
        assert_eq!(json, "\"3m\"");

        let parsed: CalendarOffset = serde_json::from_str("\"2y\"").unwrap();
        assert_eq!(parsed, CalendarOffset::years(2));

        assert!(serde_json::from_str::<CalendarOffset>("\"2x\"").is_err());
    }
}
