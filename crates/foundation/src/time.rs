use serde::{Deserialize, Serialize};

/// Day of the week, Monday first.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    /// 0 for Monday through 6 for Sunday.
    pub fn index_from_monday(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
            Weekday::Saturday => "Saturday",
            Weekday::Sunday => "Sunday",
        }
    }
}

/// Proleptic Gregorian calendar date.
///
/// Rendering takes "today" as one of these instead of reading the clock, so a
/// page renders identically for a given date.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CivilDate {
    pub year: i32,
    pub month: u8,
    pub day: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateError {
    InvalidMonth(u8),
    InvalidDay { month: u8, day: u8 },
    Malformed(String),
}

impl std::fmt::Display for DateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DateError::InvalidMonth(m) => write!(f, "month {m} outside 1..=12"),
            DateError::InvalidDay { month, day } => write!(f, "day {day} invalid for month {month}"),
            DateError::Malformed(raw) => write!(f, "expected YYYY-MM-DD, got {raw:?}"),
        }
    }
}

impl std::error::Error for DateError {}

impl CivilDate {
    pub fn new(year: i32, month: u8, day: u8) -> Result<Self, DateError> {
        if !(1..=12).contains(&month) {
            return Err(DateError::InvalidMonth(month));
        }
        if day == 0 || day > days_in_month(year, month) {
            return Err(DateError::InvalidDay { month, day });
        }
        Ok(Self { year, month, day })
    }

    /// Parses `YYYY-MM-DD`.
    pub fn parse(raw: &str) -> Result<Self, DateError> {
        let malformed = || DateError::Malformed(raw.to_string());
        let mut parts = raw.trim().splitn(3, '-');
        let year = parts
            .next()
            .and_then(|p| p.parse::<i32>().ok())
            .ok_or_else(malformed)?;
        let month = parts
            .next()
            .and_then(|p| p.parse::<u8>().ok())
            .ok_or_else(malformed)?;
        let day = parts
            .next()
            .and_then(|p| p.parse::<u8>().ok())
            .ok_or_else(malformed)?;
        Self::new(year, month, day)
    }

    /// Date for a count of days since 1970-01-01.
    pub fn from_days_since_epoch(days: i64) -> Self {
        // Inverse of `days_since_epoch` (civil-from-days).
        let z = days + 719_468;
        let era = z.div_euclid(146_097);
        let doe = z.rem_euclid(146_097);
        let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
        let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
        let mp = (5 * doy + 2) / 153;
        let day = (doy - (153 * mp + 2) / 5 + 1) as u8;
        let month = (if mp < 10 { mp + 3 } else { mp - 9 }) as u8;
        let year = yoe + era * 400 + i64::from(month <= 2);
        Self {
            year: year as i32,
            month,
            day,
        }
    }

    pub fn days_since_epoch(self) -> i64 {
        let m = i64::from(self.month);
        let d = i64::from(self.day);
        let y = i64::from(self.year) - i64::from(m <= 2);
        let era = y.div_euclid(400);
        let yoe = y.rem_euclid(400);
        let mp = (m + 9) % 12;
        let doy = (153 * mp + 2) / 5 + d - 1;
        let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
        era * 146_097 + doe - 719_468
    }

    pub fn weekday(self) -> Weekday {
        // 1970-01-01 was a Thursday.
        let idx = (self.days_since_epoch() + 3).rem_euclid(7) as usize;
        Weekday::ALL[idx]
    }
}

impl std::fmt::Display for CivilDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

fn days_in_month(year: i32, month: u8) -> u8 {
    match month {
        2 if is_leap_year(year) => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

/// Display form of a historical year: negative years read as BCE.
pub fn format_year(year: i64) -> String {
    if year < 0 {
        format!("{} BCE", -year)
    } else {
        year.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::{CivilDate, DateError, Weekday, format_year};

    #[test]
    fn weekday_of_known_dates() {
        assert_eq!(CivilDate::new(1970, 1, 1).unwrap().weekday(), Weekday::Thursday);
        assert_eq!(CivilDate::new(2000, 2, 29).unwrap().weekday(), Weekday::Tuesday);
        assert_eq!(CivilDate::new(2026, 10, 19).unwrap().weekday(), Weekday::Monday);
        assert_eq!(CivilDate::new(1969, 12, 31).unwrap().weekday(), Weekday::Wednesday);
    }

    #[test]
    fn rejects_impossible_dates() {
        assert_eq!(CivilDate::new(2023, 13, 1), Err(DateError::InvalidMonth(13)));
        assert_eq!(
            CivilDate::new(2023, 2, 29),
            Err(DateError::InvalidDay { month: 2, day: 29 })
        );
        assert!(CivilDate::new(2024, 2, 29).is_ok());
        assert!(matches!(
            CivilDate::parse("2024/01/01"),
            Err(DateError::Malformed(_))
        ));
    }

    #[test]
    fn parse_and_display_round_trip() {
        let d = CivilDate::parse("2026-03-05").expect("parse");
        assert_eq!(d.to_string(), "2026-03-05");
    }

    #[test]
    fn days_since_epoch_inverts() {
        for days in [-800_000i64, -1, 0, 59, 10_957, 20_745] {
            let d = CivilDate::from_days_since_epoch(days);
            assert_eq!(d.days_since_epoch(), days, "{d}");
        }
        assert_eq!(
            CivilDate::from_days_since_epoch(0),
            CivilDate::new(1970, 1, 1).unwrap()
        );
    }

    #[test]
    fn formats_bce_years() {
        assert_eq!(format_year(-146), "146 BCE");
        assert_eq!(format_year(1062), "1062");
    }
}
