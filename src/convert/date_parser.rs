//! Ordered-trial date-time parsing.
//!
//! A cell is matched against [`DATE_FORMATS`] in order and the first
//! format that parses wins. Ambiguous numeric dates such as `03/04/2024`
//! are therefore always read month-first, because the US forms precede
//! the day-first ones.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DateFormat {
    /// `2006-01-02T15:04:05Z07:00`
    Rfc3339,
    /// `2006-01-02T15:04:05.999999999Z07:00`
    Rfc3339Fractional,
    /// `YYYY-MM-DD HH:MM:SS`
    SqlDateTime,
    /// `YYYY-MM-DD`
    IsoDate,
    /// `HH:MM:SS`, anchored on 0000-01-01
    TimeOnly,
    /// `MM/DD/YYYY`
    UsDate,
    /// `MM/DD/YYYY HH:MM:SS`
    UsDateTime,
    /// `DD/MM/YYYY`
    EuDate,
    /// `DD/MM/YYYY HH:MM:SS`
    EuDateTime,
}

/// Trial order. Do not reorder: earlier entries shadow later ones.
pub const DATE_FORMATS: [DateFormat; 9] = [
    DateFormat::Rfc3339,
    DateFormat::Rfc3339Fractional,
    DateFormat::SqlDateTime,
    DateFormat::IsoDate,
    DateFormat::TimeOnly,
    DateFormat::UsDate,
    DateFormat::UsDateTime,
    DateFormat::EuDate,
    DateFormat::EuDateTime,
];

impl DateFormat {
    /// Human-readable pattern, used in diagnostics.
    pub fn pattern(self) -> &'static str {
        match self {
            DateFormat::Rfc3339 => "RFC3339",
            DateFormat::Rfc3339Fractional => "RFC3339 with fractional seconds",
            DateFormat::SqlDateTime => "YYYY-MM-DD HH:MM:SS",
            DateFormat::IsoDate => "YYYY-MM-DD",
            DateFormat::TimeOnly => "HH:MM:SS",
            DateFormat::UsDate => "MM/DD/YYYY",
            DateFormat::UsDateTime => "MM/DD/YYYY HH:MM:SS",
            DateFormat::EuDate => "DD/MM/YYYY",
            DateFormat::EuDateTime => "DD/MM/YYYY HH:MM:SS",
        }
    }

    /// Fixed-width byte layout for the naive formats: `d` is one ASCII
    /// digit, anything else must match literally.
    fn layout(self) -> &'static str {
        match self {
            DateFormat::Rfc3339 | DateFormat::Rfc3339Fractional => RFC3339_PREFIX,
            DateFormat::SqlDateTime => "dddd-dd-dd dd:dd:dd",
            DateFormat::IsoDate => "dddd-dd-dd",
            DateFormat::TimeOnly => "dd:dd:dd",
            DateFormat::UsDate | DateFormat::EuDate => "dd/dd/dddd",
            DateFormat::UsDateTime | DateFormat::EuDateTime => "dd/dd/dddd dd:dd:dd",
        }
    }

    /// Parse `text` with exactly this format. Formats without an offset
    /// are read as UTC. Digit groups are fixed width and a leap second
    /// (`:60`) is rejected.
    pub fn parse(self, text: &str) -> Option<DateTime<FixedOffset>> {
        let parsed = match self {
            DateFormat::Rfc3339 | DateFormat::Rfc3339Fractional => {
                let fractional = rfc3339_shape(text)?;
                if fractional != (self == DateFormat::Rfc3339Fractional) {
                    return None;
                }
                DateTime::parse_from_rfc3339(text).ok()?
            }
            _ => {
                if !matches_layout(text.as_bytes(), self.layout().as_bytes()) {
                    return None;
                }
                self.parse_naive(text)?.and_utc().fixed_offset()
            }
        };
        // chrono folds a leap second into nanoseconds >= 1s
        if parsed.nanosecond() >= 1_000_000_000 {
            return None;
        }
        Some(parsed)
    }

    fn parse_naive(self, text: &str) -> Option<NaiveDateTime> {
        let naive = match self {
            DateFormat::SqlDateTime => {
                NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S").ok()?
            }
            DateFormat::IsoDate => NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()?
                .and_time(NaiveTime::MIN),
            DateFormat::TimeOnly => {
                let time = NaiveTime::parse_from_str(text, "%H:%M:%S").ok()?;
                NaiveDate::from_ymd_opt(0, 1, 1)?.and_time(time)
            }
            DateFormat::UsDate => NaiveDate::parse_from_str(text, "%m/%d/%Y")
                .ok()?
                .and_time(NaiveTime::MIN),
            DateFormat::UsDateTime => {
                NaiveDateTime::parse_from_str(text, "%m/%d/%Y %H:%M:%S").ok()?
            }
            DateFormat::EuDate => NaiveDate::parse_from_str(text, "%d/%m/%Y")
                .ok()?
                .and_time(NaiveTime::MIN),
            DateFormat::EuDateTime => {
                NaiveDateTime::parse_from_str(text, "%d/%m/%Y %H:%M:%S").ok()?
            }
            DateFormat::Rfc3339 | DateFormat::Rfc3339Fractional => return None,
        };
        Some(naive)
    }
}

const RFC3339_PREFIX: &str = "dddd-dd-ddTdd:dd:dd";

fn matches_layout(text: &[u8], layout: &[u8]) -> bool {
    text.len() == layout.len()
        && text.iter().zip(layout).all(|(&c, &l)| match l {
            b'd' => c.is_ascii_digit(),
            _ => c == l,
        })
}

/// Check the RFC 3339 shape: uppercase `T`, optional `.digits`, then `Z`
/// or `+hh:mm`/`-hh:mm`. Returns whether a fraction is present.
fn rfc3339_shape(text: &str) -> Option<bool> {
    let bytes = text.as_bytes();
    let prefix = RFC3339_PREFIX.len();
    if bytes.len() <= prefix || !matches_layout(&bytes[..prefix], RFC3339_PREFIX.as_bytes()) {
        return None;
    }
    let mut rest = &bytes[prefix..];
    let mut fractional = false;
    if let Some(after_dot) = rest.strip_prefix(b".") {
        let digits = after_dot.iter().take_while(|c| c.is_ascii_digit()).count();
        if digits == 0 {
            return None;
        }
        fractional = true;
        rest = &after_dot[digits..];
    }
    let zone_ok = match rest {
        b"Z" => true,
        [b'+' | b'-', zone @ ..] => matches_layout(zone, b"dd:dd"),
        _ => false,
    };
    zone_ok.then_some(fractional)
}

/// Try every format in [`DATE_FORMATS`] order; return the first match and
/// the format that produced it.
pub fn parse_datetime(text: &str) -> Option<(DateFormat, DateTime<FixedOffset>)> {
    DATE_FORMATS
        .iter()
        .find_map(|&format| format.parse(text).map(|dt| (format, dt)))
}

/// Comma-separated list of supported patterns, in trial order.
pub fn format_list() -> String {
    DATE_FORMATS
        .iter()
        .map(|f| f.pattern())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, TimeZone, Utc};

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<FixedOffset> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap().fixed_offset()
    }

    #[test]
    fn test_iso_date_is_utc_midnight() {
        let (format, dt) = parse_datetime("2024-03-15").unwrap();
        assert_eq!(format, DateFormat::IsoDate);
        assert_eq!(dt, utc(2024, 3, 15, 0, 0, 0));
        assert_eq!(dt.offset().local_minus_utc(), 0);
    }

    #[test]
    fn test_rfc3339_keeps_offset() {
        let (format, dt) = parse_datetime("2024-03-15T18:00:00Z").unwrap();
        assert_eq!(format, DateFormat::Rfc3339);
        assert_eq!(dt, utc(2024, 3, 15, 18, 0, 0));

        let (_, dt) = parse_datetime("2024-03-15T18:00:00-05:00").unwrap();
        assert_eq!(dt.offset().local_minus_utc(), -5 * 3600);
        assert_eq!(dt.hour(), 18);
        assert_eq!(dt, utc(2024, 3, 15, 23, 0, 0));
    }

    #[test]
    fn test_rfc3339_fractional() {
        let (format, dt) = parse_datetime("2024-03-15T18:00:00.250+01:00").unwrap();
        assert_eq!(format, DateFormat::Rfc3339Fractional);
        assert_eq!(dt.nanosecond(), 250_000_000);
        assert_eq!(dt.offset().local_minus_utc(), 3600);
    }

    #[test]
    fn test_sql_and_us_datetime() {
        let (format, dt) = parse_datetime("2024-03-22 14:30:00").unwrap();
        assert_eq!(format, DateFormat::SqlDateTime);
        assert_eq!(dt, utc(2024, 3, 22, 14, 30, 0));

        let (format, dt) = parse_datetime("03/20/2024 09:00:00").unwrap();
        assert_eq!(format, DateFormat::UsDateTime);
        assert_eq!(dt, utc(2024, 3, 20, 9, 0, 0));
    }

    #[test]
    fn test_time_only_anchors_on_year_zero() {
        let (format, dt) = parse_datetime("14:05:09").unwrap();
        assert_eq!(format, DateFormat::TimeOnly);
        assert_eq!(dt.year(), 0);
        assert_eq!((dt.month(), dt.day()), (1, 1));
        assert_eq!((dt.hour(), dt.minute(), dt.second()), (14, 5, 9));
    }

    #[test]
    fn test_ambiguous_date_reads_month_first() {
        let (format, dt) = parse_datetime("03/04/2024").unwrap();
        assert_eq!(format, DateFormat::UsDate);
        assert_eq!((dt.month(), dt.day()), (3, 4));

        let (format, dt) = parse_datetime("03/04/2024 08:15:00").unwrap();
        assert_eq!(format, DateFormat::UsDateTime);
        assert_eq!((dt.month(), dt.day()), (3, 4));
    }

    #[test]
    fn test_day_first_when_month_first_is_impossible() {
        let (format, dt) = parse_datetime("25/12/2024").unwrap();
        assert_eq!(format, DateFormat::EuDate);
        assert_eq!(dt, utc(2024, 12, 25, 0, 0, 0));

        let (format, dt) = parse_datetime("31/01/2024 23:59:59").unwrap();
        assert_eq!(format, DateFormat::EuDateTime);
        assert_eq!(dt, utc(2024, 1, 31, 23, 59, 59));
    }

    #[test]
    fn test_earlier_format_always_wins() {
        for sample in [
            "2024-03-15T18:00:00Z",
            "2024-03-15 18:00:00",
            "2024-03-15",
            "01/02/2024",
            "13/02/2024",
        ] {
            let (winner, _) = parse_datetime(sample).unwrap();
            let first_ok = DATE_FORMATS
                .iter()
                .position(|f| f.parse(sample).is_some())
                .unwrap();
            assert_eq!(winner, DATE_FORMATS[first_ok], "{}", sample);
        }
    }

    #[test]
    fn test_unparseable() {
        assert!(parse_datetime("2024-13-45").is_none());
        assert!(parse_datetime("yesterday").is_none());
        assert!(parse_datetime("2024/03/15").is_none());
    }

    #[test]
    fn test_digit_groups_are_fixed_width() {
        for sample in [
            "03/04/24",
            "3/4/2024",
            "2024-3-5",
            "1:2:3",
            "+2024-03-15",
            "12024-03-15",
            "2024-03-15 18:00:00Z",
            "2024-03-15t18:00:00z",
            "2024-03-15T18:00:00z",
            "2024-03-15T18:00:00.Z",
            "2024-03-15T18:00:00+0100",
            "03/04/2024 8:15:00",
        ] {
            assert_eq!(parse_datetime(sample), None, "{}", sample);
        }
    }

    #[test]
    fn test_leap_second_rejected() {
        assert!(parse_datetime("2016-12-31 23:59:60").is_none());
        assert!(parse_datetime("23:59:60").is_none());
        assert!(parse_datetime("2016-12-31T23:59:60Z").is_none());
        assert!(parse_datetime("2016-12-31T23:59:60.5Z").is_none());
    }

    #[test]
    fn test_format_list_is_in_trial_order() {
        let list = format_list();
        let rfc = list.find("RFC3339").unwrap();
        let us = list.find("MM/DD/YYYY").unwrap();
        let eu = list.find("DD/MM/YYYY").unwrap();
        assert!(rfc < us);
        assert!(us < eu);
    }
}
