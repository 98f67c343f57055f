//! DATE / DATETIME / TIME / INTERVAL wrappers.
//!
//! Databend returns temporal columns either as native values or as text in
//! a fixed `YYYY-MM-DD[ HH:MM:SS]` shape, depending on the driver. Text is
//! parsed with anchored patterns; trailing content (fractional seconds,
//! zone suffix) is ignored.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::driver::Value;
use crate::error::{DialectError, Result};

use super::{quote_string, render_plain_literal, TypeWrapper};

static DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+)-(\d+)-(\d+)").expect("valid date regex"));

static DATETIME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d+)-(\d+)-(\d+) (\d+):(\d+):(\d+)").expect("valid datetime regex")
});

/// Date anchoring TIME literals; Databend has no standalone time column.
const TIME_ANCHOR_DATE: &str = "1000-01-01";

const DATETIME_LITERAL_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";
const TIME_LITERAL_FORMAT: &str = "%H:%M:%S%.6f";

fn group<T: std::str::FromStr>(caps: &Captures<'_>, idx: usize) -> Option<T> {
    caps.get(idx).and_then(|m| m.as_str().parse().ok())
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    DATE_RE
        .captures(s)
        .and_then(|caps| {
            NaiveDate::from_ymd_opt(group(&caps, 1)?, group(&caps, 2)?, group(&caps, 3)?)
        })
        .ok_or_else(|| DialectError::invalid_value(format!("could not parse '{}' as a date value", s)))
}

fn parse_datetime(s: &str) -> Result<NaiveDateTime> {
    DATETIME_RE
        .captures(s)
        .and_then(|caps| {
            let date =
                NaiveDate::from_ymd_opt(group(&caps, 1)?, group(&caps, 2)?, group(&caps, 3)?)?;
            let time =
                NaiveTime::from_hms_opt(group(&caps, 4)?, group(&caps, 5)?, group(&caps, 6)?)?;
            Some(date.and_time(time))
        })
        .ok_or_else(|| {
            DialectError::invalid_value(format!("could not parse '{}' as a datetime value", s))
        })
}

/// DATE wrapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DatabendDate;

impl TypeWrapper for DatabendDate {
    fn process_result(&self, value: Value) -> Result<Value> {
        match value {
            Value::String(s) => parse_date(&s).map(Value::Date),
            other => Ok(other),
        }
    }

    fn render_literal(&self, value: &Value) -> Result<Option<String>> {
        match value {
            Value::DateTime(dt) => render_plain_literal(&Value::Date(dt.date())),
            other => render_plain_literal(other),
        }
    }
}

/// DATETIME / TIMESTAMP wrapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DatabendDateTime;

impl TypeWrapper for DatabendDateTime {
    fn process_result(&self, value: Value) -> Result<Value> {
        match value {
            Value::String(s) => parse_datetime(&s).map(Value::DateTime),
            other => Ok(other),
        }
    }

    fn render_literal(&self, value: &Value) -> Result<Option<String>> {
        let dt = match value {
            Value::DateTime(dt) => *dt,
            Value::Date(d) => d.and_time(NaiveTime::MIN),
            Value::String(s) => return Ok(Some(quote_string(s))),
            Value::Null => return Ok(None),
            other => {
                return Err(DialectError::invalid_value(format!(
                    "cannot render {:?} as a datetime literal",
                    other
                )))
            }
        };
        Ok(Some(format!("'{}'", dt.format(DATETIME_LITERAL_FORMAT))))
    }
}

/// TIME wrapper.
///
/// Values come back as full timestamps; only the time of day is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DatabendTime;

impl TypeWrapper for DatabendTime {
    fn process_result(&self, value: Value) -> Result<Value> {
        match value {
            Value::Null => Ok(Value::Null),
            Value::String(s) => parse_datetime(&s).map(|dt| Value::Time(dt.time())),
            Value::DateTime(dt) => Ok(Value::Time(dt.time())),
            Value::Time(t) => Ok(Value::Time(t)),
            other => Err(DialectError::invalid_value(format!(
                "could not parse {:?} as a time value",
                other
            ))),
        }
    }

    fn render_literal(&self, value: &Value) -> Result<Option<String>> {
        let time = match value {
            Value::Time(t) => *t,
            Value::DateTime(dt) => dt.time(),
            Value::String(s) => return Ok(Some(quote_string(s))),
            Value::Null => return Ok(None),
            other => {
                return Err(DialectError::invalid_value(format!(
                    "cannot render {:?} as a time literal",
                    other
                )))
            }
        };
        Ok(Some(format!(
            "'{}T{}'",
            TIME_ANCHOR_DATE,
            time.format(TIME_LITERAL_FORMAT)
        )))
    }
}

/// INTERVAL wrapper. Binds are always cast explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DatabendInterval;

impl TypeWrapper for DatabendInterval {
    fn process_result(&self, value: Value) -> Result<Value> {
        Ok(value)
    }

    fn render_literal(&self, value: &Value) -> Result<Option<String>> {
        render_plain_literal(value)
    }

    fn render_bind_cast(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn datetime(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
    }

    #[test]
    fn test_date_from_string() {
        let v = DatabendDate.process_result(Value::String("2024-1-5".into())).unwrap();
        assert_eq!(v, Value::Date(NaiveDate::from_ymd_opt(2024, 1, 5).unwrap()));
    }

    #[test]
    fn test_date_rejects_garbage() {
        let err = DatabendDate
            .process_result(Value::String("yesterday".into()))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid value: could not parse 'yesterday' as a date value"
        );
    }

    #[test]
    fn test_date_native_passthrough() {
        let d = NaiveDate::from_ymd_opt(2020, 2, 29).unwrap();
        assert_eq!(DatabendDate.process_result(Value::Date(d)).unwrap(), Value::Date(d));
    }

    #[test]
    fn test_datetime_ignores_fraction() {
        let v = DatabendDateTime
            .process_result(Value::String("2023-11-02 08:15:30.123456".into()))
            .unwrap();
        assert_eq!(v, Value::DateTime(datetime(2023, 11, 2, 8, 15, 30)));
    }

    #[test]
    fn test_datetime_requires_time_part() {
        assert!(DatabendDateTime
            .process_result(Value::String("2023-11-02".into()))
            .is_err());
    }

    #[test]
    fn test_datetime_literal_microseconds() {
        let lit = DatabendDateTime
            .render_literal(&Value::DateTime(datetime(2023, 11, 2, 8, 15, 30)))
            .unwrap();
        assert_eq!(lit.as_deref(), Some("'2023-11-02 08:15:30.000000'"));
    }

    #[test]
    fn test_time_extracts_time_of_day() {
        let v = DatabendTime
            .process_result(Value::String("1000-01-01 13:45:00".into()))
            .unwrap();
        assert_eq!(v, Value::Time(NaiveTime::from_hms_opt(13, 45, 0).unwrap()));

        let v = DatabendTime
            .process_result(Value::DateTime(datetime(2022, 5, 1, 7, 0, 1)))
            .unwrap();
        assert_eq!(v, Value::Time(NaiveTime::from_hms_opt(7, 0, 1).unwrap()));
        assert_eq!(DatabendTime.process_result(Value::Null).unwrap(), Value::Null);
    }

    #[test]
    fn test_time_literal_anchored() {
        let t = NaiveTime::from_hms_micro_opt(13, 45, 0, 250).unwrap();
        let lit = DatabendTime.render_literal(&Value::Time(t)).unwrap();
        assert_eq!(lit.as_deref(), Some("'1000-01-01T13:45:00.000250'"));
    }

    #[test]
    fn test_absent_values_not_rendered() {
        assert_eq!(DatabendDateTime.render_literal(&Value::Null).unwrap(), None);
        assert_eq!(DatabendTime.render_literal(&Value::Null).unwrap(), None);
        assert_eq!(DatabendDate.render_literal(&Value::Null).unwrap(), None);
    }
}
