//! Temporal element types are integer offsets from the Unix epoch, in UTC.
//!
//! | type          | unit                       |
//! |---------------|----------------------------|
//! | date          | days since epoch           |
//! | month         | `year * 12 + month - 1`    |
//! | time          | milliseconds of the day    |
//! | minute        | minutes of the day         |
//! | second        | seconds of the day         |
//! | datetime      | seconds since epoch        |
//! | datehour      | hours since epoch          |
//! | dateminute    | minutes since epoch        |
//! | timestamp     | milliseconds since epoch   |
//! | nanotime      | nanoseconds of the day     |
//! | nanotimestamp | nanoseconds since epoch    |

use crate::error::{CodecError, Result};
use crate::model::ElemType;
use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Timelike};

const DATE_FMT: &str = "%Y.%m.%d";
const DATEHOUR_FMT: &str = "%Y.%m.%dT%H";
const DATETIME_FMT: &str = "%Y.%m.%dT%H:%M:%S";
const DATEMINUTE_FMT: &str = "%Y.%m.%dT%H:%M";
const MINUTE_FMT: &str = "%H:%Mm";
const MONTH_FMT: &str = "%Y.%mM";
const NANOTIME_FMT: &str = "%H:%M:%S%.9f";
const NANOTIMESTAMP_FMT: &str = "%Y.%m.%dT%H:%M:%S%.9f";
const SECOND_FMT: &str = "%H:%M:%S";
const TIME_FMT: &str = "%H:%M:%S%.3f";
const TIMESTAMP_FMT: &str = "%Y.%m.%dT%H:%M:%S%.3f";

pub fn epoch() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(1970, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or_default()
}

fn format_str(ty: ElemType) -> Option<&'static str> {
    let fmt = match ty {
        ElemType::Date => DATE_FMT,
        ElemType::DateHour => DATEHOUR_FMT,
        ElemType::Datetime => DATETIME_FMT,
        ElemType::DateMinute => DATEMINUTE_FMT,
        ElemType::Minute => MINUTE_FMT,
        ElemType::Month => MONTH_FMT,
        ElemType::NanoTime => NANOTIME_FMT,
        ElemType::NanoTimestamp => NANOTIMESTAMP_FMT,
        ElemType::Second => SECOND_FMT,
        ElemType::Time => TIME_FMT,
        ElemType::Timestamp => TIMESTAMP_FMT,
        _ => return None,
    };
    Some(fmt)
}

fn out_of_range(ty: ElemType, raw: impl ToString) -> CodecError {
    CodecError::invalid_value(ty, raw, "out of the representable time range")
}

/// The wall-clock moment encoded by `raw`. Time-of-day types land on 1970-01-01.
pub fn to_naive(ty: ElemType, raw: i64) -> Result<NaiveDateTime> {
    let delta = match ty {
        ElemType::Month => {
            let year = raw.div_euclid(12);
            let month = raw.rem_euclid(12) + 1;
            return i32::try_from(year)
                .ok()
                .and_then(|y| NaiveDate::from_ymd_opt(y, month as u32, 1))
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .ok_or_else(|| out_of_range(ty, raw));
        }
        ElemType::Date => TimeDelta::try_days(raw),
        ElemType::DateHour => TimeDelta::try_hours(raw),
        ElemType::Minute | ElemType::DateMinute => TimeDelta::try_minutes(raw),
        ElemType::Second | ElemType::Datetime => TimeDelta::try_seconds(raw),
        ElemType::Time | ElemType::Timestamp => TimeDelta::try_milliseconds(raw),
        ElemType::NanoTime | ElemType::NanoTimestamp => Some(TimeDelta::nanoseconds(raw)),
        _ => return Err(CodecError::type_mismatch("temporal", ty)),
    };
    delta
        .and_then(|delta| epoch().checked_add_signed(delta))
        .ok_or_else(|| out_of_range(ty, raw))
}

/// Inverse of [`to_naive`]. Time-of-day types keep only the time of day.
pub fn from_naive(ty: ElemType, dt: NaiveDateTime) -> Result<i64> {
    let since = dt.signed_duration_since(epoch());
    let of_day = i64::from(dt.time().num_seconds_from_midnight());
    let nano_of_day = i64::from(dt.time().nanosecond());
    let raw = match ty {
        ElemType::Month => Some(i64::from(dt.year()) * 12 + i64::from(dt.month0())),
        ElemType::Date => Some(since.num_seconds().div_euclid(86_400)),
        ElemType::DateHour => Some(since.num_seconds().div_euclid(3_600)),
        ElemType::DateMinute => Some(since.num_seconds().div_euclid(60)),
        ElemType::Datetime => Some(since.num_seconds()),
        ElemType::Timestamp => Some(since.num_milliseconds()),
        ElemType::NanoTimestamp => since.num_nanoseconds(),
        ElemType::Minute => Some(of_day / 60),
        ElemType::Second => Some(of_day),
        ElemType::Time => Some(of_day * 1_000 + nano_of_day / 1_000_000),
        ElemType::NanoTime => Some(of_day * 1_000_000_000 + nano_of_day),
        _ => return Err(CodecError::type_mismatch("temporal", ty)),
    };
    raw.ok_or_else(|| out_of_range(ty, dt))
}

pub fn format(ty: ElemType, raw: i64) -> Result<String> {
    let fmt = format_str(ty).ok_or_else(|| CodecError::type_mismatch("temporal", ty))?;
    let dt = to_naive(ty, raw)?;
    Ok(dt.format(fmt).to_string())
}

pub fn parse(ty: ElemType, text: &str) -> Result<i64> {
    let invalid = |e: chrono::ParseError| CodecError::invalid_value(ty, text, e);
    let dt = match ty {
        ElemType::Date => NaiveDate::parse_from_str(text, DATE_FMT)
            .map_err(invalid)?
            .and_time(NaiveTime::MIN),
        ElemType::Month => {
            let body = text
                .strip_suffix('M')
                .ok_or_else(|| CodecError::invalid_value(ty, text, "missing M suffix"))?;
            let date = format!("{body}.01");
            NaiveDate::parse_from_str(&date, DATE_FMT)
                .map_err(invalid)?
                .and_time(NaiveTime::MIN)
        }
        ElemType::DateHour => {
            let padded = format!("{text}:00");
            NaiveDateTime::parse_from_str(&padded, DATEMINUTE_FMT).map_err(invalid)?
        }
        ElemType::Datetime => NaiveDateTime::parse_from_str(text, DATETIME_FMT).map_err(invalid)?,
        ElemType::DateMinute => {
            NaiveDateTime::parse_from_str(text, DATEMINUTE_FMT).map_err(invalid)?
        }
        ElemType::Timestamp => {
            NaiveDateTime::parse_from_str(text, TIMESTAMP_FMT).map_err(invalid)?
        }
        ElemType::NanoTimestamp => {
            NaiveDateTime::parse_from_str(text, NANOTIMESTAMP_FMT).map_err(invalid)?
        }
        ElemType::Minute => {
            let body = text
                .strip_suffix('m')
                .ok_or_else(|| CodecError::invalid_value(ty, text, "missing m suffix"))?;
            let time = NaiveTime::parse_from_str(body, "%H:%M").map_err(invalid)?;
            epoch().date().and_time(time)
        }
        ElemType::Second => {
            let time = NaiveTime::parse_from_str(text, SECOND_FMT).map_err(invalid)?;
            epoch().date().and_time(time)
        }
        ElemType::Time => {
            let time = NaiveTime::parse_from_str(text, TIME_FMT).map_err(invalid)?;
            epoch().date().and_time(time)
        }
        ElemType::NanoTime => {
            let time = NaiveTime::parse_from_str(text, NANOTIME_FMT).map_err(invalid)?;
            epoch().date().and_time(time)
        }
        _ => return Err(CodecError::type_mismatch("temporal", ty)),
    };
    from_naive(ty, dt)
}
