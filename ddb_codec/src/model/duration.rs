use crate::error::{CodecError, Result};
use crate::model::ElemType;
use num_derive::{FromPrimitive, ToPrimitive};
use num_traits::{FromPrimitive, ToPrimitive};

pub const NULL_DURATION_VALUE: i32 = i32::MIN;

#[repr(u32)]
#[derive(PartialEq, Eq, Hash, Clone, Copy, FromPrimitive, ToPrimitive, Debug)]
pub enum DurationUnit {
    Nanosecond = 0,
    Microsecond = 1,
    Millisecond = 2,
    Second = 3,
    Minute = 4,
    Hour = 5,
    Day = 6,
    Week = 7,
    Month = 8,
    Year = 9,
    BusinessDay = 10,
}

impl DurationUnit {
    /// In code order. `parse` picks the longest matching suffix, so `ms` is not read as `s`.
    const ALL: [DurationUnit; 11] = [
        DurationUnit::Nanosecond,
        DurationUnit::Microsecond,
        DurationUnit::Millisecond,
        DurationUnit::Second,
        DurationUnit::Minute,
        DurationUnit::Hour,
        DurationUnit::Day,
        DurationUnit::Week,
        DurationUnit::Month,
        DurationUnit::Year,
        DurationUnit::BusinessDay,
    ];

    pub fn code(self) -> u32 {
        self.to_u32().unwrap_or_default()
    }

    pub fn from_code(code: u32) -> Option<Self> {
        Self::from_u32(code)
    }

    pub fn suffix(self) -> &'static str {
        match self {
            DurationUnit::Nanosecond => "ns",
            DurationUnit::Microsecond => "us",
            DurationUnit::Millisecond => "ms",
            DurationUnit::Second => "s",
            DurationUnit::Minute => "m",
            DurationUnit::Hour => "H",
            DurationUnit::Day => "d",
            DurationUnit::Week => "w",
            DurationUnit::Month => "M",
            DurationUnit::Year => "y",
            DurationUnit::BusinessDay => "B",
        }
    }
}

pub fn format(value: i32, unit: u32) -> String {
    if value == NULL_DURATION_VALUE {
        return String::new();
    }
    let suffix = DurationUnit::from_code(unit).map_or("", DurationUnit::suffix);
    format!("{value}{suffix}")
}

/// `"<value><unit>"`. The empty string is null.
pub fn parse(text: &str) -> Result<(i32, u32)> {
    if text.is_empty() {
        return Ok((NULL_DURATION_VALUE, DurationUnit::Nanosecond.code()));
    }
    let invalid = |reason: &str| CodecError::invalid_value(ElemType::Duration, text, reason);
    let (body, unit) = DurationUnit::ALL
        .iter()
        .filter_map(|unit| text.strip_suffix(unit.suffix()).map(|body| (body, *unit)))
        .max_by_key(|(_, unit)| unit.suffix().len())
        .ok_or_else(|| invalid("unknown unit"))?;
    let value = body.parse::<i32>().map_err(|_| invalid("not an integer"))?;
    if value == NULL_DURATION_VALUE {
        return Err(invalid("collides with null"));
    }
    Ok((value, unit.code()))
}

#[cfg(test)]
mod test {
    use super::*;
    use anyhow::Result;

    #[test]
    fn text_forms() -> Result<()> {
        assert_eq!(parse("10ms")?, (10, 2));
        assert_eq!(parse("3m")?, (3, 4));
        assert_eq!(parse("-7B")?, (-7, 10));
        assert_eq!(parse("1ns")?, (1, 0));
        assert_eq!(format(10, 2), "10ms");
        assert_eq!(format(5, 5), "5H");
        assert_eq!(format(NULL_DURATION_VALUE, 0), "");
        assert!(parse("10").is_err());
        assert!(parse("xs").is_err());
        Ok(())
    }
}
