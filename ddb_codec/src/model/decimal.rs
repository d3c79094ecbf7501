//! Fixed-point decimals. The stored integer is `value * 10^scale`.

use crate::error::{CodecError, Result};
use crate::model::ElemType;
use std::fmt;

fn pow10(exp: u32) -> Option<i128> {
    10i128.checked_pow(exp)
}

pub fn check_scale(ty: ElemType, scale: i32, max: i32) -> Result<u32> {
    if !(0..=max).contains(&scale) {
        return Err(CodecError::InvalidScale {
            ty: ty.to_string(),
            scale,
            max,
        });
    }
    Ok(scale as u32)
}

/// Renders `raw` with exactly `scale` fraction digits.
pub fn format_scaled(raw: i128, scale: u32) -> String {
    let sign = if raw < 0 { "-" } else { "" };
    let abs = raw.unsigned_abs();
    if scale == 0 {
        return format!("{sign}{abs}");
    }
    let div = 10u128.pow(scale);
    let width = scale as usize;
    format!("{sign}{}.{:0width$}", abs / div, abs % div)
}

/// Parses decimal text into `value * 10^scale`, rounding half away from zero.
pub fn parse_scaled(ty: ElemType, text: &str, scale: u32) -> Result<i128> {
    let invalid = |reason: &str| CodecError::invalid_value(ty, text, reason);
    let overflow = || CodecError::DecimalOverflow(format!("{text} at scale {scale} for {ty}"));

    let trimmed = text.trim();
    let (neg, body) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let (int_part, frac_part) = body.split_once('.').unwrap_or((body, ""));
    if int_part.is_empty() && frac_part.is_empty() {
        return Err(invalid("no digits"));
    }
    if !int_part.bytes().chain(frac_part.bytes()).all(|b| b.is_ascii_digit()) {
        return Err(invalid("not a decimal number"));
    }

    let mut acc: i128 = 0;
    let digits = int_part
        .bytes()
        .chain(frac_part.bytes().chain(std::iter::repeat(b'0')).take(scale as usize));
    for b in digits {
        acc = acc
            .checked_mul(10)
            .and_then(|a| a.checked_add(i128::from(b - b'0')))
            .ok_or_else(overflow)?;
    }
    if let Some(next) = frac_part.as_bytes().get(scale as usize) {
        if *next >= b'5' {
            acc = acc.checked_add(1).ok_or_else(overflow)?;
        }
    }
    Ok(if neg { -acc } else { acc })
}

/// Moves `raw` from one scale to another. Scaling down rounds half away from zero.
pub fn rescale_raw(raw: i128, from: u32, to: u32) -> Option<i128> {
    if to >= from {
        raw.checked_mul(pow10(to - from)?)
    } else {
        let div = pow10(from - to)?;
        let q = raw / div;
        let r = raw % div;
        if r.unsigned_abs() * 2 >= div.unsigned_abs() {
            Some(q + raw.signum())
        } else {
            Some(q)
        }
    }
}

macro_rules! decimal_type {
    ($name:ident, $raw:ty, $elem:expr, $max_scale:expr) => {
        #[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
        pub struct $name {
            scale: i32,
            raw: $raw,
        }

        impl $name {
            pub const MAX_SCALE: i32 = $max_scale;
            pub const NULL_RAW: $raw = <$raw>::MIN;

            pub fn new(scale: i32, raw: $raw) -> Result<Self> {
                check_scale($elem, scale, Self::MAX_SCALE)?;
                Ok(Self { scale, raw })
            }

            /// `scale` must already have passed [`check_scale`].
            pub(crate) fn from_parts(scale: i32, raw: $raw) -> Self {
                Self { scale, raw }
            }

            pub fn scale(&self) -> i32 {
                self.scale
            }

            pub fn raw(&self) -> $raw {
                self.raw
            }

            pub fn null(scale: i32) -> Self {
                Self {
                    scale,
                    raw: Self::NULL_RAW,
                }
            }

            pub fn is_null(&self) -> bool {
                self.raw == Self::NULL_RAW
            }

            pub fn parse(text: &str, scale: i32) -> Result<Self> {
                let scale_u = check_scale($elem, scale, Self::MAX_SCALE)?;
                let wide = parse_scaled($elem, text, scale_u)?;
                let raw = Self::narrow(wide, text)?;
                Ok(Self { scale, raw })
            }

            pub fn rescale(&self, scale: i32) -> Result<Self> {
                if self.is_null() {
                    return Ok(Self::null(scale));
                }
                let to = check_scale($elem, scale, Self::MAX_SCALE)?;
                let wide = rescale_raw(i128::from(self.raw), self.scale as u32, to)
                    .ok_or_else(|| {
                        CodecError::DecimalOverflow(format!("{self} to scale {scale}"))
                    })?;
                let raw = Self::narrow(wide, self)?;
                Ok(Self { scale, raw })
            }

            fn narrow(wide: i128, src: impl fmt::Display) -> Result<$raw> {
                <$raw>::try_from(wide)
                    .ok()
                    .filter(|raw| *raw != Self::NULL_RAW)
                    .ok_or_else(|| CodecError::DecimalOverflow(format!("{src} as {}", $elem)))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                if self.is_null() {
                    return Ok(());
                }
                f.write_str(&format_scaled(i128::from(self.raw), self.scale.max(0) as u32))
            }
        }
    };
}

decimal_type!(Decimal32, i32, ElemType::Decimal32, 9);
decimal_type!(Decimal64, i64, ElemType::Decimal64, 18);
decimal_type!(Decimal128, i128, ElemType::Decimal128, 38);

#[cfg(test)]
mod test {
    use super::*;
    use anyhow::Result;

    #[test]
    fn parse_and_format() -> Result<()> {
        let d = Decimal32::parse("3.14159", 3)?;
        assert_eq!(d.raw(), 3142);
        assert_eq!(d.to_string(), "3.142");

        let d = Decimal64::parse("-0.5", 0)?;
        assert_eq!(d.raw(), -1);

        let d = Decimal64::parse("-12.3", 4)?;
        assert_eq!(d.raw(), -123_000);
        assert_eq!(d.to_string(), "-12.3000");

        let d = Decimal128::parse("123456789012345678901234567.89", 10)?;
        assert_eq!(d.to_string(), "123456789012345678901234567.8900000000");
        Ok(())
    }

    #[test]
    fn scale_and_overflow() -> Result<()> {
        assert!(matches!(
            Decimal32::new(10, 1),
            Err(CodecError::InvalidScale { max: 9, .. })
        ));
        assert!(Decimal64::new(-1, 1).is_err());
        assert!(Decimal64::new(18, 1).is_ok());
        assert!(matches!(
            Decimal32::parse("3000000", 9),
            Err(CodecError::DecimalOverflow(_))
        ));
        assert!(Decimal32::parse("1.2.3", 2).is_err());

        assert!(Decimal128::new(39, 1).is_err());
        let d = Decimal128::new(38, 7)?;
        assert_eq!((d.scale(), d.raw()), (38, 7));
        Ok(())
    }

    #[test]
    fn rescale() -> Result<()> {
        let d = Decimal64::new(2, 12_345)?;
        assert_eq!(d.rescale(4)?.raw(), 1_234_500);
        assert_eq!(d.rescale(1)?.raw(), 1_235);
        assert_eq!(Decimal64::new(2, -12_345)?.rescale(1)?.raw(), -1_235);
        assert!(Decimal32::new(0, 2_000_000_000)?.rescale(1).is_err());
        assert!(Decimal32::null(2).rescale(5)?.is_null());
        assert_eq!(Decimal32::null(2).to_string(), "");
        Ok(())
    }
}
