//! A single typed value. Nulls are held in-band as each family's sentinel.

use crate::error::{CodecError, Result};
use crate::model::decimal::{Decimal128, Decimal32, Decimal64};
use crate::model::duration::{self, DurationUnit, NULL_DURATION_VALUE};
use crate::model::long2::{self, Long2, NULL_LONG2};
use crate::model::{hash, temporal, DataForm, ElemType, Family, TypeCategory};
use chrono::NaiveDateTime;
use std::fmt;
use std::net::IpAddr;

mod deser;
mod ser;
pub(crate) use deser::{read_nested_form, read_num, read_string};

pub const NULL_BYTE: i8 = i8::MIN;
pub const NULL_SHORT: i16 = i16::MIN;
pub const NULL_INT: i32 = i32::MIN;
pub const NULL_LONG: i64 = i64::MIN;
pub const NULL_FLOAT: f32 = -f32::MAX;
pub const NULL_DOUBLE: f64 = -f64::MAX;

#[derive(PartialEq, Clone, Debug)]
pub enum DatumBody {
    Void,
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Long2(Long2),
    Double2([f64; 2]),
    Duration { value: i32, unit: u32 },
    Decimal32(Decimal32),
    Decimal64(Decimal64),
    Decimal128(Decimal128),
    Str(String),
    Blob(Vec<u8>),
    Any(Box<DataForm>),
}

impl DatumBody {
    pub fn family(&self) -> Family {
        match self {
            DatumBody::Void => Family::Void,
            DatumBody::Byte(_) => Family::Byte,
            DatumBody::Short(_) => Family::Short,
            DatumBody::Int(_) => Family::Int,
            DatumBody::Long(_) => Family::Long,
            DatumBody::Float(_) => Family::Float,
            DatumBody::Double(_) => Family::Double,
            DatumBody::Long2(_) => Family::Long2,
            DatumBody::Double2(_) => Family::Double2,
            DatumBody::Duration { .. } => Family::Duration,
            DatumBody::Decimal32(_) => Family::Decimal32,
            DatumBody::Decimal64(_) => Family::Decimal64,
            DatumBody::Decimal128(_) => Family::Decimal128,
            DatumBody::Str(_) => Family::Str,
            DatumBody::Blob(_) => Family::Blob,
            DatumBody::Any(_) => Family::Any,
        }
    }

    /// The null body of a family. Decimals need a scale.
    pub fn null_of(family: Family, scale: i32) -> Self {
        match family {
            Family::Void => DatumBody::Void,
            Family::Byte => DatumBody::Byte(NULL_BYTE),
            Family::Short => DatumBody::Short(NULL_SHORT),
            Family::Int => DatumBody::Int(NULL_INT),
            Family::Long => DatumBody::Long(NULL_LONG),
            Family::Float => DatumBody::Float(NULL_FLOAT),
            Family::Double => DatumBody::Double(NULL_DOUBLE),
            Family::Long2 => DatumBody::Long2(NULL_LONG2),
            Family::Double2 => DatumBody::Double2([NULL_DOUBLE, NULL_DOUBLE]),
            Family::Duration => DatumBody::Duration {
                value: NULL_DURATION_VALUE,
                unit: DurationUnit::Nanosecond.code(),
            },
            Family::Decimal32 => DatumBody::Decimal32(Decimal32::null(scale)),
            Family::Decimal64 => DatumBody::Decimal64(Decimal64::null(scale)),
            Family::Decimal128 => DatumBody::Decimal128(Decimal128::null(scale)),
            Family::Str => DatumBody::Str(String::new()),
            Family::Blob => DatumBody::Blob(vec![]),
            Family::Any => DatumBody::Any(Box::new(DataForm::void())),
        }
    }

    pub fn is_null(&self) -> bool {
        match self {
            DatumBody::Void => true,
            DatumBody::Byte(v) => *v == NULL_BYTE,
            DatumBody::Short(v) => *v == NULL_SHORT,
            DatumBody::Int(v) => *v == NULL_INT,
            DatumBody::Long(v) => *v == NULL_LONG,
            DatumBody::Float(v) => *v == NULL_FLOAT,
            DatumBody::Double(v) => *v == NULL_DOUBLE,
            DatumBody::Long2(v) => *v == NULL_LONG2,
            DatumBody::Double2([a, b]) => *a == NULL_DOUBLE || *b == NULL_DOUBLE,
            DatumBody::Duration { value, .. } => *value == NULL_DURATION_VALUE,
            DatumBody::Decimal32(d) => d.is_null(),
            DatumBody::Decimal64(d) => d.is_null(),
            DatumBody::Decimal128(d) => d.is_null(),
            DatumBody::Str(s) => s.is_empty(),
            DatumBody::Blob(b) => b.is_empty(),
            DatumBody::Any(form) => form.is_void(),
        }
    }

    pub fn decimal_scale(&self) -> Option<i32> {
        match self {
            DatumBody::Decimal32(d) => Some(d.scale()),
            DatumBody::Decimal64(d) => Some(d.scale()),
            DatumBody::Decimal128(d) => Some(d.scale()),
            _ => None,
        }
    }
}

#[derive(PartialEq, Clone, Debug)]
pub struct Datum {
    ty: ElemType,
    body: DatumBody,
}

/* Construction */
impl Datum {
    /// Rejects a body whose family does not store `ty`.
    pub fn new(ty: ElemType, body: DatumBody) -> Result<Self> {
        let family = ty.family()?;
        if family != body.family() {
            return Err(CodecError::type_mismatch(
                format!("{ty} ({family:?})"),
                format!("{:?}", body.family()),
            ));
        }
        match &body {
            DatumBody::Decimal32(d) => {
                Decimal32::new(d.scale(), d.raw())?;
            }
            DatumBody::Decimal64(d) => {
                Decimal64::new(d.scale(), d.raw())?;
            }
            DatumBody::Decimal128(d) => {
                Decimal128::new(d.scale(), d.raw())?;
            }
            _ => {}
        }
        Ok(Self { ty, body })
    }

    pub(crate) fn new_unchecked(ty: ElemType, body: DatumBody) -> Self {
        Self { ty, body }
    }

    pub fn null(ty: ElemType) -> Result<Self> {
        let body = DatumBody::null_of(ty.family()?, 0);
        Ok(Self { ty, body })
    }

    pub fn void() -> Self {
        Self::new_unchecked(ElemType::Void, DatumBody::Void)
    }

    pub fn bool(b: bool) -> Self {
        Self::new_unchecked(ElemType::Bool, DatumBody::Byte(i8::from(b)))
    }

    pub fn char(c: i8) -> Self {
        Self::new_unchecked(ElemType::Char, DatumBody::Byte(c))
    }

    pub fn short(v: i16) -> Self {
        Self::new_unchecked(ElemType::Short, DatumBody::Short(v))
    }

    pub fn int(v: i32) -> Self {
        Self::new_unchecked(ElemType::Int, DatumBody::Int(v))
    }

    pub fn long(v: i64) -> Self {
        Self::new_unchecked(ElemType::Long, DatumBody::Long(v))
    }

    pub fn float(v: f32) -> Self {
        Self::new_unchecked(ElemType::Float, DatumBody::Float(v))
    }

    pub fn double(v: f64) -> Self {
        Self::new_unchecked(ElemType::Double, DatumBody::Double(v))
    }

    pub fn string(s: impl Into<String>) -> Self {
        Self::new_unchecked(ElemType::String, DatumBody::Str(s.into()))
    }

    pub fn symbol(s: impl Into<String>) -> Self {
        Self::new_unchecked(ElemType::Symbol, DatumBody::Str(s.into()))
    }

    pub fn blob(b: impl Into<Vec<u8>>) -> Self {
        Self::new_unchecked(ElemType::Blob, DatumBody::Blob(b.into()))
    }

    pub fn int128(v: u128) -> Self {
        Self::new_unchecked(ElemType::Int128, DatumBody::Long2(long2::from_u128(v)))
    }

    pub fn uuid(v: u128) -> Self {
        Self::new_unchecked(ElemType::Uuid, DatumBody::Long2(long2::from_u128(v)))
    }

    pub fn ip(addr: IpAddr) -> Self {
        let words = match addr {
            IpAddr::V4(v4) => [u64::from(u32::from(v4)), 0],
            IpAddr::V6(v6) => long2::from_u128(u128::from(v6)),
        };
        Self::new_unchecked(ElemType::Ip, DatumBody::Long2(words))
    }

    pub fn complex(re: f64, im: f64) -> Self {
        Self::new_unchecked(ElemType::Complex, DatumBody::Double2([re, im]))
    }

    pub fn point(x: f64, y: f64) -> Self {
        Self::new_unchecked(ElemType::Point, DatumBody::Double2([x, y]))
    }

    pub fn duration(value: i32, unit: DurationUnit) -> Self {
        let body = DatumBody::Duration {
            value,
            unit: unit.code(),
        };
        Self::new_unchecked(ElemType::Duration, body)
    }

    pub fn decimal32(d: Decimal32) -> Self {
        Self::new_unchecked(ElemType::Decimal32, DatumBody::Decimal32(d))
    }

    pub fn decimal64(d: Decimal64) -> Self {
        Self::new_unchecked(ElemType::Decimal64, DatumBody::Decimal64(d))
    }

    pub fn decimal128(d: Decimal128) -> Self {
        Self::new_unchecked(ElemType::Decimal128, DatumBody::Decimal128(d))
    }

    pub fn any(form: DataForm) -> Self {
        Self::new_unchecked(ElemType::Any, DatumBody::Any(Box::new(form)))
    }

    /// A temporal value from its raw offset. Int-family types must fit 32 bits.
    pub fn temporal(ty: ElemType, raw: i64) -> Result<Self> {
        let body = match ty.family()? {
            Family::Int if ty.category() == TypeCategory::Temporal => {
                let v = i32::try_from(raw)
                    .map_err(|_| CodecError::invalid_value(ty, raw, "does not fit 32 bits"))?;
                DatumBody::Int(v)
            }
            Family::Long if ty.category() == TypeCategory::Temporal => {
                DatumBody::Long(raw)
            }
            _ => return Err(CodecError::type_mismatch("temporal", ty)),
        };
        Ok(Self { ty, body })
    }

    pub fn date_from(dt: NaiveDateTime) -> Result<Self> {
        Self::from_naive(ElemType::Date, dt)
    }

    pub fn timestamp_from(dt: NaiveDateTime) -> Result<Self> {
        Self::from_naive(ElemType::Timestamp, dt)
    }

    pub fn from_naive(ty: ElemType, dt: NaiveDateTime) -> Result<Self> {
        Self::temporal(ty, temporal::from_naive(ty, dt)?)
    }

    /// Builds a value of `ty` from its canonical text. Empty text is null.
    /// Decimals take their scale from the number of fraction digits.
    pub fn parse_str(ty: ElemType, text: &str) -> Result<Self> {
        let family = ty.family()?;
        let invalid = |reason: &str| CodecError::invalid_value(ty, text, reason);
        if text.is_empty() && family != Family::Void {
            return Ok(Self {
                ty,
                body: DatumBody::null_of(family, 0),
            });
        }
        if ty.category() == TypeCategory::Temporal {
            return Self::temporal(ty, temporal::parse(ty, text)?);
        }
        let body = match family {
            Family::Void => DatumBody::Void,
            Family::Byte if ty == ElemType::Bool => match text {
                "true" | "1" => DatumBody::Byte(1),
                "false" | "0" => DatumBody::Byte(0),
                _ => return Err(invalid("expected true or false")),
            },
            Family::Byte => match text.parse::<i8>() {
                Ok(v) => DatumBody::Byte(v),
                Err(_) if text.len() == 1 && text.is_ascii() => {
                    DatumBody::Byte(text.as_bytes()[0] as i8)
                }
                Err(_) => return Err(invalid("not a char")),
            },
            Family::Short => DatumBody::Short(text.parse().map_err(|_| invalid("not a short"))?),
            Family::Int => DatumBody::Int(text.parse().map_err(|_| invalid("not an int"))?),
            Family::Long => DatumBody::Long(text.parse().map_err(|_| invalid("not a long"))?),
            Family::Float => DatumBody::Float(text.parse().map_err(|_| invalid("not a float"))?),
            Family::Double => {
                DatumBody::Double(text.parse().map_err(|_| invalid("not a double"))?)
            }
            Family::Long2 => DatumBody::Long2(long2::parse(ty, text)?),
            Family::Double2 => DatumBody::Double2(parse_double2(ty, text)?),
            Family::Duration => {
                let (value, unit) = duration::parse(text)?;
                DatumBody::Duration { value, unit }
            }
            Family::Decimal32 => {
                DatumBody::Decimal32(Decimal32::parse(text, fraction_digits(text))?)
            }
            Family::Decimal64 => {
                DatumBody::Decimal64(Decimal64::parse(text, fraction_digits(text))?)
            }
            Family::Decimal128 => {
                DatumBody::Decimal128(Decimal128::parse(text, fraction_digits(text))?)
            }
            Family::Str => DatumBody::Str(text.to_string()),
            Family::Blob => DatumBody::Blob(text.as_bytes().to_vec()),
            Family::Any => return Err(CodecError::Unsupported(format!("{ty} from text"))),
        };
        Ok(Self { ty, body })
    }
}

fn fraction_digits(text: &str) -> i32 {
    text.split_once('.').map_or(0, |(_, frac)| frac.trim().len() as i32)
}

/// `re+imi` for complex, `(x, y)` for point.
fn parse_double2(ty: ElemType, text: &str) -> Result<[f64; 2]> {
    let invalid = || CodecError::invalid_value(ty, text, "malformed pair of doubles");
    let num = |s: &str| s.trim().parse::<f64>().map_err(|_| invalid());
    if ty == ElemType::Point {
        let inner = text
            .trim()
            .strip_prefix('(')
            .and_then(|s| s.strip_suffix(')'))
            .ok_or_else(invalid)?;
        if inner.trim() == "," {
            return Ok([NULL_DOUBLE, NULL_DOUBLE]);
        }
        let (x, y) = inner.split_once(',').ok_or_else(invalid)?;
        return Ok([num(x)?, num(y)?]);
    }
    let body = text.trim().strip_suffix('i').ok_or_else(invalid)?;
    // The separating sign follows a digit; an exponent or imaginary sign does not.
    let (split, sign) = body
        .char_indices()
        .filter(|(i, c)| {
            (*c == '+' || *c == '-')
                && body[..*i]
                    .chars()
                    .last()
                    .is_some_and(|p| p.is_ascii_digit() || p == '.')
        })
        .last()
        .ok_or_else(invalid)?;
    let im = if sign == '+' {
        &body[split + 1..]
    } else {
        &body[split..]
    };
    Ok([num(&body[..split])?, num(im)?])
}

/* Accessors */
impl Datum {
    pub fn ty(&self) -> ElemType {
        self.ty
    }

    pub fn body(&self) -> &DatumBody {
        &self.body
    }

    pub fn into_body(self) -> DatumBody {
        self.body
    }

    pub fn is_null(&self) -> bool {
        self.body.is_null()
    }

    /// Decimals keep their scale.
    pub fn set_null(&mut self) {
        let scale = self.body.decimal_scale().unwrap_or_default();
        self.body = DatumBody::null_of(self.body.family(), scale);
    }

    fn mismatch(&self, expected: &str) -> CodecError {
        CodecError::type_mismatch(expected, self.ty)
    }

    pub fn as_bool(&self) -> Result<bool> {
        match (self.ty, &self.body) {
            (ElemType::Bool, DatumBody::Byte(v)) => Ok(*v != 0),
            _ => Err(self.mismatch("bool")),
        }
    }

    /// Widens any integral or int-backed temporal body.
    pub fn as_i64(&self) -> Result<i64> {
        match &self.body {
            DatumBody::Byte(v) => Ok(i64::from(*v)),
            DatumBody::Short(v) => Ok(i64::from(*v)),
            DatumBody::Int(v) => Ok(i64::from(*v)),
            DatumBody::Long(v) => Ok(*v),
            _ => Err(self.mismatch("integral")),
        }
    }

    pub fn as_i32(&self) -> Result<i32> {
        match &self.body {
            DatumBody::Byte(v) => Ok(i32::from(*v)),
            DatumBody::Short(v) => Ok(i32::from(*v)),
            DatumBody::Int(v) => Ok(*v),
            _ => Err(self.mismatch("int")),
        }
    }

    pub fn as_f64(&self) -> Result<f64> {
        match &self.body {
            DatumBody::Float(v) => Ok(f64::from(*v)),
            DatumBody::Double(v) => Ok(*v),
            _ => Err(self.mismatch("floating")),
        }
    }

    pub fn as_str(&self) -> Result<&str> {
        match &self.body {
            DatumBody::Str(s) => Ok(s),
            _ => Err(self.mismatch("string")),
        }
    }

    pub fn as_bytes(&self) -> Result<&[u8]> {
        match &self.body {
            DatumBody::Blob(b) => Ok(b),
            DatumBody::Str(s) => Ok(s.as_bytes()),
            _ => Err(self.mismatch("blob")),
        }
    }

    pub fn as_u128(&self) -> Result<u128> {
        match &self.body {
            DatumBody::Long2(v) => Ok(long2::to_u128(*v)),
            _ => Err(self.mismatch("int128, uuid or ipaddr")),
        }
    }

    pub fn as_form(&self) -> Result<&DataForm> {
        match &self.body {
            DatumBody::Any(form) => Ok(form),
            _ => Err(self.mismatch("any")),
        }
    }

    pub fn to_naive_date_time(&self) -> Result<NaiveDateTime> {
        let raw = self.as_i64()?;
        if self.is_null() {
            return Err(CodecError::invalid_value(self.ty, raw, "null has no calendar moment"));
        }
        temporal::to_naive(self.ty, raw)
    }

    /// The partition a value routes to among `buckets`.
    pub fn hash_bucket(&self, buckets: i32) -> i32 {
        body_hash_bucket(self.ty, &self.body, buckets)
    }
}

pub(crate) fn body_hash_bucket(ty: ElemType, body: &DatumBody, buckets: i32) -> i32 {
    use ElemType::*;
    match (ty, body) {
        (Char, DatumBody::Byte(v)) => {
            hash::hash_narrow_int(i64::from(*v), *v == NULL_BYTE, buckets)
        }
        (Short, DatumBody::Short(v)) => {
            hash::hash_narrow_int(i64::from(*v), *v == NULL_SHORT, buckets)
        }
        (Int | Date | Month | Time | Minute | Second | Datetime | DateHour, DatumBody::Int(v)) => {
            hash::hash_narrow_int(i64::from(*v), *v == NULL_INT, buckets)
        }
        (Long | Timestamp | NanoTime | NanoTimestamp, DatumBody::Long(v)) => {
            hash::hash_long(*v, buckets)
        }
        (String | Symbol, DatumBody::Str(s)) => hash::hash_str(s, buckets),
        (Int128 | Uuid | Ip, DatumBody::Long2(v)) => hash::hash_long2(*v, buckets),
        (Float | Complex | Point, _) => -1,
        _ => 0,
    }
}

/// Text of one value, as the server prints it.
pub(crate) fn render_body(ty: ElemType, body: &DatumBody) -> String {
    match body {
        DatumBody::Long2(v) => return long2::format(ty, *v),
        DatumBody::Double2(_) if ty == ElemType::Point && body.is_null() => {
            return String::from("(,)")
        }
        _ => {}
    }
    if body.is_null() {
        return String::new();
    }
    match body {
        DatumBody::Void => String::new(),
        DatumBody::Byte(v) if ty == ElemType::Bool => (*v != 0).to_string(),
        DatumBody::Byte(v) => v.to_string(),
        DatumBody::Short(v) => v.to_string(),
        DatumBody::Int(v) => render_temporal(ty, i64::from(*v)),
        DatumBody::Long(v) => render_temporal(ty, *v),
        DatumBody::Float(v) => v.to_string(),
        DatumBody::Double(v) => v.to_string(),
        DatumBody::Long2(v) => long2::format(ty, *v),
        DatumBody::Double2([a, b]) if ty == ElemType::Point => format!("({a:.5}, {b:.5})"),
        DatumBody::Double2([a, b]) => format!("{a:.5}+{b:.5}i"),
        DatumBody::Duration { value, unit } => duration::format(*value, *unit),
        DatumBody::Decimal32(d) => d.to_string(),
        DatumBody::Decimal64(d) => d.to_string(),
        DatumBody::Decimal128(d) => d.to_string(),
        DatumBody::Str(s) => s.clone(),
        DatumBody::Blob(b) => String::from_utf8_lossy(b).into_owned(),
        DatumBody::Any(form) => form.to_string(),
    }
}

fn render_temporal(ty: ElemType, raw: i64) -> String {
    if ty.category() != TypeCategory::Temporal {
        return raw.to_string();
    }
    temporal::format(ty, raw).unwrap_or_else(|e| {
        log::debug!("[RENDER] {ty} {raw} has no calendar form: {e}");
        raw.to_string()
    })
}

impl fmt::Display for Datum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render_body(self.ty, &self.body))
    }
}
