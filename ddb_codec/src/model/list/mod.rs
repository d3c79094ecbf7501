//! Homogeneous columns. Every element shares the column's element type and, for decimals,
//! its scale.

use crate::ds_n_a::bisect;
use crate::error::{CodecError, Result};
use crate::model::datum::{body_hash_bucket, render_body, Datum, DatumBody};
use crate::model::decimal::{self, check_scale, Decimal128, Decimal32, Decimal64};
use crate::model::long2::Long2;
use crate::model::{DataForm, ElemType, Family, TypeCategory};
use std::cmp::Ordering;

mod deser;
mod ser;
pub(crate) use deser::read_scale;

#[derive(PartialEq, Clone, Debug)]
pub enum ListBody {
    /// Only a count. Nothing travels on the wire.
    Void(usize),
    Byte(Vec<i8>),
    Short(Vec<i16>),
    Int(Vec<i32>),
    Long(Vec<i64>),
    Float(Vec<f32>),
    Double(Vec<f64>),
    Long2(Vec<Long2>),
    Double2(Vec<[f64; 2]>),
    /// `[value bits, unit]`
    Duration(Vec<[u32; 2]>),
    Decimal32 { scale: i32, raws: Vec<i32> },
    Decimal64 { scale: i32, raws: Vec<i64> },
    Decimal128 { scale: i32, raws: Vec<i128> },
    Str(Vec<String>),
    Blob(Vec<Vec<u8>>),
    Any(Vec<DataForm>),
}

/// Applies one expression to whichever vector a body holds, producing a body of the same variant.
macro_rules! map_vecs {
    ($body:expr, void $n:ident => $void_expr:expr, $v:ident => $expr:expr) => {
        match $body {
            ListBody::Void($n) => ListBody::Void($void_expr),
            ListBody::Byte($v) => ListBody::Byte($expr),
            ListBody::Short($v) => ListBody::Short($expr),
            ListBody::Int($v) => ListBody::Int($expr),
            ListBody::Long($v) => ListBody::Long($expr),
            ListBody::Float($v) => ListBody::Float($expr),
            ListBody::Double($v) => ListBody::Double($expr),
            ListBody::Long2($v) => ListBody::Long2($expr),
            ListBody::Double2($v) => ListBody::Double2($expr),
            ListBody::Duration($v) => ListBody::Duration($expr),
            ListBody::Decimal32 { scale, raws: $v } => ListBody::Decimal32 {
                scale: *scale,
                raws: $expr,
            },
            ListBody::Decimal64 { scale, raws: $v } => ListBody::Decimal64 {
                scale: *scale,
                raws: $expr,
            },
            ListBody::Decimal128 { scale, raws: $v } => ListBody::Decimal128 {
                scale: *scale,
                raws: $expr,
            },
            ListBody::Str($v) => ListBody::Str($expr),
            ListBody::Blob($v) => ListBody::Blob($expr),
            ListBody::Any($v) => ListBody::Any($expr),
        }
    };
}

/// Writes into slot `i`, or appends when `None`.
macro_rules! put_at {
    ($vec:expr, $slot:expr, $val:expr) => {
        match $slot {
            Some(i) => $vec[i] = $val,
            None => $vec.push($val),
        }
    };
}

impl ListBody {
    pub fn empty(family: Family, scale: i32) -> Self {
        match family {
            Family::Void => ListBody::Void(0),
            Family::Byte => ListBody::Byte(vec![]),
            Family::Short => ListBody::Short(vec![]),
            Family::Int => ListBody::Int(vec![]),
            Family::Long => ListBody::Long(vec![]),
            Family::Float => ListBody::Float(vec![]),
            Family::Double => ListBody::Double(vec![]),
            Family::Long2 => ListBody::Long2(vec![]),
            Family::Double2 => ListBody::Double2(vec![]),
            Family::Duration => ListBody::Duration(vec![]),
            Family::Decimal32 => ListBody::Decimal32 { scale, raws: vec![] },
            Family::Decimal64 => ListBody::Decimal64 { scale, raws: vec![] },
            Family::Decimal128 => ListBody::Decimal128 { scale, raws: vec![] },
            Family::Str => ListBody::Str(vec![]),
            Family::Blob => ListBody::Blob(vec![]),
            Family::Any => ListBody::Any(vec![]),
        }
    }

    pub fn family(&self) -> Family {
        match self {
            ListBody::Void(_) => Family::Void,
            ListBody::Byte(_) => Family::Byte,
            ListBody::Short(_) => Family::Short,
            ListBody::Int(_) => Family::Int,
            ListBody::Long(_) => Family::Long,
            ListBody::Float(_) => Family::Float,
            ListBody::Double(_) => Family::Double,
            ListBody::Long2(_) => Family::Long2,
            ListBody::Double2(_) => Family::Double2,
            ListBody::Duration(_) => Family::Duration,
            ListBody::Decimal32 { .. } => Family::Decimal32,
            ListBody::Decimal64 { .. } => Family::Decimal64,
            ListBody::Decimal128 { .. } => Family::Decimal128,
            ListBody::Str(_) => Family::Str,
            ListBody::Blob(_) => Family::Blob,
            ListBody::Any(_) => Family::Any,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ListBody::Void(n) => *n,
            ListBody::Byte(v) => v.len(),
            ListBody::Short(v) => v.len(),
            ListBody::Int(v) => v.len(),
            ListBody::Long(v) => v.len(),
            ListBody::Float(v) => v.len(),
            ListBody::Double(v) => v.len(),
            ListBody::Long2(v) => v.len(),
            ListBody::Double2(v) => v.len(),
            ListBody::Duration(v) => v.len(),
            ListBody::Decimal32 { raws, .. } => raws.len(),
            ListBody::Decimal64 { raws, .. } => raws.len(),
            ListBody::Decimal128 { raws, .. } => raws.len(),
            ListBody::Str(v) => v.len(),
            ListBody::Blob(v) => v.len(),
            ListBody::Any(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn decimal_scale(&self) -> Option<i32> {
        match self {
            ListBody::Decimal32 { scale, .. }
            | ListBody::Decimal64 { scale, .. }
            | ListBody::Decimal128 { scale, .. } => Some(*scale),
            _ => None,
        }
    }
}

#[derive(PartialEq, Clone, Debug)]
pub struct DatumList {
    ty: ElemType,
    body: ListBody,
}

/* Construction */
impl DatumList {
    pub fn new(ty: ElemType, body: ListBody) -> Result<Self> {
        let family = ty.family()?;
        if family != body.family() {
            return Err(CodecError::type_mismatch(
                format!("{ty} ({family:?})"),
                format!("{:?}", body.family()),
            ));
        }
        Ok(Self { ty, body })
    }

    pub(crate) fn new_unchecked(ty: ElemType, body: ListBody) -> Self {
        Self { ty, body }
    }

    pub fn empty(ty: ElemType) -> Result<Self> {
        Self::empty_with_scale(ty, 0)
    }

    pub fn empty_with_scale(ty: ElemType, scale: i32) -> Result<Self> {
        let family = ty.family()?;
        if let Some(max) = max_scale(family) {
            check_scale(ty, scale, max)?;
        }
        Ok(Self::new_unchecked(ty, ListBody::empty(family, scale)))
    }

    /// `len` nulls of `ty`.
    pub fn nulls(ty: ElemType, len: usize) -> Result<Self> {
        let mut list = Self::empty(ty)?;
        let null = Datum::null(ty)?;
        for _ in 0..len {
            list.append(&null)?;
        }
        Ok(list)
    }

    /// Decimal columns take their scale from the first element.
    pub fn from_datums(ty: ElemType, items: &[Datum]) -> Result<Self> {
        let scale = items
            .first()
            .and_then(|d| d.body().decimal_scale())
            .unwrap_or_default();
        let mut list = Self::empty_with_scale(ty, scale)?;
        for dat in items {
            list.append(dat)?;
        }
        Ok(list)
    }

    pub fn from_bools(vals: &[bool]) -> Self {
        let bytes = vals.iter().map(|b| i8::from(*b)).collect();
        Self::new_unchecked(ElemType::Bool, ListBody::Byte(bytes))
    }

    pub fn from_chars(vals: Vec<i8>) -> Self {
        Self::new_unchecked(ElemType::Char, ListBody::Byte(vals))
    }

    pub fn from_shorts(vals: Vec<i16>) -> Self {
        Self::new_unchecked(ElemType::Short, ListBody::Short(vals))
    }

    /// `ty` is int or an int-backed temporal type.
    pub fn from_ints(ty: ElemType, vals: Vec<i32>) -> Result<Self> {
        Self::new(ty, ListBody::Int(vals))
    }

    /// `ty` is long or a long-backed temporal type.
    pub fn from_longs(ty: ElemType, vals: Vec<i64>) -> Result<Self> {
        Self::new(ty, ListBody::Long(vals))
    }

    pub fn from_floats(vals: Vec<f32>) -> Self {
        Self::new_unchecked(ElemType::Float, ListBody::Float(vals))
    }

    pub fn from_doubles(vals: Vec<f64>) -> Self {
        Self::new_unchecked(ElemType::Double, ListBody::Double(vals))
    }

    pub fn from_long2s(ty: ElemType, vals: Vec<Long2>) -> Result<Self> {
        Self::new(ty, ListBody::Long2(vals))
    }

    pub fn from_double2s(ty: ElemType, vals: Vec<[f64; 2]>) -> Result<Self> {
        Self::new(ty, ListBody::Double2(vals))
    }

    pub fn from_strings<S: Into<String>>(
        ty: ElemType,
        vals: impl IntoIterator<Item = S>,
    ) -> Result<Self> {
        Self::new(ty, ListBody::Str(vals.into_iter().map(Into::into).collect()))
    }

    pub fn from_blobs(vals: Vec<Vec<u8>>) -> Self {
        Self::new_unchecked(ElemType::Blob, ListBody::Blob(vals))
    }

    pub fn from_decimal32s(scale: i32, raws: Vec<i32>) -> Result<Self> {
        check_scale(ElemType::Decimal32, scale, Decimal32::MAX_SCALE)?;
        Ok(Self::new_unchecked(ElemType::Decimal32, ListBody::Decimal32 { scale, raws }))
    }

    pub fn from_decimal64s(scale: i32, raws: Vec<i64>) -> Result<Self> {
        check_scale(ElemType::Decimal64, scale, Decimal64::MAX_SCALE)?;
        Ok(Self::new_unchecked(ElemType::Decimal64, ListBody::Decimal64 { scale, raws }))
    }

    pub fn from_decimal128s(scale: i32, raws: Vec<i128>) -> Result<Self> {
        check_scale(ElemType::Decimal128, scale, Decimal128::MAX_SCALE)?;
        Ok(Self::new_unchecked(ElemType::Decimal128, ListBody::Decimal128 { scale, raws }))
    }

    pub fn from_forms(forms: Vec<DataForm>) -> Self {
        Self::new_unchecked(ElemType::Any, ListBody::Any(forms))
    }
}

fn max_scale(family: Family) -> Option<i32> {
    match family {
        Family::Decimal32 => Some(Decimal32::MAX_SCALE),
        Family::Decimal64 => Some(Decimal64::MAX_SCALE),
        Family::Decimal128 => Some(Decimal128::MAX_SCALE),
        _ => None,
    }
}

/* Element access */
impl DatumList {
    pub fn ty(&self) -> ElemType {
        self.ty
    }

    pub fn body(&self) -> &ListBody {
        &self.body
    }

    pub fn into_body(self) -> ListBody {
        self.body
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    fn check_index(&self, index: usize) -> Result<()> {
        let len = self.len();
        if index >= len {
            return Err(CodecError::IndexOutOfRange { index, len });
        }
        Ok(())
    }

    pub fn get(&self, i: usize) -> Result<Datum> {
        self.check_index(i)?;
        let body = match &self.body {
            ListBody::Void(_) => DatumBody::Void,
            ListBody::Byte(v) => DatumBody::Byte(v[i]),
            ListBody::Short(v) => DatumBody::Short(v[i]),
            ListBody::Int(v) => DatumBody::Int(v[i]),
            ListBody::Long(v) => DatumBody::Long(v[i]),
            ListBody::Float(v) => DatumBody::Float(v[i]),
            ListBody::Double(v) => DatumBody::Double(v[i]),
            ListBody::Long2(v) => DatumBody::Long2(v[i]),
            ListBody::Double2(v) => DatumBody::Double2(v[i]),
            ListBody::Duration(v) => DatumBody::Duration {
                value: v[i][0] as i32,
                unit: v[i][1],
            },
            ListBody::Decimal32 { scale, raws } => {
                DatumBody::Decimal32(Decimal32::from_parts(*scale, raws[i]))
            }
            ListBody::Decimal64 { scale, raws } => {
                DatumBody::Decimal64(Decimal64::from_parts(*scale, raws[i]))
            }
            ListBody::Decimal128 { scale, raws } => {
                DatumBody::Decimal128(Decimal128::from_parts(*scale, raws[i]))
            }
            ListBody::Str(v) => DatumBody::Str(v[i].clone()),
            ListBody::Blob(v) => DatumBody::Blob(v[i].clone()),
            ListBody::Any(v) => DatumBody::Any(Box::new(v[i].clone())),
        };
        Ok(Datum::new_unchecked(self.ty, body))
    }

    /// Type-checked. The column is untouched on error.
    pub fn set(&mut self, i: usize, dat: &Datum) -> Result<()> {
        self.check_index(i)?;
        self.put(Some(i), dat)
    }

    pub fn append(&mut self, dat: &Datum) -> Result<()> {
        self.put(None, dat)
    }

    pub fn set_null(&mut self, i: usize) -> Result<()> {
        self.check_index(i)?;
        let scale = self.body.decimal_scale().unwrap_or_default();
        let null = Datum::new_unchecked(self.ty, DatumBody::null_of(self.body.family(), scale));
        self.put(Some(i), &null)
    }

    pub fn is_null(&self, i: usize) -> Result<bool> {
        Ok(self.get(i)?.is_null())
    }

    fn put(&mut self, slot: Option<usize>, dat: &Datum) -> Result<()> {
        if self.ty != ElemType::Any && !self.ty.is_compatible(dat.ty()) {
            return Err(CodecError::type_mismatch(self.ty, dat.ty()));
        }
        match (&mut self.body, dat.body()) {
            (ListBody::Void(n), DatumBody::Void) => {
                if slot.is_none() {
                    *n += 1;
                }
            }
            (ListBody::Byte(v), DatumBody::Byte(x)) => put_at!(v, slot, *x),
            (ListBody::Short(v), DatumBody::Short(x)) => put_at!(v, slot, *x),
            (ListBody::Int(v), DatumBody::Int(x)) => put_at!(v, slot, *x),
            (ListBody::Long(v), DatumBody::Long(x)) => put_at!(v, slot, *x),
            (ListBody::Float(v), DatumBody::Float(x)) => put_at!(v, slot, *x),
            (ListBody::Double(v), DatumBody::Double(x)) => put_at!(v, slot, *x),
            (ListBody::Long2(v), DatumBody::Long2(x)) => put_at!(v, slot, *x),
            (ListBody::Double2(v), DatumBody::Double2(x)) => put_at!(v, slot, *x),
            (ListBody::Duration(v), DatumBody::Duration { value, unit }) => {
                put_at!(v, slot, [*value as u32, *unit])
            }
            (ListBody::Decimal32 { scale, raws }, DatumBody::Decimal32(d)) => {
                put_at!(raws, slot, d.rescale(*scale)?.raw())
            }
            (ListBody::Decimal64 { scale, raws }, DatumBody::Decimal64(d)) => {
                put_at!(raws, slot, d.rescale(*scale)?.raw())
            }
            (ListBody::Decimal128 { scale, raws }, DatumBody::Decimal128(d)) => {
                put_at!(raws, slot, d.rescale(*scale)?.raw())
            }
            (ListBody::Str(v), DatumBody::Str(s)) => put_at!(v, slot, s.clone()),
            (ListBody::Blob(v), DatumBody::Blob(b)) => put_at!(v, slot, b.clone()),
            (ListBody::Any(v), DatumBody::Any(form)) => put_at!(v, slot, (**form).clone()),
            (ListBody::Any(v), _) => put_at!(v, slot, DataForm::Scalar(dat.clone())),
            _ => return Err(CodecError::type_mismatch(self.ty, dat.ty())),
        }
        Ok(())
    }

    /// Elements `start..end`.
    pub fn sub(&self, start: usize, end: usize) -> Result<Self> {
        if start > end || end > self.len() {
            return Err(CodecError::IndexOutOfRange {
                index: end.max(start),
                len: self.len(),
            });
        }
        let body = map_vecs!(&self.body, void _n => end - start, v => v[start..end].to_vec());
        Ok(Self::new_unchecked(self.ty, body))
    }

    /// Elements at `indexes`, in that order.
    pub fn gather(&self, indexes: &[usize]) -> Result<Self> {
        for i in indexes {
            self.check_index(*i)?;
        }
        let body = map_vecs!(
            &self.body,
            void _n => indexes.len(),
            v => indexes.iter().map(|i| v[*i].clone()).collect()
        );
        Ok(Self::new_unchecked(self.ty, body))
    }

    /// Decimal columns only.
    pub fn rescale(&self, to: i32) -> Result<Self> {
        if self.body.decimal_scale().is_none() {
            return Err(CodecError::type_mismatch("decimal", self.ty));
        }
        let mut out = Self::empty_with_scale(self.ty, to)?;
        for i in 0..self.len() {
            out.append(&self.get(i)?)?;
        }
        Ok(out)
    }

    /// Self followed by `other`.
    pub fn combine(&self, other: &DatumList) -> Result<Self> {
        let mut out = self.clone();
        out.extend(other)?;
        Ok(out)
    }

    /// Appends every element of `other`. Decimals are brought to this column's scale.
    /// The column is untouched on error.
    pub fn extend(&mut self, other: &DatumList) -> Result<()> {
        if !self.ty.is_compatible(other.ty) {
            return Err(CodecError::type_mismatch(self.ty, other.ty));
        }
        let rescaled;
        let other = match self.body.decimal_scale() {
            Some(scale) if other.body.decimal_scale() != Some(scale) => {
                rescaled = other.rescale(scale)?;
                &rescaled
            }
            _ => other,
        };
        match (&mut self.body, &other.body) {
            (ListBody::Void(a), ListBody::Void(b)) => *a += b,
            (ListBody::Byte(a), ListBody::Byte(b)) => a.extend_from_slice(b),
            (ListBody::Short(a), ListBody::Short(b)) => a.extend_from_slice(b),
            (ListBody::Int(a), ListBody::Int(b)) => a.extend_from_slice(b),
            (ListBody::Long(a), ListBody::Long(b)) => a.extend_from_slice(b),
            (ListBody::Float(a), ListBody::Float(b)) => a.extend_from_slice(b),
            (ListBody::Double(a), ListBody::Double(b)) => a.extend_from_slice(b),
            (ListBody::Long2(a), ListBody::Long2(b)) => a.extend_from_slice(b),
            (ListBody::Double2(a), ListBody::Double2(b)) => a.extend_from_slice(b),
            (ListBody::Duration(a), ListBody::Duration(b)) => a.extend_from_slice(b),
            (ListBody::Decimal32 { raws: a, .. }, ListBody::Decimal32 { raws: b, .. }) => {
                a.extend_from_slice(b)
            }
            (ListBody::Decimal64 { raws: a, .. }, ListBody::Decimal64 { raws: b, .. }) => {
                a.extend_from_slice(b)
            }
            (ListBody::Decimal128 { raws: a, .. }, ListBody::Decimal128 { raws: b, .. }) => {
                a.extend_from_slice(b)
            }
            (ListBody::Str(a), ListBody::Str(b)) => a.extend_from_slice(b),
            (ListBody::Blob(a), ListBody::Blob(b)) => a.extend_from_slice(b),
            (ListBody::Any(a), ListBody::Any(b)) => a.extend_from_slice(b),
            _ => return Err(CodecError::type_mismatch(self.ty, other.ty)),
        }
        Ok(())
    }

    /// Largest `i` with `self[i] <= value` in a column sorted ascending, or -1.
    /// Also -1 for a value of another type, or a column of a category without an order.
    pub fn as_of(&self, value: &Datum) -> i64 {
        if !self.ty.is_compatible(value.ty()) {
            return -1;
        }
        match self.ty.category() {
            TypeCategory::Mixed
            | TypeCategory::Nothing
            | TypeCategory::Logical
            | TypeCategory::System
            | TypeCategory::Binary => return -1,
            _ => {}
        }
        match (&self.body, value.body()) {
            (ListBody::Byte(v), DatumBody::Byte(x)) => bisect::as_of(v, |e| e.cmp(x)),
            (ListBody::Short(v), DatumBody::Short(x)) => bisect::as_of(v, |e| e.cmp(x)),
            (ListBody::Int(v), DatumBody::Int(x)) => bisect::as_of(v, |e| e.cmp(x)),
            (ListBody::Long(v), DatumBody::Long(x)) => bisect::as_of(v, |e| e.cmp(x)),
            (ListBody::Float(v), DatumBody::Float(x)) => bisect::as_of(v, |e| e.total_cmp(x)),
            (ListBody::Double(v), DatumBody::Double(x)) => bisect::as_of(v, |e| e.total_cmp(x)),
            (ListBody::Str(v), DatumBody::Str(x)) => bisect::as_of(v, |e| e.as_str().cmp(x)),
            (ListBody::Decimal32 { scale, raws }, DatumBody::Decimal32(d)) => {
                decimal_as_of(raws, *scale, i128::from(d.raw()), d.scale())
            }
            (ListBody::Decimal64 { scale, raws }, DatumBody::Decimal64(d)) => {
                decimal_as_of(raws, *scale, i128::from(d.raw()), d.scale())
            }
            (ListBody::Decimal128 { scale, raws }, DatumBody::Decimal128(d)) => {
                decimal_as_of(raws, *scale, d.raw(), d.scale())
            }
            _ => -1,
        }
    }

    pub fn string_list(&self) -> Vec<String> {
        (0..self.len())
            .map(|i| self.element_string(i).unwrap_or_default())
            .collect()
    }

    pub fn element_string(&self, i: usize) -> Result<String> {
        let dat = self.get(i)?;
        Ok(render_body(self.ty, dat.body()))
    }

    pub fn hash_bucket(&self, i: usize, buckets: i32) -> Result<i32> {
        let dat = self.get(i)?;
        Ok(body_hash_bucket(self.ty, dat.body(), buckets))
    }
}

/// Compares at the larger of the two scales, where scaling up is exact.
fn decimal_as_of<T>(raws: &[T], col_scale: i32, raw: i128, scale: i32) -> i64
where
    T: Copy + Into<i128>,
{
    let common = col_scale.max(scale).max(0) as u32;
    let Some(probe) = decimal::rescale_raw(raw, scale.max(0) as u32, common) else {
        return -1;
    };
    bisect::as_of(raws, |e| {
        decimal::rescale_raw((*e).into(), col_scale.max(0) as u32, common)
            .map_or(Ordering::Greater, |e| e.cmp(&probe))
    })
}
