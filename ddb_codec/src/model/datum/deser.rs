use crate::error::{CodecError, Result};
use crate::model::datum::{Datum, DatumBody};
use crate::model::decimal::{Decimal128, Decimal32, Decimal64};
use crate::model::{Category, DataForm, ElemType, Family};
use crate::protocol::bulk::{decode_one, WireNum};
use crate::protocol::{ByteOrder, ProtocolReader, STRING_SEP};
use std::io::Read;
use std::mem;

pub(crate) fn read_num<T: WireNum, R: Read>(r: &mut ProtocolReader<R>, bo: ByteOrder) -> Result<T> {
    let buf = r.read_exact(mem::size_of::<T>())?;
    Ok(decode_one(bo, &buf))
}

pub(crate) fn read_string<R: Read>(r: &mut ProtocolReader<R>) -> Result<String> {
    let buf = r.read_until(STRING_SEP)?;
    Ok(String::from_utf8(buf)?)
}

/// A nested form inside an `any` value. An unknown shape is an error here.
pub(crate) fn read_nested_form<R: Read>(
    r: &mut ProtocolReader<R>,
    bo: ByteOrder,
) -> Result<DataForm> {
    let cat = Category::deser(r)?;
    DataForm::deser_with_category(r, bo, cat)?.ok_or(CodecError::UnknownForm(cat.form_byte))
}

impl DatumBody {
    pub fn deser<R: Read>(
        r: &mut ProtocolReader<R>,
        family: Family,
        bo: ByteOrder,
    ) -> Result<Self> {
        let body = match family {
            Family::Void => {
                r.read_byte()?;
                DatumBody::Void
            }
            Family::Byte => DatumBody::Byte(r.read_byte()? as i8),
            Family::Short => DatumBody::Short(read_num(r, bo)?),
            Family::Int => DatumBody::Int(read_num(r, bo)?),
            Family::Long => DatumBody::Long(read_num(r, bo)?),
            Family::Float => DatumBody::Float(read_num(r, bo)?),
            Family::Double => DatumBody::Double(read_num(r, bo)?),
            Family::Long2 => DatumBody::Long2(read_num(r, bo)?),
            Family::Double2 => DatumBody::Double2(read_num(r, bo)?),
            Family::Duration => {
                let value = read_num(r, bo)?;
                let unit = read_num(r, bo)?;
                DatumBody::Duration { value, unit }
            }
            Family::Decimal32 => {
                let scale = read_num(r, bo)?;
                DatumBody::Decimal32(Decimal32::new(scale, read_num(r, bo)?)?)
            }
            Family::Decimal64 => {
                let scale = read_num(r, bo)?;
                DatumBody::Decimal64(Decimal64::new(scale, read_num(r, bo)?)?)
            }
            Family::Decimal128 => {
                let scale = read_num(r, bo)?;
                DatumBody::Decimal128(Decimal128::new(scale, read_num(r, bo)?)?)
            }
            Family::Str => DatumBody::Str(read_string(r)?),
            Family::Blob => {
                let len = read_num::<u32, _>(r, bo)? as usize;
                DatumBody::Blob(r.read_exact(len)?)
            }
            Family::Any => DatumBody::Any(Box::new(read_nested_form(r, bo)?)),
        };
        Ok(body)
    }
}

impl Datum {
    pub fn deser<R: Read>(r: &mut ProtocolReader<R>, ty: ElemType, bo: ByteOrder) -> Result<Self> {
        let body = DatumBody::deser(r, ty.family()?, bo)?;
        Ok(Datum::new_unchecked(ty, body))
    }
}
