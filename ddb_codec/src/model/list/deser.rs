use crate::error::Result;
use crate::model::datum::{read_nested_form, read_num, read_string};
use crate::model::decimal::{check_scale, Decimal128, Decimal32, Decimal64};
use crate::model::list::{DatumList, ListBody};
use crate::model::{ElemType, Family};
use crate::protocol::bulk::{decode_vec, WireNum};
use crate::protocol::{BlobBuffer, ByteOrder, ProtocolReader};
use std::io::Read;
use std::mem;

fn read_vec<T: WireNum, R: Read>(
    r: &mut ProtocolReader<R>,
    bo: ByteOrder,
    count: usize,
) -> Result<Vec<T>> {
    let buf = r.read_items(count, mem::size_of::<T>())?;
    Ok(decode_vec(bo, &buf))
}

pub(crate) fn read_scale<R: Read>(
    r: &mut ProtocolReader<R>,
    bo: ByteOrder,
    ty: ElemType,
    max: i32,
) -> Result<i32> {
    let scale = read_num(r, bo)?;
    check_scale(ty, scale, max)?;
    Ok(scale)
}

impl ListBody {
    /// Decimals lead with their scale.
    pub fn deser<R: Read>(
        r: &mut ProtocolReader<R>,
        ty: ElemType,
        bo: ByteOrder,
        count: usize,
    ) -> Result<Self> {
        let scale = match ty.family()? {
            Family::Decimal32 => read_scale(r, bo, ty, Decimal32::MAX_SCALE)?,
            Family::Decimal64 => read_scale(r, bo, ty, Decimal64::MAX_SCALE)?,
            Family::Decimal128 => read_scale(r, bo, ty, Decimal128::MAX_SCALE)?,
            _ => 0,
        };
        Self::deser_elems(r, ty, bo, count, scale)
    }

    /// `count` elements with no leading scale. `scale` applies to decimals only.
    pub(crate) fn deser_elems<R: Read>(
        r: &mut ProtocolReader<R>,
        ty: ElemType,
        bo: ByteOrder,
        count: usize,
        scale: i32,
    ) -> Result<Self> {
        let body = match ty.family()? {
            Family::Void => ListBody::Void(count),
            Family::Byte => ListBody::Byte(read_vec(r, bo, count)?),
            Family::Short => ListBody::Short(read_vec(r, bo, count)?),
            Family::Int => ListBody::Int(read_vec(r, bo, count)?),
            Family::Long => ListBody::Long(read_vec(r, bo, count)?),
            Family::Float => ListBody::Float(read_vec(r, bo, count)?),
            Family::Double => ListBody::Double(read_vec(r, bo, count)?),
            Family::Long2 => ListBody::Long2(read_vec(r, bo, count)?),
            Family::Double2 => ListBody::Double2(read_vec(r, bo, count)?),
            Family::Duration => ListBody::Duration(read_vec(r, bo, count)?),
            Family::Decimal32 => ListBody::Decimal32 {
                scale,
                raws: read_vec(r, bo, count)?,
            },
            Family::Decimal64 => ListBody::Decimal64 {
                scale,
                raws: read_vec(r, bo, count)?,
            },
            Family::Decimal128 => ListBody::Decimal128 {
                scale,
                raws: read_vec(r, bo, count)?,
            },
            Family::Str => {
                let strs = (0..count)
                    .map(|_| read_string(r))
                    .collect::<Result<Vec<_>>>()?;
                ListBody::Str(strs)
            }
            Family::Blob => {
                let blobs = BlobBuffer::new(r, bo, count).collect::<Result<Vec<_>>>()?;
                ListBody::Blob(blobs)
            }
            Family::Any => {
                let forms = (0..count)
                    .map(|_| read_nested_form(r, bo))
                    .collect::<Result<Vec<_>>>()?;
                ListBody::Any(forms)
            }
        };
        Ok(body)
    }
}

impl DatumList {
    pub fn deser<R: Read>(
        r: &mut ProtocolReader<R>,
        ty: ElemType,
        bo: ByteOrder,
        count: usize,
    ) -> Result<Self> {
        let body = ListBody::deser(r, ty, bo, count)?;
        Ok(DatumList::new_unchecked(ty, body))
    }
}
