//! Columns whose every row is itself a variable-length column.
//!
//! ```text
//! [scale: u32]            decimals only, once
//! repeated until row_count rows are read {
//!     seg_rows:  u16
//!     unit:      u16       width of one length entry: 1, 2 or 4
//!     lengths:   [uint<unit>; seg_rows]
//!     elements:  [elem; sum(lengths)]
//! }
//! ```

use crate::error::{CodecError, Result};
use crate::model::decimal::{Decimal128, Decimal32, Decimal64};
use crate::model::list::{read_scale, DatumList, ListBody};
use crate::model::{ElemType, Family, TypeByte};
use crate::protocol::bulk::{decode_one, encode_one};
use crate::protocol::{ByteOrder, ProtocolReader, ProtocolWriter, WriteLen};
use itertools::Itertools;
use std::io::{Read, Write};

pub const MAX_SEGMENT_ROWS: usize = u16::MAX as usize;

/// Width of one entry in a segment's length table.
pub fn length_unit(max_len: usize) -> u16 {
    if max_len < 256 {
        1
    } else if max_len < 65_536 {
        2
    } else {
        4
    }
}

#[derive(PartialEq, Clone, Debug)]
pub struct ArrayVector {
    ty: ElemType,
    rows: Vec<DatumList>,
}

impl ArrayVector {
    /// Every row must hold `ty`.
    pub fn new(ty: ElemType, rows: Vec<DatumList>) -> Result<Self> {
        if matches!(ty.family()?, Family::Str | Family::Blob | Family::Any | Family::Void) {
            return Err(CodecError::Unsupported(format!("{ty} array vector")));
        }
        for row in rows.iter() {
            if row.ty() != ty {
                return Err(CodecError::type_mismatch(ty, row.ty()));
            }
        }
        Ok(Self { ty, rows })
    }

    pub fn elem_type(&self) -> ElemType {
        self.ty
    }

    pub fn type_byte(&self) -> TypeByte {
        TypeByte::array_of(self.ty)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[DatumList] {
        &self.rows
    }

    pub fn row(&self, i: usize) -> Result<&DatumList> {
        self.rows.get(i).ok_or(CodecError::IndexOutOfRange {
            index: i,
            len: self.rows.len(),
        })
    }

    pub fn append_row(&mut self, row: DatumList) -> Result<()> {
        if row.ty() != self.ty {
            return Err(CodecError::type_mismatch(self.ty, row.ty()));
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn gather(&self, indexes: &[usize]) -> Result<Self> {
        let rows = indexes
            .iter()
            .map(|i| self.row(*i).cloned())
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { ty: self.ty, rows })
    }

    /// Each row as `[a, b]`.
    pub fn string_list(&self) -> Vec<String> {
        self.rows
            .iter()
            .map(|row| format!("[{}]", row.string_list().join(", ")))
            .collect()
    }

    /// All rows flattened, at the first row's scale.
    fn flatten(&self, rows: &[DatumList]) -> Result<DatumList> {
        let scale = self
            .rows
            .first()
            .and_then(|row| row.body().decimal_scale())
            .unwrap_or_default();
        let mut flat = DatumList::empty_with_scale(self.ty, scale)?;
        for row in rows {
            flat.extend(row)?;
        }
        Ok(flat)
    }

    pub fn ser<W: Write>(&self, w: &mut ProtocolWriter<W>, bo: ByteOrder) -> Result<WriteLen> {
        let mut w_len = WriteLen::default();
        let scale = self.rows.first().and_then(|row| row.body().decimal_scale());
        if let Some(scale) = scale {
            w_len += w.write(&encode_one(bo, scale))?;
        } else if matches!(
            self.ty.family()?,
            Family::Decimal32 | Family::Decimal64 | Family::Decimal128
        ) {
            w_len += w.write(&encode_one(bo, 0i32))?;
        }

        for segment in self.rows.chunks(MAX_SEGMENT_ROWS) {
            let max_len = segment.iter().map(DatumList::len).max().unwrap_or_default();
            let unit = length_unit(max_len);
            w_len += w.write(&encode_one(bo, segment.len() as u16))?;
            w_len += w.write(&encode_one(bo, unit))?;

            for row in segment {
                let len = row.len();
                let entry = match unit {
                    1 => vec![len as u8],
                    2 => encode_one(bo, len as u16),
                    _ => encode_one(bo, len as u32),
                };
                w_len += w.write(&entry)?;
            }

            w_len += self.flatten(segment)?.body().ser_elems(w, bo)?;
        }
        Ok(w_len)
    }

    pub fn deser<R: Read>(
        r: &mut ProtocolReader<R>,
        ty: ElemType,
        bo: ByteOrder,
        row_count: usize,
    ) -> Result<Self> {
        let scale = match ty.family()? {
            Family::Decimal32 => read_scale(r, bo, ty, Decimal32::MAX_SCALE)?,
            Family::Decimal64 => read_scale(r, bo, ty, Decimal64::MAX_SCALE)?,
            Family::Decimal128 => read_scale(r, bo, ty, Decimal128::MAX_SCALE)?,
            _ => 0,
        };

        let mut rows = vec![];
        while rows.len() < row_count {
            let seg_rows = decode_one::<u16>(bo, &r.read_array::<2>()?) as usize;
            let unit = decode_one::<u16>(bo, &r.read_array::<2>()?) as usize;
            if seg_rows == 0 {
                return Err(CodecError::invalid_value(
                    TypeByte::array_of(ty).name(),
                    0,
                    "segment of no rows",
                ));
            }
            if !matches!(unit, 1 | 2 | 4) {
                return Err(CodecError::invalid_value(
                    TypeByte::array_of(ty).name(),
                    unit,
                    "length unit must be 1, 2 or 4",
                ));
            }
            let table = r.read_items(seg_rows, unit)?;
            let lengths = table
                .chunks_exact(unit)
                .map(|c| match unit {
                    1 => c[0] as usize,
                    2 => decode_one::<u16>(bo, c) as usize,
                    _ => decode_one::<u32>(bo, c) as usize,
                })
                .collect_vec();

            let total = lengths.iter().sum();
            let body = ListBody::deser_elems(r, ty, bo, total, scale)?;
            let flat = DatumList::new(ty, body)?;

            let mut start = 0;
            for len in lengths {
                rows.push(flat.sub(start, start + len)?);
                start += len;
            }
        }
        Ok(Self { ty, rows })
    }
}
