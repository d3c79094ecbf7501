use crate::error::{CodecError, Result};
use crate::model::array_vector::ArrayVector;
use crate::model::extend::{SymbolBaseCollection, SymbolExtend};
use crate::model::hash;
use crate::model::list::DatumList;
use crate::model::{Category, DataForm, Datum, DatumBody, ElemType, FormType, Ser, TypeByte};
use crate::protocol::bulk::{decode_one, encode_one};
use crate::protocol::{ByteOrder, ProtocolReader, ProtocolWriter, WriteLen};
use derive_more::From;
use std::fmt;
use std::io::{Read, Write};

/// How a vector stores its elements, chosen by the type byte.
#[derive(From, PartialEq, Clone, Debug)]
pub enum VectorData {
    /// id <= 64
    Plain(DatumList),
    /// 64 < id <= 128
    Array(ArrayVector),
    /// id > 128
    Extend(SymbolExtend),
}

/// A column with a `(rows, cols)` shape.
///
/// Plain and extend data hold `rows * cols` elements.
/// Array data holds `rows` sub-columns.
#[derive(PartialEq, Clone, Debug)]
pub struct Vector {
    data: VectorData,
    rows: usize,
    cols: usize,
}

macro_rules! vector_from {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Vector {
                fn from(data: $t) -> Self {
                    Vector::new(data)
                }
            }
        )*
    };
}
vector_from!(VectorData, DatumList, ArrayVector, SymbolExtend);

impl Vector {
    /// A single-column vector.
    pub fn new(data: impl Into<VectorData>) -> Self {
        let data = data.into();
        let rows = match &data {
            VectorData::Plain(list) => list.len(),
            VectorData::Array(av) => av.len(),
            VectorData::Extend(ext) => ext.len(),
        };
        Self {
            data,
            rows,
            cols: 1,
        }
    }

    /// A column read as `rows` by `cols`, column-major.
    pub fn with_shape(data: impl Into<VectorData>, rows: usize, cols: usize) -> Result<Self> {
        let data = data.into();
        let (expected, actual) = match &data {
            VectorData::Plain(list) => (rows * cols, list.len()),
            VectorData::Extend(ext) => (rows * cols, ext.len()),
            VectorData::Array(av) => (rows, av.len()),
        };
        if expected != actual {
            return Err(CodecError::LengthMismatch { expected, actual });
        }
        Ok(Self { data, rows, cols })
    }

    pub fn data(&self) -> &VectorData {
        &self.data
    }

    pub fn into_data(self) -> VectorData {
        self.data
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of addressable elements.
    pub fn len(&self) -> usize {
        match &self.data {
            VectorData::Plain(list) => list.len(),
            VectorData::Array(av) => av.len(),
            VectorData::Extend(ext) => ext.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn type_byte(&self) -> TypeByte {
        match &self.data {
            VectorData::Plain(list) => list.ty().into(),
            VectorData::Array(av) => av.type_byte(),
            VectorData::Extend(_) => TypeByte::symbol_extend_of(ElemType::Symbol),
        }
    }

    pub fn category(&self) -> Category {
        Category::new(FormType::Vector, self.type_byte())
    }

    fn unsupported(type_byte: TypeByte, oper: &str) -> CodecError {
        CodecError::Unsupported(format!("{} on {}", oper, type_byte.name()))
    }

    pub fn get(&self, i: usize) -> Result<Datum> {
        let tb = self.type_byte();
        match &self.data {
            VectorData::Plain(list) => list.get(i),
            VectorData::Extend(ext) => ext.get(i),
            VectorData::Array(_) => Err(Self::unsupported(tb, "get")),
        }
    }

    /// One row of an array vector.
    pub fn row(&self, i: usize) -> Result<&DatumList> {
        let tb = self.type_byte();
        match &self.data {
            VectorData::Array(av) => av.row(i),
            _ => Err(Self::unsupported(tb, "row")),
        }
    }

    pub fn set(&mut self, i: usize, dat: &Datum) -> Result<()> {
        let tb = self.type_byte();
        match &mut self.data {
            VectorData::Plain(list) => list.set(i, dat),
            VectorData::Extend(ext) => ext.set(i, dat),
            VectorData::Array(_) => Err(Self::unsupported(tb, "set")),
        }
    }

    /// Grows a single-column vector by one row.
    pub fn append(&mut self, dat: &Datum) -> Result<()> {
        let tb = self.type_byte();
        if self.cols != 1 {
            return Err(Self::unsupported(tb, "append to a multi-column shape"));
        }
        match &mut self.data {
            VectorData::Plain(list) => list.append(dat)?,
            VectorData::Extend(ext) => ext.append(dat)?,
            VectorData::Array(_) => return Err(Self::unsupported(tb, "append")),
        }
        self.rows += 1;
        Ok(())
    }

    pub fn append_row(&mut self, row: DatumList) -> Result<()> {
        let tb = self.type_byte();
        match &mut self.data {
            VectorData::Array(av) => av.append_row(row)?,
            _ => return Err(Self::unsupported(tb, "append_row")),
        }
        self.rows += 1;
        Ok(())
    }

    pub fn set_null(&mut self, i: usize) -> Result<()> {
        let tb = self.type_byte();
        match &mut self.data {
            VectorData::Plain(list) => list.set_null(i),
            VectorData::Extend(ext) => ext.set_null(i),
            VectorData::Array(_) => Err(Self::unsupported(tb, "set_null")),
        }
    }

    pub fn is_null(&self, i: usize) -> Result<bool> {
        let tb = self.type_byte();
        match &self.data {
            VectorData::Plain(list) => list.is_null(i),
            VectorData::Extend(ext) => ext.is_null(i),
            VectorData::Array(_) => Err(Self::unsupported(tb, "is_null")),
        }
    }

    /// Partition bucket of element `i`. A scalar held in an `any` column hashes as itself.
    pub fn hash_bucket(&self, i: usize, buckets: i32) -> Result<i32> {
        match &self.data {
            VectorData::Plain(list) => {
                let dat = list.get(i)?;
                match dat.body() {
                    DatumBody::Any(form) => Ok(match form.as_ref() {
                        DataForm::Scalar(inner) => inner.hash_bucket(buckets),
                        _ => 0,
                    }),
                    _ => list.hash_bucket(i, buckets),
                }
            }
            VectorData::Extend(ext) => {
                let dat = ext.get(i)?;
                Ok(hash::hash_str(dat.as_str()?, buckets))
            }
            VectorData::Array(_) => Ok(0),
        }
    }

    /// Index of the last element `<= value` in an ascending vector, or -1.
    pub fn as_of(&self, value: &Datum) -> i64 {
        match &self.data {
            VectorData::Plain(list) => list.as_of(value),
            VectorData::Extend(ext) => ext.to_list().map_or(-1, |list| list.as_of(value)),
            VectorData::Array(_) => -1,
        }
    }

    /// `self` followed by `other`, as one column.
    pub fn combine(&self, other: &Vector) -> Result<Vector> {
        let data = match (&self.data, &other.data) {
            (VectorData::Plain(a), VectorData::Plain(b)) => VectorData::from(a.combine(b)?),
            (VectorData::Extend(a), VectorData::Extend(b)) => VectorData::from(a.combine(b)),
            (VectorData::Array(a), VectorData::Array(b)) => {
                let rows = a.rows().iter().chain(b.rows()).cloned().collect();
                VectorData::from(ArrayVector::new(a.elem_type(), rows)?)
            }
            _ => {
                return Err(CodecError::type_mismatch(
                    self.type_byte().name(),
                    other.type_byte().name(),
                ))
            }
        };
        Ok(Vector::from(data))
    }

    /// Elements (or array rows) at `indexes`, as a single-column vector.
    pub fn gather(&self, indexes: &[usize]) -> Result<Vector> {
        let data = match &self.data {
            VectorData::Plain(list) => VectorData::from(list.gather(indexes)?),
            VectorData::Array(av) => VectorData::from(av.gather(indexes)?),
            VectorData::Extend(ext) => VectorData::from(ext.gather(indexes)?),
        };
        Ok(Vector::from(data))
    }

    pub fn element_string(&self, i: usize) -> Result<String> {
        match &self.data {
            VectorData::Plain(list) => list.element_string(i),
            VectorData::Extend(ext) => Ok(ext.get(i)?.to_string()),
            VectorData::Array(av) => Ok(format!("[{}]", av.row(i)?.string_list().join(", "))),
        }
    }

    pub fn string_list(&self) -> Vec<String> {
        match &self.data {
            VectorData::Plain(list) => list.string_list(),
            VectorData::Array(av) => av.string_list(),
            VectorData::Extend(ext) => ext.string_list(),
        }
    }

    /// Writes the shape and the elements, no category.
    pub(crate) fn ser_body<W: Write>(
        &self,
        w: &mut ProtocolWriter<W>,
        bo: ByteOrder,
        bases: &mut SymbolBaseCollection,
    ) -> Result<WriteLen> {
        let mut w_len = w.write(&encode_one(bo, self.rows as u32))?;
        w_len += w.write(&encode_one(bo, self.cols as u32))?;
        w_len += match &self.data {
            VectorData::Plain(list) => list.ser(w, bo)?,
            VectorData::Array(av) => av.ser(w, bo)?,
            VectorData::Extend(ext) => ext.ser(w, bo, bases)?,
        };
        Ok(w_len)
    }

    pub(crate) fn deser_body<R: Read>(
        r: &mut ProtocolReader<R>,
        bo: ByteOrder,
        type_byte: TypeByte,
        bases: &mut SymbolBaseCollection,
    ) -> Result<Self> {
        let head = r.read_array::<8>()?;
        let rows = decode_one::<u32>(bo, &head[..4]) as usize;
        let cols = decode_one::<u32>(bo, &head[4..]) as usize;
        let count = rows.checked_mul(cols).ok_or(CodecError::LengthOverflow {
            count: rows,
            width: cols,
        })?;

        let data = if type_byte.is_symbol_extend() {
            VectorData::from(SymbolExtend::deser(r, bo, count, bases)?)
        } else if type_byte.is_array() {
            VectorData::from(ArrayVector::deser(r, type_byte.elem_type()?, bo, rows)?)
        } else {
            VectorData::from(DatumList::deser(r, type_byte.elem_type()?, bo, count)?)
        };
        Ok(Self { data, rows, cols })
    }

    /// Reads a category and the vector behind it, whatever shape id the category carries.
    pub fn deser<R: Read>(r: &mut ProtocolReader<R>, bo: ByteOrder) -> Result<Self> {
        let cat = Category::deser(r)?;
        Self::deser_body(r, bo, cat.type_byte, &mut SymbolBaseCollection::default())
    }
}

impl Ser for Vector {
    fn ser<W: Write>(&self, w: &mut ProtocolWriter<W>, bo: ByteOrder) -> Result<WriteLen> {
        let mut w_len = self.category().ser(w)?;
        w_len += self.ser_body(w, bo, &mut SymbolBaseCollection::default())?;
        Ok(w_len)
    }
}

impl fmt::Display for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "vector<{}>([{}])",
            self.type_byte().name(),
            self.string_list().join(", ")
        )
    }
}
