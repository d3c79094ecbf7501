use crate::error::{CodecError, Result};
use crate::model::extend::SymbolBaseCollection;
use crate::model::{Category, Datum, FormType, Ser, TypeByte, Vector};
use crate::protocol::{ByteOrder, ProtocolReader, ProtocolWriter, WriteLen};
use std::fmt;
use std::io::{Read, Write};

const HAS_ROW_LABELS: u8 = 0x01;
const HAS_COL_LABELS: u8 = 0x02;

/// A column-major grid, with optional label vectors for either axis.
#[derive(PartialEq, Clone, Debug)]
pub struct Matrix {
    row_labels: Option<Vector>,
    col_labels: Option<Vector>,
    data: Vector,
}

impl Matrix {
    pub fn new(data: Vector, row_labels: Option<Vector>, col_labels: Option<Vector>) -> Self {
        Self {
            row_labels,
            col_labels,
            data,
        }
    }

    pub fn data(&self) -> &Vector {
        &self.data
    }

    pub fn row_labels(&self) -> Option<&Vector> {
        self.row_labels.as_ref()
    }

    pub fn col_labels(&self) -> Option<&Vector> {
        self.col_labels.as_ref()
    }

    pub fn rows(&self) -> usize {
        self.data.rows()
    }

    pub fn cols(&self) -> usize {
        self.data.cols()
    }

    pub fn type_byte(&self) -> TypeByte {
        self.data.type_byte()
    }

    fn index(&self, row: usize, col: usize) -> Result<usize> {
        if row >= self.rows() {
            return Err(CodecError::IndexOutOfRange {
                index: row,
                len: self.rows(),
            });
        }
        if col >= self.cols() {
            return Err(CodecError::IndexOutOfRange {
                index: col,
                len: self.cols(),
            });
        }
        Ok(col * self.rows() + row)
    }

    pub fn get(&self, row: usize, col: usize) -> Result<Datum> {
        self.data.get(self.index(row, col)?)
    }

    pub fn set(&mut self, row: usize, col: usize, dat: &Datum) -> Result<()> {
        let i = self.index(row, col)?;
        self.data.set(i, dat)
    }

    pub fn set_null(&mut self, row: usize, col: usize) -> Result<()> {
        let i = self.index(row, col)?;
        self.data.set_null(i)
    }

    pub fn is_null(&self, row: usize, col: usize) -> Result<bool> {
        self.data.is_null(self.index(row, col)?)
    }

    pub(crate) fn deser_body<R: Read>(r: &mut ProtocolReader<R>, bo: ByteOrder) -> Result<Self> {
        let flags = r.read_byte()?;
        let row_labels = match flags & HAS_ROW_LABELS {
            0 => None,
            _ => Some(Vector::deser(r, bo)?),
        };
        let col_labels = match flags & HAS_COL_LABELS {
            0 => None,
            _ => Some(Vector::deser(r, bo)?),
        };
        let data = Vector::deser(r, bo)?;
        Ok(Self {
            row_labels,
            col_labels,
            data,
        })
    }
}

impl Ser for Matrix {
    fn ser<W: Write>(&self, w: &mut ProtocolWriter<W>, bo: ByteOrder) -> Result<WriteLen> {
        let cat = Category::new(FormType::Matrix, self.type_byte());
        let mut w_len = cat.ser(w)?;

        let mut flags = 0;
        if self.row_labels.is_some() {
            flags |= HAS_ROW_LABELS;
        }
        if self.col_labels.is_some() {
            flags |= HAS_COL_LABELS;
        }
        w_len += w.write_byte(flags)?;

        for labels in [&self.row_labels, &self.col_labels].into_iter().flatten() {
            w_len += labels.ser(w, bo)?;
        }

        w_len += cat.ser(w)?;
        w_len += self
            .data
            .ser_body(w, bo, &mut SymbolBaseCollection::default())?;
        Ok(w_len)
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ty = self.type_byte().name();
        writeln!(f, "matrix<{}>[{}r][{}c]({{", ty, self.rows(), self.cols())?;
        for (axis, labels) in [("rows", &self.row_labels), ("cols", &self.col_labels)] {
            match labels {
                Some(labels) => writeln!(f, "  {}: [{}],", axis, labels.string_list().join(", "))?,
                None => writeln!(f, "  {}: null,", axis)?,
            }
        }
        writeln!(f, "  data: {}Array({}) [", ty, self.rows() * self.cols())?;
        for v in self.data.string_list() {
            writeln!(f, "    {},", v)?;
        }
        writeln!(f, "  ]")?;
        write!(f, "}})")
    }
}
