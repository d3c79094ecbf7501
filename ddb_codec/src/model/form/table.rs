use crate::error::{CodecError, Result};
use crate::model::datum::read_string;
use crate::model::extend::SymbolBaseCollection;
use crate::model::{Category, ElemType, FormType, Ser, TypeByte, Vector};
use crate::protocol::bulk::{decode_one, encode_one};
use crate::protocol::{ByteOrder, ProtocolReader, ProtocolWriter, WriteLen, STRING_SEP};
use itertools::Itertools;
use serde_json::{Map, Value};
use std::fmt;
use std::io::{Read, Write};

/// Named columns of equal length.
///
/// Symbol-extend columns of one table share their bases on the wire.
#[derive(PartialEq, Clone, Debug)]
pub struct Table {
    type_byte: TypeByte,
    name: String,
    rows: usize,
    names: Vec<String>,
    columns: Vec<Vector>,
}

impl Table {
    pub fn new(names: Vec<String>, columns: Vec<Vector>) -> Result<Self> {
        if names.len() != columns.len() {
            return Err(CodecError::LengthMismatch {
                expected: names.len(),
                actual: columns.len(),
            });
        }
        let rows = columns.first().map_or(0, Vector::len);
        if let Some(col) = columns.iter().find(|col| col.len() != rows) {
            return Err(CodecError::LengthMismatch {
                expected: rows,
                actual: col.len(),
            });
        }
        Ok(Self {
            type_byte: ElemType::Void.into(),
            name: String::new(),
            rows,
            names,
            columns,
        })
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.columns.len()
    }

    pub fn type_byte(&self) -> TypeByte {
        self.type_byte
    }

    pub fn column_names(&self) -> &[String] {
        &self.names
    }

    pub fn columns(&self) -> &[Vector] {
        &self.columns
    }

    pub fn column_by_name(&self, name: &str) -> Option<&Vector> {
        let i = self.names.iter().position(|n| n == name)?;
        self.columns.get(i)
    }

    pub fn column_by_index(&self, i: usize) -> Option<&Vector> {
        self.columns.get(i)
    }

    /// Row `i` as a JSON object of column name to value text.
    pub fn row_json(&self, i: usize) -> Result<String> {
        if i >= self.rows {
            return Err(CodecError::IndexOutOfRange {
                index: i,
                len: self.rows,
            });
        }
        let mut obj = Map::new();
        for (name, col) in self.names.iter().zip(self.columns.iter()) {
            obj.insert(name.clone(), Value::String(col.element_string(i)?));
        }
        Ok(Value::Object(obj).to_string())
    }

    /// The rows at `indexes`, in that order.
    pub fn sub_table(&self, indexes: &[usize]) -> Result<Table> {
        let columns = self
            .columns
            .iter()
            .map(|col| col.gather(indexes))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            type_byte: self.type_byte,
            name: self.name.clone(),
            rows: indexes.len(),
            names: self.names.clone(),
            columns,
        })
    }

    pub(crate) fn deser_body<R: Read>(
        r: &mut ProtocolReader<R>,
        bo: ByteOrder,
        cat: Category,
    ) -> Result<Self> {
        let head = r.read_array::<8>()?;
        let rows = decode_one::<u32>(bo, &head[..4]) as usize;
        let cols = decode_one::<u32>(bo, &head[4..]) as usize;

        let name = read_string(r)?;
        let names = (0..cols)
            .map(|_| read_string(r))
            .collect::<Result<Vec<_>>>()?;

        let mut bases = SymbolBaseCollection::default();
        let columns = (0..cols)
            .map(|_| {
                let col_cat = Category::deser(r)?;
                Vector::deser_body(r, bo, col_cat.type_byte, &mut bases)
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            type_byte: cat.type_byte,
            name,
            rows,
            names,
            columns,
        })
    }
}

impl Ser for Table {
    fn ser<W: Write>(&self, w: &mut ProtocolWriter<W>, bo: ByteOrder) -> Result<WriteLen> {
        let mut w_len = Category::new(FormType::Table, self.type_byte).ser(w)?;
        w_len += w.write(&encode_one(bo, self.rows as u32))?;
        w_len += w.write(&encode_one(bo, self.columns.len() as u32))?;

        for s in [&self.name].into_iter().chain(self.names.iter()) {
            w_len += w.write_string(s)?;
            w_len += w.write_byte(STRING_SEP)?;
        }

        let mut bases = SymbolBaseCollection::default();
        for col in self.columns.iter() {
            w_len += col.category().ser(w)?;
            w_len += col.ser_body(w, bo, &mut bases)?;
        }
        Ok(w_len)
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "table[{}r][{}c]([\n\t", self.rows, self.columns.len())?;
        for (name, col) in self.names.iter().zip(self.columns.iter()) {
            let ty = col.type_byte().name();
            let vals = col.string_list();
            if vals.is_empty() {
                write!(f, "  {}[{}]('{}', null)\n\t", ty, col.rows(), name)?;
            } else {
                write!(
                    f,
                    "  {}[{}]('{}', [{}])\n\t",
                    ty,
                    col.rows(),
                    name,
                    vals.iter().join(", ")
                )?;
            }
        }
        write!(f, "])")
    }
}
