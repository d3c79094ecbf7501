//! Data forms: the container shapes every encoded object arrives in.
//!
//! ```text
//! scalar      [cat] value
//! vector      [cat] rows:u32 cols:u32 column
//! pair        [cat] rows:u32 cols:u32 column
//! matrix      [cat] flags:u8 [row labels: vector] [col labels: vector] [cat] rows:u32 cols:u32 column
//! set         [cat] vector
//! dictionary  [cat] keys: vector, values: vector
//! table       [cat] rows:u32 cols:u32 name column_names vector*
//! chart       [cat] keys: vector<string>, values: vector<any>
//! ```

mod chart;
mod dictionary;
mod matrix;
mod pair;
mod set;
mod table;
mod vector;


pub use chart::*;
pub use dictionary::*;
pub use matrix::*;
pub use pair::*;
pub use set::*;
pub use table::*;
pub use vector::*;

use crate::error::{CodecError, Result};
use crate::model::{Category, Datum, ElemType, FormType, Ser, TypeByte};
use crate::protocol::{ByteOrder, ProtocolReader, ProtocolWriter, WriteLen};
use derive_more::From;
use std::fmt;
use std::io::{Read, Write};

#[derive(From, PartialEq, Clone, Debug)]
pub enum DataForm {
    Scalar(Datum),
    Vector(Vector),
    Pair(Pair),
    Matrix(Matrix),
    Set(Set),
    Dictionary(Dictionary),
    Table(Table),
    Chart(Chart),
}

macro_rules! form_accessors {
    ($( $fn:ident => $variant:ident($t:ty) ),* $(,)?) => {
        $(
            pub fn $fn(&self) -> Option<&$t> {
                match self {
                    DataForm::$variant(inner) => Some(inner),
                    _ => None,
                }
            }
        )*
    };
}

impl DataForm {
    /// The null `any` value.
    pub fn void() -> Self {
        DataForm::Scalar(Datum::void())
    }

    pub fn is_void(&self) -> bool {
        matches!(self, DataForm::Scalar(dat) if dat.ty() == ElemType::Void)
    }

    pub fn form_type(&self) -> FormType {
        match self {
            DataForm::Scalar(_) => FormType::Scalar,
            DataForm::Vector(_) => FormType::Vector,
            DataForm::Pair(_) => FormType::Pair,
            DataForm::Matrix(_) => FormType::Matrix,
            DataForm::Set(_) => FormType::Set,
            DataForm::Dictionary(_) => FormType::Dictionary,
            DataForm::Table(_) => FormType::Table,
            DataForm::Chart(_) => FormType::Chart,
        }
    }

    pub fn type_byte(&self) -> TypeByte {
        match self {
            DataForm::Scalar(dat) => dat.ty().into(),
            DataForm::Vector(v) => v.type_byte(),
            DataForm::Pair(p) => p.type_byte(),
            DataForm::Matrix(m) => m.type_byte(),
            DataForm::Set(s) => s.type_byte(),
            DataForm::Dictionary(d) => d.type_byte(),
            DataForm::Table(t) => t.type_byte(),
            DataForm::Chart(_) => ElemType::Any.into(),
        }
    }

    pub fn category(&self) -> Category {
        Category::new(self.form_type(), self.type_byte())
    }

    pub fn rows(&self) -> usize {
        match self {
            DataForm::Scalar(_) => 1,
            DataForm::Vector(v) => v.rows(),
            DataForm::Pair(p) => p.vector().rows(),
            DataForm::Matrix(m) => m.rows(),
            DataForm::Set(s) => s.vector().rows(),
            DataForm::Dictionary(d) => d.len(),
            DataForm::Table(t) => t.rows(),
            DataForm::Chart(c) => c.len(),
        }
    }

    form_accessors! {
        as_scalar => Scalar(Datum),
        as_vector => Vector(Vector),
        as_pair => Pair(Pair),
        as_matrix => Matrix(Matrix),
        as_set => Set(Set),
        as_dictionary => Dictionary(Dictionary),
        as_table => Table(Table),
        as_chart => Chart(Chart),
    }

    /// Reads one form. `None` for a shape id this codec does not know,
    /// in which case the reader is left right after the category.
    pub fn deser<R: Read>(r: &mut ProtocolReader<R>, bo: ByteOrder) -> Result<Option<Self>> {
        let cat = Category::deser(r)?;
        Self::deser_with_category(r, bo, cat)
    }

    pub fn deser_with_category<R: Read>(
        r: &mut ProtocolReader<R>,
        bo: ByteOrder,
        cat: Category,
    ) -> Result<Option<Self>> {
        log::trace!("[PARSE] {}", cat);
        let form = match cat.form() {
            Some(FormType::Scalar) => {
                if cat.type_byte.is_array() || cat.type_byte.is_symbol_extend() {
                    return Err(CodecError::Unsupported(format!(
                        "scalar of {}",
                        cat.type_byte.name()
                    )));
                }
                let dat = Datum::deser(r, cat.type_byte.elem_type()?, bo)?;
                DataForm::Scalar(dat)
            }
            Some(FormType::Vector) => DataForm::Vector(Vector::deser_body(
                r,
                bo,
                cat.type_byte,
                &mut Default::default(),
            )?),
            Some(FormType::Pair) => DataForm::Pair(Pair::deser_body(r, bo, cat)?),
            Some(FormType::Matrix) => DataForm::Matrix(Matrix::deser_body(r, bo)?),
            Some(FormType::Set) => DataForm::Set(Set::deser_body(r, bo)?),
            Some(FormType::Dictionary) => DataForm::Dictionary(Dictionary::deser_body(r, bo)?),
            Some(FormType::Table) => DataForm::Table(Table::deser_body(r, bo, cat)?),
            Some(FormType::Chart) => DataForm::Chart(Chart::deser_body(r, bo)?),
            Some(FormType::Chunk) | None => {
                log::warn!("[PARSE] no codec for data form {}", cat.form_byte);
                return Ok(None);
            }
        };
        Ok(Some(form))
    }
}

impl Ser for DataForm {
    fn ser<W: Write>(&self, w: &mut ProtocolWriter<W>, bo: ByteOrder) -> Result<WriteLen> {
        match self {
            DataForm::Scalar(dat) => {
                let mut w_len = self.category().ser(w)?;
                w_len += dat.ser(w, bo)?;
                Ok(w_len)
            }
            DataForm::Vector(v) => v.ser(w, bo),
            DataForm::Pair(p) => p.ser(w, bo),
            DataForm::Matrix(m) => m.ser(w, bo),
            DataForm::Set(s) => s.ser(w, bo),
            DataForm::Dictionary(d) => d.ser(w, bo),
            DataForm::Table(t) => t.ser(w, bo),
            DataForm::Chart(c) => c.ser(w, bo),
        }
    }
}

impl fmt::Display for DataForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataForm::Scalar(dat) => write!(f, "{}({})", dat.ty(), dat),
            DataForm::Vector(v) => fmt::Display::fmt(v, f),
            DataForm::Pair(p) => fmt::Display::fmt(p, f),
            DataForm::Matrix(m) => fmt::Display::fmt(m, f),
            DataForm::Set(s) => fmt::Display::fmt(s, f),
            DataForm::Dictionary(d) => fmt::Display::fmt(d, f),
            DataForm::Table(t) => fmt::Display::fmt(t, f),
            DataForm::Chart(c) => fmt::Display::fmt(c, f),
        }
    }
}
