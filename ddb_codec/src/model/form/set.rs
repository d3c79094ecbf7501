use crate::error::Result;
use crate::model::{Category, FormType, Ser, TypeByte, Vector};
use crate::protocol::{ByteOrder, ProtocolReader, ProtocolWriter, WriteLen};
use derive_more::From;
use std::fmt;
use std::io::{Read, Write};

/// A category followed by one complete vector.
#[derive(From, PartialEq, Clone, Debug)]
pub struct Set {
    vector: Vector,
}

impl Set {
    pub fn new(vector: Vector) -> Self {
        Self { vector }
    }

    pub fn vector(&self) -> &Vector {
        &self.vector
    }

    pub fn type_byte(&self) -> TypeByte {
        self.vector.type_byte()
    }

    pub(crate) fn deser_body<R: Read>(r: &mut ProtocolReader<R>, bo: ByteOrder) -> Result<Self> {
        Ok(Self {
            vector: Vector::deser(r, bo)?,
        })
    }
}

impl Ser for Set {
    fn ser<W: Write>(&self, w: &mut ProtocolWriter<W>, bo: ByteOrder) -> Result<WriteLen> {
        let mut w_len = Category::new(FormType::Set, self.type_byte()).ser(w)?;
        w_len += self.vector.ser(w, bo)?;
        Ok(w_len)
    }
}

impl fmt::Display for Set {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "set<{}>[{}]([{}])",
            self.type_byte().name(),
            self.vector.rows() * self.vector.cols(),
            self.vector.string_list().join(", ")
        )
    }
}
