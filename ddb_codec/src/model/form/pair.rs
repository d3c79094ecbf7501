use crate::error::{CodecError, Result};
use crate::model::extend::SymbolBaseCollection;
use crate::model::{Category, FormType, Ser, TypeByte, Vector};
use crate::protocol::{ByteOrder, ProtocolReader, ProtocolWriter, WriteLen};
use std::fmt;
use std::io::{Read, Write};

/// Two values of one type. The header carries the `(2, 1)` shape.
#[derive(PartialEq, Clone, Debug)]
pub struct Pair {
    vector: Vector,
}

impl Pair {
    /// Any two-element vector; its shape is reset to `(2, 1)`.
    pub fn new(vector: Vector) -> Result<Self> {
        if vector.len() != 2 {
            return Err(CodecError::LengthMismatch {
                expected: 2,
                actual: vector.len(),
            });
        }
        let vector = Vector::with_shape(vector.into_data(), 2, 1)?;
        Ok(Self { vector })
    }

    pub fn vector(&self) -> &Vector {
        &self.vector
    }

    pub fn type_byte(&self) -> TypeByte {
        self.vector.type_byte()
    }

    pub(crate) fn deser_body<R: Read>(
        r: &mut ProtocolReader<R>,
        bo: ByteOrder,
        cat: Category,
    ) -> Result<Self> {
        let vector =
            Vector::deser_body(r, bo, cat.type_byte, &mut SymbolBaseCollection::default())?;
        Ok(Self { vector })
    }
}

impl Ser for Pair {
    fn ser<W: Write>(&self, w: &mut ProtocolWriter<W>, bo: ByteOrder) -> Result<WriteLen> {
        let mut w_len = Category::new(FormType::Pair, self.type_byte()).ser(w)?;
        w_len += self
            .vector
            .ser_body(w, bo, &mut SymbolBaseCollection::default())?;
        Ok(w_len)
    }
}

impl fmt::Display for Pair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "pair<{}>([{}])",
            self.type_byte().name(),
            self.vector.string_list().join(", ")
        )
    }
}
