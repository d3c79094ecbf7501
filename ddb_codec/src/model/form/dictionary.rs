use crate::error::{CodecError, Result};
use crate::model::{Category, Datum, FormType, Ser, TypeByte, Vector};
use crate::protocol::{ByteOrder, ProtocolReader, ProtocolWriter, WriteLen};
use std::fmt;
use std::io::{Read, Write};

/// Parallel key and value vectors. The category carries the value type.
#[derive(PartialEq, Clone, Debug)]
pub struct Dictionary {
    keys: Vector,
    values: Vector,
}

impl Dictionary {
    pub fn new(keys: Vector, values: Vector) -> Result<Self> {
        if keys.len() != values.len() {
            return Err(CodecError::LengthMismatch {
                expected: keys.len(),
                actual: values.len(),
            });
        }
        Ok(Self { keys, values })
    }

    pub fn keys(&self) -> &Vector {
        &self.keys
    }

    pub fn values(&self) -> &Vector {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn type_byte(&self) -> TypeByte {
        self.values.type_byte()
    }

    pub fn key_strings(&self) -> Vec<String> {
        self.keys.string_list()
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.key_strings().iter().position(|k| k == key)
    }

    /// The value whose key prints as `key`.
    pub fn get(&self, key: &str) -> Result<Datum> {
        match self.position(key) {
            Some(i) => self.values.get(i),
            None => Err(CodecError::invalid_value(
                "dictionary key",
                key,
                "no such key",
            )),
        }
    }

    /// Overwrites the value under `key`, or appends the pair.
    pub fn set(&mut self, key: &Datum, value: &Datum) -> Result<()> {
        if let Some(i) = self.position(&key.to_string()) {
            return self.values.set(i, value);
        }
        let mut keys = self.keys.clone();
        keys.append(key)?;
        self.values.append(value)?;
        self.keys = keys;
        Ok(())
    }

    pub(crate) fn deser_body<R: Read>(r: &mut ProtocolReader<R>, bo: ByteOrder) -> Result<Self> {
        let keys = Vector::deser(r, bo)?;
        let values = Vector::deser(r, bo)?;
        Ok(Self { keys, values })
    }
}

impl Ser for Dictionary {
    fn ser<W: Write>(&self, w: &mut ProtocolWriter<W>, bo: ByteOrder) -> Result<WriteLen> {
        let mut w_len = Category::new(FormType::Dictionary, self.type_byte()).ser(w)?;
        w_len += self.keys.ser(w, bo)?;
        w_len += self.values.ser(w, bo)?;
        Ok(w_len)
    }
}

impl fmt::Display for Dictionary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let key_ty = self.keys.type_byte().name();
        let val_ty = self.values.type_byte().name();
        let n = self.keys.rows();
        writeln!(f, "dict<{key_ty}, {val_ty}>([")?;
        writeln!(f, "  {key_ty}[{n}]([{}]),", self.keys.string_list().join(", "))?;
        writeln!(f, "  {val_ty}[{n}]([{}]),", self.values.string_list().join(", "))?;
        write!(f, "])")
    }
}
