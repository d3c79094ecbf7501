use crate::error::Result;
use crate::model::datum::{Datum, DatumBody};
use crate::model::Ser;
use crate::protocol::bulk::encode_one;
use crate::protocol::{ByteOrder, ProtocolWriter, WriteLen, STRING_SEP};
use std::io::Write;

impl DatumBody {
    /// The value alone. The category is the enclosing form's business.
    pub fn ser<W: Write>(&self, w: &mut ProtocolWriter<W>, bo: ByteOrder) -> Result<WriteLen> {
        let mut w_len = WriteLen::default();
        match self {
            DatumBody::Void => w_len += w.write_byte(0)?,
            DatumBody::Byte(v) => w_len += w.write_byte(*v as u8)?,
            DatumBody::Short(v) => w_len += w.write(&encode_one(bo, *v))?,
            DatumBody::Int(v) => w_len += w.write(&encode_one(bo, *v))?,
            DatumBody::Long(v) => w_len += w.write(&encode_one(bo, *v))?,
            DatumBody::Float(v) => w_len += w.write(&encode_one(bo, *v))?,
            DatumBody::Double(v) => w_len += w.write(&encode_one(bo, *v))?,
            DatumBody::Long2(v) => w_len += w.write(&encode_one(bo, *v))?,
            DatumBody::Double2(v) => w_len += w.write(&encode_one(bo, *v))?,
            DatumBody::Duration { value, unit } => {
                w_len += w.write(&encode_one(bo, *value))?;
                w_len += w.write(&encode_one(bo, *unit))?;
            }
            DatumBody::Decimal32(d) => {
                w_len += w.write(&encode_one(bo, d.scale()))?;
                w_len += w.write(&encode_one(bo, d.raw()))?;
            }
            DatumBody::Decimal64(d) => {
                w_len += w.write(&encode_one(bo, d.scale()))?;
                w_len += w.write(&encode_one(bo, d.raw()))?;
            }
            DatumBody::Decimal128(d) => {
                w_len += w.write(&encode_one(bo, d.scale()))?;
                w_len += w.write(&encode_one(bo, d.raw()))?;
            }
            DatumBody::Str(s) => {
                w_len += w.write_string(s)?;
                w_len += w.write_byte(STRING_SEP)?;
            }
            DatumBody::Blob(b) => {
                w_len += w.write(&encode_one(bo, b.len() as u32))?;
                w_len += w.write(b)?;
            }
            DatumBody::Any(form) => w_len += form.ser(w, bo)?,
        }
        Ok(w_len)
    }
}

impl Ser for Datum {
    fn ser<W: Write>(&self, w: &mut ProtocolWriter<W>, bo: ByteOrder) -> Result<WriteLen> {
        self.body().ser(w, bo)
    }
}
