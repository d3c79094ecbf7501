use crate::error::Result;
use crate::model::list::{DatumList, ListBody};
use crate::model::Ser;
use crate::protocol::bulk::{encode_one, encode_slice};
use crate::protocol::{ByteOrder, ProtocolWriter, WriteLen, STRING_SEP};
use std::io::Write;

impl ListBody {
    /// The bare elements, without any count. Decimals lead with their scale.
    pub fn ser<W: Write>(&self, w: &mut ProtocolWriter<W>, bo: ByteOrder) -> Result<WriteLen> {
        let mut w_len = WriteLen::default();
        if let Some(scale) = self.decimal_scale() {
            w_len += w.write(&encode_one(bo, scale))?;
        }
        w_len += self.ser_elems(w, bo)?;
        Ok(w_len)
    }

    /// The elements alone, with no decimal scale.
    pub(crate) fn ser_elems<W: Write>(
        &self,
        w: &mut ProtocolWriter<W>,
        bo: ByteOrder,
    ) -> Result<WriteLen> {
        let mut w_len = WriteLen::default();
        match self {
            ListBody::Void(_) => {}
            ListBody::Byte(v) => w_len += w.write(&encode_slice(bo, v))?,
            ListBody::Short(v) => w_len += w.write(&encode_slice(bo, v))?,
            ListBody::Int(v) => w_len += w.write(&encode_slice(bo, v))?,
            ListBody::Long(v) => w_len += w.write(&encode_slice(bo, v))?,
            ListBody::Float(v) => w_len += w.write(&encode_slice(bo, v))?,
            ListBody::Double(v) => w_len += w.write(&encode_slice(bo, v))?,
            ListBody::Long2(v) => w_len += w.write(&encode_slice(bo, v))?,
            ListBody::Double2(v) => w_len += w.write(&encode_slice(bo, v))?,
            ListBody::Duration(v) => w_len += w.write(&encode_slice(bo, v))?,
            ListBody::Decimal32 { raws, .. } => w_len += w.write(&encode_slice(bo, raws))?,
            ListBody::Decimal64 { raws, .. } => w_len += w.write(&encode_slice(bo, raws))?,
            ListBody::Decimal128 { raws, .. } => w_len += w.write(&encode_slice(bo, raws))?,
            ListBody::Str(v) => {
                for s in v {
                    w_len += w.write_string(s)?;
                    w_len += w.write_byte(STRING_SEP)?;
                }
            }
            ListBody::Blob(v) => {
                for b in v {
                    w_len += w.write(&encode_one(bo, b.len() as u32))?;
                    w_len += w.write(b)?;
                }
            }
            ListBody::Any(v) => {
                for form in v {
                    w_len += form.ser(w, bo)?;
                }
            }
        }
        Ok(w_len)
    }
}

impl Ser for DatumList {
    fn ser<W: Write>(&self, w: &mut ProtocolWriter<W>, bo: ByteOrder) -> Result<WriteLen> {
        self.body().ser(w, bo)
    }
}
