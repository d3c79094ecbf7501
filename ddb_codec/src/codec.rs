//! Entry points for turning data forms into bytes and back.

use crate::config::CodecConfig;
use crate::error::{CodecError, Result};
use crate::model::{Category, DataForm, Ser};
use crate::protocol::response::{RequestHeader, ResponseHeader};
use crate::protocol::{ByteOrder, ProtocolReader, ProtocolWriter, WriteLen};
use std::io::{Cursor, Read, Write};

/// A decoded server reply.
#[derive(PartialEq, Clone, Debug)]
pub struct Response {
    pub header: ResponseHeader,
    /// In permissive mode, may hold fewer forms than the header announced.
    pub forms: Vec<DataForm>,
}

#[derive(Clone, Debug, Default)]
pub struct Codec {
    config: CodecConfig,
}

impl Codec {
    pub fn new(config: CodecConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    pub fn encode(&self, form: &DataForm) -> Result<Vec<u8>> {
        form.ser_solo(self.config.byte_order)
    }

    pub fn encode_to<W: Write>(
        &self,
        w: &mut ProtocolWriter<W>,
        form: &DataForm,
    ) -> Result<WriteLen> {
        form.ser(w, self.config.byte_order)
    }

    /// Decodes the first form in `bytes`, in the configured byte order.
    pub fn decode(&self, bytes: &[u8]) -> Result<Option<DataForm>> {
        let mut r = ProtocolReader::from(Cursor::new(bytes));
        self.decode_from(&mut r, self.config.byte_order)
    }

    /// `None` marks a form this codec has no reader for. The bytes behind it cannot be
    /// skipped, so the stream is unusable past that point.
    pub fn decode_from<R: Read>(
        &self,
        r: &mut ProtocolReader<R>,
        bo: ByteOrder,
    ) -> Result<Option<DataForm>> {
        let cat = Category::deser(r)?;
        match DataForm::deser_with_category(r, bo, cat)? {
            None if self.config.strict_forms => Err(CodecError::UnknownForm(cat.form_byte)),
            form => Ok(form),
        }
    }

    /// Reads a header line, the status line, then as many forms as the header announced.
    pub fn read_response<R: Read>(&self, r: &mut ProtocolReader<R>) -> Result<Response> {
        let header = ResponseHeader::deser(r)?;
        ResponseHeader::validate_ok(r)?;

        let mut forms = vec![];
        for i in 0..header.object_count {
            match self.decode_from(r, header.byte_order)? {
                Some(form) => forms.push(form),
                None => {
                    log::warn!(
                        "[RESPONSE] stopped at object {} of {}",
                        i,
                        header.object_count
                    );
                    break;
                }
            }
        }
        Ok(Response { header, forms })
    }

    /// Frames `command` and its arguments as one request.
    pub fn encode_request(
        &self,
        session_id: &str,
        command: &str,
        args: &[DataForm],
        flags: Option<String>,
    ) -> Result<Vec<u8>> {
        let mut body = ProtocolWriter::new(vec![]);
        body.write_string(command)?;
        for arg in args {
            arg.ser(&mut body, self.config.byte_order)?;
        }
        let body = body.into_inner()?;

        let header = RequestHeader {
            session_id: session_id.to_string(),
            body_len: body.len(),
            flags,
        };
        let mut w = ProtocolWriter::new(vec![]);
        header.ser(&mut w)?;
        w.write(&body)?;
        w.into_inner()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::model::{Datum, DatumList, ElemType, Vector};
    use anyhow::Result;

    fn strict() -> Codec {
        Codec::new(CodecConfig {
            strict_forms: true,
            ..Default::default()
        })
    }

    #[test]
    fn encode_decode() -> Result<()> {
        let codec = Codec::default();
        let form = DataForm::from(Vector::new(DatumList::from_ints(ElemType::Int, vec![1, 2])?));
        let bytes = codec.encode(&form)?;
        assert_eq!(
            bytes,
            vec![4, 1, 2, 0, 0, 0, 1, 0, 0, 0, 1, 0, 0, 0, 2, 0, 0, 0]
        );
        assert_eq!(codec.decode(&bytes)?, Some(form.clone()));

        let big = Codec::new(CodecConfig {
            byte_order: ByteOrder::BigEndian,
            ..Default::default()
        });
        let bytes = big.encode(&form)?;
        assert_eq!(&bytes[..6], &[4, 1, 0, 0, 0, 2]);
        assert_eq!(big.decode(&bytes)?, Some(form));
        Ok(())
    }

    #[test]
    fn unknown_form() -> Result<()> {
        let bytes = [4u8, 42, 0, 0];
        assert_eq!(Codec::default().decode(&bytes)?, None);
        assert!(matches!(
            strict().decode(&bytes),
            Err(CodecError::UnknownForm(42))
        ));
        Ok(())
    }

    #[test]
    fn response() -> Result<()> {
        let mut src = b"1167095168 2 1\nOK\n".to_vec();
        src.extend([4, 0, 7, 0, 0, 0]);
        src.extend([18, 0]);
        src.extend(b"hi\0");
        let mut r = ProtocolReader::from(Cursor::new(&src));
        let resp = Codec::default().read_response(&mut r)?;
        assert_eq!(resp.header.object_count, 2);
        assert_eq!(
            resp.forms,
            vec![
                DataForm::Scalar(Datum::int(7)),
                DataForm::Scalar(Datum::string("hi"))
            ]
        );
        assert_eq!(r.r_len(), src.len());

        let mut src = b"1 2 0\nOK\n".to_vec();
        src.extend([4, 0, 0, 0, 0, 9]);
        src.extend([4, 42]);
        let mut r = ProtocolReader::from(Cursor::new(&src));
        let resp = Codec::default().read_response(&mut r)?;
        assert_eq!(resp.header.byte_order, ByteOrder::BigEndian);
        assert_eq!(resp.forms, vec![DataForm::Scalar(Datum::int(9))]);

        let mut r = ProtocolReader::from(Cursor::new(&src));
        assert!(strict().read_response(&mut r).is_err());

        let mut r = ProtocolReader::from(Cursor::new(b"1 1 1\nServer is busy\n".to_vec()));
        assert!(matches!(
            Codec::default().read_response(&mut r),
            Err(CodecError::ServerError(_))
        ));
        Ok(())
    }

    #[test]
    fn request() -> Result<()> {
        let codec = Codec::default();
        let bytes = codec.encode_request(
            "42",
            "function\nadd\n2\n1\n",
            &[Datum::int(1).into(), Datum::int(2).into()],
            None,
        )?;
        let mut expected = b"API 42 29\nfunction\nadd\n2\n1\n".to_vec();
        expected.extend([4, 0, 1, 0, 0, 0, 4, 0, 2, 0, 0, 0]);
        assert_eq!(bytes, expected);
        Ok(())
    }
}
