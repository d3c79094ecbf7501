//! Text framing around codec payloads.
//!
//! ```text
//! request:   API <session_id> <body_len>[ <flags>]\n
//!            <command text><data forms...>
//!
//! response:  <session_id> <object_count> <byte_order_selector>\n
//!            OK\n
//!            <data forms...>
//! ```

use crate::error::{CodecError, Result};
use crate::protocol::{ByteOrder, ProtocolReader, ProtocolWriter, WriteLen};
use std::io::{Read, Write};

pub const NEW_LINE: u8 = b'\n';
pub const EMPTY_SPACE: u8 = b' ';
pub const RESP_OK: &[u8] = b"OK";
pub const API_PREFIX: &str = "API";

#[derive(PartialEq, Eq, Clone, Debug)]
pub struct ResponseHeader {
    pub session_id: String,
    pub object_count: usize,
    pub byte_order: ByteOrder,
}

impl ResponseHeader {
    pub fn deser<R: Read>(r: &mut ProtocolReader<R>) -> Result<Self> {
        let line = r.read_until(NEW_LINE)?;
        let items = line.split(|b| *b == EMPTY_SPACE).collect::<Vec<_>>();
        if items.len() < 3 || items[2].is_empty() {
            return Err(CodecError::InvalidResponse { raw: line });
        }

        let session_id = String::from_utf8(items[0].to_vec())?;
        let object_count = std::str::from_utf8(items[1])
            .ok()
            .and_then(|s| s.parse::<usize>().ok())
            .ok_or_else(|| CodecError::InvalidResponse { raw: line.clone() })?;
        let byte_order = ByteOrder::from_selector(items[2][0])?;

        log::debug!(
            "[RESPONSE] session={} objects={} order={:?}",
            session_id,
            object_count,
            byte_order
        );
        Ok(Self {
            session_id,
            object_count,
            byte_order,
        })
    }

    /// Consumes the status line. Anything other than `OK` is the server's error message.
    pub fn validate_ok<R: Read>(r: &mut ProtocolReader<R>) -> Result<()> {
        let line = r.read_until(NEW_LINE)?;
        if line != RESP_OK {
            let msg = String::from_utf8_lossy(&line).into_owned();
            log::debug!("[RESPONSE] not OK: {}", msg);
            return Err(CodecError::ServerError(msg));
        }
        Ok(())
    }
}

#[derive(PartialEq, Eq, Clone, Debug)]
pub struct RequestHeader {
    pub session_id: String,
    pub body_len: usize,
    pub flags: Option<String>,
}

impl RequestHeader {
    pub fn ser<W: Write>(&self, w: &mut ProtocolWriter<W>) -> Result<WriteLen> {
        let mut line = format!("{} {} {}", API_PREFIX, self.session_id, self.body_len);
        if let Some(flags) = &self.flags {
            line.push(EMPTY_SPACE as char);
            line.push_str(flags);
        }
        line.push(NEW_LINE as char);
        w.write_string(&line)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use anyhow::Result;
    use std::io::Cursor;

    #[test]
    fn parse_header_then_ok() -> Result<()> {
        let src: &[u8] = b"1167095168 1 1\nOK\n\x04\x00";
        let mut r = ProtocolReader::from(Cursor::new(src));

        let h = ResponseHeader::deser(&mut r)?;
        assert_eq!(h.session_id, "1167095168");
        assert_eq!(h.object_count, 1);
        assert_eq!(h.byte_order, ByteOrder::LittleEndian);

        ResponseHeader::validate_ok(&mut r)?;
        assert_eq!(r.read_exact(2)?, vec![4, 0]);
        Ok(())
    }

    #[test]
    fn bad_headers() -> Result<()> {
        let mut r = ProtocolReader::from(Cursor::new(b"1167 1\n".to_vec()));
        assert!(matches!(
            ResponseHeader::deser(&mut r),
            Err(CodecError::InvalidResponse { .. })
        ));

        let mut r = ProtocolReader::from(Cursor::new(b"1167 1 9\n".to_vec()));
        assert!(matches!(
            ResponseHeader::deser(&mut r),
            Err(CodecError::InvalidByteOrder(b'9'))
        ));

        let mut r = ProtocolReader::from(Cursor::new(b"Syntax Error: oops\n".to_vec()));
        match ResponseHeader::validate_ok(&mut r) {
            Err(CodecError::ServerError(msg)) => assert_eq!(msg, "Syntax Error: oops"),
            other => panic!("{other:?}"),
        }
        Ok(())
    }

    #[test]
    fn request_header() -> Result<()> {
        let mut w = ProtocolWriter::new(vec![]);
        let h = RequestHeader {
            session_id: "0".into(),
            body_len: 12,
            flags: Some("__cancelable=1".into()),
        };
        let w_len = h.ser(&mut w)?;
        let bytes = w.into_inner()?;
        assert_eq!(bytes, b"API 0 12 __cancelable=1\n".to_vec());
        assert_eq!(*w_len, bytes.len());
        Ok(())
    }
}
