use crate::error::Result;
use crate::protocol::{ByteOrder, ProtocolReader};
use std::io::Read;

/// Reads `count` length-prefixed blobs off a reader, one per `next()`.
///
/// A zero length yields an empty blob without reading a body, and keeps its position.
pub struct BlobBuffer<'r, R> {
    r: &'r mut ProtocolReader<R>,
    bo: ByteOrder,
    remaining: usize,
}

impl<'r, R: Read> BlobBuffer<'r, R> {
    pub fn new(r: &'r mut ProtocolReader<R>, bo: ByteOrder, count: usize) -> Self {
        Self {
            r,
            bo,
            remaining: count,
        }
    }

    fn read_one(&mut self) -> Result<Vec<u8>> {
        let len_buf = self.r.read_array::<4>()?;
        let len = self.bo.get_u32(&len_buf) as usize;
        if len == 0 {
            return Ok(vec![]);
        }
        self.r.read_exact(len)
    }
}

impl<'r, R: Read> Iterator for BlobBuffer<'r, R> {
    type Item = Result<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        Some(self.read_one())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.remaining))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use anyhow::Result;
    use std::io::Cursor;

    #[test]
    fn empty_blob_keeps_position() -> Result<()> {
        let mut src = vec![];
        src.extend(2u32.to_be_bytes());
        src.extend(b"hi");
        src.extend(0u32.to_be_bytes());
        src.extend(1u32.to_be_bytes());
        src.extend(b"x");
        src.push(0xff);

        let mut r = ProtocolReader::from(Cursor::new(src));
        let blobs = BlobBuffer::new(&mut r, ByteOrder::BigEndian, 3)
            .collect::<Result<Vec<_>, _>>()?;
        assert_eq!(blobs, vec![b"hi".to_vec(), vec![], b"x".to_vec()]);
        assert_eq!(r.read_byte()?, 0xff);
        Ok(())
    }

    #[test]
    fn short_body() -> Result<()> {
        let mut src = vec![];
        src.extend(5u32.to_le_bytes());
        src.extend(b"abc");
        let mut r = ProtocolReader::from(Cursor::new(src));
        let res = BlobBuffer::new(&mut r, ByteOrder::LittleEndian, 1)
            .collect::<Result<Vec<_>, _>>();
        assert!(res.is_err());
        Ok(())
    }
}
