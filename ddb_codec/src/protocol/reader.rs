use crate::error::{CodecError, Result};
use crate::io_utils;
use std::io::{BufReader, ErrorKind, Read};

/// Blocking reader over the caller's byte source.
///
/// Every read either returns the full amount asked for or fails; a source that closes early
/// surfaces as [`CodecError::UnexpectedEof`].
pub struct ProtocolReader<R> {
    r: BufReader<R>,
    r_len: usize,
}
impl<R> From<R> for ProtocolReader<R>
where
    R: Read,
{
    fn from(r: R) -> Self {
        Self {
            r: BufReader::new(r),
            r_len: 0,
        }
    }
}
impl<R: Read> ProtocolReader<R> {
    /// Count of bytes consumed so far.
    pub fn r_len(&self) -> usize {
        self.r_len
    }

    /// Bytes already pulled into the internal buffer but not yet consumed are lost.
    pub fn into_inner(self) -> R {
        self.r.into_inner()
    }

    /// Grows the buffer as bytes arrive rather than reserving `n` up front.
    pub fn read_exact(&mut self, n: usize) -> Result<Vec<u8>> {
        let mut buf = vec![];
        (&mut self.r).take(n as u64).read_to_end(&mut buf)?;
        if buf.len() < n {
            return Err(CodecError::UnexpectedEof {
                wanted: n,
                got: buf.len(),
            });
        }
        self.r_len += n;
        Ok(buf)
    }

    /// `count` items of `width` bytes each.
    pub fn read_items(&mut self, count: usize, width: usize) -> Result<Vec<u8>> {
        let n = count
            .checked_mul(width)
            .ok_or(CodecError::LengthOverflow { count, width })?;
        self.read_exact(n)
    }

    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut buf = [0u8; N];
        self.fill(&mut buf)?;
        Ok(buf)
    }

    pub fn read_byte(&mut self) -> Result<u8> {
        let [b] = self.read_array::<1>()?;
        Ok(b)
    }

    /// Bytes up to, not including, `delimiter`.
    pub fn read_until(&mut self, delimiter: u8) -> Result<Vec<u8>> {
        let mut buf = vec![];
        let found = io_utils::read_until_then_trim(&mut self.r, delimiter, &mut buf)?;
        if !found {
            return Err(CodecError::MissingDelimiter {
                delimiter,
                read: buf,
            });
        }
        self.r_len += buf.len() + 1;
        Ok(buf)
    }

    fn fill(&mut self, buf: &mut [u8]) -> Result<()> {
        let mut got = 0;
        while got < buf.len() {
            match self.r.read(&mut buf[got..]) {
                Ok(0) => {
                    return Err(CodecError::UnexpectedEof {
                        wanted: buf.len(),
                        got,
                    })
                }
                Ok(delta) => got += delta,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(CodecError::Io(e)),
            }
        }
        self.r_len += got;
        Ok(())
    }
}
