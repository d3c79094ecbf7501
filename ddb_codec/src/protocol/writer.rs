use crate::error::Result;
use derive_more::{Add, AddAssign, Deref, DerefMut, From, Into};
use std::io::{BufWriter, Write};

/// Count of bytes handed to the sink by one call.
#[derive(Deref, Add, AddAssign, Clone, Copy, Default, PartialEq, Eq, Debug)]
pub struct WriteLen(usize);
impl WriteLen {
    pub fn new_manual(i: usize) -> Self {
        Self(i)
    }
}

/// Buffered writer over the caller's byte sink.
/// Nothing is guaranteed to reach the sink until [`ProtocolWriter::flush`].
#[derive(From, Into, Deref, DerefMut)]
pub struct ProtocolWriter<W: Write> {
    w: BufWriter<W>,
}

impl<W: Write> ProtocolWriter<W> {
    pub fn new(w: W) -> Self {
        Self {
            w: BufWriter::new(w),
        }
    }

    pub fn write(&mut self, buf: &[u8]) -> Result<WriteLen> {
        self.w.write_all(buf)?;
        Ok(WriteLen(buf.len()))
    }

    pub fn write_byte(&mut self, b: u8) -> Result<WriteLen> {
        self.write(&[b])
    }

    /// Raw bytes of `s`, no terminator.
    pub fn write_string(&mut self, s: &str) -> Result<WriteLen> {
        self.write(s.as_bytes())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.w.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> Result<W> {
        let w = self.w.into_inner().map_err(|e| e.into_error())?;
        Ok(w)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use anyhow::Result;

    #[test]
    fn buffered_until_flush() -> Result<()> {
        let mut w = ProtocolWriter::new(vec![]);
        let mut w_len = WriteLen::default();
        w_len += w.write_string("API 0 8")?;
        w_len += w.write_byte(b'\n')?;
        w_len += w.write(&[1, 2])?;
        assert_eq!(*w_len, 10);
        assert!(w.get_ref().is_empty());

        w.flush()?;
        assert_eq!(w.get_ref().as_slice(), b"API 0 8\n\x01\x02");
        assert_eq!(w.into_inner()?.len(), 10);
        Ok(())
    }
}
