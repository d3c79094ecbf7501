use crate::error::Result;
use crate::protocol::{ByteOrder, ProtocolWriter, WriteLen};
use std::io::Write;

pub trait Ser {
    fn ser<W: Write>(&self, w: &mut ProtocolWriter<W>, bo: ByteOrder) -> Result<WriteLen>;

    fn ser_solo(&self, bo: ByteOrder) -> Result<Vec<u8>> {
        let mut w = ProtocolWriter::new(vec![]);
        self.ser(&mut w, bo)?;
        w.into_inner()
    }
}
