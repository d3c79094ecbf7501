//! Binary primitives under the codec: byte order, buffered reader and writer,
//! the multi-blob reader, bulk transcoding and the text framing around payloads.

mod blob_buffer;
mod byte_order;
pub mod bulk;
mod reader;
pub mod response;
mod writer;

pub use blob_buffer::*;
pub use byte_order::*;
pub use reader::*;
pub use writer::*;

/// Terminator of every string value on the wire.
pub const STRING_SEP: u8 = 0;
