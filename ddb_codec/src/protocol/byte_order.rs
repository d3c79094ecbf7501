use crate::error::{CodecError, Result};

/// The numeric encoding negotiated per connection.
///
/// It travels out of band as one selector byte: `'0'` for big endian, `'1'` for little endian.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub enum ByteOrder {
    BigEndian,
    LittleEndian,
}

pub const SELECTOR_BIG_ENDIAN: u8 = b'0';
pub const SELECTOR_LITTLE_ENDIAN: u8 = b'1';

macro_rules! put_get {
    ($put:ident, $get:ident, $t:ty) => {
        pub fn $put(self, buf: &mut [u8], v: $t) {
            let bytes = match self {
                ByteOrder::BigEndian => v.to_be_bytes(),
                ByteOrder::LittleEndian => v.to_le_bytes(),
            };
            buf[..bytes.len()].copy_from_slice(&bytes);
        }

        pub fn $get(self, buf: &[u8]) -> $t {
            let n = std::mem::size_of::<$t>();
            let mut bytes = [0u8; std::mem::size_of::<$t>()];
            bytes.copy_from_slice(&buf[..n]);
            match self {
                ByteOrder::BigEndian => <$t>::from_be_bytes(bytes),
                ByteOrder::LittleEndian => <$t>::from_le_bytes(bytes),
            }
        }
    };
}

impl ByteOrder {
    pub fn native() -> Self {
        if cfg!(target_endian = "big") {
            ByteOrder::BigEndian
        } else {
            ByteOrder::LittleEndian
        }
    }

    pub fn is_native(self) -> bool {
        self == Self::native()
    }

    pub fn from_selector(b: u8) -> Result<Self> {
        match b {
            SELECTOR_BIG_ENDIAN => Ok(ByteOrder::BigEndian),
            SELECTOR_LITTLE_ENDIAN => Ok(ByteOrder::LittleEndian),
            _ => Err(CodecError::InvalidByteOrder(b)),
        }
    }

    pub fn selector(self) -> u8 {
        match self {
            ByteOrder::BigEndian => SELECTOR_BIG_ENDIAN,
            ByteOrder::LittleEndian => SELECTOR_LITTLE_ENDIAN,
        }
    }

    put_get!(put_u16, get_u16, u16);
    put_get!(put_u32, get_u32, u32);
    put_get!(put_u64, get_u64, u64);
    put_get!(put_i16, get_i16, i16);
    put_get!(put_i32, get_i32, i32);
    put_get!(put_i64, get_i64, i64);
    put_get!(put_i128, get_i128, i128);
    put_get!(put_f32, get_f32, f32);
    put_get!(put_f64, get_f64, f64);
}
