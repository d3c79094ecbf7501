//! Bulk transcoding between byte runs and typed columns.
//!
//! When the requested order is the native order a whole column moves as one contiguous copy
//! through [`bytemuck`]; otherwise each element is converted on its own.
//! Both paths yield the same logical values.

use crate::protocol::ByteOrder;
use bytemuck::{Pod, Zeroable};
use std::borrow::Cow;
use std::mem;

pub trait WireNum: Pod {
    fn get(bo: ByteOrder, buf: &[u8]) -> Self;
    fn put(self, bo: ByteOrder, buf: &mut [u8]);
}

macro_rules! wire_num {
    ($t:ty, $get:ident, $put:ident) => {
        impl WireNum for $t {
            fn get(bo: ByteOrder, buf: &[u8]) -> Self {
                bo.$get(buf)
            }
            fn put(self, bo: ByteOrder, buf: &mut [u8]) {
                bo.$put(buf, self)
            }
        }
    };
}
wire_num!(i16, get_i16, put_i16);
wire_num!(u16, get_u16, put_u16);
wire_num!(i32, get_i32, put_i32);
wire_num!(i64, get_i64, put_i64);
wire_num!(i128, get_i128, put_i128);
wire_num!(u32, get_u32, put_u32);
wire_num!(u64, get_u64, put_u64);
wire_num!(f32, get_f32, put_f32);
wire_num!(f64, get_f64, put_f64);

impl WireNum for i8 {
    fn get(_: ByteOrder, buf: &[u8]) -> Self {
        buf[0] as i8
    }
    fn put(self, _: ByteOrder, buf: &mut [u8]) {
        buf[0] = self as u8;
    }
}

/// Two words laid out one after another, each in the requested order.
impl<T: WireNum> WireNum for [T; 2]
where
    [T; 2]: Pod,
{
    fn get(bo: ByteOrder, buf: &[u8]) -> Self {
        let w = mem::size_of::<T>();
        [T::get(bo, &buf[..w]), T::get(bo, &buf[w..])]
    }
    fn put(self, bo: ByteOrder, buf: &mut [u8]) {
        let w = mem::size_of::<T>();
        self[0].put(bo, &mut buf[..w]);
        self[1].put(bo, &mut buf[w..]);
    }
}

/// `buf.len()` must be a multiple of the element width.
pub fn decode_vec<T: WireNum>(bo: ByteOrder, buf: &[u8]) -> Vec<T> {
    let width = mem::size_of::<T>();
    if bo.is_native() {
        let n = buf.len() / width;
        let mut out = vec![T::zeroed(); n];
        bytemuck::cast_slice_mut::<T, u8>(&mut out).copy_from_slice(&buf[..n * width]);
        out
    } else {
        buf.chunks_exact(width).map(|c| T::get(bo, c)).collect()
    }
}

pub fn encode_slice<T: WireNum>(bo: ByteOrder, vals: &[T]) -> Cow<'_, [u8]> {
    if bo.is_native() {
        Cow::Borrowed(bytemuck::cast_slice(vals))
    } else {
        let width = mem::size_of::<T>();
        let mut out = vec![0u8; vals.len() * width];
        for (v, chunk) in vals.iter().zip(out.chunks_exact_mut(width)) {
            v.put(bo, chunk);
        }
        Cow::Owned(out)
    }
}

pub fn decode_one<T: WireNum>(bo: ByteOrder, buf: &[u8]) -> T {
    T::get(bo, buf)
}

pub fn encode_one<T: WireNum>(bo: ByteOrder, v: T) -> Vec<u8> {
    let mut out = vec![0u8; mem::size_of::<T>()];
    v.put(bo, &mut out);
    out
}

#[cfg(test)]
mod test {
    use super::*;
    use anyhow::Result;

    fn both_orders<T>(vals: Vec<T>) -> Result<()>
    where
        T: WireNum + PartialEq + std::fmt::Debug,
    {
        for bo in [ByteOrder::BigEndian, ByteOrder::LittleEndian] {
            let bytes = encode_slice(bo, &vals).into_owned();
            assert_eq!(bytes.len(), vals.len() * mem::size_of::<T>());

            let mut per_elem = vec![];
            for v in vals.iter() {
                per_elem.extend(encode_one(bo, *v));
            }
            assert_eq!(bytes, per_elem);

            let back = decode_vec::<T>(bo, &bytes);
            assert_eq!(back, vals);
        }
        Ok(())
    }

    #[test]
    fn bulk_matches_per_element() -> Result<()> {
        both_orders(vec![1i16, -2, i16::MIN])?;
        both_orders(vec![3u16, u16::MAX])?;
        both_orders(vec![7i32, i32::MIN, 0x01020304])?;
        both_orders(vec![i64::MAX, -1i64])?;
        both_orders(vec![1.5f64, -f64::MAX])?;
        both_orders(vec![[1u64, 2u64], [u64::MAX, 0]])?;
        both_orders(vec![i128::MIN, 12345678901234567890i128])?;
        Ok(())
    }

    #[test]
    fn unaligned_source() -> Result<()> {
        let mut buf = vec![0u8];
        buf.extend(encode_slice(ByteOrder::native(), &[5i64, 6i64]).iter());
        let back = decode_vec::<i64>(ByteOrder::native(), &buf[1..]);
        assert_eq!(back, vec![5, 6]);
        Ok(())
    }

    #[test]
    fn pair_layout() -> Result<()> {
        let bytes = encode_one(ByteOrder::BigEndian, [1u64, 2u64]);
        assert_eq!(bytes[7], 1);
        assert_eq!(bytes[15], 2);
        Ok(())
    }
}
