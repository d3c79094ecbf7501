//! 128-bit values (int128, uuid, ipaddr) held as `[low, high]` 64-bit words.

use crate::error::{CodecError, Result};
use crate::model::ElemType;
use std::net::{Ipv4Addr, Ipv6Addr};

pub type Long2 = [u64; 2];

pub const NULL_LONG2: Long2 = [0, 0];

pub fn from_u128(v: u128) -> Long2 {
    [v as u64, (v >> 64) as u64]
}

pub fn to_u128([lo, hi]: Long2) -> u128 {
    (u128::from(hi) << 64) | u128::from(lo)
}

pub fn format(ty: ElemType, v: Long2) -> String {
    let [lo, hi] = v;
    match ty {
        ElemType::Uuid => format!(
            "{:08x}-{:04x}-{:04x}-{:04x}-{:012x}",
            hi >> 32,
            (hi >> 16) & 0xffff,
            hi & 0xffff,
            lo >> 48,
            lo & 0xffff_ffff_ffff
        ),
        ElemType::Ip => {
            if v == NULL_LONG2 {
                String::from("0.0.0.0")
            } else if hi == 0 {
                Ipv4Addr::from(lo as u32).to_string()
            } else {
                let groups = [hi >> 48, hi >> 32, hi >> 16, hi, lo >> 48, lo >> 32, lo >> 16, lo];
                groups
                    .iter()
                    .map(|g| format!("{:x}", g & 0xffff))
                    .collect::<Vec<_>>()
                    .join(":")
            }
        }
        _ => format!("{hi:016x}{lo:016x}"),
    }
}

pub fn parse(ty: ElemType, text: &str) -> Result<Long2> {
    if text.is_empty() {
        return Ok(NULL_LONG2);
    }
    let invalid = |reason: &str| CodecError::invalid_value(ty, text, reason);
    match ty {
        ElemType::Int128 => {
            if text.len() != 32 {
                return Err(invalid("expected 32 hex digits"));
            }
            let v = u128::from_str_radix(text, 16).map_err(|_| invalid("not hex"))?;
            Ok(from_u128(v))
        }
        ElemType::Uuid => {
            let lens = text.split('-').map(str::len).collect::<Vec<_>>();
            if lens != [8, 4, 4, 4, 12] {
                return Err(invalid("expected 8-4-4-4-12 hex groups"));
            }
            let hex = text.replace('-', "");
            let v = u128::from_str_radix(&hex, 16).map_err(|_| invalid("not hex"))?;
            Ok(from_u128(v))
        }
        ElemType::Ip => {
            if text.contains(':') {
                let addr = text
                    .parse::<Ipv6Addr>()
                    .map_err(|_| invalid("not an IPv6 address"))?;
                Ok(from_u128(u128::from(addr)))
            } else {
                let addr = text
                    .parse::<Ipv4Addr>()
                    .map_err(|_| invalid("not an IPv4 address"))?;
                Ok([u64::from(u32::from(addr)), 0])
            }
        }
        _ => Err(CodecError::type_mismatch("int128, uuid or ipaddr", ty)),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use anyhow::Result;

    #[test]
    fn text_forms() -> Result<()> {
        let text = "4b7545dc735379254fbf804dec34977f";
        let v = parse(ElemType::Int128, text)?;
        assert_eq!(v, [0x4fbf804dec34977f, 0x4b7545dc73537925]);
        assert_eq!(format(ElemType::Int128, v), text);

        let text = "5d212a78-cc48-e3b1-4235-b4d91473ee87";
        let v = parse(ElemType::Uuid, text)?;
        assert_eq!(format(ElemType::Uuid, v), text);
        assert_eq!(
            format(ElemType::Uuid, NULL_LONG2),
            "00000000-0000-0000-0000-000000000000"
        );

        let v = parse(ElemType::Ip, "192.168.1.13")?;
        assert_eq!(v, [0xc0a8010d, 0]);
        assert_eq!(format(ElemType::Ip, v), "192.168.1.13");

        let v = parse(ElemType::Ip, "e1:4:8:f:1:a:b:c")?;
        assert_eq!(format(ElemType::Ip, v), "e1:4:8:f:1:a:b:c");
        assert_eq!(format(ElemType::Ip, NULL_LONG2), "0.0.0.0");
        assert_eq!(format(ElemType::Int128, NULL_LONG2), "0".repeat(32));
        Ok(())
    }

    #[test]
    fn rejects_garbage() -> Result<()> {
        assert!(parse(ElemType::Int128, "xyz").is_err());
        assert!(parse(ElemType::Uuid, "5d212a78cc48e3b14235b4d91473ee87").is_err());
        assert!(parse(ElemType::Ip, "300.1.1.1").is_err());
        assert_eq!(parse(ElemType::Ip, "")?, NULL_LONG2);
        Ok(())
    }
}
