use crate::error::{CodecError, Result};
use crate::protocol::ByteOrder;
use std::env;

pub const ENV_VAR_BYTE_ORDER: &str = "DDB_CODEC_BYTE_ORDER";
pub const ENV_VAR_STRICT_FORMS: &str = "DDB_CODEC_STRICT_FORMS";

/// Knobs for a [`crate::codec::Codec`].
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct CodecConfig {
    /// Order used when encoding, and when decoding a payload that carries no header.
    pub byte_order: ByteOrder,
    /// Whether an unknown data form fails the decode instead of ending it.
    pub strict_forms: bool,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            byte_order: ByteOrder::LittleEndian,
            strict_forms: false,
        }
    }
}

impl CodecConfig {
    /// Defaults, overridden by whichever env vars are set.
    pub fn from_env() -> Result<Self> {
        let dflt = Self::default();
        let byte_order = env::var(ENV_VAR_BYTE_ORDER)
            .map_or_else(|_| Ok(dflt.byte_order), |s| parse_byte_order(&s))?;
        let strict_forms = env::var(ENV_VAR_STRICT_FORMS)
            .map_or_else(|_| Ok(dflt.strict_forms), |s| parse_flag(&s))?;
        log::debug!(
            "[CONFIG] byte_order={:?} strict_forms={}",
            byte_order,
            strict_forms
        );
        Ok(Self {
            byte_order,
            strict_forms,
        })
    }
}

/// `little`, `big`, or the wire selector `1` / `0`.
pub fn parse_byte_order(s: &str) -> Result<ByteOrder> {
    match s.trim().to_ascii_lowercase().as_str() {
        "little" | "le" | "1" => Ok(ByteOrder::LittleEndian),
        "big" | "be" | "0" => Ok(ByteOrder::BigEndian),
        _ => Err(CodecError::invalid_value(
            ENV_VAR_BYTE_ORDER,
            s,
            "expected little or big",
        )),
    }
}

fn parse_flag(s: &str) -> Result<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" | "" => Ok(false),
        _ => Err(CodecError::invalid_value(
            ENV_VAR_STRICT_FORMS,
            s,
            "expected true or false",
        )),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use anyhow::Result;

    #[test]
    fn parse_values() -> Result<()> {
        assert_eq!(parse_byte_order("little")?, ByteOrder::LittleEndian);
        assert_eq!(parse_byte_order(" BIG ")?, ByteOrder::BigEndian);
        assert_eq!(parse_byte_order("0")?, ByteOrder::BigEndian);
        assert!(parse_byte_order("middle").is_err());

        assert!(parse_flag("true")?);
        assert!(parse_flag("1")?);
        assert!(!parse_flag("")?);
        assert!(parse_flag("maybe").is_err());
        Ok(())
    }

    #[test]
    fn from_env() -> Result<()> {
        assert_eq!(
            CodecConfig::default(),
            CodecConfig {
                byte_order: ByteOrder::LittleEndian,
                strict_forms: false
            }
        );

        env::set_var(ENV_VAR_BYTE_ORDER, "big");
        env::set_var(ENV_VAR_STRICT_FORMS, "true");
        let config = CodecConfig::from_env();
        env::remove_var(ENV_VAR_BYTE_ORDER);
        env::remove_var(ENV_VAR_STRICT_FORMS);

        let config = config?;
        assert_eq!(config.byte_order, ByteOrder::BigEndian);
        assert!(config.strict_forms);
        Ok(())
    }
}
