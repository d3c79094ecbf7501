use anyhow::{anyhow, Result};
use ddb_codec::model::DataForm;
use ddb_codec::Codec;
use rand::distributions::Alphanumeric;
use rand::Rng;

/// Encodes, decodes, and asserts nothing was lost.
pub fn round_trip(codec: &Codec, form: &DataForm) -> Result<DataForm> {
    let bytes = codec.encode(form)?;
    let back = codec
        .decode(&bytes)?
        .ok_or_else(|| anyhow!("no form decoded from {} bytes", bytes.len()))?;
    assert_eq!(&back, form);
    assert_eq!(codec.encode(&back)?, bytes);
    Ok(back)
}

pub fn gen_str(rng: &mut impl Rng, len: usize) -> String {
    rng.sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}
