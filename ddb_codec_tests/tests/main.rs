use anyhow::Result;
use ddb_codec::config::CodecConfig;
use ddb_codec::protocol::ByteOrder;
use ddb_codec::Codec;

mod scenarios;
use scenarios::forms::test_forms;
use scenarios::responses::test_responses;
use scenarios::symbols::test_symbols;
use scenarios::tables::test_tables;

fn codec(byte_order: ByteOrder) -> Codec {
    Codec::new(CodecConfig {
        byte_order,
        strict_forms: false,
    })
}

#[test]
fn integration_test_little_endian() -> Result<()> {
    let codec = codec(ByteOrder::LittleEndian);

    test_tables(&codec)?;
    test_symbols(&codec)?;
    test_forms(&codec)?;
    test_responses(&codec)?;

    Ok(())
}

#[test]
fn integration_test_big_endian() -> Result<()> {
    let codec = codec(ByteOrder::BigEndian);

    test_tables(&codec)?;
    test_symbols(&codec)?;
    test_forms(&codec)?;
    test_responses(&codec)?;

    Ok(())
}
