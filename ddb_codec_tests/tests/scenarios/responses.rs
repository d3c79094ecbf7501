use anyhow::Result;
use ddb_codec::model::{DataForm, Datum, DatumList, ElemType, Vector};
use ddb_codec::protocol::ProtocolReader;
use ddb_codec::Codec;
use std::io::Cursor;

pub fn test_responses(codec: &Codec) -> Result<()> {
    full_response(codec)?;
    stops_at_unknown_form(codec)?;
    request_framing(codec)?;
    Ok(())
}

fn frame(codec: &Codec, forms: &[DataForm]) -> Result<Vec<u8>> {
    let selector = codec.config().byte_order.selector() as char;
    let mut bytes = format!("2831 {} {}\nOK\n", forms.len(), selector).into_bytes();
    for form in forms {
        bytes.extend(codec.encode(form)?);
    }
    Ok(bytes)
}

fn full_response(codec: &Codec) -> Result<()> {
    let forms = vec![
        DataForm::from(Datum::string("done")),
        DataForm::from(Vector::new(DatumList::from_longs(
            ElemType::Long,
            vec![3, 1, 4, 1, 5],
        )?)),
    ];
    let bytes = frame(codec, &forms)?;
    let mut r = ProtocolReader::from(Cursor::new(&bytes));
    let resp = codec.read_response(&mut r)?;
    assert_eq!(resp.header.session_id, "2831");
    assert_eq!(resp.header.byte_order, codec.config().byte_order);
    assert_eq!(resp.forms, forms);
    assert_eq!(r.r_len(), bytes.len());
    Ok(())
}

fn stops_at_unknown_form(codec: &Codec) -> Result<()> {
    let known = DataForm::from(Datum::int(42));
    let mut bytes = frame(codec, &[known.clone(), known.clone()])?;
    let header_end = bytes.len() - 2 * 6;
    // Second form's shape byte.
    bytes[header_end + 6 + 1] = 99;

    let resp = codec.read_response(&mut ProtocolReader::from(Cursor::new(&bytes)))?;
    assert_eq!(resp.header.object_count, 2);
    assert_eq!(resp.forms, vec![known]);
    Ok(())
}

fn request_framing(codec: &Codec) -> Result<()> {
    let args = vec![DataForm::from(Datum::int(7))];
    let bytes = codec.encode_request("2831", "function\nneg\n1\n", &args, None)?;
    let body_len = "function\nneg\n1\n".len() + 6;
    let head = format!("API 2831 {}\n", body_len);
    assert!(bytes.starts_with(head.as_bytes()));
    assert_eq!(bytes.len(), head.len() + body_len);
    assert_eq!(&bytes[bytes.len() - 6..], codec.encode(&args[0])?.as_slice());
    Ok(())
}
