use super::helpers::round_trip;
use anyhow::{anyhow, Result};
use ddb_codec::model::{
    Chart, ChartTitle, DataForm, Datum, DatumList, Decimal128, Dictionary, DurationUnit,
    ElemType, Matrix, Pair, Set, Vector,
};
use ddb_codec::Codec;
use std::net::{IpAddr, Ipv4Addr};

pub fn test_forms(codec: &Codec) -> Result<()> {
    scalars(codec)?;
    containers(codec)?;
    matrix_and_chart(codec)?;
    Ok(())
}

fn scalars(codec: &Codec) -> Result<()> {
    let dats = vec![
        Datum::void(),
        Datum::bool(true),
        Datum::short(-7),
        Datum::long(1 << 40),
        Datum::double(2.5),
        Datum::string("hello"),
        Datum::symbol("ibm"),
        Datum::blob(b"\x00\x01".to_vec()),
        Datum::uuid(0x5d21_2a78_cc48_e3b1_4235_b4d9_1473_ee87),
        Datum::int128(u128::MAX / 3),
        Datum::ip(IpAddr::V4(Ipv4Addr::new(192, 168, 1, 13))),
        Datum::complex(1.0, -2.0),
        Datum::point(3.0, 4.0),
        Datum::duration(5, DurationUnit::Minute),
        Datum::decimal128(Decimal128::new(4, 123_456)?),
        Datum::temporal(ElemType::Timestamp, 1_700_000_000_000)?,
        Datum::null(ElemType::Int)?,
    ];
    for dat in dats {
        let back = round_trip(codec, &DataForm::from(dat.clone()))?;
        assert_eq!(back.as_scalar(), Some(&dat));
    }
    Ok(())
}

fn containers(codec: &Codec) -> Result<()> {
    let pair = Pair::new(Vector::new(DatumList::from_doubles(vec![0.5, 1.5])))?;
    round_trip(codec, &DataForm::from(pair))?;

    let set = Set::new(Vector::new(DatumList::from_strings(
        ElemType::Symbol,
        ["a", "b"],
    )?));
    round_trip(codec, &DataForm::from(set))?;

    let mut dict = Dictionary::new(
        Vector::new(DatumList::from_ints(ElemType::Int, vec![1, 2])?),
        Vector::new(DatumList::from_strings(ElemType::String, ["one", "two"])?),
    )?;
    dict.set(&Datum::int(3), &Datum::string("three"))?;
    let back = round_trip(codec, &DataForm::from(dict))?;
    let back = back.as_dictionary().ok_or_else(|| anyhow!("not a dictionary"))?;
    assert_eq!(back.get("3")?.as_str()?, "three");

    let anys = Vector::new(DatumList::from_forms(vec![
        DataForm::from(Datum::int(1)),
        DataForm::from(Vector::new(DatumList::from_ints(ElemType::Int, vec![1, 2])?)),
        DataForm::from(back.clone()),
        DataForm::void(),
    ]));
    let back = round_trip(codec, &DataForm::from(anys))?;
    assert_eq!(back.rows(), 4);
    Ok(())
}

fn matrix_and_chart(codec: &Codec) -> Result<()> {
    let data = Vector::with_shape(
        DatumList::from_doubles((0..6).map(f64::from).collect()),
        2,
        3,
    )?;
    let rows = Vector::new(DatumList::from_strings(ElemType::Symbol, ["r0", "r1"])?);
    let cols = Vector::new(DatumList::from_ints(ElemType::Date, vec![0, 1, 2])?);
    let m = Matrix::new(data, Some(rows), Some(cols));
    assert_eq!(m.get(1, 2)?, Datum::double(5.0));

    let back = round_trip(codec, &DataForm::from(m.clone()))?;
    let back = back.as_matrix().ok_or_else(|| anyhow!("not a matrix"))?;
    assert_eq!(back.row_labels().map(Vector::string_list), Some(vec!["r0".into(), "r1".into()]));
    assert_eq!(back.col_labels().map(Vector::len), Some(3));

    let chart = Chart::new()
        .with_title(ChartTitle::Vector(Vector::new(DatumList::from_strings(
            ElemType::String,
            ["prices", "day", "px"],
        )?)))
        .with_chart_type(4)
        .with_stacking(true)
        .with_data(m);
    let back = round_trip(codec, &DataForm::from(chart))?;
    let back = back.as_chart().ok_or_else(|| anyhow!("not a chart"))?;
    assert_eq!(back.title(), "prices");
    assert_eq!(back.x_axis_name(), "day");
    assert_eq!(back.y_axis_name(), "px");
    assert_eq!(back.chart_type(), Some("CT_LINE"));
    assert_eq!(back.stacking(), Some(true));
    assert!(back.extras().is_none());
    assert_eq!(back.data().map(Matrix::cols), Some(3));
    Ok(())
}
