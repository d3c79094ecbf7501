use super::helpers::{gen_str, round_trip};
use anyhow::{anyhow, Result};
use ddb_codec::model::{
    long2, ArrayVector, DataForm, DatumList, ElemType, SymbolExtend, Table, Vector, NULL_LONG,
};
use ddb_codec::Codec;
use itertools::Itertools;
use rand::Rng;

pub fn test_tables(codec: &Codec) -> Result<()> {
    every_column_type(codec)?;
    empty_table(codec)?;
    Ok(())
}

fn gen_table(rows: usize) -> Result<Table> {
    let mut rng = rand::thread_rng();

    let ids = (0..rows as i32).collect_vec();
    let mut qtys = (0..rows).map(|_| rng.gen_range(-1000..1000i64)).collect_vec();
    qtys[rows / 2] = NULL_LONG;
    let names = (0..rows).map(|_| gen_str(&mut rng, 8)).collect_vec();
    let syms = (0..rows).map(|i| ["ibm", "msft", "aapl"][i % 3]).collect_vec();
    let sym = SymbolExtend::from_strings(syms);
    let sym_rev = sym.gather(&(0..rows).rev().collect_vec())?;
    let ticks = (0..rows)
        .map(|i| DatumList::from_ints(ElemType::Int, (0..(i % 4) as i32).collect()))
        .collect::<ddb_codec::Result<Vec<_>>>()?;

    let columns = vec![
        (
            "flag",
            Vector::new(DatumList::from_bools(
                &(0..rows).map(|_| rng.gen::<bool>()).collect_vec(),
            )),
        ),
        ("id", Vector::new(DatumList::from_ints(ElemType::Int, ids)?)),
        ("qty", Vector::new(DatumList::from_longs(ElemType::Long, qtys)?)),
        (
            "px",
            Vector::new(DatumList::from_doubles(
                (0..rows).map(|_| rng.gen::<f64>() * 100.0).collect(),
            )),
        ),
        (
            "name",
            Vector::new(DatumList::from_strings(ElemType::String, names)?),
        ),
        ("sym", Vector::new(sym)),
        ("sym_rev", Vector::new(sym_rev)),
        (
            "day",
            Vector::new(DatumList::from_ints(
                ElemType::Date,
                (0..rows).map(|i| 19_000 + i as i32).collect(),
            )?),
        ),
        (
            "ts",
            Vector::new(DatumList::from_longs(
                ElemType::Timestamp,
                (0..rows)
                    .map(|_| rng.gen_range(0..1_700_000_000_000i64))
                    .collect(),
            )?),
        ),
        (
            "amt",
            Vector::new(DatumList::from_decimal64s(
                2,
                (0..rows).map(|_| rng.gen_range(0..1_000_000i64)).collect(),
            )?),
        ),
        (
            "ticks",
            Vector::new(ArrayVector::new(ElemType::Int, ticks)?),
        ),
        (
            "raw",
            Vector::new(DatumList::from_blobs(
                (0..rows)
                    .map(|i| (0..i % 5).map(|_| rng.gen::<u8>()).collect())
                    .collect(),
            )),
        ),
        (
            "uid",
            Vector::new(DatumList::from_long2s(
                ElemType::Uuid,
                (0..rows)
                    .map(|_| long2::from_u128(rng.gen::<u128>()))
                    .collect(),
            )?),
        ),
    ];

    let (names, columns): (Vec<_>, Vec<_>) = columns
        .into_iter()
        .map(|(name, col)| (name.to_string(), col))
        .unzip();
    Ok(Table::new(names, columns)?.with_name("trades"))
}

fn every_column_type(codec: &Codec) -> Result<()> {
    let rows = 50;
    let table = gen_table(rows)?;
    assert_eq!(table.rows(), rows);
    assert_eq!(table.cols(), 13);

    let back = round_trip(codec, &DataForm::from(table.clone()))?;
    let back = back.as_table().ok_or_else(|| anyhow!("not a table"))?;
    assert_eq!(back.name(), "trades");

    let qty = back.column_by_name("qty").ok_or_else(|| anyhow!("no qty"))?;
    assert!(qty.is_null(rows / 2)?);
    assert!(!qty.is_null(0)?);

    let sym = back.column_by_name("sym").ok_or_else(|| anyhow!("no sym"))?;
    let sym_rev = back.column_by_name("sym_rev").ok_or_else(|| anyhow!("no sym_rev"))?;
    assert_eq!(sym.get(0)?.as_str()?, "ibm");
    assert_eq!(sym_rev.get(rows - 1)?.as_str()?, "ibm");

    let ticks = back.column_by_name("ticks").ok_or_else(|| anyhow!("no ticks"))?;
    assert_eq!(ticks.row(3)?.string_list(), vec!["0", "1", "2"]);

    let row = back.row_json(7)?;
    assert!(row.starts_with("{\"flag\":"));
    assert!(row.contains("\"id\":\"7\""));
    assert!(row.contains("\"ticks\":\"[0, 1, 2]\""));

    let picked = back.sub_table(&[3, 1, 4])?;
    assert_eq!(picked.rows(), 3);
    let ids = picked.column_by_name("id").ok_or_else(|| anyhow!("no id"))?;
    assert_eq!(ids.string_list(), vec!["3", "1", "4"]);
    round_trip(codec, &DataForm::from(picked))?;
    Ok(())
}

fn empty_table(codec: &Codec) -> Result<()> {
    let table = Table::new(
        vec!["a".into(), "s".into()],
        vec![
            Vector::new(DatumList::from_ints(ElemType::Int, vec![])?),
            Vector::new(SymbolExtend::from_strings(Vec::<String>::new())),
        ],
    )?;
    let back = round_trip(codec, &DataForm::from(table))?;
    assert_eq!(back.rows(), 0);
    Ok(())
}
