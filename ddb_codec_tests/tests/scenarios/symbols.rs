use super::helpers::round_trip;
use anyhow::{anyhow, Result};
use ddb_codec::model::{DataForm, Datum, SymbolExtend, Table, Vector, VectorData};
use ddb_codec::Codec;

pub fn test_symbols(codec: &Codec) -> Result<()> {
    combine_then_send(codec)?;
    edit_renews_base(codec)?;
    Ok(())
}

fn extend_of(v: &Vector) -> Result<&SymbolExtend> {
    match v.data() {
        VectorData::Extend(ext) => Ok(ext),
        _ => Err(anyhow!("not a symbol extend vector")),
    }
}

fn combine_then_send(codec: &Codec) -> Result<()> {
    let a = Vector::new(SymbolExtend::from_strings(["zero", "vector", "zero"]));
    let b = Vector::new(SymbolExtend::from_strings(["one", "zero"]));

    let both = a.combine(&b)?;
    assert_eq!(both.string_list(), vec!["zero", "vector", "zero", "one", "zero"]);
    assert_eq!(
        extend_of(&both)?.base().strings(),
        &["", "zero", "vector", "one"]
    );

    // Nothing new to add: the base is kept as is.
    let again = a.combine(&a)?;
    assert_eq!(extend_of(&again)?.base().id(), extend_of(&a)?.base().id());

    let table = Table::new(
        vec!["a".into(), "both".into()],
        vec![a.gather(&[0, 1, 2, 0, 1])?, both],
    )?;
    let back = round_trip(codec, &DataForm::from(table))?;
    let back = back.as_table().ok_or_else(|| anyhow!("not a table"))?;
    let bases = back
        .columns()
        .iter()
        .map(|col| extend_of(col).map(|ext| ext.base().id()))
        .collect::<Result<Vec<_>>>()?;
    assert_ne!(bases[0], bases[1]);
    Ok(())
}

fn edit_renews_base(codec: &Codec) -> Result<()> {
    let orig = Vector::new(SymbolExtend::from_strings(["x", "y"]));
    let orig_id = extend_of(&orig)?.base().id();

    let mut v = orig.clone();
    v.set(0, &Datum::symbol("y"))?;
    assert_eq!(extend_of(&v)?.base().id(), orig_id);

    v.set(0, &Datum::symbol("new"))?;
    assert_ne!(extend_of(&v)?.base().id(), orig_id);
    assert_eq!(orig.get(0)?.as_str()?, "x");
    assert_eq!(v.get(0)?.as_str()?, "new");

    v.append(&Datum::string("x"))?;
    v.set_null(1)?;
    assert!(v.is_null(1)?);
    assert_eq!(v.string_list(), vec!["new", "", "x"]);
    assert!(v.set(0, &Datum::int(1)).is_err());

    round_trip(codec, &DataForm::from(v))?;
    Ok(())
}
