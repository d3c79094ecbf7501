//! Dictionary-compressed symbol columns.
//!
//! ```text
//! struct SymbolExtendBody {
//!     base_id:    u32,
//!     base_size:  u32,                 0 when base_id was already sent in this table
//!     base:       [string; base_size],
//!     indexes:    [i32; rows * cols],
//! }
//! ```

use crate::error::{CodecError, Result};
use crate::model::datum::read_string;
use crate::model::list::DatumList;
use crate::model::{Datum, ElemType};
use crate::protocol::bulk::{decode_one, decode_vec, encode_one, encode_slice};
use crate::protocol::{ByteOrder, ProtocolReader, ProtocolWriter, WriteLen, STRING_SEP};
use derive_more::{Deref, Display};
use std::collections::HashMap;
use std::io::{Read, Write};
use std::mem;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

static NEXT_BASE_ID: AtomicU64 = AtomicU64::new(0);

/// Process-unique identity of one base instance.
#[derive(Deref, Display, PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct BaseId(u64);
impl BaseId {
    pub fn fresh() -> Self {
        Self(NEXT_BASE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

#[derive(Clone, Debug)]
pub struct SymbolBase {
    id: BaseId,
    strings: Vec<String>,
}

/// Bases compare by content. Identity only matters to the writer.
impl PartialEq for SymbolBase {
    fn eq(&self, other: &Self) -> bool {
        self.strings == other.strings
    }
}

impl SymbolBase {
    pub fn new(strings: Vec<String>) -> Self {
        Self {
            id: BaseId::fresh(),
            strings,
        }
    }

    pub fn id(&self) -> BaseId {
        self.id
    }

    pub fn strings(&self) -> &[String] {
        &self.strings
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    fn position(&self, s: &str) -> Option<usize> {
        self.strings.iter().position(|b| b == s)
    }
}

#[derive(PartialEq, Clone, Debug)]
pub struct SymbolExtend {
    base: Arc<SymbolBase>,
    indexes: Vec<i32>,
}

impl SymbolExtend {
    /// Every index must point into the base.
    pub fn new(base: Arc<SymbolBase>, indexes: Vec<i32>) -> Result<Self> {
        for ix in indexes.iter() {
            if *ix < 0 || *ix as usize >= base.len() {
                return Err(CodecError::IndexOutOfRange {
                    index: (*ix).max(0) as usize,
                    len: base.len(),
                });
            }
        }
        Ok(Self { base, indexes })
    }

    /// Builds a base holding the empty symbol at 0, then each distinct value once.
    pub fn from_strings<S: AsRef<str>>(vals: impl IntoIterator<Item = S>) -> Self {
        let mut strings = vec![String::new()];
        let mut lookup = HashMap::from([(String::new(), 0i32)]);
        let mut indexes = vec![];
        for val in vals {
            let val = val.as_ref();
            let ix = match lookup.get(val) {
                Some(ix) => *ix,
                None => {
                    let ix = strings.len() as i32;
                    strings.push(val.to_string());
                    lookup.insert(val.to_string(), ix);
                    ix
                }
            };
            indexes.push(ix);
        }
        Self {
            base: Arc::new(SymbolBase::new(strings)),
            indexes,
        }
    }

    pub fn base(&self) -> &Arc<SymbolBase> {
        &self.base
    }

    pub fn indexes(&self) -> &[i32] {
        &self.indexes
    }

    pub fn len(&self) -> usize {
        self.indexes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indexes.is_empty()
    }

    /// `""` when the base cannot resolve the index.
    fn resolve(&self, ix: i32) -> &str {
        usize::try_from(ix)
            .ok()
            .and_then(|ix| self.base.strings.get(ix))
            .map_or("", String::as_str)
    }

    pub fn get(&self, i: usize) -> Result<Datum> {
        let ix = self.index_at(i)?;
        Ok(Datum::symbol(self.resolve(ix)))
    }

    fn index_at(&self, i: usize) -> Result<i32> {
        self.indexes.get(i).copied().ok_or(CodecError::IndexOutOfRange {
            index: i,
            len: self.indexes.len(),
        })
    }

    /// Index of `s`, growing the base under a new identity if `s` is absent.
    fn intern(&mut self, s: &str) -> i32 {
        if let Some(ix) = self.base.position(s) {
            return ix as i32;
        }
        let mut strings = self.base.strings.clone();
        strings.push(s.to_string());
        self.base = Arc::new(SymbolBase::new(strings));
        (self.base.len() - 1) as i32
    }

    fn text_of(dat: &Datum) -> Result<&str> {
        if !ElemType::Symbol.is_compatible(dat.ty()) {
            return Err(CodecError::type_mismatch(ElemType::Symbol, dat.ty()));
        }
        dat.as_str()
    }

    pub fn set(&mut self, i: usize, dat: &Datum) -> Result<()> {
        self.index_at(i)?;
        let ix = self.intern(Self::text_of(dat)?);
        self.indexes[i] = ix;
        Ok(())
    }

    pub fn append(&mut self, dat: &Datum) -> Result<()> {
        let ix = self.intern(Self::text_of(dat)?);
        self.indexes.push(ix);
        Ok(())
    }

    /// Points the slot at the empty symbol.
    pub fn set_null(&mut self, i: usize) -> Result<()> {
        self.index_at(i)?;
        self.indexes[i] = self.intern("");
        Ok(())
    }

    pub fn is_null(&self, i: usize) -> Result<bool> {
        let ix = self.index_at(i)?;
        Ok(self.resolve(ix).is_empty())
    }

    /// Rows at `indexes`, sharing this base.
    pub fn gather(&self, indexes: &[usize]) -> Result<Self> {
        let picked = indexes
            .iter()
            .map(|i| self.index_at(*i))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            base: Arc::clone(&self.base),
            indexes: picked,
        })
    }

    pub fn string_list(&self) -> Vec<String> {
        self.indexes
            .iter()
            .map(|ix| self.resolve(*ix).to_string())
            .collect()
    }

    /// The resolved values as a plain symbol column.
    pub fn to_list(&self) -> Result<DatumList> {
        DatumList::from_strings(ElemType::Symbol, self.string_list())
    }

    /// Unifies both bases, then appends `other`'s rows remapped into the union.
    pub fn combine(&self, other: &SymbolExtend) -> Self {
        let mut strings = self.base.strings.clone();
        let mut lookup = strings
            .iter()
            .enumerate()
            .map(|(i, s)| (s.clone(), i as i32))
            .collect::<HashMap<_, _>>();
        let remap = other
            .base
            .strings
            .iter()
            .map(|s| {
                *lookup.entry(s.clone()).or_insert_with(|| {
                    strings.push(s.clone());
                    (strings.len() - 1) as i32
                })
            })
            .collect::<Vec<_>>();

        let mut indexes = self.indexes.clone();
        indexes.extend(other.indexes.iter().map(|ix| {
            usize::try_from(*ix)
                .ok()
                .and_then(|ix| remap.get(ix))
                .map_or(0, |ix| *ix)
        }));

        let base = if strings.len() == self.base.len() {
            Arc::clone(&self.base)
        } else {
            Arc::new(SymbolBase::new(strings))
        };
        Self { base, indexes }
    }

    pub(crate) fn ser<W: Write>(
        &self,
        w: &mut ProtocolWriter<W>,
        bo: ByteOrder,
        bases: &mut SymbolBaseCollection,
    ) -> Result<WriteLen> {
        let mut w_len = bases.write_base(w, bo, &self.base)?;
        w_len += w.write(&encode_slice(bo, &self.indexes))?;
        Ok(w_len)
    }

    pub(crate) fn deser<R: Read>(
        r: &mut ProtocolReader<R>,
        bo: ByteOrder,
        count: usize,
        bases: &mut SymbolBaseCollection,
    ) -> Result<Self> {
        let base = bases.read_base(r, bo)?;
        let buf = r.read_items(count, mem::size_of::<i32>())?;
        let indexes = decode_vec(bo, &buf);
        Ok(Self { base, indexes })
    }
}

/// Bases seen by one table, in both directions.
///
/// Reading keys bases by the id on the wire. Writing hands out ids 0, 1, 2, …
/// in order of first appearance, and sends each base's strings only once.
#[derive(Default, Debug)]
pub struct SymbolBaseCollection {
    read: HashMap<u32, Arc<SymbolBase>>,
    written: HashMap<BaseId, u32>,
}

impl SymbolBaseCollection {
    pub fn read_base<R: Read>(
        &mut self,
        r: &mut ProtocolReader<R>,
        bo: ByteOrder,
    ) -> Result<Arc<SymbolBase>> {
        let head = r.read_array::<8>()?;
        let wire_id = decode_one::<u32>(bo, &head[..4]);
        let size = decode_one::<u32>(bo, &head[4..]) as usize;

        if let Some(base) = self.read.get(&wire_id) {
            if size != 0 {
                return Err(CodecError::InvalidSymbolBase(wire_id));
            }
            log::debug!("[SYMBOL] reusing base {} of {} strings", wire_id, base.len());
            return Ok(Arc::clone(base));
        }

        let strings = (0..size)
            .map(|_| read_string(r))
            .collect::<Result<Vec<_>>>()?;
        let base = Arc::new(SymbolBase::new(strings));
        self.read.insert(wire_id, Arc::clone(&base));
        Ok(base)
    }

    pub fn write_base<W: Write>(
        &mut self,
        w: &mut ProtocolWriter<W>,
        bo: ByteOrder,
        base: &SymbolBase,
    ) -> Result<WriteLen> {
        let next = self.written.len() as u32;
        let (wire_id, repeat) = match self.written.get(&base.id) {
            Some(wire_id) => (*wire_id, true),
            None => {
                self.written.insert(base.id, next);
                (next, false)
            }
        };

        let mut w_len = w.write(&encode_one(bo, wire_id))?;
        if repeat || base.is_empty() {
            if repeat {
                log::debug!("[SYMBOL] base {} already sent", wire_id);
            }
            w_len += w.write(&encode_one(bo, 0u32))?;
            return Ok(w_len);
        }

        w_len += w.write(&encode_one(bo, base.len() as u32))?;
        for s in base.strings.iter() {
            w_len += w.write_string(s)?;
            w_len += w.write_byte(STRING_SEP)?;
        }
        Ok(w_len)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use anyhow::Result;
    use std::io::Cursor;

    #[test]
    fn from_strings_dedups() -> Result<()> {
        let ext = SymbolExtend::from_strings(["a", "b", "a", ""]);
        assert_eq!(ext.base().strings(), &["", "a", "b"]);
        assert_eq!(ext.indexes(), &[1, 2, 1, 0]);
        assert_eq!(ext.string_list(), vec!["a", "b", "a", ""]);
        assert!(ext.is_null(3)?);
        assert!(!ext.is_null(0)?);
        assert_eq!(ext.get(1)?, Datum::symbol("b"));
        assert!(ext.get(4).is_err());
        Ok(())
    }

    #[test]
    fn combine_unions_bases() -> Result<()> {
        let a = SymbolExtend::from_strings(["zero", "vector", "zero"]);
        let b = SymbolExtend::from_strings(["zero", "vector"]);
        let both = a.combine(&b);
        assert_eq!(
            both.string_list(),
            vec!["zero", "vector", "zero", "zero", "vector"]
        );
        assert_eq!(both.base().strings(), &["", "zero", "vector"]);
        assert_eq!(both.base().id(), a.base().id());

        let c = SymbolExtend::from_strings(["new"]);
        let grown = a.combine(&c);
        assert_eq!(grown.base().strings(), &["", "zero", "vector", "new"]);
        assert_ne!(grown.base().id(), a.base().id());
        assert_eq!(grown.string_list().last().map(String::as_str), Some("new"));
        Ok(())
    }

    #[test]
    fn mutation_renews_identity() -> Result<()> {
        let mut ext = SymbolExtend::from_strings(["x"]);
        let before = ext.base().id();
        ext.set(0, &Datum::string("x"))?;
        assert_eq!(ext.base().id(), before);

        ext.append(&Datum::symbol("y"))?;
        assert_ne!(ext.base().id(), before);
        assert_eq!(ext.string_list(), vec!["x", "y"]);

        ext.set_null(1)?;
        assert_eq!(ext.string_list(), vec!["x", ""]);
        assert!(ext.append(&Datum::int(1)).is_err());
        Ok(())
    }

    #[test]
    fn unresolved_base_renders_empty() -> Result<()> {
        let base = Arc::new(SymbolBase::new(vec![]));
        assert!(SymbolExtend::new(Arc::clone(&base), vec![0]).is_err());
        let ext = SymbolExtend {
            base,
            indexes: vec![0, 3],
        };
        assert_eq!(ext.string_list(), vec!["", ""]);
        Ok(())
    }

    #[test]
    fn shared_base_sent_once() -> Result<()> {
        let bo = ByteOrder::LittleEndian;
        let a = SymbolExtend::from_strings(["p", "q"]);
        let b = a.gather(&[1, 0, 1])?;
        let c = SymbolExtend::from_strings(["r"]);

        let mut bases = SymbolBaseCollection::default();
        let mut w = ProtocolWriter::new(vec![]);
        let w_len_a = a.ser(&mut w, bo, &mut bases)?;
        let w_len_b = b.ser(&mut w, bo, &mut bases)?;
        c.ser(&mut w, bo, &mut bases)?;
        let bytes = w.into_inner()?;

        assert_eq!(&bytes[..8], &[0, 0, 0, 0, 3, 0, 0, 0]);
        assert_eq!(&bytes[8..13], b"\0p\0q\0");
        assert_eq!(*w_len_a, 8 + 5 + 8);
        assert_eq!(*w_len_b, 8 + 12);
        let b_at = *w_len_a;
        assert_eq!(&bytes[b_at..b_at + 8], &[0, 0, 0, 0, 0, 0, 0, 0]);
        let c_at = b_at + *w_len_b;
        assert_eq!(&bytes[c_at..c_at + 8], &[1, 0, 0, 0, 2, 0, 0, 0]);

        let mut r = ProtocolReader::from(Cursor::new(&bytes));
        let mut bases = SymbolBaseCollection::default();
        let a2 = SymbolExtend::deser(&mut r, bo, 2, &mut bases)?;
        let b2 = SymbolExtend::deser(&mut r, bo, 3, &mut bases)?;
        let c2 = SymbolExtend::deser(&mut r, bo, 1, &mut bases)?;
        assert_eq!(r.r_len(), bytes.len());
        assert_eq!(a2, a);
        assert_eq!(b2.string_list(), vec!["q", "p", "q"]);
        assert_eq!(c2, c);
        assert_eq!(a2.base().id(), b2.base().id());
        assert_ne!(a2.base().id(), c2.base().id());
        Ok(())
    }

    #[test]
    fn reused_id_must_be_empty() -> Result<()> {
        let bo = ByteOrder::BigEndian;
        let mut bytes = vec![0, 0, 0, 7, 0, 0, 0, 1];
        bytes.extend(b"s\0");
        bytes.extend([0, 0, 0, 7, 0, 0, 0, 1]);
        bytes.extend(b"s\0");

        let mut r = ProtocolReader::from(Cursor::new(bytes));
        let mut bases = SymbolBaseCollection::default();
        bases.read_base(&mut r, bo)?;
        assert!(matches!(
            bases.read_base(&mut r, bo),
            Err(CodecError::InvalidSymbolBase(7))
        ));
        Ok(())
    }
}
