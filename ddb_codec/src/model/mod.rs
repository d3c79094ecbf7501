//! # Wire model
//!
//! Every encoded object starts with a [`Category`]: the element type byte, then the
//! shape byte. What follows depends on the shape (see [`DataForm`]).
//!
//! Element types fall into three ranges of the type byte.
//!
//! ```text
//! 0  ..= 64     primitive          column of [`DatumList`]
//! 65 ..= 128    array of primitive [`ArrayVector`], rows of varying length
//! 129 ..        symbol extend      [`SymbolExtend`], indexes into a string base
//! ```
//!
//! Numbers are written in the byte order the session negotiated. There is no null
//! bitmap; each type reserves a sentinel value as its null.
//!
//! ```text
//! struct Scalar<int> {
//!     type_byte:  u8,        4
//!     form_byte:  u8,        0
//!     value:      [u8; 4],
//! }
//!
//! struct Vector<string> {
//!     type_byte:  u8,        18
//!     form_byte:  u8,        1
//!     rows:       u32,
//!     cols:       u32,
//!     values:     [{ utf8: [u8; _], terminator: u8 = 0 }; rows * cols],
//! }
//! ```

pub mod array_vector;
mod category;
mod datum;
pub mod decimal;
pub mod duration;
pub mod extend;
mod form;
pub mod hash;
mod list;
pub mod long2;
mod serializable;
pub mod temporal;

pub use array_vector::ArrayVector;
pub use category::*;
pub use datum::{
    Datum, DatumBody, NULL_BYTE, NULL_DOUBLE, NULL_FLOAT, NULL_INT, NULL_LONG, NULL_SHORT,
};
pub use decimal::{Decimal128, Decimal32, Decimal64};
pub use duration::DurationUnit;
pub use extend::{BaseId, SymbolBase, SymbolBaseCollection, SymbolExtend};
pub use form::*;
pub use list::{DatumList, ListBody};
pub use serializable::*;
