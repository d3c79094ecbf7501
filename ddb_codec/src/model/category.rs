use crate::error::{CodecError, Result};
use crate::protocol::{ProtocolReader, ProtocolWriter, WriteLen};
use derive_more::{Deref, From};
use num_derive::{FromPrimitive, ToPrimitive};
use num_traits::{FromPrimitive, ToPrimitive};
use std::any;
use std::fmt;
use std::io::{Read, Write};

pub const ARRAY_OFFSET: u8 = 64;
pub const SYMBOL_EXTEND_OFFSET: u8 = 128;

/// The raw element-type byte as it travels, including the array and symbol-extend offsets.
#[derive(From, Deref, PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct TypeByte(u8);
impl From<ElemType> for TypeByte {
    fn from(ty: ElemType) -> Self {
        Self(ty.id())
    }
}
impl TypeByte {
    pub fn array_of(ty: ElemType) -> Self {
        Self(ty.id() + ARRAY_OFFSET)
    }
    pub fn symbol_extend_of(ty: ElemType) -> Self {
        Self(ty.id() + SYMBOL_EXTEND_OFFSET)
    }

    pub fn is_array(self) -> bool {
        self.0 > ARRAY_OFFSET && self.0 <= SYMBOL_EXTEND_OFFSET
    }
    pub fn is_symbol_extend(self) -> bool {
        self.0 > SYMBOL_EXTEND_OFFSET
    }

    /// The element type with any offset removed.
    pub fn base(self) -> u8 {
        if self.is_symbol_extend() {
            self.0 - SYMBOL_EXTEND_OFFSET
        } else if self.is_array() {
            self.0 - ARRAY_OFFSET
        } else {
            self.0
        }
    }

    pub fn elem_type(self) -> Result<ElemType> {
        ElemType::try_from(self.base())
    }

    pub fn name(self) -> String {
        if self.is_symbol_extend() {
            return String::from("symbolExtend");
        }
        let base = ElemType::from_u8(self.base()).map_or("", |ty| ty.name());
        if self.is_array() {
            format!("{base}Array")
        } else {
            base.to_string()
        }
    }
}

/// Primitive element types.
/// The discriminants are the wire ids; 33 is unassigned.
#[repr(u8)]
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, FromPrimitive, ToPrimitive, Debug)]
pub enum ElemType {
    Void = 0,
    Bool = 1,
    Char = 2,
    Short = 3,
    Int = 4,
    Long = 5,
    Date = 6,
    Month = 7,
    Time = 8,
    Minute = 9,
    Second = 10,
    Datetime = 11,
    Timestamp = 12,
    NanoTime = 13,
    NanoTimestamp = 14,
    Float = 15,
    Double = 16,
    Symbol = 17,
    String = 18,
    Uuid = 19,
    Function = 20,
    Handle = 21,
    Code = 22,
    Datasource = 23,
    Resource = 24,
    Any = 25,
    Compress = 26,
    Dictionary = 27,
    DateHour = 28,
    DateMinute = 29,
    Ip = 30,
    Int128 = 31,
    Blob = 32,
    Complex = 34,
    Point = 35,
    Duration = 36,
    Decimal32 = 37,
    Decimal64 = 38,
    Decimal128 = 39,
    Object = 40,
}
impl TryFrom<u8> for ElemType {
    type Error = CodecError;
    fn try_from(int: u8) -> Result<Self> {
        ElemType::from_u8(int).ok_or_else(|| {
            CodecError::Unsupported(format!("{} {}", any::type_name::<ElemType>(), int))
        })
    }
}
impl fmt::Display for ElemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How values of an element type are stored in memory and on the wire.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum Family {
    Void,
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
    Long2,
    Double2,
    Duration,
    Decimal32,
    Decimal64,
    Decimal128,
    Str,
    Blob,
    Any,
}

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum TypeCategory {
    Temporal,
    Integral,
    Logical,
    Floating,
    Literal,
    Binary,
    Denary,
    Mixed,
    Nothing,
    System,
}

impl ElemType {
    pub fn id(self) -> u8 {
        self.to_u8().unwrap_or_default()
    }

    pub fn name(self) -> &'static str {
        use ElemType::*;
        match self {
            Void => "void",
            Bool => "bool",
            Char => "char",
            Short => "short",
            Int => "int",
            Long => "long",
            Date => "date",
            Month => "month",
            Time => "time",
            Minute => "minute",
            Second => "second",
            Datetime => "datetime",
            Timestamp => "timestamp",
            NanoTime => "nanotime",
            NanoTimestamp => "nanotimestamp",
            Float => "float",
            Double => "double",
            Symbol => "symbol",
            String => "string",
            Uuid => "uuid",
            Function => "function",
            Handle => "handle",
            Code => "code",
            Datasource => "datasource",
            Resource => "resource",
            Any => "any",
            Compress => "compress",
            Dictionary => "dictionary",
            DateHour => "datehour",
            DateMinute => "dateminute",
            Ip => "ipaddr",
            Int128 => "int128",
            Blob => "blob",
            Complex => "complex",
            Point => "point",
            Duration => "duration",
            Decimal32 => "decimal32",
            Decimal64 => "decimal64",
            Decimal128 => "decimal128",
            Object => "object",
        }
    }

    pub fn family(self) -> Result<Family> {
        use ElemType::*;
        let fam = match self {
            Void => Family::Void,
            Bool | Char | Compress => Family::Byte,
            Short => Family::Short,
            Int | Date | Month | Time | Minute | Second | Datetime | DateHour | DateMinute => {
                Family::Int
            }
            Long | Timestamp | NanoTime | NanoTimestamp => Family::Long,
            Float => Family::Float,
            Double => Family::Double,
            Uuid | Ip | Int128 => Family::Long2,
            Complex | Point => Family::Double2,
            Duration => Family::Duration,
            Decimal32 => Family::Decimal32,
            Decimal64 => Family::Decimal64,
            Decimal128 => Family::Decimal128,
            Symbol | String | Function | Handle | Code => Family::Str,
            Blob => Family::Blob,
            Any => Family::Any,
            Datasource | Resource | Dictionary | Object => {
                return Err(CodecError::Unsupported(self.name().to_string()))
            }
        };
        Ok(fam)
    }

    pub fn category(self) -> TypeCategory {
        use ElemType::*;
        match self {
            Date | Month | Time | Minute | Second | Datetime | Timestamp | NanoTime
            | NanoTimestamp | DateHour | DateMinute => TypeCategory::Temporal,
            Char | Short | Int | Long => TypeCategory::Integral,
            Bool => TypeCategory::Logical,
            Float | Double => TypeCategory::Floating,
            String | Symbol => TypeCategory::Literal,
            Int128 | Uuid | Ip | Blob => TypeCategory::Binary,
            Decimal32 | Decimal64 | Decimal128 => TypeCategory::Denary,
            Any => TypeCategory::Mixed,
            Void => TypeCategory::Nothing,
            _ => TypeCategory::System,
        }
    }

    /// String and symbol values are interchangeable when stored into a column.
    pub fn is_compatible(self, other: ElemType) -> bool {
        self == other
            || matches!(
                (self, other),
                (ElemType::String, ElemType::Symbol) | (ElemType::Symbol, ElemType::String)
            )
    }
}

/// Container shapes.
#[repr(u8)]
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, FromPrimitive, ToPrimitive, Debug)]
pub enum FormType {
    Scalar = 0,
    Vector = 1,
    Pair = 2,
    Matrix = 3,
    Set = 4,
    Dictionary = 5,
    Table = 6,
    Chart = 7,
    Chunk = 8,
}
impl FormType {
    pub fn id(self) -> u8 {
        self.to_u8().unwrap_or_default()
    }

    pub fn name(self) -> &'static str {
        match self {
            FormType::Scalar => "scalar",
            FormType::Vector => "vector",
            FormType::Pair => "pair",
            FormType::Matrix => "matrix",
            FormType::Set => "set",
            FormType::Dictionary => "dictionary",
            FormType::Table => "table",
            FormType::Chart => "chart",
            FormType::Chunk => "chunk",
        }
    }
}

/// The 2-byte tag in front of every encoded object.
///
/// ```text
/// struct Category {
///     type_byte:  u8,
///     form_byte:  u8,
/// }
/// ```
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct Category {
    pub type_byte: TypeByte,
    pub form_byte: u8,
}

impl Category {
    pub fn new(form: FormType, type_byte: impl Into<TypeByte>) -> Self {
        Self {
            type_byte: type_byte.into(),
            form_byte: form.id(),
        }
    }

    /// `None` for a shape id this codec does not know.
    pub fn form(&self) -> Option<FormType> {
        FormType::from_u8(self.form_byte)
    }

    pub fn deser<R: Read>(r: &mut ProtocolReader<R>) -> Result<Self> {
        let [type_byte, form_byte] = r
            .read_array::<2>()
            .map_err(|e| CodecError::Category(Box::new(e)))?;
        Ok(Self {
            type_byte: TypeByte(type_byte),
            form_byte,
        })
    }

    pub fn ser<W: Write>(&self, w: &mut ProtocolWriter<W>) -> Result<WriteLen> {
        w.write(&[*self.type_byte, self.form_byte])
    }
}
impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let form = self.form().map_or("unknown", |form| form.name());
        write!(f, "{}<{}>", form, self.type_byte.name())
    }
}
