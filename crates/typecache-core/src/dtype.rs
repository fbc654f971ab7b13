//! Element-type descriptors.
//!
//! A [`DType`] describes the element type of an array, an element-scalar or
//! a descriptor value. Numeric kinds carry a one-byte code that is written
//! verbatim into fingerprints; temporal kinds add a time unit and multiplier;
//! structured kinds are identified by the address of their descriptor object.

use std::fmt;

use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::Identity;

/// Descriptor codes for the non-numeric kinds.
pub mod codes {
    pub const OBJECT: u8 = 16;
    pub const STRING: u8 = 17;
    pub const UNICODE: u8 = 18;
    pub const STRUCTURED: u8 = 19;
    pub const DATETIME: u8 = 20;
    pub const TIMEDELTA: u8 = 21;
}

/// Numeric element kinds and their descriptor codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum ScalarKind {
    Bool = 0,
    Int8 = 1,
    Uint8 = 2,
    Int16 = 3,
    Uint16 = 4,
    Int32 = 5,
    Uint32 = 6,
    Int64 = 7,
    Uint64 = 8,
    Float16 = 9,
    Float32 = 10,
    Float64 = 11,
    LongDouble = 12,
    Complex64 = 13,
    Complex128 = 14,
    CLongDouble = 15,
}

impl ScalarKind {
    /// Descriptor code written into fingerprints.
    #[inline]
    pub fn code(self) -> u8 {
        self.into()
    }

    /// The elementary kind this scalar kind corresponds to, if any.
    pub const fn basic(self) -> Option<BasicKind> {
        match self {
            ScalarKind::Int8 => Some(BasicKind::Int8),
            ScalarKind::Int16 => Some(BasicKind::Int16),
            ScalarKind::Int32 => Some(BasicKind::Int32),
            ScalarKind::Int64 => Some(BasicKind::Int64),
            ScalarKind::Uint8 => Some(BasicKind::Uint8),
            ScalarKind::Uint16 => Some(BasicKind::Uint16),
            ScalarKind::Uint32 => Some(BasicKind::Uint32),
            ScalarKind::Uint64 => Some(BasicKind::Uint64),
            ScalarKind::Float32 => Some(BasicKind::Float32),
            ScalarKind::Float64 => Some(BasicKind::Float64),
            ScalarKind::Complex64 => Some(BasicKind::Complex64),
            ScalarKind::Complex128 => Some(BasicKind::Complex128),
            ScalarKind::Bool
            | ScalarKind::Float16
            | ScalarKind::LongDouble
            | ScalarKind::CLongDouble => None,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            ScalarKind::Bool => "bool",
            ScalarKind::Int8 => "int8",
            ScalarKind::Uint8 => "uint8",
            ScalarKind::Int16 => "int16",
            ScalarKind::Uint16 => "uint16",
            ScalarKind::Int32 => "int32",
            ScalarKind::Uint32 => "uint32",
            ScalarKind::Int64 => "int64",
            ScalarKind::Uint64 => "uint64",
            ScalarKind::Float16 => "float16",
            ScalarKind::Float32 => "float32",
            ScalarKind::Float64 => "float64",
            ScalarKind::LongDouble => "longdouble",
            ScalarKind::Complex64 => "complex64",
            ScalarKind::Complex128 => "complex128",
            ScalarKind::CLongDouble => "clongdouble",
        }
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Number of elementary kinds.
pub const N_BASIC_KINDS: usize = 12;

/// The twelve elementary numeric kinds served by the fast path.
///
/// The discriminant is the kind's index into the basic typecode table and
/// the last axis of the fast-path grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum BasicKind {
    Int8 = 0,
    Int16 = 1,
    Int32 = 2,
    Int64 = 3,
    Uint8 = 4,
    Uint16 = 5,
    Uint32 = 6,
    Uint64 = 7,
    Float32 = 8,
    Float64 = 9,
    Complex64 = 10,
    Complex128 = 11,
}

impl BasicKind {
    /// All elementary kinds in table order.
    pub const ALL: [BasicKind; N_BASIC_KINDS] = [
        BasicKind::Int8,
        BasicKind::Int16,
        BasicKind::Int32,
        BasicKind::Int64,
        BasicKind::Uint8,
        BasicKind::Uint16,
        BasicKind::Uint32,
        BasicKind::Uint64,
        BasicKind::Float32,
        BasicKind::Float64,
        BasicKind::Complex64,
        BasicKind::Complex128,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn scalar(self) -> ScalarKind {
        match self {
            BasicKind::Int8 => ScalarKind::Int8,
            BasicKind::Int16 => ScalarKind::Int16,
            BasicKind::Int32 => ScalarKind::Int32,
            BasicKind::Int64 => ScalarKind::Int64,
            BasicKind::Uint8 => ScalarKind::Uint8,
            BasicKind::Uint16 => ScalarKind::Uint16,
            BasicKind::Uint32 => ScalarKind::Uint32,
            BasicKind::Uint64 => ScalarKind::Uint64,
            BasicKind::Float32 => ScalarKind::Float32,
            BasicKind::Float64 => ScalarKind::Float64,
            BasicKind::Complex64 => ScalarKind::Complex64,
            BasicKind::Complex128 => ScalarKind::Complex128,
        }
    }

    /// Name used in the initialization map.
    #[inline]
    pub const fn name(self) -> &'static str {
        self.scalar().name()
    }
}

/// Time base of a datetime or timedelta descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum TimeUnit {
    Year = 0,
    Month = 1,
    Week = 2,
    Day = 4,
    Hour = 5,
    Minute = 6,
    Second = 7,
    Millisecond = 8,
    Microsecond = 9,
    Nanosecond = 10,
    Picosecond = 11,
    Femtosecond = 12,
    Attosecond = 13,
    Generic = 14,
}

/// Unit and multiplier of a temporal descriptor, e.g. `10ms`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeMeta {
    pub unit: TimeUnit,
    pub multiplier: i32,
}

impl TimeMeta {
    pub const fn new(unit: TimeUnit, multiplier: i32) -> Self {
        Self { unit, multiplier }
    }
}

/// An element-type descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DType {
    /// A numeric element kind.
    Scalar(ScalarKind),
    /// A compound record layout, identified by its descriptor object.
    Structured(Identity),
    Datetime(TimeMeta),
    Timedelta(TimeMeta),
    /// Boxed host objects.
    Object,
    /// Fixed-width byte strings.
    String,
    /// Fixed-width unicode strings.
    Unicode,
}

impl DType {
    /// Descriptor code of this kind.
    pub fn code(self) -> u8 {
        match self {
            DType::Scalar(kind) => kind.code(),
            DType::Structured(_) => codes::STRUCTURED,
            DType::Datetime(_) => codes::DATETIME,
            DType::Timedelta(_) => codes::TIMEDELTA,
            DType::Object => codes::OBJECT,
            DType::String => codes::STRING,
            DType::Unicode => codes::UNICODE,
        }
    }

    /// Elementary kind, when the descriptor is one of the twelve.
    #[inline]
    pub fn basic(self) -> Option<BasicKind> {
        match self {
            DType::Scalar(kind) => kind.basic(),
            _ => None,
        }
    }
}

impl From<ScalarKind> for DType {
    fn from(kind: ScalarKind) -> Self {
        DType::Scalar(kind)
    }
}

impl From<BasicKind> for DType {
    fn from(kind: BasicKind) -> Self {
        DType::Scalar(kind.scalar())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_kinds_round_trip_through_scalar() {
        for (i, kind) in BasicKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), i);
            assert_eq!(kind.scalar().basic(), Some(*kind));
        }
    }

    #[test]
    fn non_basic_scalars() {
        assert_eq!(ScalarKind::Bool.basic(), None);
        assert_eq!(ScalarKind::Float16.basic(), None);
        assert_eq!(ScalarKind::LongDouble.basic(), None);
        assert_eq!(ScalarKind::CLongDouble.basic(), None);
    }

    #[test]
    fn scalar_codes_below_object() {
        for code in 0u8..codes::OBJECT {
            let kind = ScalarKind::try_from(code).unwrap();
            assert_eq!(kind.code(), code);
        }
        assert!(ScalarKind::try_from(codes::OBJECT).is_err());
    }

    #[test]
    fn dtype_codes() {
        assert_eq!(DType::from(BasicKind::Float64).code(), 11);
        let record = DType::Structured(Identity::from_raw(1));
        assert_eq!(record.code(), codes::STRUCTURED);
        let meta = TimeMeta::new(TimeUnit::Millisecond, 10);
        assert_eq!(DType::Datetime(meta).code(), codes::DATETIME);
        assert_eq!(DType::Timedelta(meta).code(), codes::TIMEDELTA);
        assert_eq!(DType::Unicode.basic(), None);
    }

    #[test]
    fn names_match_init_keys() {
        assert_eq!(BasicKind::Int8.name(), "int8");
        assert_eq!(BasicKind::Complex128.name(), "complex128");
        assert_eq!(ScalarKind::Uint32.to_string(), "uint32");
    }

    #[test]
    fn time_unit_codes() {
        assert_eq!(u8::from(TimeUnit::Day), 4);
        assert_eq!(TimeUnit::try_from(14u8).ok(), Some(TimeUnit::Generic));
        assert!(TimeUnit::try_from(3u8).is_err());
    }
}
