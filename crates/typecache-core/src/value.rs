//! The closed value model the classification core operates on.
//!
//! Hosts translate their dynamic objects into a [`ValueShape`] before asking
//! for a typecode. The shape carries type attributes only, never contents:
//! an array is its rank, layout, mutability and element type; a tuple is the
//! shapes of its elements.
//!
//! Generic buffers are the one lazily inspected kind. Their attributes are
//! only known after a view has been acquired through [`BufferExporter`], and
//! every acquired view must be released again, which [`ScopedBuffer`] does
//! on drop.

use std::fmt;

use bitflags::bitflags;

use crate::{BufferError, DType, Identity};

bitflags! {
    /// Contiguity flags reported by an array or buffer view.
    ///
    /// A one-element or zero-size array may be both C- and F-contiguous.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Contiguity: u8 {
        const C = 1 << 0;
        const F = 1 << 1;
    }
}

/// Memory layout class of an array or buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layout {
    /// C (row-major) contiguous.
    C,
    /// Fortran (column-major) contiguous.
    F,
    /// Any other ordering.
    Any,
}

impl Layout {
    /// Number of layout classes.
    pub const COUNT: usize = 3;

    /// Classify contiguity flags. C is checked before F, so an array that is
    /// both reports `C`.
    #[inline]
    pub fn classify(contiguity: Contiguity) -> Self {
        if contiguity.contains(Contiguity::C) {
            Layout::C
        } else if contiguity.contains(Contiguity::F) {
            Layout::F
        } else {
            Layout::Any
        }
    }

    /// Byte written into fingerprints.
    #[inline]
    pub const fn as_byte(self) -> u8 {
        match self {
            Layout::C => b'C',
            Layout::F => b'F',
            Layout::Any => b'A',
        }
    }

    /// Index into the layout axis of the fast-path grid.
    #[inline]
    pub const fn slot(self) -> usize {
        match self {
            Layout::Any => 0,
            Layout::C => 1,
            Layout::F => 2,
        }
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_byte() as char)
    }
}

/// Type attributes of an array value (or a value of an array subtype).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ArrayShape {
    pub ndim: u32,
    pub contiguity: Contiguity,
    pub writable: bool,
    pub dtype: DType,
}

impl ArrayShape {
    /// A writable array with the given rank, contiguity and element type.
    pub fn new(ndim: u32, contiguity: Contiguity, dtype: impl Into<DType>) -> Self {
        Self {
            ndim,
            contiguity,
            writable: true,
            dtype: dtype.into(),
        }
    }

    /// Same array, marked read-only.
    pub fn readonly(mut self) -> Self {
        self.writable = false;
        self
    }

    #[inline]
    pub fn layout(&self) -> Layout {
        Layout::classify(self.contiguity)
    }
}

/// Kind of view requested from a [`BufferExporter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferRequest {
    Writable,
    ReadOnly,
}

/// Attributes of an acquired buffer view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BufferInfo {
    pub ndim: u32,
    pub contiguity: Contiguity,
    pub readonly: bool,
    /// Struct-module style item format, e.g. `"d"` or `"<i4"`.
    pub format: Option<String>,
}

/// A duck-typed object exposing raw memory through views.
///
/// `acquire` and `release` calls are always paired by the core.
pub trait BufferExporter {
    /// Acquire a view of the requested kind.
    fn acquire(&self, request: BufferRequest) -> Result<BufferInfo, BufferError>;

    /// Release a view obtained from `acquire`.
    fn release(&self, view: &BufferInfo);

    /// Identity of the object's runtime type.
    fn runtime_type(&self) -> Identity;
}

/// An acquired buffer view, released when dropped.
pub struct ScopedBuffer<'a> {
    exporter: &'a dyn BufferExporter,
    info: BufferInfo,
}

impl<'a> ScopedBuffer<'a> {
    /// Acquire a writable view, falling back to a read-only one.
    pub fn acquire(exporter: &'a dyn BufferExporter) -> Result<Self, BufferError> {
        let info = match exporter.acquire(BufferRequest::Writable) {
            Ok(info) => info,
            Err(_) => exporter.acquire(BufferRequest::ReadOnly)?,
        };
        Ok(Self { exporter, info })
    }

    #[inline]
    pub fn info(&self) -> &BufferInfo {
        &self.info
    }

    #[inline]
    pub fn layout(&self) -> Layout {
        Layout::classify(self.info.contiguity)
    }
}

impl Drop for ScopedBuffer<'_> {
    fn drop(&mut self) {
        self.exporter.release(&self.info);
    }
}

/// The type-relevant shape of a host value.
#[derive(Clone)]
pub enum ValueShape<'a> {
    None,
    Bool,
    Int,
    Float,
    Complex,
    Bytes,
    ByteArray,
    Tuple(Vec<ValueShape<'a>>),
    /// A zero-dimensional element-scalar.
    Scalar(DType),
    Array(ArrayShape),
    /// An object exposing views through the buffer protocol.
    Buffer(&'a dyn BufferExporter),
    /// An element-type descriptor passed as a value.
    DType(DType),
    /// Anything else, tagged with the identity of its runtime type.
    Opaque(Identity),
}

impl ValueShape<'_> {
    /// Short name of the value kind, for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            ValueShape::None => "none",
            ValueShape::Bool => "bool",
            ValueShape::Int => "int",
            ValueShape::Float => "float",
            ValueShape::Complex => "complex",
            ValueShape::Bytes => "bytes",
            ValueShape::ByteArray => "bytearray",
            ValueShape::Tuple(_) => "tuple",
            ValueShape::Scalar(_) => "scalar",
            ValueShape::Array(_) => "array",
            ValueShape::Buffer(_) => "buffer",
            ValueShape::DType(_) => "dtype",
            ValueShape::Opaque(_) => "opaque",
        }
    }
}

impl fmt::Debug for ValueShape<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueShape::Tuple(items) => f.debug_tuple("Tuple").field(items).finish(),
            ValueShape::Scalar(dtype) => f.debug_tuple("Scalar").field(dtype).finish(),
            ValueShape::Array(array) => f.debug_tuple("Array").field(array).finish(),
            ValueShape::Buffer(exporter) => f
                .debug_tuple("Buffer")
                .field(&exporter.runtime_type())
                .finish(),
            ValueShape::DType(dtype) => f.debug_tuple("DType").field(dtype).finish(),
            ValueShape::Opaque(id) => f.debug_tuple("Opaque").field(id).finish(),
            other => f.write_str(other.kind_name()),
        }
    }
}

impl From<ArrayShape> for ValueShape<'_> {
    fn from(array: ArrayShape) -> Self {
        ValueShape::Array(array)
    }
}
