//! Type fingerprints.
//!
//! A fingerprint is a canonical byte encoding of a value's type shape: one
//! opcode byte per node followed by that node's payload. Two values with the
//! same type attributes always encode to the same bytes. Tuples are framed
//! by explicit start and end markers rather than a length prefix, so
//! `((a, b), c)` and `(a, (b, c))` never collide.
//!
//! # Layout
//!
//! ```text
//! none | bool | int | float | complex | bytes | bytearray   tag
//! tuple        '(' <element>* ')'
//! array        'A' rank:u32le layout:C|F|A access:W|R <dtype>
//! scalar       'S' <dtype>
//! descriptor   'D' <dtype>
//! buffer       'B' rank:u32le layout:C|F|A access:W|R format\0 type:word
//!
//! dtype        code                                   numeric kinds
//!              code unit:u8 multiplier:u32le          datetime/timedelta
//!              code identity:word                     structured
//! ```
//!
//! Structured descriptors are encoded by identity rather than structure.
//! Two distinct but identical layouts get different fingerprints; that costs
//! a cache slot, never a wrong typecode. Fingerprints embed addresses and
//! are therefore only meaningful inside the process that computed them.

use std::fmt;

use crate::{ByteWriter, DType, ScopedBuffer, TypeofError, TypeofResult, ValueShape};

/// Fingerprint opcodes.
pub mod opcodes {
    pub const START_TUPLE: u8 = b'(';
    pub const END_TUPLE: u8 = b')';
    pub const INT: u8 = b'i';
    pub const FLOAT: u8 = b'f';
    pub const COMPLEX: u8 = b'c';
    pub const BOOL: u8 = b'?';
    pub const BYTEARRAY: u8 = b'a';
    pub const BYTES: u8 = b'b';
    pub const NONE: u8 = b'n';
    pub const BUFFER: u8 = b'B';
    pub const SCALAR: u8 = b'S';
    pub const ARRAY: u8 = b'A';
    pub const DTYPE: u8 = b'D';
}

const WRITABLE: u8 = b'W';
const READONLY: u8 = b'R';

#[inline]
fn access_byte(writable: bool) -> u8 {
    if writable { WRITABLE } else { READONLY }
}

/// Append the fingerprint of an element-type descriptor.
pub fn encode_dtype(w: &mut ByteWriter, dtype: &DType) -> TypeofResult<()> {
    match *dtype {
        DType::Scalar(kind) => w.put_u8(kind.code()),
        DType::Structured(identity) => {
            w.put_u8(dtype.code())?;
            w.put_word(identity.as_word())
        }
        DType::Datetime(meta) | DType::Timedelta(meta) => {
            w.put_u8(dtype.code())?;
            w.put_u8(meta.unit.into())?;
            w.put_u32_le(meta.multiplier as u32)
        }
        DType::Object | DType::String | DType::Unicode => {
            Err(TypeofError::Unrecognized { kind: "dtype" })
        }
    }
}

/// Append the fingerprint of `value` to `w`.
///
/// On error the writer holds a partial encoding which callers must discard.
pub fn encode(w: &mut ByteWriter, value: &ValueShape<'_>) -> TypeofResult<()> {
    match value {
        ValueShape::None => w.put_u8(opcodes::NONE),
        ValueShape::Bool => w.put_u8(opcodes::BOOL),
        ValueShape::Int => w.put_u8(opcodes::INT),
        ValueShape::Float => w.put_u8(opcodes::FLOAT),
        ValueShape::Complex => w.put_u8(opcodes::COMPLEX),
        ValueShape::Bytes => w.put_u8(opcodes::BYTES),
        ValueShape::ByteArray => w.put_u8(opcodes::BYTEARRAY),
        ValueShape::Tuple(items) => {
            w.put_u8(opcodes::START_TUPLE)?;
            for item in items {
                encode(w, item)?;
            }
            w.put_u8(opcodes::END_TUPLE)
        }
        ValueShape::Scalar(dtype) => {
            w.put_u8(opcodes::SCALAR)?;
            encode_dtype(w, dtype)
        }
        ValueShape::Array(array) => {
            w.put_u8(opcodes::ARRAY)?;
            w.put_u32_le(array.ndim)?;
            w.put_u8(array.layout().as_byte())?;
            w.put_u8(access_byte(array.writable))?;
            encode_dtype(w, &array.dtype)
        }
        ValueShape::Buffer(exporter) => {
            let view = ScopedBuffer::acquire(*exporter)
                .map_err(|_| TypeofError::Unrecognized { kind: "buffer" })?;
            let info = view.info();
            w.put_u8(opcodes::BUFFER)?;
            w.put_u32_le(info.ndim)?;
            w.put_u8(view.layout().as_byte())?;
            w.put_u8(access_byte(!info.readonly))?;
            w.put_cstr(info.format.as_deref())?;
            w.put_word(exporter.runtime_type().as_word())
        }
        ValueShape::DType(dtype) => {
            w.put_u8(opcodes::DTYPE)?;
            encode_dtype(w, dtype)
        }
        ValueShape::Opaque(_) => Err(TypeofError::Unrecognized { kind: "opaque" }),
    }
}

/// An owned fingerprint.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(Box<[u8]>);

impl Fingerprint {
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_boxed_bytes(self) -> Box<[u8]> {
        self.0
    }
}

impl AsRef<[u8]> for Fingerprint {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint(\"{}\")", self.0.escape_ascii())
    }
}

/// Compute the fingerprint of a value.
///
/// # Example
///
/// ```
/// use typecache_core::{compute_fingerprint, ValueShape};
///
/// let pair = ValueShape::Tuple(vec![ValueShape::Int, ValueShape::None]);
/// let fp = compute_fingerprint(&pair).unwrap();
/// assert_eq!(fp.as_bytes(), b"(in)");
/// ```
pub fn compute_fingerprint(value: &ValueShape<'_>) -> TypeofResult<Fingerprint> {
    let mut w = ByteWriter::new();
    encode(&mut w, value)?;
    let mut owned = Vec::new();
    owned
        .try_reserve_exact(w.len())
        .map_err(|_| TypeofError::OutOfMemory {
            context: "copying a fingerprint",
        })?;
    owned.extend_from_slice(w.as_bytes());
    Ok(Fingerprint(owned.into_boxed_slice()))
}
