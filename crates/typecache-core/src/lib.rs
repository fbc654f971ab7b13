//! Core types for runtime type classification.
//!
//! This crate holds the leaf components of the typecode cache:
//!
//! - [`ValueShape`]: the closed value model hosts translate their objects into
//! - [`DType`]: element-type descriptors
//! - [`Typecode`]: integers naming resolved types
//! - [`ByteWriter`] and [`encode`]: canonical type fingerprints
//! - [`Resolver`]: the full-inference seam invoked on cache misses
//! - [`TypeofError`]: errors shared by every layer

mod dtype;
mod error;
pub mod fingerprint;
mod ids;
mod resolver;
mod typecode;
mod value;
mod writer;

pub use dtype::{BasicKind, DType, N_BASIC_KINDS, ScalarKind, TimeMeta, TimeUnit, codes};
pub use error::{BufferError, TypeofError, TypeofResult};
pub use fingerprint::{Fingerprint, compute_fingerprint, encode, encode_dtype, opcodes};
pub use ids::Identity;
pub use resolver::Resolver;
pub use typecode::Typecode;
pub use value::{
    ArrayShape, BufferExporter, BufferInfo, BufferRequest, Contiguity, Layout, ScopedBuffer,
    ValueShape,
};
pub use writer::{ByteWriter, INLINE_CAPACITY};
