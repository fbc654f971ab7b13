//! Runtime typecode cache for a dispatch-based JIT.
//!
//! Given a host value translated into a [`ValueShape`], the dispatcher
//! produces a small stable [`Typecode`] naming the compiled specialization
//! to invoke. The expensive [`Resolver`] runs at most once per distinct type
//! shape; afterwards the value is classified from one of two caches:
//!
//! - [`ArrayTypecodeTable`]: a fixed grid for writable arrays of rank 1–5
//!   with an elementary element type, indexed directly
//! - [`FingerprintCache`]: a table keyed by the value's canonical type
//!   fingerprint, for everything else
//!
//! Values that cannot be fingerprinted are resolved on every call, uncached.
//!
//! ## Crates
//!
//! - `typecache-core`: value model, fingerprints, errors, resolver trait
//! - `typecache-registry`: the arena that pins resolved types, and a
//!   structural resolver built on it
//!
//! ## Example
//!
//! ```
//! use typecache::{ArrayShape, BasicKind, Contiguity, RegistryResolver, TypeofDispatcher};
//!
//! let mut resolver = RegistryResolver::new();
//! let dispatcher = TypeofDispatcher::from_registry(resolver.registry_mut())?;
//!
//! let matrix = ArrayShape::new(2, Contiguity::C, BasicKind::Float64);
//! let code = dispatcher.typecode_of(&mut resolver, &matrix.into())?;
//! assert_eq!(dispatcher.typecode_of(&mut resolver, &matrix.into())?, code);
//! # Ok::<(), typecache::TypeofError>(())
//! ```

mod basic;
mod cache;
mod dispatch;
mod fast_path;
mod locks;

pub use basic::BasicTypecodes;
pub use cache::FingerprintCache;
pub use dispatch::{TypeofDispatcher, dispatcher, typeof_init, typeof_typecode};
pub use fast_path::{ArraySlot, ArrayTypecodeTable, FAST_PATH_MAX_NDIM};

pub use typecache_core::{
    ArrayShape, BasicKind, BufferError, BufferExporter, BufferInfo, BufferRequest, ByteWriter,
    Contiguity, DType, Fingerprint, Identity, Layout, N_BASIC_KINDS, Resolver, ScalarKind,
    TimeMeta, TimeUnit, Typecode, TypeofError, TypeofResult, ValueShape, compute_fingerprint,
};
pub use typecache_registry::{RegistryResolver, TypeRegistry, TypeRepr};
