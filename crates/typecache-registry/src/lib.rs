//! Type registry for the typecode cache.
//!
//! The registry is the arena that owns every resolved type for the lifetime
//! of the process. [`RegistryResolver`] is a structural resolver built on it,
//! used by hosts without a richer inference engine and by the test suites.

mod registry;
mod resolver;

pub use registry::{TypeRegistry, TypeRepr};
pub use resolver::{INTP, RegistryResolver};
