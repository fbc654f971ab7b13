//! The classification entry point.
//!
//! [`TypeofDispatcher`] owns both caching layers and routes each value to
//! one of them: arrays try the fast-path grid first, everything else goes
//! straight to the fingerprint cache. All classification of a host must go
//! through a single dispatcher so the two layers stay consistent.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::{BuildHasher, Hash};
use std::sync::OnceLock;

use typecache_core::{Resolver, Typecode, TypeofError, TypeofResult, ValueShape};
use typecache_registry::TypeRegistry;

use crate::{ArrayTypecodeTable, BasicTypecodes, FingerprintCache};

/// Classifies values into typecodes, caching one resolution per type shape.
///
/// # Example
///
/// ```
/// use typecache::{RegistryResolver, TypeofDispatcher, ValueShape};
///
/// let mut resolver = RegistryResolver::new();
/// let dispatcher = TypeofDispatcher::from_registry(resolver.registry_mut()).unwrap();
///
/// let a = dispatcher.typecode_of(&mut resolver, &ValueShape::Float).unwrap();
/// let b = dispatcher.typecode_of(&mut resolver, &ValueShape::Float).unwrap();
/// assert_eq!(a, b);
/// assert_eq!(resolver.resolutions(), 1);
/// ```
#[derive(Debug)]
pub struct TypeofDispatcher {
    basic: BasicTypecodes,
    cache: FingerprintCache,
    arrays: ArrayTypecodeTable,
}

impl TypeofDispatcher {
    pub fn new(basic: BasicTypecodes) -> Self {
        Self {
            basic,
            cache: FingerprintCache::new(),
            arrays: ArrayTypecodeTable::new(),
        }
    }

    /// Create a dispatcher whose elementary typecodes come from `registry`.
    pub fn from_registry(registry: &mut TypeRegistry) -> TypeofResult<Self> {
        let names = registry.basic_typecodes_map()?;
        Ok(Self::new(BasicTypecodes::from_map(&names)?))
    }

    /// Classify a value.
    ///
    /// The resolver runs at most once per distinct type shape; its failures
    /// are returned unchanged.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn typecode_of<R>(&self, resolver: &mut R, value: &ValueShape<'_>) -> TypeofResult<Typecode>
    where
        R: Resolver + ?Sized,
    {
        if let ValueShape::Array(array) = value {
            if let Some(result) = self.arrays.resolve_array(resolver, array) {
                return result;
            }
        }
        self.cache.resolve_cached(resolver, value)
    }

    pub fn basic_typecodes(&self) -> &BasicTypecodes {
        &self.basic
    }

    pub fn fingerprint_cache(&self) -> &FingerprintCache {
        &self.cache
    }

    pub fn array_table(&self) -> &ArrayTypecodeTable {
        &self.arrays
    }
}

static DISPATCHER: OnceLock<TypeofDispatcher> = OnceLock::new();

/// Initialize the process-wide dispatcher from the host's elementary
/// typecodes. Must be called exactly once, before any classification.
pub fn typeof_init<K, S>(names: &HashMap<K, Typecode, S>) -> TypeofResult<&'static TypeofDispatcher>
where
    K: Borrow<str> + Hash + Eq,
    S: BuildHasher,
{
    let basic = BasicTypecodes::from_map(names)?;
    DISPATCHER
        .set(TypeofDispatcher::new(basic))
        .map_err(|_| TypeofError::AlreadyInitialized)?;
    dispatcher()
}

/// The process-wide dispatcher.
pub fn dispatcher() -> TypeofResult<&'static TypeofDispatcher> {
    DISPATCHER.get().ok_or(TypeofError::NotInitialized)
}

/// Classify a value with the process-wide dispatcher.
pub fn typeof_typecode<R>(resolver: &mut R, value: &ValueShape<'_>) -> TypeofResult<Typecode>
where
    R: Resolver + ?Sized,
{
    dispatcher()?.typecode_of(resolver, value)
}
