//! Fingerprint → typecode cache.
//!
//! The general classification path: encode the value's type shape, look the
//! bytes up, and call the resolver only when the shape has never been seen.
//! Keys are owned copies of the fingerprint bytes, hashed with XXH64; equal
//! hashes are always confirmed by comparing the full byte strings.
//!
//! Entries are inserted once and never updated or removed. The table lock is
//! released before the resolver runs, so a resolver may classify other
//! values (even the same shape) reentrantly without deadlocking.

use std::collections::{HashMap, TryReserveError};
use std::sync::RwLock;

use xxhash_rust::xxh64::Xxh64Builder;

use typecache_core::{
    ByteWriter, Resolver, Typecode, TypeofError, TypeofResult, ValueShape, encode,
};

use crate::locks::{recover_read, recover_write};

type FingerprintMap = HashMap<Box<[u8]>, Typecode, Xxh64Builder>;

/// Process-wide fingerprint cache.
pub struct FingerprintCache {
    table: RwLock<FingerprintMap>,
}

impl Default for FingerprintCache {
    fn default() -> Self {
        Self::new()
    }
}

impl FingerprintCache {
    pub fn new() -> Self {
        Self {
            table: RwLock::new(HashMap::with_hasher(Xxh64Builder::new(0))),
        }
    }

    /// Classify `value` through its fingerprint.
    ///
    /// Values that cannot be fingerprinted are resolved directly and not
    /// cached. Resolver failures are returned unchanged and leave the cache
    /// untouched.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn resolve_cached<R>(
        &self,
        resolver: &mut R,
        value: &ValueShape<'_>,
    ) -> TypeofResult<Typecode>
    where
        R: Resolver + ?Sized,
    {
        let mut fingerprint = ByteWriter::new();
        match encode(&mut fingerprint, value) {
            Ok(()) => {}
            Err(err) if err.is_unrecognized() => {
                log::debug!("typecache: {}, resolving uncached", err);
                return resolver.resolve(value);
            }
            Err(err) => return Err(err),
        }

        if let Some(code) = self.get(fingerprint.as_bytes()) {
            return Ok(code);
        }

        let code = resolver.resolve(value)?;
        self.insert(fingerprint.as_bytes(), code)
    }

    /// Look up a fingerprint.
    pub fn get(&self, fingerprint: &[u8]) -> Option<Typecode> {
        recover_read(&self.table, "fingerprint table")
            .get(fingerprint)
            .copied()
    }

    /// Insert a freshly resolved entry and return the code now stored for
    /// the fingerprint. If a reentrant call stored the same fingerprint
    /// first, that entry wins.
    fn insert(&self, fingerprint: &[u8], code: Typecode) -> TypeofResult<Typecode> {
        let oom = |_: TryReserveError| TypeofError::OutOfMemory {
            context: "inserting into the fingerprint cache",
        };

        let mut key = Vec::new();
        key.try_reserve_exact(fingerprint.len()).map_err(oom)?;
        key.extend_from_slice(fingerprint);

        let mut table = recover_write(&self.table, "fingerprint table");
        if let Some(&existing) = table.get(fingerprint) {
            if existing != code {
                log::debug!(
                    "typecache: fingerprint {} already cached as {}, resolver returned {}",
                    fingerprint.escape_ascii(),
                    existing,
                    code
                );
            }
            return Ok(existing);
        }
        table.try_reserve(1).map_err(oom)?;
        log::trace!(
            "typecache: caching {} as {}",
            fingerprint.escape_ascii(),
            code
        );
        table.insert(key.into_boxed_slice(), code);
        Ok(code)
    }

    /// Number of cached fingerprints.
    pub fn len(&self) -> usize {
        recover_read(&self.table, "fingerprint table").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for FingerprintCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FingerprintCache")
            .field("entries", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use typecache_core::{ArrayShape, BasicKind, Contiguity, Identity, compute_fingerprint};

    fn counting(
        calls: &mut u32,
        code: u32,
    ) -> impl FnMut(&ValueShape<'_>) -> TypeofResult<Typecode> + '_ {
        move |_: &ValueShape<'_>| {
            *calls += 1;
            Ok(Typecode::new(code))
        }
    }

    #[test]
    fn miss_then_hit() {
        let cache = FingerprintCache::new();
        let mut calls = 0;
        let value = ValueShape::Tuple(vec![ValueShape::Int, ValueShape::Float]);
        {
            let mut resolver = counting(&mut calls, 7);
            assert_eq!(
                cache.resolve_cached(&mut resolver, &value),
                Ok(Typecode::new(7))
            );
            assert_eq!(
                cache.resolve_cached(&mut resolver, &value),
                Ok(Typecode::new(7))
            );
        }
        assert_eq!(calls, 1);
        assert_eq!(cache.len(), 1);

        let fp = compute_fingerprint(&value).unwrap();
        assert_eq!(cache.get(fp.as_bytes()), Some(Typecode::new(7)));
    }

    #[test]
    fn unrecognized_values_are_not_cached() {
        let cache = FingerprintCache::new();
        let mut calls = 0;
        let value = ValueShape::Opaque(Identity::from_raw(0x10));
        {
            let mut resolver = counting(&mut calls, 3);
            assert_eq!(
                cache.resolve_cached(&mut resolver, &value),
                Ok(Typecode::new(3))
            );
            assert_eq!(
                cache.resolve_cached(&mut resolver, &value),
                Ok(Typecode::new(3))
            );
        }
        assert_eq!(calls, 2);
        assert!(cache.is_empty());
    }

    #[test]
    fn resolver_failure_inserts_nothing() {
        let cache = FingerprintCache::new();
        let mut failing =
            |_: &ValueShape<'_>| -> TypeofResult<Typecode> { Err(TypeofError::resolve("boom")) };
        let err = cache
            .resolve_cached(&mut failing, &ValueShape::Bytes)
            .unwrap_err();
        assert_eq!(err, TypeofError::resolve("boom"));
        assert!(cache.is_empty());
    }

    #[test]
    fn distinct_shapes_get_distinct_entries() {
        let cache = FingerprintCache::new();
        let mut next = 0;
        let mut resolver = |_: &ValueShape<'_>| -> TypeofResult<Typecode> {
            next += 1;
            Ok(Typecode::new(next))
        };
        let rw = ArrayShape::new(1, Contiguity::C, BasicKind::Float64);
        let a = cache.resolve_cached(&mut resolver, &rw.into()).unwrap();
        let b = cache
            .resolve_cached(&mut resolver, &rw.readonly().into())
            .unwrap();
        assert_ne!(a, b);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn reentrant_insert_keeps_first_entry() {
        let cache = FingerprintCache::new();
        let mut depth = 0;
        let mut resolver = |value: &ValueShape<'_>| -> TypeofResult<Typecode> {
            depth += 1;
            if depth == 1 {
                // Resolve the same shape again from inside the resolver.
                let mut inner =
                    |_: &ValueShape<'_>| -> TypeofResult<Typecode> { Ok(Typecode::new(1)) };
                cache.resolve_cached(&mut inner, value)?;
                Ok(Typecode::new(2))
            } else {
                unreachable!()
            }
        };
        let code = cache
            .resolve_cached(&mut resolver, &ValueShape::Complex)
            .unwrap();
        assert_eq!(code, Typecode::new(1));
        assert_eq!(cache.len(), 1);
    }
}
