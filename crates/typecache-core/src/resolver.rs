//! The resolver seam: full type inference, invoked on cache misses.

use crate::{Typecode, TypeofResult, ValueShape};

/// Performs full semantic type analysis of a value.
///
/// The classification caches call a resolver once per distinct type shape
/// and remember the typecode it returns. Implementations must:
///
/// 1. Analyse the value and allocate a stable typecode for its type.
/// 2. **Pin** the type representation behind the returned code for the rest
///    of the process. The caches index by integer only; if the backing
///    representation were ever dropped, a later value with the same shape
///    would be handed a dangling code. Nothing in the caches detects this.
/// 3. Tolerate reentrant invocation: resolving one value may classify other
///    values (or the same shape again) through the dispatcher.
///
/// Failures are propagated to the caller unchanged and never cached.
pub trait Resolver {
    fn resolve(&mut self, value: &ValueShape<'_>) -> TypeofResult<Typecode>;
}

impl<F> Resolver for F
where
    F: FnMut(&ValueShape<'_>) -> TypeofResult<Typecode>,
{
    #[inline]
    fn resolve(&mut self, value: &ValueShape<'_>) -> TypeofResult<Typecode> {
        self(value)
    }
}
