//! Typecodes: small integers naming a compiled specialization.

use std::fmt;

use crate::{TypeofError, TypeofResult};

/// A stable, non-negative integer identifying a resolved type.
///
/// Typecodes are allocated by the resolver and never reused within a
/// process. `u32::MAX` is reserved as the "unset" marker of the fast-path
/// array table and is never a valid code.
///
/// # Example
///
/// ```
/// use typecache_core::Typecode;
///
/// let code = Typecode::new(7);
/// assert_eq!(code.index(), 7);
/// assert!(Typecode::try_from(-1i64).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Typecode(u32);

impl Typecode {
    /// Largest valid typecode.
    pub const MAX: Typecode = Typecode(u32::MAX - 1);

    /// Create a typecode from an index.
    ///
    /// # Panics
    ///
    /// Panics if `index` is the reserved value `u32::MAX`.
    #[inline]
    pub const fn new(index: u32) -> Self {
        assert!(index != u32::MAX, "u32::MAX is a reserved typecode");
        Self(index)
    }

    /// Get the underlying index.
    #[inline]
    pub const fn index(self) -> u32 {
        self.0
    }

    /// Index as `usize`, for arena lookups.
    #[inline]
    pub const fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for Typecode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tc{}", self.0)
    }
}

impl TryFrom<i64> for Typecode {
    type Error = TypeofError;

    /// Validate a raw code as handed back by a host type system.
    fn try_from(raw: i64) -> TypeofResult<Self> {
        match u32::try_from(raw) {
            Ok(index) if index != u32::MAX => Ok(Self(index)),
            _ => Err(TypeofError::InvalidTypecode { raw }),
        }
    }
}

impl From<Typecode> for u32 {
    fn from(code: Typecode) -> Self {
        code.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typecode_creation() {
        let code = Typecode::new(42);
        assert_eq!(code.index(), 42);
        assert_eq!(code.as_usize(), 42);
    }

    #[test]
    fn typecode_display() {
        assert_eq!(format!("{}", Typecode::new(5)), "tc5");
    }

    #[test]
    fn try_from_valid_raw() {
        assert_eq!(Typecode::try_from(0i64), Ok(Typecode::new(0)));
        assert_eq!(
            Typecode::try_from(i64::from(u32::MAX - 1)),
            Ok(Typecode::MAX)
        );
    }

    #[test]
    fn try_from_rejects_negative_and_reserved() {
        assert_eq!(
            Typecode::try_from(-1i64),
            Err(TypeofError::InvalidTypecode { raw: -1 })
        );
        let reserved = i64::from(u32::MAX);
        assert_eq!(
            Typecode::try_from(reserved),
            Err(TypeofError::InvalidTypecode { raw: reserved })
        );
        assert!(Typecode::try_from(i64::MAX).is_err());
    }

    #[test]
    #[should_panic(expected = "reserved typecode")]
    fn new_rejects_reserved() {
        let _ = Typecode::new(u32::MAX);
    }
}
