//! Machine-word identities of host objects.

use std::fmt;

/// The identity of a host object or runtime type, as a machine word.
///
/// Identities are addresses: they are only meaningful within the current
/// process and are never compared structurally. Fingerprints embed them for
/// structured descriptors and for the runtime type of generic buffers.
///
/// # Example
///
/// ```
/// use typecache_core::Identity;
///
/// let layout = [0u8; 16];
/// let id = Identity::of(&layout);
/// assert_eq!(id, Identity::of(&layout));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identity(usize);

impl Identity {
    /// Create an identity from a raw word supplied by the host.
    #[inline]
    pub const fn from_raw(word: usize) -> Self {
        Self(word)
    }

    /// Identity of a live Rust object, taken from its address.
    #[inline]
    pub fn of<T: ?Sized>(object: &T) -> Self {
        Self(object as *const T as *const () as usize)
    }

    /// The raw word.
    #[inline]
    pub const fn as_word(self) -> usize {
        self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_from_raw() {
        let id = Identity::from_raw(0x1000);
        assert_eq!(id.as_word(), 0x1000);
        assert_eq!(id.to_string(), "0x1000");
    }

    #[test]
    fn identity_of_distinct_objects() {
        let a = Box::new(1u64);
        let b = Box::new(1u64);
        assert_ne!(Identity::of(&*a), Identity::of(&*b));
        assert_eq!(Identity::of(&*a), Identity::of(&*a));
    }
}
