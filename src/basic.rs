//! Typecodes of the elementary numeric types.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::{BuildHasher, Hash};

use typecache_core::{BasicKind, N_BASIC_KINDS, Typecode, TypeofError, TypeofResult};

/// Host-assigned typecodes of the twelve elementary kinds, plus the code of
/// the pointer-sized integer. Populated once and immutable afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BasicTypecodes {
    codes: [Typecode; N_BASIC_KINDS],
    intp: Typecode,
}

impl BasicTypecodes {
    /// Build the table from a name → typecode mapping (`"int8"`, ...,
    /// `"complex128"`). Every elementary name must be present.
    pub fn from_map<K, S>(map: &HashMap<K, Typecode, S>) -> TypeofResult<Self>
    where
        K: Borrow<str> + Hash + Eq,
        S: BuildHasher,
    {
        Self::from_lookup(|name| map.get(name).copied())
    }

    /// Build the table by querying `lookup` for each elementary name.
    pub fn from_lookup(mut lookup: impl FnMut(&str) -> Option<Typecode>) -> TypeofResult<Self> {
        let mut codes = [Typecode::new(0); N_BASIC_KINDS];
        for kind in BasicKind::ALL {
            codes[kind.index()] =
                lookup(kind.name()).ok_or(TypeofError::MissingBasicType { name: kind.name() })?;
        }
        let intp = match usize::BITS {
            32 => codes[BasicKind::Int32.index()],
            64 => codes[BasicKind::Int64.index()],
            bits => return Err(TypeofError::UnsupportedPointerWidth { bits }),
        };
        Ok(Self { codes, intp })
    }

    #[inline]
    pub fn get(&self, kind: BasicKind) -> Typecode {
        self.codes[kind.index()]
    }

    /// Typecode of the pointer-sized signed integer.
    #[inline]
    pub fn intp(&self) -> Typecode {
        self.intp
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustc_hash::FxHashMap;

    fn full_map() -> FxHashMap<String, Typecode> {
        let mut map = FxHashMap::default();
        for kind in BasicKind::ALL {
            let code = Typecode::new(100 + kind.index() as u32);
            map.insert(kind.name().to_string(), code);
        }
        map
    }

    #[test]
    fn from_map_populates_every_kind() {
        let basic = BasicTypecodes::from_map(&full_map()).unwrap();
        assert_eq!(basic.get(BasicKind::Int8), Typecode::new(100));
        assert_eq!(basic.get(BasicKind::Complex128), Typecode::new(111));
    }

    #[test]
    fn intp_follows_pointer_width() {
        let basic = BasicTypecodes::from_map(&full_map()).unwrap();
        let expected = if usize::BITS == 32 {
            basic.get(BasicKind::Int32)
        } else {
            basic.get(BasicKind::Int64)
        };
        assert_eq!(basic.intp(), expected);
    }

    #[test]
    fn missing_kind_is_fatal() {
        let mut map = full_map();
        map.remove("uint16");
        assert_eq!(
            BasicTypecodes::from_map(&map),
            Err(TypeofError::MissingBasicType { name: "uint16" })
        );
    }

    #[test]
    fn str_keyed_maps_work() {
        let map: HashMap<&str, Typecode> = BasicKind::ALL
            .iter()
            .map(|kind| (kind.name(), Typecode::new(kind.index() as u32)))
            .collect();
        let basic = BasicTypecodes::from_map(&map).unwrap();
        assert_eq!(basic.get(BasicKind::Float32), Typecode::new(8));
    }
}
