//! TypeRegistry - process-lifetime arena of resolved types.
//!
//! Every typecode handed to the classification caches names an entry in a
//! [`TypeRegistry`]. Entries are appended, deduplicated structurally and
//! never removed, so a code stays valid for as long as the registry lives.
//! Keeping the registry alive for the whole process is what pins the types
//! the caches refer to.
//!
//! # Thread Safety
//!
//! `TypeRegistry` is not synchronized. Hosts that resolve from several
//! threads wrap it (or the resolver owning it) in a lock of their choosing.
//!
//! # Example
//!
//! ```
//! use typecache_core::ScalarKind;
//! use typecache_registry::{TypeRegistry, TypeRepr};
//!
//! let mut registry = TypeRegistry::new();
//! let a = registry.intern(TypeRepr::Number(ScalarKind::Float64)).unwrap();
//! let b = registry.intern(TypeRepr::Number(ScalarKind::Float64)).unwrap();
//! assert_eq!(a, b);
//! assert_eq!(registry.get(a), Some(&TypeRepr::Number(ScalarKind::Float64)));
//! ```

use std::fmt;

use rustc_hash::FxHashMap;

use typecache_core::{
    BasicKind, DType, Identity, Layout, ScalarKind, Typecode, TypeofError, TypeofResult,
};

/// Structural representation of a resolved type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeRepr {
    None,
    Boolean,
    /// A numeric scalar of the given kind.
    Number(ScalarKind),
    Bytes,
    ByteArray,
    /// A heterogeneous tuple of already-resolved element types.
    Tuple(Vec<Typecode>),
    Array {
        dtype: DType,
        ndim: u32,
        layout: Layout,
        readonly: bool,
    },
    /// A non-numeric element-scalar (datetime, record, ...).
    Element(DType),
    Buffer {
        ndim: u32,
        layout: Layout,
        readonly: bool,
        format: Option<String>,
        runtime_type: Identity,
    },
    /// The type of a descriptor value.
    DType(DType),
    /// A host object typed only by its runtime type.
    Opaque(Identity),
}

impl fmt::Display for TypeRepr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRepr::None => write!(f, "none"),
            TypeRepr::Boolean => write!(f, "boolean"),
            TypeRepr::Number(kind) => write!(f, "{}", kind),
            TypeRepr::Bytes => write!(f, "bytes"),
            TypeRepr::ByteArray => write!(f, "bytearray"),
            TypeRepr::Tuple(items) => {
                write!(f, "(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, ")")
            }
            TypeRepr::Array {
                dtype,
                ndim,
                layout,
                readonly,
            } => {
                let prefix = if *readonly { "readonly " } else { "" };
                write!(f, "{}array({:?}, {}d, {})", prefix, dtype, ndim, layout)
            }
            TypeRepr::Element(dtype) => write!(f, "{:?}", dtype),
            TypeRepr::Buffer {
                ndim,
                layout,
                readonly,
                format,
                runtime_type,
            } => {
                let prefix = if *readonly { "readonly " } else { "" };
                write!(
                    f,
                    "{}buffer({}, {}d, {}, type={})",
                    prefix,
                    format.as_deref().unwrap_or(""),
                    ndim,
                    layout,
                    runtime_type
                )
            }
            TypeRepr::DType(dtype) => write!(f, "dtype({:?})", dtype),
            TypeRepr::Opaque(id) => write!(f, "object({})", id),
        }
    }
}

/// Append-only arena of resolved types, indexed by typecode.
#[derive(Default)]
pub struct TypeRegistry {
    /// Arena storage; a typecode is an index into this vector.
    types: Vec<TypeRepr>,
    /// Structural dedup index.
    codes: FxHashMap<TypeRepr, Typecode>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the twelve elementary number types interned
    /// first, in table order.
    pub fn with_basic_types() -> TypeofResult<Self> {
        let mut registry = Self::new();
        for kind in BasicKind::ALL {
            registry.intern(TypeRepr::Number(kind.scalar()))?;
        }
        Ok(registry)
    }

    /// Return the typecode for `repr`, allocating one on first sight.
    pub fn intern(&mut self, repr: TypeRepr) -> TypeofResult<Typecode> {
        if let Some(&code) = self.codes.get(&repr) {
            return Ok(code);
        }

        let code = Typecode::try_from(self.types.len() as i64)?;
        self.types
            .try_reserve(1)
            .and_then(|_| self.codes.try_reserve(1))
            .map_err(|_| TypeofError::OutOfMemory {
                context: "growing the type registry",
            })?;
        log::trace!("registry: {} -> {}", code, repr);
        self.types.push(repr.clone());
        self.codes.insert(repr, code);
        Ok(code)
    }

    /// Look up the type a code refers to.
    pub fn get(&self, code: Typecode) -> Option<&TypeRepr> {
        self.types.get(code.as_usize())
    }

    /// Look up a type's code without interning it.
    pub fn code_of(&self, repr: &TypeRepr) -> Option<Typecode> {
        self.codes.get(repr).copied()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Names and codes of the elementary number types, in the form expected
    /// by dispatcher initialization.
    pub fn basic_typecodes_map(&mut self) -> TypeofResult<FxHashMap<&'static str, Typecode>> {
        let mut map = FxHashMap::default();
        for kind in BasicKind::ALL {
            let code = self.intern(TypeRepr::Number(kind.scalar()))?;
            map.insert(kind.name(), code);
        }
        Ok(map)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Typecode, &TypeRepr)> {
        self.types
            .iter()
            .enumerate()
            .map(|(i, repr)| (Typecode::new(i as u32), repr))
    }
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("types", &self.types.len())
            .finish()
    }
}
