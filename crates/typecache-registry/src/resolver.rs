//! A structural resolver backed by a [`TypeRegistry`].

use typecache_core::{
    BasicKind, DType, Resolver, ScalarKind, ScopedBuffer, Typecode, TypeofError, TypeofResult,
    ValueShape,
};

use crate::{TypeRegistry, TypeRepr};

/// Scalar kind of the platform's pointer-sized integer.
pub const INTP: ScalarKind = if cfg!(target_pointer_width = "32") {
    ScalarKind::Int32
} else {
    ScalarKind::Int64
};

/// Resolves values by computing their [`TypeRepr`] and interning it.
///
/// Types are owned by the registry, which never drops them: every code this
/// resolver returns stays pinned for as long as the resolver lives.
/// Host integers, floats and complex numbers resolve to the same types as
/// element-scalars of `intp`, `float64` and `complex128`.
#[derive(Debug, Default)]
pub struct RegistryResolver {
    registry: TypeRegistry,
    resolutions: usize,
}

impl RegistryResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_registry(registry: TypeRegistry) -> Self {
        Self {
            registry,
            resolutions: 0,
        }
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut TypeRegistry {
        &mut self.registry
    }

    /// Number of top-level `resolve` calls served so far.
    pub fn resolutions(&self) -> usize {
        self.resolutions
    }

    /// Compute the type of a value without counting a resolution.
    pub fn typeof_value(&mut self, value: &ValueShape<'_>) -> TypeofResult<Typecode> {
        let repr = match value {
            ValueShape::None => TypeRepr::None,
            ValueShape::Bool => TypeRepr::Boolean,
            ValueShape::Int => TypeRepr::Number(INTP),
            ValueShape::Float => TypeRepr::Number(BasicKind::Float64.scalar()),
            ValueShape::Complex => TypeRepr::Number(BasicKind::Complex128.scalar()),
            ValueShape::Bytes => TypeRepr::Bytes,
            ValueShape::ByteArray => TypeRepr::ByteArray,
            ValueShape::Tuple(items) => {
                let mut codes = Vec::with_capacity(items.len());
                for item in items {
                    codes.push(self.typeof_value(item)?);
                }
                TypeRepr::Tuple(codes)
            }
            ValueShape::Scalar(DType::Scalar(ScalarKind::Bool)) => TypeRepr::Boolean,
            ValueShape::Scalar(DType::Scalar(kind)) => TypeRepr::Number(*kind),
            ValueShape::Scalar(dtype) => TypeRepr::Element(*dtype),
            ValueShape::Array(array) => TypeRepr::Array {
                dtype: array.dtype,
                ndim: array.ndim,
                layout: array.layout(),
                readonly: !array.writable,
            },
            ValueShape::Buffer(exporter) => {
                let view = ScopedBuffer::acquire(*exporter)
                    .map_err(|err| TypeofError::resolve(err.to_string()))?;
                let info = view.info();
                TypeRepr::Buffer {
                    ndim: info.ndim,
                    layout: view.layout(),
                    readonly: info.readonly,
                    format: info.format.clone(),
                    runtime_type: exporter.runtime_type(),
                }
            }
            ValueShape::DType(dtype) => TypeRepr::DType(*dtype),
            ValueShape::Opaque(id) => TypeRepr::Opaque(*id),
        };
        self.registry.intern(repr)
    }
}

impl Resolver for RegistryResolver {
    fn resolve(&mut self, value: &ValueShape<'_>) -> TypeofResult<Typecode> {
        self.resolutions += 1;
        self.typeof_value(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use typecache_core::{ArrayShape, Contiguity, Identity, Layout, TimeMeta, TimeUnit};

    #[test]
    fn host_numbers_match_element_scalars() {
        let mut resolver = RegistryResolver::new();
        let int = resolver.resolve(&ValueShape::Int).unwrap();
        let intp = resolver.resolve(&ValueShape::Scalar(INTP.into())).unwrap();
        assert_eq!(int, intp);

        let float = resolver.resolve(&ValueShape::Float).unwrap();
        let f64_scalar = resolver
            .resolve(&ValueShape::Scalar(ScalarKind::Float64.into()))
            .unwrap();
        assert_eq!(float, f64_scalar);

        let boolean = resolver.resolve(&ValueShape::Bool).unwrap();
        let bool_scalar = resolver
            .resolve(&ValueShape::Scalar(ScalarKind::Bool.into()))
            .unwrap();
        assert_eq!(boolean, bool_scalar);
        assert_eq!(resolver.resolutions(), 6);
    }

    #[test]
    fn tuples_intern_their_elements() {
        let mut resolver = RegistryResolver::new();
        let value = ValueShape::Tuple(vec![ValueShape::Int, ValueShape::None]);
        let code = resolver.resolve(&value).unwrap();
        let registry = resolver.registry();
        let int = registry.code_of(&TypeRepr::Number(INTP)).unwrap();
        let none = registry.code_of(&TypeRepr::None).unwrap();
        assert_eq!(registry.get(code), Some(&TypeRepr::Tuple(vec![int, none])));
        assert_eq!(resolver.resolutions(), 1);
    }

    #[test]
    fn resolves_into_a_prepopulated_registry() {
        let registry = TypeRegistry::with_basic_types().unwrap();
        let mut resolver = RegistryResolver::with_registry(registry);
        let float = resolver.resolve(&ValueShape::Float).unwrap();
        assert_eq!(float.as_usize(), BasicKind::Float64.index());
        assert_eq!(resolver.registry().len(), 12);

        resolver.resolve(&ValueShape::Bytes).unwrap();
        assert_eq!(resolver.registry().len(), 13);
    }

    #[test]
    fn arrays_carry_layout_and_access() {
        let mut resolver = RegistryResolver::new();
        let array = ArrayShape::new(3, Contiguity::C | Contiguity::F, ScalarKind::Uint8);
        let rw = resolver.resolve(&array.into()).unwrap();
        let ro = resolver.resolve(&array.readonly().into()).unwrap();
        assert_ne!(rw, ro);
        match resolver.registry().get(rw) {
            Some(TypeRepr::Array { layout, ndim, .. }) => {
                assert_eq!(*layout, Layout::C);
                assert_eq!(*ndim, 3);
            }
            other => panic!("expected array, got {:?}", other),
        }
    }

    #[test]
    fn non_numeric_scalars_and_opaque_values() {
        let mut resolver = RegistryResolver::new();
        let meta = TimeMeta::new(TimeUnit::Second, 1);
        let datetime = ValueShape::Scalar(DType::Datetime(meta));
        let dt = resolver.resolve(&datetime).unwrap();
        assert_eq!(
            resolver.registry().get(dt),
            Some(&TypeRepr::Element(DType::Datetime(meta)))
        );

        let id = Identity::from_raw(0x42);
        let opaque = resolver.resolve(&ValueShape::Opaque(id)).unwrap();
        assert_eq!(resolver.registry().get(opaque), Some(&TypeRepr::Opaque(id)));
    }

    #[test]
    fn intp_matches_pointer_width() {
        assert_eq!(
            INTP,
            if std::mem::size_of::<usize>() == 4 {
                ScalarKind::Int32
            } else {
                ScalarKind::Int64
            }
        );
    }
}
