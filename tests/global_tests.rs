//! Tests for the process-wide dispatcher.
//!
//! The dispatcher can only be initialized once per process, so everything
//! touching it lives in this single test.

use typecache::{
    ArrayShape, BasicKind, Contiguity, RegistryResolver, TypeofError, ValueShape, dispatcher,
    typeof_init, typeof_typecode,
};

#[test]
fn test_global_dispatcher_lifecycle() {
    let mut resolver = RegistryResolver::new();

    assert_eq!(
        typeof_typecode(&mut resolver, &ValueShape::Int),
        Err(TypeofError::NotInitialized)
    );

    let mut incomplete = resolver.registry_mut().basic_typecodes_map().unwrap();
    incomplete.remove("complex64");
    assert_eq!(
        typeof_init(&incomplete).unwrap_err(),
        TypeofError::MissingBasicType { name: "complex64" }
    );
    assert!(dispatcher().is_err());

    let names = resolver.registry_mut().basic_typecodes_map().unwrap();
    let global = typeof_init(&names).unwrap();
    assert_eq!(
        typeof_init(&names).unwrap_err(),
        TypeofError::AlreadyInitialized
    );

    let shape = ArrayShape::new(1, Contiguity::C, BasicKind::Float64);
    let a = typeof_typecode(&mut resolver, &shape.into()).unwrap();
    let b = typeof_typecode(&mut resolver, &shape.into()).unwrap();
    assert_eq!(a, b);
    assert_eq!(resolver.resolutions(), 1);
    assert_eq!(global.array_table().populated(), 1);

    let int = typeof_typecode(&mut resolver, &ValueShape::Int).unwrap();
    assert_eq!(int, global.basic_typecodes().intp());
}
