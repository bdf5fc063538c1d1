use ferrous_ioc::{
    Container, ContainerConfig, DiError, Key, ParameterDescriptor, TypeDescriptor, TypeRegistry,
};

/// Helper: assert that `result` is a circular dependency error carrying `expected_path`.
fn assert_circular<T>(result: Result<T, DiError>, expected_path: &[&str]) {
    match result {
        Err(DiError::Circular(path)) => {
            let names: Vec<&str> = path.iter().map(Key::as_str).collect();
            assert_eq!(names, expected_path, "wrong circular path");
        }
        Err(other) => panic!("Expected Circular error, got {:?}", other),
        Ok(_) => panic!("Expected Circular error, resolution succeeded"),
    }
}

#[test]
fn test_self_alias() {
    let c = Container::new();
    // "a" -> "A" -> "a": a concrete equal to the id would be a self binding
    c.bind("a", Some("A"), false);
    c.bind("A", Some("a"), false);

    assert_circular(c.resolve("a", &[]), &["a", "A", "a"]);
}

#[test]
fn test_two_level_alias_cycle() {
    let c = Container::new();
    c.bind("a", Some("b"), false);
    c.bind("b", Some("a"), false);

    assert_circular(c.resolve("a", &[]), &["a", "b", "a"]);
    assert_circular(c.resolve("b", &[]), &["b", "a", "b"]);
}

#[test]
fn test_self_factory_cycle() {
    let c = Container::new();
    c.bind_factory("a", |ctx, _| ctx.resolve("a", &[]).map(|_| ()), false);

    assert_circular(c.resolve("a", &[]), &["a", "a"]);
}

#[test]
fn test_three_level_factory_cycle() {
    let c = Container::new();
    c.bind_factory("a", |ctx, _| ctx.resolve("b", &[]).map(|_| ()), false);
    c.bind_factory("b", |ctx, _| ctx.resolve("c", &[]).map(|_| ()), false);
    c.bind_factory("c", |ctx, _| ctx.resolve("a", &[]).map(|_| ()), false);

    assert_circular(c.resolve("a", &[]), &["a", "b", "c", "a"]);
}

#[test]
fn test_constructor_cycle() {
    let mut types = TypeRegistry::new();
    types.register(
        TypeDescriptor::new("A", |args| args.get::<()>(0).map(|_| ()))
            .param(ParameterDescriptor::typed("b", "B")),
    );
    types.register(
        TypeDescriptor::new("B", |args| args.get::<()>(0).map(|_| ()))
            .param(ParameterDescriptor::typed("a", "A")),
    );
    let c = Container::with_types(types);

    assert_circular(c.resolve("A", &[]), &["A", "B", "A"]);
}

#[test]
fn test_cycle_is_not_recovered_by_default() {
    let mut types = TypeRegistry::new();
    types.register(
        TypeDescriptor::new("A", |args| args.optional::<()>(0).map(|_| ()))
            .param(ParameterDescriptor::typed("b", "B").with_null_default()),
    );
    types.register(
        TypeDescriptor::new("B", |args| args.get::<()>(0).map(|_| ()))
            .param(ParameterDescriptor::typed("a", "A")),
    );
    let c = Container::with_types(types);

    assert_circular(c.resolve("A", &[]), &["A", "B", "A"]);
}

#[test]
fn test_singleton_cycle_leaves_no_cache() {
    let c = Container::new();
    c.singleton_factory("a", |ctx, _| ctx.resolve("b", &[]).map(|_| ()));
    c.singleton_factory("b", |ctx, _| ctx.resolve("a", &[]).map(|_| ()));

    assert_circular(c.resolve("a", &[]), &["a", "b", "a"]);
    assert!(!c.has_instance("a"));
    assert!(!c.has_instance("b"));
}

#[test]
fn test_singleton_reentry_through_container() {
    let c = Container::new();
    c.singleton_factory("a", |ctx, _| ctx.container().resolve("a", &[]).map(|_| ()));

    assert_circular(c.resolve("a", &[]), &["a", "a"]);
    assert!(!c.has_instance("a"));
}

#[test]
fn test_transient_reentry_through_container() {
    let c = Container::new();
    c.bind_factory("a", |ctx, _| ctx.container().resolve("b", &[]).map(|_| ()), false);
    c.bind_factory("b", |ctx, _| ctx.get::<()>("a"), false);

    assert_circular(c.resolve("a", &[]), &["a", "b", "a"]);
}

#[test]
fn test_other_container_is_not_a_cycle() {
    let other = Container::new();
    other.bind_factory("a", |_, _| Ok(1u8), false);

    let c = Container::new();
    c.bind_factory("a", move |_, _| other.get::<u8>("a").map(|v| *v), false);

    assert_eq!(*c.get::<u8>("a").unwrap(), 1);
}

#[test]
fn test_path_resets_between_resolutions() {
    let c = Container::new();
    c.bind_factory("leaf", |_, _| Ok(()), false);
    c.bind_factory(
        "pair",
        |ctx, _| {
            // The same id twice in sequence is not a cycle
            ctx.resolve("leaf", &[])?;
            ctx.resolve("leaf", &[])?;
            Ok(ctx.depth())
        },
        false,
    );

    assert_eq!(*c.get::<usize>("pair").unwrap(), 1);
    assert_eq!(*c.get::<usize>("pair").unwrap(), 1);
}

#[test]
fn test_context_exposes_path() {
    let c = Container::new();
    c.bind("outer", Some("inner"), false);
    c.bind_factory("inner", |ctx, _| Ok(ctx.path()), false);

    let path = c.get::<Vec<Key>>("outer").unwrap();
    assert_eq!(*path, [Key::from("outer"), Key::from("inner")]);
}

#[test]
fn test_depth_exceeded() {
    let c = Container::with_config(ContainerConfig::default().max_depth(8)).unwrap();
    for i in 0..20 {
        c.bind(format!("id{}", i), Some(format!("id{}", i + 1).as_str()), false);
    }
    c.bind_factory("id20", |_, _| Ok(()), false);

    let err = c.resolve("id0", &[]).unwrap_err();
    assert!(matches!(err, DiError::DepthExceeded(8)));
    assert!(!err.is_resolve_error());
}

#[test]
fn test_circular_error_message() {
    let c = Container::new();
    c.bind("a", Some("b"), false);
    c.bind("b", Some("a"), false);

    let err = c.resolve("a", &[]).unwrap_err();
    assert_eq!(err.to_string(), "Circular dependency: a -> b -> a");
}
