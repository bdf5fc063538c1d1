use ferrous_ioc::{Container, ContainerConfig, DiError, TypeDescriptor, TypeRegistry};
use std::sync::Arc;

#[test]
fn test_remove_keeps_cached_singleton_by_default() {
    let c = Container::new();
    c.singleton_factory("foo", |_, _| Ok(1u8));
    let before = c.get::<u8>("foo").unwrap();

    assert!(c.remove("foo"));
    assert!(!c.is_bound("foo"));
    assert!(c.has_instance("foo"));

    // Cached value still served after the binding is gone
    let after = c.get::<u8>("foo").unwrap();
    assert!(Arc::ptr_eq(&before, &after));
}

#[test]
fn test_rebinding_does_not_replace_cached_singleton() {
    let c = Container::new();
    c.singleton_factory("foo", |_, _| Ok(1u8));
    c.get::<u8>("foo").unwrap();

    c.singleton_factory("foo", |_, _| Ok(2u8));
    assert_eq!(*c.get::<u8>("foo").unwrap(), 1);

    assert!(c.forget_instance("foo"));
    assert_eq!(*c.get::<u8>("foo").unwrap(), 2);
}

#[test]
fn test_remove_evicts_when_configured() {
    let config = ContainerConfig::default().evict_singleton_on_remove(true);
    let c = Container::with_config(config).unwrap();
    c.singleton_factory("foo", |_, _| Ok(1u8));
    c.get::<u8>("foo").unwrap();

    assert!(c.remove("foo"));
    assert!(!c.has_instance("foo"));
    assert!(matches!(c.resolve("foo", &[]), Err(DiError::NotFound(_))));
}

#[test]
fn test_remove_evicts_instances_when_configured() {
    let config = ContainerConfig::default().evict_singleton_on_remove(true);
    let c = Container::with_config(config).unwrap();
    c.instance_value("foo", 1u8);

    // No binding existed, but the instance is still dropped
    assert!(!c.remove("foo"));
    assert!(!c.has_instance("foo"));
}

#[test]
fn test_forget_instance() {
    let mut types = TypeRegistry::new();
    types.register(TypeDescriptor::new("Clock", |_| Ok(std::time::Instant::now())));
    let c = Container::with_types(types);
    c.singleton("Clock", None);

    let first = c.get::<std::time::Instant>("Clock").unwrap();
    assert!(c.forget_instance("Clock"));
    assert!(!c.forget_instance("Clock"));
    let second = c.get::<std::time::Instant>("Clock").unwrap();

    assert!(!Arc::ptr_eq(&first, &second));
    assert!(c.is_bound("Clock"));
}

#[test]
fn test_is_bound_ignores_instances() {
    let c = Container::new();
    c.instance_value("foo", 1u8);
    c.bind_value("bar", 2u8);

    assert!(!c.is_bound("foo"));
    assert!(c.is_bound("bar"));
    assert!(c.has_instance("foo"));
    assert!(!c.has_instance("bar"));
}

#[test]
fn test_default_config() {
    let config = ContainerConfig::default();
    assert_eq!(config.max_depth, 1024);
    assert!(!config.evict_singleton_on_remove);
    assert!(config.validate().is_ok());
}

#[test]
fn test_zero_depth_is_invalid() {
    let err = ContainerConfig::default().max_depth(0).validate().unwrap_err();
    assert!(matches!(err, DiError::Config(_)));
}

#[test]
fn test_invalid_config_is_rejected_at_construction() {
    let result = Container::with_config(ContainerConfig::default().max_depth(0));
    assert!(matches!(result, Err(DiError::Config(_))));

    let result = Container::builder().config(ContainerConfig::default().max_depth(0)).build();
    assert!(matches!(result, Err(DiError::Config(_))));
}

#[test]
fn test_container_uses_config() {
    let c = Container::builder().config(ContainerConfig::default().max_depth(2)).build().unwrap();
    c.bind("a", Some("b"), false);
    c.bind("b", Some("c"), false);
    c.bind_factory("c", |_, _| Ok(()), false);

    assert_eq!(c.config().max_depth, 2);
    assert!(matches!(c.resolve("a", &[]), Err(DiError::DepthExceeded(2))));
    assert!(c.resolve("b", &[]).is_ok());
}

#[cfg(feature = "config")]
#[test]
fn test_config_from_json() {
    let config = ContainerConfig::from_json_str(
        r#"{ "max_depth": 32, "evict_singleton_on_remove": true }"#,
    )
    .unwrap();
    assert_eq!(config, ContainerConfig::default().max_depth(32).evict_singleton_on_remove(true));
}
