use xapplication::{
    ApplicationConfig, ApplicationError, MutationOrigin, ParameterError, ParameterType,
};

use super::helpers::{app_with, declare_sizes};

#[test]
fn test_proxy_forwards_writes_and_reads() {
    let inner = app_with("Inner", ApplicationConfig::default(), declare_sizes);
    let outer = app_with("Outer", ApplicationConfig::default(), declare_sizes);
    outer.install_proxy("radius", &inner, "radius").unwrap();

    outer.set_parameter_int("radius", 5, MutationOrigin::User).unwrap();
    assert_eq!(inner.get_parameter_int("radius").unwrap(), 5);
    assert!(inner.has_user_value("radius").unwrap());

    inner.set_parameter_int("radius", 9, MutationOrigin::User).unwrap();
    assert_eq!(outer.get_parameter_int("radius").unwrap(), 9);
    assert_eq!(outer.get_parameter_type("radius").unwrap(), ParameterType::Int);
}

#[test]
fn test_proxy_is_visible_without_following() {
    let inner = app_with("Inner", ApplicationConfig::default(), declare_sizes);
    let outer = app_with("Outer", ApplicationConfig::default(), declare_sizes);
    outer.install_proxy("radius", &inner, "radius").unwrap();

    let raw = outer.get_parameter_by_key("radius", false).unwrap();
    assert_eq!(raw.kind(), ParameterType::Proxy);
    let followed = outer.get_parameter_by_key("radius", true).unwrap();
    assert_eq!(followed, inner.get_parameter_by_key("radius", true).unwrap());
}

#[test]
fn test_proxy_to_group_resolves_nested_paths() {
    let inner = app_with("Inner", ApplicationConfig::default(), declare_sizes);
    let outer = app_with("Outer", ApplicationConfig::default(), declare_sizes);
    outer.install_proxy("opts", &inner, "opts").unwrap();

    outer.set_parameter_int("opts.size", 12, MutationOrigin::User).unwrap();
    assert_eq!(inner.get_parameter_int("opts.size").unwrap(), 12);
}

#[test]
fn test_missing_parameters_follow_proxies() {
    let inner = app_with("Inner", ApplicationConfig::default(), declare_sizes);
    let outer = app_with("Outer", ApplicationConfig::default(), |app| {
        app.add_parameter(ParameterType::Int, "radius", "Radius")
    });
    outer.install_proxy("radius", &inner, "radius").unwrap();
    assert_eq!(outer.missing_parameters().unwrap(), vec!["radius".to_string()]);

    inner.set_parameter_int("radius", 1, MutationOrigin::User).unwrap();
    assert!(outer.is_application_ready().unwrap());
}

#[test]
fn test_proxy_to_dropped_application_dangles() {
    let outer = app_with("Outer", ApplicationConfig::default(), declare_sizes);
    {
        let inner = app_with("Inner", ApplicationConfig::default(), declare_sizes);
        outer.install_proxy("radius", &inner, "radius").unwrap();
    }
    let err = outer.get_parameter_int("radius").unwrap_err();
    assert!(matches!(
        err,
        ApplicationError::Parameter(ParameterError::DanglingProxy(_))
    ));
}

#[test]
fn test_proxy_cycle_is_detected() {
    let a = app_with("A", ApplicationConfig::default(), declare_sizes);
    let b = app_with("B", ApplicationConfig::default(), declare_sizes);
    a.install_proxy("radius", &b, "radius").unwrap();
    b.install_proxy("radius", &a, "radius").unwrap();

    let err = a.get_parameter_int("radius").unwrap_err();
    assert!(matches!(
        err,
        ApplicationError::Parameter(ParameterError::ProxyCycle(_))
    ));
}

#[test]
fn test_install_proxy_requires_existing_target() {
    let inner = app_with("Inner", ApplicationConfig::default(), declare_sizes);
    let outer = app_with("Outer", ApplicationConfig::default(), declare_sizes);
    assert!(outer.install_proxy("radius", &inner, "nope").is_err());
    assert_eq!(outer.get_parameter_type("radius").unwrap(), ParameterType::Int);
}
