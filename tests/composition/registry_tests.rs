use std::sync::Arc;

use xapplication::io::MemoryIo;
use xapplication::{
    ApplicationConfig, ApplicationError, ApplicationRegistry, DataIo, MutationOrigin, Stage,
};

use super::helpers::{run_log, source_image, Offset, Settings};

fn registry(io: Arc<MemoryIo>) -> ApplicationRegistry {
    let log = run_log();
    let mut registry = ApplicationRegistry::new(ApplicationConfig::default()).with_io(io);
    registry.register("Settings", "Scalar settings", || Settings);
    registry.register("Offset", "Shift then double", move || Offset {
        offset: 1.0,
        log: log.clone(),
        fail: false,
    });
    registry
}

#[test]
fn test_available_names_are_sorted() {
    let registry = registry(Arc::new(MemoryIo::new()));
    assert_eq!(registry.available(), vec!["Offset", "Settings"]);
    assert_eq!(registry.description("Offset"), Some("Shift then double"));
    assert_eq!(registry.description("Missing"), None);
}

#[test]
fn test_create_returns_initialized_instances() {
    let registry = registry(Arc::new(MemoryIo::new()));
    let first = registry.create("Offset").unwrap();
    let second = registry.create("Offset").unwrap();
    assert_eq!(first.stage(), Stage::Initialized);
    assert_eq!(first.name(), "Offset");
    assert_eq!(first.description(), "Shift then double");
    assert!(!first.same_as(&second));
    assert_ne!(first.id(), second.id());
}

#[test]
fn test_create_unknown_application_fails() {
    let registry = registry(Arc::new(MemoryIo::new()));
    assert!(matches!(
        registry.create("Nope").unwrap_err(),
        ApplicationError::UnknownApplication(name) if name == "Nope"
    ));
}

#[test]
fn test_created_applications_share_the_registry_io() {
    let io = Arc::new(MemoryIo::new());
    let registry = registry(io.clone());
    let upstream = registry.create("Offset").unwrap();
    let downstream = registry.create("Offset").unwrap();
    upstream
        .set_parameter_input_image("in", source_image(), MutationOrigin::User)
        .unwrap();
    downstream.connect_image("in", &upstream, "out").unwrap();
    downstream
        .set_parameter_string("out", "result.img", MutationOrigin::User)
        .unwrap();
    downstream.execute_and_write_output().unwrap();

    // (1 + 1) * 2 = 4, (4 + 1) * 2 = 10; (2 + 1) * 2 = 6, (6 + 1) * 2 = 14
    assert_eq!(io.read_image("result.img").unwrap(), vec![10.0, 14.0]);
}
