use std::sync::Arc;

use xapplication::io::MemoryIo;
use xapplication::{
    Application, ApplicationConfig, ApplicationError, ConnectMode, DataIo, MutationOrigin,
    PipelineError, SeedPolicy, Stage,
};

use super::helpers::{
    chain, failing_app, merge_app, noise_app, offset_app, run_log, source_image, Reentrant,
};

#[test]
fn test_upstream_runs_once_in_dependency_order() {
    let chain = chain(ApplicationConfig::default());
    chain.a.execute().unwrap();

    assert_eq!(*chain.log.lock(), vec!["C", "B", "A"]);
    assert!(chain.b.is_execute_done());
    assert!(chain.c.is_execute_done());
    assert_eq!(chain.a.stage(), Stage::Executed);
}

#[test]
fn test_execution_order_lists_root_last() {
    let chain = chain(ApplicationConfig::default());
    let names: Vec<String> = chain
        .a
        .execution_order()
        .unwrap()
        .iter()
        .map(|app| app.name().to_string())
        .collect();
    assert_eq!(names, vec!["C", "B", "A"]);
    assert!(chain.log.lock().is_empty());
}

#[test]
fn test_shared_upstream_runs_once() {
    let io = Arc::new(MemoryIo::new());
    let log = run_log();
    let source = offset_app("S", 0.0, &log, ApplicationConfig::default(), &io);
    source
        .set_parameter_input_image("in", source_image(), MutationOrigin::User)
        .unwrap();
    let left = offset_app("L", 1.0, &log, ApplicationConfig::default(), &io);
    let right = offset_app("R", 2.0, &log, ApplicationConfig::default(), &io);
    left.connect_image("in", &source, "out").unwrap();
    right.connect_image("in", &source, "out").unwrap();

    let merge = merge_app("M", &log, &io);
    merge.connect_image("in", &left, "out").unwrap();
    merge.connect_image("in", &right, "out").unwrap();
    merge.execute().unwrap();

    let log = log.lock().clone();
    assert_eq!(log.iter().filter(|n| n.as_str() == "S").count(), 1);
    assert_eq!(log.first().map(String::as_str), Some("S"));
    assert_eq!(log.last().map(String::as_str), Some("M"));

    // S: [2, 4]; L: [6, 10]; R: [8, 12]
    let sum = merge.get_parameter_output_image("out").unwrap().unwrap();
    assert_eq!(sum.pixels().unwrap(), vec![14.0, 22.0]);
}

#[test]
fn test_already_executed_upstream_is_not_rerun() {
    let chain = chain(ApplicationConfig::default());
    chain.b.execute().unwrap();
    assert_eq!(*chain.log.lock(), vec!["C", "B"]);

    chain.a.execute().unwrap();
    assert_eq!(*chain.log.lock(), vec!["C", "B", "A"]);
}

#[test]
fn test_memory_handoff_shares_the_data_object() {
    let chain = chain(ApplicationConfig::default());
    chain.a.execute().unwrap();

    assert!(!chain.b.is_parameter_enabled("out").unwrap());
    let produced = chain.b.get_parameter_output_image("out").unwrap().unwrap();
    let received = chain.a.get_parameter_image("in").unwrap();
    assert!(Arc::ptr_eq(&produced, &received));

    let out = chain.a.get_parameter_output_image("out").unwrap().unwrap();
    assert_eq!(out.pixels().unwrap(), vec![256.0, 264.0]);
    assert_eq!(chain.a.connection_modes("in").unwrap(), vec![true]);
}

#[test]
fn test_file_handoff_writes_and_reads_the_target_file() {
    let config = ApplicationConfig {
        connect_mode: ConnectMode::File,
        ..ApplicationConfig::default()
    };
    let chain = chain(config);
    chain
        .b
        .set_parameter_string("out", "b.img", MutationOrigin::User)
        .unwrap();
    chain.a.execute().unwrap();

    assert!(chain.b.is_parameter_enabled("out").unwrap());
    assert_eq!(chain.a.get_parameter_string("in").unwrap(), "b.img");
    assert!(chain.io.written_paths().contains(&"b.img".to_string()));
    assert_eq!(chain.io.read_image("b.img").unwrap(), vec![28.0, 32.0]);

    let out = chain.a.get_parameter_output_image("out").unwrap().unwrap();
    assert_eq!(out.pixels().unwrap(), vec![256.0, 264.0]);
}

#[test]
fn test_file_mode_without_target_file_falls_back_to_memory() {
    let config = ApplicationConfig {
        connect_mode: ConnectMode::File,
        ..ApplicationConfig::default()
    };
    let chain = chain(config);
    chain.a.execute().unwrap();

    assert!(!chain.b.is_parameter_enabled("out").unwrap());
    assert!(chain.io.written_paths().is_empty());
}

#[test]
fn test_propagate_connect_mode_reaches_every_connection() {
    let chain = chain(ApplicationConfig::default());
    chain.a.propagate_connect_mode(false).unwrap();
    assert_eq!(chain.a.connection_modes("in").unwrap(), vec![false]);
    assert_eq!(chain.b.connection_modes("in").unwrap(), vec![false]);

    chain.a.propagate_connect_mode(true).unwrap();
    assert_eq!(chain.b.connection_modes("in").unwrap(), vec![true]);
}

#[test]
fn test_connect_image_checks_kinds() {
    let chain = chain(ApplicationConfig::default());
    let err = chain.a.connect_image("in", &chain.b, "in").unwrap_err();
    assert!(matches!(err, ApplicationError::Parameter(_)));
    let err = chain.a.connect_image("out", &chain.b, "out").unwrap_err();
    assert!(matches!(err, ApplicationError::Parameter(_)));
}

#[test]
fn test_missing_mandatory_input_names_the_key() {
    let io = Arc::new(MemoryIo::new());
    let log = run_log();
    let app = offset_app("Resize", 0.0, &log, ApplicationConfig::default(), &io);
    let err = app.execute().unwrap_err();
    assert_eq!(err.missing_keys().to_vec(), vec!["in".to_string()]);
    assert!(log.lock().is_empty());
}

#[test]
fn test_dependency_failure_stops_the_dependent() {
    let io = Arc::new(MemoryIo::new());
    let log = run_log();
    let broken = failing_app("Broken", &log, &io);
    broken
        .set_parameter_input_image("in", source_image(), MutationOrigin::User)
        .unwrap();
    let app = offset_app("A", 1.0, &log, ApplicationConfig::default(), &io);
    app.connect_image("in", &broken, "out").unwrap();

    match app.execute().unwrap_err() {
        ApplicationError::DependencyFailed {
            application,
            dependency,
            source,
        } => {
            assert_eq!(application, "A");
            assert_eq!(dependency, "Broken");
            assert!(matches!(*source, ApplicationError::Hook(_)));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(*log.lock(), vec!["Broken"]);
    assert!(!app.is_execute_done());
}

#[test]
fn test_remaining_dependencies_run_after_a_failure() {
    let io = Arc::new(MemoryIo::new());
    let log = run_log();
    let broken = failing_app("Broken", &log, &io);
    broken
        .set_parameter_input_image("in", source_image(), MutationOrigin::User)
        .unwrap();
    let healthy = offset_app("Healthy", 1.0, &log, ApplicationConfig::default(), &io);
    healthy
        .set_parameter_input_image("in", source_image(), MutationOrigin::User)
        .unwrap();
    let merge = merge_app("M", &log, &io);
    merge.connect_image("in", &broken, "out").unwrap();
    merge.connect_image("in", &healthy, "out").unwrap();

    let err = merge.execute().unwrap_err();
    assert!(matches!(err, ApplicationError::DependencyFailed { .. }));
    assert_eq!(*log.lock(), vec!["Broken", "Healthy"]);
}

#[test]
fn test_connection_cycle_is_rejected() {
    let io = Arc::new(MemoryIo::new());
    let log = run_log();
    let a = offset_app("A", 1.0, &log, ApplicationConfig::default(), &io);
    let b = offset_app("B", 1.0, &log, ApplicationConfig::default(), &io);
    a.connect_image("in", &b, "out").unwrap();
    b.connect_image("in", &a, "out").unwrap();

    match a.execute().unwrap_err() {
        ApplicationError::DependencyCycle(names) => assert_eq!(names, vec!["A", "B"]),
        other => panic!("unexpected error: {other}"),
    }
    assert!(log.lock().is_empty());
    assert!(a.execution_order().is_err());
}

#[test]
fn test_write_output_requires_execution() {
    let chain = chain(ApplicationConfig::default());
    match chain.c.write_output().unwrap_err() {
        ApplicationError::InvalidState { application, stage, .. } => {
            assert_eq!(application, "C");
            assert_eq!(stage, "Initialized");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_execute_and_write_output_writes_files() {
    let chain = chain(ApplicationConfig::default());
    chain
        .a
        .set_parameter_string("out", "a.img", MutationOrigin::User)
        .unwrap();
    chain
        .a
        .set_parameter_output_image_pixel_type("out", xapplication::PixelType::UInt16)
        .unwrap();
    chain.a.execute_and_write_output().unwrap();

    assert_eq!(chain.a.stage(), Stage::OutputsWritten);
    assert_eq!(chain.io.read_image("a.img").unwrap(), vec![256.0, 264.0]);
    assert_eq!(
        chain.io.read_image_info("a.img").unwrap().pixel_type,
        xapplication::PixelType::UInt16
    );
}

#[test]
fn test_update_parameters_resets_execution_flag() {
    let chain = chain(ApplicationConfig::default());
    chain.c.execute().unwrap();
    assert!(chain.c.is_execute_done());
    chain.c.update_parameters().unwrap();
    assert!(!chain.c.is_execute_done());
    assert_eq!(chain.c.stage(), Stage::ParametersUpdated);
}

#[test]
fn test_user_seed_reproduces_random_draws() {
    let (app, draws) = noise_app(ApplicationConfig::default());
    app.set_parameter_int("rand", 42, MutationOrigin::User).unwrap();
    app.execute().unwrap();
    app.execute().unwrap();

    let draws = draws.lock();
    assert_eq!(draws.len(), 2);
    assert_eq!(draws[0], draws[1]);
}

#[test]
fn test_fixed_seed_policy_reproduces_across_applications() {
    let config = ApplicationConfig {
        seed_policy: SeedPolicy::Fixed(7),
        ..ApplicationConfig::default()
    };
    let (first, first_draws) = noise_app(config.clone());
    let (second, second_draws) = noise_app(config);
    first.execute().unwrap();
    second.execute().unwrap();
    assert_eq!(first_draws.lock()[0], second_draws.lock()[0]);

    second.set_parameter_int("rand", 8, MutationOrigin::User).unwrap();
    second.execute().unwrap();
    assert_ne!(first_draws.lock()[0], second_draws.lock()[1]);
}

#[test]
fn test_abort_stops_the_registered_process() {
    let chain = chain(ApplicationConfig::default());
    assert!(!chain.c.abort_current_process());
    assert_eq!(chain.c.progress(), None);

    chain
        .c
        .set_parameter_string("out", "c.img", MutationOrigin::User)
        .unwrap();
    chain.c.execute().unwrap();
    assert_eq!(chain.c.progress(), Some(0.0));
    assert!(chain.c.abort_current_process());

    match chain.c.write_output().unwrap_err() {
        ApplicationError::Pipeline(PipelineError::Aborted(name)) => assert_eq!(name, "C-double"),
        other => panic!("unexpected error: {other}"),
    }
    assert!(chain.io.written_paths().is_empty());
}

#[test]
fn test_progress_reaches_completion() {
    let chain = chain(ApplicationConfig::default());
    chain
        .c
        .set_parameter_string("out", "c.img", MutationOrigin::User)
        .unwrap();
    chain.c.execute_and_write_output().unwrap();
    assert_eq!(chain.c.progress(), Some(1.0));
}

#[test]
fn test_lifecycle_call_from_own_hook_is_rejected() {
    let app = Application::builder("Reentrant", Reentrant)
        .io(Arc::new(MemoryIo::new()))
        .build();
    app.set_parameter_int("radius", 2, MutationOrigin::User).unwrap();

    let err = app.execute().unwrap_err();
    assert!(matches!(
        err,
        ApplicationError::InvalidState { operation: "update parameters", .. }
    ));
    assert_ne!(app.stage(), Stage::Executed);

    // The hooks are free again once the failing call returns.
    app.update_parameters().unwrap();
    assert_eq!(app.stage(), Stage::ParametersUpdated);
}
