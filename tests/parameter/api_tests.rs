use std::sync::atomic::Ordering;
use std::sync::Arc;

use xapplication::io::MemoryIo;
use xapplication::parameter::Parameter;
use xapplication::{
    Application, ApplicationConfig, ApplicationError, MutationOrigin, ParameterError,
    ParameterType, Role, Stage, UserLevel,
};

use super::helpers::{app_with, declare_resize, resize_app, DeclareOnly};

#[test]
fn test_resize_reports_missing_input_only() {
    let app = resize_app();
    assert_eq!(app.get_parameter_type("out").unwrap(), ParameterType::OutputImage);
    assert_eq!(app.get_parameter_role("out").unwrap(), Role::Output);
    assert_eq!(app.missing_parameters().unwrap(), vec!["in".to_string()]);
    assert!(!app.is_application_ready().unwrap());

    let image = xapplication::DataObject::image(xapplication::ImageInfo::new(1, 1, 1), vec![0.0]);
    app.set_parameter_input_image("in", image, MutationOrigin::User).unwrap();
    assert!(app.is_application_ready().unwrap());
}

#[test]
fn test_init_runs_once_and_lazily() {
    let hooks = DeclareOnly::new(declare_resize);
    let calls = hooks.init_calls.clone();
    let app = Application::builder("Resize", hooks)
        .io(Arc::new(MemoryIo::new()))
        .build();
    assert_eq!(app.stage(), Stage::Uninitialized);
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    app.get_parameter_type("in").unwrap();
    app.get_parameters_keys(true).unwrap();
    app.init().unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(app.stage(), Stage::Initialized);
}

#[test]
fn test_parameter_keys_in_declaration_order() {
    let app = resize_app();
    assert_eq!(
        app.get_parameters_keys(false).unwrap(),
        vec!["in", "out", "mode", "interp", "rand"]
    );
    assert_eq!(
        app.get_parameters_keys(true).unwrap(),
        vec![
            "in",
            "out",
            "mode",
            "mode.fit.size",
            "mode.crop.x",
            "interp",
            "rand"
        ]
    );
}

#[test]
fn test_unknown_key_is_rejected() {
    let app = resize_app();
    let err = app.get_parameter_int("mode.fit.missing").unwrap_err();
    assert!(matches!(
        err,
        ApplicationError::Parameter(ParameterError::UnknownKey(_))
    ));
    assert!(app.add_parameter(ParameterType::Int, "nope.x", "X").is_err());
}

#[test]
fn test_duplicate_key_is_rejected() {
    let app = resize_app();
    let err = app.add_parameter(ParameterType::Float, "in", "Again").unwrap_err();
    assert!(matches!(
        err,
        ApplicationError::Parameter(ParameterError::DuplicateKey(_))
    ));
}

#[test]
fn test_choice_selection_controls_missing() {
    let app = resize_app();
    assert_eq!(app.get_parameter_string("mode").unwrap(), "fit");
    assert!(!app.is_parameter_missing("mode.crop.x").unwrap());
    assert!(!app.is_parameter_missing("mode.fit.size").unwrap());

    app.set_parameter_string("mode", "crop", MutationOrigin::User).unwrap();
    assert!(app.is_parameter_missing("mode.crop.x").unwrap());
    assert!(app.missing_parameters().unwrap().contains(&"mode.crop.x".to_string()));

    app.set_parameter_int("mode.crop.x", 4, MutationOrigin::User).unwrap();
    assert!(!app.is_parameter_missing("mode.crop.x").unwrap());

    app.clear_value("mode.crop.x").unwrap();
    app.set_parameter_string("mode", "fit", MutationOrigin::User).unwrap();
    assert!(!app.is_parameter_missing("mode.crop.x").unwrap());
}

#[test]
fn test_choice_accepts_qualified_branch_key() {
    let app = resize_app();
    app.set_parameter_string("mode", "mode.crop", MutationOrigin::User).unwrap();
    assert_eq!(app.get_parameter_string("mode").unwrap(), "crop");
    assert_eq!(app.get_parameter_int("mode").unwrap(), 1);
    assert_eq!(app.get_parameter_as_string("mode").unwrap(), "crop");

    app.set_parameter_int("mode", 0, MutationOrigin::User).unwrap();
    assert_eq!(app.get_parameter_string("mode").unwrap(), "fit");
}

#[test]
fn test_unknown_choice_is_rejected() {
    let app = resize_app();
    let err = app
        .set_parameter_string("mode", "stretch", MutationOrigin::User)
        .unwrap_err();
    assert!(matches!(
        err,
        ApplicationError::Parameter(ParameterError::UnknownChoice { .. })
    ));
    assert_eq!(app.get_parameter_string("mode").unwrap(), "fit");
}

#[test]
fn test_choice_keys_and_names() {
    let app = resize_app();
    assert_eq!(app.get_choice_keys("mode").unwrap(), vec!["fit", "crop"]);
    assert_eq!(app.get_choice_names("mode").unwrap(), vec!["Fit to size", "Crop"]);
    assert_eq!(app.get_choice_keys("interp").unwrap(), vec!["nn", "linear"]);
    assert!(app.get_choice_keys("in").is_err());
}

#[test]
fn test_list_view_selection() {
    let app = resize_app();
    assert!(!app.has_value("interp").unwrap());
    app.set_parameter_string_list(
        "interp",
        &["linear".to_string(), "nn".to_string()],
        MutationOrigin::User,
    )
    .unwrap();
    assert_eq!(
        app.get_parameter_string_list("interp").unwrap(),
        vec!["linear", "nn"]
    );
    assert_eq!(app.get_parameter_int("interp").unwrap(), 1);

    let err = app
        .set_parameter_string_list("interp", &["cubic".to_string()], MutationOrigin::User)
        .unwrap_err();
    assert!(matches!(
        err,
        ApplicationError::Parameter(ParameterError::UnknownChoice { .. })
    ));
}

#[test]
fn test_numeric_bounds_and_defaults() {
    let app = resize_app();
    assert_eq!(app.get_parameter_int("mode.fit.size").unwrap(), 100);
    app.set_minimum_parameter_int("mode.fit.size", 1).unwrap();
    app.set_maximum_parameter_int("mode.fit.size", 500).unwrap();

    let err = app
        .set_parameter_int("mode.fit.size", 501, MutationOrigin::User)
        .unwrap_err();
    assert!(matches!(
        err,
        ApplicationError::Parameter(ParameterError::InvalidValue { .. })
    ));
    assert_eq!(app.get_parameter_int("mode.fit.size").unwrap(), 100);

    app.set_parameter_string("mode.fit.size", " 64 ", MutationOrigin::User)
        .unwrap();
    assert_eq!(app.get_parameter_int("mode.fit.size").unwrap(), 64);
    assert!(app
        .set_parameter_string("mode.fit.size", "abc", MutationOrigin::User)
        .is_err());
}

#[test]
fn test_type_mismatch_on_wrong_accessor() {
    let app = resize_app();
    let err = app.get_parameter_float("in").unwrap_err();
    match err {
        ApplicationError::Parameter(ParameterError::TypeMismatch { key, actual, .. }) => {
            assert_eq!(key, "in");
            assert_eq!(actual, ParameterType::InputImage);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_origin_controls_user_value_flag() {
    let app = resize_app();
    app.set_parameter_int("mode.crop.x", 3, MutationOrigin::Application)
        .unwrap();
    assert!(app.has_value("mode.crop.x").unwrap());
    assert!(!app.has_user_value("mode.crop.x").unwrap());

    app.set_parameter_int("mode.crop.x", 5, MutationOrigin::User).unwrap();
    assert!(app.has_user_value("mode.crop.x").unwrap());

    app.clear_value("mode.crop.x").unwrap();
    assert!(!app.has_value("mode.crop.x").unwrap());
    assert!(!app.has_user_value("mode.crop.x").unwrap());
}

#[test]
fn test_setting_a_value_enables_parameter() {
    let app = resize_app();
    app.disable_parameter("rand").unwrap();
    assert!(!app.is_parameter_enabled("rand").unwrap());
    app.set_parameter_int("rand", 7, MutationOrigin::Application).unwrap();
    assert!(app.is_parameter_enabled("rand").unwrap());
}

#[test]
fn test_flag_toggles() {
    let app = resize_app();
    assert!(app.is_mandatory("in").unwrap());
    app.mandatory_off("in").unwrap();
    assert!(!app.is_mandatory("in").unwrap());
    assert!(app.missing_parameters().unwrap().is_empty());
    app.mandatory_on("in").unwrap();
    assert_eq!(app.missing_parameters().unwrap(), vec!["in".to_string()]);

    assert!(!app.has_automatic_value("mode.fit.size").unwrap());
    app.automatic_value_on("mode.fit.size").unwrap();
    assert!(app.has_automatic_value("mode.fit.size").unwrap());
    app.automatic_value_off("mode.fit.size").unwrap();
    assert!(!app.has_automatic_value("mode.fit.size").unwrap());

    app.set_parameter_user_value("mode.fit.size", true).unwrap();
    assert!(app.has_user_value("mode.fit.size").unwrap());

    app.set_parameter_role("out", Role::Input).unwrap();
    assert_eq!(app.get_parameter_role("out").unwrap(), Role::Input);
}

#[test]
fn test_descriptive_metadata() {
    let app = resize_app();
    assert_eq!(app.get_parameter_name("mode").unwrap(), "Resize mode");
    app.set_parameter_description("in", "Image to resample").unwrap();
    assert_eq!(app.get_parameter_description("in").unwrap(), "Image to resample");

    assert_eq!(app.get_parameter_user_level("rand").unwrap(), UserLevel::Advanced);
    app.set_parameter_user_level("in", UserLevel::Advanced).unwrap();
    assert_eq!(app.get_parameter_user_level("in").unwrap(), UserLevel::Advanced);
    assert!(!app.is_mandatory("rand").unwrap());
}

#[test]
fn test_ram_parameter_uses_configured_default() {
    let config = ApplicationConfig {
        default_ram_mb: 512,
        ..ApplicationConfig::default()
    };
    let app = app_with("Stats", config, |app| app.add_ram_parameter());
    assert_eq!(app.get_parameter_type("ram").unwrap(), ParameterType::Ram);
    assert_eq!(app.get_parameter_int("ram").unwrap(), 512);
    assert!(!app.is_mandatory("ram").unwrap());
}

#[test]
fn test_parameter_documents_declared_when_configured() {
    let config = ApplicationConfig {
        parameter_document: true,
        ..ApplicationConfig::default()
    };
    let app = app_with("Resize", config, declare_resize);
    assert_eq!(
        app.get_parameter_type("inparams").unwrap(),
        ParameterType::InputParameterDocument
    );
    assert_eq!(
        app.get_parameter_type("outparams").unwrap(),
        ParameterType::OutputParameterDocument
    );
    assert_eq!(app.missing_parameters().unwrap(), vec!["in".to_string()]);

    assert!(resize_app().get_parameter_type("inparams").is_err());
}

#[test]
fn test_replace_parameter_keeps_position() {
    let app = resize_app();
    let replacement = Parameter::new(ParameterType::Radius, "size", "Radius size")
        .unwrap()
        .with_description("replaced");
    app.replace_parameter("mode.fit.size", replacement).unwrap();
    assert_eq!(app.get_parameter_type("mode.fit.size").unwrap(), ParameterType::Radius);
    assert_eq!(app.get_parameter_description("mode.fit.size").unwrap(), "replaced");
    assert_eq!(
        app.get_parameters_keys(true).unwrap()[3],
        "mode.fit.size".to_string()
    );

    let wrong = Parameter::new(ParameterType::Int, "other", "Other").unwrap();
    let err = app.replace_parameter("mode.fit.size", wrong).unwrap_err();
    assert!(matches!(
        err,
        ApplicationError::Parameter(ParameterError::KeyMismatch { .. })
    ));
}

#[test]
fn test_documentation_built_during_init() {
    let app = resize_app();
    let doc = app.doc().unwrap();
    assert_eq!(doc.long_description, "Resample an image");
    assert_eq!(doc.tags, vec!["Geometry"]);
    assert_eq!(
        doc.command_lines("Resize"),
        vec!["Resize -in input.tif -out small.tif -mode.fit.size 64"]
    );
}
