//! Integration tests for audio-matrix-config.
//!
//! Documents go through the file system, validation and conversion, and the
//! resulting configuration drives a real matrix.

use audio_matrix_config::{
    ConfigError, MatrixDocument, ModuleDocument, OnUnknownModule, TrackDocument, ValidationError,
};
use audio_matrix_core::{AudioMatrix, HostAudioConfig};
use tempfile::TempDir;

/// Save a document, load it back and get the same document.
#[test]
fn save_and_load_through_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("matrix.toml");

    let doc = MatrixDocument::stereo_passthrough().with_name("saved");
    doc.save(&path).expect("save should create parent directories");
    assert!(path.exists());

    let loaded = MatrixDocument::load(&path).unwrap();
    assert_eq!(loaded, doc);
}

#[test]
fn load_missing_file_reports_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent.toml");
    let err = MatrixDocument::load(&path).unwrap_err();
    assert!(matches!(err, ConfigError::ReadFile { .. }));
    assert!(err.to_string().contains("absent.toml"));
}

#[test]
fn malformed_toml_is_a_parse_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.toml");
    std::fs::write(&path, "[[tracks]\nname = ").unwrap();
    assert!(matches!(
        MatrixDocument::load(&path),
        Err(ConfigError::TomlParse(_))
    ));
}

/// The starter template builds a stereo passthrough matrix.
#[test]
fn template_drives_a_passthrough_matrix() {
    let config = MatrixDocument::stereo_passthrough()
        .to_matrix_config()
        .unwrap();
    let mut matrix = AudioMatrix::new(&config).unwrap();
    assert_eq!(matrix.n_input_channels(), 2);
    assert_eq!(matrix.n_output_channels(), 2);
    assert_eq!(matrix.output_port_name(0), Some("out_left"));
    assert_eq!(matrix.output_port_name(1), Some("out_right"));

    matrix.prepare(HostAudioConfig::new(4, 48000).unwrap());
    let inputs = [[0.1f32, 0.2, 0.3, 0.4], [-0.1, -0.2, -0.3, -0.4]];
    let mut outputs = [[0.0f32; 4]; 2];
    matrix.process(&inputs, &mut outputs, 4);
    assert_eq!(outputs, inputs);
}

/// Decibel and percent parameters reach the gain module as linear factors.
#[test]
fn unit_parameters_reach_the_module() {
    let doc = MatrixDocument::new()
        .with_track(
            TrackDocument::new("half", 1)
                .with_input(0, 0)
                .with_output(0, "a")
                .with_module(ModuleDocument::new("gain").with_param("gain", "50%")),
        )
        .with_track(
            TrackDocument::new("boost", 1)
                .with_input(0, 0)
                .with_output(0, "b")
                .with_module(ModuleDocument::new("gain").with_param("gain", "+6dB")),
        );
    let mut matrix = AudioMatrix::new(&doc.to_matrix_config().unwrap()).unwrap();
    matrix.prepare(HostAudioConfig::new(2, 48000).unwrap());

    let mut outputs = [[0.0f32; 2]; 2];
    matrix.process(&[[1.0f32; 2]], &mut outputs, 2);
    assert_eq!(outputs[0], [0.5; 2]);
    assert!((outputs[1][0] - 1.995_262).abs() < 1e-3);
}

/// Skip mode: the unknown entry disappears and the rest of the chain still runs.
#[test]
fn skip_mode_builds_without_unknown_modules() {
    let doc = MatrixDocument::new()
        .with_unknown_modules(OnUnknownModule::Skip)
        .with_track(
            TrackDocument::new("t", 1)
                .with_input(0, 0)
                .with_output(0, "out")
                .with_module(ModuleDocument::new("tape_echo").with_param("time", "whatever"))
                .with_module(ModuleDocument::new("gain").with_param("gain", 3.0)),
        );
    let config = doc.to_matrix_config().unwrap();
    let mut matrix = AudioMatrix::new(&config).unwrap();
    assert_eq!(matrix.tracks()[0].module_count(), 1);

    matrix.prepare(HostAudioConfig::new(2, 48000).unwrap());
    let mut outputs = [[0.0f32; 2]];
    matrix.process(&[[1.0f32; 2]], &mut outputs, 2);
    assert_eq!(outputs[0], [3.0; 2]);
}

/// A validated skip-mode document always converts, whatever the unknown
/// module's parameters hold, and renders like the chain without it.
#[test]
fn skip_mode_document_matches_gain_only_document() {
    let with_unknown = MatrixDocument::from_toml(
        r#"
        on_unknown_module = "skip"

        [[tracks]]
        name = "voice"
        channels = 1
        inputs = [{ host = 0, channel = 0 }]
        outputs = [{ channel = 0, port = "main" }]

        [[tracks.modules]]
        type = "reverb"
        params = { room = "large" }

        [[tracks.modules]]
        type = "gain"
        params = { gain = "-6dB" }
        "#,
    )
    .unwrap();
    let gain_only = MatrixDocument::new().with_track(
        TrackDocument::new("voice", 1)
            .with_input(0, 0)
            .with_output(0, "main")
            .with_module(ModuleDocument::new("gain").with_param("gain", "-6dB")),
    );

    assert!(with_unknown.validate().is_ok());
    let render = |doc: &MatrixDocument| {
        let mut matrix = AudioMatrix::new(&doc.to_matrix_config().unwrap()).unwrap();
        matrix.prepare(HostAudioConfig::new(4, 48000).unwrap());
        let mut outputs = [[0.0f32; 4]];
        matrix.process(&[[0.8f32, -0.3, 0.0, 1.0]], &mut outputs, 4);
        outputs
    };
    assert_eq!(render(&with_unknown), render(&gain_only));
}

#[test]
fn reject_mode_lists_every_problem() {
    let text = r#"
        [[tracks]]
        name = "one"
        channels = 1
        inputs = [{ host = 1, channel = 0 }]
        outputs = [{ channel = 1, port = "out" }]

        [[tracks.modules]]
        type = "fuzz"
    "#;
    let doc = MatrixDocument::from_toml(text).unwrap();
    let err = doc.validate().unwrap_err();
    let errors = err.errors();
    assert_eq!(errors.len(), 3);
    assert!(
        errors
            .iter()
            .any(|e| matches!(e, ValidationError::MissingHostInput(0)))
    );
    assert!(
        errors
            .iter()
            .any(|e| matches!(e, ValidationError::UnknownModule { .. }))
    );
    assert!(matches!(
        doc.to_matrix_config(),
        Err(ConfigError::Validation(ValidationError::Multiple(_)))
    ));
}
