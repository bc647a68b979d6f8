use std::fs;

use sbgen_spring::event::{GenerateEvent, Status, handle};

const PETSTORE: &str = include_str!("../../sbgen-core/tests/fixtures/petstore.yaml");

fn inline_event(spec: &str, output_dir: &std::path::Path) -> GenerateEvent {
    GenerateEvent {
        spec: Some(spec.to_string()),
        spec_path: None,
        output_dir: output_dir.display().to_string(),
        project: None,
    }
}

#[test]
fn inline_spec_generates_project() {
    let out = tempfile::tempdir().unwrap();
    let response = handle(&inline_event(PETSTORE, out.path()));

    assert_eq!(response.status, Status::Ok);
    assert_eq!(response.written.len(), 4);
    assert!(response.error.is_none());
    assert!(out.path().join("pom.xml").is_file());
}

#[test]
fn spec_path_event_from_json() {
    let dir = tempfile::tempdir().unwrap();
    let spec = dir.path().join("api.yaml");
    fs::write(&spec, PETSTORE).unwrap();
    let out = dir.path().join("out");

    let raw = serde_json::json!({
        "spec_path": spec.display().to_string(),
        "output_dir": out.display().to_string(),
        "project": { "controller_class": "PetsController" },
    });
    let event: GenerateEvent = serde_json::from_value(raw).unwrap();
    let response = handle(&event);

    assert_eq!(response.status, Status::Ok);
    assert!(out
        .join("src/main/java/com/example/petstore/PetsController.java")
        .is_file());
}

#[test]
fn malformed_spec_is_input_error() {
    let out = tempfile::tempdir().unwrap();
    let response = handle(&inline_event("paths: [unclosed", out.path()));

    assert_eq!(response.status, Status::InputError);
    assert!(response.written.is_empty());
    assert!(response.error.is_some());
}

#[test]
fn write_failure_lists_written_artifacts() {
    let out = tempfile::tempdir().unwrap();
    fs::write(out.path().join("src"), "blocks the source tree").unwrap();
    let response = handle(&inline_event(PETSTORE, out.path()));

    assert_eq!(response.status, Status::WriteError);
    assert_eq!(response.written, [out.path().join("pom.xml")]);

    let json = serde_json::to_value(&response).unwrap();
    assert_eq!(json["status"], "write_error");
}
