//! Loading definition files from disk.

use std::io::Write;

use tempfile::NamedTempFile;

use rowcast_core::{Format, Input, LogicalType};
use rowcast_ingest::{
    DefinitionOptions, IngestError, UnknownTypePolicy, load_definitions, template_from_definitions,
};

fn temp_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_load_yaml_definitions() {
    let file = temp_file(
        r"
- name: title
  type: string
- name: release_date
  type: numeric
- name: budget
  type: hidden
- name: studio
  columns:
    - name: name
      type: string
    - name: founded
      type: int16
",
    );
    let definitions = load_definitions(file.path()).unwrap();
    assert_eq!(definitions.len(), 4);

    let template = template_from_definitions(&definitions, &DefinitionOptions::default()).unwrap();
    assert_eq!(
        template.names().collect::<Vec<_>>(),
        vec!["title", "release_date", "budget", "studio"]
    );
    assert_eq!(
        template.format_of("release_date"),
        Some(&Format::Type(LogicalType::Number))
    );

    let record = template
        .create_row(
            Input::from_json(
                br#"{"title":"The Matrix","release_date":"1999","budget":63000000,"studio":["Warner",1923]}"#,
            )
            .unwrap(),
        )
        .unwrap();
    assert_eq!(
        record.to_json().unwrap(),
        r#"{"title":"The Matrix","release_date":1999,"studio":{"name":"Warner","founded":1923}}"#
    );
}

#[test]
fn test_load_json_definitions() {
    let file = temp_file(r#"[{"name":"id","type":"uint32"},{"name":"seen","type":"datetime"}]"#);
    let definitions = load_definitions(file.path()).unwrap();
    let template = template_from_definitions(&definitions, &DefinitionOptions::default()).unwrap();
    assert_eq!(template.names().collect::<Vec<_>>(), vec!["id", "seen"]);
}

#[test]
fn test_typo_is_dropped_unless_strict() {
    let file = temp_file("- {name: a, type: strng}\n- {name: b, type: string}\n");
    let definitions = load_definitions(file.path()).unwrap();

    let lenient = template_from_definitions(&definitions, &DefinitionOptions::default()).unwrap();
    assert_eq!(lenient.names().collect::<Vec<_>>(), vec!["b"]);

    let strict = DefinitionOptions::default().with_unknown_types(UnknownTypePolicy::Reject);
    assert!(matches!(
        template_from_definitions(&definitions, &strict),
        Err(IngestError::UnknownType { .. })
    ));
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_definitions(&dir.path().join("missing.yaml")).unwrap_err();
    assert!(matches!(err, IngestError::Io(_)));
}

#[test]
fn test_malformed_definitions() {
    let file = temp_file("name: not-a-list\n");
    let err = load_definitions(file.path()).unwrap_err();
    assert!(matches!(err, IngestError::Yaml(_)));
}
