use std::fs;
use std::path::PathBuf;

use snomed_cli::config::{CONFIG_FILE, load_config};

fn write_config(dir: &tempfile::TempDir, contents: &str) {
    fs::write(dir.path().join(CONFIG_FILE), contents).expect("write config");
}

#[test]
fn loads_config_and_resolves_relative_paths() {
    let dir = tempfile::tempdir().expect("temp dir");
    write_config(
        &dir,
        "[data]\nworkbook = \"patient_data.xlsx\"\n\n\
         [codelist]\npath = \"dynairx_codelist.csv\"\n\n\
         [patient]\nid = \"4001\"\n",
    );
    let config = load_config(dir.path()).expect("load config");
    assert_eq!(config.data.workbook, dir.path().join("patient_data.xlsx"));
    assert_eq!(config.codelist.path, dir.path().join("dynairx_codelist.csv"));
    assert_eq!(config.patient.id.as_deref(), Some("4001"));
}

#[test]
fn absolute_paths_are_kept() {
    let dir = tempfile::tempdir().expect("temp dir");
    write_config(
        &dir,
        "[data]\nworkbook = \"/data/extract.xlsx\"\n\n\
         [codelist]\npath = \"codelist.csv\"\n",
    );
    let config = load_config(dir.path()).expect("load config");
    assert_eq!(config.data.workbook, PathBuf::from("/data/extract.xlsx"));
    assert_eq!(config.codelist.path, dir.path().join("codelist.csv"));
}

#[test]
fn patient_section_is_optional() {
    let dir = tempfile::tempdir().expect("temp dir");
    write_config(
        &dir,
        "[data]\nworkbook = \"extract.xlsx\"\n\n[codelist]\npath = \"codelist.csv\"\n",
    );
    let config = load_config(dir.path()).expect("load config");
    assert_eq!(config.patient.id, None);
}

#[test]
fn missing_config_file_is_fatal() {
    let dir = tempfile::tempdir().expect("temp dir");
    let error = load_config(dir.path()).unwrap_err();
    assert!(error.to_string().contains(CONFIG_FILE));
}

#[test]
fn missing_data_section_is_fatal() {
    let dir = tempfile::tempdir().expect("temp dir");
    write_config(&dir, "[codelist]\npath = \"codelist.csv\"\n");
    assert!(load_config(dir.path()).is_err());
}
