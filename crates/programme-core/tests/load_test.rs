#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::fs;

use programme_core::config::{find_config_file, SiteConfig};
use programme_core::error::LoadError;
use programme_core::store::{DocumentStore, FileSource};

#[test]
fn file_source_loads_programme_from_disk() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("programme.json");
    fs::write(
        &path,
        r##"{"meta":{"list":"Liste"},"themes":[{"id":"env","title":"Environnement","color":"#2e8b57",
            "propositions":[{"id":"compost","title":"Compost de quartier"}]}]}"##,
    )
    .expect("write");

    let store = DocumentStore::load(&FileSource::new(&path)).expect("load");
    assert_eq!(store.meta().list.as_deref(), Some("Liste"));
    assert_eq!(store.themes().len(), 1);
    assert_eq!(
        store.find_prop("compost").map(|f| f.theme.id.as_str()),
        Some("env")
    );
}

#[test]
fn missing_file_is_an_io_error_naming_the_path() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("absent.json");
    let err = DocumentStore::load(&FileSource::new(&path)).expect_err("should fail");
    assert!(matches!(err, LoadError::Io { .. }));
    assert!(err.to_string().contains("absent.json"));
}

#[test]
fn truncated_file_is_a_parse_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("programme.json");
    fs::write(&path, r#"{"themes": [{"id": "env""#).expect("write");
    let err = DocumentStore::load(&FileSource::new(&path)).expect_err("should fail");
    assert!(matches!(err, LoadError::Parse { .. }));
}

#[test]
fn config_file_is_discovered_and_loaded() {
    let dir = tempfile::tempdir().expect("tempdir");
    assert!(find_config_file(dir.path()).is_none());

    let path = dir.path().join("programme-site.toml");
    fs::write(&path, "[data]\npath = \"site/programme.json\"\n").expect("write");
    let found = find_config_file(dir.path()).expect("config file");
    let cfg = SiteConfig::load(Some(&found)).expect("load");
    assert_eq!(cfg.data.path, "site/programme.json");
    assert!(cfg.validate().is_ok());
}
