//! Integration tests for rexs-database
//!
//! These tests load the catalogs shipped under `testdata/database`.

use rexs_database::{
    CatalogLoader, DirectoryResourceLoader, Error, ModelRegistry, ResourceLoader, RexsVersion,
    ValueType,
};
use std::path::PathBuf;

fn database_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("testdata")
        .join("database")
}

#[test]
fn test_registry_from_directory_loads_all_languages() {
    let registry = ModelRegistry::from_directory(database_dir()).unwrap();

    assert_eq!(registry.len(), 2);
    assert!(registry.contains(RexsVersion::new(1, 4), "en"));
    assert!(registry.contains(RexsVersion::new(1, 4), "de"));

    let german = registry.get_model(RexsVersion::new(1, 4), "de").unwrap();
    assert_eq!(german.find_component("shaft").unwrap().name(), "Welle");
}

#[test]
fn test_catalog_declares_every_value_type() {
    let registry = ModelRegistry::from_directory(database_dir()).unwrap();
    let model = registry.get_model(RexsVersion::new(1, 4), "en").unwrap();

    let gear_unit = model.find_component("gear_unit").unwrap();
    for value_type in ValueType::ALL {
        assert!(
            gear_unit
                .attributes()
                .iter()
                .any(|a| a.value_type() == value_type),
            "gear_unit has no attribute of type {value_type}"
        );
    }
}

#[test]
fn test_missing_directory_is_an_error() {
    let result = ModelRegistry::from_directory("/path/that/does/not/exist");
    assert!(matches!(result, Err(Error::NotFound(_))));
}

#[test]
fn test_directory_loader_skips_foreign_files() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::copy(
        database_dir().join("rexs_v1.4_en.xml"),
        dir.path().join("rexs_v1.4_en.xml"),
    )
    .unwrap();
    std::fs::write(dir.path().join("rexs-model.xsd"), "<xs:schema/>").unwrap();

    let mut names = Vec::new();
    DirectoryResourceLoader::new(dir.path())
        .load(&mut |name, _| {
            names.push(name.to_string());
            Ok(())
        })
        .unwrap();

    assert_eq!(names.len(), 1);
    assert!(names[0].ends_with("rexs_v1.4_en.xml"));
}

#[test]
fn test_broken_catalog_fails_the_whole_load() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    std::fs::write(
        dir.path().join("rexs_v1.5_en.xml"),
        r#"<rexsModel version="1.5" language="en"><valueTypes><valueType id="1" name="no_such_type"/></valueTypes></rexsModel>"#,
    )?;

    let result = CatalogLoader::new().load_all(&DirectoryResourceLoader::new(dir.path()));
    assert!(matches!(result, Err(Error::UnknownValueType(_))));
    Ok(())
}
