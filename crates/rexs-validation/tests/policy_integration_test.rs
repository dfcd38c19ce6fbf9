//! Mode handling across diagnostics and configuration

use rexs_validation::{LoadResult, Mode, Severity};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct Settings {
    mode: Mode,
}

#[test]
fn test_mode_from_yaml() -> anyhow::Result<()> {
    let settings: Settings = serde_yaml::from_str("mode: relaxed\n")?;
    assert_eq!(settings.mode, Mode::Relaxed);

    let settings: Settings = serde_yaml::from_str("mode: strict\n")?;
    assert_eq!(settings.mode, Mode::Strict);

    assert!(serde_yaml::from_str::<Settings>("mode: lenient\n").is_err());
    Ok(())
}

#[test]
fn test_mixed_issues() {
    let mut result = LoadResult::new(Mode::Relaxed);
    result.add_warning("value is out of range for attribute id=mass_of_component of component id=1");
    result.add_error("component 5 of relation 10 does not exist", Severity::Error);

    assert!(result.is_success());
    assert_eq!(result.warnings().count(), 2);
    assert_eq!(result.errors().count(), 0);

    result.add_error("cannot parse document", Severity::Critical);
    assert!(!result.is_success());
    assert_eq!(result.issues().len(), 3);
}
