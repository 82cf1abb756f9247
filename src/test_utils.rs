//! Test utilities for chatline
//!
//! Common fixtures for unit tests: a two-profile catalog, a controller
//! wired to a [`FakeBackend`], temporary configuration files, and
//! assertion helpers.

use std::path::PathBuf;
use std::sync::Arc;

use tempfile::TempDir;

use crate::backend::FakeBackend;
use crate::config::Config;
use crate::controller::ChatController;
use crate::observer::RecordingObserver;
use crate::profile::{Profile, ProfileCatalog, TextDirection};

/// Catalog with an LTR "English" profile and an RTL "Arabic" profile
pub fn test_catalog() -> ProfileCatalog {
    ProfileCatalog::new(vec![
        Profile::new("English", "id-en", TextDirection::Ltr),
        Profile::new("Arabic", "id-ar", TextDirection::Rtl),
    ])
    .expect("Failed to build test catalog")
}

/// Controller on [`test_catalog`] with a fake backend and a recorder
///
/// The returned backend and recorder share state with the controller.
pub fn test_controller() -> (ChatController, FakeBackend, RecordingObserver) {
    let backend = FakeBackend::new();
    let recorder = RecordingObserver::new();
    let controller = ChatController::new(Arc::new(backend.clone()), test_catalog())
        .with_observer(recorder.clone());
    (controller, backend, recorder)
}

/// Configuration with an endpoint and literal backend ids
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.endpoint.url = "http://localhost:8000/chat".to_string();
    for profile in &mut config.profiles {
        profile.backend_id = Some(format!("id-{}", profile.name.to_lowercase()));
    }
    config
}

/// Write a configuration file into a fresh temporary directory
///
/// Keep the returned `TempDir` alive for as long as the path is used.
pub fn temp_config_file(yaml: &str) -> (TempDir, PathBuf) {
    let dir = TempDir::new().expect("Failed to create temporary directory");
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, yaml).expect("Failed to write test config");
    (dir, path)
}

/// Assert that an error contains the expected message
///
/// # Panics
///
/// Panics if the result is Ok or if the error doesn't contain the expected message
pub fn assert_error_contains<T: std::fmt::Debug>(result: anyhow::Result<T>, expected: &str) {
    match result {
        Ok(v) => panic!("Expected error containing '{}' but got Ok({:?})", expected, v),
        Err(e) => {
            let error_msg = format!("{:#}", e);
            assert!(
                error_msg.contains(expected),
                "Error message '{}' does not contain '{}'",
                error_msg,
                expected
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_has_both_directions() {
        let catalog = test_catalog();
        assert_eq!(catalog.names(), vec!["English", "Arabic"]);
        assert!(catalog.get("Arabic").unwrap().text_direction().is_rtl());
    }

    #[test]
    fn test_config_is_valid() {
        assert!(test_config().validate().is_ok());
    }

    #[test]
    fn test_temp_config_file_writes_contents() {
        let (_dir, path) = temp_config_file("endpoint:\n  url: http://x\n");
        let contents = std::fs::read_to_string(path).unwrap();
        assert!(contents.contains("http://x"));
    }

    #[test]
    fn test_assert_error_contains_passes() {
        let result: anyhow::Result<()> = Err(anyhow::anyhow!("Unknown profile: French"));
        assert_error_contains(result, "Unknown profile");
    }

    #[test]
    #[should_panic(expected = "but got Ok")]
    fn test_assert_error_contains_panics_on_ok() {
        assert_error_contains(Ok(1), "anything");
    }
}
