//! State persistence: load, save, clear, export, and import of the state file.

use std::path::Path;

use chrono::{DateTime, Utc};

use crate::error::Error;
use crate::types::AppState;
use crate::validate;

/// Load persisted state. A missing, unreadable, or malformed payload is
/// treated as absent; nothing is ever partially loaded.
pub fn hydrate(path: &Path) -> Option<AppState> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "failed to read stored state");
            return None;
        },
    };
    return match import_json(&content) {
        Ok(state) => Some(state),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring stored state");
            None
        },
    };
}

/// Whether `state` should be written. An empty state is only written when
/// a stored file already exists, so a fresh directory stays clean.
pub fn should_persist(path: &Path, state: &AppState) -> bool {
    return !state.sections.is_empty() || path.exists();
}

/// Write `state` to `path`, creating parent directories as needed.
///
/// # Errors
///
/// Returns `Error::Json` if serialization fails,
/// or `Error::Io` if the file cannot be written.
pub fn persist(path: &Path, state: &AppState) -> Result<(), Error> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    let mut content = export_json(state)?;
    content.push('\n');
    std::fs::write(path, content)?;
    tracing::debug!(path = %path.display(), sections = state.sections.len(), "persisted state");
    return Ok(());
}

/// Remove the stored state. A file that is already gone is not an error.
///
/// # Errors
///
/// Returns `Error::Io` for removal failures other than not-found.
pub fn clear(path: &Path) -> Result<(), Error> {
    return match std::fs::remove_file(path) {
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(Error::Io(e)),
        Ok(()) => Ok(()),
    };
}

/// Serialize the full state verbatim, pretty-printed.
///
/// # Errors
///
/// Returns `Error::Json` if serialization fails.
pub fn export_json(state: &AppState) -> Result<String, Error> {
    return Ok(serde_json::to_string_pretty(state)?);
}

/// Parse and validate exported JSON text.
///
/// # Errors
///
/// Returns `Error::Json` if the text is not JSON,
/// or `Error::InvalidImport` if it does not match the state schema.
pub fn import_json(text: &str) -> Result<AppState, Error> {
    let value: serde_json::Value = serde_json::from_str(text)?;
    return validate::import_state(value);
}

/// Default export file name for the given day, e.g. `casebook-2024-05-01.json`.
pub fn default_export_file_name(now: DateTime<Utc>) -> String {
    return format!("casebook-{}.json", now.format("%Y-%m-%d"));
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc, reason = "tests")]
mod tests {
    use chrono::TimeZone as _;

    use super::*;
    use crate::types::{Objective, ObjectiveKind, Section};

    fn sample() -> AppState {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let mut section = Section::new("s1", "Research", now);
        section.description = Some("Who are the users?".to_string());
        return AppState { sections: vec![section], ..AppState::default() };
    }

    #[test]
    fn persist_then_hydrate_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("state.json");
        let state = sample();

        persist(&path, &state).unwrap();
        assert_eq!(hydrate(&path), Some(state));
    }

    #[test]
    fn missing_or_malformed_payload_is_absent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        assert_eq!(hydrate(&path), None);

        std::fs::write(&path, r#"{"version":2,"sections":[]}"#).unwrap();
        assert_eq!(hydrate(&path), None);

        std::fs::write(&path, r#"{"version":1,"sections":"nope"}"#).unwrap();
        assert_eq!(hydrate(&path), None);

        std::fs::write(&path, "not json").unwrap();
        assert_eq!(hydrate(&path), None);
    }

    #[test]
    fn empty_state_is_not_written_into_a_clean_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        assert!(!should_persist(&path, &AppState::default()));
        assert!(should_persist(&path, &sample()));

        std::fs::write(&path, "{}").unwrap();
        assert!(should_persist(&path, &AppState::default()));
    }

    #[test]
    fn clear_tolerates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        clear(&path).unwrap();
        persist(&path, &sample()).unwrap();
        clear(&path).unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn import_json_reports_parse_errors() {
        assert!(matches!(import_json("{"), Err(Error::Json(_))));
        assert!(matches!(import_json(r#"{"version":1}"#), Err(Error::InvalidImport { .. })));
    }

    #[test]
    fn export_keeps_every_float_bit() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap() + chrono::TimeDelta::nanoseconds(123_456_789);
        let mut section = Section::new("s1", "Budget", now);
        let kind = ObjectiveKind::Number {
            max: Some(2469.134),
            min: Some(1234.567),
            step: Some(0.1),
            value: Some(1451.186_815_982_315_5),
        };
        section.objectives.push(Objective::new("o1", "Spend", kind));
        let state = AppState { sections: vec![section], ..AppState::default() };

        let imported = import_json(&export_json(&state).unwrap()).unwrap();
        assert_eq!(imported, state);
    }

    #[test]
    fn export_file_name_uses_the_date() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 23, 59, 0).unwrap();
        assert_eq!(default_export_file_name(now), "casebook-2024-05-01.json");
    }
}
