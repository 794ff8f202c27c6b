/// Crate-level error types for casebook diagnostics.
use std::path::PathBuf;

use crate::validate::ValidationIssue;

/// Errors only ever surface at the boundary: configuration, persistence,
/// import validation, and CLI id resolution. The reducer itself never fails.
#[allow(clippy::error_impl_error, reason = "crate-level error type")]
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An explicitly named config file does not exist on disk.
    #[error("config not found: {}", path.display())]
    ConfigNotFound {
        /// Path to the missing config file.
        path: PathBuf,
    },

    /// The case-study markdown document does not exist on disk.
    #[error("document not found: {}", path.display())]
    DocumentNotFound {
        /// Path to the missing document.
        path: PathBuf,
    },

    /// Imported JSON does not match the state schema.
    #[error("invalid import: {}", issues.iter().map(ToString::to_string).collect::<Vec<_>>().join("; "))]
    InvalidImport {
        /// Field-level validation failures, in document order.
        issues: Vec<ValidationIssue>,
    },

    /// A value supplied on the command line cannot be used for this objective.
    #[error("invalid value `{value}` for objective `{objective}`: {reason}")]
    InvalidValue {
        /// Objective the value was meant for.
        objective: String,
        /// Why the value was refused.
        reason: String,
        /// The raw value as given.
        value: String,
    },

    /// Underlying I/O error from the filesystem.
    #[error("io: {0}")]
    Io(
        /// The wrapped I/O error.
        #[from]
        std::io::Error,
    ),

    /// JSON text could not be parsed or produced.
    #[error("json: {0}")]
    Json(
        /// The wrapped JSON error.
        #[from]
        serde_json::Error,
    ),

    /// TOML deserialization of the config file failed.
    #[error("toml deserialize: {0}")]
    TomlDe(
        /// The wrapped TOML deserialization error.
        #[from]
        toml::de::Error,
    ),

    /// No deliverable with this id (or label) exists in the section.
    #[error("unknown deliverable: `{deliverable}` in section `{section}`")]
    UnknownDeliverable {
        /// Deliverable id or label that was not found.
        deliverable: String,
        /// Section that was searched.
        section: String,
    },

    /// No objective with this id (or title) exists in the section.
    #[error("unknown objective: `{objective}` in section `{section}`")]
    UnknownObjective {
        /// Objective id or title that was not found.
        objective: String,
        /// Section that was searched.
        section: String,
    },

    /// No section with this id (or name) exists.
    #[error("unknown section: `{section}`")]
    UnknownSection {
        /// Section id or name that was not found.
        section: String,
    },

    /// No starter template with this name exists.
    #[error("unknown template: `{name}`")]
    UnknownTemplate {
        /// Template name as given.
        name: String,
    },

    /// The filesystem watcher could not be set up.
    #[error("watch failed: {reason}")]
    Watch {
        /// Description of the watcher failure.
        reason: String,
    },
}
