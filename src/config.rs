use std::path::{Path, PathBuf};

use crate::error::Error;

/// File name looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = ".casebook.toml";

/// Default location of the persisted state, relative to the config root.
const DEFAULT_STATE_PATH: &str = ".casebook/state.json";

/// Default case-study document, relative to the config root.
const DEFAULT_DOCUMENT_PATH: &str = "case-study.md";

/// Default delay for batching rapid document edits.
const DEFAULT_DEBOUNCE_MS: u64 = 500;

/// Project configuration loaded from `.casebook.toml`.
/// Relative paths are resolved against the directory holding the config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Quiet period before a watched document edit is committed.
    pub debounce_ms: u64,
    /// The case-study markdown document.
    pub document: PathBuf,
    /// The persisted state JSON.
    pub state: PathBuf,
}

/// Raw TOML structure for `.casebook.toml`.
#[derive(serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct CasebookTomlConfig {
    /// Override for `Config::debounce_ms`.
    debounce_ms: Option<u64>,
    /// Override for `Config::document`.
    document: Option<PathBuf>,
    /// Override for `Config::state`.
    state: Option<PathBuf>,
}

impl Config {
    /// Load config from `.casebook.toml` in the given root directory.
    /// Returns defaults if the file doesn't exist.
    /// Returns an error if the file exists but is malformed; never silently
    /// falls back to defaults when the user wrote a config file.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if reading fails (other than not-found),
    /// or `Error::TomlDe` if the TOML is malformed.
    pub fn load(root: &Path) -> Result<Self, Error> {
        let path = root.join(CONFIG_FILE_NAME);
        let content = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::defaults_under(root)),
            Err(e) => return Err(Error::Io(e)),
        };
        return Self::parse(root, &content);
    }

    /// Load an explicitly named config file. Unlike [`Config::load`], a
    /// missing file is an error because the user asked for it by name.
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigNotFound` if the file doesn't exist,
    /// `Error::Io` for other read failures,
    /// or `Error::TomlDe` if the TOML is malformed.
    pub fn load_file(path: &Path) -> Result<Self, Error> {
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::ConfigNotFound { path: path.to_path_buf() });
            },
            Err(e) => return Err(Error::Io(e)),
        };
        let root = path.parent().unwrap_or(Path::new(""));
        return Self::parse(root, &content);
    }

    /// Parse TOML content, resolving relative paths against `root`.
    ///
    /// # Errors
    ///
    /// Returns `Error::TomlDe` if the TOML is malformed or has unknown keys.
    fn parse(root: &Path, content: &str) -> Result<Self, Error> {
        let raw: CasebookTomlConfig = toml::from_str(content)?;
        let defaults = Self::defaults_under(root);
        return Ok(Self {
            debounce_ms: raw.debounce_ms.unwrap_or(defaults.debounce_ms),
            document: raw.document.map_or(defaults.document, |p| return root.join(p)),
            state: raw.state.map_or(defaults.state, |p| return root.join(p)),
        });
    }

    /// Default config rooted at `root`.
    fn defaults_under(root: &Path) -> Self {
        return Self {
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            document: root.join(DEFAULT_DOCUMENT_PATH),
            state: root.join(DEFAULT_STATE_PATH),
        };
    }
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc, reason = "tests")]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.state, dir.path().join(".casebook/state.json"));
        assert_eq!(config.document, dir.path().join("case-study.md"));
        assert_eq!(config.debounce_ms, 500);
    }

    #[test]
    fn relative_paths_resolve_against_config_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "document = \"docs/story.md\"\ndebounce_ms = 50\n",
        )
        .unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.document, dir.path().join("docs/story.md"));
        assert_eq!(config.debounce_ms, 50);
        assert_eq!(config.state, dir.path().join(".casebook/state.json"));
    }

    #[test]
    fn malformed_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "colour = \"blue\"\n").unwrap();
        assert!(matches!(Config::load(dir.path()), Err(Error::TomlDe(_))));
    }

    #[test]
    fn named_config_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let result = Config::load_file(&dir.path().join("other.toml"));
        assert!(matches!(result, Err(Error::ConfigNotFound { .. })));
    }
}
