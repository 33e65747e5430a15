//! Core runtime configuration.
//!
//! # Responsibility
//! - Collect storage, logging and speech settings in one value.
//! - Load settings from JSON with defaults for every omitted field.
//!
//! # Invariants
//! - A validated config has a non-empty storage key.
//! - A validated config asks the recognizer for at least one alternative.
//! - Notes are file-backed unless `db_path` is explicitly set to `null`.

use crate::capture::speech::SpeechConfig;
use crate::repo::note_repo::DEFAULT_STORAGE_KEY;
use crate::service::note_store::CorruptSlotPolicy;
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// SQLite file used when no `db_path` is configured, relative to the
/// working directory.
pub const DEFAULT_DB_FILE: &str = "voicenote.db";

/// Config load/validation errors.
#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, message: String },
    Parse(String),
    Invalid(&'static str),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, message } => {
                write!(f, "cannot read config `{}`: {message}", path.display())
            }
            Self::Parse(message) => write!(f, "invalid config: {message}"),
            Self::Invalid(reason) => write!(f, "invalid config: {reason}"),
        }
    }
}

impl Error for ConfigError {}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    /// Slot key holding the serialized collection.
    pub storage_key: String,
    /// SQLite file backing the slot. Defaults to [`DEFAULT_DB_FILE`];
    /// `None` (JSON `null`) keeps notes in memory for this process only.
    pub db_path: Option<PathBuf>,
    pub log_level: Option<String>,
    /// Absolute directory for rolling logs; `None` disables file logging.
    pub log_dir: Option<PathBuf>,
    pub speech: SpeechConfig,
    pub corrupt_slot_policy: CorruptSlotPolicy,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            db_path: Some(PathBuf::from(DEFAULT_DB_FILE)),
            log_level: None,
            log_dir: None,
            speech: SpeechConfig::default(),
            corrupt_slot_policy: CorruptSlotPolicy::default(),
        }
    }
}

impl CoreConfig {
    /// Parses and validates a JSON config document.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(raw).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON config file.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|err| ConfigError::Io {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;
        Self::from_json_str(&raw)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage_key.trim().is_empty() {
            return Err(ConfigError::Invalid("storage_key must not be empty"));
        }
        if self.speech.max_alternatives == 0 {
            return Err(ConfigError::Invalid(
                "speech.max_alternatives must be at least 1",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, CoreConfig, DEFAULT_DB_FILE};
    use crate::service::note_store::CorruptSlotPolicy;
    use std::path::Path;

    #[test]
    fn empty_document_yields_defaults() {
        let config = CoreConfig::from_json_str("{}").unwrap();
        assert_eq!(config, CoreConfig::default());
        assert_eq!(config.storage_key, "notesCookies");
        assert_eq!(config.corrupt_slot_policy, CorruptSlotPolicy::Reset);
        assert_eq!(config.db_path.as_deref(), Some(Path::new(DEFAULT_DB_FILE)));
    }

    #[test]
    fn null_db_path_opts_into_memory_storage() {
        let config = CoreConfig::from_json_str(r#"{"db_path":null}"#).unwrap();
        assert!(config.db_path.is_none());

        let config = CoreConfig::from_json_str(r#"{"db_path":"/tmp/notes.db"}"#).unwrap();
        assert_eq!(config.db_path.as_deref(), Some(Path::new("/tmp/notes.db")));
    }

    #[test]
    fn partial_speech_section_keeps_other_defaults() {
        let config = CoreConfig::from_json_str(
            r#"{"speech":{"language":"en-US"},"corrupt_slot_policy":"fail"}"#,
        )
        .unwrap();
        assert_eq!(config.speech.language, "en-US");
        assert!(config.speech.continuous);
        assert_eq!(config.speech.max_alternatives, 1);
        assert_eq!(config.corrupt_slot_policy, CorruptSlotPolicy::Fail);
    }

    #[test]
    fn rejects_blank_key_and_zero_alternatives() {
        assert!(matches!(
            CoreConfig::from_json_str(r#"{"storage_key":"  "}"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            CoreConfig::from_json_str(r#"{"speech":{"max_alternatives":0}}"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            CoreConfig::from_json_str("42"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn load_from_missing_path_reports_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = CoreConfig::load_from_path(dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
