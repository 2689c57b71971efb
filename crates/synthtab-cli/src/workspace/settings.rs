use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use synthtab_core::DEFAULT_MAX_ROWS;
use synthtab_generate::LocaleKey;

use super::atomic::write_bytes_atomic;
use super::WorkspaceResult;

pub const DEFAULT_SETTINGS_FILE: &str = "synthtab.toml";
pub const DEFAULT_ARCHIVE_NAME: &str = "synthetic_data.zip";

/// Tool defaults read from `synthtab.toml`; command-line flags win over them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolSettings {
    pub max_rows: u64,
    pub default_locale: LocaleKey,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_seed: Option<u64>,
    pub out_dir: PathBuf,
    pub archive_name: String,
    pub write_archive: bool,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            max_rows: DEFAULT_MAX_ROWS,
            default_locale: LocaleKey::default(),
            default_seed: None,
            out_dir: PathBuf::from("runs"),
            archive_name: DEFAULT_ARCHIVE_NAME.to_string(),
            write_archive: false,
        }
    }
}

/// Read settings, writing the defaults first when the file does not exist.
pub fn load_or_create_settings(path: &Path) -> WorkspaceResult<ToolSettings> {
    if path.exists() {
        return read_settings(path);
    }

    let settings = ToolSettings::default();
    save_settings(path, &settings)?;
    Ok(settings)
}

/// Read settings if present, without creating the file.
pub fn load_settings(path: &Path) -> WorkspaceResult<ToolSettings> {
    if path.exists() {
        read_settings(path)
    } else {
        Ok(ToolSettings::default())
    }
}

pub fn save_settings(path: &Path, settings: &ToolSettings) -> WorkspaceResult<()> {
    let encoded = toml::to_string_pretty(settings)?;
    write_bytes_atomic(path, encoded.as_bytes())
}

fn read_settings(path: &Path) -> WorkspaceResult<ToolSettings> {
    let content = std::fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workspace::WorkspaceError;

    fn temp_settings_path() -> PathBuf {
        std::env::temp_dir()
            .join(format!("synthtab_settings_{}", uuid::Uuid::new_v4()))
            .join(DEFAULT_SETTINGS_FILE)
    }

    #[test]
    fn first_use_writes_defaults() {
        let path = temp_settings_path();
        let settings = load_or_create_settings(&path).expect("create settings");

        assert_eq!(settings, ToolSettings::default());
        let written = std::fs::read_to_string(&path).expect("settings written");
        assert!(written.contains("archive_name = \"synthetic_data.zip\""));
        assert!(written.contains("default_locale = \"en_US\""));
    }

    #[test]
    fn saved_settings_load_back() {
        let path = temp_settings_path();
        let settings = ToolSettings {
            max_rows: 1_000,
            default_locale: LocaleKey::PtBr,
            default_seed: Some(7),
            out_dir: PathBuf::from("out"),
            archive_name: "bundle.zip".to_string(),
            write_archive: true,
        };

        save_settings(&path, &settings).expect("save settings");
        assert_eq!(load_or_create_settings(&path).expect("load"), settings);
    }

    #[test]
    fn partial_file_falls_back_to_defaults() {
        let path = temp_settings_path();
        write_bytes_atomic(&path, b"max_rows = 12\n").expect("write partial");

        let settings = load_settings(&path).expect("load partial");
        assert_eq!(settings.max_rows, 12);
        assert_eq!(settings.archive_name, DEFAULT_ARCHIVE_NAME);
    }

    #[test]
    fn missing_file_is_not_created_by_plain_load() {
        let path = temp_settings_path();
        assert_eq!(load_settings(&path).expect("defaults"), ToolSettings::default());
        assert!(!path.exists());
    }

    #[test]
    fn unknown_locale_is_a_decode_error() {
        let path = temp_settings_path();
        write_bytes_atomic(&path, b"default_locale = \"fr_FR\"\n").expect("write");
        assert!(matches!(
            load_settings(&path),
            Err(WorkspaceError::TomlDecode(_))
        ));
    }
}
