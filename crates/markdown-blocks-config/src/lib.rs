use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },
}

/// Editor behaviour settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Milliseconds before an unconsumed focus request is dropped
    pub focus_clear_ms: u64,
    /// Open documents without allowing edits
    pub read_only: bool,
    /// Hex digits in generated block ids
    pub id_length: usize,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            focus_clear_ms: 300,
            read_only: false,
            id_length: 10,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    pub documents_path: PathBuf,
    #[serde(default)]
    pub editor: EditorConfig,
}

impl Config {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let mut config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        // Expand shell variables and tilde in the documents path
        config.documents_path =
            Self::expand_path(&config.documents_path).unwrap_or(config.documents_path);

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/markdown-blocks");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    /// Resolve a document path given on the command line against `documents_path`.
    pub fn resolve_document(&self, path: &Path) -> PathBuf {
        if path.is_absolute() || path.exists() {
            path.to_path_buf()
        } else {
            self.documents_path.join(path)
        }
    }

    fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        match shellexpand::full(&path_str) {
            Ok(expanded) => Some(PathBuf::from(expanded.as_ref())),
            Err(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use tempfile::TempDir;

    #[test]
    fn test_config_path() {
        let config_path = Config::config_path();
        let path_str = config_path.to_string_lossy();

        assert!(!path_str.starts_with('~'));
        assert!(path_str.ends_with(".config/markdown-blocks/config.toml"));
    }

    #[test]
    fn test_editor_defaults_when_section_missing() {
        let config: Config = toml::from_str(r#"documents_path = "/tmp/docs""#).unwrap();
        assert_eq!(config.editor, EditorConfig::default());
        assert_eq!(config.editor.focus_clear_ms, 300);
    }

    #[test]
    fn test_partial_editor_section() {
        let config: Config = toml::from_str(
            r#"
documents_path = "/tmp/docs"

[editor]
read_only = true
"#,
        )
        .unwrap();
        assert!(config.editor.read_only);
        assert_eq!(config.editor.id_length, 10);
    }

    #[test]
    fn test_expand_path_with_env_var() {
        unsafe {
            env::set_var("MARKDOWN_BLOCKS_TEST_VAR", "/test/env/path");
        }

        let path = PathBuf::from("$MARKDOWN_BLOCKS_TEST_VAR/subdir");
        let expanded = Config::expand_path(&path);

        assert_eq!(expanded, Some(PathBuf::from("/test/env/path/subdir")));

        unsafe {
            env::remove_var("MARKDOWN_BLOCKS_TEST_VAR");
        }
    }

    #[test]
    fn test_expand_path_with_tilde() {
        let expanded = Config::expand_path(&PathBuf::from("~/docs")).unwrap();
        assert!(!expanded.to_string_lossy().starts_with('~'));
        assert!(expanded.to_string_lossy().ends_with("docs"));
    }

    #[test]
    fn test_load_config_file_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let result = Config::load_from_path(temp_dir.path().join("nonexistent.toml")).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_load_invalid_config_reports_path() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(&config_file, "documents_path = [").unwrap();

        let err = Config::load_from_path(&config_file).unwrap_err();
        assert!(matches!(err, ConfigError::ConfigParseError { .. }));
        assert!(err.to_string().contains("config.toml"));
    }

    #[test]
    fn test_save_and_load_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("nested").join("config.toml");
        let test_config = Config {
            documents_path: PathBuf::from("/tmp/test-docs"),
            editor: EditorConfig {
                focus_clear_ms: 500,
                read_only: true,
                id_length: 8,
            },
        };

        test_config.save_to_path(&config_file).unwrap();
        let loaded = Config::load_from_path(&config_file).unwrap().unwrap();

        assert_eq!(loaded.documents_path, test_config.documents_path);
        assert_eq!(loaded.editor, test_config.editor);
    }

    #[test]
    fn test_resolve_document_relative_to_documents_path() {
        let config = Config {
            documents_path: PathBuf::from("/srv/docs"),
            editor: EditorConfig::default(),
        };
        assert_eq!(
            config.resolve_document(Path::new("page-that-does-not-exist.json")),
            PathBuf::from("/srv/docs/page-that-does-not-exist.json")
        );
        assert_eq!(
            config.resolve_document(Path::new("/abs/page.json")),
            PathBuf::from("/abs/page.json")
        );
    }
}
