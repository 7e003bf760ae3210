mod file_config;

pub use file_config::FileConfig;

use anyhow::{bail, Result};
use std::path::PathBuf;

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub db_path: Option<PathBuf>,
    pub media_host_url: Option<String>,
    pub media_timeout_sec: u64,
    pub working_root: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub db_path: PathBuf,
    /// Media hosting endpoint. Optional: only the import path needs it.
    pub media_host_url: Option<String>,
    pub media_timeout_sec: u64,
    /// Root directory relative media paths are resolved against.
    pub working_root: Option<PathBuf>,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let db_path = file
            .db_path
            .map(PathBuf::from)
            .or_else(|| cli.db_path.clone())
            .ok_or_else(|| {
                anyhow::anyhow!("db_path must be specified via --db-path or in config file")
            })?;

        let media_host_url = file
            .media_host_url
            .or_else(|| cli.media_host_url.clone());

        let media_timeout_sec = file.media_timeout_sec.unwrap_or(cli.media_timeout_sec);

        let working_root = file
            .working_root
            .map(PathBuf::from)
            .or_else(|| cli.working_root.clone());

        if let Some(root) = &working_root {
            if !root.exists() {
                bail!("Working root does not exist: {:?}", root);
            }
            if !root.is_dir() {
                bail!("working_root is not a directory: {:?}", root);
            }
        }

        Ok(Self {
            db_path,
            media_host_url,
            media_timeout_sec,
            working_root,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_resolve_cli_only() {
        let cli = CliConfig {
            db_path: Some(PathBuf::from("/data/records.db")),
            media_host_url: Some("http://media:3002".to_string()),
            media_timeout_sec: 120,
            working_root: None,
        };

        let config = AppConfig::resolve(&cli, None).unwrap();

        assert_eq!(config.db_path, PathBuf::from("/data/records.db"));
        assert_eq!(
            config.media_host_url,
            Some("http://media:3002".to_string())
        );
        assert_eq!(config.media_timeout_sec, 120);
        assert!(config.working_root.is_none());
    }

    #[test]
    fn test_resolve_toml_overrides_cli() {
        let cli = CliConfig {
            db_path: Some(PathBuf::from("/cli/records.db")),
            media_host_url: Some("http://cli-media:3002".to_string()),
            media_timeout_sec: 60,
            working_root: None,
        };

        let file_config = FileConfig {
            db_path: Some("/toml/records.db".to_string()),
            media_timeout_sec: Some(300),
            ..Default::default()
        };

        let config = AppConfig::resolve(&cli, Some(file_config)).unwrap();

        // TOML values should override CLI
        assert_eq!(config.db_path, PathBuf::from("/toml/records.db"));
        assert_eq!(config.media_timeout_sec, 300);
        // CLI value used when TOML doesn't specify
        assert_eq!(
            config.media_host_url,
            Some("http://cli-media:3002".to_string())
        );
    }

    #[test]
    fn test_resolve_missing_db_path_error() {
        let cli = CliConfig::default();
        let result = AppConfig::resolve(&cli, None);
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("db_path must be specified"));
    }

    #[test]
    fn test_resolve_nonexistent_working_root_error() {
        let cli = CliConfig {
            db_path: Some(PathBuf::from("/data/records.db")),
            working_root: Some(PathBuf::from("/nonexistent/path/that/should/not/exist")),
            ..Default::default()
        };
        let result = AppConfig::resolve(&cli, None);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("does not exist"));
    }

    #[test]
    fn test_resolve_working_root_not_directory_error() {
        let temp_file = tempfile::NamedTempFile::new().unwrap();
        let cli = CliConfig {
            db_path: Some(PathBuf::from("/data/records.db")),
            working_root: Some(temp_file.path().to_path_buf()),
            ..Default::default()
        };
        let result = AppConfig::resolve(&cli, None);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("not a directory"));
    }

    #[test]
    fn test_resolve_existing_working_root() {
        let temp_dir = TempDir::new().unwrap();
        let cli = CliConfig {
            db_path: Some(PathBuf::from("/data/records.db")),
            working_root: Some(temp_dir.path().to_path_buf()),
            ..Default::default()
        };
        let config = AppConfig::resolve(&cli, None).unwrap();
        assert_eq!(config.working_root.as_deref(), Some(temp_dir.path()));
    }
}
