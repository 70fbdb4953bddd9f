//! Layered settings: defaults, then a JSON config file, then environment and
//! command-line flags.

use clap::Args;
use projections_management::{ManagementConfig, DEFAULT_SERVER_ADDRESS};
use projections_migrate::PlanOptions;
use projections_schema::{ExtractOptions, DEFAULT_MARKER_DIRECTIVE};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Config file looked up in the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "projections.config.json";

pub const DEFAULT_SCHEMA_PATH: &str = "./src";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Settings flags shared by every command.
#[derive(Args, Debug, Default, Clone)]
pub struct SettingsArgs {
    /// Path of the JSON config file
    #[arg(long, global = true, env = "PROJECTIONS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory containing the schema files
    #[arg(long, global = true, env = "PROJECTIONS_SCHEMA_PATH")]
    pub schema_path: Option<PathBuf>,

    /// Address of the projection service
    #[arg(long, global = true, env = "PROJECTIONS_SERVER_ADDRESS")]
    pub server_address: Option<String>,

    /// Token for the management API
    #[arg(long, global = true, env = "PROJECTIONS_API_TOKEN", hide_env_values = true)]
    pub api_token: Option<String>,

    /// Prefix applied to every type name
    #[arg(long, global = true, env = "PROJECTIONS_NAMESPACE")]
    pub namespace: Option<String>,

    /// Directive marking a type as a projection
    #[arg(long, global = true)]
    pub marker_directive: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    pub timeout_secs: Option<u64>,
}

/// Contents of the JSON config file.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileConfig {
    pub schema_path: Option<PathBuf>,
    pub server_address: Option<String>,
    pub api_token: Option<String>,
    pub namespace: Option<String>,
    pub marker_directive: Option<String>,
    pub timeout_secs: Option<u64>,
    pub max_retries: Option<u32>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Fully resolved settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub schema_path: PathBuf,
    pub server_address: String,
    pub api_token: Option<String>,
    pub namespace: String,
    pub marker_directive: String,
    pub timeout_secs: u64,
    pub max_retries: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_path: PathBuf::from(DEFAULT_SCHEMA_PATH),
            server_address: DEFAULT_SERVER_ADDRESS.to_string(),
            api_token: None,
            namespace: String::new(),
            marker_directive: DEFAULT_MARKER_DIRECTIVE.to_string(),
            timeout_secs: 30,
            max_retries: 3,
        }
    }
}

impl Settings {
    /// Resolves settings from flags, reading the config file they point at.
    ///
    /// An explicit `--config` must exist, the default file is optional.
    pub fn resolve(args: &SettingsArgs) -> Result<Self, ConfigError> {
        let file = match &args.config {
            Some(path) => FileConfig::load(path)?,
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if default.is_file() {
                    FileConfig::load(default)?
                } else {
                    FileConfig::default()
                }
            }
        };
        Ok(Self::layered(file, args))
    }

    /// Applies the file, then the flags, over the defaults.
    #[must_use]
    pub fn layered(file: FileConfig, args: &SettingsArgs) -> Self {
        let defaults = Self::default();
        Self {
            schema_path: args
                .schema_path
                .clone()
                .or(file.schema_path)
                .unwrap_or(defaults.schema_path),
            server_address: args
                .server_address
                .clone()
                .or(file.server_address)
                .unwrap_or(defaults.server_address),
            api_token: args.api_token.clone().or(file.api_token),
            namespace: args
                .namespace
                .clone()
                .or(file.namespace)
                .unwrap_or(defaults.namespace),
            marker_directive: args
                .marker_directive
                .clone()
                .or(file.marker_directive)
                .unwrap_or(defaults.marker_directive),
            timeout_secs: args
                .timeout_secs
                .or(file.timeout_secs)
                .unwrap_or(defaults.timeout_secs),
            max_retries: file.max_retries.unwrap_or(defaults.max_retries),
        }
    }

    #[must_use]
    pub fn extract_options(&self) -> ExtractOptions {
        ExtractOptions::default()
            .with_namespace(&self.namespace)
            .with_marker_directive(&self.marker_directive)
    }

    #[must_use]
    pub fn plan_options(&self) -> PlanOptions {
        PlanOptions::from(&self.extract_options())
    }

    #[must_use]
    pub fn management_config(&self) -> ManagementConfig {
        let config = ManagementConfig::new(&self.server_address)
            .timeout(Duration::from_secs(self.timeout_secs))
            .max_retries(self.max_retries);
        match &self.api_token {
            Some(token) => config.api_token(token),
            None => config,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::layered(FileConfig::default(), &SettingsArgs::default());
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.schema_path, PathBuf::from("./src"));
        assert_eq!(settings.server_address, "127.0.0.1:9000");
        assert_eq!(settings.marker_directive, "upsertOn");
    }

    #[test]
    fn test_flags_override_file() {
        let file: FileConfig = serde_json::from_str(
            r#"{"schemaPath": "./schema", "serverAddress": "file:9000", "apiToken": "file-token", "namespace": "File", "maxRetries": 0}"#,
        )
        .unwrap();
        let args = SettingsArgs {
            server_address: Some("flag:9000".to_string()),
            namespace: Some("Flag".to_string()),
            ..SettingsArgs::default()
        };

        let settings = Settings::layered(file, &args);
        assert_eq!(settings.schema_path, PathBuf::from("./schema"));
        assert_eq!(settings.server_address, "flag:9000");
        assert_eq!(settings.api_token.as_deref(), Some("file-token"));
        assert_eq!(settings.namespace, "Flag");
        assert_eq!(settings.max_retries, 0);
        assert_eq!(settings.extract_options().namespace, "Flag");
        assert_eq!(settings.plan_options().namespace, "Flag");

        let management = settings.management_config();
        assert_eq!(management.api_token.as_deref(), Some("file-token"));
        assert_eq!(management.max_retries, 0);
    }

    #[test]
    fn test_explicit_config_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let args = SettingsArgs {
            config: Some(dir.path().join("missing.json")),
            ..SettingsArgs::default()
        };
        assert!(matches!(
            Settings::resolve(&args),
            Err(ConfigError::Read { .. })
        ));
    }

    #[test]
    fn test_invalid_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("projections.config.json");
        std::fs::write(&path, "{ not json").unwrap();
        let args = SettingsArgs {
            config: Some(path),
            ..SettingsArgs::default()
        };
        assert!(matches!(
            Settings::resolve(&args),
            Err(ConfigError::Parse { .. })
        ));
    }
}
