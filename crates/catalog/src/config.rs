//! Configuration loading for the catalog bootstrap.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// Default location of the configuration file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "config.yml";

/// Default location of the static reference data.
pub const DEFAULT_DATA_FILE: &str = "data_constants.json";

const MAX_IDENTIFIER_LEN: usize = 64;

/// Connection settings for the MySQL server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub user: String,
    /// Raw password as written in the file. Use [`DatabaseConfig::password`].
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default = "default_charset")]
    pub charset: String,
    /// Name of the catalog database, created if absent.
    pub name: String,
}

impl DatabaseConfig {
    /// Password to authenticate with. An empty string means no password.
    pub fn password(&self) -> Option<&str> {
        self.password.as_deref().filter(|p| !p.is_empty())
    }
}

/// Application-level settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    pub timezone: String,
    #[serde(default = "default_data_file")]
    pub data_file: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub app: AppSettings,
}

fn default_port() -> u16 {
    3306
}

fn default_charset() -> String {
    "utf8mb4".to_string()
}

fn default_data_file() -> String {
    DEFAULT_DATA_FILE.to_string()
}

/// Reads and validates the YAML configuration at `path`.
///
/// There is no fallback: a missing or malformed file is an error the caller
/// is expected to treat as fatal.
pub fn load_config(path: impl AsRef<Path>) -> Result<AppConfig, ConfigError> {
    let path = path.as_ref();

    let contents = std::fs::read_to_string(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            ConfigError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    let config: AppConfig =
        serde_yaml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    validate_identifier(&config.database.name)?;

    Ok(config)
}

/// The database name is interpolated into DDL, so only plain identifiers are accepted.
fn validate_identifier(name: &str) -> Result<(), ConfigError> {
    if name.is_empty() {
        return Err(ConfigError::Invalid("database.name is empty".to_string()));
    }
    if name.len() > MAX_IDENTIFIER_LEN {
        return Err(ConfigError::Invalid(format!(
            "database.name '{name}' exceeds {MAX_IDENTIFIER_LEN} characters"
        )));
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
    {
        return Err(ConfigError::Invalid(format!(
            "database.name '{name}' must contain only letters, digits, '_' or '$'"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("create temp file");
        file.write_all(contents.as_bytes()).expect("write config");
        file
    }

    const FULL_CONFIG: &str = r#"
database:
  host: db.internal
  port: 3307
  user: seeder
  password: secret
  charset: utf8
  name: formations
app:
  timezone: America/Sao_Paulo
"#;

    #[test]
    fn test_load_full_config() {
        let file = write_config(FULL_CONFIG);
        let config = load_config(file.path()).expect("config should load");

        assert_eq!(config.database.host, "db.internal");
        assert_eq!(config.database.port, 3307);
        assert_eq!(config.database.user, "seeder");
        assert_eq!(config.database.password(), Some("secret"));
        assert_eq!(config.database.charset, "utf8");
        assert_eq!(config.database.name, "formations");
        assert_eq!(config.app.timezone, "America/Sao_Paulo");
        assert_eq!(config.app.data_file, DEFAULT_DATA_FILE);
    }

    #[test]
    fn test_empty_password_is_absent() {
        let file = write_config(
            r#"
database:
  host: localhost
  user: root
  password: ""
  name: formations
app:
  timezone: UTC
"#,
        );
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.database.password(), None);
        assert_eq!(config.database.port, 3306);
        assert_eq!(config.database.charset, "utf8mb4");
    }

    #[test]
    fn test_missing_password_is_absent() {
        let file = write_config(
            r#"
database:
  host: localhost
  user: root
  name: formations
app:
  timezone: UTC
  data_file: seeds/reference.json
"#,
        );
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.database.password(), None);
        assert_eq!(config.app.data_file, "seeds/reference.json");
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yml");

        let err = load_config(&path).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound { .. }));
    }

    #[test]
    fn test_malformed_yaml() {
        let file = write_config("database: [host: localhost\n  port");

        let err = load_config(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_missing_required_key() {
        let file = write_config(
            r#"
database:
  host: localhost
  user: root
  name: formations
"#,
        );

        let err = load_config(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_rejects_unsafe_database_name() {
        let file = write_config(
            r#"
database:
  host: localhost
  user: root
  name: "formations; DROP DATABASE mysql"
app:
  timezone: UTC
"#,
        );

        let err = load_config(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_validate_identifier() {
        assert!(validate_identifier("formations_2024").is_ok());
        assert!(validate_identifier("").is_err());
        assert!(validate_identifier("bad`name").is_err());
        assert!(validate_identifier(&"a".repeat(65)).is_err());
    }
}
