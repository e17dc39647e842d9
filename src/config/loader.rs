//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use crate::config::schema::TableConfig;
use crate::config::validation::{describe, validate_config};
use crate::error::{Result, TableError};

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<TableConfig> {
    let content = fs::read_to_string(path).map_err(|source| TableError::ConfigIo {
        path: path.to_path_buf(),
        source,
    })?;
    let config = parse_config(&content)?;
    validate(&config)?;
    Ok(config)
}

/// Deserialize a TOML document without validating it.
pub fn parse_config(content: &str) -> Result<TableConfig> {
    Ok(toml::from_str(content)?)
}

/// Run semantic validation, folding all problems into one error.
pub fn validate(config: &TableConfig) -> Result<()> {
    validate_config(config).map_err(|errors| TableError::Config(describe(&errors)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::LogFormat;
    use std::path::PathBuf;

    #[test]
    fn test_parse_full_config() {
        let config = parse_config(
            r#"
            name = "aliases"
            files = ["/etc/mail/aliases", "local_aliases"]
            reload_interval_ms = 500

            [observability]
            log_format = "json"
            log_level = "debug"
            "#,
        )
        .unwrap();

        assert_eq!(config.name, "aliases");
        assert_eq!(
            config.files,
            vec![PathBuf::from("/etc/mail/aliases"), PathBuf::from("local_aliases")]
        );
        assert_eq!(config.reload_interval_ms, 500);
        assert_eq!(config.observability.log_format, LogFormat::Json);
        assert_eq!(config.observability.log_level, "debug");
        assert!(!config.observability.metrics_enabled);
    }

    #[test]
    fn test_defaults_apply() {
        let config = parse_config(r#"files = ["t"]"#).unwrap();
        assert_eq!(config.name, "file");
        assert_eq!(config.reload_interval_ms, 15_000);
        assert_eq!(config.observability.log_format, LogFormat::Pretty);
    }

    #[test]
    fn test_load_config_rejects_empty_source_set() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("table.toml");
        fs::write(&path, "name = \"empty\"\n").unwrap();

        assert!(matches!(load_config(&path), Err(TableError::Config(_))));
    }

    #[test]
    fn test_load_config_errors() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            load_config(&dir.path().join("missing.toml")),
            Err(TableError::ConfigIo { .. })
        ));

        let path = dir.path().join("bad.toml");
        fs::write(&path, "files = 3").unwrap();
        assert!(matches!(load_config(&path), Err(TableError::ConfigParse(_))));
    }
}
