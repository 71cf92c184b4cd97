use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub data_dir: PathBuf,
    pub storage_file: String,
    pub log_level: String,
}

impl ClientConfig {
    /// File standing in for the browser's local storage.
    pub fn storage_path(&self) -> PathBuf {
        self.data_dir.join(&self.storage_file)
    }
}

/// Load client configuration from the environment, after reading `.env` if present.
///
/// # Errors
///
/// Returns `ConfigError` if a variable is set to an unusable value.
pub fn load_config() -> Result<ClientConfig, ConfigError> {
    dotenvy::dotenv().ok();
    build_config(|key| std::env::var(key))
}

fn build_config<F>(lookup: F) -> Result<ClientConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String { lookup(var).unwrap_or_else(|_| default.to_string()) };

    let non_empty = |var: &str, default: &str| -> Result<String, ConfigError> {
        let raw = or_default(var, default);
        if raw.trim().is_empty() {
            return Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        Ok(raw.trim().to_string())
    };

    let data_dir = PathBuf::from(non_empty("PDJ_DATA_DIR", "data")?);
    let storage_file = non_empty("PDJ_STORAGE_FILE", "local_storage.json")?;
    if storage_file.contains(&['/', '\\'][..]) {
        return Err(ConfigError::InvalidEnvVar {
            var: "PDJ_STORAGE_FILE".to_string(),
            reason: "must be a file name, not a path".to_string(),
        });
    }
    let log_level = or_default("PDJ_LOG_LEVEL", "info");

    Ok(ClientConfig {
        data_dir,
        storage_file,
        log_level,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::env::VarError;

    use super::*;

    fn lookup_from_map<'a>(map: &'a HashMap<&'a str, &'a str>) -> impl Fn(&str) -> Result<String, VarError> + 'a {
        move |key| map.get(key).map(|v| (*v).to_string()).ok_or(VarError::NotPresent)
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let map = HashMap::new();
        let config = build_config(lookup_from_map(&map)).unwrap();
        assert_eq!(
            config,
            ClientConfig {
                data_dir: PathBuf::from("data"),
                storage_file: "local_storage.json".to_string(),
                log_level: "info".to_string(),
            }
        );
        assert_eq!(config.storage_path(), PathBuf::from("data").join("local_storage.json"));
    }

    #[test]
    fn overrides_are_applied() {
        let mut map = HashMap::new();
        map.insert("PDJ_DATA_DIR", "/tmp/pdj");
        map.insert("PDJ_STORAGE_FILE", "browser.json");
        map.insert("PDJ_LOG_LEVEL", "debug");
        let config = build_config(lookup_from_map(&map)).unwrap();
        assert_eq!(config.storage_path(), PathBuf::from("/tmp/pdj/browser.json"));
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn empty_data_dir_is_rejected() {
        let mut map = HashMap::new();
        map.insert("PDJ_DATA_DIR", "  ");
        let result = build_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "PDJ_DATA_DIR"),
            "expected InvalidEnvVar(PDJ_DATA_DIR), got: {result:?}"
        );
    }

    #[test]
    fn storage_file_must_not_be_a_path() {
        let mut map = HashMap::new();
        map.insert("PDJ_STORAGE_FILE", "../escape.json");
        let result = build_config(lookup_from_map(&map));
        assert!(matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "PDJ_STORAGE_FILE"));
    }
}
