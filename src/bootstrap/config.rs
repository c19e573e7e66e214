//! # Configuration Loader
//!
//! ## Responsibilities
//!
//! - ✅ Read TOML configuration files
//! - ✅ Parse TOML into the AppConfig DTO
//! - ✅ Layer system defaults and `CY_*` environment overrides on top
//!
//! ## Iron Rule
//!
//! > **`load_config` accepts whatever is in the file.** Defaults and
//! > overrides are applied afterwards by `resolve_config`, never while parsing.

use std::path::{Path, PathBuf};

use anyhow::Context;
use cy_core::AppConfig;
use cy_infra::AppDirs;

pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Load configuration from a TOML file.
///
/// **NO validation is performed**: empty strings and zero durations are facts.
///
/// # Errors
///
/// Returns error if the file cannot be read or is not valid TOML.
pub fn load_config(config_path: impl AsRef<Path>) -> anyhow::Result<AppConfig> {
    let config_path = config_path.as_ref();
    let content = std::fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;
    let toml_value: toml::Value =
        toml::from_str(&content).context("Failed to parse config as TOML")?;
    AppConfig::from_toml(&toml_value)
}

/// Fills every empty field of `config` from `defaults`.
fn fill_defaults(mut config: AppConfig, defaults: AppConfig) -> AppConfig {
    if config.data_dir.as_os_str().is_empty() {
        config.data_dir = defaults.data_dir;
    }
    if config.message_ttl_secs == 0 {
        config.message_ttl_secs = defaults.message_ttl_secs;
    }
    if config.http_timeout_secs == 0 {
        config.http_timeout_secs = defaults.http_timeout_secs;
    }
    config
}

/// Applies `CY_*` overrides. Blank values are ignored.
fn apply_env_overrides(config: &mut AppConfig, lookup: impl Fn(&str) -> Option<String>) {
    let value = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(url) = value("CY_SHEET_URL") {
        config.sheet_url = url;
    }
    if let Some(url) = value("CY_FOLLOWERS_URL") {
        config.followers_url = url;
    }
    if let Some(url) = value("CY_VISITORS_URL") {
        config.visitors_url = url;
    }
    if let Some(url) = value("CY_AUTH_URL") {
        config.auth_url = url;
    }
    if let Some(dir) = value("CY_DATA_DIR") {
        config.data_dir = PathBuf::from(dir);
    }
}

/// First existing config file: the explicit path, `./config.toml`, then
/// `<data root>/config.toml`.
fn locate_config(explicit: Option<&Path>, dirs: Option<&AppDirs>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.is_file() {
        return Some(local);
    }
    dirs.map(|d| d.data_root.join(CONFIG_FILE_NAME))
        .filter(|p| p.is_file())
}

/// Effective configuration for this process.
///
/// An explicit path must exist; the implicit locations are optional.
pub fn resolve_config(explicit: Option<&Path>) -> anyhow::Result<AppConfig> {
    let dirs = match AppDirs::resolve() {
        Ok(dirs) => Some(dirs),
        Err(err) => {
            ::tracing::warn!(error = %err, "falling back to the working directory for data");
            None
        }
    };

    let from_file = match locate_config(explicit, dirs.as_ref()) {
        Some(path) => {
            ::tracing::debug!(path = %path.display(), "loading config");
            load_config(&path)?
        }
        None => AppConfig::empty(),
    };

    let data_root = dirs
        .map(|d| d.data_root)
        .unwrap_or_else(|| PathBuf::from(".codeyatri-dashboard"));
    let mut config = fill_defaults(from_file, AppConfig::with_system_defaults(data_root));
    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_config_reads_valid_toml() {
        let toml_content = r#"
            [sheet]
            url = "https://script.example/exec"

            [auth]
            url = "https://auth.example/login"

            [http]
            timeout_secs = 20
        "#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = load_config(temp_file.path()).unwrap();

        assert_eq!(config.sheet_url, "https://script.example/exec");
        assert_eq!(config.auth_url, "https://auth.example/login");
        assert_eq!(config.http_timeout_secs, 20);
        assert_eq!(config.data_dir, PathBuf::new());
    }

    #[test]
    fn test_load_config_returns_io_error_on_file_not_found() {
        let err = load_config("/this/path/does/not/exist/config.toml").unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn test_load_config_rejects_invalid_toml() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(b"[sheet\nurl = ").unwrap();

        assert!(load_config(temp_file.path()).is_err());
    }

    #[test]
    fn test_fill_defaults_keeps_file_values() {
        let mut from_file = AppConfig::empty();
        from_file.message_ttl_secs = 9;

        let config = fill_defaults(from_file, AppConfig::with_system_defaults(PathBuf::from("/d")));

        assert_eq!(config.message_ttl_secs, 9);
        assert_eq!(config.http_timeout_secs, 15);
        assert_eq!(config.data_dir, PathBuf::from("/d"));
    }

    #[test]
    fn test_env_overrides_win_over_file() {
        let env: HashMap<&str, &str> = [
            ("CY_SHEET_URL", "https://override.example/exec"),
            ("CY_DATA_DIR", "/srv/cy"),
            ("CY_AUTH_URL", "  "),
        ]
        .into_iter()
        .collect();
        let mut config = AppConfig::empty();
        config.auth_url = "https://auth.example/login".into();

        apply_env_overrides(&mut config, |key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.sheet_url, "https://override.example/exec");
        assert_eq!(config.data_dir, PathBuf::from("/srv/cy"));
        assert_eq!(config.auth_url, "https://auth.example/login");
    }

    #[test]
    #[serial_test::serial]
    fn test_resolve_config_layers_file_defaults_and_env() {
        let mut temp_file = NamedTempFile::new().unwrap();
        let file_content = "[sheet]\nurl = \"https://file.example/exec\"\n\
                            [ui]\nmessage_ttl_secs = 7\n";
        temp_file.write_all(file_content.as_bytes()).unwrap();
        std::env::set_var("CY_FOLLOWERS_URL", "https://env.example/followers");

        let config = resolve_config(Some(temp_file.path()));
        std::env::remove_var("CY_FOLLOWERS_URL");
        let config = config.unwrap();

        assert_eq!(config.sheet_url, "https://file.example/exec");
        assert_eq!(config.followers_url, "https://env.example/followers");
        assert_eq!(config.message_ttl_secs, 7);
        assert_eq!(config.http_timeout_secs, 15);
        assert!(!config.data_dir.as_os_str().is_empty());
    }

    #[test]
    #[serial_test::serial]
    fn test_resolve_config_fails_on_missing_explicit_path() {
        assert!(resolve_config(Some(Path::new("/no/such/cy/config.toml"))).is_err());
    }

    #[test]
    fn test_explicit_path_wins() {
        let explicit = PathBuf::from("/etc/cy/config.toml");
        assert_eq!(locate_config(Some(&explicit), None), Some(explicit));
    }
}
