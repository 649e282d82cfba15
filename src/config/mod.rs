//! Server configuration

use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_ip")]
    pub ip: String,
}

fn default_port() -> u16 {
    8080
}

fn default_ip() -> String {
    "0.0.0.0".to_string()
}

/// Get config directory (SHD_CONFIG_DIR, XDG_CONFIG_HOME or platform default)
pub fn get_config_dir() -> std::path::PathBuf {
    if let Ok(dir) = std::env::var("SHD_CONFIG_DIR") {
        return std::path::PathBuf::from(dir);
    }

    #[cfg(target_os = "macos")]
    {
        if let Ok(home) = std::env::var("HOME") {
            return std::path::PathBuf::from(home)
                .join("Library/Application Support/smart-home-dashboard");
        }
    }

    #[cfg(target_os = "linux")]
    {
        if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
            return std::path::PathBuf::from(xdg).join("smart-home-dashboard");
        }
        if let Ok(home) = std::env::var("HOME") {
            return std::path::PathBuf::from(home).join(".config/smart-home-dashboard");
        }
    }

    #[cfg(target_os = "windows")]
    {
        if let Ok(appdata) = std::env::var("APPDATA") {
            return std::path::PathBuf::from(appdata).join("smart-home-dashboard");
        }
    }

    std::path::PathBuf::from(".")
}

/// Load configuration: defaults, then `config.{toml,json,yaml}` in the
/// config directory, then `SHD_*` environment variables.
pub fn load_config() -> Result<Config> {
    let config_dir = get_config_dir();

    let mut builder = ::config::Config::builder()
        .set_default("port", default_port() as i64)?
        .set_default("ip", default_ip())?
        .add_source(
            ::config::File::with_name(&config_dir.join("config").to_string_lossy()).required(false),
        )
        // SHD_PORT, SHD_IP
        .add_source(
            ::config::Environment::with_prefix("SHD")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

    // Precedence: SHD_PORT > PORT > config file > default
    if std::env::var("SHD_PORT").is_err() {
        if let Ok(port) = std::env::var("PORT") {
            match port.parse::<u16>() {
                Ok(port_num) => builder = builder.set_override("port", port_num as i64)?,
                Err(_) => tracing::warn!("Ignoring invalid PORT value {:?}", port),
            }
        }
    }

    let config = builder.build()?;

    Ok(config.try_deserialize()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;

    fn clear_env() {
        env::remove_var("SHD_PORT");
        env::remove_var("SHD_IP");
        env::remove_var("PORT");
        env::set_var("SHD_CONFIG_DIR", "/tmp/shd-test-nonexistent");
    }

    #[test]
    #[serial]
    fn test_defaults_without_file_or_env() {
        clear_env();

        let config = load_config().expect("config should load");
        env::remove_var("SHD_CONFIG_DIR");

        assert_eq!(config.port, 8080);
        assert_eq!(config.ip, "0.0.0.0");
    }

    #[test]
    #[serial]
    fn test_plain_port_fallback() {
        clear_env();
        env::set_var("PORT", "9090");

        let config = load_config().expect("config should load");
        env::remove_var("PORT");
        env::remove_var("SHD_CONFIG_DIR");

        assert_eq!(config.port, 9090);
    }

    #[test]
    #[serial]
    fn test_prefixed_env_wins_over_port() {
        clear_env();
        env::set_var("PORT", "9090");
        env::set_var("SHD_PORT", "7070");
        env::set_var("SHD_IP", "127.0.0.1");

        let config = load_config().expect("config should load");
        clear_env();
        env::remove_var("SHD_CONFIG_DIR");

        assert_eq!(config.port, 7070);
        assert_eq!(config.ip, "127.0.0.1");
    }

    #[test]
    #[serial]
    fn test_single_underscore_prefix_is_read() {
        clear_env();
        env::set_var("SHD_IP", "10.0.0.5");
        env::set_var("SHD__IP", "10.0.0.9");

        let config = load_config().expect("config should load");
        env::remove_var("SHD__IP");
        clear_env();
        env::remove_var("SHD_CONFIG_DIR");

        assert_eq!(config.ip, "10.0.0.5");
        assert_eq!(config.port, 8080);
    }

    #[test]
    #[serial]
    fn test_invalid_port_is_ignored() {
        clear_env();
        env::set_var("PORT", "not-a-port");

        let config = load_config().expect("config should load");
        env::remove_var("PORT");
        env::remove_var("SHD_CONFIG_DIR");

        assert_eq!(config.port, 8080);
    }

    #[test]
    #[serial]
    fn test_config_dir_override() {
        env::set_var("SHD_CONFIG_DIR", "/tmp/shd-custom");
        let dir = get_config_dir();
        env::remove_var("SHD_CONFIG_DIR");

        assert_eq!(dir, std::path::PathBuf::from("/tmp/shd-custom"));
    }
}
