//! Subcommand implementations.

pub mod classify;
pub mod config;
pub mod models;
pub mod serve;

use std::path::{Path, PathBuf};

use landmark_core::Config;

/// Load the config from `path`, or from the default location when unset.
///
/// An explicit path must exist; the default location may be absent.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    match path {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("Config file not found: {}", path.display());
            }
            Ok(Config::load_from(path)?)
        }
        None => Ok(Config::load()?),
    }
}

/// The config file location in effect.
pub fn config_path(path: Option<&Path>) -> PathBuf {
    path.map(Path::to_path_buf)
        .unwrap_or_else(Config::default_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_config_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[server]\nport = 8080\n").unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "0.0.0.0");
    }

    #[test]
    fn test_load_config_missing_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }

    #[test]
    fn test_config_path_prefers_explicit() {
        let explicit = Path::new("/tmp/landmark.toml");
        assert_eq!(config_path(Some(explicit)), explicit);
        assert_eq!(config_path(None), Config::default_path());
    }
}
