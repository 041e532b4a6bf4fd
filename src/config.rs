//! Configuration management for authprobe

use crate::error::Result;
use crate::models::ProbeConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// File-based configuration structure matching authprobe.toml
#[derive(Debug, Deserialize)]
struct FileConfig {
    api: Option<ApiSection>,
    store: Option<StoreSection>,
    output: Option<OutputSection>,
}

#[derive(Debug, Deserialize)]
struct ApiSection {
    base_url: Option<String>,
    timeout_secs: Option<u64>,
    user_agent: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StoreSection {
    secrets_path: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
struct OutputSection {
    dir: Option<PathBuf>,
}

/// Loads configuration from a TOML file and merges with defaults
pub fn load_config(path: &Path) -> Result<ProbeConfig> {
    let content = std::fs::read_to_string(path)?;
    let file_config: FileConfig = toml::from_str(&content)?;

    let mut config = ProbeConfig::default();

    if let Some(api) = file_config.api {
        if let Some(base_url) = api.base_url {
            config.base_url = base_url;
        }
        if let Some(timeout) = api.timeout_secs {
            config.timeout_secs = timeout;
        }
        if let Some(ua) = api.user_agent {
            config.user_agent = ua;
        }
    }

    if let Some(store) = file_config.store {
        if let Some(path) = store.secrets_path {
            config.secrets_path = path;
        }
    }

    if let Some(output) = file_config.output {
        if let Some(dir) = output.dir {
            config.output_dir = dir;
        }
    }

    Ok(config)
}

/// Merges CLI arguments into an existing ProbeConfig
pub fn merge_cli_args(
    config: &mut ProbeConfig,
    base_url: Option<String>,
    timeout: Option<u64>,
    secrets: Option<PathBuf>,
    output_dir: Option<PathBuf>,
) {
    if let Some(u) = base_url {
        config.base_url = u;
    }
    if let Some(t) = timeout {
        config.timeout_secs = t;
    }
    if let Some(s) = secrets {
        config.secrets_path = s;
    }
    if let Some(d) = output_dir {
        config.output_dir = d;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn file_config_overrides_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
[api]
base_url = "https://api.example.com/v1"
timeout_secs = 5

[store]
secrets_path = "/tmp/probe-secrets.json"
"#
        )
        .unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.base_url, "https://api.example.com/v1");
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(
            config.secrets_path,
            PathBuf::from("/tmp/probe-secrets.json")
        );
        // untouched sections keep defaults
        assert_eq!(config.output_dir, PathBuf::from("."));
    }

    #[test]
    fn cli_args_take_precedence() {
        let mut config = ProbeConfig::default();
        merge_cli_args(
            &mut config,
            Some("http://127.0.0.1:9000/v1".to_string()),
            Some(3),
            None,
            None,
        );
        assert_eq!(config.base_url, "http://127.0.0.1:9000/v1");
        assert_eq!(config.timeout_secs, 3);
        assert_eq!(config.secrets_path, PathBuf::from("secrets.json"));
    }
}
