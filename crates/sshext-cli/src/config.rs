//! CLI configuration at `~/.sshext/config.toml`.
//!
//! Names the host key files and the extension settings. CLI flags always
//! override config file values.

use anyhow::{Context, Result};
use serde::Deserialize;
use sshext_core::ExtensionConfig;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Top-level config file structure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub extensions: ExtensionConfig,

    #[serde(default)]
    pub host_keys: HostKeysSection,
}

/// `[host_keys]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HostKeysSection {
    /// OpenSSH private key files, announced in this order.
    #[serde(default)]
    pub paths: Vec<PathBuf>,
}

impl Config {
    /// Load configuration from a TOML file, returning defaults if the file
    /// does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "config file not found, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config at {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("failed to parse config at {}", path.display()))?;

        debug!(path = %path.display(), keys = config.host_keys.paths.len(), "loaded config");
        Ok(config)
    }

    /// Host key paths: CLI flags if any were given, the config file otherwise.
    pub fn host_key_paths(&self, cli_keys: &[PathBuf]) -> Result<Vec<PathBuf>> {
        let paths = if cli_keys.is_empty() {
            self.host_keys.paths.iter().map(|p| expand_tilde(p)).collect()
        } else {
            cli_keys.to_vec()
        };

        if paths.is_empty() {
            anyhow::bail!("no host keys configured; pass --key or set [host_keys] paths");
        }
        Ok(paths)
    }

    /// Host key paths for the server-side commands (`announce`, `prove`).
    ///
    /// Fails when `[extensions] host_key_rotation = false`: such a server
    /// neither announces nor proves its keys.
    pub fn rotation_key_paths(&self, cli_keys: &[PathBuf]) -> Result<Vec<PathBuf>> {
        if !self.extensions.host_key_rotation {
            anyhow::bail!("host key rotation is disabled in [extensions]");
        }
        self.host_key_paths(cli_keys)
    }
}

/// Default config location (`~/.sshext/config.toml`).
pub fn default_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_default()
        .join(".sshext")
        .join("config.toml")
}

/// Expand a leading `~/` to the home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => dirs::home_dir().unwrap_or_default().join(rest),
        Err(_) => path.to_path_buf(),
    }
}
