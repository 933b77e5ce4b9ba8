//! `corepm.toml` configuration and directory layout.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use corepm_registry::HttpOptions;

use crate::exit::{ExitCode, WithExitCode};

/// Configuration file name looked up in the working and data directories.
pub const CONFIG_FILE: &str = "corepm.toml";

/// The top-level configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Where indexes and downloads live.
    #[serde(default)]
    pub directories: DirectoriesConfig,
    /// HTTP client settings.
    #[serde(default)]
    pub network: NetworkConfig,
}

/// Directories section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DirectoriesConfig {
    /// Data directory holding `package_index.json` (default `~/.corepm`).
    #[serde(default)]
    pub data: Option<PathBuf>,
    /// Download cache (default `<data>/staging`).
    #[serde(default)]
    pub downloads: Option<PathBuf>,
}

/// Network section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkConfig {
    #[serde(default)]
    pub user_agent: Option<String>,
    /// Proxy URL applied to every request.
    #[serde(default)]
    pub proxy: Option<String>,
}

/// Directories and client settings after defaults and overrides are applied.
#[derive(Debug, Clone)]
pub struct Settings {
    pub data_dir: PathBuf,
    pub downloads_dir: PathBuf,
    pub http: HttpOptions,
}

impl Config {
    /// Parse a configuration from a TOML string.
    pub fn parse(s: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    /// Locate and load the configuration file.
    ///
    /// An `explicit` path must exist. Otherwise `./corepm.toml` and then
    /// `~/.corepm/corepm.toml` are tried, and defaults apply when neither
    /// exists.
    pub fn load(explicit: Option<&Path>, cwd: &Path, home: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => {
                if !path.is_file() {
                    return Err(anyhow::anyhow!(
                        "configuration file {} not found",
                        path.display()
                    ))
                    .exit_code(ExitCode::NoConfigFile);
                }
                Some(path.to_path_buf())
            }
            None => candidates(cwd, home).into_iter().find(|p| p.is_file()),
        };

        let Some(path) = path else {
            tracing::debug!("no configuration file, using defaults");
            return Ok(Config::default());
        };

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("reading {}", path.display()))
            .exit_code(ExitCode::CoreConfig)?;
        let config = Config::parse(&content)
            .with_context(|| format!("parsing {}", path.display()))
            .exit_code(ExitCode::CoreConfig)?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Apply defaults and a command-line data directory override.
    pub fn settings(&self, data_dir_override: Option<&Path>, home: Option<&Path>) -> Result<Settings> {
        let data_dir = match (data_dir_override, &self.directories.data, home) {
            (Some(dir), _, _) => dir.to_path_buf(),
            (None, Some(dir), _) => dir.clone(),
            (None, None, Some(home)) => default_data_dir(home),
            (None, None, None) => {
                return Err(anyhow::anyhow!(
                    "cannot determine the data directory: no home directory; set --data-dir"
                ))
                .exit_code(ExitCode::CoreConfig);
            }
        };
        let downloads_dir = self
            .directories
            .downloads
            .clone()
            .unwrap_or_else(|| data_dir.join("staging"));

        let mut http = HttpOptions::default();
        if let Some(user_agent) = &self.network.user_agent {
            http.user_agent = user_agent.clone();
        }
        http.proxy = self.network.proxy.clone();

        Ok(Settings {
            data_dir,
            downloads_dir,
            http,
        })
    }
}

/// `~/.corepm`.
pub fn default_data_dir(home: &Path) -> PathBuf {
    home.join(".corepm")
}

fn candidates(cwd: &Path, home: Option<&Path>) -> Vec<PathBuf> {
    let mut paths = vec![cwd.join(CONFIG_FILE)];
    if let Some(home) = home {
        paths.push(default_data_dir(home).join(CONFIG_FILE));
    }
    paths
}
