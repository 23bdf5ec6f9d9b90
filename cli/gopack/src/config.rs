//! Optional `gopack.toml` configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Configuration file name, looked up in the project directory only.
pub const CONFIG_FILE: &str = "gopack.toml";

/// Environment variable overriding the toolchain program.
pub const GO_ENV: &str = "GOPACK_GO";

/// The top-level configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GopackConfig {
    /// Toolchain settings.
    #[serde(default)]
    pub toolchain: ToolchainConfig,
}

/// Toolchain section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ToolchainConfig {
    /// Program used for `install` and `version -m`.
    #[serde(default = "default_go")]
    pub go: PathBuf,
}

impl Default for ToolchainConfig {
    fn default() -> Self {
        ToolchainConfig { go: default_go() }
    }
}

fn default_go() -> PathBuf {
    PathBuf::from("go")
}

impl GopackConfig {
    /// Load `gopack.toml` from `project_dir`, or defaults if there is none.
    pub fn load(project_dir: &Path) -> Result<Self> {
        let path = project_dir.join(CONFIG_FILE);
        if !path.is_file() {
            return Ok(GopackConfig::default());
        }
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("reading {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))
    }

    /// Parse a configuration from a TOML string.
    #[cfg(test)]
    pub fn from_str(s: &str) -> Result<Self> {
        toml::from_str(s).context("parsing gopack.toml")
    }

    /// The toolchain program, with `override_go` (from `GOPACK_GO`) winning.
    pub fn go_program(&self, override_go: Option<PathBuf>) -> PathBuf {
        override_go
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| self.toolchain.go.clone())
    }
}
