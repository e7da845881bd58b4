use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;

use crate::LaunchError;

/// Levels understood by `se --loglevel`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    #[default]
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warning => "warning",
            LogLevel::Error => "error",
            LogLevel::Critical => "critical",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = LaunchError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warning),
            "error" => Ok(LogLevel::Error),
            "critical" => Ok(LogLevel::Critical),
            _ => Err(LaunchError::InvalidLogLevel(value.to_string())),
        }
    }
}

/// Parameters for one `se` invocation.
///
/// The source directory is never stored: it is always `base_dir/sources/se`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchConfig {
    exp_name: String,
    base_dir: PathBuf,
    platform: String,
    log_level: LogLevel,
}

impl LaunchConfig {
    /// Blank identifiers are rejected here rather than producing `.yml`
    /// or `platforms/.yml` on the command line.
    pub fn new(
        exp_name: impl Into<String>,
        base_dir: impl Into<PathBuf>,
        platform: impl Into<String>,
    ) -> Result<Self, LaunchError> {
        let exp_name = require("exp_name", exp_name.into())?;
        let platform = require("platform", platform.into())?;
        let base_dir = base_dir.into();
        if base_dir.as_os_str().is_empty() {
            return Err(LaunchError::EmptyParameter("base_dir"));
        }

        Ok(Self {
            exp_name,
            base_dir,
            platform,
            log_level: LogLevel::default(),
        })
    }

    pub fn with_log_level(mut self, log_level: LogLevel) -> Self {
        self.log_level = log_level;
        self
    }

    pub fn exp_name(&self) -> &str {
        &self.exp_name
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn platform(&self) -> &str {
        &self.platform
    }

    pub fn log_level(&self) -> LogLevel {
        self.log_level
    }

    pub fn source_dir(&self) -> PathBuf {
        self.base_dir.join("sources").join("se")
    }

    pub fn platform_file(&self) -> PathBuf {
        self.source_dir()
            .join("platforms")
            .join(format!("{}.yml", self.platform))
    }

    pub fn experiment_file(&self) -> String {
        format!("{}.yml", self.exp_name)
    }
}

fn require(name: &'static str, value: String) -> Result<String, LaunchError> {
    if value.trim().is_empty() {
        return Err(LaunchError::EmptyParameter(name));
    }
    Ok(value)
}

/// On-disk launcher settings (`launch.toml`).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LauncherFile {
    pub launch: Option<FileSettings>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileSettings {
    pub exp_name: Option<String>,
    pub base_dir: Option<String>,
    pub platform: Option<String>,
    pub loglevel: Option<String>,
    pub se_bin: Option<String>,
}

pub fn parse_config(contents: &str) -> Result<LauncherFile, LaunchError> {
    toml::from_str(contents).map_err(|err| LaunchError::InvalidConfig(err.to_string()))
}
