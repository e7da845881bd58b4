use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use launch_core::{DEFAULT_SE_BIN, FileSettings, LaunchConfig, LaunchError, LogLevel, parse_config};
use tracing::debug;

pub const ENV_EXP_NAME: &str = "ECE_EXP_NAME";
pub const ENV_BASE_DIR: &str = "ECE_BASE_DIR";
pub const ENV_PLATFORM: &str = "ECE_PLATFORM";
pub const ENV_LOGLEVEL: &str = "ECE_LOGLEVEL";
pub const ENV_SE_BIN: &str = "SE_BIN";

const CONFIG_FILE_NAME: &str = "launch.toml";

/// Values given on the command line; they win over env and file.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub exp_name: Option<String>,
    pub base_dir: Option<String>,
    pub platform: Option<String>,
    pub loglevel: Option<String>,
    pub se_bin: Option<String>,
    pub config: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchSettings {
    pub exp_name: String,
    pub base_dir: PathBuf,
    pub platform: String,
    pub log_level: LogLevel,
    pub se_bin: String,
}

impl LaunchSettings {
    pub fn launch_config(&self) -> Result<LaunchConfig, LaunchError> {
        Ok(
            LaunchConfig::new(self.exp_name.clone(), self.base_dir.clone(), self.platform.clone())?
                .with_log_level(self.log_level),
        )
    }
}

pub fn resolve(overrides: Overrides, env: impl Fn(&str) -> Option<String>) -> Result<LaunchSettings> {
    let file = load_file_settings(overrides.config.as_deref())?;
    resolve_with(overrides, file, env)
}

fn resolve_with(
    overrides: Overrides,
    file: FileSettings,
    env: impl Fn(&str) -> Option<String>,
) -> Result<LaunchSettings> {
    // No defaults for the identifiers: a launch must name what it runs.
    let exp_name = pick(overrides.exp_name, env(ENV_EXP_NAME), file.exp_name)
        .with_context(|| missing("experiment name", "--exp-name", ENV_EXP_NAME))?;
    let base_dir = pick(overrides.base_dir, env(ENV_BASE_DIR), file.base_dir)
        .with_context(|| missing("base directory", "--base-dir", ENV_BASE_DIR))?;
    let platform = pick(overrides.platform, env(ENV_PLATFORM), file.platform)
        .with_context(|| missing("platform", "--platform", ENV_PLATFORM))?;

    let log_level = match pick(overrides.loglevel, env(ENV_LOGLEVEL), file.loglevel) {
        Some(value) => value.parse::<LogLevel>()?,
        None => LogLevel::default(),
    };
    let se_bin = pick(overrides.se_bin, env(ENV_SE_BIN), file.se_bin)
        .unwrap_or_else(|| DEFAULT_SE_BIN.to_string());

    Ok(LaunchSettings {
        exp_name,
        base_dir: PathBuf::from(base_dir),
        platform,
        log_level,
        se_bin,
    })
}

fn load_file_settings(explicit: Option<&Path>) -> Result<FileSettings> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => match discover_config(Path::new("."), dirs::config_dir()) {
            Some(path) => path,
            None => return Ok(FileSettings::default()),
        },
    };

    debug!("loading launcher settings from {}", path.display());
    let text = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let file = parse_config(&text).with_context(|| format!("failed to parse {}", path.display()))?;
    Ok(file.launch.unwrap_or_default())
}

/// `<cwd>/launch.toml` first, then `<config dir>/ece-launch/launch.toml`.
fn discover_config(cwd: &Path, config_dir: Option<PathBuf>) -> Option<PathBuf> {
    let local = cwd.join(CONFIG_FILE_NAME);
    if local.is_file() {
        return Some(local);
    }
    config_dir
        .map(|base| base.join("ece-launch").join(CONFIG_FILE_NAME))
        .filter(|path| path.is_file())
}

fn pick(flag: Option<String>, env: Option<String>, file: Option<String>) -> Option<String> {
    normalize_optional(flag)
        .or_else(|| normalize_optional(env))
        .or_else(|| normalize_optional(file))
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value.and_then(|val| {
        let trimmed = val.trim().to_string();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed)
        }
    })
}

fn missing(what: &str, flag: &str, env: &str) -> String {
    format!("{what} is required (pass {flag} or set {env})")
}
