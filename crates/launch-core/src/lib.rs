//! Building and running the `se` command line for an EC-Earth 4 experiment.

mod config;
mod errors;
mod launch;
mod runner;

pub use crate::config::{FileSettings, LaunchConfig, LauncherFile, LogLevel, parse_config};
pub use crate::errors::LaunchError;
pub use crate::launch::{
    DEFAULT_SE_BIN, LaunchPlan, SCRIPTLIB_MAIN, SeCommand, ToolCommand, USER_CONFIG,
    derive_launch_plan,
};
pub use crate::runner::{ExitOutcome, run_plan};
