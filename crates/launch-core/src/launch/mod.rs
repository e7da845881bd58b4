use crate::LaunchConfig;

mod plan;
pub use plan::LaunchPlan;

pub const DEFAULT_SE_BIN: &str = "se";
pub const USER_CONFIG: &str = "user-config.yml";
pub const SCRIPTLIB_MAIN: &str = "scriptlib/main.yml";

/// An external tool that can be driven from a [`LaunchConfig`].
pub trait ToolCommand {
    fn program(&self) -> &str;

    fn build_argument_list(&self, config: &LaunchConfig) -> Vec<String>;
}

/// ScriptEngine: merges the platform, experiment, user and scriptlib
/// YAML files in order and runs the result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeCommand {
    program: String,
}

impl SeCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for SeCommand {
    fn default() -> Self {
        Self::new(DEFAULT_SE_BIN)
    }
}

impl ToolCommand for SeCommand {
    fn program(&self) -> &str {
        &self.program
    }

    fn build_argument_list(&self, config: &LaunchConfig) -> Vec<String> {
        vec![
            config.platform_file().to_string_lossy().to_string(),
            config.experiment_file(),
            USER_CONFIG.to_string(),
            SCRIPTLIB_MAIN.to_string(),
            "--loglevel".to_string(),
            config.log_level().to_string(),
        ]
    }
}

pub fn derive_launch_plan(tool: &dyn ToolCommand, config: &LaunchConfig) -> LaunchPlan {
    LaunchPlan {
        program: tool.program().to_string(),
        argv: tool.build_argument_list(config),
    }
}
