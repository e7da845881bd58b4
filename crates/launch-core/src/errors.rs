use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("missing required parameter: {0}")]
    EmptyParameter(&'static str),

    #[error("invalid log level {0:?} (expected debug, info, warning, error or critical)")]
    InvalidLogLevel(String),

    #[error("invalid launcher config: {0}")]
    InvalidConfig(String),

    #[error("failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to wait for {program}: {source}")]
    Wait {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("{program} terminated without an exit status")]
    UnknownStatus { program: String },
}

impl LaunchError {
    pub fn spawn(program: &str, source: io::Error) -> Self {
        Self::Spawn {
            program: program.to_string(),
            source,
        }
    }

    pub fn wait(program: &str, source: io::Error) -> Self {
        Self::Wait {
            program: program.to_string(),
            source,
        }
    }

    /// Exit code reported when the launcher fails before the tool could run.
    /// Mirrors the shell: 127 for a missing command, 126 for one that can't be executed.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Spawn { source, .. } if source.kind() == io::ErrorKind::NotFound => 127,
            Self::Spawn { source, .. } if source.kind() == io::ErrorKind::PermissionDenied => 126,
            _ => 1,
        }
    }
}
