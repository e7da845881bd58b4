use std::fmt;
use std::process::ExitStatus;

use tokio::process::Command;
use tracing::{debug, info};

use crate::{LaunchError, LaunchPlan};

/// How the launched tool finished. A non-zero exit is an outcome, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitOutcome {
    Exited(i32),
    Signaled(i32),
}

impl ExitOutcome {
    pub fn from_status(status: ExitStatus) -> Option<Self> {
        if let Some(code) = status.code() {
            return Some(ExitOutcome::Exited(code));
        }
        #[cfg(unix)]
        {
            use std::os::unix::process::ExitStatusExt;
            if let Some(signal) = status.signal() {
                return Some(ExitOutcome::Signaled(signal));
            }
        }
        None
    }

    pub fn success(&self) -> bool {
        matches!(self, ExitOutcome::Exited(0))
    }

    /// Code the launcher exits with; signals follow the shell's `128 + n`.
    pub fn exit_code(&self) -> i32 {
        match *self {
            ExitOutcome::Exited(code) => code,
            ExitOutcome::Signaled(signal) => 128 + signal,
        }
    }
}

impl fmt::Display for ExitOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitOutcome::Exited(code) => write!(f, "exit code {code}"),
            ExitOutcome::Signaled(signal) => write!(f, "signal {signal}"),
        }
    }
}

/// Spawns the plan in the current directory and environment and waits for it.
/// Standard streams are inherited, so the tool's own output goes straight
/// to the terminal.
pub async fn run_plan(plan: &LaunchPlan) -> Result<ExitOutcome, LaunchError> {
    info!(command = %plan.command_line(), "launching");

    let mut child = Command::new(&plan.program)
        .args(&plan.argv)
        .spawn()
        .map_err(|err| LaunchError::spawn(&plan.program, err))?;
    debug!(pid = child.id(), "spawned {}", plan.program);

    let status = child
        .wait()
        .await
        .map_err(|err| LaunchError::wait(&plan.program, err))?;

    ExitOutcome::from_status(status).ok_or_else(|| LaunchError::UnknownStatus {
        program: plan.program.clone(),
    })
}
