use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use launch_core::{LaunchError, SeCommand, derive_launch_plan, run_plan};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod settings;

use settings::Overrides;

#[derive(Parser, Debug)]
#[command(name = "ece-launch", version)]
#[command(about = "Run an EC-Earth 4 experiment through ScriptEngine (se)", long_about = None)]
struct Cli {
    /// Experiment name; `<NAME>.yml` is handed to se [env: ECE_EXP_NAME]
    #[arg(long, value_name = "NAME")]
    exp_name: Option<String>,

    /// EC-Earth installation root; se lives in `<DIR>/sources/se` [env: ECE_BASE_DIR]
    #[arg(long, value_name = "DIR")]
    base_dir: Option<String>,

    /// Platform name, matching `platforms/<PLATFORM>.yml` [env: ECE_PLATFORM]
    #[arg(long, value_name = "PLATFORM")]
    platform: Option<String>,

    /// Log level passed to se [env: ECE_LOGLEVEL] [default: debug]
    #[arg(long, value_name = "LEVEL")]
    loglevel: Option<String>,

    /// se executable to run [env: SE_BIN] [default: se]
    #[arg(long, value_name = "PATH")]
    se_bin: Option<String>,

    /// Launcher settings file (defaults to ./launch.toml if present)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print the se command line instead of running it
    #[arg(long)]
    dry_run: bool,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            exp_name: self.exp_name.clone(),
            base_dir: self.base_dir.clone(),
            platform: self.platform.clone(),
            loglevel: self.loglevel.clone(),
            se_bin: self.se_bin.clone(),
            config: self.config.clone(),
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(std::io::stderr().is_terminal()),
        )
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let code = match run(cli).await {
        Ok(code) => code,
        Err(err) => {
            // Printed directly so it survives any RUST_LOG filter.
            eprintln!("error: {err:#}");
            failure_code(&err)
        }
    };
    ExitCode::from(process_exit_code(code))
}

async fn run(cli: Cli) -> Result<i32> {
    let settings = settings::resolve(cli.overrides(), |key| std::env::var(key).ok())?;
    let config = settings.launch_config()?;
    let plan = derive_launch_plan(&SeCommand::new(settings.se_bin.as_str()), &config);

    if cli.dry_run {
        println!("{}", plan.command_line());
        return Ok(0);
    }

    let outcome = run_plan(&plan).await?;
    if outcome.success() {
        info!("{} finished successfully", plan.program);
    } else {
        warn!("{} finished with {outcome}", plan.program);
    }
    Ok(outcome.exit_code())
}

fn failure_code(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<LaunchError>()
        .map(LaunchError::exit_code)
        .unwrap_or(1)
}

/// Codes outside `0..=255` can't be reported as-is; they become a plain failure.
fn process_exit_code(code: i32) -> u8 {
    u8::try_from(code).unwrap_or(1)
}
