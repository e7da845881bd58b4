#![cfg(unix)]

use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

const HPC2020: &str = "ecmwf-hpc2020-intel+openmpi";

/// Runs the launcher from `cwd` with no inherited ECE_* settings and no
/// per-user `launch.toml`.
fn launcher(cwd: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_ece-launch"));
    cmd.current_dir(cwd)
        .env_remove("ECE_EXP_NAME")
        .env_remove("ECE_BASE_DIR")
        .env_remove("ECE_PLATFORM")
        .env_remove("ECE_LOGLEVEL")
        .env_remove("SE_BIN")
        .env("XDG_CONFIG_HOME", cwd)
        .env("HOME", cwd);
    cmd
}

/// An installation root whose platform file is a shell script, so running
/// `sh` as the tool executes it with the remaining se arguments.
fn install_with_platform_script(platform: &str, script: &str) -> TempDir {
    let base = tempfile::tempdir().unwrap();
    let platforms = base.path().join("sources/se/platforms");
    std::fs::create_dir_all(&platforms).unwrap();
    std::fs::write(platforms.join(format!("{platform}.yml")), script).unwrap();
    base
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn dry_run_prints_the_se_command_line() {
    let cwd = tempfile::tempdir().unwrap();
    let output = launcher(cwd.path())
        .args(["--exp-name", "TEST", "--base-dir", "/opt/ece4", "--platform", HPC2020])
        .arg("--dry-run")
        .output()
        .unwrap();

    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "se /opt/ece4/sources/se/platforms/ecmwf-hpc2020-intel+openmpi.yml TEST.yml \
         user-config.yml scriptlib/main.yml --loglevel debug\n"
    );
}

#[test]
fn tool_exit_code_becomes_launcher_exit_code() {
    let cwd = tempfile::tempdir().unwrap();
    let base = install_with_platform_script("linux", "exit 3\n");
    let output = launcher(cwd.path())
        .args(["--exp-name", "TEST", "--platform", "linux", "--se-bin", "sh"])
        .arg("--base-dir")
        .arg(base.path())
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(3), "{}", stderr(&output));
}

#[test]
fn remaining_arguments_reach_the_tool() {
    let cwd = tempfile::tempdir().unwrap();
    let base = install_with_platform_script("linux", "echo \"$@\"\n");
    let output = launcher(cwd.path())
        .args(["--exp-name", "a001", "--platform", "linux", "--se-bin", "sh"])
        .args(["--loglevel", "info"])
        .arg("--base-dir")
        .arg(base.path())
        .output()
        .unwrap();

    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "a001.yml user-config.yml scriptlib/main.yml --loglevel info\n"
    );
}

#[test]
fn spawn_failure_is_reported_with_logging_off() {
    let cwd = tempfile::tempdir().unwrap();
    let output = launcher(cwd.path())
        .env("RUST_LOG", "off")
        .args(["--exp-name", "TEST", "--base-dir", "/opt/ece4", "--platform", HPC2020])
        .args(["--se-bin", "ece-launch-no-such-se"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(127));
    assert!(
        stderr(&output).contains("error: failed to spawn ece-launch-no-such-se"),
        "{}",
        stderr(&output)
    );
}

#[test]
fn spawn_failure_is_reported_when_only_library_logs_are_enabled() {
    let cwd = tempfile::tempdir().unwrap();
    let output = launcher(cwd.path())
        .env("RUST_LOG", "launch_core=debug")
        .args(["--exp-name", "TEST", "--base-dir", "/opt/ece4", "--platform", HPC2020])
        .args(["--se-bin", "ece-launch-no-such-se"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(127));
    assert!(stderr(&output).contains("error: failed to spawn"), "{}", stderr(&output));
}

#[test]
fn missing_experiment_name_is_reported() {
    let cwd = tempfile::tempdir().unwrap();
    let output = launcher(cwd.path())
        .env("RUST_LOG", "off")
        .args(["--base-dir", "/opt/ece4", "--platform", HPC2020])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let message = stderr(&output);
    assert!(message.starts_with("error: "), "{message}");
    assert!(message.contains("--exp-name"), "{message}");
    assert!(message.contains("ECE_EXP_NAME"), "{message}");
}

#[test]
fn redirected_logs_carry_no_color_codes() {
    let cwd = tempfile::tempdir().unwrap();
    let base = install_with_platform_script("linux", "exit 0\n");
    let output = launcher(cwd.path())
        .env("RUST_LOG", "info")
        .args(["--exp-name", "TEST", "--platform", "linux", "--se-bin", "sh"])
        .arg("--base-dir")
        .arg(base.path())
        .output()
        .unwrap();

    assert!(output.status.success());
    let logs = stderr(&output);
    assert!(logs.contains("launching"), "{logs}");
    assert!(!logs.contains('\u{1b}'), "{logs:?}");
}

#[test]
fn working_directory_launch_toml_supplies_settings() {
    let cwd = tempfile::tempdir().unwrap();
    std::fs::write(
        cwd.path().join("launch.toml"),
        format!("[launch]\nexp_name = \"TEST\"\nbase_dir = \"/opt/ece4\"\nplatform = \"{HPC2020}\"\n"),
    )
    .unwrap();
    let output = launcher(cwd.path())
        .args(["--dry-run", "--loglevel", "warning"])
        .output()
        .unwrap();

    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "se /opt/ece4/sources/se/platforms/ecmwf-hpc2020-intel+openmpi.yml TEST.yml \
         user-config.yml scriptlib/main.yml --loglevel warning\n"
    );
}
