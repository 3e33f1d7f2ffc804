/// Wrappers around the host package manager and service manager.
///
/// Every call is synchronous and blocking. Installs stream their output to
/// the operator's terminal; queries capture it for parsing. A nonzero exit
/// becomes an error carrying the command's description. Nothing is retried
/// and nothing is rolled back.
use std::process::Command;

use anyhow::{anyhow, Context, Result};
use log::debug;

/// Runs an external command with stdio passed through to the terminal.
pub fn run(desc: &str, program: &str, args: &[&str]) -> Result<()> {
    debug!("running: {} {}", program, args.join(" "));

    let status = Command::new(program)
        .args(args)
        .status()
        .with_context(|| format!("failed to start {}", desc))?;

    if !status.success() {
        return Err(anyhow!("{} failed ({})", desc, status));
    }

    Ok(())
}

/// Runs an external command and captures stdout for parsing.
pub fn run_captured(desc: &str, program: &str, args: &[&str]) -> Result<String> {
    debug!("running: {} {}", program, args.join(" "));

    let output = Command::new(program)
        .args(args)
        .output()
        .with_context(|| format!("failed to start {}", desc))?;

    if !output.status.success() {
        return Err(anyhow!("{} failed ({})", desc, output.status));
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Runs a multi-line script through `sh -c`, stdio passed through.
pub fn run_shell(desc: &str, script: &str) -> Result<()> {
    run(desc, "sh", &["-c", script])
}

pub fn apt_install(packages: &[String]) -> Result<()> {
    let mut args = vec!["install", "-y"];
    args.extend(packages.iter().map(|package| package.as_str()));

    run("package install", "apt-get", &args)
}

pub fn apt_remove(packages: &[String]) -> Result<()> {
    let mut args = vec!["remove", "-y"];
    args.extend(packages.iter().map(|package| package.as_str()));

    run("package removal", "apt-get", &args)
}

/// Searches the package index. Output is captured, not streamed.
pub fn apt_search(pattern: &str) -> Result<String> {
    run_captured("package search", "apt-cache", &["search", pattern])
}

pub fn start_service(service: &str) -> Result<()> {
    run(
        &format!("start of service {}", service),
        "systemctl",
        &["start", service],
    )
}

pub fn stop_service(service: &str) -> Result<()> {
    run(
        &format!("stop of service {}", service),
        "systemctl",
        &["stop", service],
    )
}

pub fn enable_service(service: &str) -> Result<()> {
    run(
        &format!("enable of service {}", service),
        "systemctl",
        &["enable", service],
    )
}

pub fn disable_service(service: &str) -> Result<()> {
    run(
        &format!("disable of service {}", service),
        "systemctl",
        &["disable", service],
    )
}

pub fn restart_service(service: &str) -> Result<()> {
    run(
        &format!("restart of service {}", service),
        "systemctl",
        &["restart", service],
    )
}

pub fn reload_service(service: &str) -> Result<()> {
    run(
        &format!("reload of service {}", service),
        "systemctl",
        &["reload", service],
    )
}
