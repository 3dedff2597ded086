// SPDX-License-Identifier: GPL-2.0
//
// Copyright (c) 2024-2025 Vladislav Nepogodin <vnepogodin@cachyos.org>

// This software may be used and distributed according to the terms of the
// GNU General Public License version 2.

use std::path::Path;
use std::process::Command;
use std::process::Stdio;

use anyhow::bail;
use anyhow::Context;
use anyhow::Result;

/// Output of `systemctl <verb> <unit>`, `None` if it didn't succeed.
fn systemctl_query(verb: &str, unit: &str) -> Option<String> {
    let output = Command::new("systemctl")
        .args([verb, unit])
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }

    Some(String::from_utf8_lossy(&output.stdout).trim_end().to_owned())
}

pub fn is_unit_enabled(unit: &str) -> bool {
    systemctl_query("is-enabled", unit).as_deref() == Some("enabled")
}

fn is_unit_active(unit: &str) -> bool {
    systemctl_query("is-active", unit).as_deref() == Some("active")
}

pub fn spawn_child_process(cmd: &str, args: &[&str]) -> Result<()> {
    let status = Command::new(cmd)
        .args(args)
        .status()
        .with_context(|| format!("Failed to execute {cmd}"))?;

    if !status.success() {
        bail!("{cmd} {} failed with {status}", args.join(" "));
    }
    Ok(())
}

/// Stops the legacy scx.service, if it is in use.
pub fn disable_scx_service() {
    let res = if is_unit_enabled("scx") {
        log::info!("Disabling scx service");
        spawn_child_process("/usr/bin/systemctl", &["disable", "--now", "-f", "scx"])
    } else if is_unit_active("scx") {
        log::info!("Stopping scx service");
        spawn_child_process("/usr/bin/systemctl", &["stop", "-f", "scx"])
    } else {
        Ok(())
    };

    if let Err(e) = res {
        log::warn!("{e:#}");
    }
}

/// Copies the staged config over `config_path` with root permissions.
pub fn install_config(staged: &Path, config_path: &Path) -> Result<()> {
    let (Some(staged), Some(config_path)) = (staged.to_str(), config_path.to_str()) else {
        bail!("Config paths must be valid UTF-8");
    };

    spawn_child_process("/usr/bin/pkexec", &["/usr/bin/cp", staged, config_path])
        .context("Cannot install scx_loader config")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_child_process_status() {
        assert!(spawn_child_process("true", &[]).is_ok());
        assert!(spawn_child_process("false", &[]).is_err());
        assert!(spawn_child_process("/nonexistent/binary", &[]).is_err());
    }
}
