// SPDX-License-Identifier: GPL-2.0
//
// Copyright (c) 2024-2025 Vladislav Nepogodin <vnepogodin@cachyos.org>

// This software may be used and distributed according to the terms of the
// GNU General Public License version 2.

use std::fs::File;
use std::io::BufRead;
use std::io::BufReader;
use std::path::Path;
use std::path::PathBuf;

pub const SCHED_EXT_SYSFS_ROOT: &str = "/sys/kernel/sched_ext";

/// sched_ext state as reported by the kernel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KernelSchedState {
    /// State file holds something other than "enabled", possibly nothing.
    Disabled(String),
    Enabled(String),
    /// Enabled, but no ops name is exposed.
    EnabledUnknown,
}

impl KernelSchedState {
    /// Text shown as the currently running scheduler.
    pub fn label(&self) -> &str {
        match self {
            KernelSchedState::Disabled(state) => state,
            KernelSchedState::Enabled(ops) => ops,
            KernelSchedState::EnabledUnknown => "unknown",
        }
    }
}

/// Reads the running scheduler straight from sysfs, without going through
/// scx_loader.
#[derive(Debug, Clone)]
pub struct KernelStateReader {
    root: PathBuf,
}

impl Default for KernelStateReader {
    fn default() -> Self {
        Self::new(SCHED_EXT_SYSFS_ROOT)
    }
}

impl KernelStateReader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn state(&self) -> KernelSchedState {
        let state = read_kernel_file(&self.root.join("state"));
        if state != "enabled" {
            return KernelSchedState::Disabled(state);
        }

        let ops = read_kernel_file(&self.root.join("root").join("ops"));
        if ops.is_empty() {
            KernelSchedState::EnabledUnknown
        } else {
            KernelSchedState::Enabled(ops)
        }
    }

    /// Returns the attached scheduler, "unknown" when sched_ext is enabled
    /// without ops, or the raw state text otherwise ("disabled", "").
    pub fn read_current_scheduler(&self) -> String {
        self.state().label().to_owned()
    }
}

/// Returns the first line of a kernel file, or an empty string if it can't
/// be read.
fn read_kernel_file(path: &Path) -> String {
    let Ok(file) = File::open(path) else {
        return String::new();
    };

    let mut line = String::new();
    if let Err(e) = BufReader::new(file).read_line(&mut line) {
        log::debug!("Failed to read := '{}': {e}", path.display());
        return String::new();
    }
    if line.ends_with('\n') {
        line.pop();
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn sysfs(state: Option<&str>, ops: Option<&str>) -> TempDir {
        let tmp = TempDir::new().unwrap();
        if let Some(state) = state {
            fs::write(tmp.path().join("state"), state).unwrap();
        }
        if let Some(ops) = ops {
            fs::create_dir(tmp.path().join("root")).unwrap();
            fs::write(tmp.path().join("root/ops"), ops).unwrap();
        }
        tmp
    }

    #[test]
    fn test_disabled_skips_ops() {
        // ops is present but must not be consulted
        let tmp = sysfs(Some("disabled\n"), Some("scx_lavd\n"));
        let reader = KernelStateReader::new(tmp.path());
        assert_eq!(reader.read_current_scheduler(), "disabled");
        assert_eq!(reader.state(), KernelSchedState::Disabled("disabled".into()));
    }

    #[test]
    fn test_enabled_without_ops_name() {
        let tmp = sysfs(Some("enabled\n"), Some(""));
        let reader = KernelStateReader::new(tmp.path());
        assert_eq!(reader.read_current_scheduler(), "unknown");
        assert_eq!(reader.state(), KernelSchedState::EnabledUnknown);
    }

    #[test]
    fn test_enabled_with_ops_missing() {
        let tmp = sysfs(Some("enabled\n"), None);
        let reader = KernelStateReader::new(tmp.path());
        assert_eq!(reader.read_current_scheduler(), "unknown");
    }

    #[test]
    fn test_enabled_with_scheduler() {
        let tmp = sysfs(Some("enabled\n"), Some("scx_bpfland\n"));
        let reader = KernelStateReader::new(tmp.path());
        assert_eq!(reader.read_current_scheduler(), "scx_bpfland");
    }

    #[test]
    fn test_only_first_line_is_used() {
        let tmp = sysfs(Some("enabled\n"), Some("scx_lavd_1.0.0_g1234\nextra\n"));
        let reader = KernelStateReader::new(tmp.path());
        assert_eq!(reader.read_current_scheduler(), "scx_lavd_1.0.0_g1234");
    }

    #[test]
    fn test_missing_sysfs() {
        let tmp = TempDir::new().unwrap();
        let reader = KernelStateReader::new(tmp.path().join("nonexistent"));
        assert_eq!(reader.read_current_scheduler(), "");
    }

    #[test]
    fn test_empty_state() {
        let tmp = sysfs(Some(""), Some("scx_bpfland\n"));
        let reader = KernelStateReader::new(tmp.path());
        assert_eq!(reader.read_current_scheduler(), "");
    }
}
