// SPDX-License-Identifier: GPL-2.0
//
// Copyright (c) 2024-2025 Vladislav Nepogodin <vnepogodin@cachyos.org>

// This software may be used and distributed according to the terms of the
// GNU General Public License version 2.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

use anyhow::bail;
use anyhow::Context;
use anyhow::Result;
use serde::Deserialize;
use serde::Serialize;
use tempfile::NamedTempFile;

use crate::loader::SupportedSched;
use crate::SchedMode;

/// In-memory form of the scx_loader TOML configuration.
#[derive(Debug, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub default_sched: Option<SupportedSched>,
    pub default_mode: Option<SchedMode>,
    pub scheds: BTreeMap<String, Sched>,
}

/// Per-mode flag overrides of one scheduler.
#[derive(Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Sched {
    pub auto_mode: Option<Vec<String>>,
    pub gaming_mode: Option<Vec<String>>,
    pub lowlatency_mode: Option<Vec<String>>,
    pub powersave_mode: Option<Vec<String>>,
    pub server_mode: Option<Vec<String>>,
}

impl Sched {
    fn mode_flags(&self, sched_mode: SchedMode) -> Option<&Vec<String>> {
        match sched_mode {
            SchedMode::Auto => self.auto_mode.as_ref(),
            SchedMode::Gaming => self.gaming_mode.as_ref(),
            SchedMode::PowerSave => self.powersave_mode.as_ref(),
            SchedMode::LowLatency => self.lowlatency_mode.as_ref(),
            SchedMode::Server => self.server_mode.as_ref(),
        }
    }

    fn mode_flags_mut(&mut self, sched_mode: SchedMode) -> &mut Option<Vec<String>> {
        match sched_mode {
            SchedMode::Auto => &mut self.auto_mode,
            SchedMode::Gaming => &mut self.gaming_mode,
            SchedMode::PowerSave => &mut self.powersave_mode,
            SchedMode::LowLatency => &mut self.lowlatency_mode,
            SchedMode::Server => &mut self.server_mode,
        }
    }

    fn with_defaults(scx_sched: SupportedSched) -> Sched {
        let mut sched = Sched::default();
        for sched_mode in SchedMode::ALL {
            *sched.mode_flags_mut(sched_mode) = Some(default_scx_flags(scx_sched, sched_mode));
        }
        sched
    }
}

impl Config {
    /// Flags scx_loader would start `scx_sched` with in `sched_mode`. Falls
    /// back to the built-in presets when the config has no entry for them.
    pub fn scx_flags_for_mode(&self, scx_sched: SupportedSched, sched_mode: SchedMode) -> Vec<String> {
        self.scheds
            .get(scx_sched.as_str())
            .and_then(|sched| sched.mode_flags(sched_mode))
            .cloned()
            .unwrap_or_else(|| default_scx_flags(scx_sched, sched_mode))
    }

    /// Records `scx_sched` in `sched_mode` as the scheduler to auto start.
    /// `sched_args` are only stored when they differ from `default_args`, so
    /// untouched presets keep following scx_loader's defaults.
    pub fn stage_scheduler_change(
        &mut self,
        scx_sched: SupportedSched,
        sched_mode: SchedMode,
        sched_args: Vec<String>,
        default_args: &[String],
    ) {
        self.default_sched = Some(scx_sched);
        self.default_mode = Some(sched_mode);

        if sched_args != default_args {
            let sched = self.scheds.entry(scx_sched.as_str().to_owned()).or_default();
            *sched.mode_flags_mut(sched_mode) = Some(sched_args);
        }
    }

    /// Stops scx_loader from starting any scheduler on boot.
    pub fn clear_default_sched(&mut self) {
        self.default_sched = None;
    }

    pub fn write_config<W: Write>(&self, out: &mut W) -> Result<()> {
        let toml_content = toml::to_string(self)?;
        out.write_all(toml_content.as_bytes())?;
        out.flush()?;
        Ok(())
    }

    /// Writes the config to a newly created, world readable file in `dir`.
    /// The file is removed once the returned handle is dropped.
    pub fn stage_config_file(&self, dir: &Path) -> Result<NamedTempFile> {
        let mut staged = tempfile::Builder::new()
            .prefix("scx_loader")
            .suffix(".toml")
            .tempfile_in(dir)
            .with_context(|| format!("Failed to create staging file in {}", dir.display()))?;
        staged
            .as_file()
            .set_permissions(fs::Permissions::from_mode(0o644))?;
        self.write_config(&mut staged)
            .with_context(|| format!("Failed to write {}", staged.path().display()))?;
        Ok(staged)
    }
}

/// Parse the config at `config_path`, or use the defaults if there is none.
pub fn init_config(config_path: &Path) -> Result<Config> {
    if config_path.exists() {
        parse_config_file(config_path)
    } else {
        log::debug!("{} not found, using default config", config_path.display());
        Ok(default_config())
    }
}

pub fn parse_config_file(filepath: &Path) -> Result<Config> {
    let file_content = fs::read_to_string(filepath)
        .with_context(|| format!("Failed to read {}", filepath.display()))?;
    parse_config_content(&file_content)
}

fn parse_config_content(file_content: &str) -> Result<Config> {
    if file_content.is_empty() {
        bail!("The config file is empty!")
    }
    let config: Config = toml::from_str(file_content)?;
    Ok(config)
}

pub fn default_config() -> Config {
    Config {
        default_sched: None,
        default_mode: Some(SchedMode::Auto),
        scheds: SupportedSched::ALL
            .iter()
            .map(|&scx_sched| (scx_sched.as_str().to_owned(), Sched::with_defaults(scx_sched)))
            .collect(),
    }
}

/// Built-in flag presets of every scheduler.
fn default_scx_flags(scx_sched: SupportedSched, sched_mode: SchedMode) -> Vec<String> {
    let flags: &[&str] = match scx_sched {
        SupportedSched::Bpfland => match sched_mode {
            SchedMode::Gaming => &["-m", "performance"],
            SchedMode::LowLatency => &["-s", "5000", "-S", "500", "-l", "5000", "-m", "performance"],
            SchedMode::PowerSave => &["-m", "powersave"],
            SchedMode::Server => &["-p"],
            SchedMode::Auto => &[],
        },
        SupportedSched::Lavd => match sched_mode {
            SchedMode::Gaming | SchedMode::LowLatency => &["--performance"],
            SchedMode::PowerSave => &["--powersave"],
            SchedMode::Server | SchedMode::Auto => &[],
        },
        SupportedSched::P2DQ => match sched_mode {
            SchedMode::LowLatency => &["-y"],
            SchedMode::Server => &["--keep-running"],
            SchedMode::Gaming | SchedMode::PowerSave | SchedMode::Auto => &[],
        },
        SupportedSched::Tickless => match sched_mode {
            SchedMode::Gaming => &["-f", "5000", "-s", "5000"],
            SchedMode::LowLatency => &["-f", "5000", "-s", "1000"],
            SchedMode::PowerSave => &["-f", "50", "-p"],
            SchedMode::Server => &["-f", "100"],
            SchedMode::Auto => &[],
        },
        // no mode presets
        SupportedSched::Flash | SupportedSched::Rusty => &[],
    };
    flags.iter().map(|&flag| flag.to_owned()).collect()
}
