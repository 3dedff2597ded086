// SPDX-License-Identifier: GPL-2.0
//
// Copyright (c) 2024-2025 Vladislav Nepogodin <vnepogodin@cachyos.org>

// This software may be used and distributed according to the terms of the
// GNU General Public License version 2.

//! Client side of scx_loader: its configuration file, its D-Bus service and
//! the systemd units around it.

pub mod config;
pub mod dbus;
mod system;

use std::env;
use std::path::Path;
use std::str::FromStr;

use anyhow::anyhow;
use anyhow::Context;
use anyhow::Result;
use serde::Deserialize;
use serde::Serialize;
use tempfile::NamedTempFile;

use crate::SchedMode;

/// Operations the manager needs from scx_loader.
///
/// Every call may fail; callers decide how failures surface.
pub trait ConfigHandle {
    /// Schedulers scx_loader is able to start.
    fn list_supported_schedulers(&self) -> Result<Vec<String>>;

    /// Flags used for `scx_name` in the mode with the given ordinal.
    fn get_scx_flags_for_mode(&self, scx_name: &str, sched_mode: u32) -> Result<Vec<String>>;

    /// Switches to `scx_name` and makes it the default scheduler, persisting
    /// the result to `config_path`.
    fn apply_scheduler_change(
        &mut self,
        scx_name: &str,
        sched_mode: u32,
        extra_flags: &str,
        config_path: &str,
    ) -> Result<()>;

    /// Disables auto start of scheduler, and stops current scheduler.
    fn disable_scheduler(&mut self, config_path: &str) -> Result<()>;

    /// Scheduler scx_loader currently manages, "unknown" if none.
    fn get_current_sched(&self) -> Result<String>;

    /// Ordinal of the mode scx_loader currently runs.
    fn get_current_mode(&self) -> Result<u32>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SupportedSched {
    #[serde(rename = "scx_bpfland")]
    Bpfland,
    #[serde(rename = "scx_flash")]
    Flash,
    #[serde(rename = "scx_lavd")]
    Lavd,
    #[serde(rename = "scx_p2dq")]
    P2DQ,
    #[serde(rename = "scx_rusty")]
    Rusty,
    #[serde(rename = "scx_tickless")]
    Tickless,
}

impl SupportedSched {
    pub const ALL: [SupportedSched; 6] = [
        SupportedSched::Bpfland,
        SupportedSched::Flash,
        SupportedSched::Lavd,
        SupportedSched::P2DQ,
        SupportedSched::Rusty,
        SupportedSched::Tickless,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SupportedSched::Bpfland => "scx_bpfland",
            SupportedSched::Flash => "scx_flash",
            SupportedSched::Lavd => "scx_lavd",
            SupportedSched::P2DQ => "scx_p2dq",
            SupportedSched::Rusty => "scx_rusty",
            SupportedSched::Tickless => "scx_tickless",
        }
    }
}

impl FromStr for SupportedSched {
    type Err = anyhow::Error;

    fn from_str(scx_name: &str) -> Result<SupportedSched> {
        SupportedSched::ALL
            .into_iter()
            .find(|sched| sched.as_str() == scx_name)
            .ok_or_else(|| anyhow!("{scx_name} is not supported"))
    }
}

/// How a scheduler change is requested from scx_loader.
#[derive(Debug, Clone, PartialEq)]
pub enum SchedulerSwitch {
    /// Arguments match the mode preset, let scx_loader pick them.
    Mode(SupportedSched, SchedMode),
    /// Custom arguments.
    Args(SupportedSched, Vec<String>),
}

impl SchedulerSwitch {
    pub fn new(
        scx_sched: SupportedSched,
        sched_mode: SchedMode,
        sched_args: &[String],
        default_args: &[String],
    ) -> SchedulerSwitch {
        if sched_args == default_args {
            SchedulerSwitch::Mode(scx_sched, sched_mode)
        } else {
            SchedulerSwitch::Args(scx_sched, sched_args.to_vec())
        }
    }
}

/// Splits the user supplied flags text into scheduler arguments.
pub fn split_extra_flags(extra_flags: &str) -> Vec<String> {
    extra_flags.split_whitespace().map(String::from).collect()
}

fn sched_mode_from_raw(sched_mode: u32) -> Result<SchedMode> {
    SchedMode::try_from_ordinal(sched_mode)
        .ok_or_else(|| anyhow!("SchedMode with such value doesn't exist: {sched_mode}"))
}

/// [`ConfigHandle`] talking to the system scx_loader service.
pub struct LoaderConfigHandle {
    config: config::Config,
}

impl LoaderConfigHandle {
    /// Initialize config from config path, if the file doesn't exist config
    /// with default values is used.
    pub fn init_config(config_path: &str) -> Result<LoaderConfigHandle> {
        let config =
            config::init_config(Path::new(config_path)).context("Failed to initialize config")?;
        Ok(LoaderConfigHandle { config })
    }

    // Staged under the temp dir and copied in place with root permissions.
    fn stage_config(&self) -> Result<NamedTempFile> {
        self.config
            .stage_config_file(&env::temp_dir())
            .context("Cannot write scx_loader config to file")
    }

    fn stage_and_install(&self, config_path: &str) -> Result<()> {
        let staged = self.stage_config()?;
        system::install_config(staged.path(), Path::new(config_path))
    }
}

impl ConfigHandle for LoaderConfigHandle {
    fn list_supported_schedulers(&self) -> Result<Vec<String>> {
        Ok(dbus::connect()?.supported_schedulers()?)
    }

    fn get_scx_flags_for_mode(&self, scx_name: &str, sched_mode: u32) -> Result<Vec<String>> {
        let scx_sched: SupportedSched = scx_name.parse()?;
        let sched_mode = sched_mode_from_raw(sched_mode)?;
        Ok(self.config.scx_flags_for_mode(scx_sched, sched_mode))
    }

    fn apply_scheduler_change(
        &mut self,
        scx_name: &str,
        sched_mode: u32,
        extra_flags: &str,
        config_path: &str,
    ) -> Result<()> {
        // scx.service would fight scx_loader over the scheduler
        system::disable_scx_service();

        let default_args = self.get_scx_flags_for_mode(scx_name, sched_mode)?;
        let scx_sched: SupportedSched = scx_name.parse()?;
        let sched_mode = sched_mode_from_raw(sched_mode)?;
        let sched_args = split_extra_flags(extra_flags);

        let switch = SchedulerSwitch::new(scx_sched, sched_mode, &sched_args, &default_args);
        match &switch {
            SchedulerSwitch::Mode(..) => {
                log::info!("Applying scx '{scx_name}' with mode {sched_mode:?}")
            }
            SchedulerSwitch::Args(_, args) => {
                log::info!("Applying scx '{scx_name}' with args: {}", args.join(" "))
            }
        }
        if let Err(e) = dbus::connect().and_then(|client| dbus::switch_scheduler(&client, &switch))
        {
            log::error!("Failed to switch '{scx_name}': {e:#}");
        }

        if !system::is_unit_enabled("scx_loader") {
            log::info!("Enabling scx_loader service");
            if let Err(e) =
                system::spawn_child_process("/usr/bin/systemctl", &["enable", "-f", "scx_loader"])
            {
                log::warn!("{e:#}");
            }
        }

        self.config
            .stage_scheduler_change(scx_sched, sched_mode, sched_args, &default_args);
        self.stage_and_install(config_path)
    }

    fn disable_scheduler(&mut self, config_path: &str) -> Result<()> {
        self.config.clear_default_sched();
        let staged = self.stage_config()?;

        dbus::connect()?
            .stop_scheduler()
            .context("Cannot disable scx_loader")?;

        system::install_config(staged.path(), Path::new(config_path))
    }

    fn get_current_sched(&self) -> Result<String> {
        Ok(dbus::connect()?.current_scheduler()?)
    }

    fn get_current_mode(&self) -> Result<u32> {
        Ok(dbus::connect()?.scheduler_mode()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supported_sched_names() {
        for sched in SupportedSched::ALL {
            assert_eq!(sched.as_str().parse::<SupportedSched>().unwrap(), sched);
        }
        assert!("scx_unknown".parse::<SupportedSched>().is_err());
        assert!("bpfland".parse::<SupportedSched>().is_err());
    }

    #[test]
    fn test_split_extra_flags() {
        assert!(split_extra_flags("").is_empty());
        assert!(split_extra_flags("   ").is_empty());
        assert_eq!(
            split_extra_flags("-m  performance -w"),
            vec!["-m", "performance", "-w"]
        );
    }

    #[test]
    fn test_switch_uses_mode_for_preset_args() {
        let defaults = vec!["--performance".to_owned()];
        assert_eq!(
            SchedulerSwitch::new(SupportedSched::Lavd, SchedMode::Gaming, &defaults, &defaults),
            SchedulerSwitch::Mode(SupportedSched::Lavd, SchedMode::Gaming)
        );

        let custom = vec!["--performance".to_owned(), "--slice-max-us".to_owned()];
        assert_eq!(
            SchedulerSwitch::new(SupportedSched::Lavd, SchedMode::Gaming, &custom, &defaults),
            SchedulerSwitch::Args(SupportedSched::Lavd, custom.clone())
        );
    }

    #[test]
    fn test_flags_for_unknown_input() {
        let handle = LoaderConfigHandle {
            config: config::default_config(),
        };
        assert!(handle.get_scx_flags_for_mode("scx_unknown", 0).is_err());
        assert!(handle.get_scx_flags_for_mode("scx_lavd", 5).is_err());
        assert_eq!(
            handle.get_scx_flags_for_mode("scx_lavd", 1).unwrap(),
            vec!["--performance"]
        );
        assert!(handle.get_scx_flags_for_mode("scx_rusty", 1).unwrap().is_empty());
    }
}
