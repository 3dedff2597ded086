// SPDX-License-Identifier: GPL-2.0
//
// Copyright (c) 2024-2025 Vladislav Nepogodin <vnepogodin@cachyos.org>

// This software may be used and distributed according to the terms of the
// GNU General Public License version 2.

use anyhow::Result;

use crate::loader::ConfigHandle;
use crate::loader::LoaderConfigHandle;
use crate::mode::mode_from_ordinal;
use crate::SchedMode;

/// Live connection to scx_loader configuration.
///
/// No error leaves this type: every failed call is logged and reported as
/// `None` or `false`. A session only exists if its handle was created, so a
/// failed initialization is final.
pub struct ConfigSession<H: ConfigHandle> {
    handle: H,
}

impl ConfigSession<LoaderConfigHandle> {
    pub fn init(config_path: &str) -> Option<Self> {
        Self::init_with(config_path, LoaderConfigHandle::init_config)
    }
}

impl<H: ConfigHandle> ConfigSession<H> {
    pub fn init_with<F>(config_path: &str, init: F) -> Option<Self>
    where
        F: FnOnce(&str) -> Result<H>,
    {
        match init(config_path) {
            Ok(handle) => Some(Self { handle }),
            Err(e) => {
                log::error!("Failed to parse init config: {e:#}");
                None
            }
        }
    }

    pub fn from_handle(handle: H) -> Self {
        Self { handle }
    }

    pub fn handle(&self) -> &H {
        &self.handle
    }

    pub fn list_supported_schedulers(&self) -> Option<Vec<String>> {
        quiet(
            "get supported schedulers",
            self.handle.list_supported_schedulers(),
        )
    }

    /// Scheduler scx_loader is configured to run. This may differ from what
    /// the kernel reports.
    pub fn current_scheduler(&self) -> Option<String> {
        quiet(
            "get currently running scx scheduler",
            self.handle.get_current_sched(),
        )
    }

    pub fn current_mode(&self) -> Option<SchedMode> {
        quiet(
            "get currently running scx mode",
            self.handle.get_current_mode(),
        )
        .map(mode_from_ordinal)
    }

    /// Flags implied by `scheduler` in `mode`. An empty list means none.
    pub fn flags_for(&self, scheduler: &str, mode: SchedMode) -> Option<Vec<String>> {
        quiet(
            "get scx flag for the mode",
            self.handle.get_scx_flags_for_mode(scheduler, mode.ordinal()),
        )
    }

    pub fn apply(
        &mut self,
        scheduler: &str,
        mode: SchedMode,
        extra_flags: &str,
        config_path: &str,
    ) -> bool {
        let res = self.handle.apply_scheduler_change(
            scheduler,
            mode.ordinal(),
            extra_flags,
            config_path,
        );
        quiet("apply scx scheduler change", res).is_some()
    }

    pub fn disable(&mut self, config_path: &str) -> bool {
        quiet(
            "disable scx scheduler",
            self.handle.disable_scheduler(config_path),
        )
        .is_some()
    }
}

fn quiet<T>(action: &str, res: Result<T>) -> Option<T> {
    match res {
        Ok(v) => Some(v),
        Err(e) => {
            log::error!("Failed to {action}: {e:#}");
            None
        }
    }
}
