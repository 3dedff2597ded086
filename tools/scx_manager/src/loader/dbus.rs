// SPDX-License-Identifier: GPL-2.0
//
// Copyright (c) 2024-2025 Vladislav Nepogodin <vnepogodin@cachyos.org>

// This software may be used and distributed according to the terms of the
// GNU General Public License version 2.

use anyhow::Context;
use anyhow::Result;
use zbus::blocking::Connection;
use zbus::proxy;

use crate::loader::SchedulerSwitch;

#[proxy(
    interface = "org.scx.Loader",
    default_service = "org.scx.Loader",
    default_path = "/org/scx/Loader"
)]
pub trait LoaderClient {
    /// Stops the currently running scheduler.
    fn stop_scheduler(&self) -> zbus::Result<()>;

    /// Stops the currently running scheduler (if any) and then starts the
    /// given one in the given mode.
    fn switch_scheduler(&self, scx_name: &str, sched_mode: u32) -> zbus::Result<()>;

    /// Stops the currently running scheduler (if any) and then starts the
    /// given one with the given arguments.
    fn switch_scheduler_with_args(&self, scx_name: &str, scx_args: &[String]) -> zbus::Result<()>;

    /// Name of the running scheduler, "unknown" if none is active.
    #[zbus(property)]
    fn current_scheduler(&self) -> zbus::Result<String>;

    /// Mode of the running scheduler, 0 (Auto) if none is active.
    #[zbus(property)]
    fn scheduler_mode(&self) -> zbus::Result<u32>;

    #[zbus(property)]
    fn supported_schedulers(&self) -> zbus::Result<Vec<String>>;
}

/// Connects to scx_loader on the system bus.
pub fn connect() -> Result<LoaderClientProxyBlocking<'static>> {
    let connection = Connection::system().context("Failed to connect to the system bus")?;
    LoaderClientProxyBlocking::new(&connection).context("Failed to reach scx_loader")
}

pub fn switch_scheduler(client: &LoaderClientProxyBlocking<'_>, switch: &SchedulerSwitch) -> Result<()> {
    match switch {
        SchedulerSwitch::Mode(scx_sched, sched_mode) => {
            client.switch_scheduler(scx_sched.as_str(), sched_mode.ordinal())?
        }
        SchedulerSwitch::Args(scx_sched, scx_args) => {
            client.switch_scheduler_with_args(scx_sched.as_str(), scx_args)?
        }
    }
    Ok(())
}
