// SPDX-License-Identifier: GPL-2.0
//
// Copyright (c) 2024-2025 Vladislav Nepogodin <vnepogodin@cachyos.org>

// This software may be used and distributed according to the terms of the
// GNU General Public License version 2.

//! # sched_ext scheduler manager
//!
//! Core of the sched_ext manager panel: discovers the scheduler the kernel
//! is running, and picks, configures and applies schedulers through the
//! [scx_loader](https://github.com/sched-ext/scx) service.
//!
//! [`ConfigSession`] is the entry point for scx_loader. It never returns
//! errors, failures are logged and surface as `None`/`false`.
//! [`SchedExtPanel`] keeps the state a manager window displays on top of it.

pub mod kernel;
pub mod loader;
pub mod mode;
pub mod panel;
pub mod poll;
pub mod policy;
pub mod session;

pub use kernel::KernelSchedState;
pub use kernel::KernelStateReader;
pub use loader::ConfigHandle;
pub use loader::LoaderConfigHandle;
pub use mode::SchedMode;
pub use panel::PanelState;
pub use panel::SchedExtPanel;
pub use poll::PollingController;
pub use session::ConfigSession;

/// scx_loader configuration edited by default.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/scx_loader.toml";
