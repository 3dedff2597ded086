// SPDX-License-Identifier: GPL-2.0
//
// Copyright (c) 2024-2025 Vladislav Nepogodin <vnepogodin@cachyos.org>

// This software may be used and distributed according to the terms of the
// GNU General Public License version 2.

//! Headless model of the sched_ext manager window.
//!
//! It keeps everything the window shows (scheduler and mode selection, flags
//! text, which controls are visible, the running scheduler label) and runs
//! the same transitions, leaving only rendering to a front-end.

use crate::kernel::KernelStateReader;
use crate::loader::ConfigHandle;
use crate::mode::mode_from_name;
use crate::policy::supports_profiles;
use crate::session::ConfigSession;
use crate::SchedMode;

pub const INIT_FAILED_NOTICE: &str = "Cannot initialize scx_loader configuration";
pub const LOADER_UNAVAILABLE_NOTICE: &str = "Cannot get information from scx_loader!\nIs it working?\nThis is needed for the app to work properly";
pub const FLAGS_FAILED_NOTICE: &str = "Cannot get scx flags from scx_loader configuration!";
pub const DISABLE_FAILED_NOTICE: &str = "Cannot disable scx_loader";

/// Receives user visible notices, one per failed action.
pub trait Notifier {
    fn notify(&mut self, message: &str);

    /// Apply and disable controls are switched off for the duration of the
    /// daemon call and back on once it returns.
    fn set_controls_enabled(&mut self, _enabled: bool) {}
}

impl<F: FnMut(&str)> Notifier for F {
    fn notify(&mut self, message: &str) {
        self(message)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelState {
    /// The configuration could not be loaded. Only the running scheduler
    /// label is maintained.
    Failed,
    /// scx_loader did not answer; scheduler management is hidden.
    Unavailable,
    Ready,
}

pub struct SchedExtPanel<H: ConfigHandle, N: Notifier> {
    session: Option<ConfigSession<H>>,
    reader: KernelStateReader,
    notifier: N,
    config_path: String,
    state: PanelState,

    schedulers: Vec<String>,
    selected_sched: String,
    selected_mode: SchedMode,
    flags_text: String,
    profiles_visible: bool,
    running: String,
}

impl<H: ConfigHandle, N: Notifier> SchedExtPanel<H, N> {
    pub fn new(
        session: Option<ConfigSession<H>>,
        reader: KernelStateReader,
        config_path: &str,
        notifier: N,
    ) -> Self {
        let running = reader.read_current_scheduler();
        let mut panel = Self {
            session,
            reader,
            notifier,
            config_path: config_path.to_owned(),
            state: PanelState::Failed,
            schedulers: Vec::new(),
            selected_sched: String::new(),
            selected_mode: SchedMode::Auto,
            flags_text: String::new(),
            profiles_visible: false,
            running,
        };
        panel.load();
        panel
    }

    fn load(&mut self) {
        let Some(session) = &self.session else {
            self.notifier.notify(INIT_FAILED_NOTICE);
            return;
        };

        let Some(schedulers) = session.list_supported_schedulers() else {
            self.state = PanelState::Unavailable;
            self.notifier.notify(LOADER_UNAVAILABLE_NOTICE);
            return;
        };

        let current_sched = session.current_scheduler();
        let current_mode = session.current_mode();

        self.selected_sched = schedulers.first().cloned().unwrap_or_default();
        if let Some(current_sched) = current_sched {
            if schedulers.contains(&current_sched) {
                self.selected_sched = current_sched;
            }
        }
        if let Some(current_mode) = current_mode {
            self.selected_mode = current_mode;
        }
        self.schedulers = schedulers;
        self.state = PanelState::Ready;

        self.on_sched_changed();
    }

    /// Selects another scheduler. Returns false if it isn't one scx_loader
    /// supports or the panel isn't usable.
    pub fn select_scheduler(&mut self, scheduler: &str) -> bool {
        if self.state != PanelState::Ready || !self.schedulers.iter().any(|s| s == scheduler) {
            return false;
        }
        self.selected_sched = scheduler.to_owned();
        self.on_sched_changed();
        true
    }

    pub fn select_mode(&mut self, mode: SchedMode) {
        if self.state != PanelState::Ready {
            return;
        }
        self.selected_mode = mode;
        self.refresh_flags();
    }

    /// Selects a mode by its selector label.
    pub fn select_profile(&mut self, label: &str) {
        self.select_mode(mode_from_name(label));
    }

    pub fn set_flags_text(&mut self, flags: &str) {
        self.flags_text = flags.to_owned();
    }

    // Visibility and flags always move together with the scheduler.
    fn on_sched_changed(&mut self) {
        self.profiles_visible = supports_profiles(&self.selected_sched);
        self.refresh_flags();
    }

    fn refresh_flags(&mut self) {
        let Some(session) = &self.session else {
            return;
        };

        match session.flags_for(&self.selected_sched, self.selected_mode) {
            Some(flags) => self.flags_text = flags.join(" "),
            None => {
                self.notifier.notify(FLAGS_FAILED_NOTICE);
                self.flags_text.clear();
            }
        }
    }

    /// Commits the current selection. Nothing displayed changes on failure.
    pub fn apply(&mut self) -> bool {
        if self.state != PanelState::Ready {
            return false;
        }
        let Some(session) = self.session.as_mut() else {
            return false;
        };

        self.notifier.set_controls_enabled(false);
        let extra_flags = self.flags_text.trim();
        let applied = session.apply(
            &self.selected_sched,
            self.selected_mode,
            extra_flags,
            &self.config_path,
        );
        if !applied {
            self.notifier.notify(&format!(
                "Cannot set default scx scheduler with mode! Scheduler {} with mode {}",
                self.selected_sched,
                self.selected_mode.label()
            ));
        }
        self.notifier.set_controls_enabled(true);
        applied
    }

    pub fn disable(&mut self) -> bool {
        if self.state != PanelState::Ready {
            return false;
        }
        let Some(session) = self.session.as_mut() else {
            return false;
        };

        self.notifier.set_controls_enabled(false);
        let disabled = session.disable(&self.config_path);
        if !disabled {
            self.notifier.notify(DISABLE_FAILED_NOTICE);
        }
        self.notifier.set_controls_enabled(true);
        disabled
    }

    /// Rereads the running scheduler from the kernel.
    pub fn refresh_running(&mut self) {
        self.running = self.reader.read_current_scheduler();
    }

    pub fn set_running(&mut self, label: &str) {
        label.clone_into(&mut self.running);
    }

    pub fn state(&self) -> PanelState {
        self.state
    }

    /// Whether the scheduler, mode and flags controls are shown.
    pub fn controls_visible(&self) -> bool {
        self.state == PanelState::Ready
    }

    /// Whether the mode selector is shown.
    pub fn profiles_visible(&self) -> bool {
        self.controls_visible() && self.profiles_visible
    }

    pub fn schedulers(&self) -> &[String] {
        &self.schedulers
    }

    pub fn selected_scheduler(&self) -> &str {
        &self.selected_sched
    }

    pub fn selected_mode(&self) -> SchedMode {
        self.selected_mode
    }

    pub fn flags_text(&self) -> &str {
        &self.flags_text
    }

    pub fn running(&self) -> &str {
        &self.running
    }
}
