// SPDX-License-Identifier: GPL-2.0
//
// Copyright (c) 2024-2025 Vladislav Nepogodin <vnepogodin@cachyos.org>

// This software may be used and distributed according to the terms of the
// GNU General Public License version 2.

use std::thread::sleep;
use std::time::Duration;
use std::time::Instant;

use crate::kernel::KernelStateReader;

pub const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Receives the currently running scheduler on every poll.
pub trait DisplaySink {
    fn show_running(&mut self, label: &str);
}

impl<F: FnMut(&str)> DisplaySink for F {
    fn show_running(&mut self, label: &str) {
        self(label)
    }
}

/// Refreshes the running scheduler display at a fixed cadence. Works
/// without scx_loader, since it only reads what the kernel reports.
pub struct PollingController<S: DisplaySink> {
    reader: KernelStateReader,
    sink: S,
    interval: Duration,
}

impl<S: DisplaySink> PollingController<S> {
    pub fn new(reader: KernelStateReader, sink: S) -> Self {
        Self {
            reader,
            sink,
            interval: POLL_INTERVAL,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn tick(&mut self) {
        let label = self.reader.read_current_scheduler();
        self.sink.show_running(&label);
    }

    /// Ticks right away and then once per interval until `should_exit`
    /// returns true. Ticks are scheduled against a fixed deadline so a slow
    /// read does not shift the following ones.
    pub fn run(&mut self, mut should_exit: impl FnMut() -> bool) {
        let mut next = Instant::now();
        loop {
            self.tick();
            if should_exit() {
                break;
            }

            next += self.interval;
            let now = Instant::now();
            if next > now {
                sleep(next - now);
            } else {
                next = now;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_tick_follows_kernel_state() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("state"), "disabled\n").unwrap();

        let mut seen = Vec::new();
        let mut poller = PollingController::new(KernelStateReader::new(tmp.path()), |label: &str| {
            seen.push(label.to_owned())
        });
        poller.tick();

        fs::write(tmp.path().join("state"), "enabled\n").unwrap();
        fs::create_dir(tmp.path().join("root")).unwrap();
        fs::write(tmp.path().join("root/ops"), "scx_bpfland\n").unwrap();
        poller.tick();
        drop(poller);

        assert_eq!(seen, vec!["disabled", "scx_bpfland"]);
    }

    #[test]
    fn test_run_until_exit() {
        let tmp = TempDir::new().unwrap();
        let mut ticks = 0;
        let mut poller =
            PollingController::new(KernelStateReader::new(tmp.path()), |_: &str| ticks += 1)
                .with_interval(Duration::from_millis(1));

        let mut checks = 0;
        poller.run(|| {
            checks += 1;
            checks == 3
        });
        drop(poller);

        assert_eq!(ticks, 3);
    }
}
