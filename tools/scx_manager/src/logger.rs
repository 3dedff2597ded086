// SPDX-License-Identifier: GPL-2.0
//
// Copyright (c) 2024-2025 Vladislav Nepogodin <vnepogodin@cachyos.org>

// This software may be used and distributed according to the terms of the
// GNU General Public License version 2.

use std::env;

use colored::Colorize;
use log::Level;
use log::LevelFilter;
use log::Metadata;
use log::Record;

struct StderrLogger;

static LOGGER: StderrLogger = StderrLogger;

impl log::Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let level_str = match record.level() {
            Level::Error => "[ERROR]".red(),
            Level::Warn => "[WARN]".yellow(),
            Level::Info => "[INFO]".green(),
            Level::Debug => "[DEBUG]".white(),
            Level::Trace => "[TRACE]".dimmed(),
        };
        // stdout carries command output
        eprintln!("{level_str}: {}", record.args());
    }

    fn flush(&self) {}
}

fn level_from_env(env_log: Option<&str>, verbose: u8) -> LevelFilter {
    let from_env = match env_log.map(str::to_lowercase).as_deref() {
        Some("trace") => LevelFilter::Trace,
        Some("debug") => LevelFilter::Debug,
        Some("info") => LevelFilter::Info,
        Some("error") => LevelFilter::Error,
        Some("off") => LevelFilter::Off,
        _ => LevelFilter::Warn,
    };
    let from_verbose = match verbose {
        0 => LevelFilter::Off,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    from_env.max(from_verbose)
}

/// Installs the logger. `RUST_LOG` sets the level, each `-v` raises it.
pub fn init_logger(verbose: u8) -> Result<(), log::SetLoggerError> {
    let max_log_level = level_from_env(env::var("RUST_LOG").ok().as_deref(), verbose);
    log::set_logger(&LOGGER).map(|()| log::set_max_level(max_log_level))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_from_env() {
        assert_eq!(level_from_env(None, 0), LevelFilter::Warn);
        assert_eq!(level_from_env(Some("DEBUG"), 0), LevelFilter::Debug);
        assert_eq!(level_from_env(Some("bogus"), 0), LevelFilter::Warn);
        assert_eq!(level_from_env(Some("error"), 2), LevelFilter::Debug);
        assert_eq!(level_from_env(None, 5), LevelFilter::Trace);
    }

    #[test]
    fn test_init_logger_installs_once() {
        init_logger(1).expect("Failed to initialize logger");
        assert!(log::max_level() >= LevelFilter::Info);
        assert!(init_logger(1).is_err());
    }
}
