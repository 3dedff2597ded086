// SPDX-License-Identifier: GPL-2.0
//
// Copyright (c) 2024-2025 Vladislav Nepogodin <vnepogodin@cachyos.org>

// This software may be used and distributed according to the terms of the
// GNU General Public License version 2.

mod cli;
mod logger;

use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use anyhow::bail;
use anyhow::Context;
use anyhow::Result;
use clap::Parser;
use cli::{ApplyArgs, Cli, Commands};
use colored::Colorize;
use scx_manager::ConfigSession;
use scx_manager::KernelStateReader;
use scx_manager::LoaderConfigHandle;
use scx_manager::PanelState;
use scx_manager::PollingController;
use scx_manager::SchedExtPanel;
use scx_manager::SchedMode;

type Panel = SchedExtPanel<LoaderConfigHandle, fn(&str)>;

fn print_notice(msg: &str) {
    eprintln!("{} {msg}", "error:".red().bold());
}

fn open_panel(config_path: &str) -> Result<Panel> {
    let session = ConfigSession::init(config_path);
    let panel = SchedExtPanel::new(
        session,
        KernelStateReader::default(),
        config_path,
        print_notice as fn(&str),
    );
    match panel.state() {
        PanelState::Ready => Ok(panel),
        PanelState::Failed => bail!("scx_loader configuration at {config_path} is unusable"),
        PanelState::Unavailable => bail!("scx_loader is not reachable"),
    }
}

fn open_session(config_path: &str) -> Result<ConfigSession<LoaderConfigHandle>> {
    ConfigSession::init(config_path)
        .with_context(|| format!("Cannot initialize scx_loader configuration {config_path}"))
}

fn cmd_status(config_path: &str) -> Result<()> {
    let running = KernelStateReader::default().read_current_scheduler();
    println!("kernel: {}", if running.is_empty() { "n/a" } else { running.as_str() });

    let session = open_session(config_path)?;
    match (session.current_scheduler(), session.current_mode()) {
        (Some(sched), _) if sched == "unknown" => println!("scx_loader: no scheduler running"),
        (Some(sched), Some(mode)) => println!("scx_loader: {sched} in {} mode", mode.as_str()),
        (Some(sched), None) => println!("scx_loader: {sched}"),
        (None, _) => bail!("scx_loader is not reachable"),
    }
    Ok(())
}

fn cmd_watch() -> Result<()> {
    let shutdown = Arc::new(AtomicBool::new(false));
    let shutdown_clone = shutdown.clone();
    ctrlc::set_handler(move || {
        shutdown_clone.store(true, Ordering::Relaxed);
    })
    .context("Error setting Ctrl-C handler")?;

    let mut last: Option<String> = None;
    let mut poller = PollingController::new(KernelStateReader::default(), |label: &str| {
        if last.as_deref() != Some(label) {
            println!("{}", if label.is_empty() { "n/a" } else { label });
            last = Some(label.to_owned());
        }
    });
    poller.run(|| shutdown.load(Ordering::Relaxed));
    Ok(())
}

fn cmd_list(config_path: &str) -> Result<()> {
    let panel = open_panel(config_path)?;
    for sched in panel.schedulers() {
        println!("{sched}");
    }
    Ok(())
}

fn cmd_flags(config_path: &str, sched: &str, mode: SchedMode) -> Result<()> {
    let session = open_session(config_path)?;
    let Some(flags) = session.flags_for(sched, mode) else {
        bail!("Cannot get scx flags for {sched} in {} mode", mode.as_str());
    };
    println!("{}", flags.join(" "));
    Ok(())
}

fn cmd_apply(config_path: &str, args: ApplyArgs) -> Result<()> {
    let mut panel = open_panel(config_path)?;

    if let Some(sched) = &args.sched {
        if !panel.select_scheduler(sched) {
            bail!(
                "invalid scheduler '{sched}', supported schedulers: {}",
                panel.schedulers().join(", ")
            );
        }
    }
    if let Some(mode) = args.mode {
        panel.select_mode(mode);
    }
    if let Some(flags) = &args.flags {
        panel.set_flags_text(flags);
    }

    if !panel.apply() {
        bail!("Failed to apply {}", panel.selected_scheduler());
    }
    println!(
        "applied {} in {} mode{}",
        panel.selected_scheduler(),
        panel.selected_mode().as_str(),
        match panel.flags_text().trim() {
            "" => String::new(),
            flags => format!(" with flags \"{flags}\""),
        }
    );
    Ok(())
}

fn cmd_disable(config_path: &str) -> Result<()> {
    let mut panel = open_panel(config_path)?;
    if !panel.disable() {
        bail!("Failed to disable scx_loader");
    }
    println!("disabled");
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logger::init_logger(cli.verbose).expect("Failed to initialize logger");

    match cli.command {
        Commands::Status => cmd_status(&cli.config),
        Commands::Watch => cmd_watch(),
        Commands::List => cmd_list(&cli.config),
        Commands::Flags { sched, mode } => cmd_flags(&cli.config, &sched, mode),
        Commands::Apply { args } => cmd_apply(&cli.config, args),
        Commands::Disable => cmd_disable(&cli.config),
    }
}
