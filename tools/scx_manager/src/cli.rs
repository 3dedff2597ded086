// SPDX-License-Identifier: GPL-2.0
//
// Copyright (c) 2024-2025 Vladislav Nepogodin <vnepogodin@cachyos.org>

// This software may be used and distributed according to the terms of the
// GNU General Public License version 2.

use clap::{Parser, Subcommand};
use scx_manager::SchedMode;
use scx_manager::DEFAULT_CONFIG_PATH;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[arg(
        short,
        long,
        env = "SCX_LOADER_CONFIG",
        default_value = DEFAULT_CONFIG_PATH,
        help = "scx_loader configuration file"
    )]
    pub config: String,

    #[arg(short, long, action = clap::ArgAction::Count, help = "Increase log verbosity")]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Parser, Debug)]
pub struct ApplyArgs {
    #[arg(short, long, help = "Scheduler to apply")]
    pub sched: Option<String>,
    #[arg(short, long, help = "Mode to apply [auto, gaming, powersave, lowlatency, server]")]
    pub mode: Option<SchedMode>,
    #[arg(
        short,
        long,
        allow_hyphen_values = true,
        help = "Flags to run the scheduler with, defaults to the mode preset"
    )]
    pub flags: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(about = "Show the running scheduler and the one scx_loader manages")]
    Status,
    #[command(about = "Follow the running scheduler reported by the kernel")]
    Watch,
    #[command(about = "List all supported schedulers")]
    List,
    #[command(about = "Print the flags of a scheduler in a mode")]
    Flags {
        #[arg(short, long, help = "Scheduler to query")]
        sched: String,
        #[arg(short, long, default_value = "auto", help = "Mode to query")]
        mode: SchedMode,
    },
    #[command(about = "Make a scheduler the default and switch to it")]
    Apply {
        #[clap(flatten)]
        args: ApplyArgs,
    },
    #[command(about = "Stop the scheduler and disable its auto start")]
    Disable,
}
