// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! # Bagcodec CLI
//!
//! Command-line tool for ROS1 interface files and bag recordings.
//!
//! ## Usage
//!
//! ```sh
//! # Compile interface files to Rust source
//! bagcodec generate msgs/ --out-dir gen/
//!
//! # Show bag information
//! bagcodec inspect info recording.bag
//!
//! # List topics
//! bagcodec inspect topics recording.bag
//!
//! # Dump one field over time
//! bagcodec query timeseries recording.bag /odom pose.position.x
//! ```

mod cmd;
mod common;

use std::process;

use clap::{Parser, Subcommand};
use cmd::{GenerateCmd, InspectCmd, QueryCmd};
use common::Result;

/// Bagcodec - ROS1 interface compiler and bag reader
#[derive(Parser, Clone)]
#[command(name = "bagcodec")]
#[command(about = "Compile ROS interface files and read ROSbag v2.0 recordings", long_about = None)]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Clone)]
enum Commands {
    /// Generate Rust types from .msg/.srv/.action files
    Generate(GenerateCmd),

    /// Inspect bag contents (info, topics, schemas)
    #[command(subcommand)]
    Inspect(InspectCmd),

    /// Query decoded messages (fields, time series)
    #[command(subcommand)]
    Query(QueryCmd),
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Generate(cmd) => cmd.run(),
        Commands::Inspect(cmd) => cmd.run(),
        Commands::Query(cmd) => cmd.run(),
    }
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
