// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Query command - field listings and time series over decoded messages.

use std::path::PathBuf;

use clap::Subcommand;

use crate::common::Result;
use bagcodec::RosBag;

/// Query decoded message data.
#[derive(Subcommand, Clone, Debug)]
pub enum QueryCmd {
    /// List the schema fields of every topic
    Fields {
        /// Input bag file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Dump one field of one topic as a time series
    Timeseries {
        /// Input bag file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Topic to read
        #[arg(value_name = "TOPIC")]
        topic: String,

        /// Field name, dotted for nested members
        #[arg(value_name = "FIELD")]
        field: String,

        /// Emit JSON instead of plain text
        #[arg(long)]
        json: bool,
    },
}

impl QueryCmd {
    pub fn run(self) -> Result<()> {
        match self {
            QueryCmd::Fields { input } => cmd_fields(input),
            QueryCmd::Timeseries {
                input,
                topic,
                field,
                json,
            } => cmd_timeseries(input, topic, field, json),
        }
    }
}

/// Cmd: List fields per topic
fn cmd_fields(input: PathBuf) -> Result<()> {
    let bag = RosBag::read(&input)?;

    for (topic, fields) in bag.connection_fields() {
        println!("{topic}:");
        for field in fields {
            println!("  {field}");
        }
        println!();
    }

    Ok(())
}

/// Cmd: Dump a time series
fn cmd_timeseries(input: PathBuf, topic: String, field: String, json: bool) -> Result<()> {
    let bag = RosBag::read(&input)?;
    let series = bag.time_series(&topic, &field)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&series)?);
        return Ok(());
    }

    for (time, value) in &series {
        println!("{time} {value}");
    }
    println!();
    println!("{} sample(s)", series.len());

    Ok(())
}
