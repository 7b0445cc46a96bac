// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Inspect command - show bag information, topics, schemas.

use std::path::PathBuf;

use clap::Subcommand;

use crate::common::{format_duration, format_timestamp, Result};
use bagcodec::RosBag;

/// Inspect bag contents.
#[derive(Subcommand, Clone, Debug)]
pub enum InspectCmd {
    /// Show basic bag information and summary
    Info {
        /// Input bag file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// List all topics in the bag
    Topics {
        /// Input bag file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Filter topics by pattern
        #[arg(short, long)]
        filter: Option<String>,
    },

    /// Show the embedded message definition of a topic or type
    Schema {
        /// Input bag file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Topic or message type to show (shows all if not specified)
        #[arg(value_name = "TOPIC|TYPE")]
        topic_or_type: Option<String>,
    },
}

impl InspectCmd {
    pub fn run(self) -> Result<()> {
        match self {
            InspectCmd::Info { input } => cmd_info(input),
            InspectCmd::Topics { input, filter } => cmd_topics(input, filter),
            InspectCmd::Schema {
                input,
                topic_or_type,
            } => cmd_schema(input, topic_or_type),
        }
    }
}

/// Cmd: Show bag info
fn cmd_info(input: PathBuf) -> Result<()> {
    let bag = RosBag::read(&input)?;

    println!("=== {} ===", input.display());
    println!("Connections: {}", bag.connections.len());
    println!("Messages: {}", bag.message_count());

    if let Some((start, end)) = bag.time_range() {
        println!("Start: {}", format_timestamp(start));
        println!("End: {}", format_timestamp(end));
        println!("Duration: {}", format_duration(end.as_nanos() - start.as_nanos()));
    }

    println!();
    println!("Connections:");
    for (&id, conn) in &bag.connections {
        println!(
            "  [{}] {} | {} | {} messages",
            id,
            conn.topic,
            conn.message_type,
            conn.messages.len()
        );
    }

    Ok(())
}

/// Cmd: List topics
fn cmd_topics(input: PathBuf, filter: Option<String>) -> Result<()> {
    let bag = RosBag::read(&input)?;

    println!("=== Topics in {} ===", input.display());
    println!();

    for conn in bag.connections.values() {
        if let Some(ref pattern) = filter {
            let lower = pattern.to_lowercase();
            if !conn.topic.to_lowercase().contains(&lower)
                && !conn.message_type.to_lowercase().contains(&lower)
            {
                continue;
            }
        }

        println!("Topic: {}", conn.topic);
        println!("  Type: {}", conn.message_type);
        println!("  Messages: {}", conn.messages.len());
        if let Some(original) = &conn.original_topic {
            if original != &conn.topic {
                println!("  Original topic: {original}");
            }
        }
        println!();
    }

    Ok(())
}

/// Cmd: Show schema text
fn cmd_schema(input: PathBuf, topic_or_type: Option<String>) -> Result<()> {
    let bag = RosBag::read(&input)?;

    let mut found = false;
    for conn in bag.connections.values() {
        if let Some(ref pattern) = topic_or_type {
            if !conn.topic.contains(pattern) && !conn.message_type.contains(pattern) {
                continue;
            }
        }

        found = true;
        println!("=== {} @ {} ===", conn.message_type, conn.topic);
        println!();
        for line in conn.message_definition.lines() {
            println!("{line}");
        }
        println!();
    }

    if !found {
        if let Some(pattern) = topic_or_type {
            println!("No matching topic or type found: {pattern}");
        }
    }

    Ok(())
}
