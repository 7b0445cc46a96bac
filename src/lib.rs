// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! ROS1 interface tooling: a compiler for `.msg`/`.srv`/`.action` files and
//! a reader for ROSbag v2.0 recordings.
//!
//! The two pipelines share one value model. The compiler tokenizes and
//! resolves interface files into field lists and generates Rust types from
//! them. The bag reader walks the record stream, parses the self-describing
//! message definitions embedded in Connection records, and decodes every
//! message payload against them.
//!
//! ```no_run
//! use bagcodec::RosBag;
//!
//! # fn main() -> bagcodec::Result<()> {
//! let bag = RosBag::read("recording.bag")?;
//! for conn in bag.connections.values() {
//!     println!("{}: {} messages", conn.topic, conn.messages.len());
//! }
//! # Ok(())
//! # }
//! ```

pub mod bag;
pub mod core;
pub mod msg;

pub use crate::core::{FieldValue, PrimitiveType, Result, RosError, Time};
pub use bag::{Connection, Message, RosBag};
pub use msg::{FieldResolver, InterfaceKind, ResolvedInterface, Tokenizer};
