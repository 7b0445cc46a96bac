// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! ROSbag v2.0 reading: record headers, chunk decompression, embedded
//! schema parsing, and positional message decoding.

pub mod data;
pub mod definition;
pub mod header;
pub mod model;
pub mod pending;
pub mod reader;

pub use data::decode_message;
pub use definition::{parse_message_definition, DefinitionRegistry};
pub use header::{OpCode, RecordHeader};
pub use model::{Connection, Message, RosBag};
pub use pending::PendingMessages;
