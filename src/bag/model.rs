// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Bag data model: connections, messages, and the query surface over a
//! fully-read bag.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::bag::definition::parse_message_definition;
use crate::bag::header::split_fields;
use crate::core::error::{Result, RosError};
use crate::core::field::FieldValue;
use crate::core::time::Time;

/// One recorded message, decoded against its connection's schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub conn_id: u32,
    pub time: Time,
    pub fields: Vec<FieldValue>,
}

/// One connection: topic metadata, its parsed schema, and the messages
/// recorded on it, in arrival order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    pub id: u32,
    /// Topic from the record header
    pub topic: String,
    /// Topic as originally published, from the data block
    pub original_topic: Option<String>,
    pub message_type: String,
    pub md5sum: Option<String>,
    pub caller_id: Option<String>,
    pub latching: bool,
    /// Raw embedded definition text
    pub message_definition: String,
    /// Flattened field templates parsed from the definition
    pub schema: Vec<FieldValue>,
    pub messages: Vec<Message>,
}

impl Connection {
    /// Build a connection from its record-header topic and its data block,
    /// parsing the embedded message definition into a schema.
    pub fn from_data_block(id: u32, topic: String, data: &[u8]) -> Result<Self> {
        let mut conn = Connection {
            id,
            topic,
            original_topic: None,
            message_type: String::new(),
            md5sum: None,
            caller_id: None,
            latching: false,
            message_definition: String::new(),
            schema: Vec::new(),
            messages: Vec::new(),
        };

        for (name, value) in split_fields(data)? {
            let text = || {
                std::str::from_utf8(value).map_err(|_| {
                    RosError::format("connection data", format!("field '{name}' is not UTF-8"))
                })
            };
            match name {
                "topic" => conn.original_topic = Some(text()?.to_string()),
                "type" => conn.message_type = text()?.to_string(),
                "md5sum" => conn.md5sum = Some(text()?.to_string()),
                "callerid" => conn.caller_id = Some(text()?.to_string()),
                "latching" => conn.latching = value == b"1",
                "message_definition" => conn.message_definition = text()?.to_string(),
                other => warn!(conn = id, field = other, "ignoring unknown connection field"),
            }
        }

        if conn.message_type.is_empty() {
            return Err(RosError::format(
                "connection data",
                format!("connection {id} has no message type"),
            ));
        }
        conn.schema = parse_message_definition(&conn.message_definition)?;
        Ok(conn)
    }

    /// Names of the top-level schema fields.
    pub fn field_names(&self) -> Vec<String> {
        self.schema.iter().map(|f| f.name().to_string()).collect()
    }
}

/// A fully-read bag: every message decoded, every connection resolved.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RosBag {
    /// Connections keyed by id
    pub connections: BTreeMap<u32, Connection>,
}

impl RosBag {
    /// Total number of recorded messages.
    pub fn message_count(&self) -> usize {
        self.connections.values().map(|c| c.messages.len()).sum()
    }

    /// Earliest and latest message timestamps, if any messages exist.
    pub fn time_range(&self) -> Option<(Time, Time)> {
        let times = self
            .connections
            .values()
            .flat_map(|c| c.messages.iter().map(|m| m.time));
        let (mut min, mut max) = (None, None);
        for t in times {
            min = Some(min.map_or(t, |m: Time| m.min(t)));
            max = Some(max.map_or(t, |m: Time| m.max(t)));
        }
        Some((min?, max?))
    }

    /// Topic name to schema field names, for every connection.
    pub fn connection_fields(&self) -> BTreeMap<String, Vec<String>> {
        self.connections
            .values()
            .map(|c| (c.topic.clone(), c.field_names()))
            .collect()
    }

    /// All `(timestamp, value)` pairs of one field on one topic, in
    /// recorded order.
    pub fn time_series(&self, topic: &str, field: &str) -> Result<Vec<(Time, FieldValue)>> {
        let mut series = Vec::new();
        let mut topic_found = false;

        for conn in self.connections.values() {
            if conn.topic != topic {
                continue;
            }
            topic_found = true;
            for message in &conn.messages {
                if let Some(value) = message.fields.iter().find(|f| f.name() == field) {
                    series.push((message.time, value.clone()));
                }
            }
        }

        if !topic_found {
            return Err(RosError::format(
                "time_series",
                format!("no connection with topic '{topic}'"),
            ));
        }
        Ok(series)
    }
}
