// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Holding area for messages that arrive before their Connection record.
//!
//! Chunks may put MessageData ahead of the Connection that describes it, so
//! undecodable payloads are buffered by connection id. Registering a
//! connection drains and decodes its backlog; anything still buffered at
//! end of stream means the bag never defined those connections.

use std::collections::HashMap;

use tracing::debug;

use crate::bag::data::decode_message;
use crate::bag::model::{Connection, Message};
use crate::core::error::{Result, RosError};
use crate::core::time::Time;

/// Messages waiting for their connection, keyed by connection id.
#[derive(Debug, Default)]
pub struct PendingMessages {
    buffered: HashMap<u32, Vec<(Time, Vec<u8>)>>,
}

impl PendingMessages {
    pub fn new() -> Self {
        PendingMessages::default()
    }

    /// Buffer one undecodable payload.
    pub fn push(&mut self, conn_id: u32, time: Time, payload: Vec<u8>) {
        self.buffered.entry(conn_id).or_default().push((time, payload));
    }

    /// Decode and attach every buffered message for this connection.
    pub fn drain_into(&mut self, conn: &mut Connection) -> Result<()> {
        let Some(backlog) = self.buffered.remove(&conn.id) else {
            return Ok(());
        };
        debug!(conn = conn.id, count = backlog.len(), "decoding buffered messages");
        for (time, payload) in backlog {
            let fields = decode_message(&conn.schema, &payload)?;
            conn.messages.push(Message {
                conn_id: conn.id,
                time,
                fields,
            });
        }
        Ok(())
    }

    /// Fail if any messages never found their connection.
    pub fn finish(self) -> Result<()> {
        if self.buffered.is_empty() {
            return Ok(());
        }
        let mut pending: Vec<(u32, usize)> = self
            .buffered
            .iter()
            .map(|(&conn, messages)| (conn, messages.len()))
            .collect();
        pending.sort_unstable();
        Err(RosError::UnresolvedConnections { pending })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::field::{FieldValue, PrimitiveType};

    fn connection_with_schema(id: u32) -> Connection {
        Connection {
            id,
            topic: "/t".into(),
            original_topic: None,
            message_type: "pkg/T".into(),
            md5sum: None,
            caller_id: None,
            latching: false,
            message_definition: "int32 a".into(),
            schema: vec![FieldValue::scalar("a", PrimitiveType::Int32)],
            messages: Vec::new(),
        }
    }

    #[test]
    fn test_drain_decodes_in_order() {
        let mut pending = PendingMessages::new();
        pending.push(1, Time::new(5, 0), 7i32.to_le_bytes().to_vec());
        pending.push(1, Time::new(6, 0), 8i32.to_le_bytes().to_vec());

        let mut conn = connection_with_schema(1);
        pending.drain_into(&mut conn).unwrap();

        assert_eq!(conn.messages.len(), 2);
        assert_eq!(conn.messages[0].fields[0].as_i64(), Some(7));
        assert_eq!(conn.messages[1].time, Time::new(6, 0));
        pending.finish().unwrap();
    }

    #[test]
    fn test_drain_without_backlog_is_noop() {
        let mut pending = PendingMessages::new();
        let mut conn = connection_with_schema(2);
        pending.drain_into(&mut conn).unwrap();
        assert!(conn.messages.is_empty());
    }

    #[test]
    fn test_orphans_reported_at_finish() {
        let mut pending = PendingMessages::new();
        pending.push(9, Time::new(1, 0), vec![0, 0, 0, 0]);
        pending.push(9, Time::new(2, 0), vec![0, 0, 0, 0]);
        pending.push(4, Time::new(3, 0), vec![0, 0, 0, 0]);

        let err = pending.finish().unwrap_err();
        match err {
            RosError::UnresolvedConnections { pending } => {
                assert_eq!(pending, vec![(4, 1), (9, 2)]);
            }
            other => panic!("expected unresolved connections, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_failure_propagates() {
        let mut pending = PendingMessages::new();
        pending.push(1, Time::new(1, 0), vec![1, 2]);
        let mut conn = connection_with_schema(1);
        let err = pending.drain_into(&mut conn).unwrap_err();
        assert!(matches!(err, RosError::BufferTooShort { .. }));
    }
}
