// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! ROSbag v2.0 reader: magic check, record dispatch, chunk decompression.
//!
//! Records are dispatched in file order. Chunks are inflated (or, for
//! `none` compression, dispatched in place over the sub-slice) and their
//! embedded records run through the same dispatch. Index and summary
//! records are validated for their required fields, then skipped; message
//! extraction does not need them.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use byteorder::{ByteOrder, LittleEndian};
use bzip2::read::BzDecoder;
use memmap2::Mmap;
use tracing::debug;

use crate::bag::data::decode_message;
use crate::bag::header::{OpCode, RecordHeader};
use crate::bag::model::{Connection, Message, RosBag};
use crate::bag::pending::PendingMessages;
use crate::core::error::{Result, RosError};

const MAGIC: &[u8] = b"#ROSBAG V2.0\n";

impl RosBag {
    /// Read a bag file, memory-mapped.
    pub fn read(path: impl AsRef<Path>) -> Result<RosBag> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| RosError::Io {
            context: path.display().to_string(),
            message: e.to_string(),
        })?;
        // Mapping is sound as long as the file is not truncated while read.
        let mmap = unsafe {
            Mmap::map(&file).map_err(|e| RosError::Io {
                context: path.display().to_string(),
                message: e.to_string(),
            })?
        };
        RosBag::read_bytes(&mmap)
    }

    /// Read a bag from an in-memory byte slice.
    pub fn read_bytes(bytes: &[u8]) -> Result<RosBag> {
        BagReader::default().read(bytes)
    }
}

#[derive(Default)]
struct BagReader {
    bag: RosBag,
    pending: PendingMessages,
}

impl BagReader {
    fn read(mut self, bytes: &[u8]) -> Result<RosBag> {
        check_magic(bytes)?;
        self.dispatch_records(&bytes[MAGIC.len()..])?;
        self.pending.finish()?;
        Ok(self.bag)
    }

    /// Run every record in the slice through the opcode dispatch.
    fn dispatch_records(&mut self, bytes: &[u8]) -> Result<()> {
        let mut pos = 0;
        while pos < bytes.len() {
            let (header, data) = read_record(bytes, &mut pos)?;
            let op = header.opcode()?;
            header.require_for(op)?;

            match op {
                OpCode::BagHeader => {
                    debug!(
                        conn_count = header.conn_count.unwrap_or(0),
                        chunk_count = header.chunk_count.unwrap_or(0),
                        "bag header"
                    );
                }
                OpCode::Connection => self.handle_connection(&header, data)?,
                OpCode::MessageData => self.handle_message(&header, data)?,
                OpCode::Chunk => self.handle_chunk(&header, data)?,
                OpCode::IndexData | OpCode::ChunkInfo => {}
            }
        }
        Ok(())
    }

    fn handle_connection(&mut self, header: &RecordHeader, data: &[u8]) -> Result<()> {
        let id = require(header.conn, OpCode::Connection, "conn")?;
        // Connections repeat between chunk and index sections.
        if self.bag.connections.contains_key(&id) {
            return Ok(());
        }
        let topic = require(header.topic.clone(), OpCode::Connection, "topic")?;
        let mut conn = Connection::from_data_block(id, topic, data)?;
        self.pending.drain_into(&mut conn)?;
        debug!(conn = id, topic = %conn.topic, "registered connection");
        self.bag.connections.insert(id, conn);
        Ok(())
    }

    fn handle_message(&mut self, header: &RecordHeader, data: &[u8]) -> Result<()> {
        let conn_id = require(header.conn, OpCode::MessageData, "conn")?;
        let time = require(header.time, OpCode::MessageData, "time")?;
        match self.bag.connections.get_mut(&conn_id) {
            Some(conn) => {
                let fields = decode_message(&conn.schema, data)?;
                conn.messages.push(Message {
                    conn_id,
                    time,
                    fields,
                });
            }
            None => self.pending.push(conn_id, time, data.to_vec()),
        }
        Ok(())
    }

    fn handle_chunk(&mut self, header: &RecordHeader, data: &[u8]) -> Result<()> {
        let compression = require(header.compression.clone(), OpCode::Chunk, "compression")?;
        if compression == "none" {
            return self.dispatch_records(data);
        }

        let size = require(header.size, OpCode::Chunk, "size")? as usize;
        let mut inflated = Vec::with_capacity(size);
        BzDecoder::new(data)
            .read_to_end(&mut inflated)
            .map_err(|e| RosError::format("chunk", format!("bz2 inflate failed: {e}")))?;
        if inflated.len() != size {
            return Err(RosError::format(
                "chunk",
                format!("inflated {} bytes, header says {size}", inflated.len()),
            ));
        }
        self.dispatch_records(&inflated)
    }
}

fn require<T>(value: Option<T>, op: OpCode, name: &str) -> Result<T> {
    value.ok_or_else(|| RosError::missing_header_field(op as u8, name))
}

fn check_magic(bytes: &[u8]) -> Result<()> {
    if bytes.len() < MAGIC.len() || !bytes.starts_with(b"#ROSBAG V") {
        return Err(RosError::format("bag", "missing #ROSBAG magic"));
    }
    if !bytes.starts_with(MAGIC) {
        let version = String::from_utf8_lossy(&bytes[9..MAGIC.len()]);
        return Err(RosError::format(
            "bag",
            format!("unsupported bag version {}", version.trim()),
        ));
    }
    Ok(())
}

/// Read one `headerLen + header + dataLen + data` record at `pos`.
fn read_record<'a>(bytes: &'a [u8], pos: &mut usize) -> Result<(RecordHeader, &'a [u8])> {
    let header_bytes = read_block(bytes, pos)?;
    let header = RecordHeader::parse(header_bytes)?;
    let data = read_block(bytes, pos)?;
    Ok((header, data))
}

fn read_block<'a>(bytes: &'a [u8], pos: &mut usize) -> Result<&'a [u8]> {
    if *pos + 4 > bytes.len() {
        return Err(RosError::buffer_too_short(
            4,
            bytes.len() - *pos,
            *pos as u64,
        ));
    }
    let len = LittleEndian::read_u32(&bytes[*pos..*pos + 4]) as usize;
    *pos += 4;
    if *pos + len > bytes.len() {
        return Err(RosError::buffer_too_short(
            len,
            bytes.len() - *pos,
            *pos as u64,
        ));
    }
    let block = &bytes[*pos..*pos + len];
    *pos += len;
    Ok(block)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bag::header::build_header;
    use crate::core::time::Time;

    fn record(header_fields: &[(&str, &[u8])], data: &[u8]) -> Vec<u8> {
        let header = build_header(header_fields);
        let mut out = Vec::new();
        out.extend_from_slice(&(header.len() as u32).to_le_bytes());
        out.extend_from_slice(&header);
        out.extend_from_slice(&(data.len() as u32).to_le_bytes());
        out.extend_from_slice(data);
        out
    }

    fn time_bytes(secs: u32, nsecs: u32) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&secs.to_le_bytes());
        out.extend_from_slice(&nsecs.to_le_bytes());
        out
    }

    fn connection_record(id: u32, topic: &str, definition: &str) -> Vec<u8> {
        let data = build_header(&[
            ("topic", topic.as_bytes()),
            ("type", b"test_msgs/Sample"),
            ("message_definition", definition.as_bytes()),
        ]);
        record(
            &[("op", &[0x07]), ("conn", &id.to_le_bytes()), ("topic", topic.as_bytes())],
            &data,
        )
    }

    fn message_record(conn: u32, secs: u32, payload: &[u8]) -> Vec<u8> {
        record(
            &[
                ("op", &[0x02]),
                ("conn", &conn.to_le_bytes()),
                ("time", &time_bytes(secs, 0)),
            ],
            payload,
        )
    }

    fn bag_bytes(records: &[Vec<u8>]) -> Vec<u8> {
        let mut out = MAGIC.to_vec();
        for r in records {
            out.extend_from_slice(r);
        }
        out
    }

    #[test]
    fn test_connection_then_message() {
        let bytes = bag_bytes(&[
            connection_record(1, "/counter", "int32 value\n"),
            message_record(1, 100, &41i32.to_le_bytes()),
            message_record(1, 101, &42i32.to_le_bytes()),
        ]);
        let bag = RosBag::read_bytes(&bytes).unwrap();

        let conn = &bag.connections[&1];
        assert_eq!(conn.topic, "/counter");
        assert_eq!(conn.messages.len(), 2);
        assert_eq!(conn.messages[0].fields[0].as_i64(), Some(41));
        assert_eq!(conn.messages[1].time, Time::new(101, 0));
    }

    #[test]
    fn test_message_before_connection_is_buffered() {
        let bytes = bag_bytes(&[
            message_record(1, 100, &7i32.to_le_bytes()),
            connection_record(1, "/counter", "int32 value\n"),
        ]);
        let bag = RosBag::read_bytes(&bytes).unwrap();
        assert_eq!(bag.connections[&1].messages[0].fields[0].as_i64(), Some(7));
    }

    #[test]
    fn test_orphan_message_is_error() {
        let bytes = bag_bytes(&[message_record(9, 100, &[0, 0, 0, 0])]);
        let err = RosBag::read_bytes(&bytes).unwrap_err();
        match err {
            RosError::UnresolvedConnections { pending } => assert_eq!(pending, vec![(9, 1)]),
            other => panic!("expected unresolved connections, got {other:?}"),
        }
    }

    #[test]
    fn test_duplicate_connection_ignored() {
        let bytes = bag_bytes(&[
            connection_record(1, "/a", "int32 value\n"),
            connection_record(1, "/a", "int32 value\n"),
            message_record(1, 100, &1i32.to_le_bytes()),
        ]);
        let bag = RosBag::read_bytes(&bytes).unwrap();
        assert_eq!(bag.connections.len(), 1);
        assert_eq!(bag.message_count(), 1);
    }

    #[test]
    fn test_uncompressed_chunk() {
        let mut inner = Vec::new();
        inner.extend_from_slice(&connection_record(1, "/c", "int32 value\n"));
        inner.extend_from_slice(&message_record(1, 5, &3i32.to_le_bytes()));

        let chunk = record(
            &[
                ("op", &[0x05]),
                ("compression", b"none"),
                ("size", &(inner.len() as u32).to_le_bytes()),
            ],
            &inner,
        );
        let bag = RosBag::read_bytes(&bag_bytes(&[chunk])).unwrap();
        assert_eq!(bag.connections[&1].messages[0].fields[0].as_i64(), Some(3));
    }

    #[test]
    fn test_bz2_chunk() {
        use bzip2::read::BzEncoder;
        use bzip2::Compression;

        let mut inner = Vec::new();
        inner.extend_from_slice(&connection_record(1, "/c", "int32 value\n"));
        inner.extend_from_slice(&message_record(1, 5, &3i32.to_le_bytes()));

        let mut compressed = Vec::new();
        BzEncoder::new(inner.as_slice(), Compression::default())
            .read_to_end(&mut compressed)
            .unwrap();

        let chunk = record(
            &[
                ("op", &[0x05]),
                ("compression", b"bz2"),
                ("size", &(inner.len() as u32).to_le_bytes()),
            ],
            &compressed,
        );
        let bag = RosBag::read_bytes(&bag_bytes(&[chunk])).unwrap();
        assert_eq!(bag.connections[&1].messages[0].fields[0].as_i64(), Some(3));
    }

    #[test]
    fn test_bad_magic() {
        let err = RosBag::read_bytes(b"not a bag at all").unwrap_err();
        assert!(err.to_string().contains("magic"));
    }

    #[test]
    fn test_wrong_version() {
        let err = RosBag::read_bytes(b"#ROSBAG V1.2\n").unwrap_err();
        assert!(err.to_string().contains("1.2"));
    }

    #[test]
    fn test_truncated_record() {
        let mut bytes = bag_bytes(&[]);
        bytes.extend_from_slice(&100u32.to_le_bytes());
        let err = RosBag::read_bytes(&bytes).unwrap_err();
        assert!(matches!(err, RosError::BufferTooShort { .. }));
    }

    #[test]
    fn test_index_records_skipped() {
        let index = record(
            &[
                ("op", &[0x04]),
                ("ver", &1u32.to_le_bytes()),
                ("conn", &1u32.to_le_bytes()),
                ("count", &0u32.to_le_bytes()),
            ],
            &[],
        );
        let bytes = bag_bytes(&[connection_record(1, "/c", "int32 value\n"), index]);
        let bag = RosBag::read_bytes(&bytes).unwrap();
        assert_eq!(bag.message_count(), 0);
    }

    #[test]
    fn test_missing_required_field_fails() {
        // Chunk without a size field.
        let chunk = record(&[("op", &[0x05]), ("compression", b"none")], &[]);
        let err = RosBag::read_bytes(&bag_bytes(&[chunk])).unwrap_err();
        match err {
            RosError::MissingHeaderField { op, name } => {
                assert_eq!(op, 5);
                assert_eq!(name, "size");
            }
            other => panic!("expected missing header field, got {other:?}"),
        }
    }
}
