// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! ROSbag v2.0 record headers.
//!
//! A record header is a sequence of length-prefixed `name=value` fields.
//! The set of field names is closed; an unknown name is a hard error rather
//! than something to skip, since it means the file is not a well-formed
//! v2.0 bag.

use std::io::Cursor;

use byteorder::{LittleEndian, ReadBytesExt};

use crate::core::error::{Result, RosError};
use crate::core::time::Time;

/// Record opcodes defined by the bag v2.0 format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum OpCode {
    MessageData = 0x02,
    BagHeader = 0x03,
    IndexData = 0x04,
    Chunk = 0x05,
    ChunkInfo = 0x06,
    Connection = 0x07,
}

impl OpCode {
    pub fn from_u8(value: u8) -> Result<Self> {
        match value {
            0x02 => Ok(OpCode::MessageData),
            0x03 => Ok(OpCode::BagHeader),
            0x04 => Ok(OpCode::IndexData),
            0x05 => Ok(OpCode::Chunk),
            0x06 => Ok(OpCode::ChunkInfo),
            0x07 => Ok(OpCode::Connection),
            other => Err(RosError::format(
                "record header",
                format!("unknown record opcode {other}"),
            )),
        }
    }
}

/// Decoded header fields. Each opcode uses a subset; `require_for` checks
/// that the subset is present.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordHeader {
    pub op: Option<u8>,
    pub index_pos: Option<u64>,
    pub chunk_pos: Option<u64>,
    pub time: Option<Time>,
    pub start_time: Option<Time>,
    pub end_time: Option<Time>,
    pub conn_count: Option<u32>,
    pub chunk_count: Option<u32>,
    pub size: Option<u32>,
    pub conn: Option<u32>,
    pub ver: Option<u32>,
    pub count: Option<u32>,
    pub offset: Option<u32>,
    pub compression: Option<String>,
    pub topic: Option<String>,
}

/// Split a length-prefixed `name=value` block into its fields. Both record
/// headers and Connection data blocks use this layout.
pub fn split_fields(bytes: &[u8]) -> Result<Vec<(&str, &[u8])>> {
    let mut fields = Vec::new();
    let mut cursor = Cursor::new(bytes);

    while (cursor.position() as usize) < bytes.len() {
        let field_len = read_u32(&mut cursor, bytes)? as usize;
        let start = cursor.position() as usize;
        let end = start + field_len;
        if end > bytes.len() {
            return Err(RosError::buffer_too_short(
                field_len,
                bytes.len() - start,
                cursor.position(),
            ));
        }
        let field = &bytes[start..end];
        cursor.set_position(end as u64);

        let eq = field.iter().position(|&b| b == b'=').ok_or_else(|| {
            RosError::format("record header", "header field has no '=' separator")
        })?;
        let name = std::str::from_utf8(&field[..eq])
            .map_err(|_| RosError::format("record header", "header field name is not UTF-8"))?;
        fields.push((name, &field[eq + 1..]));
    }

    Ok(fields)
}

impl RecordHeader {
    /// Parse one header block.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let mut header = RecordHeader::default();
        for (name, value) in split_fields(bytes)? {
            header.set_field(name, value)?;
        }
        Ok(header)
    }

    fn set_field(&mut self, name: &str, value: &[u8]) -> Result<()> {
        match name {
            "op" => self.op = Some(take_u8(name, value)?),
            "index_pos" => self.index_pos = Some(take_u64(name, value)?),
            "chunk_pos" => self.chunk_pos = Some(take_u64(name, value)?),
            "time" => self.time = Some(take_time(name, value)?),
            "start_time" => self.start_time = Some(take_time(name, value)?),
            "end_time" => self.end_time = Some(take_time(name, value)?),
            "conn_count" => self.conn_count = Some(take_u32(name, value)?),
            "chunk_count" => self.chunk_count = Some(take_u32(name, value)?),
            "size" => self.size = Some(take_u32(name, value)?),
            "conn" => self.conn = Some(take_u32(name, value)?),
            "ver" => self.ver = Some(take_u32(name, value)?),
            "count" => self.count = Some(take_u32(name, value)?),
            "offset" => self.offset = Some(take_u32(name, value)?),
            "compression" => {
                // Only 'none' and 'bz2' exist in v2.0; the first byte decides.
                let first = *value.first().ok_or_else(|| {
                    RosError::format("record header", "empty compression field")
                })?;
                self.compression = Some(if first == b'n' { "none" } else { "bz2" }.to_string());
            }
            "topic" => {
                let text = std::str::from_utf8(value).map_err(|_| {
                    RosError::format("record header", "topic is not UTF-8")
                })?;
                self.topic = Some(text.to_string());
            }
            other => return Err(RosError::unknown_header_field(other)),
        }
        Ok(())
    }

    /// Opcode of this record, which every header must carry.
    pub fn opcode(&self) -> Result<OpCode> {
        let op = self
            .op
            .ok_or_else(|| RosError::missing_header_field(0, "op"))?;
        OpCode::from_u8(op)
    }

    /// Verify the fields the given opcode requires are all present.
    pub fn require_for(&self, op: OpCode) -> Result<()> {
        let required: &[(&str, bool)] = match op {
            OpCode::MessageData => &[("conn", self.conn.is_some()), ("time", self.time.is_some())],
            OpCode::BagHeader => &[
                ("index_pos", self.index_pos.is_some()),
                ("conn_count", self.conn_count.is_some()),
                ("chunk_count", self.chunk_count.is_some()),
            ],
            OpCode::IndexData => &[
                ("ver", self.ver.is_some()),
                ("conn", self.conn.is_some()),
                ("count", self.count.is_some()),
            ],
            OpCode::Chunk => &[
                ("compression", self.compression.is_some()),
                ("size", self.size.is_some()),
            ],
            OpCode::ChunkInfo => &[
                ("ver", self.ver.is_some()),
                ("chunk_pos", self.chunk_pos.is_some()),
                ("start_time", self.start_time.is_some()),
                ("end_time", self.end_time.is_some()),
                ("count", self.count.is_some()),
            ],
            OpCode::Connection => &[("conn", self.conn.is_some()), ("topic", self.topic.is_some())],
        };
        for (name, present) in required {
            if !present {
                return Err(RosError::missing_header_field(op as u8, *name));
            }
        }
        Ok(())
    }
}

fn read_u32(cursor: &mut Cursor<&[u8]>, bytes: &[u8]) -> Result<u32> {
    let pos = cursor.position();
    cursor
        .read_u32::<LittleEndian>()
        .map_err(|_| RosError::buffer_too_short(4, bytes.len() - pos as usize, pos))
}

fn expect_len(name: &str, value: &[u8], len: usize) -> Result<()> {
    if value.len() != len {
        return Err(RosError::format(
            "record header",
            format!("field '{name}' has {} value bytes, expected {len}", value.len()),
        ));
    }
    Ok(())
}

fn take_u8(name: &str, value: &[u8]) -> Result<u8> {
    expect_len(name, value, 1)?;
    Ok(value[0])
}

fn take_u32(name: &str, value: &[u8]) -> Result<u32> {
    expect_len(name, value, 4)?;
    Ok(u32::from_le_bytes([value[0], value[1], value[2], value[3]]))
}

fn take_u64(name: &str, value: &[u8]) -> Result<u64> {
    expect_len(name, value, 8)?;
    let mut buf = [0u8; 8];
    buf.copy_from_slice(value);
    Ok(u64::from_le_bytes(buf))
}

fn take_time(name: &str, value: &[u8]) -> Result<Time> {
    expect_len(name, value, 8)?;
    let mut buf = [0u8; 8];
    buf.copy_from_slice(value);
    Ok(Time::from_le_bytes(buf))
}

/// Build a header block from (name, value-bytes) pairs. Test helper shared
/// by the bag unit tests.
#[cfg(test)]
pub(crate) fn build_header(fields: &[(&str, &[u8])]) -> Vec<u8> {
    let mut out = Vec::new();
    for (name, value) in fields {
        let field_len = name.len() + 1 + value.len();
        out.extend_from_slice(&(field_len as u32).to_le_bytes());
        out.extend_from_slice(name.as_bytes());
        out.push(b'=');
        out.extend_from_slice(value);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_connection_header() {
        let bytes = build_header(&[
            ("op", &[0x07]),
            ("conn", &5u32.to_le_bytes()),
            ("topic", b"/odom"),
        ]);
        let header = RecordHeader::parse(&bytes).unwrap();
        assert_eq!(header.opcode().unwrap(), OpCode::Connection);
        assert_eq!(header.conn, Some(5));
        assert_eq!(header.topic.as_deref(), Some("/odom"));
        header.require_for(OpCode::Connection).unwrap();
    }

    #[test]
    fn test_parse_message_header_with_time() {
        let mut time = Vec::new();
        time.extend_from_slice(&100u32.to_le_bytes());
        time.extend_from_slice(&7u32.to_le_bytes());
        let bytes = build_header(&[("op", &[0x02]), ("conn", &1u32.to_le_bytes()), ("time", &time)]);
        let header = RecordHeader::parse(&bytes).unwrap();
        assert_eq!(header.time, Some(Time::new(100, 7)));
        header.require_for(OpCode::MessageData).unwrap();
    }

    #[test]
    fn test_compression_tag_decoding() {
        let bytes = build_header(&[("compression", b"none")]);
        let header = RecordHeader::parse(&bytes).unwrap();
        assert_eq!(header.compression.as_deref(), Some("none"));

        let bytes = build_header(&[("compression", b"bz2")]);
        let header = RecordHeader::parse(&bytes).unwrap();
        assert_eq!(header.compression.as_deref(), Some("bz2"));
    }

    #[test]
    fn test_unknown_field_is_error() {
        let bytes = build_header(&[("mystery", &[1, 2, 3, 4])]);
        let err = RecordHeader::parse(&bytes).unwrap_err();
        match err {
            RosError::UnknownHeaderField { name } => assert_eq!(name, "mystery"),
            other => panic!("expected unknown header field, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_required_field() {
        let bytes = build_header(&[("op", &[0x07]), ("conn", &1u32.to_le_bytes())]);
        let header = RecordHeader::parse(&bytes).unwrap();
        let err = header.require_for(OpCode::Connection).unwrap_err();
        match err {
            RosError::MissingHeaderField { op, name } => {
                assert_eq!(op, 7);
                assert_eq!(name, "topic");
            }
            other => panic!("expected missing header field, got {other:?}"),
        }
    }

    #[test]
    fn test_wrong_value_width_is_error() {
        let bytes = build_header(&[("conn", &[1, 2])]);
        let err = RecordHeader::parse(&bytes).unwrap_err();
        assert!(err.to_string().contains("'conn'"));
    }

    #[test]
    fn test_truncated_field_is_error() {
        let mut bytes = build_header(&[("op", &[0x03])]);
        bytes.extend_from_slice(&100u32.to_le_bytes());
        let err = RecordHeader::parse(&bytes).unwrap_err();
        assert!(matches!(err, RosError::BufferTooShort { .. }));
    }

    #[test]
    fn test_bad_opcode() {
        let bytes = build_header(&[("op", &[0x55])]);
        let header = RecordHeader::parse(&bytes).unwrap();
        assert!(header.opcode().is_err());
    }

    #[test]
    fn test_bag_header_fields() {
        let bytes = build_header(&[
            ("op", &[0x03]),
            ("index_pos", &4096u64.to_le_bytes()),
            ("conn_count", &2u32.to_le_bytes()),
            ("chunk_count", &1u32.to_le_bytes()),
        ]);
        let header = RecordHeader::parse(&bytes).unwrap();
        header.require_for(OpCode::BagHeader).unwrap();
        assert_eq!(header.index_pos, Some(4096));
    }
}
