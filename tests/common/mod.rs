// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Shared builders for synthetic in-memory bag files.

#![allow(dead_code)]

pub const MAGIC: &[u8] = b"#ROSBAG V2.0\n";

/// Length-prefixed `name=value` field block.
pub fn build_fields(fields: &[(&str, &[u8])]) -> Vec<u8> {
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

/// `headerLen + header + dataLen + data` record.
pub fn record(header_fields: &[(&str, &[u8])], data: &[u8]) -> Vec<u8> {
    let header = build_fields(header_fields);
    let mut out = Vec::new();
    out.extend_from_slice(&(header.len() as u32).to_le_bytes());
    out.extend_from_slice(&header);
    out.extend_from_slice(&(data.len() as u32).to_le_bytes());
    out.extend_from_slice(data);
    out
}

pub fn time_bytes(secs: u32, nsecs: u32) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&secs.to_le_bytes());
    out.extend_from_slice(&nsecs.to_le_bytes());
    out
}

pub fn connection_record(id: u32, topic: &str, message_type: &str, definition: &str) -> Vec<u8> {
    let data = build_fields(&[
        ("topic", topic.as_bytes()),
        ("type", message_type.as_bytes()),
        ("md5sum", b"0123456789abcdef"),
        ("message_definition", definition.as_bytes()),
    ]);
    record(
        &[
            ("op", &[0x07]),
            ("conn", &id.to_le_bytes()),
            ("topic", topic.as_bytes()),
        ],
        &data,
    )
}

pub fn message_record(conn: u32, secs: u32, payload: &[u8]) -> Vec<u8> {
    record(
        &[
            ("op", &[0x02]),
            ("conn", &conn.to_le_bytes()),
            ("time", &time_bytes(secs, 0)),
        ],
        payload,
    )
}

pub fn chunk_record(compression: &str, uncompressed_size: u32, data: &[u8]) -> Vec<u8> {
    record(
        &[
            ("op", &[0x05]),
            ("compression", compression.as_bytes()),
            ("size", &uncompressed_size.to_le_bytes()),
        ],
        data,
    )
}

/// Concatenate records behind the v2.0 magic.
pub fn bag_bytes(records: &[Vec<u8>]) -> Vec<u8> {
    let mut out = MAGIC.to_vec();
    for r in records {
        out.extend_from_slice(r);
    }
    out
}
