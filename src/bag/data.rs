// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Positional decoding of message payloads against their schema templates.
//!
//! The serialized payload has no framing of its own; the schema dictates
//! the byte layout. One cursor advances monotonically through the buffer,
//! slicing fixed-width scalars and length-prefixed arrays. All integers are
//! little-endian.

use byteorder::{ByteOrder, LittleEndian};

use crate::core::error::{Result, RosError};
use crate::core::field::FieldValue;

/// Decode one message payload. The templates come from
/// [`parse_message_definition`](crate::bag::definition::parse_message_definition).
pub fn decode_message(templates: &[FieldValue], bytes: &[u8]) -> Result<Vec<FieldValue>> {
    let mut cursor = DataCursor { bytes, pos: 0 };
    let mut fields = Vec::with_capacity(templates.len());
    for template in templates {
        fields.push(cursor.decode_field(template)?);
    }
    Ok(fields)
}

struct DataCursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl DataCursor<'_> {
    fn decode_field(&mut self, template: &FieldValue) -> Result<FieldValue> {
        match template {
            FieldValue::Scalar {
                name, data_type, ..
            } => {
                let raw = self.take(data_type.byte_len())?;
                Ok(FieldValue::scalar_with_value(
                    name.clone(),
                    *data_type,
                    raw.to_vec(),
                ))
            }
            FieldValue::Array {
                name,
                elements,
                fixed_len,
            } => {
                let len = match fixed_len {
                    Some(n) => *n,
                    None => LittleEndian::read_u32(self.take(4)?),
                };
                if elements.is_empty() && len > 0 {
                    return Err(RosError::format(
                        "message data",
                        format!("array '{name}' has {len} elements but an empty template"),
                    ));
                }
                let mut decoded = Vec::with_capacity(len as usize);
                for j in 0..len as usize {
                    let template = &elements[j % elements.len()];
                    decoded.push(self.decode_field(template)?);
                }
                Ok(FieldValue::array(name.clone(), decoded, *fixed_len))
            }
        }
    }

    fn take(&mut self, n: usize) -> Result<&[u8]> {
        let available = self.bytes.len() - self.pos;
        if n > available {
            return Err(RosError::buffer_too_short(n, available, self.pos as u64));
        }
        let slice = &self.bytes[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::field::PrimitiveType;

    fn string_template(name: &str) -> FieldValue {
        FieldValue::array(
            name,
            vec![FieldValue::scalar(name, PrimitiveType::Char)],
            None,
        )
    }

    #[test]
    fn test_decode_scalars() {
        let templates = vec![
            FieldValue::scalar("a", PrimitiveType::Int32),
            FieldValue::scalar("b", PrimitiveType::Float64),
        ];
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&(-5i32).to_le_bytes());
        bytes.extend_from_slice(&2.5f64.to_le_bytes());

        let fields = decode_message(&templates, &bytes).unwrap();
        assert_eq!(fields[0].as_i64(), Some(-5));
        assert_eq!(fields[1].as_f64(), Some(2.5));
    }

    #[test]
    fn test_decode_string() {
        let templates = vec![string_template("label")];
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&5u32.to_le_bytes());
        bytes.extend_from_slice(b"hello");

        let fields = decode_message(&templates, &bytes).unwrap();
        assert_eq!(fields[0].as_text(), Some("hello".to_string()));
    }

    #[test]
    fn test_decode_fixed_array_has_no_prefix() {
        let templates = vec![FieldValue::array(
            "m",
            vec![FieldValue::scalar("m", PrimitiveType::Int16)],
            Some(3),
        )];
        let mut bytes = Vec::new();
        for v in [1i16, 2, 3] {
            bytes.extend_from_slice(&v.to_le_bytes());
        }

        let fields = decode_message(&templates, &bytes).unwrap();
        match &fields[0] {
            FieldValue::Array { elements, .. } => {
                let values: Vec<_> = elements.iter().map(|e| e.as_i64().unwrap()).collect();
                assert_eq!(values, [1, 2, 3]);
            }
            other => panic!("expected array, got {other:?}"),
        }
    }

    #[test]
    fn test_variable_array_reads_length_prefix() {
        let templates = vec![
            FieldValue::array(
                "v",
                vec![FieldValue::scalar("v", PrimitiveType::UInt8)],
                None,
            ),
            FieldValue::scalar("after", PrimitiveType::Int32),
        ];
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&2u32.to_le_bytes());
        bytes.extend_from_slice(&[9, 8]);
        bytes.extend_from_slice(&7i32.to_le_bytes());

        let fields = decode_message(&templates, &bytes).unwrap();
        assert_eq!(fields[1].as_i64(), Some(7));
    }

    #[test]
    fn test_array_cycles_template_entries() {
        // Two-entry template, four counted elements: x, y, x, y.
        let templates = vec![FieldValue::array(
            "p",
            vec![
                FieldValue::scalar("p.x", PrimitiveType::Int32),
                FieldValue::scalar("p.y", PrimitiveType::Int32),
            ],
            None,
        )];
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&4u32.to_le_bytes());
        for v in [1i32, 2, 3, 4] {
            bytes.extend_from_slice(&v.to_le_bytes());
        }

        let fields = decode_message(&templates, &bytes).unwrap();
        match &fields[0] {
            FieldValue::Array { elements, .. } => {
                let names: Vec<_> = elements.iter().map(|e| e.name()).collect();
                assert_eq!(names, ["p.x", "p.y", "p.x", "p.y"]);
                let values: Vec<_> = elements.iter().map(|e| e.as_i64().unwrap()).collect();
                assert_eq!(values, [1, 2, 3, 4]);
            }
            other => panic!("expected array, got {other:?}"),
        }
    }

    #[test]
    fn test_nested_array_values_retained() {
        // Variable array whose single template entry is itself a string.
        let templates = vec![FieldValue::array(
            "names",
            vec![string_template("names")],
            None,
        )];
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&2u32.to_le_bytes());
        bytes.extend_from_slice(&2u32.to_le_bytes());
        bytes.extend_from_slice(b"ab");
        bytes.extend_from_slice(&1u32.to_le_bytes());
        bytes.extend_from_slice(b"c");

        let fields = decode_message(&templates, &bytes).unwrap();
        match &fields[0] {
            FieldValue::Array { elements, .. } => {
                assert_eq!(elements.len(), 2);
                assert_eq!(elements[0].as_text(), Some("ab".to_string()));
                assert_eq!(elements[1].as_text(), Some("c".to_string()));
            }
            other => panic!("expected array, got {other:?}"),
        }
    }

    #[test]
    fn test_truncated_payload_fails_loudly() {
        let templates = vec![FieldValue::scalar("a", PrimitiveType::Int64)];
        let err = decode_message(&templates, &[1, 2, 3]).unwrap_err();
        match err {
            RosError::BufferTooShort {
                requested,
                available,
                cursor_pos,
            } => {
                assert_eq!(requested, 8);
                assert_eq!(available, 3);
                assert_eq!(cursor_pos, 0);
            }
            other => panic!("expected buffer too short, got {other:?}"),
        }
    }

    #[test]
    fn test_time_scalar() {
        let templates = vec![FieldValue::scalar("stamp", PrimitiveType::Time)];
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&10u32.to_le_bytes());
        bytes.extend_from_slice(&20u32.to_le_bytes());
        let fields = decode_message(&templates, &bytes).unwrap();
        assert_eq!(fields[0].as_time(), Some(crate::core::Time::new(10, 20)));
    }

    #[test]
    fn test_empty_template_with_elements_is_error() {
        let templates = vec![FieldValue::array("bad", vec![], None)];
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&1u32.to_le_bytes());
        let err = decode_message(&templates, &bytes).unwrap_err();
        assert!(err.to_string().contains("empty template"));
    }
}
