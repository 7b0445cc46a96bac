// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Bag-side value model.
//!
//! A parsed message definition is a list of `FieldValue` templates (no
//! payload bytes yet); decoding a message produces the same shapes with the
//! raw little-endian bytes filled in. Arrays hold their elements directly,
//! so schema and decoded data share one representation.

use std::fmt;

use byteorder::{ByteOrder, LittleEndian};
use serde::{Deserialize, Serialize};

use crate::core::time::Time;

/// Primitive ROS field types as they appear in message definitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveType {
    Bool,
    Int8,
    UInt8,
    Byte,
    Char,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Int64,
    UInt64,
    Float32,
    Float64,
    String,
    Time,
    Duration,
}

impl PrimitiveType {
    /// Parse a ROS type name. Returns `None` for non-primitive names.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "bool" => Some(PrimitiveType::Bool),
            "int8" => Some(PrimitiveType::Int8),
            "uint8" => Some(PrimitiveType::UInt8),
            "byte" => Some(PrimitiveType::Byte),
            "char" => Some(PrimitiveType::Char),
            "int16" => Some(PrimitiveType::Int16),
            "uint16" => Some(PrimitiveType::UInt16),
            "int32" => Some(PrimitiveType::Int32),
            "uint32" => Some(PrimitiveType::UInt32),
            "int64" => Some(PrimitiveType::Int64),
            "uint64" => Some(PrimitiveType::UInt64),
            "float32" => Some(PrimitiveType::Float32),
            "float64" => Some(PrimitiveType::Float64),
            "string" => Some(PrimitiveType::String),
            "time" => Some(PrimitiveType::Time),
            "duration" => Some(PrimitiveType::Duration),
            _ => None,
        }
    }

    /// ROS name of this type.
    pub fn name(&self) -> &'static str {
        match self {
            PrimitiveType::Bool => "bool",
            PrimitiveType::Int8 => "int8",
            PrimitiveType::UInt8 => "uint8",
            PrimitiveType::Byte => "byte",
            PrimitiveType::Char => "char",
            PrimitiveType::Int16 => "int16",
            PrimitiveType::UInt16 => "uint16",
            PrimitiveType::Int32 => "int32",
            PrimitiveType::UInt32 => "uint32",
            PrimitiveType::Int64 => "int64",
            PrimitiveType::UInt64 => "uint64",
            PrimitiveType::Float32 => "float32",
            PrimitiveType::Float64 => "float64",
            PrimitiveType::String => "string",
            PrimitiveType::Time => "time",
            PrimitiveType::Duration => "duration",
        }
    }

    /// Serialized byte length of one value of this type.
    ///
    /// For `String` this is the length of the u32 count prefix; the character
    /// payload follows as a variable-length array.
    pub fn byte_len(&self) -> usize {
        match self {
            PrimitiveType::Bool
            | PrimitiveType::Int8
            | PrimitiveType::UInt8
            | PrimitiveType::Byte
            | PrimitiveType::Char => 1,
            PrimitiveType::Int16 | PrimitiveType::UInt16 => 2,
            PrimitiveType::Int32
            | PrimitiveType::UInt32
            | PrimitiveType::Float32
            | PrimitiveType::String => 4,
            PrimitiveType::Int64
            | PrimitiveType::UInt64
            | PrimitiveType::Float64
            | PrimitiveType::Time
            | PrimitiveType::Duration => 8,
        }
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One field of a message schema, or of a decoded message.
///
/// `Scalar` with `value: None` is a schema template; decoding fills in the
/// raw little-endian bytes. `Array` elements double as the cycling template
/// when the array holds an inlined sub-message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum FieldValue {
    Scalar {
        /// Field name, dotted for inlined sub-message members
        name: String,
        /// Primitive type of the value
        data_type: PrimitiveType,
        /// Raw little-endian bytes, absent in schema templates
        value: Option<Vec<u8>>,
    },
    Array {
        /// Field name, dotted for inlined sub-message members
        name: String,
        /// Template elements before decode, decoded elements after
        elements: Vec<FieldValue>,
        /// Declared element count for `T[N]`, `None` for `T[]`
        fixed_len: Option<u32>,
    },
}

impl FieldValue {
    /// Schema template scalar (no payload yet).
    pub fn scalar(name: impl Into<String>, data_type: PrimitiveType) -> Self {
        FieldValue::Scalar {
            name: name.into(),
            data_type,
            value: None,
        }
    }

    /// Decoded scalar carrying its raw bytes.
    pub fn scalar_with_value(
        name: impl Into<String>,
        data_type: PrimitiveType,
        value: Vec<u8>,
    ) -> Self {
        FieldValue::Scalar {
            name: name.into(),
            data_type,
            value: Some(value),
        }
    }

    /// Array over the given element templates or decoded elements.
    pub fn array(name: impl Into<String>, elements: Vec<FieldValue>, fixed_len: Option<u32>) -> Self {
        FieldValue::Array {
            name: name.into(),
            elements,
            fixed_len,
        }
    }

    /// Field name.
    pub fn name(&self) -> &str {
        match self {
            FieldValue::Scalar { name, .. } => name,
            FieldValue::Array { name, .. } => name,
        }
    }

    /// Replace the field name. Used when inlining sub-message templates
    /// under a dotted path.
    pub fn set_name(&mut self, new_name: String) {
        match self {
            FieldValue::Scalar { name, .. } => *name = new_name,
            FieldValue::Array { name, .. } => *name = new_name,
        }
    }

    pub fn is_array(&self) -> bool {
        matches!(self, FieldValue::Array { .. })
    }

    /// Raw payload bytes of a decoded scalar.
    pub fn raw(&self) -> Option<&[u8]> {
        match self {
            FieldValue::Scalar {
                value: Some(bytes), ..
            } => Some(bytes),
            _ => None,
        }
    }

    /// Decode as i64, sign-extending smaller integer types.
    pub fn as_i64(&self) -> Option<i64> {
        let (data_type, bytes) = self.scalar_parts()?;
        match data_type {
            PrimitiveType::Int8 => Some(bytes[0] as i8 as i64),
            PrimitiveType::Int16 => Some(LittleEndian::read_i16(bytes) as i64),
            PrimitiveType::Int32 => Some(LittleEndian::read_i32(bytes) as i64),
            PrimitiveType::Int64 => Some(LittleEndian::read_i64(bytes)),
            _ => self.as_u64().and_then(|v| i64::try_from(v).ok()),
        }
    }

    /// Decode as u64 for the unsigned and byte-like types.
    pub fn as_u64(&self) -> Option<u64> {
        let (data_type, bytes) = self.scalar_parts()?;
        match data_type {
            PrimitiveType::Bool | PrimitiveType::UInt8 | PrimitiveType::Byte | PrimitiveType::Char => {
                Some(bytes[0] as u64)
            }
            PrimitiveType::UInt16 => Some(LittleEndian::read_u16(bytes) as u64),
            PrimitiveType::UInt32 => Some(LittleEndian::read_u32(bytes) as u64),
            PrimitiveType::UInt64 => Some(LittleEndian::read_u64(bytes)),
            _ => None,
        }
    }

    /// Decode as f64 (float32 widened).
    pub fn as_f64(&self) -> Option<f64> {
        let (data_type, bytes) = self.scalar_parts()?;
        match data_type {
            PrimitiveType::Float32 => Some(LittleEndian::read_f32(bytes) as f64),
            PrimitiveType::Float64 => Some(LittleEndian::read_f64(bytes)),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        let (data_type, bytes) = self.scalar_parts()?;
        match data_type {
            PrimitiveType::Bool => Some(bytes[0] != 0),
            _ => None,
        }
    }

    /// Decode a time or duration scalar as `Time`.
    pub fn as_time(&self) -> Option<Time> {
        let (data_type, bytes) = self.scalar_parts()?;
        match data_type {
            PrimitiveType::Time | PrimitiveType::Duration => Some(Time::new(
                LittleEndian::read_u32(&bytes[0..4]),
                LittleEndian::read_u32(&bytes[4..8]),
            )),
            _ => None,
        }
    }

    /// Render a char-array (decoded string field) as UTF-8 text.
    pub fn as_text(&self) -> Option<String> {
        match self {
            FieldValue::Array { elements, .. } => {
                let mut bytes = Vec::with_capacity(elements.len());
                for el in elements {
                    match el {
                        FieldValue::Scalar {
                            data_type: PrimitiveType::Char | PrimitiveType::UInt8,
                            value: Some(v),
                            ..
                        } => bytes.push(v[0]),
                        _ => return None,
                    }
                }
                Some(String::from_utf8_lossy(&bytes).into_owned())
            }
            _ => None,
        }
    }

    fn scalar_parts(&self) -> Option<(PrimitiveType, &[u8])> {
        match self {
            FieldValue::Scalar {
                data_type,
                value: Some(bytes),
                ..
            } if bytes.len() >= data_type.byte_len() => Some((*data_type, bytes.as_slice())),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Scalar {
                name,
                data_type,
                value,
            } => {
                if value.is_none() {
                    return write!(f, "{name}: {data_type}");
                }
                if let Some(v) = self.as_bool() {
                    write!(f, "{name}: {v}")
                } else if let Some(v) = self.as_i64() {
                    write!(f, "{name}: {v}")
                } else if let Some(v) = self.as_u64() {
                    write!(f, "{name}: {v}")
                } else if let Some(v) = self.as_f64() {
                    write!(f, "{name}: {v}")
                } else if let Some(v) = self.as_time() {
                    write!(f, "{name}: {v}")
                } else {
                    write!(f, "{name}: {data_type}")
                }
            }
            FieldValue::Array {
                name,
                elements,
                fixed_len,
            } => {
                if let Some(text) = self.as_text() {
                    write!(f, "{name}: \"{text}\"")
                } else {
                    match fixed_len {
                        Some(n) => write!(f, "{name}: [{}; {n}]", elements.len()),
                        None => write!(f, "{name}: [{}]", elements.len()),
                    }
                }
            }
        }
    }
}
