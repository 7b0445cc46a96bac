// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Core error types for bagcodec.
//!
//! Covers both pipelines:
//! - Interface-definition compilation (syntax, constants, identifiers)
//! - ROSbag reading (record framing, header fields, schema resolution)

use std::fmt;

/// Errors that can occur while compiling message definitions or reading bags.
#[derive(Debug, Clone)]
pub enum RosError {
    /// Lexical or grammar error in a .msg/.srv/.action file
    Syntax {
        /// Source file path
        file: String,
        /// Line number (1-based)
        line: u32,
        /// Error message
        message: String,
    },

    /// Constant literal does not parse as its declared type
    ConstantMismatch {
        /// Declared ROS type
        expected: String,
        /// Offending literal
        value: String,
        /// Source file path
        file: String,
        /// Line number (1-based)
        line: u32,
    },

    /// Duplicate field name within one section
    DuplicateField {
        /// Field name declared twice
        name: String,
        /// Source file path
        file: String,
        /// Line number (1-based)
        line: u32,
    },

    /// Error in an embedded message-definition text block
    Schema {
        /// What was being parsed
        context: String,
        /// Error message
        message: String,
    },

    /// Type name is neither primitive nor registered as a sub-definition
    TypeNotFound {
        /// Type name that could not be resolved
        type_name: String,
    },

    /// Header field name outside the closed ROSbag field table
    UnknownHeaderField {
        /// Field name found in the record header
        name: String,
    },

    /// Record header is missing a field its opcode requires
    MissingHeaderField {
        /// Record opcode
        op: u8,
        /// Missing field name
        name: String,
    },

    /// Malformed record framing or container structure
    Format {
        /// What was being read
        context: String,
        /// Error message
        message: String,
    },

    /// Buffer too short for requested read
    BufferTooShort {
        /// Requested bytes
        requested: usize,
        /// Available bytes
        available: usize,
        /// Cursor position when error occurred
        cursor_pos: u64,
    },

    /// Messages left without a Connection record at end of stream
    UnresolvedConnections {
        /// (connection id, pending message count) per orphaned id
        pending: Vec<(u32, usize)>,
    },

    /// I/O error
    Io {
        /// What was being accessed
        context: String,
        /// Error message
        message: String,
    },
}

impl RosError {
    /// Create a syntax error with source position.
    pub fn syntax(file: impl Into<String>, line: u32, message: impl Into<String>) -> Self {
        RosError::Syntax {
            file: file.into(),
            line,
            message: message.into(),
        }
    }

    /// Create a constant type-mismatch error.
    pub fn constant_mismatch(
        expected: impl Into<String>,
        value: impl Into<String>,
        file: impl Into<String>,
        line: u32,
    ) -> Self {
        RosError::ConstantMismatch {
            expected: expected.into(),
            value: value.into(),
            file: file.into(),
            line,
        }
    }

    /// Create a duplicate-field error.
    pub fn duplicate_field(name: impl Into<String>, file: impl Into<String>, line: u32) -> Self {
        RosError::DuplicateField {
            name: name.into(),
            file: file.into(),
            line,
        }
    }

    /// Create a schema error.
    pub fn schema(context: impl Into<String>, message: impl Into<String>) -> Self {
        RosError::Schema {
            context: context.into(),
            message: message.into(),
        }
    }

    /// Create a "type not found" error.
    pub fn type_not_found(type_name: impl Into<String>) -> Self {
        RosError::TypeNotFound {
            type_name: type_name.into(),
        }
    }

    /// Create an unknown-header-field error.
    pub fn unknown_header_field(name: impl Into<String>) -> Self {
        RosError::UnknownHeaderField { name: name.into() }
    }

    /// Create a missing-header-field error.
    pub fn missing_header_field(op: u8, name: impl Into<String>) -> Self {
        RosError::MissingHeaderField {
            op,
            name: name.into(),
        }
    }

    /// Create a format error.
    pub fn format(context: impl Into<String>, message: impl Into<String>) -> Self {
        RosError::Format {
            context: context.into(),
            message: message.into(),
        }
    }

    /// Create a buffer too short error.
    pub fn buffer_too_short(requested: usize, available: usize, cursor_pos: u64) -> Self {
        RosError::BufferTooShort {
            requested,
            available,
            cursor_pos,
        }
    }

    /// Get structured fields for logging.
    pub fn log_fields(&self) -> Vec<(&'static str, String)> {
        match self {
            RosError::Syntax {
                file,
                line,
                message,
            } => vec![
                ("file", file.clone()),
                ("line", line.to_string()),
                ("message", message.clone()),
            ],
            RosError::ConstantMismatch {
                expected,
                value,
                file,
                line,
            } => vec![
                ("expected", expected.clone()),
                ("value", value.clone()),
                ("file", file.clone()),
                ("line", line.to_string()),
            ],
            RosError::DuplicateField { name, file, line } => vec![
                ("field", name.clone()),
                ("file", file.clone()),
                ("line", line.to_string()),
            ],
            RosError::Schema { context, message } => {
                vec![("context", context.clone()), ("message", message.clone())]
            }
            RosError::TypeNotFound { type_name } => vec![("type", type_name.clone())],
            RosError::UnknownHeaderField { name } => vec![("field", name.clone())],
            RosError::MissingHeaderField { op, name } => {
                vec![("op", op.to_string()), ("field", name.clone())]
            }
            RosError::Format { context, message } => {
                vec![("context", context.clone()), ("message", message.clone())]
            }
            RosError::BufferTooShort {
                requested,
                available,
                cursor_pos,
            } => vec![
                ("requested", requested.to_string()),
                ("available", available.to_string()),
                ("cursor", cursor_pos.to_string()),
            ],
            RosError::UnresolvedConnections { pending } => vec![(
                "pending",
                pending
                    .iter()
                    .map(|(conn, count)| format!("{conn}:{count}"))
                    .collect::<Vec<_>>()
                    .join(","),
            )],
            RosError::Io { context, message } => {
                vec![("context", context.clone()), ("message", message.clone())]
            }
        }
    }
}

impl fmt::Display for RosError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RosError::Syntax {
                file,
                line,
                message,
            } => write!(f, "Syntax error at {file}:{line}: {message}"),
            RosError::ConstantMismatch {
                expected,
                value,
                file,
                line,
            } => write!(
                f,
                "Type mismatch at {file}:{line}: expecting {expected}, but value '{value}' is not {expected}"
            ),
            RosError::DuplicateField { name, file, line } => {
                write!(f, "Field '{name}' at {file}:{line} already declared")
            }
            RosError::Schema { context, message } => {
                write!(f, "Schema error in {context}: {message}")
            }
            RosError::TypeNotFound { type_name } => write!(
                f,
                "Type '{type_name}' is not a primitive type or defined in the message definition"
            ),
            RosError::UnknownHeaderField { name } => {
                write!(f, "Header field '{name}' is not defined in the ROSbag format")
            }
            RosError::MissingHeaderField { op, name } => {
                write!(f, "Record header with op {op} is missing required field '{name}'")
            }
            RosError::Format { context, message } => {
                write!(f, "Format error in {context}: {message}")
            }
            RosError::BufferTooShort {
                requested,
                available,
                cursor_pos,
            } => write!(
                f,
                "Buffer too short: requested {requested} bytes at position {cursor_pos}, but only {available} bytes available"
            ),
            RosError::UnresolvedConnections { pending } => {
                let ids = pending
                    .iter()
                    .map(|(conn, count)| format!("{conn} ({count} messages)"))
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "Messages without a matching Connection record: {ids}")
            }
            RosError::Io { context, message } => write!(f, "I/O error in {context}: {message}"),
        }
    }
}

impl std::error::Error for RosError {}

impl From<std::io::Error> for RosError {
    fn from(err: std::io::Error) -> Self {
        RosError::Io {
            context: "io".to_string(),
            message: err.to_string(),
        }
    }
}

/// Result type for bagcodec operations.
pub type Result<T> = std::result::Result<T, RosError>;
