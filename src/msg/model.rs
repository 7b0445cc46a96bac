// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Field model produced by the resolver and consumed by the generators.

use serde::{Deserialize, Serialize};

/// Interface file kinds and their required section counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InterfaceKind {
    Message,
    Service,
    Action,
}

impl InterfaceKind {
    /// Number of `---`-separated sections the file must contain.
    pub fn section_count(&self) -> usize {
        match self {
            InterfaceKind::Message => 1,
            InterfaceKind::Service => 2,
            InterfaceKind::Action => 3,
        }
    }

    /// File extension without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            InterfaceKind::Message => "msg",
            InterfaceKind::Service => "srv",
            InterfaceKind::Action => "action",
        }
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "msg" => Some(InterfaceKind::Message),
            "srv" => Some(InterfaceKind::Service),
            "action" => Some(InterfaceKind::Action),
            _ => None,
        }
    }

    /// Names of the generated struct per section, in section order.
    pub fn section_names(&self) -> &'static [&'static str] {
        match self {
            InterfaceKind::Message => &[""],
            InterfaceKind::Service => &["Request", "Response"],
            InterfaceKind::Action => &["Goal", "Result", "Feedback"],
        }
    }
}

/// Shared attributes of every declared field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Field name, after any keyword-collision rename
    pub name: String,
    /// ROS type name without package or array suffix
    pub ros_type: String,
    /// Package qualifier, if the declaration or promotion supplied one
    pub package: Option<String>,
    /// Full-line comments directly above the declaration
    pub leading_comments: Vec<String>,
    /// Comment on the declaration line itself
    pub trailing_comment: Option<String>,
}

impl FieldSpec {
    /// Fully-qualified ROS type, `pkg/Name` when a package is known.
    pub fn qualified_type(&self) -> String {
        match &self.package {
            Some(pkg) => format!("{}/{}", pkg, self.ros_type),
            None => self.ros_type.clone(),
        }
    }
}

/// One resolved declaration.
///
/// String constants keep any `#` text verbatim; ROS treats the whole rest
/// of the line as the value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Field {
    Plain(FieldSpec),
    Constant { spec: FieldSpec, value: String },
    Array { spec: FieldSpec, size: Option<u32> },
}

impl Field {
    pub fn spec(&self) -> &FieldSpec {
        match self {
            Field::Plain(spec) => spec,
            Field::Constant { spec, .. } => spec,
            Field::Array { spec, .. } => spec,
        }
    }

    pub fn spec_mut(&mut self) -> &mut FieldSpec {
        match self {
            Field::Plain(spec) => spec,
            Field::Constant { spec, .. } => spec,
            Field::Array { spec, .. } => spec,
        }
    }

    pub fn name(&self) -> &str {
        &self.spec().name
    }

    pub fn is_constant(&self) -> bool {
        matches!(self, Field::Constant { .. })
    }
}

/// Rust type name for a built-in ROS type, `None` for message types.
/// Interface files write the temporal types both lowercase and capitalized.
pub fn builtin_rust_type(ros_type: &str) -> Option<&'static str> {
    match ros_type {
        "bool" => Some("bool"),
        "int8" => Some("i8"),
        "uint8" | "byte" | "char" => Some("u8"),
        "int16" => Some("i16"),
        "uint16" => Some("u16"),
        "int32" => Some("i32"),
        "uint32" => Some("u32"),
        "int64" => Some("i64"),
        "uint64" => Some("u64"),
        "float32" => Some("f32"),
        "float64" => Some("f64"),
        "string" => Some("String"),
        "time" | "Time" => Some("Time"),
        "duration" | "Duration" => Some("Duration"),
        _ => None,
    }
}

/// Built-in ROS type names, for identifier-collision checks.
pub fn is_builtin_type(name: &str) -> bool {
    builtin_rust_type(name).is_some()
}

/// Reserved Rust words that cannot be used as generated field names.
pub fn is_rust_keyword(name: &str) -> bool {
    matches!(
        name,
        "as" | "async" | "await" | "break" | "const" | "continue" | "crate" | "dyn" | "else"
            | "enum" | "extern" | "false" | "fn" | "for" | "if" | "impl" | "in" | "let" | "loop"
            | "match" | "mod" | "move" | "mut" | "pub" | "ref" | "return" | "self" | "Self"
            | "static" | "struct" | "super" | "trait" | "true" | "type" | "unsafe" | "use"
            | "where" | "while"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_counts() {
        assert_eq!(InterfaceKind::Message.section_count(), 1);
        assert_eq!(InterfaceKind::Service.section_count(), 2);
        assert_eq!(InterfaceKind::Action.section_count(), 3);
    }

    #[test]
    fn test_from_extension() {
        assert_eq!(InterfaceKind::from_extension("srv"), Some(InterfaceKind::Service));
        assert_eq!(InterfaceKind::from_extension("txt"), None);
    }

    #[test]
    fn test_qualified_type() {
        let spec = FieldSpec {
            name: "header".into(),
            ros_type: "Header".into(),
            package: Some("std_msgs".into()),
            leading_comments: vec![],
            trailing_comment: None,
        };
        assert_eq!(spec.qualified_type(), "std_msgs/Header");
    }

    #[test]
    fn test_builtin_mapping() {
        assert_eq!(builtin_rust_type("uint8"), Some("u8"));
        assert_eq!(builtin_rust_type("byte"), Some("u8"));
        assert_eq!(builtin_rust_type("float64"), Some("f64"));
        assert_eq!(builtin_rust_type("string"), Some("String"));
        assert_eq!(builtin_rust_type("Time"), Some("Time"));
        assert_eq!(builtin_rust_type("duration"), Some("Duration"));
        assert_eq!(builtin_rust_type("Header"), None);
    }

    #[test]
    fn test_keyword_table() {
        assert!(is_rust_keyword("type"));
        assert!(is_rust_keyword("match"));
        assert!(!is_rust_keyword("position"));
    }
}
