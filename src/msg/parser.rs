// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Field resolver: turns token sections into validated, ordered field lists.
//!
//! Hard errors abort the file (duplicate names, identifiers shadowing
//! built-in types, bad constant literals, wrong section counts). Convention
//! problems are collected as warnings and returned alongside the fields.

use crate::core::error::{Result, RosError};
use crate::msg::model::{is_builtin_type, is_rust_keyword, Field, FieldSpec, InterfaceKind};
use crate::msg::token::{Token, TokenKind};

/// Fields and warnings for one resolved interface file.
#[derive(Debug, Clone)]
pub struct ResolvedInterface {
    pub kind: InterfaceKind,
    /// One field list per section, in declaration order
    pub sections: Vec<Vec<Field>>,
    /// Convention warnings, never fatal
    pub warnings: Vec<String>,
}

/// Resolves token sections for one file.
pub struct FieldResolver<'a> {
    file: &'a str,
}

impl<'a> FieldResolver<'a> {
    pub fn new(file: &'a str) -> Self {
        FieldResolver { file }
    }

    pub fn resolve(
        &self,
        kind: InterfaceKind,
        token_sections: Vec<Vec<Token>>,
    ) -> Result<ResolvedInterface> {
        if token_sections.len() != kind.section_count() {
            return Err(RosError::syntax(
                self.file,
                1,
                format!(
                    "a .{} file must have {} section(s), found {}",
                    kind.extension(),
                    kind.section_count(),
                    token_sections.len()
                ),
            ));
        }

        let mut warnings = Vec::new();
        let mut sections = Vec::with_capacity(token_sections.len());
        for tokens in token_sections {
            sections.push(self.resolve_section(tokens, &mut warnings)?);
        }

        Ok(ResolvedInterface {
            kind,
            sections,
            warnings,
        })
    }

    fn resolve_section(
        &self,
        tokens: Vec<Token>,
        warnings: &mut Vec<String>,
    ) -> Result<Vec<Field>> {
        let mut fields: Vec<Field> = Vec::new();
        let mut pending_comments: Vec<String> = Vec::new();
        let mut seen_non_constant = false;

        let mut iter = tokens.into_iter().peekable();
        while let Some(token) = iter.next() {
            match token.kind {
                TokenKind::Comment => {
                    pending_comments.push(token.text);
                    continue;
                }
                TokenKind::BuiltInType | TokenKind::DefinedType | TokenKind::Header => {}
                _ => {
                    return Err(RosError::syntax(
                        self.file,
                        token.line,
                        format!("unexpected token '{}'", token.text),
                    ));
                }
            }

            let type_token = token;
            let line = type_token.line;

            let array_size = match iter.peek().map(|t| t.kind) {
                Some(TokenKind::VariableSizeArray) => {
                    iter.next();
                    Some(None)
                }
                Some(TokenKind::FixedSizeArray) => {
                    let t = iter.next().unwrap();
                    let n: u32 = t.text.parse().map_err(|_| {
                        RosError::syntax(self.file, line, format!("bad array size '{}'", t.text))
                    })?;
                    Some(Some(n))
                }
                _ => None,
            };

            let name_token = iter.next().filter(|t| t.kind == TokenKind::Identifier).ok_or_else(
                || RosError::syntax(self.file, line, "expected a field name after the type"),
            )?;

            let constant_value = match iter.peek().map(|t| t.kind) {
                Some(TokenKind::ConstantDeclaration) => Some(iter.next().unwrap().text),
                _ => None,
            };
            let trailing_comment = match iter.peek() {
                Some(t) if t.kind == TokenKind::Comment && t.line == line => {
                    Some(iter.next().unwrap().text)
                }
                _ => None,
            };

            let field = self.build_field(
                type_token,
                array_size,
                name_token,
                constant_value,
                trailing_comment,
                std::mem::take(&mut pending_comments),
                &fields,
                &mut seen_non_constant,
                warnings,
            )?;
            fields.push(field);
        }

        Ok(fields)
    }

    #[allow(clippy::too_many_arguments)]
    fn build_field(
        &self,
        type_token: Token,
        array_size: Option<Option<u32>>,
        name_token: Token,
        constant_value: Option<String>,
        trailing_comment: Option<String>,
        leading_comments: Vec<String>,
        fields: &[Field],
        seen_non_constant: &mut bool,
        warnings: &mut Vec<String>,
    ) -> Result<Field> {
        let line = name_token.line;
        let mut name = name_token.text;

        if !is_valid_identifier(&name) {
            return Err(RosError::syntax(
                self.file,
                line,
                format!("'{name}' is not a valid field name"),
            ));
        }
        if is_builtin_type(&name) {
            return Err(RosError::syntax(
                self.file,
                line,
                format!("field name '{name}' shadows a built-in type"),
            ));
        }
        if is_rust_keyword(&name) {
            warnings.push(format!(
                "{}:{line}: field name '{name}' is a Rust keyword, renamed to '_{name}'",
                self.file
            ));
            name = format!("_{name}");
        }
        if fields.iter().any(|f| f.name() == name) {
            return Err(RosError::duplicate_field(name, self.file, line));
        }

        let (ros_type, package) = split_qualified(&type_token.text);
        let mut spec = FieldSpec {
            name,
            ros_type,
            package,
            leading_comments,
            trailing_comment,
        };

        if type_token.kind == TokenKind::Header {
            if *seen_non_constant || constant_value.is_some() {
                warnings.push(format!(
                    "{}:{line}: Header is not the first field and keeps its declared package",
                    self.file
                ));
            } else {
                spec.package = Some("std_msgs".to_string());
            }
            if spec.name != "header" {
                warnings.push(format!(
                    "{}:{line}: Header field is conventionally named 'header', found '{}'",
                    self.file, spec.name
                ));
            }
            if array_size.is_some() {
                warnings.push(format!(
                    "{}:{line}: Header declared as an array",
                    self.file
                ));
            }
        }

        if let Some(raw_value) = constant_value {
            if type_token.kind != TokenKind::BuiltInType {
                return Err(RosError::syntax(
                    self.file,
                    line,
                    format!("constants require a built-in type, found '{}'", type_token.text),
                ));
            }
            if array_size.is_some() {
                return Err(RosError::syntax(
                    self.file,
                    line,
                    "constants cannot have an array type",
                ));
            }
            let (value, comment) = self.parse_constant(&spec.ros_type, &raw_value, line)?;
            if spec.trailing_comment.is_none() {
                spec.trailing_comment = comment;
            }
            return Ok(Field::Constant { spec, value });
        }

        *seen_non_constant = true;
        match array_size {
            Some(size) => Ok(Field::Array { spec, size }),
            None => Ok(Field::Plain(spec)),
        }
    }

    /// Validate and normalize a constant literal for its declared type,
    /// returning the literal and any trailing comment.
    ///
    /// String constants take the rest of the line verbatim (outer whitespace
    /// trimmed, `#` kept, so they never carry a comment). Other types cut at
    /// the first `#`, keep the remainder as the comment, and must parse.
    fn parse_constant(
        &self,
        ros_type: &str,
        raw: &str,
        line: u32,
    ) -> Result<(String, Option<String>)> {
        if ros_type == "string" {
            return Ok((raw.trim().to_string(), None));
        }

        let (literal, comment) = match raw.find('#') {
            Some(pos) => {
                let remark = raw[pos + 1..].trim();
                let comment = (!remark.is_empty()).then(|| remark.to_string());
                (raw[..pos].trim(), comment)
            }
            None => (raw.trim(), None),
        };
        let ok = match ros_type {
            // ROS also writes bool constants as 0 or a nonzero byte.
            "bool" => {
                matches!(literal.to_ascii_lowercase().as_str(), "true" | "false")
                    || literal.parse::<u8>().is_ok()
            }
            "int8" => literal.parse::<i8>().is_ok(),
            "uint8" | "byte" | "char" => literal.parse::<u8>().is_ok(),
            "int16" => literal.parse::<i16>().is_ok(),
            "uint16" => literal.parse::<u16>().is_ok(),
            "int32" => literal.parse::<i32>().is_ok(),
            "uint32" => literal.parse::<u32>().is_ok(),
            "int64" => literal.parse::<i64>().is_ok(),
            "uint64" => literal.parse::<u64>().is_ok(),
            "float32" => literal.parse::<f32>().is_ok(),
            "float64" => literal.parse::<f64>().is_ok(),
            _ => false,
        };
        if !ok {
            return Err(RosError::constant_mismatch(ros_type, literal, self.file, line));
        }
        Ok((literal.to_string(), comment))
    }
}

fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn split_qualified(type_name: &str) -> (String, Option<String>) {
    match type_name.split_once('/') {
        Some((pkg, name)) => (name.to_string(), Some(pkg.to_string())),
        None => (type_name.to_string(), None),
    }
}
