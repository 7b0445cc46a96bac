// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Parser for the self-describing message definitions embedded in
//! Connection records.
//!
//! A definition block is the main definition followed by its transitive
//! sub-definitions, separated by 80-character `=` divider lines. Each
//! sub-definition opens with `MSG: pkg/Name`. Sub-definitions are
//! registered back to front so that every definition can resolve the types
//! that follow it in the block, then the main definition is flattened
//! against the registry.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;

use crate::core::error::{Result, RosError};
use crate::core::field::{FieldValue, PrimitiveType};

/// Parsed definitions by type name. Sub-definitions are registered under
/// both their full `pkg/Name` and bare `Name`.
pub type DefinitionRegistry = HashMap<String, Vec<FieldValue>>;

fn comment_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"#.*$").unwrap())
}

fn array_suffix_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(.+?)\[(\d*)\]$").unwrap())
}

/// Parse a full definition block into the flattened field templates of the
/// main definition.
pub fn parse_message_definition(text: &str) -> Result<Vec<FieldValue>> {
    let mut registry = DefinitionRegistry::new();
    let parts = split_definitions(text);

    for sub in parts[1..].iter().rev() {
        let (full_name, body) = split_sub_definition(sub)?;
        let fields = parse_definition_body(&body, &registry)?;
        let bare = full_name.rsplit('/').next().unwrap_or(&full_name).to_string();
        registry.insert(full_name, fields.clone());
        registry.insert(bare, fields);
    }

    parse_definition_body(&parts[0], &registry)
}

/// Parse one definition body against an existing registry.
pub fn parse_definition_body(lines: &[&str], registry: &DefinitionRegistry) -> Result<Vec<FieldValue>> {
    let mut fields = Vec::new();

    for raw_line in lines {
        let stripped = comment_re().replace(raw_line, "");
        let line = stripped.trim();
        if line.is_empty() {
            continue;
        }

        // Assignment lines declare constants, which occupy no wire bytes.
        // The value may be empty, so presence of '=' alone decides.
        if line.contains('=') {
            continue;
        }
        let words: Vec<&str> = line.split_whitespace().collect();
        if words.len() != 2 {
            return Err(RosError::schema(
                "message_definition",
                format!("cannot parse line '{line}'"),
            ));
        }

        let (type_word, name) = (words[0], words[1]);
        let (base_type, array_len) = split_array_suffix(type_word)?;
        let resolved = resolve_type(&base_type, name, registry)?;

        match array_len {
            None => fields.extend(resolved),
            Some(fixed_len) => fields.push(FieldValue::array(name, resolved, fixed_len)),
        }
    }

    Ok(fields)
}

/// Split the block on 80-character `=` divider lines. The first part is the
/// main definition.
fn split_definitions(text: &str) -> Vec<Vec<&str>> {
    let mut parts = vec![Vec::new()];
    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.len() == 80 && trimmed.chars().all(|c| c == '=') {
            parts.push(Vec::new());
        } else {
            parts.last_mut().unwrap().push(line);
        }
    }
    parts
}

/// Pull the `MSG: pkg/Name` opener off a sub-definition.
fn split_sub_definition<'a>(lines: &[&'a str]) -> Result<(String, Vec<&'a str>)> {
    for (idx, raw_line) in lines.iter().enumerate() {
        let stripped = comment_re().replace(raw_line, "");
        let line = stripped.trim();
        if line.is_empty() {
            continue;
        }
        let name = line.strip_prefix("MSG:").ok_or_else(|| {
            RosError::schema(
                "message_definition",
                format!("sub-definition does not start with 'MSG:', found '{line}'"),
            )
        })?;
        return Ok((name.trim().to_string(), lines[idx + 1..].to_vec()));
    }
    Err(RosError::schema("message_definition", "empty sub-definition"))
}

fn split_array_suffix(type_word: &str) -> Result<(String, Option<Option<u32>>)> {
    let Some(caps) = array_suffix_re().captures(type_word) else {
        return Ok((type_word.to_string(), None));
    };
    let base = caps[1].to_string();
    let size_text = &caps[2];
    if size_text.is_empty() {
        return Ok((base, Some(None)));
    }
    let n: u32 = size_text.parse().map_err(|_| {
        RosError::schema(
            "message_definition",
            format!("bad array size in '{type_word}'"),
        )
    })?;
    Ok((base, Some(Some(n))))
}

/// Expand one type reference to its field templates, named for the
/// declaring field. Sub-message members get a dotted `name.member` prefix.
fn resolve_type(base_type: &str, name: &str, registry: &DefinitionRegistry) -> Result<Vec<FieldValue>> {
    if base_type == "string" {
        // Strings decode as variable-length char arrays.
        return Ok(vec![FieldValue::array(
            name,
            vec![FieldValue::scalar(name, PrimitiveType::Char)],
            None,
        )]);
    }
    if let Some(prim) = PrimitiveType::from_name(base_type) {
        return Ok(vec![FieldValue::scalar(name, prim)]);
    }

    let template = registry
        .get(base_type)
        .or_else(|| registry.get(base_type.rsplit('/').next().unwrap_or(base_type)))
        .ok_or_else(|| RosError::type_not_found(base_type))?;

    let mut expanded = template.clone();
    for field in &mut expanded {
        prefix_names(field, name);
    }
    Ok(expanded)
}

fn prefix_names(field: &mut FieldValue, prefix: &str) {
    field.set_name(format!("{prefix}.{}", field.name()));
    if let FieldValue::Array { elements, .. } = field {
        for el in elements {
            prefix_names(el, prefix);
        }
    }
}
