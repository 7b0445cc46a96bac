// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Code generation from resolved interface files.
//!
//! One generator per interface kind, selected statically through associated
//! consts. Batch runs walk a directory for matching extensions; a failure in
//! one file skips that file only.

use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::{debug, error};

use crate::core::error::{Result, RosError};
use crate::msg::model::{builtin_rust_type, Field, InterfaceKind};
use crate::msg::parser::{FieldResolver, ResolvedInterface};
use crate::msg::token::Tokenizer;

/// A code generator for one interface kind.
pub trait Generator {
    /// File extension this generator consumes, without the dot.
    const EXTENSION: &'static str;
    /// Interface kind, fixes the required section count.
    const KIND: InterfaceKind;

    /// Generate Rust source for one interface file, returning the output
    /// path and accumulated warnings.
    fn generate_file(input: &Path, out_dir: &Path) -> Result<(PathBuf, Vec<String>)> {
        let file_name = input.display().to_string();
        let source = fs::read_to_string(input).map_err(|e| RosError::Io {
            context: file_name.clone(),
            message: e.to_string(),
        })?;
        let type_name = input
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| RosError::format(&file_name, "file has no stem"))?;

        let sections = Tokenizer::new(&file_name, &source).tokenize()?;
        let iface = FieldResolver::new(&file_name).resolve(Self::KIND, sections)?;

        let code = emit_interface(type_name, &iface);
        let out_path = out_dir.join(format!("{}.rs", snake_case(type_name)));
        fs::create_dir_all(out_dir)?;
        fs::write(&out_path, code)?;

        debug!(input = %file_name, output = %out_path.display(), "generated");
        Ok((out_path, iface.warnings))
    }
}

pub struct MessageGenerator;
pub struct ServiceGenerator;
pub struct ActionGenerator;

impl Generator for MessageGenerator {
    const EXTENSION: &'static str = "msg";
    const KIND: InterfaceKind = InterfaceKind::Message;
}

impl Generator for ServiceGenerator {
    const EXTENSION: &'static str = "srv";
    const KIND: InterfaceKind = InterfaceKind::Service;
}

impl Generator for ActionGenerator {
    const EXTENSION: &'static str = "action";
    const KIND: InterfaceKind = InterfaceKind::Action;
}

/// Outcome of a batch run.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub generated: Vec<PathBuf>,
    pub warnings: Vec<String>,
    /// (input file, error) for files that were skipped
    pub failures: Vec<(PathBuf, RosError)>,
}

impl BatchReport {
    pub fn merge(&mut self, other: BatchReport) {
        self.generated.extend(other.generated);
        self.warnings.extend(other.warnings);
        self.failures.extend(other.failures);
    }
}

/// Generate from a single file or every matching file under a directory.
/// Files are independent, so the batch fans out across threads.
pub fn generate_batch<G: Generator>(input: &Path, out_dir: &Path) -> Result<BatchReport> {
    let files = collect_inputs(input, G::EXTENSION)?;
    let results: Vec<_> = files
        .into_par_iter()
        .map(|file| {
            let outcome = G::generate_file(&file, out_dir);
            (file, outcome)
        })
        .collect();

    let mut report = BatchReport::default();
    for (file, outcome) in results {
        match outcome {
            Ok((path, warnings)) => {
                report.generated.push(path);
                report.warnings.extend(warnings);
            }
            Err(err) => {
                error!(input = %file.display(), error = %err, "generation failed, skipping file");
                report.failures.push((file, err));
            }
        }
    }
    Ok(report)
}

/// Run all three generators over a directory tree.
pub fn generate_all(input: &Path, out_dir: &Path) -> Result<BatchReport> {
    let mut report = generate_batch::<MessageGenerator>(input, out_dir)?;
    report.merge(generate_batch::<ServiceGenerator>(input, out_dir)?);
    report.merge(generate_batch::<ActionGenerator>(input, out_dir)?);
    Ok(report)
}

fn collect_inputs(input: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    if input.is_file() {
        if input.extension().and_then(|e| e.to_str()) == Some(extension) {
            return Ok(vec![input.to_path_buf()]);
        }
        return Ok(Vec::new());
    }
    let mut files = Vec::new();
    let mut stack = vec![input.to_path_buf()];
    while let Some(dir) = stack.pop() {
        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.is_dir() {
                stack.push(path);
            } else if path.extension().and_then(|e| e.to_str()) == Some(extension) {
                files.push(path);
            }
        }
    }
    files.sort();
    Ok(files)
}

/// Emit Rust source for one resolved interface.
pub fn emit_interface(type_name: &str, iface: &ResolvedInterface) -> String {
    let mut out = String::new();
    let section_names = iface.kind.section_names();

    for (fields, suffix) in iface.sections.iter().zip(section_names) {
        let struct_name = format!("{type_name}{suffix}");
        emit_struct(&mut out, &struct_name, fields);
    }
    out
}

fn emit_struct(out: &mut String, struct_name: &str, fields: &[Field]) {
    let data_fields: Vec<&Field> = fields.iter().filter(|f| !f.is_constant()).collect();
    let constants: Vec<&Field> = fields.iter().filter(|f| f.is_constant()).collect();

    out.push_str("#[derive(Debug, Clone, PartialEq)]\n");
    out.push_str(&format!("pub struct {struct_name} {{\n"));
    for field in &data_fields {
        let spec = field.spec();
        for comment in &spec.leading_comments {
            out.push_str(&format!("    /// {comment}\n"));
        }
        if let Some(comment) = &spec.trailing_comment {
            out.push_str(&format!("    /// {comment}\n"));
        }
        out.push_str(&format!("    pub {}: {},\n", spec.name, field_rust_type(field)));
    }
    out.push_str("}\n\n");

    if !constants.is_empty() {
        out.push_str(&format!("impl {struct_name} {{\n"));
        for field in &constants {
            if let Field::Constant { spec, value } = field {
                for comment in &spec.leading_comments {
                    out.push_str(&format!("    /// {comment}\n"));
                }
                if let Some(comment) = &spec.trailing_comment {
                    out.push_str(&format!("    /// {comment}\n"));
                }
                let (ty, literal) = constant_rust(&spec.ros_type, value);
                out.push_str(&format!("    pub const {}: {} = {};\n", spec.name, ty, literal));
            }
        }
        out.push_str("}\n\n");
    }

    out.push_str(&format!("impl Default for {struct_name} {{\n"));
    out.push_str("    fn default() -> Self {\n");
    out.push_str("        Self {\n");
    for field in &data_fields {
        let spec = field.spec();
        let init = match field {
            Field::Array { size: Some(_), .. } => "std::array::from_fn(|_| Default::default())",
            Field::Array { size: None, .. } => "Vec::new()",
            _ => "Default::default()",
        };
        out.push_str(&format!("            {}: {},\n", spec.name, init));
    }
    out.push_str("        }\n    }\n}\n\n");
}

fn field_rust_type(field: &Field) -> String {
    let spec = field.spec();
    let base = builtin_rust_type(&spec.ros_type)
        .map(str::to_string)
        .unwrap_or_else(|| spec.ros_type.clone());
    match field {
        Field::Array { size: Some(n), .. } => format!("[{base}; {n}]"),
        Field::Array { size: None, .. } => format!("Vec<{base}>"),
        _ => base,
    }
}

fn constant_rust(ros_type: &str, value: &str) -> (String, String) {
    if ros_type == "string" {
        let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
        return ("&str".to_string(), format!("\"{escaped}\""));
    }
    let ty = builtin_rust_type(ros_type).unwrap_or("i64").to_string();
    let literal = match ros_type {
        // Bool constants are written as true/false or as 0/nonzero.
        "bool" => match value.to_ascii_lowercase().as_str() {
            "true" => "true".to_string(),
            "false" | "0" => "false".to_string(),
            _ => "true".to_string(),
        },
        "float32" | "float64" if !value.contains(['.', 'e', 'E']) => format!("{value}.0"),
        _ => value.to_string(),
    };
    (ty, literal)
}

/// `CameraInfo` -> `camera_info`.
pub fn snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let mut prev_lower = false;
    for c in name.chars() {
        if c.is_ascii_uppercase() {
            if prev_lower {
                out.push('_');
            }
            out.push(c.to_ascii_lowercase());
            prev_lower = false;
        } else {
            prev_lower = c.is_ascii_lowercase() || c.is_ascii_digit();
            out.push(c);
        }
    }
    out
}
