// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Generate command - compile interface files to Rust source.

use std::path::PathBuf;

use clap::Args;

use crate::common::Result;
use bagcodec::msg::generate_all;

/// Compile `.msg`/`.srv`/`.action` files.
#[derive(Args, Clone, Debug)]
pub struct GenerateCmd {
    /// Interface file or directory to search
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output directory for generated Rust source
    #[arg(short, long, default_value = "gen", value_name = "DIR")]
    out_dir: PathBuf,
}

impl GenerateCmd {
    pub fn run(self) -> Result<()> {
        let report = generate_all(&self.input, &self.out_dir)?;

        for path in &report.generated {
            println!("generated {}", path.display());
        }
        if !report.warnings.is_empty() {
            println!();
            println!("{} warning(s):", report.warnings.len());
            for warning in &report.warnings {
                println!("  {warning}");
            }
        }
        if !report.failures.is_empty() {
            println!();
            println!("{} file(s) skipped:", report.failures.len());
            for (file, err) in &report.failures {
                println!("  {}: {err}", file.display());
            }
            anyhow::bail!("{} of the input files failed", report.failures.len());
        }

        println!();
        println!("{} file(s) generated", report.generated.len());
        Ok(())
    }
}
