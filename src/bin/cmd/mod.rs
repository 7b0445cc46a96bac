// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! CLI command implementations.

mod generate;
mod inspect;
mod query;

pub use generate::GenerateCmd;
pub use inspect::InspectCmd;
pub use query::QueryCmd;
