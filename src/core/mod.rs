// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Core types shared by both pipelines.

pub mod error;
pub mod field;
pub mod time;

pub use error::{Result, RosError};
pub use field::{FieldValue, PrimitiveType};
pub use time::Time;
