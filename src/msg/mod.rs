// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Interface-definition compiler: `.msg`/`.srv`/`.action` files to Rust
//! source. Tokenizer, field resolver, and code generators.

pub mod generate;
pub mod model;
pub mod parser;
pub mod token;

pub use generate::{
    generate_all, generate_batch, ActionGenerator, BatchReport, Generator, MessageGenerator,
    ServiceGenerator,
};
pub use model::{Field, FieldSpec, InterfaceKind};
pub use parser::{FieldResolver, ResolvedInterface};
pub use token::{Token, TokenKind, Tokenizer};
