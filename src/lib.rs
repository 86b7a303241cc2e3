//! include-ext - Selective content inclusion for document markup
//!
//! Expands `include::<target>[]` directives, optionally keeping only some of
//! the target's lines, chosen by line ranges (`lines=1;3..5`) or by tagged
//! regions (`tags=snippets;!snippet-b`).

pub mod application;
pub mod cli;
pub mod domain;
pub mod error;
pub mod infrastructure;

pub use error::IncludeError;
