//! Application layer - Use cases and orchestration

pub mod expand;
pub mod include;
pub mod select;

pub use expand::DocumentExpander;
pub use include::{IncludeOutcome, IncludeProcessor, IncludedContent};
pub use select::{SelectLinesService, SelectedLines, Selection};
