//! Context selection for prompt assembly
//!
//! Ranked index matches are filtered by a similarity threshold, falling back
//! to the top matches when nothing clears it, then joined into a bounded
//! text block.

mod config;
mod selector;

pub use config::ContextSelectionConfig;
pub use selector::{ContextChunk, ContextSelector, SelectedContext};
