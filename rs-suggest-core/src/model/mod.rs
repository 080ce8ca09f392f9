//! Word-level n-gram model.
//!
//! - Counting table shared by training, loading and merging (`ModelTable`)
//! - Per-context word counts with deterministic ranking (`State`)
//! - The store-backed model exposing train/persist/load/suggest (`NGramModel`)
//! - Construction parameters (`ModelConfig`)

/// Construction parameters and persistence mode.
pub mod config;

/// Store-backed n-gram model (`n >= 2`).
///
/// Handles phrase training, persistence, reloading and top-k suggestion.
pub mod ngram_model;

/// Candidate words observed after one context.
pub mod state;

/// In-memory counts keyed by dataset and context.
///
/// Usable without a store, which lets worker threads train partial tables.
pub mod table;

pub use config::{ModelConfig, PersistMode};
pub use ngram_model::NGramModel;
pub use table::{ContextKey, ModelTable};
