//! Next-word suggestion from per-dataset word n-grams.
//!
//! This crate provides:
//! - Phrase normalization for Persian/Arabic-script text
//! - A fixed-order word n-gram model trained per named dataset
//! - Pluggable record stores (SQLite, postcard snapshot, in-memory)
//! - A corpus loader reading one CSV file per dataset
//!
//! Suggestions rank raw frequencies; there is no smoothing or back-off.

/// Corpus directory / file loading.
pub mod corpus;

/// Error types shared by the crate.
pub mod error;

/// N-gram table, model and configuration.
pub mod model;

/// Text normalization applied before splitting on whitespace.
pub mod normalizer;

/// Persistence boundary and its implementations.
pub mod store;

/// I/O utilities (file listing, path helpers).
///
/// Not exposed
pub(crate) mod io;

pub use corpus::{CorpusLoader, CorpusSummary};
pub use error::{CorpusError, NGramError};
pub use model::{ModelConfig, NGramModel, PersistMode};
pub use normalizer::normalize;
pub use store::{MemoryStore, ModelStore, NGramEntry, SnapshotStore, SqliteStore, StoreError};
