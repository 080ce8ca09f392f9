//! Persistence boundary of the model.
//!
//! The model never hands out a live reference to its table. It writes owned
//! `NGramEntry` snapshots through `ModelStore` and rebuilds its own
//! partitioning from `list_all` when loading.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// In-process store, used by tests and as a scratch backend.
pub mod memory;

/// File-backed store serialized with `postcard`.
pub mod snapshot;

/// SQLite-backed store.
pub mod sqlite;

pub use memory::MemoryStore;
pub use snapshot::SnapshotStore;
pub use sqlite::SqliteStore;

/// A single persisted `(dataset, context) -> word` count.
///
/// `context` is the space-joined sequence of preceding words.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct NGramEntry {
	pub dataset_name: String,
	pub context: String,
	pub word: String,
	pub frequency: u64,
}

impl NGramEntry {
	pub fn new(dataset_name: &str, context: &str, word: &str, frequency: u64) -> Self {
		Self {
			dataset_name: dataset_name.to_owned(),
			context: context.to_owned(),
			word: word.to_owned(),
			frequency,
		}
	}

	/// Returns true if both entries address the same `(dataset, context, word)` triple.
	pub fn same_key(&self, other: &Self) -> bool {
		self.dataset_name == other.dataset_name && self.context == other.context && self.word == other.word
	}
}

impl fmt::Display for NGramEntry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}: {} -> {} ({})", self.dataset_name, self.context, self.word, self.frequency)
	}
}

/// Errors raised by a storage backend.
#[derive(Error, Debug)]
pub enum StoreError {
	#[error("database error: {0}")]
	Database(#[from] rusqlite::Error),

	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),

	#[error("snapshot codec error: {0}")]
	Codec(#[from] postcard::Error),

	#[error("frequency {0} does not fit in storage")]
	FrequencyOverflow(u64),

	#[error("corrupt stored record: {0}")]
	CorruptRecord(String),
}

/// Durable record store consumed by `NGramModel`.
///
/// No filtering happens here: the model reads everything and partitions by
/// dataset itself.
pub trait ModelStore {
	/// Returns every stored record, in storage order.
	fn list_all(&self) -> Result<Vec<NGramEntry>, StoreError>;

	/// Appends a record, even if one already exists for the same triple.
	fn create(&mut self, entry: &NGramEntry) -> Result<(), StoreError>;

	/// Replaces the frequency of the record for the same triple, or creates it.
	fn upsert(&mut self, entry: &NGramEntry) -> Result<(), StoreError>;

	/// Makes buffered writes durable. Stores that write immediately keep the default.
	fn flush(&mut self) -> Result<(), StoreError> {
		Ok(())
	}
}
