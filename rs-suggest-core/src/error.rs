use thiserror::Error;

use crate::store::StoreError;

/// Errors raised while reading a corpus directory or file.
#[derive(Error, Debug)]
pub enum CorpusError {
	#[error("IO error on {path}: {source}")]
	Io {
		path: String,
		#[source]
		source: std::io::Error,
	},

	#[error("CSV error in {path}: {source}")]
	Csv {
		path: String,
		#[source]
		source: csv::Error,
	},

	#[error("Expected a directory, got: {0}")]
	NotADirectory(String),

	#[error("A training worker for dataset '{dataset}' stopped before finishing")]
	WorkerFailed { dataset: String },
}

/// Errors raised by `NGramModel`.
#[derive(Error, Debug)]
pub enum NGramError {
	#[error("n must be >= 2, got {0}")]
	InvalidOrder(usize),

	#[error("Order mismatch: expected {expected}, got {got}")]
	OrderMismatch { expected: usize, got: usize },

	#[error("Storage error: {0}")]
	Store(#[from] StoreError),

	#[error("Corpus error: {0}")]
	Corpus(#[from] CorpusError),
}

pub type Result<T> = std::result::Result<T, NGramError>;
