//! Corpus bootstrap: one CSV file per dataset, first column is the phrase.

use std::fs::File;
use std::path::Path;
use std::sync::mpsc;
use std::thread;

use crate::error::{CorpusError, Result};
use crate::io;
use crate::model::ngram_model::NGramModel;
use crate::model::table::ModelTable;
use crate::store::ModelStore;

/// Worker threads per CPU when training a file.
const CHUNK_FACTOR: usize = 8;

/// Phrases trained per dataset by a corpus load.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CorpusSummary {
	/// `(dataset_name, phrase_count)`, in file name order.
	pub datasets: Vec<(String, usize)>,
}

impl CorpusSummary {
	pub fn total_phrases(&self) -> usize {
		self.datasets.iter().map(|(_, count)| count).sum()
	}
}

/// Reads corpus files and trains a model from them.
///
/// Phrases of a file are split into chunks trained on worker threads into
/// standalone tables, then merged into the model on the calling thread.
/// The resulting counts are the same as training every phrase in turn.
#[derive(Debug, Clone)]
pub struct CorpusLoader {
	workers: usize,
}

impl Default for CorpusLoader {
	fn default() -> Self {
		Self { workers: num_cpus::get() * CHUNK_FACTOR }
	}
}

impl CorpusLoader {
	pub fn new() -> Self {
		Self::default()
	}

	/// Uses at most `workers` threads per file (at least one).
	pub fn with_workers(workers: usize) -> Self {
		Self { workers: workers.max(1) }
	}

	/// Reads the first field of every row of a CSV file.
	///
	/// Rows may carry any number of columns. The file has no header row.
	///
	/// # Errors
	/// The file cannot be opened or is not valid CSV / UTF-8.
	pub fn read_phrases<P: AsRef<Path>>(path: P) -> std::result::Result<Vec<String>, CorpusError> {
		let path = path.as_ref();
		let display = path.display().to_string();

		let file = File::open(path).map_err(|source| CorpusError::Io { path: display.clone(), source })?;
		let mut reader = csv::ReaderBuilder::new()
			.has_headers(false)
			.flexible(true)
			.from_reader(file);

		let mut phrases = Vec::new();
		for record in reader.records() {
			let record = record.map_err(|source| CorpusError::Csv { path: display.clone(), source })?;
			// The reader never yields a record without at least one field
			phrases.extend(record.get(0).map(str::to_owned));
		}
		Ok(phrases)
	}

	/// Trains every phrase of one corpus file under the file's stem.
	///
	/// Returns the dataset name and the number of phrases read.
	pub fn load_file<S, P>(&self, model: &mut NGramModel<S>, path: P) -> Result<(String, usize)>
	where
		S: ModelStore,
		P: AsRef<Path>,
	{
		let path = path.as_ref();
		let dataset_name = io::get_filename(path).map_err(|source| CorpusError::Io {
			path: path.display().to_string(),
			source,
		})?;

		let phrases = Self::read_phrases(path)?;
		let count = phrases.len();
		let partial = self.train_parallel(model.order(), &dataset_name, phrases)?;
		model.absorb(&partial)?;

		log::info!("Loaded {} phrases into dataset '{}'", count, dataset_name);
		Ok((dataset_name, count))
	}

	/// Trains every regular file of a directory, in file name order.
	///
	/// Stops at the first file that fails.
	pub fn load_dir<S, P>(&self, model: &mut NGramModel<S>, dir: P) -> Result<CorpusSummary>
	where
		S: ModelStore,
		P: AsRef<Path>,
	{
		let folder = io::normalize_folder(dir.as_ref());
		if !folder.is_dir() {
			return Err(CorpusError::NotADirectory(folder.display().to_string()).into());
		}

		let files = io::list_files(&folder).map_err(|source| CorpusError::Io {
			path: folder.display().to_string(),
			source,
		})?;

		let mut summary = CorpusSummary::default();
		for file in files {
			summary.datasets.push(self.load_file(model, &file)?);
		}
		log::info!(
			"Corpus {} loaded: {} datasets, {} phrases",
			folder.display(),
			summary.datasets.len(),
			summary.total_phrases()
		);
		Ok(summary)
	}

	/// Splits phrases into chunks, trains each chunk on its own thread and
	/// merges the partial tables.
	fn train_parallel(&self, order: usize, dataset_name: &str, phrases: Vec<String>) -> Result<ModelTable> {
		let mut final_table = ModelTable::new(order)?;
		if phrases.is_empty() {
			return Ok(final_table);
		}

		let chunk_size = phrases.len().div_ceil(self.workers);

		let (tx, rx) = mpsc::channel();
		let mut spawned = 0;
		for chunk in phrases.chunks(chunk_size) {
			let tx = tx.clone();
			let chunk: Vec<String> = chunk.to_vec();
			let dataset_name = dataset_name.to_owned();
			let mut partial = ModelTable::new(order)?;

			thread::spawn(move || {
				for phrase in &chunk {
					partial.train(phrase, &dataset_name);
				}
				// The receiver outlives every worker
				let _ = tx.send(partial);
			});
			spawned += 1;
		}
		drop(tx);

		let mut received = 0;
		for partial in rx.iter() {
			final_table.merge(&partial)?;
			received += 1;
		}
		if received != spawned {
			return Err(CorpusError::WorkerFailed { dataset: dataset_name.to_owned() }.into());
		}

		Ok(final_table)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::model::config::ModelConfig;
	use crate::store::MemoryStore;
	use std::fs;

	fn bigram() -> NGramModel<MemoryStore> {
		NGramModel::new(MemoryStore::new(), ModelConfig::default()).unwrap()
	}

	#[test]
	fn only_the_first_column_is_read() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("fa.csv");
		fs::write(&path, "این یک جمله,label,3\nسلام دنیا\n\"با, کاما\",x\n").unwrap();

		let phrases = CorpusLoader::read_phrases(&path).unwrap();
		assert_eq!(phrases, vec!["این یک جمله", "سلام دنیا", "با, کاما"]);
	}

	#[test]
	fn missing_file_is_an_io_error() {
		let dir = tempfile::tempdir().unwrap();
		let result = CorpusLoader::read_phrases(dir.path().join("absent.csv"));
		assert!(matches!(result, Err(CorpusError::Io { .. })));
	}

	#[test]
	fn invalid_utf8_is_a_csv_error() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("fa.csv");
		fs::write(&path, b"hello world\nbad \xff\xfe bytes\n").unwrap();

		let result = CorpusLoader::read_phrases(&path);
		assert!(matches!(result, Err(CorpusError::Csv { ref path, .. }) if path.ends_with("fa.csv")));
	}

	#[test]
	fn load_dir_stops_on_a_broken_file() {
		let dir = tempfile::tempdir().unwrap();
		fs::write(dir.path().join("fa.csv"), b"\xc3\x28 x\n").unwrap();

		let mut model = bigram();
		let result = CorpusLoader::new().load_dir(&mut model, dir.path());
		assert!(matches!(result, Err(crate::error::NGramError::Corpus(CorpusError::Csv { .. }))));
		assert!(model.is_empty());
	}

	#[test]
	fn parallel_training_matches_sequential() {
		let phrases: Vec<String> = (0..200)
			.map(|i| if i % 3 == 0 { "a b c".to_owned() } else { "a b d b c".to_owned() })
			.collect();

		let mut sequential = ModelTable::new(2).unwrap();
		for phrase in &phrases {
			sequential.train(phrase, "en");
		}

		let parallel = CorpusLoader::with_workers(7).train_parallel(2, "en", phrases).unwrap();
		assert_eq!(parallel, sequential);
	}

	#[test]
	fn load_dir_names_datasets_after_files() {
		let dir = tempfile::tempdir().unwrap();
		fs::write(dir.path().join("fa.csv"), "این یک جمله\nاین یک کتاب\n").unwrap();
		fs::write(dir.path().join("en.txt"), "hello world\n").unwrap();

		let mut model = bigram();
		let summary = CorpusLoader::with_workers(2).load_dir(&mut model, dir.path()).unwrap();

		assert_eq!(summary.datasets, vec![("en".to_owned(), 1), ("fa".to_owned(), 2)]);
		assert_eq!(summary.total_phrases(), 3);
		assert_eq!(model.frequency("fa", &["این"], "یک"), 2);
		assert_eq!(model.frequency("en", &["hello"], "world"), 1);
	}

	#[test]
	fn load_dir_rejects_a_file_path() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("fa.csv");
		fs::write(&path, "a b\n").unwrap();

		let mut model = bigram();
		let result = CorpusLoader::new().load_dir(&mut model, &path);
		assert!(matches!(result, Err(crate::error::NGramError::Corpus(CorpusError::NotADirectory(_)))));
	}

	#[test]
	fn empty_file_trains_nothing() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("empty.csv");
		fs::write(&path, "").unwrap();

		let mut model = bigram();
		let (dataset, count) = CorpusLoader::new().load_file(&mut model, &path).unwrap();
		assert_eq!(dataset, "empty");
		assert_eq!(count, 0);
		assert!(model.is_empty());
	}
}
