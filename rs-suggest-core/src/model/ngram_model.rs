use super::config::{ModelConfig, PersistMode};
use super::table::{ContextKey, ModelTable};
use crate::error::Result;
use crate::normalizer::normalize;
use crate::store::ModelStore;

/// Word-level n-gram model bound to a record store.
///
/// The model owns its in-memory table and its store. The store only ever
/// receives owned record snapshots.
///
/// # Responsibilities
/// - Train on phrases, one dataset at a time
/// - Persist counts to the store and load them back
/// - Suggest the most frequent next words after a context
///
/// # Invariants
/// - The order `n` is fixed at construction and is >= 2
/// - Loading overwrites counts, training increments them
pub struct NGramModel<S: ModelStore> {
	table: ModelTable,
	store: S,
	config: ModelConfig,
}

impl<S: ModelStore> NGramModel<S> {
	/// Creates an empty model.
	///
	/// Nothing is read from the store until `load` (or a reloading `suggest`).
	///
	/// # Errors
	/// Returns an error if `config.order < 2`.
	pub fn new(store: S, config: ModelConfig) -> Result<Self> {
		let table = ModelTable::new(config.order)?;
		Ok(Self { table, store, config })
	}

	pub fn order(&self) -> usize {
		self.table.order()
	}

	pub fn config(&self) -> &ModelConfig {
		&self.config
	}

	pub fn store(&self) -> &S {
		&self.store
	}

	pub fn table(&self) -> &ModelTable {
		&self.table
	}

	/// Adds a phrase to the model.
	///
	/// Always reports `true` on success; phrases shorter than `n` words are
	/// accepted and add nothing. With `write_through`, the touched entries are
	/// upserted before returning.
	pub fn train(&mut self, phrase: &str, dataset_name: &str) -> Result<bool> {
		let touched = self.table.train(phrase, dataset_name);
		log::debug!("Trained {} n-grams for dataset '{}'", touched.len(), dataset_name);

		if self.config.write_through {
			for (key, word) in &touched {
				self.store.upsert(&self.table.entry(key, word))?;
			}
			self.store.flush()?;
		}
		Ok(true)
	}

	/// Merges a table trained elsewhere (ex. by worker threads).
	///
	/// With `write_through`, every entry of `partial` is upserted.
	pub fn absorb(&mut self, partial: &ModelTable) -> Result<()> {
		self.table.merge(partial)?;

		if self.config.write_through {
			for (key, word) in partial.pairs() {
				self.store.upsert(&self.table.entry(key, word))?;
			}
			self.store.flush()?;
		}
		Ok(())
	}

	/// Writes every held count to the store.
	///
	/// In `PersistMode::Append` each call creates new records, even for
	/// unchanged counts. A failure part-way leaves earlier writes in place.
	pub fn persist(&mut self) -> Result<()> {
		let entries = self.table.entries();
		for entry in &entries {
			match self.config.persist_mode {
				PersistMode::Upsert => self.store.upsert(entry)?,
				PersistMode::Append => self.store.create(entry)?,
			}
		}
		self.store.flush()?;
		log::info!("Persisted {} n-gram entries ({:?})", entries.len(), self.config.persist_mode);
		Ok(())
	}

	/// Reads every stored record and overwrites the matching in-memory counts.
	///
	/// Counts absent from the store are left untouched. Idempotent.
	pub fn load(&mut self) -> Result<()> {
		let entries = self.store.list_all()?;
		for entry in &entries {
			self.table.apply(entry);
		}
		log::debug!("Loaded {} n-gram entries", entries.len());
		Ok(())
	}

	/// Explicit refresh hook, same as `load`.
	pub fn refresh(&mut self) -> Result<()> {
		self.load()
	}

	/// Drops every in-memory count. The store is not touched.
	pub fn clear(&mut self) {
		self.table.clear();
	}

	/// Suggests up to `config.default_k` next words.
	pub fn suggest_default(&mut self, text: &str, dataset_name: &str) -> Result<Vec<String>> {
		self.suggest(text, dataset_name, self.config.default_k)
	}

	/// Returns the `k` most frequent words observed after the trailing
	/// `n-1` words of `text`.
	///
	/// - The query is normalized like training phrases
	/// - Empty queries, unknown datasets and unseen contexts give an empty result
	/// - Ties are ordered by word, ascending
	pub fn suggest(&mut self, text: &str, dataset_name: &str, k: usize) -> Result<Vec<String>> {
		if self.config.reload_on_suggest {
			self.load()?;
		}

		let normalized = normalize(text);
		let words: Vec<&str> = normalized.split_whitespace().collect();
		if words.is_empty() {
			return Ok(Vec::new());
		}

		let context_len = self.order() - 1;
		let start = words.len().saturating_sub(context_len);
		let key = ContextKey::new(dataset_name, &words[start..]);

		let suggestions = match self.table.get(&key) {
			Some(state) if !state.is_empty() => state.top_k(k),
			_ => Vec::new(),
		};
		log::debug!("{} suggestions for {:?} in '{}'", suggestions.len(), key.context, dataset_name);
		Ok(suggestions)
	}

	/// Frequency of `word` after `context` in a dataset, 0 if unseen.
	pub fn frequency(&self, dataset_name: &str, context: &[&str], word: &str) -> u64 {
		self.table.frequency(&ContextKey::new(dataset_name, context), word)
	}

	/// Datasets with at least one context, sorted.
	pub fn datasets(&self) -> Vec<String> {
		self.table.datasets()
	}

	/// Number of `(context, word)` pairs held in memory.
	pub fn len(&self) -> usize {
		self.table.len()
	}

	pub fn is_empty(&self) -> bool {
		self.table.is_empty()
	}
}
