use std::collections::HashMap;

use super::state::State;
use crate::error::{NGramError, Result};
use crate::normalizer::normalize;
use crate::store::NGramEntry;

/// Key of a table bucket: a dataset and the `n-1` words preceding a candidate.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ContextKey {
	pub dataset: String,
	pub context: Vec<String>,
}

impl ContextKey {
	pub fn new(dataset: &str, context: &[&str]) -> Self {
		Self {
			dataset: dataset.to_owned(),
			context: context.iter().map(|w| (*w).to_owned()).collect(),
		}
	}

	/// Context words joined with single spaces, the persisted form.
	pub fn joined_context(&self) -> String {
		self.context.join(" ")
	}
}

/// In-memory counts of a fixed-order n-gram model, for every dataset.
///
/// # Responsibilities
/// - Count `(context -> word)` transitions from phrases
/// - Apply stored records (overwrite, never increment)
/// - Merge with another table of the same order
///
/// # Invariants
/// - `n` is always >= 2
/// - Every context stored by training has exactly `n-1` words
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModelTable {
	n: usize,
	states: HashMap<ContextKey, State>,
}

impl ModelTable {
	/// Creates an empty table of order `n`.
	///
	/// # Errors
	/// Returns an error if `n < 2`.
	pub fn new(n: usize) -> Result<Self> {
		if n < 2 {
			return Err(NGramError::InvalidOrder(n));
		}
		Ok(Self { n, states: HashMap::new() })
	}

	pub fn order(&self) -> usize {
		self.n
	}

	/// Normalizes a phrase and counts every n-gram in it.
	///
	/// Returns the keys and words touched, so callers can write them through.
	/// Phrases with fewer than `n` words add nothing.
	pub fn train(&mut self, phrase: &str, dataset_name: &str) -> Vec<(ContextKey, String)> {
		let normalized = normalize(phrase);
		let words: Vec<&str> = normalized.split_whitespace().collect();
		if words.len() < self.n {
			return Vec::new();
		}

		let mut touched = Vec::with_capacity(words.len() + 1 - self.n);
		for i in 0..=words.len() - self.n {
			let key = ContextKey::new(dataset_name, &words[i..i + self.n - 1]);
			let word = words[i + self.n - 1];

			self.states.entry(key.clone()).or_default().add_transition(word);
			touched.push((key, word.to_owned()));
		}
		touched
	}

	/// Applies a stored record, overwriting any count already held.
	pub fn apply(&mut self, entry: &NGramEntry) {
		let key = ContextKey {
			dataset: entry.dataset_name.clone(),
			context: entry.context.split_whitespace().map(str::to_owned).collect(),
		};
		self.states.entry(key).or_default().set_frequency(&entry.word, entry.frequency);
	}

	pub fn get(&self, key: &ContextKey) -> Option<&State> {
		self.states.get(key)
	}

	pub fn frequency(&self, key: &ContextKey, word: &str) -> u64 {
		self.states.get(key).map_or(0, |state| state.frequency(word))
	}

	/// Builds the record for one `(key, word)` pair from the current counts.
	pub fn entry(&self, key: &ContextKey, word: &str) -> NGramEntry {
		NGramEntry {
			dataset_name: key.dataset.clone(),
			context: key.joined_context(),
			word: word.to_owned(),
			frequency: self.frequency(key, word),
		}
	}

	/// Every `(key, word)` pair held, in hash order.
	pub fn pairs(&self) -> impl Iterator<Item = (&ContextKey, &str)> {
		self.states
			.iter()
			.flat_map(|(key, state)| state.iter().map(move |(word, _)| (key, word)))
	}

	/// Every `(dataset, context, word, frequency)` held, as records.
	///
	/// Sorted by dataset, context, then word.
	pub fn entries(&self) -> Vec<NGramEntry> {
		let mut entries: Vec<NGramEntry> = self
			.states
			.iter()
			.flat_map(|(key, state)| {
				let context = key.joined_context();
				state.iter().map(move |(word, frequency)| NGramEntry {
					dataset_name: key.dataset.clone(),
					context: context.clone(),
					word: word.to_owned(),
					frequency,
				})
			})
			.collect();
		entries.sort_by(|a, b| {
			(&a.dataset_name, &a.context, &a.word).cmp(&(&b.dataset_name, &b.context, &b.word))
		});
		entries
	}

	/// Distinct dataset names, sorted.
	pub fn datasets(&self) -> Vec<String> {
		let mut datasets: Vec<String> = self.states.keys().map(|k| k.dataset.clone()).collect();
		datasets.sort();
		datasets.dedup();
		datasets
	}

	/// Number of `(context, word)` pairs held.
	pub fn len(&self) -> usize {
		self.states.values().map(State::len).sum()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	pub fn clear(&mut self) {
		self.states.clear();
	}

	/// Merges another table into this one by summing counts.
	///
	/// # Errors
	/// Returns an error if the orders do not match.
	pub fn merge(&mut self, other: &Self) -> Result<()> {
		if self.n != other.n {
			return Err(NGramError::OrderMismatch { expected: self.n, got: other.n });
		}

		for (key, state) in &other.states {
			if let Some(existing) = self.states.get_mut(key) {
				existing.merge(state);
			} else {
				self.states.insert(key.clone(), state.clone());
			}
		}

		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn order_below_two_is_rejected() {
		assert!(matches!(ModelTable::new(1), Err(NGramError::InvalidOrder(1))));
		assert!(ModelTable::new(2).is_ok());
	}

	#[test]
	fn bigram_training_counts_every_pair() {
		let mut table = ModelTable::new(2).unwrap();
		let touched = table.train("این یک جمله تست است", "fa");

		assert_eq!(touched.len(), 4);
		assert_eq!(table.len(), 4);
		assert_eq!(table.frequency(&ContextKey::new("fa", &["یک"]), "جمله"), 1);
		assert_eq!(table.frequency(&ContextKey::new("fa", &["تست"]), "است"), 1);
	}

	#[test]
	fn trigram_context_has_two_words() {
		let mut table = ModelTable::new(3).unwrap();
		table.train("a b c d", "en");

		assert_eq!(table.frequency(&ContextKey::new("en", &["a", "b"]), "c"), 1);
		assert_eq!(table.frequency(&ContextKey::new("en", &["b", "c"]), "d"), 1);
		assert_eq!(table.len(), 2);
	}

	#[test]
	fn short_phrase_adds_nothing() {
		let mut table = ModelTable::new(3).unwrap();
		assert!(table.train("only two", "en").is_empty());
		assert!(table.train("", "en").is_empty());
		assert!(table.is_empty());
	}

	#[test]
	fn training_normalizes_first() {
		let mut table = ModelTable::new(2).unwrap();
		table.train("علي، 12 رفت.", "fa");
		assert_eq!(table.frequency(&ContextKey::new("fa", &["علی"]), "رفت"), 1);
	}

	#[test]
	fn apply_overwrites_instead_of_adding() {
		let mut table = ModelTable::new(2).unwrap();
		table.train("a b", "en");
		table.apply(&NGramEntry::new("en", "a", "b", 7));
		table.apply(&NGramEntry::new("en", "a", "b", 7));
		assert_eq!(table.frequency(&ContextKey::new("en", &["a"]), "b"), 7);
	}

	#[test]
	fn entries_round_trip_through_apply() {
		let mut table = ModelTable::new(3).unwrap();
		table.train("x y z x y w", "en");

		let mut rebuilt = ModelTable::new(3).unwrap();
		for entry in table.entries() {
			rebuilt.apply(&entry);
		}
		assert_eq!(rebuilt, table);
	}

	#[test]
	fn merge_requires_same_order() {
		let mut bigram = ModelTable::new(2).unwrap();
		let trigram = ModelTable::new(3).unwrap();
		assert!(matches!(
			bigram.merge(&trigram),
			Err(NGramError::OrderMismatch { expected: 2, got: 3 })
		));
	}

	#[test]
	fn merge_sums_partial_tables() {
		let mut left = ModelTable::new(2).unwrap();
		let mut right = ModelTable::new(2).unwrap();
		left.train("a b", "en");
		right.train("a b a c", "en");
		right.train("a b", "fr");

		left.merge(&right).unwrap();
		assert_eq!(left.frequency(&ContextKey::new("en", &["a"]), "b"), 2);
		assert_eq!(left.frequency(&ContextKey::new("en", &["a"]), "c"), 1);
		assert_eq!(left.datasets(), vec!["en", "fr"]);
	}
}
