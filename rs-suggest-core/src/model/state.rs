use std::cmp::Ordering;
use std::collections::HashMap;

/// Candidate next words observed after a single context.
///
/// Conceptually a node of a Markov chain whose outgoing edges are weighted
/// by how many times each word followed the context.
///
/// ## Invariants
/// - Frequencies written by training are strictly positive
/// - Frequencies written by loading are copied verbatim (may be 0)
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct State {
	/// Example: { "جمله" => 42, "کتاب" => 3 }
	transitions: HashMap<String, u64>,
}

impl State {
	pub fn new() -> Self {
		Self::default()
	}

	/// Records one more occurrence of `word` and returns its new frequency.
	pub fn add_transition(&mut self, word: &str) -> u64 {
		let frequency = self.transitions.entry(word.to_owned()).or_insert(0);
		*frequency += 1;
		*frequency
	}

	/// Overwrites the frequency of `word`.
	pub fn set_frequency(&mut self, word: &str, frequency: u64) {
		self.transitions.insert(word.to_owned(), frequency);
	}

	pub fn frequency(&self, word: &str) -> u64 {
		self.transitions.get(word).copied().unwrap_or(0)
	}

	pub fn is_empty(&self) -> bool {
		self.transitions.is_empty()
	}

	pub fn len(&self) -> usize {
		self.transitions.len()
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
		self.transitions.iter().map(|(word, frequency)| (word.as_str(), *frequency))
	}

	/// Returns the `k` most frequent words.
	///
	/// Ordered by frequency descending; equal frequencies are ordered by
	/// word ascending so the result does not depend on hash order.
	pub fn top_k(&self, k: usize) -> Vec<String> {
		let mut ranked: Vec<(&String, &u64)> = self.transitions.iter().collect();
		ranked.sort_by(|a, b| rank(a, b));
		ranked.into_iter().take(k).map(|(word, _)| word.clone()).collect()
	}

	/// Sums the frequencies of `other` into this state.
	pub fn merge(&mut self, other: &Self) {
		for (word, frequency) in &other.transitions {
			*self.transitions.entry(word.clone()).or_insert(0) += *frequency;
		}
	}
}

fn rank(a: &(&String, &u64), b: &(&String, &u64)) -> Ordering {
	b.1.cmp(a.1).then_with(|| a.0.cmp(b.0))
}
