/// How `NGramModel::persist` writes records.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PersistMode {
	/// Replace the record for the same `(dataset, context, word)`, or create it.
	#[default]
	Upsert,
	/// Always create a new record. Repeated persists accumulate duplicates.
	Append,
}

/// Construction parameters of an `NGramModel`.
///
/// # Invariants
/// - `order` is fixed once the model is built
/// - `order >= 2` (checked by `NGramModel::new`)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModelConfig {
	/// Order of the model: context length + 1.
	pub order: usize,

	/// Number of suggestions returned when the caller does not ask for a count.
	pub default_k: usize,

	/// Reload the whole table from storage before each suggestion.
	pub reload_on_suggest: bool,

	/// Upsert the entries touched by `train` right away.
	pub write_through: bool,

	pub persist_mode: PersistMode,
}

impl Default for ModelConfig {
	fn default() -> Self {
		Self {
			order: 2,
			default_k: 5,
			reload_on_suggest: true,
			write_through: false,
			persist_mode: PersistMode::Upsert,
		}
	}
}

impl ModelConfig {
	/// Default configuration with a custom order.
	pub fn with_order(order: usize) -> Self {
		Self { order, ..Self::default() }
	}
}
