use super::{ModelStore, NGramEntry, StoreError};

/// Keeps records in a `Vec`, in insertion order.
#[derive(Default, Clone, Debug)]
pub struct MemoryStore {
	entries: Vec<NGramEntry>,
}

impl MemoryStore {
	pub fn new() -> Self {
		Self::default()
	}

	/// Builds a store pre-filled with records.
	pub fn with_entries(entries: Vec<NGramEntry>) -> Self {
		Self { entries }
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

impl ModelStore for MemoryStore {
	fn list_all(&self) -> Result<Vec<NGramEntry>, StoreError> {
		Ok(self.entries.clone())
	}

	fn create(&mut self, entry: &NGramEntry) -> Result<(), StoreError> {
		self.entries.push(entry.clone());
		Ok(())
	}

	fn upsert(&mut self, entry: &NGramEntry) -> Result<(), StoreError> {
		let mut found = false;
		for existing in self.entries.iter_mut().filter(|e| e.same_key(entry)) {
			existing.frequency = entry.frequency;
			found = true;
		}
		if !found {
			self.entries.push(entry.clone());
		}
		Ok(())
	}
}
