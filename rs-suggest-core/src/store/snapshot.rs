use super::{ModelStore, NGramEntry, StoreError};
use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

type EntryKey = (String, String, String);

fn key_of(entry: &NGramEntry) -> EntryKey {
	(entry.dataset_name.clone(), entry.context.clone(), entry.word.clone())
}

/// File-backed store.
///
/// Records are kept in memory and written with `postcard` on `flush`. The
/// file is replaced atomically, so a reader never sees a half-written
/// snapshot. Writes not yet flushed are lost if the store is dropped.
#[derive(Debug)]
pub struct SnapshotStore {
	path: PathBuf,
	entries: Vec<NGramEntry>,
	/// Positions of the records of each triple (several after `create`).
	index: HashMap<EntryKey, Vec<usize>>,
	dirty: bool,
}

impl SnapshotStore {
	/// Opens the snapshot at `path`, or starts empty if the file does not exist.
	pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
		let path = path.as_ref().to_path_buf();
		let entries: Vec<NGramEntry> = if path.exists() {
			let bytes = fs::read(&path)?;
			postcard::from_bytes(&bytes)?
		} else {
			Vec::new()
		};
		let mut index: HashMap<EntryKey, Vec<usize>> = HashMap::new();
		for (i, entry) in entries.iter().enumerate() {
			index.entry(key_of(entry)).or_default().push(i);
		}
		Ok(Self { path, entries, index, dirty: false })
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	fn push(&mut self, entry: &NGramEntry) {
		self.index.entry(key_of(entry)).or_default().push(self.entries.len());
		self.entries.push(entry.clone());
		self.dirty = true;
	}
}

impl ModelStore for SnapshotStore {
	fn list_all(&self) -> Result<Vec<NGramEntry>, StoreError> {
		Ok(self.entries.clone())
	}

	fn create(&mut self, entry: &NGramEntry) -> Result<(), StoreError> {
		self.push(entry);
		Ok(())
	}

	fn upsert(&mut self, entry: &NGramEntry) -> Result<(), StoreError> {
		match self.index.get(&key_of(entry)) {
			Some(positions) => {
				for &i in positions {
					self.entries[i].frequency = entry.frequency;
				}
				self.dirty = true;
			}
			None => self.push(entry),
		}
		Ok(())
	}

	fn flush(&mut self) -> Result<(), StoreError> {
		if !self.dirty {
			return Ok(());
		}

		let parent = match self.path.parent() {
			Some(p) if !p.as_os_str().is_empty() => p,
			_ => Path::new("."),
		};
		fs::create_dir_all(parent)?;

		let bytes = postcard::to_stdvec(&self.entries)?;
		let mut temp_file = NamedTempFile::new_in(parent)?;
		temp_file.write_all(&bytes)?;
		temp_file.persist(&self.path).map_err(|e| e.error)?;

		self.dirty = false;
		Ok(())
	}
}
