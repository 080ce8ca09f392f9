//! Persistent storage using SQLite (rusqlite)
//!
//! One table, `ngram`, with one row per persisted record. There is no unique
//! constraint on `(dataset_name, context, word)`: append-mode persistence is
//! allowed to create duplicates, and `upsert` updates every matching row.
//!
//! Writes open a transaction that stays open until `flush` commits it, so a
//! whole persist pays for a single sync. Rows written but never flushed are
//! rolled back when the store is dropped.

use super::{ModelStore, NGramEntry, StoreError};
use rusqlite::{params, Connection};
use std::path::Path;

/// SQLite-backed `ModelStore`.
pub struct SqliteStore {
	conn: Connection,
}

impl SqliteStore {
	/// Open or create the database at `path`.
	pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
		let conn = Connection::open(path)?;
		Self::with_connection(conn)
	}

	/// Open a private in-memory database.
	pub fn open_in_memory() -> Result<Self, StoreError> {
		let conn = Connection::open_in_memory()?;
		Self::with_connection(conn)
	}

	fn with_connection(conn: Connection) -> Result<Self, StoreError> {
		let store = Self { conn };
		store.initialize_schema()?;
		Ok(store)
	}

	/// Number of stored rows, duplicates included.
	pub fn count(&self) -> Result<u64, StoreError> {
		let count: i64 = self.conn.query_row("SELECT COUNT(*) FROM ngram", [], |row| row.get(0))?;
		u64::try_from(count).map_err(|_| StoreError::CorruptRecord(format!("row count {count}")))
	}

	/// Returns true while writes are waiting for `flush`.
	pub fn has_pending_writes(&self) -> bool {
		!self.conn.is_autocommit()
	}

	fn begin_write(&self) -> Result<(), StoreError> {
		if self.conn.is_autocommit() {
			self.conn.execute_batch("BEGIN")?;
		}
		Ok(())
	}

	fn initialize_schema(&self) -> Result<(), StoreError> {
		self.conn.execute_batch(
			r#"
			CREATE TABLE IF NOT EXISTS ngram (
				id INTEGER PRIMARY KEY AUTOINCREMENT,
				dataset_name TEXT NOT NULL,
				context TEXT NOT NULL,
				word TEXT NOT NULL,
				frequency INTEGER NOT NULL
			);

			-- Lookup for upserts
			CREATE INDEX IF NOT EXISTS idx_ngram_key ON ngram (dataset_name, context, word);
			"#,
		)?;
		Ok(())
	}
}

fn to_sql_frequency(frequency: u64) -> Result<i64, StoreError> {
	i64::try_from(frequency).map_err(|_| StoreError::FrequencyOverflow(frequency))
}

impl ModelStore for SqliteStore {
	fn list_all(&self) -> Result<Vec<NGramEntry>, StoreError> {
		let mut stmt = self
			.conn
			.prepare("SELECT dataset_name, context, word, frequency FROM ngram ORDER BY id")?;

		let rows = stmt.query_map([], |row| {
			let dataset_name: String = row.get(0)?;
			let context: String = row.get(1)?;
			let word: String = row.get(2)?;
			let frequency: i64 = row.get(3)?;
			Ok((dataset_name, context, word, frequency))
		})?;

		let mut entries = Vec::new();
		for row in rows {
			let (dataset_name, context, word, frequency) = row?;
			let frequency = u64::try_from(frequency).map_err(|_| {
				StoreError::CorruptRecord(format!("{dataset_name}: {context} -> {word} has frequency {frequency}"))
			})?;
			entries.push(NGramEntry { dataset_name, context, word, frequency });
		}
		Ok(entries)
	}

	fn create(&mut self, entry: &NGramEntry) -> Result<(), StoreError> {
		let frequency = to_sql_frequency(entry.frequency)?;
		self.begin_write()?;
		let mut stmt = self
			.conn
			.prepare_cached("INSERT INTO ngram (dataset_name, context, word, frequency) VALUES (?1, ?2, ?3, ?4)")?;
		stmt.execute(params![entry.dataset_name, entry.context, entry.word, frequency])?;
		Ok(())
	}

	fn upsert(&mut self, entry: &NGramEntry) -> Result<(), StoreError> {
		let frequency = to_sql_frequency(entry.frequency)?;
		self.begin_write()?;
		let updated = {
			let mut stmt = self
				.conn
				.prepare_cached("UPDATE ngram SET frequency = ?4 WHERE dataset_name = ?1 AND context = ?2 AND word = ?3")?;
			stmt.execute(params![entry.dataset_name, entry.context, entry.word, frequency])?
		};
		if updated == 0 {
			self.create(entry)?;
		}
		Ok(())
	}

	fn flush(&mut self) -> Result<(), StoreError> {
		if !self.conn.is_autocommit() {
			self.conn.execute_batch("COMMIT")?;
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn create_and_list_preserve_order() {
		let mut store = SqliteStore::open_in_memory().unwrap();
		store.create(&NGramEntry::new("fa", "این", "یک", 2)).unwrap();
		store.create(&NGramEntry::new("fa", "یک", "جمله", 1)).unwrap();

		let all = store.list_all().unwrap();
		assert_eq!(all, vec![NGramEntry::new("fa", "این", "یک", 2), NGramEntry::new("fa", "یک", "جمله", 1)]);
	}

	#[test]
	fn upsert_updates_in_place() {
		let mut store = SqliteStore::open_in_memory().unwrap();
		store.upsert(&NGramEntry::new("fa", "یک", "جمله", 1)).unwrap();
		store.upsert(&NGramEntry::new("fa", "یک", "جمله", 3)).unwrap();

		assert_eq!(store.count().unwrap(), 1);
		assert_eq!(store.list_all().unwrap()[0].frequency, 3);
	}

	#[test]
	fn create_allows_duplicates() {
		let mut store = SqliteStore::open_in_memory().unwrap();
		let entry = NGramEntry::new("fa", "یک", "جمله", 1);
		store.create(&entry).unwrap();
		store.create(&entry).unwrap();
		assert_eq!(store.count().unwrap(), 2);
	}

	#[test]
	fn reopen_keeps_records() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("ngram.sqlite3");
		{
			let mut store = SqliteStore::open(&path).unwrap();
			store.create(&NGramEntry::new("en", "hello", "world", 5)).unwrap();
			store.flush().unwrap();
		}
		let store = SqliteStore::open(&path).unwrap();
		assert_eq!(store.list_all().unwrap(), vec![NGramEntry::new("en", "hello", "world", 5)]);
	}

	#[test]
	fn oversized_frequency_is_rejected() {
		let mut store = SqliteStore::open_in_memory().unwrap();
		let err = store.create(&NGramEntry::new("en", "a", "b", u64::MAX)).unwrap_err();
		assert!(matches!(err, StoreError::FrequencyOverflow(_)));
	}

	#[test]
	fn writes_stay_pending_until_flush() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("ngram.sqlite3");
		let mut store = SqliteStore::open(&path).unwrap();
		for i in 0..500u64 {
			store.upsert(&NGramEntry::new("en", "ctx", &format!("w{i}"), i + 1)).unwrap();
		}
		assert!(store.has_pending_writes());
		// Visible on the writing connection before the commit
		assert_eq!(store.count().unwrap(), 500);

		store.flush().unwrap();
		assert!(!store.has_pending_writes());
		let reopened = SqliteStore::open(&path).unwrap();
		assert_eq!(reopened.count().unwrap(), 500);
		assert_eq!(reopened.list_all().unwrap()[499], NGramEntry::new("en", "ctx", "w499", 500));
	}

	#[test]
	fn unflushed_writes_are_dropped() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("ngram.sqlite3");
		{
			let mut store = SqliteStore::open(&path).unwrap();
			store.create(&NGramEntry::new("en", "a", "b", 1)).unwrap();
			store.flush().unwrap();
			store.create(&NGramEntry::new("en", "a", "c", 1)).unwrap();
		}
		let store = SqliteStore::open(&path).unwrap();
		assert_eq!(store.list_all().unwrap(), vec![NGramEntry::new("en", "a", "b", 1)]);
	}

	#[test]
	fn negative_frequency_is_a_corrupt_record() {
		let store = SqliteStore::open_in_memory().unwrap();
		store
			.conn
			.execute(
				"INSERT INTO ngram (dataset_name, context, word, frequency) VALUES ('en', 'a', 'b', -3)",
				[],
			)
			.unwrap();

		let err = store.list_all().unwrap_err();
		assert!(matches!(err, StoreError::CorruptRecord(ref detail) if detail.contains("-3")));
	}
}
