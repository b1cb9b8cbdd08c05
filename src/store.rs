use std::fs;
use std::path::{Path, PathBuf};

use rusqlite::types::ValueRef;
use rusqlite::{params, Connection, Row};
use serde::de::DeserializeOwned;

use crate::error::Result;
use crate::model::{CatalogEntry, Stat};

const MIGRATION_SQL_0001: &str = include_str!("../migrations/0001_initial.sql");

pub trait EntryStore {
  fn load_all(&self) -> Result<Vec<CatalogEntry>>;

  /// Always inserts; callers dedupe by id first.
  fn upsert(&self, entry: &CatalogEntry) -> Result<()>;

  /// `Ok(false)` when no row is named `name`.
  fn set_favorite(&self, name: &str, value: bool) -> Result<bool>;

  fn clear_all(&self) -> Result<usize>;
}

#[derive(Clone, Debug)]
pub struct SqliteStore {
  db_path: PathBuf,
}

impl SqliteStore {
  pub fn open<P: AsRef<Path>>(db_path: P) -> Result<Self> {
    let db_path = db_path.as_ref().to_path_buf();
    init_database(&db_path)?;
    Ok(Self { db_path })
  }

  pub fn db_path(&self) -> &Path {
    &self.db_path
  }

  pub fn count(&self) -> Result<i64> {
    let connection = open_database(&self.db_path)?;
    Ok(connection.query_row("SELECT COUNT(*) FROM pokemon", [], |row| row.get(0))?)
  }
}

impl EntryStore for SqliteStore {
  fn load_all(&self) -> Result<Vec<CatalogEntry>> {
    let connection = open_database(&self.db_path)?;
    let mut statement = connection.prepare(
      "SELECT id, name, image_url, types, stats, is_favorite
       FROM pokemon
       ORDER BY rowid",
    )?;

    let rows = statement.query_map([], row_to_entry)?;
    let mut entries = Vec::new();
    for row in rows {
      entries.push(row?);
    }
    Ok(entries)
  }

  fn upsert(&self, entry: &CatalogEntry) -> Result<()> {
    let connection = open_database(&self.db_path)?;
    let types = serde_json::to_vec(&entry.types)?;
    let stats = serde_json::to_vec(&entry.stats)?;
    connection.execute(
      "INSERT INTO pokemon (id, name, image_url, types, stats, is_favorite)
       VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
      params![
        entry.id,
        entry.name,
        entry.image_url,
        types,
        stats,
        entry.is_favorite
      ],
    )?;
    Ok(())
  }

  fn set_favorite(&self, name: &str, value: bool) -> Result<bool> {
    let connection = open_database(&self.db_path)?;
    let changed = connection.execute(
      "UPDATE pokemon
       SET is_favorite = ?1
       WHERE rowid = (
         SELECT rowid FROM pokemon WHERE name = ?2 ORDER BY rowid LIMIT 1
       )",
      params![value, name],
    )?;
    Ok(changed > 0)
  }

  fn clear_all(&self) -> Result<usize> {
    let connection = open_database(&self.db_path)?;
    Ok(connection.execute("DELETE FROM pokemon", [])?)
  }
}

fn init_database(db_path: &Path) -> Result<()> {
  if let Some(parent) = db_path.parent() {
    if !parent.as_os_str().is_empty() {
      fs::create_dir_all(parent)?;
    }
  }

  let connection = Connection::open(db_path)?;
  connection.execute_batch(MIGRATION_SQL_0001)?;
  Ok(())
}

fn open_database(db_path: &Path) -> Result<Connection> {
  Ok(Connection::open(db_path)?)
}

fn row_to_entry(row: &Row<'_>) -> rusqlite::Result<CatalogEntry> {
  let name: String = row.get(1)?;
  let types: Vec<String> = decode_blob(row.get_ref(3)?, &name, "types");
  let stats: Vec<Stat> = decode_blob(row.get_ref(4)?, &name, "stats");
  Ok(CatalogEntry {
    id: row.get(0)?,
    image_url: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
    types,
    stats,
    is_favorite: row.get(5)?,
    name,
  })
}

fn decode_blob<T: DeserializeOwned + Default>(value: ValueRef<'_>, name: &str, column: &str) -> T {
  let bytes = match value {
    ValueRef::Blob(bytes) | ValueRef::Text(bytes) => bytes,
    _ => return T::default(),
  };
  match serde_json::from_slice(bytes) {
    Ok(decoded) => decoded,
    Err(error) => {
      log::debug!("stored {} for '{}' unreadable, using empty: {}", column, name, error);
      T::default()
    }
  }
}
