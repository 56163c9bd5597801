pub mod schema;

use color_eyre::{eyre::eyre, Result};
use rusqlite::{params, Connection};
use std::path::PathBuf;
use std::sync::Mutex;

use crate::market::types::Item;

/// How many recent searches are kept.
pub const RECENT_CAP: usize = 5;

/// Side database for the recent-searches list.
///
/// The connection sits behind a mutex so the handle can be shared with the
/// views; every operation here is a single quick statement.
pub struct Database {
  conn: Mutex<Connection>,
}

impl Database {
  /// Open or create the database at the default location
  pub fn open() -> Result<Self> {
    let path = Self::default_path()?;

    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent)
        .map_err(|e| eyre!("Failed to create database directory: {}", e))?;
    }

    let conn = Connection::open(&path)
      .map_err(|e| eyre!("Failed to open database at {}: {}", path.display(), e))?;

    let db = Self {
      conn: Mutex::new(conn),
    };
    db.run_migrations()?;

    Ok(db)
  }

  /// In-memory database, used by tests.
  #[cfg(test)]
  pub fn open_in_memory() -> Result<Self> {
    let conn = Connection::open_in_memory().map_err(|e| eyre!("{}", e))?;
    let db = Self {
      conn: Mutex::new(conn),
    };
    db.run_migrations()?;
    Ok(db)
  }

  /// Get the default database path
  fn default_path() -> Result<PathBuf> {
    let data_dir = dirs::data_dir()
      .or_else(|| dirs::home_dir().map(|p| p.join(".local/share")))
      .ok_or_else(|| eyre!("Could not determine data directory"))?;

    Ok(data_dir.join("wf9s").join("wf9s.db"))
  }

  /// Run database migrations
  fn run_migrations(&self) -> Result<()> {
    self
      .lock()?
      .execute_batch(schema::SCHEMA)
      .map_err(|e| eyre!("Failed to run migrations: {}", e))?;
    Ok(())
  }

  /// Load recent searches, most recent first.
  pub fn load_recent(&self) -> Result<Vec<Item>> {
    let conn = self.lock()?;
    let mut stmt = conn
      .prepare(
        "SELECT item_id, item_name, url_name FROM recent_searches
         ORDER BY rowid DESC LIMIT ?",
      )
      .map_err(|e| eyre!("Failed to prepare query: {}", e))?;

    let items = stmt
      .query_map(params![RECENT_CAP as i64], |row| {
        Ok(Item {
          id: row.get(0)?,
          name: row.get(1)?,
          url_name: row.get(2)?,
        })
      })
      .map_err(|e| eyre!("Failed to query recent searches: {}", e))?
      .filter_map(|r| r.ok())
      .collect();

    Ok(items)
  }

  /// Record a search. De-duplicates by item id (a repeat search moves the
  /// item to the front) and trims the list to [`RECENT_CAP`].
  pub fn push_recent(&self, item: &Item) -> Result<()> {
    let conn = self.lock()?;

    conn
      .execute(
        "INSERT OR REPLACE INTO recent_searches (item_id, item_name, url_name, searched_at)
         VALUES (?, ?, ?, datetime('now'))",
        params![item.id, item.name, item.url_name],
      )
      .map_err(|e| eyre!("Failed to store recent search: {}", e))?;

    conn
      .execute(
        "DELETE FROM recent_searches WHERE item_id NOT IN
         (SELECT item_id FROM recent_searches ORDER BY rowid DESC LIMIT ?)",
        params![RECENT_CAP as i64],
      )
      .map_err(|e| eyre!("Failed to trim recent searches: {}", e))?;

    Ok(())
  }

  fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
    self.conn.lock().map_err(|e| eyre!("Lock poisoned: {}", e))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn item(n: u32) -> Item {
    Item {
      id: format!("id-{n}"),
      name: format!("Item {n}"),
      url_name: format!("item_{n}"),
    }
  }

  #[test]
  fn test_recent_is_most_recent_first() {
    let db = Database::open_in_memory().unwrap();
    db.push_recent(&item(1)).unwrap();
    db.push_recent(&item(2)).unwrap();
    db.push_recent(&item(3)).unwrap();

    let names: Vec<String> = db.load_recent().unwrap().into_iter().map(|i| i.name).collect();
    assert_eq!(names, vec!["Item 3", "Item 2", "Item 1"]);
  }

  #[test]
  fn test_recent_deduplicates_by_item_id() {
    let db = Database::open_in_memory().unwrap();
    db.push_recent(&item(1)).unwrap();
    db.push_recent(&item(2)).unwrap();
    db.push_recent(&item(1)).unwrap();

    let names: Vec<String> = db.load_recent().unwrap().into_iter().map(|i| i.name).collect();
    assert_eq!(names, vec!["Item 1", "Item 2"]);
  }

  #[test]
  fn test_recent_is_capped() {
    let db = Database::open_in_memory().unwrap();
    for n in 1..=8 {
      db.push_recent(&item(n)).unwrap();
    }

    let items = db.load_recent().unwrap();
    assert_eq!(items.len(), RECENT_CAP);
    assert_eq!(items[0].name, "Item 8");
    assert_eq!(items[4].name, "Item 4");
  }
}
