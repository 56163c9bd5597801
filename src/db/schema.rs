/// Schema for the wf9s side database.
///
/// Recency is tracked through rowid: `INSERT OR REPLACE` assigns a fresh
/// rowid, so `ORDER BY rowid DESC` is most-recent-first even when two
/// searches land within the same second.
pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS recent_searches (
    item_id TEXT PRIMARY KEY,
    item_name TEXT NOT NULL,
    url_name TEXT NOT NULL,
    searched_at TEXT NOT NULL DEFAULT (datetime('now'))
);
"#;
