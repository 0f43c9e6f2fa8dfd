//! `SQLite` schema for color-detector.
//!
//! The store is a string key-value table; favorites live under a single key
//! as a JSON array. Tables are created by the numbered steps in
//! [`MIGRATIONS`], so an existing database is upgraded in place.

/// Bookkeeping table holding the schema version.
pub const CREATE_METADATA_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS metadata (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
)
";

/// One schema upgrade.
#[derive(Debug, Clone, Copy)]
pub struct Migration {
    /// Version the database is at after this step.
    pub version: u32,
    /// Short description for logs.
    pub description: &'static str,
    /// Statements run in one transaction.
    pub sql: &'static str,
}

/// Schema upgrades in ascending version order.
pub const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        description: "key-value table",
        sql: r"
CREATE TABLE IF NOT EXISTS kv (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
",
    },
    Migration {
        version: 2,
        description: "index kv by update time",
        sql: r"
CREATE INDEX IF NOT EXISTS idx_kv_updated_at ON kv(updated_at);
",
    },
];
