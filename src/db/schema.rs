/// SQL-schema för Närvaro Desktop
///
/// Kårdata lagras som fyra JSON-dokument i en nyckel/värde-tabell:
/// members, groups, sessions och settings.

pub const SCHEMA_VERSION: i32 = 2;

pub const CREATE_TABLES: &str = r#"
-- Datasektioner (JSON-dokument per nyckel)
CREATE TABLE IF NOT EXISTS app_data (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

-- Migrationshistorik
CREATE TABLE IF NOT EXISTS schema_migrations (
    version INTEGER PRIMARY KEY,
    applied_at TEXT NOT NULL DEFAULT (datetime('now'))
);
"#;

/// De fyra datasektionerna
pub const KEY_MEMBERS: &str = "members";
pub const KEY_GROUPS: &str = "groups";
pub const KEY_SESSIONS: &str = "sessions";
pub const KEY_SETTINGS: &str = "settings";

pub const ALL_KEYS: &[&str] = &[KEY_MEMBERS, KEY_GROUPS, KEY_SESSIONS, KEY_SETTINGS];
