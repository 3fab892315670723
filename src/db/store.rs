use rusqlite::Connection;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::{Arc, Mutex};
use tracing::warn;

use super::schema::{ALL_KEYS, KEY_GROUPS, KEY_MEMBERS, KEY_SESSIONS, KEY_SETTINGS};
use crate::models::{Group, MeetingSession, Member, TroopSettings};
use crate::utils::AppResult;

/// Lagring av de fyra datasektionerna som JSON-dokument.
///
/// Läsningar misslyckas aldrig mot anroparen: saknad nyckel, SQL-fel
/// eller trasig JSON ger tom samling respektive standardinställningar.
/// Skrivningar ersätter alltid hela sektionen; anroparen ansvarar för
/// läs-ändra-skriv-sekvensen.
pub struct Store {
    conn: Arc<Mutex<Connection>>,
}

impl Store {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    pub fn members(&self) -> Vec<Member> {
        self.read_collection(KEY_MEMBERS)
    }

    pub fn save_members(&self, members: &[Member]) -> AppResult<()> {
        self.write_section(KEY_MEMBERS, members)
    }

    pub fn groups(&self) -> Vec<Group> {
        self.read_collection(KEY_GROUPS)
    }

    pub fn save_groups(&self, groups: &[Group]) -> AppResult<()> {
        self.write_section(KEY_GROUPS, groups)
    }

    pub fn sessions(&self) -> Vec<MeetingSession> {
        self.read_collection(KEY_SESSIONS)
    }

    pub fn save_sessions(&self, sessions: &[MeetingSession]) -> AppResult<()> {
        self.write_section(KEY_SESSIONS, sessions)
    }

    /// Inställningar med standardvärden ifyllda för saknade fält
    pub fn settings(&self) -> TroopSettings {
        match self.read_raw(KEY_SETTINGS) {
            None => TroopSettings::default(),
            Some(raw) => match serde_json::from_str(&raw) {
                Ok(settings) => settings,
                Err(e) => {
                    warn!("Ogiltiga inställningar i lagringen, använder standard: {}", e);
                    TroopSettings::default()
                }
            },
        }
    }

    pub fn save_settings(&self, settings: &TroopSettings) -> AppResult<()> {
        self.write_section(KEY_SETTINGS, settings)
    }

    /// Ta bort alla fyra datasektionerna
    pub fn clear_all_data(&self) -> AppResult<()> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare("DELETE FROM app_data WHERE key = ?")?;
        for key in ALL_KEYS {
            stmt.execute([key])?;
        }
        Ok(())
    }

    fn read_collection<T: DeserializeOwned>(&self, key: &str) -> Vec<T> {
        match self.read_raw(key) {
            None => Vec::new(),
            Some(raw) => match serde_json::from_str(&raw) {
                Ok(items) => items,
                Err(e) => {
                    warn!("Ogiltig data för '{}', använder tom lista: {}", key, e);
                    Vec::new()
                }
            },
        }
    }

    fn read_raw(&self, key: &str) -> Option<String> {
        let conn = self.conn.lock().unwrap();
        conn.query_row(
            "SELECT value FROM app_data WHERE key = ?",
            [key],
            |row| row.get(0),
        )
        .ok()
    }

    fn write_section<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> AppResult<()> {
        let json = serde_json::to_string(value)?;
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT OR REPLACE INTO app_data (key, value, updated_at) VALUES (?1, ?2, datetime('now'))",
            rusqlite::params![key, json],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::models::Member;

    fn setup_store() -> (Database, Store) {
        let db = Database::open_in_memory().unwrap();
        let store = db.store();
        (db, store)
    }

    #[test]
    fn test_empty_database_yields_defaults() {
        let (_db, store) = setup_store();

        assert!(store.members().is_empty());
        assert!(store.sessions().is_empty());
        assert_eq!(store.settings(), TroopSettings::default());
    }

    #[test]
    fn test_save_and_read_members() {
        let (_db, store) = setup_store();

        let members = vec![Member::new("Erik", None), Member::new("Maja", None)];
        store.save_members(&members).unwrap();

        assert_eq!(store.members(), members);
    }

    #[test]
    fn test_corrupt_json_degrades_to_empty() {
        let (db, store) = setup_store();

        db.with_connection(|conn| {
            conn.execute(
                "INSERT OR REPLACE INTO app_data (key, value) VALUES ('members', 'inte json')",
                [],
            )?;
            conn.execute(
                "INSERT OR REPLACE INTO app_data (key, value) VALUES ('settings', '{trasig')",
                [],
            )?;
            Ok(())
        })
        .unwrap();

        assert!(store.members().is_empty());
        assert_eq!(store.settings(), TroopSettings::default());
    }

    #[test]
    fn test_settings_backfill_missing_fields() {
        let (db, store) = setup_store();

        db.with_connection(|conn| {
            conn.execute(
                r#"INSERT OR REPLACE INTO app_data (key, value) VALUES ('settings', '{"troopName": "X"}')"#,
                [],
            )?;
            Ok(())
        })
        .unwrap();

        let settings = store.settings();
        assert_eq!(settings.troop_name, "X");
        assert_eq!(settings.leader_name, "Kårledare");
        assert_eq!(settings.coordinator_name, "");
        assert_eq!(settings.secretary_name, "");
        assert!(settings.logo_url.is_none());
    }

    #[test]
    fn test_writers_overwrite_whole_collection() {
        let (_db, store) = setup_store();

        store
            .save_members(&[Member::new("Erik", None), Member::new("Maja", None)])
            .unwrap();
        let replacement = vec![Member::new("Ali", None)];
        store.save_members(&replacement).unwrap();

        assert_eq!(store.members(), replacement);
    }

    #[test]
    fn test_clear_all_data_removes_every_section() {
        let (_db, store) = setup_store();

        store.save_members(&[Member::new("Erik", None)]).unwrap();
        store.save_groups(&[crate::models::Group::new("Falkarna")]).unwrap();
        let mut settings = TroopSettings::default();
        settings.troop_name = "Vågen".into();
        store.save_settings(&settings).unwrap();

        store.clear_all_data().unwrap();

        assert!(store.members().is_empty());
        assert!(store.groups().is_empty());
        assert_eq!(store.settings(), TroopSettings::default());
    }
}
