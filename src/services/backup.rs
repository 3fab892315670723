//! Backup-kodek: versionerad JSON-ögonblicksbild av hela lagringen.
//!
//! Import är fältvis tolerant: sektioner som saknas eller har fel form
//! lämnas orörda, och äldre "1.0"-filer (utan patruller) går att läsa in.

use std::path::{Path, PathBuf};

use chrono::{Local, Utc};
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::db::Database;
use crate::models::{Group, MeetingSession, Member, TroopSettings};
use crate::utils::{AppError, AppResult};

/// Aktuellt snapshotformat. "1.0" saknade patrullsektionen.
pub const SNAPSHOT_VERSION: &str = "1.1";

/// Självbeskrivande ögonblicksbild av alla fyra datasektionerna
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub version: String,
    pub timestamp: String,
    pub members: Vec<Member>,
    pub groups: Vec<Group>,
    pub sessions: Vec<MeetingSession>,
    pub settings: TroopSettings,
}

/// Resultat av en backup-export
#[derive(Debug, Clone)]
pub struct BackupResult {
    pub path: PathBuf,
    pub size: u64,
}

impl BackupResult {
    /// Formatera storlek för visning
    pub fn size_display(&self) -> String {
        const KB: u64 = 1024;
        const MB: u64 = KB * 1024;

        match self.size {
            b if b >= MB => format!("{:.1} MB", b as f64 / MB as f64),
            b if b >= KB => format!("{:.1} KB", b as f64 / KB as f64),
            b => format!("{} B", b),
        }
    }
}

pub struct BackupService<'a> {
    db: &'a Database,
}

impl<'a> BackupService<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Ögonblicksbild av lagringens aktuella innehåll
    pub fn export_snapshot(&self) -> Snapshot {
        let store = self.db.store();
        Snapshot {
            version: SNAPSHOT_VERSION.to_string(),
            timestamp: Utc::now().to_rfc3339(),
            members: store.members(),
            groups: store.groups(),
            sessions: store.sessions(),
            settings: store.settings(),
        }
    }

    /// Skriv ögonblicksbilden som JSON-fil
    pub fn export_to_file(&self, path: &Path) -> AppResult<BackupResult> {
        let snapshot = self.export_snapshot();
        let json = serde_json::to_string_pretty(&snapshot)?;
        std::fs::write(path, &json)?;

        info!("Backup skriven till {:?} ({} bytes)", path, json.len());

        Ok(BackupResult {
            path: path.to_path_buf(),
            size: json.len() as u64,
        })
    }

    /// Föreslaget filnamn för en ny backup
    pub fn suggested_filename() -> String {
        format!("narvaro_backup_{}.json", Local::now().format("%Y-%m-%d"))
    }

    /// Läs in en ögonblicksbild. Sektionerna skrivs över i sin helhet om
    /// de finns och har rätt form; annars lämnas befintlig data orörd.
    /// Vid första felet avbryts importen med `false` — redan inlästa
    /// sektioner rullas inte tillbaka. Referenser mellan sektionerna
    /// valideras inte; läsarna tolererar hängande id:n.
    pub fn import_snapshot(&self, candidate: &Value) -> bool {
        let Some(obj) = candidate.as_object() else {
            warn!("Backup-import avvisad: inte ett objekt");
            return false;
        };

        let store = self.db.store();

        if let Some(value) = obj.get("members").filter(|v| v.is_array()) {
            let applied = serde_json::from_value::<Vec<Member>>(value.clone())
                .map_err(AppError::from)
                .and_then(|members| store.save_members(&members));
            if let Err(e) = applied {
                warn!("Import av medlemmar misslyckades: {}", e);
                return false;
            }
        }

        if let Some(value) = obj.get("groups").filter(|v| v.is_array()) {
            let applied = serde_json::from_value::<Vec<Group>>(value.clone())
                .map_err(AppError::from)
                .and_then(|groups| store.save_groups(&groups));
            if let Err(e) = applied {
                warn!("Import av patruller misslyckades: {}", e);
                return false;
            }
        }

        if let Some(value) = obj.get("sessions").filter(|v| v.is_array()) {
            let applied = serde_json::from_value::<Vec<MeetingSession>>(value.clone())
                .map_err(AppError::from)
                .and_then(|sessions| store.save_sessions(&sessions));
            if let Err(e) = applied {
                warn!("Import av sessioner misslyckades: {}", e);
                return false;
            }
        }

        if let Some(value) = obj.get("settings").filter(|v| v.is_object()) {
            let applied = serde_json::from_value::<TroopSettings>(value.clone())
                .map_err(AppError::from)
                .and_then(|settings| store.save_settings(&settings));
            if let Err(e) = applied {
                warn!("Import av inställningar misslyckades: {}", e);
                return false;
            }
        }

        info!("Backup inläst");
        true
    }

    /// Läs in en backup-fil. Oläsbar fil eller trasig JSON ger `false`.
    pub fn import_from_file(&self, path: &Path) -> bool {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) => {
                warn!("Kunde inte läsa backup-fil {:?}: {}", path, e);
                return false;
            }
        };

        let value: Value = match serde_json::from_str(&text) {
            Ok(value) => value,
            Err(e) => {
                warn!("Backup-filen är inte giltig JSON: {}", e);
                return false;
            }
        };

        self.import_snapshot(&value)
    }
}
