//! Sessionstjänst: närvaroomgångar sparas som hela enheter och kan
//! därefter bara raderas, aldrig delvis ändras.

use std::collections::HashSet;

use chrono::NaiveDate;

use crate::db::Database;
use crate::models::{AttendanceRecord, MeetingSession};
use crate::utils::{AppError, AppResult};

pub struct SessionService<'a> {
    db: &'a Database,
}

impl<'a> SessionService<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Spara en komplett närvaroomgång. Dubbletter per medlem tas bort
    /// vid sparning — första posten gäller, samma regel som vid läsning.
    pub fn save_session(
        &self,
        date: NaiveDate,
        topic: Option<String>,
        records: Vec<AttendanceRecord>,
    ) -> AppResult<MeetingSession> {
        let mut seen = HashSet::new();
        let records: Vec<AttendanceRecord> = records
            .into_iter()
            .filter(|r| seen.insert(r.member_id.clone()))
            .collect();

        let topic = topic
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());

        let session = MeetingSession::new(date, topic, records);

        let store = self.db.store();
        let mut sessions = store.sessions();
        sessions.push(session.clone());
        store.save_sessions(&sessions)?;

        Ok(session)
    }

    /// Ta bort en session ur arkivet
    pub fn delete_session(&self, id: &str) -> AppResult<()> {
        let store = self.db.store();
        let mut sessions = store.sessions();
        let before = sessions.len();
        sessions.retain(|s| s.id != id);

        if sessions.len() == before {
            return Err(AppError::not_found(format!("Session {}", id)));
        }

        store.save_sessions(&sessions)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AttendanceStatus;

    fn setup() -> Database {
        Database::open_in_memory().unwrap()
    }

    fn record(member_id: &str, status: AttendanceStatus) -> AttendanceRecord {
        AttendanceRecord {
            member_id: member_id.to_string(),
            status,
        }
    }

    #[test]
    fn test_save_session_persists_whole_unit() {
        let db = setup();
        let service = SessionService::new(&db);

        let session = service
            .save_session(
                NaiveDate::from_ymd_opt(2026, 1, 5).unwrap(),
                Some("Knopar".into()),
                vec![
                    record("m1", AttendanceStatus::Present),
                    record("m2", AttendanceStatus::Excused),
                ],
            )
            .unwrap();

        let stored = db.store().sessions();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0], session);
        assert_eq!(stored[0].topic.as_deref(), Some("Knopar"));
    }

    #[test]
    fn test_save_session_drops_duplicates_first_wins() {
        let db = setup();
        let service = SessionService::new(&db);

        let session = service
            .save_session(
                NaiveDate::from_ymd_opt(2026, 1, 5).unwrap(),
                None,
                vec![
                    record("m1", AttendanceStatus::Present),
                    record("m1", AttendanceStatus::Absent),
                    record("m2", AttendanceStatus::Absent),
                ],
            )
            .unwrap();

        assert_eq!(session.records.len(), 2);
        assert_eq!(session.records[0].status, AttendanceStatus::Present);
    }

    #[test]
    fn test_blank_topic_becomes_none() {
        let db = setup();
        let service = SessionService::new(&db);

        let session = service
            .save_session(
                NaiveDate::from_ymd_opt(2026, 1, 5).unwrap(),
                Some("   ".into()),
                Vec::new(),
            )
            .unwrap();
        assert!(session.topic.is_none());
    }

    #[test]
    fn test_delete_session() {
        let db = setup();
        let service = SessionService::new(&db);

        let session = service
            .save_session(NaiveDate::from_ymd_opt(2026, 1, 5).unwrap(), None, Vec::new())
            .unwrap();

        service.delete_session(&session.id).unwrap();
        assert!(db.store().sessions().is_empty());

        assert!(matches!(
            service.delete_session(&session.id),
            Err(AppError::NotFound(_))
        ));
    }
}
