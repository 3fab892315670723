//! Närvarostatistik — rena beräkningar över sessioner och medlemmar.
//! Ingen mutation, ingen I/O. Hängande medlemsreferenser tolereras.

use crate::models::{AttendanceStatus, MeetingSession, StatusMark};

/// Status för en medlem i en session. Saknad post ger `NoRecord`.
/// Vid dubbletter gäller första posten.
pub fn status_of(session: &MeetingSession, member_id: &str) -> StatusMark {
    session
        .record_for(member_id)
        .map(|r| StatusMark::from(r.status))
        .unwrap_or_default()
}

/// Antal närvarande i en session
pub fn present_count(session: &MeetingSession) -> usize {
    session
        .records
        .iter()
        .filter(|r| r.status == AttendanceStatus::Present)
        .count()
}

/// Närvaro i procent för en session (0 när posterna är tomma)
pub fn attendance_percentage(session: &MeetingSession) -> u8 {
    if session.records.is_empty() {
        return 0;
    }
    (session_ratio(session) * 100.0).round() as u8
}

/// Genomsnittlig närvaro över flera sessioner (0 för tom lista)
pub fn average_attendance(sessions: &[MeetingSession]) -> u8 {
    if sessions.is_empty() {
        return 0;
    }
    let sum: f64 = sessions.iter().map(session_ratio).sum();
    (sum / sessions.len() as f64 * 100.0).round() as u8
}

/// En medlems närvaro i procent över ett antal sessioner
pub fn member_attendance_rate(member_id: &str, sessions: &[MeetingSession]) -> u8 {
    if sessions.is_empty() {
        return 0;
    }
    let present = sessions
        .iter()
        .filter(|s| status_of(s, member_id) == StatusMark::Present)
        .count();
    (present as f64 / sessions.len() as f64 * 100.0).round() as u8
}

/// Sammanräkning per status för en session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionTally {
    pub present: usize,
    pub absent: usize,
    pub excused: usize,
}

pub fn tally(session: &MeetingSession) -> SessionTally {
    let mut tally = SessionTally::default();
    for record in &session.records {
        match record.status {
            AttendanceStatus::Present => tally.present += 1,
            AttendanceStatus::Absent => tally.absent += 1,
            AttendanceStatus::Excused => tally.excused += 1,
        }
    }
    tally
}

fn session_ratio(session: &MeetingSession) -> f64 {
    if session.records.is_empty() {
        return 0.0;
    }
    present_count(session) as f64 / session.records.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AttendanceRecord;
    use chrono::NaiveDate;

    fn session(records: &[(&str, AttendanceStatus)]) -> MeetingSession {
        MeetingSession::new(
            NaiveDate::from_ymd_opt(2026, 1, 5).unwrap(),
            None,
            records
                .iter()
                .map(|(id, status)| AttendanceRecord {
                    member_id: (*id).to_string(),
                    status: *status,
                })
                .collect(),
        )
    }

    #[test]
    fn test_status_of_and_stale_reference() {
        let s = session(&[
            ("m1", AttendanceStatus::Present),
            ("m2", AttendanceStatus::Absent),
        ]);

        assert_eq!(status_of(&s, "m1"), StatusMark::Present);
        assert_eq!(status_of(&s, "m2"), StatusMark::Absent);
        // Okänt id är inget fel — ingen post
        assert_eq!(status_of(&s, "raderad"), StatusMark::NoRecord);
    }

    #[test]
    fn test_percentage_rounds_and_handles_empty() {
        let s = session(&[
            ("m1", AttendanceStatus::Present),
            ("m2", AttendanceStatus::Absent),
            ("m3", AttendanceStatus::Excused),
        ]);
        // 1/3 = 33.33… → 33
        assert_eq!(attendance_percentage(&s), 33);

        let empty = session(&[]);
        assert_eq!(attendance_percentage(&empty), 0);
    }

    #[test]
    fn test_average_attendance() {
        let full = session(&[("m1", AttendanceStatus::Present)]);
        let half = session(&[
            ("m1", AttendanceStatus::Present),
            ("m2", AttendanceStatus::Absent),
        ]);
        assert_eq!(average_attendance(&[full, half]), 75);

        assert_eq!(average_attendance(&[]), 0);
    }

    #[test]
    fn test_average_attendance_skips_division_by_zero() {
        let empty = session(&[]);
        let full = session(&[("m1", AttendanceStatus::Present)]);
        // Tom session bidrar med 0, inte NaN
        assert_eq!(average_attendance(&[empty, full]), 50);
    }

    #[test]
    fn test_member_attendance_rate() {
        let s1 = session(&[("m1", AttendanceStatus::Present)]);
        let s2 = session(&[("m1", AttendanceStatus::Absent)]);
        let s3 = session(&[("m2", AttendanceStatus::Present)]);

        let sessions = vec![s1, s2, s3];
        assert_eq!(member_attendance_rate("m1", &sessions), 33);
        assert_eq!(member_attendance_rate("saknas", &sessions), 0);
        assert_eq!(member_attendance_rate("m1", &[]), 0);
    }

    #[test]
    fn test_tally() {
        let s = session(&[
            ("m1", AttendanceStatus::Present),
            ("m2", AttendanceStatus::Present),
            ("m3", AttendanceStatus::Absent),
            ("m4", AttendanceStatus::Excused),
        ]);
        assert_eq!(
            tally(&s),
            SessionTally {
                present: 2,
                absent: 1,
                excused: 1
            }
        );
    }

    #[test]
    fn test_two_member_session() {
        // Två medlemmar, en närvarande och en frånvarande
        let s = session(&[
            ("m1", AttendanceStatus::Present),
            ("m2", AttendanceStatus::Absent),
        ]);
        assert_eq!(present_count(&s), 1);
        assert_eq!(attendance_percentage(&s), 50);
    }
}
