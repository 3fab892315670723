use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::utils::id::new_id;

/// Närvarostatus för en medlem vid en session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    Present,
    Absent,
    Excused,
}

impl AttendanceStatus {
    pub const ALL: &'static [Self] = &[Self::Present, Self::Absent, Self::Excused];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Present => "Närvarande",
            Self::Absent => "Frånvarande",
            Self::Excused => "Anmäld frånvaro",
        }
    }
}

/// Markering i tabeller och listor. Saknad post är ett eget tillstånd,
/// skilt från frånvaro.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusMark {
    Present,
    Absent,
    Excused,
    #[default]
    NoRecord,
}

impl StatusMark {
    /// Symbol för interaktiva vyer och rapportceller
    pub fn glyph(&self) -> &'static str {
        match self {
            Self::Present => "✓",
            Self::Absent => "✕",
            Self::Excused => "!",
            Self::NoRecord => "–",
        }
    }

    /// Bokstavsmarkering för PDF/CSV. Helvetica (WinAnsi) saknar ✓ och ✕.
    pub fn letter(&self) -> &'static str {
        match self {
            Self::Present => "N",
            Self::Absent => "F",
            Self::Excused => "A",
            Self::NoRecord => "-",
        }
    }
}

impl From<AttendanceStatus> for StatusMark {
    fn from(status: AttendanceStatus) -> Self {
        match status {
            AttendanceStatus::Present => Self::Present,
            AttendanceStatus::Absent => Self::Absent,
            AttendanceStatus::Excused => Self::Excused,
        }
    }
}

impl From<Option<AttendanceStatus>> for StatusMark {
    fn from(status: Option<AttendanceStatus>) -> Self {
        status.map(Self::from).unwrap_or_default()
    }
}

/// En medlems närvaropost i en session. `member_id` kan peka på en
/// medlem som senare raderats; läsare hoppar över sådana poster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    pub member_id: String,
    pub status: AttendanceStatus,
}

/// En sparad närvaroomgång. Skapas som en komplett enhet och ändras
/// aldrig efteråt — bara radering av hela sessionen är tillåten.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetingSession {
    pub id: String,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    pub records: Vec<AttendanceRecord>,
}

impl MeetingSession {
    pub fn new(date: NaiveDate, topic: Option<String>, records: Vec<AttendanceRecord>) -> Self {
        Self {
            id: new_id(),
            date,
            topic,
            records,
        }
    }

    /// Första posten för en medlem. Dubbletter ska inte förekomma, men
    /// importerad data valideras inte — första träffen gäller.
    pub fn record_for(&self, member_id: &str) -> Option<&AttendanceRecord> {
        self.records.iter().find(|r| r.member_id == member_id)
    }

    /// Ämne för visning (tom sträng räknas som saknat)
    pub fn display_topic(&self) -> Option<&str> {
        self.topic.as_deref().filter(|t| !t.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session_with(records: Vec<AttendanceRecord>) -> MeetingSession {
        MeetingSession::new(
            NaiveDate::from_ymd_opt(2026, 1, 5).unwrap(),
            None,
            records,
        )
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let record = AttendanceRecord {
            member_id: "m1".into(),
            status: AttendanceStatus::Excused,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json.get("status").unwrap(), "excused");
        assert_eq!(json.get("memberId").unwrap(), "m1");
    }

    #[test]
    fn test_record_for_first_match_wins() {
        let session = session_with(vec![
            AttendanceRecord { member_id: "m1".into(), status: AttendanceStatus::Present },
            AttendanceRecord { member_id: "m1".into(), status: AttendanceStatus::Absent },
        ]);
        assert_eq!(
            session.record_for("m1").unwrap().status,
            AttendanceStatus::Present
        );
        assert!(session.record_for("m2").is_none());
    }

    #[test]
    fn test_display_topic_filters_blank() {
        let mut session = session_with(Vec::new());
        assert_eq!(session.display_topic(), None);
        session.topic = Some("  ".into());
        assert_eq!(session.display_topic(), None);
        session.topic = Some("Knopar".into());
        assert_eq!(session.display_topic(), Some("Knopar"));
    }

    #[test]
    fn test_glyph_table_covers_all_marks() {
        assert_eq!(StatusMark::from(AttendanceStatus::Present).glyph(), "✓");
        assert_eq!(StatusMark::from(AttendanceStatus::Absent).glyph(), "✕");
        assert_eq!(StatusMark::from(AttendanceStatus::Excused).glyph(), "!");
        assert_eq!(StatusMark::from(None).glyph(), "–");
    }
}
