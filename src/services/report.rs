//! Rapportbyggare — omvandlar roster, patruller och ett fönster av
//! sessioner till en rad/kolumn-struktur för tabellrendering och export.
//! Tillståndslös: ren funktion av sina indata.

use chrono::NaiveDate;

use crate::models::{Group, MeetingSession, Member, StatusMark};
use crate::services::stats;
use crate::utils::date;

/// Antal sessioner i sammanställningen. Vald så att rapporten ryms på
/// en liggande A4-sida.
pub const SUMMARY_SESSION_CAP: usize = 10;

/// Rubrik för medlemmar utan patrull
pub const UNASSIGNED_LABEL: &str = "Ej indelade";

/// Kolumnmetadata för en session i sammanställningen. Veckodag, ämne
/// och dag/månad levereras separat så att olika konsumenter kan rendera
/// dem på sitt eget sätt.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionColumn {
    pub session_id: String,
    pub date: NaiveDate,
    pub weekday: &'static str,
    pub topic: Option<String>,
    pub day_month: String,
}

/// En medlemsrad: löpnummer, namn, en markering per kolumn samt
/// närvarosumma och procent räknat över rapportfönstret.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberRow {
    pub number: usize,
    pub name: String,
    pub marks: Vec<StatusMark>,
    pub present_count: usize,
    pub percentage: u8,
}

/// Ett patrullblock med etikettrad
#[derive(Debug, Clone, PartialEq)]
pub struct GroupBlock {
    pub label: String,
    pub rows: Vec<MemberRow>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SummaryReport {
    pub columns: Vec<SessionColumn>,
    pub blocks: Vec<GroupBlock>,
}

impl SummaryReport {
    pub fn row_count(&self) -> usize {
        self.blocks.iter().map(|b| b.rows.len()).sum()
    }
}

/// Enskild session som tre namnlistor
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SessionReport {
    pub present: Vec<String>,
    pub absent: Vec<String>,
    pub excused: Vec<String>,
}

impl SessionReport {
    pub fn is_empty(&self) -> bool {
        self.present.is_empty() && self.absent.is_empty() && self.excused.is_empty()
    }
}

/// Bygg sammanställningen: de senaste sessionerna som kolumner
/// (datum fallande), medlemsrader patrull för patrull i lagrad ordning,
/// avslutat med ett block för oindelade. Radnumreringen löper
/// kontinuerligt över alla block.
pub fn build_summary_report(
    members: &[Member],
    groups: &[Group],
    sessions: &[MeetingSession],
) -> SummaryReport {
    let mut included: Vec<&MeetingSession> = sessions.iter().collect();
    included.sort_by(|a, b| b.date.cmp(&a.date));
    included.truncate(SUMMARY_SESSION_CAP);

    let columns = included
        .iter()
        .map(|s| SessionColumn {
            session_id: s.id.clone(),
            date: s.date,
            weekday: date::weekday_abbrev(s.date),
            topic: s.display_topic().map(str::to_string),
            day_month: date::day_month(s.date),
        })
        .collect();

    let mut blocks = Vec::new();
    let mut number = 0usize;

    for group in groups {
        let mut rows = Vec::new();
        for member in members
            .iter()
            .filter(|m| m.group_id.as_deref() == Some(group.id.as_str()))
        {
            number += 1;
            rows.push(member_row(number, member, &included));
        }
        blocks.push(GroupBlock {
            label: group.name.clone(),
            rows,
        });
    }

    // Oindelade sist: saknad patrull eller hängande referens
    let unassigned: Vec<&Member> = members
        .iter()
        .filter(|m| match &m.group_id {
            None => true,
            Some(gid) => !groups.iter().any(|g| g.id == *gid),
        })
        .collect();

    if !unassigned.is_empty() {
        let mut rows = Vec::new();
        for member in unassigned {
            number += 1;
            rows.push(member_row(number, member, &included));
        }
        blocks.push(GroupBlock {
            label: UNASSIGNED_LABEL.to_string(),
            rows,
        });
    }

    SummaryReport { columns, blocks }
}

/// Bygg rapport för en enskild session: tre namnlistor i posternas
/// ordning. Poster för raderade medlemmar hoppas över. Okänt sessions-id
/// ger en tom rapport.
pub fn build_session_report(
    members: &[Member],
    sessions: &[MeetingSession],
    session_id: &str,
) -> SessionReport {
    let Some(session) = sessions.iter().find(|s| s.id == session_id) else {
        return SessionReport::default();
    };

    let mut report = SessionReport::default();
    for record in &session.records {
        let Some(member) = members.iter().find(|m| m.id == record.member_id) else {
            continue;
        };
        use crate::models::AttendanceStatus::*;
        match record.status {
            Present => report.present.push(member.name.clone()),
            Absent => report.absent.push(member.name.clone()),
            Excused => report.excused.push(member.name.clone()),
        }
    }

    report
}

fn member_row(number: usize, member: &Member, included: &[&MeetingSession]) -> MemberRow {
    let marks: Vec<StatusMark> = included
        .iter()
        .map(|s| stats::status_of(s, &member.id))
        .collect();
    let present_count = marks.iter().filter(|m| **m == StatusMark::Present).count();
    let percentage = if included.is_empty() {
        0
    } else {
        (present_count as f64 / included.len() as f64 * 100.0).round() as u8
    };

    MemberRow {
        number,
        name: member.name.clone(),
        marks,
        present_count,
        percentage,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AttendanceRecord, AttendanceStatus};

    fn member(id: &str, name: &str, group_id: Option<&str>) -> Member {
        let mut m = Member::new(name, group_id.map(str::to_string));
        m.id = id.to_string();
        m
    }

    fn group(id: &str, name: &str) -> Group {
        let mut g = Group::new(name);
        g.id = id.to_string();
        g
    }

    fn session(id: &str, date: NaiveDate, records: &[(&str, AttendanceStatus)]) -> MeetingSession {
        let mut s = MeetingSession::new(
            date,
            None,
            records
                .iter()
                .map(|(mid, status)| AttendanceRecord {
                    member_id: (*mid).to_string(),
                    status: *status,
                })
                .collect(),
        );
        s.id = id.to_string();
        s
    }

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, day).unwrap()
    }

    #[test]
    fn test_summary_includes_ten_most_recent() {
        // Tolv sessioner med olika datum — endast de tio senaste ska med
        let sessions: Vec<MeetingSession> = (1..=12)
            .map(|d| session(&format!("s{}", d), date(d), &[]))
            .collect();
        let members = [member("m1", "Erik", None)];

        let report = build_summary_report(&members, &[], &sessions);

        assert_eq!(report.columns.len(), SUMMARY_SESSION_CAP);
        assert_eq!(report.columns[0].date, date(12));
        assert_eq!(report.columns[9].date, date(3));

        // Kolumnmetadata matchar sessionsfälten
        let first = &report.columns[0];
        assert_eq!(first.session_id, "s12");
        assert_eq!(first.weekday, date::weekday_abbrev(date(12)));
        assert_eq!(first.day_month, "12/3");
        assert_eq!(first.topic, None);
    }

    #[test]
    fn test_summary_topic_passthrough() {
        let mut s = session("s1", date(1), &[]);
        s.topic = Some("Knopar".into());
        let report = build_summary_report(&[], &[], &[s]);
        assert_eq!(report.columns[0].topic.as_deref(), Some("Knopar"));
    }

    #[test]
    fn test_summary_blocks_and_continuous_numbering() {
        let groups = [group("g1", "Falkarna"), group("g2", "Ugglorna")];
        let members = [
            member("m1", "Erik", Some("g1")),
            member("m2", "Maja", Some("g2")),
            member("m3", "Ali", None),
            member("m4", "Sara", Some("g1")),
        ];

        let report = build_summary_report(&members, &groups, &[]);

        assert_eq!(report.blocks.len(), 3);
        assert_eq!(report.blocks[0].label, "Falkarna");
        assert_eq!(report.blocks[1].label, "Ugglorna");
        assert_eq!(report.blocks[2].label, UNASSIGNED_LABEL);

        // Löpnumret fortsätter över blockgränserna
        let numbers: Vec<usize> = report
            .blocks
            .iter()
            .flat_map(|b| b.rows.iter().map(|r| r.number))
            .collect();
        assert_eq!(numbers, vec![1, 2, 3, 4]);
        assert_eq!(report.blocks[0].rows[0].name, "Erik");
        assert_eq!(report.blocks[0].rows[1].name, "Sara");
        assert_eq!(report.blocks[2].rows[0].name, "Ali");
    }

    #[test]
    fn test_dangling_group_reference_lands_in_unassigned() {
        let members = [member("m1", "Erik", Some("raderad"))];
        let report = build_summary_report(&members, &[], &[]);

        assert_eq!(report.blocks.len(), 1);
        assert_eq!(report.blocks[0].label, UNASSIGNED_LABEL);
        assert_eq!(report.blocks[0].rows[0].name, "Erik");
    }

    #[test]
    fn test_empty_group_still_gets_a_block() {
        let groups = [group("g1", "Falkarna")];
        let report = build_summary_report(&[], &groups, &[]);
        assert_eq!(report.blocks.len(), 1);
        assert!(report.blocks[0].rows.is_empty());
    }

    #[test]
    fn test_summary_counts_over_window_only() {
        let members = [member("m1", "Erik", None)];
        // Elva sessioner: den äldsta (utanför fönstret) är den enda frånvaron
        let mut sessions: Vec<MeetingSession> = (2..=12)
            .map(|d| session(&format!("s{}", d), date(d), &[("m1", AttendanceStatus::Present)]))
            .collect();
        sessions.push(session("s1", date(1), &[("m1", AttendanceStatus::Absent)]));

        let report = build_summary_report(&members, &[], &sessions);
        let row = &report.blocks[0].rows[0];

        // 10 av 10 inom fönstret, trots frånvaron i historiken
        assert_eq!(row.present_count, 10);
        assert_eq!(row.percentage, 100);
        assert_eq!(row.marks.len(), SUMMARY_SESSION_CAP);
    }

    #[test]
    fn test_summary_marks_missing_record_as_no_record() {
        let members = [member("m1", "Erik", None), member("m2", "Maja", None)];
        let sessions = [session("s1", date(1), &[("m1", AttendanceStatus::Present)])];

        let report = build_summary_report(&members, &[], &sessions);
        assert_eq!(report.blocks[0].rows[0].marks, vec![StatusMark::Present]);
        assert_eq!(report.blocks[0].rows[1].marks, vec![StatusMark::NoRecord]);
        assert_eq!(report.blocks[0].rows[1].percentage, 0);
    }

    #[test]
    fn test_session_report_name_lists() {
        let members = [member("m1", "Ali", None), member("m2", "Omar", None)];
        let sessions = [session(
            "s1",
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            &[
                ("m1", AttendanceStatus::Present),
                ("m2", AttendanceStatus::Absent),
            ],
        )];

        let report = build_session_report(&members, &sessions, "s1");
        assert_eq!(report.present, vec!["Ali"]);
        assert_eq!(report.absent, vec!["Omar"]);
        assert!(report.excused.is_empty());
    }

    #[test]
    fn test_session_report_drops_stale_members() {
        let members = [member("m1", "Ali", None)];
        let sessions = [session(
            "s1",
            date(1),
            &[
                ("m1", AttendanceStatus::Present),
                ("raderad", AttendanceStatus::Present),
            ],
        )];

        let report = build_session_report(&members, &sessions, "s1");
        assert_eq!(report.present, vec!["Ali"]);
    }

    #[test]
    fn test_session_report_unknown_id_is_empty() {
        let members = [member("m1", "Ali", None)];
        let sessions = [session("s1", date(1), &[("m1", AttendanceStatus::Present)])];

        let report = build_session_report(&members, &sessions, "finns-inte");
        assert!(report.is_empty());
    }
}
