//! Roster-tjänst: medlemmar och patruller.
//!
//! All mutation går via läs-ändra-skriv mot lagringen; sessionshistoriken
//! rörs aldrig härifrån.

use crate::db::Database;
use crate::models::{Group, Member};
use crate::utils::{AppError, AppResult};

pub struct RosterService<'a> {
    db: &'a Database,
}

impl<'a> RosterService<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Lägg till en medlem, eventuellt direkt i en patrull
    pub fn add_member(&self, name: &str, group_id: Option<String>) -> AppResult<Member> {
        let member = Member::new(name.trim(), group_id);
        member
            .validate()
            .map_err(|e| AppError::validation(e.to_string()))?;

        let store = self.db.store();
        let mut members = store.members();
        members.push(member.clone());
        store.save_members(&members)?;

        Ok(member)
    }

    /// Ta bort en medlem. Sparade sessioner behåller sina poster —
    /// historiken är oföränderlig.
    pub fn delete_member(&self, id: &str) -> AppResult<()> {
        let store = self.db.store();
        let mut members = store.members();
        let before = members.len();
        members.retain(|m| m.id != id);

        if members.len() == before {
            return Err(AppError::not_found(format!("Medlem {}", id)));
        }

        store.save_members(&members)?;
        Ok(())
    }

    /// Skapa en ny patrull
    pub fn add_group(&self, name: &str) -> AppResult<Group> {
        let group = Group::new(name.trim());
        group
            .validate()
            .map_err(|e| AppError::validation(e.to_string()))?;

        let store = self.db.store();
        let mut groups = store.groups();
        groups.push(group.clone());
        store.save_groups(&groups)?;

        Ok(group)
    }

    /// Ta bort en patrull i två steg: patrullposten raderas och varje
    /// medlem som pekade på den länkas av. Medlemmarna finns kvar.
    pub fn delete_group(&self, id: &str) -> AppResult<()> {
        let store = self.db.store();

        let mut groups = store.groups();
        let before = groups.len();
        groups.retain(|g| g.id != id);

        if groups.len() == before {
            return Err(AppError::not_found(format!("Patrull {}", id)));
        }

        store.save_groups(&groups)?;

        let mut members = store.members();
        let mut changed = false;
        for member in &mut members {
            if member.group_id.as_deref() == Some(id) {
                member.group_id = None;
                changed = true;
            }
        }
        if changed {
            store.save_members(&members)?;
        }

        Ok(())
    }

    /// Massimport av namn från text: en oindelad medlem per icke-tom rad.
    /// Returnerar antalet importerade.
    pub fn import_names(&self, text: &str) -> AppResult<usize> {
        let names: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();

        if names.is_empty() {
            return Ok(0);
        }

        let store = self.db.store();
        let mut members = store.members();
        for name in &names {
            members.push(Member::new(*name, None));
        }
        store.save_members(&members)?;

        Ok(names.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> Database {
        Database::open_in_memory().unwrap()
    }

    #[test]
    fn test_add_member_trims_and_persists() {
        let db = setup();
        let roster = RosterService::new(&db);

        let member = roster.add_member("  Erik Lund  ", None).unwrap();
        assert_eq!(member.name, "Erik Lund");

        let stored = db.store().members();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].id, member.id);
    }

    #[test]
    fn test_add_member_rejects_empty_name() {
        let db = setup();
        let roster = RosterService::new(&db);

        let result = roster.add_member("   ", None);
        assert!(matches!(result, Err(AppError::Validation(_))));
        // Ingen partiell entitet skapades
        assert!(db.store().members().is_empty());
    }

    #[test]
    fn test_delete_group_unlinks_but_keeps_members() {
        let db = setup();
        let roster = RosterService::new(&db);

        let group = roster.add_group("Falkarna").unwrap();
        let m1 = roster.add_member("Erik", Some(group.id.clone())).unwrap();
        let m2 = roster.add_member("Maja", Some(group.id.clone())).unwrap();
        let other = roster.add_member("Ali", None).unwrap();

        roster.delete_group(&group.id).unwrap();

        let store = db.store();
        assert!(store.groups().is_empty());

        let members = store.members();
        assert_eq!(members.len(), 3);
        for member in &members {
            assert!(member.group_id.is_none(), "{} ska vara avlänkad", member.name);
        }
        assert!(members.iter().any(|m| m.id == m1.id));
        assert!(members.iter().any(|m| m.id == m2.id));
        assert!(members.iter().any(|m| m.id == other.id));
    }

    #[test]
    fn test_delete_missing_group_is_not_found() {
        let db = setup();
        let roster = RosterService::new(&db);

        assert!(matches!(
            roster.delete_group("finns-inte"),
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    fn test_import_names() {
        let db = setup();
        let roster = RosterService::new(&db);

        let count = roster
            .import_names("Erik Lund\r\n  Maja Berg  \n\n\nAli Hassan\n")
            .unwrap();
        assert_eq!(count, 3);

        let members = db.store().members();
        let names: Vec<&str> = members.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Erik Lund", "Maja Berg", "Ali Hassan"]);
        assert!(members.iter().all(|m| m.group_id.is_none()));
    }

    #[test]
    fn test_import_empty_text_is_a_noop() {
        let db = setup();
        let roster = RosterService::new(&db);

        assert_eq!(roster.import_names("\n  \n").unwrap(), 0);
        assert!(db.store().members().is_empty());
    }
}
