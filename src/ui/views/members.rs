use egui::{self, RichText};

use crate::db::Database;
use crate::models::{Group, Member};
use crate::services::RosterService;
use crate::ui::{state::AppState, theme::{Colors, Icons}};

/// Väntande borttagning som kräver bekräftelse
enum PendingDelete {
    Member { id: String, name: String },
    Group { id: String, name: String },
}

/// Var ett nytt medlemsnamn ska läggas till
#[derive(Clone, PartialEq)]
enum AddTarget {
    Unassigned,
    Group(String),
}

pub struct MembersView {
    members: Vec<Member>,
    groups: Vec<Group>,
    new_member_name: String,
    new_group_name: String,
    adding_group: bool,
    adding_member_to: Option<AddTarget>,
    pending_delete: Option<PendingDelete>,
    needs_refresh: bool,
}

impl MembersView {
    pub fn new() -> Self {
        Self {
            members: Vec::new(),
            groups: Vec::new(),
            new_member_name: String::new(),
            new_group_name: String::new(),
            adding_group: false,
            adding_member_to: None,
            pending_delete: None,
            needs_refresh: true,
        }
    }

    pub fn show(&mut self, ui: &mut egui::Ui, state: &mut AppState, db: &Database) {
        if self.needs_refresh {
            self.refresh(db);
            self.needs_refresh = false;
        }

        ui.heading(format!("{} Medlemmar", Icons::PEOPLE));
        ui.label(
            RichText::new(format!("Totalt: {} medlemmar, {} patruller", self.members.len(), self.groups.len()))
                .color(Colors::TEXT_SECONDARY),
        );
        ui.add_space(8.0);

        ui.horizontal(|ui| {
            if ui.button(format!("{} Importera namn...", Icons::IMPORT)).clicked() {
                self.import_from_file(state, db);
            }

            if ui.button(format!("{} Ny patrull", Icons::ADD)).clicked() {
                self.adding_group = true;
                self.new_group_name.clear();
            }
        });

        if self.adding_group {
            ui.horizontal(|ui| {
                ui.label("Patrullnamn:");
                ui.text_edit_singleline(&mut self.new_group_name);
                if ui.button("Lägg till").clicked() {
                    match RosterService::new(db).add_group(&self.new_group_name) {
                        Ok(group) => {
                            state.set_success(format!("Patrullen {} skapades", group.name));
                            self.adding_group = false;
                            self.needs_refresh = true;
                        }
                        Err(e) => state.set_error(e.to_string()),
                    }
                }
                if ui.button("Avbryt").clicked() {
                    self.adding_group = false;
                }
            });
        }

        ui.add_space(12.0);

        egui::ScrollArea::vertical().show(ui, |ui| {
            let groups = self.groups.clone();
            for group in &groups {
                self.show_group_block(ui, state, db, group);
                ui.add_space(8.0);
            }

            self.show_unassigned_block(ui, state, db);
        });

        self.show_confirm_dialog(ui.ctx(), state, db);
    }

    fn show_group_block(&mut self, ui: &mut egui::Ui, state: &mut AppState, db: &Database, group: &Group) {
        let members: Vec<Member> = self
            .members
            .iter()
            .filter(|m| m.group_id.as_deref() == Some(group.id.as_str()))
            .cloned()
            .collect();

        egui::Frame::none()
            .fill(ui.visuals().extreme_bg_color)
            .rounding(8.0)
            .inner_margin(12.0)
            .show(ui, |ui| {
                ui.set_min_width(ui.available_width());
                ui.horizontal(|ui| {
                    ui.label(RichText::new(&group.name).strong());
                    ui.label(
                        RichText::new(format!("({})", members.len()))
                            .small()
                            .color(Colors::TEXT_MUTED),
                    );

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button(Icons::DELETE).on_hover_text("Ta bort patrullen").clicked() {
                            self.pending_delete = Some(PendingDelete::Group {
                                id: group.id.clone(),
                                name: group.name.clone(),
                            });
                        }
                    });
                });

                ui.separator();

                if members.is_empty() {
                    ui.label(RichText::new("Inga medlemmar i patrullen").color(Colors::TEXT_MUTED));
                }

                for member in &members {
                    self.show_member_row(ui, member);
                }

                self.show_add_member_row(ui, state, db, AddTarget::Group(group.id.clone()));
            });
    }

    fn show_unassigned_block(&mut self, ui: &mut egui::Ui, state: &mut AppState, db: &Database) {
        let unassigned: Vec<Member> = self
            .members
            .iter()
            .filter(|m| match &m.group_id {
                None => true,
                Some(gid) => !self.groups.iter().any(|g| g.id == *gid),
            })
            .cloned()
            .collect();

        egui::Frame::none()
            .fill(ui.visuals().extreme_bg_color)
            .rounding(8.0)
            .inner_margin(12.0)
            .show(ui, |ui| {
                ui.set_min_width(ui.available_width());
                ui.horizontal(|ui| {
                    ui.label(RichText::new("Ej indelade").strong());
                    ui.label(
                        RichText::new(format!("({})", unassigned.len()))
                            .small()
                            .color(Colors::TEXT_MUTED),
                    );
                });

                ui.separator();

                if unassigned.is_empty() {
                    ui.label(RichText::new("Alla medlemmar är indelade i patruller").color(Colors::TEXT_MUTED));
                }

                for member in &unassigned {
                    self.show_member_row(ui, member);
                }

                self.show_add_member_row(ui, state, db, AddTarget::Unassigned);
            });
    }

    fn show_member_row(&mut self, ui: &mut egui::Ui, member: &Member) {
        ui.horizontal(|ui| {
            ui.label(Icons::PERSON);
            ui.label(&member.name);
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.small_button(Icons::DELETE).on_hover_text("Ta bort medlemmen").clicked() {
                    self.pending_delete = Some(PendingDelete::Member {
                        id: member.id.clone(),
                        name: member.name.clone(),
                    });
                }
            });
        });
    }

    fn show_add_member_row(&mut self, ui: &mut egui::Ui, state: &mut AppState, db: &Database, target: AddTarget) {
        if self.adding_member_to.as_ref() == Some(&target) {
            ui.horizontal(|ui| {
                ui.text_edit_singleline(&mut self.new_member_name);
                if ui.button("Lägg till").clicked() {
                    let group_id = match &target {
                        AddTarget::Unassigned => None,
                        AddTarget::Group(id) => Some(id.clone()),
                    };
                    match RosterService::new(db).add_member(&self.new_member_name, group_id) {
                        Ok(_) => {
                            // Behåll formuläret öppet för snabb inmatning
                            self.new_member_name.clear();
                            self.needs_refresh = true;
                        }
                        Err(e) => state.set_error(e.to_string()),
                    }
                }
                if ui.button("Stäng").clicked() {
                    self.adding_member_to = None;
                }
            });
        } else if ui
            .button(format!("{} Lägg till medlem", Icons::ADD))
            .clicked()
        {
            self.adding_member_to = Some(target);
            self.new_member_name.clear();
        }
    }

    /// Massimport: en medlem per rad i vald textfil
    fn import_from_file(&mut self, state: &mut AppState, db: &Database) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("Textfiler", &["txt", "csv"])
            .pick_file()
        else {
            return;
        };

        match std::fs::read_to_string(&path) {
            Ok(text) => match RosterService::new(db).import_names(&text) {
                Ok(count) => {
                    state.set_success(format!("Importerade {} namn till Ej indelade", count));
                    self.needs_refresh = true;
                }
                Err(e) => state.set_error(format!("Importen misslyckades: {}", e)),
            },
            Err(e) => state.set_error(format!("Kunde inte läsa filen: {}", e)),
        }
    }

    fn show_confirm_dialog(&mut self, ctx: &egui::Context, state: &mut AppState, db: &Database) {
        let Some(pending) = &self.pending_delete else {
            return;
        };

        let message = match pending {
            PendingDelete::Member { name, .. } => {
                format!("Ta bort {}? Sparade sessioner behåller historiken.", name)
            }
            PendingDelete::Group { name, .. } => format!(
                "Ta bort patrullen {}? Medlemmarna flyttas till Ej indelade.",
                name
            ),
        };

        let mut close = false;
        egui::Window::new("Bekräfta borttagning")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(message);
                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    if ui.button("Ta bort").clicked() {
                        let roster = RosterService::new(db);
                        let result = match &self.pending_delete {
                            Some(PendingDelete::Member { id, .. }) => roster.delete_member(id),
                            Some(PendingDelete::Group { id, .. }) => roster.delete_group(id),
                            None => Ok(()),
                        };
                        match result {
                            Ok(()) => state.set_success("Borttaget"),
                            Err(e) => state.set_error(e.to_string()),
                        }
                        self.needs_refresh = true;
                        close = true;
                    }
                    if ui.button("Avbryt").clicked() {
                        close = true;
                    }
                });
            });

        if close {
            self.pending_delete = None;
        }
    }

    fn refresh(&mut self, db: &Database) {
        let store = db.store();
        self.members = store.members();
        self.groups = store.groups();
    }

    pub fn mark_needs_refresh(&mut self) {
        self.needs_refresh = true;
    }
}
