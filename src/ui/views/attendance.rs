use std::collections::HashMap;

use chrono::Local;
use egui::{self, RichText};

use crate::db::Database;
use crate::models::{AttendanceRecord, AttendanceStatus, Member};
use crate::services::SessionService;
use crate::ui::{state::AppState, theme::{Colors, Icons}, View};
use crate::utils::date;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Details,
    Tally,
}

/// Tvåstegsvy: först sessionens uppgifter, sedan uppropet.
pub struct AttendanceView {
    date_text: String,
    topic: String,
    step: Step,
    statuses: HashMap<String, AttendanceStatus>,
    members: Vec<Member>,
    needs_refresh: bool,
}

impl AttendanceView {
    pub fn new() -> Self {
        Self {
            date_text: Local::now().date_naive().to_string(),
            topic: String::new(),
            step: Step::Details,
            statuses: HashMap::new(),
            members: Vec::new(),
            needs_refresh: true,
        }
    }

    pub fn show(&mut self, ui: &mut egui::Ui, state: &mut AppState, db: &Database) {
        if self.needs_refresh {
            self.members = db.store().members();
            self.needs_refresh = false;
        }

        ui.heading(format!("{} Närvaro", Icons::CHECK));
        ui.add_space(8.0);

        if self.members.is_empty() {
            ui.label(
                RichText::new("Det finns inga medlemmar att pricka av.")
                    .color(Colors::TEXT_SECONDARY),
            );
            if ui.button(format!("{} Gå till medlemmar", Icons::PEOPLE)).clicked() {
                state.navigate(View::Members);
            }
            return;
        }

        match self.step {
            Step::Details => self.show_details(ui, state),
            Step::Tally => self.show_tally(ui, state, db),
        }
    }

    fn show_details(&mut self, ui: &mut egui::Ui, state: &mut AppState) {
        egui::Frame::none()
            .fill(ui.visuals().extreme_bg_color)
            .rounding(8.0)
            .inner_margin(16.0)
            .show(ui, |ui| {
                ui.label(RichText::new("Sessionens uppgifter").strong());
                ui.add_space(8.0);

                ui.horizontal(|ui| {
                    ui.label("Datum:");
                    ui.text_edit_singleline(&mut self.date_text);
                });
                ui.horizontal(|ui| {
                    ui.label("Ämne (valfritt):");
                    ui.text_edit_singleline(&mut self.topic);
                });

                ui.add_space(8.0);

                if ui.button("Starta uppropet").clicked() {
                    if date::parse_date(&self.date_text).is_none() {
                        state.set_error("Ogiltigt datum. Använd formatet ÅÅÅÅ-MM-DD.");
                    } else {
                        // Alla börjar som närvarande
                        for member in &self.members {
                            self.statuses
                                .entry(member.id.clone())
                                .or_insert(AttendanceStatus::Present);
                        }
                        self.step = Step::Tally;
                    }
                }
            });
    }

    fn show_tally(&mut self, ui: &mut egui::Ui, state: &mut AppState, db: &Database) {
        // Löpande räkning
        let (present, absent, excused) = self.statuses.values().fold((0, 0, 0), |acc, s| match s {
            AttendanceStatus::Present => (acc.0 + 1, acc.1, acc.2),
            AttendanceStatus::Absent => (acc.0, acc.1 + 1, acc.2),
            AttendanceStatus::Excused => (acc.0, acc.1, acc.2 + 1),
        });

        ui.horizontal(|ui| {
            ui.label(RichText::new(format!("{} närvarande", present)).color(Colors::PRESENT));
            ui.label(RichText::new(format!("{} frånvarande", absent)).color(Colors::ABSENT));
            ui.label(RichText::new(format!("{} anmäld frånvaro", excused)).color(Colors::EXCUSED));

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("Ändra uppgifter").clicked() {
                    self.step = Step::Details;
                }
            });
        });

        ui.add_space(8.0);

        egui::ScrollArea::vertical()
            .max_height(ui.available_height() - 48.0)
            .show(ui, |ui| {
                let members = self.members.clone();
                for member in &members {
                    egui::Frame::none()
                        .fill(ui.visuals().extreme_bg_color)
                        .rounding(8.0)
                        .inner_margin(10.0)
                        .show(ui, |ui| {
                            ui.set_min_width(ui.available_width());
                            ui.horizontal(|ui| {
                                ui.label(RichText::new(&member.name).strong());

                                ui.with_layout(
                                    egui::Layout::right_to_left(egui::Align::Center),
                                    |ui| {
                                        for status in AttendanceStatus::ALL.iter().rev() {
                                            let selected =
                                                self.statuses.get(&member.id) == Some(status);
                                            if ui
                                                .selectable_label(selected, status.label())
                                                .clicked()
                                            {
                                                self.statuses.insert(member.id.clone(), *status);
                                            }
                                        }
                                    },
                                );
                            });
                        });
                    ui.add_space(4.0);
                }
            });

        ui.add_space(8.0);

        if ui
            .button(RichText::new(format!("{} Spara närvaroomgången", Icons::SAVE)).strong())
            .clicked()
        {
            self.save_session(state, db);
        }
    }

    fn save_session(&mut self, state: &mut AppState, db: &Database) {
        let Some(session_date) = date::parse_date(&self.date_text) else {
            state.set_error("Ogiltigt datum. Använd formatet ÅÅÅÅ-MM-DD.");
            self.step = Step::Details;
            return;
        };

        // Poster i rosterordning
        let records: Vec<AttendanceRecord> = self
            .members
            .iter()
            .map(|m| AttendanceRecord {
                member_id: m.id.clone(),
                status: self
                    .statuses
                    .get(&m.id)
                    .copied()
                    .unwrap_or(AttendanceStatus::Present),
            })
            .collect();

        let topic = if self.topic.trim().is_empty() {
            None
        } else {
            Some(self.topic.clone())
        };

        match SessionService::new(db).save_session(session_date, topic, records) {
            Ok(session) => {
                state.set_success(format!(
                    "Närvaron för {} sparades",
                    date::format_long(session.date)
                ));
                self.topic.clear();
                self.statuses.clear();
                self.step = Step::Details;
            }
            Err(e) => state.set_error(format!("Kunde inte spara: {}", e)),
        }
    }

    pub fn mark_needs_refresh(&mut self) {
        self.needs_refresh = true;
    }
}
