use chrono::NaiveDate;
use egui::{self, Color32, RichText};

use crate::db::Database;
use crate::services::stats;
use crate::ui::{state::AppState, theme::{Colors, Icons}, View};
use crate::utils::date;

/// Kort om en session i listan "senaste sessioner"
struct RecentSession {
    date: NaiveDate,
    topic: Option<String>,
    present: usize,
}

pub struct DashboardView {
    // Cachad statistik
    member_count: usize,
    session_count: usize,
    average_attendance: u8,
    troop_name: String,
    recent: Vec<RecentSession>,
    needs_refresh: bool,
}

impl DashboardView {
    pub fn new() -> Self {
        Self {
            member_count: 0,
            session_count: 0,
            average_attendance: 0,
            troop_name: String::new(),
            recent: Vec::new(),
            needs_refresh: true,
        }
    }

    pub fn show(&mut self, ui: &mut egui::Ui, state: &mut AppState, db: &Database) {
        if self.needs_refresh {
            self.refresh_stats(db);
            self.needs_refresh = false;
        }

        ui.vertical(|ui| {
            ui.heading(format!("{} Översikt", Icons::DASHBOARD));
            ui.label(RichText::new(&self.troop_name).color(Colors::TEXT_SECONDARY));

            ui.add_space(16.0);

            // Statistikkort
            ui.horizontal(|ui| {
                self.stat_card(ui, Icons::PEOPLE, "Medlemmar", &self.member_count.to_string(), Colors::PRIMARY);
                ui.add_space(8.0);
                self.stat_card(ui, Icons::CALENDAR, "Sessioner", &self.session_count.to_string(), Colors::INFO);
                ui.add_space(8.0);
                let avg = format!("{}%", self.average_attendance);
                self.stat_card(ui, Icons::CHECK, "Snittnärvaro", &avg, Colors::SUCCESS);
            });

            ui.add_space(24.0);

            // Snabbåtgärder
            ui.heading("Snabbåtgärder");
            ui.add_space(8.0);

            ui.horizontal(|ui| {
                if ui.button(format!("{} Registrera närvaro", Icons::CHECK)).clicked() {
                    state.navigate(View::Attendance);
                }

                if ui.button(format!("{} Hantera medlemmar", Icons::PEOPLE)).clicked() {
                    state.navigate(View::Members);
                }

                if ui.button(format!("{} Öppna arkivet", Icons::ARCHIVE)).clicked() {
                    state.navigate(View::Archive);
                }
            });

            ui.add_space(24.0);

            // Senaste sessioner
            ui.heading("Senaste sessioner");
            ui.add_space(8.0);
            self.show_recent_sessions(ui, state);
        });
    }

    fn stat_card(&self, ui: &mut egui::Ui, icon: &str, label: &str, value: &str, color: Color32) {
        egui::Frame::none()
            .fill(ui.visuals().extreme_bg_color)
            .rounding(8.0)
            .inner_margin(16.0)
            .show(ui, |ui| {
                ui.set_min_width(150.0);
                ui.vertical(|ui| {
                    ui.horizontal(|ui| {
                        ui.label(RichText::new(icon).size(24.0));
                        ui.label(RichText::new(label).color(Colors::TEXT_SECONDARY));
                    });
                    ui.add_space(8.0);
                    ui.label(RichText::new(value).size(28.0).strong().color(color));
                });
            });
    }

    fn show_recent_sessions(&mut self, ui: &mut egui::Ui, state: &mut AppState) {
        if self.recent.is_empty() {
            ui.label(
                RichText::new("Inga sessioner ännu. Registrera kårens första närvaroomgång!")
                    .color(Colors::TEXT_SECONDARY),
            );
            return;
        }

        for session in &self.recent {
            ui.horizontal(|ui| {
                ui.label(Icons::CALENDAR);
                if ui.link(date::format_long(session.date)).clicked() {
                    state.navigate(View::Archive);
                }
                if let Some(topic) = &session.topic {
                    ui.label(RichText::new(topic).small().color(Colors::TEXT_MUTED));
                }
                ui.label(
                    RichText::new(format!("{} närvarande", session.present))
                        .small()
                        .color(Colors::SUCCESS),
                );
            });
        }
    }

    fn refresh_stats(&mut self, db: &Database) {
        let store = db.store();
        let sessions = store.sessions();

        self.member_count = store.members().len();
        self.session_count = sessions.len();
        self.average_attendance = stats::average_attendance(&sessions);
        self.troop_name = store.settings().troop_name;

        let mut sorted = sessions;
        sorted.sort_by(|a, b| b.date.cmp(&a.date));
        self.recent = sorted
            .iter()
            .take(3)
            .map(|s| RecentSession {
                date: s.date,
                topic: s.display_topic().map(str::to_string),
                present: stats::present_count(s),
            })
            .collect();
    }

    pub fn mark_needs_refresh(&mut self) {
        self.needs_refresh = true;
    }
}
