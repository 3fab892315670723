use egui::{self, RichText};

use crate::db::Database;
use crate::models::{MeetingSession, Member, StatusMark};
use crate::services::export::{ExportFormat, ReportExportService};
use crate::services::{stats, SessionService};
use crate::ui::{state::AppState, theme::{Colors, Icons}};
use crate::utils::date;

pub struct ArchiveView {
    /// Sessioner sorterade med senaste först
    sessions: Vec<MeetingSession>,
    members: Vec<Member>,
    expanded: Option<String>,
    pending_delete: Option<(String, String)>,
    needs_refresh: bool,
}

impl ArchiveView {
    pub fn new() -> Self {
        Self {
            sessions: Vec::new(),
            members: Vec::new(),
            expanded: None,
            pending_delete: None,
            needs_refresh: true,
        }
    }

    pub fn show(&mut self, ui: &mut egui::Ui, state: &mut AppState, db: &Database) {
        if self.needs_refresh {
            self.refresh(db);
            self.needs_refresh = false;
        }

        ui.horizontal(|ui| {
            ui.heading(format!("{} Arkiv", Icons::ARCHIVE));

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button(format!("{} Rapport (PDF)", Icons::EXPORT)).clicked() {
                    self.export_summary(state, db, ExportFormat::Pdf);
                }
                if ui.button(format!("{} Rapport (CSV)", Icons::EXPORT)).clicked() {
                    self.export_summary(state, db, ExportFormat::Csv);
                }
            });
        });

        ui.add_space(8.0);

        if self.sessions.is_empty() {
            ui.label(RichText::new("Inga sparade sessioner.").color(Colors::TEXT_SECONDARY));
            return;
        }

        egui::ScrollArea::vertical().show(ui, |ui| {
            let sessions = self.sessions.clone();
            for session in &sessions {
                self.show_session_card(ui, state, db, session);
                ui.add_space(6.0);
            }
        });

        self.show_confirm_dialog(ui.ctx(), state, db);
    }

    fn show_session_card(
        &mut self,
        ui: &mut egui::Ui,
        state: &mut AppState,
        db: &Database,
        session: &MeetingSession,
    ) {
        let tally = stats::tally(session);
        let is_expanded = self.expanded.as_deref() == Some(session.id.as_str());

        egui::Frame::none()
            .fill(ui.visuals().extreme_bg_color)
            .rounding(8.0)
            .inner_margin(12.0)
            .show(ui, |ui| {
                ui.set_min_width(ui.available_width());

                ui.horizontal(|ui| {
                    ui.label(Icons::CALENDAR);
                    ui.label(RichText::new(date::format_long(session.date)).strong());
                    if let Some(topic) = session.display_topic() {
                        ui.label(RichText::new(topic).color(Colors::TEXT_SECONDARY));
                    }

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button(Icons::DELETE).on_hover_text("Ta bort sessionen").clicked() {
                            self.pending_delete =
                                Some((session.id.clone(), date::format_long(session.date)));
                        }
                        let toggle_label = if is_expanded { "Dölj" } else { "Visa" };
                        if ui.button(toggle_label).clicked() {
                            self.expanded = if is_expanded {
                                None
                            } else {
                                Some(session.id.clone())
                            };
                        }
                    });
                });

                ui.horizontal(|ui| {
                    ui.label(RichText::new(format!("{} närvarande", tally.present)).small().color(Colors::PRESENT));
                    ui.label(RichText::new(format!("{} frånvarande", tally.absent)).small().color(Colors::ABSENT));
                    ui.label(RichText::new(format!("{} anmälda", tally.excused)).small().color(Colors::EXCUSED));
                    ui.label(
                        RichText::new(format!("Närvaro: {}%", stats::attendance_percentage(session)))
                            .small()
                            .color(Colors::TEXT_MUTED),
                    );
                });

                if is_expanded {
                    ui.separator();
                    self.show_session_detail(ui, session);

                    ui.add_space(6.0);
                    if ui
                        .button(format!("{} Närvarolista (PDF)", Icons::DOCUMENT))
                        .clicked()
                    {
                        self.export_session(state, db, &session.id);
                    }
                }
            });
    }

    /// Per-medlemslista för en utfälld session, i rosterordning.
    /// Medlemmar utan post markeras med streck.
    fn show_session_detail(&self, ui: &mut egui::Ui, session: &MeetingSession) {
        for member in &self.members {
            let mark = stats::status_of(session, &member.id);
            let color = match mark {
                StatusMark::Present => Colors::PRESENT,
                StatusMark::Absent => Colors::ABSENT,
                StatusMark::Excused => Colors::EXCUSED,
                StatusMark::NoRecord => Colors::TEXT_MUTED,
            };

            ui.horizontal(|ui| {
                ui.label(RichText::new(mark.glyph()).color(color).strong());
                ui.label(&member.name);
            });
        }
    }

    fn export_summary(&self, state: &mut AppState, db: &Database, format: ExportFormat) {
        let suggested = ReportExportService::generate_filename("rapport", format);
        let Some(path) = rfd::FileDialog::new()
            .set_file_name(&suggested)
            .add_filter(format.display_name(), &[format.extension()])
            .save_file()
        else {
            return;
        };

        match ReportExportService::new(db).export_summary(format, &path) {
            Ok(result) => state.set_success(result.summary()),
            Err(e) => state.set_error(format!("Exporten misslyckades: {}", e)),
        }
    }

    fn export_session(&self, state: &mut AppState, db: &Database, session_id: &str) {
        let suggested = ReportExportService::generate_filename("session", ExportFormat::Pdf);
        let Some(path) = rfd::FileDialog::new()
            .set_file_name(&suggested)
            .add_filter("PDF", &["pdf"])
            .save_file()
        else {
            return;
        };

        match ReportExportService::new(db).export_session(session_id, &path) {
            Ok(result) => state.set_success(result.summary()),
            Err(e) => state.set_error(format!("Exporten misslyckades: {}", e)),
        }
    }

    fn show_confirm_dialog(&mut self, ctx: &egui::Context, state: &mut AppState, db: &Database) {
        let Some((id, label)) = self.pending_delete.clone() else {
            return;
        };

        let mut close = false;
        egui::Window::new("Bekräfta borttagning")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(format!("Ta bort sessionen {} permanent?", label));
                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    if ui.button("Ta bort").clicked() {
                        match SessionService::new(db).delete_session(&id) {
                            Ok(()) => state.set_success("Sessionen togs bort"),
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
        self.sessions = store.sessions();
        self.sessions.sort_by(|a, b| b.date.cmp(&a.date));
        self.members = store.members();
    }

    pub fn mark_needs_refresh(&mut self) {
        self.needs_refresh = true;
    }
}
