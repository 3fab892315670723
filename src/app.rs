//! Huvudapplikation för Närvaro Desktop

use eframe::egui;
use std::sync::Arc;

use crate::db::Database;
use crate::models::UiSettings;
use crate::ui::{
    state::AppState,
    theme::configure_style,
    views::{ArchiveView, AttendanceView, DashboardView, MembersView, SettingsView},
    StatusType, View,
};
use crate::utils::path::get_database_path;

/// Huvudapplikation
pub struct NarvaroApp {
    db: Arc<Database>,
    state: AppState,
    ui_settings: UiSettings,

    // Vyer
    dashboard: DashboardView,
    members: MembersView,
    attendance: AttendanceView,
    archive: ArchiveView,
    settings: SettingsView,

    // Intern
    last_window_size: egui::Vec2,
    style_initialized: bool,
}

impl NarvaroApp {
    /// Skapa ny applikation
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        // Ladda appinställningar
        let ui_settings = UiSettings::load();

        // Öppna databas
        let db_path = get_database_path();
        tracing::info!("Öppnar databas: {:?}", db_path);

        let db = match Database::open(&db_path) {
            Ok(db) => {
                // Kör migrationer
                if let Err(e) = db.migrate() {
                    tracing::error!("Migrering misslyckades: {}", e);
                }
                Arc::new(db)
            }
            Err(e) => {
                tracing::error!("Kunde inte öppna databas: {}", e);
                // Försök med in-memory som fallback
                Arc::new(Database::open_in_memory().expect("Kunde inte skapa in-memory databas"))
            }
        };

        let mut state = AppState::new();
        state.dark_mode = ui_settings.dark_mode;

        let last_window_size = egui::vec2(ui_settings.window_width, ui_settings.window_height);

        Self {
            db,
            state,
            ui_settings,
            dashboard: DashboardView::new(),
            members: MembersView::new(),
            attendance: AttendanceView::new(),
            archive: ArchiveView::new(),
            settings: SettingsView::new(),
            last_window_size,
            style_initialized: false,
        }
    }

    /// Hantera navigation och uppdatera relevanta vyer
    fn handle_view_change(&mut self, new_view: View) {
        match new_view {
            View::Dashboard => self.dashboard.mark_needs_refresh(),
            View::Members => self.members.mark_needs_refresh(),
            View::Attendance => self.attendance.mark_needs_refresh(),
            View::Archive => self.archive.mark_needs_refresh(),
            View::Settings => self.settings.mark_needs_refresh(),
        }
    }

    fn navigate_to(&mut self, view: View) {
        let old = self.state.current_view;
        self.state.current_view = view;
        if old != view {
            self.handle_view_change(view);
        }
    }
}

impl eframe::App for NarvaroApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Konfigurera stil (endast första gången eller vid ändring)
        if !self.style_initialized {
            configure_style(ctx, self.state.dark_mode);
            self.style_initialized = true;
        }

        // Rensa gamla statusmeddelanden
        self.state.clear_old_status();

        // Kom ihåg fönsterstorleken till nästa start
        self.last_window_size = ctx.screen_rect().size();

        // Topbar
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Närvaro");
                ui.separator();

                let nav_items = [
                    (View::Dashboard, "📊 Översikt"),
                    (View::Members, "👥 Medlemmar"),
                    (View::Attendance, "✓ Närvaro"),
                    (View::Archive, "🗂 Arkiv"),
                ];

                for (view, label) in nav_items {
                    if ui
                        .selectable_label(self.state.current_view == view, label)
                        .clicked()
                    {
                        self.navigate_to(view);
                    }
                }

                // Höger sida
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    // Dark mode toggle
                    let mode_icon = if self.state.dark_mode { "🌙" } else { "☀" };
                    if ui.button(mode_icon).clicked() {
                        self.state.dark_mode = !self.state.dark_mode;
                        configure_style(ctx, self.state.dark_mode);
                        self.ui_settings.dark_mode = self.state.dark_mode;
                        let _ = self.ui_settings.save();
                    }

                    // Inställningar
                    if ui
                        .selectable_label(self.state.current_view == View::Settings, "⚙")
                        .clicked()
                    {
                        self.navigate_to(View::Settings);
                    }

                    ui.separator();
                    ui.label(
                        egui::RichText::new(format!("v{}", env!("CARGO_PKG_VERSION")))
                            .small()
                            .weak(),
                    );
                });
            });
        });

        // Statusbar
        if let Some(ref status) = self.state.status_message {
            egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
                let color = match status.status_type {
                    StatusType::Success => crate::ui::theme::Colors::SUCCESS,
                    StatusType::Error => crate::ui::theme::Colors::ERROR,
                    StatusType::Info => crate::ui::theme::Colors::INFO,
                };
                ui.colored_label(color, &status.text);
            });
        }

        // Huvudinnehåll
        egui::CentralPanel::default().show(ctx, |ui| {
            match self.state.current_view {
                View::Dashboard => self.dashboard.show(ui, &mut self.state, &self.db),
                View::Members => self.members.show(ui, &mut self.state, &self.db),
                View::Attendance => self.attendance.show(ui, &mut self.state, &self.db),
                View::Archive => self.archive.show(ui, &mut self.state, &self.db),
                View::Settings => self.settings.show(ui, &mut self.state, &self.db),
            }
        });
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.ui_settings.window_width = self.last_window_size.x;
        self.ui_settings.window_height = self.last_window_size.y;
        if let Err(e) = self.ui_settings.save() {
            tracing::warn!("Kunde inte spara UI-inställningar: {}", e);
        }
    }
}
