use std::path::PathBuf;

use base64::Engine;
use egui::{self, ColorImage, RichText, TextureHandle, TextureOptions};

use crate::db::Database;
use crate::models::TroopSettings;
use crate::services::BackupService;
use crate::ui::{state::AppState, theme::{Colors, Icons}};
use crate::utils::path::{display_path, get_database_path};

/// Maxstorlek för logotypfil (lagras base64-kodad i inställningarna)
const MAX_LOGO_BYTES: u64 = 500_000;

pub struct SettingsView {
    form: TroopSettings,
    logo_texture: Option<TextureHandle>,
    logo_loaded_for: Option<String>,
    confirm_import: Option<PathBuf>,
    confirm_clear: bool,
    needs_refresh: bool,
}

impl SettingsView {
    pub fn new() -> Self {
        Self {
            form: TroopSettings::default(),
            logo_texture: None,
            logo_loaded_for: None,
            confirm_import: None,
            confirm_clear: false,
            needs_refresh: true,
        }
    }

    pub fn show(&mut self, ui: &mut egui::Ui, state: &mut AppState, db: &Database) {
        if self.needs_refresh {
            self.form = db.store().settings();
            self.needs_refresh = false;
        }

        self.ensure_logo_texture(ui.ctx());

        egui::ScrollArea::vertical().show(ui, |ui| {
            ui.heading(format!("{} Inställningar", Icons::SETTINGS));
            ui.add_space(16.0);

            self.show_troop_section(ui, state, db);
            ui.add_space(16.0);
            self.show_logo_section(ui, state);
            ui.add_space(16.0);
            self.show_backup_section(ui, state, db);
            ui.add_space(16.0);
            self.show_danger_section(ui);
            ui.add_space(16.0);
            self.show_about_section(ui);
        });

        self.show_import_dialog(ui.ctx(), state, db);
        self.show_clear_dialog(ui.ctx(), state, db);
    }

    fn show_troop_section(&mut self, ui: &mut egui::Ui, state: &mut AppState, db: &Database) {
        egui::Frame::none()
            .fill(ui.visuals().extreme_bg_color)
            .rounding(8.0)
            .inner_margin(16.0)
            .show(ui, |ui| {
                ui.set_min_width(ui.available_width());
                ui.label(RichText::new("Kåruppgifter").strong());
                ui.add_space(8.0);

                egui::Grid::new("troop_form").num_columns(2).show(ui, |ui| {
                    ui.label("Kårens namn:");
                    ui.text_edit_singleline(&mut self.form.troop_name);
                    ui.end_row();

                    ui.label("Kårledare:");
                    ui.text_edit_singleline(&mut self.form.leader_name);
                    ui.end_row();

                    ui.label("Samordnare:");
                    ui.text_edit_singleline(&mut self.form.coordinator_name);
                    ui.end_row();

                    ui.label("Sekreterare:");
                    ui.text_edit_singleline(&mut self.form.secretary_name);
                    ui.end_row();
                });

                ui.add_space(8.0);

                if ui.button(format!("{} Spara", Icons::SAVE)).clicked() {
                    if self.form.troop_name.trim().is_empty() {
                        state.set_error("Kårens namn får inte vara tomt");
                    } else {
                        match db.store().save_settings(&self.form) {
                            Ok(()) => state.set_success("Inställningarna sparades"),
                            Err(e) => state.set_error(format!("Kunde inte spara: {}", e)),
                        }
                    }
                }
            });
    }

    fn show_logo_section(&mut self, ui: &mut egui::Ui, state: &mut AppState) {
        egui::Frame::none()
            .fill(ui.visuals().extreme_bg_color)
            .rounding(8.0)
            .inner_margin(16.0)
            .show(ui, |ui| {
                ui.set_min_width(ui.available_width());
                ui.label(RichText::new("Logotyp").strong());
                ui.add_space(8.0);

                if let Some(texture) = &self.logo_texture {
                    ui.add(egui::Image::new(texture).fit_to_exact_size(egui::vec2(96.0, 96.0)));
                } else {
                    ui.label(RichText::new(Icons::FLAG).size(48.0));
                    ui.label(RichText::new("Ingen logotyp uppladdad").color(Colors::TEXT_MUTED));
                }

                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    if ui.button(format!("{} Ladda upp...", Icons::IMPORT)).clicked() {
                        self.upload_logo(state);
                    }
                    if self.form.logo_url.is_some()
                        && ui.button(format!("{} Ta bort", Icons::DELETE)).clicked()
                    {
                        self.form.logo_url = None;
                        state.set_status(
                            "Spara för att ta bort logotypen",
                            crate::ui::StatusType::Info,
                        );
                    }
                });
                ui.label(
                    RichText::new("Bilden sparas i inställningarna. Max 500 kB.")
                        .small()
                        .color(Colors::TEXT_MUTED),
                );
            });
    }

    fn show_backup_section(&mut self, ui: &mut egui::Ui, state: &mut AppState, db: &Database) {
        egui::Frame::none()
            .fill(ui.visuals().extreme_bg_color)
            .rounding(8.0)
            .inner_margin(16.0)
            .show(ui, |ui| {
                ui.set_min_width(ui.available_width());
                ui.label(RichText::new("Säkerhetskopiering").strong());
                ui.add_space(4.0);
                ui.label(
                    "Spara en kopia av alla medlemmar, patruller, sessioner och inställningar \
                     som en JSON-fil, eller läs tillbaka en tidigare kopia.",
                );
                ui.add_space(8.0);

                ui.horizontal(|ui| {
                    if ui.button(format!("{} Exportera...", Icons::EXPORT)).clicked() {
                        self.export_backup(state, db);
                    }

                    if ui.button(format!("{} Återställ...", Icons::IMPORT)).clicked() {
                        if let Some(path) = rfd::FileDialog::new()
                            .add_filter("JSON", &["json"])
                            .pick_file()
                        {
                            self.confirm_import = Some(path);
                        }
                    }
                });
            });
    }

    fn show_danger_section(&mut self, ui: &mut egui::Ui) {
        egui::Frame::none()
            .fill(ui.visuals().extreme_bg_color)
            .rounding(8.0)
            .inner_margin(16.0)
            .show(ui, |ui| {
                ui.set_min_width(ui.available_width());
                ui.label(RichText::new("Rensa data").strong().color(Colors::ERROR));
                ui.add_space(4.0);
                ui.label("Tar bort alla medlemmar, patruller, sessioner och inställningar.");
                ui.add_space(8.0);

                if ui.button(format!("{} Rensa all data...", Icons::DELETE)).clicked() {
                    self.confirm_clear = true;
                }
            });
    }

    fn show_about_section(&self, ui: &mut egui::Ui) {
        egui::Frame::none()
            .fill(ui.visuals().extreme_bg_color)
            .rounding(8.0)
            .inner_margin(16.0)
            .show(ui, |ui| {
                ui.set_min_width(ui.available_width());
                ui.label(RichText::new("Om Närvaro").strong());
                ui.add_space(8.0);

                ui.label(format!("Version: {}", env!("CARGO_PKG_VERSION")));
                ui.label("Närvaroregistrering för scoutkårer");
                ui.label(
                    RichText::new(format!("Databas: {}", display_path(&get_database_path())))
                        .small()
                        .color(Colors::TEXT_MUTED),
                );
            });
    }

    fn upload_logo(&mut self, state: &mut AppState) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("Bilder", &["png", "jpg", "jpeg", "webp"])
            .pick_file()
        else {
            return;
        };

        match std::fs::read(&path) {
            Ok(bytes) if bytes.len() as u64 > MAX_LOGO_BYTES => {
                state.set_error("Filen är för stor. Välj en bild under 500 kB.");
            }
            Ok(bytes) => {
                let mime = match path.extension().and_then(|e| e.to_str()) {
                    Some("jpg") | Some("jpeg") => "image/jpeg",
                    Some("webp") => "image/webp",
                    _ => "image/png",
                };
                let encoded = base64::engine::general_purpose::STANDARD.encode(&bytes);
                self.form.logo_url = Some(format!("data:{};base64,{}", mime, encoded));
                state.set_status(
                    "Spara för att behålla logotypen",
                    crate::ui::StatusType::Info,
                );
            }
            Err(e) => state.set_error(format!("Kunde inte läsa bilden: {}", e)),
        }
    }

    /// Ladda om logotyptexturen när inställningen ändrats
    fn ensure_logo_texture(&mut self, ctx: &egui::Context) {
        if self.logo_loaded_for == self.form.logo_url {
            return;
        }

        self.logo_texture = self
            .form
            .logo_url
            .as_deref()
            .and_then(|url| Self::load_logo(ctx, url));
        self.logo_loaded_for = self.form.logo_url.clone();
    }

    fn load_logo(ctx: &egui::Context, data_url: &str) -> Option<TextureHandle> {
        let encoded = data_url.split("base64,").nth(1)?;
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(encoded)
            .ok()?;
        let image = image::load_from_memory(&bytes).ok()?;
        let rgba = image.to_rgba8();
        let size = [rgba.width() as usize, rgba.height() as usize];
        let color_image = ColorImage::from_rgba_unmultiplied(size, rgba.as_raw());

        Some(ctx.load_texture("kårlogotyp", color_image, TextureOptions::LINEAR))
    }

    fn export_backup(&self, state: &mut AppState, db: &Database) {
        let Some(path) = rfd::FileDialog::new()
            .set_file_name(BackupService::suggested_filename())
            .add_filter("JSON", &["json"])
            .save_file()
        else {
            return;
        };

        match BackupService::new(db).export_to_file(&path) {
            Ok(result) => {
                state.set_success(format!("Säkerhetskopia sparad ({})", result.size_display()))
            }
            Err(e) => state.set_error(format!("Exporten misslyckades: {}", e)),
        }
    }

    fn show_import_dialog(&mut self, ctx: &egui::Context, state: &mut AppState, db: &Database) {
        let Some(path) = self.confirm_import.clone() else {
            return;
        };

        let mut close = false;
        egui::Window::new("Återställ säkerhetskopia")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(
                    "Befintlig data skrivs över med innehållet i filen. \
                     Vill du fortsätta?",
                );
                ui.label(RichText::new(display_path(&path)).small().color(Colors::TEXT_MUTED));
                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    if ui.button("Återställ").clicked() {
                        if BackupService::new(db).import_from_file(&path) {
                            state.set_success("Säkerhetskopian lästes in");
                        } else {
                            state.set_error(
                                "Kunde inte läsa säkerhetskopian. Kontrollera att filen är korrekt.",
                            );
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
            self.confirm_import = None;
        }
    }

    fn show_clear_dialog(&mut self, ctx: &egui::Context, state: &mut AppState, db: &Database) {
        if !self.confirm_clear {
            return;
        }

        let mut close = false;
        egui::Window::new("Rensa all data")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label("All kårdata tas bort permanent. Detta kan inte ångras.");
                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    if ui.button(RichText::new("Rensa").color(Colors::ERROR)).clicked() {
                        match db.store().clear_all_data() {
                            Ok(()) => state.set_success("All data rensades"),
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
            self.confirm_clear = false;
        }
    }

    pub fn mark_needs_refresh(&mut self) {
        self.needs_refresh = true;
    }
}
