//! Närvaro Desktop - Entry Point
//!
//! Närvaroregistrering för scoutkårer.

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]
#![allow(dead_code)]

mod app;
mod db;
mod models;
mod services;
mod ui;
mod utils;

use app::NarvaroApp;
use eframe::egui;

fn main() -> eframe::Result<()> {
    // Initiera logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(false)
        .init();

    tracing::info!("Startar Närvaro Desktop v{}", env!("CARGO_PKG_VERSION"));

    // Fönsterinställningar
    let ui_settings = models::UiSettings::load();
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(format!("Närvaro v{}", env!("CARGO_PKG_VERSION")))
            .with_inner_size([ui_settings.window_width, ui_settings.window_height])
            .with_min_inner_size([800.0, 600.0])
            .with_app_id("narvaro"),
        ..Default::default()
    };

    // Starta applikationen
    eframe::run_native(
        "Närvaro",
        options,
        Box::new(|cc| Ok(Box::new(NarvaroApp::new(cc)))),
    )
}
