//! Närvaro Desktop - Närvaroregistrering för scoutkårer
//!
//! En native desktop-applikation byggd med Rust och egui.

#![allow(dead_code)]

pub mod db;
pub mod models;
pub mod services;
pub mod ui;
pub mod utils;

// Re-exports
pub use db::Database;
pub use models::*;
