//! Tjänster för Närvaro Desktop
//!
//! Innehåller affärslogik som inte hör hemma i UI eller databas.

pub mod backup;
pub mod export;
pub mod report;
pub mod roster;
pub mod sessions;
pub mod stats;

pub use backup::{BackupService, Snapshot};
pub use export::{ExportFormat, ReportExportService};
pub use report::{SessionReport, SummaryReport};
pub use roster::RosterService;
pub use sessions::SessionService;
