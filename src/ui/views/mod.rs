mod archive;
mod attendance;
mod dashboard;
mod members;
mod settings;

pub use archive::ArchiveView;
pub use attendance::AttendanceView;
pub use dashboard::DashboardView;
pub use members::MembersView;
pub use settings::SettingsView;
