use std::path::{Path, PathBuf};

/// Hämta databassökväg
pub fn get_database_path() -> PathBuf {
    directories::ProjectDirs::from("se", "narvaro", "Narvaro")
        .map(|dirs| dirs.data_dir().join("narvaro.db"))
        .unwrap_or_else(|| PathBuf::from("narvaro.db"))
}

/// Hämta sökväg för UI-inställningar
pub fn get_ui_settings_path() -> PathBuf {
    directories::ProjectDirs::from("se", "narvaro", "Narvaro")
        .map(|dirs| dirs.config_dir().join("settings.toml"))
        .unwrap_or_else(|| PathBuf::from("settings.toml"))
}

/// Normalisera sökväg för visning
pub fn display_path(path: &Path) -> String {
    // Förkorta hemkatalogen till ~
    if let Some(home) = dirs::home_dir() {
        if let Ok(stripped) = path.strip_prefix(&home) {
            return format!("~/{}", stripped.display());
        }
    }
    path.display().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_path_has_filename() {
        let path = get_database_path();
        assert_eq!(path.file_name().unwrap(), "narvaro.db");
    }
}
