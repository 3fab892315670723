use serde::{Deserialize, Serialize};

use crate::utils::path::get_ui_settings_path;

/// Kårens uppgifter och rapporthuvud (singleton).
///
/// Lagrad JSON kan sakna fält som tillkommit efter att användarens data
/// senast sparades — deserialisering fyller i standardvärden fältvis,
/// så gamla inställningar förblir giltiga.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TroopSettings {
    pub leader_name: String,
    pub coordinator_name: String,
    pub secretary_name: String,
    pub troop_name: String,
    /// Kårens logotyp som base64-kodad data-URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
}

impl Default for TroopSettings {
    fn default() -> Self {
        Self {
            leader_name: "Kårledare".to_string(),
            coordinator_name: String::new(),
            secretary_name: String::new(),
            troop_name: "Scoutkåren".to_string(),
            logo_url: None,
        }
    }
}

impl<'de> Deserialize<'de> for TroopSettings {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct TroopSettingsHelper {
            leader_name: Option<String>,
            coordinator_name: Option<String>,
            secretary_name: Option<String>,
            troop_name: Option<String>,
            logo_url: Option<String>,
        }

        let helper = TroopSettingsHelper::deserialize(deserializer)?;
        let defaults = TroopSettings::default();

        Ok(TroopSettings {
            leader_name: helper.leader_name.unwrap_or(defaults.leader_name),
            coordinator_name: helper.coordinator_name.unwrap_or(defaults.coordinator_name),
            secretary_name: helper.secretary_name.unwrap_or(defaults.secretary_name),
            troop_name: helper.troop_name.unwrap_or(defaults.troop_name),
            logo_url: helper.logo_url,
        })
    }
}

/// Applikationstillstånd som inte hör till kårdata (sparas i settings.toml)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiSettings {
    #[serde(default)]
    pub dark_mode: bool,
    #[serde(default = "default_window_width")]
    pub window_width: f32,
    #[serde(default = "default_window_height")]
    pub window_height: f32,
}

fn default_window_width() -> f32 {
    1100.0
}

fn default_window_height() -> f32 {
    760.0
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            dark_mode: false,
            window_width: default_window_width(),
            window_height: default_window_height(),
        }
    }
}

impl UiSettings {
    pub fn load() -> Self {
        let config_path = get_ui_settings_path();

        if let Ok(content) = std::fs::read_to_string(&config_path) {
            if let Ok(settings) = toml::from_str(&content) {
                return settings;
            }
        }

        Self::default()
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = get_ui_settings_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = TroopSettings::default();
        assert_eq!(settings.leader_name, "Kårledare");
        assert_eq!(settings.troop_name, "Scoutkåren");
        assert!(settings.coordinator_name.is_empty());
        assert!(settings.logo_url.is_none());
    }

    #[test]
    fn test_partial_json_backfills_defaults() {
        // Lagring från före fälttillväxten ska fyllas på med standardvärden
        let settings: TroopSettings = serde_json::from_str(r#"{"troopName": "X"}"#).unwrap();
        assert_eq!(settings.troop_name, "X");
        assert_eq!(settings.leader_name, "Kårledare");
        assert_eq!(settings.coordinator_name, "");
        assert_eq!(settings.secretary_name, "");
        assert!(settings.logo_url.is_none());
    }

    #[test]
    fn test_null_logo_tolerated() {
        let settings: TroopSettings =
            serde_json::from_str(r#"{"troopName": "X", "logoUrl": null}"#).unwrap();
        assert!(settings.logo_url.is_none());
    }

    #[test]
    fn test_json_roundtrip() {
        let mut settings = TroopSettings::default();
        settings.troop_name = "Sjöscoutkåren Vågen".into();
        settings.logo_url = Some("data:image/png;base64,AAAA".into());

        let json = serde_json::to_string(&settings).unwrap();
        let loaded: TroopSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_ui_settings_toml_backwards_compat() {
        // Gammal TOML utan fönsterstorlek — ska ge defaults
        let loaded: UiSettings = toml::from_str("dark_mode = true").unwrap();
        assert!(loaded.dark_mode);
        assert_eq!(loaded.window_width, default_window_width());
    }
}
