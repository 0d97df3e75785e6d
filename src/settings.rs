//! Game settings and preferences
//!
//! Persisted separately from the record in LocalStorage. Gameplay constants
//! are not configurable here; these only pick cosmetic strategies and debug aids.

use serde::{Deserialize, Serialize};

/// Decoration style drawn behind the platforms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DecorationTheme {
    #[default]
    Servers,
    Trees,
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Wider perfect zone and shorter gaps
    pub debug_mode: bool,
    pub theme: DecorationTheme,
    /// Spawn collected/missed gem animations
    pub gem_feedback: bool,
    /// Animate the hero blinking
    pub blink: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug_mode: false,
            theme: DecorationTheme::Servers,
            gem_feedback: true,
            blink: true,
        }
    }
}

impl Settings {
    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "deploy_dash_settings";

    pub fn to_json(&self) -> Option<String> {
        serde_json::to_string(self).ok()
    }

    /// Parse stored settings; missing fields fall back to defaults
    pub fn from_json(json: &str) -> Option<Self> {
        serde_json::from_str(json).ok()
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Some(settings) = Self::from_json(&json) {
                    log::info!("Loaded settings from LocalStorage");
                    return settings;
                }
                log::warn!("Stored settings unreadable, using defaults");
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let (Some(storage), Some(json)) = (storage, self.to_json()) {
            if storage.set_item(Self::STORAGE_KEY, &json).is_err() {
                log::warn!("Failed to save settings");
            } else {
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_round_trip_and_defaults() {
        let settings = Settings {
            debug_mode: true,
            theme: DecorationTheme::Trees,
            ..Default::default()
        };
        let json = settings.to_json().unwrap();
        assert_eq!(Settings::from_json(&json), Some(settings));

        let partial = Settings::from_json(r#"{"debug_mode":true}"#).unwrap();
        assert!(partial.debug_mode);
        assert!(partial.gem_feedback);
        assert_eq!(partial.theme, DecorationTheme::Servers);

        assert_eq!(Settings::from_json("not json"), None);
    }
}
