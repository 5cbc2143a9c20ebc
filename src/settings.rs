//! Driver settings and preferences
//!
//! Gameplay constants are fixed at build time (see `consts`); these settings
//! only cover the drivers and the commentary service. In the browser they
//! are loaded from LocalStorage and saved back when a HUD toggle changes;
//! natively they come from the environment and are never written.

use serde::{Deserialize, Serialize};

use crate::commentary::CommentaryConfig;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Commentary service
    pub commentary: CommentaryConfig,

    /// Fixed RNG seed (random per launch when unset)
    pub seed: Option<u64>,

    // === HUD ===
    /// Show FPS counter (F key)
    pub show_fps: bool,
    /// Start in idle/demo mode with the autopilot playing (I key)
    pub idle_mode: bool,

    // === Headless driver ===
    /// Autopilot runs to play before exiting
    pub demo_runs: u32,
    /// Tick cap per run, in case the autopilot never crashes
    pub max_ticks_per_run: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            commentary: CommentaryConfig::default(),
            seed: None,
            show_fps: true,
            idle_mode: false,
            demo_runs: 3,
            // Two minutes of play at 60 Hz
            max_ticks_per_run: 120 * 60,
        }
    }
}

impl Settings {
    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "gemini_flappy_settings";

    /// Parse settings JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Build-time API key (`GEMINI_API_KEY` when the crate was compiled)
    fn baked_api_key() -> Option<String> {
        option_env!("GEMINI_API_KEY").map(str::to_string)
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        let mut settings = storage
            .and_then(|s| s.get_item(Self::STORAGE_KEY).ok().flatten())
            .and_then(|json| match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from LocalStorage");
                    Some(settings)
                }
                Err(e) => {
                    log::warn!("Ignoring stored settings: {}", e);
                    None
                }
            })
            .unwrap_or_else(|| {
                log::info!("Using default settings");
                Self::default()
            });

        if settings.commentary.api_key.is_none() {
            settings.commentary.api_key = Self::baked_api_key();
        }
        settings
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Load settings natively
    ///
    /// `FLAPPY_SETTINGS` may point at a JSON file; `GEMINI_API_KEY` and
    /// `FLAPPY_SEED` override what it contains.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        let mut settings = match std::env::var("FLAPPY_SETTINGS") {
            Ok(path) => match std::fs::read_to_string(&path) {
                Ok(json) => Self::from_json(&json).unwrap_or_else(|e| {
                    log::warn!("Ignoring settings file {}: {}", path, e);
                    Self::default()
                }),
                Err(e) => {
                    log::warn!("Cannot read settings file {}: {}", path, e);
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        };

        settings.apply_env(|name| std::env::var(name).ok());
        settings
    }

    /// Apply environment overrides through a lookup function
    #[cfg(not(target_arch = "wasm32"))]
    fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(key) = var("GEMINI_API_KEY").or_else(Self::baked_api_key) {
            self.commentary.api_key = Some(key);
        }
        if let Some(seed) = var("FLAPPY_SEED") {
            match seed.parse() {
                Ok(seed) => self.seed = Some(seed),
                Err(_) => log::warn!("FLAPPY_SEED is not a number: {}", seed),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings =
            Settings::from_json(r#"{ "seed": 42, "commentary": { "language": "Vietnamese" } }"#)
                .unwrap();
        assert_eq!(settings.seed, Some(42));
        assert_eq!(settings.commentary.language, "Vietnamese");
        assert_eq!(settings.commentary.max_words, 15);
        assert!(settings.show_fps);
        assert!(!settings.idle_mode);
        assert_eq!(settings.demo_runs, 3);
    }

    #[test]
    fn test_hud_toggles_survive_storage() {
        let mut settings = Settings::default();
        settings.show_fps = false;
        settings.idle_mode = true;

        let stored = serde_json::to_string(&settings).unwrap();
        let loaded = Settings::from_json(&stored).unwrap();
        assert!(!loaded.show_fps);
        assert!(loaded.idle_mode);
    }

    #[test]
    fn test_api_key_not_serialized() {
        let mut settings = Settings::default();
        settings.commentary.api_key = Some("secret".into());
        let json = serde_json::to_string(&settings).unwrap();
        assert!(!json.contains("secret"));
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_env_overrides() {
        let mut settings = Settings::default();
        settings.apply_env(|name| match name {
            "GEMINI_API_KEY" => Some("k".to_string()),
            "FLAPPY_SEED" => Some("7".to_string()),
            _ => None,
        });
        assert_eq!(settings.commentary.api_key.as_deref(), Some("k"));
        assert_eq!(settings.seed, Some(7));

        // Bad seed leaves the previous value alone
        settings.apply_env(|name| (name == "FLAPPY_SEED").then(|| "abc".to_string()));
        assert_eq!(settings.seed, Some(7));
    }
}
