//! Run configuration and player preferences
//!
//! Persisted to LocalStorage in the browser; native builds fall back to
//! defaults.

use serde::{Deserialize, Serialize};

/// Configuration for a run: audio levels, identity and the stats backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Mute everything
    pub muted: bool,

    /// Playing without an account
    pub guest_mode: bool,
    /// Stable anonymous identity attached to guest submissions
    pub guest_id: Option<String>,

    /// Base URL of the stats backend
    pub api_url: String,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            music_volume: 0.5,
            sfx_volume: 0.5,
            muted: false,
            guest_mode: true,
            guest_id: None,
            api_url: "http://localhost:3000".to_string(),
        }
    }
}

impl RunConfig {
    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "gravflip_config";

    /// Endpoint scores are POSTed to
    pub fn scores_url(&self) -> String {
        format!("{}/api/scores", self.api_url)
    }

    /// Guest identity to attach to a submission, if any
    pub fn submission_guest_id(&self) -> Option<String> {
        if self.guest_mode {
            self.guest_id.clone()
        } else {
            None
        }
    }

    /// Load config from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(config) = serde_json::from_str(&json) {
                    log::info!("Loaded config from LocalStorage");
                    return config;
                }
            }
        }

        log::info!("Using default config");
        Self::default()
    }

    /// Save config to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Config saved");
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
    fn guest_id_only_attaches_in_guest_mode() {
        let mut config = RunConfig {
            guest_id: Some("4417263908".to_string()),
            ..Default::default()
        };
        assert_eq!(
            config.submission_guest_id().as_deref(),
            Some("4417263908")
        );
        config.guest_mode = false;
        assert_eq!(config.submission_guest_id(), None);
    }

    #[test]
    fn scores_url_joins_the_api_base() {
        let config = RunConfig::default();
        assert_eq!(config.scores_url(), "http://localhost:3000/api/scores");
    }
}
