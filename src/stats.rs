//! End-of-run statistics: backend submission and local bests
//!
//! Submission is fire-and-forget. The simulation never waits on the
//! network; a lost or failed POST costs nothing but a leaderboard entry.
//! Local bests are kept in LocalStorage as a fallback leaderboard.

use serde::{Deserialize, Serialize};

use crate::settings::RunConfig;
use crate::sim::RunStats;

/// Maximum number of local best entries to keep
pub const MAX_LOCAL_BESTS: usize = 10;

/// Payload POSTed to the stats backend when a run ends
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreSubmission {
    pub score: u64,
    /// Play time in whole seconds
    pub game_time: u64,
    pub collectibles: u32,
    /// Horizontal distance covered, in world units
    pub distance: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guest_id: Option<String>,
}

impl ScoreSubmission {
    pub fn from_run(stats: &RunStats, config: &RunConfig) -> Self {
        Self {
            score: stats.final_score,
            game_time: stats.game_time_secs(),
            collectibles: stats.collectibles,
            distance: stats.max_distance.max(0.0) as u64,
            guest_id: config.submission_guest_id(),
        }
    }
}

/// Backend acknowledgement
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreResponse {
    pub id: u64,
    pub rank: u32,
    pub is_high_score: bool,
}

/// Submit a finished run to the backend. Returns immediately; the
/// request runs detached and failures are logged and dropped.
pub fn submit_run(stats: &RunStats, config: &RunConfig) {
    let payload = ScoreSubmission::from_run(stats, config);
    log::info!(
        "submitting run: score {} time {}s distance {}",
        payload.score,
        payload.game_time,
        payload.distance
    );
    dispatch(payload, config.scores_url());
}

#[cfg(target_arch = "wasm32")]
fn dispatch(payload: ScoreSubmission, url: String) {
    use wasm_bindgen::{JsCast, JsValue};
    use wasm_bindgen_futures::{spawn_local, JsFuture};

    let body = match serde_json::to_string(&payload) {
        Ok(body) => body,
        Err(e) => {
            log::warn!("could not encode score submission: {e}");
            return;
        }
    };

    spawn_local(async move {
        let init = web_sys::RequestInit::new();
        init.set_method("POST");
        init.set_mode(web_sys::RequestMode::Cors);
        init.set_body(&JsValue::from_str(&body));

        let request = match web_sys::Request::new_with_str_and_init(&url, &init) {
            Ok(request) => request,
            Err(e) => {
                log::warn!("could not build score request: {e:?}");
                return;
            }
        };
        let _ = request.headers().set("Content-Type", "application/json");

        let Some(window) = web_sys::window() else {
            return;
        };
        let response = match JsFuture::from(window.fetch_with_request(&request)).await {
            Ok(value) => value,
            Err(e) => {
                log::warn!("score submission failed: {e:?}");
                return;
            }
        };
        let Ok(response) = response.dyn_into::<web_sys::Response>() else {
            return;
        };
        if !response.ok() {
            log::warn!("score submission rejected: HTTP {}", response.status());
            return;
        }

        let Ok(text_promise) = response.text() else {
            return;
        };
        if let Ok(text) = JsFuture::from(text_promise).await {
            if let Some(text) = text.as_string() {
                match serde_json::from_str::<ScoreResponse>(&text) {
                    Ok(ack) if ack.is_high_score => {
                        log::info!("new high score, rank {}", ack.rank);
                    }
                    Ok(ack) => log::debug!("run recorded at rank {}", ack.rank),
                    Err(e) => log::warn!("unreadable score response: {e}"),
                }
            }
        }
    });
}

/// Native builds have no backend to talk to.
#[cfg(not(target_arch = "wasm32"))]
fn dispatch(payload: ScoreSubmission, url: String) {
    log::debug!("score submission skipped (native): {payload:?} -> {url}");
}

/// One local best entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BestEntry {
    pub score: u64,
    /// Distance covered in world units
    pub distance: u64,
    /// Unix timestamp (ms) when achieved
    pub timestamp: f64,
}

/// Local leaderboard, top scores first
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LocalBests {
    pub entries: Vec<BestEntry>,
}

impl LocalBests {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "gravflip_bests";

    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a score makes the board
    pub fn qualifies(&self, score: u64) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_LOCAL_BESTS {
            return true;
        }
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Record a run. Returns the 1-indexed rank achieved, or None if it
    /// didn't qualify.
    pub fn add(&mut self, score: u64, distance: u64, timestamp: f64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }

        let entry = BestEntry {
            score,
            distance,
            timestamp,
        };
        let pos = self.entries.iter().position(|e| score > e.score);
        let rank = match pos {
            Some(i) => {
                self.entries.insert(i, entry);
                i + 1
            }
            None => {
                self.entries.push(entry);
                self.entries.len()
            }
        };
        self.entries.truncate(MAX_LOCAL_BESTS);
        Some(rank)
    }

    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// Load local bests from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(bests) = serde_json::from_str::<LocalBests>(&json) {
                    log::info!("Loaded {} local bests", bests.entries.len());
                    return bests;
                }
            }
        }

        log::info!("No local bests found, starting fresh");
        Self::new()
    }

    /// Save local bests to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Local bests saved ({} entries)", self.entries.len());
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::new()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_stats() -> RunStats {
        RunStats {
            ticks: 120 * 95,
            collectibles: 7,
            max_distance: 4321.6,
            final_score: 43,
        }
    }

    #[test]
    fn submission_uses_the_wire_field_names() {
        let config = RunConfig {
            guest_id: Some("1234567890".to_string()),
            ..Default::default()
        };
        let payload = ScoreSubmission::from_run(&run_stats(), &config);
        let value = serde_json::to_value(&payload).unwrap();

        assert_eq!(value["score"], 43);
        assert_eq!(value["gameTime"], 95);
        assert_eq!(value["collectibles"], 7);
        assert_eq!(value["distance"], 4321);
        assert_eq!(value["guestId"], "1234567890");
    }

    #[test]
    fn anonymous_submission_omits_guest_id() {
        let config = RunConfig {
            guest_mode: false,
            ..Default::default()
        };
        let payload = ScoreSubmission::from_run(&run_stats(), &config);
        let value = serde_json::to_value(&payload).unwrap();
        assert!(value.get("guestId").is_none());
    }

    #[test]
    fn response_parses_backend_json() {
        let ack: ScoreResponse =
            serde_json::from_str(r#"{"id":88,"rank":3,"isHighScore":true}"#).unwrap();
        assert_eq!(ack.id, 88);
        assert_eq!(ack.rank, 3);
        assert!(ack.is_high_score);
    }

    #[test]
    fn bests_insert_in_rank_order_and_truncate() {
        let mut bests = LocalBests::new();
        for score in [50, 30, 70] {
            bests.add(score, score * 100, 0.0);
        }
        assert_eq!(bests.top_score(), Some(70));
        assert_eq!(bests.add(60, 6000, 0.0), Some(2));

        for score in 100..120 {
            bests.add(score, 0, 0.0);
        }
        assert_eq!(bests.entries.len(), MAX_LOCAL_BESTS);
        assert!(!bests.qualifies(1));
        assert!(bests.qualifies(500));
    }

    #[test]
    fn zero_score_never_qualifies() {
        let bests = LocalBests::new();
        assert!(!bests.qualifies(0));
    }
}
