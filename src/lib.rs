//! Gravflip - a gravity-flip endless runner simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (generation, physics, collisions, pursuit AI)
//! - `render`: Sprite snapshot handed to the external renderer each frame
//! - `audio`: Sound trigger mapping for the external audio collaborator
//! - `stats`: End-of-run statistics and best-effort score submission
//! - `settings`: Run configuration passed into a session at start

pub mod audio;
pub mod render;
pub mod settings;
pub mod sim;
pub mod stats;

pub use settings::RunConfig;

/// Game tuning constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Playfield viewport in world units
    pub const VIEWPORT_WIDTH: f32 = 1280.0;
    pub const VIEWPORT_HEIGHT: f32 = 720.0;

    /// Side length of one platform block
    pub const BLOCK_SIZE: f32 = 36.0;
    /// Horizontal extent generated atomically by the segment generator
    pub const SEGMENT_WIDTH: f32 = 800.0;
    /// Segments kept generated ahead of the camera
    pub const BUFFER_SEGMENTS: u32 = 2;
    /// Columns forced clear at the head of every generated pattern
    pub const CLEAR_LEAD_COLUMNS: usize = 6;
    /// Tunnel half-height bounds (blocks)
    pub const TUNNEL_HALF_MIN: i32 = 4;
    pub const TUNNEL_HALF_MAX: i32 = 6;

    /// Gravity magnitude (world units/s²); sign flips on command
    pub const GRAVITY: f32 = 3000.0;
    /// Base horizontal run speed
    pub const RUN_SPEED: f32 = 650.0;
    /// Speed gained per ramp distance travelled
    pub const SPEED_INCREMENT: f32 = 50.0;
    pub const SPEED_RAMP_DISTANCE: f32 = 1000.0;
    /// Per-tick vertical damping while airborne
    pub const AIR_RESISTANCE: f32 = 0.98;
    /// Horizontal input multiplier while airborne
    pub const AIR_CONTROL: f32 = 0.8;

    /// Momentum kept through a gravity flip
    pub const FLIP_IMPACT_FAST: f32 = 0.8;
    pub const FLIP_IMPACT_SLOW: f32 = 0.5;
    /// Vertical speed above which the fast impact factor applies
    pub const FLIP_IMPACT_THRESHOLD: f32 = 400.0;

    /// Player collision box
    pub const PLAYER_WIDTH: f32 = 32.0;
    pub const PLAYER_HEIGHT: f32 = 48.0;
    /// Player spawn position (standing on the start platform)
    pub const PLAYER_SPAWN_X: f32 = 100.0;
    /// Player out-of-bounds margin beyond the playfield
    pub const BOUNDS_MARGIN: f32 = 100.0;

    /// Stomp contact window as a fraction of player height
    pub const STOMP_WINDOW: f32 = 0.2;
    /// Upward bounce velocity granted by a stomp
    pub const STOMP_BOUNCE: f32 = 400.0;
    pub const STOMP_SCORE: u64 = 5;
    pub const COLLECT_SCORE: u64 = 2;
    /// Progress units per score point
    pub const SCORE_DISTANCE: f32 = 100.0;

    /// Pursuer collision box (square)
    pub const PURSUER_SIZE: f32 = 40.0;
    /// Pursuer spawn offset behind the player
    pub const PURSUER_SPAWN_BEHIND: f32 = 300.0;
    /// Chase speed as a fraction of the player's current speed
    pub const CHASE_FACTOR: f32 = 0.85;
    /// Distance beyond which catch-up scaling kicks in
    pub const CATCHUP_DISTANCE: f32 = 450.0;
    pub const CATCHUP_MAX: f32 = 3.0;
    /// Distance beyond which the pursuer teleports behind the player
    pub const TELEPORT_DISTANCE: f32 = 700.0;
    pub const TELEPORT_OFFSET: f32 = 250.0;
    /// Velocity multiplier when stalled against terrain
    pub const AVOIDANCE_FACTOR: f32 = 2.5;
    /// Distance under which chase speed backs off
    pub const MIN_CHASE_DISTANCE: f32 = 120.0;
    pub const CLOSE_CHASE_FACTOR: f32 = 0.4;

    /// Collectible collision box (square)
    pub const COLLECTIBLE_SIZE: f32 = 24.0;
    /// Collectible chance per 4-column tunnel group
    pub const COLLECTIBLE_CHANCE: f64 = 0.08;

    /// Camera smoothing per tick toward the follow target
    pub const CAMERA_LERP: f32 = 0.3;
    /// Horizontal offset of the follow target from the left camera edge
    pub const CAMERA_OFFSET: f32 = VIEWPORT_WIDTH * 0.5;
}
