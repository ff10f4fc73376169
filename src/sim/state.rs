//! World state and core simulation types
//!
//! Everything the frame loop mutates lives here. One `World` per run,
//! rebuilt from scratch at run start.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::collision::{Aabb, Contacts};
use crate::consts::*;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    /// Physics, generation and AI execute
    Running,
    /// Terminal condition hit; ending sequence has fired
    Ending,
}

/// Why the run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    /// Non-stomp contact with the pursuer
    Damage,
    /// Player left the playfield vertically
    OutOfBounds,
    /// Score hit the floor
    ScoreFloor,
}

/// Simulation events drained by the embedding loop each frame and fed to
/// the render/audio/stats collaborators.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    GravityFlipped { flipped: bool },
    Stomped { pursuer_id: u32 },
    Collected { id: u32 },
    SegmentGenerated { start_x: f32 },
    PursuerSpawned { id: u32 },
    RunEnded { reason: EndReason },
}

/// The player avatar
#[derive(Debug, Clone)]
pub struct Player {
    /// Center position
    pub pos: Vec2,
    pub vel: Vec2,
    /// Which playfield boundary currently acts as "down"
    pub gravity_flipped: bool,
    /// Current run speed (ramps with distance)
    pub speed: f32,
    pub invulnerable: bool,
    /// Frame of the last gravity flip
    pub last_flip_frame: u64,
    /// Vertical velocity recorded at the last flip
    pub flip_vertical_velocity: f32,
    /// Surface contacts from the last physics resolve
    pub touching: Contacts,
}

impl Player {
    pub fn spawn() -> Self {
        // Standing on the start platform (top edge three blocks up from
        // the playfield bottom).
        let floor_y = VIEWPORT_HEIGHT - 3.0 * BLOCK_SIZE;
        Self {
            pos: Vec2::new(PLAYER_SPAWN_X, floor_y - PLAYER_HEIGHT / 2.0),
            vel: Vec2::ZERO,
            gravity_flipped: false,
            speed: RUN_SPEED,
            invulnerable: false,
            last_flip_frame: 0,
            flip_vertical_velocity: 0.0,
            touching: Contacts::default(),
        }
    }

    pub fn half_extents() -> Vec2 {
        Vec2::new(PLAYER_WIDTH / 2.0, PLAYER_HEIGHT / 2.0)
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::from_center(self.pos, Self::half_extents())
    }

    /// Touching whichever surface currently acts as floor or ceiling
    pub fn grounded(&self) -> bool {
        self.touching.down || self.touching.up
    }

    /// The signed world gravity scalar
    pub fn gravity(&self) -> f32 {
        if self.gravity_flipped { -GRAVITY } else { GRAVITY }
    }
}

/// One immovable terrain block. Platforms never move and ignore gravity,
/// so they carry no velocity at all.
#[derive(Debug, Clone)]
pub struct Platform {
    pub id: u32,
    /// Center position
    pub pos: Vec2,
}

impl Platform {
    pub fn aabb(&self) -> Aabb {
        Aabb::from_center(self.pos, Vec2::splat(BLOCK_SIZE / 2.0))
    }
}

/// A pickup placed sparsely along the tunnel centerline
#[derive(Debug, Clone)]
pub struct Collectible {
    pub id: u32,
    pub pos: Vec2,
    pub collected: bool,
}

impl Collectible {
    pub fn aabb(&self) -> Aabb {
        Aabb::from_center(self.pos, Vec2::splat(COLLECTIBLE_SIZE / 2.0))
    }
}

/// The single AI-controlled chaser
#[derive(Debug, Clone)]
pub struct Pursuer {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub active: bool,
    /// Terrain contacts from the last physics resolve (drives avoidance)
    pub blocked: Contacts,
}

impl Pursuer {
    pub fn aabb(&self) -> Aabb {
        Aabb::from_center(self.pos, Vec2::splat(PURSUER_SIZE / 2.0))
    }
}

/// Generation frontier bookkeeping
#[derive(Debug, Clone)]
pub struct SegmentState {
    /// Rightmost world-x already generated; only ever increases
    pub last_generated_x: f32,
    pub segment_width: f32,
    pub buffer_segments: u32,
}

impl SegmentState {
    pub fn new() -> Self {
        Self {
            last_generated_x: 0.0,
            segment_width: SEGMENT_WIDTH,
            buffer_segments: BUFFER_SEGMENTS,
        }
    }

    /// True once the generated frontier is within the buffer of the camera
    pub fn needs_generation(&self, camera_x: f32) -> bool {
        self.last_generated_x - camera_x < self.segment_width * self.buffer_segments as f32
    }

    /// Advance the frontier. Negative progress is a programming defect;
    /// clamped away in release.
    pub fn advance(&mut self, width: f32) {
        debug_assert!(width > 0.0, "segment progress must be positive");
        if width <= 0.0 {
            log::error!("ignoring non-positive segment advance ({width})");
            return;
        }
        self.last_generated_x += width;
    }
}

impl Default for SegmentState {
    fn default() -> Self {
        Self::new()
    }
}

/// Aggregated statistics for one run
#[derive(Debug, Clone, Default)]
pub struct RunStats {
    /// Simulation ticks elapsed
    pub ticks: u64,
    /// Collectibles picked up
    pub collectibles: u32,
    /// Monotonic max of player x
    pub max_distance: f32,
    /// Score at the moment the run ended
    pub final_score: u64,
}

impl RunStats {
    /// Wall-clock play time implied by the fixed timestep
    pub fn game_time_secs(&self) -> u64 {
        (self.ticks as f32 * SIM_DT) as u64
    }
}

/// Complete simulation state, owned and mutated solely by the frame loop
#[derive(Debug, Clone)]
pub struct World {
    /// Run seed for reproducibility
    pub seed: u64,
    /// The one injected PRNG, threaded through the generator
    pub rng: Pcg32,
    /// Simulation tick counter
    pub frame: u64,
    pub phase: RunPhase,
    /// Left edge of the camera viewport
    pub camera_x: f32,
    pub score: u64,
    pub player: Player,
    /// Live entities (sorted by id for deterministic iteration)
    pub platforms: Vec<Platform>,
    pub collectibles: Vec<Collectible>,
    pub pursuers: Vec<Pursuer>,
    pub segment: SegmentState,
    pub stats: RunStats,
    /// Events emitted this frame, drained by the embedder
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl World {
    /// Create a fresh run: start zone, initial segment buffer, one pursuer.
    pub fn new(seed: u64) -> Self {
        let mut world = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            frame: 0,
            phase: RunPhase::Running,
            camera_x: 0.0,
            score: 0,
            player: Player::spawn(),
            platforms: Vec::new(),
            collectibles: Vec::new(),
            pursuers: Vec::new(),
            segment: SegmentState::new(),
            stats: RunStats::default(),
            events: Vec::new(),
            next_id: 1,
        };

        super::terrain::spawn_start_zone(&mut world);
        for _ in 0..BUFFER_SEGMENTS {
            super::terrain::spawn_segment(&mut world);
        }
        super::pursuit::spawn_pursuer(&mut world);

        log::info!("run started (seed {seed})");
        world
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn is_running(&self) -> bool {
        self.phase == RunPhase::Running
    }

    pub fn active_pursuer_count(&self) -> usize {
        self.pursuers.iter().filter(|p| p.active).count()
    }

    /// Enter `Ending` and finalize stats. Idempotent: the ending sequence
    /// fires exactly once no matter how many terminal conditions hit in
    /// the same frame.
    pub fn end_run(&mut self, reason: EndReason) {
        if self.phase == RunPhase::Ending {
            return;
        }
        self.phase = RunPhase::Ending;
        self.stats.final_score = self.score;
        self.events.push(GameEvent::RunEnded { reason });
        log::info!(
            "run ended ({reason:?}): score {} distance {:.0} collectibles {} time {}s",
            self.score,
            self.stats.max_distance,
            self.stats.collectibles,
            self.stats.game_time_secs(),
        );
    }

    /// Hand this frame's events to the embedder
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Ensure entity vectors are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.platforms.sort_by_key(|p| p.id);
        self.collectibles.sort_by_key(|c| c.id);
        self.pursuers.sort_by_key(|p| p.id);
    }
}
