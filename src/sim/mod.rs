//! Deterministic gameplay simulation
//!
//! Pure state-in, state-out: no I/O, no wall clock, no platform calls.
//! All randomness flows through the world's seeded PRNG, so a seed plus
//! an input trace replays a run exactly. The embedding loop calls
//! [`tick::tick`] at the fixed timestep and drains [`state::GameEvent`]s
//! for rendering, audio and stats.

pub mod collision;
pub mod physics;
pub mod pursuit;
pub mod state;
pub mod terrain;
pub mod tick;

pub use collision::{Aabb, Contacts, PursuerContact};
pub use state::{
    Collectible, EndReason, GameEvent, Platform, Player, Pursuer, RunPhase, RunStats,
    SegmentState, World,
};
pub use tick::{tick, TickInput};
