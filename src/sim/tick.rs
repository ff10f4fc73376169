//! Fixed-timestep frame orchestration
//!
//! Stage order is load-bearing: session scoring, generation, physics,
//! camera, lifecycle cull, contact resolution, then AI. Later stages see
//! the earlier stages' writes within the same frame.

use super::collision::{self, PursuerContact};
use super::state::{EndReason, GameEvent, RunPhase, World};
use super::{physics, pursuit, terrain};
use crate::consts::*;

/// Player commands sampled for one tick. `flip` is a one-shot: the
/// embedder sets it on the frame the flip was pressed and clears it after.
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    pub flip: bool,
}

/// Advance the simulation by one fixed step. A no-op once the run has
/// ended; terminal conditions hitting mid-frame let the remaining stages
/// finish and rely on idempotent ending.
pub fn tick(world: &mut World, input: &TickInput, dt: f32) {
    if world.phase != RunPhase::Running {
        return;
    }
    world.frame += 1;
    world.stats.ticks = world.frame;

    // Scoring reads the position the player starts the frame at, before
    // any of this frame's movement integrates.
    observe_session(world);

    // Generation trigger: at most one segment per frame keeps the cost
    // bounded; the buffer absorbs the remaining deficit next frame.
    if world.segment.needs_generation(world.camera_x) {
        terrain::spawn_segment(world);
    }

    physics::update_player(world, input, dt);
    update_camera(world);
    if physics::out_of_bounds(&world.player) {
        world.end_run(EndReason::OutOfBounds);
    }

    // Lifecycle cull: one viewport behind the camera, every entity kind,
    // every frame.
    let cull_x = world.camera_x - VIEWPORT_WIDTH;
    world.platforms.retain(|p| p.pos.x >= cull_x);
    world.collectibles.retain(|c| c.pos.x >= cull_x);
    world.pursuers.retain(|p| p.active && p.pos.x >= cull_x);

    resolve_pursuer_contacts(world);
    resolve_collectibles(world);

    pursuit::update_pursuit(world, dt);

    world.normalize_order();
    debug_assert_eq!(world.active_pursuer_count(), 1);
}

fn update_camera(world: &mut World) {
    let target = (world.player.pos.x - CAMERA_OFFSET).max(0.0);
    world.camera_x += (target - world.camera_x) * CAMERA_LERP;
}

/// Resolve this frame's player/pursuer overlap, if any. A stomp destroys
/// the pursuer and bounces the player; anything else ends the run.
fn resolve_pursuer_contacts(world: &mut World) {
    if world.player.invulnerable {
        return;
    }
    let mut stomped = None;
    let mut damaged = false;
    for pursuer in world.pursuers.iter().filter(|p| p.active) {
        match collision::classify_pursuer_contact(&world.player, pursuer) {
            Some(PursuerContact::Stomp) => {
                stomped = Some(pursuer.id);
                break;
            }
            Some(PursuerContact::Damage) => {
                damaged = true;
                break;
            }
            None => {}
        }
    }

    if let Some(id) = stomped {
        if let Some(pursuer) = world.pursuers.iter_mut().find(|p| p.id == id) {
            pursuer.active = false;
        }
        // Bounce is always screen-up so a stomp reads the same in both
        // gravity orientations.
        world.player.vel.y = -STOMP_BOUNCE;
        world.score += STOMP_SCORE;
        world.events.push(GameEvent::Stomped { pursuer_id: id });
        log::debug!("pursuer {id} stomped");
    } else if damaged {
        world.end_run(EndReason::Damage);
    }
}

fn resolve_collectibles(world: &mut World) {
    let body = world.player.aabb();
    let mut picked = Vec::new();
    for collectible in &mut world.collectibles {
        if !collectible.collected && body.overlaps(&collectible.aabb()) {
            collectible.collected = true;
            picked.push(collectible.id);
        }
    }
    for id in picked {
        world.score += COLLECT_SCORE;
        world.stats.collectibles += 1;
        world.events.push(GameEvent::Collected { id });
    }
    world.collectibles.retain(|c| !c.collected);
}

/// Score bookkeeping at frame start. Distance score overwrites the total
/// whenever it pulls ahead, which deliberately absorbs bonus points once
/// enough ground is covered. Running from the frame-start position keeps
/// the score floor out of reach: the spawn x alone already clears it.
fn observe_session(world: &mut World) {
    let progress = (world.player.pos.x / SCORE_DISTANCE).floor().max(0.0) as u64;
    if progress > world.score {
        world.score = progress;
    }
    if world.player.pos.x > world.stats.max_distance {
        world.stats.max_distance = world.player.pos.x;
    }
    if world.score == 0 {
        world.end_run(EndReason::ScoreFloor);
    }
}
