//! Pursuer AI
//!
//! Exactly one pursuer chases the player at all times. Base chase speed
//! trails the player slightly; falling far behind scales it up, and past
//! the teleport range the pursuer snaps to a fixed offset behind the
//! player so it can never be outrun for good.

use glam::Vec2;

use super::collision;
use super::state::{GameEvent, Pursuer, World};
use crate::consts::*;

/// Spawn a fresh pursuer a fixed distance behind the player.
pub fn spawn_pursuer(world: &mut World) {
    let id = world.next_entity_id();
    let pos = world.player.pos - Vec2::new(PURSUER_SPAWN_BEHIND, 0.0);
    world.pursuers.push(Pursuer {
        id,
        pos,
        vel: Vec2::ZERO,
        active: true,
        blocked: collision::Contacts::default(),
    });
    world.events.push(GameEvent::PursuerSpawned { id });
    log::debug!("pursuer {id} spawned at {pos:?}");
}

/// One AI step: restore the single-pursuer invariant, steer toward the
/// player, then integrate against terrain.
pub fn update_pursuit(world: &mut World, dt: f32) {
    world.pursuers.retain(|p| p.active);
    if world.pursuers.len() > 1 {
        log::error!(
            "{} active pursuers, destroying extras",
            world.pursuers.len()
        );
        world.pursuers.truncate(1);
    }
    if world.pursuers.is_empty() {
        spawn_pursuer(world);
    }

    let player_pos = world.player.pos;
    let player_speed = world.player.speed;
    let pursuer = &mut world.pursuers[0];

    let offset = player_pos - pursuer.pos;
    let distance = offset.length();
    let direction = offset.normalize_or_zero();

    let mut speed = player_speed * CHASE_FACTOR;
    if distance > CATCHUP_DISTANCE {
        speed *= (distance / CATCHUP_DISTANCE).min(CATCHUP_MAX);
        if distance > TELEPORT_DISTANCE {
            // Snap behind the player; the stale chase direction still
            // drives this frame's velocity.
            pursuer.pos = Vec2::new(player_pos.x - TELEPORT_OFFSET, player_pos.y);
            log::debug!("pursuer teleported to {:?}", pursuer.pos);
        }
    }

    if pursuer.blocked.any() {
        // Steer around terrain by biasing toward the unblocked axis.
        let avoid = speed * AVOIDANCE_FACTOR;
        pursuer.vel = if pursuer.blocked.horizontal() {
            Vec2::new(direction.x * avoid * 0.5, direction.y * avoid * 1.5)
        } else {
            Vec2::new(direction.x * avoid * 1.5, direction.y * avoid * 0.5)
        };
    } else {
        pursuer.vel = direction * speed;
    }

    if distance < MIN_CHASE_DISTANCE {
        // Ease off up close so contact comes from player error, not a ram.
        pursuer.vel = direction * speed * CLOSE_CHASE_FACTOR;
    }

    let half = Vec2::splat(PURSUER_SIZE / 2.0);
    pursuer.blocked = collision::move_and_collide(
        &mut pursuer.pos,
        &mut pursuer.vel,
        half,
        &world.platforms,
        dt,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;

    fn open_world() -> World {
        let mut world = World::new(1);
        world.platforms.clear();
        world
    }

    #[test]
    fn spawn_places_pursuer_behind_player() {
        let world = World::new(9);
        let pursuer = &world.pursuers[0];
        assert_eq!(
            pursuer.pos,
            world.player.pos - Vec2::new(PURSUER_SPAWN_BEHIND, 0.0)
        );
        assert!(pursuer.active);
    }

    #[test]
    fn destroyed_pursuer_is_replaced_same_frame() {
        let mut world = open_world();
        world.pursuers[0].active = false;
        update_pursuit(&mut world, SIM_DT);
        assert_eq!(world.active_pursuer_count(), 1);
    }

    #[test]
    fn extra_pursuers_are_culled_to_one() {
        let mut world = open_world();
        for _ in 0..3 {
            spawn_pursuer(&mut world);
        }
        assert_eq!(world.pursuers.len(), 4);
        update_pursuit(&mut world, SIM_DT);
        assert_eq!(world.pursuers.len(), 1);
    }

    #[test]
    fn far_pursuer_teleports_to_fixed_offset() {
        let mut world = open_world();
        world.pursuers[0].pos = world.player.pos - Vec2::new(1000.0, 0.0);
        update_pursuit(&mut world, SIM_DT);
        let pursuer = &world.pursuers[0];
        // Teleport target plus one frame of chase velocity.
        let dx = world.player.pos.x - pursuer.pos.x;
        assert!(
            (dx - TELEPORT_OFFSET).abs() < world.player.speed * CATCHUP_MAX * SIM_DT,
            "pursuer ended {dx} behind"
        );
        assert!((pursuer.pos.y - world.player.pos.y).abs() < 50.0);
    }

    #[test]
    fn catchup_scales_speed_beyond_trigger_distance() {
        let mut world = open_world();
        world.pursuers[0].pos = world.player.pos - Vec2::new(600.0, 0.0);
        update_pursuit(&mut world, SIM_DT);
        let expected =
            world.player.speed * CHASE_FACTOR * (600.0 / CATCHUP_DISTANCE);
        assert!((world.pursuers[0].vel.length() - expected).abs() < 1.0);
    }

    #[test]
    fn close_pursuer_eases_off() {
        let mut world = open_world();
        world.pursuers[0].pos = world.player.pos - Vec2::new(60.0, 0.0);
        update_pursuit(&mut world, SIM_DT);
        let expected = world.player.speed * CHASE_FACTOR * CLOSE_CHASE_FACTOR;
        assert!((world.pursuers[0].vel.length() - expected).abs() < 1.0);
    }

    #[test]
    fn blocked_horizontal_pursuer_biases_vertical() {
        let mut world = open_world();
        world.pursuers[0].pos = world.player.pos - Vec2::new(200.0, 100.0);
        world.pursuers[0].blocked.right = true;
        update_pursuit(&mut world, SIM_DT);
        let vel = world.pursuers[0].vel;
        // Vertical component amplified relative to the plain chase vector.
        let direction = (world.player.pos
            - (world.player.pos - Vec2::new(200.0, 100.0)))
            .normalize();
        let plain = direction * world.player.speed * CHASE_FACTOR;
        assert!(vel.y.abs() > plain.y.abs());
        assert!(vel.x.abs() < plain.x.abs() * AVOIDANCE_FACTOR);
    }
}
