//! Player movement, gravity flips and world bounds

use super::collision;
use super::state::{GameEvent, Player, World};
use crate::consts::*;
use crate::sim::tick::TickInput;

/// Invert gravity for the player. Vertical velocity is captured, then
/// reflected and damped by an impact factor keyed to how fast the player
/// was moving: fast flips keep more energy than slow ones.
pub fn flip_gravity(world: &mut World) {
    let player = &mut world.player;
    player.flip_vertical_velocity = player.vel.y;
    let factor = if player.flip_vertical_velocity.abs() > FLIP_IMPACT_THRESHOLD {
        FLIP_IMPACT_FAST
    } else {
        FLIP_IMPACT_SLOW
    };
    player.gravity_flipped = !player.gravity_flipped;
    player.vel.y = -player.flip_vertical_velocity * factor;
    player.last_flip_frame = world.frame;
    world.events.push(GameEvent::GravityFlipped {
        flipped: world.player.gravity_flipped,
    });
    log::debug!(
        "gravity flip at frame {}: captured vy {:.0}, factor {factor}",
        world.frame,
        world.player.flip_vertical_velocity
    );
}

/// One physics step for the player: flip command, speed ramp, drag,
/// steering, gravity, then terrain-resolved integration.
pub fn update_player(world: &mut World, input: &TickInput, dt: f32) {
    if input.flip {
        flip_gravity(world);
    }

    let player = &mut world.player;

    // Run speed ramps with distance covered, never back down.
    player.speed = run_speed_at(player.pos.x);

    // Vertical drag applies only while airborne; grounded frames pass
    // the captured flip energy through undamped.
    if !player.grounded() {
        player.vel.y *= AIR_RESISTANCE;
    }

    // Direct-set steering: no input means no horizontal drift.
    let control = if player.grounded() { 1.0 } else { AIR_CONTROL };
    player.vel.x = match (input.left, input.right) {
        (true, false) => -player.speed * control,
        (false, true) => player.speed * control,
        _ => 0.0,
    };

    player.vel.y += player.gravity() * dt;

    let half = Player::half_extents();
    world.player.touching = collision::move_and_collide(
        &mut world.player.pos,
        &mut world.player.vel,
        half,
        &world.platforms,
        dt,
    );
}

/// Speed the distance ramp dictates at a given world x
pub fn run_speed_at(x: f32) -> f32 {
    RUN_SPEED + (x / SPEED_RAMP_DISTANCE).floor().max(0.0) * SPEED_INCREMENT
}

/// True once the player has left the playfield vertically, in either
/// gravity orientation.
pub fn out_of_bounds(player: &Player) -> bool {
    player.pos.y > VIEWPORT_HEIGHT + BOUNDS_MARGIN || player.pos.y < -BOUNDS_MARGIN
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bare_world() -> World {
        let mut world = World::new(1);
        // Terrain-free so integration tests see pure ballistics.
        world.platforms.clear();
        world
    }

    #[test]
    fn slow_flip_reflects_velocity_at_half_strength() {
        let mut world = bare_world();
        world.player.vel.y = 200.0;
        flip_gravity(&mut world);
        assert!(world.player.gravity_flipped);
        assert_eq!(world.player.vel.y, -100.0);
        assert_eq!(world.player.flip_vertical_velocity, 200.0);
    }

    #[test]
    fn fast_flip_keeps_more_energy() {
        let mut world = bare_world();
        world.player.vel.y = 600.0;
        flip_gravity(&mut world);
        assert_eq!(world.player.vel.y, -480.0);
    }

    #[test]
    fn threshold_speed_counts_as_slow() {
        let mut world = bare_world();
        world.player.vel.y = FLIP_IMPACT_THRESHOLD;
        flip_gravity(&mut world);
        assert_eq!(world.player.vel.y, -FLIP_IMPACT_THRESHOLD * FLIP_IMPACT_SLOW);
    }

    #[test]
    fn flip_always_inverts_the_gravity_sign() {
        let mut world = bare_world();
        assert!(world.player.gravity() > 0.0);
        flip_gravity(&mut world);
        assert!(world.player.gravity() < 0.0);
        flip_gravity(&mut world);
        assert!(world.player.gravity() > 0.0);
    }

    #[test]
    fn speed_ramps_with_distance() {
        assert_eq!(run_speed_at(0.0), RUN_SPEED);
        assert_eq!(run_speed_at(999.0), RUN_SPEED);
        assert_eq!(run_speed_at(1000.0), RUN_SPEED + SPEED_INCREMENT);
        assert_eq!(run_speed_at(3500.0), RUN_SPEED + 3.0 * SPEED_INCREMENT);
    }

    #[test]
    fn bounds_check_covers_both_orientations() {
        let mut player = Player::spawn();
        assert!(!out_of_bounds(&player));
        player.pos.y = VIEWPORT_HEIGHT + BOUNDS_MARGIN + 1.0;
        assert!(out_of_bounds(&player));
        player.pos.y = -BOUNDS_MARGIN - 1.0;
        assert!(out_of_bounds(&player));
    }

    #[test]
    fn airborne_drag_damps_vertical_speed() {
        let mut world = bare_world();
        world.player.touching = Default::default();
        world.player.vel.y = 1000.0;
        let input = TickInput::default();
        update_player(&mut world, &input, SIM_DT);
        // Drag applied before gravity: 1000 * 0.98 + g*dt.
        let expected = 1000.0 * AIR_RESISTANCE + GRAVITY * SIM_DT;
        assert!((world.player.vel.y - expected).abs() < 1e-3);
    }

    #[test]
    fn no_input_zeroes_horizontal_velocity() {
        let mut world = bare_world();
        world.player.vel.x = 650.0;
        update_player(&mut world, &TickInput::default(), SIM_DT);
        assert_eq!(world.player.vel.x, 0.0);
    }
}
