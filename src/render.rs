//! Sprite hand-off to the embedding renderer
//!
//! The simulation owns all positions; rendering is a pure read. Once per
//! frame the embedder takes a [`snapshot`] of everything near the camera
//! and mirrors its display objects to it.

use glam::Vec2;

use crate::consts::*;
use crate::sim::World;

/// What kind of display object a sprite maps to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpriteKind {
    Player,
    Platform,
    Collectible,
    Pursuer,
}

/// Mirror flags for a sprite
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Orientation {
    /// Facing left
    pub flip_x: bool,
    /// Upside down (gravity inverted)
    pub flip_y: bool,
}

/// One drawable entity in world coordinates
#[derive(Debug, Clone, Copy)]
pub struct Sprite {
    /// Entity id (0 for the player)
    pub id: u32,
    pub kind: SpriteKind,
    /// Center position
    pub pos: Vec2,
    pub orientation: Orientation,
}

/// Collect everything within a block of the camera viewport, in draw
/// order: terrain, pickups, pursuer, player on top.
pub fn snapshot(world: &World) -> Vec<Sprite> {
    let min_x = world.camera_x - BLOCK_SIZE;
    let max_x = world.camera_x + VIEWPORT_WIDTH + BLOCK_SIZE;
    let visible = |x: f32| x >= min_x && x <= max_x;

    let mut sprites = Vec::new();

    for platform in &world.platforms {
        if visible(platform.pos.x) {
            sprites.push(Sprite {
                id: platform.id,
                kind: SpriteKind::Platform,
                pos: platform.pos,
                orientation: Orientation::default(),
            });
        }
    }

    for collectible in &world.collectibles {
        if visible(collectible.pos.x) {
            sprites.push(Sprite {
                id: collectible.id,
                kind: SpriteKind::Collectible,
                pos: collectible.pos,
                orientation: Orientation::default(),
            });
        }
    }

    for pursuer in world.pursuers.iter().filter(|p| p.active) {
        if visible(pursuer.pos.x) {
            sprites.push(Sprite {
                id: pursuer.id,
                kind: SpriteKind::Pursuer,
                pos: pursuer.pos,
                orientation: Orientation {
                    flip_x: pursuer.vel.x < 0.0,
                    flip_y: false,
                },
            });
        }
    }

    sprites.push(Sprite {
        id: 0,
        kind: SpriteKind::Player,
        pos: world.player.pos,
        orientation: Orientation {
            flip_x: world.player.vel.x < 0.0,
            flip_y: world.player.gravity_flipped,
        },
    });

    sprites
}
