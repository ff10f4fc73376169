//! AABB collision primitives and contact resolution
//!
//! All moving entities are axis-aligned boxes. Terrain resolve is
//! per-axis: move on x, push out of overlaps, then the same on y. The
//! axis order keeps landings and wall hits unambiguous at tunnel corners.

use glam::Vec2;

use super::state::{Platform, Player, Pursuer};
use crate::consts::*;

/// Axis-aligned bounding box in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn from_center(center: Vec2, half: Vec2) -> Self {
        Self {
            min: center - half,
            max: center + half,
        }
    }

    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }
}

/// Which sides of a body touched terrain during the last resolve
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Contacts {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl Contacts {
    pub fn any(&self) -> bool {
        self.up || self.down || self.left || self.right
    }

    pub fn horizontal(&self) -> bool {
        self.left || self.right
    }

    pub fn vertical(&self) -> bool {
        self.up || self.down
    }
}

/// Outcome of player/pursuer overlap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PursuerContact {
    /// Descending hit within the stomp window of the pursuer's top face
    Stomp,
    /// Any other overlap
    Damage,
}

/// Integrate a box through the terrain for one step, pushing it out of
/// any block it enters. Velocity is zeroed on the blocked axis and the
/// touched sides are reported.
pub fn move_and_collide(
    pos: &mut Vec2,
    vel: &mut Vec2,
    half: Vec2,
    platforms: &[Platform],
    dt: f32,
) -> Contacts {
    let mut contacts = Contacts::default();

    pos.x += vel.x * dt;
    for platform in platforms {
        let body = Aabb::from_center(*pos, half);
        let block = platform.aabb();
        if !body.overlaps(&block) {
            continue;
        }
        if vel.x > 0.0 {
            pos.x = block.min.x - half.x;
            contacts.right = true;
        } else if vel.x < 0.0 {
            pos.x = block.max.x + half.x;
            contacts.left = true;
        }
    }
    if contacts.horizontal() {
        vel.x = 0.0;
    }

    pos.y += vel.y * dt;
    for platform in platforms {
        let body = Aabb::from_center(*pos, half);
        let block = platform.aabb();
        if !body.overlaps(&block) {
            continue;
        }
        if vel.y > 0.0 {
            pos.y = block.min.y - half.y;
            contacts.down = true;
        } else if vel.y < 0.0 {
            pos.y = block.max.y + half.y;
            contacts.up = true;
        }
    }
    if contacts.vertical() {
        vel.y = 0.0;
    }

    contacts
}

/// Classify an overlap between the player and a pursuer, or `None` when
/// the boxes are apart. Stomp requires downward player motion with the
/// player's bottom face inside the window below the pursuer's top face.
pub fn classify_pursuer_contact(player: &Player, pursuer: &Pursuer) -> Option<PursuerContact> {
    let body = player.aabb();
    let target = pursuer.aabb();
    if !body.overlaps(&target) {
        return None;
    }
    let descending = player.vel.y > 0.0;
    let within_window = body.max.y - target.min.y <= PLAYER_HEIGHT * STOMP_WINDOW;
    if descending && within_window {
        Some(PursuerContact::Stomp)
    } else {
        Some(PursuerContact::Damage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;

    fn platform_at(x: f32, y: f32) -> Platform {
        Platform {
            id: 0,
            pos: Vec2::new(x, y),
        }
    }

    fn pursuer_at(x: f32, y: f32) -> Pursuer {
        Pursuer {
            id: 1,
            pos: Vec2::new(x, y),
            vel: Vec2::ZERO,
            active: true,
            blocked: Contacts::default(),
        }
    }

    #[test]
    fn aabb_overlap_is_exclusive_at_edges() {
        let a = Aabb::from_center(Vec2::ZERO, Vec2::splat(10.0));
        let b = Aabb::from_center(Vec2::new(20.0, 0.0), Vec2::splat(10.0));
        let c = Aabb::from_center(Vec2::new(19.0, 0.0), Vec2::splat(10.0));
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&c));
    }

    #[test]
    fn falling_body_lands_on_block_and_stops() {
        let floor = platform_at(0.0, 100.0);
        let half = Vec2::splat(10.0);
        let mut pos = Vec2::new(0.0, 60.0);
        let mut vel = Vec2::new(0.0, 600.0);

        let contacts = move_and_collide(&mut pos, &mut vel, half, &[floor], 0.1);

        assert!(contacts.down);
        assert!(!contacts.up);
        assert_eq!(vel.y, 0.0);
        // Resting exactly on the block's top face.
        assert_eq!(pos.y, 100.0 - BLOCK_SIZE / 2.0 - 10.0);
    }

    #[test]
    fn rising_body_hits_ceiling_block() {
        let ceiling = platform_at(0.0, 0.0);
        let half = Vec2::splat(10.0);
        let mut pos = Vec2::new(0.0, 40.0);
        let mut vel = Vec2::new(0.0, -600.0);

        let contacts = move_and_collide(&mut pos, &mut vel, half, &[ceiling], 0.1);

        assert!(contacts.up);
        assert_eq!(vel.y, 0.0);
        assert_eq!(pos.y, BLOCK_SIZE / 2.0 + 10.0);
    }

    #[test]
    fn wall_stops_horizontal_motion() {
        let wall = platform_at(100.0, 0.0);
        let half = Vec2::splat(10.0);
        let mut pos = Vec2::new(60.0, 0.0);
        let mut vel = Vec2::new(650.0, 0.0);

        let contacts = move_and_collide(&mut pos, &mut vel, half, &[wall], 0.1);

        assert!(contacts.right);
        assert_eq!(vel.x, 0.0);
        assert_eq!(pos.x, 100.0 - BLOCK_SIZE / 2.0 - 10.0);
    }

    #[test]
    fn descending_contact_near_top_face_is_a_stomp() {
        let mut player = Player::spawn();
        let pursuer = pursuer_at(player.pos.x, player.pos.y + PLAYER_HEIGHT / 2.0 + PURSUER_SIZE / 2.0 - 4.0);
        player.vel.y = 300.0;
        assert_eq!(
            classify_pursuer_contact(&player, &pursuer),
            Some(PursuerContact::Stomp)
        );
    }

    #[test]
    fn side_contact_is_damage() {
        let mut player = Player::spawn();
        player.vel.y = 0.0;
        // Overlapping from the side at matching height.
        let pursuer = pursuer_at(player.pos.x + PLAYER_WIDTH / 2.0 + PURSUER_SIZE / 2.0 - 4.0, player.pos.y);
        assert_eq!(
            classify_pursuer_contact(&player, &pursuer),
            Some(PursuerContact::Damage)
        );
    }

    #[test]
    fn ascending_contact_is_damage_even_at_top_face() {
        let mut player = Player::spawn();
        player.vel.y = -300.0;
        let pursuer = pursuer_at(player.pos.x, player.pos.y + PLAYER_HEIGHT / 2.0 + PURSUER_SIZE / 2.0 - 4.0);
        assert_eq!(
            classify_pursuer_contact(&player, &pursuer),
            Some(PursuerContact::Damage)
        );
    }

    #[test]
    fn separated_boxes_report_no_contact() {
        let player = Player::spawn();
        let pursuer = pursuer_at(player.pos.x - 500.0, player.pos.y);
        assert_eq!(classify_pursuer_contact(&player, &pursuer), None);
    }
}
