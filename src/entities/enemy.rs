use rand::{Rng, seq::IndexedRandom};

use super::geometry::{PixelRect, Vec2};
use super::projectile::{Faction, Projectile};
use crate::config::Playfield;

/// Side length of the enemy sprite in pixels.
pub const ENEMY_SPRITE_SIZE: i32 = 100;

const ENEMY_SPEEDS: [f32; 5] = [0.10, 0.12, 0.14, 0.15, 0.16];
const SPAWN_ROWS: [f32; 4] = [-8.0, -7.0, -6.0, -5.0];
const SPAWN_MARGIN: u16 = 5;
const SPAWN_STEP: usize = 5;

/// Rows past the bottom edge an enemy may travel before it counts as escaped.
const ESCAPE_MARGIN: f32 = 5.0;

#[derive(Debug, Clone)]
pub struct Enemy {
    pub position: Vec2,
    /// Grid units per frame.
    pub speed: f32,
}

impl Enemy {
    pub fn new(position: Vec2, speed: f32) -> Self {
        Self { position, speed }
    }

    /// A fresh enemy above the visible area at a random column and speed.
    pub fn spawn<R: Rng + ?Sized>(playfield: &Playfield, rng: &mut R) -> Self {
        let columns: Vec<u16> = (SPAWN_MARGIN..playfield.cols.saturating_sub(SPAWN_MARGIN))
            .step_by(SPAWN_STEP)
            .collect();
        let x = columns.choose(rng).copied().unwrap_or(SPAWN_MARGIN);
        let y = SPAWN_ROWS.choose(rng).copied().unwrap_or(-5.0);
        let speed = ENEMY_SPEEDS.choose(rng).copied().unwrap_or(ENEMY_SPEEDS[0]);

        Self::new(Vec2::new(f32::from(x), y), speed)
    }

    pub fn advance(&mut self) {
        self.position += Vec2::new(0.0, self.speed);
    }

    /// Visual bounds of the sprite in pixels.
    pub fn sprite_rect(&self, cell_size: u16) -> PixelRect {
        let (x, y) = self.position.to_pixels(cell_size);
        PixelRect::new(x, y, ENEMY_SPRITE_SIZE, ENEMY_SPRITE_SIZE)
    }

    /// Collision box: a 70x30 band near the top-middle of the sprite.
    pub fn hitbox(&self, cell_size: u16) -> PixelRect {
        let mut rect = self.sprite_rect(cell_size);
        rect.x += 15;
        rect.y += 70;
        rect.set_center_y(rect.center_y() - 55);
        rect.width -= 30;
        rect.height -= 70;
        rect
    }

    pub fn fire(&self, cell_size: u16) -> Projectile {
        Projectile::new(self.position.to_pixels(cell_size), Faction::Enemy)
    }

    pub fn has_escaped(&self, rows: u16) -> bool {
        self.position.y > f32::from(rows) + ESCAPE_MARGIN
    }

    pub fn is_on_screen(&self) -> bool {
        self.position.y >= 0.0
    }
}
