use super::geometry::{PixelRect, Vec2};
use super::projectile::{Faction, Projectile};

pub const MAX_HEALTH: u8 = 100;
/// Side length of the ship sprite in pixels.
pub const PLAYER_SPRITE_SIZE: i32 = 100;
pub const PLAYER_SPAWN: Vec2 = Vec2::new(15.0, 30.0);

const MOVE_STEP: f32 = 2.0;
/// Offset from the ship's corner to its cannon, in grid units.
const MUZZLE_OFFSET: Vec2 = Vec2::new(2.2, -0.5);

#[derive(Debug, Clone)]
pub struct Player {
    pub position: Vec2,
    pub health: u8,
}

impl Default for Player {
    fn default() -> Self {
        Self::new(PLAYER_SPAWN)
    }
}

impl Player {
    pub fn new(position: Vec2) -> Self {
        Self {
            position,
            health: MAX_HEALTH,
        }
    }

    /// Back to full health at the spawn point.
    pub fn reset(&mut self) {
        self.position = PLAYER_SPAWN;
        self.health = MAX_HEALTH;
    }

    // Both bounds are checked against the pre-move position.
    pub fn move_left(&mut self) {
        if self.position.x - 1.0 > 0.0 {
            self.position.x -= MOVE_STEP;
        }
    }

    pub fn move_right(&mut self, cols: u16) {
        if self.position.x + 6.0 < f32::from(cols) {
            self.position.x += MOVE_STEP;
        }
    }

    pub fn shoot(&self, cell_size: u16) -> Projectile {
        let muzzle = self.position + MUZZLE_OFFSET;
        Projectile::new(muzzle.to_pixels(cell_size), Faction::Player)
    }

    pub fn sprite_rect(&self, cell_size: u16) -> PixelRect {
        let (x, y) = self.position.to_pixels(cell_size);
        PixelRect::new(x, y, PLAYER_SPRITE_SIZE, PLAYER_SPRITE_SIZE)
    }

    /// Collision box: the full sprite width over a 20 px band through its middle.
    pub fn hitbox(&self, cell_size: u16) -> PixelRect {
        let mut rect = self.sprite_rect(cell_size);
        rect.set_center_y(rect.center_y() + 50);
        rect.height -= 80;
        rect
    }

    /// Subtracts `amount`, clamping at zero. Returns true when health is gone.
    pub fn apply_damage(&mut self, amount: u8) -> bool {
        self.health = self.health.saturating_sub(amount);
        self.health == 0
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }
}
