mod enemy;
mod game_state;
mod geometry;
mod player;
mod projectile;

// Re-export all public types
pub use enemy::Enemy;
pub use game_state::{GameMode, Trigger};
pub use geometry::{PixelRect, Vec2};
pub use player::{MAX_HEALTH, PLAYER_SPAWN, Player};
pub use projectile::{Faction, Projectile};
