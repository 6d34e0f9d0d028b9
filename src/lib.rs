// Library exports for the binary and the integration tests
pub use config::{Config, Playfield};
pub use entities::{
    Enemy, Faction, GameMode, MAX_HEALTH, PLAYER_SPAWN, PixelRect, Player, Projectile, Trigger,
    Vec2,
};
pub use input::{InputSnapshot, Key};
pub use session::{GameEvent, Session};

pub mod app;
pub mod audio;
pub mod clock;
pub mod config;
pub mod entities;
pub mod input;
pub mod renderer;
pub mod session;
