use ratatui::style::Color;

use super::geometry::PixelRect;

pub const PROJECTILE_WIDTH: i32 = 10;
pub const PROJECTILE_HEIGHT: i32 = 20;
pub const PROJECTILE_SPEED: i32 = 5;

/// Which side fired a projectile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Faction {
    Player,
    Enemy,
}

#[derive(Debug, Clone)]
pub struct Projectile {
    pub rect: PixelRect,
    pub faction: Faction,
    /// Pixels per frame; negative is up.
    pub velocity: i32,
    pub color: Color,
}

impl Projectile {
    /// `origin` is already in pixel space.
    pub fn new(origin: (i32, i32), faction: Faction) -> Self {
        let (velocity, color) = match faction {
            Faction::Player => (-PROJECTILE_SPEED, Color::Magenta),
            Faction::Enemy => (PROJECTILE_SPEED, Color::Red),
        };

        Self {
            rect: PixelRect::new(origin.0, origin.1, PROJECTILE_WIDTH, PROJECTILE_HEIGHT),
            faction,
            velocity,
            color,
        }
    }

    pub fn advance(&mut self) {
        self.rect.y += self.velocity;
    }

    /// True once the projectile has left the vertical extent of the playfield.
    pub fn is_out_of_bounds(&self, height_px: i32) -> bool {
        self.rect.y < 0 || self.rect.y > height_px
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_projectile_new() {
        let projectile = Projectile::new((300, 590), Faction::Player);
        assert_eq!(projectile.rect, PixelRect::new(300, 590, 10, 20));
        assert_eq!(projectile.faction, Faction::Player);
        assert_eq!(projectile.velocity, -5);
    }

    #[test]
    fn test_player_projectile_moves_up() {
        let mut projectile = Projectile::new((10, 100), Faction::Player);
        projectile.advance();
        assert_eq!(projectile.rect.y, 95);
    }

    #[test]
    fn test_enemy_projectile_moves_down() {
        let mut projectile = Projectile::new((10, 100), Faction::Enemy);
        projectile.advance();
        assert_eq!(projectile.rect.y, 105);
    }

    #[test]
    fn test_projectile_out_of_bounds_edges() {
        let at_top = Projectile::new((10, 0), Faction::Player);
        assert!(!at_top.is_out_of_bounds(760));

        let above = Projectile::new((10, -1), Faction::Player);
        assert!(above.is_out_of_bounds(760));

        let at_bottom = Projectile::new((10, 760), Faction::Enemy);
        assert!(!at_bottom.is_out_of_bounds(760));

        let below = Projectile::new((10, 761), Faction::Enemy);
        assert!(below.is_out_of_bounds(760));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_velocity_sign_follows_faction(
                x in -500i32..500,
                y in -500i32..500,
                faction in prop::sample::select(vec![Faction::Player, Faction::Enemy])
            ) {
                let mut projectile = Projectile::new((x, y), faction);
                projectile.advance();

                match faction {
                    Faction::Player => {
                        prop_assert!(projectile.velocity < 0);
                        prop_assert!(projectile.rect.y < y);
                    }
                    Faction::Enemy => {
                        prop_assert!(projectile.velocity > 0);
                        prop_assert!(projectile.rect.y > y);
                    }
                }
            }
        }
    }
}
