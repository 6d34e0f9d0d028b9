use std::path::PathBuf;

use clap::Parser;
use color_eyre::{Result, eyre::ensure};

/// Command line configuration for the game.
#[derive(Debug, Clone, Parser)]
#[command(name = "star-lancer")]
#[command(about = "Hold the bottom line against descending enemy waves")]
pub struct Config {
    /// Playfield width in grid cells
    #[arg(long, default_value_t = 36)]
    pub cols: u16,

    /// Playfield height in grid cells
    #[arg(long, default_value_t = 38)]
    pub rows: u16,

    /// Pixels per grid cell
    #[arg(long, default_value_t = 20)]
    pub cell_size: u16,

    /// Target frames per second
    #[arg(long, default_value_t = 60)]
    pub fps: u32,

    /// Directory holding the sound files
    #[arg(long, default_value = "resource")]
    pub assets: PathBuf,

    /// Sound effect volume (0.0 - 1.0)
    #[arg(long, default_value_t = 0.85)]
    pub volume: f32,

    /// Background music volume (0.0 - 1.0)
    #[arg(long, default_value_t = 0.1)]
    pub music_volume: f32,

    /// Disable all audio
    #[arg(long)]
    pub mute: bool,

    /// Seed for enemy waves; random when omitted
    #[arg(long)]
    pub seed: Option<u64>,

    /// Chance per frame that an on-screen enemy fires (0.0 disables)
    #[arg(long, default_value_t = 0.0)]
    pub enemy_fire_chance: f64,

    /// Where diagnostics are written while the terminal is in use
    #[arg(long, default_value = "debug.log")]
    pub log_file: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cols: 36,
            rows: 38,
            cell_size: 20,
            fps: 60,
            assets: PathBuf::from("resource"),
            volume: 0.85,
            music_volume: 0.1,
            mute: false,
            seed: None,
            enemy_fire_chance: 0.0,
            log_file: PathBuf::from("debug.log"),
        }
    }
}

impl Config {
    /// Checks the values clap cannot range-check on its own.
    pub fn validate(&self) -> Result<()> {
        ensure!(self.fps > 0, "fps must be greater than zero");
        ensure!(
            (0.0..=1.0).contains(&self.volume),
            "volume must be between 0.0 and 1.0, got {}",
            self.volume
        );
        ensure!(
            (0.0..=1.0).contains(&self.music_volume),
            "music volume must be between 0.0 and 1.0, got {}",
            self.music_volume
        );
        ensure!(
            (0.0..=1.0).contains(&self.enemy_fire_chance),
            "enemy fire chance must be between 0.0 and 1.0, got {}",
            self.enemy_fire_chance
        );
        Ok(())
    }

    pub fn playfield(&self) -> Result<Playfield> {
        Playfield::new(self.cols, self.rows, self.cell_size)
    }
}

/// Grid cells beyond the larger playfield side that entities can reach: spawn
/// rows above the top, the escape margin below, and the fixed ship row.
const REACH_MARGIN_CELLS: i64 = 40;

/// Pixels added on top of a cell position by sprites and hitbox insets.
const REACH_MARGIN_PX: i64 = 200;

/// Size of the playing area in grid cells, plus the cell size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Playfield {
    pub cols: u16,
    pub rows: u16,
    pub cell_size: u16,
}

impl Playfield {
    /// Enemies spawn at x in [5, cols - 5), so anything narrower than 11
    /// columns leaves nowhere to put them.
    pub fn new(cols: u16, rows: u16, cell_size: u16) -> Result<Self> {
        ensure!(cols > 10, "playfield needs more than 10 columns, got {cols}");
        ensure!(rows > 0, "playfield needs at least one row");
        ensure!(cell_size > 0, "cell size must be greater than zero");

        let extent = i64::from(cols.max(rows)) + REACH_MARGIN_CELLS;
        ensure!(
            extent * i64::from(cell_size) + REACH_MARGIN_PX <= i64::from(i32::MAX),
            "playfield of {cols}x{rows} cells at {cell_size}px per cell is too large"
        );
        Ok(Self {
            cols,
            rows,
            cell_size,
        })
    }

    pub fn width_px(&self) -> i32 {
        i32::from(self.cols) * i32::from(self.cell_size)
    }

    pub fn height_px(&self) -> i32 {
        i32::from(self.rows) * i32::from(self.cell_size)
    }
}

impl Default for Playfield {
    fn default() -> Self {
        Self {
            cols: 36,
            rows: 38,
            cell_size: 20,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_playfield_pixels() {
        let playfield = Playfield::default();
        assert_eq!(playfield.width_px(), 720);
        assert_eq!(playfield.height_px(), 760);
    }

    #[test]
    fn test_playfield_rejects_degenerate_sizes() {
        assert!(Playfield::new(10, 38, 20).is_err());
        assert!(Playfield::new(36, 0, 20).is_err());
        assert!(Playfield::new(36, 38, 0).is_err());
        assert!(Playfield::new(11, 1, 1).is_ok());
    }

    #[test]
    fn test_playfield_rejects_overflowing_sizes() {
        assert!(Playfield::new(40_000, 40_000, 60_000).is_err());
        assert!(Playfield::new(36, 40_000, u16::MAX).is_err());
        assert!(Playfield::new(40_000, 38, u16::MAX).is_err());

        let largest = Playfield::new(32_000, 32_000, u16::MAX).unwrap();
        assert!(largest.width_px() > 0);
        assert!(largest.height_px() > 0);
    }

    #[test]
    fn test_config_rejects_overflowing_playfield() {
        let config = Config {
            cols: 40_000,
            rows: 40_000,
            cell_size: 60_000,
            ..Config::default()
        };
        assert!(config.validate().is_ok());
        assert!(config.playfield().is_err());
    }

    #[test]
    fn test_config_defaults_validate() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.playfield().ok(), Some(Playfield::default()));
    }

    #[test]
    fn test_config_rejects_bad_values() {
        let config = Config {
            fps: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            volume: 1.5,
            ..Config::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            enemy_fire_chance: -0.1,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_parses_flags() {
        let config = Config::parse_from(["star-lancer", "--cols", "40", "--seed", "7", "--mute"]);
        assert_eq!(config.cols, 40);
        assert_eq!(config.seed, Some(7));
        assert!(config.mute);
        assert_eq!(config.rows, 38);
    }
}
