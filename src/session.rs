use color_eyre::Result;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;

use crate::config::{Config, Playfield};
use crate::entities::{Enemy, GameMode, PixelRect, Player, Projectile, Trigger};
use crate::input::{InputSnapshot, Key};

pub const SCORE_PER_KILL: u32 = 10;
pub const ESCAPE_DAMAGE: u8 = 5;
pub const RAM_DAMAGE: u8 = 10;
pub const SHOT_DAMAGE: u8 = 10;

/// Things that happened during a frame, for audio and logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    Started,
    Paused,
    Resumed,
    Shot,
    EnemyDestroyed,
    EnemyEscaped,
    /// An enemy flew into the ship
    Rammed,
    /// An enemy projectile struck the ship
    ShotLanded,
    PlayerHit { damage: u8 },
    GameOver { score: u32 },
}

/// Owns every entity and all mutable game state for one play-through
pub struct Session {
    playfield: Playfield,
    mode: GameMode,
    score: u32,
    player: Player,
    enemies: Vec<Enemy>,
    player_shots: Vec<Projectile>,
    enemy_shots: Vec<Projectile>,
    rng: Pcg64,
    enemy_fire_chance: f64,
    frame_count: u64,
    games_over: u32,
}

impl Session {
    pub fn new(playfield: Playfield, seed: u64) -> Self {
        Self {
            playfield,
            mode: GameMode::Menu,
            score: 0,
            player: Player::default(),
            enemies: Vec::new(),
            player_shots: Vec::new(),
            enemy_shots: Vec::new(),
            rng: Pcg64::seed_from_u64(seed),
            enemy_fire_chance: 0.0,
            frame_count: 0,
            games_over: 0,
        }
    }

    /// Builds a session from validated command line settings
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;
        let seed = config.seed.unwrap_or_else(rand::random);
        tracing::info!(seed, "creating session");
        Ok(Self::new(config.playfield()?, seed).with_enemy_fire_chance(config.enemy_fire_chance))
    }

    /// Out-of-range chances are clamped. NaN and infinities disable fire.
    pub fn with_enemy_fire_chance(mut self, chance: f64) -> Self {
        self.enemy_fire_chance = if chance.is_finite() {
            chance.clamp(0.0, 1.0)
        } else {
            0.0
        };
        self
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    pub fn player_shots(&self) -> &[Projectile] {
        &self.player_shots
    }

    pub fn enemy_shots(&self) -> &[Projectile] {
        &self.enemy_shots
    }

    pub fn playfield(&self) -> &Playfield {
        &self.playfield
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// How many rounds have ended in a game over
    pub fn games_over(&self) -> u32 {
        self.games_over
    }

    /// Applies every key of the snapshot in arrival order
    pub fn handle_input(&mut self, input: &InputSnapshot) -> Vec<GameEvent> {
        let mut events = Vec::new();
        for &key in &input.keys {
            self.handle_key(key, &mut events);
        }
        events
    }

    fn handle_key(&mut self, key: Key, events: &mut Vec<GameEvent>) {
        match key {
            Key::Confirm => {
                let next = self.mode.transition(Trigger::Confirm);
                if self.mode == GameMode::Menu && next == GameMode::Playing {
                    self.reset();
                    events.push(GameEvent::Started);
                    tracing::info!("round started");
                }
                self.mode = next;
            }
            Key::Cancel => {
                let next = self.mode.transition(Trigger::Cancel);
                match (self.mode, next) {
                    (GameMode::Playing, GameMode::Paused) => events.push(GameEvent::Paused),
                    (GameMode::Paused, GameMode::Playing) => events.push(GameEvent::Resumed),
                    _ => {}
                }
                self.mode = next;
            }
            Key::MoveLeft if self.mode == GameMode::Playing => self.player.move_left(),
            Key::MoveRight if self.mode == GameMode::Playing => {
                self.player.move_right(self.playfield.cols);
            }
            Key::Shoot if self.mode == GameMode::Playing => {
                self.player_shots.push(self.player.shoot(self.playfield.cell_size));
                events.push(GameEvent::Shot);
            }
            _ => {}
        }
    }

    fn reset(&mut self) {
        self.player.reset();
        self.score = 0;
        self.enemies.clear();
        self.player_shots.clear();
        self.enemy_shots.clear();
        self.frame_count = 0;
    }

    /// Advance the world by one frame. Does nothing outside of Playing.
    pub fn update(&mut self) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if self.mode != GameMode::Playing {
            return events;
        }
        self.frame_count += 1;

        self.spawn_wave();
        self.advance();
        self.cull_out_of_bounds(&mut events);
        self.resolve_shot_hits(&mut events);
        self.resolve_ramming(&mut events);
        self.enemy_volley();
        self.resolve_enemy_shots(&mut events);
        self.check_health(&mut events);

        events
    }

    /// Spawns a wave of 4 to 9 enemies when none are left. Returns the
    /// number spawned.
    fn spawn_wave(&mut self) -> usize {
        if !self.enemies.is_empty() {
            return 0;
        }
        let count = self.rng.random_range(5..=10) - 1;
        for _ in 0..count {
            let enemy = Enemy::spawn(&self.playfield, &mut self.rng);
            self.enemies.push(enemy);
        }
        tracing::debug!(count, frame = self.frame_count, "spawned wave");
        count
    }

    fn advance(&mut self) {
        for enemy in &mut self.enemies {
            enemy.advance();
        }
        for projectile in self.player_shots.iter_mut().chain(&mut self.enemy_shots) {
            projectile.advance();
        }
    }

    fn cull_out_of_bounds(&mut self, events: &mut Vec<GameEvent>) {
        let rows = self.playfield.rows;
        let before = self.enemies.len();
        self.enemies.retain(|e| !e.has_escaped(rows));
        for _ in 0..before - self.enemies.len() {
            self.damage_player(ESCAPE_DAMAGE, events);
            events.push(GameEvent::EnemyEscaped);
        }

        let height = self.playfield.height_px();
        self.player_shots.retain(|p| !p.is_out_of_bounds(height));
        self.enemy_shots.retain(|p| !p.is_out_of_bounds(height));
    }

    /// Each player shot destroys at most one enemy, the first live one it
    /// overlaps. Removal happens after the scan.
    fn resolve_shot_hits(&mut self, events: &mut Vec<GameEvent>) {
        let cell = self.playfield.cell_size;
        let hitboxes: Vec<PixelRect> = self.enemies.iter().map(|e| e.hitbox(cell)).collect();
        let mut enemy_hit = vec![false; self.enemies.len()];
        let mut shot_spent = vec![false; self.player_shots.len()];

        for (shot_idx, shot) in self.player_shots.iter().enumerate() {
            let target = hitboxes
                .iter()
                .enumerate()
                .find(|(e_idx, hitbox)| !enemy_hit[*e_idx] && shot.rect.intersects(hitbox))
                .map(|(e_idx, _)| e_idx);

            if let Some(e_idx) = target {
                enemy_hit[e_idx] = true;
                shot_spent[shot_idx] = true;
                self.score += SCORE_PER_KILL;
                events.push(GameEvent::EnemyDestroyed);
            }
        }

        retain_unmarked(&mut self.enemies, &enemy_hit);
        retain_unmarked(&mut self.player_shots, &shot_spent);
    }

    /// Every enemy touching the ship is destroyed and damages it.
    fn resolve_ramming(&mut self, events: &mut Vec<GameEvent>) {
        let cell = self.playfield.cell_size;
        let ship = self.player.hitbox(cell);
        let rammed: Vec<bool> = self
            .enemies
            .iter()
            .map(|e| e.hitbox(cell).intersects(&ship))
            .collect();

        for _ in rammed.iter().filter(|&&hit| hit) {
            events.push(GameEvent::Rammed);
            self.damage_player(RAM_DAMAGE, events);
        }
        retain_unmarked(&mut self.enemies, &rammed);
    }

    fn enemy_volley(&mut self) {
        if self.enemy_fire_chance <= 0.0 {
            return;
        }
        let cell = self.playfield.cell_size;
        for enemy in &self.enemies {
            if enemy.is_on_screen() && self.rng.random_bool(self.enemy_fire_chance) {
                self.enemy_shots.push(enemy.fire(cell));
            }
        }
    }

    fn resolve_enemy_shots(&mut self, events: &mut Vec<GameEvent>) {
        let ship = self.player.hitbox(self.playfield.cell_size);
        let landed: Vec<bool> = self
            .enemy_shots
            .iter()
            .map(|p| p.rect.intersects(&ship))
            .collect();

        for _ in landed.iter().filter(|&&hit| hit) {
            events.push(GameEvent::ShotLanded);
            self.damage_player(SHOT_DAMAGE, events);
        }
        retain_unmarked(&mut self.enemy_shots, &landed);
    }

    fn damage_player(&mut self, amount: u8, events: &mut Vec<GameEvent>) {
        self.player.apply_damage(amount);
        events.push(GameEvent::PlayerHit { damage: amount });
    }

    fn check_health(&mut self, events: &mut Vec<GameEvent>) {
        if self.player.is_alive() {
            return;
        }
        let next = self.mode.transition(Trigger::HealthDepleted);
        if next != self.mode {
            self.mode = next;
            self.games_over += 1;
            events.push(GameEvent::GameOver { score: self.score });
            tracing::info!(score = self.score, frames = self.frame_count, "game over");
        }
    }
}

/// Keeps the items whose flag is false. `marked` is parallel to `items`.
fn retain_unmarked<T>(items: &mut Vec<T>, marked: &[bool]) {
    let mut flags = marked.iter();
    items.retain(|_| !flags.next().copied().unwrap_or(false));
}
