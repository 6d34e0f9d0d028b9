/// What the session is currently doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GameMode {
    #[default]
    Menu,
    Playing,
    Paused,
}

/// Something that can move the session between modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Confirm,
    Cancel,
    HealthDepleted,
}

impl GameMode {
    /// The mode that follows `trigger`. Pairs not listed leave the mode as is.
    pub fn transition(self, trigger: Trigger) -> GameMode {
        match (self, trigger) {
            (GameMode::Menu, Trigger::Confirm) => GameMode::Playing,
            (GameMode::Playing, Trigger::Cancel) => GameMode::Paused,
            (GameMode::Paused, Trigger::Cancel) => GameMode::Playing,
            (GameMode::Playing, Trigger::HealthDepleted) => GameMode::Menu,
            (mode, _) => mode,
        }
    }
}
