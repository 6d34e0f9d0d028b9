use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source, source::Buffered};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::session::GameEvent;

const LASER_FILE: &str = "shoot.wav";
const HIT_FILE: &str = "bulletCollide.mp3";
const COLLISION_FILE: &str = "enemyPlayerCollision.wav";
const MUSIC_FILE: &str = "Infraction-Battlefield-Logo-Version-2-pr.mp3";

type Clip = Buffered<Decoder<BufReader<File>>>;

/// One-shot sounds the game can trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    Laser,
    Hit,
    Collision,
}

impl SoundEffect {
    /// The sound that accompanies a session event, if any
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::Shot => Some(SoundEffect::Laser),
            GameEvent::EnemyDestroyed | GameEvent::ShotLanded => Some(SoundEffect::Hit),
            GameEvent::Rammed => Some(SoundEffect::Collision),
            _ => None,
        }
    }
}

/// Audio manager for sound effects and looping background music.
/// Every failure degrades to silence; nothing here can stop the game.
pub struct AudioManager {
    output: Option<(OutputStream, OutputStreamHandle)>,
    assets: PathBuf,
    volume: f32,
    music_volume: f32,
    laser: Option<Clip>,
    hit: Option<Clip>,
    collision: Option<Clip>,
    music: Option<Sink>,
}

impl AudioManager {
    /// Opens the default output device and pre-loads the effect clips
    pub fn new(assets: &Path, volume: f32, music_volume: f32) -> Self {
        let output = match OutputStream::try_default() {
            Ok(output) => Some(output),
            Err(err) => {
                tracing::warn!(%err, "failed to open audio output, continuing without sound");
                None
            }
        };

        let mut manager = Self {
            output,
            assets: assets.to_path_buf(),
            volume,
            music_volume,
            laser: None,
            hit: None,
            collision: None,
            music: None,
        };

        if manager.output.is_some() {
            manager.laser = manager.load_clip(LASER_FILE);
            manager.hit = manager.load_clip(HIT_FILE);
            manager.collision = manager.load_clip(COLLISION_FILE);
        }

        manager
    }

    /// A manager that never makes a sound
    pub fn disabled() -> Self {
        Self {
            output: None,
            assets: PathBuf::new(),
            volume: 0.0,
            music_volume: 0.0,
            laser: None,
            hit: None,
            collision: None,
            music: None,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.output.is_some()
    }

    fn load_clip(&self, name: &str) -> Option<Clip> {
        let path = self.assets.join(name);
        let decoded = File::open(&path)
            .map_err(|err| err.to_string())
            .and_then(|file| Decoder::new(BufReader::new(file)).map_err(|err| err.to_string()));

        match decoded {
            Ok(source) => Some(source.buffered()),
            Err(err) => {
                tracing::warn!(path = %path.display(), %err, "sound disabled");
                None
            }
        }
    }

    /// Starts the background track looping. Calling it again is a no-op.
    pub fn start_music(&mut self) {
        if self.music.is_some() {
            return;
        }
        let Some((_, handle)) = &self.output else {
            return;
        };

        let path = self.assets.join(MUSIC_FILE);
        let source = match File::open(&path).map(BufReader::new) {
            Ok(reader) => match Decoder::new(reader) {
                Ok(source) => source,
                Err(err) => {
                    tracing::warn!(path = %path.display(), %err, "music disabled");
                    return;
                }
            },
            Err(err) => {
                tracing::warn!(path = %path.display(), %err, "music disabled");
                return;
            }
        };

        match Sink::try_new(handle) {
            Ok(sink) => {
                sink.set_volume(self.music_volume);
                sink.append(source.repeat_infinite());
                self.music = Some(sink);
            }
            Err(err) => tracing::warn!(%err, "music disabled"),
        }
    }

    /// Fire and forget: the sink is detached and plays out on its own
    pub fn play(&self, effect: SoundEffect) {
        let clip = match effect {
            SoundEffect::Laser => &self.laser,
            SoundEffect::Hit => &self.hit,
            SoundEffect::Collision => &self.collision,
        };

        if let (Some(clip), Some((_, handle))) = (clip, &self.output) {
            // Ignore errors for sound playback - don't want to crash the game
            if let Ok(sink) = Sink::try_new(handle) {
                sink.set_volume(self.volume);
                sink.append(clip.clone());
                sink.detach();
            }
        }
    }

    /// Plays whatever sounds a batch of session events calls for
    pub fn play_events(&self, events: &[GameEvent]) {
        for effect in events.iter().filter_map(SoundEffect::for_event) {
            self.play(effect);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_map_to_sounds() {
        assert_eq!(SoundEffect::for_event(&GameEvent::Shot), Some(SoundEffect::Laser));
        assert_eq!(
            SoundEffect::for_event(&GameEvent::EnemyDestroyed),
            Some(SoundEffect::Hit)
        );
        assert_eq!(
            SoundEffect::for_event(&GameEvent::Rammed),
            Some(SoundEffect::Collision)
        );
        assert_eq!(SoundEffect::for_event(&GameEvent::EnemyEscaped), None);
        assert_eq!(SoundEffect::for_event(&GameEvent::PlayerHit { damage: 5 }), None);
    }

    #[test]
    fn test_disabled_manager_is_silent() {
        let mut audio = AudioManager::disabled();
        assert!(!audio.is_enabled());
        audio.start_music();
        audio.play_events(&[GameEvent::Shot, GameEvent::Rammed]);
        assert!(audio.music.is_none());
    }
}
