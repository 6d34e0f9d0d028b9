use color_eyre::Result;
use ratatui::{Terminal, backend::Backend};

use crate::audio::AudioManager;
use crate::clock::FrameClock;
use crate::config::Config;
use crate::input::{InputManager, InputSnapshot};
use crate::renderer::{GameRenderer, RenderView};
use crate::session::{GameEvent, Session};

/// The main application which holds the session and its collaborators.
pub struct App {
    running: bool,
    session: Session,
    input_manager: InputManager,
    renderer: GameRenderer,
    audio_manager: AudioManager,
    clock: FrameClock,
}

impl App {
    pub fn new(config: &Config) -> Result<Self> {
        let session = Session::from_config(config)?;
        let audio_manager = if config.mute {
            AudioManager::disabled()
        } else {
            AudioManager::new(&config.assets, config.volume, config.music_volume)
        };

        Ok(Self::with_parts(session, audio_manager, FrameClock::new(config.fps)))
    }

    pub fn with_parts(session: Session, audio_manager: AudioManager, clock: FrameClock) -> Self {
        Self {
            running: true,
            session,
            input_manager: InputManager::new(),
            renderer: GameRenderer::new(),
            audio_manager,
            clock,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Run the application's main loop.
    pub fn run<B: Backend>(mut self, terminal: &mut Terminal<B>) -> Result<()> {
        self.audio_manager.start_music();

        while self.running {
            let input = self.input_manager.poll()?;
            self.step(&input);

            terminal.draw(|frame| {
                let view = RenderView::from_session(&self.session, self.clock.fps());
                self.renderer.draw(frame, &view);
            })?;

            self.clock.wait();
        }

        tracing::info!(
            score = self.session.score(),
            games_over = self.session.games_over(),
            "shutting down"
        );
        Ok(())
    }

    /// One frame of input handling and simulation
    pub fn step(&mut self, input: &InputSnapshot) {
        if input.quit {
            self.running = false;
            return;
        }

        let mut events = self.session.handle_input(input);
        events.extend(self.session.update());

        for event in &events {
            log_event(event);
        }
        self.audio_manager.play_events(&events);
    }
}

fn log_event(event: &GameEvent) {
    match event {
        GameEvent::Paused => tracing::debug!("paused"),
        GameEvent::Resumed => tracing::debug!("resumed"),
        GameEvent::PlayerHit { damage } => tracing::trace!(damage, "player hit"),
        GameEvent::EnemyEscaped => tracing::trace!("enemy escaped"),
        _ => {}
    }
}
