use crate::config::Playfield;
use crate::entities::{Enemy, GameMode, MAX_HEALTH, PixelRect, Player, Projectile};
use crate::session::Session;
use ratatui::{
    Frame,
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

const BACKGROUND: Color = Color::Blue;
const INK: Color = Color::Black;

/// Pre-drawn images the renderer can blit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sprite {
    Ship,
    Enemy,
}

impl Sprite {
    /// Art for a 100x100 px sprite at the default cell size: 10 columns, 5 rows
    pub fn lines(&self) -> &'static [&'static str] {
        match self {
            Sprite::Ship => &[
                "    /\\    ",
                "   /##\\   ",
                "  |#<>#|  ",
                " /######\\ ",
                "/__/  \\__\\",
            ],
            Sprite::Enemy => &[
                " \\  ||  / ",
                "  \\{##}/  ",
                "  {#<>#}  ",
                "   \\\\//   ",
                "    \\/    ",
            ],
        }
    }

    pub fn color(&self) -> Color {
        match self {
            Sprite::Ship => Color::Yellow,
            Sprite::Enemy => Color::Red,
        }
    }
}

/// Pixel-space drawing operations the game needs from a display
pub trait Surface {
    fn fill(&mut self, color: Color);
    fn fill_rect(&mut self, rect: PixelRect, color: Color);
    fn blit(&mut self, sprite: Sprite, position: (i32, i32));
    fn draw_text(&mut self, text: &str, position: (i32, i32), color: Color);
}

/// A [`Surface`] over a ratatui buffer. One grid cell becomes two terminal
/// columns and one terminal row; anything outside `area` is clipped.
pub struct TerminalSurface<'a> {
    buffer: &'a mut Buffer,
    area: Rect,
    px_per_col: f32,
    px_per_row: f32,
}

impl<'a> TerminalSurface<'a> {
    pub fn new(buffer: &'a mut Buffer, area: Rect, cell_size: u16) -> Self {
        let cell = f32::from(cell_size.max(1));
        Self {
            buffer,
            area,
            px_per_col: cell / 2.0,
            px_per_row: cell,
        }
    }

    fn to_cell(&self, x: i32, y: i32) -> (i32, i32) {
        (
            (x as f32 / self.px_per_col).floor() as i32,
            (y as f32 / self.px_per_row).floor() as i32,
        )
    }

    /// Buffer cell for a position relative to `area`, if it is visible
    fn cell_mut(&mut self, col: i32, row: i32) -> Option<&mut ratatui::buffer::Cell> {
        if col < 0
            || row < 0
            || col >= i32::from(self.area.width)
            || row >= i32::from(self.area.height)
        {
            return None;
        }
        let x = self.area.x + col as u16;
        let y = self.area.y + row as u16;
        self.buffer.cell_mut((x, y))
    }

    fn put_str(&mut self, text: &str, col: i32, row: i32, style: Style, skip_spaces: bool) {
        for (offset, ch) in text.chars().enumerate() {
            if skip_spaces && ch == ' ' {
                continue;
            }
            if let Some(cell) = self.cell_mut(col + offset as i32, row) {
                cell.set_char(ch);
                cell.set_fg(style.fg.unwrap_or(INK));
                if style.add_modifier.contains(Modifier::BOLD) {
                    cell.modifier.insert(Modifier::BOLD);
                }
            }
        }
    }
}

impl Surface for TerminalSurface<'_> {
    fn fill(&mut self, color: Color) {
        for row in 0..i32::from(self.area.height) {
            for col in 0..i32::from(self.area.width) {
                if let Some(cell) = self.cell_mut(col, row) {
                    cell.reset();
                    cell.set_bg(color);
                }
            }
        }
    }

    fn fill_rect(&mut self, rect: PixelRect, color: Color) {
        if rect.is_empty() {
            return;
        }
        let (left, top) = self.to_cell(rect.x, rect.y);
        let right = (rect.right() as f32 / self.px_per_col).ceil() as i32;
        let bottom = (rect.bottom() as f32 / self.px_per_row).ceil() as i32;

        for row in top..bottom.max(top + 1) {
            for col in left..right.max(left + 1) {
                if let Some(cell) = self.cell_mut(col, row) {
                    cell.set_char(' ');
                    cell.set_bg(color);
                }
            }
        }
    }

    fn blit(&mut self, sprite: Sprite, position: (i32, i32)) {
        let (col, row) = self.to_cell(position.0, position.1);
        let style = Style::default().fg(sprite.color()).add_modifier(Modifier::BOLD);
        for (line_idx, line) in sprite.lines().iter().enumerate() {
            self.put_str(line, col, row + line_idx as i32, style, true);
        }
    }

    fn draw_text(&mut self, text: &str, position: (i32, i32), color: Color) {
        let (col, row) = self.to_cell(position.0, position.1);
        let style = Style::default().fg(color).add_modifier(Modifier::BOLD);
        self.put_str(text, col, row, style, false);
    }
}

/// View struct that holds all game state needed for rendering
pub struct RenderView<'a> {
    pub mode: GameMode,
    pub playfield: &'a Playfield,
    pub player: &'a Player,
    pub enemies: &'a [Enemy],
    pub player_shots: &'a [Projectile],
    pub enemy_shots: &'a [Projectile],
    pub score: u32,
    pub games_over: u32,
    pub fps: u32,
}

impl<'a> RenderView<'a> {
    pub fn from_session(session: &'a Session, fps: u32) -> Self {
        Self {
            mode: session.mode(),
            playfield: session.playfield(),
            player: session.player(),
            enemies: session.enemies(),
            player_shots: session.player_shots(),
            enemy_shots: session.enemy_shots(),
            score: session.score(),
            games_over: session.games_over(),
            fps,
        }
    }
}

/// Draws the playfield, the HUD and the menu/pause overlays
#[derive(Debug, Default)]
pub struct GameRenderer;

impl GameRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Renders a full frame into the terminal, centring the playfield
    pub fn draw(&self, frame: &mut Frame, view: &RenderView) {
        let area = frame.area();
        let field = centered_field(area, view.playfield);

        {
            let mut surface =
                TerminalSurface::new(frame.buffer_mut(), field, view.playfield.cell_size);
            self.render(&mut surface, view);
        }

        // Controls hint below the playfield
        let hint_y = field.y + field.height;
        if hint_y < area.y + area.height {
            let hint = Line::from(vec![
                Span::styled(
                    "[Enter: Play] [Esc: Pause] [Arrows: Move] [Space: Fire] [Q: Quit]",
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(
                    format!("  FPS: {}", view.fps),
                    Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
                ),
            ]);
            let hint_area = Rect {
                x: area.x,
                y: hint_y,
                width: area.width,
                height: 1,
            };
            frame.render_widget(Paragraph::new(hint).centered(), hint_area);
        }
    }

    /// Renders the current state onto any surface
    pub fn render(&self, surface: &mut impl Surface, view: &RenderView) {
        surface.fill(BACKGROUND);

        let cell = view.playfield.cell_size;
        for enemy in view.enemies {
            let rect = enemy.sprite_rect(cell);
            surface.blit(Sprite::Enemy, (rect.x, rect.y));
        }

        let ship = view.player.sprite_rect(cell);
        surface.blit(Sprite::Ship, (ship.x, ship.y));

        for projectile in view.player_shots.iter().chain(view.enemy_shots) {
            surface.fill_rect(projectile.rect, projectile.color);
        }

        self.render_hud(surface, view);

        match view.mode {
            GameMode::Menu => self.render_menu(surface, view),
            GameMode::Paused => self.render_pause(surface, view),
            GameMode::Playing => {}
        }
    }

    fn render_hud(&self, surface: &mut impl Surface, view: &RenderView) {
        let cell = i32::from(view.playfield.cell_size);
        surface.draw_text(&format!("HP : {}", view.player.health), (10, 10), INK);
        surface.draw_text(&format!("Score : {}", view.score), (26 * cell, 10), INK);
    }

    fn render_menu(&self, surface: &mut impl Surface, view: &RenderView) {
        let width = view.playfield.width_px();
        let height = view.playfield.height_px();
        let panel_height = (height as f32 / 2.5) as i32;

        surface.fill_rect(
            PixelRect::new(0, height / 2 - 150, width, panel_height),
            Color::Black,
        );
        surface.fill_rect(
            PixelRect::new(10, height / 2 - 140, width - 20, panel_height - 20),
            BACKGROUND,
        );

        if view.games_over > 0 && view.player.health != MAX_HEALTH {
            surface.draw_text("Press Enter To Play Again !", (150, height - 500), INK);
        } else {
            surface.draw_text("Press Enter To Play!", (200, height - 500), INK);
            surface.draw_text("Press 'ESC' To Pause", (200, height - 400), INK);
            surface.draw_text("Press 'Arrow KEYS' To Move", (150, height - 350), INK);
            surface.draw_text("Press 'SPACE' To Shoot", (200, height - 300), INK);
        }
    }

    fn render_pause(&self, surface: &mut impl Surface, view: &RenderView) {
        let cell = i32::from(view.playfield.cell_size);
        surface.fill_rect(PixelRect::new(15 * cell, 15 * cell, 40, 80), Color::Black);
        surface.fill_rect(PixelRect::new(18 * cell, 15 * cell, 40, 80), Color::Black);
    }
}

/// Terminal rectangle for the playfield, centred and clipped to `area`
pub fn centered_field(area: Rect, playfield: &Playfield) -> Rect {
    let width = (playfield.cols.saturating_mul(2)).min(area.width);
    let height = playfield.rows.min(area.height.saturating_sub(1));
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Faction, Vec2};

    #[derive(Debug, Clone, PartialEq)]
    enum DrawCall {
        Fill(Color),
        Rect(PixelRect, Color),
        Blit(Sprite, (i32, i32)),
        Text(String, (i32, i32)),
    }

    #[derive(Default)]
    struct RecordingSurface {
        calls: Vec<DrawCall>,
    }

    impl RecordingSurface {
        fn texts(&self) -> Vec<&str> {
            self.calls
                .iter()
                .filter_map(|call| match call {
                    DrawCall::Text(text, _) => Some(text.as_str()),
                    _ => None,
                })
                .collect()
        }
    }

    impl Surface for RecordingSurface {
        fn fill(&mut self, color: Color) {
            self.calls.push(DrawCall::Fill(color));
        }

        fn fill_rect(&mut self, rect: PixelRect, color: Color) {
            self.calls.push(DrawCall::Rect(rect, color));
        }

        fn blit(&mut self, sprite: Sprite, position: (i32, i32)) {
            self.calls.push(DrawCall::Blit(sprite, position));
        }

        fn draw_text(&mut self, text: &str, position: (i32, i32), _color: Color) {
            self.calls.push(DrawCall::Text(text.to_string(), position));
        }
    }

    fn view<'a>(
        mode: GameMode,
        playfield: &'a Playfield,
        player: &'a Player,
        enemies: &'a [Enemy],
        shots: &'a [Projectile],
    ) -> RenderView<'a> {
        RenderView {
            mode,
            playfield,
            player,
            enemies,
            player_shots: shots,
            enemy_shots: &[],
            score: 30,
            games_over: 0,
            fps: 60,
        }
    }

    #[test]
    fn test_sprites_are_ten_by_five() {
        for sprite in [Sprite::Ship, Sprite::Enemy] {
            assert_eq!(sprite.lines().len(), 5);
            for line in sprite.lines() {
                assert_eq!(line.chars().count(), 10, "{sprite:?}: {line:?}");
            }
        }
    }

    #[test]
    fn test_playing_frame_draws_entities_and_hud() {
        let playfield = Playfield::default();
        let player = Player::default();
        let enemies = [Enemy::new(Vec2::new(10.0, 4.0), 0.1)];
        let shots = [Projectile::new((344, 590), Faction::Player)];
        let mut surface = RecordingSurface::default();

        GameRenderer::new().render(
            &mut surface,
            &view(GameMode::Playing, &playfield, &player, &enemies, &shots),
        );

        assert_eq!(surface.calls[0], DrawCall::Fill(BACKGROUND));
        assert!(surface.calls.contains(&DrawCall::Blit(Sprite::Enemy, (200, 80))));
        assert!(surface.calls.contains(&DrawCall::Blit(Sprite::Ship, (300, 600))));
        assert!(
            surface
                .calls
                .contains(&DrawCall::Rect(PixelRect::new(344, 590, 10, 20), Color::Magenta))
        );
        assert!(
            surface
                .calls
                .contains(&DrawCall::Text("Score : 30".to_string(), (520, 10)))
        );
        assert_eq!(surface.texts(), vec!["HP : 100", "Score : 30"]);
    }

    #[test]
    fn test_menu_shows_instructions_first_time() {
        let playfield = Playfield::default();
        let player = Player::default();
        let mut surface = RecordingSurface::default();

        GameRenderer::new().render(
            &mut surface,
            &view(GameMode::Menu, &playfield, &player, &[], &[]),
        );

        let texts = surface.texts();
        assert!(texts.contains(&"Press Enter To Play!"));
        assert!(texts.contains(&"Press 'SPACE' To Shoot"));
        assert!(!texts.contains(&"Press Enter To Play Again !"));
    }

    #[test]
    fn test_menu_after_game_over_offers_replay() {
        let playfield = Playfield::default();
        let mut player = Player::default();
        player.apply_damage(100);
        let mut surface = RecordingSurface::default();
        let mut render_view = view(GameMode::Menu, &playfield, &player, &[], &[]);
        render_view.games_over = 1;

        GameRenderer::new().render(&mut surface, &render_view);

        let texts = surface.texts();
        assert!(texts.contains(&"Press Enter To Play Again !"));
        assert!(texts.contains(&"HP : 0"));
    }

    #[test]
    fn test_pause_draws_two_bars() {
        let playfield = Playfield::default();
        let player = Player::default();
        let mut surface = RecordingSurface::default();

        GameRenderer::new().render(
            &mut surface,
            &view(GameMode::Paused, &playfield, &player, &[], &[]),
        );

        let bars: Vec<&DrawCall> = surface
            .calls
            .iter()
            .filter(|call| matches!(call, DrawCall::Rect(_, Color::Black)))
            .collect();
        assert_eq!(
            bars,
            vec![
                &DrawCall::Rect(PixelRect::new(300, 300, 40, 80), Color::Black),
                &DrawCall::Rect(PixelRect::new(360, 300, 40, 80), Color::Black),
            ]
        );
    }

    #[test]
    fn test_terminal_surface_maps_pixels_to_cells() {
        let area = Rect::new(0, 0, 72, 38);
        let mut buffer = Buffer::empty(area);
        {
            let mut surface = TerminalSurface::new(&mut buffer, area, 20);
            surface.fill(BACKGROUND);
            surface.draw_text("HP", (20, 40), INK);
            surface.fill_rect(PixelRect::new(344, 590, 10, 20), Color::Magenta);
        }

        assert_eq!(buffer[(2, 2)].symbol(), "H");
        assert_eq!(buffer[(3, 2)].symbol(), "P");
        assert_eq!(buffer[(34, 29)].bg, Color::Magenta);
        assert_eq!(buffer[(0, 0)].bg, BACKGROUND);
    }

    #[test]
    fn test_terminal_surface_clips_offscreen_drawing() {
        let area = Rect::new(0, 0, 20, 10);
        let mut buffer = Buffer::empty(area);
        let mut surface = TerminalSurface::new(&mut buffer, area, 20);

        surface.blit(Sprite::Enemy, (-150, -160));
        surface.blit(Sprite::Ship, (1000, 1000));
        surface.draw_text("far away", (5000, 10), INK);
        surface.fill_rect(PixelRect::new(-50, 150, 400, 400), Color::Red);

        assert_eq!(buffer[(0, 7)].bg, Color::Red);
        assert_eq!(buffer[(19, 9)].bg, Color::Red);
        assert_ne!(buffer[(0, 6)].bg, Color::Red);
    }

    #[test]
    fn test_centered_field_fits_terminal() {
        let playfield = Playfield::default();
        let field = centered_field(Rect::new(0, 0, 100, 50), &playfield);
        assert_eq!(field, Rect::new(14, 0, 72, 38));

        let small = centered_field(Rect::new(0, 0, 40, 20), &playfield);
        assert_eq!(small, Rect::new(0, 0, 40, 19));
    }
}
