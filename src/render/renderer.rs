use std::collections::HashSet;

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use crate::game::{
    CollisionReason, EffectKind, FoodKind, GamePhase, HighScoreEntry, Position, Snapshot,
};

/// Session data shown next to the board that the snapshot does not carry
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoreBoard<'a> {
    pub high_scores: &'a [HighScoreEntry],
    /// Place earned by the round that just ended
    pub new_rank: Option<usize>,
}

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, snapshot: &Snapshot, board: ScoreBoard<'_>) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Game area
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        let stats = self.render_stats(snapshot);
        frame.render_widget(stats, chunks[0]);

        // Center the game grid horizontally
        let game_area = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(10),
                Constraint::Percentage(80),
                Constraint::Percentage(10),
            ])
            .split(chunks[1])[1];

        match snapshot.phase {
            GamePhase::Menu => frame.render_widget(self.render_menu(snapshot, board), game_area),
            GamePhase::Playing => frame.render_widget(self.render_grid(snapshot), game_area),
            GamePhase::Paused => {
                frame.render_widget(self.render_grid(snapshot), game_area);
                let popup = centered(game_area, 30, 5);
                frame.render_widget(Clear, popup);
                frame.render_widget(self.render_paused(), popup);
            }
            GamePhase::GameOver => {
                frame.render_widget(self.render_game_over(snapshot, board), game_area)
            }
        }

        let controls = self.render_controls(snapshot.phase);
        frame.render_widget(controls, chunks[2]);
    }

    fn render_grid(&self, snapshot: &Snapshot) -> Paragraph<'static> {
        let body: HashSet<Position> = snapshot.snake.iter().skip(1).copied().collect();
        let obstacles: HashSet<Position> = snapshot.obstacles.iter().copied().collect();
        let head = snapshot.head();

        let mut lines = Vec::with_capacity(snapshot.grid_height);
        for y in 0..snapshot.grid_height {
            let mut spans = Vec::with_capacity(snapshot.grid_width);

            for x in 0..snapshot.grid_width {
                let pos = Position::new(x as i32, y as i32);

                let cell = if Some(pos) == head {
                    let color = if is_invincible(snapshot) {
                        Color::Magenta
                    } else {
                        Color::Cyan
                    };
                    Span::styled("■ ", Style::default().fg(color).add_modifier(Modifier::BOLD))
                } else if body.contains(&pos) {
                    Span::styled("□ ", Style::default().fg(Color::Green))
                } else if obstacles.contains(&pos) {
                    Span::styled("█ ", Style::default().fg(Color::Gray))
                } else if let Some(food) = snapshot.food_at(pos) {
                    let (glyph, color) = food_glyph(food.kind);
                    Span::styled(glyph, Style::default().fg(color).add_modifier(Modifier::BOLD))
                } else {
                    Span::styled(". ", Style::default().fg(Color::DarkGray))
                };

                spans.push(cell);
            }

            lines.push(Line::from(spans));
        }

        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Double)
                    .border_style(Style::default().fg(Color::White))
                    .title(" Snake "),
            )
            .alignment(Alignment::Center)
    }

    fn render_stats(&self, snapshot: &Snapshot) -> Paragraph<'static> {
        let label = Style::default().fg(Color::Yellow);
        let value = Style::default().fg(Color::White);

        let mut spans = vec![
            Span::styled("Score: ", label),
            Span::styled(snapshot.score.to_string(), value.add_modifier(Modifier::BOLD)),
            Span::raw("    "),
            Span::styled("Best: ", label),
            Span::styled(snapshot.best_score.to_string(), value),
            Span::raw("    "),
            Span::styled("Level: ", label),
            Span::styled(snapshot.level.to_string(), value),
            Span::raw("    "),
            Span::styled("Length: ", label),
            Span::styled(snapshot.snake.len().to_string(), value),
        ];
        if snapshot.combo > 1 {
            spans.push(Span::raw("    "));
            spans.push(Span::styled(
                format!("Combo x{}", snapshot.combo),
                Style::default().fg(Color::LightRed).add_modifier(Modifier::BOLD),
            ));
        }

        let mut lines = vec![Line::from(spans)];
        if !snapshot.active_effects.is_empty() {
            let effects: Vec<Span> = snapshot
                .active_effects
                .iter()
                .map(|effect| {
                    Span::styled(
                        format!(
                            " {} {:.1}s ",
                            effect_label(effect.kind),
                            f64::from(effect.remaining_ticks) * snapshot.tick_interval.as_secs_f64()
                        ),
                        Style::default().fg(effect_color(effect.kind)),
                    )
                })
                .collect();
            lines.push(Line::from(effects));
        }

        Paragraph::new(lines).alignment(Alignment::Center)
    }

    fn render_menu(&self, snapshot: &Snapshot, board: ScoreBoard<'_>) -> Paragraph<'static> {
        let mut text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                "SNAKE ARCADE",
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Difficulty: ", Style::default().fg(Color::Yellow)),
                Span::styled(snapshot.difficulty.label(), Style::default().fg(Color::White)),
                Span::raw("    "),
                Span::styled("Board: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    format!("{}x{}", snapshot.grid_width, snapshot.grid_height),
                    Style::default().fg(Color::White),
                ),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Press ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "Enter",
                    Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to start", Style::default().fg(Color::Gray)),
            ]),
            Line::from(""),
        ];
        text.extend(high_score_lines(board.high_scores));

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(Color::Green)),
        )
    }

    fn render_paused(&self) -> Paragraph<'static> {
        let text = vec![
            Line::from(vec![Span::styled(
                "PAUSED",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            )]),
            Line::from(vec![
                Span::styled("P", Style::default().fg(Color::Green)),
                Span::raw(" resume | "),
                Span::styled("M", Style::default().fg(Color::Cyan)),
                Span::raw(" menu"),
            ]),
        ];

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow)),
        )
    }

    fn render_game_over(&self, snapshot: &Snapshot, board: ScoreBoard<'_>) -> Paragraph<'static> {
        let mut text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                "GAME OVER",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )]),
        ];
        if let Some(reason) = snapshot.last_collision {
            text.push(Line::from(vec![Span::styled(
                collision_label(reason),
                Style::default().fg(Color::Gray),
            )]));
        }
        text.push(Line::from(""));
        text.push(Line::from(vec![
            Span::styled("Final Score: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                snapshot.score.to_string(),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ),
        ]));
        if let Some(rank) = board.new_rank {
            text.push(Line::from(vec![Span::styled(
                format!("New high score! Rank #{}", rank),
                Style::default().fg(Color::LightYellow).add_modifier(Modifier::BOLD),
            )]));
        }
        text.push(Line::from(""));
        text.push(Line::from(vec![
            Span::styled("Press ", Style::default().fg(Color::Gray)),
            Span::styled("R", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
            Span::styled(" to restart, ", Style::default().fg(Color::Gray)),
            Span::styled("M", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
            Span::styled(" for menu or ", Style::default().fg(Color::Gray)),
            Span::styled("Q", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
            Span::styled(" to quit", Style::default().fg(Color::Gray)),
        ]));
        text.push(Line::from(""));
        text.extend(high_score_lines(board.high_scores));

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        )
    }

    fn render_controls(&self, phase: GamePhase) -> Paragraph<'static> {
        let spans = match phase {
            GamePhase::Menu => vec![
                Span::styled("Enter", Style::default().fg(Color::Green)),
                Span::raw(" to play | "),
                Span::styled("Q", Style::default().fg(Color::Red)),
                Span::raw(" to quit"),
            ],
            _ => vec![
                Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
                Span::raw(" or "),
                Span::styled("WASD", Style::default().fg(Color::Cyan)),
                Span::raw(" to move | "),
                Span::styled("P", Style::default().fg(Color::Yellow)),
                Span::raw(" to pause | "),
                Span::styled("Q", Style::default().fg(Color::Red)),
                Span::raw(" to quit"),
            ],
        };

        Paragraph::new(vec![Line::from(spans)]).alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

fn is_invincible(snapshot: &Snapshot) -> bool {
    snapshot
        .active_effects
        .iter()
        .any(|effect| effect.kind == EffectKind::Invincibility)
}

fn food_glyph(kind: FoodKind) -> (&'static str, Color) {
    match kind {
        FoodKind::Normal => ("O ", Color::Red),
        FoodKind::Bonus => ("$ ", Color::Yellow),
        FoodKind::SpeedUp => ("> ", Color::LightGreen),
        FoodKind::SpeedDown => ("< ", Color::LightBlue),
        FoodKind::DoublePoints => ("2 ", Color::LightYellow),
        FoodKind::Invincibility => ("* ", Color::Magenta),
        FoodKind::GrowthBoost => ("+ ", Color::LightCyan),
    }
}

fn effect_label(kind: EffectKind) -> &'static str {
    match kind {
        EffectKind::SpeedUp => "Speed Up",
        EffectKind::SpeedDown => "Slow Down",
        EffectKind::DoublePoints => "Double Points",
        EffectKind::Invincibility => "Invincible",
    }
}

fn effect_color(kind: EffectKind) -> Color {
    match kind {
        EffectKind::SpeedUp => Color::LightGreen,
        EffectKind::SpeedDown => Color::LightBlue,
        EffectKind::DoublePoints => Color::LightYellow,
        EffectKind::Invincibility => Color::Magenta,
    }
}

fn collision_label(reason: CollisionReason) -> &'static str {
    match reason {
        CollisionReason::WallCollision => "You hit the wall",
        CollisionReason::ObstacleCollision => "You hit an obstacle",
        CollisionReason::SelfCollision => "You bit your own tail",
    }
}

fn high_score_lines(entries: &[HighScoreEntry]) -> Vec<Line<'static>> {
    if entries.is_empty() {
        return Vec::new();
    }

    let mut lines = vec![Line::from(vec![Span::styled(
        "High Scores",
        Style::default().fg(Color::Yellow).add_modifier(Modifier::UNDERLINED),
    )])];
    for (i, entry) in entries.iter().enumerate() {
        lines.push(Line::from(format!(
            "{:>2}. {:<12} {:>6}  {}",
            i + 1,
            entry.name,
            entry.score,
            entry.timestamp.format("%Y-%m-%d")
        )));
    }
    lines
}

/// Rect of at most `width` x `height` centred in `area`
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
