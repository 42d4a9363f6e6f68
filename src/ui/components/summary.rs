use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};
use rust_i18n::t;

use crate::session::result::{FlashcardSummary, MatchOutcome, MatchSummary};
use crate::ui::theme::{Theme, ThemeColors};

fn accuracy_color(colors: &ThemeColors, accuracy: u32) -> Color {
    if accuracy >= 90 {
        colors.success()
    } else if accuracy >= 70 {
        colors.warning()
    } else {
        colors.error()
    }
}

fn stat_line<'s>(label: String, value: String, value_style: Style, colors: &ThemeColors) -> Line<'s> {
    Line::from(vec![
        Span::styled(format!("  {label:<18}"), Style::default().fg(colors.fg())),
        Span::styled(value, value_style.add_modifier(Modifier::BOLD)),
    ])
}

/// Shared frame: bordered panel, centered headline, stat rows, key hints.
fn render_panel(
    area: Rect,
    buf: &mut Buffer,
    theme: &Theme,
    headline: (String, Color),
    stats: Vec<Line<'_>>,
    hints: String,
) {
    let colors = &theme.colors;
    let block = Block::bordered()
        .border_style(Style::default().fg(headline.1))
        .style(Style::default().bg(colors.bg()));
    let inner = block.inner(area);
    block.render(area, buf);

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(stats.len() as u16 + 1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(inner);

    Paragraph::new(Line::from(Span::styled(
        headline.0,
        Style::default()
            .fg(headline.1)
            .add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center)
    .render(layout[0], buf);

    Paragraph::new(stats).render(layout[1], buf);

    Paragraph::new(Line::from(Span::styled(
        hints,
        Style::default().fg(colors.accent()),
    )))
    .alignment(Alignment::Center)
    .render(layout[3], buf);
}

pub struct MatchResultPanel<'a> {
    pub summary: &'a MatchSummary,
    pub theme: &'a Theme,
}

impl<'a> MatchResultPanel<'a> {
    pub fn new(summary: &'a MatchSummary, theme: &'a Theme) -> Self {
        Self { summary, theme }
    }
}

impl Widget for MatchResultPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let s = self.summary;
        let headline = match s.outcome {
            MatchOutcome::Win => (t!("match.win").to_string(), colors.success()),
            MatchOutcome::Timeout => (t!("match.timeout").to_string(), colors.error()),
        };

        let stats = vec![
            stat_line(
                t!("match.matched", matched = s.matched, pairs = s.pairs).to_string(),
                String::new(),
                Style::default(),
                colors,
            ),
            stat_line(
                t!("match.correct").to_string(),
                s.correct.to_string(),
                Style::default().fg(colors.success()),
                colors,
            ),
            stat_line(
                t!("match.incorrect").to_string(),
                s.incorrect.to_string(),
                Style::default().fg(if s.incorrect == 0 {
                    colors.success()
                } else {
                    colors.error()
                }),
                colors,
            ),
            stat_line(
                t!("match.accuracy").to_string(),
                format!("{}%", s.accuracy),
                Style::default().fg(accuracy_color(colors, s.accuracy)),
                colors,
            ),
            stat_line(
                t!("match.time_left").to_string(),
                format!("{}s / {}s", s.time_left, s.time_budget),
                Style::default().fg(colors.fg()),
                colors,
            ),
        ];
        render_panel(
            area,
            buf,
            self.theme,
            headline,
            stats,
            t!("match.result_hints").to_string(),
        );
    }
}

pub struct FlashcardResultPanel<'a> {
    pub summary: &'a FlashcardSummary,
    pub theme: &'a Theme,
}

impl<'a> FlashcardResultPanel<'a> {
    pub fn new(summary: &'a FlashcardSummary, theme: &'a Theme) -> Self {
        Self { summary, theme }
    }
}

impl Widget for FlashcardResultPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let s = self.summary;
        let stats = vec![
            stat_line(
                t!("flash.total").to_string(),
                s.total.to_string(),
                Style::default().fg(colors.fg()),
                colors,
            ),
            stat_line(
                t!("flash.learned").to_string(),
                s.learned.to_string(),
                Style::default().fg(colors.success()),
                colors,
            ),
            stat_line(
                t!("flash.not_learned").to_string(),
                s.not_learned.to_string(),
                Style::default().fg(if s.not_learned == 0 {
                    colors.success()
                } else {
                    colors.warning()
                }),
                colors,
            ),
        ];
        render_panel(
            area,
            buf,
            self.theme,
            (t!("flash.done_title").to_string(), colors.accent()),
            stats,
            t!("flash.done_hints").to_string(),
        );
    }
}
