use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Clear, Paragraph, Widget, Wrap};
use rust_i18n::t;

use crate::session::matching::{CardStatus, MatchSession};
use crate::ui::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CursorMove {
    Left,
    Right,
    Up,
    Down,
}

/// Move a grid cursor over `len` cells laid out `columns` wide. Horizontal
/// moves wrap across rows; vertical moves stop at the edges.
pub fn move_cursor(cursor: usize, len: usize, columns: usize, step: CursorMove) -> usize {
    if len == 0 {
        return 0;
    }
    let columns = columns.max(1);
    let cursor = cursor.min(len - 1);
    match step {
        CursorMove::Left => (cursor + len - 1) % len,
        CursorMove::Right => (cursor + 1) % len,
        CursorMove::Up => cursor.checked_sub(columns).unwrap_or(cursor),
        CursorMove::Down => {
            let next = cursor + columns;
            if next < len { next } else { cursor }
        }
    }
}

/// Card grid for the matching game.
pub struct MatchBoard<'a> {
    session: &'a MatchSession,
    cursor: usize,
    columns: usize,
    theme: &'a Theme,
}

impl<'a> MatchBoard<'a> {
    pub fn new(session: &'a MatchSession, cursor: usize, columns: usize, theme: &'a Theme) -> Self {
        Self {
            session,
            cursor,
            columns: columns.max(1),
            theme,
        }
    }

    fn render_paused(&self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        Clear.render(area, buf);
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(colors.warning()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let y = inner.y + inner.height.saturating_sub(2) / 2;
        let lines = vec![
            Line::from(Span::styled(
                t!("match.paused").to_string(),
                Style::default()
                    .fg(colors.warning())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                t!("match.paused_body").to_string(),
                Style::default().fg(colors.text_muted()),
            )),
        ];
        let text_area = Rect::new(inner.x, y, inner.width, 2.min(inner.height));
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .render(text_area, buf);
    }
}

impl Widget for MatchBoard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if self.session.is_paused() {
            self.render_paused(area, buf);
            return;
        }

        let colors = &self.theme.colors;
        let cards = self.session.cards();
        if cards.is_empty() {
            return;
        }
        let rows = cards.len().div_ceil(self.columns);
        let row_areas = Layout::default()
            .direction(Direction::Vertical)
            .constraints(vec![Constraint::Ratio(1, rows as u32); rows])
            .split(area);

        for (row_idx, row_area) in row_areas.iter().enumerate() {
            let cells = Layout::default()
                .direction(Direction::Horizontal)
                .constraints(vec![Constraint::Ratio(1, self.columns as u32); self.columns])
                .split(*row_area);

            for (col_idx, cell) in cells.iter().enumerate() {
                let idx = row_idx * self.columns + col_idx;
                let Some(card) = cards.get(idx) else {
                    continue;
                };
                let status = self.session.card_status(card);
                let focused = idx == self.cursor;

                let (border, text, modifier) = match status {
                    CardStatus::Matched => (colors.card_matched(), colors.text_muted(), Modifier::CROSSED_OUT),
                    CardStatus::Wrong => (colors.error(), colors.error(), Modifier::BOLD),
                    CardStatus::Selected => (colors.card_selected(), colors.card_selected(), Modifier::BOLD),
                    CardStatus::Hinted => (colors.card_hinted(), colors.card_hinted(), Modifier::BOLD),
                    CardStatus::Idle => (colors.border(), colors.fg(), Modifier::empty()),
                };
                let border = if focused && status != CardStatus::Matched {
                    colors.border_focused()
                } else {
                    border
                };

                let block = Block::bordered()
                    .border_type(if focused {
                        BorderType::Thick
                    } else {
                        BorderType::Rounded
                    })
                    .border_style(Style::default().fg(border))
                    .style(Style::default().bg(colors.card_bg()));
                let inner = block.inner(*cell);
                block.render(*cell, buf);

                let label = if status == CardStatus::Matched {
                    format!("✓ {}", card.content)
                } else {
                    card.content.clone()
                };
                let height = inner.height.min(
                    (label.chars().count() as u16).div_ceil(inner.width.max(1)).max(1),
                );
                let y = inner.y + inner.height.saturating_sub(height) / 2;
                Paragraph::new(Line::from(Span::styled(
                    label,
                    Style::default().fg(text).add_modifier(modifier),
                )))
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true })
                .render(Rect::new(inner.x, y, inner.width, height), buf);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn horizontal_moves_wrap() {
        assert_eq!(move_cursor(0, 6, 4, CursorMove::Left), 5);
        assert_eq!(move_cursor(5, 6, 4, CursorMove::Right), 0);
        assert_eq!(move_cursor(3, 6, 4, CursorMove::Right), 4);
    }

    #[test]
    fn vertical_moves_stop_at_edges() {
        assert_eq!(move_cursor(1, 6, 4, CursorMove::Up), 1);
        assert_eq!(move_cursor(1, 6, 4, CursorMove::Down), 5);
        assert_eq!(move_cursor(3, 6, 4, CursorMove::Down), 3);
        assert_eq!(move_cursor(5, 6, 4, CursorMove::Up), 1);
    }

    #[test]
    fn empty_board_and_stale_cursor() {
        assert_eq!(move_cursor(3, 0, 4, CursorMove::Right), 0);
        assert_eq!(move_cursor(20, 6, 4, CursorMove::Left), 4);
    }
}
