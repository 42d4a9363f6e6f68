use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Paragraph, Widget, Wrap};
use rust_i18n::t;

use crate::session::flashcard::FlashcardSession;
use crate::ui::components::entry_list::badge;
use crate::ui::theme::Theme;

/// The current card: term and pronunciation on the front, meanings and
/// example on the back.
pub struct FlashcardView<'a> {
    session: &'a FlashcardSession,
    theme: &'a Theme,
}

impl<'a> FlashcardView<'a> {
    pub fn new(session: &'a FlashcardSession, theme: &'a Theme) -> Self {
        Self { session, theme }
    }
}

/// Header counter for the card on screen, e.g. "Card 1/3".
pub fn progress_label(session: &FlashcardSession) -> String {
    t!(
        "flash.progress",
        current = session.position(),
        total = session.total()
    )
    .to_string()
}

impl Widget for FlashcardView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let Some(entry) = self.session.current() else {
            return;
        };
        let flipped = self.session.is_flipped();

        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(if flipped {
                colors.accent()
            } else {
                colors.border_focused()
            }))
            .style(Style::default().bg(colors.card_bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let mut lines: Vec<Line> = Vec::new();
        if !flipped {
            lines.push(Line::from(badge(entry, self.theme)));
            lines.push(Line::raw(""));
            lines.push(Line::from(Span::styled(
                entry.original.clone(),
                Style::default()
                    .fg(colors.fg())
                    .add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from(Span::styled(
                entry.phonetics.clone(),
                Style::default().fg(colors.text_muted()),
            )));
            lines.push(Line::raw(""));
            lines.push(Line::from(Span::styled(
                t!("flash.reveal").to_string(),
                Style::default().fg(colors.text_muted()),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                entry.part_of_speech.clone(),
                Style::default()
                    .fg(colors.text_muted())
                    .add_modifier(Modifier::ITALIC),
            )));
            lines.push(Line::raw(""));
            for meaning in entry.meanings() {
                lines.push(Line::from(Span::styled(
                    meaning.to_string(),
                    Style::default()
                        .fg(colors.accent())
                        .add_modifier(Modifier::BOLD),
                )));
            }
            if !entry.example.is_empty() {
                lines.push(Line::raw(""));
                lines.push(Line::from(Span::styled(
                    format!("\"{}\"", entry.example),
                    Style::default()
                        .fg(colors.fg())
                        .add_modifier(Modifier::ITALIC),
                )));
            }
        }

        // Vertically center the text block.
        let height = (lines.len() as u16).min(inner.height);
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Fill(1),
                Constraint::Length(height),
                Constraint::Fill(1),
            ])
            .split(inner);
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(rows[1], buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::{EntryType, VocabEntry};
    use crate::session::flashcard::FLIP_BACK_DELAY;
    use crate::session::random::ScriptedSource;

    fn deck(n: usize) -> Vec<VocabEntry> {
        (0..n)
            .map(|i| VocabEntry {
                id: format!("id{i}"),
                original: format!("term {i}"),
                phonetics: String::new(),
                part_of_speech: String::new(),
                vietnamese_meaning: format!("nghĩa {i}"),
                example: String::new(),
                entry_type: EntryType::Word,
                timestamp: i as i64,
            })
            .collect()
    }

    #[test]
    fn progress_label_counts_from_one() {
        let mut session =
            FlashcardSession::new(&deck(3), &mut ScriptedSource::identity()).unwrap();
        assert!(progress_label(&session).ends_with("1/3"));

        session.decide(true);
        session.advance(FLIP_BACK_DELAY);
        assert!(progress_label(&session).ends_with("2/3"));
    }
}
