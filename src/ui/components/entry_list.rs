use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::entry::VocabEntry;
use crate::ui::theme::Theme;

const ROWS_PER_ENTRY: usize = 2;

/// Newest-first list of stored entries, two lines each.
pub struct EntryList<'a> {
    entries: &'a [VocabEntry],
    selected: usize,
    title: String,
    empty_text: String,
    theme: &'a Theme,
}

impl<'a> EntryList<'a> {
    pub fn new(entries: &'a [VocabEntry], selected: usize, title: String, theme: &'a Theme) -> Self {
        Self {
            entries,
            selected,
            title,
            empty_text: String::new(),
            theme,
        }
    }

    pub fn empty_text(mut self, text: String) -> Self {
        self.empty_text = text;
        self
    }
}

/// First entry index to draw so `selected` stays on screen.
pub fn scroll_offset(selected: usize, visible: usize) -> usize {
    if visible == 0 {
        return selected;
    }
    selected.saturating_sub(visible - 1)
}

pub fn badge<'s>(entry: &VocabEntry, theme: &Theme) -> Span<'s> {
    Span::styled(
        format!("[{}]", entry.entry_type.label()),
        Style::default()
            .fg(theme.colors.entry_type(entry.entry_type))
            .add_modifier(Modifier::BOLD),
    )
}

impl Widget for EntryList<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let block = Block::bordered()
            .title(format!(" {} ", self.title))
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        if self.entries.is_empty() {
            let y = inner.y + inner.height / 2;
            Paragraph::new(Line::from(Span::styled(
                self.empty_text,
                Style::default().fg(colors.text_muted()),
            )))
            .alignment(Alignment::Center)
            .render(Rect::new(inner.x, y, inner.width, 1.min(inner.height)), buf);
            return;
        }

        let visible = (inner.height as usize / ROWS_PER_ENTRY).max(1);
        let offset = scroll_offset(self.selected, visible);

        let mut lines: Vec<Line> = Vec::with_capacity(visible * ROWS_PER_ENTRY);
        for (i, entry) in self.entries.iter().enumerate().skip(offset).take(visible) {
            let is_selected = i == self.selected;
            let marker = if is_selected { "▶ " } else { "  " };
            let term_style = if is_selected {
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD)
            };
            lines.push(Line::from(vec![
                Span::styled(marker, Style::default().fg(colors.accent())),
                Span::styled(entry.original.clone(), term_style),
                Span::raw(" "),
                Span::styled(
                    entry.phonetics.clone(),
                    Style::default().fg(colors.text_muted()),
                ),
                Span::raw(" "),
                badge(entry, self.theme),
            ]));
            lines.push(Line::from(vec![
                Span::raw("    "),
                Span::styled(
                    entry.first_meaning().to_string(),
                    Style::default().fg(colors.fg()),
                ),
            ]));
        }
        Paragraph::new(lines).render(inner, buf);
    }
}

/// Everything stored for one entry.
pub struct EntryDetail<'a> {
    entry: Option<&'a VocabEntry>,
    title: String,
    example_label: String,
    theme: &'a Theme,
}

impl<'a> EntryDetail<'a> {
    pub fn new(entry: Option<&'a VocabEntry>, title: String, example_label: String, theme: &'a Theme) -> Self {
        Self {
            entry,
            title,
            example_label,
            theme,
        }
    }
}

impl Widget for EntryDetail<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let block = Block::bordered()
            .title(format!(" {} ", self.title))
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let Some(entry) = self.entry else {
            return;
        };

        let mut lines = vec![
            Line::from(Span::styled(
                entry.original.clone(),
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(vec![
                Span::styled(
                    entry.phonetics.clone(),
                    Style::default().fg(colors.text_muted()),
                ),
                Span::raw("  "),
                Span::styled(
                    entry.part_of_speech.clone(),
                    Style::default()
                        .fg(colors.fg())
                        .add_modifier(Modifier::ITALIC),
                ),
            ]),
            Line::from(badge(entry, self.theme)),
            Line::raw(""),
        ];
        for meaning in entry.meanings() {
            lines.push(Line::from(vec![
                Span::styled("• ", Style::default().fg(colors.accent())),
                Span::styled(meaning.to_string(), Style::default().fg(colors.fg())),
            ]));
        }
        if !entry.example.is_empty() {
            lines.push(Line::raw(""));
            lines.push(Line::from(Span::styled(
                format!("{}:", self.example_label),
                Style::default().fg(colors.text_muted()),
            )));
            lines.push(Line::from(Span::styled(
                entry.example.clone(),
                Style::default()
                    .fg(colors.fg())
                    .add_modifier(Modifier::ITALIC),
            )));
        }
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scroll_keeps_selection_visible() {
        assert_eq!(scroll_offset(0, 5), 0);
        assert_eq!(scroll_offset(4, 5), 0);
        assert_eq!(scroll_offset(5, 5), 1);
        assert_eq!(scroll_offset(12, 5), 8);
        assert_eq!(scroll_offset(3, 0), 3);
    }
}
