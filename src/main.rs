use std::io::{self, Write};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};
use rust_i18n::t;
use tracing::{error, info, warn};

use vocabr::app::{App, AppScreen, StatusKind};
use vocabr::config::Config;
use vocabr::entry::EntryType;
use vocabr::event::{AppEvent, EventHandler};
use vocabr::export;
use vocabr::store::entry_store::EntryStore;
use vocabr::store::json_store::{JsonStore, default_data_dir};
use vocabr::trace_init::init_tracing;
use vocabr::ui;
use vocabr::ui::components::entry_list::{EntryDetail, EntryList};
use vocabr::ui::components::flashcard_view::{FlashcardView, progress_label};
use vocabr::ui::components::match_board::{CursorMove, MatchBoard};
use vocabr::ui::components::progress_bar::ProgressBar;
use vocabr::ui::components::summary::{FlashcardResultPanel, MatchResultPanel};
use vocabr::ui::layout::{AppLayout, LayoutTier, pack_hint_lines};
use vocabr::ui::line_input::InputResult;

rust_i18n::i18n!("locales", fallback = "en");

const TICK_RATE: Duration = Duration::from_millis(100);

#[derive(Parser)]
#[command(
    name = "vocabr",
    version,
    about = "Terminal vocabulary builder with AI lookups, flashcards and a matching game"
)]
struct Cli {
    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(short, long, help = "Interface language (vi, en)")]
    locale: Option<String>,

    #[arg(
        long,
        value_name = "TYPE",
        value_parser = parse_entry_type,
        help = "Entry type preselected for new lookups (word, phrase, phrasal_verb, idiom, collocation)"
    )]
    entry_type: Option<EntryType>,

    #[arg(long, help = "Directory holding saved entries, audio and the log")]
    data_dir: Option<PathBuf>,

    #[arg(long, value_name = "DIR", help = "Write the vocabulary list to DIR and exit")]
    export: Option<PathBuf>,
}

fn parse_entry_type(name: &str) -> Result<EntryType, String> {
    EntryType::from_name(name).ok_or_else(|| {
        let names: Vec<&str> = EntryType::ALL.iter().map(|t| t.as_str()).collect();
        format!("expected one of: {}", names.join(", "))
    })
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let first_run = !Config::config_path().exists();
    let mut config = Config::load().unwrap_or_default();
    if let Some(locale) = cli.locale {
        config.locale = locale;
        config.validate();
    }
    if let Some(entry_type) = cli.entry_type {
        config.default_entry_type = entry_type;
    }
    rust_i18n::set_locale(&config.locale);

    let data_dir = cli.data_dir.unwrap_or_else(default_data_dir);
    let _log_guard = init_tracing(&data_dir);
    info!(data_dir = %data_dir.display(), locale = %config.locale, "starting");

    if first_run {
        match Config::default().save() {
            Ok(()) => info!(path = %Config::config_path().display(), "wrote default config"),
            Err(e) => warn!(error = %e, "could not write default config"),
        }
    }

    if let Some(dir) = cli.export {
        return export_headless(&data_dir, &dir);
    }

    let events = EventHandler::new(TICK_RATE);
    let mut app = App::new(config, &data_dir, events.sender());

    if let Some(theme_name) = cli.theme {
        match ui::theme::Theme::load(&theme_name) {
            Some(theme) => {
                let theme: &'static ui::theme::Theme = Box::leak(Box::new(theme));
                app.theme = theme;
            }
            None => {
                let available = ui::theme::Theme::available_themes().join(", ");
                warn!(theme = %theme_name, "unknown theme, keeping {}", app.theme.name);
                eprintln!("Unknown theme '{theme_name}'. Available themes: {available}");
            }
        }
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        error!(error = %err, "terminal loop failed");
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

fn export_headless(data_dir: &std::path::Path, dir: &std::path::Path) -> Result<()> {
    let (store, problem) = EntryStore::open(JsonStore::with_base_dir(data_dir.to_path_buf())?);
    if let Some(problem) = problem {
        eprintln!("{problem}");
    }
    let today = chrono::Local::now().date_naive();
    match export::export_to_dir(store.entries(), dir, today)? {
        Some(path) => println!("{}", t!("status.exported", path = path.display())),
        None => println!("{}", t!("status.export_empty")),
    }
    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    let mut last_frame = Instant::now();
    loop {
        terminal.draw(|frame| render(frame, app))?;

        match events.next()? {
            AppEvent::Key(key) => handle_key(app, key, terminal.size()?.width),
            AppEvent::Tick | AppEvent::Resize(_, _) => {}
            AppEvent::Lookup(reply) => app.finish_lookup(reply),
            AppEvent::Speech(reply) => app.finish_speech(reply),
        }

        let now = Instant::now();
        app.advance(now - last_frame);
        last_frame = now;

        if app.take_bell() {
            let mut out = io::stdout();
            let _ = out.write_all(b"\x07");
            let _ = out.flush();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent, width: u16) {
    if key.kind == KeyEventKind::Release {
        return;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    match app.screen {
        AppScreen::Home => handle_home_key(app, key),
        AppScreen::Flashcards => handle_flashcard_key(app, key),
        AppScreen::Matching => handle_matching_key(app, key, width),
    }
}

fn handle_home_key(app: &mut App, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('x') => return app.delete_selected(),
            KeyCode::Char('s') => return app.speak_selected(),
            KeyCode::Char('f') => return app.start_flashcards(),
            KeyCode::Char('g') => return app.start_matching(),
            KeyCode::Char('e') => return app.export(),
            _ => {}
        }
    }

    if app.suggestion.is_some() {
        match key.code {
            KeyCode::Enter => return app.accept_suggestion(),
            KeyCode::Esc => return app.dismiss_suggestion(),
            _ => {}
        }
    }

    match key.code {
        KeyCode::Tab => app.cycle_entry_type(true),
        KeyCode::BackTab => app.cycle_entry_type(false),
        KeyCode::Up => app.select_prev(),
        KeyCode::Down => app.select_next(),
        _ => match app.input.handle(key) {
            InputResult::Submit => app.submit_input(),
            InputResult::Cancel => {
                app.input.clear();
                app.status = None;
            }
            InputResult::Continue | InputResult::Unhandled => {}
        },
    }
}

fn handle_flashcard_key(app: &mut App, key: KeyEvent) {
    let finished = app.flashcards().is_none_or(|s| s.is_finished());
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.exit_session(),
        KeyCode::Char('r') if finished => app.restart_session(),
        KeyCode::Char(' ') | KeyCode::Enter => app.flash_flip(),
        KeyCode::Char('y') | KeyCode::Right => app.flash_decide(true),
        KeyCode::Char('n') | KeyCode::Left => app.flash_decide(false),
        KeyCode::Char('v') => app.speak_current_card(),
        _ => {}
    }
}

fn handle_matching_key(app: &mut App, key: KeyEvent, width: u16) {
    let columns = LayoutTier::from_area(Rect::new(0, 0, width, 1)).board_columns();
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.exit_session(),
        KeyCode::Left | KeyCode::Char('h') => app.match_move(CursorMove::Left, columns),
        KeyCode::Right | KeyCode::Char('l') => app.match_move(CursorMove::Right, columns),
        KeyCode::Up | KeyCode::Char('k') => app.match_move(CursorMove::Up, columns),
        KeyCode::Down | KeyCode::Char('j') => app.match_move(CursorMove::Down, columns),
        KeyCode::Enter | KeyCode::Char(' ') => {
            app.match_select();
        }
        KeyCode::Char('p') => app.match_toggle_pause(),
        KeyCode::Char('i') => app.match_hint(),
        KeyCode::Char('s') => app.match_shuffle(),
        KeyCode::Char('r') => app.restart_session(),
        _ => {}
    }
}

fn entry_type_name(entry_type: EntryType) -> String {
    match entry_type {
        EntryType::Word => t!("entry_type.word"),
        EntryType::Phrase => t!("entry_type.phrase"),
        EntryType::PhrasalVerb => t!("entry_type.phrasal_verb"),
        EntryType::Idiom => t!("entry_type.idiom"),
        EntryType::Collocation => t!("entry_type.collocation"),
    }
    .to_string()
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let bg = Block::default().style(Style::default().bg(colors.bg()));
    frame.render_widget(bg, area);

    match app.screen {
        AppScreen::Home => render_home(frame, app),
        AppScreen::Flashcards => render_flashcards(frame, app),
        AppScreen::Matching => render_matching(frame, app),
    }
}

fn render_header(frame: &mut ratatui::Frame, app: &App, area: Rect, title: &str, info: String) {
    let colors = &app.theme.colors;
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            format!(" {title} "),
            Style::default()
                .fg(colors.header_fg())
                .bg(colors.header_bg())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            info,
            Style::default()
                .fg(colors.text_muted())
                .bg(colors.header_bg()),
        ),
    ]))
    .style(Style::default().bg(colors.header_bg()));
    frame.render_widget(header, area);
}

fn render_footer(frame: &mut ratatui::Frame, app: &App, area: Rect, lines: Vec<String>) {
    let colors = &app.theme.colors;
    let footer = Paragraph::new(
        lines
            .into_iter()
            .map(|l| Line::from(Span::styled(l, Style::default().fg(colors.text_muted()))))
            .collect::<Vec<_>>(),
    );
    frame.render_widget(footer, area);
}

fn render_home(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let hints = [
        t!("home.hint_add").to_string(),
        t!("home.hint_type").to_string(),
        t!("home.hint_select").to_string(),
        t!("home.hint_delete").to_string(),
        t!("home.hint_speak").to_string(),
        t!("home.hint_flashcards").to_string(),
        t!("home.hint_matching").to_string(),
        t!("home.hint_export").to_string(),
        t!("home.hint_quit").to_string(),
    ];
    let hint_refs: Vec<&str> = hints.iter().map(String::as_str).collect();
    let footer_lines = pack_hint_lines(&hint_refs, area.width as usize);
    let app_layout = AppLayout::new(area, footer_lines.len() as u16);

    render_header(
        frame,
        app,
        app_layout.header,
        &t!("app.name"),
        format!(" {}", t!("app.tagline")),
    );

    let main = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(4),
        ])
        .split(app_layout.main);

    // Input field with the chosen entry type in the border title.
    let title = format!(
        " {} | {}: < {} > ",
        t!("home.input_title"),
        t!("home.type_label"),
        entry_type_name(app.entry_type)
    );
    let input_block = Block::bordered()
        .title(title)
        .border_style(Style::default().fg(colors.border_focused()));
    let (before, cursor, after) = app.input.render_parts();
    let input_line = if app.input.value().is_empty() {
        Line::from(vec![
            Span::styled(" ", Style::default().bg(colors.fg()).fg(colors.bg())),
            Span::styled(
                t!("home.input_placeholder").to_string(),
                Style::default().fg(colors.text_muted()),
            ),
        ])
    } else {
        let cursor_text = cursor.map_or_else(|| " ".to_string(), |c| c.to_string());
        Line::from(vec![
            Span::styled(before.to_string(), Style::default().fg(colors.fg())),
            Span::styled(cursor_text, Style::default().bg(colors.fg()).fg(colors.bg())),
            Span::styled(after.to_string(), Style::default().fg(colors.fg())),
        ])
    };
    frame.render_widget(Paragraph::new(input_line).block(input_block), main[0]);

    // One-line status: pending lookup, suggestion, or last message.
    let status_line = if let Some(input) = &app.pending_lookup {
        Span::styled(
            format!(" {}", t!("home.looking_up", input = input)),
            Style::default().fg(colors.accent()),
        )
    } else if let Some(word) = &app.suggestion {
        Span::styled(
            format!(" {}", t!("home.suggestion", word = word)),
            Style::default()
                .fg(colors.warning())
                .add_modifier(Modifier::BOLD),
        )
    } else if let Some(term) = &app.speaking {
        Span::styled(
            format!(" {}", t!("status.speaking", word = term)),
            Style::default().fg(colors.text_muted()),
        )
    } else if let Some(status) = &app.status {
        let color = match status.kind {
            StatusKind::Info => colors.success(),
            StatusKind::Error => colors.error(),
        };
        Span::styled(format!(" {}", status.text), Style::default().fg(color))
    } else {
        Span::raw("")
    };
    frame.render_widget(Paragraph::new(Line::from(status_line)), main[1]);

    let list_area = main[2];
    let (list_area, detail_area) = if app_layout.tier.show_detail_pane() {
        let split = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(list_area);
        (split[0], Some(split[1]))
    } else {
        (list_area, None)
    };

    let list = EntryList::new(
        app.store.entries(),
        app.selected,
        t!("home.entries_title", count = app.store.len()).to_string(),
        app.theme,
    )
    .empty_text(t!("home.empty").to_string());
    frame.render_widget(list, list_area);

    if let Some(detail_area) = detail_area {
        let detail = EntryDetail::new(
            app.selected_entry(),
            t!("home.detail_title").to_string(),
            t!("flash.example").to_string(),
            app.theme,
        );
        frame.render_widget(detail, detail_area);
    }

    render_footer(frame, app, app_layout.footer, footer_lines);
}

fn render_flashcards(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let Some(session) = app.flashcards() else {
        return;
    };

    if let Some(summary) = session.summary() {
        let centered = ui::layout::centered_rect(60, 60, area);
        frame.render_widget(FlashcardResultPanel::new(&summary, app.theme), centered);
        return;
    }

    let hints = [
        t!("flash.hint_flip").to_string(),
        t!("flash.hint_learned").to_string(),
        t!("flash.hint_not_learned").to_string(),
        t!("flash.hint_speak").to_string(),
        t!("flash.hint_exit").to_string(),
    ];
    let hint_refs: Vec<&str> = hints.iter().map(String::as_str).collect();
    let footer_lines = pack_hint_lines(&hint_refs, area.width as usize);
    let app_layout = AppLayout::new(area, footer_lines.len() as u16);

    render_header(
        frame,
        app,
        app_layout.header,
        &t!("flash.title"),
        format!(" {}", progress_label(session)),
    );

    let main = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(6)])
        .split(app_layout.main);

    let progress = ProgressBar::new(&t!("flash.title"), session.progress(), app.theme)
        .value_text(format!("{}/{}", session.position(), session.total()));
    frame.render_widget(progress, main[0]);

    let card_area = ui::layout::centered_rect(70, 90, main[1]);
    frame.render_widget(FlashcardView::new(session, app.theme), card_area);

    render_footer(frame, app, app_layout.footer, footer_lines);
}

fn render_matching(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;
    let Some(game) = app.matching() else {
        return;
    };

    if let Some(summary) = game.summary() {
        let centered = ui::layout::centered_rect(60, 60, area);
        frame.render_widget(MatchResultPanel::new(&summary, app.theme), centered);
        return;
    }

    let hints = [
        t!("match.hint_move").to_string(),
        t!("match.hint_pick").to_string(),
        t!("match.hint_hint").to_string(),
        t!("match.hint_shuffle").to_string(),
        t!("match.hint_pause").to_string(),
        t!("match.hint_reset").to_string(),
        t!("match.hint_exit").to_string(),
    ];
    let hint_refs: Vec<&str> = hints.iter().map(String::as_str).collect();
    let footer_lines = pack_hint_lines(&hint_refs, area.width as usize);
    let app_layout = AppLayout::new(area, footer_lines.len() as u16);

    render_header(
        frame,
        app,
        app_layout.header,
        &t!("match.title"),
        format!(
            " {} | {}",
            t!("match.matched", matched = game.matched_count(), pairs = game.pairs()),
            t!("match.hints_left", count = game.hints_left())
        ),
    );

    let main = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(6)])
        .split(app_layout.main);

    // Countdown turns red in its last fifth.
    let ratio = game.time_ratio();
    let fill = if ratio <= 0.2 {
        colors.error()
    } else if ratio <= 0.5 {
        colors.warning()
    } else {
        colors.bar_filled()
    };
    let timer = ProgressBar::new(&t!("match.time"), ratio, app.theme)
        .value_text(t!("match.seconds", seconds = game.time_left()).to_string())
        .fill(fill);
    frame.render_widget(timer, main[0]);

    let board = MatchBoard::new(
        game,
        app.board_cursor,
        app_layout.tier.board_columns(),
        app.theme,
    );
    frame.render_widget(board, main[1]);

    render_footer(frame, app, app_layout.footer, footer_lines);
}
