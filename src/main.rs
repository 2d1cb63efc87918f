mod app;
mod config;
mod engine;
mod error;
mod event;
mod lesson;
mod session;
mod sinks;
mod store;
mod timer;
mod ui;

use std::io;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use app::{App, AppScreen};
use engine::level::level_descriptors;
use engine::validate::KeyInput;
use event::{AppEvent, EventHandler};
use ui::hint_row::HintRow;
use ui::summary::SummaryPanel;
use ui::word_area::WordArea;

#[derive(Parser)]
#[command(
    name = "speldr",
    version,
    about = "Terminal spelling and dictation trainer"
)]
struct Cli {
    #[arg(short = 'n', long, help = "Lesson name")]
    lesson: Option<String>,

    #[arg(short, long, help = "Practice level key (e.g. progressive)")]
    level: Option<String>,

    #[arg(short, long, help = "Number of words per round")]
    words: Option<usize>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut app = App::new();

    if let Some(lesson) = cli.lesson {
        app.config.lesson = lesson;
    }
    if let Some(level) = cli.level {
        if engine::level::LevelKey::parse(&level).is_none() {
            return Err(error::EngineError::UnknownLevel(level).into());
        }
        app.config.level = level;
    }
    if let Some(words) = cli.words {
        app.config.words_per_round = words;
    }
    app.config.validate();
    if let Some(key) = engine::level::LevelKey::parse(&app.config.level) {
        app.menu_selected = key.index();
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new(Duration::from_millis(50));

    let result = run_app(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app))?;

        match events.next()? {
            AppEvent::Key(key) => handle_key(app, key),
            AppEvent::Tick => app.tick(),
            AppEvent::Resize(_, _) => {}
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    match app.screen {
        AppScreen::Menu => handle_menu_key(app, key),
        AppScreen::Round => handle_round_key(app, key),
        AppScreen::Summary => handle_summary_key(app, key),
    }
}

fn handle_menu_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Up | KeyCode::Char('k') => app.menu_prev(),
        KeyCode::Down | KeyCode::Char('j') => app.menu_next(),
        KeyCode::Left | KeyCode::Char('h') => app.cycle_lesson(-1),
        KeyCode::Right | KeyCode::Char('l') => app.cycle_lesson(1),
        KeyCode::Char(ch @ '1'..='6') => {
            app.menu_selected = ch as usize - '1' as usize;
            app.start_round();
        }
        KeyCode::Enter => app.start_round(),
        _ => {}
    }
}

fn handle_round_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.abandon_round(),
        KeyCode::Tab => {
            app.with_session(|session, ctx| session.skip_word(ctx));
        }
        KeyCode::Char('r') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.with_session(|session, ctx| session.replay_audio(ctx));
        }
        _ => {
            let input = key_input(&key);
            app.with_session(|session, ctx| session.handle_key(input, ctx));
        }
    }
}

fn handle_summary_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('r') => app.start_round(),
        KeyCode::Char('q') | KeyCode::Esc | KeyCode::Enter => {
            app.session = None;
            app.go_to_menu();
        }
        _ => {}
    }
}

fn key_input(key: &KeyEvent) -> KeyInput {
    match key.code {
        KeyCode::Char(ch) => KeyInput::Char(ch),
        KeyCode::Backspace => KeyInput::Backspace,
        KeyCode::Enter => KeyInput::Enter,
        KeyCode::Modifier(_) => KeyInput::Shift,
        _ => KeyInput::Other,
    }
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    match app.screen {
        AppScreen::Menu => render_menu(frame, app),
        AppScreen::Round => render_round(frame, app),
        AppScreen::Summary => render_summary(frame, app),
    }
}

fn render_menu(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            " speldr ",
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  lesson: < {} >", app.config.lesson),
            Style::default().fg(Color::Gray),
        ),
    ]));
    frame.render_widget(header, layout[0]);

    let mut lines = vec![Line::default()];
    for (i, descriptor) in level_descriptors().iter().enumerate() {
        let selected = i == app.menu_selected;
        let indicator = if selected { " > " } else { "   " };
        let style = if selected {
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        lines.push(Line::from(Span::styled(
            format!("{indicator}[{}] {}", i + 1, descriptor.display_name),
            style,
        )));
    }
    if let Some(status) = &app.status {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            format!("   {status}"),
            Style::default().fg(Color::Red),
        )));
    }
    let menu_area = ui::centered_rect(50, 80, layout[1]);
    frame.render_widget(Paragraph::new(lines), menu_area);

    let footer = Paragraph::new(Line::from(Span::styled(
        " [1-6] Start  [Enter] Start selected  [←/→] Lesson  [q] Quit ",
        Style::default().fg(Color::DarkGray),
    )));
    frame.render_widget(footer, layout[2]);
}

fn render_round(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let Some(session) = app.session.as_ref() else {
        return;
    };

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(7),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .split(area);

    let header_text = format!(
        " {}  |  word {}/{}  |  mistakes {}",
        session.level_key().display_name(),
        (session.round.current_index + 1).min(session.word_count()),
        session.word_count(),
        session.round.mistake_count,
    );
    let header = Paragraph::new(Line::from(Span::styled(
        header_text,
        Style::default()
            .fg(Color::Black)
            .bg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )));
    frame.render_widget(header, layout[0]);

    frame.render_widget(WordArea::new(&app.frame), layout[1]);
    frame.render_widget(HintRow::new(&app.frame.hints), layout[2]);

    let footer = Paragraph::new(Line::from(Span::styled(
        " [Esc] Quit round  [Tab] Skip broken word  [Ctrl-r] Replay audio ",
        Style::default().fg(Color::DarkGray),
    )));
    frame.render_widget(footer, layout[3]);
}

fn render_summary(frame: &mut ratatui::Frame, app: &App) {
    let Some(summary) = app.session.as_ref().and_then(|s| s.summary()) else {
        return;
    };
    let centered = ui::centered_rect(50, 70, frame.area());
    frame.render_widget(SummaryPanel::new(summary, app.last_best.as_ref()), centered);
}
