//! BLOCKFALL - a falling-block puzzle game for the terminal

mod bag;
mod block;
mod game;
mod grid;
mod highscores;
mod input;
mod menu;
mod progression;
mod settings;
mod shape;
mod tetromino;
mod timer;
mod ui;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use game::{Game, GameEvent};
use highscores::{HighScores, ScoreEntry};
use input::{Command, InputHandler};
use menu::{Menu, MenuAction, MenuScreen, NameEntry};
use ratatui::{backend::CrosstermBackend, Terminal};
use settings::Settings;
use std::{
    io::{self, stdout},
    path::PathBuf,
    time::{Duration, Instant},
};
use ui::Overlay;

/// Target frame rate
const TARGET_FPS: u64 = 60;
const FRAME_DURATION: Duration = Duration::from_micros(1_000_000 / TARGET_FPS);

/// Application state
enum AppState {
    Menu(Menu),
    Playing {
        game: Game,
        input: InputHandler,
        paused: bool,
    },
    GameOver {
        game: Game,
        name: NameEntry,
    },
}

/// Get the blockfall temp directory for logs, creating it if needed
fn blockfall_temp_dir() -> PathBuf {
    let dir = std::env::temp_dir().join("blockfall");
    let _ = std::fs::create_dir_all(&dir);
    dir
}

fn main() -> Result<()> {
    // Generate session ID for this instance
    let session_id: u32 = rand::random();

    let log_dir = blockfall_temp_dir();
    let log_file = format!("{:08x}.log", session_id);

    // Setup tracing to log file; the terminal belongs to the UI
    let file_appender = tracing_appender::rolling::never(&log_dir, &log_file);
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("blockfall=debug")),
        )
        .with_ansi(false)
        .init();

    tracing::info!(
        "BLOCKFALL starting up, session={:08x}, log={}",
        session_id,
        log_dir.join(&log_file).display()
    );

    let settings = Settings::load();
    let scores_path = Settings::scores_path();

    // Setup terminal
    enable_raw_mode().context("failed to enable raw mode")?;
    execute!(stdout(), EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout());
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_app(&mut terminal, &settings, scores_path.as_deref());

    // Restore terminal
    disable_raw_mode()?;
    execute!(stdout(), LeaveAlternateScreen)?;

    // Write the settings file on first run so it can be edited
    if Settings::settings_path().is_some_and(|p| !p.exists()) {
        if let Err(e) = settings.save() {
            tracing::warn!("could not save settings: {:#}", e);
        }
    }

    match &result {
        Ok(Some(summary)) => {
            println!("\nThanks for playing BLOCKFALL!");
            println!("Final Score: {}", summary.score);
            println!("Level: {} | Lines: {}", summary.level, summary.lines);
        }
        Ok(None) => println!("\nThanks for playing BLOCKFALL!"),
        Err(e) => tracing::error!("exiting with error: {:#}", e),
    }

    result.map(|_| ())
}

fn load_scores(path: Option<&std::path::Path>) -> HighScores {
    let Some(path) = path else {
        return HighScores::default();
    };
    HighScores::load(path).unwrap_or_else(|e| {
        tracing::warn!("could not read high scores: {:#}", e);
        HighScores::default()
    })
}

fn new_game(settings: &Settings) -> Game {
    let config = settings.game_config();
    match settings.player.seed {
        Some(seed) => Game::with_seed(config, seed),
        None => Game::new(config),
    }
}

/// Main loop. Returns the totals of the last finished game, if any.
fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    settings: &Settings,
    scores_path: Option<&std::path::Path>,
) -> Result<Option<progression::ScoreUpdate>> {
    let mut state = AppState::Menu(Menu::new());
    let mut last_summary = None;
    let mut last_tick = Instant::now();

    loop {
        // Render
        terminal.draw(|frame| match &state {
            AppState::Menu(menu) => ui::render_menu(frame, menu),
            AppState::Playing { game, paused, .. } => {
                let overlay = if *paused { Overlay::Paused } else { Overlay::None };
                ui::render_game(frame, game, overlay);
            }
            AppState::GameOver { game, name } => {
                ui::render_game(frame, game, Overlay::GameOver(name));
            }
        })?;

        // Handle every pending event, waiting up to one frame for the first
        let mut timeout = FRAME_DURATION.saturating_sub(last_tick.elapsed());
        while event::poll(timeout)? {
            timeout = Duration::ZERO;
            let Event::Key(key) = event::read()? else {
                continue;
            };
            if let Some(next) = handle_key(&mut state, key, settings, scores_path) {
                match next {
                    Transition::To(next) => state = next,
                    Transition::Exit => return Ok(last_summary),
                }
            }
        }

        // Advance the game by the elapsed frame time
        let now = Instant::now();
        let dt = now.duration_since(last_tick);
        last_tick = now;

        let finished = match &mut state {
            AppState::Playing {
                game,
                input,
                paused: false,
            } => {
                let events = game.tick(input.intents(now), dt);
                events.contains(&GameEvent::GameOver)
            }
            _ => false,
        };

        if finished {
            if let AppState::Playing { game, .. } = std::mem::replace(&mut state, AppState::Menu(Menu::new())) {
                last_summary = Some(game.summary());
                state = AppState::GameOver {
                    game,
                    name: NameEntry::new(&settings.player.name),
                };
            }
        }
    }
}

enum Transition {
    To(AppState),
    Exit,
}

fn handle_key(
    state: &mut AppState,
    key: KeyEvent,
    settings: &Settings,
    scores_path: Option<&std::path::Path>,
) -> Option<Transition> {
    let now = Instant::now();

    match state {
        AppState::Playing { input, paused, .. } => {
            match key.kind {
                KeyEventKind::Release => {
                    input.key_up(key);
                    None
                }
                _ => match input.key_down(key, now) {
                    Some(Command::Pause) => {
                        *paused = !*paused;
                        input.clear();
                        tracing::debug!(paused = *paused, "pause toggled");
                        None
                    }
                    Some(Command::Quit) => Some(Transition::To(AppState::Menu(Menu::new()))),
                    None => None,
                },
            }
        }
        _ if key.kind != KeyEventKind::Press => None,
        AppState::Menu(menu) => match key.code {
            KeyCode::Up => {
                menu.move_up();
                None
            }
            KeyCode::Down => {
                menu.move_down();
                None
            }
            KeyCode::Esc if menu.screen != MenuScreen::Main => {
                Some(Transition::To(AppState::Menu(Menu::main_menu())))
            }
            KeyCode::Char('q') if menu.screen == MenuScreen::Main => Some(Transition::Exit),
            KeyCode::Enter => match menu.select()? {
                MenuAction::Play => Some(Transition::To(AppState::Playing {
                    game: new_game(settings),
                    input: InputHandler::from_settings(settings),
                    paused: false,
                })),
                MenuAction::GoToScreen(MenuScreen::HighScores) => Some(Transition::To(
                    AppState::Menu(Menu::high_scores(&load_scores(scores_path))),
                )),
                MenuAction::GoToScreen(MenuScreen::Main) | MenuAction::Back => {
                    Some(Transition::To(AppState::Menu(Menu::main_menu())))
                }
                MenuAction::Quit => Some(Transition::Exit),
            },
            _ => None,
        },
        AppState::GameOver { game, name } => match key.code {
            KeyCode::Char(c) => {
                name.push(c);
                None
            }
            KeyCode::Backspace => {
                name.backspace();
                None
            }
            KeyCode::Enter => {
                let summary = game.summary();
                let entry = ScoreEntry {
                    name: name.finish(),
                    score: summary.score,
                    level: summary.level,
                    lines: summary.lines,
                };
                if let Some(path) = scores_path {
                    if let Err(e) = HighScores::append(path, &entry) {
                        tracing::warn!("could not save high score: {:#}", e);
                    }
                }
                Some(Transition::To(AppState::Menu(Menu::high_scores(&load_scores(
                    scores_path,
                )))))
            }
            KeyCode::Esc => Some(Transition::To(AppState::Menu(Menu::main_menu()))),
            _ => None,
        },
    }
}
