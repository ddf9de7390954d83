pub mod action;
pub mod state;
pub mod view;

use crate::cli::Cli;
use crate::config::Config;
use crate::logging;
use crate::model::adapter::parse_day;
use crate::paths::AppPaths;
use crate::storage::LocalStorage;
use crate::store::{Command, Effect, TaskDraft, UpdateError};
use action::{Action, AppEvent};
use state::{InputMode, UiState};
use view::draw;

use anyhow::{Context, Result};
use chrono::{Days, Local};
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{self, Stdout};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Confetti frame interval (~30 fps).
const FRAME: Duration = Duration::from_millis(33);
const IDLE_POLL: Duration = Duration::from_millis(100);

type Term = Terminal<CrosstermBackend<Stdout>>;

pub async fn run() -> Result<()> {
    // --- 1. PREAMBLE & CONFIG ---
    let cli = Cli::parse();
    if let Some(dir) = cli.data_dir {
        AppPaths::init_base_dir(dir);
    }

    let panic_log = AppPaths::data_dir()
        .map(|d| d.join("tickbox_panic.log"))
        .unwrap_or_else(|_| PathBuf::from("tickbox_panic.log"));
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        use std::io::Write;
        let _ = disable_raw_mode();
        let mut out = io::stdout();
        let _ = execute!(out, LeaveAlternateScreen);
        if let Ok(mut file) = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&panic_log)
        {
            let _ = writeln!(file, "PANIC: {:?}", info);
        }
        default_hook(info);
    }));

    let config = Config::load().context("Could not load configuration, fix or remove the file")?;

    let _logger = match AppPaths::log_dir().and_then(|dir| logging::init(&config.log_level, &dir)) {
        Ok(handle) => Some(handle),
        Err(e) => {
            eprintln!("Logging disabled: {:#}", e);
            None
        }
    };
    log::info!("tickbox {} starting", env!("CARGO_PKG_VERSION"));

    let storage = LocalStorage::open_default()?;
    log::info!("Using storage at {}", storage.path().display());
    let initial = storage.load_today();

    // --- 2. TERMINAL SETUP ---
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // --- 3. STATE INIT ---
    let mut app_state = UiState::new(initial, &config);

    let (action_tx, action_rx) = mpsc::channel::<Action>(32);
    let (event_tx, mut event_rx) = mpsc::channel::<AppEvent>(32);
    let worker = spawn_storage_worker(storage, action_rx, event_tx);

    // --- 4. UI LOOP ---
    let outcome = ui_loop(&mut terminal, &mut app_state, &action_tx, &mut event_rx).await;
    if let Err(e) = &outcome {
        log::error!("UI loop failed: {:#}", e);
    }

    // --- 5. SHUTDOWN ---
    // Runs on error too, so queued snapshots still reach disk.
    let _ = action_tx.send(Action::Quit).await;
    let restored = restore_terminal(&mut terminal);
    if let Err(e) = worker.await {
        log::error!("Storage worker failed: {}", e);
    }
    log::info!("tickbox exiting");

    outcome.and(restored)
}

fn restore_terminal(terminal: &mut Term) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Writes snapshots in the order they arrive and acks each one by its
/// sequence number. Everything queued before `Quit` is written.
pub fn spawn_storage_worker(
    storage: LocalStorage,
    mut action_rx: mpsc::Receiver<Action>,
    event_tx: mpsc::Sender<AppEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(action) = action_rx.recv().await {
            match action {
                Action::Quit => break,
                Action::Persist { seq, snapshot } => match storage.save(&snapshot) {
                    Ok(()) => {
                        let _ = event_tx.send(AppEvent::Saved(seq)).await;
                    }
                    Err(e) => {
                        log::error!("Save #{} failed: {:#}", seq, e);
                        let _ = event_tx.send(AppEvent::Error(format!("{:#}", e))).await;
                    }
                },
            }
        }
    })
}

async fn ui_loop(
    terminal: &mut Term,
    app_state: &mut UiState,
    action_tx: &mpsc::Sender<Action>,
    event_rx: &mut mpsc::Receiver<AppEvent>,
) -> Result<()> {
    let mut rng = rand::thread_rng();
    let mut last_frame = Instant::now();
    loop {
        terminal.draw(|f| draw(f, app_state))?;

        // A. Storage Events
        while let Ok(event) = event_rx.try_recv() {
            match event {
                AppEvent::Saved(seq) => app_state.mark_saved(seq),
                AppEvent::Error(s) => app_state.message = format!("Save failed: {}", s),
            }
        }

        // B. Animation Tick
        let now = Instant::now();
        if app_state.confetti.is_active() && now.duration_since(last_frame) >= FRAME {
            app_state.confetti.step();
            last_frame = now;
        }
        let timeout = if app_state.is_animating(now) {
            FRAME
        } else {
            IDLE_POLL
        };

        // C. User Input
        if event::poll(timeout)?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            for effect in handle_key(app_state, key) {
                match effect {
                    Effect::Persist => {
                        let (seq, snapshot) = app_state.snapshot();
                        let _ = action_tx.send(Action::Persist { seq, snapshot }).await;
                    }
                    Effect::Celebrate => {
                        app_state.celebrate(&mut rng);
                        last_frame = Instant::now();
                    }
                }
            }
        }

        if app_state.should_quit {
            return Ok(());
        }
    }
}

/// Maps one key press onto the state. Returns the effects the caller has to
/// carry out.
pub fn handle_key(app_state: &mut UiState, key: KeyEvent) -> Vec<Effect> {
    let result = match app_state.mode {
        InputMode::Creating => match key.code {
            KeyCode::Enter => {
                let draft = TaskDraft::new(
                    &app_state.input_buffer,
                    app_state.draft_category_name(),
                    app_state.draft_priority,
                );
                let new_id = draft.id.clone();
                let res = app_state.dispatch(Command::AddTask(draft));
                if res.is_ok() {
                    app_state.select_id(&new_id);
                    app_state.mode = InputMode::Normal;
                    app_state.reset_input();
                    app_state.message = "Added.".to_string();
                }
                res
            }
            KeyCode::Esc => {
                app_state.mode = InputMode::Normal;
                app_state.reset_input();
                Ok(vec![])
            }
            KeyCode::Tab => {
                app_state.cycle_category();
                Ok(vec![])
            }
            KeyCode::BackTab => {
                app_state.cycle_priority();
                Ok(vec![])
            }
            _ => {
                edit_text(app_state, key.code);
                Ok(vec![])
            }
        },
        InputMode::GoToDate => match key.code {
            KeyCode::Enter => match parse_day(&app_state.input_buffer) {
                Some(day) => {
                    app_state.mode = InputMode::Normal;
                    app_state.reset_input();
                    app_state.dispatch(Command::SelectDate(day))
                }
                None => {
                    app_state.flash();
                    Ok(vec![])
                }
            },
            KeyCode::Esc => {
                app_state.mode = InputMode::Normal;
                app_state.reset_input();
                Ok(vec![])
            }
            _ => {
                edit_text(app_state, key.code);
                Ok(vec![])
            }
        },
        InputMode::Viewing => match key.code {
            KeyCode::Char('c') | KeyCode::Char(' ') => match app_state.modal_id.clone() {
                Some(id) => {
                    let res = app_state.dispatch(Command::ToggleComplete(id));
                    app_state.close_modal();
                    res
                }
                None => Ok(vec![]),
            },
            KeyCode::Char('e') => {
                if let Some(text) = app_state.modal_task().map(|t| t.text.clone()) {
                    app_state.set_input(&text);
                    app_state.mode = InputMode::EditingText;
                }
                Ok(vec![])
            }
            KeyCode::Char('d') => {
                app_state.mode = InputMode::ConfirmDelete;
                Ok(vec![])
            }
            KeyCode::Esc | KeyCode::Char('q') => {
                app_state.close_modal();
                Ok(vec![])
            }
            _ => Ok(vec![]),
        },
        InputMode::EditingText => match key.code {
            KeyCode::Enter => match app_state.modal_id.clone() {
                Some(id) => {
                    let text = app_state.input_buffer.clone();
                    let res = app_state.dispatch(Command::EditTask { id, text });
                    if res.is_ok() {
                        app_state.close_modal();
                        app_state.message = "Saved.".to_string();
                    }
                    res
                }
                None => Ok(vec![]),
            },
            KeyCode::Esc => {
                app_state.reset_input();
                app_state.mode = InputMode::Viewing;
                Ok(vec![])
            }
            _ => {
                edit_text(app_state, key.code);
                Ok(vec![])
            }
        },
        InputMode::ConfirmDelete => match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => match app_state.modal_id.clone() {
                Some(id) => {
                    let res = app_state.dispatch(Command::DeleteTask(id));
                    app_state.close_modal();
                    if res.is_ok() {
                        app_state.message = "Deleted.".to_string();
                    }
                    res
                }
                None => Ok(vec![]),
            },
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                app_state.mode = InputMode::Viewing;
                Ok(vec![])
            }
            _ => Ok(vec![]),
        },
        InputMode::Normal => normal_key(app_state, key.code),
    };

    match result {
        Ok(effects) => effects,
        Err(UpdateError::EmptyText) => {
            app_state.flash();
            vec![]
        }
        Err(e @ UpdateError::TaskNotFound(_)) => {
            log::warn!("{}", e);
            app_state.message = format!("Error: {}", e);
            app_state.close_modal();
            vec![]
        }
    }
}

fn normal_key(app_state: &mut UiState, code: KeyCode) -> Result<Vec<Effect>, UpdateError> {
    let selected = app_state.app.selected_date;
    match code {
        KeyCode::Char('q') => {
            app_state.should_quit = true;
            Ok(vec![])
        }
        KeyCode::Char('a') => {
            app_state.start_draft();
            app_state.message = "New task: type, Tab for category, Shift+Tab for priority".into();
            Ok(vec![])
        }
        KeyCode::Enter => {
            if let Some(id) = app_state.get_selected_task().map(|t| t.id.clone()) {
                app_state.open_modal(id);
            }
            Ok(vec![])
        }
        KeyCode::Char(' ') => match app_state.get_selected_task().map(|t| t.id.clone()) {
            Some(id) => app_state.dispatch(Command::ToggleComplete(id)),
            None => Ok(vec![]),
        },
        KeyCode::Char('d') => {
            if let Some(id) = app_state.get_selected_task().map(|t| t.id.clone()) {
                app_state.open_modal(id);
                app_state.mode = InputMode::ConfirmDelete;
            }
            Ok(vec![])
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app_state.next();
            Ok(vec![])
        }
        KeyCode::Up | KeyCode::Char('k') => {
            app_state.previous();
            Ok(vec![])
        }
        KeyCode::PageDown => {
            app_state.jump_forward(10);
            Ok(vec![])
        }
        KeyCode::PageUp => {
            app_state.jump_backward(10);
            Ok(vec![])
        }
        KeyCode::Char('[') | KeyCode::Left => match selected.checked_sub_days(Days::new(1)) {
            Some(day) => app_state.dispatch(Command::SelectDate(day)),
            None => Ok(vec![]),
        },
        KeyCode::Char(']') | KeyCode::Right => match selected.checked_add_days(Days::new(1)) {
            Some(day) => app_state.dispatch(Command::SelectDate(day)),
            None => Ok(vec![]),
        },
        KeyCode::Char('t') => app_state.dispatch(Command::SelectDate(Local::now().date_naive())),
        KeyCode::Char('g') => {
            app_state.mode = InputMode::GoToDate;
            app_state.set_input(&selected.format("%Y-%m-%d").to_string());
            Ok(vec![])
        }
        KeyCode::Char('H') => app_state.dispatch(Command::ToggleHistory),
        KeyCode::Char('D') => app_state.dispatch(Command::ToggleDarkMode),
        KeyCode::Char('?') => {
            app_state.show_full_help = !app_state.show_full_help;
            Ok(vec![])
        }
        KeyCode::Esc => {
            app_state.message.clear();
            Ok(vec![])
        }
        _ => Ok(vec![]),
    }
}

fn edit_text(app_state: &mut UiState, code: KeyCode) {
    match code {
        KeyCode::Char(c) => app_state.enter_char(c),
        KeyCode::Backspace => app_state.delete_char(),
        KeyCode::Left => app_state.move_cursor_left(),
        KeyCode::Right => app_state.move_cursor_right(),
        _ => {}
    }
}
