// Event handling and main UI loop

use chrono::Local;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io;
use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::{Duration, Instant};

use crate::config::Config;
use crate::engine::{self, Provider, keys};
use crate::ui::{Shell, state::AppState};

mod filters;
mod shell;

// Event types sent from dedicated event thread to main loop
enum UiEvent {
    Input(Event), // Keyboard or other terminal events
    Tick,         // Periodic update for auto refresh and redraw
}

/// Spawn a dedicated thread for event polling.
fn spawn_event_thread(tx: mpsc::Sender<UiEvent>) {
    let tick_rate = Duration::from_millis(250);

    thread::spawn(move || {
        let mut last_tick = Instant::now();
        loop {
            let timeout = tick_rate
                .checked_sub(last_tick.elapsed())
                .unwrap_or(Duration::from_secs(0));

            if event::poll(timeout).unwrap_or(false) {
                if let Ok(evt) = event::read() {
                    if tx.send(UiEvent::Input(evt)).is_err() {
                        break; // Main thread dropped the receiver
                    }
                }
            }

            if last_tick.elapsed() >= tick_rate {
                if tx.send(UiEvent::Tick).is_err() {
                    break;
                }
                last_tick = Instant::now();
            }
        }
    });
}

pub fn run_ui_with_options(startup_provider: Option<Provider>, config: &Config) -> io::Result<()> {
    let nav = engine::bootstrap(config, startup_provider);
    let mut app_state = AppState::new(nav);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let (event_tx, event_rx) = mpsc::channel();
    spawn_event_thread(event_tx);

    let result = run_app(&mut terminal, &mut app_state, event_rx);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    state: &mut AppState,
    event_rx: Receiver<UiEvent>,
) -> io::Result<()> {
    terminal.draw(|frame| Shell::render(frame, state))?;

    loop {
        let mut pending_ticks: u64 = 0;
        let mut pending_inputs: Vec<Event> = Vec::new();

        // Always block for at least one event, then drain the queue
        match event_rx.recv() {
            Ok(UiEvent::Tick) => pending_ticks += 1,
            Ok(UiEvent::Input(ev)) => pending_inputs.push(ev),
            Err(_) => return Ok(()),
        }

        while let Ok(evt) = event_rx.try_recv() {
            match evt {
                UiEvent::Tick => pending_ticks += 1,
                UiEvent::Input(ev) => pending_inputs.push(ev),
            }
        }

        // Inputs first so commands are never stuck behind a tick backlog
        for input in pending_inputs {
            if let Event::Key(key) = input {
                if handle_key(key, state) {
                    return Ok(());
                }
            }
        }

        if pending_ticks > 0 {
            auto_refresh(state);
        }

        terminal.draw(|frame| Shell::render(frame, state))?;
    }
}

/// Refresh on a timer when the auto-refresh flag is set, once per cache TTL
fn auto_refresh(state: &mut AppState) {
    let due = state.nav.session().read(|s| {
        if !s.get_bool(keys::FEATURE_AUTO_REFRESH, false) {
            return false;
        }
        let ttl = chrono::Duration::seconds(s.get_int(keys::CACHE_TTL, 300));
        match s.last_refresh() {
            Some(last) => Local::now() - last >= ttl,
            None => true,
        }
    });

    if due {
        let at = state.nav.session().trigger_refresh();
        tracing::debug!(at = %at, "auto refresh");
        state.set_status(format!("Auto refreshed at {}", at.format("%H:%M:%S")));
    }
}

fn should_quit(key: &KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q'))
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}

fn handle_key(key: KeyEvent, state: &mut AppState) -> bool {
    // Ignore key releases on platforms that report them
    if key.kind == KeyEventKind::Release {
        return false;
    }

    if should_quit(&key) {
        return true;
    }

    shell::handle_shell_key(key, state);
    false
}
