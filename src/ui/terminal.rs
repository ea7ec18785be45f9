use std::io::{self, Stdout};
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::debug;

use super::app::App;
use super::view::Snapshot;

type Term = Terminal<CrosstermBackend<Stdout>>;

/// Spin up the terminal backend, enter the draw loop, and keep processing input
/// until the user quits. The terminal is restored even when the loop fails.
pub fn run_app(app: &mut App) -> Result<()> {
    let mut stdout = io::stdout();
    enable_raw_mode().context("failed to enable raw mode")?;
    execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("failed to create terminal backend")?;

    let result = event_loop(&mut terminal, app);

    cleanup_terminal(&mut terminal)?;
    result
}

/// Each handled key press is followed by a fresh read of the store, so every
/// frame after an interaction reflects the database as it is now.
fn event_loop(terminal: &mut Term, app: &mut App) -> Result<()> {
    let mut snapshot = Snapshot::load(app.store());

    loop {
        terminal
            .draw(|frame| app.draw(frame, &snapshot))
            .context("failed to draw frame")?;

        if !event::poll(Duration::from_millis(250)).context("event polling failed")? {
            continue;
        }

        if let Event::Key(key_event) = event::read().context("failed to read event")? {
            if key_event.kind != KeyEventKind::Press {
                continue;
            }

            if key_event.modifiers.contains(KeyModifiers::CONTROL)
                && key_event.code == KeyCode::Char('c')
            {
                debug!("interrupted from keyboard");
                return Ok(());
            }

            if !is_plain_key(&key_event) {
                continue;
            }

            if app.handle_key(key_event.code, &snapshot) {
                return Ok(());
            }
            snapshot = Snapshot::load(app.store());
        }
    }
}

/// Chorded keys (Ctrl or Alt) have no binding besides Ctrl-C and must not be
/// typed into the form as plain characters. Shift stays allowed.
fn is_plain_key(key: &KeyEvent) -> bool {
    !key
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
}

fn cleanup_terminal(terminal: &mut Term) -> Result<()> {
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;
    terminal
        .show_cursor()
        .context("failed to restore cursor visibility")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chorded_keys_are_not_dispatched() {
        let ctrl_a = KeyEvent::new(KeyCode::Char('a'), KeyModifiers::CONTROL);
        let alt_x = KeyEvent::new(KeyCode::Char('x'), KeyModifiers::ALT);
        assert!(!is_plain_key(&ctrl_a));
        assert!(!is_plain_key(&alt_x));
    }

    #[test]
    fn shifted_and_bare_keys_are_dispatched() {
        assert!(is_plain_key(&KeyEvent::new(KeyCode::Char('A'), KeyModifiers::SHIFT)));
        assert!(is_plain_key(&KeyEvent::new(KeyCode::BackTab, KeyModifiers::SHIFT)));
        assert!(is_plain_key(&KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)));
    }
}
