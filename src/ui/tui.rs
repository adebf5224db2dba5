//! Terminal event loop: draw, read one key, hand the decoded action to the
//! session, repeat until it asks to quit.

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use crossterm::{ExecutableCommand, execute};
use ratatui::prelude::*;
use std::io;
use tracing::{debug, info, warn};

use crate::git::ConfigBridge;
use crate::storage::IdentityStore;
use crate::ui::components::theme::ThemePalette;
use crate::ui::keymap::action_for_key;
use crate::ui::session::{Flow, Session};
use crate::ui::view;

pub fn run_tui<S: IdentityStore, B: ConfigBridge>(
    session: &mut Session<S, B>,
    palette: ThemePalette,
) -> Result<()> {
    let mut stdout = io::stdout();
    enable_raw_mode().context("enabling raw mode")?;
    if let Err(err) = stdout.execute(EnterAlternateScreen) {
        let _ = disable_raw_mode();
        return Err(err).context("entering alternate screen");
    }

    let outcome = Terminal::new(CrosstermBackend::new(stdout))
        .context("creating terminal")
        .and_then(|mut terminal| event_loop(&mut terminal, session, palette));

    finish(outcome, teardown_terminal())
}

/// Combine the loop result with the teardown result. A loop error wins; a
/// teardown failure after it is only logged.
fn finish(outcome: Result<()>, teardown: Result<()>) -> Result<()> {
    match (outcome, teardown) {
        (Err(err), Err(teardown_err)) => {
            warn!(error = %teardown_err, "terminal teardown failed");
            Err(err)
        }
        (Ok(()), Err(teardown_err)) => Err(teardown_err.context("restoring terminal")),
        (outcome, Ok(())) => outcome,
    }
}

fn event_loop<T: Backend, S: IdentityStore, B: ConfigBridge>(
    terminal: &mut Terminal<T>,
    session: &mut Session<S, B>,
    palette: ThemePalette,
) -> Result<()> {
    info!(identities = session.state().all_identities().len(), "session started");
    loop {
        terminal
            .draw(|f| view::render(f, session.state(), palette))
            .context("drawing frame")?;

        // Resize and focus events only need the redraw above.
        let Event::Key(key) = event::read().context("reading terminal event")? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        let Some(action) = action_for_key(session.state().mode(), key) else {
            continue;
        };
        debug!(?action, "key");
        if session.handle(action) == Flow::Quit {
            info!("session ended");
            return Ok(());
        }
    }
}

fn teardown_terminal() -> Result<()> {
    let mut stdout = io::stdout();
    disable_raw_mode()?;
    execute!(stdout, LeaveAlternateScreen)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn loop_error_survives_teardown_failure() {
        let err = finish(Err(anyhow!("reading terminal event")), Err(anyhow!("raw mode"))).unwrap_err();
        assert_eq!(err.to_string(), "reading terminal event");
    }

    #[test]
    fn teardown_failure_after_clean_exit_is_reported() {
        let err = finish(Ok(()), Err(anyhow!("raw mode"))).unwrap_err();
        assert_eq!(format!("{err:#}"), "restoring terminal: raw mode");
    }

    #[test]
    fn clean_exit_and_plain_loop_error_pass_through() {
        assert!(finish(Ok(()), Ok(())).is_ok());
        let err = finish(Err(anyhow!("drawing frame")), Ok(())).unwrap_err();
        assert_eq!(err.to_string(), "drawing frame");
    }
}
