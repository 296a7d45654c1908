use std::io;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::info;
use ratatui::{backend::CrosstermBackend, Terminal};

use crate::{
    state::session::SessionState,
    ui::screens::{Action, Screen},
};

use super::{init_logging, runtime, Args};

const FRAME_TICK: Duration = Duration::from_millis(120);

struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> Result<Self> {
        enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen)?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

/// Runs the terminal dashboard until the user quits.
///
/// # Errors
/// Returns an error if the configuration is invalid, or terminal setup or
/// rendering fails.
pub fn run(args: &Args) -> Result<()> {
    let config = args.config()?;
    init_logging(false)?;

    let runtime = runtime()?;
    let monitor = monitor::watch(&config, runtime.handle())?;
    let mut session = SessionState::new(monitor.session, monitor.dashboard.clone());

    let _guard = TerminalGuard::enter()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let mut screen = Screen::Monitor;

    loop {
        session.tick();
        terminal.draw(|f| screen.draw(f, &session))?;

        if event::poll(FRAME_TICK)? {
            if let Event::Key(k) = event::read()? {
                if k.kind != KeyEventKind::Press {
                    continue;
                }
                match screen.handle_key(k.code, session.view()) {
                    Action::Quit => break,
                    Action::Transition(next) => screen = next,
                    Action::Send(intent) => {
                        if let Some(command) = monitor.dispatcher.dispatch(intent) {
                            session.log_command(command);
                        }
                    }
                    Action::None => {}
                }
            }
        }
    }

    info!("dashboard closed");
    terminal.show_cursor()?;
    Ok(())
}
