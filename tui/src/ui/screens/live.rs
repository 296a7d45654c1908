use crossterm::event::KeyCode;
use monitor::controls::Intent;
use ratatui::Frame;

use crate::{
    state::{model::SessionView, session::SessionState},
    ui::draw,
};

use super::{model::ModelState, Action, Screen};

pub fn handle_key(key: KeyCode, view: &SessionView) -> Action {
    let controls = &view.controls;
    match key {
        KeyCode::Char(' ') | KeyCode::Char('p') => {
            if controls.pause_visible() {
                Action::Send(Intent::Pause)
            } else if controls.play_visible() {
                Action::Send(Intent::Play)
            } else {
                Action::None
            }
        }
        KeyCode::Char('s') if controls.stop_enabled() => Action::Send(Intent::Stop),
        KeyCode::Char('f') if controls.stop_enabled() => Action::Send(Intent::ToggleProfiling),
        KeyCode::Tab => Action::Transition(Screen::Model(ModelState::new())),
        KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
        _ => Action::None,
    }
}

pub fn draw(f: &mut Frame, state: &SessionState) {
    draw::monitor(f, state);
}
