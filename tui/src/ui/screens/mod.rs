pub mod live;
pub mod model;

use crossterm::event::KeyCode;
use monitor::controls::Intent;
use ratatui::Frame;

use crate::state::{model::SessionView, session::SessionState};

pub enum Action {
    None,
    Quit,
    Transition(Screen),
    /// Forward a user intent to the training process.
    Send(Intent),
}

pub enum Screen {
    Monitor,
    Model(model::ModelState),
}

impl Screen {
    pub fn draw(&self, f: &mut Frame, state: &SessionState) {
        match self {
            Screen::Monitor => live::draw(f, state),
            Screen::Model(s) => model::draw(f, state, s),
        }
    }

    pub fn handle_key(&mut self, key: KeyCode, view: &SessionView) -> Action {
        match self {
            Screen::Monitor => live::handle_key(key, view),
            Screen::Model(s) => model::handle_key(s, key, view),
        }
    }
}
