use crossterm::event::KeyCode;
use ratatui::Frame;

use crate::{
    state::{model::SessionView, session::SessionState},
    ui::draw,
};

use super::{Action, Screen};

/// Cursor over the layer list of the described model.
pub struct ModelState {
    pub selected: usize,
}

impl ModelState {
    pub fn new() -> Self {
        Self { selected: 0 }
    }
}

pub fn handle_key(state: &mut ModelState, key: KeyCode, view: &SessionView) -> Action {
    let layers = view.model.as_ref().map_or(0, |m| m.cards.len());
    match key {
        KeyCode::Up | KeyCode::Char('k') => {
            if state.selected > 0 {
                state.selected -= 1;
            }
            Action::None
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if state.selected + 1 < layers {
                state.selected += 1;
            }
            Action::None
        }
        KeyCode::Tab | KeyCode::Esc => Action::Transition(Screen::Monitor),
        KeyCode::Char('q') => Action::Quit,
        _ => Action::None,
    }
}

pub fn draw(f: &mut Frame, state: &SessionState, model: &ModelState) {
    draw::model(f, state, model.selected);
}

#[cfg(test)]
mod tests {
    use monitor::render::LayerCard;

    use super::*;
    use crate::state::model::ModelView;

    fn view(layers: usize) -> SessionView {
        let mut view = SessionState::new(
            monitor::session::SessionId::from_raw(5),
            monitor::dashboard(),
        )
        .view()
        .clone();
        view.model = Some(ModelView {
            cards: (0..layers)
                .map(|index| LayerCard {
                    index,
                    name: format!("layer{index}"),
                    description: String::new(),
                    params: "0".into(),
                })
                .collect(),
            summary: Vec::new(),
        });
        view
    }

    #[test]
    fn selection_stays_within_layers() {
        let view = view(2);
        let mut state = ModelState::new();

        handle_key(&mut state, KeyCode::Up, &view);
        assert_eq!(state.selected, 0);

        handle_key(&mut state, KeyCode::Down, &view);
        handle_key(&mut state, KeyCode::Char('j'), &view);
        assert_eq!(state.selected, 1);

        handle_key(&mut state, KeyCode::Char('k'), &view);
        assert_eq!(state.selected, 0);
    }

    #[test]
    fn tab_goes_back_to_the_monitor() {
        let mut state = ModelState::new();
        assert!(matches!(
            handle_key(&mut state, KeyCode::Tab, &view(0)),
            Action::Transition(Screen::Monitor)
        ));
    }
}
