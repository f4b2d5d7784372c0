use ratatui::Frame;

use crate::{
    ui::{render_game, render_menu, render_selection},
    App, AppState,
};

/// A UI Screen boundary: responsible for rendering one app state
pub trait Screen {
    fn render(&self, app: &App, f: &mut Frame);
}

/// Title, difficulty picker and the outcome of the last round
pub struct MenuScreen;

impl Screen for MenuScreen {
    fn render(&self, app: &App, f: &mut Frame) {
        render_menu(app, f.area(), f.buffer_mut());
    }
}

/// Alphabetical list of prompt files
pub struct SelectionScreen;

impl Screen for SelectionScreen {
    fn render(&self, app: &App, f: &mut Frame) {
        render_selection(app, f.area(), f.buffer_mut());
    }
}

/// The running dino and the prompt being typed
pub struct GameScreen;

impl Screen for GameScreen {
    fn render(&self, app: &App, f: &mut Frame) {
        render_game(app, f.area(), f.buffer_mut());
    }
}

/// Helper to construct the appropriate screen for the current state
pub fn current_screen(state: &AppState) -> Box<dyn Screen> {
    match state {
        AppState::Menu => Box::new(MenuScreen),
        AppState::Selection => Box::new(SelectionScreen),
        AppState::Playing => Box::new(GameScreen),
    }
}
