use ratatui::Frame;

use crate::{
    app::{App, AppState},
    clock::Clock,
    ui::history::render_history,
};

/// A UI screen boundary, one per app state
pub trait Screen<C: Clock> {
    fn render(&self, app: &mut App<C>, f: &mut Frame);
}

/// Snippet being typed, drawn by the App widget
pub struct TypingScreen;

impl<C: Clock> Screen<C> for TypingScreen {
    fn render(&self, app: &mut App<C>, f: &mut Frame) {
        f.render_widget(&*app, f.area());
    }
}

pub struct ResultsScreen;

impl<C: Clock> Screen<C> for ResultsScreen {
    fn render(&self, app: &mut App<C>, f: &mut Frame) {
        f.render_widget(&*app, f.area());
    }
}

/// Needs mutable access to clamp the scroll offset
pub struct HistoryScreen;

impl<C: Clock> Screen<C> for HistoryScreen {
    fn render(&self, app: &mut App<C>, f: &mut Frame) {
        render_history(app, f);
    }
}

/// Helper to construct the appropriate screen for the current state
pub fn current_screen<C: Clock>(state: AppState) -> Box<dyn Screen<C>> {
    match state {
        AppState::Typing => Box::new(TypingScreen),
        AppState::Results => Box::new(ResultsScreen),
        AppState::History => Box::new(HistoryScreen),
    }
}

/// Draw whichever screen matches the app's current state
pub fn draw<C: Clock>(app: &mut App<C>, f: &mut Frame) {
    current_screen::<C>(app.state).render(app, f);
}
