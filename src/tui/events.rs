//! Event handling for the explorer.

use super::app::TopoApp;
use super::theme::toggle_theme;
use crate::projection::ResourceFilter;
use crossterm::event::{self, Event as CrosstermEvent, KeyCode, KeyEvent, MouseEventKind};
use std::io;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

/// Terminal events.
pub enum Event {
    Key(KeyEvent),
    Mouse(event::MouseEvent),
    Resize(u16, u16),
    Tick,
}

/// Event handler.
pub struct EventHandler {
    rx: mpsc::Receiver<Event>,
    _tx: mpsc::Sender<Event>,
}

impl Default for EventHandler {
    fn default() -> Self {
        let (tx, rx) = mpsc::channel();
        let tick_rate = Duration::from_millis(100);

        let event_tx = tx.clone();
        thread::spawn(move || loop {
            if event::poll(tick_rate).unwrap_or(false) {
                match event::read() {
                    Ok(CrosstermEvent::Key(key)) => {
                        if event_tx.send(Event::Key(key)).is_err() {
                            break;
                        }
                    }
                    Ok(CrosstermEvent::Mouse(mouse)) => {
                        if event_tx.send(Event::Mouse(mouse)).is_err() {
                            break;
                        }
                    }
                    Ok(CrosstermEvent::Resize(w, h)) => {
                        if event_tx.send(Event::Resize(w, h)).is_err() {
                            break;
                        }
                    }
                    _ => {}
                }
            } else if event_tx.send(Event::Tick).is_err() {
                break;
            }
        });

        Self { rx, _tx: tx }
    }
}

impl EventHandler {
    pub fn next(&self) -> io::Result<Event> {
        self.rx.recv().map_err(io::Error::other)
    }
}

/// Handle key events for [`TopoApp`].
pub fn handle_key_event(app: &mut TopoApp, key: KeyEvent) {
    app.clear_status_message();

    if app.show_help {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q' | '?') => app.toggle_help(),
            _ => {}
        }
        return;
    }

    match key.code {
        KeyCode::Char('q') => {
            app.should_quit = true;
        }
        KeyCode::Esc => {
            // Esc closes the detail panel first, then quits.
            if app.selection.selected().is_some() {
                app.selection.clear();
            } else {
                app.should_quit = true;
            }
        }
        KeyCode::Char('?') => {
            app.toggle_help();
        }
        KeyCode::Char('T') => {
            toggle_theme();
        }
        KeyCode::Char('r') => {
            app.rescan();
        }

        // Filter selection
        KeyCode::Tab => app.next_filter(),
        KeyCode::BackTab => app.prev_filter(),
        KeyCode::Char('1') => app.set_filter(ResourceFilter::All),
        KeyCode::Char('2') => app.set_filter(ResourceFilter::Vpc),
        KeyCode::Char('3') => app.set_filter(ResourceFilter::Subnet),
        KeyCode::Char('4') => app.set_filter(ResourceFilter::Instance),
        KeyCode::Char('5') => app.set_filter(ResourceFilter::SecurityGroup),

        // Navigation
        KeyCode::Up | KeyCode::Char('k') => app.navigate_up(),
        KeyCode::Down | KeyCode::Char('j') => app.navigate_down(),
        KeyCode::PageUp => app.page_up(),
        KeyCode::PageDown => app.page_down(),
        KeyCode::Home | KeyCode::Char('g') => app.go_first(),
        KeyCode::End | KeyCode::Char('G') => app.go_last(),

        // Actions
        KeyCode::Enter | KeyCode::Char(' ') => app.handle_enter(),
        KeyCode::Char('c') => app.collapse_all(),

        _ => {}
    }
}

/// Handle mouse events for [`TopoApp`].
pub fn handle_mouse_event(app: &mut TopoApp, mouse: event::MouseEvent) {
    app.clear_status_message();

    if app.show_help {
        if let MouseEventKind::Down(_) = mouse.kind {
            app.toggle_help();
        }
        return;
    }

    match mouse.kind {
        MouseEventKind::ScrollDown => app.navigate_down(),
        MouseEventKind::ScrollUp => app.navigate_up(),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::tui::app::InventorySource;
    use crossterm::event::KeyModifiers;
    use std::path::PathBuf;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn app() -> TopoApp {
        TopoApp::new(
            AppConfig::default(),
            Vec::new(),
            ResourceFilter::All,
            InventorySource::File(PathBuf::from("/dev/null")),
        )
    }

    #[test]
    fn q_quits() {
        let mut app = app();
        handle_key_event(&mut app, key(KeyCode::Char('q')));
        assert!(app.should_quit);
    }

    #[test]
    fn esc_clears_selection_before_quitting() {
        let mut app = app();
        app.selection.select(&crate::model::Instance {
            id: "i-1".to_string(),
            ..crate::model::Instance::default()
        });

        handle_key_event(&mut app, key(KeyCode::Esc));
        assert!(app.selection.selected().is_none());
        assert!(!app.should_quit);

        handle_key_event(&mut app, key(KeyCode::Esc));
        assert!(app.should_quit);
    }

    #[test]
    fn tab_cycles_filters() {
        let mut app = app();
        handle_key_event(&mut app, key(KeyCode::Tab));
        assert_eq!(app.filter, ResourceFilter::Vpc);
        handle_key_event(&mut app, key(KeyCode::BackTab));
        assert_eq!(app.filter, ResourceFilter::All);
    }

    #[test]
    fn number_keys_jump_to_filter() {
        let mut app = app();
        handle_key_event(&mut app, key(KeyCode::Char('5')));
        assert_eq!(app.filter, ResourceFilter::SecurityGroup);
        handle_key_event(&mut app, key(KeyCode::Char('3')));
        assert_eq!(app.filter, ResourceFilter::Subnet);
    }

    #[test]
    fn help_overlay_swallows_other_keys() {
        let mut app = app();
        handle_key_event(&mut app, key(KeyCode::Char('?')));
        assert!(app.show_help);

        handle_key_event(&mut app, key(KeyCode::Tab));
        assert_eq!(app.filter, ResourceFilter::All);

        handle_key_event(&mut app, key(KeyCode::Esc));
        assert!(!app.show_help);
        assert!(!app.should_quit);
    }
}
