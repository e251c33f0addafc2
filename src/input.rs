use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use std::time::Instant;

use crate::app::{App, Tab};
use crate::mail::FetchRequest;
use crate::settings::SettingsField;

/// Work the run loop must do after an input
#[derive(Debug, PartialEq)]
pub enum Effect {
    Fetch(FetchRequest),
    Quit,
}

pub fn handle_key(app: &mut App, key: KeyEvent, now: Instant) -> Option<Effect> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Effect::Quit);
    }
    app.clear_status();

    if app.selected.is_some() {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => app.dismiss(),
            KeyCode::Char('j') | KeyCode::Down => app.detail_scroll_down(),
            KeyCode::Char('k') | KeyCode::Up => app.detail_scroll_up(),
            KeyCode::Char('d') => {
                app.export_selected();
            }
            _ => {}
        }
        return None;
    }

    match app.tab {
        Tab::Inbox if app.searching => handle_search_key(app, key),
        Tab::Inbox => handle_inbox_key(app, key),
        Tab::Settings => handle_settings_key(app, key, now),
    }
}

fn handle_inbox_key(app: &mut App, key: KeyEvent) -> Option<Effect> {
    match key.code {
        KeyCode::Char('q') => return Some(Effect::Quit),
        KeyCode::Char('j') | KeyCode::Down => app.next(),
        KeyCode::Char('k') | KeyCode::Up => app.previous(),
        KeyCode::Enter | KeyCode::Char('l') | KeyCode::Right => app.select_current(),
        KeyCode::Char('/') => app.searching = true,
        KeyCode::Esc => app.clear_filter(),
        KeyCode::Tab => app.tab = Tab::Settings,
        KeyCode::Char('r') | KeyCode::Char('R') => {
            // Refresh is disabled while a fetch is running
            if !app.is_loading() {
                return app.begin_fetch().map(Effect::Fetch);
            }
        }
        _ => {}
    }
    None
}

fn handle_search_key(app: &mut App, key: KeyEvent) -> Option<Effect> {
    match key.code {
        KeyCode::Esc => {
            app.searching = false;
            app.clear_filter();
        }
        KeyCode::Enter => app.searching = false,
        KeyCode::Backspace => app.pop_filter_char(),
        KeyCode::Down => app.next(),
        KeyCode::Up => app.previous(),
        KeyCode::Char(c) => app.push_filter_char(c),
        _ => {}
    }
    None
}

fn handle_settings_key(app: &mut App, key: KeyEvent, now: Instant) -> Option<Effect> {
    match key.code {
        KeyCode::Esc | KeyCode::Tab => {
            app.focus_field(SettingsField::Namespace);
            app.tab = Tab::Inbox;
        }
        KeyCode::Down => app.next_field(),
        KeyCode::Up | KeyCode::BackTab => app.prev_field(),
        KeyCode::Enter | KeyCode::Char(' ') if app.settings_field == SettingsField::AutoRefresh => {
            app.toggle_auto_refresh(now)
        }
        KeyCode::Enter => app.next_field(),
        KeyCode::Backspace if app.settings_field.is_text() => {
            app.edit_setting(
                |s| {
                    s.pop();
                },
                now,
            );
        }
        KeyCode::Char(c) if app.settings_field.is_text() => {
            app.edit_setting(|s| s.push(c), now);
        }
        _ => {}
    }
    None
}

pub fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => app.handle_click(mouse.column, mouse.row),
        MouseEventKind::ScrollDown if app.selected.is_some() => app.detail_scroll_down(),
        MouseEventKind::ScrollUp if app.selected.is_some() => app.detail_scroll_up(),
        MouseEventKind::ScrollDown => app.next(),
        MouseEventKind::ScrollUp => app.previous(),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::mail::{FetchOutcome, Message};
    use std::sync::Arc;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn press(app: &mut App, code: KeyCode) -> Option<Effect> {
        handle_key(app, key(code), Instant::now())
    }

    fn loaded_app() -> App {
        let mut app = App::new(Arc::new(Config::default()));
        let req = app.begin_fetch().unwrap();
        app.finish_fetch(FetchOutcome {
            token: req.token,
            result: Ok(vec![
                Message {
                    id: "a".into(),
                    subject: "alpha".into(),
                    ..Default::default()
                },
                Message {
                    id: "b".into(),
                    subject: "beta".into(),
                    ..Default::default()
                },
            ]),
        });
        app
    }

    #[test]
    fn test_quit_keys() {
        let mut app = loaded_app();
        assert_eq!(press(&mut app, KeyCode::Char('q')), Some(Effect::Quit));
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        app.tab = Tab::Settings;
        assert_eq!(handle_key(&mut app, ctrl_c, Instant::now()), Some(Effect::Quit));
    }

    #[test]
    fn test_refresh_respects_loading() {
        let mut app = loaded_app();
        let effect = press(&mut app, KeyCode::Char('r'));
        assert!(matches!(effect, Some(Effect::Fetch(_))));
        assert_eq!(press(&mut app, KeyCode::Char('r')), None);
    }

    #[test]
    fn test_search_typing() {
        let mut app = loaded_app();
        press(&mut app, KeyCode::Char('/'));
        assert!(app.searching);
        press(&mut app, KeyCode::Char('q'));
        assert_eq!(app.filter, "q");
        assert!(app.filtered().is_empty());
        press(&mut app, KeyCode::Backspace);
        press(&mut app, KeyCode::Char('b'));
        press(&mut app, KeyCode::Enter);
        assert!(!app.searching);
        assert_eq!(app.filtered().len(), 1);
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.filter, "");
    }

    #[test]
    fn test_open_and_dismiss_detail() {
        let mut app = loaded_app();
        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.selected.as_ref().map(|m| m.id.as_str()), Some("b"));
        // List navigation is blocked while the modal is open
        press(&mut app, KeyCode::Char('k'));
        assert_eq!(app.list_state.selected(), Some(1));
        press(&mut app, KeyCode::Esc);
        assert!(app.selected.is_none());
    }

    #[test]
    fn test_settings_form_editing() {
        let mut app = loaded_app();
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.tab, Tab::Settings);

        for c in "ns1".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        assert_eq!(app.settings.namespace, "ns1");

        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Down);
        assert_eq!(app.settings_field, SettingsField::AutoRefresh);
        press(&mut app, KeyCode::Char(' '));
        assert!(app.settings.auto_refresh);
        press(&mut app, KeyCode::Char('x'));
        assert!(app.settings.auto_refresh);

        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.interval_input, "3");
        assert_eq!(app.settings.refresh_interval_secs, 5);

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.tab, Tab::Inbox);
        assert_eq!(app.interval_input, "5");
    }
}
