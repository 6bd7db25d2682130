use crate::app::App;
use crossterm::event::{KeyCode, KeyModifiers};

pub async fn handle_key_event(app: &mut App, key: KeyCode, modifiers: KeyModifiers) {
    if app.emoji_picker.is_some() {
        match key {
            KeyCode::Left => app.move_emoji(false),
            KeyCode::Right | KeyCode::Tab => app.move_emoji(true),
            KeyCode::Enter => app.insert_emoji(),
            KeyCode::Esc => app.toggle_emoji_picker(),
            _ => {}
        }
        return;
    }

    let ctrl = modifiers.contains(KeyModifiers::CONTROL);
    match key {
        KeyCode::Esc => {
            app.should_quit = true;
        }
        KeyCode::Char('c') if ctrl => {
            app.should_quit = true;
        }
        KeyCode::Char('t') if ctrl => app.toggle_theme().await,
        KeyCode::Char('e') if ctrl => app.toggle_emoji_picker(),
        KeyCode::Enter => {
            // Clear status message when sending a message
            app.clear_status_message();
            app.submit().await;
        }
        KeyCode::Char(c) if !ctrl => {
            // Clear status message when typing
            if app.status_message.is_some() {
                app.clear_status_message();
            }
            app.push_char(c);
        }
        KeyCode::Backspace => app.pop_char(),
        KeyCode::Up => app.select_up(),
        KeyCode::Down => app.select_down(),
        KeyCode::Delete => app.delete_selected().await,
        _ => {}
    }
}
