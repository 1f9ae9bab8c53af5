use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use crate::app::App;
use crate::tui::AppEvent;

/// Lines moved per mouse wheel notch
const WHEEL_LINES: u16 = 3;

/// Convert a character index to a byte index for UTF-8 safe string operations
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

pub fn handle_event(app: &mut App, event: AppEvent) -> Result<()> {
    match event {
        AppEvent::Key(key) => handle_key(app, key),
        AppEvent::Mouse(mouse) => handle_mouse(app, mouse),
        AppEvent::Paste(text) => insert_text(app, &text),
        AppEvent::Resize => {}
        AppEvent::Tick => app.tick_animation(),
        AppEvent::Reply(result) => {
            app.controller.settle(result);
        }
    }
    Ok(())
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    match key.code {
        KeyCode::Esc => {
            app.should_quit = true;
        }
        KeyCode::Enter => {
            app.submit();
        }
        KeyCode::Backspace => {
            if app.cursor > 0 {
                app.cursor -= 1;
                let byte_pos = char_to_byte_index(&app.input, app.cursor);
                app.input.remove(byte_pos);
            }
        }
        KeyCode::Delete => {
            let char_count = app.input.chars().count();
            if app.cursor < char_count {
                let byte_pos = char_to_byte_index(&app.input, app.cursor);
                app.input.remove(byte_pos);
            }
        }
        KeyCode::Left => {
            app.cursor = app.cursor.saturating_sub(1);
        }
        KeyCode::Right => {
            let char_count = app.input.chars().count();
            app.cursor = (app.cursor + 1).min(char_count);
        }
        KeyCode::Home => {
            app.cursor = 0;
        }
        KeyCode::End => {
            app.cursor = app.input.chars().count();
        }
        KeyCode::Up => app.scroll_up(1),
        KeyCode::Down => app.scroll_down(1),
        KeyCode::PageUp => {
            let lines = app.half_page();
            app.scroll_up(lines);
        }
        KeyCode::PageDown => {
            let lines = app.half_page();
            app.scroll_down(lines);
        }
        // Control/Alt chords are shortcuts, not text
        KeyCode::Char(c) if !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {
            let byte_pos = char_to_byte_index(&app.input, app.cursor);
            app.input.insert(byte_pos, c);
            app.cursor += 1;
        }
        _ => {}
    }
}

/// Insert pasted text at the cursor. The input box is a single line, so line
/// breaks become spaces instead of submitting.
fn insert_text(app: &mut App, text: &str) {
    let flattened: String = text
        .replace("\r\n", "\n")
        .chars()
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .collect();

    let byte_pos = char_to_byte_index(&app.input, app.cursor);
    app.input.insert_str(byte_pos, &flattened);
    app.cursor += flattened.chars().count();
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    match mouse.kind {
        MouseEventKind::ScrollUp => app.scroll_up(WHEEL_LINES),
        MouseEventKind::ScrollDown => app.scroll_down(WHEEL_LINES),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chatbox_core::{
        ChatBackend, ChatError, ChatRequest, Origin, FALLBACK_MESSAGE,
    };
    use chatbox_core::error::Result as ChatResult;
    use reqwest::StatusCode;
    use std::sync::{Arc, Mutex};
    use tokio::sync::mpsc;

    struct FixedBackend {
        reply: fn() -> ChatResult<String>,
        seen: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl ChatBackend for FixedBackend {
        async fn send(&self, request: &ChatRequest) -> ChatResult<String> {
            self.seen.lock().unwrap().push(request.message.clone());
            (self.reply)()
        }
    }

    fn app_with(reply: fn() -> ChatResult<String>) -> (App, Arc<FixedBackend>, mpsc::UnboundedReceiver<AppEvent>) {
        let backend = Arc::new(FixedBackend {
            reply,
            seen: Mutex::new(Vec::new()),
        });
        let (tx, rx) = mpsc::unbounded_channel();
        let app = App::new(backend.clone(), "http://test".to_string(), tx);
        (app, backend, rx)
    }

    fn press(app: &mut App, code: KeyCode) {
        handle_event(app, AppEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))).unwrap();
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    #[test]
    fn test_char_to_byte_index_multibyte() {
        let s = "héllo";
        assert_eq!(char_to_byte_index(s, 0), 0);
        assert_eq!(char_to_byte_index(s, 2), 3);
        assert_eq!(char_to_byte_index(s, 10), s.len());
    }

    #[tokio::test]
    async fn test_cursor_editing() {
        let (mut app, _, _rx) = app_with(|| Ok(String::new()));
        type_text(&mut app, "helo");
        press(&mut app, KeyCode::Left);
        type_text(&mut app, "l");
        assert_eq!(app.input, "hello");

        press(&mut app, KeyCode::Home);
        press(&mut app, KeyCode::Delete);
        assert_eq!(app.input, "ello");

        press(&mut app, KeyCode::End);
        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.input, "ell");
        assert_eq!(app.cursor, 3);
    }

    #[tokio::test]
    async fn test_enter_on_blank_input_sends_nothing() {
        let (mut app, backend, mut rx) = app_with(|| Ok("never".to_string()));
        type_text(&mut app, "   ");
        press(&mut app, KeyCode::Enter);

        assert!(app.controller.transcript().is_empty());
        assert!(!app.is_waiting());
        assert_eq!(app.input, "   ");
        tokio::task::yield_now().await;
        assert!(rx.try_recv().is_err());
        assert!(backend.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_enter_sends_and_reply_lands_in_transcript() {
        let (mut app, backend, mut rx) = app_with(|| Ok("Hi there".to_string()));
        type_text(&mut app, "Hello");
        press(&mut app, KeyCode::Enter);

        assert!(app.input.is_empty());
        assert_eq!(app.cursor, 0);
        assert!(app.is_waiting());

        let event = rx.recv().await.unwrap();
        handle_event(&mut app, event).unwrap();

        assert!(!app.is_waiting());
        assert_eq!(*backend.seen.lock().unwrap(), vec!["Hello".to_string()]);
        let messages = app.controller.transcript().messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].origin, Origin::User);
        assert_eq!(messages[1].text, "Hi there");
    }

    #[tokio::test]
    async fn test_enter_while_waiting_keeps_input() {
        let (mut app, backend, mut rx) = app_with(|| Ok("first".to_string()));
        type_text(&mut app, "A");
        press(&mut app, KeyCode::Enter);
        type_text(&mut app, "B");
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.input, "B");
        assert_eq!(app.controller.transcript().len(), 1);

        let event = rx.recv().await.unwrap();
        handle_event(&mut app, event).unwrap();
        assert_eq!(*backend.seen.lock().unwrap(), vec!["A".to_string()]);
    }

    #[tokio::test]
    async fn test_failed_reply_shows_fallback() {
        let (mut app, _, mut rx) =
            app_with(|| Err(ChatError::Status(StatusCode::INTERNAL_SERVER_ERROR)));
        type_text(&mut app, "Hello");
        press(&mut app, KeyCode::Enter);

        let event = rx.recv().await.unwrap();
        handle_event(&mut app, event).unwrap();

        let last = app.controller.transcript().last().unwrap();
        assert_eq!(last.origin, Origin::Assistant);
        assert_eq!(last.text, FALLBACK_MESSAGE);
    }

    #[tokio::test]
    async fn test_scrolling_up_stops_following() {
        let (mut app, _, _rx) = app_with(|| Ok(String::new()));
        app.controller.render_message("hello", Origin::User);
        app.max_scroll = 10;
        app.scroll = 10;

        press(&mut app, KeyCode::Up);
        assert_eq!(app.scroll, 9);
        assert!(!app.controller.transcript().follows_tail());

        press(&mut app, KeyCode::Down);
        assert_eq!(app.scroll, 10);
        assert!(app.controller.transcript().follows_tail());
    }

    #[tokio::test]
    async fn test_control_and_alt_chords_do_not_type() {
        let (mut app, _, _rx) = app_with(|| Ok(String::new()));
        type_text(&mut app, "hi");
        for modifiers in [KeyModifiers::CONTROL, KeyModifiers::ALT] {
            let event = AppEvent::Key(KeyEvent::new(KeyCode::Char('u'), modifiers));
            handle_event(&mut app, event).unwrap();
        }
        handle_event(
            &mut app,
            AppEvent::Key(KeyEvent::new(KeyCode::Char('X'), KeyModifiers::SHIFT)),
        )
        .unwrap();

        assert_eq!(app.input, "hiX");
        assert!(!app.should_quit);
    }

    #[tokio::test]
    async fn test_multiline_paste_stays_in_input() {
        let (mut app, backend, mut rx) = app_with(|| Ok("never".to_string()));
        type_text(&mut app, "> ");
        handle_event(&mut app, AppEvent::Paste("line one\r\nline two\n".to_string())).unwrap();

        assert_eq!(app.input, "> line one line two ");
        assert_eq!(app.cursor, app.input.chars().count());
        assert!(app.controller.transcript().is_empty());
        assert!(!app.is_waiting());
        tokio::task::yield_now().await;
        assert!(rx.try_recv().is_err());
        assert!(backend.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_escape_quits() {
        let (mut app, _, _rx) = app_with(|| Ok(String::new()));
        press(&mut app, KeyCode::Esc);
        assert!(app.should_quit);
    }
}
