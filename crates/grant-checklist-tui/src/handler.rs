use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;

use grant_checklist_core::SummaryTab;

use crate::app::{App, FocusPane, InputMode};
use crate::tui::AppEvent;

pub fn handle_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::Key(key) => handle_key(app, key),
        AppEvent::Mouse(mouse) => handle_mouse(app, mouse),
        AppEvent::Resize => {}
        AppEvent::Tick => app.tick_animation(),
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Global keys that work in any mode
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    if app.show_goto {
        handle_goto_input(app, key);
        return;
    }

    match app.input_mode {
        InputMode::Normal => handle_normal_mode(app, key),
        InputMode::Editing => handle_chat_editing(app, key),
    }
}

fn handle_normal_mode(app: &mut App, key: KeyEvent) {
    app.status_message = None;

    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Tab => app.toggle_focus(),

        // Tabs
        KeyCode::Char(c @ '1'..='4') => {
            if let Some(tab) = SummaryTab::from_index(c as usize - '1' as usize) {
                app.select_tab(tab);
            }
        }
        KeyCode::Char('l') | KeyCode::Right => app.next_tab(),
        KeyCode::Char('h') | KeyCode::Left => app.prev_tab(),

        // Scrolling
        KeyCode::Char('j') | KeyCode::Down => app.scroll_down(),
        KeyCode::Char('k') | KeyCode::Up => app.scroll_up(),

        // Chat
        KeyCode::Char('i') | KeyCode::Enter => {
            app.focus = FocusPane::Chat;
            app.input_mode = InputMode::Editing;
        }
        KeyCode::Char('C') => app.clear_chat(),
        KeyCode::F(n @ 1..=3) => app.use_quick_reply(n as usize - 1),

        // Documents
        KeyCode::Char('g') => app.open_goto(),
        KeyCode::Char('y') => {
            app.status_message = Some(match app.drafting_link() {
                Some(link) => {
                    copy_to_clipboard(&link);
                    format!("Drafting link: {}", link)
                }
                None => "No document loaded".to_string(),
            });
        }

        _ => {}
    }
}

fn handle_chat_editing(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.input_mode = InputMode::Normal,
        // Typing stays enabled while a reply is pending; only sending waits
        KeyCode::Enter => app.send_chat(),
        KeyCode::F(n @ 1..=3) => app.use_quick_reply(n as usize - 1),
        KeyCode::Backspace => app.transcript.backspace(),
        KeyCode::Delete => app.transcript.delete(),
        KeyCode::Left => app.transcript.cursor_left(),
        KeyCode::Right => app.transcript.cursor_right(),
        KeyCode::Home => app.transcript.cursor_home(),
        KeyCode::End => app.transcript.cursor_end(),
        KeyCode::Char(c) => app.transcript.insert_char(c),
        _ => {}
    }
}

fn handle_goto_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.show_goto = false;
            app.goto_input.clear();
            app.status_message = None;
        }
        KeyCode::Enter => app.submit_goto(),
        KeyCode::Backspace => {
            app.goto_input.pop();
        }
        KeyCode::Char(c) => app.goto_input.push(c),
        _ => {}
    }
}

/// Check if a point is within a rectangle
fn point_in_rect(x: u16, y: u16, rect: Rect) -> bool {
    x >= rect.x && x < rect.x + rect.width && y >= rect.y && y < rect.y + rect.height
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    let in_summary = app.summary_area.is_some_and(|r| point_in_rect(mouse.column, mouse.row, r));
    let in_chat = app.chat_area.is_some_and(|r| point_in_rect(mouse.column, mouse.row, r));

    // Scroll whichever pane is under the pointer
    let target = if in_summary {
        FocusPane::Summary
    } else if in_chat {
        FocusPane::Chat
    } else {
        return;
    };

    let previous = app.focus;
    app.focus = target;
    match mouse.kind {
        MouseEventKind::ScrollDown => {
            for _ in 0..3 {
                app.scroll_down();
            }
        }
        MouseEventKind::ScrollUp => {
            for _ in 0..3 {
                app.scroll_up();
            }
        }
        _ => {}
    }
    app.focus = previous;
}

fn copy_to_clipboard(text: &str) {
    use std::io::Write;
    use std::process::{Command, Stdio};

    let tools: [(&str, &[&str]); 3] = [
        ("pbcopy", &[]),
        ("wl-copy", &[]),
        ("xclip", &["-selection", "clipboard"]),
    ];
    for (program, args) in tools {
        if let Ok(mut child) = Command::new(program).args(args).stdin(Stdio::piped()).spawn() {
            if let Some(mut stdin) = child.stdin.take() {
                let _ = stdin.write_all(text.as_bytes());
            }
            let _ = child.wait();
            return;
        }
    }
    tracing::warn!("no clipboard tool found");
}
