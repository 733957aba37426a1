use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use fiszki_lib::session::SessionStatus;

use super::app_state::TuiState;

pub fn handle_key(state: &mut TuiState, key: KeyEvent) {
    // Clear flash message on any keypress
    state.flash_message = None;

    // Help popup swallows everything but its own toggle and quit
    if state.show_help {
        match key.code {
            KeyCode::Char('?') | KeyCode::Esc => state.show_help = false,
            _ if is_quit(&key) => state.quit = true,
            _ => {}
        }
        return;
    }

    if is_quit(&key) {
        state.quit = true;
        return;
    }

    // No input while a lesson is loading
    if state.is_loading() {
        return;
    }

    match key.code {
        KeyCode::Char('?') => state.show_help = true,
        KeyCode::Tab | KeyCode::Right | KeyCode::Char('l') => state.next_lesson(),
        KeyCode::BackTab | KeyCode::Left | KeyCode::Char('h') => state.prev_lesson(),
        KeyCode::Char('r') => state.reload(),
        _ => handle_session_key(state, key),
    }
}

fn is_quit(key: &KeyEvent) -> bool {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => true,
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

fn handle_session_key(state: &mut TuiState, key: KeyEvent) {
    match state.snapshot.status {
        SessionStatus::Ready => match key.code {
            KeyCode::Char(c @ '1'..='4') => {
                let index = c as usize - '1' as usize;
                state.select_answer(index);
            }
            KeyCode::Enter | KeyCode::Char(' ') => state.continue_after_answer(),
            _ => {}
        },
        SessionStatus::Completed => {
            if key.code == KeyCode::Char('R') {
                state.restart_lesson();
            }
        }
        SessionStatus::Empty | SessionStatus::Idle | SessionStatus::Loading => {}
    }
}
