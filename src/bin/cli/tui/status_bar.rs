use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use fiszki_lib::session::SessionStatus;

use super::app_state::{Flash, TuiState};

pub fn draw(f: &mut Frame, area: Rect, state: &TuiState) {
    // Show flash message if present
    if let Some(ref flash) = state.flash_message {
        let bar = Paragraph::new(format!(" {}", flash.text())).style(flash_style(flash));
        f.render_widget(bar, area);
        return;
    }

    let hints = match state.snapshot.status {
        SessionStatus::Idle | SessionStatus::Loading => " Ładowanie...  q: wyjście ",
        SessionStatus::Empty => " r: wczytaj ponownie  Tab: następna lekcja  ?: pomoc  q: wyjście ",
        SessionStatus::Completed => " R: od nowa  Tab: następna lekcja  ?: pomoc  q: wyjście ",
        SessionStatus::Ready if state.verdict().is_some() => {
            " Enter: dalej  Tab: następna lekcja  ?: pomoc  q: wyjście "
        }
        SessionStatus::Ready => {
            " 1-4: odpowiedź  Tab: następna lekcja  r: wczytaj ponownie  ?: pomoc  q: wyjście "
        }
    };

    let status = Paragraph::new(hints)
        .style(Style::default().bg(Color::DarkGray).fg(Color::White));
    f.render_widget(status, area);
}

fn flash_style(flash: &Flash) -> Style {
    if flash.is_error() {
        Style::default().bg(Color::Red).fg(Color::White)
    } else {
        Style::default().bg(Color::Green).fg(Color::Black)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_flash_is_red() {
        let flash = Flash::Error("Nie udało się wczytać: Lekcja 1".to_string());
        assert_eq!(flash_style(&flash).bg, Some(Color::Red));
        assert_eq!(flash.text(), "Nie udało się wczytać: Lekcja 1");
    }

    #[test]
    fn test_info_flash_is_green() {
        let flash = Flash::Info("Lekcja ukończona!".to_string());
        assert!(!flash.is_error());
        assert_eq!(flash_style(&flash).bg, Some(Color::Green));
    }
}
