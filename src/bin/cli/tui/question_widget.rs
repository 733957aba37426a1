use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use fiszki_lib::session::{SessionSnapshot, SessionStatus, Verdict};

use crate::app::App;

use super::app_state::TuiState;

pub fn draw(f: &mut Frame, area: Rect, state: &TuiState) {
    let snapshot = &state.snapshot;
    let lesson = snapshot.lesson_id.unwrap_or(state.selected_lesson);

    let block = Block::default()
        .title(format!(" {} ", App::lesson_label(lesson)))
        .borders(Borders::ALL)
        .border_style(match snapshot.verdict {
            Some(Verdict::Correct) => Style::default().fg(Color::Green),
            Some(Verdict::Incorrect) => Style::default().fg(Color::Red),
            None => Style::default().fg(Color::Cyan),
        });

    let lines = match snapshot.status {
        SessionStatus::Idle | SessionStatus::Loading => vec![
            Line::from(""),
            Line::from(Span::styled(
                format!("  Ładowanie: {}...", App::lesson_label(lesson)),
                Style::default().fg(Color::Yellow),
            )),
        ],
        SessionStatus::Empty => vec![
            Line::from(""),
            Line::from(Span::styled(
                "  Brak fiszek w tej lekcji.",
                Style::default().fg(Color::DarkGray),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "  r: wczytaj ponownie, Tab: inna lekcja.",
                Style::default().fg(Color::DarkGray),
            )),
        ],
        SessionStatus::Ready | SessionStatus::Completed => card_lines(snapshot),
    };

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    f.render_widget(paragraph, area);
}

fn card_lines(snapshot: &SessionSnapshot) -> Vec<Line<'static>> {
    let Some(card) = snapshot.flashcard.as_ref() else {
        return Vec::new();
    };

    let mut lines = vec![
        Line::from(Span::styled(
            format!("  Fiszka {} z {}", snapshot.position + 1, snapshot.total),
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!("  {}", card.question),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];

    for (i, choice) in snapshot.choices.iter().enumerate() {
        let style = match snapshot.selected {
            Some(selected) if selected == i && choice.is_correct => {
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
            }
            Some(selected) if selected == i => {
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
            }
            Some(_) => Style::default().fg(Color::DarkGray),
            None => Style::default(),
        };
        lines.push(Line::from(Span::styled(
            format!("  [{}] {}", i + 1, choice.text),
            style,
        )));
    }

    lines.push(Line::from(""));

    if snapshot.status == SessionStatus::Completed {
        lines.push(Line::from(Span::styled(
            "  Lekcja ukończona! R: od nowa  Tab: następna lekcja",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )));
        return lines;
    }

    match snapshot.verdict {
        Some(Verdict::Correct) => lines.push(Line::from(Span::styled(
            "  Dobrze! Enter: następna fiszka",
            Style::default().fg(Color::Green),
        ))),
        Some(Verdict::Incorrect) => lines.push(Line::from(Span::styled(
            "  Źle! Enter: spróbuj dalej",
            Style::default().fg(Color::Red),
        ))),
        None => {}
    }

    lines.push(Line::from(Span::styled(
        format!("  Pozostało fiszek: {}", snapshot.remaining()),
        Style::default().fg(Color::DarkGray),
    )));

    lines
}
