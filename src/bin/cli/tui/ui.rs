use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use super::app_state::TuiState;
use super::{lesson_tabs, question_widget, status_bar};

const HELP_LINES: &[(&str, &str)] = &[
    ("1-4", "wybierz odpowiedź"),
    ("Enter", "dalej / spróbuj ponownie"),
    ("Tab, l", "następna lekcja"),
    ("S-Tab, h", "poprzednia lekcja"),
    ("r", "wczytaj lekcję ponownie"),
    ("R", "od nowa (ukończona lekcja)"),
    ("?", "pomoc"),
    ("q, Esc", "wyjście"),
];

pub fn draw(f: &mut Frame, state: &TuiState) {
    let size = f.area();

    // Tabs + question panel + status bar
    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(size);

    lesson_tabs::draw(f, outer[0], state);
    question_widget::draw(f, outer[1], state);
    status_bar::draw(f, outer[2], state);

    if state.show_help {
        draw_help(f, size);
    }
}

fn draw_help(f: &mut Frame, area: Rect) {
    let width = 44.min(area.width);
    let height = (HELP_LINES.len() as u16 + 2).min(area.height);
    let popup = Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        y: area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    };

    let lines: Vec<Line> = HELP_LINES
        .iter()
        .map(|(key, what)| {
            Line::from(vec![
                Span::styled(format!(" {:<10}", key), Style::default().fg(Color::Cyan)),
                Span::raw(*what),
            ])
        })
        .collect();

    let block = Block::default()
        .title(" Klawisze ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    // Clear the area behind the popup
    f.render_widget(Clear, popup);
    f.render_widget(Paragraph::new(lines).block(block), popup);
}
