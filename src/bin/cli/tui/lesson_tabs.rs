use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Tabs};

use crate::app::App;

use super::app_state::TuiState;

pub fn draw(f: &mut Frame, area: Rect, state: &TuiState) {
    let block = Block::default()
        .title(" Fiszki ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    // A lesson picked on the command line may not exist in the store yet
    let mut titles: Vec<String> = state
        .lessons
        .iter()
        .map(|l| format!("{} ({})", App::lesson_label(l.lesson_id), l.card_count))
        .collect();
    let selected = match state.selected_tab() {
        Some(i) => i,
        None => {
            titles.push(App::lesson_label(state.selected_lesson));
            titles.len() - 1
        }
    };

    let tabs = Tabs::new(titles)
        .block(block)
        .select(selected)
        .style(Style::default().fg(Color::Gray))
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );

    f.render_widget(tabs, area);
}
