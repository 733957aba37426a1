use fiszki_lib::Flashcard;

/// ANSI color codes
pub struct Color;

impl Color {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";
    pub const RED: &str = "\x1b[31m";
    pub const GREEN: &str = "\x1b[32m";
    pub const GRAY: &str = "\x1b[90m";
}

fn paint(text: &str, color: &str, use_color: bool) -> String {
    if use_color {
        format!("{}{}{}", color, text, Color::RESET)
    } else {
        text.to_string()
    }
}

/// Render one flashcard as terminal lines: question, correct answer, decoys
pub fn render_flashcard(card: &Flashcard, number: usize, placeholder: &str, use_color: bool) -> String {
    let mut lines = Vec::new();

    let id = paint(&format!("#{}", card.id), Color::GRAY, use_color);
    lines.push(format!("{:>3}. {} {}", number, paint(&card.question, Color::BOLD, use_color), id));
    lines.push(format!("     {} {}", paint("+", Color::GREEN, use_color), card.answer));

    for decoy in &card.decoys {
        match decoy {
            Some(text) => lines.push(format!("     {} {}", paint("-", Color::RED, use_color), text)),
            None => lines.push(format!(
                "     {} {}",
                paint("-", Color::RED, use_color),
                paint(placeholder, Color::DIM, use_color)
            )),
        }
    }

    lines.join("\n")
}
