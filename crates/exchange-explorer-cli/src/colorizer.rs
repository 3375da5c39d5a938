//! Terminal colorization for the exchange listing
//!
//! Applies ANSI escape codes with crossterm. The cycling accent colors
//! follow the Monokai palette used by the rendered diagrams.

use crossterm::style::{Color, Stylize};

use exchange_explorer::ExchangeName;

/// Accent colors cycled over listing rows
const ACCENTS: [Color; 5] = [
    Color::Green,
    Color::Magenta,
    Color::Cyan,
    Color::Yellow,
    Color::Blue,
];

/// Accent color of the row at `index`
pub fn accent(index: usize) -> Color {
    ACCENTS[index % ACCENTS.len()]
}

/// Format one listing row as `prefix  action`
///
/// With `color` the prefix is dimmed and the action takes the row accent.
pub fn format_exchange(name: &str, index: usize, color: bool) -> String {
    let split = ExchangeName::parse(name);
    if !color {
        return if split.action.is_empty() {
            split.prefix
        } else {
            format!("{}  {}", split.prefix, split.action)
        };
    }

    let prefix = format!("{}", split.prefix.as_str().dark_grey());
    if split.action.is_empty() {
        prefix
    } else {
        format!("{}  {}", prefix, split.action.as_str().with(accent(index)).bold())
    }
}

/// Highlighted count, e.g. in the match summary
pub fn highlight_count(count: usize, color: bool) -> String {
    if color {
        format!("{}", count.to_string().green())
    } else {
        count.to_string()
    }
}

/// Error line for failure states
pub fn error_text(text: &str, color: bool) -> String {
    if color {
        format!("{}", text.red().bold())
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_row() {
        assert_eq!(
            format_exchange("moirai.topic.database.clone", 0, false),
            "moirai.topic  database.clone"
        );
    }

    #[test]
    fn test_plain_row_without_action() {
        assert_eq!(format_exchange("moirai.topic", 0, false), "moirai.topic");
    }

    #[test]
    fn test_colored_row_contains_ansi_and_text() {
        let row = format_exchange("moirai.topic.database.clone", 1, true);
        assert!(row.contains("\u{1b}["));
        assert!(row.contains("database.clone"));
        assert!(row.contains("moirai.topic"));
    }

    #[test]
    fn test_accent_cycles() {
        assert_eq!(accent(0), accent(5));
        assert_ne!(accent(0), accent(1));
    }

    #[test]
    fn test_plain_helpers() {
        assert_eq!(highlight_count(3, false), "3");
        assert_eq!(error_text("boom", false), "boom");
    }
}
