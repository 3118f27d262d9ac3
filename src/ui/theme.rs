//! Color palette shared by every pane

use ratatui::style::Color;

pub struct Theme {
    /// Plain text and engine log output
    pub fg: Color,
    pub primary: Color,
    /// Debug channel lines and the DEBUG badge
    pub secondary: Color,
    pub comment: Color,
    pub error: Color,

    // Stack cells
    pub string: Color,
    pub number: Color,

    /// Echoed `forth> ` / `prolog> ` prompts
    pub prompt: Color,
    /// Forth word names and Prolog predicate heads in the state pane
    pub word: Color,

    pub border_focused: Color,
    pub border_normal: Color,
    pub bar_bg: Color,
}

pub const DEFAULT_THEME: Theme = Theme {
    fg: Color::Rgb(205, 214, 244),
    primary: Color::Rgb(137, 180, 250),
    secondary: Color::Rgb(203, 166, 247), // Mauve
    comment: Color::Rgb(108, 112, 134),
    error: Color::Rgb(243, 139, 168),
    string: Color::Rgb(166, 227, 161),  // Green
    number: Color::Rgb(148, 226, 213),  // Teal
    prompt: Color::Rgb(116, 199, 236), // Sapphire
    word: Color::Rgb(249, 226, 175),    // Yellow
    border_focused: Color::Rgb(250, 179, 135),
    border_normal: Color::Rgb(88, 91, 112),
    bar_bg: Color::Rgb(49, 50, 68),
};
