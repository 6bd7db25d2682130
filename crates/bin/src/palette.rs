use banter::Theme;
use ratatui::style::Color;

/// Colors used to draw the chat under a theme.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub background: Color,
    pub text: Color,
    pub border: Color,
    pub title: Color,
    pub timestamp: Color,
    pub outbound: Color,
    pub inbound: Color,
    pub highlight: Color,
    pub status: Color,
    pub typing: Color,
}

const LIGHT: Palette = Palette {
    background: Color::White,
    text: Color::Black,
    border: Color::Gray,
    title: Color::Blue,
    timestamp: Color::DarkGray,
    outbound: Color::Blue,
    inbound: Color::Magenta,
    highlight: Color::LightYellow,
    status: Color::DarkGray,
    typing: Color::Gray,
};

const DARK: Palette = Palette {
    background: Color::Black,
    text: Color::White,
    border: Color::DarkGray,
    title: Color::Cyan,
    timestamp: Color::Yellow,
    outbound: Color::Green,
    inbound: Color::LightMagenta,
    highlight: Color::DarkGray,
    status: Color::Cyan,
    typing: Color::Gray,
};

impl Palette {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Light => LIGHT,
            Theme::Dark => DARK,
        }
    }
}
