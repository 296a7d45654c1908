use ratatui::style::{Color, Modifier, Style};

/// Neon-green terminal theme.
///
/// Series colors are chosen to stay readable on the near-black background.
pub struct Theme;

impl Theme {
    // Core palette
    pub const BG: Color = Color::Rgb(0, 0, 0);
    pub const FG_NEON: Color = Color::Rgb(57, 255, 20);
    pub const FG_DIM: Color = Color::Rgb(0, 190, 0);
    pub const FG_MUTED: Color = Color::Rgb(80, 90, 80);

    pub const ACCENT_CYAN: Color = Color::Rgb(0, 255, 255);
    pub const ACCENT_MAGENTA: Color = Color::Rgb(255, 0, 255);
    pub const ACCENT_YELLOW: Color = Color::Rgb(255, 255, 0);
    pub const ACCENT_RED: Color = Color::Rgb(255, 70, 70);

    /// Batch error, epoch error, validation error.
    pub const SERIES: [Color; 3] = [Self::FG_DIM, Self::ACCENT_CYAN, Self::ACCENT_MAGENTA];

    /// Default full-screen style.
    pub fn base() -> Style {
        Style::default().fg(Self::FG_NEON).bg(Self::BG)
    }

    pub fn border() -> Style {
        Style::default().fg(Self::FG_NEON).bg(Self::BG)
    }

    /// Border of the status panel while connected, alternating with the pulse.
    pub fn pulse(phase: u64) -> Style {
        if phase % 2 == 0 {
            Self::border().add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Self::FG_MUTED).bg(Self::BG)
        }
    }

    pub fn title() -> Style {
        Style::default()
            .fg(Self::FG_NEON)
            .add_modifier(Modifier::BOLD)
    }

    pub fn text() -> Style {
        Style::default().fg(Self::FG_NEON)
    }

    pub fn dim() -> Style {
        Style::default().fg(Self::FG_DIM)
    }

    /// Muted/disabled text.
    pub fn muted() -> Style {
        Style::default().fg(Self::FG_MUTED)
    }

    /// Highlight row background.
    pub fn highlight_bg() -> Style {
        Style::default()
            .bg(Color::Rgb(0, 30, 0))
            .add_modifier(Modifier::BOLD)
    }

    pub fn warn() -> Style {
        Style::default()
            .fg(Self::ACCENT_YELLOW)
            .add_modifier(Modifier::BOLD)
    }

    pub fn error() -> Style {
        Style::default()
            .fg(Self::ACCENT_RED)
            .add_modifier(Modifier::BOLD)
    }

    pub fn series(i: usize) -> Style {
        Style::default().fg(Self::SERIES[i % Self::SERIES.len()])
    }
}
