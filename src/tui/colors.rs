//! Color palettes for the terminal user interface.

use ratatui::style::Color;

use crate::fields::{Priority, Theme};

/// Colors for one theme.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Palette {
    pub bg: Color,
    pub fg: Color,
    pub muted: Color,
    pub primary: Color,
    pub success: Color,
    pub warning: Color,
    pub danger: Color,
    pub highlight_bg: Color,
    pub highlight_fg: Color,
}

pub const LIGHT: Palette = Palette {
    bg: Color::Rgb(248, 249, 250),
    fg: Color::Rgb(33, 37, 41),
    muted: Color::Rgb(108, 117, 125),
    primary: Color::Rgb(67, 97, 238),
    success: Color::Rgb(46, 160, 67),
    warning: Color::Rgb(214, 140, 0),
    danger: Color::Rgb(200, 35, 51),
    highlight_bg: Color::Rgb(222, 226, 255),
    highlight_fg: Color::Rgb(20, 20, 20),
};

pub const DARK: Palette = Palette {
    bg: Color::Rgb(18, 18, 24),
    fg: Color::Rgb(230, 230, 235),
    muted: Color::Rgb(140, 140, 150),
    primary: Color::Rgb(114, 137, 255),
    success: Color::Rgb(87, 199, 110),
    warning: Color::Rgb(255, 196, 0),
    danger: Color::Rgb(255, 85, 85),
    highlight_bg: Color::Rgb(60, 60, 90),
    highlight_fg: Color::White,
};

impl Palette {
    pub fn for_theme(theme: Theme) -> Palette {
        match theme {
            Theme::Light => LIGHT,
            Theme::Dark => DARK,
        }
    }

    pub fn priority(&self, p: Priority) -> Color {
        match p {
            Priority::High => self.danger,
            Priority::Medium => self.warning,
            Priority::Low => self.success,
        }
    }
}
