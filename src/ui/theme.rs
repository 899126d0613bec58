// Provider color palettes

use ratatui::style::{Color, Modifier, Style};

use crate::engine::Provider;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub primary: Color,
    pub secondary: Color,
}

impl Palette {
    pub fn for_provider(provider: Provider) -> Self {
        match provider {
            Provider::Aws => Self {
                primary: Color::Rgb(0xFF, 0x99, 0x00),
                secondary: Color::Rgb(0x23, 0x2F, 0x3E),
            },
            Provider::Azure => Self {
                primary: Color::Rgb(0x00, 0x78, 0xD4),
                secondary: Color::Rgb(0x00, 0x4E, 0x8C),
            },
            Provider::Gcp => Self {
                primary: Color::Rgb(0x42, 0x85, 0xF4),
                secondary: Color::Rgb(0x1A, 0x73, 0xE8),
            },
        }
    }

    pub fn border(&self) -> Style {
        Style::default().fg(self.primary)
    }

    pub fn title(&self) -> Style {
        Style::default()
            .fg(self.primary)
            .add_modifier(Modifier::BOLD)
    }

    /// Background of the provider bar
    pub fn bar(&self) -> Style {
        Style::default().bg(self.secondary)
    }

    /// Highlighted row in lists and tabs
    pub fn highlight(&self) -> Style {
        Style::default()
            .bg(self.primary)
            .fg(Color::Black)
            .add_modifier(Modifier::BOLD)
    }
}
