//! Color themes for the interface.

use ratatui::style::Color;

/// An RGB color that renders into a `ratatui` color.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ThemeColor(pub u8, pub u8, pub u8);

impl ThemeColor {
    pub fn to_color(self) -> Color {
        Color::Rgb(self.0, self.1, self.2)
    }
}

/// Named color roles used across the interface.
///
#[derive(Clone, Debug)]
pub struct Theme {
    pub primary: ThemeColor,
    pub banner: ThemeColor,
    pub text: ThemeColor,
    pub text_dim: ThemeColor,
    pub border_normal: ThemeColor,
    pub border_active: ThemeColor,
    pub error: ThemeColor,
    pub warning: ThemeColor,
    pub success: ThemeColor,
}

impl Default for Theme {
    fn default() -> Theme {
        Theme::tokyo_night()
    }
}

impl Theme {
    /// Resolve a theme by its configured name, falling back to the default.
    ///
    pub fn by_name(name: &str) -> Theme {
        match name {
            "tokyo-night" => Theme::tokyo_night(),
            "gruvbox" => Theme::gruvbox(),
            "plain" => Theme::plain(),
            other => {
                log::warn!("Unknown theme '{}', using tokyo-night", other);
                Theme::tokyo_night()
            }
        }
    }

    pub fn tokyo_night() -> Theme {
        Theme {
            primary: ThemeColor(122, 162, 247),
            banner: ThemeColor(187, 154, 247),
            text: ThemeColor(192, 202, 245),
            text_dim: ThemeColor(86, 95, 137),
            border_normal: ThemeColor(59, 66, 97),
            border_active: ThemeColor(122, 162, 247),
            error: ThemeColor(247, 118, 142),
            warning: ThemeColor(224, 175, 104),
            success: ThemeColor(158, 206, 106),
        }
    }

    pub fn gruvbox() -> Theme {
        Theme {
            primary: ThemeColor(215, 153, 33),
            banner: ThemeColor(177, 98, 134),
            text: ThemeColor(235, 219, 178),
            text_dim: ThemeColor(146, 131, 116),
            border_normal: ThemeColor(80, 73, 69),
            border_active: ThemeColor(215, 153, 33),
            error: ThemeColor(204, 36, 29),
            warning: ThemeColor(214, 93, 14),
            success: ThemeColor(152, 151, 26),
        }
    }

    pub fn plain() -> Theme {
        Theme {
            primary: ThemeColor(255, 255, 255),
            banner: ThemeColor(255, 255, 255),
            text: ThemeColor(229, 229, 229),
            text_dim: ThemeColor(128, 128, 128),
            border_normal: ThemeColor(128, 128, 128),
            border_active: ThemeColor(255, 255, 255),
            error: ThemeColor(229, 80, 80),
            warning: ThemeColor(229, 180, 80),
            success: ThemeColor(120, 229, 120),
        }
    }
}
