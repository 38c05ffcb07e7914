use ratatui::style::{Color, Modifier, Style};

/// Colors used by the terminal front end
#[derive(Clone, Debug)]
pub struct Theme {
    /// Foreground (text) color for the status bar
    pub status_bar_fg: Color,

    /// Background color for the status bar
    pub status_bar_bg: Color,

    /// Color for the current file name in the status bar
    pub filename_color: Color,

    /// Foreground color for tag entities
    pub tag_fg: Color,

    /// Background color for tag entities
    pub tag_bg: Color,

    /// Border color of the serialized preview pane
    pub preview_border: Color,

    /// Foreground color for suggestion menu items
    pub menu_fg: Color,

    /// Background color for the suggestion menu
    pub menu_bg: Color,

    /// Foreground color for the highlighted suggestion
    pub menu_selected_fg: Color,

    /// Background color for the highlighted suggestion
    pub menu_selected_bg: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            status_bar_fg: Color::White,
            status_bar_bg: Color::Blue,
            filename_color: Color::LightYellow,
            tag_fg: Color::Black,
            tag_bg: Color::LightCyan,
            preview_border: Color::DarkGray,
            menu_fg: Color::White,
            menu_bg: Color::Black,
            menu_selected_fg: Color::White,
            menu_selected_bg: Color::LightBlue,
        }
    }
}

impl Theme {
    pub fn status_bar_style(&self) -> Style {
        Style::default()
            .fg(self.status_bar_fg)
            .bg(self.status_bar_bg)
    }

    pub fn filename_style(&self) -> Style {
        Style::default().fg(self.filename_color)
    }

    /// Tags stand out from the surrounding text as a bold chip
    pub fn tag_style(&self) -> Style {
        Style::default()
            .fg(self.tag_fg)
            .bg(self.tag_bg)
            .add_modifier(Modifier::BOLD)
    }

    pub fn preview_border_style(&self) -> Style {
        Style::default().fg(self.preview_border)
    }

    pub fn menu_style(&self) -> Style {
        Style::default().fg(self.menu_fg).bg(self.menu_bg)
    }

    pub fn menu_selected_style(&self) -> Style {
        Style::default()
            .fg(self.menu_selected_fg)
            .bg(self.menu_selected_bg)
    }
}
