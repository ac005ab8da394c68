//! # Theme System
//!
//! Colors used by the NiriSetup TUI, grouped by semantic role. Rendering
//! code reads theme fields instead of hardcoding colors. The active theme is
//! picked by name in the settings file.
//!
//! ## Built-in Themes
//!
//! - **Catppuccin Mocha** (default)
//! - **Catppuccin Macchiato**
//! - **Dracula**
//! - **Nord**
//! - **Terminal** - the terminal's own palette, salmon log lines

use ratatui::style::Color;

#[derive(Debug, Clone)]
pub struct Theme {
    /// Name used in `settings.json`.
    pub name: &'static str,

    /// Panel background.
    pub bg: Color,
    /// Primary text.
    pub fg: Color,
    /// Hints, footer and idle borders.
    pub fg_dim: Color,

    /// Title, focused borders and the cursor row.
    pub accent: Color,
    /// Selected action and the processing indicator.
    pub secondary: Color,
    /// Session log lines.
    pub log: Color,

    pub success: Color,
    pub error: Color,
}

impl Theme {
    /// All built-in themes.
    pub fn all() -> &'static [Theme] {
        &BUILT_IN_THEMES
    }

    /// Find a built-in theme by name (case-insensitive).
    pub fn by_name(name: &str) -> Option<&'static Theme> {
        BUILT_IN_THEMES
            .iter()
            .find(|t| t.name.eq_ignore_ascii_case(name))
    }

    pub fn default_theme() -> &'static Theme {
        &BUILT_IN_THEMES[0]
    }
}

static BUILT_IN_THEMES: [Theme; 5] = [
    Theme {
        name: "Catppuccin Mocha",
        bg: Color::Rgb(30, 30, 46),           // base
        fg: Color::Rgb(205, 214, 244),        // text
        fg_dim: Color::Rgb(108, 112, 134),    // overlay0
        accent: Color::Rgb(137, 180, 250),    // blue
        secondary: Color::Rgb(249, 226, 175), // yellow
        log: Color::Rgb(250, 179, 135),       // peach
        success: Color::Rgb(166, 227, 161),   // green
        error: Color::Rgb(243, 139, 168),     // red
    },
    Theme {
        name: "Catppuccin Macchiato",
        bg: Color::Rgb(36, 39, 58),
        fg: Color::Rgb(202, 211, 245),
        fg_dim: Color::Rgb(110, 115, 141),
        accent: Color::Rgb(138, 173, 244),
        secondary: Color::Rgb(238, 212, 159),
        log: Color::Rgb(245, 169, 127),
        success: Color::Rgb(166, 218, 149),
        error: Color::Rgb(237, 135, 150),
    },
    Theme {
        name: "Dracula",
        bg: Color::Rgb(40, 42, 54),
        fg: Color::Rgb(248, 248, 242),
        fg_dim: Color::Rgb(98, 114, 164),
        accent: Color::Rgb(189, 147, 249),    // purple
        secondary: Color::Rgb(241, 250, 140), // yellow
        log: Color::Rgb(255, 184, 108),       // orange
        success: Color::Rgb(80, 250, 123),
        error: Color::Rgb(255, 85, 85),
    },
    Theme {
        name: "Nord",
        bg: Color::Rgb(46, 52, 64),
        fg: Color::Rgb(216, 222, 233),
        fg_dim: Color::Rgb(76, 86, 106),
        accent: Color::Rgb(136, 192, 208),    // frost
        secondary: Color::Rgb(235, 203, 139), // aurora yellow
        log: Color::Rgb(208, 135, 112),       // aurora orange
        success: Color::Rgb(163, 190, 140),
        error: Color::Rgb(191, 97, 106),
    },
    Theme {
        name: "Terminal",
        bg: Color::Reset,
        fg: Color::Reset,
        fg_dim: Color::DarkGray,
        accent: Color::Cyan,
        secondary: Color::Yellow,
        log: Color::Rgb(255, 160, 122), // light salmon
        success: Color::Green,
        error: Color::Red,
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    fn ctp(color: catppuccin::Color) -> Color {
        Color::Rgb(color.rgb.r, color.rgb.g, color.rgb.b)
    }

    #[test]
    fn test_default_is_mocha() {
        assert_eq!(Theme::default_theme().name, "Catppuccin Mocha");
    }

    #[test]
    fn test_by_name_case_insensitive() {
        assert!(Theme::by_name("catppuccin mocha").is_some());
        assert!(Theme::by_name("NORD").is_some());
        assert!(Theme::by_name("terminal").is_some());
        assert!(Theme::by_name("solarized").is_none());
    }

    #[test]
    fn test_catppuccin_mocha_matches_palette() {
        let mocha = catppuccin::PALETTE.mocha.colors;
        let theme = Theme::default_theme();
        assert_eq!(theme.bg, ctp(mocha.base));
        assert_eq!(theme.fg, ctp(mocha.text));
        assert_eq!(theme.accent, ctp(mocha.blue));
        assert_eq!(theme.log, ctp(mocha.peach));
        assert_eq!(theme.success, ctp(mocha.green));
        assert_eq!(theme.error, ctp(mocha.red));
    }

    #[test]
    fn test_catppuccin_macchiato_matches_palette() {
        let macchiato = catppuccin::PALETTE.macchiato.colors;
        let theme = Theme::by_name("Catppuccin Macchiato").expect("theme exists");
        assert_eq!(theme.bg, ctp(macchiato.base));
        assert_eq!(theme.log, ctp(macchiato.peach));
    }

    #[test]
    fn test_all_themes_have_distinct_names() {
        let mut names: Vec<&str> = Theme::all().iter().map(|t| t.name).collect();
        let count = names.len();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), count, "duplicate theme names found");
    }
}
