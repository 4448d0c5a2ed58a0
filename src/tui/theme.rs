//! Centralized theme and color scheme for the TUI.

use ratatui::prelude::*;
use std::sync::RwLock;

/// Semantic colors for the explorer UI.
#[derive(Debug, Clone, Copy)]
pub struct ColorScheme {
    // Instance lifecycle states
    pub running: Color,
    pub stopped: Color,
    pub transitional: Color,

    // Resource kind accents
    pub region: Color,
    pub vpc: Color,
    pub subnet: Color,
    pub instance: Color,
    pub security_group: Color,

    // UI elements
    pub primary: Color,
    pub accent: Color,
    pub muted: Color,
    pub border: Color,
    pub border_focused: Color,
    pub background_alt: Color,
    pub text: Color,
    pub text_muted: Color,
    pub selection: Color,

    // Status
    pub success: Color,
    pub warning: Color,
    pub error: Color,

    // Badge foregrounds
    pub badge_fg_dark: Color,
    pub badge_fg_light: Color,
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self::dark()
    }
}

impl ColorScheme {
    const fn dark_const() -> Self {
        Self {
            running: Color::Green,
            stopped: Color::Red,
            transitional: Color::Yellow,

            region: Color::Cyan,
            vpc: Color::Blue,
            subnet: Color::Magenta,
            instance: Color::White,
            security_group: Color::Yellow,

            primary: Color::Cyan,
            accent: Color::Yellow,
            muted: Color::DarkGray,
            border: Color::DarkGray,
            border_focused: Color::Cyan,
            background_alt: Color::Rgb(30, 30, 40),
            text: Color::White,
            text_muted: Color::Gray,
            selection: Color::DarkGray,

            success: Color::Green,
            warning: Color::Yellow,
            error: Color::Red,

            badge_fg_dark: Color::Black,
            badge_fg_light: Color::White,
        }
    }

    pub fn dark() -> Self {
        Self::dark_const()
    }

    pub fn light() -> Self {
        Self {
            running: Color::Rgb(0, 128, 0),
            stopped: Color::Rgb(200, 0, 0),
            transitional: Color::Rgb(180, 140, 0),

            region: Color::Rgb(0, 100, 150),
            vpc: Color::Rgb(0, 0, 150),
            subnet: Color::Rgb(128, 0, 128),
            instance: Color::Rgb(30, 30, 30),
            security_group: Color::Rgb(180, 140, 0),

            primary: Color::Rgb(0, 100, 150),
            accent: Color::Rgb(180, 140, 0),
            muted: Color::Rgb(150, 150, 150),
            border: Color::Rgb(180, 180, 180),
            border_focused: Color::Rgb(0, 100, 150),
            background_alt: Color::Rgb(240, 240, 245),
            text: Color::Rgb(30, 30, 30),
            text_muted: Color::Rgb(100, 100, 100),
            selection: Color::Rgb(200, 220, 240),

            success: Color::Rgb(0, 128, 0),
            warning: Color::Rgb(180, 140, 0),
            error: Color::Rgb(200, 0, 0),

            badge_fg_dark: Color::Rgb(30, 30, 30),
            badge_fg_light: Color::White,
        }
    }

    /// Color for an instance lifecycle state string.
    pub fn state_color(&self, state: &str) -> Color {
        match state.to_lowercase().as_str() {
            "running" => self.running,
            "stopped" | "terminated" | "shutting-down" => self.stopped,
            "pending" | "stopping" | "rebooting" => self.transitional,
            _ => self.text_muted,
        }
    }
}

/// Global theme instance (runtime switchable)
static THEME: RwLock<Theme> = RwLock::new(Theme::dark_const());

#[derive(Debug, Clone)]
pub struct Theme {
    pub colors: ColorScheme,
    pub name: &'static str,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    const fn dark_const() -> Self {
        Self {
            colors: ColorScheme::dark_const(),
            name: "dark",
        }
    }

    pub fn dark() -> Self {
        Self {
            colors: ColorScheme::dark(),
            name: "dark",
        }
    }

    pub fn light() -> Self {
        Self {
            colors: ColorScheme::light(),
            name: "light",
        }
    }

    pub fn from_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "light" => Self::light(),
            _ => Self::dark(),
        }
    }

    pub fn next(&self) -> Self {
        match self.name {
            "dark" => Self::light(),
            _ => Self::dark(),
        }
    }
}

pub fn set_theme(theme: Theme) {
    *THEME.write().expect("THEME lock not poisoned") = theme;
}

/// Toggle between dark and light.
pub fn toggle_theme() -> &'static str {
    let mut theme = THEME.write().expect("THEME lock not poisoned");
    *theme = theme.next();
    theme.name
}

/// Convenience function to get current colors
pub fn colors() -> ColorScheme {
    THEME.read().expect("THEME lock not poisoned").colors
}

/// Common style presets for consistent UI elements
pub struct Styles;

impl Styles {
    pub fn header_title() -> Style {
        Style::default().fg(colors().primary).bold()
    }

    pub fn text() -> Style {
        Style::default().fg(colors().text)
    }

    pub fn text_muted() -> Style {
        Style::default().fg(colors().text_muted)
    }

    pub fn label() -> Style {
        Style::default().fg(colors().muted)
    }

    pub fn value() -> Style {
        Style::default().fg(colors().text).bold()
    }

    pub fn selected() -> Style {
        Style::default()
            .bg(colors().selection)
            .fg(colors().text)
            .bold()
    }

    pub fn border() -> Style {
        Style::default().fg(colors().border)
    }

    pub fn border_focused() -> Style {
        Style::default().fg(colors().border_focused)
    }

    pub fn status_bar() -> Style {
        Style::default().bg(colors().background_alt)
    }

    pub fn shortcut_key() -> Style {
        Style::default().fg(colors().accent)
    }

    pub fn shortcut_desc() -> Style {
        Style::default().fg(colors().text_muted)
    }

    pub fn warning() -> Style {
        Style::default().fg(colors().warning)
    }

    pub fn error() -> Style {
        Style::default().fg(colors().error)
    }
}

/// Render the active-filter badge shown in the header.
pub fn filter_badge(label: &str, value: &str) -> Vec<Span<'static>> {
    let scheme = colors();
    vec![
        Span::styled(
            format!("{label}: "),
            Style::default().fg(scheme.text_muted),
        ),
        Span::styled(
            format!(" {value} "),
            Style::default()
                .fg(scheme.badge_fg_dark)
                .bg(scheme.accent)
                .bold(),
        ),
    ]
}

/// Render an instance-state badge.
pub fn state_badge(state: &str) -> Span<'static> {
    let scheme = colors();
    Span::styled(
        format!(" {} ", state.to_uppercase()),
        Style::default()
            .fg(scheme.badge_fg_dark)
            .bg(scheme.state_color(state))
            .bold(),
    )
}

/// Footer hints per filter.
pub struct FooterHints;

impl FooterHints {
    pub fn for_filter(tree: bool, toggling: bool) -> Vec<(&'static str, &'static str)> {
        let mut hints = Self::global();
        if tree {
            if toggling {
                hints.insert(0, ("Enter", "expand/select"));
            } else {
                hints.insert(0, ("Enter", "select"));
            }
        } else {
            hints.insert(0, ("Enter", "details"));
        }
        hints
    }

    pub fn global() -> Vec<(&'static str, &'static str)> {
        vec![
            ("Tab", "filter"),
            ("↑↓/jk", "navigate"),
            ("r", "rescan"),
            ("T", "theme"),
            ("?", "help"),
            ("q", "quit"),
        ]
    }
}

/// Render footer hints as spans
pub fn render_footer_hints(hints: &[(&str, &str)]) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    for (i, (key, desc)) in hints.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw(" "));
        }
        spans.push(Span::styled(format!("[{key}]"), Styles::shortcut_key()));
        spans.push(Span::styled((*desc).to_string(), Styles::shortcut_desc()));
    }
    spans
}
