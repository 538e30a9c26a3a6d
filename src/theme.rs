use catppuccin::PALETTE;
use ratatui::style::Color;

const fn rgb(c: &catppuccin::Color) -> Color {
    Color::Rgb(c.rgb.r, c.rgb.g, c.rgb.b)
}

/// Colors used by the views, taken from one catppuccin flavor.
#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub base: Color,
    pub surface: Color,
    pub overlay: Color,
    pub text: Color,
    pub subtext: Color,
    pub accent: Color,
    pub highlight: Color,
    pub success: Color,
    pub error: Color,
    pub warning: Color,
}

impl Theme {
    const fn from_catppuccin(flavor: &catppuccin::Flavor) -> Self {
        let c = &flavor.colors;
        Self {
            base: rgb(&c.base),
            surface: rgb(&c.surface1),
            overlay: rgb(&c.overlay0),
            text: rgb(&c.text),
            subtext: rgb(&c.subtext0),
            accent: rgb(&c.lavender),
            highlight: rgb(&c.mauve),
            success: rgb(&c.green),
            error: rgb(&c.red),
            warning: rgb(&c.yellow),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::from_catppuccin(&PALETTE.mocha)
    }
}

/// Look up a theme by its display name, e.g. `Catppuccin Latte`.
///
/// Unknown names fall back to Mocha.
pub fn theme_from_name(name: &str) -> Theme {
    let flavor = match name.trim().to_ascii_lowercase().as_str() {
        "catppuccin latte" | "latte" => &PALETTE.latte,
        "catppuccin frappé" | "catppuccin frappe" | "frappe" | "frappé" => &PALETTE.frappe,
        "catppuccin macchiato" | "macchiato" => &PALETTE.macchiato,
        "catppuccin mocha" | "mocha" => &PALETTE.mocha,
        other => {
            tracing::warn!("Unknown theme {other:?}, using Catppuccin Mocha");
            &PALETTE.mocha
        }
    };
    Theme::from_catppuccin(flavor)
}
