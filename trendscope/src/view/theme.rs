//! Theme-aware colors and the series palette.

use iced::{Color, Theme};

/// Line colors cycled across series, in selection order.
pub const SERIES_PALETTE: [Color; 8] = [
    Color::from_rgb8(0xFF, 0x63, 0x85),
    Color::from_rgb8(0x36, 0xA2, 0xEB),
    Color::from_rgb8(0xFF, 0xCE, 0x56),
    Color::from_rgb8(0x4B, 0xC0, 0xC0),
    Color::from_rgb8(0x99, 0x66, 0xFF),
    Color::from_rgb8(0xFF, 0x9F, 0x40),
    Color::from_rgb8(0xC9, 0xCB, 0xCF),
    Color::from_rgb8(0x7C, 0xFF, 0xB2),
];

/// Color of the `index`-th series.
pub fn series_color(index: usize) -> Color {
    SERIES_PALETTE[index % SERIES_PALETTE.len()]
}

/// Fixed colors for the financial metrics, keyed by series name.
pub fn financial_color(name: &str) -> Option<Color> {
    match name {
        "Revenue" => Some(Color::from_rgb8(48, 146, 231)),
        "Earnings" => Some(Color::from_rgb8(16, 206, 64)),
        "Debt" => Some(Color::from_rgb8(146, 16, 206)),
        "Cash Flow" => Some(Color::from_rgb8(206, 16, 165)),
        "Shares" => Some(Color::from_rgb8(206, 124, 16)),
        _ => None,
    }
}

/// Get colors from the theme's extended palette.
pub struct ThemeColors<'a> {
    theme: &'a Theme,
}

impl<'a> ThemeColors<'a> {
    pub fn new(theme: &'a Theme) -> Self {
        Self { theme }
    }

    fn palette(&self) -> &iced::theme::palette::Extended {
        self.theme.extended_palette()
    }

    /// Chart area background.
    pub fn background(&self) -> Color {
        self.palette().background.base.color
    }

    /// Plot area, slightly elevated.
    pub fn background_weak(&self) -> Color {
        self.palette().background.weak.color
    }

    pub fn text(&self) -> Color {
        self.palette().background.base.text
    }

    pub fn text_muted(&self) -> Color {
        self.palette().background.weak.text
    }

    /// Grid lines: text color faded into the background.
    pub fn grid(&self) -> Color {
        let text = self.text();
        let bg = self.background();
        Color::from_rgba(
            text.r * 0.2 + bg.r * 0.8,
            text.g * 0.2 + bg.g * 0.8,
            text.b * 0.2 + bg.b * 0.8,
            1.0,
        )
    }

    pub fn danger(&self) -> Color {
        self.palette().danger.base.color
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_series_color_cycles() {
        assert_eq!(series_color(0), series_color(8));
        assert_ne!(series_color(0), series_color(1));
    }

    #[test]
    fn test_financial_colors() {
        assert!(financial_color("Revenue").is_some());
        assert!(financial_color("Los Angeles, CA").is_none());
    }
}
