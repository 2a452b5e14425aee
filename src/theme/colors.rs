//! Colors - XDash Theme Colors

use gpui::{Rgba, rgb, rgba};

/// XDash color palette - All colors are accessed via associated functions
pub struct XDashColors;

impl XDashColors {
    /// Header background - Navy
    pub fn header_bg() -> Rgba { rgb(0x1e3a5f) }
    /// Main background
    pub fn background() -> Rgba { rgb(0xf5f5f5) }
    /// Content area background
    pub fn content_bg() -> Rgba { rgb(0xffffff) }
    /// Log panel background - Dark blue
    pub fn log_panel_bg() -> Rgba { rgb(0x1a2332) }

    /// Primary text
    pub fn text_primary() -> Rgba { rgb(0x1f2937) }
    /// Secondary text
    pub fn text_secondary() -> Rgba { rgb(0x6b7280) }
    /// Muted text
    pub fn text_muted() -> Rgba { rgb(0x9ca3af) }
    /// Light text (on dark backgrounds)
    pub fn text_light() -> Rgba { rgb(0xffffff) }

    /// Success - Green
    pub fn success() -> Rgba { rgb(0x22c55e) }

    /// Default border
    pub fn border() -> Rgba { rgb(0xe5e7eb) }
    /// Row separator inside the grid
    pub fn row_separator() -> Rgba { rgb(0xf3f4f6) }
    /// Translucent overlay for controls on dark panels
    pub fn overlay() -> Rgba { rgba(0xffffff22) }

    /// Primary button background
    pub fn button_primary_bg() -> Rgba { rgb(0xf5c518) }
    /// Primary button hover background
    pub fn button_primary_hover() -> Rgba { rgb(0xd4a817) }
    /// Primary button text
    pub fn button_primary_text() -> Rgba { rgb(0x1f2937) }
}
