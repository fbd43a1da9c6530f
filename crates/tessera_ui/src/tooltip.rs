//! Tooltip layout.
//!
//! A tooltip shows on the same frame its source panel is hovered. The text
//! is wrapped to the configured width, placed next to the cursor and kept
//! on screen.

use tessera_core::PanelId;

use crate::layout::{Rect, Vec2};
use crate::skin::Color;
use crate::text_flow::{block_size, wrap_text, TextMeasure};

/// Configuration for tooltip layout and colors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TooltipConfig {
    /// Background color.
    pub background: Color,
    /// Text color.
    pub text: Color,
    /// Padding inside tooltip.
    pub padding: f32,
    /// Offset from cursor.
    pub cursor_offset: Vec2,
    /// Maximum width, padding included, before wrapping.
    pub max_width: f32,
}

impl Default for TooltipConfig {
    fn default() -> Self {
        Self {
            background: Color::rgba(0.05, 0.05, 0.08, 0.95),
            text: Color::rgba(0.9, 0.9, 0.9, 1.0),
            padding: 8.0,
            cursor_offset: Vec2::new(12.0, 12.0),
            max_width: 300.0,
        }
    }
}

/// A laid out tooltip.
#[derive(Debug, Clone, PartialEq)]
pub struct Tooltip {
    /// Panel the text came from.
    pub source: PanelId,
    /// Wrapped lines.
    pub lines: Vec<String>,
    /// Screen-space box, padding included.
    pub bounds: Rect,
    /// Font size the lines were measured at.
    pub font_size: f32,
}

impl Tooltip {
    /// Wraps `text` and places the box next to `cursor`, inside `screen`.
    #[must_use]
    pub fn layout<M: TextMeasure + ?Sized>(
        source: PanelId,
        text: &str,
        font_size: f32,
        cursor: Vec2,
        screen: Vec2,
        measure: &M,
        config: &TooltipConfig,
    ) -> Self {
        let wrap_width = (config.max_width - config.padding * 2.0).max(0.0);
        let lines = wrap_text(text, measure, font_size, Vec2::new(wrap_width, f32::INFINITY));
        let size = block_size(&lines, measure, font_size) + Vec2::new(config.padding, config.padding) * 2.0;

        let mut x = cursor.x + config.cursor_offset.x;
        let mut y = cursor.y + config.cursor_offset.y;

        // Flip to the other side of the cursor rather than cover it.
        if x + size.x > screen.x {
            x = cursor.x - size.x - config.cursor_offset.x;
        }
        if y + size.y > screen.y {
            y = cursor.y - size.y - config.cursor_offset.y;
        }

        Self {
            source,
            lines,
            bounds: Rect::from_pos_size(Vec2::new(x.max(0.0), y.max(0.0)), size),
            font_size,
        }
    }
}

/// Holds the tooltip shown this frame, if any.
#[derive(Debug, Clone, Default)]
pub struct TooltipState {
    current: Option<Tooltip>,
    config: TooltipConfig,
}

impl TooltipState {
    /// Creates an empty state.
    #[must_use]
    pub fn new(config: TooltipConfig) -> Self {
        Self {
            current: None,
            config,
        }
    }

    /// Layout settings.
    #[must_use]
    pub const fn config(&self) -> &TooltipConfig {
        &self.config
    }

    /// Shows `text` for `source`; empty text hides the tooltip instead.
    pub fn show<M: TextMeasure + ?Sized>(
        &mut self,
        source: PanelId,
        text: &str,
        font_size: f32,
        cursor: Vec2,
        screen: Vec2,
        measure: &M,
    ) {
        if text.is_empty() {
            self.hide();
            return;
        }
        self.current = Some(Tooltip::layout(
            source,
            text,
            font_size,
            cursor,
            screen,
            measure,
            &self.config,
        ));
    }

    /// Hides the tooltip.
    pub fn hide(&mut self) {
        self.current = None;
    }

    /// Returns true if a tooltip is showing.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.current.is_some()
    }

    /// The tooltip showing, if any.
    #[must_use]
    pub const fn current(&self) -> Option<&Tooltip> {
        self.current.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text_flow::MonospaceMeasure;

    const SCREEN: Vec2 = Vec2::new(1920.0, 1080.0);

    fn measure() -> MonospaceMeasure {
        MonospaceMeasure::new(8.0, 16.0, 16.0)
    }

    #[test]
    fn test_placed_at_cursor_offset() {
        let tip = Tooltip::layout(
            PanelId::new(0, 0),
            "Save",
            16.0,
            Vec2::new(100.0, 100.0),
            SCREEN,
            &measure(),
            &TooltipConfig::default(),
        );

        assert_eq!(tip.lines, ["Save"]);
        assert_eq!(tip.bounds, Rect::new(112.0, 112.0, 48.0, 32.0));
    }

    #[test]
    fn test_flips_at_screen_edge() {
        let config = TooltipConfig::default();
        let tip = Tooltip::layout(
            PanelId::new(0, 0),
            "Save",
            16.0,
            Vec2::new(1900.0, 1070.0),
            SCREEN,
            &measure(),
            &config,
        );

        assert_eq!(tip.bounds.x, 1900.0 - 48.0 - 12.0);
        assert_eq!(tip.bounds.y, 1070.0 - 32.0 - 12.0);
    }

    #[test]
    fn test_clamped_to_origin() {
        let tip = Tooltip::layout(
            PanelId::new(0, 0),
            "Save",
            16.0,
            Vec2::new(10.0, 10.0),
            Vec2::new(50.0, 40.0),
            &measure(),
            &TooltipConfig::default(),
        );

        assert_eq!(tip.bounds.position(), Vec2::ZERO);
    }

    #[test]
    fn test_long_text_wraps_to_max_width() {
        let config = TooltipConfig {
            max_width: 96.0,
            ..TooltipConfig::default()
        };
        // 80px of text room: ten glyphs per line
        let tip = Tooltip::layout(
            PanelId::new(0, 0),
            "open the selected file",
            16.0,
            Vec2::ZERO,
            SCREEN,
            &measure(),
            &config,
        );

        assert_eq!(tip.lines, ["open the", "selected", "file"]);
        assert_eq!(tip.bounds.size(), Vec2::new(64.0 + 16.0, 48.0 + 16.0));
    }

    #[test]
    fn test_empty_text_hides() {
        let mut state = TooltipState::new(TooltipConfig::default());
        state.show(PanelId::new(1, 0), "Help", 16.0, Vec2::ZERO, SCREEN, &measure());
        assert!(state.is_active());
        assert_eq!(state.current().map(|tip| tip.source), Some(PanelId::new(1, 0)));

        state.show(PanelId::new(1, 0), "", 16.0, Vec2::ZERO, SCREEN, &measure());
        assert!(!state.is_active());
    }
}
