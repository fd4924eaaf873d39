//! Static style rules and page geometry for the resume renderer.

use serde::{Deserialize, Serialize};

use crate::layout::blocks::BlockKind;
use crate::layout::font_metrics::FontWeight;

/// Line height as a multiple of font size.
pub const LINE_HEIGHT_FACTOR: f32 = 1.25;

#[derive(Debug, Clone, PartialEq)]
pub struct StyleRule {
    pub font_weight: FontWeight,
    pub size_pt: f32,
    pub color_hex: &'static str,
    /// Space added after every block in this style.
    pub paragraph_gap_pt: f32,
    /// Space added before the block unless it opens a page.
    pub pre_gap_pt: Option<f32>,
}

impl StyleRule {
    pub fn line_height(&self) -> f32 {
        self.size_pt * LINE_HEIGHT_FACTOR
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StyleSheet {
    pub heading1: StyleRule,
    pub heading2: StyleRule,
    pub heading3: StyleRule,
    pub body: StyleRule,
    pub bullet: StyleRule,
    pub footer: StyleRule,
    /// Applied on top of the enclosing block style for link runs.
    pub link_color_hex: &'static str,
    /// Bullet glyph drawn before bullet text.
    pub bullet_marker: &'static str,
    /// Left indent of bullet lines, in points.
    pub bullet_indent_pt: f32,
}

impl StyleSheet {
    pub fn for_kind(&self, kind: BlockKind) -> &StyleRule {
        match kind {
            BlockKind::Heading(1) => &self.heading1,
            BlockKind::Heading(2) => &self.heading2,
            BlockKind::Heading(_) => &self.heading3,
            BlockKind::Bullet => &self.bullet,
            BlockKind::Paragraph => &self.body,
        }
    }
}

impl Default for StyleSheet {
    fn default() -> Self {
        Self {
            heading1: StyleRule {
                font_weight: FontWeight::Bold,
                size_pt: 20.0,
                color_hex: "#1a1a1a",
                paragraph_gap_pt: 6.0,
                pre_gap_pt: None,
            },
            heading2: StyleRule {
                font_weight: FontWeight::Bold,
                size_pt: 14.0,
                color_hex: "#2c3e50",
                paragraph_gap_pt: 4.0,
                pre_gap_pt: Some(10.0),
            },
            heading3: StyleRule {
                font_weight: FontWeight::Bold,
                size_pt: 11.5,
                color_hex: "#34495e",
                paragraph_gap_pt: 3.0,
                pre_gap_pt: None,
            },
            body: StyleRule {
                font_weight: FontWeight::Regular,
                size_pt: 10.5,
                color_hex: "#333333",
                paragraph_gap_pt: 5.0,
                pre_gap_pt: None,
            },
            bullet: StyleRule {
                font_weight: FontWeight::Regular,
                size_pt: 10.5,
                color_hex: "#333333",
                paragraph_gap_pt: 3.0,
                pre_gap_pt: None,
            },
            footer: StyleRule {
                font_weight: FontWeight::Regular,
                size_pt: 9.0,
                color_hex: "#777777",
                paragraph_gap_pt: 0.0,
                pre_gap_pt: None,
            },
            link_color_hex: "#1a5fb4",
            bullet_marker: "\u{2022}",
            bullet_indent_pt: 15.0,
        }
    }
}

/// Physical page and margin sizes, in points. Defaults to US Letter with 50pt margins.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageGeometry {
    pub width_pt: f32,
    pub height_pt: f32,
    pub margin_pt: f32,
    /// Carved out of the content area above the bottom margin for the page footer.
    pub footer_reserve_pt: f32,
    /// Footer baseline distance below the top of the bottom margin band.
    pub footer_offset_pt: f32,
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self {
            width_pt: 612.0,
            height_pt: 792.0,
            margin_pt: 50.0,
            footer_reserve_pt: 30.0,
            footer_offset_pt: 20.0,
        }
    }
}

impl PageGeometry {
    pub fn content_width(&self) -> f32 {
        self.width_pt - 2.0 * self.margin_pt
    }

    pub fn content_top(&self) -> f32 {
        self.margin_pt
    }

    /// Lowest y (measured from the top edge) content may reach.
    pub fn printable_limit(&self) -> f32 {
        self.height_pt - self.margin_pt - self.footer_reserve_pt
    }
}

/// Parses `#rrggbb` into 0..=1 RGB components. Malformed input yields black.
pub fn hex_to_rgb(hex: &str) -> (f32, f32, f32) {
    let digits = hex.trim_start_matches('#');
    let channel = |range: std::ops::Range<usize>| {
        digits
            .get(range)
            .and_then(|s| u8::from_str_radix(s, 16).ok())
            .map_or(0.0, |v| f32::from(v) / 255.0)
    };
    if digits.len() != 6 {
        return (0.0, 0.0, 0.0);
    }
    (channel(0..2), channel(2..4), channel(4..6))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letter_geometry() {
        let g = PageGeometry::default();
        assert_eq!(g.content_width(), 512.0);
        assert_eq!(g.printable_limit(), 712.0);
        assert_eq!(g.printable_limit() - g.content_top(), 662.0);
    }

    #[test]
    fn test_only_h2_has_pre_gap() {
        let sheet = StyleSheet::default();
        assert!(sheet.heading2.pre_gap_pt.is_some());
        assert!(sheet.heading1.pre_gap_pt.is_none());
        assert!(sheet.heading3.pre_gap_pt.is_none());
    }

    #[test]
    fn test_for_kind_maps_levels() {
        let sheet = StyleSheet::default();
        assert_eq!(sheet.for_kind(BlockKind::Heading(1)).size_pt, 20.0);
        assert_eq!(sheet.for_kind(BlockKind::Heading(3)).size_pt, 11.5);
        assert_eq!(sheet.for_kind(BlockKind::Paragraph), &sheet.body);
    }

    #[test]
    fn test_hex_to_rgb() {
        assert_eq!(hex_to_rgb("#ffffff"), (1.0, 1.0, 1.0));
        assert_eq!(hex_to_rgb("#000000"), (0.0, 0.0, 0.0));
        let (r, g, b) = hex_to_rgb("#1a5fb4");
        assert!((r - 26.0 / 255.0).abs() < 1e-6);
        assert!((g - 95.0 / 255.0).abs() < 1e-6);
        assert!((b - 180.0 / 255.0).abs() < 1e-6);
        assert_eq!(hex_to_rgb("nope"), (0.0, 0.0, 0.0));
    }
}
