//! Static font-metric tables for the two base-14 fonts the renderer draws with.
//!
//! Character widths are in em units (relative to font size), taken from the Adobe
//! Helvetica and Helvetica-Bold AFM files. The PDF writer uses the matching built-in
//! fonts, so measured widths and drawn widths agree.
//!
//! Tables cover the 95 printable ASCII characters, space through tilde, plus the
//! punctuation outside ASCII that resumes commonly use. The built-in fonts are
//! WinAnsi-encoded, so text is passed through `to_winansi` before it is measured.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

// ────────────────────────────────────────────────────────────────────────────
// Font weight enum
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FontWeight {
    Regular,
    Bold,
}

// ────────────────────────────────────────────────────────────────────────────
// Font metric table
// ────────────────────────────────────────────────────────────────────────────

/// Per-character widths for one weight. Slot `i` holds the width of ASCII `i + 32`.
pub struct FontMetricTable {
    widths: [f32; 95],
    /// Non-ASCII WinAnsi glyphs with known widths.
    extended: &'static [(char, f32)],
    /// Fallback width for other non-ASCII characters.
    pub average_char_width: f32,
    pub space_width: f32,
}

impl FontMetricTable {
    /// Measures the rendered width of a string in em units.
    ///
    /// Non-ASCII characters missing from the extended table fall back to
    /// `average_char_width`.
    pub fn measure_str(&self, s: &str) -> f32 {
        s.chars().map(|c| self.char_width(c)).sum()
    }

    fn char_width(&self, c: char) -> f32 {
        let code = c as usize;
        if (32..=126).contains(&code) {
            return self.widths[code - 32];
        }
        self.extended
            .iter()
            .find(|(glyph, _)| *glyph == c)
            .map_or(self.average_char_width, |(_, width)| *width)
    }

    /// Width of a string in points at the given font size.
    pub fn width_pt(&self, s: &str, size_pt: f32) -> f32 {
        self.measure_str(s) * size_pt
    }

    /// Width of one inter-word space in points at the given font size.
    pub fn space_pt(&self, size_pt: f32) -> f32 {
        self.space_width * size_pt
    }
}

pub fn get_metrics(weight: FontWeight) -> &'static FontMetricTable {
    match weight {
        FontWeight::Regular => &HELVETICA_TABLE,
        FontWeight::Bold => &HELVETICA_BOLD_TABLE,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// WinAnsi filtering
// ────────────────────────────────────────────────────────────────────────────

/// Characters in the 0x80..=0x9F block of WinAnsiEncoding.
const WINANSI_EXTRAS: &str =
    "\u{20ac}\u{201a}\u{0192}\u{201e}\u{2026}\u{2020}\u{2021}\u{02c6}\u{2030}\u{0160}\u{2039}\u{0152}\u{017d}\
     \u{2018}\u{2019}\u{201c}\u{201d}\u{2022}\u{2013}\u{2014}\u{02dc}\u{2122}\u{0161}\u{203a}\u{0153}\u{017e}\u{0178}";

/// ASCII stand-ins for common characters the built-in fonts cannot draw.
const SUBSTITUTIONS: &[(char, &str)] = &[
    ('\u{2192}', "->"),
    ('\u{2190}', "<-"),
    ('\u{21d2}', "=>"),
    ('\u{2265}', ">="),
    ('\u{2264}', "<="),
    ('\u{2260}', "!="),
    ('\u{2212}', "-"),
    ('\u{2010}', "-"),
    ('\u{2011}', "-"),
    ('\u{2032}', "'"),
    ('\u{2033}', "\""),
];

fn is_winansi(c: char) -> bool {
    matches!(c as u32, 0x20..=0x7E | 0xA0..=0xFF) || WINANSI_EXTRAS.contains(c)
}

/// Maps text onto what the WinAnsi-encoded built-in fonts can draw: known symbols become
/// ASCII stand-ins, whitespace becomes a space and anything else unencodable is dropped.
pub fn to_winansi(text: &str) -> Cow<'_, str> {
    if text.chars().all(is_winansi) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if is_winansi(c) {
            out.push(c);
        } else if c.is_whitespace() {
            out.push(' ');
        } else if let Some((_, stand_in)) = SUBSTITUTIONS.iter().find(|(from, _)| *from == c) {
            out.push_str(stand_in);
        }
    }
    Cow::Owned(out)
}

// ────────────────────────────────────────────────────────────────────────────
// Static width tables  (95 ASCII printable characters each)
// ────────────────────────────────────────────────────────────────────────────

static HELVETICA_TABLE: FontMetricTable = FontMetricTable {
    #[rustfmt::skip]
    widths: [
        // sp     !      "      #      $      %      &      '      (      )      *      +      ,      -      .      /
        0.278, 0.278, 0.355, 0.556, 0.556, 0.889, 0.667, 0.191, 0.333, 0.333, 0.389, 0.584, 0.278, 0.333, 0.278, 0.278,
        // 0      1      2      3      4      5      6      7      8      9
        0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556,
        // :      ;      <      =      >      ?      @
        0.278, 0.278, 0.584, 0.584, 0.584, 0.556, 1.015,
        // A      B      C      D      E      F      G      H      I      J      K      L      M
        0.667, 0.667, 0.722, 0.722, 0.667, 0.611, 0.778, 0.722, 0.278, 0.500, 0.667, 0.556, 0.833,
        // N      O      P      Q      R      S      T      U      V      W      X      Y      Z
        0.722, 0.778, 0.667, 0.778, 0.722, 0.667, 0.611, 0.722, 0.667, 0.944, 0.667, 0.667, 0.611,
        // [      \      ]      ^      _      `
        0.278, 0.278, 0.278, 0.469, 0.556, 0.333,
        // a      b      c      d      e      f      g      h      i      j      k      l      m
        0.556, 0.556, 0.500, 0.556, 0.556, 0.278, 0.556, 0.556, 0.222, 0.222, 0.500, 0.222, 0.833,
        // n      o      p      q      r      s      t      u      v      w      x      y      z
        0.556, 0.556, 0.556, 0.556, 0.333, 0.500, 0.278, 0.556, 0.500, 0.722, 0.500, 0.500, 0.500,
        // {      |      }      ~
        0.334, 0.260, 0.334, 0.584,
    ],
    #[rustfmt::skip]
    extended: &[
        ('\u{2022}', 0.350), ('\u{2013}', 0.556), ('\u{2014}', 1.000), ('\u{2018}', 0.222),
        ('\u{2019}', 0.222), ('\u{201c}', 0.333), ('\u{201d}', 0.333), ('\u{2026}', 1.000),
        ('\u{20ac}', 0.556), ('\u{2122}', 1.000), ('\u{00a9}', 0.737), ('\u{00ae}', 0.737),
        ('\u{00b0}', 0.400), ('\u{00b7}', 0.278),
    ],
    average_char_width: 0.556,
    space_width: 0.278,
};

static HELVETICA_BOLD_TABLE: FontMetricTable = FontMetricTable {
    #[rustfmt::skip]
    widths: [
        // sp     !      "      #      $      %      &      '      (      )      *      +      ,      -      .      /
        0.278, 0.333, 0.474, 0.556, 0.556, 0.889, 0.722, 0.238, 0.333, 0.333, 0.389, 0.584, 0.278, 0.333, 0.278, 0.278,
        // 0      1      2      3      4      5      6      7      8      9
        0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556,
        // :      ;      <      =      >      ?      @
        0.333, 0.333, 0.584, 0.584, 0.584, 0.611, 0.975,
        // A      B      C      D      E      F      G      H      I      J      K      L      M
        0.722, 0.722, 0.722, 0.722, 0.667, 0.611, 0.778, 0.722, 0.278, 0.556, 0.722, 0.611, 0.833,
        // N      O      P      Q      R      S      T      U      V      W      X      Y      Z
        0.722, 0.778, 0.667, 0.778, 0.722, 0.667, 0.611, 0.722, 0.667, 0.944, 0.667, 0.667, 0.611,
        // [      \      ]      ^      _      `
        0.333, 0.278, 0.333, 0.584, 0.556, 0.333,
        // a      b      c      d      e      f      g      h      i      j      k      l      m
        0.556, 0.611, 0.556, 0.611, 0.556, 0.333, 0.611, 0.611, 0.278, 0.278, 0.556, 0.278, 0.889,
        // n      o      p      q      r      s      t      u      v      w      x      y      z
        0.611, 0.611, 0.611, 0.611, 0.389, 0.556, 0.333, 0.611, 0.556, 0.778, 0.556, 0.556, 0.500,
        // {      |      }      ~
        0.389, 0.280, 0.389, 0.584,
    ],
    #[rustfmt::skip]
    extended: &[
        ('\u{2022}', 0.350), ('\u{2013}', 0.556), ('\u{2014}', 1.000), ('\u{2018}', 0.278),
        ('\u{2019}', 0.278), ('\u{201c}', 0.500), ('\u{201d}', 0.500), ('\u{2026}', 1.000),
        ('\u{20ac}', 0.556), ('\u{2122}', 1.000), ('\u{00a9}', 0.737), ('\u{00ae}', 0.737),
        ('\u{00b0}', 0.400), ('\u{00b7}', 0.278),
    ],
    average_char_width: 0.611,
    space_width: 0.278,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measure_str_empty_returns_zero() {
        assert_eq!(get_metrics(FontWeight::Regular).measure_str(""), 0.0);
    }

    #[test]
    fn test_measure_str_single_space() {
        let m = get_metrics(FontWeight::Regular);
        assert!((m.measure_str(" ") - m.space_width).abs() < 1e-6);
    }

    #[test]
    fn test_measure_str_ascii_characters() {
        let m = get_metrics(FontWeight::Regular);
        // H(0.722) + i(0.222)
        assert!((m.measure_str("Hi") - 0.944).abs() < 1e-4);
    }

    #[test]
    fn test_measure_str_non_ascii_falls_back() {
        let m = get_metrics(FontWeight::Regular);
        assert!((m.measure_str("é") - m.average_char_width).abs() < 1e-6);
    }

    #[test]
    fn test_bold_is_never_narrower_for_lowercase() {
        let regular = get_metrics(FontWeight::Regular);
        let bold = get_metrics(FontWeight::Bold);
        let text = "the quick brown fox jumps over the lazy dog";
        assert!(bold.measure_str(text) > regular.measure_str(text));
    }

    #[test]
    fn test_bullet_uses_its_own_width() {
        let m = get_metrics(FontWeight::Regular);
        assert!((m.measure_str("\u{2022}") - 0.350).abs() < 1e-6);
        assert!((get_metrics(FontWeight::Bold).measure_str("\u{2014}") - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_to_winansi_keeps_encodable_text() {
        let text = "Caf\u{e9} \u{2022} Jane\u{2019}s \u{201c}team\u{201d} \u{2013} \u{20ac}5";
        assert!(matches!(to_winansi(text), Cow::Borrowed(_)));
    }

    #[test]
    fn test_to_winansi_substitutes_and_drops() {
        assert_eq!(to_winansi("Python \u{2192} Go \u{2713}"), "Python -> Go ");
        assert_eq!(to_winansi("p99 \u{2264} 20ms"), "p99 <= 20ms");
        assert_eq!(to_winansi("\u{1f680}Launch"), "Launch");
        assert_eq!(to_winansi("a\tb"), "a b");
    }

    #[test]
    fn test_width_pt_scales_with_size() {
        let m = get_metrics(FontWeight::Regular);
        let at_10 = m.width_pt("Resume", 10.0);
        let at_20 = m.width_pt("Resume", 20.0);
        assert!((at_20 - 2.0 * at_10).abs() < 1e-3);
    }
}
