//! Static font-metric tables for the CV template fonts.
//!
//! Character widths are in em units (relative to font size). A single sans-serif
//! base table is shared by the proportional families and scaled per family; the
//! monospace family uses a fixed advance. This is an approximation of real glyph
//! metrics, good enough to decide where a block wraps at a given column width.
//!
//! Tables cover ASCII 0x20..=0x7E (95 printable characters).
//! Index = (char as usize) - 32.

use serde::{Deserialize, Serialize};

// ────────────────────────────────────────────────────────────────────────────
// Font identifiers
// ────────────────────────────────────────────────────────────────────────────

/// The fonts a CV can be rendered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FontFamily {
    /// Humanist sans-serif, the base table.
    #[default]
    Inter,
    /// Slightly wider sans-serif. Approx. 105% of Inter.
    Lato,
    /// Wide screen serif. Approx. 110% of Inter.
    Merriweather,
    /// Old-style serif. Approx. 86% of Inter.
    Garamond,
    /// Fixed-advance monospace.
    RobotoMono,
}

/// Font-size identifier chosen in the editor. Maps to a body size in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FontSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl FontSize {
    /// Body text size in px at 96 DPI.
    pub fn body_px(self) -> f32 {
        match self {
            FontSize::Small => 12.0,
            FontSize::Medium => 13.0,
            FontSize::Large => 14.5,
        }
    }
}

/// Style of a single text run, as far as height measurement is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    pub font: FontFamily,
    pub size_px: f32,
    /// Line height as a multiple of `size_px`.
    pub line_height: f32,
    pub bold: bool,
}

impl TextStyle {
    pub fn line_px(&self) -> f32 {
        self.size_px * self.line_height
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Font metric table
// ────────────────────────────────────────────────────────────────────────────

/// Bold glyphs run about 6% wider than regular ones across these families.
const BOLD_WIDTH_FACTOR: f32 = 1.06;

/// Character-width table for one font family.
pub struct FontMetricTable {
    pub font: FontFamily,
    widths: &'static [f32; 95],
    /// Multiplier applied to every entry of `widths`.
    scale: f32,
    /// Fallback width for non-ASCII characters, already scaled.
    pub average_char_width: f32,
    pub space_width: f32,
}

impl FontMetricTable {
    /// Measures the rendered width of a string in em units.
    ///
    /// Non-ASCII characters fall back to `average_char_width`.
    pub fn measure_str(&self, s: &str, bold: bool) -> f32 {
        let width: f32 = s
            .chars()
            .map(|c| {
                let code = c as usize;
                if (32..=126).contains(&code) {
                    self.widths[code - 32] * self.scale
                } else {
                    self.average_char_width
                }
            })
            .sum();
        if bold {
            width * BOLD_WIDTH_FACTOR
        } else {
            width
        }
    }

    /// Counts the lines `text` occupies when word-wrapped at `max_width_em`.
    ///
    /// Explicit newlines start a new paragraph; an empty paragraph between two
    /// others still takes one line. A word wider than the line sits alone on
    /// its line and overflows it (no hyphenation). Empty text is 0 lines.
    pub fn wrapped_lines(&self, text: &str, max_width_em: f32, bold: bool) -> u32 {
        if text.trim().is_empty() {
            return 0;
        }
        let space_w = if bold {
            self.space_width * BOLD_WIDTH_FACTOR
        } else {
            self.space_width
        };

        text.trim_end()
            .split('\n')
            .map(|paragraph| {
                let mut lines = 1u32;
                let mut current_width = 0.0_f32;
                let mut first_on_line = true;
                for word in paragraph.split_whitespace() {
                    let word_w = self.measure_str(word, bold);
                    if !first_on_line && current_width + space_w + word_w > max_width_em {
                        lines += 1;
                        current_width = word_w;
                    } else if first_on_line {
                        current_width = word_w;
                        first_on_line = false;
                    } else {
                        current_width += space_w + word_w;
                    }
                }
                lines
            })
            .sum()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Static width tables
// ────────────────────────────────────────────────────────────────────────────

#[rustfmt::skip]
static SANS_WIDTHS: [f32; 95] = [
    // sp    !     "     #     $     %     &     '     (     )     *     +     ,     -     .     /
    0.25, 0.30, 0.38, 0.56, 0.56, 0.89, 0.67, 0.22, 0.33, 0.33, 0.39, 0.59, 0.28, 0.33, 0.28, 0.31,
    // 0     1     2     3     4     5     6     7     8     9
    0.56, 0.56, 0.56, 0.56, 0.56, 0.56, 0.56, 0.56, 0.56, 0.56,
    // :     ;     <     =     >     ?     @
    0.28, 0.28, 0.59, 0.59, 0.59, 0.50, 1.02,
    // A     B     C     D     E     F     G     H     I     J     K     L     M
    0.67, 0.61, 0.61, 0.67, 0.56, 0.50, 0.67, 0.67, 0.25, 0.39, 0.61, 0.53, 0.78,
    // N     O     P     Q     R     S     T     U     V     W     X     Y     Z
    0.67, 0.72, 0.56, 0.72, 0.61, 0.50, 0.56, 0.67, 0.67, 0.89, 0.61, 0.61, 0.56,
    // [     \     ]     ^     _     `
    0.28, 0.31, 0.28, 0.47, 0.56, 0.34,
    // a     b     c     d     e     f     g     h     i     j     k     l     m
    0.56, 0.56, 0.50, 0.56, 0.56, 0.31, 0.56, 0.56, 0.22, 0.22, 0.53, 0.22, 0.83,
    // n     o     p     q     r     s     t     u     v     w     x     y     z
    0.56, 0.56, 0.56, 0.56, 0.33, 0.44, 0.39, 0.56, 0.50, 0.72, 0.50, 0.50, 0.44,
    // {     |     }     ~
    0.33, 0.26, 0.33, 0.59,
];

static MONO_WIDTHS: [f32; 95] = [0.60; 95];

static INTER_TABLE: FontMetricTable = FontMetricTable {
    font: FontFamily::Inter,
    widths: &SANS_WIDTHS,
    scale: 1.0,
    average_char_width: 0.52,
    space_width: 0.25,
};

static LATO_TABLE: FontMetricTable = FontMetricTable {
    font: FontFamily::Lato,
    widths: &SANS_WIDTHS,
    scale: 1.05,
    average_char_width: 0.55,
    space_width: 0.26,
};

static MERRIWEATHER_TABLE: FontMetricTable = FontMetricTable {
    font: FontFamily::Merriweather,
    widths: &SANS_WIDTHS,
    scale: 1.10,
    average_char_width: 0.57,
    space_width: 0.27,
};

static GARAMOND_TABLE: FontMetricTable = FontMetricTable {
    font: FontFamily::Garamond,
    widths: &SANS_WIDTHS,
    scale: 0.86,
    average_char_width: 0.45,
    space_width: 0.21,
};

static ROBOTO_MONO_TABLE: FontMetricTable = FontMetricTable {
    font: FontFamily::RobotoMono,
    widths: &MONO_WIDTHS,
    scale: 1.0,
    average_char_width: 0.60,
    space_width: 0.60,
};

/// Returns the static metric table for a given font family.
pub fn get_metrics(font: &FontFamily) -> &'static FontMetricTable {
    match font {
        FontFamily::Inter => &INTER_TABLE,
        FontFamily::Lato => &LATO_TABLE,
        FontFamily::Merriweather => &MERRIWEATHER_TABLE,
        FontFamily::Garamond => &GARAMOND_TABLE,
        FontFamily::RobotoMono => &ROBOTO_MONO_TABLE,
    }
}

/// Every family with a table, for warming up the measurement surface.
pub const ALL_FONTS: [FontFamily; 5] = [
    FontFamily::Inter,
    FontFamily::Lato,
    FontFamily::Merriweather,
    FontFamily::Garamond,
    FontFamily::RobotoMono,
];

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
