//! Font selection and wrapping for the act title.

use serde::{Deserialize, Serialize};

/// The bitmap fonts the watch face uses, smallest to largest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Font {
    Small,
    Medium,
    Big,
    Large,
    Huge,
}

pub trait FontMetrics {
    /// Rendered width of `text` in pixels.
    fn string_width(&self, font: Font, text: &str) -> u32;

    /// Greedy word wrap to `width` pixels. Words wider than a line are split.
    fn wrap(&self, font: Font, text: &str, width: u32) -> Vec<String> {
        let mut lines = Vec::new();
        let mut line = String::new();
        for word in text.split_whitespace() {
            let candidate = if line.is_empty() {
                word.to_string()
            } else {
                format!("{line} {word}")
            };
            if self.string_width(font, &candidate) <= width {
                line = candidate;
                continue;
            }
            if !line.is_empty() {
                lines.push(std::mem::take(&mut line));
            }
            for ch in word.chars() {
                let mut next = line.clone();
                next.push(ch);
                if !line.is_empty() && self.string_width(font, &next) > width {
                    lines.push(std::mem::take(&mut line));
                    line.push(ch);
                } else {
                    line = next;
                }
            }
        }
        if !line.is_empty() {
            lines.push(line);
        }
        lines
    }
}

/// Fixed-pitch metrics of the stock 6x8, 6x15 and 12x20 fonts, with the
/// large and huge sizes drawn at double scale.
#[derive(Debug, Clone, Copy, Default)]
pub struct BitmapFonts;

impl BitmapFonts {
    fn glyph_width(font: Font) -> u32 {
        match font {
            Font::Small | Font::Medium => 6,
            Font::Big | Font::Large => 12,
            Font::Huge => 24,
        }
    }
}

impl FontMetrics for BitmapFonts {
    fn string_width(&self, font: Font, text: &str) -> u32 {
        let widest = text.lines().map(|l| l.chars().count()).max().unwrap_or(0);
        widest as u32 * Self::glyph_width(font)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FittedTitle {
    pub font: Font,
    pub text: String,
}

/// Pick the largest title font that fits, then wrap to two lines.
///
/// Huge is tried first, then big. Medium is only used when `large_titles` is
/// off and the text would need more than two lines of big. Anything still
/// too wide is wrapped, keeping two lines and marking the cut with `...`.
pub fn fit_title(
    metrics: &dyn FontMetrics,
    text: &str,
    width: u32,
    large_titles: bool,
) -> FittedTitle {
    let mut font = Font::Huge;
    if metrics.string_width(font, text) > width {
        font = Font::Big;
        if !large_titles && metrics.string_width(font, text) > width * 2 {
            font = Font::Medium;
        }
    }
    if metrics.string_width(font, text) <= width {
        return FittedTitle {
            font,
            text: text.to_string(),
        };
    }

    let lines = metrics.wrap(font, text, width);
    let text = if lines.len() > 2 {
        format!("{}...", lines[..2].join("\n"))
    } else {
        lines.join("\n")
    };
    FittedTitle { font, text }
}
