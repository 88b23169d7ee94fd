//! # Page Metrics & Text Measurement
//!
//! A4 geometry and Helvetica metrics for measuring and wrapping text.
//!
//! ## Coordinates
//! ```text
//!   (0,0) ───────────────────────────── x (mm) ──► (210,0)
//!     │   layout works top-down, like a page read by a person
//!     │
//!     y (mm)
//!     │
//!     ▼
//!   (0,297)                          the painter flips y for PDF space
//! ```
//!
//! Builtin PDF fonts carry no metrics, so the advance widths of the two
//! faces used are tabulated here (units of 1/1000 em, printable ASCII).

/// A4 width.
pub const PAGE_WIDTH_MM: f32 = 210.0;
/// A4 height.
pub const PAGE_HEIGHT_MM: f32 = 297.0;
/// Horizontal center line.
pub const PAGE_CENTER_X: f32 = PAGE_WIDTH_MM / 2.0;

const PT_TO_MM: f32 = 25.4 / 72.0;

/// Width used for characters outside the table.
const FALLBACK_WIDTH: u16 = 556;

/// Helvetica, characters 0x20..=0x7E.
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // '0'..'?'
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // '@'..'O'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // 'P'..'_'
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // '`'..'o'
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // 'p'..'~'
];

/// Helvetica-Bold, characters 0x20..=0x7E.
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611, // '0'..'?'
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778, // '@'..'O'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556, // 'P'..'_'
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611, // '`'..'o'
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584, // 'p'..'~'
];

/// Font face of a run of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Face {
    Regular,
    Bold,
}

fn char_width(ch: char, face: Face) -> u16 {
    let table = match face {
        Face::Regular => &HELVETICA,
        Face::Bold => &HELVETICA_BOLD,
    };
    let code = ch as u32;
    if (0x20..=0x7E).contains(&code) {
        table[(code - 0x20) as usize]
    } else {
        FALLBACK_WIDTH
    }
}

/// Rendered width of `text` in millimetres.
pub fn text_width(text: &str, size_pt: f32, face: Face) -> f32 {
    let units: u32 = text.chars().map(|c| u32::from(char_width(c, face))).sum();
    units as f32 / 1000.0 * size_pt * PT_TO_MM
}

/// Baseline-to-baseline distance for a font size, in millimetres.
pub fn line_height(size_pt: f32) -> f32 {
    size_pt * 1.15 * PT_TO_MM
}

/// Distance from the top of a line box to its baseline, in millimetres.
pub fn ascent(size_pt: f32) -> f32 {
    // Helvetica cap height is 718/1000 em
    size_pt * 0.718 * PT_TO_MM
}

/// Greedy word wrap to `max_width` millimetres.
///
/// Words longer than a whole line are split by character. Always returns at
/// least one (possibly empty) line.
pub fn wrap_text(text: &str, max_width: f32, size_pt: f32, face: Face) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{} {}", current, word)
        };

        if text_width(&candidate, size_pt, face) <= max_width {
            current = candidate;
            continue;
        }

        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }

        if text_width(word, size_pt, face) <= max_width {
            current = word.to_string();
        } else {
            for ch in word.chars() {
                current.push(ch);
                if text_width(&current, size_pt, face) > max_width && current.chars().count() > 1 {
                    current.pop();
                    lines.push(std::mem::take(&mut current));
                    current.push(ch);
                }
            }
        }
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

/// Maps text onto what the builtin fonts can show.
///
/// Dashes and quotes become their ASCII forms, `₱` becomes `PHP`, other
/// characters beyond Latin-1 become `?`.
pub fn pdf_safe(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\u{2013}' | '\u{2014}' | '\u{2212}' => out.push('-'),
            '\u{2018}' | '\u{2019}' => out.push('\''),
            '\u{201C}' | '\u{201D}' => out.push('"'),
            '\u{20B1}' => out.push_str("PHP"),
            '\t' | '\n' | '\r' => out.push(' '),
            c if (c as u32) < 0x20 => {}
            c if (c as u32) <= 0xFF => out.push(c),
            _ => out.push('?'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_width() {
        // "0" is 556 units; 10pt → 0.556 * 10 * 0.3528mm
        let w = text_width("0", 10.0, Face::Regular);
        assert!((w - 1.9614).abs() < 0.001);
        assert!(text_width("Wide", 10.0, Face::Bold) > text_width("Wide", 10.0, Face::Regular));
        assert_eq!(text_width("", 10.0, Face::Regular), 0.0);
    }

    #[test]
    fn test_wrap_respects_width() {
        let text = "Complete blood count with platelet count and differential";
        let lines = wrap_text(text, 40.0, 10.0, Face::Regular);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(text_width(line, 10.0, Face::Regular) <= 40.0);
        }
        assert_eq!(lines.join(" "), text);
    }

    #[test]
    fn test_wrap_splits_long_word() {
        let word = "A".repeat(200);
        let lines = wrap_text(&word, 30.0, 10.0, Face::Regular);
        assert!(lines.len() > 1);
        assert_eq!(lines.concat(), word);
    }

    #[test]
    fn test_wrap_empty() {
        assert_eq!(wrap_text("", 30.0, 10.0, Face::Regular), vec![String::new()]);
    }

    #[test]
    fn test_pdf_safe() {
        assert_eq!(pdf_safe("CBC — Blood"), "CBC - Blood");
        assert_eq!(pdf_safe("₱500"), "PHP500");
        assert_eq!(pdf_safe("Peña"), "Peña");
        assert_eq!(pdf_safe("日本"), "??");
    }
}
