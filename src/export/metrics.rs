//! Advance widths of the standard PDF base fonts, in thousandths of an em.
//!
//! Only the printable ASCII range is tabulated; anything else is measured as a digit, which is
//! close to the average Latin glyph.

use super::Font;

const FIRST: u32 = 32;
const FALLBACK: u16 = 556;

#[rustfmt::skip]
const HELVETICA: [u16; 95] = [
    // space ! " # $ % & ' ( ) * + , - . /
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    // 0-9
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    // : ; < = > ? @
    278, 278, 584, 584, 584, 556, 1015,
    // A-Z
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833,
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    // [ \ ] ^ _ `
    278, 278, 278, 469, 556, 333,
    // a-z
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833,
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500,
    // { | } ~
    334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    333, 333, 584, 584, 584, 611, 975,
    722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833,
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    333, 278, 333, 584, 556, 333,
    556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889,
    611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500,
    389, 280, 389, 584,
];

fn advance(table: &[u16; 95], ch: char) -> u16 {
    let code = ch as u32;
    if code >= FIRST && code < FIRST + table.len() as u32 {
        table[(code - FIRST) as usize]
    } else {
        FALLBACK
    }
}

/// Width of `text` in points when set in `font` at `size` points.
pub fn string_width(text: &str, font: Font, size: f32) -> f32 {
    let table = match font {
        Font::Helvetica => &HELVETICA,
        Font::HelveticaBold => &HELVETICA_BOLD,
    };
    let units: u32 = text.chars().map(|ch| u32::from(advance(table, ch))).sum();
    units as f32 * size / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_widths() {
        // 10 digits at 556 each, 12pt
        assert!((string_width("0123456789", Font::Helvetica, 12.0) - 66.72).abs() < 1e-3);
        assert!((string_width("i", Font::Helvetica, 1000.0) - 222.0).abs() < 1e-3);
        assert!((string_width("i", Font::HelveticaBold, 1000.0) - 278.0).abs() < 1e-3);
        assert_eq!(string_width("", Font::Helvetica, 12.0), 0.0);
    }

    #[test]
    fn tables_line_up_with_ascii() {
        assert_eq!(advance(&HELVETICA, 'A'), 667);
        assert_eq!(advance(&HELVETICA, 'W'), 944);
        assert_eq!(advance(&HELVETICA, 'z'), 500);
        assert_eq!(advance(&HELVETICA, '~'), 584);
        assert_eq!(advance(&HELVETICA_BOLD, 'm'), 889);
        assert_eq!(advance(&HELVETICA_BOLD, '~'), 584);
        assert_eq!(advance(&HELVETICA, '\u{e9}'), FALLBACK);
    }
}
