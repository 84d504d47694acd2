use ratatui::text::Line;
use unicode_width::UnicodeWidthStr;

pub const GLYPH_ROWS: usize = 7;

const ZERO: [&str; GLYPH_ROWS] = [
    " █████ ", "██   ██", "██  ███", "██ █ ██", "███  ██", "██   ██", " █████ ",
];
const ONE: [&str; GLYPH_ROWS] = [
    "  ██   ", " ███   ", "  ██   ", "  ██   ", "  ██   ", "  ██   ", "██████ ",
];
const TWO: [&str; GLYPH_ROWS] = [
    " █████ ", "██   ██", "    ██ ", "  ███  ", " ██    ", "██     ", "██████ ",
];
const THREE: [&str; GLYPH_ROWS] = [
    " █████ ", "██   ██", "    ██ ", "  ███  ", "    ██ ", "██   ██", " █████ ",
];
const FOUR: [&str; GLYPH_ROWS] = [
    "   ███ ", "  █ ██ ", " █  ██ ", "██   ██", "██████ ", "    ██ ", "    ██ ",
];
const FIVE: [&str; GLYPH_ROWS] = [
    "██████ ", "██     ", "█████  ", "     ██", "     ██", "██   ██", " █████ ",
];
const SIX: [&str; GLYPH_ROWS] = [
    " █████ ", "██   ██", "██     ", "█████  ", "██   ██", "██   ██", " █████ ",
];
const SEVEN: [&str; GLYPH_ROWS] = [
    "██████ ", "     ██", "    ██ ", "   ██  ", "  ██   ", "  ██   ", "  ██   ",
];
const EIGHT: [&str; GLYPH_ROWS] = [
    " █████ ", "██   ██", "██   ██", " █████ ", "██   ██", "██   ██", " █████ ",
];
const NINE: [&str; GLYPH_ROWS] = [
    " █████ ", "██   ██", "██   ██", " █████ ", "    ██ ", "██   ██", " █████ ",
];
const COLON: [&str; GLYPH_ROWS] = ["   ", " ░ ", "   ", "   ", " ░ ", "   ", "   "];
const BLANK: [&str; GLYPH_ROWS] = ["   "; GLYPH_ROWS];

fn glyph(c: char) -> &'static [&'static str; GLYPH_ROWS] {
    match c {
        '0' => &ZERO,
        '1' => &ONE,
        '2' => &TWO,
        '3' => &THREE,
        '4' => &FOUR,
        '5' => &FIVE,
        '6' => &SIX,
        '7' => &SEVEN,
        '8' => &EIGHT,
        '9' => &NINE,
        ':' => &COLON,
        _ => &BLANK,
    }
}

/// Render `text` as seven rows of block glyphs, one column of spacing
/// between characters.
pub fn big_text(text: &str) -> Vec<Line<'static>> {
    (0..GLYPH_ROWS)
        .map(|row| {
            let line = text
                .chars()
                .map(|c| glyph(c)[row])
                .collect::<Vec<_>>()
                .join(" ");
            Line::from(line)
        })
        .collect()
}

/// Display width of [`big_text`] output for `text`.
pub fn big_text_width(text: &str) -> u16 {
    let width = text
        .chars()
        .map(|c| glyph(c)[0].width())
        .sum::<usize>()
        + text.chars().count().saturating_sub(1);
    u16::try_from(width).unwrap_or(u16::MAX)
}
