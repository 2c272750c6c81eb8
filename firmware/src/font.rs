//! 3x8 glyphs for the matrix: digits 0-9 and the colon.
//!
//! Each row is a 3-bit mask, bit 2 being the leftmost column.

pub const GLYPH_WIDTH: usize = 3;
pub const COLON: usize = 10;

pub const FONT: [[u8; 8]; 11] = [
    [0b111, 0b101, 0b101, 0b101, 0b101, 0b101, 0b111, 0],
    [0b010, 0b110, 0b010, 0b010, 0b010, 0b010, 0b111, 0],
    [0b111, 0b001, 0b001, 0b111, 0b100, 0b100, 0b111, 0],
    [0b111, 0b001, 0b001, 0b111, 0b001, 0b001, 0b111, 0],
    [0b101, 0b101, 0b101, 0b111, 0b001, 0b001, 0b001, 0],
    [0b111, 0b100, 0b100, 0b111, 0b001, 0b001, 0b111, 0],
    [0b111, 0b100, 0b100, 0b111, 0b101, 0b101, 0b111, 0],
    [0b111, 0b001, 0b001, 0b010, 0b010, 0b010, 0b010, 0],
    [0b111, 0b101, 0b101, 0b111, 0b101, 0b101, 0b111, 0],
    [0b111, 0b101, 0b101, 0b111, 0b001, 0b001, 0b111, 0],
    [0b000, 0b000, 0b010, 0b000, 0b010, 0b000, 0b000, 0],
];

/// Glyph index for a character the font can draw.
pub fn glyph(ch: char) -> Option<usize> {
    match ch {
        '0'..='9' => ch.to_digit(10).map(|d| d as usize),
        ':' => Some(COLON),
        _ => None,
    }
}
