use heapless::String;
use max7219::connectors::Connector;
use max7219::{DataError, MAX7219};
use oneled_clock::TextSurface;

use crate::font::{glyph, FONT, GLYPH_WIDTH};

/// Chained 8x8 modules (FC16 layout).
pub const DEVICES: usize = 4;

/// Characters that fit across the chain with one blank column between them.
const CHARS: usize = 8;

/// Packs `text` into the per-device row buffers.
pub fn prepare_buffer(text: &str) -> [[u8; 8]; DEVICES] {
    let mut fb_rows = [0u32; 8];
    let mut cursor = 0; // Start at col 0

    for (i, ch) in text.chars().take(CHARS).enumerate() {
        if let Some(g) = glyph(ch) {
            for (r, row) in fb_rows.iter_mut().enumerate() {
                for c in 0..GLYPH_WIDTH {
                    if FONT[g][r] & (0b100 >> c) != 0 {
                        let bit_pos = 31 - (cursor + c);
                        *row |= 1 << bit_pos;
                    }
                }
            }
        }
        cursor += GLYPH_WIDTH;
        if i < CHARS - 1 {
            cursor += 1;
        }
    }

    let mut device_buffers = [[0u8; 8]; DEVICES];
    for (dev_idx, buffer) in device_buffers.iter_mut().enumerate() {
        for (r, row) in fb_rows.iter().enumerate() {
            let shift = 24 - (dev_idx * 8);
            buffer[r] = ((row >> shift) & 0xFF) as u8;
        }
    }

    device_buffers
}

/// Text surface over the LED matrix.
///
/// Line 0 is drawn on the matrix. The chain is only one character row high,
/// so the diagnostic lines go to the RTT log instead.
pub struct MatrixSurface<C: Connector> {
    display: MAX7219<C>,
    line: u8,
    text: String<CHARS>,
}

impl<C: Connector> MatrixSurface<C> {
    pub fn new(mut display: MAX7219<C>) -> Result<Self, DataError> {
        display.power_on()?;
        for i in 0..DEVICES {
            display.set_intensity(i, 0x0)?;
            display.clear_display(i)?;
        }
        Ok(Self {
            display,
            line: 0,
            text: String::new(),
        })
    }

    fn flush(&mut self) -> Result<(), DataError> {
        let buffers = prepare_buffer(&self.text);
        for (dev_idx, buffer) in buffers.iter().enumerate() {
            self.display.write_raw(dev_idx, buffer)?;
        }
        Ok(())
    }
}

impl<C: Connector> TextSurface for MatrixSurface<C> {
    type Error = DataError;

    const LINES: u8 = 3;

    fn clear_and_home(&mut self) -> Result<(), DataError> {
        self.text.clear();
        self.line = 0;
        for i in 0..DEVICES {
            self.display.clear_display(i)?;
        }
        Ok(())
    }

    fn select_line(&mut self, line: u8) -> Result<(), DataError> {
        self.line = line;
        Ok(())
    }

    fn write_str(&mut self, text: &str) -> Result<(), DataError> {
        if self.line == 0 {
            for ch in text.chars() {
                // Overflow past the last module is dropped
                if self.text.push(ch).is_err() {
                    break;
                }
            }
            self.flush()
        } else {
            defmt::info!("line {=u8}: {=str}", self.line, text);
            Ok(())
        }
    }
}
