use core::fmt::Write;

use heapless::String;

use crate::clock::Snapshot;
use crate::decode::DecodedTime;
use crate::error::Error;

/// Longest line [`render_time`] produces.
pub const LINE_CAPACITY: usize = 16;

/// Write-only character display with a fixed number of lines.
pub trait TextSurface {
    type Error;

    /// Number of lines the surface can show.
    const LINES: u8;

    /// Blank the surface and move the cursor to the start of line 0.
    fn clear_and_home(&mut self) -> Result<(), Self::Error>;

    /// Move the cursor to the start of `line`.
    fn select_line(&mut self, line: u8) -> Result<(), Self::Error>;

    fn write_str(&mut self, text: &str) -> Result<(), Self::Error>;
}

/// Writes the readout: time, raw snapshot, and run start marker, one per
/// line for as many lines as the surface has.
pub fn render_time<S, L>(
    surface: &mut S,
    time: &DecodedTime,
    snapshot: &Snapshot,
) -> Result<(), Error<L, S::Error>>
where
    S: TextSurface,
{
    surface.clear_and_home().map_err(Error::Surface)?;

    let mut line: String<LINE_CAPACITY> = String::new();
    for index in 0..S::LINES.min(3) {
        line.clear();
        let formatted = match index {
            0 => write!(line, "{}", time),
            1 => write!(line, "snap: {}", snapshot.now_ms),
            _ => write!(line, "start:{}", snapshot.start_ms),
        };
        formatted.map_err(|_| Error::Format)?;

        surface.select_line(index).map_err(Error::Surface)?;
        surface.write_str(&line).map_err(Error::Surface)?;
    }
    Ok(())
}
