//! Errors surfaced by the display sequence.
//!
//! The clock itself cannot fail. Only the collaborators the controller
//! drives can: the LED pins and the text surface.

use core::fmt;

/// Display sequence error, generic over the pin and surface error types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<L, S> {
    /// LED or indicator pin could not be driven
    Led(L),

    /// Display surface rejected a command or write
    Surface(S),

    /// Rendered line did not fit its buffer
    Format,
}

impl<L, S> fmt::Display for Error<L, S>
where
    L: fmt::Debug,
    S: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Led(e) => write!(f, "LED pin error: {:?}", e),
            Error::Surface(e) => write!(f, "display surface error: {:?}", e),
            Error::Format => write!(f, "display line overflow"),
        }
    }
}
