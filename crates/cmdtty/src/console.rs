//! Helper module with the standard output streams and the native console.
//!
//! A [`Stream`] identifies one of the two standard output streams. It is the
//! key under which colored output keeps per-sink state. A [`Console`] is a
//! sink that changes colors through an API call instead of in-band escape
//! sequences, as the legacy Windows console does.

use std::io::Result;

/// One of the process' standard output streams.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Stream {
    /// Standard output.
    Stdout,
    /// Standard error.
    Stderr,
}

impl Stream {
    /// Get an iterator over both streams in order.
    pub fn all() -> impl Iterator<Item = Stream> {
        [Stream::Stdout, Stream::Stderr].into_iter()
    }

    /// Get this stream's name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Stdout => "stdout",
            Self::Stderr => "stderr",
        }
    }

    /// Determine whether this stream is connected to a terminal.
    pub fn is_terminal(&self) -> bool {
        crate::sys::is_terminal(*self)
    }
}

impl std::fmt::Display for Stream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A console changing colors through API calls.
///
/// The attribute word uses the console's bit layout: The low nibble holds the
/// foreground color, the high nibble holds the background color, and within
/// each nibble bit 0 is blue, bit 1 is green, bit 2 is red, and bit 3 is
/// intensity.
///
/// This trait is object-safe. Implementations need not be thread-safe
/// beyond `Send`; a console must have at most one writer at a time.
pub trait Console: std::fmt::Debug + Send {
    /// Read the current attribute word.
    fn attributes(&self) -> Result<u16>;

    /// Replace the current attribute word.
    fn set_attributes(&mut self, attributes: u16) -> Result<()>;

    /// Try to switch the console to processing ANSI escape sequences.
    fn enable_virtual_terminal(&mut self) -> Result<()>;

    /// Write the text with the current attributes.
    fn write_text(&mut self, text: &str) -> Result<()>;
}

/// Open the native console for the given stream.
///
/// This function returns `Ok(None)` on platforms without a native console
/// API, i.e., everywhere but Windows. On Windows, it returns an error if the
/// process has no usable standard handle for the stream. A handle that has
/// been redirected to a file or pipe still opens but fails on first use.
pub fn open(stream: Stream) -> Result<Option<Box<dyn Console>>> {
    crate::sys::open_console(stream)
}
