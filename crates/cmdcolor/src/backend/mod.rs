//! Renderers turning color values into output.
//!
//! A [`Backend`] transitions a sink's rendering state as described by a
//! [`ColorValue`](crate::ColorValue). There are four implementations:
//!
//!   * [`AnsiBackend`] emits ANSI SGR escape sequences and is stateless.
//!   * [`ConsoleBackend`] drives a native console through its attribute
//!     word. Since the console has no way of applying a change, it tracks the
//!     current color. If the console supports ANSI escape sequences, it
//!     delegates to an `AnsiBackend` instead.
//!   * [`CursesBackend`] expands the `setaf`, `setab`, `bold`, and `sgr0`
//!     capabilities of a terminfo entry and is stateless, too.
//!   * [`NullBackend`] does nothing. It stands in for a sink whose native
//!     console could not be queried.
//!
//! Backends are object-safe and bound per sink by a
//! [`Terminal`](crate::Terminal).

use std::io::{Result, Write};

use crate::reduce::ansi_code;
use crate::{ColorIndex, ColorValue};

mod ansi;
mod console;
mod curses;
mod null;

pub use ansi::{sgr, AnsiBackend};
pub use console::ConsoleBackend;
pub use curses::CursesBackend;
pub use null::NullBackend;

/// A renderer for one sink.
pub trait Backend: std::fmt::Debug + Send {
    /// Get the backend's name.
    fn name(&self) -> &'static str;

    /// Determine whether the backend can render color at all.
    fn can_use(&self) -> bool;

    /// Get the number of colors supported by the backend.
    fn color_count(&self) -> u32;

    /// Apply the color value to the sink's rendering state.
    ///
    /// Empty color values need not be forwarded. A backend may still
    /// receive them and must then leave the state unchanged.
    fn set_color(&mut self, color: &ColorValue, out: &mut dyn Write) -> Result<()>;

    /// Write the text with the current rendering state.
    fn write_text(&mut self, text: &str, out: &mut dyn Write) -> Result<()> {
        out.write_all(text.as_bytes())
    }
}

/// The targeted display layer: Foreground or background.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Layer {
    /// The foreground or text layer.
    Foreground,
    /// The background layer.
    Background,
}

impl Layer {
    /// Determine the offset for this layer.
    ///
    /// The offset is added to the SGR parameter values for foreground colors
    /// and therefore zero for [`Layer::Foreground`].
    pub const fn offset(&self) -> u32 {
        match self {
            Self::Foreground => 0,
            Self::Background => 10,
        }
    }
}

/// Write the SGR parameters selecting the color for the layer.
pub(crate) fn write_sgr_params(
    color: ColorIndex,
    layer: Layer,
    f: &mut std::fmt::Formatter<'_>,
) -> std::fmt::Result {
    if color.is_named() {
        let base = if color.value() & 8 != 0 { 90 } else { 30 } + layer.offset();
        write!(f, "{}", base + ansi_code(color.value()))
    } else if let Some([r, g, b]) = color.channels() {
        write!(f, "{};2;{};{};{}", 38 + layer.offset(), r, g, b)
    } else {
        write!(f, "{};5;{}", 38 + layer.offset(), color.value())
    }
}

#[cfg(test)]
pub(crate) mod test {
    pub(crate) use super::console::test::{FakeConsole, Record};
    pub(crate) use super::curses::test::xterm;
}
