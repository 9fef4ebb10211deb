use std::io::{Result, Write};

use super::{write_sgr_params, Backend, Layer};
use crate::reduce::TRUE_COLORS;
use crate::{ColorValue, Flag};

/// A color value's ANSI escape sequence.
struct Sgr<'a>(&'a ColorValue);

impl Sgr<'_> {
    fn is_empty(&self) -> bool {
        let flags = self.0.flags();
        self.0.foreground().is_none()
            && self.0.background().is_none()
            && !flags.contains(Flag::Bright)
            && !flags.contains(Flag::ResetBright)
            && !flags.contains(Flag::ResetFg)
            && !flags.contains(Flag::ResetBg)
    }
}

impl std::fmt::Display for Sgr<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let color = self.0;
        if color.is_reset() {
            return f.write_str("\x1b[0m");
        } else if self.is_empty() {
            return Ok(());
        }

        f.write_str("\x1b[")?;
        let mut first = true;

        macro_rules! maybe_emit_semicolon {
            () => {
                if first {
                    #[allow(unused_assignments)]
                    {
                        first = false;
                    }
                } else {
                    f.write_str(";")?;
                }
            };
        }

        let flags = color.flags();
        if flags.contains(Flag::Bright) {
            maybe_emit_semicolon!();
            f.write_str("1")?;
        } else if flags.contains(Flag::ResetBright) {
            maybe_emit_semicolon!();
            f.write_str("22")?;
        }

        if flags.contains(Flag::ResetFg) {
            maybe_emit_semicolon!();
            f.write_str("39")?;
        } else if let Some(fg) = color.foreground() {
            maybe_emit_semicolon!();
            write_sgr_params(fg, Layer::Foreground, f)?;
        }

        if flags.contains(Flag::ResetBg) {
            maybe_emit_semicolon!();
            f.write_str("49")?;
        } else if let Some(bg) = color.background() {
            maybe_emit_semicolon!();
            write_sgr_params(bg, Layer::Background, f)?;
        }

        f.write_str("m")
    }
}

/// Get the ANSI escape sequence for the color value.
///
/// The sequence is a single SGR sequence. It is empty for color values that
/// change nothing.
///
/// ```
/// # use cmdcolor::{sgr, ColorValue, BRIGHT, RED, RESET};
/// assert_eq!(sgr(&RED).to_string(), "\x1b[31m");
/// assert_eq!(sgr(&RED.combine(&BRIGHT)).to_string(), "\x1b[91m");
/// assert_eq!(sgr(&ColorValue::fg24(255, 128, 0)?).to_string(), "\x1b[38;2;255;128;0m");
/// assert_eq!(sgr(&RESET).to_string(), "\x1b[0m");
/// # Ok::<(), cmdcolor::error::RangeError>(())
/// ```
pub fn sgr(color: &ColorValue) -> impl std::fmt::Display + use<'_> {
    Sgr(color)
}

/// A backend emitting ANSI escape sequences.
///
/// This backend assumes a terminal supporting 24-bit colors and never
/// reduces colors.
#[derive(Debug, Default)]
pub struct AnsiBackend {}

impl AnsiBackend {
    /// Create a new ANSI backend.
    pub fn new() -> Self {
        Self {}
    }
}

impl Backend for AnsiBackend {
    fn name(&self) -> &'static str {
        "ANSI"
    }

    fn can_use(&self) -> bool {
        true
    }

    fn color_count(&self) -> u32 {
        TRUE_COLORS
    }

    fn set_color(&mut self, color: &ColorValue, out: &mut dyn Write) -> Result<()> {
        let sgr = Sgr(color);
        if color.is_reset() || !sgr.is_empty() {
            // One write per escape sequence
            out.write_all(sgr.to_string().as_bytes())?;
        }
        Ok(())
    }
}
