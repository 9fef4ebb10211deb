//! Colored printing.

use std::io::{Result, Write};

use cmdtty::Stream;

use crate::backend::Backend;
use crate::{Arg, Options, Terminal, RESET};

/// Write the arguments without colors.
fn write_plain(args: &[Arg<'_>], options: &Options, out: &mut dyn Write) -> Result<()> {
    let mut first = true;
    for text in args.iter().filter_map(Arg::as_text) {
        if first {
            first = false;
        } else {
            out.write_all(options.separator().as_bytes())?;
        }
        out.write_all(text.as_bytes())?;
    }
    out.write_all(options.terminator().as_bytes())?;
    out.flush()
}

/// Write the arguments with colors.
///
/// Colors do not trigger separators. A separator is written before every
/// text but the first, even if colors come between the two texts.
fn write_colored(
    backend: &mut dyn Backend,
    args: &[Arg<'_>],
    separator: &str,
    out: &mut dyn Write,
) -> Result<()> {
    let mut pending = None;
    for arg in args {
        match arg {
            Arg::Color(color) => {
                if !color.is_empty() {
                    backend.set_color(color, out)?;
                }
            }
            Arg::Text(text, _) => {
                if let Some(separator) = pending.take() {
                    backend.write_text(separator, out)?;
                }
                backend.write_text(text, out)?;
                pending = Some(separator);
            }
        }
    }
    Ok(())
}

impl Terminal {
    /// Print the arguments to the sink named by the options.
    ///
    /// Color arguments change the color of subsequent text. All other
    /// arguments are printed as text, separated by the separator and followed
    /// by the terminator. Colors are reset before the terminator, even if
    /// printing fails.
    ///
    /// If the terminal will not use color for the sink, this method prints
    /// only the text arguments, exactly as a plain print would.
    pub fn printc(&mut self, args: &[Arg<'_>], options: &Options) -> Result<()> {
        match options.sink() {
            Stream::Stdout => self.printc_to(args, options, &mut std::io::stdout().lock()),
            Stream::Stderr => self.printc_to(args, options, &mut std::io::stderr().lock()),
        }
    }

    /// Print the arguments to the given writer.
    ///
    /// The writer stands in for the sink named by the options, whose binding
    /// decides how colors are rendered. If printing fails and so does
    /// resetting colors afterwards, this method returns the first error.
    pub fn printc_to(
        &mut self,
        args: &[Arg<'_>],
        options: &Options,
        out: &mut dyn Write,
    ) -> Result<()> {
        let stream = options.sink();
        if !self.will_use_color(stream) {
            return write_plain(args, options, out);
        }

        let backend = self.backend(stream);
        let result = write_colored(backend, args, options.separator(), out);
        let reset = backend.set_color(&RESET, out);
        result.and(reset)?;

        backend.write_text(options.terminator(), out)?;
        out.flush()
    }
}

/// Print the arguments with the process-wide terminal.
///
/// This function locks the [global terminal](Terminal::global) for the
/// duration of the call and then invokes [`Terminal::printc`].
/// The lock is not reentrant. Calling this function while the same thread
/// holds a guard from [`Terminal::global`] deadlocks, so code holding a
/// guard should call [`Terminal::printc`] on it instead.
///
/// ```no_run
/// # use cmdcolor::{args, printc, Options, BG_BLUE, BRIGHT, YELLOW};
/// printc(&args![YELLOW, BRIGHT, "Hello,", BG_BLUE, "world!"], &Options::default())?;
/// # Ok::<(), std::io::Error>(())
/// ```
pub fn printc(args: &[Arg<'_>], options: &Options) -> Result<()> {
    Terminal::global().printc(args, options)
}
