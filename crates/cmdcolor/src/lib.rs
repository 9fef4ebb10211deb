//! # Cmd 🎨 Color
//!
//! Cmdcolor prints colored text to terminals and consoles with one
//! composable color abstraction, no matter whether the terminal understands
//! ANSI escape sequences, is described by a terminfo entry, or is a legacy
//! Windows console changing colors through API calls.
//!
//!
//! ## 1. Overview
//!
//! Cmdcolor's main abstractions are:
//!
//!   * [`ColorValue`] is an immutable **change to the output color**. It
//!     optionally sets the foreground and background colors and carries
//!     [`Flag`]s for brightening and resetting. [`ColorValue::combine`]
//!     composes two changes into one.
//!   * The [`reduce`] module maps 24-bit and 256-color values onto **smaller
//!     palettes** for terminals that cannot display them.
//!   * The [`backend`] module defines the [`Backend`](backend::Backend)
//!     trait and its **renderers** for ANSI escape sequences, terminfo
//!     capabilities, and the native console.
//!   * [`Terminal`] binds each output [`Stream`] to a backend on first use
//!     and combines it with the user's [`ColorPolicy`].
//!   * [`printc`] and [`Terminal::printc`] **print colored text**, taking
//!     [`Arg`]s as conveniently assembled by the [`args!`] macro and
//!     [`Options`] for the sink, separator, and terminator.
//!
//!
//! ## 2. Example
//!
//! Assemble colors from the predefined values and their derived operations,
//! then print them interleaved with text. Here, the terminal is forced to
//! use ANSI escape sequences and prints into a buffer:
//!
//! ```
//! # use cmdcolor::{args, ColorPolicy, ColorValue, Options, Terminal, BG_BLUE, BRIGHT, YELLOW};
//! let warning = YELLOW.combine(&BRIGHT);
//! let mut terminal = Terminal::new();
//! terminal.set_policy(ColorPolicy::ForceAnsi);
//!
//! let mut buffer = Vec::new();
//! terminal.printc_to(
//!     &args![warning, "Careful:", BG_BLUE, "deep water", ColorValue::fg6(5, 2, 0)?, "ahead"],
//!     &Options::default(),
//!     &mut buffer,
//! )?;
//!
//! assert_eq!(
//!     String::from_utf8_lossy(&buffer),
//!     "\x1b[93mCareful:\x1b[44m deep water\x1b[38;5;208m ahead\x1b[0m\n"
//! );
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Without forcing ANSI escape sequences, the terminal picks a backend for
//! the stream and, with the default [`ColorPolicy::Auto`], uses color only if
//! the stream is a terminal. Output that does not use color is the same as a
//! plain print of the text arguments.
//!
//!
//! ## 3. Colors
//!
//! The sixteen named colors follow the RGBI bit order of the Windows console,
//! hence [`BLUE`] has index 1 and [`RED`] has index 4. Indices 16–255 are
//! the usual 6×6×6 color cube and 24-step gray ramp, and
//! [`ColorValue::fg24`] and [`ColorValue::bg24`] create 24-bit colors.

mod arg;
pub mod backend;
mod color;
pub mod error;
mod opt;
mod policy;
pub mod reduce;
mod select;
mod util;
mod writer;

pub use arg::Arg;
pub use backend::sgr;
pub use cmdtty::Stream;
pub use color::{color_name, ColorIndex, ColorValue, Flag, FlagIter, Flags};
pub use color::{
    BG_BLACK, BG_BLUE, BG_CYAN, BG_GREEN, BG_MAGENTA, BG_RED, BG_WHITE, BG_YELLOW, BLACK, BLUE,
    BRIGHT, CYAN, GREEN, MAGENTA, NO_COLOR, RED, RESET, RESET_BG, RESET_BRIGHT, RESET_FG, WHITE,
    YELLOW,
};
pub use opt::{OptionBuilder, Options};
pub use policy::ColorPolicy;
pub use select::{Probe, SystemProbe, Terminal};
pub use writer::printc;
