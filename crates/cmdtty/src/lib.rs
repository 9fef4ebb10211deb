//! # Cmd 🎨 Tty
//!
//! This crate provides the **platform side of colored console output**: it
//! tells whether standard output and standard error are terminals, talks to
//! the native console API where the platform has one, and reads compiled
//! terminfo entries. Its only dependencies are the low-level crates enabling
//! system calls, i.e., [`libc`](https://crates.io/crates/libc) on Unix and
//! [`windows-sys`](https://crates.io/crates/windows-sys) on Windows, plus
//! [`tracing`](https://crates.io/crates/tracing) for diagnostics.
//!
//! The crate has two halves:
//!
//!   * The [`console`] module identifies the two standard output
//!     [`Stream`]s and exposes the [`Console`] trait for consoles that change
//!     colors through an API call instead of in-band escape sequences. On
//!     Windows, [`console::open`] returns the legacy console for a stream; on
//!     all other platforms it returns `None`.
//!   * The [`terminfo`] module locates and decodes compiled terminfo entries
//!     and expands their parameterized capability strings with
//!     [`tparm`](terminfo::tparm).
//!
//!
//! # Example
//!
//! Expand the `setaf` capability of a terminfo entry:
//!
//! ```
//! # use cmdtty::terminfo::tparm;
//! let setaf = b"\x1b[%?%p1%{8}%<%t3%p1%d%e%p1%{16}%<%t9%p1%{8}%-%d%e38;5;%p1%d%;m";
//! assert_eq!(tparm(setaf, &[4])?, b"\x1b[34m");
//! assert_eq!(tparm(setaf, &[12])?, b"\x1b[94m");
//! assert_eq!(tparm(setaf, &[208])?, b"\x1b[38;5;208m");
//! # Ok::<(), cmdtty::err::Error>(())
//! ```
//!
//!
//! # Windows
//!
//! The legacy Windows console changes colors through
//! `SetConsoleTextAttribute` and writes text through `WriteConsoleW`. Since
//! Windows 10 version 1511, the console can also process ANSI escape
//! sequences once `ENABLE_VIRTUAL_TERMINAL_PROCESSING` has been enabled with
//! [`Console::enable_virtual_terminal`].

pub mod console;
pub mod err;
mod sys;
pub mod terminfo;
pub mod util;

pub use console::{Console, Stream};
