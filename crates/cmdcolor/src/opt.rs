//! Helper module with the options for colored printing.
//!
//! This module provides the options for [`printc`](crate::printc) and the
//! corresponding builder.
//!
//!
//! # Example
//!
//! ```
//! # use cmdcolor::{Options, Stream};
//! let options = Options::builder()
//!     .sink(Stream::Stderr)
//!     .separator(", ")
//!     .build();
//!
//! assert_eq!(options.sink(), Stream::Stderr);
//! assert_eq!(options.separator(), ", ");
//! assert_eq!(options.terminator(), "\n");
//! ```

use std::borrow::Cow;

use cmdtty::Stream;

#[derive(Clone, Debug)]
struct OptionData {
    sink: Stream,
    separator: Cow<'static, str>,
    terminator: Cow<'static, str>,
}

impl OptionData {
    pub const fn new() -> Self {
        Self {
            sink: Stream::Stdout,
            separator: Cow::Borrowed(" "),
            terminator: Cow::Borrowed("\n"),
        }
    }
}

/// A builder of options objects.
#[derive(Debug)]
pub struct OptionBuilder(OptionData);

impl OptionBuilder {
    /// Set the output stream.
    pub fn sink(&mut self, sink: Stream) -> &mut Self {
        self.0.sink = sink;
        self
    }

    /// Set the separator written between consecutive text arguments.
    pub fn separator<S: Into<Cow<'static, str>>>(&mut self, separator: S) -> &mut Self {
        self.0.separator = separator.into();
        self
    }

    /// Set the terminator written after all arguments.
    ///
    /// The terminator is written after colors have been reset and hence
    /// always appears in the sink's default colors.
    pub fn terminator<S: Into<Cow<'static, str>>>(&mut self, terminator: S) -> &mut Self {
        self.0.terminator = terminator.into();
        self
    }

    /// Instantiate the options.
    pub fn build(&self) -> Options {
        Options(self.0.clone())
    }
}

/// An options object.
#[derive(Clone, Debug)]
pub struct Options(OptionData);

impl Default for Options {
    fn default() -> Self {
        Options(OptionData::new())
    }
}

impl Options {
    /// Create a new builder with the default option values.
    pub fn builder() -> OptionBuilder {
        OptionBuilder(OptionData::new())
    }

    /// Instantiate the default options but writing to standard error.
    pub fn stderr() -> Options {
        Self::builder().sink(Stream::Stderr).build()
    }

    /// Get the output stream.
    pub fn sink(&self) -> Stream {
        self.0.sink
    }

    /// Get the separator.
    pub fn separator(&self) -> &str {
        &self.0.separator
    }

    /// Get the terminator.
    pub fn terminator(&self) -> &str {
        &self.0.terminator
    }
}
