//! Helper module with this crate's error type.
//!
//! Terminfo errors complement I/O errors by providing additional information
//! about error conditions when decoding compiled terminfo entries or
//! expanding parameterized strings. They seamlessly convert to and from I/O
//! errors.

/// The enumeration of error kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// No terminfo entry exists for the terminal name.
    NoEntry,
    /// The entry does not start with one of the two terminfo magic numbers.
    BadMagic,
    /// The entry ends before the sections announced by its header.
    Truncated,
    /// The header announces a negative or absurdly large section size.
    BadHeader,
    /// A string offset points outside the string table.
    BadStringOffset,
    /// A parameterized string contains an unknown `%` operator.
    UnknownOperator,
    /// A parameterized string pops from an empty stack.
    StackUnderflow,
    /// A parameterized string references a parameter other than `%p1`–`%p9`.
    BadParameter,
    /// A parameterized string divides by zero.
    DivisionByZero,
    /// A parameterized string has an unterminated `%{`, `%'`, or `%?`.
    Unterminated,
    /// An error reading the entry from disk.
    Unreadable,
}

impl ErrorKind {
    /// Turn the error kind to an error message.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoEntry => "no terminfo entry for terminal",
            Self::BadMagic => "terminfo entry has unknown magic number",
            Self::Truncated => "terminfo entry is truncated",
            Self::BadHeader => "terminfo entry has malformed header",
            Self::BadStringOffset => "terminfo string offset out of bounds",
            Self::UnknownOperator => "unknown operator in parameterized string",
            Self::StackUnderflow => "parameterized string pops from empty stack",
            Self::BadParameter => "parameterized string uses invalid parameter",
            Self::DivisionByZero => "parameterized string divides by zero",
            Self::Unterminated => "parameterized string has unterminated construct",
            Self::Unreadable => "error reading terminfo entry",
        }
    }
}

impl From<ErrorKind> for std::io::Error {
    fn from(value: ErrorKind) -> Self {
        Error::from(value).into()
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Error { kind, source: None }
    }
}

/// A terminfo error.
#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    source: Option<std::io::Error>,
}

impl Error {
    /// Create a new unreadable error.
    pub fn unreadable(source: std::io::Error) -> Self {
        Self {
            kind: ErrorKind::Unreadable,
            source: Some(source),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.kind.as_str())
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        if let Self {
            kind: ErrorKind::Unreadable,
            source: Some(error),
        } = self
        {
            Some(error)
        } else {
            None
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        Error::unreadable(value)
    }
}

impl From<Error> for std::io::Error {
    fn from(value: Error) -> Self {
        use self::ErrorKind::*;

        match value.kind {
            BadMagic | Truncated | BadHeader | BadStringOffset | UnknownOperator
            | StackUnderflow | BadParameter | DivisionByZero | Unterminated => {
                Self::new(std::io::ErrorKind::InvalidData, value)
            }
            NoEntry => Self::new(std::io::ErrorKind::NotFound, value),
            Unreadable => {
                if let Some(error) = value.source {
                    error
                } else {
                    Self::new(std::io::ErrorKind::Other, value)
                }
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::{Error, ErrorKind};

    #[test]
    fn test_conversion() {
        let error: std::io::Error = ErrorKind::BadMagic.into();
        assert_eq!(error.kind(), std::io::ErrorKind::InvalidData);
        assert_eq!(error.to_string(), "terminfo entry has unknown magic number");

        let error: std::io::Error = ErrorKind::NoEntry.into();
        assert_eq!(error.kind(), std::io::ErrorKind::NotFound);

        let source = std::io::Error::from(std::io::ErrorKind::PermissionDenied);
        let error = Error::from(source);
        assert_eq!(error.kind(), ErrorKind::Unreadable);
        assert!(std::error::Error::source(&error).is_some());
        let error: std::io::Error = error.into();
        assert_eq!(error.kind(), std::io::ErrorKind::PermissionDenied);
    }
}
