//! Utility module with cmdcolor's errors.

/// An out-of-range error.
///
/// This error indicates a value that does not fit the range expected for
/// some argument. The ranges used by this crate include:
///
///   * `0..=5` for the channels of six-level colors such as
///     [`ColorValue::fg6`](crate::ColorValue::fg6);
///   * `0..=255` for the channels of 24-bit colors such as
///     [`ColorValue::fg24`](crate::ColorValue::fg24);
///   * `0..=255` for palette indices of a [`ColorIndex`](crate::ColorIndex).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RangeError {
    pub value: i64,
    pub expected: std::ops::RangeInclusive<i64>,
}

impl RangeError {
    /// Create a new range error.
    pub fn new<V: Into<i64>>(value: V, expected: std::ops::RangeInclusive<i64>) -> Self {
        Self {
            value: value.into(),
            expected,
        }
    }
}

impl std::fmt::Display for RangeError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_fmt(format_args!(
            "{} does not fit into range {}..={}",
            self.value,
            self.expected.start(),
            self.expected.end()
        ))
    }
}

impl std::error::Error for RangeError {}

impl From<RangeError> for std::io::Error {
    fn from(value: RangeError) -> Self {
        Self::new(std::io::ErrorKind::InvalidInput, value)
    }
}

// ================================================================================================

/// An unknown color policy.
///
/// The value holds the offending name. Valid names are listed by
/// [`ColorPolicy::ALL`](crate::ColorPolicy::ALL).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConfigurationError {
    pub value: String,
}

impl ConfigurationError {
    /// Create a new configuration error.
    pub fn new<S: Into<String>>(value: S) -> Self {
        Self {
            value: value.into(),
        }
    }
}

impl std::fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_fmt(format_args!(
            "color policy \"{}\" is not one of off, on, auto, ansi",
            self.value
        ))
    }
}

impl std::error::Error for ConfigurationError {}

impl From<ConfigurationError> for std::io::Error {
    fn from(value: ConfigurationError) -> Self {
        Self::new(std::io::ErrorKind::InvalidInput, value)
    }
}

// ================================================================================================

/// An attempt to combine a color with a plain value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeMismatchError {
    pub type_name: &'static str,
}

impl TypeMismatchError {
    /// Create a new type mismatch error for a value of the named type.
    pub fn new(type_name: &'static str) -> Self {
        Self { type_name }
    }
}

impl std::fmt::Display for TypeMismatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_fmt(format_args!("can't combine color with {}", self.type_name))
    }
}

impl std::error::Error for TypeMismatchError {}

impl From<TypeMismatchError> for std::io::Error {
    fn from(value: TypeMismatchError) -> Self {
        Self::new(std::io::ErrorKind::InvalidInput, value)
    }
}
