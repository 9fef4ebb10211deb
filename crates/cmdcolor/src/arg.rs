//! Arguments to colored output.
//!
//! An [`Arg`] is either a color value changing the output color or a plain
//! value printed as text. Plain values remember the name of their Rust type,
//! so that [`ColorValue::try_combine`](crate::ColorValue::try_combine) can
//! name the offending type when asked to combine a color with a plain value.
//!
//! The [`args!`](crate::args) macro converts a list of expressions into an
//! array of arguments:
//!
//! ```
//! # use cmdcolor::{args, Arg, RED, RESET};
//! let args = args![RED, "answer:", 42, RESET];
//! assert_eq!(args.len(), 4);
//! assert_eq!(args[2].as_text(), Some("42"));
//! assert!(args[3].as_color().is_some());
//! ```

use std::borrow::Cow;

use crate::ColorValue;

/// An argument to colored output.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Arg<'a> {
    /// A change to the output color.
    Color(ColorValue),
    /// The textual form of a plain value and the name of its type.
    Text(Cow<'a, str>, &'static str),
}

impl<'a> Arg<'a> {
    /// Create a new plain argument from a displayable value.
    pub fn display<T: std::fmt::Display + ?Sized>(value: &T) -> Arg<'static> {
        Arg::Text(Cow::Owned(value.to_string()), std::any::type_name::<T>())
    }

    /// Get the color value of a color argument.
    pub fn as_color(&self) -> Option<&ColorValue> {
        match self {
            Self::Color(color) => Some(color),
            Self::Text(..) => None,
        }
    }

    /// Get the text of a plain argument.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Color(_) => None,
            Self::Text(text, _) => Some(text.as_ref()),
        }
    }

    /// Get the name of this argument's type.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Color(_) => "ColorValue",
            Self::Text(_, type_name) => *type_name,
        }
    }
}

impl From<ColorValue> for Arg<'_> {
    fn from(value: ColorValue) -> Self {
        Self::Color(value)
    }
}

impl From<&ColorValue> for Arg<'_> {
    fn from(value: &ColorValue) -> Self {
        Self::Color(*value)
    }
}

impl<'a> From<&'a str> for Arg<'a> {
    fn from(value: &'a str) -> Self {
        Self::Text(Cow::Borrowed(value), "&str")
    }
}

impl<'a> From<&'a String> for Arg<'a> {
    fn from(value: &'a String) -> Self {
        Self::Text(Cow::Borrowed(value.as_str()), "&String")
    }
}

impl From<String> for Arg<'_> {
    fn from(value: String) -> Self {
        Self::Text(Cow::Owned(value), "String")
    }
}

macro_rules! from_primitive {
    ($($typ:ty),*) => {
        $(
            impl From<$typ> for Arg<'_> {
                fn from(value: $typ) -> Self {
                    Self::Text(Cow::Owned(value.to_string()), stringify!($typ))
                }
            }
        )*
    };
}

from_primitive!(
    bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64
);

/// Convert the expressions into an array of [`Arg`]s.
#[macro_export]
macro_rules! args {
    ($($arg:expr),* $(,)?) => {
        [$($crate::Arg::from($arg)),*]
    };
}
