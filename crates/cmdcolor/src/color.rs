//! The color value algebra.
//!
//! A [`ColorValue`] does not describe a color so much as a *change* to the
//! current output color: it optionally sets the foreground color, optionally
//! sets the background color, and carries a small set of [`Flag`]s for
//! brightening or resetting. [`ColorValue::combine`] composes two such
//! changes into one, applying the first and then the second. The operation is
//! neither commutative nor associative.
//!
//! The first sixteen palette indices follow the RGBI bit order of the CGA and
//! the Windows console: bit 0 is blue, bit 1 is green, bit 2 is red, and bit
//! 3 is intensity. That is why blue has index 1 and red has index 4. Indices
//! 16–255 follow the xterm convention. Applying [`Flag::Bright`] to a dark
//! foreground index 0–7 folds the intensity into the index:
//!
//! ```
//! # use cmdcolor::{BLUE, BRIGHT, ColorIndex};
//! let bright_blue = BLUE.combine(&BRIGHT);
//! assert_eq!(bright_blue.foreground(), Some(ColorIndex::from(9)));
//! assert!(bright_blue.flags().is_empty());
//!
//! // Only a second application sets the bold flag.
//! let bold_bright_blue = bright_blue.combine(&BRIGHT);
//! assert_eq!(bold_bright_blue.foreground(), Some(ColorIndex::from(9)));
//! assert!(!bold_bright_blue.flags().is_empty());
//!
//! // But a color value has only one bright flag.
//! assert_eq!(BLUE.combine(&BRIGHT.combine(&BRIGHT)), bright_blue);
//! ```

use crate::error::{RangeError, TypeMismatchError};
use crate::Arg;

/// The names of the eight dark colors in index order.
const COLOR_NAMES: [&str; 8] = [
    "black", "blue", "green", "cyan", "red", "magenta", "yellow", "white",
];

/// Get the name of the color with the given index `0..=7`.
///
/// ```
/// # use cmdcolor::color_name;
/// assert_eq!(color_name(4)?, "red");
/// assert!(color_name(8).is_err());
/// # Ok::<(), cmdcolor::error::RangeError>(())
/// ```
pub fn color_name(index: u8) -> Result<&'static str, RangeError> {
    COLOR_NAMES
        .get(index as usize)
        .copied()
        .ok_or_else(|| RangeError::new(index, 0..=7))
}

// ------------------------------------------------------------------------------------------------

/// A color index.
///
/// A color index is a 32-bit value with three disjoint ranges:
///
///   * `0..16` for the sixteen named colors with bit 3 as intensity;
///   * `16..256` for the 6×6×6 RGB cube and the 24-step gray ramp of the
///     256-color palette;
///   * `0xFF00_0000..` for 24-bit RGB colors, with the top byte serving as
///     tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ColorIndex(u32);

impl ColorIndex {
    /// The tag distinguishing 24-bit colors from palette indices.
    pub const RGB_TAG: u32 = 0xFF00_0000;

    /// Create a new color index from its raw value.
    ///
    /// This function fails for values between 256 and `0xFF00_0000`.
    pub const fn new(value: u32) -> Result<Self, RangeError> {
        if value < 256 || Self::RGB_TAG <= value {
            Ok(Self(value))
        } else {
            Err(RangeError {
                value: value as i64,
                expected: 0..=255,
            })
        }
    }

    /// Create a new 24-bit color index.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self(Self::RGB_TAG | (r as u32) << 16 | (g as u32) << 8 | b as u32)
    }

    /// Create a new index into the 6×6×6 cube of the 256-color palette.
    pub const fn cube(r: u8, g: u8, b: u8) -> Result<Self, RangeError> {
        let mut index = 0;
        let channels = [r, g, b];
        while index < 3 {
            if 5 < channels[index] {
                return Err(RangeError {
                    value: channels[index] as i64,
                    expected: 0..=5,
                });
            }
            index += 1;
        }

        Ok(Self(16 + b as u32 + 6 * (g as u32 + 6 * r as u32)))
    }

    /// Get the raw value.
    #[inline]
    pub const fn value(&self) -> u32 {
        self.0
    }

    /// Determine whether this index is one of the sixteen named colors.
    #[inline]
    pub const fn is_named(&self) -> bool {
        self.0 < 16
    }

    /// Determine whether this index belongs to the 256-color palette.
    #[inline]
    pub const fn is_palette(&self) -> bool {
        self.0 < 256
    }

    /// Determine whether this index is a 24-bit color.
    #[inline]
    pub const fn is_rgb(&self) -> bool {
        Self::RGB_TAG <= self.0
    }

    /// Get the red, green, and blue channels of a 24-bit color.
    pub const fn channels(&self) -> Option<[u8; 3]> {
        if self.is_rgb() {
            Some([(self.0 >> 16) as u8, (self.0 >> 8) as u8, self.0 as u8])
        } else {
            None
        }
    }

    /// Set or clear the intensity of a named color.
    ///
    /// If the intensity is `None` or this index is not a named color, this
    /// method returns the index unchanged.
    pub const fn with_intensity(&self, intensity: Option<bool>) -> Self {
        match intensity {
            Some(true) if self.is_named() => Self(self.0 | 8),
            Some(false) if self.is_named() => Self(self.0 & 7),
            _ => *self,
        }
    }
}

impl From<u8> for ColorIndex {
    fn from(value: u8) -> Self {
        Self(value as u32)
    }
}

impl std::fmt::Display for ColorIndex {
    /// Format this index as color name, palette number, or hashed hexadecimal
    /// color.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some([r, g, b]) = self.channels() {
            write!(f, "#{:02x}{:02x}{:02x}", r, g, b)
        } else if self.is_named() {
            if self.0 & 8 != 0 {
                f.write_str("bright ")?;
            }
            f.write_str(COLOR_NAMES[(self.0 & 7) as usize])
        } else {
            write!(f, "{}", self.0)
        }
    }
}

// ------------------------------------------------------------------------------------------------

/// A flag of a color value.
///
/// Discriminants are distinct bits and hence can be combined into
/// [`Flags`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Flag {
    /// Brighten a dark foreground color or, failing that, embolden text.
    Bright = 0x8,
    /// Undo bold text or, failing that, darken a bright foreground color.
    ResetBright = 0x100,
    /// Restore the default foreground color.
    ResetFg = 0x400,
    /// Restore the default background color.
    ResetBg = 0x800,
    /// Restore the default appearance.
    ResetAll = 0x1000,
}

impl Flag {
    #[inline]
    const fn bits(&self) -> u16 {
        *self as u16
    }

    const fn successor(&self) -> Option<Self> {
        use self::Flag::*;

        Some(match self {
            Bright => ResetBright,
            ResetBright => ResetFg,
            ResetFg => ResetBg,
            ResetBg => ResetAll,
            ResetAll => return None,
        })
    }
}

/// A set of flags.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Flags(u16);

impl Flags {
    /// Create a new empty flag set.
    #[inline]
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Get the raw bits.
    #[inline]
    pub const fn bits(&self) -> u16 {
        self.0
    }

    /// Determine whether this flag set is empty.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Get the number of flags in this set.
    #[inline]
    pub const fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Determine whether this set contains the flag.
    #[inline]
    pub const fn contains(&self, flag: Flag) -> bool {
        self.0 & flag.bits() != 0
    }

    /// Add the flag to this set.
    #[inline]
    #[must_use = "the method returns a new flag set and does not mutate the original"]
    pub const fn with(&self, flag: Flag) -> Self {
        Self(self.0 | flag.bits())
    }

    /// Remove the flag from this set.
    #[inline]
    #[must_use = "the method returns a new flag set and does not mutate the original"]
    pub const fn without(&self, flag: Flag) -> Self {
        Self(self.0 & !flag.bits())
    }

    /// Compute the union of this and the other set.
    #[inline]
    #[must_use = "the method returns a new flag set and does not mutate the original"]
    pub const fn union(&self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Get an iterator over the flags in this set.
    #[inline]
    pub const fn flags(&self) -> FlagIter {
        FlagIter {
            flags: *self,
            cursor: None,
            remaining: self.len(),
        }
    }
}

impl From<Flag> for Flags {
    fn from(value: Flag) -> Self {
        Self(value.bits())
    }
}

impl std::fmt::Debug for Flags {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.flags()).finish()
    }
}

/// An iterator over flags.
#[derive(Debug)]
pub struct FlagIter {
    flags: Flags,
    cursor: Option<Flag>,
    remaining: usize,
}

impl Iterator for FlagIter {
    type Item = Flag;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let flag = match self.cursor {
                None => Flag::Bright,
                Some(flag) => flag.successor()?,
            };
            self.cursor = Some(flag);

            if self.flags.contains(flag) {
                self.remaining -= 1;
                return Some(flag);
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for FlagIter {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl std::iter::FusedIterator for FlagIter {}

// ================================================================================================

/// A change to the current output color.
///
/// Color values are immutable. All methods return new values.
///
/// Equality compares all three fields exactly, without normalizing
/// equivalent encodings. Ordering is lexicographic over foreground,
/// background, and flags. It exists for sorting and deterministic
/// iteration and carries no perceptual meaning.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ColorValue {
    fg: Option<ColorIndex>,
    bg: Option<ColorIndex>,
    flags: Flags,
}

impl ColorValue {
    /// Create a new color value from its parts.
    pub const fn new(fg: Option<ColorIndex>, bg: Option<ColorIndex>, flags: Flags) -> Self {
        Self { fg, bg, flags }
    }

    /// Create a new color value with only the flag.
    pub const fn flag(flag: Flag) -> Self {
        Self::new(None, None, Flags(flag as u16))
    }

    /// Create a new color value setting the foreground to the palette index.
    pub const fn fg(index: u8) -> Self {
        Self::new(Some(ColorIndex(index as u32)), None, Flags::empty())
    }

    /// Create a new color value setting the background to the palette index.
    pub const fn bg(index: u8) -> Self {
        Self::new(None, Some(ColorIndex(index as u32)), Flags::empty())
    }

    /// Create a new color value setting the foreground to the palette index,
    /// with the intensity of a named color set or cleared.
    pub const fn fg_intensity(index: u8, intensity: bool) -> Self {
        let index = ColorIndex(index as u32).with_intensity(Some(intensity));
        Self::new(Some(index), None, Flags::empty())
    }

    /// Create a new color value setting the background to the palette index,
    /// with the intensity of a named color set or cleared.
    pub const fn bg_intensity(index: u8, intensity: bool) -> Self {
        let index = ColorIndex(index as u32).with_intensity(Some(intensity));
        Self::new(None, Some(index), Flags::empty())
    }

    /// Create a new color value setting the foreground to a color of the
    /// 6×6×6 cube. Each channel must be in `0..=5`.
    pub const fn fg6(r: u8, g: u8, b: u8) -> Result<Self, RangeError> {
        match ColorIndex::cube(r, g, b) {
            Ok(index) => Ok(Self::new(Some(index), None, Flags::empty())),
            Err(error) => Err(error),
        }
    }

    /// Create a new color value setting the background to a color of the
    /// 6×6×6 cube. Each channel must be in `0..=5`.
    pub const fn bg6(r: u8, g: u8, b: u8) -> Result<Self, RangeError> {
        match ColorIndex::cube(r, g, b) {
            Ok(index) => Ok(Self::new(None, Some(index), Flags::empty())),
            Err(error) => Err(error),
        }
    }

    /// Create a new color value setting the foreground to a 24-bit color.
    /// Each channel must be in `0..=255`.
    pub fn fg24(r: i32, g: i32, b: i32) -> Result<Self, RangeError> {
        let index = rgb24(r, g, b)?;
        Ok(Self::new(Some(index), None, Flags::empty()))
    }

    /// Create a new color value setting the background to a 24-bit color.
    /// Each channel must be in `0..=255`.
    pub fn bg24(r: i32, g: i32, b: i32) -> Result<Self, RangeError> {
        let index = rgb24(r, g, b)?;
        Ok(Self::new(None, Some(index), Flags::empty()))
    }

    /// Get the foreground color.
    #[inline]
    pub const fn foreground(&self) -> Option<ColorIndex> {
        self.fg
    }

    /// Get the background color.
    #[inline]
    pub const fn background(&self) -> Option<ColorIndex> {
        self.bg
    }

    /// Get the flags.
    #[inline]
    pub const fn flags(&self) -> Flags {
        self.flags
    }

    /// Determine whether this color value changes nothing.
    pub const fn is_empty(&self) -> bool {
        self.fg.is_none() && self.bg.is_none() && self.flags.is_empty()
    }

    /// Determine whether this color value restores the default appearance.
    pub const fn is_reset(&self) -> bool {
        self.flags.contains(Flag::ResetAll)
    }

    /// Apply this color value and then the other one.
    ///
    /// If the other value resets everything, so does the result. Otherwise,
    /// the other value's colors replace this value's colors and its flags are
    /// applied one by one.
    #[must_use = "the method returns a new color value and does not mutate the original"]
    pub fn combine(&self, other: &Self) -> Self {
        if other.is_reset() {
            return RESET;
        }

        let mut result = *self;
        result.flags = result.flags.without(Flag::ResetAll);
        if let Some(fg) = other.fg {
            result.fg = Some(fg);
            result.flags = result.flags.without(Flag::ResetFg);
        }
        if let Some(bg) = other.bg {
            result.bg = Some(bg);
            result.flags = result.flags.without(Flag::ResetBg);
        }
        result.apply_flags(other.flags);
        result
    }

    /// Apply this color value and then the argument.
    ///
    /// This method fails if the argument is a plain value.
    pub fn try_combine(&self, other: &Arg<'_>) -> Result<Self, TypeMismatchError> {
        match other {
            Arg::Color(color) => Ok(self.combine(color)),
            Arg::Text(_, type_name) => Err(TypeMismatchError::new(*type_name)),
        }
    }

    fn apply_flags(&mut self, flags: Flags) {
        let mut flags = flags;

        if flags.contains(Flag::ResetFg) {
            self.fg = None;
        }
        if flags.contains(Flag::ResetBg) {
            self.bg = None;
        }

        if flags.contains(Flag::Bright) {
            self.flags = self.flags.without(Flag::ResetBright);

            // Brightening a dark color yields the bright color, not bold text.
            if let Some(ColorIndex(fg @ 0..=7)) = self.fg {
                flags = flags.without(Flag::Bright);
                self.fg = Some(ColorIndex(fg + 8));
            }
        }

        if flags.contains(Flag::ResetBright) {
            if self.flags.contains(Flag::Bright) {
                self.flags = self.flags.without(Flag::Bright);
            } else if let Some(ColorIndex(fg @ 8..=15)) = self.fg {
                flags = flags.without(Flag::ResetBright);
                self.fg = Some(ColorIndex(fg - 8));
            }
        }

        self.flags = self.flags.union(flags);
    }

    /// Brighten the foreground of this color value, or embolden its text.
    ///
    /// As a special case, [`RESET`] brightens to [`BRIGHT`].
    #[must_use = "the method returns a new color value and does not mutate the original"]
    pub fn bright(&self) -> Self {
        self.combine(&BRIGHT)
    }

    /// Darken the foreground of this color value.
    ///
    /// Unlike [`Flag::ResetBright`], this method unconditionally drops all
    /// flags and darkens any bright named color.
    #[must_use = "the method returns a new color value and does not mutate the original"]
    pub const fn dark(&self) -> Self {
        let fg = match self.fg {
            Some(ColorIndex(fg)) if fg < 16 => Some(ColorIndex(fg % 8)),
            other => other,
        };
        Self::new(fg, self.bg, Flags::empty())
    }

    /// Replace the foreground color.
    #[must_use = "the method returns a new color value and does not mutate the original"]
    pub const fn with_fg(&self, color: ColorIndex) -> Self {
        Self::new(Some(color), self.bg, self.flags)
    }

    /// Replace the foreground color with the given intensity.
    #[must_use = "the method returns a new color value and does not mutate the original"]
    pub const fn with_fg_intensity(&self, color: ColorIndex, intensity: bool) -> Self {
        self.with_fg(color.with_intensity(Some(intensity)))
    }

    /// Replace the background color.
    #[must_use = "the method returns a new color value and does not mutate the original"]
    pub const fn with_bg(&self, color: ColorIndex) -> Self {
        Self::new(self.fg, Some(color), self.flags)
    }

    /// Replace the background color with the given intensity.
    #[must_use = "the method returns a new color value and does not mutate the original"]
    pub const fn with_bg_intensity(&self, color: ColorIndex, intensity: bool) -> Self {
        self.with_bg(color.with_intensity(Some(intensity)))
    }

    /// Brighten the background color. Without background color, this method
    /// sets a bright black background.
    #[must_use = "the method returns a new color value and does not mutate the original"]
    pub const fn bright_bg(&self) -> Self {
        let bg = match self.bg {
            Some(bg) => bg,
            None => ColorIndex(0),
        };
        self.with_bg_intensity(bg, true)
    }

    /// Darken the background color. Without background color, this method
    /// sets a black background.
    #[must_use = "the method returns a new color value and does not mutate the original"]
    pub const fn dark_bg(&self) -> Self {
        let bg = match self.bg {
            Some(bg) => bg,
            None => ColorIndex(0),
        };
        self.with_bg_intensity(bg, false)
    }
}

fn rgb24(r: i32, g: i32, b: i32) -> Result<ColorIndex, RangeError> {
    let mut channels = [0; 3];
    for (target, value) in channels.iter_mut().zip([r, g, b]) {
        *target = u8::try_from(value).map_err(|_| RangeError::new(value, 0..=255))?;
    }
    Ok(ColorIndex::rgb(channels[0], channels[1], channels[2]))
}

impl std::fmt::Display for ColorValue {
    /// Format a human-readable description such as `[bold bright blue, red
    /// background]`.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_reset() {
            return f.write_str("[reset]");
        }

        let mut words = Vec::new();
        if self.flags.contains(Flag::Bright) {
            words.push("bold".to_owned());
        }
        if self.flags.contains(Flag::ResetBright) {
            words.push("non-bold".to_owned());
        }
        if self.flags.contains(Flag::ResetFg) {
            words.push("non-colored".to_owned());
        }
        if let Some(fg) = self.fg {
            words.push(fg.to_string());
        }

        let mut parts = Vec::new();
        if !words.is_empty() {
            parts.push(words.join(" "));
        }
        if let Some(bg) = self.bg {
            parts.push(format!("{} background", bg));
        }
        if self.flags.contains(Flag::ResetBg) {
            parts.push("no background".to_owned());
        }

        write!(f, "[{}]", parts.join(", "))
    }
}

// ------------------------------------------------------------------------------------------------

/// The color value changing nothing.
pub const NO_COLOR: ColorValue = ColorValue::new(None, None, Flags::empty());
/// The color value restoring the default appearance.
pub const RESET: ColorValue = ColorValue::flag(Flag::ResetAll);
/// The color value brightening a dark foreground or emboldening text.
pub const BRIGHT: ColorValue = ColorValue::flag(Flag::Bright);
/// The color value undoing bold text or darkening a bright foreground.
pub const RESET_BRIGHT: ColorValue = ColorValue::flag(Flag::ResetBright);
/// The color value restoring the default foreground.
pub const RESET_FG: ColorValue = ColorValue::flag(Flag::ResetFg);
/// The color value restoring the default background.
pub const RESET_BG: ColorValue = ColorValue::flag(Flag::ResetBg);

/// The black foreground.
pub const BLACK: ColorValue = ColorValue::fg(0);
/// The blue foreground.
pub const BLUE: ColorValue = ColorValue::fg(1);
/// The green foreground.
pub const GREEN: ColorValue = ColorValue::fg(2);
/// The cyan foreground.
pub const CYAN: ColorValue = ColorValue::fg(3);
/// The red foreground.
pub const RED: ColorValue = ColorValue::fg(4);
/// The magenta foreground.
pub const MAGENTA: ColorValue = ColorValue::fg(5);
/// The yellow foreground.
pub const YELLOW: ColorValue = ColorValue::fg(6);
/// The white foreground, which is light gray on most terminals.
pub const WHITE: ColorValue = ColorValue::fg(7);

/// The black background.
pub const BG_BLACK: ColorValue = ColorValue::bg(0);
/// The blue background.
pub const BG_BLUE: ColorValue = ColorValue::bg(1);
/// The green background.
pub const BG_GREEN: ColorValue = ColorValue::bg(2);
/// The cyan background.
pub const BG_CYAN: ColorValue = ColorValue::bg(3);
/// The red background.
pub const BG_RED: ColorValue = ColorValue::bg(4);
/// The magenta background.
pub const BG_MAGENTA: ColorValue = ColorValue::bg(5);
/// The yellow background.
pub const BG_YELLOW: ColorValue = ColorValue::bg(6);
/// The white background.
pub const BG_WHITE: ColorValue = ColorValue::bg(7);
