//! Palette reduction.
//!
//! These pure functions map 24-bit colors and 256-color palette indices onto
//! smaller palettes. [`fit`] decides whether a reduction is necessary at all
//! for a given number of colors; a renderer supporting at least as many
//! colors as a value's native range always receives the value unchanged.
//!
//! Reducing a 24-bit color to sixteen colors gives the same result whether
//! it goes through the 256-color palette first or not, up to one step of
//! gray for near-gray colors:
//!
//! ```
//! # use cmdcolor::ColorIndex;
//! # use cmdcolor::reduce::{reduce_to_16, reduce_to_256};
//! let orange = ColorIndex::rgb(0xff, 0x80, 0x00);
//! assert_eq!(reduce_to_256(orange).value(), 208);
//! assert_eq!(reduce_to_16(orange), reduce_to_16(reduce_to_256(orange)));
//! assert_eq!(reduce_to_16(orange).value(), 12);
//! ```

use crate::ColorIndex;

/// The number of colors of a true-color terminal.
pub const TRUE_COLORS: u32 = 0x100_0000;

/// Quantize a 24-bit channel to one of the six levels of the color cube.
#[inline]
const fn level(channel: u8) -> u32 {
    (channel as u32 + 20) / 51
}

/// Reduce the color to the 256-color palette.
///
/// Palette indices are returned unchanged. Near-gray 24-bit colors, whose
/// channels differ by less than 20, map to the gray ramp `232..=255`. All
/// others map to the 6×6×6 cube `16..=231`.
pub fn reduce_to_256(color: ColorIndex) -> ColorIndex {
    let Some([r, g, b]) = color.channels() else {
        return color;
    };

    let min = r.min(g).min(b) as u32;
    let max = r.max(g).max(b) as u32;
    let index = if max - min < 20 {
        (232 + (min + max) / 16).min(255)
    } else {
        16 + level(b) + 6 * (level(g) + 6 * level(r))
    };

    ColorIndex::from(index as u8)
}

/// Reduce the color to the sixteen named colors.
///
/// Named colors are returned unchanged. The gray ramp maps to black, bright
/// black, white, or bright white by brightness. Cube colors and 24-bit colors
/// map to the hue whose channels come within one level of the maximum
/// channel, with the intensity bit set for the brightest colors. Grayish
/// colors of low levels map to black or bright black instead of white.
///
/// A 24-bit color is quantized channel by channel, exactly like the cube,
/// and hence reduces to the same color as its 256-color counterpart. The
/// exception is near-gray colors, which [`reduce_to_256`] places on the gray
/// ramp. For them, the two results may differ by one step along black,
/// bright black, white, and bright white:
///
/// ```
/// # use cmdcolor::ColorIndex;
/// # use cmdcolor::reduce::{reduce_to_16, reduce_to_256};
/// let gray = ColorIndex::rgb(128, 128, 128);
/// assert_eq!(reduce_to_16(gray).value(), 8);
/// assert_eq!(reduce_to_16(reduce_to_256(gray)).value(), 7);
/// ```
pub fn reduce_to_16(color: ColorIndex) -> ColorIndex {
    if color.is_named() {
        return color;
    }

    let (r, g, b) = if let Some([r, g, b]) = color.channels() {
        (level(r), level(g), level(b))
    } else if 232 <= color.value() {
        return reduce_gray(color.value());
    } else {
        let n = color.value() - 16;
        (n / 36, n / 6 % 6, n % 6)
    };

    let mut index = 0;
    if g.max(r).saturating_sub(1) <= b {
        index |= 1;
    }
    if b.max(r).saturating_sub(1) <= g {
        index |= 2;
    }
    if b.max(g).saturating_sub(1) <= r {
        index |= 4;
    }

    let value = r.max(g).max(b);
    if index == 7 {
        if value == 0 {
            return ColorIndex::from(0);
        } else if value < 3 {
            return ColorIndex::from(8);
        }
    }
    if 4 < value {
        index |= 8;
    }

    ColorIndex::from(index)
}

fn reduce_gray(index: u32) -> ColorIndex {
    ColorIndex::from(match index {
        0..=234 => 0,
        235..=241 => 8,
        242..=250 => 7,
        _ => 15,
    })
}

/// Convert a named color's RGBI index to the ANSI color number.
///
/// The console orders the color bits blue, green, red from least to most
/// significant, whereas ANSI terminals order them red, green, blue. The
/// intensity bit is dropped.
///
/// ```
/// # use cmdcolor::reduce::ansi_code;
/// assert_eq!(ansi_code(1), 4); // blue
/// assert_eq!(ansi_code(4), 1); // red
/// assert_eq!(ansi_code(14), 3); // bright yellow
/// ```
pub const fn ansi_code(index: u32) -> u32 {
    ((index & 1) << 2) | (index & 2) | ((index & 4) >> 2)
}

/// Fit the color to a terminal supporting the given number of colors.
///
/// With fewer than 256 colors, every color is reduced to the sixteen named
/// colors. With fewer than 16,777,216 colors, 24-bit colors are reduced to
/// the 256-color palette. Otherwise the color is returned unchanged.
pub fn fit(color: ColorIndex, colors: u32) -> ColorIndex {
    if colors < 256 {
        reduce_to_16(color)
    } else if colors < TRUE_COLORS && color.is_rgb() {
        reduce_to_256(color)
    } else {
        color
    }
}
