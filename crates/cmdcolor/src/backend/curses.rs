use std::io::{Result, Write};

use cmdtty::terminfo::{tparm, TermInfo};
use cmdtty::util::nicely_str;

use super::{Backend, Layer};
use crate::reduce::{ansi_code, fit};
use crate::{ColorIndex, ColorValue, Flag};

const DEFAULT_BOLD: &[u8] = b"\x1b[1m";
const DEFAULT_SGR0: &[u8] = b"\x1b[0m";

/// A backend expanding terminfo capabilities.
///
/// This backend uses the `setaf` and `setab` capabilities for colors, `bold`
/// for brightening, and `sgr0` for resetting. Since terminfo has no
/// capabilities for undoing bold or restoring default colors, it falls back
/// on the ANSI escape sequences for those.
///
/// Colors exceeding the terminal's palette are reduced. On terminals with
/// only eight colors, bright foreground colors are approximated by the dark
/// color in bold, and bright background colors lose their intensity.
pub struct CursesBackend {
    colors: u32,
    setaf: Vec<u8>,
    setab: Vec<u8>,
    bold: Vec<u8>,
    sgr0: Vec<u8>,
}

impl CursesBackend {
    /// Create a new curses backend for the terminfo entry.
    ///
    /// This function returns `None` if the entry reports fewer than eight
    /// colors or lacks the `setaf` or `setab` capabilities. It caps the
    /// number of colors at 256.
    pub fn new(info: &TermInfo) -> Option<Self> {
        let colors = info.colors().filter(|c| 8 <= *c)?;
        let setaf = info.setaf()?;
        let setab = info.setab()?;

        Some(Self {
            colors: (colors as u32).min(256),
            setaf: setaf.to_vec(),
            setab: setab.to_vec(),
            bold: info.bold().unwrap_or(DEFAULT_BOLD).to_vec(),
            sgr0: info.sgr0().unwrap_or(DEFAULT_SGR0).to_vec(),
        })
    }

    /// Write the color code for the layer.
    fn write_color(&self, color: ColorIndex, layer: Layer, out: &mut dyn Write) -> Result<()> {
        let color = fit(color, self.colors);
        let code = if color.is_named() {
            let mut code = ansi_code(color.value());
            if color.value() & 8 != 0 {
                if 16 <= self.colors {
                    code += 8;
                } else if layer == Layer::Foreground {
                    out.write_all(&self.bold)?;
                }
            }
            code
        } else {
            color.value()
        };

        let capability = match layer {
            Layer::Foreground => &self.setaf,
            Layer::Background => &self.setab,
        };
        out.write_all(&tparm(capability, &[code as i32])?)
    }
}

impl std::fmt::Debug for CursesBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CursesBackend")
            .field("colors", &self.colors)
            .field("setaf", &nicely_str(&self.setaf))
            .field("setab", &nicely_str(&self.setab))
            .field("bold", &nicely_str(&self.bold))
            .field("sgr0", &nicely_str(&self.sgr0))
            .finish()
    }
}

impl Backend for CursesBackend {
    fn name(&self) -> &'static str {
        "Curses"
    }

    fn can_use(&self) -> bool {
        true
    }

    fn color_count(&self) -> u32 {
        self.colors
    }

    fn set_color(&mut self, color: &ColorValue, out: &mut dyn Write) -> Result<()> {
        if color.is_reset() {
            return out.write_all(&self.sgr0);
        }

        let flags = color.flags();
        if flags.contains(Flag::Bright) {
            out.write_all(&self.bold)?;
        } else if flags.contains(Flag::ResetBright) {
            out.write_all(b"\x1b[22m")?;
        }

        if flags.contains(Flag::ResetFg) {
            out.write_all(b"\x1b[39m")?;
        } else if let Some(fg) = color.foreground() {
            self.write_color(fg, Layer::Foreground, out)?;
        }

        if flags.contains(Flag::ResetBg) {
            out.write_all(b"\x1b[49m")?;
        } else if let Some(bg) = color.background() {
            self.write_color(bg, Layer::Background, out)?;
        }

        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod test {
    use cmdtty::terminfo::{TermInfo, BOLD, COLORS, MAGIC_LEGACY, SETAB, SETAF, SGR0};

    use super::CursesBackend;
    use crate::backend::Backend;
    use crate::*;

    /// Build a compiled terminfo entry with the given colors and strings.
    pub(crate) fn entry(colors: i16, strings: &[(usize, &[u8])]) -> Vec<u8> {
        let string_count = strings.iter().map(|(i, _)| i + 1).max().unwrap_or(0);
        let mut table = Vec::new();
        let mut offsets = vec![-1_i16; string_count];
        for (index, value) in strings {
            offsets[*index] = table.len() as i16;
            table.extend_from_slice(value);
            table.push(0);
        }

        let names = b"fake|fake terminal\0";
        let mut bytes = Vec::new();
        for n in [
            MAGIC_LEGACY,
            names.len() as i16,
            0,
            COLORS as i16 + 1,
            string_count as i16,
            table.len() as i16,
        ] {
            bytes.extend_from_slice(&n.to_le_bytes());
        }
        bytes.extend_from_slice(names);
        if bytes.len() % 2 == 1 {
            bytes.push(0);
        }
        for index in 0..=COLORS {
            let n = if index == COLORS { colors } else { -1 };
            bytes.extend_from_slice(&n.to_le_bytes());
        }
        for offset in offsets {
            bytes.extend_from_slice(&offset.to_le_bytes());
        }
        bytes.extend_from_slice(&table);
        bytes
    }

    pub(crate) const XTERM_SETAF: &[u8] =
        b"\x1b[%?%p1%{8}%<%t3%p1%d%e%p1%{16}%<%t9%p1%{8}%-%d%e38;5;%p1%d%;m";
    pub(crate) const XTERM_SETAB: &[u8] =
        b"\x1b[%?%p1%{8}%<%t4%p1%d%e%p1%{16}%<%t10%p1%{8}%-%d%e48;5;%p1%d%;m";

    pub(crate) fn xterm(colors: i16) -> TermInfo {
        let bytes = entry(
            colors,
            &[
                (BOLD, b"\x1b[1m"),
                (SGR0, b"\x1b(B\x1b[m"),
                (SETAF, XTERM_SETAF),
                (SETAB, XTERM_SETAB),
            ],
        );
        TermInfo::parse(&bytes).unwrap()
    }

    fn render(backend: &mut CursesBackend, colors: &[ColorValue]) -> String {
        let mut out = Vec::new();
        for color in colors {
            backend.set_color(color, &mut out).unwrap();
        }
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_binding() {
        let backend = CursesBackend::new(&xterm(256)).unwrap();
        assert_eq!(backend.name(), "Curses");
        assert_eq!(backend.color_count(), 256);
        assert!(backend.can_use());
        assert!(format!("{:?}", backend).contains(r#"sgr0: "‹𝖾𝗌𝖼›(B‹𝖾𝗌𝖼›[m""#));

        assert!(CursesBackend::new(&xterm(2)).is_none());
        assert!(CursesBackend::new(&xterm(-1)).is_none());
        assert_eq!(CursesBackend::new(&xterm(i16::MAX)).unwrap().color_count(), 256);

        let bytes = entry(256, &[(SETAF, XTERM_SETAF)]);
        assert!(CursesBackend::new(&TermInfo::parse(&bytes).unwrap()).is_none());

        // Missing bold and sgr0 fall back on ANSI escape sequences.
        let bytes = entry(16, &[(SETAF, XTERM_SETAF), (SETAB, XTERM_SETAB)]);
        let mut backend = CursesBackend::new(&TermInfo::parse(&bytes).unwrap()).unwrap();
        assert_eq!(render(&mut backend, &[BRIGHT, RESET]), "\x1b[1m\x1b[0m");
    }

    #[test]
    fn test_256_colors() {
        let mut backend = CursesBackend::new(&xterm(256)).unwrap();
        assert_eq!(render(&mut backend, &[RED]), "\x1b[31m");
        assert_eq!(render(&mut backend, &[RED.bright()]), "\x1b[91m");
        assert_eq!(render(&mut backend, &[BG_BLUE.bright_bg()]), "\x1b[104m");
        assert_eq!(render(&mut backend, &[ColorValue::fg(208)]), "\x1b[38;5;208m");
        assert_eq!(
            render(&mut backend, &[ColorValue::bg24(255, 128, 0).unwrap()]),
            "\x1b[48;5;208m"
        );
        assert_eq!(render(&mut backend, &[RED.bright().bright()]), "\x1b[1m\x1b[91m");
        assert_eq!(
            render(&mut backend, &[RESET_BRIGHT, RESET_FG, RESET_BG, RESET]),
            "\x1b[22m\x1b[39m\x1b[49m\x1b(B\x1b[m"
        );
    }

    #[test]
    fn test_16_colors() {
        let mut backend = CursesBackend::new(&xterm(16)).unwrap();
        assert_eq!(render(&mut backend, &[ColorValue::fg(208)]), "\x1b[91m");
        assert_eq!(
            render(&mut backend, &[ColorValue::fg24(0, 0, 255).unwrap()]),
            "\x1b[94m"
        );
        assert_eq!(render(&mut backend, &[ColorValue::bg(240)]), "\x1b[100m");
    }

    #[test]
    fn test_8_colors() {
        let mut backend = CursesBackend::new(&xterm(8)).unwrap();
        assert_eq!(backend.color_count(), 8);
        assert_eq!(render(&mut backend, &[GREEN]), "\x1b[32m");
        assert_eq!(render(&mut backend, &[GREEN.bright()]), "\x1b[1m\x1b[32m");
        assert_eq!(render(&mut backend, &[BG_GREEN.bright_bg()]), "\x1b[42m");

        let both = ColorValue::fg(10).combine(&ColorValue::bg(10));
        assert_eq!(render(&mut backend, &[both]), "\x1b[1m\x1b[32m\x1b[42m");
    }
}
