use std::io::{Result, Write};

use cmdtty::Console;

use super::{AnsiBackend, Backend};
use crate::reduce::{reduce_to_16, TRUE_COLORS};
use crate::{ColorIndex, ColorValue, Flags};

/// A backend driving a native console.
///
/// The console changes colors by replacing its attribute word, which holds
/// absolute foreground and background colors. Hence this backend tracks the
/// current color and combines it with every change. Missing colors fall back
/// to the console's colors at the time the backend was created, and a reset
/// restores the attribute word from that time.
///
/// If the console accepts ANSI escape sequences, this backend supports 24-bit
/// color and delegates rendering to an [`AnsiBackend`] writing to the sink.
#[derive(Debug)]
pub struct ConsoleBackend {
    console: Box<dyn Console>,
    startup: u16,
    default: ColorValue,
    current: ColorValue,
    attributes: u16,
    ansi: Option<AnsiBackend>,
}

impl ConsoleBackend {
    /// Create a new console backend.
    ///
    /// This function fails if the console's attribute word cannot be read.
    /// It tries to enable ANSI escape sequences, falling back on the attribute
    /// word if that fails.
    pub fn new(mut console: Box<dyn Console>) -> Result<Self> {
        let startup = console.attributes()?;
        let default = ColorValue::new(
            Some(ColorIndex::from((startup & 0xf) as u8)),
            Some(ColorIndex::from(((startup >> 4) & 0xf) as u8)),
            Flags::empty(),
        );

        let ansi = match console.enable_virtual_terminal() {
            Ok(()) => Some(AnsiBackend::new()),
            Err(error) => {
                tracing::debug!(%error, "console does not process ANSI escape sequences");
                None
            }
        };

        Ok(Self {
            console,
            startup,
            default,
            current: default,
            attributes: startup,
            ansi,
        })
    }

    /// Get the console's colors at the time this backend was created.
    pub fn default_color(&self) -> ColorValue {
        self.default
    }

    /// Get the tracked absolute color.
    pub fn current_color(&self) -> ColorValue {
        self.current
    }

    /// Determine whether this backend delegates to ANSI escape sequences.
    pub fn is_ansi(&self) -> bool {
        self.ansi.is_some()
    }

    /// Resolve the color value against the tracked color.
    fn resolve(&self, color: &ColorValue) -> ColorValue {
        if color.is_reset() {
            return self.default;
        }

        let next = self.current.combine(color);
        ColorValue::new(
            next.foreground().or(self.default.foreground()),
            next.background().or(self.default.background()),
            next.flags()
                .without(crate::Flag::ResetFg)
                .without(crate::Flag::ResetBg),
        )
    }
}

/// Compute the attribute word for the absolute color.
fn attributes_of(color: &ColorValue) -> u16 {
    let layer = |index: Option<ColorIndex>| index.map_or(0, |c| reduce_to_16(c).value() as u16);
    layer(color.foreground()) | layer(color.background()) << 4
}

impl Backend for ConsoleBackend {
    fn name(&self) -> &'static str {
        if self.ansi.is_some() {
            "ANSI"
        } else {
            "Console"
        }
    }

    fn can_use(&self) -> bool {
        true
    }

    fn color_count(&self) -> u32 {
        if self.ansi.is_some() {
            TRUE_COLORS
        } else {
            16
        }
    }

    fn set_color(&mut self, color: &ColorValue, out: &mut dyn Write) -> Result<()> {
        if let Some(ansi) = self.ansi.as_mut() {
            ansi.set_color(color, out)?;
            if color.is_reset() {
                self.current = self.default;
            }
            return Ok(());
        }

        let next = self.resolve(color);
        let attributes = if color.is_reset() {
            self.startup
        } else {
            attributes_of(&next)
        };

        if attributes != self.attributes {
            // Text already written to the sink must appear in the old colors.
            out.flush()?;
            self.console.set_attributes(attributes)?;
            self.attributes = attributes;
        }
        self.current = next;
        Ok(())
    }

    fn write_text(&mut self, text: &str, out: &mut dyn Write) -> Result<()> {
        if self.ansi.is_some() {
            return out.write_all(text.as_bytes());
        }

        out.flush()?;
        self.console.write_text(text)
    }
}

#[cfg(test)]
pub(crate) mod test {
    use std::io::{Error, ErrorKind, Result};
    use std::sync::{Arc, Mutex};

    use cmdtty::Console;

    use super::ConsoleBackend;
    use crate::backend::Backend;
    use crate::*;

    /// The observable state of a fake console.
    #[derive(Debug, Default)]
    pub(crate) struct Record {
        pub(crate) calls: Vec<u16>,
        pub(crate) text: String,
    }

    /// A console that records attribute changes and text.
    #[derive(Debug)]
    pub(crate) struct FakeConsole {
        attributes: Option<u16>,
        virtual_terminal: bool,
        record: Arc<Mutex<Record>>,
    }

    impl FakeConsole {
        pub(crate) fn new(
            attributes: Option<u16>,
            virtual_terminal: bool,
        ) -> (Self, Arc<Mutex<Record>>) {
            let record = Arc::new(Mutex::new(Record::default()));
            (
                Self::sharing(attributes, virtual_terminal, record.clone()),
                record,
            )
        }

        /// Create a new fake console writing to an existing record.
        pub(crate) fn sharing(
            attributes: Option<u16>,
            virtual_terminal: bool,
            record: Arc<Mutex<Record>>,
        ) -> Self {
            Self {
                attributes,
                virtual_terminal,
                record,
            }
        }
    }

    impl Console for FakeConsole {
        fn attributes(&self) -> Result<u16> {
            self.attributes
                .ok_or_else(|| Error::from(ErrorKind::Unsupported))
        }

        fn set_attributes(&mut self, attributes: u16) -> Result<()> {
            self.record.lock().unwrap().calls.push(attributes);
            Ok(())
        }

        fn enable_virtual_terminal(&mut self) -> Result<()> {
            if self.virtual_terminal {
                Ok(())
            } else {
                Err(Error::from(ErrorKind::Unsupported))
            }
        }

        fn write_text(&mut self, text: &str) -> Result<()> {
            self.record.lock().unwrap().text.push_str(text);
            Ok(())
        }
    }

    #[test]
    fn test_failed_query() {
        let (console, _) = FakeConsole::new(None, true);
        assert!(ConsoleBackend::new(Box::new(console)).is_err());
    }

    #[test]
    fn test_legacy_console() -> Result<()> {
        // Gray on blue
        let (console, record) = FakeConsole::new(Some(0x17), false);
        let mut backend = ConsoleBackend::new(Box::new(console))?;
        assert_eq!(backend.name(), "Console");
        assert_eq!(backend.color_count(), 16);
        assert!(!backend.is_ansi());
        assert_eq!(
            backend.default_color(),
            ColorValue::new(Some(7.into()), Some(1.into()), Flags::empty())
        );

        let mut out = Vec::new();
        backend.set_color(&RED, &mut out)?;
        backend.write_text("red", &mut out)?;
        // Unchanged attributes are not set again.
        backend.set_color(&RED, &mut out)?;
        backend.set_color(&BRIGHT, &mut out)?;
        backend.set_color(&BG_GREEN, &mut out)?;
        backend.set_color(&RESET_FG, &mut out)?;
        backend.set_color(&ColorValue::fg(196), &mut out)?;
        backend.set_color(&RESET, &mut out)?;
        backend.write_text("plain", &mut out)?;

        assert!(out.is_empty());
        let record = record.lock().unwrap();
        assert_eq!(record.calls, vec![0x14, 0x1c, 0x2c, 0x27, 0x2c, 0x17]);
        assert_eq!(record.text, "redplain");
        assert_eq!(backend.current_color(), backend.default_color());
        Ok(())
    }

    #[test]
    fn test_virtual_terminal() -> Result<()> {
        let (console, record) = FakeConsole::new(Some(0x07), true);
        let mut backend = ConsoleBackend::new(Box::new(console))?;
        assert_eq!(backend.name(), "ANSI");
        assert_eq!(backend.color_count(), 0x100_0000);

        let mut out = Vec::new();
        backend.set_color(&ColorValue::fg24(255, 0, 0).unwrap(), &mut out)?;
        backend.write_text("red", &mut out)?;
        backend.set_color(&RESET, &mut out)?;
        assert_eq!(out, b"\x1b[38;2;255;0;0mred\x1b[0m");

        let record = record.lock().unwrap();
        assert!(record.calls.is_empty());
        assert!(record.text.is_empty());
        Ok(())
    }
}
