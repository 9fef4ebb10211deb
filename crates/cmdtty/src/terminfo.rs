//! Locating, decoding, and using compiled terminfo entries.
//!
//! A compiled entry starts with a header of six little-endian 16-bit
//! integers: the magic number, the size of the names section, the number of
//! booleans, the number of numbers, the number of string offsets, and the
//! size of the string table. The legacy format stores numbers as 16-bit
//! integers, the extended number format introduced with ncurses 6.1 as 32-bit
//! integers. Both are supported. The extended capabilities that may follow
//! the string table are ignored.
//!
//! Only four string capabilities and one number capability matter for
//! colored output. They have accessors of their own. All others are
//! available by index through [`TermInfo::number`] and [`TermInfo::string`].

use std::path::{Path, PathBuf};

use crate::err::{Error, ErrorKind};
use crate::util::{nicely_str, Radix};

/// The magic number of the legacy format with 16-bit numbers.
pub const MAGIC_LEGACY: i16 = 0o432;

/// The magic number of the extended number format with 32-bit numbers.
pub const MAGIC_32BIT: i16 = 0o1036;

/// The index of the `colors` number capability.
pub const COLORS: usize = 13;

/// The index of the `bold` string capability.
pub const BOLD: usize = 27;

/// The index of the `sgr0` string capability.
pub const SGR0: usize = 39;

/// The index of the `setaf` string capability.
pub const SETAF: usize = 359;

/// The index of the `setab` string capability.
pub const SETAB: usize = 360;

// ------------------------------------------------------------------------------------------------

/// A cursor over the bytes of a compiled entry.
struct Reader<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> Reader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, offset: 0 }
    }

    fn take(&mut self, length: usize) -> Result<&'a [u8], Error> {
        let end = self
            .offset
            .checked_add(length)
            .ok_or(ErrorKind::BadHeader)?;
        let slice = self.bytes.get(self.offset..end).ok_or(ErrorKind::Truncated)?;
        self.offset = end;
        Ok(slice)
    }

    fn align(&mut self) -> Result<(), Error> {
        if self.offset % 2 == 1 {
            self.take(1)?;
        }
        Ok(())
    }

    fn i16(&mut self) -> Result<i16, Error> {
        let bytes = self.take(2)?;
        Ok(i16::from_le_bytes([bytes[0], bytes[1]]))
    }

    fn i32(&mut self) -> Result<i32, Error> {
        let bytes = self.take(4)?;
        Ok(i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    fn count(&mut self) -> Result<usize, Error> {
        let n = self.i16()?;
        if n < 0 {
            return Err(ErrorKind::BadHeader.into());
        }
        Ok(n as usize)
    }
}

// ------------------------------------------------------------------------------------------------

/// A decoded terminfo entry.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct TermInfo {
    names: Vec<String>,
    booleans: Vec<bool>,
    numbers: Vec<Option<i32>>,
    strings: Vec<Option<Vec<u8>>>,
}

impl TermInfo {
    /// Decode a compiled terminfo entry.
    pub fn parse(bytes: &[u8]) -> Result<Self, Error> {
        let mut reader = Reader::new(bytes);

        let wide = match reader.i16()? {
            MAGIC_LEGACY => false,
            MAGIC_32BIT => true,
            _ => return Err(ErrorKind::BadMagic.into()),
        };
        let names_size = reader.count()?;
        let boolean_count = reader.count()?;
        let number_count = reader.count()?;
        let string_count = reader.count()?;
        let table_size = reader.count()?;

        let names = reader.take(names_size)?;
        let names = names.split(|b| *b == 0).next().unwrap_or(names);
        let names = String::from_utf8_lossy(names)
            .split('|')
            .map(str::to_string)
            .collect();

        let booleans = reader
            .take(boolean_count)?
            .iter()
            .map(|b| *b == 1)
            .collect();
        reader.align()?;

        let mut numbers = Vec::with_capacity(number_count);
        for _ in 0..number_count {
            let n = if wide {
                reader.i32()?
            } else {
                reader.i16()? as i32
            };
            // -1 means absent and -2 means cancelled.
            numbers.push(if n < 0 { None } else { Some(n) });
        }

        let mut offsets = Vec::with_capacity(string_count);
        for _ in 0..string_count {
            offsets.push(reader.i16()?);
        }

        let table = reader.take(table_size)?;
        let mut strings = Vec::with_capacity(string_count);
        for offset in offsets {
            if offset < 0 {
                strings.push(None);
                continue;
            }

            let tail = table
                .get(offset as usize..)
                .filter(|t| !t.is_empty())
                .ok_or(ErrorKind::BadStringOffset)?;
            let end = tail
                .iter()
                .position(|b| *b == 0)
                .ok_or(ErrorKind::BadStringOffset)?;
            strings.push(Some(tail[..end].to_vec()));
        }

        Ok(Self {
            names,
            booleans,
            numbers,
            strings,
        })
    }

    /// Read and decode the compiled terminfo entry at the given path.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let bytes = std::fs::read(path)?;
        Self::parse(&bytes)
    }

    /// Locate, read, and decode the entry for the terminal name.
    pub fn load(term: &str, dirs: &[PathBuf]) -> Result<Self, Error> {
        let path = locate(term, dirs)?;
        tracing::debug!(term, path = %path.display(), "loading terminfo entry");
        Self::from_path(path)
    }

    /// Get the entry's names. The last name usually is a description.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Get the entry's primary name.
    pub fn name(&self) -> Option<&str> {
        self.names.first().map(String::as_str)
    }

    /// Get the boolean capability with the given index.
    pub fn boolean(&self, index: usize) -> bool {
        self.booleans.get(index).copied().unwrap_or(false)
    }

    /// Get the number capability with the given index.
    pub fn number(&self, index: usize) -> Option<i32> {
        self.numbers.get(index).copied().flatten()
    }

    /// Get the string capability with the given index.
    pub fn string(&self, index: usize) -> Option<&[u8]> {
        self.strings.get(index).and_then(|s| s.as_deref())
    }

    /// Get the number of colors.
    pub fn colors(&self) -> Option<i32> {
        self.number(COLORS)
    }

    /// Get the capability turning on bold.
    pub fn bold(&self) -> Option<&[u8]> {
        self.string(BOLD)
    }

    /// Get the capability turning off all attributes.
    pub fn sgr0(&self) -> Option<&[u8]> {
        self.string(SGR0)
    }

    /// Get the parameterized capability setting the foreground color.
    pub fn setaf(&self) -> Option<&[u8]> {
        self.string(SETAF)
    }

    /// Get the parameterized capability setting the background color.
    pub fn setab(&self) -> Option<&[u8]> {
        self.string(SETAB)
    }
}

impl std::fmt::Debug for TermInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut debugger = f.debug_struct("TermInfo");
        debugger
            .field("name", &self.name())
            .field("colors", &self.colors());
        for (label, value) in [
            ("bold", self.bold()),
            ("sgr0", self.sgr0()),
            ("setaf", self.setaf()),
            ("setab", self.setab()),
        ] {
            if let Some(value) = value {
                debugger.field(label, &nicely_str(value));
            }
        }
        debugger.finish_non_exhaustive()
    }
}

/// Locate the compiled entry for the terminal name.
///
/// For every directory in order, this function probes both the
/// subdirectory named by the first character of the terminal name and the
/// subdirectory named by that character's hexadecimal code. The latter is
/// the layout used on case-insensitive file systems.
pub fn locate(term: &str, dirs: &[PathBuf]) -> Result<PathBuf, Error> {
    let Some(first) = term.chars().next() else {
        return Err(ErrorKind::NoEntry.into());
    };
    if term.contains('/') || term.starts_with('.') {
        return Err(ErrorKind::NoEntry.into());
    }

    let hex = format!("{:x}", first as u32);
    let mut buffer = [0; 4];
    let letter: &str = first.encode_utf8(&mut buffer);

    for dir in dirs {
        for subdir in [letter, hex.as_str()] {
            let path = dir.join(subdir).join(term);
            if path.is_file() {
                return Ok(path);
            }
        }
    }

    Err(ErrorKind::NoEntry.into())
}

// ================================================================================================

/// The state of expanding a parameterized string.
struct Expander<'a> {
    input: &'a [u8],
    index: usize,
    params: [i32; 9],
    stack: Vec<i32>,
    dynamic: [i32; 26],
    fixed: [i32; 26],
    output: Vec<u8>,
}

impl Expander<'_> {
    fn peek(&self) -> Option<u8> {
        self.input.get(self.index).copied()
    }

    fn next(&mut self) -> Result<u8, Error> {
        let byte = self.peek().ok_or(ErrorKind::Unterminated)?;
        self.index += 1;
        Ok(byte)
    }

    fn pop(&mut self) -> Result<i32, Error> {
        self.stack
            .pop()
            .ok_or_else(|| ErrorKind::StackUnderflow.into())
    }

    fn variable(&mut self, name: u8) -> Result<&mut i32, Error> {
        match name {
            b'a'..=b'z' => Ok(&mut self.dynamic[(name - b'a') as usize]),
            b'A'..=b'Z' => Ok(&mut self.fixed[(name - b'A') as usize]),
            _ => Err(ErrorKind::UnknownOperator.into()),
        }
    }

    fn run(mut self) -> Result<Vec<u8>, Error> {
        while let Some(byte) = self.peek() {
            self.index += 1;
            if byte == b'%' {
                self.operator()?;
            } else {
                self.output.push(byte);
            }
        }
        Ok(self.output)
    }

    fn operator(&mut self) -> Result<(), Error> {
        let op = self.next()?;
        match op {
            b'%' => self.output.push(b'%'),
            b'c' => {
                let value = self.pop()?;
                self.output.push(value as u8);
            }
            b'p' => {
                let digit = self.next()?;
                if !(b'1'..=b'9').contains(&digit) {
                    return Err(ErrorKind::BadParameter.into());
                }
                self.stack.push(self.params[(digit - b'1') as usize]);
            }
            b'P' => {
                let name = self.next()?;
                let value = self.pop()?;
                *self.variable(name)? = value;
            }
            b'g' => {
                let name = self.next()?;
                let value = *self.variable(name)?;
                self.stack.push(value);
            }
            b'\'' => {
                let value = self.next()?;
                if self.next()? != b'\'' {
                    return Err(ErrorKind::Unterminated.into());
                }
                self.stack.push(value as i32);
            }
            b'{' => {
                let start = self.index;
                while self.next()? != b'}' {}
                let value = Radix::Decimal
                    .parse_i32(&self.input[start..self.index - 1])
                    .ok_or(ErrorKind::BadParameter)?;
                self.stack.push(value);
            }
            b'l' => {
                let value = self.pop()?;
                self.stack.push(value.to_string().len() as i32);
            }
            b'+' | b'-' | b'*' | b'/' | b'm' | b'&' | b'|' | b'^' | b'=' | b'>' | b'<' | b'A'
            | b'O' => {
                let rhs = self.pop()?;
                let lhs = self.pop()?;
                let value = match op {
                    b'+' => lhs.wrapping_add(rhs),
                    b'-' => lhs.wrapping_sub(rhs),
                    b'*' => lhs.wrapping_mul(rhs),
                    b'/' | b'm' if rhs == 0 => return Err(ErrorKind::DivisionByZero.into()),
                    b'/' => lhs.wrapping_div(rhs),
                    b'm' => lhs.wrapping_rem(rhs),
                    b'&' => lhs & rhs,
                    b'|' => lhs | rhs,
                    b'^' => lhs ^ rhs,
                    b'=' => (lhs == rhs) as i32,
                    b'>' => (lhs > rhs) as i32,
                    b'<' => (lhs < rhs) as i32,
                    b'A' => (lhs != 0 && rhs != 0) as i32,
                    _ => (lhs != 0 || rhs != 0) as i32,
                };
                self.stack.push(value);
            }
            b'!' => {
                let value = self.pop()?;
                self.stack.push((value == 0) as i32);
            }
            b'~' => {
                let value = self.pop()?;
                self.stack.push(!value);
            }
            b'i' => {
                self.params[0] = self.params[0].wrapping_add(1);
                self.params[1] = self.params[1].wrapping_add(1);
            }
            b'?' | b';' => (),
            b't' => {
                if self.pop()? == 0 {
                    self.skip(true)?;
                }
            }
            b'e' => self.skip(false)?,
            _ => {
                self.index -= 1;
                self.format()?;
            }
        }

        Ok(())
    }

    /// Skip to the end of the current branch. With `to_else`, stop after a
    /// `%e` on the same nesting level, too.
    fn skip(&mut self, to_else: bool) -> Result<(), Error> {
        let mut depth = 0_usize;
        loop {
            if self.next()? != b'%' {
                continue;
            }

            match self.next()? {
                b'?' => depth += 1,
                b';' if depth == 0 => return Ok(()),
                b';' => depth -= 1,
                b'e' if depth == 0 && to_else => return Ok(()),
                b'\'' => {
                    self.next()?;
                    self.next()?;
                }
                _ => (),
            }
        }
    }

    /// Format the top of the stack per `%[[:]flags][width[.precision]][doxXs]`.
    fn format(&mut self) -> Result<(), Error> {
        if self.peek() == Some(b':') {
            self.index += 1;
        }

        let (mut left, mut plus, mut space, mut alternate, mut zero) =
            (false, false, false, false, false);
        loop {
            match self.peek() {
                Some(b'-') => left = true,
                Some(b'+') => plus = true,
                Some(b' ') => space = true,
                Some(b'#') => alternate = true,
                Some(b'0') => zero = true,
                _ => break,
            }
            self.index += 1;
        }

        let width = self.digits();
        let precision = if self.peek() == Some(b'.') {
            self.index += 1;
            Some(self.digits())
        } else {
            None
        };

        let conversion = self.next()?;
        let value = self.pop()?;
        let (sign, mut body) = match conversion {
            b'd' | b's' => {
                let sign = if value < 0 {
                    "-"
                } else if plus && conversion == b'd' {
                    "+"
                } else if space && conversion == b'd' {
                    " "
                } else {
                    ""
                };
                (sign, value.unsigned_abs().to_string())
            }
            b'o' => ("", format!("{:o}", value)),
            b'x' => ("", format!("{:x}", value)),
            b'X' => ("", format!("{:X}", value)),
            _ => return Err(ErrorKind::UnknownOperator.into()),
        };

        if let Some(precision) = precision {
            while body.len() < precision {
                body.insert(0, '0');
            }
        }

        let prefix = match conversion {
            b'o' if alternate && !body.starts_with('0') => "0",
            b'x' if alternate && value != 0 => "0x",
            b'X' if alternate && value != 0 => "0X",
            _ => sign,
        };

        let length = prefix.len() + body.len();
        let padding = width.saturating_sub(length);
        if left {
            self.output.extend_from_slice(prefix.as_bytes());
            self.output.extend_from_slice(body.as_bytes());
            self.output.extend(std::iter::repeat(b' ').take(padding));
        } else if zero && precision.is_none() {
            self.output.extend_from_slice(prefix.as_bytes());
            self.output.extend(std::iter::repeat(b'0').take(padding));
            self.output.extend_from_slice(body.as_bytes());
        } else {
            self.output.extend(std::iter::repeat(b' ').take(padding));
            self.output.extend_from_slice(prefix.as_bytes());
            self.output.extend_from_slice(body.as_bytes());
        }

        Ok(())
    }

    fn digits(&mut self) -> usize {
        let start = self.index;
        while self.peek().is_some_and(|b| b.is_ascii_digit()) {
            self.index += 1;
        }
        Radix::Decimal
            .parse(&self.input[start..self.index])
            .unwrap_or(0) as usize
    }
}

/// Expand a parameterized capability string.
///
/// This function supports the full operator set of terminfo parameterized
/// strings, with integers as the only values. Up to nine parameters may be
/// given; missing parameters are zero. Static and dynamic variables start
/// out as zero with every invocation.
pub fn tparm(capability: &[u8], params: &[i32]) -> Result<Vec<u8>, Error> {
    if 9 < params.len() {
        return Err(ErrorKind::BadParameter.into());
    }

    let mut all = [0; 9];
    all[..params.len()].copy_from_slice(params);

    Expander {
        input: capability,
        index: 0,
        params: all,
        stack: Vec::new(),
        dynamic: [0; 26],
        fixed: [0; 26],
        output: Vec::with_capacity(capability.len() + 8),
    }
    .run()
}

#[cfg(test)]
mod test {
    use super::*;

    /// Build a compiled entry with the given names, numbers, and strings.
    fn entry(
        wide: bool,
        names: &str,
        numbers: &[(usize, i32)],
        strings: &[(usize, &[u8])],
    ) -> Vec<u8> {
        let number_count = numbers.iter().map(|(i, _)| i + 1).max().unwrap_or(0);
        let string_count = strings.iter().map(|(i, _)| i + 1).max().unwrap_or(0);

        let mut table = Vec::new();
        let mut offsets = vec![-1_i16; string_count];
        for (index, value) in strings {
            offsets[*index] = table.len() as i16;
            table.extend_from_slice(value);
            table.push(0);
        }

        let boolean_count = 3;
        let mut bytes = Vec::new();
        let magic = if wide { MAGIC_32BIT } else { MAGIC_LEGACY };
        for n in [
            magic,
            names.len() as i16 + 1,
            boolean_count,
            number_count as i16,
            string_count as i16,
            table.len() as i16,
        ] {
            bytes.extend_from_slice(&n.to_le_bytes());
        }

        bytes.extend_from_slice(names.as_bytes());
        bytes.push(0);
        bytes.extend_from_slice(&[1, 0, 1]);
        if bytes.len() % 2 == 1 {
            bytes.push(0);
        }

        let mut all = vec![-1; number_count];
        for (index, value) in numbers {
            all[*index] = *value;
        }
        for n in all {
            if wide {
                bytes.extend_from_slice(&n.to_le_bytes());
            } else {
                bytes.extend_from_slice(&(n as i16).to_le_bytes());
            }
        }

        for offset in offsets {
            bytes.extend_from_slice(&offset.to_le_bytes());
        }
        bytes.extend_from_slice(&table);
        bytes
    }

    const XTERM_SETAF: &[u8] = b"\x1b[%?%p1%{8}%<%t3%p1%d%e%p1%{16}%<%t9%p1%{8}%-%d%e38;5;%p1%d%;m";
    const XTERM_SETAB: &[u8] = b"\x1b[%?%p1%{8}%<%t4%p1%d%e%p1%{16}%<%t10%p1%{8}%-%d%e48;5;%p1%d%;m";

    fn xterm(wide: bool, colors: i32) -> Vec<u8> {
        entry(
            wide,
            "xterm-256color|xterm with 256 colors",
            &[(0, 80), (COLORS, colors)],
            &[
                (BOLD, b"\x1b[1m"),
                (SGR0, b"\x1b(B\x1b[m"),
                (SETAF, XTERM_SETAF),
                (SETAB, XTERM_SETAB),
            ],
        )
    }

    #[test]
    fn test_parse() -> Result<(), Error> {
        for wide in [false, true] {
            let info = TermInfo::parse(&xterm(wide, 256))?;
            assert_eq!(info.name(), Some("xterm-256color"));
            assert_eq!(info.names().len(), 2);
            assert!(info.boolean(0));
            assert!(!info.boolean(1));
            assert!(!info.boolean(99));
            assert_eq!(info.number(0), Some(80));
            assert_eq!(info.number(1), None);
            assert_eq!(info.colors(), Some(256));
            assert_eq!(info.bold(), Some(b"\x1b[1m".as_slice()));
            assert_eq!(info.sgr0(), Some(b"\x1b(B\x1b[m".as_slice()));
            assert_eq!(info.setaf(), Some(XTERM_SETAF));
            assert_eq!(info.setab(), Some(XTERM_SETAB));
            assert_eq!(info.string(0), None);
        }

        // 32-bit numbers exceed the 16-bit range.
        let info = TermInfo::parse(&xterm(true, 0x100_0000))?;
        assert_eq!(info.colors(), Some(0x100_0000));
        Ok(())
    }

    #[test]
    fn test_parse_errors() {
        let bytes = xterm(false, 256);

        let mut bad = bytes.clone();
        bad[0] = 0;
        assert_eq!(TermInfo::parse(&bad).unwrap_err().kind(), ErrorKind::BadMagic);

        let truncated = &bytes[..bytes.len() - 4];
        assert_eq!(TermInfo::parse(truncated).unwrap_err().kind(), ErrorKind::Truncated);

        let mut negative = bytes.clone();
        negative[4] = 0xff;
        negative[5] = 0xff;
        assert_eq!(TermInfo::parse(&negative).unwrap_err().kind(), ErrorKind::BadHeader);

        let offset = entry(false, "x", &[], &[(0, b"a")]);
        let mut dangling = offset.clone();
        let at = dangling.len() - 4;
        dangling[at] = 9;
        assert_eq!(TermInfo::parse(&dangling).unwrap_err().kind(), ErrorKind::BadStringOffset);

        assert_eq!(TermInfo::parse(&[]).unwrap_err().kind(), ErrorKind::Truncated);
    }

    #[test]
    fn test_debug() -> Result<(), Error> {
        let info = TermInfo::parse(&xterm(false, 256))?;
        let debug = format!("{:?}", info);
        assert!(debug.starts_with("TermInfo { name: Some(\"xterm-256color\"), colors: Some(256)"));
        assert!(debug.contains("bold: \"‹𝖾𝗌𝖼›[1m\""));
        Ok(())
    }

    #[test]
    fn test_locate() -> Result<(), Error> {
        let root = std::env::temp_dir().join(format!("cmdtty-terminfo-{}", std::process::id()));
        let letter = root.join("a").join("x");
        let hex = root.join("b").join("78");
        std::fs::create_dir_all(&letter)?;
        std::fs::create_dir_all(&hex)?;
        std::fs::write(hex.join("xterm-256color"), xterm(false, 256))?;
        std::fs::write(letter.join("xterm"), xterm(false, 8))?;

        let dirs = [root.join("missing"), root.join("a"), root.join("b")];
        assert_eq!(locate("xterm", &dirs)?, letter.join("xterm"));
        assert_eq!(locate("xterm-256color", &dirs)?, hex.join("xterm-256color"));
        assert_eq!(locate("vt100", &dirs).unwrap_err().kind(), ErrorKind::NoEntry);
        assert_eq!(locate("", &dirs).unwrap_err().kind(), ErrorKind::NoEntry);
        assert_eq!(locate("../x", &dirs).unwrap_err().kind(), ErrorKind::NoEntry);

        let info = TermInfo::load("xterm", &dirs)?;
        assert_eq!(info.colors(), Some(8));

        std::fs::remove_dir_all(&root)?;
        Ok(())
    }

    #[test]
    fn test_tparm_colors() -> Result<(), Error> {
        assert_eq!(tparm(XTERM_SETAF, &[1])?, b"\x1b[31m");
        assert_eq!(tparm(XTERM_SETAF, &[9])?, b"\x1b[91m");
        assert_eq!(tparm(XTERM_SETAF, &[196])?, b"\x1b[38;5;196m");
        assert_eq!(tparm(XTERM_SETAB, &[0])?, b"\x1b[40m");
        assert_eq!(tparm(XTERM_SETAB, &[15])?, b"\x1b[107m");
        assert_eq!(tparm(XTERM_SETAB, &[16])?, b"\x1b[48;5;16m");

        // The 8-color xterm entry.
        assert_eq!(tparm(b"\x1b[3%p1%dm", &[6])?, b"\x1b[36m");
        Ok(())
    }

    #[test]
    fn test_tparm_operators() -> Result<(), Error> {
        assert_eq!(tparm(b"%p1%p2%+%d", &[3, 4])?, b"7");
        assert_eq!(tparm(b"%p1%p2%-%d", &[3, 4])?, b"-1");
        assert_eq!(tparm(b"%p1%p2%*%d %p1%p2%/%d %p1%p2%m%d", &[7, 2])?, b"14 3 1");
        assert_eq!(tparm(b"%p1%p2%&%d %p1%p2%|%d %p1%p2%^%d", &[6, 3])?, b"2 7 5");
        assert_eq!(tparm(b"%p1%!%d %p1%~%d", &[0])?, b"1 -1");
        assert_eq!(tparm(b"%p1%p2%A%d%p1%p2%O%d", &[1, 0])?, b"01");
        assert_eq!(tparm(b"%i%p1%d;%p2%d", &[0, 9])?, b"1;10");
        assert_eq!(tparm(b"%'A'%c%%", &[])?, b"A%");
        assert_eq!(tparm(b"%p1%Pa%p2%PZ%gZ%d%ga%d", &[5, 6])?, b"65");
        assert_eq!(tparm(b"%{1234}%l%d", &[])?, b"4");
        assert_eq!(tparm(b"%p1%s", &[42])?, b"42");
        Ok(())
    }

    #[test]
    fn test_tparm_formats() -> Result<(), Error> {
        assert_eq!(tparm(b"%p1%3d|%p1%:-3d|%p1%03d", &[7])?, b"  7|7  |007");
        assert_eq!(tparm(b"%p1%.3d|%p1%:+d|%p1% d", &[5])?, b"005|+5| 5");
        assert_eq!(tparm(b"%p1%:-4d|", &[-3])?, b"-3  |");
        assert_eq!(tparm(b"%p1%x %p1%X %p1%#x", &[255])?, b"ff FF 0xff");
        assert_eq!(tparm(b"%p1%o %p1%#o", &[8])?, b"10 010");
        Ok(())
    }

    #[test]
    fn test_tparm_conditionals() -> Result<(), Error> {
        let nested = b"%?%p1%t%?%p2%tA%eB%;%eC%;";
        assert_eq!(tparm(nested, &[1, 1])?, b"A");
        assert_eq!(tparm(nested, &[1, 0])?, b"B");
        assert_eq!(tparm(nested, &[0, 1])?, b"C");

        let chain = b"%?%p1%{1}%=%tone%e%p1%{2}%=%ttwo%eother%;!";
        assert_eq!(tparm(chain, &[1])?, b"one!");
        assert_eq!(tparm(chain, &[2])?, b"two!");
        assert_eq!(tparm(chain, &[3])?, b"other!");

        assert_eq!(tparm(b"%?%p1%t%'%'%;x", &[0])?, b"x");
        Ok(())
    }

    #[test]
    fn test_tparm_errors() {
        let kind = |s: &[u8], p: &[i32]| tparm(s, p).unwrap_err().kind();
        assert_eq!(kind(b"%d", &[]), ErrorKind::StackUnderflow);
        assert_eq!(kind(b"%p0", &[]), ErrorKind::BadParameter);
        assert_eq!(kind(b"%p1", &[0; 10]), ErrorKind::BadParameter);
        assert_eq!(kind(b"%{12", &[]), ErrorKind::Unterminated);
        assert_eq!(kind(b"%{x}", &[]), ErrorKind::BadParameter);
        assert_eq!(kind(b"%?%p1%tx", &[0]), ErrorKind::Unterminated);
        assert_eq!(kind(b"%p1%{0}%/", &[1]), ErrorKind::DivisionByZero);
        assert_eq!(kind(b"%p1%y", &[1]), ErrorKind::UnknownOperator);
        assert_eq!(kind(b"%", &[]), ErrorKind::Unterminated);
    }
}
