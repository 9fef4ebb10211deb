use std::io::{stderr, stdout, ErrorKind, IsTerminal, Result};
use std::ptr::{from_mut, null};

use windows_sys::Win32::Foundation::{HANDLE, INVALID_HANDLE_VALUE};
use windows_sys::Win32::System::Console as WinConsole;
use windows_sys::Win32::System::Console::{
    CONSOLE_MODE as ConsoleMode, CONSOLE_SCREEN_BUFFER_INFO as ScreenBufferInfo,
};

use super::into_result::IntoResult;
use crate::{Console, Stream};

/// Determine whether the stream is connected to a terminal.
pub(crate) fn is_terminal(stream: Stream) -> bool {
    match stream {
        Stream::Stdout => stdout().is_terminal(),
        Stream::Stderr => stderr().is_terminal(),
    }
}

/// Open the legacy console for the stream.
pub(crate) fn open_console(stream: Stream) -> Result<Option<Box<dyn Console>>> {
    let id = match stream {
        Stream::Stdout => WinConsole::STD_OUTPUT_HANDLE,
        Stream::Stderr => WinConsole::STD_ERROR_HANDLE,
    };

    // SAFETY: GetStdHandle takes no pointers.
    let handle = unsafe { WinConsole::GetStdHandle(id) };
    if handle == INVALID_HANDLE_VALUE {
        return Err(std::io::Error::last_os_error());
    } else if handle.is_null() {
        // The process has no such standard handle.
        return Err(ErrorKind::NotFound.into());
    }

    Ok(Some(Box::new(RawConsole { handle })))
}

// ----------------------------------------------------------------------------------------------------------

/// A standard handle attached to the legacy console.
#[derive(Debug)]
pub(crate) struct RawConsole {
    handle: HANDLE,
}

// SAFETY: Windows HANDLE is defined as a *mut c_void but standard handles are
// process-wide and thread-safe. Rust's standard library [implements `Send` and
// `Sync`](https://github.com/rust-lang/rust/blob/8e37e151835d96d6a7415e93e6876561485a3354/library/std/src/os/windows/io/handle.rs#L111)
// for wrapped handles, too.
unsafe impl Send for RawConsole {}

impl RawConsole {
    fn mode(&self) -> Result<ConsoleMode> {
        let mut mode = 0;
        // SAFETY: mode is a valid, exclusively borrowed u32.
        unsafe { WinConsole::GetConsoleMode(self.handle, from_mut(&mut mode)) }.into_result()?;
        Ok(mode)
    }
}

impl Console for RawConsole {
    fn attributes(&self) -> Result<u16> {
        let mut info = std::mem::MaybeUninit::<ScreenBufferInfo>::uninit();
        // SAFETY: The call fully initializes info if it succeeds.
        unsafe { WinConsole::GetConsoleScreenBufferInfo(self.handle, info.as_mut_ptr()) }
            .into_result()?;
        // SAFETY: The call succeeded.
        let info = unsafe { info.assume_init() };
        Ok(info.wAttributes)
    }

    fn set_attributes(&mut self, attributes: u16) -> Result<()> {
        // SAFETY: SetConsoleTextAttribute takes no pointers.
        unsafe { WinConsole::SetConsoleTextAttribute(self.handle, attributes) }.into_result()?;
        Ok(())
    }

    fn enable_virtual_terminal(&mut self) -> Result<()> {
        let mode = self.mode()?
            | WinConsole::ENABLE_PROCESSED_OUTPUT
            | WinConsole::ENABLE_VIRTUAL_TERMINAL_PROCESSING;
        // SAFETY: SetConsoleMode takes no pointers.
        unsafe { WinConsole::SetConsoleMode(self.handle, mode) }.into_result()?;
        Ok(())
    }

    fn write_text(&mut self, text: &str) -> Result<()> {
        // WriteConsoleW counts UTF-16 code units, so characters beyond U+FFFF
        // count twice.
        let wide: Vec<u16> = text.encode_utf16().collect();
        let mut remaining = wide.as_slice();

        while !remaining.is_empty() {
            let mut did_write: u32 = 0;
            // SAFETY: The buffer pointer and length describe a live slice, and
            // did_write is a valid, exclusively borrowed u32.
            unsafe {
                WinConsole::WriteConsoleW(
                    self.handle,
                    remaining.as_ptr(),
                    remaining.len() as u32,
                    from_mut(&mut did_write),
                    null(),
                )
            }
            .into_result()?;

            if did_write == 0 {
                return Err(ErrorKind::WriteZero.into());
            }
            remaining = &remaining[(did_write as usize).min(remaining.len())..];
        }

        Ok(())
    }
}
