use std::io::Result;
use std::os::fd::RawFd;

use crate::{Console, Stream};

fn raw_handle(stream: Stream) -> RawFd {
    match stream {
        Stream::Stdout => libc::STDOUT_FILENO,
        Stream::Stderr => libc::STDERR_FILENO,
    }
}

/// Determine whether the stream is connected to a terminal.
pub(crate) fn is_terminal(stream: Stream) -> bool {
    // SAFETY: isatty only inspects the file descriptor and never writes
    // through a pointer.
    unsafe { libc::isatty(raw_handle(stream)) == 1 }
}

/// Unix terminals are driven by escape sequences only, there is no console
/// API to open.
pub(crate) fn open_console(_: Stream) -> Result<Option<Box<dyn Console>>> {
    Ok(None)
}

#[cfg(test)]
mod test {
    use super::raw_handle;
    use crate::Stream;

    #[test]
    fn test_raw_handle() {
        assert_eq!(raw_handle(Stream::Stdout), 1);
        assert_eq!(raw_handle(Stream::Stderr), 2);
    }
}
