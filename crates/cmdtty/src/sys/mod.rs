#[cfg(target_family = "windows")]
mod into_result;
#[cfg(target_family = "unix")]
mod unix;
#[cfg(target_family = "windows")]
mod windows;

#[cfg(target_family = "unix")]
pub(crate) use self::unix::{is_terminal, open_console};
#[cfg(target_family = "windows")]
pub(crate) use self::windows::{is_terminal, open_console};

#[cfg(not(any(target_family = "unix", target_family = "windows")))]
pub(crate) fn is_terminal(_: crate::Stream) -> bool {
    false
}

#[cfg(not(any(target_family = "unix", target_family = "windows")))]
pub(crate) fn open_console(
    _: crate::Stream,
) -> std::io::Result<Option<Box<dyn crate::Console>>> {
    Ok(None)
}
