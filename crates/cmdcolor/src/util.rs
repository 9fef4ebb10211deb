use std::path::PathBuf;

/// A trait to abstract over environment variable access.
///
/// The standard library is a bit spartan when it comes to environment variable
/// access. So this trait makes up for it yet still keeps things simple by only
/// requiring the implementation of one method.
pub(crate) trait Environment {
    /// Try reading the environment variable as an OS string.
    fn read_os(&self, key: &str) -> Option<std::ffi::OsString>;

    /// Try reading the environment variable as a string.
    fn read(&self, key: &str) -> Result<String, std::env::VarError> {
        self.read_os(key).map_or_else(
            || Err(std::env::VarError::NotPresent),
            |s| s.into_string().map_err(std::env::VarError::NotUnicode),
        )
    }
}

#[derive(Debug, Default)]
pub(crate) struct Env();

impl Environment for Env {
    fn read_os(&self, key: &str) -> Option<std::ffi::OsString> {
        std::env::var_os(key)
    }
}

/// The directories searched when `TERMINFO_DIRS` says nothing else.
const SYSTEM_TERMINFO_DIRS: [&str; 3] = ["/etc/terminfo", "/lib/terminfo", "/usr/share/terminfo"];

/// Determine the directories holding compiled terminfo entries.
///
/// The search order follows ncurses: `TERMINFO`, then `~/.terminfo`, then
/// the entries of `TERMINFO_DIRS`. An empty entry of the latter stands for
/// the system directories, which are also searched when the variable is
/// undefined.
pub(crate) fn terminfo_dirs<E: Environment>(env: &E) -> Vec<PathBuf> {
    let mut dirs = Vec::new();

    if let Some(dir) = env.read_os("TERMINFO").filter(|d| !d.is_empty()) {
        dirs.push(PathBuf::from(dir));
    }
    if let Some(home) = env.read_os("HOME").filter(|h| !h.is_empty()) {
        dirs.push(PathBuf::from(home).join(".terminfo"));
    }

    let system = || SYSTEM_TERMINFO_DIRS.iter().map(PathBuf::from);
    match env.read_os("TERMINFO_DIRS") {
        Some(list) => {
            for dir in std::env::split_paths(&list) {
                if dir.as_os_str().is_empty() {
                    dirs.extend(system());
                } else {
                    dirs.push(dir);
                }
            }
        }
        None => dirs.extend(system()),
    }

    dirs
}


#[cfg(test)]
pub(crate) use test::FakeEnv;
