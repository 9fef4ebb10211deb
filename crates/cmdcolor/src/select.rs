//! Binding output streams to backends.
//!
//! A [`Terminal`] owns the color policy and, for each output stream, the
//! backend rendering colors to that stream. It binds a stream on first use by
//! asking a [`Probe`] about the platform:
//!
//!  1. Once [`ColorPolicy::ForceAnsi`] has been selected, every stream uses
//!     ANSI escape sequences.
//!  2. If the stream has a native console, it uses the console. Should
//!     querying the console fail, the stream cannot use color at all.
//!  3. If the terminal has a terminfo entry with at least eight colors, the
//!     stream uses the entry's capabilities.
//!  4. Otherwise, the stream uses ANSI escape sequences.
//!
//! Bindings are cached for the lifetime of the terminal. A terminal is not
//! thread-safe by itself; the process-wide instance returned by
//! [`Terminal::global`] is protected by a mutex.

use std::io::Result;
use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError};

use cmdtty::terminfo::TermInfo;
use cmdtty::{Console, Stream};

use crate::backend::{AnsiBackend, Backend, ConsoleBackend, CursesBackend, NullBackend};
use crate::error::ConfigurationError;
use crate::util::{terminfo_dirs, Env, Environment};
use crate::ColorPolicy;

/// A source of information about the platform's output streams.
///
/// This trait is object-safe.
pub trait Probe: std::fmt::Debug + Send {
    /// Determine whether the stream is connected to a terminal.
    fn is_terminal(&self, stream: Stream) -> bool;

    /// Open the stream's native console.
    ///
    /// This method returns `Ok(None)` if the platform has no native console.
    fn console(&self, stream: Stream) -> Result<Option<Box<dyn Console>>>;

    /// Get the terminfo entry for the current terminal.
    fn terminfo(&self) -> Option<&TermInfo>;
}

/// A probe for the actual platform.
///
/// The terminfo entry is located through the `TERM`, `TERMINFO`,
/// `TERMINFO_DIRS`, and `HOME` environment variables. It is loaded at most
/// once.
#[derive(Debug, Default)]
pub struct SystemProbe {
    terminfo: OnceLock<Option<TermInfo>>,
}

impl SystemProbe {
    /// Create a new system probe.
    pub fn new() -> Self {
        Self::default()
    }
}

fn load_terminfo<E: Environment>(env: &E) -> Option<TermInfo> {
    let term = match env.read("TERM") {
        Ok(term) if !term.is_empty() => term,
        _ => {
            tracing::debug!("TERM is undefined, not loading terminfo");
            return None;
        }
    };

    match TermInfo::load(&term, &terminfo_dirs(env)) {
        Ok(info) => Some(info),
        Err(error) => {
            tracing::debug!(%term, %error, "could not load terminfo entry");
            None
        }
    }
}

impl Probe for SystemProbe {
    fn is_terminal(&self, stream: Stream) -> bool {
        stream.is_terminal()
    }

    fn console(&self, stream: Stream) -> Result<Option<Box<dyn Console>>> {
        cmdtty::console::open(stream)
    }

    fn terminfo(&self) -> Option<&TermInfo> {
        self.terminfo
            .get_or_init(|| load_terminfo(&Env::default()))
            .as_ref()
    }
}

// ------------------------------------------------------------------------------------------------

/// A stream's backend and whether the stream is a terminal.
#[derive(Debug)]
struct Binding {
    backend: Box<dyn Backend>,
    is_terminal: bool,
}

/// The context for colored output.
///
/// A terminal combines a color policy with one backend per output stream.
///
/// ```
/// # use cmdcolor::{ColorPolicy, Stream, Terminal};
/// let mut terminal = Terminal::new();
/// terminal.set_policy(ColorPolicy::ForceAnsi);
/// assert_eq!(terminal.backend_name(Stream::Stdout), "ANSI");
/// assert_eq!(terminal.color_count(Stream::Stdout), 16_777_216);
/// assert!(terminal.will_use_color(Stream::Stdout));
/// ```
#[derive(Debug)]
pub struct Terminal {
    probe: Box<dyn Probe>,
    policy: ColorPolicy,
    forced_ansi: bool,
    bindings: [Option<Binding>; 2],
}

fn slot(stream: Stream) -> usize {
    match stream {
        Stream::Stdout => 0,
        Stream::Stderr => 1,
    }
}

/// Determine the backend for the stream.
fn bind(probe: &dyn Probe, forced_ansi: bool, stream: Stream) -> Binding {
    let is_terminal = probe.is_terminal(stream);
    let backend: Box<dyn Backend> = if forced_ansi {
        Box::new(AnsiBackend::new())
    } else {
        match probe.console(stream) {
            Ok(Some(console)) => match ConsoleBackend::new(console) {
                Ok(backend) => Box::new(backend),
                Err(error) => {
                    tracing::warn!(%stream, %error, "could not query console attributes");
                    Box::new(NullBackend::default())
                }
            },
            Ok(None) => match probe.terminfo() {
                Some(info) => match CursesBackend::new(info) {
                    Some(backend) => Box::new(backend),
                    None => {
                        tracing::debug!(?info, "terminfo entry unsuitable for color");
                        Box::new(AnsiBackend::new())
                    }
                },
                None => Box::new(AnsiBackend::new()),
            },
            Err(error) => {
                tracing::warn!(%stream, %error, "could not open console");
                Box::new(NullBackend::default())
            }
        }
    };

    tracing::debug!(
        %stream,
        backend = backend.name(),
        colors = backend.color_count(),
        usable = backend.can_use(),
        is_terminal,
        "bound output stream"
    );

    Binding {
        backend,
        is_terminal,
    }
}

impl Default for Terminal {
    fn default() -> Self {
        Self::new()
    }
}

impl Terminal {
    /// Create a new terminal probing the actual platform.
    pub fn new() -> Self {
        Self::with_probe(SystemProbe::new())
    }

    /// Create a new terminal using the given probe.
    pub fn with_probe<P: Probe + 'static>(probe: P) -> Self {
        Self {
            probe: Box::new(probe),
            policy: ColorPolicy::default(),
            forced_ansi: false,
            bindings: [None, None],
        }
    }

    /// Get the process-wide terminal.
    ///
    /// The terminal is created on first access and lives as long as the
    /// process. Since it is shared, callers should hold on to the guard only
    /// for as long as they write output.
    ///
    /// The mutex is not reentrant. While a thread holds the guard, calling
    /// this method again or calling the free [`printc`](crate::printc)
    /// function on the same thread deadlocks. Print through the guard
    /// instead:
    ///
    /// ```
    /// # use cmdcolor::{args, Options, Terminal};
    /// let mut terminal = Terminal::global();
    /// let mut buffer = Vec::new();
    /// terminal.printc_to(&args!["one", "guard"], &Options::default(), &mut buffer)?;
    /// terminal.printc_to(&args!["two", "lines"], &Options::default(), &mut buffer)?;
    /// drop(terminal);
    ///
    /// assert!(String::from_utf8_lossy(&buffer).contains("two lines"));
    /// # Ok::<(), std::io::Error>(())
    /// ```
    pub fn global() -> MutexGuard<'static, Terminal> {
        static TERMINAL: OnceLock<Mutex<Terminal>> = OnceLock::new();
        TERMINAL
            .get_or_init(|| Mutex::new(Terminal::new()))
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Get the color policy.
    pub fn policy(&self) -> ColorPolicy {
        self.policy
    }

    /// Set the color policy.
    ///
    /// Setting [`ColorPolicy::ForceAnsi`] rebinds all streams to ANSI escape
    /// sequences. Later policies do not undo that.
    pub fn set_policy(&mut self, policy: ColorPolicy) {
        if policy == ColorPolicy::ForceAnsi && !self.forced_ansi {
            tracing::info!("forcing ANSI escape sequences for all streams");
            self.forced_ansi = true;
            self.bindings = [None, None];
        }
        self.policy = policy;
    }

    /// Set the color policy by name.
    ///
    /// Upon failure, the current policy remains in effect.
    pub fn set_policy_str(&mut self, policy: &str) -> std::result::Result<(), ConfigurationError> {
        self.set_policy(policy.parse()?);
        Ok(())
    }

    /// Get the stream's binding, binding it if necessary.
    fn binding(&mut self, stream: Stream) -> &mut Binding {
        let Self {
            probe,
            forced_ansi,
            bindings,
            ..
        } = self;
        bindings[slot(stream)].get_or_insert_with(|| bind(probe.as_ref(), *forced_ansi, stream))
    }

    /// Get the stream's backend.
    pub(crate) fn backend(&mut self, stream: Stream) -> &mut dyn Backend {
        self.binding(stream).backend.as_mut()
    }

    /// Determine whether the stream can render color at all.
    pub fn can_use_color(&mut self, stream: Stream) -> bool {
        self.binding(stream).backend.can_use()
    }

    /// Get the number of colors the stream renders.
    ///
    /// This method returns 1 for streams that cannot use color and otherwise
    /// one of 8, 16, 256, or 16,777,216 for most terminals.
    pub fn color_count(&mut self, stream: Stream) -> u32 {
        let backend = &self.binding(stream).backend;
        if backend.can_use() {
            backend.color_count()
        } else {
            1
        }
    }

    /// Get the name of the stream's backend.
    ///
    /// The name is one of `ANSI`, `Console`, `Curses`, or `None`.
    pub fn backend_name(&mut self, stream: Stream) -> &'static str {
        self.binding(stream).backend.name()
    }

    /// Determine whether the stream is connected to a terminal.
    pub fn is_terminal(&mut self, stream: Stream) -> bool {
        self.binding(stream).is_terminal
    }

    /// Determine whether output to the stream will be colored under the
    /// current policy.
    pub fn will_use_color(&mut self, stream: Stream) -> bool {
        let policy = self.policy;
        let binding = self.binding(stream);
        policy.allows(binding.backend.can_use(), binding.is_terminal)
    }
}

#[cfg(test)]
pub(crate) mod test {
    use std::io::{Error, ErrorKind, Result};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use cmdtty::terminfo::TermInfo;
    use cmdtty::{Console, Stream};

    use super::{load_terminfo, Probe, Terminal};
    use crate::backend::test::{xterm, FakeConsole, Record};
    use crate::util::FakeEnv;
    use crate::{args, ColorPolicy, Options};

    /// A probe reporting made-up capabilities.
    #[derive(Debug, Default)]
    pub(crate) struct FakeProbe {
        pub(crate) terminal: bool,
        /// The console's attributes and whether it processes ANSI escapes.
        pub(crate) console: Option<(Option<u16>, bool)>,
        pub(crate) open_fails: bool,
        pub(crate) terminfo: Option<TermInfo>,
        pub(crate) probes: Arc<AtomicUsize>,
        pub(crate) record: Arc<Mutex<Record>>,
    }

    impl FakeProbe {
        pub(crate) fn terminal(terminal: bool) -> Self {
            Self {
                terminal,
                ..Self::default()
            }
        }
    }

    impl Probe for FakeProbe {
        fn is_terminal(&self, _stream: Stream) -> bool {
            self.probes.fetch_add(1, Ordering::Relaxed);
            self.terminal
        }

        fn console(&self, _stream: Stream) -> Result<Option<Box<dyn Console>>> {
            if self.open_fails {
                return Err(Error::from(ErrorKind::NotFound));
            }
            Ok(self.console.map(|(attributes, virtual_terminal)| {
                let console =
                    FakeConsole::sharing(attributes, virtual_terminal, self.record.clone());
                Box::new(console) as Box<dyn Console>
            }))
        }

        fn terminfo(&self) -> Option<&TermInfo> {
            self.terminfo.as_ref()
        }
    }

    #[test]
    fn test_ansi_fallback() {
        let mut terminal = Terminal::with_probe(FakeProbe::terminal(true));
        assert_eq!(terminal.policy(), ColorPolicy::Auto);
        for stream in Stream::all() {
            assert_eq!(terminal.backend_name(stream), "ANSI");
            assert_eq!(terminal.color_count(stream), 0x100_0000);
            assert!(terminal.can_use_color(stream));
            assert!(terminal.is_terminal(stream));
            assert!(terminal.will_use_color(stream));
        }
    }

    #[test]
    fn test_curses() {
        let mut terminal = Terminal::with_probe(FakeProbe {
            terminfo: Some(xterm(256)),
            ..FakeProbe::default()
        });
        assert_eq!(terminal.backend_name(Stream::Stdout), "Curses");
        assert_eq!(terminal.color_count(Stream::Stdout), 256);

        let mut terminal = Terminal::with_probe(FakeProbe {
            terminfo: Some(xterm(2)),
            ..FakeProbe::default()
        });
        assert_eq!(terminal.backend_name(Stream::Stdout), "ANSI");
    }

    #[test]
    fn test_console() {
        let mut terminal = Terminal::with_probe(FakeProbe {
            terminal: true,
            console: Some((Some(0x07), false)),
            terminfo: Some(xterm(256)),
            ..FakeProbe::default()
        });
        assert_eq!(terminal.backend_name(Stream::Stderr), "Console");
        assert_eq!(terminal.color_count(Stream::Stderr), 16);

        let mut terminal = Terminal::with_probe(FakeProbe {
            console: Some((Some(0x07), true)),
            ..FakeProbe::default()
        });
        assert_eq!(terminal.backend_name(Stream::Stderr), "ANSI");
        assert_eq!(terminal.color_count(Stream::Stderr), 0x100_0000);
    }

    #[test]
    fn test_failed_console() {
        for probe in [
            FakeProbe {
                terminal: true,
                console: Some((None, true)),
                ..FakeProbe::default()
            },
            FakeProbe {
                terminal: true,
                open_fails: true,
                ..FakeProbe::default()
            },
        ] {
            let mut terminal = Terminal::with_probe(probe);
            assert_eq!(terminal.backend_name(Stream::Stdout), "None");
            assert_eq!(terminal.color_count(Stream::Stdout), 1);
            assert!(!terminal.can_use_color(Stream::Stdout));
            terminal.set_policy(ColorPolicy::On);
            assert!(!terminal.will_use_color(Stream::Stdout));

            terminal.set_policy(ColorPolicy::ForceAnsi);
            assert_eq!(terminal.backend_name(Stream::Stdout), "ANSI");
            assert!(terminal.will_use_color(Stream::Stdout));
        }
    }

    #[test]
    fn test_policy() {
        let mut terminal = Terminal::with_probe(FakeProbe::terminal(false));
        assert!(!terminal.will_use_color(Stream::Stdout));
        terminal.set_policy(ColorPolicy::On);
        assert!(terminal.will_use_color(Stream::Stdout));
        terminal.set_policy(ColorPolicy::Off);
        assert!(!terminal.will_use_color(Stream::Stdout));

        assert!(terminal.set_policy_str("sometimes").is_err());
        assert_eq!(terminal.policy(), ColorPolicy::Off);
        assert!(terminal.set_policy_str("ansi").is_ok());
        assert_eq!(terminal.policy(), ColorPolicy::ForceAnsi);
        assert!(terminal.will_use_color(Stream::Stdout));

        // Forcing ANSI escape sequences is irreversible.
        terminal.set_policy(ColorPolicy::Auto);
        assert_eq!(terminal.backend_name(Stream::Stdout), "ANSI");
        assert!(!terminal.will_use_color(Stream::Stdout));
    }

    #[test]
    fn test_caching() {
        let probe = FakeProbe {
            terminfo: Some(xterm(8)),
            ..FakeProbe::default()
        };
        let probes = probe.probes.clone();
        let mut terminal = Terminal::with_probe(probe);
        for _ in 0..3 {
            assert_eq!(terminal.backend_name(Stream::Stdout), "Curses");
            assert_eq!(terminal.color_count(Stream::Stdout), 8);
        }
        assert_eq!(terminal.backend_name(Stream::Stderr), "Curses");

        assert_eq!(probes.load(Ordering::Relaxed), 2);

        terminal.set_policy(ColorPolicy::ForceAnsi);
        terminal.set_policy(ColorPolicy::ForceAnsi);
        assert_eq!(terminal.backend_name(Stream::Stdout), "ANSI");
        assert_eq!(probes.load(Ordering::Relaxed), 3);
    }

    #[test]
    fn test_load_terminfo() {
        let env = &mut FakeEnv::new();
        assert!(load_terminfo(env).is_none());
        env.set("TERM", "no-such-terminal")
            .set("TERMINFO_DIRS", "/no/such/directory");
        assert!(load_terminfo(env).is_none());
    }

    #[test]
    fn test_global() {
        let name = Terminal::global().backend_name(Stream::Stderr);
        assert!(["ANSI", "Console", "Curses", "None"].contains(&name));

        // Printing through a held guard must not lock the terminal again.
        let mut out = Vec::new();
        {
            let mut terminal = Terminal::global();
            let options = Options::stderr();
            terminal.printc_to(&args!["first"], &options, &mut out).unwrap();
            terminal.printc_to(&args!["second"], &options, &mut out).unwrap();
        }
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("first"));
        assert!(text.contains("second"));
        assert_eq!(Terminal::global().backend_name(Stream::Stderr), name);
    }
}
