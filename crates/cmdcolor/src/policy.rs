//! The user's choice of when to color output.

use crate::error::ConfigurationError;

/// A color policy.
///
/// The policy decides whether colored output actually uses color. Its
/// textual names, as listed by [`ColorPolicy::ALL`], suit command line
/// options:
///
/// ```
/// # use cmdcolor::ColorPolicy;
/// let policy: ColorPolicy = "ansi".parse()?;
/// assert_eq!(policy, ColorPolicy::ForceAnsi);
/// assert_eq!(policy.to_string(), "ansi");
/// assert!("sometimes".parse::<ColorPolicy>().is_err());
/// # Ok::<(), cmdcolor::error::ConfigurationError>(())
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ColorPolicy {
    /// Never color output.
    Off,
    /// Color output whenever the sink supports color.
    On,
    /// Color output if the sink supports color and is a terminal.
    #[default]
    Auto,
    /// Always color output with ANSI escape sequences.
    ///
    /// Selecting this policy rebinds all sinks to ANSI escape sequences for
    /// the remaining lifetime of the [`Terminal`](crate::Terminal). It then
    /// acts like [`ColorPolicy::On`].
    ForceAnsi,
}

impl ColorPolicy {
    /// All policies in the order of their textual names.
    pub const ALL: [ColorPolicy; 4] = [Self::Off, Self::On, Self::Auto, Self::ForceAnsi];

    /// Get this policy's textual name.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::On => "on",
            Self::Auto => "auto",
            Self::ForceAnsi => "ansi",
        }
    }

    /// Decide whether to use color for a sink.
    ///
    /// The sink can use color if its backend supports color at all, and it
    /// is interactive if it is a terminal.
    pub const fn allows(&self, can_use: bool, is_interactive: bool) -> bool {
        match self {
            Self::Off => false,
            Self::On => can_use,
            Self::Auto => can_use && is_interactive,
            Self::ForceAnsi => true,
        }
    }
}

impl std::str::FromStr for ColorPolicy {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|policy| policy.name() == s)
            .ok_or_else(|| ConfigurationError::new(s))
    }
}

impl std::fmt::Display for ColorPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
