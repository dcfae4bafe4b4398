//! Parsing of interactive commands.

/// A line typed by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Input {
    /// Load older blocks; the configured step when no count is given.
    More(Option<u64>),
    /// Retry the failed operation.
    Retry,
    /// Show the command list.
    Help,
    /// Exit.
    Quit,
    /// Blank line.
    Empty,
    /// Anything else, with a message for the user.
    Invalid(String),
}

impl Input {
    pub(crate) fn parse(line: &str) -> Self {
        let mut words = line.split_whitespace();
        let Some(command) = words.next() else {
            return Self::Empty;
        };
        let argument = words.next();
        if words.next().is_some() {
            return Self::Invalid(format!("too many arguments for `{command}`"));
        }

        let name = command.to_ascii_lowercase();
        match (name.as_str(), argument) {
            ("more" | "m", None) => Self::More(None),
            ("more" | "m", Some(count)) => match count.parse::<u64>() {
                Ok(0) | Err(_) => Self::Invalid(format!("`{count}` is not a positive block count")),
                Ok(count) => Self::More(Some(count)),
            },
            ("retry" | "r", None) => Self::Retry,
            ("help" | "h" | "?", None) => Self::Help,
            ("quit" | "q" | "exit", None) => Self::Quit,
            ("retry" | "r" | "help" | "h" | "?" | "quit" | "q" | "exit", Some(_)) => {
                Self::Invalid(format!("`{command}` takes no argument"))
            }
            _ => Self::Invalid(format!("unknown command `{command}`, type `help`")),
        }
    }
}

pub(crate) const HELP: &str = "\
Commands:
  more [n]   load n older blocks (default from config)
  retry      retry after a failure
  help       show this list
  quit       exit (Ctrl-C works too)";
