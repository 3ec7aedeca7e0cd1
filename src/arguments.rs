//! Accumulation of raw arguments into a single command line.

use crate::{InterpreterKind, quote};

/// Ordered list of raw arguments awaiting quoting.
///
/// # Examples
///
/// ```
/// use cmdproc::{CommandArguments, InterpreterKind};
///
/// let mut args = CommandArguments::new();
/// args.add(["a", "b c"]).add(["d"]);
/// assert_eq!(args.render(InterpreterKind::Native, false), r#"a "b c" d"#);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandArguments {
    raw: Vec<String>,
}

impl CommandArguments {
    /// Create an empty argument list.
    #[must_use]
    pub const fn new() -> Self {
        Self { raw: Vec::new() }
    }

    /// Append every argument in `args`, preserving their order.
    pub fn add<I, S>(&mut self, args: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.raw.extend(args.into_iter().map(Into::into));
        self
    }

    /// Append a single argument.
    pub fn push(&mut self, arg: impl Into<String>) -> &mut Self {
        self.raw.push(arg.into());
        self
    }

    /// Number of arguments added so far.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.raw.len()
    }

    /// Whether no arguments have been added.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Iterate over the raw, unquoted arguments.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.raw.iter().map(String::as_str)
    }

    /// Quote each argument for `kind` and join them with single spaces.
    ///
    /// An empty list renders as the empty string.
    #[must_use]
    pub fn render(&self, kind: InterpreterKind, force_quote: bool) -> String {
        let mut line = String::new();
        for (index, arg) in self.raw.iter().enumerate() {
            if index > 0 {
                line.push(' ');
            }
            line.push_str(&quote(arg, kind, force_quote));
        }
        line
    }
}

impl<S: Into<String>> FromIterator<S> for CommandArguments {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut args = Self::new();
        args.add(iter);
        args
    }
}

impl<S: Into<String>> Extend<S> for CommandArguments {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        self.add(iter);
    }
}
