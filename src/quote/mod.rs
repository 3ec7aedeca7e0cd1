//! Command-line quoting for the interpreters a host is likely to launch.
//!
//! Windows hands a program one flat command line and leaves splitting it to
//! the program itself, so the escaping rules depend on who does the parsing.
//!
//! # Native executables
//!
//! Programs built on the C runtime split their command line with the rules
//! documented for [`CommandLineToArgvW`][ms-argv]: a backslash is literal
//! unless a run of backslashes ends in a double quote, in which case each pair
//! of backslashes yields one backslash and an odd trailing backslash escapes
//! the quote. The native quoter inverts that algorithm, and [`split::split_native`]
//! implements it so the round trip can be checked and so non-Windows hosts
//! can recover the argument vector.
//!
//! # Batch scripts
//!
//! `cmd.exe` parses batch arguments itself and treats `%`, `^`, `&`, `<`, `>`,
//! `|` and `"` specially outside quoted runs. Parameters are split on whitespace and
//! on `,`, `;` and `=`. The batch quoter wraps arguments that contain any of
//! those delimiters in double quotes, doubling embedded quotes, and
//! otherwise neutralises each metacharacter with a caret ([metacharacter
//! reference][ss64]).
//!
//! Both routines are total. Empty or blank arguments become a quoted run so
//! they keep their position on the command line.
//!
//! [ms-argv]: https://learn.microsoft.com/windows/win32/api/shellapi/nf-shellapi-commandlinetoargvw
//! [ss64]: https://ss64.com/nt/syntax-esc.html

mod batch;
mod native;
pub mod split;

use crate::InterpreterKind;

/// Quote `raw` so that `kind`'s argument splitter yields it back unchanged.
///
/// `force_quote` requests a quoted run even when the argument would survive
/// unquoted. [`InterpreterKind::Other`] returns the argument untouched.
///
/// # Examples
///
/// ```
/// use cmdproc::{InterpreterKind, quote};
///
/// assert_eq!(quote("abc", InterpreterKind::Native, false), "abc");
/// assert_eq!(quote("abc", InterpreterKind::Native, true), "\"abc\"");
/// assert_eq!(quote("a b", InterpreterKind::Native, false), "\"a b\"");
/// assert_eq!(quote("", InterpreterKind::Other, false), "\"\"");
/// assert_eq!(quote("a&b", InterpreterKind::ShellScript, false), "a^&b");
/// ```
#[must_use]
pub fn quote(raw: &str, kind: InterpreterKind, force_quote: bool) -> String {
    if raw.trim().is_empty() {
        return format!("\"{raw}\"");
    }

    match kind {
        InterpreterKind::Native => native::quote(raw, force_quote),
        InterpreterKind::ShellScript => batch::quote(raw, force_quote),
        InterpreterKind::Other => raw.to_owned(),
    }
}

/// Quote an argument that may be absent. `None` renders as `""`.
#[must_use]
pub fn quote_optional(raw: Option<&str>, kind: InterpreterKind, force_quote: bool) -> String {
    quote(raw.unwrap_or_default(), kind, force_quote)
}
