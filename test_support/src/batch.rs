//! Reference splitter for batch-script command lines.
//!
//! Models how the command shell tokenises the arguments of a batch script:
//! whitespace, `,`, `;` and `=` separate arguments outside quoted runs, `^` makes the next
//! character literal outside quoted runs, `"` opens and closes a quoted run,
//! and `""` inside a quoted run is a literal quote. Surrounding quotes are
//! removed, as `%~1` does.

use std::mem;

/// Split a batch command line into its arguments.
///
/// # Examples
///
/// ```
/// use test_support::split_batch;
///
/// assert_eq!(split_batch(r#"a^&b "c ""d""""#), ["a&b", "c \"d\""]);
/// ```
#[must_use]
pub fn split_batch(command_line: &str) -> Vec<String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_arg = false;
    let mut in_quotes = false;
    let mut chars = command_line.chars().peekable();

    while let Some(ch) = chars.next() {
        if in_quotes {
            if ch == '"' {
                if chars.next_if_eq(&'"').is_some() {
                    current.push('"');
                } else {
                    in_quotes = false;
                }
            } else {
                current.push(ch);
            }
            continue;
        }

        match ch {
            '"' => {
                in_quotes = true;
                in_arg = true;
            }
            '^' => {
                if let Some(escaped) = chars.next() {
                    current.push(escaped);
                }
                in_arg = true;
            }
            delim if delim.is_whitespace() || matches!(delim, ',' | ';' | '=') => {
                if in_arg {
                    args.push(mem::take(&mut current));
                    in_arg = false;
                }
            }
            _ => {
                current.push(ch);
                in_arg = true;
            }
        }
    }

    if in_arg {
        args.push(current);
    }
    args
}
