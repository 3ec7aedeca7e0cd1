//! Splitting of native command lines into argument vectors.

use std::mem;

use super::native::push_backslashes;

/// Split `command_line` the way the C runtime builds `argv`.
///
/// Space and tab separate arguments outside quoted runs. A run of `n`
/// backslashes followed by `"` yields `n / 2` backslashes and, when `n` is
/// odd, a literal quote; otherwise the quote toggles the quoted run. Inside a
/// quoted run `""` yields a literal quote. Backslashes not followed by a
/// quote are literal. An empty quoted run (`""`) is an empty argument.
///
/// # Examples
///
/// ```
/// use cmdproc::quote::split::split_native;
///
/// assert_eq!(split_native(r#"a "b c" d"#), ["a", "b c", "d"]);
/// assert_eq!(split_native(r#""a\"b" "" C:\dir\"#), [r#"a"b"#, "", r"C:\dir\"]);
/// ```
#[must_use]
pub fn split_native(command_line: &str) -> Vec<String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_arg = false;
    let mut in_quotes = false;
    let mut backslashes = 0_usize;
    let mut chars = command_line.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '\\' => {
                backslashes += 1;
                in_arg = true;
            }
            '"' => {
                push_backslashes(&mut current, backslashes >> 1);
                let escaped = backslashes & 1 == 1;
                backslashes = 0;
                in_arg = true;
                if escaped {
                    current.push('"');
                } else if in_quotes && chars.next_if_eq(&'"').is_some() {
                    current.push('"');
                } else {
                    in_quotes = !in_quotes;
                }
            }
            ' ' | '\t' if !in_quotes => {
                push_backslashes(&mut current, backslashes);
                backslashes = 0;
                if in_arg {
                    args.push(mem::take(&mut current));
                    in_arg = false;
                }
            }
            _ => {
                push_backslashes(&mut current, backslashes);
                backslashes = 0;
                current.push(ch);
                in_arg = true;
            }
        }
    }

    push_backslashes(&mut current, backslashes);
    if in_arg {
        args.push(current);
    }
    args
}
