//! Quoting for programs that split their command line with the C runtime
//! rules.

pub(super) fn quote(raw: &str, force_quote: bool) -> String {
    let needs_quotes = force_quote || raw.chars().any(|ch| ch == '"' || ch.is_whitespace());
    if !needs_quotes {
        return raw.to_owned();
    }

    let mut buf = String::with_capacity(raw.len() + 2);
    buf.push('"');
    let mut backslashes = 0_usize;
    for ch in raw.chars() {
        match ch {
            '\\' => backslashes += 1,
            '"' => {
                push_backslashes(&mut buf, backslashes * 2 + 1);
                buf.push('"');
                backslashes = 0;
            }
            _ => {
                push_backslashes(&mut buf, backslashes);
                buf.push(ch);
                backslashes = 0;
            }
        }
    }
    // The closing quote must not be escaped by a trailing run.
    push_backslashes(&mut buf, backslashes * 2);
    buf.push('"');
    buf
}

pub(super) fn push_backslashes(buf: &mut String, count: usize) {
    buf.extend(std::iter::repeat_n('\\', count));
}
