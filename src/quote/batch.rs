//! Quoting for batch scripts interpreted by the command shell.

const METACHARACTERS: [char; 7] = ['%', '^', '&', '<', '>', '|', '"'];

/// Characters the shell splits batch parameters on besides whitespace.
const DELIMITERS: [char; 3] = [',', ';', '='];

fn is_delimiter(ch: char) -> bool {
    ch.is_whitespace() || DELIMITERS.contains(&ch)
}

pub(super) fn quote(raw: &str, force_quote: bool) -> String {
    if force_quote || raw.chars().any(is_delimiter) {
        let mut buf = String::with_capacity(raw.len() + 2);
        buf.push('"');
        for ch in raw.chars() {
            if ch == '"' {
                buf.push('"');
            }
            buf.push(ch);
        }
        buf.push('"');
        return buf;
    }

    let mut buf = String::with_capacity(raw.len());
    for ch in raw.chars() {
        if METACHARACTERS.contains(&ch) {
            buf.push('^');
        }
        buf.push(ch);
    }
    buf
}
