//! CLI parsing helpers for clap value parsers.

/// Parse a whole-second timeout. Negative values mean "wait forever".
pub(super) fn parse_timeout(s: &str) -> Result<i64, String> {
    let trimmed = s.trim();
    if trimmed.eq_ignore_ascii_case("infinite") {
        return Ok(-1);
    }
    trimmed
        .parse()
        .map_err(|_| format!("{s} is not a whole number of seconds"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("5", Ok(5))]
    #[case(" 0 ", Ok(0))]
    #[case("-1", Ok(-1))]
    #[case("Infinite", Ok(-1))]
    #[case("1.5", Err("1.5 is not a whole number of seconds".to_owned()))]
    #[case("soon", Err("soon is not a whole number of seconds".to_owned()))]
    fn timeouts_parse_as_whole_seconds(#[case] input: &str, #[case] expected: Result<i64, String>) {
        assert_eq!(parse_timeout(input), expected);
    }
}
