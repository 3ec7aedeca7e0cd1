//! Classification of executables by the interpreter that parses their
//! command line.

use camino::Utf8Path;

/// The argument-splitting rules a launched program applies to its command
/// line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum InterpreterKind {
    /// A native executable whose runtime splits arguments with the
    /// backslash/quote rules of the C runtime.
    Native,
    /// A batch script run through the command shell.
    ShellScript,
    /// Anything else. No quoting is applied.
    #[default]
    Other,
}

impl InterpreterKind {
    /// Map a file extension (with or without the leading dot) to a kind.
    ///
    /// Matching is case-insensitive and ignores surrounding whitespace.
    ///
    /// # Examples
    ///
    /// ```
    /// use cmdproc::InterpreterKind;
    ///
    /// assert_eq!(InterpreterKind::from_extension(" .EXE "), InterpreterKind::Native);
    /// assert_eq!(InterpreterKind::from_extension("cmd"), InterpreterKind::ShellScript);
    /// assert_eq!(InterpreterKind::from_extension(".ps1"), InterpreterKind::Other);
    /// ```
    #[must_use]
    pub fn from_extension(extension: &str) -> Self {
        let trimmed = extension.trim();
        let bare = trimmed.strip_prefix('.').unwrap_or(trimmed);
        if bare.eq_ignore_ascii_case("exe") {
            Self::Native
        } else if bare.eq_ignore_ascii_case("bat") || bare.eq_ignore_ascii_case("cmd") {
            Self::ShellScript
        } else {
            Self::Other
        }
    }

    /// Classify an executable path by its extension.
    ///
    /// Paths without an extension are [`InterpreterKind::Other`].
    #[must_use]
    pub fn classify(path: &str) -> Self {
        Utf8Path::new(path.trim())
            .extension()
            .map_or(Self::Other, Self::from_extension)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("tool.exe", InterpreterKind::Native)]
    #[case("C:\\Tools\\TOOL.EXE", InterpreterKind::Native)]
    #[case("  run.Bat  ", InterpreterKind::ShellScript)]
    #[case("scripts/deploy.cmd", InterpreterKind::ShellScript)]
    #[case("report.ps1", InterpreterKind::Other)]
    #[case("make", InterpreterKind::Other)]
    #[case("", InterpreterKind::Other)]
    #[case("archive.exe.txt", InterpreterKind::Other)]
    fn classify_uses_final_extension(#[case] path: &str, #[case] expected: InterpreterKind) {
        assert_eq!(InterpreterKind::classify(path), expected);
    }

    #[rstest]
    #[case(".exe", InterpreterKind::Native)]
    #[case("EXE", InterpreterKind::Native)]
    #[case(" .cmd\t", InterpreterKind::ShellScript)]
    #[case(".", InterpreterKind::Other)]
    #[case("", InterpreterKind::Other)]
    fn from_extension_is_case_insensitive(#[case] ext: &str, #[case] expected: InterpreterKind) {
        assert_eq!(InterpreterKind::from_extension(ext), expected);
    }
}
