//! Filename checks for names supplied by the console.

use regex::Regex;

use crate::error::{Error, Result};

/// Word character first, then word characters, dots and dashes. No path
/// separators, so a name can only ever address a file directly inside the
/// output directory.
pub const CONSOLE_FILENAME_PATTERN: &str = r"^[A-Za-z0-9_][A-Za-z0-9_.-]+$";

/// Compiled console filename rule.
#[derive(Debug, Clone)]
pub struct FilenameRule {
    pattern: Regex,
}

impl FilenameRule {
    pub fn new() -> Result<Self> {
        let pattern = Regex::new(CONSOLE_FILENAME_PATTERN)
            .map_err(|e| Error::Config(format!("Invalid filename pattern: {}", e)))?;
        Ok(Self { pattern })
    }

    pub fn is_valid(&self, name: &str) -> bool {
        self.pattern.is_match(name)
    }

    /// Reject a name that breaks the rule.
    pub fn check(&self, name: &str) -> Result<()> {
        if self.is_valid(name) {
            Ok(())
        } else {
            Err(Error::BadFilename(name.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_console_style_names_pass() {
        let rule = FilenameRule::new().unwrap();
        for name in [
            "2024021913423500-57B4628C2F3B1E7F0B47F1F4E9E8B1C2.jpg",
            "a.jpg",
            "_hidden-ish.mp4",
            "clip.v2.mp4",
            "ab",
        ] {
            assert!(rule.check(name).is_ok(), "{} should pass", name);
        }
    }

    #[test]
    fn test_unsafe_names_rejected() {
        let rule = FilenameRule::new().unwrap();
        for name in [
            "",
            "a",
            "../etc/passwd",
            "../../etc/passwd",
            "img/a.jpg",
            "a b.jpg",
            ".hidden",
            "-rf",
            "a\\b.jpg",
            "a.jpg\n",
            "ä.jpg",
        ] {
            assert!(
                matches!(rule.check(name), Err(Error::BadFilename(n)) if n == name),
                "{:?} should be rejected",
                name
            );
        }
    }
}
