use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Regex for free-text fields that must carry at least one visible character
    /// - Valid: "Pothole", "  Broken light  "
    /// - Invalid: "", "   ", "\t\n"
    pub static ref NOT_BLANK_REGEX: Regex = Regex::new(r"\S").unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_blank_regex() {
        assert!(NOT_BLANK_REGEX.is_match("Pothole"));
        assert!(NOT_BLANK_REGEX.is_match("  Broken light  "));
        assert!(!NOT_BLANK_REGEX.is_match(""));
        assert!(!NOT_BLANK_REGEX.is_match("   "));
        assert!(!NOT_BLANK_REGEX.is_match("\t\n"));
    }
}
