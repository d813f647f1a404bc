// LogExc - core/signature.rs
//
// Exception/error signature detection.
//
// A signature is a fully qualified type name: one or more lowercase package
// segments followed by a capitalised class name ending in `Exception` or
// `Error`, e.g. `java.lang.IllegalStateException`. Only the left-most match
// on a line is reported.

use regex::Regex;
use std::sync::OnceLock;

/// Anchored so a token must be a type name in its entirety.
const SIGNATURE_PATTERN: &str = r"^(?:[a-z]+\.)+[A-Z][a-zA-Z]*(?:Exception|Error)$";

fn signature_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(SIGNATURE_PATTERN).expect("signature regex is valid"))
}

/// Finds qualified exception/error type names in log lines.
#[derive(Debug, Clone, Copy, Default)]
pub struct SignatureDetector;

impl SignatureDetector {
    pub fn new() -> Self {
        Self
    }

    /// Returns the first whitespace-delimited token that is a signature once
    /// its surrounding punctuation is stripped.
    pub fn detect<'l>(&self, line: &'l str) -> Option<&'l str> {
        let re = signature_regex();
        line.split_whitespace()
            .map(trim_non_letters)
            .find(|token| re.is_match(token))
    }
}

/// Strip leading and trailing characters that are not letters.
///
/// `(com.acme.FooException:` becomes `com.acme.FooException`; dots inside the
/// token are kept.
fn trim_non_letters(token: &str) -> &str {
    token.trim_matches(|c: char| !c.is_alphabetic())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detect(line: &str) -> Option<&str> {
        SignatureDetector::new().detect(line)
    }

    #[test]
    fn test_detects_exception_and_error() {
        assert_eq!(
            detect("2024-01-01 10:00:01,000 com.acme.FooException occurred"),
            Some("com.acme.FooException")
        );
        assert_eq!(
            detect("Caused by: java.lang.OutOfMemoryError: Java heap space"),
            Some("java.lang.OutOfMemoryError")
        );
    }

    #[test]
    fn test_first_token_wins() {
        assert_eq!(
            detect("a.b.FirstException wrapped b.c.SecondException"),
            Some("a.b.FirstException")
        );
    }

    #[test]
    fn test_punctuation_is_trimmed() {
        assert_eq!(
            detect("failed [org.hibernate.HibernateException]"),
            Some("org.hibernate.HibernateException")
        );
        assert_eq!(
            detect("\"javax.servlet.ServletException\","),
            Some("javax.servlet.ServletException")
        );
    }

    #[test]
    fn test_rejects_non_signatures() {
        // No package.
        assert_eq!(detect("IllegalStateException thrown"), None);
        // Does not end in Exception/Error.
        assert_eq!(detect("com.acme.FooService started"), None);
        // Uppercase package segment.
        assert_eq!(detect("Com.acme.FooException"), None);
        // Digits in the package are not accepted by the structure.
        assert_eq!(detect("com.acme2.FooException"), None);
        // Stack frame: method name follows the class.
        assert_eq!(detect("at com.acme.FooException.init(Foo.java:12)"), None);
        assert_eq!(detect(""), None);
        assert_eq!(detect("   \t "), None);
    }

    #[test]
    fn test_trim_non_letters() {
        assert_eq!(trim_non_letters("(a.b.CError):"), "a.b.CError");
        assert_eq!(trim_non_letters("123"), "");
        assert_eq!(trim_non_letters("«ü.Ä»"), "ü.Ä");
    }
}
