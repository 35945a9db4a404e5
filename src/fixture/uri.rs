//! URI clean-up for generated pattern examples.

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use regex::Regex;
use tracing::debug;
use url::{ParseError, Url};

/// Characters escaped when a URI-like example fails strict parsing.
const URI_ESCAPE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'<')
    .add(b'>')
    .add(b'`')
    .add(b'{')
    .add(b'}')
    .add(b'|')
    .add(b'\\')
    .add(b'^')
    .add(b'%');

/// Returns `example` unchanged unless it looks like an absolute URI that
/// fails strict parsing. Such strings are percent-escaped, and the escaped
/// form is used only if it then parses and still matches `pattern`.
pub fn normalize(example: String, pattern: &Regex) -> String {
    match Url::parse(&example) {
        Ok(_) | Err(ParseError::RelativeUrlWithoutBase) => example,
        Err(reason) => {
            let escaped = utf8_percent_encode(&example, URI_ESCAPE).to_string();
            if Url::parse(&escaped).is_ok() && pattern.is_match(&escaped) {
                debug!(%reason, "escaped generated URI example");
                escaped
            } else {
                example
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn any() -> Regex {
        Regex::new("").unwrap()
    }

    #[test]
    fn test_plain_strings_are_untouched() {
        assert_eq!(normalize("42".to_string(), &any()), "42");
        assert_eq!(normalize("two words".to_string(), &any()), "two words");
        assert_eq!(normalize(String::new(), &any()), "");
    }

    #[test]
    fn test_valid_uris_are_untouched() {
        assert_eq!(
            normalize("https://example.com/a b".to_string(), &any()),
            "https://example.com/a b"
        );
    }

    #[test]
    fn test_unrecoverable_uris_are_returned_as_is() {
        assert_eq!(normalize("http://".to_string(), &any()), "http://");
    }

    #[test]
    fn test_escaping_never_breaks_the_pattern() {
        let pattern = Regex::new(r"\A[a-z]+://[a-z]+ [a-z]+\z").unwrap();
        let example = normalize("ab://cd ef".to_string(), &pattern);
        assert_eq!(example, "ab://cd ef");
        assert!(pattern.is_match(&example));
    }
}
