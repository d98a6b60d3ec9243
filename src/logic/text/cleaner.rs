//! Text Cleaner
//!
//! Normalizes raw notification text into the form the model was trained on:
//! lowercase ASCII letters separated by single spaces.

use once_cell::sync::Lazy;
use regex::Regex;

static URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"https?://\S+|www\.\S+").expect("valid URL regex"));

static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<.*?>").expect("valid tag regex"));

// ASCII whitespace only: NBSP and other Unicode spaces are stripped, not kept as separators
static NON_LETTER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z \t\n\x0B\x0C\r]").expect("valid letter regex"));

static WHITESPACE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[ \t\n\x0B\x0C\r]+").expect("valid space regex"));

/// Clean raw text. Idempotent.
pub fn clean(text: &str) -> String {
    let lowered = text.to_lowercase();
    let no_urls = URL_RE.replace_all(&lowered, "");
    let no_tags = TAG_RE.replace_all(&no_urls, "");
    let letters = NON_LETTER_RE.replace_all(&no_tags, "");
    WHITESPACE_RE.replace_all(&letters, " ").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_cleaning() {
        assert_eq!(clean("The  Bank\tUrgent!!"), "the bank urgent");
    }

    #[test]
    fn test_strips_urls_and_tags() {
        let raw = "Click <b>here</b>: https://evil.example/login?x=1 or www.bad.site now";
        assert_eq!(clean(raw), "click here or now");
    }

    #[test]
    fn test_strips_digits_and_punctuation() {
        assert_eq!(clean("Your OTP is 483921. Don't share!"), "your otp is dont share");
    }

    #[test]
    fn test_multiline_input() {
        assert_eq!(clean("Bank Alert\nAccount   suspended"), "bank alert account suspended");
    }

    #[test]
    fn test_empty_and_blank() {
        assert_eq!(clean(""), "");
        assert_eq!(clean("  \n\t "), "");
        assert_eq!(clean("12345 !!!"), "");
    }

    #[test]
    fn test_unicode_spaces_are_not_separators() {
        assert_eq!(clean("your\u{00A0}account"), "youraccount");
        assert_eq!(clean("bank\u{2003}alert now"), "bankalert now");
    }

    #[test]
    fn test_idempotent() {
        let samples = [
            "",
            "The Bank Urgent",
            "Visit https://x.y/z <i>NOW</i> 100% FREE!!!",
            "  leading and trailing  ",
            "Ünïcödé wörds and emoji 🎉 mixed",
            "a<b>c</b>d www.e.f g",
            "<<nested>> tags >",
        ];
        for s in samples {
            let once = clean(s);
            assert_eq!(clean(&once), once, "not idempotent for {:?}", s);
        }
    }
}
