//! Digit-run extraction from consented message text.

use crate::types::OtpLength;
use once_cell::sync::Lazy;
use regex::Regex;

/// Maximal runs of ASCII digits. `\d` would also match non-ASCII decimal
/// digits whose byte length differs from their character count.
static DIGIT_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new("[0-9]+").expect("digit-run pattern is valid"));

/// Find the first maximal digit run of exactly `length` digits in `text`.
///
/// Runs are maximal: a 6-digit code does not contain a 4-digit match, so a
/// caller expecting 4 digits is told the message carried no such code instead
/// of being handed a truncated prefix. When several runs of the requested
/// length exist, the leftmost wins.
///
/// # Example
///
/// ```rust
/// use sms_user_consent::{OtpLength, utils::extract::first_exact_digit_run};
///
/// let len = OtpLength::new(6).unwrap();
/// assert_eq!(
///     first_exact_digit_run("Your code is 123456 exp 5m", len),
///     Some("123456")
/// );
///
/// let len = OtpLength::new(4).unwrap();
/// assert_eq!(first_exact_digit_run("Your code is 123456", len), None);
/// ```
pub fn first_exact_digit_run(text: &str, length: OtpLength) -> Option<&str> {
    DIGIT_RUN
        .find_iter(text)
        .find(|m| m.as_str().len() == length.get() as usize)
        .map(|m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn len(n: u32) -> OtpLength {
        OtpLength::new(n).unwrap()
    }

    #[test]
    fn test_extracts_exact_run() {
        assert_eq!(
            first_exact_digit_run("Your code is 123456 exp 5m", len(6)),
            Some("123456")
        );
    }

    #[test]
    fn test_longer_run_is_not_a_match() {
        // 123456 is a single 6-digit run; it contains no 4-digit run.
        assert_eq!(first_exact_digit_run("Your code is 123456", len(4)), None);
    }

    #[test]
    fn test_shorter_run_is_not_a_match() {
        assert_eq!(first_exact_digit_run("Your code is 123", len(6)), None);
    }

    #[test]
    fn test_first_of_equal_length_runs_wins() {
        assert_eq!(
            first_exact_digit_run("code 1111 or maybe 2222", len(4)),
            Some("1111")
        );
    }

    #[test]
    fn test_skips_runs_of_other_lengths() {
        assert_eq!(
            first_exact_digit_run("order 98765, code 4321, ref 12", len(4)),
            Some("4321")
        );
    }

    #[test]
    fn test_run_at_string_edges() {
        assert_eq!(first_exact_digit_run("123456", len(6)), Some("123456"));
        assert_eq!(first_exact_digit_run("123456 is your code", len(6)), Some("123456"));
    }

    #[test]
    fn test_no_digits_at_all() {
        assert_eq!(first_exact_digit_run("no code here", len(6)), None);
        assert_eq!(first_exact_digit_run("", len(6)), None);
    }

    #[test]
    fn test_non_ascii_digits_are_not_matched() {
        // Arabic-Indic digits must not be confused with an ASCII code run.
        assert_eq!(first_exact_digit_run("\u{0661}\u{0662}\u{0663}\u{0664}\u{0665}\u{0666}", len(6)), None);
    }
}
