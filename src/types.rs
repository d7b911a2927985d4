//! Core types for consent-based SMS retrieval.

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;
use thiserror::Error;

// =============================================================================
// OtpLength
// =============================================================================

/// Error when constructing an [`OtpLength`].
#[derive(Debug, Clone, Error)]
pub enum OtpLengthError {
    /// Requested length is zero.
    #[error("otp length must be a positive number of digits")]
    Zero,
}

/// Requested length of a one-time code, in digits.
///
/// The consent flow only ever extracts runs of a fixed, caller-chosen length,
/// so the length is validated once at the API boundary instead of at every
/// extraction site.
///
/// # Example
///
/// ```rust
/// use sms_user_consent::OtpLength;
///
/// let len = OtpLength::new(6).unwrap();
/// assert_eq!(len.get(), 6);
///
/// assert!(OtpLength::new(0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OtpLength(u32);

impl OtpLength {
    /// Create a new OtpLength. The length must be positive.
    pub fn new(digits: u32) -> Result<Self, OtpLengthError> {
        if digits == 0 {
            return Err(OtpLengthError::Zero);
        }
        Ok(Self(digits))
    }

    /// Get the length as a number of digits.
    pub fn get(&self) -> u32 {
        self.0
    }
}

impl Display for OtpLength {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// OtpCode
// =============================================================================

/// One-time code extracted from a consented SMS message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtpCode(pub String);

impl OtpCode {
    /// Create a new OtpCode.
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Get the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for OtpCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for OtpCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for OtpCode {
    fn from(code: String) -> Self {
        Self(code)
    }
}

impl From<&str> for OtpCode {
    fn from(code: &str) -> Self {
        Self(code.to_string())
    }
}

// =============================================================================
// SenderFilter
// =============================================================================

/// Error when parsing a sender filter.
#[derive(Debug, Clone, Error)]
pub enum SenderFilterError {
    /// Filter is empty.
    #[error("sender filter cannot be empty")]
    Empty,
    /// Filter contains characters other than digits (and an optional leading '+').
    #[error("sender filter must contain only digits, with an optional leading '+'")]
    NonDigit,
}

/// Phone number the listening session is scoped to (e.g., "+15551234567").
///
/// When present, the platform only matches messages from this sender; when
/// absent, any incoming message that fits the consent signature is eligible.
/// A leading '+' is preserved, everything else must be digits.
///
/// # Example
///
/// ```rust
/// use sms_user_consent::SenderFilter;
///
/// let filter = SenderFilter::new("+15551234567").unwrap();
/// assert_eq!(filter.as_str(), "+15551234567");
///
/// assert!(SenderFilter::new("  ").is_err());
/// assert!(SenderFilter::new("555-1234").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SenderFilter(String);

impl SenderFilter {
    /// Create a new SenderFilter from a phone number string.
    ///
    /// Leading and trailing whitespace is trimmed.
    pub fn new(s: impl AsRef<str>) -> Result<Self, SenderFilterError> {
        let n = s.as_ref().trim();
        if n.is_empty() {
            return Err(SenderFilterError::Empty);
        }
        let digits = n.strip_prefix('+').unwrap_or(n);
        if digits.is_empty() {
            return Err(SenderFilterError::Empty);
        }
        if !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(SenderFilterError::NonDigit);
        }
        Ok(Self(n.to_string()))
    }

    /// Get the filter as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for SenderFilter {
    type Err = SenderFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl Display for SenderFilter {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for SenderFilter {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for SenderFilter {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(d)?;
        SenderFilter::new(raw).map_err(de::Error::custom)
    }
}

impl Serialize for SenderFilter {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&self.0)
    }
}

// =============================================================================
// CorrelationToken
// =============================================================================

/// Identifier that ties a consent-prompt launch to its eventual result.
///
/// A fresh token is assigned per listening session. The host glue receives it
/// in [`ConsentHost::present_prompt`](crate::ConsentHost::present_prompt) and
/// must echo it back in
/// [`SmsRetriever::handle_prompt_result`](crate::SmsRetriever::handle_prompt_result);
/// results carrying a token from a superseded or settled session are ignored.
///
/// On platforms where the prompt result round-trips through an integer request
/// code, [`as_raw`](Self::as_raw) / [`from_raw`](Self::from_raw) convert both
/// ways.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CorrelationToken(u32);

impl CorrelationToken {
    /// Reconstruct a token from its raw integer form.
    pub fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Get the raw integer form of the token.
    pub fn as_raw(&self) -> u32 {
        self.0
    }
}

impl Display for CorrelationToken {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // OtpLength tests
    #[test]
    fn test_otp_length_valid() {
        let len = OtpLength::new(6).unwrap();
        assert_eq!(len.get(), 6);
        assert_eq!(len.to_string(), "6");
    }

    #[test]
    fn test_otp_length_zero() {
        assert!(matches!(OtpLength::new(0), Err(OtpLengthError::Zero)));
    }

    // OtpCode tests
    #[test]
    fn test_otp_code() {
        let code = OtpCode::new("123456");
        assert_eq!(code.as_str(), "123456");
        assert_eq!(code.to_string(), "123456");
    }

    // SenderFilter tests
    #[test]
    fn test_sender_filter_valid() {
        assert!(SenderFilter::new("15551234567").is_ok());
        assert!(SenderFilter::new("+15551234567").is_ok());
    }

    #[test]
    fn test_sender_filter_keeps_plus() {
        let filter = SenderFilter::new("+905488242474").unwrap();
        assert_eq!(filter.as_str(), "+905488242474");
    }

    #[test]
    fn test_sender_filter_trim() {
        let filter = SenderFilter::new("  +7905551122  ").unwrap();
        assert_eq!(filter.as_str(), "+7905551122");
    }

    #[test]
    fn test_sender_filter_empty() {
        assert!(matches!(SenderFilter::new(""), Err(SenderFilterError::Empty)));
        assert!(matches!(
            SenderFilter::new("  "),
            Err(SenderFilterError::Empty)
        ));
        assert!(matches!(
            SenderFilter::new("+"),
            Err(SenderFilterError::Empty)
        ));
    }

    #[test]
    fn test_sender_filter_non_digit() {
        assert!(matches!(
            SenderFilter::new("555-1234"),
            Err(SenderFilterError::NonDigit)
        ));
        assert!(matches!(
            SenderFilter::new("GOOGLE"),
            Err(SenderFilterError::NonDigit)
        ));
    }

    #[test]
    fn test_sender_filter_serde() {
        let filter = SenderFilter::new("+380501112233").unwrap();
        let json = serde_json::to_string(&filter).unwrap();
        assert_eq!(json, r#""+380501112233""#);

        let filter: SenderFilter = serde_json::from_str(r#""380501112233""#).unwrap();
        assert_eq!(filter.as_str(), "380501112233");
    }

    // CorrelationToken tests
    #[test]
    fn test_correlation_token_round_trip() {
        let token = CorrelationToken::from_raw(22071998);
        assert_eq!(token.as_raw(), 22071998);
        assert_eq!(token, CorrelationToken::from_raw(22071998));
        assert_ne!(token, CorrelationToken::from_raw(22071999));
    }
}
