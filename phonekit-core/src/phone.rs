use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use strum::EnumString;
use thiserror::Error;

use crate::{defaults, MessageKey, WidgetConfig};

// International phone number (E.164 format)
static E164_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+[1-9]\d{6,14}$").expect("static regex"));

/// A phone number in E.164 form, e.g. `+31612345678`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PhoneNumber {
    e164: String,
    region: Option<String>,
}

impl PhoneNumber {
    /// Wraps a number that did not go through a [`PhoneValidator`].
    ///
    /// Used for numbers that come back from the backend itself (verification links).
    #[must_use]
    pub fn unchecked(number: &str) -> Self {
        Self {
            e164: number.trim().to_string(),
            region: None,
        }
    }

    /// Builds a number that an external [`PhoneValidator`] already checked.
    #[must_use]
    pub fn from_validated(e164: &str, region: Option<&str>) -> Self {
        Self {
            e164: e164.trim().to_string(),
            region: region.map(str::to_ascii_uppercase),
        }
    }

    /// The number in E.164 form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.e164
    }

    /// The number with its middle digits hidden, for logs.
    #[must_use]
    pub fn masked(&self) -> String {
        let chars: Vec<char> = self.e164.chars().collect();
        if chars.len() < 8 {
            return "****".to_string();
        }
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 3..].iter().collect();
        format!("{head}{}{tail}", "*".repeat(chars.len() - 7))
    }

    /// Region code (ISO 3166 alpha-2) the number belongs to, if known.
    #[must_use]
    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.e164)
    }
}

/// Type of line a number belongs to, as far as the validator can tell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberType {
    /// A mobile number.
    Mobile,
    /// The numbering plan does not distinguish mobile and fixed line numbers.
    FixedLineOrMobile,
    /// A fixed line number, cannot receive SMS.
    FixedLine,
    /// No metadata for this region.
    Unknown,
}

impl NumberType {
    /// Whether an SMS may be sent to numbers of this type.
    #[must_use]
    pub const fn accepts_sms(self) -> bool {
        !matches!(self, Self::FixedLine)
    }
}

/// Why a phone number was refused before any request was made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum PhoneRejection {
    /// Nothing was entered.
    #[error("empty phone number")]
    Empty,
    /// The input is not a phone number.
    #[error("malformed phone number")]
    Format,
    /// The number belongs to a region that is not supported.
    #[error("unsupported region")]
    UnsupportedRegion,
    /// The number cannot receive SMS.
    #[error("not a mobile number")]
    NotMobile,
}

impl PhoneRejection {
    /// Message shown to the user.
    #[must_use]
    pub const fn message_key(self) -> MessageKey {
        match self {
            Self::Empty | Self::Format => MessageKey::ErrorPhoneNumberFormat,
            Self::UnsupportedRegion | Self::NotMobile => MessageKey::ErrorAddressMalformed,
        }
    }
}

/// Validates and normalizes user input into a [`PhoneNumber`].
///
/// In the browser this is usually backed by the phone input widget and its metadata; the
/// built-in [`RegionValidator`] covers the regions the backend accepts.
pub trait PhoneValidator {
    /// Turns raw input into an E.164 number that can receive SMS.
    ///
    /// # Errors
    /// Returns the reason the input was refused.
    fn validate(&self, raw: &str) -> Result<PhoneNumber, PhoneRejection>;
}

/// Validator based on calling codes of a list of allowed regions.
#[derive(Debug, Clone)]
pub struct RegionValidator {
    default_code: &'static str,
    allowed: Vec<(String, &'static str)>,
}

impl RegionValidator {
    /// Creates a validator for `allowed` regions, reading national numbers as numbers of
    /// `default_region`.
    ///
    /// Unknown region codes are skipped. An unknown default region falls back to
    /// [`defaults::DEFAULT_REGION`].
    #[must_use]
    pub fn new<S: AsRef<str>>(default_region: &str, allowed: &[S]) -> Self {
        let default_code = defaults::calling_code(default_region)
            .or_else(|| defaults::calling_code(defaults::DEFAULT_REGION))
            .unwrap_or("31");
        let allowed = allowed
            .iter()
            .filter_map(|region| {
                let region = region.as_ref().to_ascii_uppercase();
                defaults::calling_code(&region).map(|code| (region, code))
            })
            .collect();
        Self {
            default_code,
            allowed,
        }
    }

    /// Creates the validator described by the widget configuration.
    #[must_use]
    pub fn from_config(config: &WidgetConfig) -> Self {
        Self::new(&config.default_region, config.allowed_regions.as_slice())
    }

    /// Brings raw input into E.164 form without checking it any further.
    ///
    /// # Errors
    /// Returns [`PhoneRejection::Empty`] or [`PhoneRejection::Format`].
    pub fn normalize(&self, raw: &str) -> Result<String, PhoneRejection> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(PhoneRejection::Empty);
        }

        let compact: String = raw
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '.' | '(' | ')' | '/'))
            .collect();

        let (international, digits) = compact
            .strip_prefix('+')
            .map_or((false, compact.as_str()), |rest| (true, rest));
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(PhoneRejection::Format);
        }

        let e164 = if international {
            format!("+{digits}")
        } else if let Some(rest) = digits.strip_prefix("00") {
            format!("+{rest}")
        } else if let Some(rest) = digits.strip_prefix('0') {
            format!("+{}{rest}", self.default_code)
        } else {
            format!("+{}{digits}", self.default_code)
        };

        if E164_REGEX.is_match(&e164) {
            Ok(e164)
        } else {
            Err(PhoneRejection::Format)
        }
    }

    fn region_of(&self, e164: &str) -> Option<&(String, &'static str)> {
        // Calling codes form a prefix code, at most one matches.
        self.allowed
            .iter()
            .find(|(_, code)| e164[1..].starts_with(code))
    }
}

/// Classifies a number of `region`. Only Dutch numbers carry metadata.
fn classify(region: &str, e164: &str) -> Result<NumberType, PhoneRejection> {
    if region != "NL" {
        return Ok(NumberType::Unknown);
    }
    // +31 followed by nine digits
    if e164.len() != 12 {
        return Err(PhoneRejection::Format);
    }
    let national = &e164[3..];
    let number_type = if national.starts_with('6') {
        NumberType::Mobile
    } else if national.starts_with("97") {
        NumberType::FixedLineOrMobile
    } else {
        NumberType::FixedLine
    };
    Ok(number_type)
}

impl PhoneValidator for RegionValidator {
    fn validate(&self, raw: &str) -> Result<PhoneNumber, PhoneRejection> {
        let e164 = self.normalize(raw)?;
        let (region, _) = self
            .region_of(&e164)
            .ok_or(PhoneRejection::UnsupportedRegion)?;

        if !classify(region, &e164)?.accepts_sms() {
            return Err(PhoneRejection::NotMobile);
        }

        Ok(PhoneNumber {
            e164,
            region: Some(region.clone()),
        })
    }
}

impl Default for RegionValidator {
    fn default() -> Self {
        Self::new(defaults::DEFAULT_REGION, &defaults::ALLOWED_REGIONS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("+31612345678" => Ok("+31612345678".to_string()))]
    #[test_case("06 1234 5678" => Ok("+31612345678".to_string()))]
    #[test_case("0031612345678" => Ok("+31612345678".to_string()))]
    #[test_case("(06) 12-34-56-78" => Ok("+31612345678".to_string()))]
    #[test_case("612345678" => Ok("+31612345678".to_string()))]
    #[test_case("+49 151 23456789" => Ok("+4915123456789".to_string()))]
    #[test_case("   " => Err(PhoneRejection::Empty))]
    #[test_case("+31 6 abc" => Err(PhoneRejection::Format))]
    #[test_case("+0612345678" => Err(PhoneRejection::Format))]
    #[test_case("+3161234567890123456" => Err(PhoneRejection::Format))]
    #[test_case("+" => Err(PhoneRejection::Format))]
    fn test_normalize(raw: &str) -> Result<String, PhoneRejection> {
        RegionValidator::default().normalize(raw)
    }

    #[test]
    fn test_validate_dutch_mobile() {
        let number = RegionValidator::default().validate("06-12345678").unwrap();
        assert_eq!(number.as_str(), "+31612345678");
        assert_eq!(number.region(), Some("NL"));
        assert_eq!(number.to_string(), "+31612345678");
    }

    #[test]
    fn test_masked() {
        assert_eq!(PhoneNumber::unchecked("+31612345678").masked(), "+316*****678");
        assert_eq!(PhoneNumber::unchecked("+3161").masked(), "****");
    }

    #[test]
    fn test_validate_rejects_dutch_fixed_line() {
        let err = RegionValidator::default().validate("020 123 4567").unwrap_err();
        assert_eq!(err, PhoneRejection::NotMobile);
        assert_eq!(err.message_key(), MessageKey::ErrorAddressMalformed);
    }

    #[test]
    fn test_validate_rejects_short_dutch_number() {
        let err = RegionValidator::default().validate("+3161234567").unwrap_err();
        assert_eq!(err, PhoneRejection::Format);
    }

    #[test]
    fn test_validate_accepts_m2m_range() {
        let number = RegionValidator::default().validate("+31970123456").unwrap();
        assert_eq!(number.region(), Some("NL"));
    }

    #[test]
    fn test_validate_unknown_type_is_accepted() {
        let number = RegionValidator::default().validate("+32470123456").unwrap();
        assert_eq!(number.region(), Some("BE"));
    }

    #[test]
    fn test_validate_rejects_unsupported_region() {
        let err = RegionValidator::default().validate("+12025550123").unwrap_err();
        assert_eq!(err, PhoneRejection::UnsupportedRegion);
    }

    #[test]
    fn test_validate_respects_configured_regions() {
        let validator = RegionValidator::new("BE", &["BE"]);
        assert_eq!(
            validator.validate("+31612345678").unwrap_err(),
            PhoneRejection::UnsupportedRegion
        );
        let number = validator.validate("0470 12 34 56").unwrap();
        assert_eq!(number.as_str(), "+32470123456");
    }

    #[test]
    fn test_rejection_names() {
        assert_eq!(
            "not-mobile".parse::<PhoneRejection>().unwrap(),
            PhoneRejection::NotMobile
        );
        assert_eq!(
            "unsupported-region".parse::<PhoneRejection>().unwrap(),
            PhoneRejection::UnsupportedRegion
        );
        assert!("bogus".parse::<PhoneRejection>().is_err());
    }

    #[test]
    fn test_from_validated() {
        let number = PhoneNumber::from_validated(" +32470123456 ", Some("be"));
        assert_eq!(number.as_str(), "+32470123456");
        assert_eq!(number.region(), Some("BE"));
    }

    #[test]
    fn test_empty_input_message() {
        assert_eq!(
            PhoneRejection::Empty.message_key(),
            MessageKey::ErrorPhoneNumberFormat
        );
    }
}
