//! Localized message table.
//!
//! Every user-visible text of the widget is looked up here by [`MessageKey`]. The table
//! is chosen once per locale and never changes afterwards. Templates may contain the
//! placeholders `%n%` (a number), `%time%` (a rendered wait duration) and `%number%`
//! (the phone number the SMS is sent from).

use std::collections::HashMap;
use std::sync::LazyLock;

use strum::{AsRefStr, Display, EnumIter, EnumString};

use crate::{ApiFailure, ErrorCode, Locale, RetryWindow, WaitUnit};

mod en;
mod nl;

/// Key of a message template.
///
/// The string form matches the keys used by the widget's page scripts, e.g. `sms-sent`
/// or `error:ratelimit`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, Display, EnumIter, EnumString,
)]
#[strum(serialize_all = "kebab-case")]
pub enum MessageKey {
    /// Status while the send request is pending.
    SendingSms,
    /// Status after the SMS went out.
    SmsSent,
    /// Status after the SMS went out, naming the sender number.
    SmsSentFrom,
    /// Status while the verify request is pending.
    VerifyingToken,
    /// Status while the issuance session runs.
    IssuingCredential,
    /// Primary button on the phone step.
    ButtonPhone,
    /// Primary button on the confirm step.
    ButtonConfirm,
    /// Primary button on the code step.
    ButtonToken,
    /// Wait duration of exactly one second.
    Second,
    /// Wait duration in seconds, `%n%` is the count.
    Seconds,
    /// Wait duration of exactly one minute.
    Minute,
    /// Wait duration in minutes.
    Minutes,
    /// Wait duration of exactly one hour.
    Hour,
    /// Wait duration in hours.
    Hours,
    /// Wait duration used when the backend did not say how long to wait.
    RetryLater,
    /// Issuance finished.
    PhoneAddSuccess,
    /// Issuance session expired.
    PhoneAddTimeout,
    /// Issuance cancelled by the user.
    PhoneAddCancel,
    /// Issuance failed.
    PhoneAddError,
    /// The entered number is not a valid mobile number.
    #[strum(serialize = "error:phone-number-format")]
    ErrorPhoneNumberFormat,
    /// Unexpected backend or transport failure.
    #[strum(serialize = "error:internal")]
    ErrorInternal,
    /// The backend could not send the SMS.
    #[strum(serialize = "error:sending-sms")]
    ErrorSendingSms,
    /// Too many requests, `%time%` is the wait duration.
    #[strum(serialize = "error:ratelimit")]
    ErrorRatelimit,
    /// The code does not match.
    #[strum(serialize = "error:cannot-validate-token")]
    ErrorCannotValidateToken,
    /// The backend rejected the phone number.
    #[strum(serialize = "error:address-malformed")]
    ErrorAddressMalformed,
}

/// The message templates of one locale.
#[derive(Debug)]
pub struct MessageTable {
    entries: HashMap<MessageKey, &'static str>,
}

static EN: LazyLock<MessageTable> =
    LazyLock::new(|| MessageTable::build(en::MESSAGES));
static NL: LazyLock<MessageTable> =
    LazyLock::new(|| MessageTable::build(nl::MESSAGES));

impl MessageTable {
    fn build(messages: &'static [(MessageKey, &'static str)]) -> Self {
        Self {
            entries: messages.iter().copied().collect(),
        }
    }

    /// Returns the table of `locale`.
    #[must_use]
    pub fn for_locale(locale: Locale) -> &'static Self {
        match locale {
            Locale::En => &EN,
            Locale::Nl => &NL,
        }
    }

    /// Returns the raw template of `key`.
    ///
    /// Falls back to the English template, and to the key itself if even that is missing.
    #[must_use]
    pub fn get(&self, key: MessageKey) -> &'static str {
        self.entries
            .get(&key)
            .or_else(|| EN.entries.get(&key))
            .copied()
            .unwrap_or_else(|| {
                tracing::warn!("missing message template {key}");
                match key {
                    MessageKey::ErrorInternal => "error:internal",
                    _ => EN.get(MessageKey::ErrorInternal),
                }
            })
    }

    /// The message shown for a backend error code.
    #[must_use]
    pub fn error(&self, code: ErrorCode) -> String {
        self.get(code.message_key()).to_string()
    }

    /// Renders a wait duration, e.g. `2 minutes`.
    ///
    /// The singular template is picked only when the rounded value is exactly one.
    #[must_use]
    pub fn wait_time(&self, window: RetryWindow) -> String {
        let (value, unit) = window.scaled();
        let key = match (unit, value == 1) {
            (WaitUnit::Seconds, true) => MessageKey::Second,
            (WaitUnit::Seconds, false) => MessageKey::Seconds,
            (WaitUnit::Minutes, true) => MessageKey::Minute,
            (WaitUnit::Minutes, false) => MessageKey::Minutes,
            (WaitUnit::Hours, true) => MessageKey::Hour,
            (WaitUnit::Hours, false) => MessageKey::Hours,
        };
        self.get(key).replace("%n%", &value.to_string())
    }

    /// The rate limit message, with the wait duration when the backend provided one.
    #[must_use]
    pub fn rate_limited(&self, retry_after: Option<RetryWindow>) -> String {
        let time = retry_after.map_or_else(
            || self.get(MessageKey::RetryLater).to_string(),
            |window| self.wait_time(window),
        );
        self.get(MessageKey::ErrorRatelimit).replace("%time%", &time)
    }

    /// The message shown for a failed send or verify request.
    #[must_use]
    pub fn failure(&self, failure: &ApiFailure) -> String {
        match failure {
            ApiFailure::RateLimited { retry_after } => self.rate_limited(*retry_after),
            ApiFailure::Rejected(code) => self.error(*code),
        }
    }

    /// The confirmation shown after the SMS went out.
    #[must_use]
    pub fn sms_sent(&self, sender: Option<&str>) -> String {
        match sender {
            Some(number) => self.get(MessageKey::SmsSentFrom).replace("%number%", number),
            None => self.get(MessageKey::SmsSent).to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;
    use test_case::test_case;

    #[test]
    fn test_every_locale_defines_every_key() {
        for locale in Locale::iter() {
            let table = MessageTable::for_locale(locale);
            for key in MessageKey::iter() {
                assert!(
                    table.entries.contains_key(&key),
                    "{locale} is missing {key}"
                );
            }
        }
    }

    #[test]
    fn test_key_strings() {
        assert_eq!(MessageKey::SmsSent.as_ref(), "sms-sent");
        assert_eq!(MessageKey::PhoneAddSuccess.as_ref(), "phone-add-success");
        assert_eq!(MessageKey::ErrorRatelimit.as_ref(), "error:ratelimit");
        assert_eq!(
            "error:cannot-validate-token".parse::<MessageKey>().unwrap(),
            MessageKey::ErrorCannotValidateToken
        );
    }

    #[test_case(1 => "1 second")]
    #[test_case(59 => "59 seconds")]
    #[test_case(60 => "1 minute")]
    #[test_case(119 => "2 minutes")]
    #[test_case(3600 => "1 hour")]
    #[test_case(7199 => "2 hours")]
    fn test_wait_time_en(seconds: u64) -> String {
        MessageTable::for_locale(Locale::En).wait_time(RetryWindow::from_secs(seconds))
    }

    #[test_case(1 => "1 seconde")]
    #[test_case(45 => "45 seconden")]
    #[test_case(60 => "1 minuut")]
    #[test_case(7199 => "2 uur")]
    fn test_wait_time_nl(seconds: u64) -> String {
        MessageTable::for_locale(Locale::Nl).wait_time(RetryWindow::from_secs(seconds))
    }

    #[test]
    fn test_rate_limited() {
        let table = MessageTable::for_locale(Locale::En);
        assert_eq!(
            table.rate_limited(Some(RetryWindow::from_secs(45))),
            "Please try again in 45 seconds."
        );
        assert_eq!(table.rate_limited(None), "Please try again in a moment.");
    }

    #[test]
    fn test_rate_limited_huge_retry_after() {
        let table = MessageTable::for_locale(Locale::En);
        let window = RetryWindow::from_header("18446744073709551615").unwrap();
        assert_eq!(
            table.rate_limited(Some(window)),
            "Please try again in 5124095576030431 hours."
        );
    }

    #[test]
    fn test_failure_messages() {
        let table = MessageTable::for_locale(Locale::En);
        assert_eq!(
            table.failure(&ApiFailure::Rejected(ErrorCode::CannotValidateToken)),
            "The code cannot be verified. Is there a typo?"
        );
        assert_eq!(
            table.failure(&ApiFailure::RateLimited {
                retry_after: Some(RetryWindow::from_secs(3600))
            }),
            "Please try again in 1 hour."
        );
    }

    #[test]
    fn test_sms_sent() {
        let table = MessageTable::for_locale(Locale::Nl);
        assert_eq!(table.sms_sent(None), "SMS-bericht is verstuurd.");
        assert_eq!(
            table.sms_sent(Some("+3197012345678")),
            "Code is verstuurd! U krijgt een bericht van nummer +3197012345678."
        );
    }
}
