//! Client for the verification backend: sends the SMS code and exchanges it for a session
//! token.
//!
//! Both endpoints take a form body and answer in plain text. Failures carry a body of the
//! form `error:<code>`, which is decoded once here into an [`ApiFailure`].

use std::fmt;
use std::future::Future;

use reqwest::header::RETRY_AFTER;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use crate::{
    http_request::Request, issuance::SessionToken, Locale, MessageKey, PhoneNumber,
    RetryWindow, WidgetConfig,
};

/// Prefix of every error body returned by the verification backend.
const ERROR_PREFIX: &str = "error:";

/// Prefix of the send endpoint's success body, followed by the SMS sender number.
const OK_PREFIX: &str = "OK:";

/// Error codes the verification backend may answer with.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    AsRefStr,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum ErrorCode {
    /// Anything the client does not understand.
    Internal,
    /// The SMS gateway refused the message.
    SendingSms,
    /// Too many codes were requested for this number or client.
    #[strum(serialize = "ratelimit")]
    #[serde(rename = "ratelimit")]
    RateLimit,
    /// The code does not match or has expired.
    CannotValidateToken,
    /// The phone number could not be parsed.
    PhoneNumberFormat,
    /// The phone number is not supported.
    AddressMalformed,
}

impl ErrorCode {
    /// Decodes an error body. Unknown or missing codes become [`ErrorCode::Internal`].
    #[must_use]
    pub fn from_body(body: &str) -> Self {
        body.trim()
            .strip_prefix(ERROR_PREFIX)
            .and_then(|code| code.parse().ok())
            .unwrap_or(Self::Internal)
    }

    /// Message shown to the user for this code.
    #[must_use]
    pub const fn message_key(self) -> MessageKey {
        match self {
            Self::Internal => MessageKey::ErrorInternal,
            Self::SendingSms => MessageKey::ErrorSendingSms,
            Self::RateLimit => MessageKey::ErrorRatelimit,
            Self::CannotValidateToken => MessageKey::ErrorCannotValidateToken,
            Self::PhoneNumberFormat => MessageKey::ErrorPhoneNumberFormat,
            Self::AddressMalformed => MessageKey::ErrorAddressMalformed,
        }
    }
}

/// A failed send or verify request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiFailure {
    /// The backend refused the request (or never answered, see [`ErrorCode::Internal`]).
    Rejected(ErrorCode),
    /// Too many requests; the backend may say how long to wait.
    RateLimited {
        /// Parsed `Retry-After` header.
        retry_after: Option<RetryWindow>,
    },
}

impl ApiFailure {
    /// Decodes the body and `Retry-After` header of a failed response.
    #[must_use]
    pub fn decode(body: &str, retry_after: Option<&str>) -> Self {
        match ErrorCode::from_body(body) {
            ErrorCode::RateLimit => Self::RateLimited {
                retry_after: retry_after.and_then(RetryWindow::from_header),
            },
            code => Self::Rejected(code),
        }
    }

    /// The error code behind this failure.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Rejected(code) => *code,
            Self::RateLimited { .. } => ErrorCode::RateLimit,
        }
    }
}

impl fmt::Display for ApiFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{ERROR_PREFIX}{}", self.code())
    }
}

/// Result of a successful send request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmsDispatch {
    /// Number the SMS is sent from, when the backend tells.
    pub sender: Option<String>,
}

impl SmsDispatch {
    /// Decodes the success body of the send endpoint (`OK:<number>`).
    ///
    /// Any other body is accepted as a success without a sender.
    #[must_use]
    pub fn from_body(body: &str) -> Self {
        let sender = body
            .trim()
            .strip_prefix(OK_PREFIX)
            .map(str::trim)
            .filter(|number| !number.is_empty())
            .map(ToString::to_string);
        Self { sender }
    }
}

/// The code the user received by SMS, normalized for submission.
pub struct VerificationCode(SecretString);

impl VerificationCode {
    /// Trims and uppercases user input.
    #[must_use]
    pub fn normalize(raw: &str) -> Self {
        Self(SecretString::from(raw.trim().to_uppercase()))
    }

    /// Whether nothing but whitespace was entered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.expose_secret().is_empty()
    }

    /// The normalized code.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl fmt::Debug for VerificationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("VerificationCode([REDACTED])")
    }
}

/// The verification backend.
pub trait VerificationApi {
    /// Asks the backend to send an SMS code to `phone`, written in `locale`.
    fn send_code(
        &self,
        phone: &PhoneNumber,
        locale: Locale,
    ) -> impl Future<Output = Result<SmsDispatch, ApiFailure>>;

    /// Exchanges the SMS code for a session token.
    fn verify_code(
        &self,
        phone: &PhoneNumber,
        code: &VerificationCode,
    ) -> impl Future<Output = Result<SessionToken, ApiFailure>>;
}

/// [`VerificationApi`] over HTTP.
#[derive(Debug, Clone)]
pub struct HttpVerificationApi {
    send_url: String,
    verify_url: String,
    request: Request,
}

impl HttpVerificationApi {
    /// Creates a client for the endpoints named in `config`.
    ///
    /// Outside the browser `api_base` has to be an absolute URL.
    #[must_use]
    pub fn new(config: &WidgetConfig) -> Self {
        Self {
            send_url: config.send_url(),
            verify_url: config.verify_url(),
            request: Request::new(),
        }
    }

    /// Posts a form and returns the success body, or the decoded failure.
    ///
    /// `Retry-After` is only honored when `read_retry_after` is set.
    async fn post_form(
        &self,
        url: &str,
        form: &[(&str, &str)],
        read_retry_after: bool,
    ) -> Result<String, ApiFailure> {
        let request_builder = self.request.post(url).form(form);
        let response = self.request.handle(request_builder).await.map_err(|err| {
            tracing::error!("request to {url} failed: {err}");
            ApiFailure::Rejected(ErrorCode::Internal)
        })?;

        let status = response.status();
        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|value| value.to_str().ok())
            .map(ToString::to_string);

        let body = response.text().await.map_err(|err| {
            tracing::error!("failed to read response from {url}: {err}");
            ApiFailure::Rejected(ErrorCode::Internal)
        })?;

        if status.is_success() {
            return Ok(body);
        }

        let failure = ApiFailure::decode(
            &body,
            retry_after.as_deref().filter(|_| read_retry_after),
        );
        tracing::warn!("{url} answered {status}: {failure}");
        Err(failure)
    }
}

impl VerificationApi for HttpVerificationApi {
    async fn send_code(
        &self,
        phone: &PhoneNumber,
        locale: Locale,
    ) -> Result<SmsDispatch, ApiFailure> {
        let form = [
            ("phone", phone.as_str()),
            ("language", locale.language_code()),
        ];
        let body = self.post_form(&self.send_url, &form, true).await?;
        tracing::info!("SMS code sent to {}", phone.masked());
        Ok(SmsDispatch::from_body(&body))
    }

    async fn verify_code(
        &self,
        phone: &PhoneNumber,
        code: &VerificationCode,
    ) -> Result<SessionToken, ApiFailure> {
        let form = [("phone", phone.as_str()), ("token", code.expose())];
        let body = self.post_form(&self.verify_url, &form, false).await?;
        tracing::info!("SMS code verified for {}", phone.masked());
        Ok(SessionToken::new(body))
    }
}
