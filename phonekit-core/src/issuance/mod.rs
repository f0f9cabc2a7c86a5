//! Handoff of a verified phone number to a credential issuance session.
//!
//! ```rust,ignore
//! let issuance = ServerIssuance::new(|pointer: &SessionPointer, _locale: Locale| {
//!     show_qr(&pointer.url);
//! });
//!
//! let outcome = issuance
//!     .issue(&token, &IssuanceOptions { server, locale })
//!     .await;
//! ```

use std::fmt;
use std::future::Future;

use secrecy::{ExposeSecret, SecretString};

use crate::{Locale, MessageKey, Severity};

mod server;

pub use server::{ServerIssuance, SessionPackage, SessionPointer, SessionPresenter, SessionStatus};

/// Signed session request (a JWT) returned by the verify endpoint.
///
/// It is forwarded verbatim and never inspected on the client.
pub struct SessionToken(SecretString);

impl SessionToken {
    /// Wraps the raw token.
    #[must_use]
    pub fn new(token: String) -> Self {
        Self(SecretString::from(token))
    }

    /// The raw token.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken([REDACTED])")
    }
}

/// Where and how the issuance session is run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuanceOptions {
    /// Address of the issuance server.
    pub server: String,
    /// Language the wallet prompts are shown in.
    pub locale: Locale,
}

/// How an issuance session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssuanceOutcome {
    /// The credential was added to the wallet.
    Success,
    /// The user declined in the wallet.
    Cancelled,
    /// The session expired before the user finished.
    Timeout,
    /// Anything else went wrong.
    Failed(String),
}

impl IssuanceOutcome {
    /// Status shown to the user for this outcome.
    ///
    /// Cancellation and timeout are informational, only a failure is an error.
    #[must_use]
    pub const fn status(&self) -> (Severity, MessageKey) {
        match self {
            Self::Success => (Severity::Success, MessageKey::PhoneAddSuccess),
            Self::Cancelled => (Severity::Info, MessageKey::PhoneAddCancel),
            Self::Timeout => (Severity::Info, MessageKey::PhoneAddTimeout),
            Self::Failed(_) => (Severity::Danger, MessageKey::PhoneAddError),
        }
    }
}

/// Starts a credential issuance session with a session token.
///
/// The flow controller awaits the outcome only to show it; it never retries.
pub trait IssuanceHandoff {
    /// Runs the issuance session for `token` until it ends.
    fn issue(
        &self,
        token: &SessionToken,
        options: &IssuanceOptions,
    ) -> impl Future<Output = IssuanceOutcome>;
}
