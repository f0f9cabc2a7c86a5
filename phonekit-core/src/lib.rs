//! `phonekit-core` drives a phone number verification widget.
//!
//! The user enters a phone number, receives an SMS with a one-time code and submits
//! that code. When the backend accepts the code it answers with a signed session
//! token which is handed to an issuance client that adds the phone number credential
//! to the user's wallet.
//!
//! ```rust,ignore
//! let config = WidgetConfig::from_json(page_config)?;
//! let mut flow = FlowController::new(
//!     config.clone(),
//!     HttpVerificationApi::new(&config),
//!     ServerIssuance::new(presenter),
//!     RegionValidator::from_config(&config),
//! );
//!
//! flow.submit_phone("+31612345678").await?;
//! flow.submit_code("abc123").await?;
//! render(flow.view());
//! ```
#![deny(clippy::all, clippy::pedantic, clippy::nursery)]
// Collaborators are generic and may be `!Send` (browser futures).
#![allow(clippy::future_not_send)]

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Languages with a bundled message table.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    EnumString,
    Display,
    Serialize,
    Deserialize,
    strum::EnumIter,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// English
    #[default]
    En,
    /// Dutch
    Nl,
}

impl Locale {
    /// The language code sent along with the send request so the SMS is written in the same
    /// language as the page.
    #[must_use]
    pub const fn language_code(&self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Nl => "nl",
        }
    }
}

mod config;
pub use config::*;

pub mod defaults;

mod deeplink;
pub use deeplink::*;

pub mod error;
pub use error::*;

mod flow;
pub use flow::*;

mod http_request;

pub mod issuance;
pub use issuance::{IssuanceHandoff, IssuanceOptions, IssuanceOutcome, SessionToken};

pub mod logger;

pub mod messages;
pub use messages::{MessageKey, MessageTable};

mod phone;
pub use phone::*;

mod retry_window;
pub use retry_window::*;

mod status;
pub use status::*;

mod verification;
pub use verification::*;

mod view;
pub use view::*;
