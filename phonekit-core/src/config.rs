use std::time::Duration;

use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::{defaults, error::PhoneKitError, Locale};

/// Page-level configuration of the verification widget.
///
/// Every field has a default, so a host page only has to provide what differs, e.g.
///
/// ```json
/// { "api_base": "/api/", "issuance_server": "https://irma.example.org", "locale": "nl" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetConfig {
    /// Base path (or absolute URL) of the verification API.
    pub api_base: String,
    /// Name of the send endpoint below `api_base`.
    pub send_endpoint: String,
    /// Name of the verify endpoint below `api_base`.
    pub verify_endpoint: String,
    /// Address of the issuance server the session token is presented to.
    pub issuance_server: String,
    /// Active locale, selects the message table.
    pub locale: Locale,
    /// Asset path of the phone input widget's validation script.
    ///
    /// Not used by the flow itself; handed back to the page (`PhoneWidget.phoneUtilsPath`),
    /// which loads the script for its `validate` handler.
    pub phone_utils_path: String,
    /// Region assumed for numbers entered without an international prefix.
    pub default_region: String,
    /// Regions whose numbers are accepted.
    pub allowed_regions: Vec<String>,
    /// Whether the user confirms the normalized number before the SMS is sent.
    pub confirm_step: bool,
    /// Whether a "sent" confirmation is shown after the SMS went out.
    pub announce_sent: bool,
    /// Whether the host can navigate back through the browser history.
    pub history_available: bool,
    /// Delay between issuance session status requests, in milliseconds.
    pub session_poll_interval_ms: u64,
    /// Number of issuance session status requests before giving up.
    pub session_poll_max: u32,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            api_base: defaults::API_BASE.to_string(),
            send_endpoint: defaults::SEND_ENDPOINT.to_string(),
            verify_endpoint: defaults::VERIFY_ENDPOINT.to_string(),
            issuance_server: defaults::ISSUANCE_SERVER.to_string(),
            locale: Locale::default(),
            phone_utils_path: defaults::PHONE_UTILS_PATH.to_string(),
            default_region: defaults::DEFAULT_REGION.to_string(),
            allowed_regions: defaults::ALLOWED_REGIONS
                .iter()
                .map(ToString::to_string)
                .collect(),
            confirm_step: true,
            announce_sent: true,
            history_available: false,
            session_poll_interval_ms: u64::try_from(
                defaults::SESSION_POLL_INTERVAL.as_millis(),
            )
            .unwrap_or(u64::MAX),
            session_poll_max: defaults::SESSION_POLL_MAX,
        }
    }
}

impl WidgetConfig {
    /// Parses and validates a JSON configuration object.
    ///
    /// # Errors
    /// Returns [`PhoneKitError::InvalidConfig`] if the JSON is malformed or a value is
    /// inconsistent (see [`WidgetConfig::validate`]).
    pub fn from_json(json: &str) -> Result<Self, PhoneKitError> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| PhoneKitError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the values that cannot be expressed in the types.
    ///
    /// # Errors
    /// Returns [`PhoneKitError::InvalidConfig`] naming the first offending field.
    pub fn validate(&self) -> Result<(), PhoneKitError> {
        if self.api_base.trim().is_empty() {
            return Err(PhoneKitError::InvalidConfig("api_base is empty".to_string()));
        }
        if self.issuance_server.trim().is_empty() {
            return Err(PhoneKitError::InvalidConfig(
                "issuance_server is empty".to_string(),
            ));
        }
        if defaults::calling_code(&self.default_region).is_none() {
            return Err(PhoneKitError::InvalidConfig(format!(
                "unknown default_region {}",
                self.default_region
            )));
        }
        if let Some(region) = self
            .allowed_regions
            .iter()
            .find(|region| defaults::calling_code(region).is_none())
        {
            return Err(PhoneKitError::InvalidConfig(format!(
                "unknown region {region} in allowed_regions"
            )));
        }
        if self.session_poll_max == 0 {
            return Err(PhoneKitError::InvalidConfig(
                "session_poll_max must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Makes a relative `api_base` absolute against the URL of the page hosting the widget.
    ///
    /// Resolution follows the rules of links on that page: `/api/` starts at the site root,
    /// `api/` at the directory of the page. An absolute `api_base` is kept.
    ///
    /// # Errors
    /// Returns [`PhoneKitError::InvalidConfig`] if `page_url` is not an absolute URL or the
    /// base cannot be resolved against it.
    pub fn resolve_api_base(&mut self, page_url: &str) -> Result<(), PhoneKitError> {
        if Url::parse(&self.api_base).is_ok() {
            return Ok(());
        }
        let page = Url::parse(page_url).map_err(|e| {
            PhoneKitError::InvalidConfig(format!("invalid page URL {page_url}: {e}"))
        })?;
        let resolved = page.join(&self.api_base).map_err(|e| {
            PhoneKitError::InvalidConfig(format!("cannot resolve api_base {}: {e}", self.api_base))
        })?;
        self.api_base = resolved.to_string();
        Ok(())
    }

    /// Full URL of the send endpoint.
    #[must_use]
    pub fn send_url(&self) -> String {
        join_url(&self.api_base, &self.send_endpoint)
    }

    /// Full URL of the verify endpoint.
    #[must_use]
    pub fn verify_url(&self) -> String {
        join_url(&self.api_base, &self.verify_endpoint)
    }

    /// Delay between issuance session status requests.
    #[must_use]
    pub const fn session_poll_interval(&self) -> Duration {
        Duration::from_millis(self.session_poll_interval_ms)
    }
}

fn join_url(base: &str, endpoint: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        endpoint.trim_start_matches('/')
    )
}
