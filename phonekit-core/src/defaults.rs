//! Default values for the widget configuration.

use std::time::Duration;

/// Base path of the verification API, relative to the page origin.
pub const API_BASE: &str = "/tomcat/irma_sms_issuer/api/";

/// Endpoint (relative to [`API_BASE`]) that dispatches the SMS code.
pub const SEND_ENDPOINT: &str = "send";

/// Endpoint (relative to [`API_BASE`]) that checks the SMS code and returns the session token.
pub const VERIFY_ENDPOINT: &str = "verify";

/// Issuance server the session token is presented to.
pub const ISSUANCE_SERVER: &str = "https://irma.example.org";

/// Asset path of the phone input widget's validation script.
pub const PHONE_UTILS_PATH: &str = "assets/telwidget/js/utils.js";

/// Region assumed for national numbers (without a `+` prefix).
pub const DEFAULT_REGION: &str = "NL";

/// Regions whose mobile numbers can be verified.
pub const ALLOWED_REGIONS: [&str; 33] = [
    "AT", "BE", "BG", "CY", "CZ", "DE", "DK", "EE", "ES", "FI", "FR", "GB", "GR", "HR",
    "HU", "IE", "IS", "IT", "LI", "LT", "LU", "LV", "MC", "MT", "NL", "NO", "PL", "PT",
    "RO", "SE", "SI", "SK", "CH",
];

/// Delay between two issuance session status requests.
pub const SESSION_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Number of status requests before an issuance session is considered timed out.
///
/// Issuance sessions started by the verify endpoint expire after two minutes on the server,
/// the client gives up a bit later.
pub const SESSION_POLL_MAX: u32 = 150;

/// Maps a region code to its international calling code.
///
/// Only covers the regions in [`ALLOWED_REGIONS`].
#[must_use]
pub fn calling_code(region: &str) -> Option<&'static str> {
    let code = match region.to_ascii_uppercase().as_str() {
        "AT" => "43",
        "BE" => "32",
        "BG" => "359",
        "CY" => "357",
        "CZ" => "420",
        "DE" => "49",
        "DK" => "45",
        "EE" => "372",
        "ES" => "34",
        "FI" => "358",
        "FR" => "33",
        "GB" => "44",
        "GR" => "30",
        "HR" => "385",
        "HU" => "36",
        "IE" => "353",
        "IS" => "354",
        "IT" => "39",
        "LI" => "423",
        "LT" => "370",
        "LU" => "352",
        "LV" => "371",
        "MC" => "377",
        "MT" => "356",
        "NL" => "31",
        "NO" => "47",
        "PL" => "48",
        "PT" => "351",
        "RO" => "40",
        "SE" => "46",
        "SI" => "386",
        "SK" => "421",
        "CH" => "41",
        _ => return None,
    };
    Some(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_allowed_region_has_a_calling_code() {
        for region in ALLOWED_REGIONS {
            assert!(calling_code(region).is_some(), "missing {region}");
        }
    }

    #[test]
    fn test_calling_code_is_case_insensitive() {
        assert_eq!(calling_code("nl"), Some("31"));
        assert_eq!(calling_code("US"), None);
    }
}
