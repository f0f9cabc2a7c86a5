use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Severity of a status message, maps onto the alert styles of the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Something completed.
    Success,
    /// Progress or an outcome that needs no action.
    Info,
    /// The user has to correct their input.
    Warning,
    /// A request failed.
    Danger,
}

/// A message in the status region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusMessage {
    /// How the message is styled.
    pub severity: Severity,
    /// The rendered text.
    pub body: String,
}

/// The single status region of the widget.
///
/// Every update replaces the previous message in full.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusRegion {
    current: Option<StatusMessage>,
}

impl StatusRegion {
    /// Shows `body` with `severity`.
    pub fn set(&mut self, severity: Severity, body: impl Into<String>) {
        let message = StatusMessage {
            severity,
            body: body.into(),
        };
        tracing::debug!("status {}: {}", message.severity, message.body);
        self.current = Some(message);
    }

    /// Hides the status region.
    pub fn clear(&mut self) {
        self.current = None;
    }

    /// The message currently shown.
    #[must_use]
    pub const fn current(&self) -> Option<&StatusMessage> {
        self.current.as_ref()
    }
}
