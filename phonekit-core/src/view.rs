use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::StatusMessage;

/// Step of the verification flow. Exactly one step is shown at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Step {
    /// Entering the phone number.
    Phone,
    /// Confirming the normalized phone number before the SMS is sent.
    Confirm,
    /// Entering the code from the SMS.
    Token,
    /// Code accepted, issuance handed off.
    Done,
}

/// What the back control does in the current step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "step", rename_all = "lowercase")]
pub enum BackAction {
    /// Go to an earlier step of the flow.
    Navigate(Step),
    /// Leave the widget through the browser history.
    History,
    /// The back control is hidden.
    Hidden,
}

/// Snapshot of everything the host renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewModel {
    /// The visible step.
    pub step: Step,
    /// Label of the primary button, none in [`Step::Done`].
    pub button_label: Option<String>,
    /// Behavior of the back control.
    pub back: BackAction,
    /// Status region content.
    pub status: Option<StatusMessage>,
    /// Value of the phone input.
    pub phone_input: String,
    /// Whether the phone form is disabled.
    pub phone_disabled: bool,
    /// Value of the code input.
    pub code_input: String,
    /// Whether the code form is disabled.
    pub code_disabled: bool,
    /// The normalized number shown on the confirm step.
    pub confirm_number: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_back_action_json() {
        assert_eq!(
            serde_json::to_string(&BackAction::Navigate(Step::Phone)).unwrap(),
            r#"{"kind":"navigate","step":"phone"}"#
        );
        assert_eq!(
            serde_json::to_string(&BackAction::Hidden).unwrap(),
            r#"{"kind":"hidden"}"#
        );
    }

    #[test]
    fn test_step_names() {
        assert_eq!(Step::Token.to_string(), "token");
        assert_eq!("confirm".parse::<Step>().unwrap(), Step::Confirm);
    }
}
