//! The verification flow: phone number, optional confirmation, SMS code, issuance.
//!
//! [`FlowController`] owns everything the widget shows. Hosts call the operation matching
//! the user's action and render [`FlowController::view`] afterwards. Operations take
//! `&mut self`, so at most one request is in flight per controller. Hosts that need to show
//! the pending states of a running request register a [`FlowObserver`].

use serde::{Deserialize, Serialize};

use crate::{
    ApiFailure, BackAction, IssuanceHandoff, IssuanceOptions, MessageKey, MessageTable,
    PhoneKitError, PhoneNumber, PhoneValidator, Severity, StatusMessage, StatusRegion, Step,
    VerificationApi, VerificationCode, VerifyLink, ViewModel, WidgetConfig,
};

/// Progress of the current verification attempt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VerificationAttempt {
    /// No code was requested for the current number yet.
    #[default]
    NotSent,
    /// A code was sent and may be submitted.
    Sent,
    /// The code was accepted.
    Verified,
    /// The last submitted code was refused.
    Failed,
}

/// Receives the view whenever the flow changes.
///
/// Called while an operation runs, so the pending statuses (`sending-sms`,
/// `verifying-token`, `issuing-credential`) and the disabled forms reach the host before the
/// request completes.
pub trait FlowObserver {
    /// Renders `view`.
    fn render(&self, view: &ViewModel);
}

impl<F> FlowObserver for F
where
    F: Fn(&ViewModel),
{
    fn render(&self, view: &ViewModel) {
        self(view);
    }
}

/// State machine behind the verification widget.
pub struct FlowController<A, I, V> {
    config: WidgetConfig,
    messages: &'static MessageTable,
    api: A,
    issuance: I,
    validator: V,
    step: Step,
    back: BackAction,
    button: Option<MessageKey>,
    phone: Option<PhoneNumber>,
    attempt: VerificationAttempt,
    phone_input: String,
    code_input: String,
    phone_disabled: bool,
    code_disabled: bool,
    status: StatusRegion,
    observer: Option<Box<dyn FlowObserver>>,
}

impl<A, I, V> FlowController<A, I, V>
where
    A: VerificationApi,
    I: IssuanceHandoff,
    V: PhoneValidator,
{
    /// Creates a controller on the phone step.
    pub fn new(config: WidgetConfig, api: A, issuance: I, validator: V) -> Self {
        let mut flow = Self {
            messages: MessageTable::for_locale(config.locale),
            config,
            api,
            issuance,
            validator,
            step: Step::Phone,
            back: BackAction::Hidden,
            button: None,
            phone: None,
            attempt: VerificationAttempt::NotSent,
            phone_input: String::new(),
            code_input: String::new(),
            phone_disabled: false,
            code_disabled: false,
            status: StatusRegion::default(),
            observer: None,
        };
        flow.activate(Step::Phone);
        flow
    }

    /// Registers the observer that is handed every change of the view.
    ///
    /// Replaces an earlier observer.
    pub fn set_observer(&mut self, observer: impl FlowObserver + 'static) {
        self.observer = Some(Box::new(observer));
    }

    /// Resumes the flow from the link in the verification SMS and submits its code.
    ///
    /// Returns `false`, without touching the flow, when `link` is not a verification link.
    ///
    /// # Errors
    /// See [`FlowController::submit_code`].
    pub async fn open_link(&mut self, link: &str) -> Result<bool, PhoneKitError> {
        let Some(link) = VerifyLink::parse(link) else {
            tracing::debug!("ignoring link without verification fragment");
            return Ok(false);
        };
        tracing::info!("resuming verification from link");

        let phone = PhoneNumber::unchecked(&link.phone);
        self.phone_input = phone.as_str().to_string();
        self.phone = Some(phone);
        self.phone_disabled = true;
        self.attempt = VerificationAttempt::Sent;
        self.status.clear();
        self.activate(Step::Token);

        self.submit_code(&link.code).await?;
        Ok(true)
    }

    /// Submits the phone form.
    ///
    /// Invalid input shows a warning and makes no request. Valid input moves to the confirm
    /// step, or sends the code right away when no confirmation is configured.
    ///
    /// # Errors
    /// Returns [`PhoneKitError::InvalidTransition`] outside the phone step.
    pub async fn submit_phone(&mut self, raw: &str) -> Result<(), PhoneKitError> {
        self.expect_step(Step::Phone, "submit a phone number")?;
        raw.clone_into(&mut self.phone_input);

        let phone = match self.validator.validate(raw) {
            Ok(phone) => phone,
            Err(rejection) => {
                tracing::debug!("phone number refused: {rejection}");
                self.status
                    .set(Severity::Warning, self.messages.get(rejection.message_key()));
                self.publish();
                return Ok(());
            }
        };

        self.phone = Some(phone);
        self.attempt = VerificationAttempt::NotSent;

        if self.config.confirm_step {
            self.status.clear();
            self.activate(Step::Confirm);
            self.publish();
            Ok(())
        } else {
            self.send_code().await
        }
    }

    /// Confirms the number shown on the confirm step and sends the code.
    ///
    /// # Errors
    /// Returns [`PhoneKitError::InvalidTransition`] outside the confirm step.
    pub async fn confirm(&mut self) -> Result<(), PhoneKitError> {
        self.expect_step(Step::Confirm, "confirm")?;
        self.send_code().await
    }

    async fn send_code(&mut self) -> Result<(), PhoneKitError> {
        let phone = self.current_phone("send a code")?;

        self.phone_disabled = true;
        self.status
            .set(Severity::Info, self.messages.get(MessageKey::SendingSms));
        self.publish();

        match self.api.send_code(&phone, self.config.locale).await {
            Ok(dispatch) => {
                self.attempt = VerificationAttempt::Sent;
                self.code_input.clear();
                self.code_disabled = false;
                if self.config.announce_sent {
                    self.status.set(
                        Severity::Info,
                        self.messages.sms_sent(dispatch.sender.as_deref()),
                    );
                } else {
                    self.status.clear();
                }
                self.activate(Step::Token);
            }
            Err(failure) => {
                self.phone_disabled = false;
                self.activate(Step::Phone);
                self.status
                    .set(Severity::Danger, self.messages.failure(&failure));
            }
        }
        self.publish();
        Ok(())
    }

    /// Submits the code form and, once the code is accepted, runs the issuance handoff.
    ///
    /// The code is trimmed and uppercased. A refused code stays in the form.
    ///
    /// # Errors
    /// Returns [`PhoneKitError::InvalidTransition`] outside the code step.
    pub async fn submit_code(&mut self, raw: &str) -> Result<(), PhoneKitError> {
        self.expect_step(Step::Token, "submit a code")?;
        let phone = self.current_phone("submit a code")?;
        raw.clone_into(&mut self.code_input);

        let code = VerificationCode::normalize(raw);
        if code.is_empty() {
            self.status.set(
                Severity::Warning,
                self.messages.get(MessageKey::ErrorCannotValidateToken),
            );
            self.publish();
            return Ok(());
        }

        self.code_disabled = true;
        self.status
            .set(Severity::Info, self.messages.get(MessageKey::VerifyingToken));
        self.publish();

        let token = match self.api.verify_code(&phone, &code).await {
            Ok(token) => token,
            Err(failure) => {
                self.attempt = VerificationAttempt::Failed;
                self.code_disabled = false;
                let body = match failure {
                    ApiFailure::RateLimited { .. } => self.messages.rate_limited(None),
                    ApiFailure::Rejected(_) => self.messages.failure(&failure),
                };
                self.status.set(Severity::Danger, body);
                self.publish();
                return Ok(());
            }
        };

        self.attempt = VerificationAttempt::Verified;
        self.status
            .set(Severity::Info, self.messages.get(MessageKey::IssuingCredential));
        self.activate(Step::Done);
        self.publish();

        let options = IssuanceOptions {
            server: self.config.issuance_server.clone(),
            locale: self.config.locale,
        };
        let outcome = self.issuance.issue(&token, &options).await;
        tracing::info!("issuance ended: {outcome:?}");

        let (severity, key) = outcome.status();
        self.status.set(severity, self.messages.get(key));
        self.publish();
        Ok(())
    }

    /// Runs the back control of the current step.
    ///
    /// Navigation within the flow is applied here; [`BackAction::History`] is left to the
    /// host. Going back to the phone step drops the current attempt.
    pub fn back(&mut self) -> BackAction {
        let action = self.back;
        if let BackAction::Navigate(step) = action {
            if step == Step::Phone {
                self.reset_attempt();
            }
            self.activate(step);
            self.publish();
        }
        action
    }

    /// Starts over with an empty phone form.
    pub fn restart(&mut self) {
        self.phone = None;
        self.phone_input.clear();
        self.reset_attempt();
        self.activate(Step::Phone);
        self.publish();
    }

    /// The visible step.
    #[must_use]
    pub const fn step(&self) -> Step {
        self.step
    }

    /// Progress of the current attempt.
    #[must_use]
    pub const fn attempt(&self) -> VerificationAttempt {
        self.attempt
    }

    /// The validated phone number, once there is one.
    #[must_use]
    pub const fn phone(&self) -> Option<&PhoneNumber> {
        self.phone.as_ref()
    }

    /// Content of the status region.
    #[must_use]
    pub const fn status(&self) -> Option<&StatusMessage> {
        self.status.current()
    }

    /// Snapshot for rendering.
    #[must_use]
    pub fn view(&self) -> ViewModel {
        ViewModel {
            step: self.step,
            button_label: self.button.map(|key| self.messages.get(key).to_string()),
            back: self.back,
            status: self.status.current().cloned(),
            phone_input: self.phone_input.clone(),
            phone_disabled: self.phone_disabled,
            code_input: self.code_input.clone(),
            code_disabled: self.code_disabled,
            confirm_number: self.phone.as_ref().map(ToString::to_string),
        }
    }

    fn publish(&self) {
        if let Some(observer) = &self.observer {
            observer.render(&self.view());
        }
    }

    fn activate(&mut self, step: Step) {
        tracing::debug!("entering step {step}");
        self.step = step;
        self.button = match step {
            Step::Phone => Some(MessageKey::ButtonPhone),
            Step::Confirm => Some(MessageKey::ButtonConfirm),
            Step::Token => Some(MessageKey::ButtonToken),
            Step::Done => None,
        };
        self.back = match step {
            Step::Phone if self.config.history_available => BackAction::History,
            Step::Phone | Step::Done => BackAction::Hidden,
            Step::Confirm | Step::Token => BackAction::Navigate(Step::Phone),
        };
    }

    fn reset_attempt(&mut self) {
        self.attempt = VerificationAttempt::NotSent;
        self.code_input.clear();
        self.phone_disabled = false;
        self.code_disabled = false;
        self.status.clear();
    }

    fn expect_step(&self, expected: Step, action: &'static str) -> Result<(), PhoneKitError> {
        if self.step == expected {
            Ok(())
        } else {
            Err(PhoneKitError::InvalidTransition {
                action,
                step: self.step,
            })
        }
    }

    fn current_phone(&self, action: &'static str) -> Result<PhoneNumber, PhoneKitError> {
        self.phone
            .clone()
            .ok_or(PhoneKitError::InvalidTransition {
                action,
                step: self.step,
            })
    }
}
