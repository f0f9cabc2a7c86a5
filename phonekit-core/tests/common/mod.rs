//! Common test utilities shared across integration tests.

use std::cell::RefCell;
use std::rc::Rc;

use phonekit_core::{
    FlowController, HttpVerificationApi, IssuanceHandoff, IssuanceOptions, IssuanceOutcome,
    RegionValidator, SessionToken, WidgetConfig,
};
use tracing_subscriber::EnvFilter;

/// Issuance handoff that records the tokens it receives.
pub struct RecordingIssuance {
    outcome: IssuanceOutcome,
    tokens: Rc<RefCell<Vec<String>>>,
}

impl RecordingIssuance {
    pub fn new(outcome: IssuanceOutcome) -> Self {
        Self {
            outcome,
            tokens: Rc::default(),
        }
    }

    /// Handle to the tokens received so far, usable after the flow took ownership.
    pub fn tokens(&self) -> Rc<RefCell<Vec<String>>> {
        Rc::clone(&self.tokens)
    }
}

impl IssuanceHandoff for RecordingIssuance {
    async fn issue(&self, token: &SessionToken, _options: &IssuanceOptions) -> IssuanceOutcome {
        self.tokens.borrow_mut().push(token.expose().to_string());
        self.outcome.clone()
    }
}

pub type TestFlow = FlowController<HttpVerificationApi, RecordingIssuance, RegionValidator>;

/// Configuration pointing the verification API at a mock server.
pub fn config_for(server_url: &str) -> WidgetConfig {
    WidgetConfig {
        api_base: format!("{server_url}/api/"),
        ..WidgetConfig::default()
    }
}

pub fn flow_for(server_url: &str) -> (TestFlow, Rc<RefCell<Vec<String>>>) {
    let config = config_for(server_url);
    let issuance = RecordingIssuance::new(IssuanceOutcome::Success);
    let tokens = issuance.tokens();
    let flow = FlowController::new(
        config.clone(),
        HttpVerificationApi::new(&config),
        issuance,
        RegionValidator::from_config(&config),
    );
    (flow, tokens)
}

pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init()
        .ok();
}
