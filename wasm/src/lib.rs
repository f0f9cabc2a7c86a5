//! WebAssembly bindings for `phonekit_core`.
//!
//! Runs the verification flow inside the page hosting the widget. Rendering stays in
//! JavaScript: every operation resolves to a view model the page renders, and the optional
//! `render` handler receives the intermediate views while a request is pending.

#![deny(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::future_not_send)]

use std::rc::Rc;
use std::sync::Arc;

use js_sys::{Function, Promise, Reflect};
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, MutexGuard};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{future_to_promise, JsFuture};

use phonekit_core::issuance::{ServerIssuance, SessionPointer, SessionPresenter};
use phonekit_core::logger::{set_logger, LogLevel, Logger};
use phonekit_core::{
    BackAction, FlowController, HttpVerificationApi, IssuanceHandoff, IssuanceOptions,
    IssuanceOutcome, Locale, PhoneKitError, PhoneNumber, PhoneRejection, PhoneValidator,
    RegionValidator, SessionToken, VerifyLink, ViewModel, WidgetConfig,
};

type Flow = FlowController<HttpVerificationApi, Issuance, Validator>;

/// The verification widget of one page.
///
/// Operations run one at a time; calling another one while a request is pending rejects
/// with `busy`. Pages that show progress pass a `render` handler, which is called with
/// every change of the view, pending states included.
#[wasm_bindgen]
pub struct PhoneWidget {
    flow: Rc<Mutex<Flow>>,
    phone_utils_path: String,
}

#[wasm_bindgen]
impl PhoneWidget {
    /// Creates the widget from the page configuration and the page's handlers.
    ///
    /// # Errors
    /// Returns an error when the configuration is invalid or neither an `issue` nor a
    /// `present` handler is given.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str, handlers: &JsValue) -> Result<Self, JsValue> {
        let mut config =
            WidgetConfig::from_json(config_json).map_err(|err| error_to_jsvalue(&err))?;
        if let Some(href) = web_sys::window().and_then(|window| window.location().href().ok()) {
            config
                .resolve_api_base(&href)
                .map_err(|err| error_to_jsvalue(&err))?;
        }

        let issuance = match (handler(handlers, "issue")?, handler(handlers, "present")?) {
            (Some(issue), _) => Issuance::Wallet(issue),
            (None, Some(present)) => {
                Issuance::Server(ServerIssuance::from_config(&config, JsPresenter(present)))
            }
            (None, None) => {
                return Err(error_to_jsvalue(&PhoneKitError::InvalidConfig(
                    "either an issue or a present handler is required".to_string(),
                )))
            }
        };
        let validator = handler(handlers, "validate")?.map_or_else(
            || Validator::Region(RegionValidator::from_config(&config)),
            Validator::Page,
        );

        let render = handler(handlers, "render")?;

        let phone_utils_path = config.phone_utils_path.clone();
        let api = HttpVerificationApi::new(&config);
        let mut flow = FlowController::new(config, api, issuance, validator);
        if let Some(render) = render {
            flow.set_observer(move |view: &ViewModel| render_view(&render, view));
        }
        Ok(Self {
            flow: Rc::new(Mutex::new(flow)),
            phone_utils_path,
        })
    }

    /// Path of the phone input widget's validation script, as configured.
    #[must_use]
    #[wasm_bindgen(getter, js_name = phoneUtilsPath)]
    pub fn phone_utils_path(&self) -> String {
        self.phone_utils_path.clone()
    }

    /// Resumes from the verification link the page was opened with, if any, and removes
    /// the fragment from the address bar.
    ///
    /// Resolves to the view model, or `null` when the page was not opened from a link.
    #[wasm_bindgen(js_name = resumeFromLocation)]
    pub fn resume_from_location(&self) -> Promise {
        let Some(window) = web_sys::window() else {
            return Promise::resolve(&JsValue::NULL);
        };
        let location = window.location();
        let hash = location.hash().unwrap_or_default();
        if VerifyLink::parse(&hash).is_none() {
            return Promise::resolve(&JsValue::NULL);
        }

        if let Ok(history) = window.history() {
            let path = location.pathname().unwrap_or_default();
            let search = location.search().unwrap_or_default();
            if let Err(err) =
                history.replace_state_with_url(&JsValue::NULL, "", Some(&format!("{path}{search}")))
            {
                tracing::warn!("could not strip verification fragment: {err:?}");
            }
        }

        self.open_link(hash)
    }

    /// Resumes from a verification link and submits its code.
    ///
    /// Resolves to the view model, or `null` when `link` is not a verification link.
    #[wasm_bindgen(js_name = openLink)]
    pub fn open_link(&self, link: String) -> Promise {
        let flow = Rc::clone(&self.flow);
        future_to_promise(async move {
            let mut flow = lock(&flow)?;
            if flow.open_link(&link).await.map_err(|err| error_to_jsvalue(&err))? {
                view_to_jsvalue(&flow)
            } else {
                Ok(JsValue::NULL)
            }
        })
    }

    /// Submits the phone form. Resolves to the view model.
    #[wasm_bindgen(js_name = submitPhone)]
    pub fn submit_phone(&self, raw: String) -> Promise {
        let flow = Rc::clone(&self.flow);
        future_to_promise(async move {
            let mut flow = lock(&flow)?;
            flow.submit_phone(&raw)
                .await
                .map_err(|err| error_to_jsvalue(&err))?;
            view_to_jsvalue(&flow)
        })
    }

    /// Confirms the phone number and sends the code. Resolves to the view model.
    #[wasm_bindgen(js_name = confirm)]
    pub fn confirm(&self) -> Promise {
        let flow = Rc::clone(&self.flow);
        future_to_promise(async move {
            let mut flow = lock(&flow)?;
            flow.confirm().await.map_err(|err| error_to_jsvalue(&err))?;
            view_to_jsvalue(&flow)
        })
    }

    /// Submits the code form. Resolves to the view model once issuance ended.
    #[wasm_bindgen(js_name = submitCode)]
    pub fn submit_code(&self, raw: String) -> Promise {
        let flow = Rc::clone(&self.flow);
        future_to_promise(async move {
            let mut flow = lock(&flow)?;
            flow.submit_code(&raw)
                .await
                .map_err(|err| error_to_jsvalue(&err))?;
            view_to_jsvalue(&flow)
        })
    }

    /// Runs the back control and returns the view model.
    ///
    /// # Errors
    /// Returns `busy` while a request is pending.
    #[wasm_bindgen(js_name = back)]
    pub fn back(&self) -> Result<JsValue, JsValue> {
        let mut flow = lock(&self.flow)?;
        if flow.back() == BackAction::History {
            if let Some(history) = web_sys::window().and_then(|window| window.history().ok()) {
                history.back()?;
            }
        }
        view_to_jsvalue(&flow)
    }

    /// Starts over and returns the view model.
    ///
    /// # Errors
    /// Returns `busy` while a request is pending.
    #[wasm_bindgen(js_name = restart)]
    pub fn restart(&self) -> Result<JsValue, JsValue> {
        let mut flow = lock(&self.flow)?;
        flow.restart();
        view_to_jsvalue(&flow)
    }

    /// The current view model.
    ///
    /// # Errors
    /// Returns `busy` while a request is pending.
    #[wasm_bindgen(js_name = view)]
    pub fn view(&self) -> Result<JsValue, JsValue> {
        view_to_jsvalue(&*lock(&self.flow)?)
    }
}

/// Forwards the widget's log output to the developer console.
#[wasm_bindgen(js_name = enableConsoleLogging)]
pub fn enable_console_logging() {
    set_logger(Arc::new(ConsoleLogger));
}

struct ConsoleLogger;

impl Logger for ConsoleLogger {
    fn log(&self, level: LogLevel, message: String) {
        let message = JsValue::from_str(&format!("[phonekit] {message}"));
        match level {
            LogLevel::Error => web_sys::console::error_1(&message),
            LogLevel::Warn => web_sys::console::warn_1(&message),
            LogLevel::Info => web_sys::console::info_1(&message),
            LogLevel::Debug | LogLevel::Trace => web_sys::console::debug_1(&message),
        }
    }
}

/// Issuance through the page's wallet SDK, or through an issuance server with the page
/// showing the session pointer.
enum Issuance {
    Wallet(Function),
    Server(ServerIssuance<JsPresenter>),
}

#[derive(Serialize)]
struct WalletOptions<'a> {
    server: &'a str,
    locale: Locale,
}

impl IssuanceHandoff for Issuance {
    async fn issue(&self, token: &SessionToken, options: &IssuanceOptions) -> IssuanceOutcome {
        match self {
            Self::Wallet(issue) => wallet_issue(issue, token, options).await,
            Self::Server(server) => server.issue(token, options).await,
        }
    }
}

/// Calls `issue(token, options)` and maps how its promise settles.
///
/// The wallet SDK rejects with `CANCELLED` or `TIMEOUT` when the user declined or the
/// session expired.
async fn wallet_issue(
    issue: &Function,
    token: &SessionToken,
    options: &IssuanceOptions,
) -> IssuanceOutcome {
    let wallet_options = match serde_wasm_bindgen::to_value(&WalletOptions {
        server: &options.server,
        locale: options.locale,
    }) {
        Ok(value) => value,
        Err(err) => return IssuanceOutcome::Failed(err.to_string()),
    };

    let started = match issue.call2(
        &JsValue::NULL,
        &JsValue::from_str(token.expose()),
        &wallet_options,
    ) {
        Ok(started) => started,
        Err(err) => return IssuanceOutcome::Failed(describe(&err)),
    };

    match JsFuture::from(Promise::resolve(&started)).await {
        Ok(_) => IssuanceOutcome::Success,
        Err(reason) => match reason.as_string().as_deref() {
            Some("CANCELLED") => IssuanceOutcome::Cancelled,
            Some("TIMEOUT") => IssuanceOutcome::Timeout,
            _ => IssuanceOutcome::Failed(describe(&reason)),
        },
    }
}

struct JsPresenter(Function);

impl SessionPresenter for JsPresenter {
    fn present(&self, pointer: &SessionPointer, locale: Locale) {
        let pointer = match serde_wasm_bindgen::to_value(pointer) {
            Ok(pointer) => pointer,
            Err(err) => {
                tracing::error!("could not pass session pointer to the page: {err}");
                return;
            }
        };
        if let Err(err) = self
            .0
            .call2(&JsValue::NULL, &pointer, &JsValue::from_str(locale.language_code()))
        {
            tracing::error!("present handler failed: {}", describe(&err));
        }
    }
}

/// Validation by the page's phone input widget, or by the built-in region rules.
enum Validator {
    Page(Function),
    Region(RegionValidator),
}

#[derive(Deserialize)]
struct ValidatedNumber {
    e164: String,
    region: Option<String>,
}

impl PhoneValidator for Validator {
    fn validate(&self, raw: &str) -> Result<PhoneNumber, PhoneRejection> {
        match self {
            Self::Region(validator) => validator.validate(raw),
            Self::Page(validate) => {
                // The page throws the name of the rejection, e.g. "not-mobile".
                let result = validate
                    .call1(&JsValue::NULL, &JsValue::from_str(raw))
                    .map_err(|err| {
                        err.as_string()
                            .and_then(|name| name.parse().ok())
                            .unwrap_or(PhoneRejection::Format)
                    })?;
                let number: ValidatedNumber =
                    serde_wasm_bindgen::from_value(result).map_err(|_| PhoneRejection::Format)?;
                Ok(PhoneNumber::from_validated(
                    &number.e164,
                    number.region.as_deref(),
                ))
            }
        }
    }
}

/// Hands a view to the page's `render` handler.
///
/// The flow is locked while this runs; calling back into the widget from the handler
/// rejects with `busy`.
fn render_view(render: &Function, view: &ViewModel) {
    let view = match serde_wasm_bindgen::to_value(view) {
        Ok(view) => view,
        Err(err) => {
            tracing::error!("could not pass view to the page: {err}");
            return;
        }
    };
    if let Err(err) = render.call1(&JsValue::NULL, &view) {
        tracing::error!("render handler failed: {}", describe(&err));
    }
}

fn handler(handlers: &JsValue, name: &str) -> Result<Option<Function>, JsValue> {
    if handlers.is_undefined() || handlers.is_null() {
        return Ok(None);
    }
    let value = Reflect::get(handlers, &JsValue::from_str(name))?;
    if value.is_undefined() || value.is_null() {
        return Ok(None);
    }
    value
        .dyn_into::<Function>()
        .map(Some)
        .map_err(|_| JsValue::from_str(&format!("{name} handler is not a function")))
}

fn lock(flow: &Mutex<Flow>) -> Result<MutexGuard<'_, Flow>, JsValue> {
    flow.try_lock()
        .map_err(|_| error_to_jsvalue(&PhoneKitError::Busy))
}

fn view_to_jsvalue(flow: &Flow) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(&flow.view()).map_err(Into::into)
}

fn describe(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

fn error_to_jsvalue(error: &PhoneKitError) -> JsValue {
    JsValue::from_str(&error.to_string())
}

#[wasm_bindgen(typescript_custom_section)]
const TYPESCRIPT_DEFS: &str = r#"
export type Step = "phone" | "confirm" | "token" | "done";

export type BackAction =
    | { kind: "navigate"; step: Step }
    | { kind: "history" }
    | { kind: "hidden" };

export interface StatusMessage {
    severity: "success" | "info" | "warning" | "danger";
    body: string;
}

export interface ViewModel {
    step: Step;
    button_label: string | null;
    back: BackAction;
    status: StatusMessage | null;
    phone_input: string;
    phone_disabled: boolean;
    code_input: string;
    code_disabled: boolean;
    confirm_number: string | null;
}

export interface PhoneWidgetHandlers {
    /** Runs issuance in the wallet SDK; reject with "CANCELLED" or "TIMEOUT". */
    issue?: (token: string, options: { server: string; locale: "en" | "nl" }) => Promise<void>;
    /** Shows the session pointer when issuance runs against the issuance server. */
    present?: (pointer: { u: string; irmaqr: string }, locale: string) => void;
    /** Returns the E.164 number or throws "empty", "format", "unsupported-region" or "not-mobile". */
    validate?: (raw: string) => { e164: string; region?: string };
    /** Called with every change of the view, including the pending states of a request. */
    render?: (view: ViewModel) => void;
}
"#;
