use reqwest::{Method, RequestBuilder, Response};

use crate::error::PhoneKitError;

/// A simple wrapper on an HTTP client for making requests. Sets sensible defaults such as the
/// user-agent and turns transport failures into [`PhoneKitError::NetworkError`].
///
/// Requests are never retried: send and verify are user-driven and the user resubmits, the
/// issuance poller paces itself.
#[derive(Debug, Clone)]
pub struct Request {
    client: reqwest::Client,
}

impl Request {
    /// Initializes a new `Request` instance.
    pub(crate) fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Creates a request builder with defaults applied.
    pub(crate) fn req(&self, method: Method, url: &str) -> RequestBuilder {
        let builder = self.client.request(method, url);

        // Browsers own the user-agent of fetch requests.
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.header(
            "User-Agent",
            format!("phonekit-core/{}", env!("CARGO_PKG_VERSION")),
        );

        builder
    }

    /// Creates a GET request builder with defaults applied.
    pub(crate) fn get(&self, url: &str) -> RequestBuilder {
        self.req(Method::GET, url)
    }

    /// Creates a POST request builder with defaults applied.
    pub(crate) fn post(&self, url: &str) -> RequestBuilder {
        self.req(Method::POST, url)
    }

    /// Sends a request built by `req`/`get`/`post`.
    ///
    /// Any response, whatever its status, is returned as is; only failures to get a response
    /// at all are errors.
    pub(crate) async fn handle(
        &self,
        request_builder: RequestBuilder,
    ) -> Result<Response, PhoneKitError> {
        let (client, request) = request_builder.build_split();
        let request = request.map_err(|err| PhoneKitError::NetworkError {
            url: err
                .url()
                .map_or_else(|| "<unknown>".to_string(), ToString::to_string),
            status: None,
            error: format!("request build failed: {err}"),
        })?;
        let url = request.url().to_string();

        tracing::debug!("{} {url}", request.method());

        client
            .execute(request)
            .await
            .map_err(|err| PhoneKitError::NetworkError {
                url,
                status: None,
                error: format!("request failed: {err}"),
            })
    }
}

impl Default for Request {
    fn default() -> Self {
        Self::new()
    }
}
