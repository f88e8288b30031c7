//! Module containing the main PayPlug API client.

use crate::{
    apis::PayPlugClientInner,
    common::{
        AUTHENTICATION_PROBE_PATH, DEFAULT_CANCEL_RETURN_URL, DEFAULT_NOTIFICATION_URL,
        DEFAULT_PAYPLUG_URL, DEFAULT_SUCCESS_RETURN_URL, JSON_CONTENT_TYPE,
    },
    middlewares::{
        authentication::AuthenticationMiddleware, error_handling::ErrorHandlingMiddleware,
        inject_user_agent::InjectUserAgentMiddleware,
    },
    Error,
};
use reqwest::{
    header::{CONTENT_LENGTH, CONTENT_TYPE},
    Method, Url,
};
use reqwest_middleware::ClientWithMiddleware;
use reqwest_tracing::TracingMiddleware;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

/// Options recognized when building a [`PayPlugClient`](crate::client::PayPlugClient).
///
/// Every field has a default, so a partial configuration source can be deserialized into this
/// struct. Unknown keys are ignored.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ClientOptions {
    /// Root of the PayPlug API.
    ///
    /// Defaults to: `https://api.payplug.com/`
    pub base_url: String,
    /// Where the customer lands after a successful payment. The payment tracker is appended
    /// as is, so the template must end with something like `?tracker=`.
    ///
    /// Defaults to: `https://example.net/success?tracker=`
    pub success_return_url: String,
    /// Where the customer lands after cancelling a payment. The payment tracker is appended.
    ///
    /// Defaults to: `https://example.net/cancel?tracker=`
    pub cancel_return_url: String,
    /// Url called by PayPlug to notify payment updates. The payment tracker is appended.
    ///
    /// Defaults to: `https://example.net/notifications?tracker=`
    pub notification_url: String,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_PAYPLUG_URL.to_string(),
            success_return_url: DEFAULT_SUCCESS_RETURN_URL.to_string(),
            cancel_return_url: DEFAULT_CANCEL_RETURN_URL.to_string(),
            notification_url: DEFAULT_NOTIFICATION_URL.to_string(),
        }
    }
}

/// Client for PayPlug public APIs.
///
/// Cloning is cheap and all the clones share the same connection pool and authentication state.
#[derive(Debug, Clone)]
pub struct PayPlugClient {
    inner: Arc<PayPlugClientInner>,
}

impl PayPlugClient {
    /// Builds a new [`PayPlugClient`](crate::client::PayPlugClient) with the given options.
    pub fn new(secret_key: impl Into<String>, options: ClientOptions) -> Result<Self, Error> {
        PayPlugClientBuilder::new(secret_key)
            .with_options(options)
            .build()
    }

    /// Returns a new builder to configure a new [`PayPlugClient`](crate::client::PayPlugClient).
    pub fn builder(secret_key: impl Into<String>) -> PayPlugClientBuilder {
        PayPlugClientBuilder::new(secret_key)
    }

    /// The normalized root of the PayPlug API, always ending with a single `/`.
    pub fn gateway_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Options the client was built with, `base_url` normalized.
    pub fn options(&self) -> &ClientOptions {
        &self.inner.options
    }

    /// Whether the last call to [`authenticate`](crate::client::PayPlugClient::authenticate) succeeded.
    pub fn is_authenticated(&self) -> bool {
        self.inner.authenticated.load(Ordering::SeqCst)
    }

    /// Validates the secret key with a cheap, side-effect free listing request.
    ///
    /// On failure the client is marked as not authenticated before the error is returned.
    #[tracing::instrument(
        name = "Authenticate",
        skip(self),
        fields(base_url = %self.inner.base_url)
    )]
    pub async fn authenticate(&self) -> Result<(), Error> {
        match self.get(AUTHENTICATION_PROBE_PATH).await {
            Ok(_) => {
                tracing::info!("Successfully connected to PayPlug at {}", self.inner.base_url);
                self.inner.authenticated.store(true, Ordering::SeqCst);
                Ok(())
            }
            Err(e) => {
                tracing::error!(
                    "Cannot authenticate against PayPlug at {}: {}",
                    self.inner.base_url,
                    e
                );
                self.inner.authenticated.store(false, Ordering::SeqCst);
                Err(e)
            }
        }
    }

    /// Sends a `GET` request to `path`, relative to the gateway url.
    pub async fn get(&self, path: &str) -> Result<Value, Error> {
        self.send(Method::GET, path, None).await
    }

    /// Sends a `POST` request with a JSON body to `path`, relative to the gateway url.
    pub async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Value, Error> {
        let body = serde_json::to_value(body)?;
        self.send(Method::POST, path, Some(&body)).await
    }

    /// Sends a `PATCH` request with a JSON body to `path`, relative to the gateway url.
    pub async fn patch<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Value, Error> {
        let body = serde_json::to_value(body)?;
        self.send(Method::PATCH, path, Some(&body)).await
    }

    /// Sends one request and parses the response body as JSON.
    ///
    /// Unsuccessful statuses are turned into errors by the
    /// [`ErrorHandlingMiddleware`](crate::middlewares::error_handling::ErrorHandlingMiddleware).
    #[tracing::instrument(name = "PayPlug Request", skip(self, body))]
    pub(crate) async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Value, Error> {
        let url = self
            .inner
            .base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| Error::technical(format!("Invalid request path \"{}\": {}", path, e)))?;

        let mut request = self.inner.client.request(method.clone(), url);

        if matches!(method, Method::POST | Method::PUT | Method::PATCH) {
            let payload = JsonPayload::encode(body)?;
            tracing::trace!("Request body: {}", payload.as_str());

            request = request
                .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
                .header(CONTENT_LENGTH, payload.content_length().to_string());

            if !payload.is_empty() {
                request = request.body(payload.into_string());
            }
        }

        tracing::info!(" --> {} {}", method, path);

        let response = request.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        tracing::info!(" <-- {} {}: status={}", method, path, status);
        tracing::trace!("Response body: {}", String::from_utf8_lossy(&bytes));

        Ok(serde_json::from_slice(&bytes)?)
    }
}

/// Builder for a [`PayPlugClient`](crate::client::PayPlugClient).
#[derive(Debug)]
pub struct PayPlugClientBuilder {
    client: reqwest::Client,
    secret_key: Secret<String>,
    options: ClientOptions,
}

impl PayPlugClientBuilder {
    /// Creates a new builder to configure a [`PayPlugClient`](crate::client::PayPlugClient).
    pub fn new(secret_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            secret_key: Secret::new(secret_key.into()),
            options: ClientOptions::default(),
        }
    }

    /// Consumes the builder and builds a new [`PayPlugClient`](crate::client::PayPlugClient).
    ///
    /// Fails with a technical error if the secret key is empty or if the base url is invalid.
    pub fn build(self) -> Result<PayPlugClient, Error> {
        if self.secret_key.expose_secret().is_empty() {
            tracing::error!("Cannot create a PayPlugClient without secret key");
            return Err(Error::technical("secret key is mandatory"));
        }

        let base_url = normalize_base_url(&self.options.base_url)?;
        let options = ClientOptions {
            base_url: base_url.to_string(),
            ..self.options
        };
        tracing::trace!("PayPlugClient options are {:?}", options);

        let client = build_client_with_middleware(
            self.client,
            AuthenticationMiddleware::new(self.secret_key)?,
        );

        Ok(PayPlugClient {
            inner: Arc::new(PayPlugClientInner {
                client,
                base_url,
                options,
                authenticated: AtomicBool::new(false),
            }),
        })
    }

    /// Sets a specific reqwest [`Client`](reqwest::Client) to use.
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    /// Replaces all the options at once.
    pub fn with_options(mut self, options: ClientOptions) -> Self {
        self.options = options;
        self
    }

    /// Sets the root of the PayPlug API. A trailing `/` is added if missing.
    ///
    /// Defaults to: `https://api.payplug.com/`
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.options.base_url = base_url.into();
        self
    }

    /// Sets the success return url template. The payment tracker is appended to it.
    pub fn with_success_return_url(mut self, url: impl Into<String>) -> Self {
        self.options.success_return_url = url.into();
        self
    }

    /// Sets the cancel return url template. The payment tracker is appended to it.
    pub fn with_cancel_return_url(mut self, url: impl Into<String>) -> Self {
        self.options.cancel_return_url = url.into();
        self
    }

    /// Sets the notification url template. The payment tracker is appended to it.
    pub fn with_notification_url(mut self, url: impl Into<String>) -> Self {
        self.options.notification_url = url.into();
        self
    }
}

fn build_client_with_middleware(
    client: reqwest::Client,
    auth_middleware: AuthenticationMiddleware,
) -> ClientWithMiddleware {
    reqwest_middleware::ClientBuilder::new(client)
        .with(TracingMiddleware::default())
        .with(ErrorHandlingMiddleware)
        .with(InjectUserAgentMiddleware::new())
        .with(auth_middleware)
        .build()
}

/// Parses the base url, guaranteeing exactly one trailing `/`.
fn normalize_base_url(base_url: &str) -> Result<Url, Error> {
    let normalized = format!("{}/", base_url.trim_end_matches('/'));

    Url::parse(&normalized)
        .map_err(|e| Error::technical(format!("Invalid base url \"{}\": {}", base_url, e)))
}

/// A serialized JSON request body.
#[derive(Debug)]
struct JsonPayload(String);

impl JsonPayload {
    /// Absent, `null` and empty objects or arrays are sent as an empty payload.
    fn encode(body: Option<&Value>) -> Result<Self, Error> {
        let payload = match body {
            None | Some(Value::Null) => String::new(),
            Some(Value::Object(map)) if map.is_empty() => String::new(),
            Some(Value::Array(items)) if items.is_empty() => String::new(),
            Some(body) => serde_json::to_string(body)?,
        };

        Ok(Self(payload))
    }

    /// Size of the payload on the wire. `str::len` counts UTF-8 bytes, not characters.
    fn content_length(&self) -> usize {
        self.0.len()
    }

    fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn as_str(&self) -> &str {
        &self.0
    }

    fn into_string(self) -> String {
        self.0
    }
}
