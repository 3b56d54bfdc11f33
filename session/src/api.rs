//! REST client for the auth endpoints.
//!
//! ARCHITECTURE
//! ============
//! Every call funnels through one request helper that attaches the bearer
//! token from the [`SessionStore`], sends via the injected [`HttpTransport`],
//! and folds the outcome into an [`ApiResponse`]. Callers never see an `Err`.
//!
//! The helper has two session-relevant observations it does not act on
//! itself: a profile response carrying a fresh token, and a 401 to a request
//! that carried a bearer. Both are published as [`ApiEvent`]s to subscribers
//! (the session manager), which own the persistence and logout policy.
//!
//! ERROR HANDLING
//! ==============
//! HTTP status codes map to fixed user-facing strings via [`ApiErrorKind`];
//! transport and decode failures collapse to the generic connectivity message.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use std::cell::RefCell;
use std::rc::Rc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::SessionConfig;
use crate::store::SessionStore;
use crate::transport::{HttpRequest, HttpTransport, Method, TransportError};
use crate::types::{
    AuthPayload, LoginRequest, ProfilePayload, RefreshPayload, SignupPayload, SignupRequest,
};

pub const LOGIN_PATH: &str = "/api/auth/login";
pub const REGISTER_PATH: &str = "/api/auth/register";
pub const LOGOUT_PATH: &str = "/api/auth/logout";
pub const PROFILE_PATH: &str = "/api/auth/profile";
pub const REFRESH_PATH: &str = "/api/auth/refresh";

pub const MSG_SUCCESS: &str = "Success";
pub const MSG_VALIDATION: &str = "Invalid request. Please check your information.";
pub const MSG_SESSION_EXPIRED: &str = "Your session has expired. Please log in again.";
pub const MSG_ACCESS_DENIED: &str = "Access denied.";
pub const MSG_NOT_FOUND: &str = "Service not found. Please try again later.";
pub const MSG_SERVER: &str = "Server error. Please try again later.";
pub const MSG_GENERIC: &str = "Something went wrong. Please try again.";
pub const MSG_CONNECTIVITY: &str =
    "Unable to connect to the server. Please check your internet connection and try again.";

// =============================================================================
// RESULT SHAPE
// =============================================================================

/// Classification of a failed call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// No response: connection refused, DNS, CORS, SSR stub.
    Network,
    /// No response within the configured timeout.
    Timeout,
    /// 2xx response whose body is not the expected JSON.
    MalformedResponse,
    /// The request body could not be serialized.
    Encode,
    /// 400.
    Validation,
    /// 401.
    Unauthorized,
    /// 403.
    Forbidden,
    /// 404.
    NotFound,
    /// 5xx.
    Server,
    /// Any other non-2xx status.
    Unexpected(u16),
}

impl ApiErrorKind {
    /// Bucket a non-2xx status. Returns `None` for 2xx.
    #[must_use]
    pub fn from_status(status: u16) -> Option<Self> {
        match status {
            200..=299 => None,
            400 => Some(Self::Validation),
            401 => Some(Self::Unauthorized),
            403 => Some(Self::Forbidden),
            404 => Some(Self::NotFound),
            500..=u16::MAX => Some(Self::Server),
            other => Some(Self::Unexpected(other)),
        }
    }

    /// Fixed user-facing message for this kind.
    #[must_use]
    pub fn default_message(self) -> &'static str {
        match self {
            Self::Network | Self::Timeout | Self::MalformedResponse => MSG_CONNECTIVITY,
            Self::Validation => MSG_VALIDATION,
            Self::Unauthorized => MSG_SESSION_EXPIRED,
            Self::Forbidden => MSG_ACCESS_DENIED,
            Self::NotFound => MSG_NOT_FOUND,
            Self::Server => MSG_SERVER,
            Self::Encode | Self::Unexpected(_) => MSG_GENERIC,
        }
    }
}

impl From<&TransportError> for ApiErrorKind {
    fn from(err: &TransportError) -> Self {
        match err {
            TransportError::Timeout(_) => Self::Timeout,
            TransportError::Network(_) | TransportError::Unavailable(_) => Self::Network,
        }
    }
}

/// Normalized outcome of every API call: `{success, message, data?}`.
#[derive(Clone, Debug, PartialEq)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    pub data: Option<T>,
    /// Set exactly when `success` is false.
    pub error: Option<ApiErrorKind>,
}

impl<T> ApiResponse<T> {
    fn ok(message: String, data: T) -> Self {
        Self { success: true, message, data: Some(data), error: None }
    }

    fn failure(kind: ApiErrorKind, message: impl Into<String>) -> Self {
        Self { success: false, message: message.into(), data: None, error: Some(kind) }
    }

    /// Payload of a successful call.
    #[must_use]
    pub fn into_data(self) -> Option<T> {
        if self.success { self.data } else { None }
    }

    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        self.error == Some(ApiErrorKind::Unauthorized)
    }
}

// =============================================================================
// EVENTS
// =============================================================================

/// Session-relevant observations published by the request helper.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ApiEvent {
    /// A 2xx profile response carried a (possibly rotated) token.
    TokenIssued {
        token: String,
        /// Bearer the request was sent with.
        sent_with: Option<String>,
    },
    /// A request authenticated with `sent_with` was rejected with 401.
    Unauthorized { sent_with: String },
}

type Listener = Rc<dyn Fn(&ApiEvent)>;

// =============================================================================
// CLIENT
// =============================================================================

/// Which bearer to attach to a request.
#[derive(Clone, Copy, Debug)]
enum Bearer<'a> {
    /// Whatever token the store currently holds, if any.
    Stored,
    /// A specific token, regardless of store contents.
    Explicit(&'a str),
}

/// Auth REST client. Construct once per session manager.
pub struct AuthApi {
    config: SessionConfig,
    transport: Rc<dyn HttpTransport>,
    store: SessionStore,
    listeners: RefCell<Vec<Listener>>,
}

impl AuthApi {
    #[must_use]
    pub fn new(config: SessionConfig, transport: Rc<dyn HttpTransport>, store: SessionStore) -> Self {
        Self { config, transport, store, listeners: RefCell::new(Vec::new()) }
    }

    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Register a listener for [`ApiEvent`]s. Listeners run synchronously,
    /// before the triggering call returns to its caller.
    pub fn subscribe(&self, listener: impl Fn(&ApiEvent) + 'static) {
        self.listeners.borrow_mut().push(Rc::new(listener));
    }

    /// Drop every registered listener.
    pub fn clear_listeners(&self) {
        self.listeners.borrow_mut().clear();
    }

    /// `POST /api/auth/login`.
    pub async fn login(&self, email: &str, password: &str) -> ApiResponse<AuthPayload> {
        let body = LoginRequest { email: email.to_owned(), password: password.to_owned() };
        self.send_json(Method::Post, LOGIN_PATH, Some(&body), Bearer::Stored)
            .await
    }

    /// `POST /api/auth/register`.
    pub async fn signup(&self, name: &str, email: &str, password: &str) -> ApiResponse<SignupPayload> {
        let body = SignupRequest { name: name.to_owned(), email: email.to_owned(), password: password.to_owned() };
        self.send_json(Method::Post, REGISTER_PATH, Some(&body), Bearer::Stored)
            .await
    }

    /// `POST /api/auth/logout` with the stored token.
    pub async fn logout(&self) -> ApiResponse<Value> {
        self.send_json::<(), Value>(Method::Post, LOGOUT_PATH, None, Bearer::Stored)
            .await
    }

    /// `POST /api/auth/logout` for a specific token, used once the local
    /// session has already been cleared.
    pub async fn end_session(&self, token: &str) -> ApiResponse<Value> {
        self.send_json::<(), Value>(Method::Post, LOGOUT_PATH, None, Bearer::Explicit(token))
            .await
    }

    /// `GET /api/auth/profile`.
    pub async fn get_profile(&self) -> ApiResponse<ProfilePayload> {
        self.send_json::<(), ProfilePayload>(Method::Get, PROFILE_PATH, None, Bearer::Stored)
            .await
    }

    /// `POST /api/auth/refresh`.
    pub async fn refresh_token(&self) -> ApiResponse<RefreshPayload> {
        self.send_json::<(), RefreshPayload>(Method::Post, REFRESH_PATH, None, Bearer::Stored)
            .await
    }

    async fn send_json<B, T>(&self, method: Method, path: &str, body: Option<&B>, bearer: Bearer<'_>) -> ApiResponse<T>
    where
        B: Serialize,
        T: DeserializeOwned,
    {
        let encoded = match body.map(serde_json::to_string).transpose() {
            Ok(encoded) => encoded,
            Err(e) => {
                log::warn!("{} {path}: could not encode request body: {e}", method.as_str());
                return ApiResponse::failure(ApiErrorKind::Encode, ApiErrorKind::Encode.default_message());
            }
        };

        let token = match bearer {
            Bearer::Stored => self.store.token(),
            Bearer::Explicit(t) => Some(t.to_owned()),
        };
        let request = build_request(&self.config, method, path, encoded, token.as_deref());

        log::debug!("{} {}", method.as_str(), request.url);
        let response = match self.transport.send(request, self.config.request_timeout).await {
            Ok(response) => response,
            Err(e) => {
                log::warn!("{} {path} failed: {e}", method.as_str());
                let kind = ApiErrorKind::from(&e);
                return ApiResponse::failure(kind, kind.default_message());
            }
        };

        let parsed = parse_body(&response.body);

        let Some(kind) = ApiErrorKind::from_status(response.status) else {
            let Some(json) = parsed else {
                log::warn!("{} {path}: response body is not JSON", method.as_str());
                return ApiResponse::failure(ApiErrorKind::MalformedResponse, MSG_CONNECTIVITY);
            };
            if path == PROFILE_PATH {
                if let Some(issued) = issued_token(&json) {
                    self.emit(&ApiEvent::TokenIssued { token: issued.to_owned(), sent_with: token.clone() });
                }
            }
            let message = body_message(&json).unwrap_or(MSG_SUCCESS).to_owned();
            return match serde_json::from_value::<T>(json) {
                Ok(data) => ApiResponse::ok(message, data),
                Err(e) => {
                    log::warn!("{} {path}: unexpected response shape: {e}", method.as_str());
                    ApiResponse::failure(ApiErrorKind::MalformedResponse, MSG_CONNECTIVITY)
                }
            };
        };

        log::warn!("{} {path} returned status {}", method.as_str(), response.status);
        if kind == ApiErrorKind::Unauthorized {
            if let Some(sent_with) = token {
                self.emit(&ApiEvent::Unauthorized { sent_with });
            }
        }
        ApiResponse::failure(kind, failure_message(kind, parsed.as_ref()))
    }

    fn emit(&self, event: &ApiEvent) {
        // Snapshot so listeners may subscribe or clear without a borrow conflict.
        let listeners: Vec<Listener> = self.listeners.borrow().clone();
        for listener in listeners {
            listener(event);
        }
    }
}

fn build_request(
    config: &SessionConfig,
    method: Method,
    path: &str,
    body: Option<String>,
    token: Option<&str>,
) -> HttpRequest {
    let mut headers = vec![("Content-Type".to_owned(), "application/json".to_owned())];
    if let Some(token) = token {
        headers.push(("Authorization".to_owned(), format!("Bearer {token}")));
    }
    HttpRequest { method, url: config.endpoint_url(path), headers, body }
}

/// Parse a response body. An empty body reads as JSON `null`.
fn parse_body(raw: &str) -> Option<Value> {
    if raw.trim().is_empty() {
        return Some(Value::Null);
    }
    match serde_json::from_str(raw) {
        Ok(value) => Some(value),
        Err(e) => {
            log::debug!("api: response body is not JSON: {e}");
            None
        }
    }
}

fn non_empty_str<'a>(json: &'a Value, field: &str) -> Option<&'a str> {
    json.get(field)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
}

fn body_message(json: &Value) -> Option<&str> {
    non_empty_str(json, "message")
}

fn issued_token(json: &Value) -> Option<&str> {
    non_empty_str(json, "token")
}

fn failure_message(kind: ApiErrorKind, body: Option<&Value>) -> String {
    if kind == ApiErrorKind::Validation {
        if let Some(detail) = body.and_then(|b| non_empty_str(b, "error").or_else(|| non_empty_str(b, "message"))) {
            return detail.to_owned();
        }
    }
    kind.default_message().to_owned()
}
