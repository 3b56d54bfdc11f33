//! Session core shared by the browser client and the CLI.
//!
//! This crate owns everything about "who is logged in" that does not depend
//! on a particular runtime: the persisted token/user pair, the REST client for
//! the auth endpoints, the session state machine, and signup/login form
//! validation. Platform glue (browser `localStorage`, `gloo-net`, `reqwest`,
//! JSON files) plugs in through the [`KeyValueStore`] and [`HttpTransport`]
//! traits.
//!
//! Everything here is single-threaded (`Rc`/`RefCell`) and expects to be
//! driven from one cooperative executor.

pub mod api;
pub mod config;
pub mod forms;
pub mod manager;
pub mod state;
pub mod store;
pub mod transport;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use api::{ApiErrorKind, ApiEvent, ApiResponse, AuthApi};
pub use config::{ConfigError, SessionConfig};
pub use forms::{FormError, LoginForm, SignupForm};
pub use manager::{SIGNUP_NOTICE, SessionEvent, SessionManager};
pub use state::AuthState;
pub use store::{KeyValueStore, MemoryStore, SessionStore, StoreError};
pub use transport::{HttpRequest, HttpResponse, HttpTransport, Method, TransportError};
pub use types::User;
