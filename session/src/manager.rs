//! Session state machine.
//!
//! SYSTEM CONTEXT
//! ==============
//! One `SessionManager` is constructed per front end (browser app root, CLI
//! invocation) with an injected store and transport. UI layers read
//! [`SessionManager::state`] and subscribe to [`SessionEvent`]s; they never
//! touch the store directly.
//!
//! SERIALIZATION
//! =============
//! Every user action that changes who is logged in (login, signup, logout)
//! and every forced logout bumps an epoch. Background work (startup check,
//! periodic revalidation, manual refresh, rotation) captures the epoch before
//! its request and drops the result if the epoch moved while it was waiting.
//! Token writes triggered by responses are compare-and-set against the bearer
//! the request was sent with, so a slow response cannot resurrect a session
//! that was logged out or replaced in the meantime.

#[cfg(test)]
#[path = "manager_test.rs"]
mod manager_test;

use std::cell::{Cell, RefCell};
use std::future::Future;
use std::rc::{Rc, Weak};
use std::time::Duration;

use crate::api::{ApiEvent, AuthApi, MSG_GENERIC};
use crate::config::SessionConfig;
use crate::forms::SignupForm;
use crate::state::AuthState;
use crate::store::SessionStore;
use crate::transport::HttpTransport;
use crate::types::User;

pub const SIGNUP_NOTICE: &str = "Account created! Please check your email to verify your account.";

/// Notifications for UI layers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    StateChanged(AuthState),
    /// The server rejected the current token. Already logged out locally;
    /// the UI should route to the auth page and explain why.
    Expired,
}

type Listener = Rc<dyn Fn(&SessionEvent)>;

/// State shared between the manager and its API event subscription.
struct Shared {
    store: SessionStore,
    state: RefCell<AuthState>,
    epoch: Cell<u64>,
    listeners: RefCell<Vec<Listener>>,
}

impl Shared {
    fn set_state(&self, next: AuthState) {
        {
            let mut current = self.state.borrow_mut();
            if *current == next {
                return;
            }
            log::debug!("session: {} -> {}", current.label(), next.label());
            *current = next.clone();
        }
        self.emit(&SessionEvent::StateChanged(next));
    }

    fn emit(&self, event: &SessionEvent) {
        let listeners: Vec<Listener> = self.listeners.borrow().clone();
        for listener in listeners {
            listener(event);
        }
    }

    fn bump_epoch(&self) -> u64 {
        let next = self.epoch.get().wrapping_add(1);
        self.epoch.set(next);
        next
    }

    fn is_current(&self, epoch: u64) -> bool {
        self.epoch.get() == epoch
    }

    fn clear_store(&self) {
        if let Err(e) = self.store.clear() {
            log::warn!("session: failed to clear stored session: {e}");
        }
    }

    fn persist_user(&self, user: &User) {
        if let Err(e) = self.store.set_user(user) {
            log::warn!("session: failed to cache user: {e}");
        }
    }

    fn persist_token(&self, token: &str) {
        if let Err(e) = self.store.set_token(token) {
            log::warn!("session: failed to store token: {e}");
        }
    }

    /// Store `next` only while the stored token is still `expected`.
    fn replace_token(&self, expected: &str, next: &str) -> bool {
        if self.store.token().as_deref() != Some(expected) {
            log::debug!("session: stored token changed in flight, dropping issued token");
            return false;
        }
        if expected != next {
            self.persist_token(next);
        }
        true
    }

    /// Clear everything locally and fall back to anonymous.
    fn force_logout(&self) {
        self.bump_epoch();
        self.clear_store();
        self.set_state(AuthState::Anonymous);
    }

    fn on_api_event(&self, event: &ApiEvent) {
        match event {
            ApiEvent::TokenIssued { token, sent_with: Some(sent_with) } => {
                self.replace_token(sent_with, token);
            }
            ApiEvent::TokenIssued { sent_with: None, .. } => {
                log::debug!("session: ignoring token issued to an unauthenticated request");
            }
            ApiEvent::Unauthorized { sent_with } => {
                if self.store.token().as_deref() != Some(sent_with.as_str()) {
                    log::debug!("session: ignoring 401 for a token that is no longer stored");
                    return;
                }
                log::warn!("session: token rejected by server, logging out");
                self.force_logout();
                self.emit(&SessionEvent::Expired);
            }
        }
    }
}

pub struct SessionManager {
    shared: Rc<Shared>,
    api: AuthApi,
    disposed: Cell<bool>,
}

impl SessionManager {
    /// Build a manager over `store` and `transport`. The initial state is
    /// always [`AuthState::Anonymous`]; call [`SessionManager::init`] to
    /// restore a persisted session.
    #[must_use]
    pub fn new(config: SessionConfig, store: SessionStore, transport: Rc<dyn HttpTransport>) -> Self {
        let shared = Rc::new(Shared {
            store: store.clone(),
            state: RefCell::new(AuthState::Anonymous),
            epoch: Cell::new(0),
            listeners: RefCell::new(Vec::new()),
        });
        let api = AuthApi::new(config, transport, store);

        let weak: Weak<Shared> = Rc::downgrade(&shared);
        api.subscribe(move |event| {
            if let Some(shared) = weak.upgrade() {
                shared.on_api_event(event);
            }
        });

        Self { shared, api, disposed: Cell::new(false) }
    }

    #[must_use]
    pub fn state(&self) -> AuthState {
        self.shared.state.borrow().clone()
    }

    #[must_use]
    pub fn store(&self) -> &SessionStore {
        &self.shared.store
    }

    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        self.api.config()
    }

    pub fn subscribe(&self, listener: impl Fn(&SessionEvent) + 'static) {
        self.shared.listeners.borrow_mut().push(Rc::new(listener));
    }

    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.disposed.get()
    }

    /// Stop the revalidation loop and drop every subscriber.
    pub fn dispose(&self) {
        self.disposed.set(true);
        self.api.clear_listeners();
        self.shared.listeners.borrow_mut().clear();
    }

    // =========================================================================
    // USER ACTIONS
    // =========================================================================

    /// Sign in. Any previous session is discarded before the request goes out.
    pub async fn login(&self, email: &str, password: &str) -> bool {
        let epoch = self.shared.bump_epoch();
        self.shared.clear_store();
        self.shared.set_state(AuthState::Loading);

        let response = self.api.login(email, password).await;
        if !self.shared.is_current(epoch) {
            log::debug!("session: discarding superseded login result");
            return false;
        }

        match (response.success, response.data) {
            (true, Some(payload)) => {
                self.shared.persist_token(&payload.token);
                self.shared.persist_user(&payload.user);
                self.shared.set_state(AuthState::Authenticated(payload.user));
                true
            }
            _ => {
                self.shared.clear_store();
                self.shared.set_state(AuthState::Error { message: response.message, previous_user: None });
                false
            }
        }
    }

    /// Create an account. Success does not sign the user in; any previous
    /// session is discarded before the request goes out.
    pub async fn signup(&self, name: &str, email: &str, password: &str) -> bool {
        let epoch = self.shared.bump_epoch();
        self.shared.clear_store();
        self.shared.set_state(AuthState::Loading);

        let response = self.api.signup(name, email, password).await;
        if !self.shared.is_current(epoch) {
            log::debug!("session: discarding superseded signup result");
            return false;
        }

        if response.success {
            self.shared.set_state(AuthState::Anonymous);
            true
        } else {
            self.shared.set_state(AuthState::Error { message: response.message, previous_user: None });
            false
        }
    }

    /// Validate `form`, then sign up. Returns the notice to show on success or
    /// the message to show on failure. Invalid forms never reach the network.
    ///
    /// # Errors
    ///
    /// The validation message, or the API failure message.
    pub async fn register(&self, form: &SignupForm) -> Result<String, String> {
        form.validate().map_err(|e| e.to_string())?;
        if self
            .signup(form.name.trim(), form.email.trim(), &form.password)
            .await
        {
            Ok(SIGNUP_NOTICE.to_owned())
        } else {
            Err(self
                .state()
                .error()
                .map_or_else(|| MSG_GENERIC.to_owned(), str::to_owned))
        }
    }

    /// Log out locally right away, then tell the server. Server failures are
    /// only logged.
    pub async fn logout(&self) {
        let token = self.shared.store.token();
        self.shared.force_logout();

        let Some(token) = token else {
            return;
        };
        let response = self.api.end_session(&token).await;
        if !response.success {
            log::warn!("session: server logout failed: {}", response.message);
        }
    }

    /// Leave the error state: back to the previous user if there was one,
    /// otherwise anonymous.
    pub fn clear_error(&self) {
        let next = match &*self.shared.state.borrow() {
            AuthState::Error { previous_user: Some(user), .. } => AuthState::Authenticated(user.clone()),
            AuthState::Error { previous_user: None, .. } => AuthState::Anonymous,
            _ => return,
        };
        self.shared.set_state(next);
    }

    // =========================================================================
    // BACKGROUND
    // =========================================================================

    /// Restore a persisted session by checking it against the server.
    pub async fn init(&self) {
        let store = &self.shared.store;
        let (token, cached) = (store.token(), store.user());
        match (token, cached) {
            (None, None) => return,
            (Some(_), Some(_)) => {}
            _ => {
                log::debug!("session: discarding half-present stored session");
                self.shared.force_logout();
                return;
            }
        }

        let epoch = self.shared.epoch.get();
        self.shared.set_state(AuthState::Loading);

        let response = self.api.get_profile().await;
        if !self.shared.is_current(epoch) {
            log::debug!("session: discarding stale startup check");
            return;
        }

        match (response.success, response.data) {
            (true, Some(profile)) => {
                self.shared.persist_user(&profile.user);
                self.shared.set_state(AuthState::Authenticated(profile.user));
            }
            _ => {
                log::warn!("session: stored session rejected at startup: {}", response.message);
                self.shared.force_logout();
            }
        }
    }

    /// One periodic check. Runs only while authenticated with a stored token;
    /// any failure logs the user out.
    pub async fn revalidate(&self) {
        if !self.state().is_authenticated() || self.shared.store.token().is_none() {
            return;
        }

        let epoch = self.shared.epoch.get();
        let response = self.api.get_profile().await;
        if !self.shared.is_current(epoch) {
            log::debug!("session: discarding stale revalidation");
            return;
        }

        match (response.success, response.data) {
            (true, Some(profile)) => {
                self.shared.persist_user(&profile.user);
                self.shared.set_state(AuthState::Authenticated(profile.user));
            }
            _ => {
                log::warn!("session: revalidation failed: {}", response.message);
                self.shared.force_logout();
            }
        }
    }

    /// Sliding refresh through the profile endpoint. Returns true when the
    /// server issued a new token and it was stored.
    ///
    /// A non-401 failure keeps the session and surfaces the message with the
    /// current user preserved.
    pub async fn refresh(&self) -> bool {
        let AuthState::Authenticated(user) = self.state() else {
            return false;
        };
        let Some(sent_with) = self.shared.store.token() else {
            return false;
        };

        let epoch = self.shared.epoch.get();
        let response = self.api.get_profile().await;
        if !self.shared.is_current(epoch) {
            log::debug!("session: discarding stale refresh");
            return false;
        }

        match (response.success, response.data) {
            (true, Some(profile)) => {
                self.shared.persist_user(&profile.user);
                self.shared.set_state(AuthState::Authenticated(profile.user));
                self.shared
                    .store
                    .token()
                    .is_some_and(|stored| stored != sent_with)
            }
            _ => {
                self.shared.set_state(AuthState::Error { message: response.message, previous_user: Some(user) });
                false
            }
        }
    }

    /// Exchange the stored token through the dedicated refresh endpoint.
    pub async fn rotate(&self) -> bool {
        let Some(sent_with) = self.shared.store.token() else {
            return false;
        };

        let epoch = self.shared.epoch.get();
        let response = self.api.refresh_token().await;
        if !self.shared.is_current(epoch) {
            log::debug!("session: discarding stale rotation");
            return false;
        }

        let message = response.message.clone();
        match response.into_data() {
            Some(payload) => self.shared.replace_token(&sent_with, &payload.token),
            None => {
                log::warn!("session: token rotation failed: {message}");
                false
            }
        }
    }

    /// Call [`SessionManager::revalidate`] every configured interval until
    /// disposed. `sleep` supplies the platform timer.
    pub async fn run_revalidation<F, Fut>(&self, mut sleep: F)
    where
        F: FnMut(Duration) -> Fut,
        Fut: Future<Output = ()>,
    {
        let interval = self.api.config().revalidate_interval;
        while !self.is_disposed() {
            sleep(interval).await;
            if self.is_disposed() {
                break;
            }
            self.revalidate().await;
        }
        log::debug!("session: revalidation loop stopped");
    }
}
