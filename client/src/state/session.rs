//! Session context shared by every page.
//!
//! SYSTEM CONTEXT
//! ==============
//! The app root constructs one [`SessionManager`] over `localStorage` and
//! `fetch`, mirrors its [`AuthState`] into a signal, and provides the bundle
//! as context. Pages read `state` reactively and start actions through
//! [`SessionContext::spawn`].
//!
//! LIFECYCLE
//! =========
//! On hydrate the stored session is checked once (`init`), then the
//! revalidation loop runs until the root is cleaned up, which disposes the
//! manager. During SSR nothing is started and `checked` stays false, so route
//! guards never redirect on the server.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::future::Future;
use std::rc::Rc;

use leptos::prelude::*;
use session::api::MSG_SESSION_EXPIRED;
use session::config::{ENV_API_BASE_URL, ENV_REQUEST_TIMEOUT_SECS, ENV_REVALIDATE_INTERVAL_SECS};
use session::{AuthState, SessionConfig, SessionEvent, SessionManager, SessionStore};

use crate::net::storage::BrowserStorage;
use crate::net::transport::BrowserTransport;

#[derive(Clone, Copy)]
pub struct SessionContext {
    /// Mirror of the manager's state.
    pub state: RwSignal<AuthState>,
    /// Set once the startup check has finished.
    pub checked: RwSignal<bool>,
    /// Shown on the auth page after the server rejected the session.
    pub expired_notice: RwSignal<Option<String>>,
    manager: StoredValue<Rc<SessionManager>, LocalStorage>,
}

impl SessionContext {
    /// Build the manager, wire its events into signals, and start the
    /// background work. Must run inside the app root's reactive owner.
    pub fn install() -> Self {
        let store = SessionStore::new(Rc::new(BrowserStorage));
        let manager = Rc::new(SessionManager::new(browser_config(), store, Rc::new(BrowserTransport)));

        let state = RwSignal::new(manager.state());
        let checked = RwSignal::new(false);
        let expired_notice = RwSignal::new(None::<String>);

        manager.subscribe(move |event| match event {
            SessionEvent::StateChanged(next) => state.set(next.clone()),
            SessionEvent::Expired => expired_notice.set(Some(MSG_SESSION_EXPIRED.to_owned())),
        });

        let ctx = Self { state, checked, expired_notice, manager: StoredValue::new_local(manager) };
        ctx.start();
        on_cleanup(move || ctx.dispose());
        ctx
    }

    fn manager(self) -> Option<Rc<SessionManager>> {
        self.manager.try_get_value()
    }

    #[cfg(feature = "hydrate")]
    fn start(self) {
        let Some(manager) = self.manager() else {
            return;
        };
        leptos::task::spawn_local(async move {
            manager.init().await;
            // init may settle without a transition (e.g. discarding a
            // half-present session), so resync explicitly.
            self.state.set(manager.state());
            self.checked.set(true);
            manager
                .run_revalidation(gloo_timers::future::sleep)
                .await;
        });
    }

    #[cfg(not(feature = "hydrate"))]
    fn start(self) {}

    /// Run a session action on the local executor. No-op during SSR.
    pub fn spawn<F, Fut>(self, action: F)
    where
        F: FnOnce(Rc<SessionManager>) -> Fut + 'static,
        Fut: Future<Output = ()> + 'static,
    {
        let Some(manager) = self.manager() else {
            leptos::logging::warn!("session action after dispose ignored");
            return;
        };
        #[cfg(feature = "hydrate")]
        leptos::task::spawn_local(action(manager));
        #[cfg(not(feature = "hydrate"))]
        drop((action, manager));
    }

    pub fn clear_error(self) {
        if let Some(manager) = self.manager() {
            manager.clear_error();
        }
    }

    pub fn dismiss_expired(self) {
        self.expired_notice.set(None);
    }

    fn dispose(self) {
        if let Some(manager) = self.manager() {
            manager.dispose();
        }
    }
}

/// Session settings baked in at compile time, with the same names the native
/// front ends read from the environment.
fn browser_config() -> SessionConfig {
    config_from(|key| {
        let value = match key {
            ENV_API_BASE_URL => option_env!("STORAIGE_API_BASE_URL"),
            ENV_REQUEST_TIMEOUT_SECS => option_env!("STORAIGE_REQUEST_TIMEOUT_SECS"),
            ENV_REVALIDATE_INTERVAL_SECS => option_env!("STORAIGE_REVALIDATE_INTERVAL_SECS"),
            _ => None,
        };
        value.map(str::to_owned)
    })
}

/// Build a config from `lookup`, falling back to defaults if the baked-in
/// values are invalid.
pub(crate) fn config_from<F>(lookup: F) -> SessionConfig
where
    F: Fn(&str) -> Option<String>,
{
    SessionConfig::from_lookup(lookup).unwrap_or_else(|e| {
        leptos::logging::warn!("invalid session config, using defaults: {e}");
        SessionConfig::default()
    })
}
