//! Shared auth UI helpers.
//!
//! SYSTEM CONTEXT
//! ==============
//! Guarded routes apply identical unauthenticated redirect behavior.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use session::AuthState;

use crate::state::session::SessionContext;

pub const AUTH_ROUTE: &str = "/auth";

/// True once the startup check is done, nothing is in flight, and no user
/// is known.
pub fn should_redirect_unauth(state: &AuthState, checked: bool) -> bool {
    checked && !state.is_loading() && !state.is_authenticated()
}

/// Redirect to the auth page whenever the session settles without a user.
pub fn install_unauth_redirect<F>(session: SessionContext, navigate: F)
where
    F: Fn(&str, NavigateOptions) + Clone + 'static,
{
    Effect::new(move || {
        let state = session.state.get();
        if should_redirect_unauth(&state, session.checked.get()) {
            navigate(AUTH_ROUTE, NavigateOptions::default());
        }
    });
}
