//! Combined sign-in / create-account page.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;
use session::AuthState;

use crate::pages::login::LoginPanel;
use crate::pages::signup::SignupPanel;
use crate::state::session::SessionContext;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AuthMode {
    #[default]
    SignIn,
    CreateAccount,
}

impl AuthMode {
    pub fn toggled(self) -> Self {
        match self {
            Self::SignIn => Self::CreateAccount,
            Self::CreateAccount => Self::SignIn,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::SignIn => "Welcome Back",
            Self::CreateAccount => "Create Account",
        }
    }

    pub fn subtitle(self) -> &'static str {
        match self {
            Self::SignIn => "Sign in to your storAIge account",
            Self::CreateAccount => "Join storAIge today",
        }
    }

    pub fn submit_label(self, loading: bool) -> &'static str {
        match (self, loading) {
            (Self::SignIn, true) => "Signing in...",
            (Self::SignIn, false) => "Sign In",
            (Self::CreateAccount, true) => "Creating Account...",
            (Self::CreateAccount, false) => "Create Account",
        }
    }

    pub fn switch_prompt(self) -> &'static str {
        match self {
            Self::SignIn => "Don't have an account?",
            Self::CreateAccount => "Already have an account?",
        }
    }

    pub fn switch_label(self) -> &'static str {
        match self {
            Self::SignIn => "Sign up",
            Self::CreateAccount => "Sign in",
        }
    }
}

/// Message under the form. A local notice (validation result, signup
/// confirmation) wins over the session error, which wins over the
/// session-expired notice.
pub fn status_message(local: Option<&str>, state: &AuthState, expired: Option<&str>) -> Option<String> {
    local
        .or_else(|| state.error())
        .or(expired)
        .map(str::to_owned)
}

#[component]
pub fn AuthPage() -> impl IntoView {
    let session = expect_context::<SessionContext>();
    let navigate = use_navigate();

    let mode = RwSignal::new(AuthMode::default());
    let notice = RwSignal::new(None::<String>);

    session.clear_error();

    Effect::new(move || {
        if session.state.get().is_authenticated() {
            session.dismiss_expired();
            navigate("/", NavigateOptions::default());
        }
    });

    let on_switch = move |_| {
        mode.update(|m| *m = m.toggled());
        notice.set(None);
        session.clear_error();
    };

    let message = move || {
        let state = session.state.get();
        status_message(notice.get().as_deref(), &state, session.expired_notice.get().as_deref())
    };

    view! {
        <div class="auth-page">
            <div class="auth-card">
                <div class="auth-card__header">
                    <h1>{move || mode.get().title()}</h1>
                    <p class="auth-card__subtitle">{move || mode.get().subtitle()}</p>
                </div>

                {move || match mode.get() {
                    AuthMode::SignIn => view! { <LoginPanel notice=notice/> }.into_any(),
                    AuthMode::CreateAccount => view! { <SignupPanel notice=notice/> }.into_any(),
                }}

                <Show when=move || message().is_some()>
                    <p class="auth-card__message">{move || message().unwrap_or_default()}</p>
                </Show>

                <p class="auth-card__switch">
                    {move || mode.get().switch_prompt()}
                    " "
                    <button type="button" class="link-button" on:click=on_switch>
                        {move || mode.get().switch_label()}
                    </button>
                </p>
            </div>
        </div>
    }
}
