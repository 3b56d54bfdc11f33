//! Account creation form.
//!
//! Validation runs twice: synchronously here for instant feedback, and again
//! inside `SessionManager::register`, which refuses invalid forms before any
//! request goes out.

use leptos::prelude::*;
use session::SignupForm;

use crate::pages::auth::AuthMode;
use crate::state::session::SessionContext;

#[component]
pub fn SignupPanel(notice: RwSignal<Option<String>>) -> impl IntoView {
    let session = expect_context::<SessionContext>();
    let form = RwSignal::new(SignupForm::default());
    let loading = move || session.state.get().is_loading();

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if loading() {
            return;
        }
        notice.set(None);
        session.clear_error();
        session.dismiss_expired();

        let current = form.get();
        if let Err(e) = current.validate() {
            notice.set(Some(e.to_string()));
            return;
        }
        session.spawn(move |manager| async move {
            match manager.register(&current).await {
                Ok(message) => {
                    form.set(SignupForm::default());
                    notice.set(Some(message));
                }
                // The session error already carries the message.
                Err(message) => leptos::logging::warn!("signup failed: {message}"),
            }
        });
    };

    view! {
        <form class="auth-form" on:submit=on_submit>
            <label class="auth-form__label" for="name">"Full Name"</label>
            <input
                class="auth-form__input"
                type="text"
                id="name"
                name="name"
                required
                placeholder="Enter your full name"
                prop:value=move || form.get().name
                on:input=move |ev| form.update(|f| f.name = event_target_value(&ev))
            />
            <label class="auth-form__label" for="email">"Email Address"</label>
            <input
                class="auth-form__input"
                type="email"
                id="email"
                name="email"
                required
                placeholder="Enter your email"
                prop:value=move || form.get().email
                on:input=move |ev| form.update(|f| f.email = event_target_value(&ev))
            />
            <label class="auth-form__label" for="password">"Password"</label>
            <input
                class="auth-form__input"
                type="password"
                id="password"
                name="password"
                required
                placeholder="Create a password"
                prop:value=move || form.get().password
                on:input=move |ev| form.update(|f| f.password = event_target_value(&ev))
            />
            <label class="auth-form__label" for="confirmPassword">"Confirm Password"</label>
            <input
                class="auth-form__input"
                type="password"
                id="confirmPassword"
                name="confirmPassword"
                required
                placeholder="Confirm your password"
                prop:value=move || form.get().confirm_password
                on:input=move |ev| form.update(|f| f.confirm_password = event_target_value(&ev))
            />
            <button class="btn btn--primary auth-form__submit" type="submit" disabled=loading>
                {move || AuthMode::CreateAccount.submit_label(loading())}
            </button>
        </form>
    }
}
