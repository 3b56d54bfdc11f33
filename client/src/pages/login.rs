//! Email + password sign-in form.

use leptos::prelude::*;
use session::LoginForm;

use crate::pages::auth::AuthMode;
use crate::state::session::SessionContext;

#[component]
pub fn LoginPanel(notice: RwSignal<Option<String>>) -> impl IntoView {
    let session = expect_context::<SessionContext>();
    let form = RwSignal::new(LoginForm::default());
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
        let email = match current.validate() {
            Ok(email) => email.to_owned(),
            Err(e) => {
                notice.set(Some(e.to_string()));
                return;
            }
        };
        let password = current.password;
        session.spawn(move |manager| async move {
            manager.login(&email, &password).await;
        });
    };

    view! {
        <form class="auth-form" on:submit=on_submit>
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
                placeholder="Enter your password"
                prop:value=move || form.get().password
                on:input=move |ev| form.update(|f| f.password = event_target_value(&ev))
            />
            <button class="btn btn--primary auth-form__submit" type="submit" disabled=loading>
                {move || AuthMode::SignIn.submit_label(loading())}
            </button>
        </form>
    }
}
