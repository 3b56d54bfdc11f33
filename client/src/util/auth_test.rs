use super::*;
use session::User;

fn ada() -> User {
    User {
        id: "u1".to_owned(),
        name: "Ada".to_owned(),
        email: "ada@example.com".to_owned(),
        created_at: None,
    }
}

#[test]
fn should_redirect_unauth_when_checked_and_anonymous() {
    assert!(should_redirect_unauth(&AuthState::Anonymous, true));
}

#[test]
fn should_not_redirect_before_startup_check() {
    assert!(!should_redirect_unauth(&AuthState::Anonymous, false));
}

#[test]
fn should_not_redirect_while_loading() {
    assert!(!should_redirect_unauth(&AuthState::Loading, true));
}

#[test]
fn should_not_redirect_when_user_exists() {
    assert!(!should_redirect_unauth(&AuthState::Authenticated(ada()), true));
}

#[test]
fn should_not_redirect_on_error_that_kept_the_user() {
    let state = AuthState::Error { message: "Server error.".to_owned(), previous_user: Some(ada()) };
    assert!(!should_redirect_unauth(&state, true));
}

#[test]
fn should_redirect_on_error_without_user() {
    let state = AuthState::Error { message: "nope".to_owned(), previous_user: None };
    assert!(should_redirect_unauth(&state, true));
}
