use super::*;
use crate::test_helpers::user;

#[test]
fn default_is_anonymous() {
    let state = AuthState::default();
    assert_eq!(state, AuthState::Anonymous);
    assert!(!state.is_authenticated());
    assert!(!state.is_loading());
    assert_eq!(state.user(), None);
    assert_eq!(state.error(), None);
}

#[test]
fn authenticated_exposes_user() {
    let state = AuthState::Authenticated(user("u1"));
    assert!(state.is_authenticated());
    assert_eq!(state.user().map(|u| u.id.as_str()), Some("u1"));
    assert_eq!(state.label(), "authenticated");
}

#[test]
fn error_with_previous_user_stays_authenticated() {
    let state = AuthState::Error { message: "Server error.".to_owned(), previous_user: Some(user("u1")) };
    assert!(state.is_authenticated());
    assert_eq!(state.error(), Some("Server error."));
    assert_eq!(state.user().map(|u| u.id.as_str()), Some("u1"));
}

#[test]
fn error_without_user_has_no_user() {
    let state = AuthState::Error { message: "nope".to_owned(), previous_user: None };
    assert!(!state.is_authenticated());
    assert_eq!(state.user(), None);
    assert_eq!(state.label(), "error");
}

#[test]
fn loading_has_neither_user_nor_error() {
    let state = AuthState::Loading;
    assert!(state.is_loading());
    assert_eq!(state.user(), None);
    assert_eq!(state.error(), None);
}
