//! Observable authentication state.

#[cfg(test)]
#[path = "state_test.rs"]
mod state_test;

use crate::types::User;

/// Where the session currently stands. Exactly one variant holds at a time;
/// a user and an error can only coexist inside [`AuthState::Error`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum AuthState {
    /// No session. Guarded views redirect to the auth page.
    #[default]
    Anonymous,
    /// A login, signup, or startup check is in flight.
    Loading,
    Authenticated(User),
    /// The last operation failed. `previous_user` is kept when a refresh of
    /// an otherwise valid session failed for reasons other than 401.
    Error {
        message: String,
        previous_user: Option<User>,
    },
}

impl AuthState {
    /// True whenever a user is known, including an error that kept the
    /// previous user.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.user().is_some()
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// The user to display, if any.
    #[must_use]
    pub fn user(&self) -> Option<&User> {
        match self {
            Self::Authenticated(user) => Some(user),
            Self::Error { previous_user, .. } => previous_user.as_ref(),
            Self::Anonymous | Self::Loading => None,
        }
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Error { message, .. } => Some(message),
            _ => None,
        }
    }

    /// Short label for logs.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Anonymous => "anonymous",
            Self::Loading => "loading",
            Self::Authenticated(_) => "authenticated",
            Self::Error { .. } => "error",
        }
    }
}
