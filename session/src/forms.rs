//! Client-side validation for the login and signup forms.
//!
//! Validation runs before any network call; a form that fails here never
//! reaches the API.

#[cfg(test)]
#[path = "forms_test.rs"]
mod forms_test;

pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("Please fill in all fields")]
    MissingFields,

    #[error("Passwords do not match!")]
    PasswordMismatch,

    #[error("Password must be at least 6 characters long!")]
    PasswordTooShort,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    #[must_use]
    pub fn new(email: &str, password: &str) -> Self {
        Self { email: email.to_owned(), password: password.to_owned() }
    }

    /// Check that both fields are present. Returns the trimmed email.
    ///
    /// # Errors
    ///
    /// [`FormError::MissingFields`] if either field is blank.
    pub fn validate(&self) -> Result<&str, FormError> {
        let email = self.email.trim();
        if email.is_empty() || self.password.is_empty() {
            return Err(FormError::MissingFields);
        }
        Ok(email)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SignupForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl SignupForm {
    /// Check presence, confirmation match, then length, in that order.
    ///
    /// # Errors
    ///
    /// The first [`FormError`] that applies.
    pub fn validate(&self) -> Result<(), FormError> {
        if self.name.trim().is_empty()
            || self.email.trim().is_empty()
            || self.password.is_empty()
            || self.confirm_password.is_empty()
        {
            return Err(FormError::MissingFields);
        }
        if self.password != self.confirm_password {
            return Err(FormError::PasswordMismatch);
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(FormError::PasswordTooShort);
        }
        Ok(())
    }
}
