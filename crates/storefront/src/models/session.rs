//! Authentication state held for the current run.

use secrecy::SecretString;

use crate::error::StorefrontError;
use crate::models::user::User;

/// The signed-in user and their bearer token.
///
/// A session counts as authenticated when a user is present, matching what
/// the storefront shows; every authenticated request additionally needs the
/// token.
#[derive(Debug, Default)]
pub struct Session {
    token: Option<SecretString>,
    user: Option<User>,
}

impl Session {
    /// Whether a user is signed in.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// The signed-in user, if any.
    #[must_use]
    pub const fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// Bearer token for authenticated requests.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::NotAuthenticated`] if no user is signed in
    /// or no token is held.
    pub fn token(&self) -> Result<&SecretString, StorefrontError> {
        match (&self.user, &self.token) {
            (Some(_), Some(token)) => Ok(token),
            _ => Err(StorefrontError::NotAuthenticated),
        }
    }

    pub(crate) fn sign_in(&mut self, token: SecretString, user: User) {
        self.token = Some(token);
        self.user = Some(user);
    }

    pub(crate) fn set_user(&mut self, user: User) {
        self.user = Some(user);
    }

    pub(crate) fn sign_out(&mut self) {
        self.token = None;
        self.user = None;
    }
}
