//! Authentication service.
//!
//! Owns the session lifecycle: restoring a persisted session, logging in,
//! signing up, logging out and profile updates. The token and user are
//! written to session storage after every successful change and removed on
//! logout.

mod error;
mod forms;
mod reset;

pub use error::AuthError;
pub use forms::{MIN_PASSWORD_LENGTH, ProfileUpdate, SignupForm};
pub use reset::{OTP_LENGTH, PasswordReset, ResetStep};

use tracing::instrument;

use hawk_leather_core::Email;

use crate::api::{ApiClient, SignedIn};
use crate::error::{StorefrontError, clear_sentry_user, set_sentry_user};
use crate::models::{Cart, Session, User};
use crate::notify::Notifier;
use crate::services::surface;
use crate::storage::{self, SessionStorage};

/// Authentication service.
///
/// Borrows the session and cart for the duration of one operation.
pub struct AuthService<'a> {
    api: &'a ApiClient,
    storage: &'a dyn SessionStorage,
    notifier: &'a dyn Notifier,
    session: &'a mut Session,
    cart: &'a mut Cart,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub fn new(
        api: &'a ApiClient,
        storage: &'a dyn SessionStorage,
        notifier: &'a dyn Notifier,
        session: &'a mut Session,
        cart: &'a mut Cart,
    ) -> Self {
        Self {
            api,
            storage,
            notifier,
            session,
            cart,
        }
    }

    /// Whether a user is signed in.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    // =========================================================================
    // Session Lifecycle
    // =========================================================================

    /// Restore the persisted session.
    ///
    /// With both a token and a stored user, the user is refreshed from the
    /// backend; if that fails the stored user is kept. With either missing,
    /// the session starts signed out.
    ///
    /// # Errors
    ///
    /// Returns `StorefrontError::Storage` if session storage cannot be read.
    #[instrument(skip(self))]
    pub async fn restore(&mut self) -> Result<(), StorefrontError> {
        let stored = storage::load_session(self.storage)?;

        let (Some(token), Some(user)) = (stored.token, stored.user) else {
            self.session.sign_out();
            tracing::debug!("No persisted session");
            return Ok(());
        };

        set_sentry_user(&user.id, Some(&user.email));
        self.session.sign_in(token, user);
        self.refresh_user().await;
        Ok(())
    }

    /// Re-fetch the signed-in user's profile.
    ///
    /// Failures are logged and the current user is kept.
    #[instrument(skip(self))]
    pub async fn refresh_user(&mut self) {
        let Ok(token) = self.session.token() else {
            return;
        };

        let fetched = self.api.get_user(token).await;
        match fetched {
            Ok(user) => {
                if let Err(e) = storage::save_user(self.storage, &user) {
                    StorefrontError::from(e).capture();
                }
                self.session.set_user(user);
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to refresh user, keeping stored profile");
            }
        }
    }

    /// Log in with email and password.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is invalid, the credentials are
    /// rejected, or the session cannot be persisted.
    #[instrument(skip(self, password))]
    pub async fn login(&mut self, email: &str, password: &str) -> Result<User, StorefrontError> {
        const FALLBACK: &str = "Login failed";

        let email = match validate_login(email, password) {
            Ok(email) => email,
            Err(e) => return Err(surface(self.notifier, e, FALLBACK)),
        };

        let signed_in = self
            .api
            .login(email.as_str(), password)
            .await
            .map_err(|e| surface(self.notifier, e, FALLBACK))?;

        let user = self
            .establish(signed_in)
            .map_err(|e| surface(self.notifier, e, FALLBACK))?;
        self.notifier.success("Logged in successfully!");
        Ok(user)
    }

    /// Create an account and sign in.
    ///
    /// # Errors
    ///
    /// Returns an error if the form is invalid, the backend refuses, or the
    /// session cannot be persisted.
    #[instrument(skip_all)]
    pub async fn signup(&mut self, form: &SignupForm) -> Result<User, StorefrontError> {
        const FALLBACK: &str = "Signup failed";

        let (profile, email) = match form.validate() {
            Ok(valid) => valid,
            Err(e) => return Err(surface(self.notifier, e, FALLBACK)),
        };

        let signed_in = self
            .api
            .register(&profile, email.as_str(), &form.password)
            .await
            .map_err(|e| surface(self.notifier, e, FALLBACK))?;

        let user = self
            .establish(signed_in)
            .map_err(|e| surface(self.notifier, e, FALLBACK))?;
        self.notifier.success("Account created successfully!");
        Ok(user)
    }

    /// Persist a fresh sign-in and make it the current session.
    fn establish(&mut self, signed_in: SignedIn) -> Result<User, StorefrontError> {
        let SignedIn { token, user } = signed_in;

        storage::save_token(self.storage, &token)?;
        storage::save_user(self.storage, &user)?;

        set_sentry_user(&user.id, Some(&user.email));
        self.session.sign_in(token, user.clone());
        tracing::info!(user_id = %user.id, "User signed in");
        Ok(user)
    }

    /// Sign out, forgetting the persisted session and the local cart.
    ///
    /// Never fails: a storage error is logged and the in-memory session is
    /// cleared regardless.
    #[instrument(skip(self))]
    pub fn logout(&mut self) {
        if let Err(e) = storage::clear_session(self.storage) {
            StorefrontError::from(e).capture();
        }
        self.session.sign_out();
        self.cart.clear();
        clear_sentry_user();
        self.notifier.success("Logged out successfully");
    }

    /// Update the signed-in user's profile.
    ///
    /// # Errors
    ///
    /// Returns an error if not signed in, the form is invalid, or the backend
    /// refuses.
    #[instrument(skip_all)]
    pub async fn update_profile(&mut self, update: &ProfileUpdate) -> Result<User, StorefrontError> {
        const FALLBACK: &str = "Failed to update profile";

        let fields = match update.validate() {
            Ok(fields) => fields,
            Err(e) => return Err(surface(self.notifier, e, FALLBACK)),
        };
        let token = self
            .session
            .token()
            .map_err(|e| surface(self.notifier, e, FALLBACK))?;

        let user = self
            .api
            .update_user(token, &fields)
            .await
            .map_err(|e| surface(self.notifier, e, FALLBACK))?;

        storage::save_user(self.storage, &user).map_err(|e| surface(self.notifier, e, FALLBACK))?;
        self.session.set_user(user.clone());
        self.notifier.success("Profile updated successfully!");
        Ok(user)
    }
}

fn validate_login(email: &str, password: &str) -> Result<Email, AuthError> {
    if email.trim().is_empty() || password.is_empty() {
        return Err(AuthError::MissingFields);
    }
    Ok(Email::parse(email)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_requires_both_fields() {
        assert!(matches!(
            validate_login("", "pw"),
            Err(AuthError::MissingFields)
        ));
        assert!(matches!(
            validate_login("a@b.co", ""),
            Err(AuthError::MissingFields)
        ));
        assert!(matches!(
            validate_login("ab.co", "pw"),
            Err(AuthError::InvalidEmail(_))
        ));
        assert!(validate_login("a@b.co", "pw").is_ok());
    }
}
