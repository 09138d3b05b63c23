//! Three-step password reset: request an OTP by email, exchange the OTP for
//! a reset token, then set the new password with that token.

use std::fmt;

use secrecy::SecretString;
use tracing::instrument;

use hawk_leather_core::Email;

use super::error::AuthError;
use super::forms::validate_password;
use crate::api::ApiClient;
use crate::error::StorefrontError;
use crate::notify::Notifier;
use crate::services::surface;

/// Number of digits in a reset OTP.
pub const OTP_LENGTH: usize = 4;

/// Where the reset flow currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetStep {
    Email,
    Otp,
    Reset,
    Done,
}

impl fmt::Display for ResetStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Email => "email",
            Self::Otp => "OTP",
            Self::Reset => "new password",
            Self::Done => "done",
        })
    }
}

/// State of one password reset attempt.
///
/// Each step only succeeds when the previous one has; a failed step can be
/// retried without starting over.
#[derive(Debug)]
pub struct PasswordReset {
    step: ResetStep,
    email: Option<Email>,
    reset_token: Option<SecretString>,
}

impl Default for PasswordReset {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordReset {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            step: ResetStep::Email,
            email: None,
            reset_token: None,
        }
    }

    /// Current step.
    #[must_use]
    pub const fn step(&self) -> ResetStep {
        self.step
    }

    /// Email the OTP was sent to.
    #[must_use]
    pub const fn email(&self) -> Option<&Email> {
        self.email.as_ref()
    }

    fn expect_step(&self, expected: ResetStep) -> Result<(), AuthError> {
        if self.step == expected {
            Ok(())
        } else {
            Err(AuthError::ResetOutOfOrder { current: self.step })
        }
    }

    /// Ask the backend to email an OTP.
    ///
    /// # Errors
    ///
    /// Returns an error if the email is blank or invalid, the flow is past
    /// this step, or the backend refuses.
    #[instrument(skip(self, api, notifier))]
    pub async fn request_otp(
        &mut self,
        api: &ApiClient,
        notifier: &dyn Notifier,
        email: &str,
    ) -> Result<(), StorefrontError> {
        const FALLBACK: &str = "Failed to send OTP";

        let email = match self.checked_email(email) {
            Ok(email) => email,
            Err(e) => return Err(surface(notifier, e, FALLBACK)),
        };

        api.request_password_reset(email.as_str())
            .await
            .map_err(|e| surface(notifier, e, FALLBACK))?;

        self.email = Some(email);
        self.step = ResetStep::Otp;
        notifier.success("OTP sent to your email");
        Ok(())
    }

    fn checked_email(&self, email: &str) -> Result<Email, AuthError> {
        self.expect_step(ResetStep::Email)?;
        if email.trim().is_empty() {
            return Err(AuthError::EmailRequired);
        }
        Ok(Email::parse(email)?)
    }

    /// Exchange the emailed OTP for a reset token.
    ///
    /// # Errors
    ///
    /// Returns an error if the OTP is not four digits, the flow is not at
    /// this step, or the backend rejects the OTP.
    #[instrument(skip_all)]
    pub async fn verify_otp(
        &mut self,
        api: &ApiClient,
        notifier: &dyn Notifier,
        otp: &str,
    ) -> Result<(), StorefrontError> {
        const FALLBACK: &str = "Invalid OTP";

        let (email, otp) = match self.checked_otp(otp) {
            Ok(checked) => checked,
            Err(e) => return Err(surface(notifier, e, FALLBACK)),
        };

        let token = api
            .verify_reset_otp(&email, otp)
            .await
            .map_err(|e| surface(notifier, e, FALLBACK))?;

        self.reset_token = Some(token);
        self.step = ResetStep::Reset;
        notifier.success("OTP verified successfully");
        Ok(())
    }

    fn checked_otp(&self, otp: &str) -> Result<(String, u32), AuthError> {
        self.expect_step(ResetStep::Otp)?;
        let email = self
            .email
            .as_ref()
            .ok_or(AuthError::ResetOutOfOrder { current: self.step })?;

        let otp = otp.trim();
        if otp.len() != OTP_LENGTH || !otp.bytes().all(|b| b.is_ascii_digit()) {
            return Err(AuthError::InvalidOtp);
        }
        let otp = otp.parse::<u32>().map_err(|_| AuthError::InvalidOtp)?;
        Ok((email.as_str().to_string(), otp))
    }

    /// Set the new password.
    ///
    /// # Errors
    ///
    /// Returns an error if either field is blank, they differ, the password
    /// is too short, the flow is not at this step, or the backend refuses.
    #[instrument(skip_all)]
    pub async fn reset(
        &mut self,
        api: &ApiClient,
        notifier: &dyn Notifier,
        new_password: &str,
        confirm_password: &str,
    ) -> Result<(), StorefrontError> {
        const FALLBACK: &str = "Failed to reset password";

        let token = match self.checked_reset(new_password, confirm_password) {
            Ok(token) => token,
            Err(e) => return Err(surface(notifier, e, FALLBACK)),
        };

        api.reset_password(token, new_password)
            .await
            .map_err(|e| surface(notifier, e, FALLBACK))?;

        self.reset_token = None;
        self.step = ResetStep::Done;
        notifier.success("Password reset successfully!");
        Ok(())
    }

    fn checked_reset(
        &self,
        new_password: &str,
        confirm_password: &str,
    ) -> Result<&SecretString, AuthError> {
        self.expect_step(ResetStep::Reset)?;
        let token = self
            .reset_token
            .as_ref()
            .ok_or(AuthError::ResetOutOfOrder { current: self.step })?;

        if new_password.is_empty() || confirm_password.is_empty() {
            return Err(AuthError::MissingFields);
        }
        if new_password != confirm_password {
            return Err(AuthError::PasswordMismatch);
        }
        validate_password(new_password)?;
        Ok(token)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_steps_must_run_in_order() {
        let reset = PasswordReset::new();
        assert_eq!(reset.step(), ResetStep::Email);
        assert!(matches!(
            reset.checked_otp("1234"),
            Err(AuthError::ResetOutOfOrder {
                current: ResetStep::Email
            })
        ));
        assert!(matches!(
            reset.checked_reset("secret1", "secret1"),
            Err(AuthError::ResetOutOfOrder { .. })
        ));
    }

    #[test]
    fn test_email_checks() {
        let reset = PasswordReset::new();
        assert!(matches!(
            reset.checked_email("  "),
            Err(AuthError::EmailRequired)
        ));
        assert!(matches!(
            reset.checked_email("nope"),
            Err(AuthError::InvalidEmail(_))
        ));
        assert!(reset.checked_email("a@b.co").is_ok());
    }

    #[test]
    fn test_otp_must_be_four_digits() {
        let reset = PasswordReset {
            step: ResetStep::Otp,
            email: Some(Email::parse("a@b.co").unwrap()),
            reset_token: None,
        };
        assert!(matches!(reset.checked_otp("123"), Err(AuthError::InvalidOtp)));
        assert!(matches!(reset.checked_otp("12a4"), Err(AuthError::InvalidOtp)));
        assert_eq!(reset.checked_otp(" 0427 ").unwrap(), ("a@b.co".to_string(), 427));
    }

    #[test]
    fn test_new_password_checks() {
        let reset = PasswordReset {
            step: ResetStep::Reset,
            email: Some(Email::parse("a@b.co").unwrap()),
            reset_token: Some(SecretString::from("reset-token")),
        };
        assert!(matches!(
            reset.checked_reset("", "secret1"),
            Err(AuthError::MissingFields)
        ));
        assert!(matches!(
            reset.checked_reset("secret1", "secret2"),
            Err(AuthError::PasswordMismatch)
        ));
        assert!(matches!(
            reset.checked_reset("abc", "abc"),
            Err(AuthError::WeakPassword { .. })
        ));
        assert!(reset.checked_reset("secret1", "secret1").is_ok());
    }
}
