//! Authentication error types.
//!
//! Display text is shown to the user as-is.

use thiserror::Error;

use super::reset::ResetStep;

/// Errors from validating account input or sequencing the reset flow.
#[derive(Debug, Error)]
pub enum AuthError {
    /// A required form field is blank.
    #[error("Please fill in all fields")]
    MissingFields,

    /// Email left blank where it is the only field.
    #[error("Please enter your email")]
    EmailRequired,

    /// Invalid email format.
    #[error("Please enter a valid email address")]
    InvalidEmail(#[from] hawk_leather_core::EmailError),

    /// Password too short.
    #[error("Password must be at least {min} characters")]
    WeakPassword { min: usize },

    /// Password and confirmation differ.
    #[error("Passwords do not match")]
    PasswordMismatch,

    /// A numeric field (phone, pincode) is not a number.
    #[error("Please enter a valid {0}")]
    InvalidNumber(&'static str),

    /// OTP is not the expected number of digits.
    #[error("Please enter complete OTP")]
    InvalidOtp,

    /// A reset step was attempted before the previous one finished.
    #[error("Password reset is at the {current} step")]
    ResetOutOfOrder { current: ResetStep },
}
