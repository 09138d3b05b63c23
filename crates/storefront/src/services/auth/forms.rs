//! Account form input and validation.

use hawk_leather_core::Email;

use super::error::AuthError;
use crate::api::types::ProfileFields;

/// Minimum password length.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Sign-up form as the user filled it in.
#[derive(Debug, Clone, Default)]
pub struct SignupForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub phone: String,
    pub occupation: String,
    pub street_address: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
}

impl SignupForm {
    /// Validate the form, returning the profile, parsed email and password.
    ///
    /// # Errors
    ///
    /// Checks in order: every field filled in, passwords match, password
    /// length, email format, numeric phone and pincode.
    pub fn validate(&self) -> Result<(ProfileFields, Email), AuthError> {
        let required = [
            &self.name,
            &self.email,
            &self.password,
            &self.phone,
            &self.occupation,
            &self.street_address,
            &self.city,
            &self.state,
            &self.pincode,
        ];
        if required.iter().any(|field| field.trim().is_empty()) {
            return Err(AuthError::MissingFields);
        }
        if self.password != self.confirm_password {
            return Err(AuthError::PasswordMismatch);
        }
        validate_password(&self.password)?;
        let email = Email::parse(&self.email)?;

        let profile = ProfileUpdate {
            name: self.name.clone(),
            occupation: self.occupation.clone(),
            phone: self.phone.clone(),
            street_address: self.street_address.clone(),
            city: self.city.clone(),
            state: self.state.clone(),
            pincode: self.pincode.clone(),
        }
        .validate()?;

        Ok((profile, email))
    }
}

/// Profile edit form.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub name: String,
    pub occupation: String,
    pub phone: String,
    pub street_address: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
}

impl ProfileUpdate {
    /// Validate and convert to the wire shape.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingFields` if any field is blank and
    /// `AuthError::InvalidNumber` if phone or pincode is not numeric.
    pub fn validate(&self) -> Result<ProfileFields, AuthError> {
        let fields = [
            &self.name,
            &self.phone,
            &self.street_address,
            &self.city,
            &self.state,
            &self.occupation,
            &self.pincode,
        ];
        if fields.iter().any(|field| field.trim().is_empty()) {
            return Err(AuthError::MissingFields);
        }

        Ok(ProfileFields {
            user_name: self.name.trim().to_string(),
            occupation: self.occupation.trim().to_string(),
            pincode: parse_number(&self.pincode, "pincode")?,
            state: self.state.trim().to_string(),
            city: self.city.trim().to_string(),
            street_address: self.street_address.trim().to_string(),
            phone_number: parse_number(&self.phone, "phone number")?,
        })
    }
}

pub(super) fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword {
            min: MIN_PASSWORD_LENGTH,
        });
    }
    Ok(())
}

fn parse_number(value: &str, field: &'static str) -> Result<u64, AuthError> {
    value
        .trim()
        .parse::<u64>()
        .map_err(|_| AuthError::InvalidNumber(field))
}
