//! Login, signup, profile and password reset.

use secrecy::ExposeSecret;

use hawk_leather_storefront::Storefront;
use hawk_leather_storefront::services::auth::ResetStep;
use hawk_leather_storefront::services::{PasswordReset, ProfileUpdate, SignupForm};

use crate::console::Console;
use crate::error::CliError;

pub async fn login(store: &mut Storefront, console: &mut Console, email: &str) -> Result<(), CliError> {
    let password = console.ask_secret("Password").await?;
    store.auth().login(email, password.expose_secret()).await?;

    // The cart belongs to the account that just signed in
    if let Err(e) = store.cart().refresh().await {
        tracing::warn!(error = %e, "Cart load after login failed");
    }
    Ok(())
}

pub async fn signup(store: &mut Storefront, console: &mut Console) -> Result<(), CliError> {
    let mut form = SignupForm {
        name: console.ask("Full name").await?,
        email: console.ask("Email").await?,
        ..SignupForm::default()
    };
    form.password = console.ask_secret("Password").await?.expose_secret().to_string();
    form.confirm_password = console
        .ask_secret("Confirm password")
        .await?
        .expose_secret()
        .to_string();
    form.phone = console.ask("Phone number").await?;
    form.occupation = console.ask("Occupation").await?;
    form.street_address = console.ask("Street address").await?;
    form.city = console.ask("City").await?;
    form.state = console.ask("State").await?;
    form.pincode = console.ask("Pincode").await?;

    store.auth().signup(&form).await?;
    Ok(())
}

pub fn logout(store: &mut Storefront) {
    store.auth().logout();
}

pub fn whoami(store: &Storefront) {
    let Some(user) = store.user() else {
        println!("Not logged in");
        return;
    };

    println!("[{}] {}", user.initials(), user.name);
    if !user.occupation.is_empty() {
        println!("{}", user.occupation);
    }
    println!("{}", user.email);
    if let Some(phone) = user.phone_number {
        println!("{phone}");
    }
    let address = user.shipping_address();
    if address.is_complete() {
        println!("{}", address.one_line());
    }
    println!("{} item(s) in cart", store.cart_state().count());
}

/// Edit the profile field by field; a blank answer keeps the current value.
pub async fn profile(store: &mut Storefront, console: &mut Console) -> Result<(), CliError> {
    let Some(user) = store.user().cloned() else {
        println!("Please login to continue");
        return Ok(());
    };

    let phone = user.phone_number.map(|n| n.to_string()).unwrap_or_default();
    let pincode = user.pincode.map(|n| n.to_string()).unwrap_or_default();

    let update = ProfileUpdate {
        name: console.ask_or_keep("Full name", &user.name).await?,
        occupation: console.ask_or_keep("Occupation", &user.occupation).await?,
        phone: console.ask_or_keep("Phone number", &phone).await?,
        street_address: console
            .ask_or_keep("Street address", &user.street_address)
            .await?,
        city: console.ask_or_keep("City", &user.city).await?,
        state: console.ask_or_keep("State", &user.state).await?,
        pincode: console.ask_or_keep("Pincode", &pincode).await?,
    };

    store.auth().update_profile(&update).await?;
    Ok(())
}

/// Walk the three reset steps, retrying a step after a rejected answer.
pub async fn forgot_password(store: &Storefront, console: &mut Console) -> Result<(), CliError> {
    let api = store.api();
    let notifier = store.notifier();
    let mut reset = PasswordReset::new();

    while reset.step() != ResetStep::Done {
        let attempt = match reset.step() {
            ResetStep::Email => {
                let email = console.ask("Email").await?;
                reset.request_otp(api, notifier, &email).await
            }
            ResetStep::Otp => {
                let otp = console.ask("OTP from your email").await?;
                reset.verify_otp(api, notifier, &otp).await
            }
            ResetStep::Reset => {
                let new_password = console.ask_secret("New password").await?;
                let confirm = console.ask_secret("Confirm new password").await?;
                reset
                    .reset(
                        api,
                        notifier,
                        new_password.expose_secret(),
                        confirm.expose_secret(),
                    )
                    .await
            }
            ResetStep::Done => break,
        };

        if let Err(e) = attempt {
            tracing::debug!(step = %reset.step(), error = %e, "Reset step rejected");
            if !console.confirm("Try again?").await? {
                return Err(e.into());
            }
        }
    }

    println!("You can now log in with your new password");
    Ok(())
}
