//! Session lifecycle against the mock backend: login, signup, restore,
//! logout, profile updates and password reset.

use std::sync::Arc;

use serde_json::json;

use hawk_leather_integration_tests::{BELT, EMAIL, Harness, PASSWORD, TOKEN};
use hawk_leather_storefront::error::StorefrontError;
use hawk_leather_storefront::services::auth::ResetStep;
use hawk_leather_storefront::services::{PasswordReset, ProfileUpdate, SignupForm};
use hawk_leather_storefront::storage::{MemoryStorage, SessionStorage, keys};

fn signup_form(email: &str) -> SignupForm {
    SignupForm {
        name: "Meera Iyer".to_string(),
        email: email.to_string(),
        password: "saddle99".to_string(),
        confirm_password: "saddle99".to_string(),
        phone: "9123456780".to_string(),
        occupation: "Designer".to_string(),
        street_address: "12 Residency Road".to_string(),
        city: "Chennai".to_string(),
        state: "Tamil Nadu".to_string(),
        pincode: "600001".to_string(),
    }
}

#[tokio::test]
async fn test_login_persists_session() {
    let mut h = Harness::new().await;

    let user = h.store.auth().login(EMAIL, PASSWORD).await.unwrap();

    assert_eq!(user.name, "Asha Rao");
    assert!(h.store.session().is_authenticated());
    assert_eq!(h.messages(), vec!["Logged in successfully!"]);
    assert_eq!(h.storage.get(keys::AUTH_TOKEN).unwrap().as_deref(), Some(TOKEN));
    assert!(h.storage.get(keys::USER_DATA).unwrap().is_some());
}

#[tokio::test]
async fn test_login_rejected_shows_server_message() {
    let mut h = Harness::new().await;

    let result = h.store.auth().login(EMAIL, "wrong-password").await;

    assert!(result.is_err());
    assert!(!h.store.session().is_authenticated());
    assert_eq!(h.messages(), vec!["Invalid email or password"]);
    assert!(h.storage.get(keys::AUTH_TOKEN).unwrap().is_none());
}

#[tokio::test]
async fn test_login_validates_before_calling_backend() {
    let mut h = Harness::new().await;

    let result = h.store.auth().login("not-an-email", PASSWORD).await;

    assert!(matches!(result, Err(StorefrontError::Auth(_))));
    assert_eq!(h.messages(), vec!["Please enter a valid email address"]);
    assert_eq!(h.backend.calls("auth.login"), 0);
}

#[tokio::test]
async fn test_restore_refreshes_user_from_backend() {
    let signed_in = Harness::signed_in().await;
    let Harness {
        backend, storage, ..
    } = signed_in;
    backend.state().user["userName"] = json!("Asha R. Rao");

    let h = Harness::over(backend, storage).await;

    assert!(h.store.session().is_authenticated());
    assert_eq!(h.store.user().unwrap().name, "Asha R. Rao");
    assert_eq!(h.store.checkout_form().address().city, "Bengaluru");
    assert!(h.backend.calls("auth.user") >= 1);
}

#[tokio::test]
async fn test_restore_keeps_stored_user_when_refresh_fails() {
    let signed_in = Harness::signed_in().await;
    let Harness {
        backend, storage, ..
    } = signed_in;
    {
        let mut state = backend.state();
        state.fail_user_fetch = true;
        state.user["userName"] = json!("Someone Else");
    }

    let h = Harness::over(backend, storage).await;

    assert!(h.store.session().is_authenticated());
    assert_eq!(h.store.user().unwrap().name, "Asha Rao");
}

#[tokio::test]
async fn test_restore_without_user_starts_signed_out() {
    let storage = Arc::new(MemoryStorage::new());
    storage.set(keys::AUTH_TOKEN, TOKEN).unwrap();

    let h = Harness::with_storage(storage).await;

    assert!(!h.store.session().is_authenticated());
    assert_eq!(h.backend.calls("auth.user"), 0);
    assert_eq!(h.backend.calls("cart.get"), 0);
}

#[tokio::test]
async fn test_logout_clears_session_and_cart() {
    let mut h = Harness::signed_in().await;
    h.backend.state().seed_cart(BELT, 1);
    h.store.cart().refresh().await.unwrap();
    assert!(!h.store.cart_state().is_empty());

    h.store.auth().logout();

    assert!(!h.store.session().is_authenticated());
    assert!(h.store.cart_state().is_empty());
    assert!(h.storage.get(keys::AUTH_TOKEN).unwrap().is_none());
    assert!(h.storage.get(keys::USER_DATA).unwrap().is_none());
    assert_eq!(h.messages(), vec!["Logged out successfully"]);
}

#[tokio::test]
async fn test_signup_creates_account_and_signs_in() {
    let mut h = Harness::new().await;

    let user = h
        .store
        .auth()
        .signup(&signup_form("meera@example.com"))
        .await
        .unwrap();

    assert_eq!(user.name, "Meera Iyer");
    assert_eq!(user.pincode, Some(600_001));
    assert!(h.store.session().is_authenticated());
    assert_eq!(h.messages(), vec!["Account created successfully!"]);
}

#[tokio::test]
async fn test_signup_password_mismatch_never_reaches_backend() {
    let mut h = Harness::new().await;
    let mut form = signup_form("meera@example.com");
    form.confirm_password = "saddle98".to_string();

    let result = h.store.auth().signup(&form).await;

    assert!(result.is_err());
    assert_eq!(h.messages(), vec!["Passwords do not match"]);
    assert_eq!(h.backend.calls("auth.register"), 0);
}

#[tokio::test]
async fn test_signup_existing_email_shows_server_message() {
    let mut h = Harness::new().await;

    let result = h.store.auth().signup(&signup_form(EMAIL)).await;

    assert!(result.is_err());
    assert_eq!(h.messages(), vec!["User already exists"]);
    assert!(!h.store.session().is_authenticated());
}

#[tokio::test]
async fn test_update_profile_saves_user() {
    let mut h = Harness::signed_in().await;
    let update = ProfileUpdate {
        name: "Asha Rao".to_string(),
        occupation: "Architect".to_string(),
        phone: "9876543210".to_string(),
        street_address: "88 Chamundi Hill Road".to_string(),
        city: "Mysuru".to_string(),
        state: "Karnataka".to_string(),
        pincode: "570010".to_string(),
    };

    let user = h.store.auth().update_profile(&update).await.unwrap();

    assert_eq!(user.city, "Mysuru");
    assert_eq!(h.store.user().unwrap().city, "Mysuru");
    assert_eq!(h.backend.state().user["city"], "Mysuru");
    assert_eq!(h.messages(), vec!["Profile updated successfully!"]);

    let stored = h.storage.get(keys::USER_DATA).unwrap().unwrap();
    assert!(stored.contains("Mysuru"));
}

#[tokio::test]
async fn test_update_profile_rejects_non_numeric_pincode() {
    let mut h = Harness::signed_in().await;
    let update = ProfileUpdate {
        name: "Asha Rao".to_string(),
        occupation: "Architect".to_string(),
        phone: "9876543210".to_string(),
        street_address: "4 MG Road".to_string(),
        city: "Bengaluru".to_string(),
        state: "Karnataka".to_string(),
        pincode: "56OOO1".to_string(),
    };

    let result = h.store.auth().update_profile(&update).await;

    assert!(result.is_err());
    assert_eq!(h.messages(), vec!["Please enter a valid pincode"]);
    assert_eq!(h.backend.calls("auth.update"), 0);
}

#[tokio::test]
async fn test_password_reset_flow() {
    let h = Harness::new().await;
    let mut reset = PasswordReset::new();

    reset
        .request_otp(h.store.api(), h.store.notifier(), EMAIL)
        .await
        .unwrap();
    assert_eq!(reset.step(), ResetStep::Otp);

    // Three digits is not a complete OTP
    let short = reset.verify_otp(h.store.api(), h.store.notifier(), "432").await;
    assert!(short.is_err());
    assert_eq!(reset.step(), ResetStep::Otp);

    reset
        .verify_otp(h.store.api(), h.store.notifier(), "4321")
        .await
        .unwrap();
    assert_eq!(reset.step(), ResetStep::Reset);

    reset
        .reset(h.store.api(), h.store.notifier(), "newhide1", "newhide1")
        .await
        .unwrap();
    assert_eq!(reset.step(), ResetStep::Done);

    assert_eq!(
        h.messages(),
        vec![
            "OTP sent to your email",
            "Please enter complete OTP",
            "OTP verified successfully",
            "Password reset successfully!",
        ]
    );
    assert_eq!(h.backend.state().password, "newhide1");
    assert_eq!(h.backend.calls("auth.forget.verify"), 1);
}

#[tokio::test]
async fn test_password_reset_wrong_otp_can_be_retried() {
    let h = Harness::new().await;
    let mut reset = PasswordReset::new();
    reset
        .request_otp(h.store.api(), h.store.notifier(), EMAIL)
        .await
        .unwrap();
    h.messages();

    let wrong = reset.verify_otp(h.store.api(), h.store.notifier(), "1111").await;
    assert!(wrong.is_err());
    assert_eq!(reset.step(), ResetStep::Otp);
    assert_eq!(h.messages(), vec!["Invalid or expired OTP"]);

    reset
        .verify_otp(h.store.api(), h.store.notifier(), "4321")
        .await
        .unwrap();
    assert_eq!(reset.step(), ResetStep::Reset);
}
