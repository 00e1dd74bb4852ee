//! Integration tests for login, logout, and admin view gating.

#![allow(clippy::unwrap_used)]

use atelier_client::{AdminGate, FileSlot, GateDecision, LoginError, SessionStore};
use atelier_integration_tests::{
    ADMIN_EMAIL, ADMIN_PASSWORD, MockBackend, VALID_TOKEN, temp_session_path,
};
use secrecy::{ExposeSecret, SecretString};

// =============================================================================
// Login
// =============================================================================

#[tokio::test]
async fn test_login_stores_credential() {
    let backend = MockBackend::start().await.unwrap();
    let session = SessionStore::in_memory();
    let gate = AdminGate::new(backend.client(session.clone()));

    gate.login(ADMIN_EMAIL, &SecretString::from(ADMIN_PASSWORD))
        .await
        .unwrap();

    assert_eq!(
        session.credential().await.unwrap().expose_secret(),
        VALID_TOKEN
    );
    let login = &backend.requests_to("POST", "/api/auth/login")[0];
    assert_eq!(login.authorization, None);
}

#[tokio::test]
async fn test_wrong_password_shows_generic_message() {
    let backend = MockBackend::start().await.unwrap();
    let session = SessionStore::in_memory();
    let gate = AdminGate::new(backend.client(session.clone()));

    let err = gate
        .login(ADMIN_EMAIL, &SecretString::from("wrong"))
        .await
        .unwrap_err();

    assert_eq!(err, LoginError::InvalidCredentials);
    assert_eq!(err.to_string(), "Invalid email or password");
    assert!(!session.is_authenticated().await);
}

#[tokio::test]
async fn test_unknown_email_shows_same_message() {
    let backend = MockBackend::start().await.unwrap();
    let gate = AdminGate::new(backend.client(SessionStore::in_memory()));

    let wrong_password = gate
        .login(ADMIN_EMAIL, &SecretString::from("wrong"))
        .await
        .unwrap_err();
    let wrong_email = gate
        .login("someone@atelier.test", &SecretString::from(ADMIN_PASSWORD))
        .await
        .unwrap_err();

    assert_eq!(wrong_password.to_string(), wrong_email.to_string());
}

#[tokio::test]
async fn test_unreachable_backend_shows_same_message() {
    let backend = MockBackend::start().await.unwrap();
    let mut url = backend.url();
    url.set_port(Some(9)).unwrap();
    let api = atelier_client::ApiClient::new(
        &atelier_client::ClientConfig::new(url),
        SessionStore::in_memory(),
    )
    .unwrap();

    let err = AdminGate::new(api)
        .login(ADMIN_EMAIL, &SecretString::from(ADMIN_PASSWORD))
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Invalid email or password");
}

// =============================================================================
// Gate
// =============================================================================

#[tokio::test]
async fn test_no_credential_redirects_without_network_call() {
    let backend = MockBackend::start().await.unwrap();
    let gate = AdminGate::new(backend.client(SessionStore::in_memory()));

    assert_eq!(gate.check().await, GateDecision::RedirectToLogin);
    assert!(backend.requests().is_empty());
}

#[tokio::test]
async fn test_valid_credential_is_allowed() {
    let backend = MockBackend::start().await.unwrap();
    let session = SessionStore::in_memory();
    session.set_credential(VALID_TOKEN).await.unwrap();
    let gate = AdminGate::new(backend.client(session.clone()));

    let GateDecision::Allow(admin) = gate.check().await else {
        panic!("expected the gate to allow a valid credential");
    };

    assert_eq!(admin.email, ADMIN_EMAIL);
    assert!(session.is_authenticated().await);
    assert_eq!(backend.requests_to("GET", "/api/auth/me").len(), 1);
}

#[tokio::test]
async fn test_rejected_credential_is_cleared_and_redirected() {
    let backend = MockBackend::start().await.unwrap();
    let path = temp_session_path("gate-rejected");
    let session = SessionStore::open(FileSlot::new(&path)).unwrap();
    session.set_credential("revoked-token").await.unwrap();
    let gate = AdminGate::new(backend.client(session.clone()));

    assert_eq!(gate.check().await, GateDecision::RedirectToLogin);
    assert!(!session.is_authenticated().await);

    // Gone from storage too, so the next run starts logged out.
    let reopened = SessionStore::open(FileSlot::new(&path)).unwrap();
    assert!(!reopened.is_authenticated().await);
}

#[tokio::test]
async fn test_logout_makes_no_network_call() {
    let backend = MockBackend::start().await.unwrap();
    let session = SessionStore::in_memory();
    session.set_credential(VALID_TOKEN).await.unwrap();
    let gate = AdminGate::new(backend.client(session.clone()));

    gate.logout().await.unwrap();

    assert!(!session.is_authenticated().await);
    assert!(backend.requests().is_empty());
    assert_eq!(gate.check().await, GateDecision::RedirectToLogin);
}
