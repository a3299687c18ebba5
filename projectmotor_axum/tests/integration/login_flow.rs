use axum::http::StatusCode;

use projectmotor::OAuth2Error;

use crate::common::{MockBrowser, TestApp};

#[tokio::test]
async fn test_first_login_creates_user_account_and_session() {
    let app = TestApp::new().await;
    let mut browser = MockBrowser::new(&app.router);

    let page = browser.login().await;
    assert_eq!(page.status, StatusCode::SEE_OTHER);
    assert_eq!(page.location(), Some("/"));

    assert_eq!(app.count("users").await, 1);
    assert_eq!(app.count("accounts").await, 1);
    assert_eq!(app.count("sessions").await, 1);

    let home = browser.get("/").await;
    assert_eq!(home.status, StatusCode::OK);
    assert!(home.body.contains("Welcome back, a@example.com!"));
}

#[tokio::test]
async fn test_login_page_redirects_when_signed_in() {
    let app = TestApp::new().await;
    let mut browser = MockBrowser::new(&app.router);
    browser.login().await;

    let page = browser.get("/login").await;
    assert_eq!(page.status, StatusCode::SEE_OTHER);
    assert_eq!(page.location(), Some("/"));
}

#[tokio::test]
async fn test_second_login_reuses_user_and_adds_session() {
    let app = TestApp::new().await;
    let mut laptop = MockBrowser::new(&app.router);
    let mut phone = MockBrowser::new(&app.router);

    laptop.login().await;
    phone.login().await;

    assert_eq!(app.count("users").await, 1);
    assert_eq!(app.count("accounts").await, 1);
    assert_eq!(app.count("sessions").await, 2);
}

#[tokio::test]
async fn test_state_mismatch_is_rejected() {
    let app = TestApp::new().await;
    let mut browser = MockBrowser::new(&app.router);

    let start = browser.get("/oauth/github/login").await;
    assert_eq!(start.status, StatusCode::FOUND);

    let page = browser
        .get("/oauth/github/callback?code=good-code&state=forged")
        .await;
    assert_eq!(page.status, StatusCode::BAD_REQUEST);
    assert_eq!(app.count("users").await, 0);
    assert_eq!(app.count("sessions").await, 0);
}

#[tokio::test]
async fn test_callback_without_login_start_is_rejected() {
    let app = TestApp::new().await;
    let mut browser = MockBrowser::new(&app.router);

    let page = browser
        .get("/oauth/github/callback?code=good-code&state=anything")
        .await;
    assert_eq!(page.status, StatusCode::BAD_REQUEST);
    assert_eq!(app.count("users").await, 0);
}

#[tokio::test]
async fn test_unknown_provider_is_rejected() {
    let app = TestApp::new().await;
    let mut browser = MockBrowser::new(&app.router);

    let page = browser.get("/oauth/gitlab/login").await;
    assert!(page.status.is_client_error() || page.status.is_server_error());
    assert!(page.location().is_none());
}

#[tokio::test]
async fn test_provider_failure_leaves_nothing_behind() {
    let app = TestApp::new().await;
    let mut browser = MockBrowser::new(&app.router);
    app.provider.fail_with(OAuth2Error::NoPrimaryEmail);

    let page = browser.login().await;
    assert_eq!(page.status, StatusCode::BAD_GATEWAY);
    assert!(!page.body.contains("primary email"));
    assert_eq!(app.count("users").await, 0);
    assert_eq!(app.count("accounts").await, 0);
    assert_eq!(app.count("sessions").await, 0);
}

#[tokio::test]
async fn test_email_taken_by_another_user_keeps_existing_rows() {
    let app = TestApp::new().await;
    let mut first = MockBrowser::new(&app.router);
    first.login().await;

    // a different GitHub account that claims the same address
    app.provider.sign_in_as("99", "a@example.com");
    let mut second = MockBrowser::new(&app.router);
    let page = second.login().await;

    assert_ne!(page.status, StatusCode::SEE_OTHER);
    assert_eq!(app.count("users").await, 1);
    assert_eq!(app.count("accounts").await, 1);
    assert_eq!(app.count("sessions").await, 1);
}

#[tokio::test]
async fn test_logout_all_keeps_current_browser() {
    let app = TestApp::new().await;
    let mut laptop = MockBrowser::new(&app.router);
    let mut phone = MockBrowser::new(&app.router);
    let mut tablet = MockBrowser::new(&app.router);
    laptop.login().await;
    phone.login().await;
    tablet.login().await;

    let page = laptop.delete("/logout/all").await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("Signed out of 2 other sessions."));
    assert_eq!(app.count("sessions").await, 1);

    assert_eq!(laptop.get("/").await.status, StatusCode::OK);
    assert_eq!(phone.get("/").await.status, StatusCode::SEE_OTHER);
    assert_eq!(tablet.get("/").await.status, StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn test_profile_lists_sessions() {
    let app = TestApp::new().await;
    let mut browser = MockBrowser::new(&app.router);
    browser.login().await;

    let page = browser.get("/profile").await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("a@example.com"));
    assert!(page.body.contains("MockBrowser/1.0"));
    assert!(page.body.contains("This device"));
}

#[tokio::test]
async fn test_login_again_in_same_browser_replaces_session() {
    let app = TestApp::new().await;
    let mut browser = MockBrowser::new(&app.router);
    browser.login().await;
    let first_cookie = browser.cookie("_session").expect("session cookie").to_string();

    let page = browser.login().await;
    assert_eq!(page.status, StatusCode::SEE_OTHER);
    assert_eq!(app.count("sessions").await, 1);

    let page = browser.delete("/logout").await;
    assert_eq!(page.status, StatusCode::SEE_OTHER);
    assert_eq!(app.count("sessions").await, 0);

    // the cookie from before the second login is dead as well
    browser.set_cookie("_session", &first_cookie);
    let page = browser.get("/").await;
    assert_eq!(page.status, StatusCode::SEE_OTHER);
    assert_eq!(page.location(), Some("/login"));
}
