use axum::http::StatusCode;

use crate::common::{MockBrowser, TestApp};

async fn assert_redirects_to_login(browser: &mut MockBrowser, path: &str) {
    let page = browser.get(path).await;
    assert_eq!(page.status, StatusCode::SEE_OTHER, "GET {path}");
    assert_eq!(page.location(), Some("/login"), "GET {path}");
}

#[tokio::test]
async fn test_protected_routes_redirect_without_cookie() {
    let app = TestApp::new().await;
    let mut browser = MockBrowser::new(&app.router);

    for path in ["/", "/profile", "/projects", "/projects/new", "/tasks", "/tasks/new"] {
        assert_redirects_to_login(&mut browser, path).await;
    }
}

#[tokio::test]
async fn test_public_routes_are_reachable_without_cookie() {
    let app = TestApp::new().await;
    let mut browser = MockBrowser::new(&app.router);

    let page = browser.get("/login").await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("/oauth/github/login"));
}

#[tokio::test]
async fn test_state_only_cookie_is_not_a_session() {
    let app = TestApp::new().await;
    let mut browser = MockBrowser::new(&app.router);

    // starting a login stores the state but no session token
    let start = browser.get("/oauth/github/login").await;
    assert_eq!(start.status, StatusCode::FOUND);
    assert!(browser.cookie("_session").is_some());

    assert_redirects_to_login(&mut browser, "/").await;
}

#[tokio::test]
async fn test_tampered_cookie_is_rejected() {
    let app = TestApp::new().await;
    let mut browser = MockBrowser::new(&app.router);

    browser.set_cookie("_session", "garbage");
    assert_redirects_to_login(&mut browser, "/projects").await;

    browser.login().await;
    let valid = browser.cookie("_session").expect("session cookie").to_string();
    let (payload, _) = valid.split_once('.').expect("signed cookie");
    browser.set_cookie("_session", &format!("{payload}.AAAA"));
    assert_redirects_to_login(&mut browser, "/projects").await;
}

#[tokio::test]
async fn test_logged_out_token_is_rejected() {
    let app = TestApp::new().await;
    let mut browser = MockBrowser::new(&app.router);
    browser.login().await;
    let old_cookie = browser.cookie("_session").expect("session cookie").to_string();

    let page = browser.delete("/logout").await;
    assert_eq!(page.status, StatusCode::SEE_OTHER);
    assert_eq!(page.header("hx-redirect"), Some("/login"));
    assert!(browser.cookie("_session").is_none());
    assert_eq!(app.count("sessions").await, 0);

    // replaying the old cookie must not bring the session back
    browser.set_cookie("_session", &old_cookie);
    assert_redirects_to_login(&mut browser, "/").await;
}

#[tokio::test]
async fn test_guard_runs_before_form_handlers() {
    let app = TestApp::new().await;
    let mut browser = MockBrowser::new(&app.router);

    let page = browser
        .post_form("/projects", &[("title", "Sneaky"), ("description", "")])
        .await;
    assert_eq!(page.status, StatusCode::SEE_OTHER);
    assert_eq!(page.location(), Some("/login"));
    assert_eq!(app.count("projects").await, 0);

    let page = browser
        .post_form("/tasks", &[("title", "Sneaky"), ("project_id", "1")])
        .await;
    assert_eq!(page.status, StatusCode::SEE_OTHER);
    assert_eq!(app.count("tasks").await, 0);
}

#[tokio::test]
async fn test_logout_without_session_redirects() {
    let app = TestApp::new().await;
    let mut browser = MockBrowser::new(&app.router);

    let page = browser.delete("/logout").await;
    assert_eq!(page.status, StatusCode::SEE_OTHER);
    assert_eq!(page.location(), Some("/login"));
}
