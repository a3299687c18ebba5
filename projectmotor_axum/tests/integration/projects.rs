use axum::http::StatusCode;

use crate::common::{MockBrowser, TestApp};

async fn project_id(app: &TestApp, title: &str) -> i64 {
    app.scalar(&format!("SELECT id FROM projects WHERE title = '{title}'"))
        .await
}

async fn user_id(app: &TestApp, email: &str) -> i64 {
    app.scalar(&format!("SELECT id FROM users WHERE email = '{email}'"))
        .await
}

#[tokio::test]
async fn test_create_and_list_projects() {
    let app = TestApp::new().await;
    let mut browser = MockBrowser::new(&app.router);
    browser.login().await;

    let page = browser.get("/projects").await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("any projects yet"));

    let page = browser
        .post_form("/projects", &[("title", "P1"), ("description", "first")])
        .await;
    assert_eq!(page.status, StatusCode::SEE_OTHER);
    assert_eq!(page.header("hx-redirect"), Some("/projects"));

    let page = browser.get("/projects").await;
    assert!(page.body.contains("P1"));
    assert!(!page.body.contains("any projects yet"));
}

#[tokio::test]
async fn test_blank_title_rerenders_form() {
    let app = TestApp::new().await;
    let mut browser = MockBrowser::new(&app.router);
    browser.login().await;

    let page = browser
        .post_form("/projects", &[("title", "   "), ("description", "kept")])
        .await;
    assert_eq!(page.status, StatusCode::BAD_REQUEST);
    assert!(page.body.contains("cannot be blank"));
    assert!(page.body.contains("kept"));
    assert_eq!(app.count("projects").await, 0);
}

#[tokio::test]
async fn test_projects_are_owner_scoped() {
    let app = TestApp::new().await;
    let mut alice = MockBrowser::new(&app.router);
    alice.login().await;
    alice
        .post_form("/projects", &[("title", "Secret"), ("description", "")])
        .await;
    let id = project_id(&app, "Secret").await;

    app.provider.sign_in_as("7", "b@example.com");
    let mut bob = MockBrowser::new(&app.router);
    bob.login().await;

    assert!(!bob.get("/projects").await.body.contains("Secret"));
    assert_eq!(
        bob.get(&format!("/projects/{id}/edit")).await.status,
        StatusCode::NOT_FOUND
    );
    let page = bob
        .patch_form(&format!("/projects/{id}"), &[("title", "Mine now")])
        .await;
    assert_eq!(page.status, StatusCode::NOT_FOUND);
    assert_eq!(
        bob.delete(&format!("/projects/{id}")).await.status,
        StatusCode::NOT_FOUND
    );
    assert_eq!(app.count("projects").await, 1);
}

#[tokio::test]
async fn test_update_toggle_and_delete() {
    let app = TestApp::new().await;
    let mut browser = MockBrowser::new(&app.router);
    browser.login().await;
    browser
        .post_form("/projects", &[("title", "Draft"), ("description", "")])
        .await;
    let id = project_id(&app, "Draft").await;

    let page = browser
        .patch_form(
            &format!("/projects/{id}"),
            &[("title", "Renamed"), ("description", "now described")],
        )
        .await;
    assert_eq!(page.status, StatusCode::SEE_OTHER);
    assert!(browser.get("/projects").await.body.contains("Renamed"));

    let page = browser
        .patch_form(&format!("/projects/{id}/toggle"), &[])
        .await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("Published"));
    let trigger = format!("toggle-project-status:{id}");
    assert_eq!(page.header("hx-trigger"), Some(trigger.as_str()));

    let page = browser
        .patch_form(&format!("/projects/{id}/toggle"), &[])
        .await;
    assert!(page.body.contains("Draft"));

    assert_eq!(
        browser.delete(&format!("/projects/{id}")).await.status,
        StatusCode::OK
    );
    assert_eq!(app.count("projects").await, 0);
    assert_eq!(
        browser.delete(&format!("/projects/{id}")).await.status,
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn test_share_outcomes() {
    let app = TestApp::new().await;

    app.provider.sign_in_as("7", "b@example.com");
    let mut bob = MockBrowser::new(&app.router);
    bob.login().await;
    let bob_id = user_id(&app, "b@example.com").await;

    app.provider.sign_in_as("42", "a@example.com");
    let mut alice = MockBrowser::new(&app.router);
    alice.login().await;
    alice
        .post_form("/projects", &[("title", "Shared"), ("description", "")])
        .await;
    let id = project_id(&app, "Shared").await;
    let share_path = format!("/projects/{id}/share");

    let page = alice.post_form(&share_path, &[("email", "b@example.com")]).await;
    assert_eq!(page.status, StatusCode::CREATED);
    assert!(page.body.contains("Project shared successfully."));
    assert!(page.body.contains("b@example.com"));
    assert_eq!(app.count("projects_users").await, 1);

    let page = alice.post_form(&share_path, &[("email", "B@Example.com")]).await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("already has access to the project"));
    assert_eq!(app.count("projects_users").await, 1);

    let page = alice
        .post_form(&share_path, &[("email", "nobody@example.com")])
        .await;
    assert_eq!(page.status, StatusCode::NOT_FOUND);
    assert!(page.body.contains("find a user with the email address you provided"));

    let page = alice.post_form(&share_path, &[("email", "a@example.com")]).await;
    assert_eq!(page.status, StatusCode::BAD_REQUEST);
    assert!(page.body.contains("share a project with yourself"));

    let page = alice.post_form(&share_path, &[("email", "not-an-email")]).await;
    assert_eq!(page.status, StatusCode::BAD_REQUEST);
    assert!(page.body.contains("must be a valid email address"));
    assert!(page.body.contains("not-an-email"));

    let share_page = alice.get(&share_path).await;
    assert_eq!(share_page.status, StatusCode::OK);
    assert!(share_page.body.contains("b@example.com"));

    // the share shows up for bob as data, not as ownership
    assert_eq!(
        bob.get(&format!("/projects/{id}/edit")).await.status,
        StatusCode::NOT_FOUND
    );

    let revoke_path = format!("/projects/{id}/share/{bob_id}");
    let page = alice.delete(&revoke_path).await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("Project unshared successfully."));
    assert_eq!(app.count("projects_users").await, 0);

    let page = alice.delete(&revoke_path).await;
    assert_eq!(page.status, StatusCode::OK);
}

#[tokio::test]
async fn test_share_requires_ownership() {
    let app = TestApp::new().await;
    let mut alice = MockBrowser::new(&app.router);
    alice.login().await;
    alice
        .post_form("/projects", &[("title", "Alice only"), ("description", "")])
        .await;
    let id = project_id(&app, "Alice only").await;
    let alice_id = user_id(&app, "a@example.com").await;

    app.provider.sign_in_as("7", "b@example.com");
    let mut bob = MockBrowser::new(&app.router);
    bob.login().await;

    let page = bob
        .post_form(
            &format!("/projects/{id}/share"),
            &[("email", "b@example.com")],
        )
        .await;
    assert_eq!(page.status, StatusCode::NOT_FOUND);
    assert_eq!(app.count("projects_users").await, 0);

    let page = bob
        .delete(&format!("/projects/{id}/share/{alice_id}"))
        .await;
    assert_eq!(page.status, StatusCode::NOT_FOUND);
}
