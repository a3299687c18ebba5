use axum::http::StatusCode;

use crate::common::{MockBrowser, TestApp};

async fn signed_in_with_project(app: &TestApp, title: &str) -> (MockBrowser, i64) {
    let mut browser = MockBrowser::new(&app.router);
    browser.login().await;
    browser
        .post_form("/projects", &[("title", title), ("description", "")])
        .await;
    let id = app
        .scalar(&format!("SELECT id FROM projects WHERE title = '{title}'"))
        .await;
    (browser, id)
}

#[tokio::test]
async fn test_create_list_and_filter_tasks() {
    let app = TestApp::new().await;
    let (mut browser, first) = signed_in_with_project(&app, "First").await;
    browser
        .post_form("/projects", &[("title", "Second"), ("description", "")])
        .await;
    let second = app
        .scalar("SELECT id FROM projects WHERE title = 'Second'")
        .await;

    let first_id = first.to_string();
    let second_id = second.to_string();
    let page = browser
        .post_form(
            "/tasks",
            &[("title", "Write docs"), ("description", ""), ("project_id", &first_id)],
        )
        .await;
    assert_eq!(page.status, StatusCode::SEE_OTHER);
    assert_eq!(page.header("hx-redirect"), Some("/tasks"));
    browser
        .post_form(
            "/tasks",
            &[("title", "Ship it"), ("description", ""), ("project_id", &second_id)],
        )
        .await;

    let all = browser.get("/tasks").await;
    assert!(all.body.contains("Write docs") && all.body.contains("Ship it"));

    let filtered = browser.get(&format!("/tasks?project={first}")).await;
    assert_eq!(filtered.status, StatusCode::OK);
    assert!(filtered.body.contains("Write docs"));
    assert!(!filtered.body.contains("Ship it"));
    assert!(filtered.body.contains(&format!("<option value=\"{first}\" selected>")));
    assert!(!filtered.body.contains(&format!("<option value=\"{second}\" selected>")));

    assert_eq!(browser.get("/tasks?project=").await.status, StatusCode::OK);
    assert_eq!(
        browser.get("/tasks?project=abc").await.status,
        StatusCode::BAD_REQUEST
    );
}

#[tokio::test]
async fn test_task_form_validation() {
    let app = TestApp::new().await;
    let (mut browser, _) = signed_in_with_project(&app, "Work").await;

    let page = browser
        .post_form("/tasks", &[("title", ""), ("project_id", "")])
        .await;
    assert_eq!(page.status, StatusCode::BAD_REQUEST);
    assert!(page.body.contains("cannot be blank"));

    let page = browser
        .post_form("/tasks", &[("title", "Task"), ("project_id", "12a")])
        .await;
    assert_eq!(page.status, StatusCode::BAD_REQUEST);
    assert!(page.body.contains("must contain digits only"));
    assert_eq!(app.count("tasks").await, 0);
}

#[tokio::test]
async fn test_tasks_are_owner_scoped() {
    let app = TestApp::new().await;
    let (mut alice, project) = signed_in_with_project(&app, "Alice work").await;
    let project_id = project.to_string();
    alice
        .post_form(
            "/tasks",
            &[("title", "Private task"), ("project_id", &project_id)],
        )
        .await;
    let task = app.scalar("SELECT id FROM tasks").await;

    app.provider.sign_in_as("7", "b@example.com");
    let mut bob = MockBrowser::new(&app.router);
    bob.login().await;

    assert!(!bob.get("/tasks").await.body.contains("Private task"));
    assert_eq!(
        bob.get(&format!("/tasks?project={project}")).await.status,
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        bob.get(&format!("/tasks/{task}")).await.status,
        StatusCode::NOT_FOUND
    );
    let page = bob
        .post_form(
            "/tasks",
            &[("title", "Intruder"), ("project_id", &project_id)],
        )
        .await;
    assert_eq!(page.status, StatusCode::NOT_FOUND);
    let page = bob
        .patch_form(&format!("/tasks/{task}"), &[("title", "Hijacked")])
        .await;
    assert_eq!(page.status, StatusCode::NOT_FOUND);
    assert_eq!(app.count("tasks").await, 1);
}

#[tokio::test]
async fn test_edit_and_update_task() {
    let app = TestApp::new().await;
    let (mut browser, project) = signed_in_with_project(&app, "Edits").await;
    let project_id = project.to_string();
    browser
        .post_form("/tasks", &[("title", "Old title"), ("project_id", &project_id)])
        .await;
    let task = app.scalar("SELECT id FROM tasks").await;

    let page = browser.get(&format!("/tasks/{task}/edit")).await;
    assert_eq!(page.status, StatusCode::OK);
    assert_eq!(page.header("hx-trigger"), Some("open-modal"));
    assert!(page.body.contains("Old title"));

    let page = browser
        .patch_form(&format!("/tasks/{task}"), &[("title", "")])
        .await;
    assert_eq!(page.status, StatusCode::BAD_REQUEST);

    let page = browser
        .patch_form(
            &format!("/tasks/{task}"),
            &[("title", "New title"), ("description", "details")],
        )
        .await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("Task updated successfully"));
    let trigger = format!("update-task-row:{task}");
    assert_eq!(page.header("hx-trigger"), Some(trigger.as_str()));

    let row = browser.get(&format!("/tasks/{task}")).await;
    assert!(row.body.contains("New title") && row.body.contains("details"));
}
