//! Project pages: CRUD, publish toggle, sharing and revoking.

use askama::Template;
use axum::{
    Form, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{delete, get, patch},
};
use serde::Deserialize;

use projectmotor::{
    AppContext, CoordinationError, Project, ShareOutcome, User, create_project_core,
    delete_project_core, get_project_core, list_projects_core, list_shared_users_core,
    revoke_share_core, share_project_core, toggle_published_core, update_project_core,
};

use super::error::{GENERIC_ERROR_MESSAGE, IntoResponseError, status_and_message};
use super::pages::{HX_TRIGGER, hx_redirect, render, toast};
use super::session::AuthUser;
use super::validation::{FieldErrors, FormSchema, Rule, validate};

pub(super) const SHARE_CREATED_MESSAGE: &str = "Project shared successfully.";
pub(super) const SHARE_EXISTS_MESSAGE: &str =
    "The user with the email address you provided already has access to the project.";
pub(super) const REVOKED_MESSAGE: &str = "Project unshared successfully.";

pub(super) fn router() -> Router<AppContext> {
    Router::new()
        .route("/projects", get(list_projects).post(create_project))
        .route("/projects/new", get(new_project))
        .route("/projects/{id}/edit", get(edit_project))
        .route("/projects/{id}", patch(update_project).delete(delete_project))
        .route("/projects/{id}/toggle", patch(toggle_published))
        .route("/projects/{id}/share", get(share_page).post(share_project))
        .route(
            "/projects/{project_id}/share/{user_id}",
            delete(revoke_share),
        )
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ProjectForm {
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
}

impl FormSchema for ProjectForm {
    const RULES: &'static [(&'static str, &'static [Rule])] =
        &[("title", &[Rule::Required, Rule::Length(1, 255)])];

    fn field(&self, name: &str) -> &str {
        match name {
            "title" => &self.title,
            "description" => &self.description,
            _ => "",
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ShareForm {
    #[serde(default)]
    email: String,
}

impl FormSchema for ShareForm {
    const RULES: &'static [(&'static str, &'static [Rule])] =
        &[("email", &[Rule::Required, Rule::Email])];

    fn field(&self, name: &str) -> &str {
        match name {
            "email" => &self.email,
            _ => "",
        }
    }
}

#[derive(Template)]
#[template(path = "projects.j2")]
struct ProjectsTemplate {
    projects: Vec<Project>,
}

/// New and edit form
#[derive(Template)]
#[template(path = "project_form.j2")]
struct ProjectFormTemplate<'a> {
    /// `None` for a new project
    project_id: Option<i64>,
    title: &'a str,
    description: &'a str,
    errors: FieldErrors,
}

#[derive(Template)]
#[template(path = "project_status.j2")]
struct ProjectStatusTemplate {
    published: bool,
}

#[derive(Template)]
#[template(path = "project_share.j2")]
struct ProjectShareTemplate<'a> {
    project: &'a Project,
    shared_users: Vec<User>,
    email: &'a str,
    errors: FieldErrors,
}

/// Reply to a share attempt: the form again, an optional new row and a toast
#[derive(Template)]
#[template(path = "share_result.j2")]
struct ShareResultTemplate<'a> {
    project_id: i64,
    email: &'a str,
    errors: FieldErrors,
    added: Option<&'a User>,
    message: &'a str,
    kind: &'a str,
}

async fn list_projects(
    State(ctx): State<AppContext>,
    user: AuthUser,
) -> Result<Html<String>, (StatusCode, String)> {
    let projects = list_projects_core(&ctx, user.id)
        .await
        .into_response_error()?;
    render(&ProjectsTemplate { projects })
}

async fn new_project() -> Result<Html<String>, (StatusCode, String)> {
    render(&ProjectFormTemplate {
        project_id: None,
        title: "",
        description: "",
        errors: FieldErrors::default(),
    })
}

async fn create_project(
    State(ctx): State<AppContext>,
    user: AuthUser,
    Form(form): Form<ProjectForm>,
) -> Result<Response, (StatusCode, String)> {
    if let Err(errors) = validate(&form) {
        let html = render(&ProjectFormTemplate {
            project_id: None,
            title: &form.title,
            description: &form.description,
            errors,
        })?;
        return Ok((StatusCode::BAD_REQUEST, html).into_response());
    }

    create_project_core(&ctx, user.id, &form.title, Some(&form.description))
        .await
        .into_response_error()?;
    Ok(hx_redirect("/projects"))
}

async fn edit_project(
    State(ctx): State<AppContext>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> Result<Html<String>, (StatusCode, String)> {
    let project = get_project_core(&ctx, user.id, id)
        .await
        .into_response_error()?;
    render(&ProjectFormTemplate {
        project_id: Some(project.id),
        title: &project.title,
        description: project.description.as_deref().unwrap_or_default(),
        errors: FieldErrors::default(),
    })
}

async fn update_project(
    State(ctx): State<AppContext>,
    user: AuthUser,
    Path(id): Path<i64>,
    Form(form): Form<ProjectForm>,
) -> Result<Response, (StatusCode, String)> {
    // 404 for someone else's project even when the form is invalid
    let project = get_project_core(&ctx, user.id, id)
        .await
        .into_response_error()?;

    if let Err(errors) = validate(&form) {
        let html = render(&ProjectFormTemplate {
            project_id: Some(project.id),
            title: &form.title,
            description: &form.description,
            errors,
        })?;
        return Ok((StatusCode::BAD_REQUEST, html).into_response());
    }

    update_project_core(&ctx, user.id, id, &form.title, Some(&form.description))
        .await
        .into_response_error()?;
    Ok(hx_redirect("/projects"))
}

/// Flip `published` and return the new status label
async fn toggle_published(
    State(ctx): State<AppContext>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> Result<Response, (StatusCode, String)> {
    let project = toggle_published_core(&ctx, user.id, id)
        .await
        .into_response_error()?;

    let html = render(&ProjectStatusTemplate {
        published: project.published,
    })?;
    let trigger = format!("toggle-project-status:{}", project.id);
    Ok(([(HX_TRIGGER, trigger)], html).into_response())
}

async fn delete_project(
    State(ctx): State<AppContext>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, (StatusCode, String)> {
    delete_project_core(&ctx, user.id, id)
        .await
        .into_response_error()?;
    Ok(StatusCode::OK)
}

async fn share_page(
    State(ctx): State<AppContext>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> Result<Html<String>, (StatusCode, String)> {
    let project = get_project_core(&ctx, user.id, id)
        .await
        .into_response_error()?;
    let shared_users = list_shared_users_core(&ctx, user.id, id)
        .await
        .into_response_error()?;

    render(&ProjectShareTemplate {
        project: &project,
        shared_users,
        email: "",
        errors: FieldErrors::default(),
    })
}

/// Share a project by email.
///
/// 201 when a share row was created, 200 when the user already had access.
/// Unknown users, self-shares and invalid input come back as 4xx with a
/// message shown next to the form.
async fn share_project(
    State(ctx): State<AppContext>,
    user: AuthUser,
    Path(id): Path<i64>,
    Form(form): Form<ShareForm>,
) -> Result<Response, (StatusCode, String)> {
    let reply = |status: StatusCode,
                 errors: FieldErrors,
                 added: Option<&User>,
                 kind: &str,
                 message: &str|
     -> Result<Response, (StatusCode, String)> {
        let html = render(&ShareResultTemplate {
            project_id: id,
            email: if added.is_some() { "" } else { &form.email },
            errors,
            added,
            message,
            kind,
        })?;
        Ok((status, html).into_response())
    };

    if let Err(errors) = validate(&form) {
        return reply(StatusCode::BAD_REQUEST, errors, None, "error", "");
    }

    match share_project_core(&ctx, user.id, id, &form.email).await {
        Ok((ShareOutcome::Created, target)) => reply(
            StatusCode::CREATED,
            FieldErrors::default(),
            Some(&target),
            "success",
            SHARE_CREATED_MESSAGE,
        ),
        Ok((ShareOutcome::AlreadyExists, _)) => reply(
            StatusCode::OK,
            FieldErrors::default(),
            None,
            "error",
            SHARE_EXISTS_MESSAGE,
        ),
        Ok((ShareOutcome::Failed(e), _)) => {
            tracing::error!(error = %e, project_id = id, "Share failed");
            reply(
                StatusCode::INTERNAL_SERVER_ERROR,
                FieldErrors::default(),
                None,
                "error",
                GENERIC_ERROR_MESSAGE,
            )
        }
        Err(e @ (CoordinationError::UserNotFound | CoordinationError::SelfShare)) => {
            let (status, message) = status_and_message(&e);
            reply(status, FieldErrors::default(), None, "error", &message)
        }
        Err(e) => Err(status_and_message(&e)),
    }
}

async fn revoke_share(
    State(ctx): State<AppContext>,
    user: AuthUser,
    Path((project_id, user_id)): Path<(i64, i64)>,
) -> Result<Response, (StatusCode, String)> {
    revoke_share_core(&ctx, user.id, project_id, user_id)
        .await
        .into_response_error()?;
    Ok(toast(StatusCode::OK, "success", REVOKED_MESSAGE))
}
