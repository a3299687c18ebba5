use askama::Template;
use axum::{
    Form, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;

use projectmotor::{
    AppContext, Project, Task, create_task_core, get_task_core, list_projects_core,
    list_tasks_core, update_task_core,
};

use super::error::IntoResponseError;
use super::pages::{HX_TRIGGER, hx_redirect, render, toast};
use super::session::AuthUser;
use super::validation::{FieldErrors, FormSchema, Rule, validate};

pub(super) fn router() -> Router<AppContext> {
    Router::new()
        .route("/tasks", get(list_tasks).post(create_task))
        .route("/tasks/new", get(new_task))
        .route("/tasks/{id}", get(get_task).patch(update_task))
        .route("/tasks/{id}/edit", get(edit_task))
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct TaskForm {
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    project_id: String,
}

impl FormSchema for TaskForm {
    const RULES: &'static [(&'static str, &'static [Rule])] = &[
        ("title", &[Rule::Required, Rule::Length(1, 255)]),
        ("project_id", &[Rule::Required, Rule::Digits]),
    ];

    fn field(&self, name: &str) -> &str {
        match name {
            "title" => &self.title,
            "description" => &self.description,
            "project_id" => &self.project_id,
            _ => "",
        }
    }
}

/// Edit form: the project of a task cannot change
#[derive(Debug, Default, Deserialize)]
pub(crate) struct TaskUpdateForm {
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
}

impl FormSchema for TaskUpdateForm {
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

#[derive(Debug, Deserialize)]
struct TaskFilter {
    project: Option<String>,
}

impl TaskFilter {
    /// `?project=` narrows the list; an empty value means all projects
    fn project_id(&self) -> Result<Option<i64>, (StatusCode, String)> {
        match self.project.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(raw) => raw.parse().map(Some).map_err(|_| {
                (
                    StatusCode::BAD_REQUEST,
                    "Invalid request: project must be a number".to_string(),
                )
            }),
        }
    }
}

#[derive(Template)]
#[template(path = "tasks.j2")]
struct TasksTemplate {
    tasks: Vec<Task>,
    projects: Vec<Project>,
    filter: Option<i64>,
}

#[derive(Template)]
#[template(path = "task_form.j2")]
struct TaskFormTemplate<'a> {
    projects: Vec<Project>,
    title: &'a str,
    description: &'a str,
    project_id: &'a str,
    errors: FieldErrors,
}

#[derive(Template)]
#[template(path = "task_edit.j2")]
struct TaskEditTemplate<'a> {
    task: &'a Task,
    title: &'a str,
    description: &'a str,
    errors: FieldErrors,
}

#[derive(Template)]
#[template(path = "task_row.j2")]
struct TaskRowTemplate<'a> {
    task: &'a Task,
}

async fn list_tasks(
    State(ctx): State<AppContext>,
    user: AuthUser,
    Query(filter): Query<TaskFilter>,
) -> Result<Html<String>, (StatusCode, String)> {
    let project_id = filter.project_id()?;
    let tasks = list_tasks_core(&ctx, user.id, project_id)
        .await
        .into_response_error()?;
    let projects = list_projects_core(&ctx, user.id)
        .await
        .into_response_error()?;

    render(&TasksTemplate {
        tasks,
        projects,
        filter: project_id,
    })
}

async fn new_task(
    State(ctx): State<AppContext>,
    user: AuthUser,
) -> Result<Html<String>, (StatusCode, String)> {
    let projects = list_projects_core(&ctx, user.id)
        .await
        .into_response_error()?;
    render(&TaskFormTemplate {
        projects,
        title: "",
        description: "",
        project_id: "",
        errors: FieldErrors::default(),
    })
}

async fn create_task(
    State(ctx): State<AppContext>,
    user: AuthUser,
    Form(form): Form<TaskForm>,
) -> Result<Response, (StatusCode, String)> {
    let project_id = match validate(&form) {
        Ok(()) => form.project_id.trim().parse::<i64>().ok(),
        Err(errors) => return task_form_error(&ctx, &user, &form, errors).await,
    };
    // digits that overflow i64 cannot name a project
    let Some(project_id) = project_id else {
        return Err((StatusCode::NOT_FOUND, "Not found".to_string()));
    };

    create_task_core(&ctx, user.id, project_id, &form.title, Some(&form.description))
        .await
        .into_response_error()?;
    Ok(hx_redirect("/tasks"))
}

async fn task_form_error(
    ctx: &AppContext,
    user: &AuthUser,
    form: &TaskForm,
    errors: FieldErrors,
) -> Result<Response, (StatusCode, String)> {
    let projects = list_projects_core(ctx, user.id)
        .await
        .into_response_error()?;
    let html = render(&TaskFormTemplate {
        projects,
        title: &form.title,
        description: &form.description,
        project_id: &form.project_id,
        errors,
    })?;
    Ok((StatusCode::BAD_REQUEST, html).into_response())
}

async fn get_task(
    State(ctx): State<AppContext>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> Result<Html<String>, (StatusCode, String)> {
    let task = get_task_core(&ctx, user.id, id)
        .await
        .into_response_error()?;
    render(&TaskRowTemplate { task: &task })
}

async fn edit_task(
    State(ctx): State<AppContext>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> Result<Response, (StatusCode, String)> {
    let task = get_task_core(&ctx, user.id, id)
        .await
        .into_response_error()?;
    let html = render(&TaskEditTemplate {
        task: &task,
        title: &task.title,
        description: task.description.as_deref().unwrap_or_default(),
        errors: FieldErrors::default(),
    })?;
    Ok(([(HX_TRIGGER, "open-modal")], html).into_response())
}

async fn update_task(
    State(ctx): State<AppContext>,
    user: AuthUser,
    Path(id): Path<i64>,
    Form(form): Form<TaskUpdateForm>,
) -> Result<Response, (StatusCode, String)> {
    let task = get_task_core(&ctx, user.id, id)
        .await
        .into_response_error()?;

    if let Err(errors) = validate(&form) {
        let html = render(&TaskEditTemplate {
            task: &task,
            title: &form.title,
            description: &form.description,
            errors,
        })?;
        return Ok((StatusCode::BAD_REQUEST, html).into_response());
    }

    let task = update_task_core(&ctx, user.id, id, &form.title, Some(&form.description))
        .await
        .into_response_error()?;
    let trigger = format!("update-task-row:{}", task.id);
    Ok((
        [(HX_TRIGGER, trigger)],
        toast(StatusCode::OK, "success", "Task updated successfully"),
    )
        .into_response())
}
