use axum::{
    Form, Json,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::PrivateCookieJar;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::db::models::{CommentEntry, GradeEntry, Project, ProjectOverview};
use crate::error::DeskError;
use crate::handlers::{page, redirect_with_flash};
use crate::policy;
use crate::router::DeskState;
use crate::session::{self, Identity};
use crate::types::{ProjectStatus, Role};

#[derive(Debug, Deserialize)]
pub struct ProjectForm {
    pub title: String,
    pub description: Option<String>,
    pub status: Option<String>,
}

#[derive(Serialize)]
pub struct DashboardView {
    pub username: String,
    pub role: Role,
    pub flash: Option<String>,
    pub projects: Vec<ProjectOverview>,
}

#[derive(Serialize)]
pub struct ProjectView {
    pub project: ProjectOverview,
    pub comments: Vec<CommentEntry>,
    pub grades: Vec<GradeEntry>,
    pub flash: Option<String>,
}

#[derive(Serialize)]
pub struct EditView {
    pub project: Project,
    pub flash: Option<String>,
}

/// GET /dashboard -> own projects for students, all projects for teachers.
pub async fn dashboard(
    State(state): State<DeskState>,
    jar: PrivateCookieJar,
) -> Result<Response, DeskError> {
    let Some(identity) =
        session::current_identity(&jar).filter(|id| policy::can_view_dashboard(Some(id)))
    else {
        return Ok(redirect_with_flash(jar, "Please log in.", "/login"));
    };

    let projects = match identity.role {
        Role::Student => {
            state
                .storage
                .list_projects_for_owner(identity.user_id)
                .await?
        }
        Role::Teacher => state.storage.list_all_projects().await?,
    };

    let (flash, jar) = session::take_flash(jar);
    let view = DashboardView {
        username: identity.username,
        role: identity.role,
        flash,
        projects,
    };
    Ok((jar, Json(view)).into_response())
}

pub async fn create_page(jar: PrivateCookieJar) -> Response {
    match session::current_identity(&jar) {
        Some(ref id) if policy::can_create_project(Some(id)) => page(jar, "project_create"),
        _ => redirect_with_flash(jar, "Only students can create projects.", "/dashboard"),
    }
}

/// POST /project/create
pub async fn create(
    State(state): State<DeskState>,
    jar: PrivateCookieJar,
    Form(form): Form<ProjectForm>,
) -> Result<Response, DeskError> {
    let identity = session::current_identity(&jar);
    match create_inner(&state, identity, form).await {
        Ok(project_id) => {
            info!(project_id, "project created");
            Ok(redirect_with_flash(jar, "Project created.", "/dashboard"))
        }
        Err(DeskError::Forbidden(msg)) => Ok(redirect_with_flash(jar, msg, "/dashboard")),
        Err(DeskError::InvalidInput(msg)) => {
            Ok(redirect_with_flash(jar, &msg, "/project/create"))
        }
        Err(other) => Err(other),
    }
}

async fn create_inner(
    state: &DeskState,
    identity: Option<Identity>,
    form: ProjectForm,
) -> Result<i64, DeskError> {
    let identity = identity
        .filter(|id| policy::can_create_project(Some(id)))
        .ok_or(DeskError::Forbidden("Only students can create projects."))?;

    let (title, description, status) = validate_project_form(&form)?;
    state
        .storage
        .create_project(title, description, identity.user_id, status)
        .await
}

/// GET /project/{id} -> project with its comments and grades. Public read.
pub async fn view(
    State(state): State<DeskState>,
    jar: PrivateCookieJar,
    Path(id): Path<i64>,
) -> Result<Response, DeskError> {
    let Some(project) = state.storage.find_project_overview(id).await? else {
        return Ok(redirect_with_flash(jar, "Project not found.", "/dashboard"));
    };
    let comments = state.storage.list_comments_for_project(id).await?;
    let grades = state.storage.list_grades_for_project(id).await?;

    let (flash, jar) = session::take_flash(jar);
    let view = ProjectView {
        project,
        comments,
        grades,
        flash,
    };
    Ok((jar, Json(view)).into_response())
}

/// GET /project/{id}/edit -> edit form data, owner only.
pub async fn edit_page(
    State(state): State<DeskState>,
    jar: PrivateCookieJar,
    Path(id): Path<i64>,
) -> Result<Response, DeskError> {
    let Some(project) = state.storage.find_project_by_id(id).await? else {
        return Ok(redirect_with_flash(jar, "Project not found.", "/dashboard"));
    };
    let identity = session::current_identity(&jar);
    if !policy::can_edit_project(identity.as_ref(), &project) {
        return Ok(redirect_with_flash(
            jar,
            "You cannot edit this project.",
            &format!("/project/{id}"),
        ));
    }

    let (flash, jar) = session::take_flash(jar);
    Ok((jar, Json(EditView { project, flash })).into_response())
}

/// POST /project/{id}/edit
pub async fn edit(
    State(state): State<DeskState>,
    jar: PrivateCookieJar,
    Path(id): Path<i64>,
    Form(form): Form<ProjectForm>,
) -> Result<Response, DeskError> {
    let identity = session::current_identity(&jar);
    match edit_inner(&state, identity, id, form).await {
        Ok(()) => Ok(redirect_with_flash(
            jar,
            "Project updated.",
            &format!("/project/{id}"),
        )),
        Err(DeskError::NotFound) => Ok(redirect_with_flash(jar, "Project not found.", "/dashboard")),
        Err(DeskError::Forbidden(msg)) => {
            Ok(redirect_with_flash(jar, msg, &format!("/project/{id}")))
        }
        Err(DeskError::InvalidInput(msg)) => Ok(redirect_with_flash(
            jar,
            &msg,
            &format!("/project/{id}/edit"),
        )),
        Err(other) => Err(other),
    }
}

async fn edit_inner(
    state: &DeskState,
    identity: Option<Identity>,
    id: i64,
    form: ProjectForm,
) -> Result<(), DeskError> {
    let project = state
        .storage
        .find_project_by_id(id)
        .await?
        .ok_or(DeskError::NotFound)?;

    if !policy::can_edit_project(identity.as_ref(), &project) {
        return Err(DeskError::Forbidden("You cannot edit this project."));
    }

    let (title, description, status) = validate_project_form(&form)?;
    // Last-writer-wins: no version check between the read above and this write.
    state
        .storage
        .update_project(id, title, description, status)
        .await?;
    info!(project_id = id, "project updated");
    Ok(())
}

fn validate_project_form(form: &ProjectForm) -> Result<(&str, &str, ProjectStatus), DeskError> {
    let title = form.title.trim();
    if title.is_empty() {
        return Err(DeskError::InvalidInput(
            "Give the project a title.".to_string(),
        ));
    }
    let status = match form.status.as_deref().map(str::trim) {
        None | Some("") => ProjectStatus::default(),
        Some(raw) => ProjectStatus::parse(raw).ok_or_else(|| {
            DeskError::InvalidInput("Unrecognized project status.".to_string())
        })?,
    };
    let description = form.description.as_deref().unwrap_or("").trim();
    Ok((title, description, status))
}
