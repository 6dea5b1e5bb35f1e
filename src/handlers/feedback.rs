use axum::{
    Form,
    extract::{Path, State},
    response::Response,
};
use axum_extra::extract::cookie::PrivateCookieJar;
use serde::Deserialize;
use tracing::info;

use crate::error::DeskError;
use crate::handlers::redirect_with_flash;
use crate::policy;
use crate::router::DeskState;
use crate::session::{self, Identity};

#[derive(Debug, Deserialize)]
pub struct CommentForm {
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct GradeForm {
    /// Kept as text so that a non-numeric score and an out-of-range score
    /// report the same user-visible failure.
    pub score: String,
    pub comment: Option<String>,
}

/// POST /project/{id}/comment -> any authenticated user.
pub async fn comment(
    State(state): State<DeskState>,
    jar: PrivateCookieJar,
    Path(id): Path<i64>,
    Form(form): Form<CommentForm>,
) -> Result<Response, DeskError> {
    let back = format!("/project/{id}");
    let identity = session::current_identity(&jar);
    match comment_inner(&state, identity, id, form).await {
        Ok(()) => Ok(redirect_with_flash(jar, "Comment added.", &back)),
        Err(DeskError::Forbidden(msg)) => Ok(redirect_with_flash(jar, msg, "/login")),
        Err(DeskError::InvalidInput(msg)) => Ok(redirect_with_flash(jar, &msg, &back)),
        Err(DeskError::StoreIntegrity(_)) => {
            Ok(redirect_with_flash(jar, "Project not found.", "/dashboard"))
        }
        Err(other) => Err(other),
    }
}

async fn comment_inner(
    state: &DeskState,
    identity: Option<Identity>,
    project_id: i64,
    form: CommentForm,
) -> Result<(), DeskError> {
    let identity = identity
        .filter(|id| policy::can_comment(Some(id)))
        .ok_or(DeskError::Forbidden("Please log in."))?;

    let content = form.content.trim();
    if content.is_empty() {
        return Err(DeskError::InvalidInput(
            "A comment cannot be empty.".to_string(),
        ));
    }

    state
        .storage
        .create_comment(project_id, identity.user_id, content)
        .await?;
    info!(project_id, author_id = identity.user_id, "comment added");
    Ok(())
}

/// POST /project/{id}/grade -> teachers only, integer score in [0, 100].
pub async fn grade(
    State(state): State<DeskState>,
    jar: PrivateCookieJar,
    Path(id): Path<i64>,
    Form(form): Form<GradeForm>,
) -> Result<Response, DeskError> {
    let back = format!("/project/{id}");
    let identity = session::current_identity(&jar);
    match grade_inner(&state, identity, id, form).await {
        Ok(()) => Ok(redirect_with_flash(jar, "Grade recorded.", &back)),
        Err(DeskError::Forbidden(msg)) => Ok(redirect_with_flash(jar, msg, &back)),
        Err(DeskError::InvalidInput(msg)) => Ok(redirect_with_flash(jar, &msg, &back)),
        Err(DeskError::StoreIntegrity(_)) => {
            Ok(redirect_with_flash(jar, "Project not found.", "/dashboard"))
        }
        Err(other) => Err(other),
    }
}

async fn grade_inner(
    state: &DeskState,
    identity: Option<Identity>,
    project_id: i64,
    form: GradeForm,
) -> Result<(), DeskError> {
    let identity = identity
        .filter(|id| policy::can_grade(Some(id)))
        .ok_or(DeskError::Forbidden("Only teachers can grade projects."))?;

    let score = parse_score(&form.score).ok_or_else(|| {
        DeskError::InvalidInput("The score must be a whole number from 0 to 100.".to_string())
    })?;
    let comment = form.comment.as_deref().unwrap_or("").trim();

    state
        .storage
        .create_grade(project_id, identity.user_id, score, comment)
        .await?;
    info!(project_id, teacher_id = identity.user_id, score, "grade recorded");
    Ok(())
}

/// Parse failure and range failure collapse to the same `None`.
fn parse_score(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok().filter(|v| (0..=100).contains(v))
}
