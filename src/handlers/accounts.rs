use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::PrivateCookieJar;
use serde::Deserialize;
use tracing::info;

use crate::auth;
use crate::error::DeskError;
use crate::handlers::{page, redirect_with_flash};
use crate::router::DeskState;
use crate::session;

#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub username: String,
    pub password: String,
    pub role: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// GET / -> landing page, or straight to the dashboard when logged in.
pub async fn index(jar: PrivateCookieJar) -> Response {
    if session::current_identity(&jar).is_some() {
        return Redirect::to("/dashboard").into_response();
    }
    page(jar, "landing")
}

pub async fn register_page(jar: PrivateCookieJar) -> Response {
    page(jar, "register")
}

/// POST /register
pub async fn register(
    State(state): State<DeskState>,
    jar: PrivateCookieJar,
    Form(form): Form<RegisterForm>,
) -> Result<Response, DeskError> {
    match auth::register(&state.storage, &form.username, &form.password, &form.role).await {
        Ok(_) => Ok(redirect_with_flash(
            jar,
            "Registration complete. Please log in.",
            "/login",
        )),
        Err(DeskError::InvalidInput(msg)) => Ok(redirect_with_flash(jar, &msg, "/register")),
        Err(DeskError::DuplicateUsername) => Ok(redirect_with_flash(
            jar,
            "That username is already taken.",
            "/register",
        )),
        Err(other) => Err(other),
    }
}

pub async fn login_page(jar: PrivateCookieJar) -> Response {
    page(jar, "login")
}

/// POST /login -> establish the session cookie on success.
pub async fn login(
    State(state): State<DeskState>,
    jar: PrivateCookieJar,
    Form(form): Form<LoginForm>,
) -> Result<Response, DeskError> {
    match auth::authenticate(&state.storage, &form.username, &form.password).await {
        Ok(identity) => {
            info!(user_id = identity.user_id, "login succeeded");
            let jar = session::establish(jar, &identity, state.insecure_cookie)?;
            Ok((jar, Redirect::to("/dashboard")).into_response())
        }
        Err(DeskError::InvalidCredentials) => Ok(redirect_with_flash(
            jar,
            "Invalid username or password.",
            "/login",
        )),
        Err(other) => Err(other),
    }
}

/// GET /logout -> drop the session cookie.
pub async fn logout(jar: PrivateCookieJar) -> Response {
    (session::clear(jar), Redirect::to("/")).into_response()
}
