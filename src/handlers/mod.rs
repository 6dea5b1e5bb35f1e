//! Request handlers. Every mutating handler follows the same shape:
//! resolve identity from the session cookie, apply the authorization
//! predicate, validate input, invoke storage, then answer with a flash
//! message and a 303 redirect. Read-only handlers answer JSON views
//! carrying the consumed flash message.

pub mod accounts;
pub mod feedback;
pub mod projects;

use axum::{
    Json,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::PrivateCookieJar;
use serde::Serialize;

use crate::session;

pub(crate) fn redirect_with_flash(jar: PrivateCookieJar, message: &str, to: &str) -> Response {
    (session::flash(jar, message), Redirect::to(to)).into_response()
}

/// Minimal rendering of a form page: its name plus any pending flash.
#[derive(Serialize)]
pub struct PageView {
    pub page: &'static str,
    pub flash: Option<String>,
}

pub(crate) fn page(jar: PrivateCookieJar, name: &'static str) -> Response {
    let (flash, jar) = session::take_flash(jar);
    (jar, Json(PageView { page: name, flash })).into_response()
}
