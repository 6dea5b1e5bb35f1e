use axum::{
    Router,
    extract::FromRef,
    routing::{get, post},
};
use axum_extra::extract::cookie::Key;

use crate::db::Storage;
use crate::handlers::{accounts, feedback, projects};

/// Shared request state: the storage handle plus the cookie master key.
/// Constructed once at startup and cloned per request.
#[derive(Clone)]
pub struct DeskState {
    pub storage: Storage,
    key: Key,
    pub insecure_cookie: bool,
}

impl DeskState {
    pub fn new(storage: Storage, key: Key, insecure_cookie: bool) -> Self {
        Self {
            storage,
            key,
            insecure_cookie,
        }
    }
}

// Lets PrivateCookieJar resolve its encryption key from the router state.
impl FromRef<DeskState> for Key {
    fn from_ref(state: &DeskState) -> Key {
        state.key.clone()
    }
}

pub fn desk_router(state: DeskState) -> Router {
    Router::new()
        .route("/", get(accounts::index))
        .route(
            "/register",
            get(accounts::register_page).post(accounts::register),
        )
        .route("/login", get(accounts::login_page).post(accounts::login))
        .route("/logout", get(accounts::logout))
        .route("/dashboard", get(projects::dashboard))
        .route(
            "/project/create",
            get(projects::create_page).post(projects::create),
        )
        .route("/project/{id}", get(projects::view))
        .route("/project/{id}/comment", post(feedback::comment))
        .route("/project/{id}/grade", post(feedback::grade))
        .route(
            "/project/{id}/edit",
            get(projects::edit_page).post(projects::edit),
        )
        .with_state(state)
}
