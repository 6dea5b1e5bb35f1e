//! Authorization predicates: pure functions over the request identity and
//! the targeted resource, evaluated before any mutation.
//!
//! Dashboard visibility is a query-filtering policy, not a binary
//! permission: students see their own projects, teachers see all of them.
//! That scoping lives in the dashboard handler; `can_view_dashboard` only
//! gates access to the page itself.

use crate::db::models::Project;
use crate::session::Identity;
use crate::types::Role;

pub fn can_create_project(identity: Option<&Identity>) -> bool {
    matches!(identity, Some(id) if id.role == Role::Student)
}

pub fn can_edit_project(identity: Option<&Identity>, project: &Project) -> bool {
    matches!(identity, Some(id) if id.user_id == project.owner_id)
}

pub fn can_comment(identity: Option<&Identity>) -> bool {
    identity.is_some()
}

pub fn can_grade(identity: Option<&Identity>) -> bool {
    matches!(identity, Some(id) if id.role == Role::Teacher)
}

pub fn can_view_dashboard(identity: Option<&Identity>) -> bool {
    identity.is_some()
}
