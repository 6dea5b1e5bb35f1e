//! Demo data for an empty database, enabled by `DESK_SEED_DEMO_DATA`.

use tracing::info;

use crate::auth;
use crate::db::Storage;
use crate::error::DeskError;
use crate::types::{ProjectStatus, Role};

/// Insert two students, one teacher and a project for each student.
/// Does nothing when any user already exists.
pub async fn seed_demo_data(storage: &Storage) -> Result<(), DeskError> {
    if storage.count_users().await? > 0 {
        return Ok(());
    }

    let alice = storage
        .create_user("alice", &auth::hash_password("password1")?, Role::Student)
        .await?;
    let bob = storage
        .create_user("bob", &auth::hash_password("password2")?, Role::Student)
        .await?;
    storage
        .create_user("prof", &auth::hash_password("teachpass")?, Role::Teacher)
        .await?;

    storage
        .create_project(
            "Проєкт A",
            "Опис проєкту A",
            alice,
            ProjectStatus::InProgress,
        )
        .await?;
    storage
        .create_project("Проєкт B", "Опис проєкту B", bob, ProjectStatus::Planned)
        .await?;

    info!("seeded demo users and projects");
    Ok(())
}
