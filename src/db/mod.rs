//! Database module: models and schema for persistent storage.
//!
//! Layout:
//! - `models.rs`: Rust structs mirroring DB rows and joined views
//! - `schema.rs`: SQL DDL for initializing the database (SQLite-first)
//! - `sqlite.rs`: the data access layer over a sqlx pool
//! - `seed.rs`: optional demo data for an empty database

pub mod models;
pub mod schema;
pub mod seed;
pub mod sqlite;

pub use models::{CommentEntry, GradeEntry, Project, ProjectOverview, User};
pub use schema::SQLITE_INIT;
pub use sqlite::{SqlitePool, Storage, connect};
