pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod policy;
pub mod router;
pub mod session;
pub mod types;

pub use error::DeskError;
pub use session::Identity;
