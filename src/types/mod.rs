pub mod role;
pub mod status;

pub use role::Role;
pub use status::ProjectStatus;
