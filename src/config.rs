use std::sync::LazyLock;

use figment::{
    Figment,
    providers::{Env, Serialized},
};
use serde::{Deserialize, Serialize};

/// Runtime configuration, loaded once at startup.
///
/// Defaults are suitable for local development; every field can be
/// overridden through `DESK_*` environment variables (e.g.
/// `DESK_DATABASE_URL`, `DESK_SESSION_SECRET`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub listen_addr: String,
    pub database_url: String,
    /// Secret used to derive the session-cookie encryption key.
    /// The default is a development fallback only.
    pub session_secret: String,
    /// Drop the `Secure` cookie attribute for plain-HTTP local setups.
    pub insecure_cookie: bool,
    /// Insert demo users and projects into an empty database at boot.
    pub seed_demo_data: bool,
    pub loglevel: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8000".to_string(),
            database_url: "sqlite:coursedesk.db".to_string(),
            session_secret: "dev-secret-key".to_string(),
            insecure_cookie: false,
            seed_demo_data: false,
            loglevel: "info".to_string(),
        }
    }
}

pub static CONFIG: LazyLock<Config> = LazyLock::new(|| {
    Figment::from(Serialized::defaults(Config::default()))
        .merge(Env::prefixed("DESK_"))
        .extract()
        .expect("invalid DESK_* configuration")
});
