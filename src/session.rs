//! Session state carried in an encrypted, authenticated private cookie.
//!
//! The cookie holds the serialized [`Identity`] of the logged-in user;
//! there is no server-side session table. A second one-shot cookie carries
//! the flash message consumed by the next rendered view.

use axum_extra::extract::cookie::{Cookie, Key, PrivateCookieJar, SameSite};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha512};
use time::Duration;

use crate::error::DeskError;
use crate::types::Role;

const SESSION_COOKIE: &str = "desk_session";
const FLASH_COOKIE: &str = "desk_flash";

const SESSION_TTL: Duration = Duration::days(7);
const FLASH_TTL: Duration = Duration::minutes(15);

/// The authenticated (id, username, role) tuple for the current request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: i64,
    pub username: String,
    pub role: Role,
}

/// Derive the 64-byte cookie master key from the configured secret.
pub fn cookie_key(secret: &str) -> Key {
    let digest = Sha512::digest(secret.as_bytes());
    Key::from(digest.as_slice())
}

/// Resolve the request's identity from the session cookie, if any.
/// A cookie that fails decryption or deserialization counts as anonymous.
pub fn current_identity(jar: &PrivateCookieJar) -> Option<Identity> {
    let cookie = jar.get(SESSION_COOKIE)?;
    serde_json::from_str(cookie.value()).ok()
}

/// Establish a session for `identity`, replacing any previous one.
pub fn establish(
    jar: PrivateCookieJar,
    identity: &Identity,
    insecure_cookie: bool,
) -> Result<PrivateCookieJar, DeskError> {
    let payload = serde_json::to_string(identity)?;
    let mut cookie = build_cookie(SESSION_COOKIE, payload, SESSION_TTL);
    cookie.set_secure(!insecure_cookie);
    Ok(jar.add(cookie))
}

/// End the session by removing the cookie.
pub fn clear(jar: PrivateCookieJar) -> PrivateCookieJar {
    jar.remove(removal_cookie(SESSION_COOKIE))
}

/// Queue a one-shot message for the next rendered view.
pub fn flash(jar: PrivateCookieJar, message: &str) -> PrivateCookieJar {
    jar.add(build_cookie(FLASH_COOKIE, message.to_string(), FLASH_TTL))
}

/// Consume the pending flash message, if any.
pub fn take_flash(jar: PrivateCookieJar) -> (Option<String>, PrivateCookieJar) {
    match jar.get(FLASH_COOKIE) {
        Some(cookie) => {
            let message = cookie.value().to_owned();
            (Some(message), jar.remove(removal_cookie(FLASH_COOKIE)))
        }
        None => (None, jar),
    }
}

fn build_cookie(name: &str, value: String, max_age: Duration) -> Cookie<'static> {
    Cookie::build(Cookie::new(name.to_string(), value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(max_age)
        .build()
}

fn removal_cookie(name: &str) -> Cookie<'static> {
    Cookie::build(Cookie::new(name.to_string(), ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}
