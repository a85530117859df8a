use std::fmt;

use crate::modules::civic_api::UpstreamUser;

/// The signed-in user for one request.
///
/// Built by [`SessionStore::hydrate`](super::SessionStore::hydrate) from a
/// bearer token validated against the report service, then passed to
/// handlers through request extensions. Nothing about it is global.
#[derive(Clone)]
pub struct Session {
    token: String,
    pub user: UpstreamUser,
}

impl Session {
    pub fn new(token: impl Into<String>, user: UpstreamUser) -> Self {
        Self {
            token: token.into(),
            user,
        }
    }

    /// Bearer token forwarded to the report service on the user's behalf
    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn user_id(&self) -> i64 {
        self.user.id
    }

    pub fn is_staff(&self) -> bool {
        self.user.role.is_staff()
    }

    pub fn is_admin(&self) -> bool {
        self.user.role.is_admin()
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token", &"<redacted>")
            .field("user", &self.user)
            .finish()
    }
}
