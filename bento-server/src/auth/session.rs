//! Session store
//!
//! Sessions live server-side: an opaque token (delivered to the client in
//! an HttpOnly cookie) maps to a serialized principal reference of the
//! form `"<kind>:<id>"`. The kind tag is required because merchants and
//! customers are disjoint id spaces - without it the reference would be
//! ambiguous. The full principal is re-resolved from the identity store on
//! every request, so profile data is never served stale from the session.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use uuid::Uuid;

use shared::models::PrincipalKind;

/// Session cookie name
pub const SESSION_COOKIE: &str = "sid";

/// A serialized reference to one principal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrincipalRef {
    pub kind: PrincipalKind,
    pub id: i64,
}

impl PrincipalRef {
    /// Parse the `"<kind>:<id>"` form. Returns `None` on anything malformed.
    pub fn parse(s: &str) -> Option<Self> {
        let (kind, id) = s.split_once(':')?;
        Some(Self {
            kind: PrincipalKind::parse(kind)?,
            id: id.parse().ok()?,
        })
    }
}

impl fmt::Display for PrincipalRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.id)
    }
}

#[derive(Debug, Clone)]
struct SessionEntry {
    principal: String,
    expires_at: DateTime<Utc>,
}

/// Server-side session store.
#[derive(Debug)]
pub struct SessionStore {
    sessions: DashMap<String, SessionEntry>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl_minutes: i64) -> Self {
        Self {
            sessions: DashMap::new(),
            ttl: Duration::minutes(ttl_minutes),
        }
    }

    /// Establish a session for the given principal and return its token.
    pub fn create(&self, principal: PrincipalRef) -> String {
        let token = Uuid::new_v4().simple().to_string();
        self.sessions.insert(
            token.clone(),
            SessionEntry {
                principal: principal.to_string(),
                expires_at: Utc::now() + self.ttl,
            },
        );
        token
    }

    /// Resolve a token to its principal reference.
    ///
    /// Expired sessions are removed on the way out; a reference that no
    /// longer parses resolves to `None`.
    pub fn resolve(&self, token: &str) -> Option<PrincipalRef> {
        let entry = self.sessions.get(token)?;
        if entry.expires_at < Utc::now() {
            drop(entry);
            self.sessions.remove(token);
            return None;
        }
        PrincipalRef::parse(&entry.principal)
    }

    /// Destroy a session. Idempotent.
    pub fn destroy(&self, token: &str) {
        self.sessions.remove(token);
    }
}

/// Build the Set-Cookie value establishing a session.
pub fn session_cookie(token: &str) -> String {
    format!("{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax")
}

/// Build the Set-Cookie value clearing the session cookie.
pub fn clear_session_cookie() -> String {
    format!("{SESSION_COOKIE}=; Path=/; HttpOnly; Max-Age=0")
}

/// Pull the session token out of a Cookie header value.
pub fn token_from_cookie_header(header: &str) -> Option<&str> {
    header.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == SESSION_COOKIE).then_some(value)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_principal_ref_round_trip() {
        let r = PrincipalRef {
            kind: PrincipalKind::Merchant,
            id: 42,
        };
        assert_eq!(r.to_string(), "merchant:42");
        assert_eq!(PrincipalRef::parse("merchant:42"), Some(r));
    }

    #[test]
    fn test_principal_ref_rejects_malformed() {
        assert_eq!(PrincipalRef::parse(""), None);
        assert_eq!(PrincipalRef::parse("merchant"), None);
        assert_eq!(PrincipalRef::parse("admin:1"), None);
        assert_eq!(PrincipalRef::parse("customer:abc"), None);
    }

    #[test]
    fn test_create_resolve_destroy() {
        let store = SessionStore::new(60);
        let principal = PrincipalRef {
            kind: PrincipalKind::Customer,
            id: 7,
        };

        let token = store.create(principal);
        assert_eq!(store.resolve(&token), Some(principal));

        store.destroy(&token);
        assert_eq!(store.resolve(&token), None);

        // Destroy is idempotent
        store.destroy(&token);
    }

    #[test]
    fn test_tokens_are_unique() {
        let store = SessionStore::new(60);
        let principal = PrincipalRef {
            kind: PrincipalKind::Merchant,
            id: 1,
        };
        assert_ne!(store.create(principal), store.create(principal));
    }

    #[test]
    fn test_expired_session_resolves_to_none() {
        let store = SessionStore::new(-1);
        let token = store.create(PrincipalRef {
            kind: PrincipalKind::Merchant,
            id: 1,
        });
        assert_eq!(store.resolve(&token), None);
    }

    #[test]
    fn test_cookie_header_parsing() {
        assert_eq!(token_from_cookie_header("sid=abc123"), Some("abc123"));
        assert_eq!(
            token_from_cookie_header("theme=dark; sid=abc123; lang=en"),
            Some("abc123")
        );
        assert_eq!(token_from_cookie_header("theme=dark"), None);
    }
}
