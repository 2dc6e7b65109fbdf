// security/src/lib.rs

//! Login through an external identity provider, server-side sessions with
//! signed tokens, and the role-to-menu mapping.

pub mod errors;
pub mod identity;
pub mod middleware;
pub mod roles;
pub mod session;

pub use errors::AuthError;
pub use identity::{IdentityProvider, OidcProvider, OidcSettings, StaticIdentityProvider};
pub use middleware::{
    expired_session_cookie, require_session, session_cookie, session_token, AuthContext,
    SessionGuard,
};
pub use roles::RolesConfig;
pub use session::{
    InMemorySessionStore, Session, SessionManager, SessionStore, TokenSigner, SESSION_COOKIE,
};
