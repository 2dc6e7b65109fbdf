// security/src/session.rs

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::errors::AuthError;

/// Name of the cookie carrying the signed session token.
pub const SESSION_COOKIE: &str = "hms_session";

/// How long a `/api/login` redirect may take to come back to the callback.
const LOGIN_STATE_TTL_MINUTES: i64 = 10;

/// A server-side login session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Claims for the session JWT. The token only names the session; the
/// session itself lives in the store, so logging out revokes the token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sid: String,
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

/// Storage for sessions and for pending login `state` values.
#[async_trait]
pub trait SessionStore: Send + Sync + 'static {
    async fn insert(&self, session: Session) -> Result<(), AuthError>;

    async fn get(&self, id: &str) -> Result<Option<Session>, AuthError>;

    async fn remove(&self, id: &str) -> Result<(), AuthError>;

    /// Remembers a login `state` until `expires_at`.
    async fn put_login_state(&self, state: String, expires_at: DateTime<Utc>) -> Result<(), AuthError>;

    /// Removes a login `state`, returning whether it was known and unexpired.
    async fn take_login_state(&self, state: &str) -> Result<bool, AuthError>;
}

/// Process-local session store.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<String, Session>>,
    login_states: RwLock<HashMap<String, DateTime<Utc>>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        InMemorySessionStore::default()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn insert(&self, session: Session) -> Result<(), AuthError> {
        let now = Utc::now();
        let mut sessions = self.sessions.write().await;
        sessions.retain(|_, existing| !existing.is_expired(now));
        sessions.insert(session.id.clone(), session);
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<Session>, AuthError> {
        Ok(self.sessions.read().await.get(id).cloned())
    }

    async fn remove(&self, id: &str) -> Result<(), AuthError> {
        self.sessions.write().await.remove(id);
        Ok(())
    }

    async fn put_login_state(&self, state: String, expires_at: DateTime<Utc>) -> Result<(), AuthError> {
        let now = Utc::now();
        let mut states = self.login_states.write().await;
        states.retain(|_, expiry| *expiry > now);
        states.insert(state, expires_at);
        Ok(())
    }

    async fn take_login_state(&self, state: &str) -> Result<bool, AuthError> {
        let expiry = self.login_states.write().await.remove(state);
        Ok(expiry.is_some_and(|expiry| expiry > Utc::now()))
    }
}

/// Signs and verifies session tokens with a shared HMAC secret.
#[derive(Clone)]
pub struct TokenSigner {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl TokenSigner {
    pub fn new(secret: &str) -> Result<Self, AuthError> {
        if secret.len() < 32 {
            return Err(AuthError::Configuration(
                "session secret must be at least 32 bytes long".to_string(),
            ));
        }
        Ok(TokenSigner {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        })
    }

    pub fn sign(&self, session: &Session) -> Result<String, AuthError> {
        let claims = SessionClaims {
            sid: session.id.clone(),
            sub: session.user_id.clone(),
            iat: session.created_at.timestamp(),
            exp: session.expires_at.timestamp(),
        };
        Ok(encode(&Header::default(), &claims, &self.encoding_key)?)
    }

    /// Decodes and validates a session token (signature and expiry).
    pub fn verify(&self, token: &str) -> Result<SessionClaims, AuthError> {
        decode::<SessionClaims>(token, &self.decoding_key, &Validation::default())
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::SessionExpired,
                _ => AuthError::InvalidSession(e.to_string()),
            })
    }
}

/// Creates, resolves and ends sessions.
#[derive(Clone)]
pub struct SessionManager {
    store: Arc<dyn SessionStore>,
    signer: TokenSigner,
    ttl: Duration,
}

impl SessionManager {
    pub fn new(store: Arc<dyn SessionStore>, signer: TokenSigner, ttl: Duration) -> Self {
        SessionManager { store, signer, ttl }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Starts a new login attempt and returns its one-time `state`.
    pub async fn begin_login(&self) -> Result<String, AuthError> {
        let state = Uuid::new_v4().simple().to_string();
        let expires_at = Utc::now() + Duration::minutes(LOGIN_STATE_TTL_MINUTES);
        self.store.put_login_state(state.clone(), expires_at).await?;
        Ok(state)
    }

    /// Consumes a login `state`; each state is accepted once.
    pub async fn complete_login(&self, state: &str) -> Result<(), AuthError> {
        if self.store.take_login_state(state).await? {
            Ok(())
        } else {
            Err(AuthError::UnknownLoginState)
        }
    }

    /// Opens a session for `user_id` and returns it with its signed token.
    pub async fn start(&self, user_id: &str) -> Result<(Session, String), AuthError> {
        let now = Utc::now();
        let session = Session {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            created_at: now,
            expires_at: now + self.ttl,
        };
        let token = self.signer.sign(&session)?;
        self.store.insert(session.clone()).await?;
        info!("Started session {} for user {}", session.id, user_id);
        Ok((session, token))
    }

    /// Resolves a token to a live session.
    pub async fn resolve(&self, token: &str) -> Result<Session, AuthError> {
        let claims = self.signer.verify(token)?;
        let session = self
            .store
            .get(&claims.sid)
            .await?
            .ok_or_else(|| AuthError::InvalidSession("session has ended".to_string()))?;
        if session.user_id != claims.sub {
            return Err(AuthError::InvalidSession("token subject mismatch".to_string()));
        }
        if session.is_expired(Utc::now()) {
            self.store.remove(&session.id).await?;
            return Err(AuthError::SessionExpired);
        }
        Ok(session)
    }

    /// Ends the session named by `token`. Unknown or invalid tokens are
    /// ignored.
    pub async fn end(&self, token: &str) -> Result<(), AuthError> {
        match self.signer.verify(token) {
            Ok(claims) => {
                self.store.remove(&claims.sid).await?;
                info!("Ended session {}", claims.sid);
            }
            Err(e) => debug!("Ignoring logout with unusable token: {}", e),
        }
        Ok(())
    }
}
