//! Signed-in state: the backend token, who it belongs to, and where it is kept.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, TimeZone, Utc};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, Result};
use crate::models::{AuthResponse, Claims, Role};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub company_id: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl Session {
    /// Builds the session from a login response, preferring the token's own claims.
    pub fn from_auth(auth: &AuthResponse) -> Self {
        let (user_id, role, expires_at) = match decode_claims(&auth.token) {
            Ok(claims) => {
                let role = claims.role.parse().unwrap_or_else(|e| {
                    warn!("Token carries an unknown role ({}), using the profile role", e);
                    auth.user.role
                });
                let expires_at = i64::try_from(claims.exp)
                    .ok()
                    .and_then(|secs| Utc.timestamp_opt(secs, 0).single());
                (claims.sub, role, expires_at)
            }
            Err(e) => {
                debug!("Token is not a readable JWT: {}", e);
                (auth.user.id.clone(), auth.user.role, None)
            }
        };

        Self {
            token: auth.token.clone(),
            user_id,
            name: auth.user.name.clone(),
            email: auth.user.email.clone(),
            role,
            company_id: auth.user.company_id.clone(),
            expires_at,
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.map_or(false, |exp| exp <= now)
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.role == role
    }
}

/// Reads the claims of a backend JWT.
///
/// The signing secret lives on the server, so only the payload is read here;
/// expiry is checked by [`Session::is_expired`].
pub fn decode_claims(token: &str) -> Result<Claims> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.required_spec_claims.clear();

    decode::<Claims>(token, &DecodingKey::from_secret(&[]), &validation)
        .map(|data| data.claims)
        .map_err(|e| ApiError::Session(format!("could not read token claims: {}", e)))
}

pub trait SessionStore: Send + Sync {
    fn load(&self) -> Result<Option<Session>>;
    fn save(&self, session: &Session) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

/// Keeps the session as JSON on disk between CLI invocations.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<Session>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&self.path).map_err(|e| {
            ApiError::Session(format!("failed to read {}: {}", self.path.display(), e))
        })?;
        match serde_json::from_str(&contents) {
            Ok(session) => Ok(Some(session)),
            Err(e) => {
                warn!("Ignoring unreadable session file {}: {}", self.path.display(), e);
                Ok(None)
            }
        }
    }

    fn save(&self, session: &Session) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                fs::create_dir_all(dir)
                    .and_then(|_| restrict(dir, 0o700))
                    .map_err(|e| {
                        ApiError::Session(format!("failed to create {}: {}", dir.display(), e))
                    })?;
            }
        }
        let contents = serde_json::to_string_pretty(session)?;
        write_private(&self.path, contents.as_bytes()).map_err(|e| {
            ApiError::Session(format!("failed to write {}: {}", self.path.display(), e))
        })
    }

    fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ApiError::Session(format!(
                "failed to remove {}: {}",
                self.path.display(),
                e
            ))),
        }
    }
}

/// The file holds a bearer token, so only the owner may read it.
fn write_private(path: &Path, contents: &[u8]) -> io::Result<()> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options.open(path)?;
    // A file left by an older run keeps its mode through open().
    restrict(path, 0o600)?;
    file.write_all(contents)
}

fn restrict(path: &Path, mode: u32) -> io::Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(mode))?;
    }
    #[cfg(not(unix))]
    let _ = (path, mode);
    Ok(())
}

/// Drops the stored session when the backend has rejected its token.
///
/// Returns whether anything was cleared.
pub fn forget_if_unauthorized(store: &dyn SessionStore, err: &ApiError) -> Result<bool> {
    if !err.is_unauthorized() {
        return Ok(false);
    }
    store.clear()?;
    info!("Stored session removed after the backend rejected it");
    Ok(true)
}

#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    inner: Arc<Mutex<Option<Session>>>,
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<Session>> {
        self.inner
            .lock()
            .map(|s| s.clone())
            .map_err(|_| ApiError::Session("session lock poisoned".to_string()))
    }

    fn save(&self, session: &Session) -> Result<()> {
        let mut slot = self
            .inner
            .lock()
            .map_err(|_| ApiError::Session("session lock poisoned".to_string()))?;
        *slot = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let mut slot = self
            .inner
            .lock()
            .map_err(|_| ApiError::Session("session lock poisoned".to_string()))?;
        *slot = None;
        Ok(())
    }
}
