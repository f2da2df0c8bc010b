//! Session management for the portal client.
//!
//! The session manager owns the authentication credential: it acquires one
//! via login, decodes the embedded claims, persists the raw credential,
//! validates expiry on startup rehydration, and derives the authorization
//! flags the rest of an application uses to decide which tools to offer.
//!
//! There is no global session state; callers thread the manager and the
//! [`Client`] explicitly, preserving "one authenticated identity per running
//! client" without global mutable state.
//!
//! # Example
//!
//! ```no_run
//! use hrportal_rs::{Client, FileCredentialStore, SessionManager};
//!
//! # async fn example() -> hrportal_rs::Result<()> {
//! let mut client = Client::from_env()?;
//! let mut sessions = SessionManager::new(FileCredentialStore::new("/var/lib/hrportal"));
//!
//! // Pick up a previous run's credential, if still valid.
//! sessions.rehydrate(&mut client);
//!
//! if sessions.current_session().is_none() {
//!     let session = sessions.login(&mut client, "admin00", "abc123").await?;
//!     if session.is_manager {
//!         // offer manager tools
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod claims;
pub mod store;

use time::OffsetDateTime;

use crate::client::Client;
use crate::error::{Error, Result};

pub use claims::{Claims, DecodeError};
pub use store::{CREDENTIAL_KEY, CredentialStore, FileCredentialStore, MemoryCredentialStore};

/// In-memory view of a valid credential.
///
/// A `Session` existing implies the backing credential's expiry was in the
/// future at the moment it was last validated. The flags are advisory UI
/// gates; the server re-checks every action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Session {
    pub emp_no: u32,
    pub is_manager: bool,
    pub is_hr_admin: bool,
}

impl From<&Claims> for Session {
    fn from(claims: &Claims) -> Self {
        Self {
            emp_no: claims.emp_no,
            is_manager: claims.is_manager,
            is_hr_admin: claims.is_hr_admin,
        }
    }
}

/// Manages the authentication identity for one running client.
#[derive(Debug)]
pub struct SessionManager<S: CredentialStore> {
    store: S,
    session: Option<Session>,
}

impl<S: CredentialStore> SessionManager<S> {
    #[must_use]
    pub fn new(store: S) -> Self {
        Self {
            store,
            session: None,
        }
    }

    /// Restores a session from the stored credential, if present and valid.
    ///
    /// Runs once at startup. A missing credential leaves the manager
    /// anonymous; a credential that fails to decode or has expired is
    /// discarded silently. This is a startup convenience path, not a
    /// security boundary, so no error surfaces to the caller.
    #[instrument(skip_all)]
    pub fn rehydrate(&mut self, client: &mut Client) {
        let Some(raw) = self.store.load() else {
            debug!("no stored credential");
            return;
        };

        match claims::decode(&raw) {
            Ok(claims) if claims.exp > OffsetDateTime::now_utc().unix_timestamp() => {
                debug!(emp_no = claims.emp_no, "restored session from stored credential");
                self.session = Some(Session::from(&claims));
                client.set_credential(Some(raw));
            }
            Ok(_) => {
                debug!("stored credential has expired, discarding");
                self.store.clear();
            }
            Err(e) => {
                warn!("stored credential could not be decoded, discarding: {e}");
                self.store.clear();
            }
        }
    }

    /// Authenticates against the portal and installs the resulting session.
    ///
    /// Credentials travel form-encoded, matching the server's OAuth2-style
    /// login contract. A rejected login surfaces as
    /// [`Error::Authentication`]; an unreachable server as
    /// [`Error::Request`]. A credential that cannot be decoded is fatal to
    /// the attempt: no partial session is ever installed.
    #[instrument(skip(self, client, password))]
    pub async fn login(
        &mut self,
        client: &mut Client,
        username: &str,
        password: &str,
    ) -> Result<Session> {
        if username.trim().is_empty() {
            return Err(Error::Validation("username must not be empty".to_string()));
        }
        if password.is_empty() {
            return Err(Error::Validation("password must not be empty".to_string()));
        }

        let token = client.auth().token(username, password).await?;
        let claims = claims::decode(&token.access_token)?;

        let session = Session::from(&claims);
        self.store.save(&token.access_token);
        client.set_credential(Some(token.access_token));
        self.session = Some(session);

        info!(emp_no = session.emp_no, "login succeeded");
        Ok(session)
    }

    /// Discards the session and stored credential.
    ///
    /// Idempotent: safe to call in any state.
    #[instrument(skip_all)]
    pub fn logout(&mut self, client: &mut Client) {
        self.store.clear();
        client.set_credential(None);
        if self.session.take().is_some() {
            info!("logged out");
        }
    }

    /// The current session, if authenticated. Pure read.
    #[must_use]
    pub fn current_session(&self) -> Option<&Session> {
        self.session.as_ref()
    }
}
