use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde::Deserialize;
use thiserror::Error;

/// Claims embedded in a portal credential.
///
/// The server issues a signed three-segment token whose second segment is a
/// base64url-encoded JSON object carrying these fields. The client treats the
/// capability flags as advisory, for deciding which tools to offer; real
/// authorization enforcement stays server-side.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Claims {
    /// Employee number of the authenticated subject.
    pub emp_no: u32,
    /// Whether the subject may decide direct reports' leave requests.
    pub is_manager: bool,
    /// Whether the subject may create and update employee records.
    pub is_hr_admin: bool,
    /// Expiry as seconds since the Unix epoch.
    pub exp: i64,
}

/// Failure to read the claims out of a credential string.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("credential does not have the expected segment structure")]
    MalformedStructure,
    #[error("credential payload is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("credential payload is not a valid claims object: {0}")]
    Json(#[from] serde_json::Error),
}

/// Decodes the claims embedded in a credential string.
///
/// The payload segment uses the base64url alphabet without padding, so the
/// alphabet is translated (`-` to `+`, `_` to `/`) and padding restored
/// before standard base64 decoding. Decoding is pure: the same credential
/// always yields the same claims.
pub fn decode(credential: &str) -> Result<Claims, DecodeError> {
    let segments: Vec<&str> = credential.split('.').collect();
    if segments.len() != 3 {
        return Err(DecodeError::MalformedStructure);
    }

    let mut payload = segments[1].replace('-', "+").replace('_', "/");
    while payload.len() % 4 != 0 {
        payload.push('=');
    }

    let bytes = STANDARD.decode(payload)?;
    Ok(serde_json::from_slice(&bytes)?)
}
