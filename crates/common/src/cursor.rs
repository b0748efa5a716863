//! Opaque pagination cursors
//!
//! A cursor records the boundary of the last item a client has seen, the sort
//! key it was issued under and the traversal direction. On the wire it is
//! `v1.<payload>.<signature>`, both parts base64url without padding, where
//! the signature is HMAC-SHA256 of the payload bytes under a server secret.
//! Cursors carry no server-side session state.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::sync::Arc;
use uuid::Uuid;

use crate::{Error, Result};

type HmacSha256 = Hmac<Sha256>;

const VERSION_PREFIX: &str = "v1.";

/// Direction in which a client walks the sort order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Traversal {
    #[default]
    Forward,
    Backward,
}

/// A single sort-key value captured in a cursor
///
/// All values of one field share a variant, so the derived ordering is the
/// natural ordering of that field.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum CursorValue {
    Int(i64),
    Text(String),
    Timestamp(DateTime<Utc>),
    Uuid(Uuid),
}

/// Sort value plus tie-break value of the last item seen
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Boundary {
    pub value: CursorValue,
    pub tie: CursorValue,
}

/// Decoded cursor contents
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cursor {
    /// External sort key the cursor was issued under, e.g. `-id`
    pub sort: String,
    pub traversal: Traversal,
    pub boundary: Boundary,
}

/// Signs and verifies cursors
#[derive(Clone)]
pub struct CursorCodec {
    key: Arc<[u8]>,
}

impl std::fmt::Debug for CursorCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CursorCodec")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

impl CursorCodec {
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        Self {
            key: Arc::from(secret.as_ref()),
        }
    }

    fn mac(&self) -> Result<HmacSha256> {
        HmacSha256::new_from_slice(&self.key)
            .map_err(|e| Error::Internal(format!("Invalid cursor key: {}", e)))
    }

    /// Encode a cursor into its opaque wire form
    pub fn encode(&self, cursor: &Cursor) -> Result<String> {
        let payload = serde_json::to_vec(cursor)?;
        let mut mac = self.mac()?;
        mac.update(&payload);
        let signature = mac.finalize().into_bytes();

        Ok(format!(
            "{}{}.{}",
            VERSION_PREFIX,
            URL_SAFE_NO_PAD.encode(&payload),
            URL_SAFE_NO_PAD.encode(signature)
        ))
    }

    /// Decode and verify a cursor previously produced by [`CursorCodec::encode`]
    pub fn decode(&self, token: &str) -> Result<Cursor> {
        let body = token
            .strip_prefix(VERSION_PREFIX)
            .ok_or_else(|| Error::InvalidCursor("unsupported cursor version".to_string()))?;

        let (payload, signature) = body
            .split_once('.')
            .ok_or_else(|| Error::InvalidCursor("malformed cursor".to_string()))?;

        let payload = URL_SAFE_NO_PAD
            .decode(payload)
            .map_err(|_| Error::InvalidCursor("malformed cursor payload".to_string()))?;
        let signature = URL_SAFE_NO_PAD
            .decode(signature)
            .map_err(|_| Error::InvalidCursor("malformed cursor signature".to_string()))?;

        let mut mac = self.mac()?;
        mac.update(&payload);
        mac.verify_slice(&signature)
            .map_err(|_| Error::InvalidCursor("cursor signature mismatch".to_string()))?;

        serde_json::from_slice(&payload)
            .map_err(|e| Error::InvalidCursor(format!("unreadable cursor: {}", e)))
    }
}
