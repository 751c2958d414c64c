//! Request signing for the Smite API.
//!
//! Every signed call carries `md5(dev_id + method + auth_key + timestamp)` as a
//! lowercase hex string. The timestamp is UTC in `YYYYMMDDHHMMSS` form and must
//! be taken right before the signature is computed: the backend rejects stale
//! signatures.

use std::fmt;

use chrono::Utc;
use md5::{Digest, Md5};

const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// Developer credentials issued by Hi-Rez.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub developer_id: String,
    pub auth_key: String,
}

impl Credentials {
    pub fn new(developer_id: impl Into<String>, auth_key: impl Into<String>) -> Self {
        Self {
            developer_id: developer_id.into(),
            auth_key: auth_key.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.developer_id.trim().is_empty() || self.auth_key.trim().is_empty()
    }

    /// Signs `method` for the given timestamp with these credentials.
    pub fn sign(&self, method: &str, timestamp: &str) -> String {
        signature(&self.developer_id, method, &self.auth_key, timestamp)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("developer_id", &self.developer_id)
            .field("auth_key", &"<redacted>")
            .finish()
    }
}

/// Current UTC time formatted as `YYYYMMDDHHMMSS`.
pub fn timestamp_now() -> String {
    Utc::now().format(TIMESTAMP_FORMAT).to_string()
}

/// Lowercase hex MD5 over `dev_id + method + auth_key + timestamp`.
pub fn signature(dev_id: &str, method: &str, auth_key: &str, timestamp: &str) -> String {
    let mut hasher = Md5::new();
    hasher.update(dev_id.as_bytes());
    hasher.update(method.as_bytes());
    hasher.update(auth_key.as_bytes());
    hasher.update(timestamp.as_bytes());
    hex::encode(hasher.finalize())
}
