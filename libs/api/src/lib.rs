//! Smite API client
//!
//! A signed, session-based client for the Hi-Rez Smite API:
//! - request signing (`md5(dev_id + method + auth_key + timestamp)`)
//! - lazy session creation, validation and renewal
//! - double-encoded response envelopes
//! - one typed method per remote endpoint
//!
//! The client is safe to share between tasks: its session and god lookup table
//! sit behind a mutex and calls are serialized.

use std::time::Duration;

mod client;
pub mod envelope;
pub mod error;
pub mod models;
pub mod session;
pub mod signer;
pub mod transport;

pub use client::{SmiteClient, minute_window_segment};
pub use error::ApiError;
pub use models::{
    CreateSessionResponse, DataUsed, Division, God, GodRank, GodRef, Player, PlayerStatus, Portal,
    Queue, RankedStats,
};
pub use session::{LogSink, Session, SessionManager, SessionPolicy};
pub use signer::{Credentials, signature, timestamp_now};
pub use transport::{HeaderMap, HttpTransport, Transport};

pub const DEFAULT_API_URL: &str = "http://api.smitegame.com/smiteapi.svc";
/// Language id sent to the catalog endpoints. `1` is English.
pub const DEFAULT_LANG: &str = "1";

/// Configuration for SmiteClient
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// API endpoint URL (default: http://api.smitegame.com/smiteapi.svc)
    pub base_url: String,
    pub lang: String,
    pub session_policy: SessionPolicy,
    /// Per-request timeout of the reqwest transport
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            lang: DEFAULT_LANG.to_string(),
            session_policy: SessionPolicy::default(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Set API endpoint
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = lang.into();
        self
    }

    pub fn with_session_policy(mut self, policy: SessionPolicy) -> Self {
        self.session_policy = policy;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new()
    }
}
