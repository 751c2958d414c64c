//! Session lifecycle for signed calls.
//!
//! A session id is created lazily, checked with `testsession` before each
//! signed call and silently replaced when that check fails. A failed check is
//! never propagated: any transport or decode error counts as "invalid".
//!
//! When the backend answers `createsession` with something other than
//! `Approved`, the default [`SessionPolicy::Permissive`] reports the rejection
//! through the log sink and still hands out whatever `session_id` came back.
//! A backend that keeps rejecting therefore shows up as failing downstream
//! calls, not as an error here. [`SessionPolicy::Strict`] turns the rejection
//! into [`ApiError::SessionRejected`].

use std::{fmt, sync::Arc};

use reqwest::header::HeaderMap;
use tracing::{debug, error};

use crate::{
    envelope,
    error::ApiError,
    models::CreateSessionResponse,
    signer::{Credentials, timestamp_now},
    transport::Transport,
};

const APPROVED: &str = "Approved";
const TEST_SUCCESS_MARKER: &str = "successful";

/// Diagnostic sink handed to the client by its host.
pub type LogSink = Arc<dyn Fn(&str) + Send + Sync>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub session_id: String,
    pub created_implicitly: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SessionPolicy {
    /// Use the returned session id even when `ret_msg` is not `Approved`.
    #[default]
    Permissive,
    /// Fail with [`ApiError::SessionRejected`] when `ret_msg` is not `Approved`.
    Strict,
}

pub struct SessionManager {
    base_url: String,
    policy: SessionPolicy,
    session: Option<Session>,
    log_sink: Option<LogSink>,
}

impl fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionManager")
            .field("base_url", &self.base_url)
            .field("policy", &self.policy)
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

impl SessionManager {
    pub fn new(base_url: impl Into<String>, policy: SessionPolicy) -> Self {
        Self {
            base_url: base_url.into(),
            policy,
            session: None,
            log_sink: None,
        }
    }

    pub fn set_log_sink(&mut self, sink: Option<LogSink>) {
        self.log_sink = sink;
    }

    pub fn current(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Replaces the cached session, e.g. with one created out of band.
    pub fn set_current(&mut self, session: Option<Session>) {
        self.session = session;
    }

    pub fn invalidate(&mut self) {
        self.session = None;
    }

    /// Returns a session id that passed `testsession`, or a freshly created one.
    pub async fn ensure_session(
        &mut self,
        transport: &dyn Transport,
        credentials: &Credentials,
    ) -> Result<String, ApiError> {
        if let Some(cached) = self.session.as_ref().map(|s| s.session_id.clone()) {
            if self.test_session(transport, credentials, &cached).await {
                return Ok(cached);
            }
            debug!(session_id = %cached, "cached session failed validation, renewing");
            self.session = None;
        }

        let session_id = self.create_session(transport, credentials).await?;
        self.session = Some(Session {
            session_id: session_id.clone(),
            created_implicitly: true,
        });
        Ok(session_id)
    }

    /// Issues `createsession` and returns the session id from the response.
    /// Does not touch the cached session.
    pub async fn create_session(
        &self,
        transport: &dyn Transport,
        credentials: &Credentials,
    ) -> Result<String, ApiError> {
        let timestamp = timestamp_now();
        let url = format!(
            "{}/createsessionjson/{}/{}/{}",
            self.base_url,
            credentials.developer_id,
            credentials.sign("createsession", &timestamp),
            timestamp
        );

        let body = transport.get(&url, HeaderMap::new()).await?;
        let response: CreateSessionResponse = envelope::decode(&body)?;

        let ret_msg = response.ret_msg.unwrap_or_default();
        if ret_msg == APPROVED {
            return response.session_id.ok_or_else(|| {
                ApiError::Decode("approved createsession response has no session_id".to_string())
            });
        }

        if self.policy == SessionPolicy::Strict {
            return Err(ApiError::SessionRejected(ret_msg));
        }
        error!(ret_msg = %ret_msg, "could not create session");
        self.report(&format!("[ERROR] Could not create session: {ret_msg}"));

        // A rejection usually carries a null id; hand out an empty one and let
        // the signed call fail downstream.
        Ok(response.session_id.unwrap_or_default())
    }

    /// Issues `testsession`. Any failure counts as an invalid session.
    pub async fn test_session(
        &self,
        transport: &dyn Transport,
        credentials: &Credentials,
        session_id: &str,
    ) -> bool {
        let timestamp = timestamp_now();
        let url = format!(
            "{}/testsessionjson/{}/{}/{}/{}",
            self.base_url,
            credentials.developer_id,
            credentials.sign("testsession", &timestamp),
            session_id,
            timestamp
        );

        let body = match transport.get(&url, HeaderMap::new()).await {
            Ok(body) => body,
            Err(error) => {
                debug!(error = %error, "session test request failed");
                return false;
            }
        };

        match envelope::unwrap(&body) {
            Ok(serde_json::Value::String(text)) => text.contains(TEST_SUCCESS_MARKER),
            Ok(other) => other.to_string().contains(TEST_SUCCESS_MARKER),
            Err(error) => {
                debug!(error = %error, "session test response was malformed");
                false
            }
        }
    }

    fn report(&self, message: &str) {
        if let Some(sink) = &self.log_sink {
            sink(message);
        }
    }
}
