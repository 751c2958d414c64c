//! SmiteClient implementation
//!
//! One method per remote endpoint. Signed endpoints go through the session
//! manager; the utility endpoints (`ping`, `getdataused`,
//! `gethirezserverstatus`, `getpatchinfo`) are issued unsigned and never touch
//! the session.
//!
//! All mutable state (credentials, session, god lookup table) lives behind one
//! async mutex. A call holds it for its whole request sequence, so concurrent
//! callers are served one after another.

use std::{collections::HashMap, fmt, sync::Arc};

use reqwest::header::HeaderMap;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::debug;

use crate::{
    ClientConfig, envelope,
    error::ApiError,
    models::{DataUsed, Division, God, GodRank, GodRef, Player, Portal, Queue},
    session::{LogSink, Session, SessionManager},
    signer::{Credentials, timestamp_now},
    transport::{HttpTransport, Transport},
};

/// Client for the Smite API
pub struct SmiteClient {
    config: ClientConfig,
    transport: Arc<dyn Transport>,
    state: Mutex<ClientState>,
}

struct ClientState {
    credentials: Credentials,
    sessions: SessionManager,
    god_ids: Option<HashMap<String, i64>>,
}

impl fmt::Debug for SmiteClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmiteClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl SmiteClient {
    /// Create a client backed by reqwest.
    pub fn new(config: ClientConfig, credentials: Credentials) -> Result<Self, ApiError> {
        let transport = HttpTransport::new(config.timeout)?;
        Ok(Self::with_transport(config, credentials, Arc::new(transport)))
    }

    /// Create a client on top of an injected transport.
    pub fn with_transport(
        config: ClientConfig,
        credentials: Credentials,
        transport: Arc<dyn Transport>,
    ) -> Self {
        let sessions = SessionManager::new(config.base_url.clone(), config.session_policy);
        Self {
            config,
            transport,
            state: Mutex::new(ClientState {
                credentials,
                sessions,
                god_ids: None,
            }),
        }
    }

    /// Route session-creation diagnostics to `sink`.
    pub fn with_log_sink(mut self, sink: impl Fn(&str) + Send + Sync + 'static) -> Self {
        let sink: LogSink = Arc::new(sink);
        self.state.get_mut().sessions.set_log_sink(Some(sink));
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    // =========================================================================
    // Credentials and session state
    // =========================================================================

    pub async fn credentials(&self) -> Credentials {
        self.state.lock().await.credentials.clone()
    }

    /// Rotate both credentials. The cached session is kept; the next validity
    /// check decides whether it survives.
    pub async fn set_credentials(&self, credentials: Credentials) {
        self.state.lock().await.credentials = credentials;
    }

    pub async fn set_dev_id(&self, developer_id: impl Into<String>) {
        self.state.lock().await.credentials.developer_id = developer_id.into();
    }

    pub async fn set_auth_key(&self, auth_key: impl Into<String>) {
        self.state.lock().await.credentials.auth_key = auth_key.into();
    }

    pub async fn session(&self) -> Option<Session> {
        self.state.lock().await.sessions.current().cloned()
    }

    /// Create a new session right away and cache it.
    pub async fn renew_session(&self) -> Result<String, ApiError> {
        let mut state = self.state.lock().await;
        let ClientState {
            credentials,
            sessions,
            ..
        } = &mut *state;

        let session_id = sessions
            .create_session(self.transport.as_ref(), credentials)
            .await?;
        sessions.set_current(Some(Session {
            session_id: session_id.clone(),
            created_implicitly: false,
        }));
        Ok(session_id)
    }

    /// Whether the server still accepts `session_id`. Any failure counts as invalid.
    pub async fn test_session(&self, session_id: &str) -> bool {
        let state = self.state.lock().await;
        state
            .sessions
            .test_session(self.transport.as_ref(), &state.credentials, session_id)
            .await
    }

    pub async fn invalidate_session(&self) {
        self.state.lock().await.sessions.invalidate();
    }

    // =========================================================================
    // Request assembly
    // =========================================================================

    /// Build a signed URL for `method`, creating or renewing the session first.
    pub async fn build_request(
        &self,
        method: &str,
        params: Option<&str>,
    ) -> Result<String, ApiError> {
        let mut state = self.state.lock().await;
        self.signed_url(&mut state, method, params).await
    }

    /// Build the URL of an unauthenticated utility endpoint.
    pub fn build_unsigned_request(&self, method: &str, params: Option<&str>) -> String {
        let mut url = format!("{}/{}json", self.config.base_url, method);
        if let Some(params) = params {
            url.push('/');
            url.push_str(params);
        }
        url
    }

    /// GET `url` and decode the enveloped payload.
    pub async fn issue<T: DeserializeOwned>(&self, url: &str) -> Result<T, ApiError> {
        let body = self.transport.get(url, HeaderMap::new()).await?;
        envelope::decode(&body)
    }

    async fn signed_url(
        &self,
        state: &mut ClientState,
        method: &str,
        params: Option<&str>,
    ) -> Result<String, ApiError> {
        let ClientState {
            credentials,
            sessions,
            ..
        } = state;

        let session_id = sessions
            .ensure_session(self.transport.as_ref(), credentials)
            .await?;

        let timestamp = timestamp_now();
        let mut url = format!(
            "{}/{}json/{}/{}/{}/{}",
            self.config.base_url,
            method,
            credentials.developer_id,
            credentials.sign(method, &timestamp),
            session_id,
            timestamp
        );
        if let Some(params) = params {
            url.push('/');
            url.push_str(params);
        }
        Ok(url)
    }

    async fn call<T: DeserializeOwned>(
        &self,
        state: &mut ClientState,
        method: &str,
        params: Option<&str>,
    ) -> Result<T, ApiError> {
        let url = self.signed_url(state, method, params).await?;
        debug!(method, "issuing signed request");
        self.issue(&url).await
    }

    async fn request<T: DeserializeOwned>(
        &self,
        method: &str,
        params: Option<&str>,
    ) -> Result<T, ApiError> {
        let mut state = self.state.lock().await;
        self.call(&mut state, method, params).await
    }

    async fn unsigned<T: DeserializeOwned>(&self, method: &str) -> Result<T, ApiError> {
        let url = self.build_unsigned_request(method, None);
        debug!(method, "issuing unsigned request");
        self.issue(&url).await
    }

    // =========================================================================
    // God lookup table
    // =========================================================================

    async fn resolve_god(&self, state: &mut ClientState, god: &GodRef) -> Result<i64, ApiError> {
        let name = match god {
            GodRef::Id(id) => return Ok(*id),
            GodRef::Name(name) => name,
        };

        if state.god_ids.is_none() {
            let table = self.fetch_god_ids(state).await?;
            state.god_ids = Some(table);
        }

        state
            .god_ids
            .as_ref()
            .and_then(|table| table.get(&name.to_lowercase()))
            .copied()
            .ok_or_else(|| ApiError::GodNotFound(name.clone()))
    }

    async fn fetch_god_ids(
        &self,
        state: &mut ClientState,
    ) -> Result<HashMap<String, i64>, ApiError> {
        let gods: Vec<God> = self
            .call(state, "getgods", Some(self.config.lang.as_str()))
            .await?;
        debug!(count = gods.len(), "built god lookup table");
        Ok(gods
            .into_iter()
            .map(|god| (god.name.to_lowercase(), god.id))
            .collect())
    }

    /// Rebuild the god lookup table from `getgods`. Returns the number of gods.
    pub async fn refresh_god_ids(&self) -> Result<usize, ApiError> {
        let mut state = self.state.lock().await;
        let table = self.fetch_god_ids(&mut state).await?;
        let count = table.len();
        state.god_ids = Some(table);
        Ok(count)
    }

    /// Replace the god lookup table with a known one. Names are lowercased.
    pub async fn seed_god_ids(&self, table: HashMap<String, i64>) {
        let table = table
            .into_iter()
            .map(|(name, id)| (name.to_lowercase(), id))
            .collect();
        self.state.lock().await.god_ids = Some(table);
    }

    async fn god_request(
        &self,
        method: &str,
        god: GodRef,
        suffix: &str,
    ) -> Result<Value, ApiError> {
        let mut state = self.state.lock().await;
        let god_id = self.resolve_god(&mut state, &god).await?;
        let params = format!("{god_id}/{suffix}");
        self.call(&mut state, method, Some(&params)).await
    }

    // =========================================================================
    // Utility APIs (unsigned)
    // =========================================================================

    /// A quick way of validating access to the API.
    pub async fn ping(&self) -> Result<Value, ApiError> {
        self.unsigned("ping").await
    }

    /// Daily usage limits and the current usage against them.
    pub async fn get_data_used(&self) -> Result<Vec<DataUsed>, ApiError> {
        self.unsigned("getdataused").await
    }

    /// UP/DOWN status of the game environments.
    pub async fn get_hirez_server_status(&self) -> Result<Value, ApiError> {
        self.unsigned("gethirezserverstatus").await
    }

    /// Currently deployed patch version.
    pub async fn get_patch_info(&self) -> Result<Value, ApiError> {
        self.unsigned("getpatchinfo").await
    }

    // =========================================================================
    // Catalog APIs
    // =========================================================================

    pub async fn get_gods(&self) -> Result<Vec<God>, ApiError> {
        self.request("getgods", Some(self.config.lang.as_str()))
            .await
    }

    /// Current season leaderboard for a god in Duel, Joust League or Conquest League.
    pub async fn get_god_leaderboard(
        &self,
        god: impl Into<GodRef>,
        queue: Queue,
    ) -> Result<Value, ApiError> {
        self.god_request("getgodleaderboard", god.into(), &queue.id().to_string())
            .await
    }

    pub async fn get_god_skins(&self, god: impl Into<GodRef>) -> Result<Value, ApiError> {
        let lang = self.config.lang.clone();
        self.god_request("getgodskins", god.into(), &lang).await
    }

    pub async fn get_god_recommended_items(
        &self,
        god: impl Into<GodRef>,
    ) -> Result<Value, ApiError> {
        let lang = self.config.lang.clone();
        self.god_request("getgodrecommendeditems", god.into(), &lang)
            .await
    }

    pub async fn get_items(&self) -> Result<Value, ApiError> {
        self.request("getitems", Some(self.config.lang.as_str()))
            .await
    }

    // =========================================================================
    // Player APIs
    // =========================================================================

    /// League and other high level data for a player name or id. `portal`
    /// narrows the lookup to one platform.
    pub async fn get_player(
        &self,
        player: &str,
        portal: Option<Portal>,
    ) -> Result<Vec<Player>, ApiError> {
        let params = match portal {
            Some(portal) => format!("{}/{}", player, portal.id()),
            None => player.to_string(),
        };
        self.request("getplayer", Some(&params)).await
    }

    pub async fn get_player_id_by_name(&self, player_name: &str) -> Result<Value, ApiError> {
        self.request("getplayeridbyname", Some(player_name)).await
    }

    /// Friend names of a player. PC accounts only.
    pub async fn get_friends(&self, player: &str) -> Result<Value, ApiError> {
        self.request("getfriends", Some(player)).await
    }

    /// Rank and worshippers for every god a player has played.
    pub async fn get_god_ranks(&self, player: &str) -> Result<Vec<GodRank>, ApiError> {
        self.request("getgodranks", Some(player)).await
    }

    pub async fn get_player_achievements(&self, player_id: i64) -> Result<Value, ApiError> {
        self.request("getplayerachievements", Some(&player_id.to_string()))
            .await
    }

    /// Live status; see [`crate::models::PlayerStatus`] for the `status` values.
    pub async fn get_player_status(&self, player: &str) -> Result<Value, ApiError> {
        self.request("getplayerstatus", Some(player)).await
    }

    pub async fn get_match_history(&self, player: &str) -> Result<Value, ApiError> {
        self.request("getmatchhistory", Some(player)).await
    }

    /// Per-god summary for a (player, queue) combination.
    pub async fn get_queue_stats(&self, player: &str, queue: Queue) -> Result<Value, ApiError> {
        let params = format!("{}/{}", player, queue.id());
        self.request("getqueuestats", Some(&params)).await
    }

    // =========================================================================
    // Match APIs
    // =========================================================================

    pub async fn get_match_details(&self, match_id: i64) -> Result<Value, ApiError> {
        self.request("getmatchdetails", Some(&match_id.to_string()))
            .await
    }

    /// Match ids of a queue for one ten-minute window. `date` is `YYYYMMDD`,
    /// `hour` is 0-23 and `window` 0-5 selects the ten minutes within the hour.
    pub async fn get_match_ids_by_queue(
        &self,
        queue: Queue,
        date: &str,
        hour: u8,
        window: u8,
    ) -> Result<Value, ApiError> {
        let params = match_ids_params(queue, date, hour, window)?;
        self.request("getmatchidsbyqueue", Some(&params)).await
    }

    /// Player information for a live match.
    pub async fn get_match_player_details(&self, match_id: i64) -> Result<Value, ApiError> {
        self.request("getmatchplayerdetails", Some(&match_id.to_string()))
            .await
    }

    /// The 50 most watched / most recent recorded matches.
    pub async fn get_top_matches(&self) -> Result<Value, ApiError> {
        self.request("gettopmatches", None).await
    }

    // =========================================================================
    // League and clan APIs
    // =========================================================================

    pub async fn get_league_leaderboard(
        &self,
        queue: Queue,
        tier: Division,
        round: u32,
    ) -> Result<Value, ApiError> {
        let params = format!("{}/{}/{}", queue.id(), tier.id(), round);
        self.request("getleagueleaderboard", Some(&params)).await
    }

    pub async fn get_team_details(&self, clan_id: i64) -> Result<Value, ApiError> {
        self.request("getteamdetails", Some(&clan_id.to_string()))
            .await
    }

    pub async fn get_team_players(&self, clan_id: i64) -> Result<Value, ApiError> {
        self.request("getteamplayers", Some(&clan_id.to_string()))
            .await
    }

    // =========================================================================
    // Misc APIs
    // =========================================================================

    /// Matchups of the current eSports Pro League season.
    pub async fn get_esports_pro_league_details(&self) -> Result<Value, ApiError> {
        self.request("getesportsproleaguedetails", None).await
    }

    /// The 20 most recent Match-of-the-Days.
    pub async fn get_motd(&self) -> Result<Value, ApiError> {
        self.request("getmotd", None).await
    }
}

/// Path segment for a ten-minute window: 0 is `00`, the rest are `index * 10`.
pub fn minute_window_segment(window: u8) -> Result<String, ApiError> {
    match window {
        0 => Ok("00".to_string()),
        1..=5 => Ok((u16::from(window) * 10).to_string()),
        _ => Err(ApiError::InvalidParameter(format!(
            "minute window must be 0-5, got {window}"
        ))),
    }
}

fn match_ids_params(queue: Queue, date: &str, hour: u8, window: u8) -> Result<String, ApiError> {
    if date.len() != 8 || !date.chars().all(|c| c.is_ascii_digit()) {
        return Err(ApiError::InvalidParameter(format!(
            "date must be YYYYMMDD, got {date:?}"
        )));
    }
    if hour > 23 {
        return Err(ApiError::InvalidParameter(format!(
            "hour must be 0-23, got {hour}"
        )));
    }
    Ok(format!(
        "{}/{}/{},{}",
        queue.id(),
        date,
        hour,
        minute_window_segment(window)?
    ))
}
