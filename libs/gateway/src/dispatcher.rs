use std::sync::Arc;

use smitebot_api::{ApiError, SmiteClient};
use tracing::warn;

use crate::commands::Command;

pub const DEFAULT_PLAYER: &str = "Enchom";

/// Turns chat commands into API calls and API results into chat replies.
/// Every failure ends up as a fixed "could not find/fetch" line; the error
/// itself only goes to the log.
pub struct Dispatcher {
    client: Arc<SmiteClient>,
    default_player: String,
}

impl Dispatcher {
    pub fn new(client: Arc<SmiteClient>, default_player: impl Into<String>) -> Self {
        Self {
            client,
            default_player: default_player.into(),
        }
    }

    pub fn client(&self) -> &Arc<SmiteClient> {
        &self.client
    }

    /// Reply for `message`, or `None` when it is not a command.
    pub async fn handle(&self, message: &str) -> Option<String> {
        let command = Command::parse(message, &self.default_player)?;
        Some(self.run(command).await)
    }

    pub async fn run(&self, command: Command) -> String {
        match command {
            Command::GodRank { player, god } => self.god_rank(&player, &god).await,
            Command::DuelRank { player } => self.duel_rank(&player).await,
            Command::Quota => self.quota().await,
            Command::Usage(usage) => usage.to_string(),
        }
    }

    async fn god_rank(&self, player: &str, god: &str) -> String {
        let ranks = match self.client.get_god_ranks(player).await {
            Ok(ranks) if !ranks.is_empty() => ranks,
            Ok(_) => return format!("Could not find player {player}"),
            Err(error) => {
                log_failure("getgodranks", player, &error);
                return format!("Could not find player {player}");
            }
        };

        let wanted = god.to_lowercase();
        let Some(rank) = ranks.iter().find(|rank| rank.god.to_lowercase() == wanted) else {
            return format!("Could not find god {god}");
        };

        format!(
            "Player {player} on {god} stats: Worshippers: {} | Win/Loss: {}/{} | Kills/Deaths: {}/{}",
            rank.worshippers, rank.wins, rank.losses, rank.kills, rank.deaths
        )
    }

    async fn duel_rank(&self, player: &str) -> String {
        let players = match self.client.get_player(player, None).await {
            Ok(players) => players,
            Err(error) => {
                log_failure("getplayer", player, &error);
                return format!("Could not find player {player}");
            }
        };

        let Some(found) = players.first() else {
            return format!("Could not find player {player}");
        };

        let division = found
            .ranked_duel
            .division()
            .map(|division| division.display_name())
            .unwrap_or("Unranked");
        format!("Player {player} is in {division}")
    }

    async fn quota(&self) -> String {
        match self.client.get_data_used().await {
            Ok(quota) => match quota.first() {
                Some(quota) => format!("{} queries left for today", quota.requests_left()),
                None => "Could not fetch quotas".to_string(),
            },
            Err(error) => {
                log_failure("getdataused", "", &error);
                "Could not fetch quotas".to_string()
            }
        }
    }
}

fn log_failure(method: &str, subject: &str, error: &ApiError) {
    let kind = if error.is_transport() {
        "transport"
    } else if error.is_malformed() {
        "malformed"
    } else if error.is_not_found() {
        "not_found"
    } else {
        "other"
    };
    warn!(method, subject, kind, error = %error, "api call failed");
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use serde_json::{Value, json};
    use smitebot_api::{ApiError, ClientConfig, Credentials, HeaderMap, SmiteClient, Transport};

    use super::*;

    struct FixedTransport {
        payload: Option<Value>,
    }

    #[async_trait]
    impl Transport for FixedTransport {
        async fn get(&self, url: &str, _headers: HeaderMap) -> Result<String, ApiError> {
            let payload = if url.contains("/createsessionjson/") {
                json!({"ret_msg": "Approved", "session_id": "S"})
            } else {
                match &self.payload {
                    Some(payload) => payload.clone(),
                    None => return Err(ApiError::Transport("offline".to_string())),
                }
            };
            Ok(json!({ "response": payload.to_string() }).to_string())
        }
    }

    fn dispatcher(payload: Option<Value>) -> Dispatcher {
        let client = SmiteClient::with_transport(
            ClientConfig::default(),
            Credentials::new("D", "K"),
            Arc::new(FixedTransport { payload }),
        );
        Dispatcher::new(Arc::new(client), DEFAULT_PLAYER)
    }

    #[tokio::test]
    async fn godrank_formats_stats() {
        let dispatcher = dispatcher(Some(json!([
            {"god": "Thor", "Worshippers": 1200, "Wins": 40, "Losses": 30, "Kills": 500, "Deaths": 210},
            {"god": "Ah Muzen Cab", "Worshippers": 10, "Wins": 1, "Losses": 2, "Kills": 3, "Deaths": 4}
        ])));

        let reply = dispatcher.handle("!godrank enchom ah muzen cab").await;

        assert_eq!(
            reply.as_deref(),
            Some(
                "Player enchom on ah muzen cab stats: Worshippers: 10 | Win/Loss: 1/2 | Kills/Deaths: 3/4"
            )
        );
    }

    #[tokio::test]
    async fn godrank_folds_non_ascii_names() {
        let dispatcher = dispatcher(Some(json!([
            {"god": "ÉTAIN", "Worshippers": 5, "Wins": 2, "Losses": 1, "Kills": 9, "Deaths": 3}
        ])));

        let reply = dispatcher.handle("!godrank enchom Étain").await;

        assert_eq!(
            reply.as_deref(),
            Some("Player enchom on étain stats: Worshippers: 5 | Win/Loss: 2/1 | Kills/Deaths: 9/3")
        );
    }

    #[tokio::test]
    async fn godrank_unknown_god() {
        let dispatcher = dispatcher(Some(json!([{"god": "Thor"}])));

        let reply = dispatcher.handle("!godrank enchom odin").await;

        assert_eq!(reply.as_deref(), Some("Could not find god odin"));
    }

    #[tokio::test]
    async fn godrank_empty_or_failed_is_player_not_found() {
        let empty = dispatcher(Some(json!([])));
        assert_eq!(
            empty.handle("!godrank ghost thor").await.as_deref(),
            Some("Could not find player ghost")
        );

        let offline = dispatcher(None);
        assert_eq!(
            offline.handle("!godrank ghost thor").await.as_deref(),
            Some("Could not find player ghost")
        );
    }

    #[tokio::test]
    async fn duelrank_uses_division_name_and_default_player() {
        let dispatcher = dispatcher(Some(json!([{"Name": "Enchom", "RankedDuel": {"Tier": 21}}])));

        assert_eq!(
            dispatcher.handle("!duelrank").await.as_deref(),
            Some("Player Enchom is in Diamond V")
        );
    }

    #[tokio::test]
    async fn duelrank_unknown_tier_is_unranked() {
        let dispatcher = dispatcher(Some(json!([{"RankedDuel": {"Tier": 99}}])));

        assert_eq!(
            dispatcher.handle("!duelrank someone").await.as_deref(),
            Some("Player someone is in Unranked")
        );
    }

    #[tokio::test]
    async fn quota_reports_remaining_requests() {
        let dispatcher = dispatcher(Some(json!([
            {"Request_Limit_Daily": 7500, "Total_Requests_Today": 500}
        ])));

        assert_eq!(
            dispatcher.handle("!quota").await.as_deref(),
            Some("7000 queries left for today")
        );
    }

    #[tokio::test]
    async fn quota_failure_is_fixed_message() {
        let dispatcher = dispatcher(None);

        assert_eq!(
            dispatcher.handle("!quota").await.as_deref(),
            Some("Could not fetch quotas")
        );
    }

    #[tokio::test]
    async fn non_commands_get_no_reply() {
        let dispatcher = dispatcher(None);
        assert_eq!(dispatcher.handle("gg wp").await, None);
    }
}
