use clap::Subcommand;
use serde_json::Value;
use smitebot_api::{ApiError, Division, Portal, Queue, SmiteClient};
use smitebot_gateway::{
    AppConfig,
    settings::{Settings, settings_path},
};

#[derive(Subcommand, PartialEq, Debug)]
pub enum CallCommands {
    /// Check that the API is reachable (unsigned)
    Ping,
    /// Open a new session and print its id
    CreateSession,
    /// Check whether a session id is still valid
    TestSession { session_id: String },
    /// Daily request limits and usage
    DataUsed,
    /// Hi-Rez server status per platform
    ServerStatus,
    /// Current patch version
    PatchInfo,
    /// All gods
    Gods,
    /// Leaderboard for a god in a ranked queue
    GodLeaderboard {
        /// God name or id
        god: String,
        #[arg(value_parser = parse_queue)]
        queue: Queue,
    },
    /// Skins of a god
    GodSkins { god: String },
    /// Recommended items of a god
    GodRecommendedItems { god: String },
    /// All items
    Items,
    /// Player summary
    Player {
        player: String,
        #[arg(long, value_parser = parse_portal)]
        portal: Option<Portal>,
    },
    /// Player ids for a name
    PlayerIdByName { name: String },
    Friends { player: String },
    /// Per-god ranks of a player
    GodRanks { player: String },
    Achievements { player_id: i64 },
    PlayerStatus { player: String },
    MatchHistory { player: String },
    /// Per-god summary for a player in one queue
    QueueStats {
        player: String,
        #[arg(value_parser = parse_queue)]
        queue: Queue,
    },
    MatchDetails { match_id: i64 },
    /// Match ids for a queue in one ten-minute window
    MatchIds {
        #[arg(value_parser = parse_queue)]
        queue: Queue,
        /// YYYYMMDD
        date: String,
        hour: u8,
        /// 0-5, the ten-minute slice of the hour
        window: u8,
    },
    MatchPlayerDetails { match_id: i64 },
    TopMatches,
    LeagueLeaderboard {
        #[arg(value_parser = parse_queue)]
        queue: Queue,
        #[arg(value_parser = parse_division)]
        tier: Division,
        round: u32,
    },
    TeamDetails { clan_id: i64 },
    TeamPlayers { clan_id: i64 },
    EsportsProLeague,
    Motd,
}

impl CallCommands {
    pub async fn run(self, config: AppConfig) -> Result<(), String> {
        let credentials = config.credentials_override().unwrap_or_else(|| {
            Settings::load(&settings_path(&config.bot.script_dir)).credentials()
        });
        let client = SmiteClient::new(config.client_config(), credentials)
            .map_err(|e| format!("Failed to create client: {}", e))?
            .with_log_sink(|message| eprintln!("{message}"));

        let value = self
            .call(&client)
            .await
            .map_err(|e| format!("API call failed: {}", e))?;
        print_json(&value)
    }

    async fn call(self, client: &SmiteClient) -> Result<Value, ApiError> {
        match self {
            CallCommands::Ping => client.ping().await,
            CallCommands::CreateSession => client.renew_session().await.map(Value::String),
            CallCommands::TestSession { session_id } => {
                Ok(Value::Bool(client.test_session(&session_id).await))
            }
            CallCommands::DataUsed => to_value(client.get_data_used().await?),
            CallCommands::ServerStatus => client.get_hirez_server_status().await,
            CallCommands::PatchInfo => client.get_patch_info().await,
            CallCommands::Gods => to_value(client.get_gods().await?),
            CallCommands::GodLeaderboard { god, queue } => {
                client.get_god_leaderboard(god_ref(&god), queue).await
            }
            CallCommands::GodSkins { god } => client.get_god_skins(god_ref(&god)).await,
            CallCommands::GodRecommendedItems { god } => {
                client.get_god_recommended_items(god_ref(&god)).await
            }
            CallCommands::Items => client.get_items().await,
            CallCommands::Player { player, portal } => {
                to_value(client.get_player(&player, portal).await?)
            }
            CallCommands::PlayerIdByName { name } => client.get_player_id_by_name(&name).await,
            CallCommands::Friends { player } => client.get_friends(&player).await,
            CallCommands::GodRanks { player } => to_value(client.get_god_ranks(&player).await?),
            CallCommands::Achievements { player_id } => {
                client.get_player_achievements(player_id).await
            }
            CallCommands::PlayerStatus { player } => client.get_player_status(&player).await,
            CallCommands::MatchHistory { player } => client.get_match_history(&player).await,
            CallCommands::QueueStats { player, queue } => {
                client.get_queue_stats(&player, queue).await
            }
            CallCommands::MatchDetails { match_id } => client.get_match_details(match_id).await,
            CallCommands::MatchIds {
                queue,
                date,
                hour,
                window,
            } => {
                client
                    .get_match_ids_by_queue(queue, &date, hour, window)
                    .await
            }
            CallCommands::MatchPlayerDetails { match_id } => {
                client.get_match_player_details(match_id).await
            }
            CallCommands::TopMatches => client.get_top_matches().await,
            CallCommands::LeagueLeaderboard { queue, tier, round } => {
                client.get_league_leaderboard(queue, tier, round).await
            }
            CallCommands::TeamDetails { clan_id } => client.get_team_details(clan_id).await,
            CallCommands::TeamPlayers { clan_id } => client.get_team_players(clan_id).await,
            CallCommands::EsportsProLeague => client.get_esports_pro_league_details().await,
            CallCommands::Motd => client.get_motd().await,
        }
    }
}

fn god_ref(god: &str) -> smitebot_api::GodRef {
    match god.parse::<i64>() {
        Ok(id) => id.into(),
        Err(_) => god.into(),
    }
}

fn to_value<T: serde::Serialize>(value: T) -> Result<Value, ApiError> {
    serde_json::to_value(value).map_err(|e| ApiError::Decode(e.to_string()))
}

fn print_json(value: &Value) -> Result<(), String> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| format!("Failed to format response: {}", e))?;
    println!("{text}");
    Ok(())
}

fn parse_id(value: &str) -> Result<i64, String> {
    value
        .parse::<i64>()
        .map_err(|_| format!("expected a numeric id, got {value:?}"))
}

fn parse_queue(value: &str) -> Result<Queue, String> {
    let id = parse_id(value)?;
    Queue::from_id(id).ok_or_else(|| format!("unknown queue id {id}"))
}

fn parse_division(value: &str) -> Result<Division, String> {
    let id = parse_id(value)?;
    Division::from_id(id).ok_or_else(|| format!("unknown division id {id}"))
}

fn parse_portal(value: &str) -> Result<Portal, String> {
    let id = parse_id(value)?;
    Portal::from_id(id).ok_or_else(|| format!("unknown portal id {id}"))
}
