use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Declares a fieldless enum backed by a fixed numeric id with a static
/// id <-> display name table.
macro_rules! id_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $($variant:ident = $id:literal => $display:literal,)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant,)+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant,)+];

            pub fn from_id(id: i64) -> Option<Self> {
                match id {
                    $($id => Some($name::$variant),)+
                    _ => None,
                }
            }

            pub fn id(self) -> i64 {
                match self {
                    $($name::$variant => $id,)+
                }
            }

            pub fn display_name(self) -> &'static str {
                match self {
                    $($name::$variant => $display,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.display_name())
            }
        }
    };
}

id_enum! {
    /// Ranked tier as reported in `RankedDuel.Tier` and friends.
    pub enum Division {
        Qualifying = 0 => "Qualifying",
        BronzeV = 1 => "Bronze V",
        BronzeIV = 2 => "Bronze IV",
        BronzeIII = 3 => "Bronze III",
        BronzeII = 4 => "Bronze II",
        BronzeI = 5 => "Bronze I",
        SilverV = 6 => "Silver V",
        SilverIV = 7 => "Silver IV",
        SilverIII = 8 => "Silver III",
        SilverII = 9 => "Silver II",
        SilverI = 10 => "Silver I",
        GoldV = 11 => "Gold V",
        GoldIV = 12 => "Gold IV",
        GoldIII = 13 => "Gold III",
        GoldII = 14 => "Gold II",
        GoldI = 15 => "Gold I",
        PlatinumV = 16 => "Platinum V",
        PlatinumIV = 17 => "Platinum IV",
        PlatinumIII = 18 => "Platinum III",
        PlatinumII = 19 => "Platinum II",
        PlatinumI = 20 => "Platinum I",
        DiamondV = 21 => "Diamond V",
        DiamondIV = 22 => "Diamond IV",
        DiamondIII = 23 => "Diamond III",
        DiamondII = 24 => "Diamond II",
        DiamondI = 25 => "Diamond I",
        Master = 26 => "Master",
        Grandmaster = 27 => "Grandmaster",
    }
}

id_enum! {
    /// Account platform, used to disambiguate `getplayer` lookups.
    pub enum Portal {
        Unknown = -1 => "Unknown",
        HiRez = 1 => "Hi-Rez",
        Steam = 5 => "Steam",
        Ps4 = 9 => "PS4",
        Xbox = 10 => "Xbox",
        Switch = 22 => "Switch",
        Discord = 25 => "Discord",
    }
}

id_enum! {
    /// Match queue ids. Only `Duel`, `JoustLeague` and `ConquestLeague` are
    /// accepted by the leaderboard and queue stat endpoints.
    pub enum Queue {
        Arena = 435 => "Arena",
        Joust = 448 => "Joust",
        Conquest = 426 => "Conquest",
        Assault = 445 => "Assault",
        Clash = 466 => "Clash",
        ConquestLeague = 451 => "Conquest League",
        JoustLeague = 450 => "Joust League",
        Motd = 434 => "MOTD",
        JoustCustom = 441 => "Joust Custom",
        Siege = 459 => "Siege",
        Duel = 440 => "Duel",
        ArenaAiMedium = 468 => "Arena AI (Medium)",
        JoustAiMedium = 456 => "Joust AI (Medium)",
        ArenaTutorial = 462 => "Arena Tutorial",
        ArenaCustom = 438 => "Arena Custom",
        ConquestCustom = 429 => "Conquest Custom",
        ConquestAiMedium = 461 => "Conquest AI (Medium)",
        ArenaAiEasy = 457 => "Arena AI (Easy)",
        ConquestAiEasy = 476 => "Conquest AI (Easy)",
        JoustAiEasy = 474 => "Joust AI (Easy)",
        ConquestLeagueController = 504 => "Conquest League (Controller)",
        ArenaPracticeMedium = 472 => "Arena Practice (Medium)",
        JoustLeagueController = 503 => "Joust League (Controller)",
        AssaultCustom = 446 => "Assault Custom",
        AssaultAiMedium = 454 => "Assault AI (Medium)",
        JoustPracticeMedium = 473 => "Joust Practice (Medium)",
        ArenaPracticeEasy = 443 => "Arena Practice (Easy)",
        ClashCustom = 467 => "Clash Custom",
        ClashAiMedium = 469 => "Clash AI (Medium)",
        AssaultAiEasy = 481 => "Assault AI (Easy)",
        SiegeCustom = 460 => "Siege Custom",
        ConquestPracticeMedium = 475 => "Conquest Practice (Medium)",
        JoustPracticeEasy = 464 => "Joust Practice (Easy)",
        DuelController = 502 => "Duel (Controller)",
        ConquestPracticeEasy = 458 => "Conquest Practice (Easy)",
        ClashAiEasy = 478 => "Clash AI (Easy)",
        AssaultPracticeMedium = 480 => "Assault Practice (Medium)",
        AssaultPracticeEasy = 479 => "Assault Practice (Easy)",
        ClashPracticeMedium = 477 => "Clash Practice (Medium)",
        ClashPracticeEasy = 470 => "Clash Practice (Easy)",
        ClashTutorial = 471 => "Clash Tutorial",
        BasicTutorial = 436 => "Basic Tutorial",
    }
}

id_enum! {
    /// Value of `status` in a `getplayerstatus` payload.
    pub enum PlayerStatus {
        Offline = 0 => "Offline",
        InLobby = 1 => "In Lobby",
        GodSelection = 2 => "God Selection",
        InGame = 3 => "In Game",
        Online = 4 => "Online",
        Unknown = 5 => "Unknown",
    }
}

/// Something a caller can address a god by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GodRef {
    Id(i64),
    Name(String),
}

impl From<i64> for GodRef {
    fn from(value: i64) -> Self {
        GodRef::Id(value)
    }
}

impl From<&str> for GodRef {
    fn from(value: &str) -> Self {
        GodRef::Name(value.to_string())
    }
}

impl From<String> for GodRef {
    fn from(value: String) -> Self {
        GodRef::Name(value)
    }
}

/// Response to `createsession`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CreateSessionResponse {
    #[serde(default)]
    pub ret_msg: Option<String>,
    /// Null or absent when the backend rejects the request.
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// One entry of `getgods`. Only the fields the client needs are typed.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct God {
    pub id: i64,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One entry of `getgodranks`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GodRank {
    pub god: String,
    #[serde(rename = "Worshippers", default)]
    pub worshippers: i64,
    #[serde(rename = "Wins", default)]
    pub wins: i64,
    #[serde(rename = "Losses", default)]
    pub losses: i64,
    #[serde(rename = "Kills", default)]
    pub kills: i64,
    #[serde(rename = "Deaths", default)]
    pub deaths: i64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Per-queue ranked block inside a `getplayer` entry.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RankedStats {
    #[serde(rename = "Tier", default)]
    pub tier: i64,
    #[serde(rename = "Wins", default)]
    pub wins: i64,
    #[serde(rename = "Losses", default)]
    pub losses: i64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RankedStats {
    pub fn division(&self) -> Option<Division> {
        Division::from_id(self.tier)
    }
}

/// One entry of `getplayer`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Player {
    #[serde(rename = "Name", default)]
    pub name: Option<String>,
    #[serde(rename = "RankedDuel", default)]
    pub ranked_duel: RankedStats,
    #[serde(rename = "RankedJoust", default)]
    pub ranked_joust: RankedStats,
    #[serde(rename = "RankedConquest", default)]
    pub ranked_conquest: RankedStats,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One entry of `getdataused`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DataUsed {
    #[serde(rename = "Request_Limit_Daily", default)]
    pub request_limit_daily: i64,
    #[serde(rename = "Total_Requests_Today", default)]
    pub total_requests_today: i64,
    #[serde(rename = "Active_Sessions", default)]
    pub active_sessions: i64,
    #[serde(rename = "Session_Cap", default)]
    pub session_cap: i64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DataUsed {
    pub fn requests_left(&self) -> i64 {
        self.request_limit_daily - self.total_requests_today
    }
}
