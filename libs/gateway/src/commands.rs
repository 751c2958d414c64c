//! Chat command parsing. Commands are matched case-insensitively and their
//! arguments are lowercased, the same way viewers tend to type them.

pub const GODRANK_USAGE: &str = "Usage: !godrank <player> <god>";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `!godrank <player> <god...>`
    GodRank { player: String, god: String },
    /// `!duelrank [player]`
    DuelRank { player: String },
    /// `!quota`
    Quota,
    /// A known command with missing arguments; carries the usage line.
    Usage(&'static str),
}

impl Command {
    /// Parses a chat line. Returns `None` for anything that is not a command.
    pub fn parse(message: &str, default_player: &str) -> Option<Self> {
        let words: Vec<String> = message
            .split_whitespace()
            .map(str::to_lowercase)
            .collect();
        let (head, args) = words.split_first()?;

        match head.as_str() {
            "!godrank" => match args {
                [player, god @ ..] if !god.is_empty() => Some(Command::GodRank {
                    player: player.clone(),
                    god: god.join(" "),
                }),
                _ => Some(Command::Usage(GODRANK_USAGE)),
            },
            "!duelrank" => Some(Command::DuelRank {
                player: args
                    .first()
                    .cloned()
                    .unwrap_or_else(|| default_player.to_string()),
            }),
            "!quota" => Some(Command::Quota),
            _ => None,
        }
    }
}
