use clap::Subcommand;
use smitebot_gateway::{AppConfig, SCRIPT_CREATOR, SCRIPT_NAME, SCRIPT_VERSION};

pub mod call;
pub mod chat;
pub mod settings;

pub use call::CallCommands;
pub use settings::SettingsCommands;

#[derive(Subcommand, PartialEq, Debug)]
pub enum Commands {
    /// Get CLI Version
    Version,

    /// Run the chat bot against stdin/stdout
    Chat {
        /// Player used by !duelrank without an argument
        #[arg(long)]
        default_player: Option<String>,
    },

    /// Call a single API endpoint and print the JSON result
    #[command(subcommand)]
    Call(CallCommands),

    /// Show or change the script settings (dev id and auth key)
    #[command(subcommand)]
    Settings(SettingsCommands),
}

impl Commands {
    pub async fn run(self, config: AppConfig) -> Result<(), String> {
        match self {
            Commands::Version => {
                println!("{}", version_line());
            }
            Commands::Chat { default_player } => {
                let mut config = config;
                if let Some(player) = default_player {
                    config.bot.default_player = player;
                }
                chat::run_chat(config).await?;
            }
            Commands::Call(command) => {
                command.run(config).await?;
            }
            Commands::Settings(command) => {
                command.run(config)?;
            }
        }
        Ok(())
    }
}

fn version_line() -> String {
    format!(
        "smitebot v{} ({} script {} by {})",
        env!("CARGO_PKG_VERSION"),
        SCRIPT_NAME,
        SCRIPT_VERSION,
        SCRIPT_CREATOR
    )
}

#[cfg(test)]
mod tests {
    use super::version_line;

    #[test]
    fn version_names_the_script() {
        let line = version_line();
        assert!(line.starts_with(&format!("smitebot v{}", env!("CARGO_PKG_VERSION"))));
        assert!(line.ends_with("(Smite API script 1.0.0.2 by Enchom)"));
    }
}
