use std::path::PathBuf;

use clap::Parser;
use smitebot_gateway::{AppCliFlags, AppConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::Commands;

#[derive(Parser, PartialEq, Debug)]
#[command(name = "smitebot")]
#[command(about = "Smite API client and chat bot", long_about = None)]
struct Cli {
    /// Path to the config file (default: ~/.smitebot/config.toml)
    #[arg(long = "config", global = true)]
    config: Option<PathBuf>,

    /// Override the API endpoint
    #[arg(long = "api-url", global = true)]
    api_url: Option<String>,

    /// Developer id, takes precedence over the script settings
    #[arg(long = "dev-id")]
    dev_id: Option<String>,

    /// Auth key, takes precedence over the script settings
    #[arg(long = "auth-key")]
    auth_key: Option<String>,

    /// Script directory holding Settings/settings.json and UI_Config.json
    #[arg(long = "script-dir", global = true)]
    script_dir: Option<PathBuf>,

    /// Enable debug output
    #[arg(long = "debug", default_value_t = false, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn flags(&self) -> AppCliFlags {
        AppCliFlags {
            base_url: self.api_url.clone(),
            dev_id: self.dev_id.clone(),
            auth_key: self.auth_key.clone(),
            script_dir: self.script_dir.clone(),
            default_player: None,
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if cli.debug {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                    format!(
                        "error,{}=debug,smitebot_api=debug,smitebot_gateway=debug",
                        env!("CARGO_CRATE_NAME")
                    )
                    .into()
                }),
            )
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    let config = match AppConfig::load(cli.config.as_deref(), &cli.flags()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = cli.command.run(config).await {
        eprintln!("Ops! something went wrong: {}", e);
        std::process::exit(1);
    }
}
