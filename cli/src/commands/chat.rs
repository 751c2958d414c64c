use std::sync::Arc;

use async_trait::async_trait;
use smitebot_gateway::{
    AppConfig, ChatHost, InboundMessage, PluginOptions, SCRIPT_DESCRIPTION, SCRIPT_NAME,
    SmitePlugin,
};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::Mutex;

/// Replies go to stdout, script logs to stderr.
pub struct ConsoleHost {
    stdout: Mutex<tokio::io::Stdout>,
}

impl ConsoleHost {
    pub fn new() -> Self {
        Self {
            stdout: Mutex::new(tokio::io::stdout()),
        }
    }
}

impl Default for ConsoleHost {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatHost for ConsoleHost {
    async fn send_message(&self, text: &str) -> anyhow::Result<()> {
        let mut stdout = self.stdout.lock().await;
        stdout.write_all(text.as_bytes()).await?;
        stdout.write_all(b"\n").await?;
        stdout.flush().await?;
        Ok(())
    }

    fn log(&self, script: &str, message: &str) {
        eprintln!("[{script}] {message}");
    }
}

pub async fn run_chat(config: AppConfig) -> Result<(), String> {
    let options = PluginOptions {
        client: config.client_config(),
        default_player: Some(config.bot.default_player.clone()),
        credentials: config.credentials_override(),
        transport: None,
    };

    let mut plugin = SmitePlugin::init(
        config.bot.script_dir.clone(),
        Arc::new(ConsoleHost::new()),
        options,
    )
    .map_err(|e| format!("Failed to start plugin: {}", e))?;

    eprintln!("{}", banner());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => return Err(format!("Failed to read stdin: {}", e)),
        };

        let message = InboundMessage::chat("console", line);
        if let Err(e) = plugin.execute(&message).await {
            eprintln!("Failed to send reply: {}", e);
        }
        plugin.tick();
    }

    plugin.unload();
    Ok(())
}

fn banner() -> String {
    format!(
        "{SCRIPT_NAME}: {SCRIPT_DESCRIPTION}\n\
         Type !godrank <player> <god>, !duelrank [player] or !quota. Ctrl-D to quit."
    )
}

#[cfg(test)]
mod tests {
    use smitebot_gateway::ChatHost;

    use super::{ConsoleHost, banner};

    #[test]
    fn banner_describes_the_script() {
        let banner = banner();
        assert!(banner.starts_with("Smite API: !duelrank <player> and !godrank <player> <god>"));
        assert!(banner.ends_with("Ctrl-D to quit."));
    }

    #[tokio::test]
    async fn console_host_writes_replies() {
        let host = ConsoleHost::new();
        assert!(host.send_message("7000 queries left for today").await.is_ok());
    }
}
