use log2discord::env::{env_or, LOG2DISCORD_WEBHOOK_ENV};
use log2discord::init::{init_tracing_with_config, LayerConfig};
use log2discord::{Notifier, NotifierOptions};
use tokio::time::{sleep, Duration};
use tracing::{error, info, warn, Level};

#[tokio::main]
async fn main() {
    let webhook = env_or(LOG2DISCORD_WEBHOOK_ENV, "http://127.0.0.1:8080/webhook");
    let notifier = match Notifier::from_options(NotifierOptions::new(webhook).name("auth-service").host(true)) {
        Ok(notifier) => notifier,
        Err(e) => {
            eprintln!("invalid configuration: {}", e);
            return;
        }
    };

    let config = LayerConfig {
        min_level: Level::WARN,
        enable_stdout: true,
    };
    if let Err(e) = init_tracing_with_config(notifier, config) {
        eprintln!("subscriber already installed: {}", e);
        return;
    }

    info!("starting service");

    warn!(pool = "primary", in_use = 48, "connection pool nearly exhausted");

    error!(
        user_id = 42,
        reason = "invalid password",
        "authentication failed"
    );

    sleep(Duration::from_secs(2)).await;
}
