mod logging;

use anyhow::Context;
use homework_core::{config, BotConfig, Notifier, Poller, PracticumClient, TelegramBot};

fn main() {
    // Values from a .env file take precedence over the process environment.
    let dotenv = dotenvy::dotenv_override();

    if let Err(e) = logging::init(config::log_file_from_env().as_deref()) {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }

    match dotenv {
        Ok(path) => tracing::info!(path = %path.display(), "loaded environment from .env"),
        Err(e) if e.not_found() => tracing::debug!("no .env file found"),
        Err(e) => tracing::warn!(error = %e, "failed to read .env file"),
    }

    if let Err(e) = run() {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let config = BotConfig::from_env()
        .inspect_err(|e| tracing::error!(critical = true, error = %e, "missing credentials, exiting"))
        .context("cannot start homework bot")?;

    let source = PracticumClient::new(&config.endpoint, &config.credentials.practicum_token)
        .context("failed to build homework API client")?;
    let bot = TelegramBot::new(&config.telegram_api, &config.credentials.telegram_token)
        .context("failed to build Telegram client")?;
    let notifier = Notifier::new(bot, config.credentials.telegram_chat_id.as_str());

    tracing::info!(
        endpoint = %config.endpoint,
        chat_id = %config.credentials.telegram_chat_id,
        interval_secs = config.retry_interval.as_secs(),
        "homework bot starting"
    );

    Poller::new(source, notifier, config.retry_interval).run_forever()
}
