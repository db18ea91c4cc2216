use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{Result, eyre};
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use pixicord::application::{InteractionDispatcher, SessionManager, control_panel};
use pixicord::domain::ports::ChatEvent;
use pixicord::infrastructure::{
    AssetFetcher, BotConfig, DiscordRestClient, GatewayClient, StateStore,
};

fn init_logging(config: &BotConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.to_tracing_level().to_string()));

    if let Some(log_path) = &config.log_path {
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_path)?;

        let file_layer = fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .init();

        info!(path = %log_path.display(), "Logging initialized");
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer())
            .init();
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    dotenvy::dotenv().ok();

    let config = BotConfig::parse();
    init_logging(&config)?;

    info!(version = pixicord::VERSION, "Starting {}", pixicord::NAME);

    let state_store = config
        .state_path
        .clone()
        .map_or_else(StateStore::new, StateStore::at_path);
    let state = state_store.load().await?;

    let rest = Arc::new(DiscordRestClient::new(&config.token)?);
    let fetcher = Arc::new(AssetFetcher::new()?);
    let sessions = Arc::new(SessionManager::new());

    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<ChatEvent>();
    let gateway = GatewayClient::new(config.token.clone(), event_tx);
    let gateway_handle = gateway.start();

    let mut dispatcher: Option<Arc<InteractionDispatcher>> = None;

    while let Some(event) = event_rx.recv().await {
        match event {
            ChatEvent::Ready { user_id } => {
                if let Some(dispatcher) = &dispatcher {
                    // Reconnect: identity may not have changed, but refresh anyway.
                    dispatcher.set_self_user(user_id);
                    continue;
                }

                let control_message = control_panel::ensure_control_message(
                    rest.as_ref(),
                    config.control_channel,
                    state.control_message(),
                )
                .await?;

                if let Err(e) = state_store.save(control_message).await {
                    warn!(error = %e, "Failed to persist control message id");
                }

                let built = Arc::new(InteractionDispatcher::new(
                    sessions.clone(),
                    rest.clone(),
                    fetcher.clone(),
                    control_message,
                ));
                built.set_self_user(user_id);
                dispatcher = Some(built);
            }
            event => {
                let Some(dispatcher) = &dispatcher else {
                    continue;
                };

                // Session-state changes apply inline here, in arrival order;
                // the fetch/transcode/DM continuation runs on its own task so
                // one user's large upload never delays another's events.
                dispatcher.handle_event(event);
            }
        }
    }

    gateway_handle.abort();
    Err(eyre!("gateway connection lost permanently"))
}
