//! Shelfplan console entry point

use std::sync::Arc;

use sp_editor::{
    Console, ConfigManager, HttpGateway, LayoutGateway, MemoryGateway, Persistence,
    create_shared_state,
};

fn main() -> std::io::Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sp_editor=info,sp_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!("Starting Shelfplan");

    let mut config_manager = ConfigManager::load();
    if let Some(reason) = config_manager.take_reset_reason() {
        tracing::warn!("{}", reason);
    }
    let config = config_manager.config().clone();

    let gateway: Arc<dyn LayoutGateway> = if config.uses_remote() {
        tracing::info!("Using layout API at {}", config.api_base_url);
        Arc::new(HttpGateway::new(
            config.api_base_url.clone(),
            config.request_timeout(),
            config.auth_token.clone(),
        ))
    } else {
        tracing::info!("No API configured, layouts are kept in memory");
        Arc::new(MemoryGateway::new())
    };

    let session = config.session();
    tracing::info!("Signed in as {} ({})", session.name, session.role);

    let state = create_shared_state(&config);
    let persistence = Persistence::new(gateway, session);
    let mut console = Console::new(state, persistence);

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    console.run_loop(stdin.lock(), stdout.lock())
}
