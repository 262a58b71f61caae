use std::sync::Arc;

use waflow::audit::UnknownMessageLog;
use waflow::catalog::reload::{self, CatalogHandle};
use waflow::config::Config;
use waflow::dispatch::Dispatcher;
use waflow::flow::store::InMemoryStore;
use waflow::outbound::WhatsAppSender;
use waflow::webhook::{WebhookState, webhook_routes};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("  Required: VERIFY_TOKEN, WHATSAPP_TOKEN, PHONE_NUMBER_ID");
            std::process::exit(1);
        }
    };

    eprintln!("🤖 waflow v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Webhook: http://0.0.0.0:{}/webhook", config.port);
    eprintln!("   Catalog: {}", config.catalog_path.display());
    eprintln!("   Unknown log: {}", config.unknown_log_path.display());
    eprintln!(
        "   Operator forward: {}",
        config.operator_contact.as_deref().unwrap_or("disabled")
    );

    let catalog = Arc::new(CatalogHandle::open(config.catalog_path.clone()).await);
    let _watch_handle =
        reload::spawn_watch_task(Arc::clone(&catalog), config.catalog_poll_interval);

    let sender = WhatsAppSender::new(
        config.graph_api_base.clone(),
        config.phone_number_id.clone(),
        config.access_token.clone(),
    );

    let dispatcher = Arc::new(Dispatcher::new(
        catalog,
        Arc::new(InMemoryStore::new()),
        sender,
        UnknownMessageLog::new(config.unknown_log_path.clone()),
        config.operator_contact.clone(),
    ));

    let app = webhook_routes(WebhookState {
        verify_token: config.verify_token.clone(),
        dispatcher,
    });

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?;
    tracing::info!(port = config.port, "Webhook server started");
    axum::serve(listener, app).await?;

    Ok(())
}
