use std::sync::Arc;

use anyhow::Context;
use uuid::Uuid;

use feedback_bot::channels::CliChannel;
use feedback_bot::config::BotConfig;
use feedback_bot::receipts::{MemoryReceiptQueue, ReceiptRouteState, receipt_routes};
use feedback_bot::store::{self, UserProfile};
use feedback_bot::survey::{SurveyRunner, apprentice_feedback_survey};

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

    let config = BotConfig::from_env().context("loading configuration")?;

    eprintln!("📋 Feedback Bot v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Receipts: http://0.0.0.0:{}/api/delivery-receipts", config.http_port);
    eprintln!("   Storage: {:?}", config.storage);
    eprintln!("   Required score: {}", config.required_score);
    eprintln!(
        "   Credentials: {}",
        if config.credentials.is_some() {
            "configured"
        } else {
            "not set (local mode)"
        }
    );
    eprintln!("   Answer the questions as they appear. Ctrl-D to leave.\n");

    // The survey script must validate before the service accepts anything.
    let definition = Arc::new(
        apprentice_feedback_survey(config.required_score).context("assembling survey script")?,
    );

    let store = store::open(&config.storage)
        .await
        .context("opening conversation store")?;

    // Delivery-receipt webhook
    let app = receipt_routes(ReceiptRouteState {
        queue: Arc::new(MemoryReceiptQueue::new()),
    });
    let http_port = config.http_port;
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{http_port}"))
        .await
        .context("binding webhook port")?;
    tokio::spawn(async move {
        tracing::info!(port = http_port, "Delivery receipt webhook started");
        axum::serve(listener, app).await.ok();
    });

    // One CLI conversation per process run.
    let conversation_id = Uuid::new_v4();
    let user_name = std::env::var("USER").unwrap_or_else(|_| "local-user".to_string());
    store
        .set_profile(conversation_id, &UserProfile::new(&user_name))
        .await
        .context("storing user profile")?;

    let channel = CliChannel::new(config.typing_delay_per_char);
    let runner = SurveyRunner::new(definition, store);
    let outcome = runner.run(conversation_id, &channel).await?;

    tracing::info!(conversation = %conversation_id, outcome = %outcome, "survey completed");
    Ok(())
}
