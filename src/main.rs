use anyhow::Context;
use std::net::SocketAddr;
use std::sync::Arc;
use tradewind::engine::{BatchRunner, OutcomeEngine, ThreadRandom};
use tradewind::notify::{LogSink, NotificationSink, WebhookSink};
use tradewind::workflow::UnlockWorkflow;
use tradewind::{api, config::Config, db::init_db, Repository};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing_subscriber::filter::LevelFilter::INFO.into()),
        )
        .init();

    let config = Config::from_env().context("configuration error")?;
    let port = config.port;

    let pool = init_db(&config.database_path)
        .await
        .context("failed to initialize database")?;
    let repo = Arc::new(Repository::new(pool));

    let sink: Arc<dyn NotificationSink> = match &config.notify_webhook_url {
        Some(url) => Arc::new(WebhookSink::new(url.clone())),
        None => Arc::new(LogSink),
    };
    let random = Arc::new(ThreadRandom);

    let engine = Arc::new(OutcomeEngine::new(repo.clone(), random.clone(), sink.clone()));
    let workflow = Arc::new(UnlockWorkflow::new(
        repo.clone(),
        engine.clone(),
        sink.clone(),
        config.clone(),
    ));
    let batch = Arc::new(BatchRunner::new(repo.clone(), engine.clone(), random));

    let app = api::create_router(api::AppState::new(repo, config, engine, workflow, batch));

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind to {}", addr))?;

    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
