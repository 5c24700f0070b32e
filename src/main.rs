use deepfake_api::{AppState, build_app, classifier, config::Config, logging};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Loads .env first so RUST_LOG from it reaches the subscriber
    let config = Config::from_env()?;
    logging::init();

    tokio::fs::create_dir_all(&config.upload_dir).await?;

    // hf-hub's sync client blocks while downloading weights
    let kind = config.classifier;
    let model = config.model.clone();
    let classifier =
        tokio::task::spawn_blocking(move || classifier::load(kind, &model)).await??;

    tracing::info!(
        "[startup] Classifier {} ready, uploads in {:?}, front-end from {:?}",
        classifier.name(),
        config.upload_dir,
        config.frontend_dir
    );

    let state = AppState::new(classifier, config.upload_dir.clone());
    let app = build_app(state, &config);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
