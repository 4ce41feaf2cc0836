use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{Level, info, warn};

use common::storage::UploadStore;
use server::config::AppConfig;
use server::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let config = AppConfig::load()?;

    let db = server::database::init_db(&config.database.url).await?;
    let uploads = UploadStore::new(
        PathBuf::from(&config.uploads.dir),
        config.uploads.max_size,
    )
    .await?;

    server::seed::seed_admin_user(&db, &config.seed).await?;
    server::seed::seed_fixtures(&db, Path::new(&config.seed.fixtures_dir)).await?;
    match server::scanner::scan_books(&db, Path::new(&config.resources.books_dir)).await {
        Ok(added) if added > 0 => info!(added, "registered new book resources"),
        Ok(_) => {}
        Err(err) => warn!(%err, "book scan failed"),
    }

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState {
        db,
        config: Arc::new(config),
        uploads: Arc::new(uploads),
    };
    let app = server::build_router(state);

    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
