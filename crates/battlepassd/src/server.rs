//! HTTP server for battlepassd.

use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use axum::Router;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::DaemonConfig;
use crate::routes;
use crate::service::battle_pass::BattlePassService;
use crate::service::catalog::CatalogService;
use crate::service::players::PlayerService;
use crate::service::rewards::RewardService;
use crate::store::Store;

/// Application state shared across handlers.
pub struct AppState {
    pub players: PlayerService,
    pub battle_pass: BattlePassService,
    pub rewards: RewardService,
    pub catalog: CatalogService,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(store: Arc<Store>, config: &DaemonConfig) -> Self {
        Self {
            players: PlayerService::new(Arc::clone(&store)),
            battle_pass: BattlePassService::new(Arc::clone(&store), config.max_level),
            rewards: RewardService::new(Arc::clone(&store)),
            catalog: CatalogService::new(store),
            start_time: Instant::now(),
        }
    }
}

/// Builds the full router; exposed so tests can drive it without a socket.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(routes::player_routes())
        .merge(routes::battle_pass_routes())
        .merge(routes::reward_routes())
        .merge(routes::catalog_routes())
        .merge(routes::health_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Run the HTTP server.
pub async fn run(config: &DaemonConfig, state: AppState) -> Result<()> {
    let app = router(Arc::new(state));

    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    info!("Listening on http://{}", config.listen_addr);

    axum::serve(listener, app).await?;
    Ok(())
}
