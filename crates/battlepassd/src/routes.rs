//! API routes for battlepassd.
//!
//! Thin handlers over the services: decode the request, call one service
//! method, map the error taxonomy to a status code. Caller identity is
//! resolved upstream; these routes trust the player id they are given.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use tracing::error;

use battlepass_common::api::{
    AddExperienceRequest, BattlePassSummary, BattlePassView, ClaimRewardRequest,
    CreateRewardRequest, ErrorBody, GrantRewardRequest, HealthResponse, MessageResponse,
    NicknameAvailability, RegisterPlayerRequest, RenamePlayerRequest, UpdateRewardRequest,
};
use battlepass_common::error::BattlePassError;
use battlepass_common::player::Player;
use battlepass_common::reward::{GrantedReward, RewardDefinition};

use crate::server::AppState;

type AppStateArc = Arc<AppState>;
type ApiError = (StatusCode, Json<ErrorBody>);
type ApiResult<T> = Result<Json<T>, ApiError>;

/// Maps a service error to the wire. Business errors keep their message;
/// storage failures log the detail and answer with a generic message.
fn error_response(err: BattlePassError) -> ApiError {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let message = if err.is_business_error() {
        err.to_string()
    } else {
        error!("Storage failure: {err}");
        "Internal server error".to_string()
    };
    (status, Json(ErrorBody { message }))
}

// ============================================================================
// Player Routes
// ============================================================================

pub fn player_routes() -> Router<AppStateArc> {
    Router::new()
        .route("/v1/players", post(register_player))
        .route(
            "/v1/players/:player_id",
            get(get_player).delete(remove_player),
        )
        .route("/v1/players/:player_id/nickname", put(rename_player))
        .route("/v1/players/nickname/:nickname", get(get_player_by_nickname))
        .route("/v1/players/validate/:nickname", get(validate_nickname))
}

async fn register_player(
    State(state): State<AppStateArc>,
    Json(req): Json<RegisterPlayerRequest>,
) -> Result<(StatusCode, Json<Player>), ApiError> {
    let player = state
        .players
        .register(&req.player_id, &req.nickname)
        .await
        .map_err(error_response)?;
    Ok((StatusCode::CREATED, Json(player)))
}

async fn get_player(
    State(state): State<AppStateArc>,
    Path(player_id): Path<String>,
) -> ApiResult<Player> {
    let player = state.players.get(&player_id).await.map_err(error_response)?;
    Ok(Json(player))
}

async fn get_player_by_nickname(
    State(state): State<AppStateArc>,
    Path(nickname): Path<String>,
) -> ApiResult<Player> {
    let player = state
        .players
        .find_by_nickname(&nickname)
        .await
        .map_err(error_response)?;
    Ok(Json(player))
}

async fn validate_nickname(
    State(state): State<AppStateArc>,
    Path(nickname): Path<String>,
) -> ApiResult<NicknameAvailability> {
    let available = state
        .players
        .nickname_available(&nickname)
        .await
        .map_err(error_response)?;
    Ok(Json(NicknameAvailability { nickname, available }))
}

async fn rename_player(
    State(state): State<AppStateArc>,
    Path(player_id): Path<String>,
    Json(req): Json<RenamePlayerRequest>,
) -> ApiResult<MessageResponse> {
    state
        .players
        .rename(&player_id, &req.nickname)
        .await
        .map_err(error_response)?;
    Ok(Json(MessageResponse {
        message: "Nickname updated successfully".into(),
    }))
}

async fn remove_player(
    State(state): State<AppStateArc>,
    Path(player_id): Path<String>,
) -> ApiResult<MessageResponse> {
    state
        .players
        .remove(&player_id)
        .await
        .map_err(error_response)?;
    Ok(Json(MessageResponse {
        message: "Player deleted".into(),
    }))
}

// ============================================================================
// Battle Pass Routes
// ============================================================================

pub fn battle_pass_routes() -> Router<AppStateArc> {
    Router::new()
        .route("/v1/battlepass/:player_id", get(get_battle_pass))
        .route("/v1/battlepass/:player_id/experience", post(add_experience))
}

async fn get_battle_pass(
    State(state): State<AppStateArc>,
    Path(player_id): Path<String>,
) -> ApiResult<BattlePassView> {
    let view = state
        .battle_pass
        .get_battle_pass(&player_id)
        .await
        .map_err(error_response)?;
    Ok(Json(view))
}

async fn add_experience(
    State(state): State<AppStateArc>,
    Path(player_id): Path<String>,
    Json(req): Json<AddExperienceRequest>,
) -> ApiResult<BattlePassSummary> {
    let summary = state
        .battle_pass
        .add_experience(&player_id, req.experience)
        .await
        .map_err(error_response)?;
    Ok(Json(summary))
}

// ============================================================================
// Reward Routes
// ============================================================================

pub fn reward_routes() -> Router<AppStateArc> {
    Router::new()
        .route("/v1/rewards/grant", post(grant_reward))
        .route("/v1/rewards/claim", post(claim_reward))
        .route("/v1/rewards/:player_id", get(get_player_rewards))
        .route("/v1/rewards/:player_id/unclaimed", get(get_unclaimed_rewards))
}

async fn grant_reward(
    State(state): State<AppStateArc>,
    Json(req): Json<GrantRewardRequest>,
) -> Result<(StatusCode, Json<GrantedReward>), ApiError> {
    let granted = state
        .battle_pass
        .grant_reward(&req.player_id, req.level)
        .await
        .map_err(error_response)?;
    Ok((StatusCode::CREATED, Json(granted)))
}

async fn claim_reward(
    State(state): State<AppStateArc>,
    Json(req): Json<ClaimRewardRequest>,
) -> ApiResult<MessageResponse> {
    state
        .rewards
        .claim_reward(&req.player_id, req.level)
        .await
        .map_err(error_response)?;
    Ok(Json(MessageResponse {
        message: "Reward claimed successfully".into(),
    }))
}

async fn get_player_rewards(
    State(state): State<AppStateArc>,
    Path(player_id): Path<String>,
) -> ApiResult<Vec<GrantedReward>> {
    let rewards = state
        .rewards
        .get_player_rewards(&player_id)
        .await
        .map_err(error_response)?;
    Ok(Json(rewards))
}

async fn get_unclaimed_rewards(
    State(state): State<AppStateArc>,
    Path(player_id): Path<String>,
) -> ApiResult<Vec<GrantedReward>> {
    let rewards = state
        .rewards
        .get_unclaimed_rewards(&player_id)
        .await
        .map_err(error_response)?;
    Ok(Json(rewards))
}

// ============================================================================
// Catalog Routes (administrative)
// ============================================================================

pub fn catalog_routes() -> Router<AppStateArc> {
    Router::new()
        .route("/v1/catalog", get(list_catalog).post(create_reward))
        .route("/v1/catalog/:id", put(update_reward).delete(delete_reward))
}

async fn list_catalog(State(state): State<AppStateArc>) -> ApiResult<Vec<RewardDefinition>> {
    let definitions = state.catalog.list().await.map_err(error_response)?;
    Ok(Json(definitions))
}

async fn create_reward(
    State(state): State<AppStateArc>,
    Json(req): Json<CreateRewardRequest>,
) -> Result<(StatusCode, Json<RewardDefinition>), ApiError> {
    let definition = state
        .catalog
        .create(req.level, req.reward)
        .await
        .map_err(error_response)?;
    Ok((StatusCode::CREATED, Json(definition)))
}

async fn update_reward(
    State(state): State<AppStateArc>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateRewardRequest>,
) -> ApiResult<RewardDefinition> {
    let definition = state
        .catalog
        .update(id, req.reward)
        .await
        .map_err(error_response)?;
    Ok(Json(definition))
}

async fn delete_reward(
    State(state): State<AppStateArc>,
    Path(id): Path<i64>,
) -> ApiResult<MessageResponse> {
    state.catalog.remove(id).await.map_err(error_response)?;
    Ok(Json(MessageResponse {
        message: "Reward definition deleted".into(),
    }))
}

// ============================================================================
// Health Routes
// ============================================================================

pub fn health_routes() -> Router<AppStateArc> {
    Router::new().route("/health", get(health))
}

async fn health(State(state): State<AppStateArc>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
        version: env!("CARGO_PKG_VERSION").into(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}
