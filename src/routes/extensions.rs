use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    dto::extensions::{CreateGameRequest, CreatePrebuiltPcRequest, GameList, PrebuiltPcList},
    error::AppResult,
    models::{Game, PrebuiltPc},
    response::ApiResponse,
    routes::params::Pagination,
    services::extension_service,
    state::AppState,
};

pub fn games_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_game))
        .route("/", get(list_games))
        .route("/{id}", get(get_game))
}

pub fn pcs_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_prebuilt_pc))
        .route("/", get(list_prebuilt_pcs))
        .route("/{id}", get(get_prebuilt_pc))
}

#[utoipa::path(
    post,
    path = "/api/games",
    request_body = CreateGameRequest,
    responses(
        (status = 200, description = "Create game record", body = ApiResponse<Game>),
        (status = 400, description = "Validation failed or duplicate record"),
        (status = 404, description = "Referenced product not found"),
    ),
    tag = "Extensions"
)]
pub async fn create_game(
    State(state): State<AppState>,
    Json(payload): Json<CreateGameRequest>,
) -> AppResult<Json<ApiResponse<Game>>> {
    let resp = extension_service::create_game(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/games",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
    ),
    responses(
        (status = 200, description = "List games", body = ApiResponse<GameList>),
    ),
    tag = "Extensions"
)]
pub async fn list_games(
    State(state): State<AppState>,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<ApiResponse<GameList>>> {
    let resp = extension_service::list_games(&state, pagination).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/games/{id}",
    params(
        ("id" = Uuid, Path, description = "Game ID")
    ),
    responses(
        (status = 200, description = "Get game record", body = ApiResponse<Game>),
        (status = 404, description = "Not Found"),
    ),
    tag = "Extensions"
)]
pub async fn get_game(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Game>>> {
    let resp = extension_service::get_game(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/pcs",
    request_body = CreatePrebuiltPcRequest,
    responses(
        (status = 200, description = "Create prebuilt PC record", body = ApiResponse<PrebuiltPc>),
        (status = 400, description = "Validation failed or duplicate record"),
        (status = 404, description = "Referenced product not found"),
    ),
    tag = "Extensions"
)]
pub async fn create_prebuilt_pc(
    State(state): State<AppState>,
    Json(payload): Json<CreatePrebuiltPcRequest>,
) -> AppResult<Json<ApiResponse<PrebuiltPc>>> {
    let resp = extension_service::create_prebuilt_pc(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/pcs",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
    ),
    responses(
        (status = 200, description = "List prebuilt PCs", body = ApiResponse<PrebuiltPcList>),
    ),
    tag = "Extensions"
)]
pub async fn list_prebuilt_pcs(
    State(state): State<AppState>,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<ApiResponse<PrebuiltPcList>>> {
    let resp = extension_service::list_prebuilt_pcs(&state, pagination).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/pcs/{id}",
    params(
        ("id" = Uuid, Path, description = "Prebuilt PC ID")
    ),
    responses(
        (status = 200, description = "Get prebuilt PC record", body = ApiResponse<PrebuiltPc>),
        (status = 404, description = "Not Found"),
    ),
    tag = "Extensions"
)]
pub async fn get_prebuilt_pc(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<PrebuiltPc>>> {
    let resp = extension_service::get_prebuilt_pc(&state, id).await?;
    Ok(Json(resp))
}
