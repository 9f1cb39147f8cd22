use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::LockType;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseTransaction, EntityTrait, PaginatorTrait, QueryFilter,
    QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::extensions::{CreateGameRequest, CreatePrebuiltPcRequest, GameList, PrebuiltPcList},
    entity::{
        games::{ActiveModel as GameActive, Column as GameCol, Entity as Games, Model as GameModel},
        prebuilt_pcs::{
            ActiveModel as PcActive, Column as PcCol, Entity as PrebuiltPcs, Model as PcModel,
        },
        products::{ActiveModel as ProductActive, Entity as Products, Model as ProductModel},
    },
    error::{AppError, AppResult},
    models::{Category, Game, PrebuiltPc},
    response::{ApiResponse, Meta},
    routes::params::Pagination,
    state::AppState,
};

/// Attach a game record to an existing product. The category correction and
/// the extension insert commit together; a product carries at most one
/// extension of each kind.
pub async fn create_game(
    state: &AppState,
    payload: CreateGameRequest,
) -> AppResult<ApiResponse<Game>> {
    payload.validate()?;

    let txn = state.orm.begin().await?;
    let product = lock_product(&txn, payload.product_id).await?;

    let existing = Games::find()
        .filter(GameCol::ProductId.eq(payload.product_id))
        .count(&txn)
        .await?;
    if existing > 0 {
        return Err(AppError::BadRequest(
            "product already has a game record".into(),
        ));
    }

    ensure_category(&txn, product, Category::Games).await?;

    let game = GameActive {
        id: Set(Uuid::new_v4()),
        product_id: Set(payload.product_id),
        genre: Set(payload.genre),
        platform: Set(payload.platform),
        publisher: Set(payload.publisher),
        release_year: Set(payload.release_year),
        created_at: NotSet,
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;

    if let Err(err) = log_audit(
        &state.pool,
        "game_create",
        Some("games"),
        Some(serde_json::json!({ "game_id": game.id, "product_id": game.product_id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Game created",
        game_from_entity(game),
        Some(Meta::empty()),
    ))
}

pub async fn get_game(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Game>> {
    let game = Games::find_by_id(id).one(&state.orm).await?;
    match game {
        Some(g) => Ok(ApiResponse::success("Game", game_from_entity(g), None)),
        None => Err(AppError::NotFound),
    }
}

pub async fn list_games(
    state: &AppState,
    pagination: Pagination,
) -> AppResult<ApiResponse<GameList>> {
    let (page, limit, offset) = pagination.normalize();

    let finder = Games::find();
    let total = finder.clone().count(&state.orm).await? as i64;
    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(game_from_entity)
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success("Games", GameList { items }, Some(meta)))
}

/// Attach a prebuilt-PC record to an existing product.
pub async fn create_prebuilt_pc(
    state: &AppState,
    payload: CreatePrebuiltPcRequest,
) -> AppResult<ApiResponse<PrebuiltPc>> {
    payload.validate()?;

    let txn = state.orm.begin().await?;
    let product = lock_product(&txn, payload.product_id).await?;

    let existing = PrebuiltPcs::find()
        .filter(PcCol::ProductId.eq(payload.product_id))
        .count(&txn)
        .await?;
    if existing > 0 {
        return Err(AppError::BadRequest(
            "product already has a prebuilt PC record".into(),
        ));
    }

    ensure_category(&txn, product, Category::PrebuiltPcs).await?;

    let pc = PcActive {
        id: Set(Uuid::new_v4()),
        product_id: Set(payload.product_id),
        cpu: Set(payload.cpu),
        gpu: Set(payload.gpu),
        ram_gb: Set(payload.ram_gb),
        storage: Set(payload.storage),
        form_factor: Set(payload.form_factor),
        created_at: NotSet,
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;

    if let Err(err) = log_audit(
        &state.pool,
        "prebuilt_pc_create",
        Some("prebuilt_pcs"),
        Some(serde_json::json!({ "pc_id": pc.id, "product_id": pc.product_id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Prebuilt PC created",
        pc_from_entity(pc),
        Some(Meta::empty()),
    ))
}

pub async fn get_prebuilt_pc(state: &AppState, id: Uuid) -> AppResult<ApiResponse<PrebuiltPc>> {
    let pc = PrebuiltPcs::find_by_id(id).one(&state.orm).await?;
    match pc {
        Some(p) => Ok(ApiResponse::success("Prebuilt PC", pc_from_entity(p), None)),
        None => Err(AppError::NotFound),
    }
}

pub async fn list_prebuilt_pcs(
    state: &AppState,
    pagination: Pagination,
) -> AppResult<ApiResponse<PrebuiltPcList>> {
    let (page, limit, offset) = pagination.normalize();

    let finder = PrebuiltPcs::find();
    let total = finder.clone().count(&state.orm).await? as i64;
    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(pc_from_entity)
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success(
        "Prebuilt PCs",
        PrebuiltPcList { items },
        Some(meta),
    ))
}

/// One-time category correction at extension-creation time. A no-op when the
/// product already carries the expected category.
async fn ensure_category(
    txn: &DatabaseTransaction,
    product: ProductModel,
    expected: Category,
) -> AppResult<()> {
    if product.category == expected.as_str() {
        return Ok(());
    }

    tracing::info!(
        product_id = %product.id,
        from = %product.category,
        to = %expected.as_str(),
        "correcting product category for extension record"
    );

    let mut active: ProductActive = product.into();
    active.category = Set(expected.as_str().to_owned());
    active.updated_at = Set(Utc::now().into());
    active.update(txn).await?;
    Ok(())
}

async fn lock_product(txn: &DatabaseTransaction, id: Uuid) -> AppResult<ProductModel> {
    let product = Products::find_by_id(id)
        .lock(LockType::Update)
        .one(txn)
        .await?;
    match product {
        Some(p) => Ok(p),
        None => Err(AppError::NotFound),
    }
}

fn game_from_entity(model: GameModel) -> Game {
    Game {
        id: model.id,
        product_id: model.product_id,
        genre: model.genre,
        platform: model.platform,
        publisher: model.publisher,
        release_year: model.release_year,
        created_at: model.created_at.with_timezone(&Utc),
    }
}

fn pc_from_entity(model: PcModel) -> PrebuiltPc {
    PrebuiltPc {
        id: model.id,
        product_id: model.product_id,
        cpu: model.cpu,
        gpu: model.gpu,
        ram_gb: model.ram_gb,
        storage: model.storage,
        form_factor: model.form_factor,
        created_at: model.created_at.with_timezone(&Utc),
    }
}
