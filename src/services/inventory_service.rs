use chrono::Utc;
use sea_orm::sea_query::LockType;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseTransaction, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::products::ProductList,
    entity::products::{ActiveModel, Column, Entity as Products, Model as ProductModel},
    error::{AppError, AppResult},
    models::Product,
    response::{ApiResponse, Meta},
    routes::inventory::{SalesIncrementRequest, SetStockRequest, StockAdjustRequest},
    routes::params::LowStockQuery,
    rules,
    services::product_service::{availability_of, product_from_entity},
    state::AppState,
};

/// Signed stock adjustment. The stock change and the re-derived availability
/// commit as one transaction; concurrent callers serialize on the row lock.
pub async fn adjust_stock(
    state: &AppState,
    id: Uuid,
    payload: StockAdjustRequest,
) -> AppResult<ApiResponse<Product>> {
    if payload.delta == 0 {
        return Err(AppError::Validation("delta must not be 0".into()));
    }

    let txn = state.orm.begin().await?;
    let product = lock_product(&txn, id).await?;

    // Widen before negating: delta = i32::MIN must not overflow.
    let delta = i64::from(payload.delta);
    let new_stock = i64::from(product.stock) + delta;
    if new_stock < 0 {
        return Err(AppError::InsufficientStock {
            available: i64::from(product.stock),
            requested: -delta,
        });
    }
    if new_stock > i64::from(rules::MAX_STOCK) {
        return Err(AppError::Validation(format!(
            "stock exceeds the maximum of {}",
            rules::MAX_STOCK
        )));
    }

    let updated = write_stock(txn, product, new_stock as i32).await?;

    if let Err(err) = log_audit(
        &state.pool,
        "stock_adjust",
        Some("products"),
        Some(serde_json::json!({ "product_id": id, "delta": payload.delta })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Stock adjusted",
        product_from_entity(updated)?,
        Some(Meta::empty()),
    ))
}

/// Absolute stock set, same transaction discipline as `adjust_stock`.
pub async fn set_stock(
    state: &AppState,
    id: Uuid,
    payload: SetStockRequest,
) -> AppResult<ApiResponse<Product>> {
    if payload.stock < 0 {
        return Err(AppError::Validation("stock must not be negative".into()));
    }
    if payload.stock > rules::MAX_STOCK {
        return Err(AppError::Validation(format!(
            "stock exceeds the maximum of {}",
            rules::MAX_STOCK
        )));
    }

    let txn = state.orm.begin().await?;
    let product = lock_product(&txn, id).await?;
    let updated = write_stock(txn, product, payload.stock).await?;

    if let Err(err) = log_audit(
        &state.pool,
        "stock_set",
        Some("products"),
        Some(serde_json::json!({ "product_id": id, "stock": payload.stock })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Stock set",
        product_from_entity(updated)?,
        Some(Meta::empty()),
    ))
}

/// Add to the running units-sold counter, in its own transaction.
pub async fn increment_sales(
    state: &AppState,
    id: Uuid,
    payload: SalesIncrementRequest,
) -> AppResult<ApiResponse<Product>> {
    if payload.quantity < 1 {
        return Err(AppError::Validation("quantity must be at least 1".into()));
    }

    let txn = state.orm.begin().await?;
    let product = lock_product(&txn, id).await?;

    let new_count = product.sales_count + i64::from(payload.quantity);
    let mut active: ActiveModel = product.into();
    active.sales_count = Set(new_count);
    active.updated_at = Set(Utc::now().into());
    let updated = active.update(&txn).await?;
    txn.commit().await?;

    if let Err(err) = log_audit(
        &state.pool,
        "sales_increment",
        Some("products"),
        Some(serde_json::json!({ "product_id": id, "quantity": payload.quantity })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Sales recorded",
        product_from_entity(updated)?,
        Some(Meta::empty()),
    ))
}

/// Order-placement shim: decrement stock, then bump the sales counter.
///
/// These are two separate transactions, mirroring the original storefront.
/// A crash between them leaves stock decremented without the matching sales
/// increment; callers that need exactly-once accounting must reconcile.
pub async fn record_sale(
    state: &AppState,
    id: Uuid,
    payload: SalesIncrementRequest,
) -> AppResult<ApiResponse<Product>> {
    if payload.quantity < 1 {
        return Err(AppError::Validation("quantity must be at least 1".into()));
    }

    adjust_stock(
        state,
        id,
        StockAdjustRequest {
            delta: -payload.quantity,
        },
    )
    .await?;

    increment_sales(state, id, payload).await
}

pub async fn list_low_stock(
    state: &AppState,
    query: LowStockQuery,
) -> AppResult<ApiResponse<ProductList>> {
    let threshold = query.threshold.unwrap_or(5);
    let (page, limit, offset) = query.pagination.normalize();

    let finder = Products::find()
        .filter(Column::Stock.lte(threshold))
        .order_by_asc(Column::Stock)
        .order_by_desc(Column::CreatedAt);

    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(product_from_entity)
        .collect::<AppResult<Vec<_>>>()?;

    let data = ProductList { items };
    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success("Low stock", data, Some(meta)))
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

/// Persist a new stock value together with the re-derived availability and
/// commit. Called with the row already locked; returning early on error
/// drops the transaction and rolls everything back.
async fn write_stock(
    txn: DatabaseTransaction,
    product: ProductModel,
    new_stock: i32,
) -> AppResult<ProductModel> {
    let current = availability_of(&product)?;
    let next = rules::derive_availability(new_stock, current);

    let mut active: ActiveModel = product.into();
    active.stock = Set(new_stock);
    active.availability = Set(next.as_str().to_owned());
    active.updated_at = Set(Utc::now().into());
    let updated = active.update(&txn).await?;
    txn.commit().await?;
    Ok(updated)
}
