use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::{Expr, LockType};
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, SqlErr, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::products::{CreateProductRequest, ProductList, UpdateProductRequest},
    entity::products::{
        ActiveModel, Column, Entity as Products, ImageList, Model as ProductModel, SpecList,
    },
    error::{AppError, AppResult},
    models::{Availability, Category, Product, Ratings},
    response::{ApiResponse, Meta},
    routes::params::{ProductQuery, ProductSortBy, SortOrder},
    rules,
    state::AppState,
};

pub async fn list_products(
    state: &AppState,
    query: ProductQuery,
) -> AppResult<ApiResponse<ProductList>> {
    let (page, limit, offset) = query.pagination.normalize();
    let mut condition = Condition::all();

    if let Some(search) = query.q.as_ref().filter(|s| !s.is_empty()) {
        let pattern = format!("%{}%", search);
        condition = condition.add(
            Condition::any()
                .add(Expr::col(Column::Name).ilike(pattern.clone()))
                .add(Expr::col(Column::Brand).ilike(pattern.clone()))
                .add(Expr::col(Column::Description).ilike(pattern)),
        );
    }

    if let Some(category) = query.category {
        condition = condition.add(Column::Category.eq(category.as_str()));
    }

    if let Some(brand) = query.brand.as_ref().filter(|s| !s.is_empty()) {
        condition = condition.add(Column::Brand.eq(brand.clone()));
    }

    if let Some(availability) = query.availability {
        condition = condition.add(Column::Availability.eq(availability.as_str()));
    }

    if let Some(min_price) = query.min_price {
        condition = condition.add(Column::FinalPrice.gte(min_price));
    }

    if let Some(max_price) = query.max_price {
        condition = condition.add(Column::FinalPrice.lte(max_price));
    }

    if query.active_only.unwrap_or(false) {
        condition = condition.add(Column::IsActive.eq(true));
    }

    if query.featured_only.unwrap_or(false) {
        condition = condition.add(Column::IsFeatured.eq(true));
    }

    let sort_by = query.sort_by.unwrap_or(ProductSortBy::CreatedAt);
    let sort_order = query.sort_order.unwrap_or(SortOrder::Desc);
    let sort_col = match sort_by {
        ProductSortBy::CreatedAt => Column::CreatedAt,
        ProductSortBy::FinalPrice => Column::FinalPrice,
        ProductSortBy::Name => Column::Name,
        ProductSortBy::SalesCount => Column::SalesCount,
        ProductSortBy::Rating => Column::RatingAverage,
    };

    let mut finder = Products::find().filter(condition);
    finder = match sort_order {
        SortOrder::Asc => finder.order_by_asc(sort_col),
        SortOrder::Desc => finder.order_by_desc(sort_col),
    };

    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(product_from_entity)
        .collect::<AppResult<Vec<_>>>()?;

    let meta = Meta::new(page, limit, total);
    let data = ProductList { items };
    Ok(ApiResponse::success("Products", data, Some(meta)))
}

pub async fn get_product(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Product>> {
    let model = Products::find_by_id(id).one(&state.orm).await?;
    let model = match model {
        Some(p) => p,
        None => return Err(AppError::NotFound),
    };
    Ok(ApiResponse::success(
        "Product",
        product_from_entity(model)?,
        None,
    ))
}

pub async fn create_product(
    state: &AppState,
    payload: CreateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    payload.validate()?;

    let discount = payload.discount_percent.unwrap_or(0.0);
    let final_price = rules::derive_final_price(payload.original_price, discount);
    let availability = rules::derive_availability(
        payload.stock,
        payload.availability.unwrap_or(Availability::OutOfStock),
    );

    let id = Uuid::new_v4();
    let active = ActiveModel {
        id: Set(id),
        name: Set(payload.name),
        brand: Set(payload.brand),
        category: Set(payload.category.as_str().to_owned()),
        description: Set(payload.description),
        sku: Set(payload.sku),
        specifications: Set(SpecList(payload.specifications)),
        images: Set(ImageList(payload.images)),
        original_price: Set(payload.original_price),
        discount_percent: Set(discount),
        final_price: Set(final_price),
        stock: Set(payload.stock),
        availability: Set(availability.as_str().to_owned()),
        sales_count: Set(0),
        is_active: Set(payload.is_active.unwrap_or(true)),
        is_featured: Set(payload.is_featured.unwrap_or(false)),
        rating_average: Set(0.0),
        rating_total_reviews: Set(0),
        created_at: NotSet,
        updated_at: NotSet,
    };

    let product = match active.insert(&state.orm).await {
        Ok(p) => p,
        Err(err) => {
            if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
                return Err(AppError::Validation("sku already exists".into()));
            }
            return Err(err.into());
        }
    };

    if let Err(err) = log_audit(
        &state.pool,
        "product_create",
        Some("products"),
        Some(serde_json::json!({ "product_id": product.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Product created",
        product_from_entity(product)?,
        Some(Meta::empty()),
    ))
}

pub async fn update_product(
    state: &AppState,
    id: Uuid,
    payload: UpdateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    payload.validate()?;

    // Derivations read stock, so the read-modify-write must hold the row
    // lock; otherwise a concurrent stock mutation between read and write
    // could be overwritten with a stale availability.
    let txn = state.orm.begin().await?;
    let existing = Products::find_by_id(id)
        .lock(LockType::Update)
        .one(&txn)
        .await?;
    let existing = match existing {
        Some(p) => p,
        None => return Err(AppError::NotFound),
    };

    let current_availability = availability_of(&existing)?;
    let stock = existing.stock;
    let mut original_price = existing.original_price;
    let mut discount = existing.discount_percent;

    let mut active: ActiveModel = existing.into();
    if let Some(name) = payload.name {
        active.name = Set(name);
    }
    if let Some(brand) = payload.brand {
        active.brand = Set(brand);
    }
    if let Some(description) = payload.description {
        active.description = Set(description);
    }
    if let Some(specs) = payload.specifications {
        active.specifications = Set(SpecList(specs));
    }
    if let Some(images) = payload.images {
        active.images = Set(ImageList(images));
    }
    if let Some(price) = payload.original_price {
        original_price = price;
        active.original_price = Set(price);
    }
    if let Some(pct) = payload.discount_percent {
        discount = pct;
        active.discount_percent = Set(pct);
    }
    if let Some(flag) = payload.is_active {
        active.is_active = Set(flag);
    }
    if let Some(flag) = payload.is_featured {
        active.is_featured = Set(flag);
    }
    if let Some(avg) = payload.rating_average {
        active.rating_average = Set(rules::round_rating(avg));
    }
    if let Some(total) = payload.rating_total_reviews {
        active.rating_total_reviews = Set(total);
    }

    // Re-derive unconditionally; both rules are idempotent for unchanged
    // inputs. An explicit availability request is normalized against the
    // current stock so a stale "In Stock" cannot be forced at zero stock.
    active.final_price = Set(rules::derive_final_price(original_price, discount));
    let requested = payload.availability.unwrap_or(current_availability);
    active.availability = Set(rules::derive_availability(stock, requested).as_str().to_owned());
    active.updated_at = Set(Utc::now().into());

    let product = active.update(&txn).await?;
    txn.commit().await?;

    if let Err(err) = log_audit(
        &state.pool,
        "product_update",
        Some("products"),
        Some(serde_json::json!({ "product_id": product.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Updated",
        product_from_entity(product)?,
        Some(Meta::empty()),
    ))
}

pub async fn delete_product(state: &AppState, id: Uuid) -> AppResult<ApiResponse<serde_json::Value>> {
    let result = Products::delete_by_id(id).exec(&state.orm).await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    if let Err(err) = log_audit(
        &state.pool,
        "product_delete",
        Some("products"),
        Some(serde_json::json!({ "product_id": id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

pub(crate) fn availability_of(model: &ProductModel) -> AppResult<Availability> {
    Availability::parse(&model.availability).ok_or_else(|| {
        AppError::Internal(anyhow::anyhow!(
            "product {} has unknown availability {:?}",
            model.id,
            model.availability
        ))
    })
}

pub(crate) fn product_from_entity(model: ProductModel) -> AppResult<Product> {
    let category = Category::parse(&model.category).ok_or_else(|| {
        AppError::Internal(anyhow::anyhow!(
            "product {} has unknown category {:?}",
            model.id,
            model.category
        ))
    })?;
    let availability = availability_of(&model)?;

    Ok(Product {
        id: model.id,
        name: model.name,
        brand: model.brand,
        category,
        description: model.description,
        sku: model.sku,
        specifications: model.specifications.0,
        images: model.images.0,
        original_price: model.original_price,
        discount_percent: model.discount_percent,
        final_price: model.final_price,
        stock: model.stock,
        availability,
        sales_count: model.sales_count,
        is_active: model.is_active,
        is_featured: model.is_featured,
        ratings: Ratings {
            average: model.rating_average,
            total_reviews: model.rating_total_reviews,
        },
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    })
}
