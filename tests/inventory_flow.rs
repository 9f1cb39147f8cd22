use pcstore_api::{
    db::{create_orm_conn, create_pool, run_migrations},
    dto::extensions::{CreateGameRequest, CreatePrebuiltPcRequest},
    dto::products::{CreateProductRequest, UpdateProductRequest},
    error::AppError,
    models::{Availability, Category, Product, SpecEntry},
    routes::inventory::{SalesIncrementRequest, SetStockRequest, StockAdjustRequest},
    routes::params::{LowStockQuery, Pagination},
    services::{extension_service, inventory_service, product_service},
    state::AppState,
};
use sea_orm::{ConnectionTrait, Statement};
use uuid::Uuid;

// Integration flow over the service layer: derived pricing, the stock
// mutator, the sales counter, extension records, and the low-stock report.
#[tokio::test]
async fn pricing_stock_and_extension_flow() -> anyhow::Result<()> {
    // Allow skipping when no DB is configured in the environment.
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!(
                "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration flow tests."
            );
            return Ok(());
        }
    };

    let state = setup_state(&database_url).await?;

    // Create: final price and availability come out derived.
    let created = product_service::create_product(
        &state,
        create_request("GPU-FLOW-1", Category::Components, 100_00, Some(25.0), 5),
    )
    .await?;
    let product = created.data.unwrap();
    assert_eq!(product.final_price, 75_00);
    assert_eq!(product.availability, Availability::InStock);
    assert_eq!(product.sales_count, 0);

    // Round-trip: reading back shows the derived value, not anything else.
    let fetched = get(&state, product.id).await?;
    assert_eq!(fetched.final_price, 75_00);

    // Discount edit re-derives the final price.
    let updated = product_service::update_product(
        &state,
        product.id,
        UpdateProductRequest {
            discount_percent: Some(50.0),
            ..empty_update()
        },
    )
    .await?;
    assert_eq!(updated.data.unwrap().final_price, 50_00);

    // A decrement below zero fails and leaves the row untouched.
    let err = inventory_service::adjust_stock(
        &state,
        product.id,
        StockAdjustRequest { delta: -10 },
    )
    .await
    .unwrap_err();
    assert!(matches!(
        err,
        AppError::InsufficientStock {
            available: 5,
            requested: 10
        }
    ));
    assert_eq!(get(&state, product.id).await?.stock, 5);

    // The most negative representable delta must error cleanly, not overflow.
    let err = inventory_service::adjust_stock(
        &state,
        product.id,
        StockAdjustRequest { delta: i32::MIN },
    )
    .await
    .unwrap_err();
    assert!(matches!(
        err,
        AppError::InsufficientStock {
            available: 5,
            requested: 2_147_483_648
        }
    ));
    assert_eq!(get(&state, product.id).await?.stock, 5);

    // Setting stock to zero flips availability in the same write.
    let zeroed = inventory_service::set_stock(&state, product.id, SetStockRequest { stock: 0 })
        .await?
        .data
        .unwrap();
    assert_eq!(zeroed.stock, 0);
    assert_eq!(zeroed.availability, Availability::OutOfStock);

    // Preorder is sticky at zero stock...
    let preorder = product_service::update_product(
        &state,
        product.id,
        UpdateProductRequest {
            availability: Some(Availability::Preorder),
            ..empty_update()
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(preorder.availability, Availability::Preorder);

    // ...and cleared once stock arrives.
    let restocked = inventory_service::adjust_stock(
        &state,
        product.id,
        StockAdjustRequest { delta: 3 },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(restocked.stock, 3);
    assert_eq!(restocked.availability, Availability::InStock);

    // Sales counter accumulates exactly.
    inventory_service::increment_sales(
        &state,
        product.id,
        SalesIncrementRequest { quantity: 3 },
    )
    .await?;
    let after_sales = inventory_service::increment_sales(
        &state,
        product.id,
        SalesIncrementRequest { quantity: 2 },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(after_sales.sales_count, 5);

    // Purchase path: stock down, sales up.
    let purchased = inventory_service::record_sale(
        &state,
        product.id,
        SalesIncrementRequest { quantity: 2 },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(purchased.stock, 1);
    assert_eq!(purchased.sales_count, 7);

    // Two concurrent unit decrements against stock=1: exactly one wins.
    let (a, b) = tokio::join!(
        spawn_adjust(state.clone(), product.id, -1),
        spawn_adjust(state.clone(), product.id, -1),
    );
    let results = [a?, b?];
    let successes = results.iter().filter(|r| r.is_ok()).count();
    let conflicts = results
        .iter()
        .filter(|r| matches!(r, Err(AppError::InsufficientStock { .. })))
        .count();
    assert_eq!(successes, 1, "exactly one decrement must succeed");
    assert_eq!(conflicts, 1, "the other must fail with InsufficientStock");
    assert_eq!(get(&state, product.id).await?.stock, 0);

    // Attaching a game record corrects the category once.
    let game = extension_service::create_game(
        &state,
        CreateGameRequest {
            product_id: product.id,
            genre: "RPG".into(),
            platform: "PC".into(),
            publisher: "Nightfall Studios".into(),
            release_year: Some(2026),
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(game.product_id, product.id);
    assert_eq!(get(&state, product.id).await?.category, Category::Games);

    // A second extension of the same kind is rejected.
    let dup = extension_service::create_game(
        &state,
        CreateGameRequest {
            product_id: product.id,
            genre: "RPG".into(),
            platform: "PC".into(),
            publisher: "Nightfall Studios".into(),
            release_year: Some(2026),
        },
    )
    .await;
    assert!(matches!(dup, Err(AppError::BadRequest(_))));

    // Prebuilt PC extension against a second product.
    let desktop = product_service::create_product(
        &state,
        create_request("PC-FLOW-1", Category::Components, 2000_00, None, 4),
    )
    .await?
    .data
    .unwrap();
    extension_service::create_prebuilt_pc(
        &state,
        CreatePrebuiltPcRequest {
            product_id: desktop.id,
            cpu: "Ryzen 7 9800X3D".into(),
            gpu: "RTX 5070".into(),
            ram_gb: 32,
            storage: "1TB NVMe".into(),
            form_factor: None,
        },
    )
    .await?;
    assert_eq!(get(&state, desktop.id).await?.category, Category::PrebuiltPcs);

    // A field edit racing a restock must never publish a stale availability:
    // whichever write commits second still sees the other's stock under the
    // row lock.
    let widget = product_service::create_product(
        &state,
        create_request("GPU-FLOW-2", Category::Components, 10_00, None, 0),
    )
    .await?
    .data
    .unwrap();
    assert_eq!(widget.availability, Availability::OutOfStock);

    let update_state = state.clone();
    let adjust_state = state.clone();
    let widget_id = widget.id;
    let update_task = tokio::spawn(async move {
        product_service::update_product(
            &update_state,
            widget_id,
            UpdateProductRequest {
                name: Some("Renamed widget".into()),
                ..empty_update()
            },
        )
        .await
        .map(|_| ())
    });
    let adjust_task = tokio::spawn(async move {
        inventory_service::adjust_stock(
            &adjust_state,
            widget_id,
            StockAdjustRequest { delta: 5 },
        )
        .await
        .map(|_| ())
    });
    let (update_done, adjust_done) = tokio::join!(update_task, adjust_task);
    update_done??;
    adjust_done??;
    let raced = get(&state, widget_id).await?;
    assert_eq!(raced.stock, 5);
    assert_eq!(raced.availability, Availability::InStock);
    assert_eq!(raced.name, "Renamed widget");

    // Both products sit at or below the low-stock threshold by now.
    let low = inventory_service::list_low_stock(
        &state,
        LowStockQuery {
            pagination: Pagination {
                page: Some(1),
                per_page: Some(20),
            },
            threshold: Some(5),
        },
    )
    .await?
    .data
    .unwrap();
    assert!(low.items.iter().any(|p| p.id == product.id));
    assert!(low.items.iter().any(|p| p.id == desktop.id));

    Ok(())
}

async fn setup_state(database_url: &str) -> anyhow::Result<AppState> {
    let pool = create_pool(database_url).await?;
    let orm = create_orm_conn(database_url).await?;
    run_migrations(&orm).await?;

    // Clean tables between runs
    let backend = orm.get_database_backend();
    orm.execute(Statement::from_string(
        backend,
        "TRUNCATE TABLE games, prebuilt_pcs, audit_logs, products RESTART IDENTITY CASCADE",
    ))
    .await?;

    Ok(AppState::new(pool, orm))
}

fn create_request(
    sku: &str,
    category: Category,
    original_price: i64,
    discount_percent: Option<f64>,
    stock: i32,
) -> CreateProductRequest {
    CreateProductRequest {
        name: format!("Test product {sku}"),
        brand: "TestBrand".into(),
        category,
        description: "A product for testing".into(),
        sku: sku.into(),
        specifications: vec![SpecEntry {
            key: "Memory".into(),
            value: "16GB".into(),
        }],
        images: vec!["https://cdn.example.com/test.jpg".into()],
        original_price,
        discount_percent,
        stock,
        availability: None,
        is_active: None,
        is_featured: None,
    }
}

fn empty_update() -> UpdateProductRequest {
    UpdateProductRequest {
        name: None,
        brand: None,
        description: None,
        specifications: None,
        images: None,
        original_price: None,
        discount_percent: None,
        availability: None,
        is_active: None,
        is_featured: None,
        rating_average: None,
        rating_total_reviews: None,
    }
}

async fn get(state: &AppState, id: Uuid) -> anyhow::Result<Product> {
    Ok(product_service::get_product(state, id)
        .await?
        .data
        .expect("product data"))
}

fn spawn_adjust(
    state: AppState,
    id: Uuid,
    delta: i32,
) -> tokio::task::JoinHandle<Result<(), AppError>> {
    tokio::spawn(async move {
        inventory_service::adjust_stock(&state, id, StockAdjustRequest { delta })
            .await
            .map(|_| ())
    })
}
