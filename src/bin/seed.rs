use pcstore_api::{
    config::AppConfig,
    db::create_pool,
    models::Availability,
    rules,
};
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    // Ensure migrations are applied.
    sqlx::migrate!("./migrations").run(&pool).await?;

    seed_products(&pool).await?;

    println!("Seed completed");
    Ok(())
}

struct SeedProduct {
    name: &'static str,
    brand: &'static str,
    category: &'static str,
    description: &'static str,
    sku: &'static str,
    specs: serde_json::Value,
    images: serde_json::Value,
    original_price: i64,
    discount_percent: f64,
    stock: i32,
}

async fn seed_products(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    let products = vec![
        SeedProduct {
            name: "Vortex X1 Gaming Desktop",
            brand: "Vortex",
            category: "Prebuilt PCs",
            description: "Ryzen 9 / RTX 5080 mid-tower ready for 4K gaming",
            sku: "PC-VORTEX-X1",
            specs: serde_json::json!([
                { "key": "CPU", "value": "Ryzen 9 9950X" },
                { "key": "GPU", "value": "RTX 5080 16GB" },
                { "key": "Memory", "value": "32GB DDR5" }
            ]),
            images: serde_json::json!(["https://cdn.example.com/vortex-x1.jpg"]),
            original_price: 2499_99,
            discount_percent: 10.0,
            stock: 12,
        },
        SeedProduct {
            name: "GeForce RTX 5070 Ti",
            brand: "NVIDIA",
            category: "Components",
            description: "12GB GDDR7 graphics card",
            sku: "GPU-RTX5070TI",
            specs: serde_json::json!([{ "key": "Memory", "value": "12GB GDDR7" }]),
            images: serde_json::json!(["https://cdn.example.com/rtx5070ti.png"]),
            original_price: 799_99,
            discount_percent: 0.0,
            stock: 40,
        },
        SeedProduct {
            name: "Cyber Odyssey 2078",
            brand: "Nightfall Studios",
            category: "Games",
            description: "Open-world RPG, PC digital key",
            sku: "GAME-CYBER2078",
            specs: serde_json::json!([{ "key": "Platform", "value": "PC" }]),
            images: serde_json::json!(["https://cdn.example.com/cyber2078.webp"]),
            original_price: 59_99,
            discount_percent: 25.0,
            stock: 0,
        },
    ];

    for p in products {
        // Derivations go through the same rules the service layer uses.
        let final_price = rules::derive_final_price(p.original_price, p.discount_percent);
        let availability = rules::derive_availability(p.stock, Availability::OutOfStock);

        sqlx::query(
            r#"
            INSERT INTO products (
                id, name, brand, category, description, sku,
                specifications, images,
                original_price, discount_percent, final_price,
                stock, availability
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            ON CONFLICT (sku) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(p.name)
        .bind(p.brand)
        .bind(p.category)
        .bind(p.description)
        .bind(p.sku)
        .bind(p.specs)
        .bind(p.images)
        .bind(p.original_price)
        .bind(p.discount_percent)
        .bind(final_price)
        .bind(p.stock)
        .bind(availability.as_str())
        .execute(pool)
        .await?;
    }

    println!("Seeded products");
    Ok(())
}
