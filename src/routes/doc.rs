use utoipa::OpenApi;
use utoipa::openapi::OpenApi as OpenApiSpec;
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        extensions::{GameList, PrebuiltPcList},
        products,
    },
    models::{Availability, Category, Game, PrebuiltPc, Product, Ratings, SpecEntry},
    response::{ApiResponse, Meta},
    routes::{extensions, health, inventory, params, products as product_routes},
};

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        product_routes::list_products,
        product_routes::create_product,
        product_routes::get_product,
        product_routes::update_product,
        product_routes::delete_product,
        inventory::adjust_stock,
        inventory::set_stock,
        inventory::increment_sales,
        inventory::record_sale,
        inventory::list_low_stock,
        extensions::create_game,
        extensions::list_games,
        extensions::get_game,
        extensions::create_prebuilt_pc,
        extensions::list_prebuilt_pcs,
        extensions::get_prebuilt_pc,
    ),
    components(
        schemas(
            Product,
            Game,
            PrebuiltPc,
            Category,
            Availability,
            SpecEntry,
            Ratings,
            products::CreateProductRequest,
            products::UpdateProductRequest,
            products::ProductList,
            inventory::StockAdjustRequest,
            inventory::SetStockRequest,
            inventory::SalesIncrementRequest,
            GameList,
            PrebuiltPcList,
            params::Pagination,
            params::ProductQuery,
            params::LowStockQuery,
            Meta,
            ApiResponse<Product>,
            ApiResponse<products::ProductList>,
            ApiResponse<Game>,
            ApiResponse<PrebuiltPc>,
            ApiResponse<GameList>,
            ApiResponse<PrebuiltPcList>
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Products", description = "Product catalog endpoints"),
        (name = "Inventory", description = "Stock and sales endpoints"),
        (name = "Extensions", description = "Game and prebuilt PC extension records"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
