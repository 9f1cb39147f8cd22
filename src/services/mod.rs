pub mod extension_service;
pub mod inventory_service;
pub mod product_service;
