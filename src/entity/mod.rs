pub mod games;
pub mod prebuilt_pcs;
pub mod products;

pub use games::Entity as Games;
pub use prebuilt_pcs::Entity as PrebuiltPcs;
pub use products::Entity as Products;
