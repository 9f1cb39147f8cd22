pub mod extensions;
pub mod products;
