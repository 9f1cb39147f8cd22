use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    error::AppError,
    models::{Availability, Category, Product, SpecEntry},
    rules,
};

const MAX_NAME_LEN: usize = 200;
const MAX_BRAND_LEN: usize = 100;
const MAX_DESCRIPTION_LEN: usize = 5000;
const MAX_SKU_LEN: usize = 64;

const IMAGE_EXTENSIONS: [&str; 6] = [".jpg", ".jpeg", ".png", ".webp", ".gif", ".avif"];

/// Note the absent fields: `final_price` is always derived, and `stock` after
/// creation only moves through the inventory endpoints.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateProductRequest {
    pub name: String,
    pub brand: String,
    pub category: Category,
    pub description: String,
    pub sku: String,
    #[serde(default)]
    pub specifications: Vec<SpecEntry>,
    pub images: Vec<String>,
    /// Cents.
    pub original_price: i64,
    pub discount_percent: Option<f64>,
    pub stock: i32,
    /// Accepted so upcoming titles can be created as `Preorder`; still
    /// normalized through the availability rule before insert.
    pub availability: Option<Availability>,
    pub is_active: Option<bool>,
    pub is_featured: Option<bool>,
}

impl CreateProductRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        validate_text("name", &self.name, MAX_NAME_LEN)?;
        validate_text("brand", &self.brand, MAX_BRAND_LEN)?;
        validate_text("description", &self.description, MAX_DESCRIPTION_LEN)?;
        validate_text("sku", &self.sku, MAX_SKU_LEN)?;
        validate_price(self.original_price)?;
        if let Some(pct) = self.discount_percent {
            validate_discount(pct)?;
        }
        validate_stock(self.stock)?;
        validate_images(&self.images)?;
        Ok(())
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub brand: Option<String>,
    pub description: Option<String>,
    pub specifications: Option<Vec<SpecEntry>>,
    pub images: Option<Vec<String>>,
    /// Cents.
    pub original_price: Option<i64>,
    pub discount_percent: Option<f64>,
    /// Explicit availability override (`Preorder`, `Discontinued`); the
    /// derived states are re-normalized against current stock.
    pub availability: Option<Availability>,
    pub is_active: Option<bool>,
    pub is_featured: Option<bool>,
    /// Administrative rating correction; rounded to one decimal on write.
    pub rating_average: Option<f64>,
    pub rating_total_reviews: Option<i32>,
}

impl UpdateProductRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if let Some(name) = &self.name {
            validate_text("name", name, MAX_NAME_LEN)?;
        }
        if let Some(brand) = &self.brand {
            validate_text("brand", brand, MAX_BRAND_LEN)?;
        }
        if let Some(description) = &self.description {
            validate_text("description", description, MAX_DESCRIPTION_LEN)?;
        }
        if let Some(price) = self.original_price {
            validate_price(price)?;
        }
        if let Some(pct) = self.discount_percent {
            validate_discount(pct)?;
        }
        if let Some(images) = &self.images {
            validate_images(images)?;
        }
        if let Some(avg) = self.rating_average {
            if !(0.0..=5.0).contains(&avg) {
                return Err(AppError::Validation(
                    "rating_average must be between 0 and 5".into(),
                ));
            }
        }
        if let Some(total) = self.rating_total_reviews {
            if total < 0 {
                return Err(AppError::Validation(
                    "rating_total_reviews must not be negative".into(),
                ));
            }
        }
        Ok(())
    }
}

#[derive(Serialize, ToSchema)]
pub struct ProductList {
    pub items: Vec<Product>,
}

fn validate_text(field: &str, value: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{field} must not be empty")));
    }
    if value.len() > max_len {
        return Err(AppError::Validation(format!(
            "{field} exceeds {max_len} characters"
        )));
    }
    Ok(())
}

fn validate_price(cents: i64) -> Result<(), AppError> {
    if cents < 0 {
        return Err(AppError::Validation(
            "original_price must not be negative".into(),
        ));
    }
    if cents > rules::MAX_PRICE_CENTS {
        return Err(AppError::Validation(format!(
            "original_price exceeds the maximum of {} cents",
            rules::MAX_PRICE_CENTS
        )));
    }
    Ok(())
}

fn validate_discount(pct: f64) -> Result<(), AppError> {
    if !(0.0..=rules::MAX_DISCOUNT_PERCENT).contains(&pct) {
        return Err(AppError::Validation(
            "discount_percent must be between 0 and 100".into(),
        ));
    }
    Ok(())
}

fn validate_stock(stock: i32) -> Result<(), AppError> {
    if stock < 0 {
        return Err(AppError::Validation("stock must not be negative".into()));
    }
    if stock > rules::MAX_STOCK {
        return Err(AppError::Validation(format!(
            "stock exceeds the maximum of {}",
            rules::MAX_STOCK
        )));
    }
    Ok(())
}

fn validate_images(images: &[String]) -> Result<(), AppError> {
    if images.is_empty() {
        return Err(AppError::Validation(
            "at least one image is required".into(),
        ));
    }
    for url in images {
        if !is_image_url(url) {
            return Err(AppError::Validation(format!("invalid image URL: {url}")));
        }
    }
    Ok(())
}

/// http(s) URL whose path ends in a known image extension. Query string and
/// fragment are ignored, matching the original storefront's validator.
fn is_image_url(url: &str) -> bool {
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return false;
    }
    let path = url.split(['?', '#']).next().unwrap_or(url).to_ascii_lowercase();
    IMAGE_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_create() -> CreateProductRequest {
        CreateProductRequest {
            name: "GeForce RTX 5080".into(),
            brand: "NVIDIA".into(),
            category: Category::Components,
            description: "16GB GDDR7 graphics card".into(),
            sku: "GPU-RTX5080".into(),
            specifications: vec![SpecEntry {
                key: "Memory".into(),
                value: "16GB".into(),
            }],
            images: vec!["https://cdn.example.com/rtx5080.jpg".into()],
            original_price: 119_999,
            discount_percent: Some(10.0),
            stock: 25,
            availability: None,
            is_active: None,
            is_featured: None,
        }
    }

    #[test]
    fn accepts_valid_create_request() {
        assert!(valid_create().validate().is_ok());
    }

    #[test]
    fn rejects_empty_images() {
        let mut req = valid_create();
        req.images = vec![];
        assert!(matches!(req.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn rejects_non_image_url() {
        let mut req = valid_create();
        req.images = vec!["https://cdn.example.com/manual.pdf".into()];
        assert!(matches!(req.validate(), Err(AppError::Validation(_))));

        req.images = vec!["ftp://cdn.example.com/rtx.png".into()];
        assert!(matches!(req.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn accepts_image_url_with_query_string() {
        let mut req = valid_create();
        req.images = vec!["https://cdn.example.com/rtx.PNG?w=800".into()];
        assert!(req.validate().is_ok());
    }

    #[test]
    fn rejects_out_of_range_discount() {
        let mut req = valid_create();
        req.discount_percent = Some(100.5);
        assert!(matches!(req.validate(), Err(AppError::Validation(_))));

        req.discount_percent = Some(-1.0);
        assert!(matches!(req.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn rejects_negative_price_and_stock() {
        let mut req = valid_create();
        req.original_price = -1;
        assert!(matches!(req.validate(), Err(AppError::Validation(_))));

        let mut req = valid_create();
        req.stock = -5;
        assert!(matches!(req.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn update_validates_rating_range() {
        let req = UpdateProductRequest {
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
            rating_average: Some(5.1),
            rating_total_reviews: None,
        };
        assert!(matches!(req.validate(), Err(AppError::Validation(_))));
    }
}
