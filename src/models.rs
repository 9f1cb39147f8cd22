use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Closed category set. Fixed at creation; the only sanctioned change is the
/// one-time correction when an extension record is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Category {
    #[serde(rename = "Prebuilt PCs")]
    PrebuiltPcs,
    #[serde(rename = "Components")]
    Components,
    #[serde(rename = "Peripherals")]
    Peripherals,
    #[serde(rename = "Monitors")]
    Monitors,
    #[serde(rename = "Games")]
    Games,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::PrebuiltPcs => "Prebuilt PCs",
            Category::Components => "Components",
            Category::Peripherals => "Peripherals",
            Category::Monitors => "Monitors",
            Category::Games => "Games",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Prebuilt PCs" => Some(Category::PrebuiltPcs),
            "Components" => Some(Category::Components),
            "Peripherals" => Some(Category::Peripherals),
            "Monitors" => Some(Category::Monitors),
            "Games" => Some(Category::Games),
            _ => None,
        }
    }
}

/// Sale-readiness state. `Preorder` and `Discontinued` are set explicitly by
/// an operator; the other two are derived from stock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Availability {
    #[serde(rename = "In Stock")]
    InStock,
    #[serde(rename = "Out of Stock")]
    OutOfStock,
    #[serde(rename = "Preorder")]
    Preorder,
    #[serde(rename = "Discontinued")]
    Discontinued,
}

impl Availability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Availability::InStock => "In Stock",
            Availability::OutOfStock => "Out of Stock",
            Availability::Preorder => "Preorder",
            Availability::Discontinued => "Discontinued",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "In Stock" => Some(Availability::InStock),
            "Out of Stock" => Some(Availability::OutOfStock),
            "Preorder" => Some(Availability::Preorder),
            "Discontinued" => Some(Availability::Discontinued),
            _ => None,
        }
    }
}

/// One display attribute of a product, e.g. "Memory" -> "16GB".
/// Order within a product is preserved for display only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SpecEntry {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Ratings {
    pub average: f64,
    pub total_reviews: i32,
}

/// API-facing product. `final_price` and `availability` are derived fields
/// and never taken from a client.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub brand: String,
    pub category: Category,
    pub description: String,
    pub sku: String,
    pub specifications: Vec<SpecEntry>,
    pub images: Vec<String>,
    /// Cents.
    pub original_price: i64,
    pub discount_percent: f64,
    /// Cents; always `round2(original * (1 - discount/100))`.
    pub final_price: i64,
    pub stock: i32,
    pub availability: Availability,
    pub sales_count: i64,
    pub is_active: bool,
    pub is_featured: bool,
    pub ratings: Ratings,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Game extension record: domain attributes layered over a product, never
/// duplicating its pricing or stock fields.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Game {
    pub id: Uuid,
    pub product_id: Uuid,
    pub genre: String,
    pub platform: String,
    pub publisher: String,
    pub release_year: Option<i32>,
    pub created_at: DateTime<Utc>,
}

/// Prebuilt-PC extension record.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PrebuiltPc {
    pub id: Uuid,
    pub product_id: Uuid,
    pub cpu: String,
    pub gpu: String,
    pub ram_gb: i32,
    pub storage: String,
    pub form_factor: Option<String>,
    pub created_at: DateTime<Utc>,
}
