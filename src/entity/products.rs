use sea_orm::FromJsonQueryResult;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::models::SpecEntry;

/// Ordered specification entries, stored as one jsonb column so the product
/// row stays a single document for transaction purposes.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct SpecList(pub Vec<SpecEntry>);

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct ImageList(pub Vec<String>);

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub brand: String,
    /// See `models::Category` for the closed value set.
    pub category: String,
    pub description: String,
    #[sea_orm(unique)]
    pub sku: String,
    #[sea_orm(column_type = "JsonBinary")]
    pub specifications: SpecList,
    #[sea_orm(column_type = "JsonBinary")]
    pub images: ImageList,
    pub original_price: i64,
    pub discount_percent: f64,
    /// Derived; only ever written together with its inputs.
    pub final_price: i64,
    pub stock: i32,
    /// See `models::Availability`; only ever written together with `stock`.
    pub availability: String,
    pub sales_count: i64,
    pub is_active: bool,
    pub is_featured: bool,
    pub rating_average: f64,
    pub rating_total_reviews: i32,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::games::Entity")]
    Games,
    #[sea_orm(has_many = "super::prebuilt_pcs::Entity")]
    PrebuiltPcs,
}

impl Related<super::games::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Games.def()
    }
}

impl Related<super::prebuilt_pcs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PrebuiltPcs.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
