use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    error::AppError,
    models::{Game, PrebuiltPc},
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateGameRequest {
    pub product_id: Uuid,
    pub genre: String,
    pub platform: String,
    pub publisher: String,
    pub release_year: Option<i32>,
}

impl CreateGameRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        require("genre", &self.genre)?;
        require("platform", &self.platform)?;
        require("publisher", &self.publisher)?;
        if let Some(year) = self.release_year {
            if !(1970..=2100).contains(&year) {
                return Err(AppError::Validation(
                    "release_year must be between 1970 and 2100".into(),
                ));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreatePrebuiltPcRequest {
    pub product_id: Uuid,
    pub cpu: String,
    pub gpu: String,
    pub ram_gb: i32,
    pub storage: String,
    pub form_factor: Option<String>,
}

impl CreatePrebuiltPcRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        require("cpu", &self.cpu)?;
        require("gpu", &self.gpu)?;
        require("storage", &self.storage)?;
        if !(1..=2048).contains(&self.ram_gb) {
            return Err(AppError::Validation(
                "ram_gb must be between 1 and 2048".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Serialize, ToSchema)]
pub struct GameList {
    pub items: Vec<Game>,
}

#[derive(Serialize, ToSchema)]
pub struct PrebuiltPcList {
    pub items: Vec<PrebuiltPc>,
}

fn require(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{field} must not be empty")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn game_request_requires_genre() {
        let req = CreateGameRequest {
            product_id: Uuid::new_v4(),
            genre: "  ".into(),
            platform: "PC".into(),
            publisher: "CD Projekt".into(),
            release_year: Some(2020),
        };
        assert!(matches!(req.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn pc_request_bounds_ram() {
        let req = CreatePrebuiltPcRequest {
            product_id: Uuid::new_v4(),
            cpu: "Ryzen 9 9950X".into(),
            gpu: "RTX 5090".into(),
            ram_gb: 0,
            storage: "2TB NVMe".into(),
            form_factor: None,
        };
        assert!(matches!(req.validate(), Err(AppError::Validation(_))));
    }
}
