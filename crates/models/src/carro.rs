use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::errors;

/// Width of the `modelo` column.
pub const MAX_MODEL_LEN: usize = 255;
/// Width of the `image` column.
pub const MAX_IMAGE_LEN: usize = 500;
/// Integer digits available in `DECIMAL(12,2)`.
const PRICE_INTEGER_DIGITS: u32 = 10;

/// Car record. Wire names (`modelo`, `preco`) follow the existing clients;
/// the English names are accepted on input.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "carro")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(column_name = "modelo", unique)]
    #[serde(rename = "modelo", alias = "model")]
    pub model: String,
    #[sea_orm(column_name = "preco", column_type = "Decimal(Some((12, 2)))")]
    #[serde(rename = "preco", alias = "price", with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// A validated record waiting for the store to assign its id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewCar {
    pub model: String,
    pub price: Decimal,
    pub image: Option<String>,
}

impl NewCar {
    pub fn into_car(self, id: i32) -> Model {
        Model { id, model: self.model, price: self.price, image: self.image }
    }
}

pub fn validate_model(model: &str) -> Result<(), errors::ModelError> {
    if model.trim().is_empty() {
        return Err(errors::ModelError::Validation("modelo is required".into()));
    }
    if model.chars().count() > MAX_MODEL_LEN {
        return Err(errors::ModelError::Validation(format!("modelo must be at most {MAX_MODEL_LEN} characters")));
    }
    Ok(())
}

/// Parse a price from its textual form. Accepts plain decimals and scientific
/// notation; `NaN`, infinities and anything non-numeric are rejected.
/// The result is rounded to cents and must fit `DECIMAL(12,2)`, so every
/// backend stores the same value.
pub fn parse_price(raw: &str) -> Result<Decimal, errors::ModelError> {
    let s = raw.trim();
    if s.is_empty() {
        return Err(errors::ModelError::Validation("preco is required".into()));
    }
    let price = Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .map_err(|_| errors::ModelError::Validation(format!("invalid preco `{raw}`")))?
        .round_dp(2);
    if price.abs() >= Decimal::from(10i64.pow(PRICE_INTEGER_DIGITS)) {
        return Err(errors::ModelError::Validation(format!(
            "preco `{raw}` out of range; at most {PRICE_INTEGER_DIGITS} integer digits"
        )));
    }
    Ok(price.normalize())
}

/// Empty image references mean "no image".
pub fn normalize_image(image: Option<String>) -> Option<String> {
    image.filter(|i| !i.trim().is_empty())
}

pub fn validate_image(image: Option<&str>) -> Result<(), errors::ModelError> {
    match image {
        Some(i) if i.chars().count() > MAX_IMAGE_LEN => Err(errors::ModelError::Validation(format!(
            "image must be at most {MAX_IMAGE_LEN} characters"
        ))),
        _ => Ok(()),
    }
}
