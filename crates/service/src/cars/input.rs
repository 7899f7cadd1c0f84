use models::carro::{normalize_image, parse_price, validate_image, validate_model, NewCar};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::ServiceError;

/// Raw write input as it arrives from a client, JSON or form-encoded.
/// `price` stays untyped until [`CarInput::validate`] coerces it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CarInput {
    #[serde(default, rename = "modelo", alias = "model")]
    pub model: Option<String>,
    #[serde(default, rename = "preco", alias = "price")]
    pub price: Option<Value>,
    #[serde(default)]
    pub image: Option<String>,
}

impl CarInput {
    pub fn new(model: impl Into<String>, price: impl Into<Value>) -> Self {
        Self { model: Some(model.into()), price: Some(price.into()), image: None }
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// Check the model, coerce the price, check the image width and drop empty image references.
    pub fn validate(self) -> Result<NewCar, ServiceError> {
        let model = require_model(self.model.as_deref())?.to_string();
        let price = coerce_price(self.price.as_ref())?;
        validate_image(self.image.as_deref())?;
        Ok(NewCar { model, price, image: normalize_image(self.image) })
    }
}

pub fn require_model(model: Option<&str>) -> Result<&str, ServiceError> {
    let model = model.ok_or_else(|| ServiceError::BadRequest("modelo is required".into()))?;
    validate_model(model)?;
    Ok(model)
}

/// Numbers pass through; strings are parsed. Anything else is a bad request.
pub fn coerce_price(raw: Option<&Value>) -> Result<Decimal, ServiceError> {
    match raw {
        None | Some(Value::Null) => Err(ServiceError::BadRequest("preco is required".into())),
        Some(Value::Number(n)) => Ok(parse_price(&n.to_string())?),
        Some(Value::String(s)) => Ok(parse_price(s)?),
        Some(other) => Err(ServiceError::BadRequest(format!("invalid preco `{other}`"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accepts_numbers_and_numeric_strings() {
        let a = CarInput::new("BMW", 350000).validate().unwrap();
        let b = CarInput::new("BMW", "350000").validate().unwrap();
        let c = CarInput::new("BMW", 350000.0).validate().unwrap();
        assert_eq!(a.price, Decimal::from(350_000));
        assert_eq!(a, b);
        assert_eq!(a, c);
    }

    #[test]
    fn missing_or_invalid_price_is_bad_request() {
        let missing = CarInput { model: Some("BMW".into()), ..Default::default() };
        assert!(missing.validate().unwrap_err().is_bad_request());
        for bad in [json!("abc"), json!(null), json!(true), json!([1]), json!("NaN")] {
            let input = CarInput { model: Some("BMW".into()), price: Some(bad.clone()), image: None };
            assert!(input.validate().unwrap_err().is_bad_request(), "{bad} accepted");
        }
    }

    #[test]
    fn missing_or_blank_model_is_bad_request() {
        assert!(CarInput { price: Some(json!(1)), ..Default::default() }.validate().unwrap_err().is_bad_request());
        assert!(CarInput::new("", 1).validate().unwrap_err().is_bad_request());
        assert!(CarInput::new("   ", 1).validate().unwrap_err().is_bad_request());
    }

    #[test]
    fn deserializes_either_naming() {
        let pt: CarInput = serde_json::from_value(json!({"modelo": "A", "preco": 1})).unwrap();
        let en: CarInput = serde_json::from_value(json!({"model": "A", "price": 1})).unwrap();
        assert_eq!(pt, en);
    }

    #[test]
    fn overlong_image_is_bad_request() {
        let long = "x".repeat(models::carro::MAX_IMAGE_LEN + 1);
        assert!(CarInput::new("A", 1).with_image(long).validate().unwrap_err().is_bad_request());
    }

    #[test]
    fn price_wider_than_the_column_is_bad_request() {
        for price in [json!("12345678901234567.89"), json!(1e15), json!(10_000_000_000u64)] {
            assert!(CarInput::new("A", price.clone()).validate().unwrap_err().is_bad_request(), "{price} accepted");
        }
        let max = CarInput::new("A", "9999999999.99").validate().unwrap();
        assert_eq!(max.price, "9999999999.99".parse::<Decimal>().unwrap());
    }

    #[test]
    fn empty_image_means_none() {
        let car = CarInput::new("A", 1).with_image("").validate().unwrap();
        assert_eq!(car.image, None);
    }
}
