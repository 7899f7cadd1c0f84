use std::sync::Arc;

use models::Car;
use rust_decimal::Decimal;
use tracing::{info, instrument};

use crate::cars::input::{require_model, CarInput};
use crate::cars::store::CarStore;
use crate::errors::ServiceError;

/// Application service for the car inventory.
/// Validates and coerces input before any store call; the store owns uniqueness and ids.
#[derive(Clone)]
pub struct CarService {
    store: Arc<dyn CarStore>,
}

impl CarService {
    pub fn new(store: Arc<dyn CarStore>) -> Self { Self { store } }

    pub fn backend(&self) -> &'static str { self.store.backend() }

    /// Price of one car.
    #[instrument(skip(self))]
    pub async fn get_price(&self, model: Option<&str>) -> Result<Decimal, ServiceError> {
        let model = require_model(model)?;
        self.store
            .find_by_model(model)
            .await?
            .map(|c| c.price)
            .ok_or_else(|| ServiceError::car_not_found(model))
    }

    /// Full record(s) matching `model`, as a list of zero or one. A missing model
    /// or no match is an empty list, not an error.
    #[instrument(skip(self))]
    pub async fn get_full(&self, model: Option<&str>) -> Result<Vec<Car>, ServiceError> {
        let Some(model) = model.filter(|m| !m.trim().is_empty()) else {
            return Ok(Vec::new());
        };
        Ok(self.store.find_by_model(model).await?.into_iter().collect())
    }

    #[instrument(skip(self), fields(backend = self.store.backend()))]
    pub async fn save(&self, input: CarInput) -> Result<Car, ServiceError> {
        let car = input.validate()?;
        let created = self.store.create(car).await?;
        info!(id = created.id, model = %created.model, price = %created.price, "car saved");
        Ok(created)
    }

    #[instrument(skip(self), fields(backend = self.store.backend()))]
    pub async fn update(&self, input: CarInput) -> Result<Car, ServiceError> {
        let car = input.validate()?;
        let updated = self.store.update_price(&car.model, car.price, car.image).await?;
        info!(id = updated.id, model = %updated.model, price = %updated.price, "car updated");
        Ok(updated)
    }

    #[instrument(skip(self), fields(backend = self.store.backend()))]
    pub async fn delete(&self, model: Option<&str>) -> Result<(), ServiceError> {
        let model = require_model(model)?;
        if !self.store.delete(model).await? {
            return Err(ServiceError::car_not_found(model));
        }
        info!(%model, "car deleted");
        Ok(())
    }

    pub async fn list_all(&self) -> Result<Vec<Car>, ServiceError> {
        self.store.list_all().await
    }

    pub async fn count(&self) -> Result<usize, ServiceError> {
        self.store.count().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cars::memory::MemoryCarStore;
    use serde_json::json;

    fn service() -> CarService {
        CarService::new(Arc::new(MemoryCarStore::new()))
    }

    #[tokio::test]
    async fn ferrari_scenario() -> Result<(), anyhow::Error> {
        let svc = service();

        let created = svc.save(CarInput::new("Ferrari", 1_200_000)).await?;
        assert_eq!(created.id, 1);

        let dup = svc.save(CarInput::new("Ferrari", 999)).await;
        assert!(matches!(dup, Err(ServiceError::Conflict(_))));

        let updated = svc.update(CarInput::new("Ferrari", 1_350_000)).await?;
        assert_eq!(updated.id, 1);
        assert_eq!(svc.get_price(Some("Ferrari")).await?, Decimal::from(1_350_000));

        svc.delete(Some("Ferrari")).await?;
        assert!(matches!(svc.get_price(Some("Ferrari")).await, Err(ServiceError::NotFound(_))));
        assert!(matches!(svc.delete(Some("Ferrari")).await, Err(ServiceError::NotFound(_))));
        Ok(())
    }

    #[tokio::test]
    async fn validation_happens_before_the_store() -> Result<(), anyhow::Error> {
        let svc = service();
        let missing_price = CarInput { model: Some("BMW".into()), ..Default::default() };
        assert!(svc.save(missing_price).await.unwrap_err().is_bad_request());
        assert!(svc.save(CarInput::new("BMW", "abc")).await.unwrap_err().is_bad_request());
        assert!(svc.update(CarInput::new("BMW", json!({"v": 1}))).await.unwrap_err().is_bad_request());
        assert!(svc.get_price(None).await.unwrap_err().is_bad_request());
        assert!(svc.delete(Some("")).await.unwrap_err().is_bad_request());
        assert_eq!(svc.count().await?, 0);
        Ok(())
    }

    #[tokio::test]
    async fn get_full_is_a_list_and_never_fails_on_miss() -> Result<(), anyhow::Error> {
        let svc = service();
        assert!(svc.get_full(None).await?.is_empty());
        assert!(svc.get_full(Some("Nope")).await?.is_empty());

        svc.save(CarInput::new("BMW", "350000").with_image("bmw.png")).await?;
        let found = svc.get_full(Some("BMW")).await?;
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].image.as_deref(), Some("bmw.png"));
        Ok(())
    }

    #[tokio::test]
    async fn update_missing_leaves_store_unchanged() -> Result<(), anyhow::Error> {
        let svc = service();
        svc.save(CarInput::new("A", 1)).await?;
        let before = svc.list_all().await?;
        assert!(matches!(svc.update(CarInput::new("B", 2)).await, Err(ServiceError::NotFound(_))));
        assert_eq!(svc.list_all().await?, before);
        Ok(())
    }
}
