use async_trait::async_trait;
use models::{carro::NewCar, Car};
use rust_decimal::Decimal;
use tokio::sync::RwLock;
use tracing::debug;

use crate::cars::{collection::CarCollection, store::CarStore};
use crate::errors::ServiceError;

/// Process-local store; contents vanish with the process.
#[derive(Debug, Default)]
pub struct MemoryCarStore {
    inner: RwLock<CarCollection>,
}

impl MemoryCarStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CarStore for MemoryCarStore {
    fn backend(&self) -> &'static str { "memory" }

    async fn find_by_model(&self, model: &str) -> Result<Option<Car>, ServiceError> {
        Ok(self.inner.read().await.find(model).cloned())
    }

    async fn list_all(&self) -> Result<Vec<Car>, ServiceError> {
        Ok(self.inner.read().await.cars().to_vec())
    }

    async fn create(&self, car: NewCar) -> Result<Car, ServiceError> {
        let created = self.inner.write().await.insert(car)?;
        debug!(id = created.id, model = %created.model, "memory insert");
        Ok(created)
    }

    async fn update_price(&self, model: &str, price: Decimal, image: Option<String>) -> Result<Car, ServiceError> {
        self.inner.write().await.update_price(model, price, image)
    }

    async fn delete(&self, model: &str) -> Result<bool, ServiceError> {
        Ok(self.inner.write().await.remove(model))
    }

    async fn count(&self) -> Result<usize, ServiceError> {
        Ok(self.inner.read().await.len())
    }
}
