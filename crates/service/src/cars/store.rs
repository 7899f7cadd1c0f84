use async_trait::async_trait;
use models::{carro::NewCar, Car};
use rust_decimal::Decimal;

use crate::errors::ServiceError;

/// Trait abstraction for the car collection.
/// Implementations can be file-backed, database-backed, in-memory, or a remote peer.
///
/// Every implementation enforces the same rules: `model` is unique, ids are
/// assigned by the store and never reused, `list_all` is ordered by ascending id,
/// and a mutation has reached its backing medium before the call returns.
#[async_trait]
pub trait CarStore: Send + Sync {
    /// Short label for logs and status output.
    fn backend(&self) -> &'static str;

    /// Exact, case-sensitive lookup.
    async fn find_by_model(&self, model: &str) -> Result<Option<Car>, ServiceError>;

    async fn list_all(&self) -> Result<Vec<Car>, ServiceError>;

    /// Fails with `Conflict` when the model already exists.
    async fn create(&self, car: NewCar) -> Result<Car, ServiceError>;

    /// Fails with `NotFound` when the model is unknown. `image` only replaces the
    /// stored one when it is a non-empty string.
    async fn update_price(&self, model: &str, price: Decimal, image: Option<String>) -> Result<Car, ServiceError>;

    /// Returns whether a record was removed.
    async fn delete(&self, model: &str) -> Result<bool, ServiceError>;

    async fn count(&self) -> Result<usize, ServiceError> {
        Ok(self.list_all().await?.len())
    }
}
