use std::{path::PathBuf, sync::Arc};

use async_trait::async_trait;
use models::{carro::NewCar, Car};
use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::cars::{collection::CarCollection, store::CarStore};
use crate::errors::ServiceError;
use crate::storage::json_file_store::JsonFileStore;

/// File-backed car store.
/// The whole collection lives in memory and is rewritten atomically as a JSON
/// array (`[{"id", "modelo", "preco", "image"?}, ...]`) after every mutation.
#[derive(Clone)]
pub struct FileCarStore {
    store: Arc<JsonFileStore<CarCollection>>,
}

impl FileCarStore {
    /// Initialize the store from the given file path. Creates the file if missing.
    pub async fn new<P: Into<PathBuf>>(path: P) -> Result<Arc<Self>, ServiceError> {
        let store = JsonFileStore::<CarCollection>::new(path).await?;
        if store.read(CarCollection::is_empty).await {
            info!(path = %store.path().display(), "starting with an empty inventory");
        } else {
            let count = store.read(|c| c.len()).await;
            debug!(path = %store.path().display(), count, "car file loaded");
        }
        Ok(Arc::new(Self { store }))
    }
}

#[async_trait]
impl CarStore for FileCarStore {
    fn backend(&self) -> &'static str { "file" }

    async fn find_by_model(&self, model: &str) -> Result<Option<Car>, ServiceError> {
        Ok(self.store.read(|c| c.find(model).cloned()).await)
    }

    async fn list_all(&self) -> Result<Vec<Car>, ServiceError> {
        Ok(self.store.read(|c| c.cars().to_vec()).await)
    }

    async fn create(&self, car: NewCar) -> Result<Car, ServiceError> {
        self.store.update(|c| c.insert(car)).await
    }

    async fn update_price(&self, model: &str, price: Decimal, image: Option<String>) -> Result<Car, ServiceError> {
        self.store.update(|c| c.update_price(model, price, image)).await
    }

    async fn delete(&self, model: &str) -> Result<bool, ServiceError> {
        // skip the rewrite when there is nothing to remove
        if self.store.read(|c| c.find(model).is_none()).await {
            return Ok(false);
        }
        self.store.update(|c| Ok(c.remove(model))).await
    }

    async fn count(&self) -> Result<usize, ServiceError> {
        Ok(self.store.read(|c| c.len()).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn new_car(model: &str, price: i64) -> NewCar {
        NewCar { model: model.into(), price: Decimal::from(price), image: None }
    }

    #[tokio::test]
    async fn file_store_persists_across_reload() -> Result<(), anyhow::Error> {
        let tmp = std::env::temp_dir().join(format!("svc_carros_{}.json", Uuid::new_v4()));
        let store = FileCarStore::new(&tmp).await?;

        store.create(new_car("Toyota Corolla", 125_000)).await?;
        store.create(new_car("Honda Civic", 135_000)).await?;
        store.update_price("Honda Civic", Decimal::from(140_000), Some("civic.png".into())).await?;
        assert!(store.delete("Toyota Corolla").await?);

        let reloaded = FileCarStore::new(&tmp).await?;
        let cars = reloaded.list_all().await?;
        assert_eq!(cars.len(), 1);
        assert_eq!(cars[0].model, "Honda Civic");
        assert_eq!(cars[0].price, Decimal::from(140_000));
        assert_eq!(cars[0].image.as_deref(), Some("civic.png"));

        // on-disk layout is a bare array with the wire field names
        let raw: serde_json::Value = serde_json::from_slice(&tokio::fs::read(&tmp).await?)?;
        assert_eq!(raw[0]["modelo"], "Honda Civic");
        assert_eq!(raw[0]["id"], 2);

        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn conflict_does_not_touch_the_file() -> Result<(), anyhow::Error> {
        let tmp = std::env::temp_dir().join(format!("svc_carros_{}.json", Uuid::new_v4()));
        let store = FileCarStore::new(&tmp).await?;
        store.create(new_car("Ferrari", 1_200_000)).await?;
        let before = tokio::fs::read(&tmp).await?;

        let dup = store.create(new_car("Ferrari", 999)).await;
        assert!(matches!(dup, Err(ServiceError::Conflict(_))));
        assert_eq!(tokio::fs::read(&tmp).await?, before);

        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn concurrent_creates_get_distinct_ids() -> Result<(), anyhow::Error> {
        let tmp = std::env::temp_dir().join(format!("svc_carros_{}.json", Uuid::new_v4()));
        let store = FileCarStore::new(&tmp).await?;

        let mut tasks = Vec::new();
        for i in 0..16 {
            let store = Arc::clone(&store);
            tasks.push(tokio::spawn(async move { store.create(new_car(&format!("M{i}"), i)).await }));
        }
        let mut ids = Vec::new();
        for t in tasks {
            ids.push(t.await??.id);
        }
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 16);

        let reloaded = FileCarStore::new(&tmp).await?;
        assert_eq!(reloaded.count().await?, 16);

        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }
}
