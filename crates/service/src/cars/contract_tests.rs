//! One behavioural suite run against every local backend.

use std::sync::Arc;

use models::carro::NewCar;
use rust_decimal::Decimal;

use crate::cars::{CarInput, CarService, CarStore, FileCarStore, MemoryCarStore};
use crate::errors::ServiceError;
use crate::test_support::sqlite_store;

fn new_car(model: &str, price: &str) -> NewCar {
    NewCar { model: model.into(), price: price.parse().unwrap(), image: None }
}

async fn exercise(store: Arc<dyn CarStore>) -> Result<(), anyhow::Error> {
    let backend = store.backend();

    // round trip
    let a = store.create(new_car("Alpha", "100.50")).await?;
    let found = store.find_by_model("Alpha").await?.expect("created car is findable");
    assert_eq!(found, a, "{backend}");
    assert_eq!(found.price, "100.50".parse::<Decimal>()?, "{backend}");

    // uniqueness
    let dup = store.create(new_car("Alpha", "1")).await;
    assert!(matches!(dup, Err(ServiceError::Conflict(_))), "{backend}: {dup:?}");
    assert_eq!(store.list_all().await?.iter().filter(|c| c.model == "Alpha").count(), 1);

    // case-sensitive key
    assert!(store.find_by_model("alpha").await?.is_none(), "{backend}");

    // ordering
    let b = store.create(new_car("Bravo", "200")).await?;
    let c = store.create(new_car("Charlie", "300")).await?;
    assert!(a.id < b.id && b.id < c.id, "{backend}");
    let models: Vec<_> = store.list_all().await?.into_iter().map(|c| c.model).collect();
    assert_eq!(models, ["Alpha", "Bravo", "Charlie"], "{backend}");

    // update: price always, image only when supplied
    let updated = store.update_price("Bravo", Decimal::from(250), Some("bravo.png".into())).await?;
    assert_eq!((updated.id, updated.price, updated.image.as_deref()), (b.id, Decimal::from(250), Some("bravo.png")));
    let updated = store.update_price("Bravo", Decimal::from(260), None).await?;
    assert_eq!(updated.image.as_deref(), Some("bravo.png"), "{backend}");
    assert_eq!(updated.model, "Bravo");

    let before = store.list_all().await?;
    let missing = store.update_price("Zulu", Decimal::ONE, None).await;
    assert!(matches!(missing, Err(ServiceError::NotFound(_))), "{backend}: {missing:?}");
    assert_eq!(store.list_all().await?, before, "{backend}");

    // delete, then observe
    assert!(store.delete("Alpha").await?, "{backend}");
    assert!(!store.delete("Alpha").await?, "{backend}");
    assert!(store.find_by_model("Alpha").await?.is_none());
    assert!(store.list_all().await?.iter().all(|c| c.model != "Alpha"));

    // ids are not reissued
    assert!(store.delete("Charlie").await?);
    let d = store.create(new_car("Delta", "400")).await?;
    assert!(d.id > c.id, "{backend}: {} reused", d.id);

    assert_eq!(store.count().await?, 2, "{backend}");

    // values that do not fit DECIMAL(12,2) or the image column never reach a store
    let svc = CarService::new(Arc::clone(&store));
    for price in ["12345678901234567.89", "99999999999.99", "10000000000"] {
        let res = svc.save(CarInput::new("Echo", price)).await;
        assert!(res.as_ref().is_err_and(ServiceError::is_bad_request), "{backend}: {price} -> {res:?}");
    }
    let res = svc.save(CarInput::new("Echo", 1).with_image("i".repeat(models::carro::MAX_IMAGE_LEN + 1))).await;
    assert!(res.as_ref().is_err_and(ServiceError::is_bad_request), "{backend}: {res:?}");
    assert!(store.find_by_model("Echo").await?.is_none(), "{backend}");

    // the widest accepted price and image come back unchanged
    let image = "i".repeat(models::carro::MAX_IMAGE_LEN);
    let e = svc.save(CarInput::new("Echo", "9999999999.99").with_image(image.clone())).await?;
    let found = store.find_by_model("Echo").await?.expect("saved car is findable");
    assert_eq!(found.price, "9999999999.99".parse::<Decimal>()?, "{backend}");
    assert_eq!(found.image.as_deref(), Some(image.as_str()), "{backend}");
    assert_eq!(found, e, "{backend}");
    Ok(())
}

#[tokio::test]
async fn memory_store_honours_contract() -> Result<(), anyhow::Error> {
    exercise(Arc::new(MemoryCarStore::new())).await
}

#[tokio::test]
async fn file_store_honours_contract() -> Result<(), anyhow::Error> {
    let tmp = std::env::temp_dir().join(format!("contract_carros_{}.json", uuid::Uuid::new_v4()));
    let store = FileCarStore::new(&tmp).await?;
    exercise(store).await?;
    let _ = tokio::fs::remove_file(&tmp).await;
    Ok(())
}

#[tokio::test]
async fn sql_store_honours_contract() -> Result<(), anyhow::Error> {
    if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
    let (store, path) = sqlite_store().await?;
    exercise(Arc::new(store)).await?;
    let _ = tokio::fs::remove_file(&path).await;
    Ok(())
}
