use async_trait::async_trait;
use migration::MigratorTrait;
use models::{
    carro::{self, normalize_image, NewCar},
    Car,
};
use rust_decimal::Decimal;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, ConnectOptions, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set, SqlErr,
};
use tracing::{info, warn};

use crate::cars::store::CarStore;
use crate::errors::ServiceError;

/// SeaORM-backed store over the `carro` table.
///
/// Each call opens its own connection, runs one statement in auto-commit mode,
/// and closes the connection again. The UNIQUE constraint on `modelo` decides
/// conflicts.
pub struct SqlCarStore {
    options: ConnectOptions,
}

impl SqlCarStore {
    pub fn new(cfg: &configs::DatabaseConfig) -> Self {
        Self { options: models::db::connect_options(cfg) }
    }

    /// Create the `carro` table if it does not exist yet.
    pub async fn migrate(&self) -> Result<(), ServiceError> {
        let db = self.connect().await?;
        let res = migration::Migrator::up(&db, None).await.map_err(db_err);
        release(db).await;
        res?;
        info!("carro schema ready");
        Ok(())
    }

    async fn connect(&self) -> Result<DatabaseConnection, ServiceError> {
        models::db::connect(&self.options)
            .await
            .map_err(|e| ServiceError::StorageUnavailable(e.to_string()))
    }
}

async fn release(db: DatabaseConnection) {
    if let Err(e) = db.close().await {
        warn!(error = %e, "closing sql connection failed");
    }
}

fn db_err(e: DbErr) -> ServiceError {
    ServiceError::StorageUnavailable(e.to_string())
}

#[async_trait]
impl CarStore for SqlCarStore {
    fn backend(&self) -> &'static str { "sql" }

    async fn find_by_model(&self, model: &str) -> Result<Option<Car>, ServiceError> {
        let db = self.connect().await?;
        let res = carro::Entity::find()
            .filter(carro::Column::Model.eq(model))
            .one(&db)
            .await;
        release(db).await;
        res.map_err(db_err)
    }

    async fn list_all(&self) -> Result<Vec<Car>, ServiceError> {
        let db = self.connect().await?;
        let res = carro::Entity::find()
            .order_by_asc(carro::Column::Id)
            .all(&db)
            .await;
        release(db).await;
        res.map_err(db_err)
    }

    async fn create(&self, car: NewCar) -> Result<Car, ServiceError> {
        let db = self.connect().await?;
        let am = carro::ActiveModel {
            model: Set(car.model.clone()),
            price: Set(car.price),
            image: Set(car.image.clone()),
            ..Default::default()
        };
        let res = am.insert(&db).await;
        release(db).await;
        res.map_err(|e| match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => ServiceError::duplicate_model(&car.model),
            _ => db_err(e),
        })
    }

    async fn update_price(&self, model: &str, price: Decimal, image: Option<String>) -> Result<Car, ServiceError> {
        let db = self.connect().await?;
        let mut update = carro::Entity::update_many()
            .col_expr(carro::Column::Price, Expr::value(price))
            .filter(carro::Column::Model.eq(model));
        if let Some(image) = normalize_image(image) {
            update = update.col_expr(carro::Column::Image, Expr::value(image));
        }
        // MySQL reports changed rows, not matched rows, so re-read instead of trusting rows_affected
        let res = match update.exec(&db).await {
            Ok(_) => carro::Entity::find()
                .filter(carro::Column::Model.eq(model))
                .one(&db)
                .await,
            Err(e) => Err(e),
        };
        release(db).await;
        res.map_err(db_err)?.ok_or_else(|| ServiceError::car_not_found(model))
    }

    async fn delete(&self, model: &str) -> Result<bool, ServiceError> {
        let db = self.connect().await?;
        let res = carro::Entity::delete_many()
            .filter(carro::Column::Model.eq(model))
            .exec(&db)
            .await;
        release(db).await;
        Ok(res.map_err(db_err)?.rows_affected > 0)
    }

    async fn count(&self) -> Result<usize, ServiceError> {
        let db = self.connect().await?;
        let res = carro::Entity::find().count(&db).await;
        release(db).await;
        Ok(res.map_err(db_err)? as usize)
    }
}
