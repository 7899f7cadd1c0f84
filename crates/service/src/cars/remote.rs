use async_trait::async_trait;
use configs::{RemoteConfig, WriteMode};
use models::{carro::NewCar, Car};
use reqwest::{Response, StatusCode};
use rust_decimal::Decimal;
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::cars::{collection::CarCollection, store::CarStore};
use crate::errors::ServiceError;

/// Store backed by a peer instance of this API (its `/api/...` routes).
///
/// A local mirror is seeded from the peer on first use. With
/// [`WriteMode::Forward`] reads go to the peer and refresh the mirror, writes
/// are forwarded and then mirrored, and the mirror answers reads while the peer
/// is down. With [`WriteMode::MirrorOnly`] the peer is only read once to seed
/// the mirror; writes stay local and are never sent upstream.
pub struct RemoteCarStore {
    client: reqwest::Client,
    base_url: String,
    write_mode: WriteMode,
    mirror: RwLock<Option<CarCollection>>,
}

#[derive(Serialize)]
struct WriteBody<'a> {
    #[serde(rename = "modelo")]
    model: &'a str,
    #[serde(rename = "preco", with = "rust_decimal::serde::float")]
    price: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    image: Option<&'a str>,
}

#[derive(Serialize)]
struct ModelBody<'a> {
    #[serde(rename = "modelo")]
    model: &'a str,
}

impl RemoteCarStore {
    pub fn new(cfg: &RemoteConfig) -> Result<Self, ServiceError> {
        let client = reqwest::Client::builder()
            .connect_timeout(cfg.connect_timeout())
            .timeout(cfg.request_timeout())
            .build()
            .map_err(ServiceError::upstream)?;
        Ok(Self {
            client,
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            write_mode: cfg.write_mode,
            mirror: RwLock::new(None),
        })
    }

    pub fn write_mode(&self) -> WriteMode {
        self.write_mode
    }

    /// Whether the mirror has been seeded from the peer yet.
    pub async fn is_seeded(&self) -> bool {
        self.mirror.read().await.is_some()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn fetch_all(&self) -> Result<Vec<Car>, ServiceError> {
        let resp = self
            .client
            .get(self.url("/api/listarCarros"))
            .send()
            .await
            .map_err(transport_err)?;
        let resp = require_success(resp).await?;
        resp.json::<Vec<Car>>().await.map_err(transport_err)
    }

    async fn fetch_one(&self, model: &str) -> Result<Option<Car>, ServiceError> {
        let resp = self
            .client
            .post(self.url("/api/getCarro"))
            .json(&ModelBody { model })
            .send()
            .await
            .map_err(transport_err)?;
        let resp = require_success(resp).await?;
        let matches = resp.json::<Vec<Car>>().await.map_err(transport_err)?;
        Ok(matches.into_iter().find(|c| c.model == model))
    }

    /// Run `f` on the mirror, seeding it from the peer first if needed.
    async fn with_seeded_mirror<R>(
        &self,
        f: impl FnOnce(&mut CarCollection) -> Result<R, ServiceError>,
    ) -> Result<R, ServiceError> {
        let mut guard = self.mirror.write().await;
        if guard.is_none() {
            let cars = self.fetch_all().await?;
            info!(count = cars.len(), base_url = %self.base_url, "mirror seeded from peer");
            *guard = Some(CarCollection::from(cars));
        }
        f(guard.get_or_insert_with(CarCollection::default))
    }

    async fn read_seeded_mirror<R>(&self, f: impl FnOnce(&CarCollection) -> R) -> Result<R, ServiceError> {
        {
            let guard = self.mirror.read().await;
            if let Some(mirror) = guard.as_ref() {
                return Ok(f(mirror));
            }
        }
        self.with_seeded_mirror(|m| Ok(f(m))).await
    }

    /// Apply `f` to the mirror after a successful peer call, seeding it first
    /// so later reads can fall back to it. A failed seed leaves the mirror unset.
    async fn touch_mirror(&self, f: impl FnOnce(&mut CarCollection)) {
        let mut guard = self.mirror.write().await;
        if guard.is_none() {
            match self.fetch_all().await {
                Ok(cars) => {
                    info!(count = cars.len(), base_url = %self.base_url, "mirror seeded from peer");
                    *guard = Some(CarCollection::from(cars));
                }
                Err(e) => {
                    warn!(error = %e, base_url = %self.base_url, "could not seed mirror");
                    return;
                }
            }
        }
        if let Some(mirror) = guard.as_mut() {
            f(mirror);
        }
    }

    /// Serve a read from the mirror after the peer failed, if the mirror exists.
    async fn degrade<R>(&self, err: ServiceError, f: impl FnOnce(&CarCollection) -> R) -> Result<R, ServiceError> {
        let guard = self.mirror.read().await;
        match guard.as_ref() {
            Some(mirror) => {
                warn!(error = %err, base_url = %self.base_url, "peer unavailable; serving from mirror");
                Ok(f(mirror))
            }
            None => Err(err),
        }
    }

    async fn forward(&self, path: &str, body: &impl Serialize) -> Result<Response, ServiceError> {
        self.client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(transport_err)
    }
}

fn transport_err(e: reqwest::Error) -> ServiceError {
    if e.is_timeout() {
        ServiceError::UpstreamUnavailable(format!("peer timed out: {e}"))
    } else {
        ServiceError::upstream(e)
    }
}

async fn require_success(resp: Response) -> Result<Response, ServiceError> {
    if resp.status().is_success() {
        return Ok(resp);
    }
    let status = resp.status();
    let message = peer_message(resp).await;
    Err(ServiceError::UpstreamUnavailable(format!("peer answered {status}: {message}")))
}

/// Pull the human-readable message out of a peer error body.
async fn peer_message(resp: Response) -> String {
    let text = resp.text().await.unwrap_or_default();
    serde_json::from_str::<serde_json::Value>(&text)
        .ok()
        .and_then(|v| {
            v.get("error")
                .or_else(|| v.get("message"))
                .and_then(|m| m.as_str())
                .map(str::to_string)
        })
        .unwrap_or(text)
}

/// Translate a peer's answer to a write using the same status mapping this API exposes.
async fn write_outcome(resp: Response, model: &str) -> Result<Response, ServiceError> {
    match resp.status() {
        s if s.is_success() => Ok(resp),
        StatusCode::CONFLICT => Err(ServiceError::duplicate_model(model)),
        StatusCode::NOT_FOUND => Err(ServiceError::car_not_found(model)),
        StatusCode::BAD_REQUEST => Err(ServiceError::BadRequest(peer_message(resp).await)),
        _ => require_success(resp).await,
    }
}

#[async_trait]
impl CarStore for RemoteCarStore {
    fn backend(&self) -> &'static str { "remote" }

    async fn find_by_model(&self, model: &str) -> Result<Option<Car>, ServiceError> {
        if self.write_mode == WriteMode::MirrorOnly {
            return self.read_seeded_mirror(|m| m.find(model).cloned()).await;
        }
        match self.fetch_one(model).await {
            Ok(found) => {
                let mirrored = found.clone();
                self.touch_mirror(|m| match mirrored {
                    Some(car) => m.upsert(car),
                    None => {
                        m.remove(model);
                    }
                })
                .await;
                Ok(found)
            }
            Err(e) => self.degrade(e, |m| m.find(model).cloned()).await,
        }
    }

    async fn list_all(&self) -> Result<Vec<Car>, ServiceError> {
        if self.write_mode == WriteMode::MirrorOnly {
            return self.read_seeded_mirror(|m| m.cars().to_vec()).await;
        }
        match self.fetch_all().await {
            Ok(cars) => {
                let mut guard = self.mirror.write().await;
                let mirror = guard.get_or_insert_with(CarCollection::default);
                mirror.replace_all(cars);
                debug!(count = mirror.len(), "mirror refreshed from peer");
                Ok(mirror.cars().to_vec())
            }
            Err(e) => self.degrade(e, |m| m.cars().to_vec()).await,
        }
    }

    async fn create(&self, car: NewCar) -> Result<Car, ServiceError> {
        if self.write_mode == WriteMode::MirrorOnly {
            return self.with_seeded_mirror(|m| m.insert(car)).await;
        }
        let body = WriteBody { model: &car.model, price: car.price, image: car.image.as_deref() };
        let resp = self.forward("/api/saveCarro", &body).await?;
        let resp = write_outcome(resp, &car.model).await?;
        let created = resp.json::<Car>().await.map_err(transport_err)?;
        let mirrored = created.clone();
        self.touch_mirror(|m| m.upsert(mirrored)).await;
        Ok(created)
    }

    async fn update_price(&self, model: &str, price: Decimal, image: Option<String>) -> Result<Car, ServiceError> {
        if self.write_mode == WriteMode::MirrorOnly {
            return self.with_seeded_mirror(|m| m.update_price(model, price, image)).await;
        }
        let body = WriteBody { model, price, image: image.as_deref().filter(|i| !i.trim().is_empty()) };
        let resp = self.forward("/api/updateCarro", &body).await?;
        let resp = write_outcome(resp, model).await?;
        let updated = resp.json::<Car>().await.map_err(transport_err)?;
        let mirrored = updated.clone();
        self.touch_mirror(|m| m.upsert(mirrored)).await;
        Ok(updated)
    }

    async fn delete(&self, model: &str) -> Result<bool, ServiceError> {
        if self.write_mode == WriteMode::MirrorOnly {
            return self.with_seeded_mirror(|m| Ok(m.remove(model))).await;
        }
        let resp = self.forward("/api/deleteCarro", &ModelBody { model }).await?;
        match write_outcome(resp, model).await {
            Ok(_) => {
                self.touch_mirror(|m| {
                    m.remove(model);
                })
                .await;
                Ok(true)
            }
            Err(ServiceError::NotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }
}
