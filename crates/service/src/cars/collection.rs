use models::{carro::{normalize_image, NewCar}, Car};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::ServiceError;

/// Ordered car list plus the highest id ever issued.
///
/// Serializes as the bare array of records, which is the on-disk layout of the
/// file backend. `last_id` is rebuilt from the records on load, so ids of
/// deleted records are not reissued while the collection lives.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<Car>", into = "Vec<Car>")]
pub struct CarCollection {
    cars: Vec<Car>,
    last_id: i32,
}

impl From<Vec<Car>> for CarCollection {
    fn from(mut cars: Vec<Car>) -> Self {
        cars.sort_by_key(|c| c.id);
        let last_id = cars.iter().map(|c| c.id).max().unwrap_or(0);
        Self { cars, last_id }
    }
}

impl From<CarCollection> for Vec<Car> {
    fn from(c: CarCollection) -> Self {
        c.cars
    }
}

impl CarCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.cars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cars.is_empty()
    }

    /// Records in ascending id order.
    pub fn cars(&self) -> &[Car] {
        &self.cars
    }

    pub fn find(&self, model: &str) -> Option<&Car> {
        self.cars.iter().find(|c| c.model == model)
    }

    pub fn insert(&mut self, car: NewCar) -> Result<Car, ServiceError> {
        if self.find(&car.model).is_some() {
            return Err(ServiceError::duplicate_model(&car.model));
        }
        let id = self.next_id()?;
        let car = car.into_car(id);
        self.cars.push(car.clone());
        self.last_id = id;
        Ok(car)
    }

    pub fn update_price(&mut self, model: &str, price: Decimal, image: Option<String>) -> Result<Car, ServiceError> {
        let car = self
            .cars
            .iter_mut()
            .find(|c| c.model == model)
            .ok_or_else(|| ServiceError::car_not_found(model))?;
        car.price = price;
        if let Some(image) = normalize_image(image) {
            car.image = Some(image);
        }
        Ok(car.clone())
    }

    pub fn remove(&mut self, model: &str) -> bool {
        let before = self.cars.len();
        self.cars.retain(|c| c.model != model);
        self.cars.len() != before
    }

    /// Insert or replace by model, keeping the caller's id. Used to mirror
    /// records whose id was assigned elsewhere.
    pub fn upsert(&mut self, car: Car) {
        self.last_id = self.last_id.max(car.id);
        match self.cars.iter_mut().find(|c| c.model == car.model) {
            Some(existing) => *existing = car,
            None => self.cars.push(car),
        }
        self.cars.sort_by_key(|c| c.id);
    }

    /// Swap in a fresh snapshot without lowering the id high-water mark.
    pub fn replace_all(&mut self, cars: Vec<Car>) {
        let fresh = CarCollection::from(cars);
        self.cars = fresh.cars;
        self.last_id = self.last_id.max(fresh.last_id);
    }

    fn next_id(&self) -> Result<i32, ServiceError> {
        let max = self.cars.iter().map(|c| c.id).max().unwrap_or(0);
        max.max(self.last_id)
            .checked_add(1)
            .ok_or_else(|| ServiceError::StorageUnavailable("car id space exhausted".into()))
    }
}
