//! Service layer for the car inventory.
//! - `cars::CarStore` is the storage seam; file, memory, SQL and remote-proxy backends implement it.
//! - `cars::CarService` validates and coerces input before any store call.
//! - `errors::ServiceError` is the taxonomy every backend translates its failures into.

pub mod errors;
pub mod runtime;
#[cfg(test)]
pub mod test_support;
pub mod storage;
pub mod cars;
