pub mod errors;
pub mod db;
pub mod carro;

/// The car record shared by every store backend.
pub type Car = carro::Model;
