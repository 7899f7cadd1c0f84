pub mod routes;
pub mod startup;
pub mod extract;
pub mod errors;

pub use startup::run;
