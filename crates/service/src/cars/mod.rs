//! Car inventory: the record-store seam, its backends, and the CRUD service on top.

pub mod collection;
pub mod store;
pub mod memory;
pub mod file;
pub mod sql;
pub mod remote;
pub mod input;
pub mod service;

#[cfg(test)]
mod contract_tests;

pub use collection::CarCollection;
pub use file::FileCarStore;
pub use input::CarInput;
pub use memory::MemoryCarStore;
pub use remote::RemoteCarStore;
pub use service::CarService;
pub use sql::SqlCarStore;
pub use store::CarStore;
