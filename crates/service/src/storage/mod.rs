//! Storage abstractions for service layer
//!
//! Reusable file-backed stores for small documents persisted as JSON.

pub mod json_file_store;
