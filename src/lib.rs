pub mod api;
pub mod cache;
pub mod error;
pub mod storage;
pub mod web;

pub use api::Server;

pub use cache::Cache;

pub use error::Error;

pub use storage::types::Value;
pub use storage::Store;
