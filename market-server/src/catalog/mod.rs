//! Gig catalog: storage, seller-facing writes and the ranking engine

pub mod search;
pub mod service;
pub mod storage;

pub use search::SearchEngine;
pub use service::GigService;
pub use storage::CatalogStorage;
