// Adapters layer: concrete implementations for external systems (http source, local storage).

pub mod http;
pub mod storage;

pub use http::HttpPriceSource;
pub use storage::LocalStorage;
