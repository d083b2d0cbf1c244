// Adapters layer: concrete implementations of the domain ports for external systems.

pub mod cache_store;
pub mod http;
pub mod location;

pub use cache_store::DiskCacheStore;
pub use http::HttpFetcher;
pub use location::FixedLocation;
