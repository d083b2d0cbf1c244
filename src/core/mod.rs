pub mod asset_cache;
pub mod dataset;
pub mod geo;
pub mod hours;
pub mod search;

pub use crate::domain::model::{DerivedView, GeoPoint, ServiceRecord};
pub use crate::domain::ports::{AssetFetcher, CacheStore, Clock, ConfigProvider, LocationProvider, Storage};
pub use crate::utils::error::Result;
