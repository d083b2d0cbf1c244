use crate::domain::model::{GeoPoint, LocationError};
use crate::domain::ports::LocationProvider;
use async_trait::async_trait;

/// Location supplied up front, e.g. from `--near`. Without one the
/// capability is reported as unsupported.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedLocation(pub Option<GeoPoint>);

#[async_trait]
impl LocationProvider for FixedLocation {
    async fn locate(&self) -> Result<GeoPoint, LocationError> {
        self.0.ok_or(LocationError::Unsupported)
    }
}
