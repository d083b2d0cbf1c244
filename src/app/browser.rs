use crate::core::search::{categories, search, SearchQuery};
use crate::domain::model::{DerivedView, GeoPoint, LocationError, ServiceRecord};
use crate::domain::ports::LocationProvider;
use chrono::NaiveDateTime;

#[derive(Debug, Clone, Default, PartialEq)]
enum DataState {
    #[default]
    NotLoaded,
    Loaded(Vec<ServiceRecord>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum RenderOutcome {
    /// No dataset has been loaded yet.
    NoData,
    /// Possibly empty.
    Results(Vec<DerivedView>),
}

/// Dataset and filter state of one browsing session.
///
/// Each setter corresponds to a user event; [`DirectoryBrowser::render`] is
/// rerun after any of them.
#[derive(Debug, Clone, Default)]
pub struct DirectoryBrowser {
    data: DataState,
    query: SearchQuery,
}

impl DirectoryBrowser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_query(query: SearchQuery) -> Self {
        Self {
            data: DataState::NotLoaded,
            query,
        }
    }

    pub fn replace_dataset(&mut self, services: Vec<ServiceRecord>) {
        tracing::debug!("Dataset replaced with {} services", services.len());
        self.data = DataState::Loaded(services);
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.query.text = text.into();
    }

    pub fn set_category(&mut self, category: Option<String>) {
        self.query.category = category;
    }

    pub fn set_open_now_only(&mut self, enabled: bool) {
        self.query.open_now_only = enabled;
    }

    pub fn set_max_km(&mut self, max_km: f64) {
        self.query.max_km = max_km;
    }

    pub fn user_location(&self) -> Option<GeoPoint> {
        self.query.user_location
    }

    /// Apply a geolocation outcome. A failure leaves any previous location,
    /// and with it the radius filter, as it was.
    pub fn apply_location(
        &mut self,
        outcome: Result<GeoPoint, LocationError>,
    ) -> Result<GeoPoint, LocationError> {
        match outcome {
            Ok(point) => {
                self.query.user_location = Some(point);
                Ok(point)
            }
            Err(e) => {
                tracing::warn!("Location request failed: {}", e);
                Err(e)
            }
        }
    }

    pub async fn locate<L: LocationProvider>(&mut self, provider: &L) -> Result<GeoPoint, LocationError> {
        let outcome = provider.locate().await;
        self.apply_location(outcome)
    }

    /// Options for the category picker; empty until data is loaded.
    pub fn categories(&self) -> Vec<String> {
        match &self.data {
            DataState::NotLoaded => Vec::new(),
            DataState::Loaded(services) => categories(services),
        }
    }

    pub fn render(&self, now: &NaiveDateTime) -> RenderOutcome {
        match &self.data {
            DataState::NotLoaded => RenderOutcome::NoData,
            DataState::Loaded(services) => RenderOutcome::Results(search(services, &self.query, now)),
        }
    }
}
