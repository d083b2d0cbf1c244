use chrono::Weekday;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// One entry of the community-services dataset.
///
/// Missing or `null` strings and lists deserialize as empty, so a sparse
/// record never fails the whole dataset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceRecord {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub categories: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub eligibility: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub address: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub website: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub phone: String,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hours: Option<WeeklyHours>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl ServiceRecord {
    /// Coordinates, only when both halves are present.
    pub fn location(&self) -> Option<GeoPoint> {
        match (self.lat, self.lng) {
            (Some(lat), Some(lng)) => Some(GeoPoint { lat, lng }),
            _ => None,
        }
    }
}

/// Posted opening hours keyed by `sun`..`sat`.
///
/// Values are kept as written (`closed` or `HH:MM-HH:MM`) and interpreted by
/// the hours evaluator on every render. A `null` day is treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct WeeklyHours(pub BTreeMap<String, String>);

impl<'de> Deserialize<'de> for WeeklyHours {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let days = BTreeMap::<String, Option<String>>::deserialize(deserializer)?;
        Ok(Self(
            days.into_iter()
                .filter_map(|(day, value)| value.map(|value| (day, value)))
                .collect(),
        ))
    }
}

impl WeeklyHours {
    pub fn get(&self, day: Weekday) -> Option<&str> {
        self.0.get(weekday_key(day)).map(String::as_str)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for WeeklyHours {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

pub const WEEKDAY_KEYS: [&str; 7] = ["sun", "mon", "tue", "wed", "thu", "fri", "sat"];

pub fn weekday_key(day: Weekday) -> &'static str {
    WEEKDAY_KEYS[day.num_days_from_sunday() as usize]
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl std::str::FromStr for GeoPoint {
    type Err = String;

    /// Parses `LAT,LNG`.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (lat, lng) = s
            .split_once(',')
            .ok_or_else(|| format!("expected LAT,LNG but got '{}'", s))?;
        let lat: f64 = lat
            .trim()
            .parse()
            .map_err(|e| format!("invalid latitude '{}': {}", lat.trim(), e))?;
        let lng: f64 = lng
            .trim()
            .parse()
            .map_err(|e| format!("invalid longitude '{}': {}", lng.trim(), e))?;
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
            return Err(format!("coordinates out of range: {},{}", lat, lng));
        }
        Ok(Self { lat, lng })
    }
}

/// A record plus the fields derived for a single render pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedView {
    #[serde(flatten)]
    pub record: ServiceRecord,
    pub is_open_now: bool,
    pub distance_km: Option<f64>,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LocationError {
    #[error("geolocation is not supported")]
    Unsupported,
    #[error("location unavailable: {0}")]
    Unavailable(String),
}

/// How a response relates to the origin the assets are served from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseKind {
    /// Same origin as the asset base URL.
    Basic,
    /// Another origin.
    Cors,
}

/// A static asset as fetched from the network or read back from the cache.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetResponse {
    pub url: String,
    pub status: u16,
    pub kind: ResponseKind,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl AssetResponse {
    pub fn is_cacheable(&self) -> bool {
        self.status == 200 && self.kind == ResponseKind::Basic
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sparse_record_deserializes_with_defaults() {
        let record: ServiceRecord =
            serde_json::from_str(r#"{"name":"Food Bank","categories":null}"#).unwrap();
        assert_eq!(record.name, "Food Bank");
        assert!(record.categories.is_empty());
        assert!(record.eligibility.is_empty());
        assert!(record.hours.is_none());
        assert!(record.location().is_none());
    }

    #[test]
    fn test_null_fields_deserialize_as_empty() {
        let record: ServiceRecord = serde_json::from_str(
            r#"{"name":"A","description":null,"address":null,"website":null,"phone":null,
                "eligibility":null,"lat":null,"hours":{"mon":"09:00-17:00","tue":null}}"#,
        )
        .unwrap();
        assert_eq!(record.name, "A");
        assert!(record.description.is_empty());
        assert!(record.address.is_empty());
        assert!(record.website.is_empty());
        assert!(record.phone.is_empty());
        assert!(record.lat.is_none());
        let hours = record.hours.unwrap();
        assert_eq!(hours.get(Weekday::Mon), Some("09:00-17:00"));
        assert_eq!(hours.get(Weekday::Tue), None);

        let record: ServiceRecord = serde_json::from_str(r#"{"name":null,"hours":null}"#).unwrap();
        assert!(record.name.is_empty());
        assert!(record.hours.is_none());
    }

    #[test]
    fn test_location_requires_both_coordinates() {
        let record = ServiceRecord {
            lat: Some(50.26),
            ..Default::default()
        };
        assert!(record.location().is_none());

        let record = ServiceRecord {
            lat: Some(50.26),
            lng: Some(-119.27),
            ..Default::default()
        };
        assert_eq!(record.location(), Some(GeoPoint::new(50.26, -119.27)));
    }

    #[test]
    fn test_weekly_hours_lookup_by_weekday() {
        let hours: WeeklyHours = [("mon", "09:00-17:00"), ("sun", "closed")]
            .into_iter()
            .collect();
        assert_eq!(hours.get(Weekday::Mon), Some("09:00-17:00"));
        assert_eq!(hours.get(Weekday::Sun), Some("closed"));
        assert_eq!(hours.get(Weekday::Tue), None);
    }

    #[test]
    fn test_geo_point_from_str() {
        let point: GeoPoint = "50.267, -119.272".parse().unwrap();
        assert_eq!(point, GeoPoint::new(50.267, -119.272));
        assert!("50.267".parse::<GeoPoint>().is_err());
        assert!("91,0".parse::<GeoPoint>().is_err());
        assert!("abc,0".parse::<GeoPoint>().is_err());
    }
}
