//! Offline reverse geocoding of GPS coordinates.

use crate::types::{GpsCoordinate, Place};

/// Resolves a coordinate to a human-readable place.
///
/// Resolution failure is `None`, never an error.
pub trait ReverseGeocode {
    fn lookup(&self, coordinate: GpsCoordinate) -> Option<Place>;
}

/// Nearest-city lookup against the GeoNames database bundled with the
/// `reverse_geocoder` crate. No network access.
pub struct OfflineGeocoder {
    inner: reverse_geocoder::ReverseGeocoder,
}

impl OfflineGeocoder {
    /// Build the k-d tree over the bundled city list.
    ///
    /// Takes a noticeable moment, so callers build one per scan.
    pub fn new() -> Self {
        tracing::debug!("Loading offline reverse geocoding database");
        Self {
            inner: reverse_geocoder::ReverseGeocoder::new(),
        }
    }
}

impl Default for OfflineGeocoder {
    fn default() -> Self {
        Self::new()
    }
}

impl ReverseGeocode for OfflineGeocoder {
    fn lookup(&self, coordinate: GpsCoordinate) -> Option<Place> {
        if !coordinate.is_valid() {
            tracing::debug!("Not geocoding out-of-range coordinate {:?}", coordinate);
            return None;
        }
        let result = self
            .inner
            .search((coordinate.latitude, coordinate.longitude));
        let record = result.record;
        if record.name.is_empty() && record.admin1.is_empty() {
            return None;
        }
        Some(Place {
            name: record.name.clone(),
            region: record.admin1.clone(),
            country_code: record.cc.clone(),
        })
    }
}
