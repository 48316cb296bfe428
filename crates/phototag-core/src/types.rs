//! Core data types shared by the inspector and the tagger.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Ordered keyword list, most relevant first.
pub type TagList = Vec<String>;

/// Everything the inspector learns about a single file.
///
/// Records are transient: built per file during a scan and discarded once
/// reported.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhotoRecord {
    /// Path to the source file
    pub file_path: PathBuf,

    /// Just the filename portion
    pub file_name: String,

    /// File size in bytes
    pub file_size: u64,

    /// Last modification time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified: Option<DateTime<Local>>,

    /// Image width in pixels
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,

    /// Image height in pixels
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,

    /// Detected format ("jpeg", "png", ...)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    /// EXIF data if available
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exif: Option<ExifData>,

    /// Resolved place for the GPS coordinate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub place: Option<Place>,

    /// Why the file could not be read as an image. `Some` marks the record
    /// as unreadable; the other image fields are then best-effort.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unreadable: Option<String>,
}

impl PhotoRecord {
    /// Create a record with only the path filled in.
    pub fn new(file_path: PathBuf) -> Self {
        let file_name = file_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown")
            .to_string();
        Self {
            file_path,
            file_name,
            file_size: 0,
            modified: None,
            width: None,
            height: None,
            format: None,
            exif: None,
            place: None,
            unreadable: None,
        }
    }

    /// Whether the file decoded as an image.
    pub fn is_readable(&self) -> bool {
        self.unreadable.is_none()
    }

    /// GPS coordinate from EXIF, if both halves are present.
    pub fn gps(&self) -> Option<GpsCoordinate> {
        self.exif.as_ref().and_then(ExifData::gps)
    }
}

/// EXIF metadata extracted from an image.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ExifData {
    /// When the photo was captured, as written by the camera
    #[serde(skip_serializing_if = "Option::is_none")]
    pub captured_at: Option<String>,

    /// Camera manufacturer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub camera_make: Option<String>,

    /// Camera model
    #[serde(skip_serializing_if = "Option::is_none")]
    pub camera_model: Option<String>,

    /// GPS latitude (decimal degrees, south negative)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gps_latitude: Option<f64>,

    /// GPS longitude (decimal degrees, west negative)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gps_longitude: Option<f64>,
}

impl ExifData {
    /// Both coordinates, or nothing.
    pub fn gps(&self) -> Option<GpsCoordinate> {
        match (self.gps_latitude, self.gps_longitude) {
            (Some(latitude), Some(longitude)) => Some(GpsCoordinate {
                latitude,
                longitude,
            }),
            _ => None,
        }
    }
}

/// A signed decimal latitude/longitude pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GpsCoordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl GpsCoordinate {
    /// Finite and within the WGS84 range.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// A reverse-geocoded place name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    /// Nearest populated place
    pub name: String,

    /// First-level administrative region (state, province...)
    pub region: String,

    /// ISO 3166-1 alpha-2 country code
    pub country_code: String,
}

impl std::fmt::Display for Place {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<&str> = [
            self.name.as_str(),
            self.region.as_str(),
            self.country_code.as_str(),
        ]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect();
        write!(f, "{}", parts.join(", "))
    }
}

/// Output of tagging one photo.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaggedPhoto {
    /// Path to the source file
    pub file_path: PathBuf,

    /// Keywords, most relevant first
    pub tags: TagList,

    /// Whether the tags came from the cache instead of the API
    pub cached: bool,
}

/// Tallies for a multi-photo tagging run.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TaggingStats {
    /// Photos tagged through the API
    pub tagged: usize,

    /// Photos answered from the cache
    pub cache_hits: usize,

    /// Photos that failed
    pub failed: usize,
}

impl TaggingStats {
    /// Total photos seen.
    pub fn total(&self) -> usize {
        self.tagged + self.cache_hits + self.failed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_file_name() {
        let record = PhotoRecord::new(PathBuf::from("/photos/beach.jpg"));
        assert_eq!(record.file_name, "beach.jpg");
        assert!(record.is_readable());
        assert!(record.gps().is_none());
    }

    #[test]
    fn test_record_json_skips_absent_fields() {
        let mut record = PhotoRecord::new(PathBuf::from("/photos/bad.jpg"));
        record.unreadable = Some("truncated".to_string());
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"unreadable\":\"truncated\""));
        assert!(!json.contains("width"));
        assert!(!json.contains("place"));
    }

    #[test]
    fn test_exif_gps_requires_both_halves() {
        let exif = ExifData {
            gps_latitude: Some(43.7),
            ..Default::default()
        };
        assert!(exif.gps().is_none());

        let exif = ExifData {
            gps_latitude: Some(43.7),
            gps_longitude: Some(7.26),
            ..Default::default()
        };
        assert_eq!(
            exif.gps(),
            Some(GpsCoordinate {
                latitude: 43.7,
                longitude: 7.26
            })
        );
    }

    #[test]
    fn test_coordinate_validity() {
        assert!(GpsCoordinate {
            latitude: -33.9,
            longitude: 151.2
        }
        .is_valid());
        assert!(!GpsCoordinate {
            latitude: 91.0,
            longitude: 0.0
        }
        .is_valid());
        assert!(!GpsCoordinate {
            latitude: f64::NAN,
            longitude: 0.0
        }
        .is_valid());
    }

    #[test]
    fn test_place_display_skips_empty_parts() {
        let place = Place {
            name: "Nice".to_string(),
            region: "Provence-Alpes-Cote d'Azur".to_string(),
            country_code: "FR".to_string(),
        };
        assert_eq!(place.to_string(), "Nice, Provence-Alpes-Cote d'Azur, FR");

        let place = Place {
            name: "Atlantis".to_string(),
            region: String::new(),
            country_code: String::new(),
        };
        assert_eq!(place.to_string(), "Atlantis");
    }

    #[test]
    fn test_stats_total() {
        let stats = TaggingStats {
            tagged: 2,
            cache_hits: 3,
            failed: 1,
        };
        assert_eq!(stats.total(), 6);
    }
}
