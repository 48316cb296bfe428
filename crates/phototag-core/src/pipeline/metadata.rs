//! EXIF metadata extraction from images.

use exif::{In, Reader, Tag, Value};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::types::ExifData;

/// Extracts EXIF metadata from image files.
pub struct MetadataExtractor;

impl MetadataExtractor {
    /// Extract EXIF data from an image file.
    ///
    /// Returns `None` if the file has no EXIF data or if extraction fails.
    /// Partial data is returned when only some fields are present.
    pub fn extract(path: &Path) -> Option<ExifData> {
        let file = File::open(path).ok()?;
        let mut reader = BufReader::new(file);
        let exif = match Reader::new().read_from_container(&mut reader) {
            Ok(exif) => exif,
            Err(e) => {
                tracing::trace!("No EXIF in {:?}: {e}", path);
                return None;
            }
        };

        let data = ExifData {
            captured_at: Self::get_datetime(&exif),
            camera_make: Self::get_string(&exif, Tag::Make),
            camera_model: Self::get_string(&exif, Tag::Model),
            gps_latitude: Self::get_gps_coord(&exif, Tag::GPSLatitude, Tag::GPSLatitudeRef),
            gps_longitude: Self::get_gps_coord(&exif, Tag::GPSLongitude, Tag::GPSLongitudeRef),
        };

        if data == ExifData::default() {
            None
        } else {
            Some(data)
        }
    }

    /// Get a string field from EXIF data.
    fn get_string(exif: &exif::Exif, tag: Tag) -> Option<String> {
        exif.get_field(tag, In::PRIMARY)
            .map(|f| {
                let s = f.display_value().to_string();
                s.trim_matches('"').trim().to_string()
            })
            .filter(|s| !s.is_empty())
    }

    /// Get the capture datetime, preferring DateTimeOriginal over DateTime.
    fn get_datetime(exif: &exif::Exif) -> Option<String> {
        exif.get_field(Tag::DateTimeOriginal, In::PRIMARY)
            .or_else(|| exif.get_field(Tag::DateTime, In::PRIMARY))
            .map(|f| {
                let s = f.display_value().to_string();
                s.trim_matches('"').to_string()
            })
    }

    /// Get GPS coordinate, converting from degrees/minutes/seconds to decimal.
    ///
    /// A missing reference tag is read as north/east.
    fn get_gps_coord(exif: &exif::Exif, coord_tag: Tag, ref_tag: Tag) -> Option<f64> {
        let coord = exif.get_field(coord_tag, In::PRIMARY)?;
        let degrees = Self::parse_gps_rationals(&coord.value)?;

        let negative = exif
            .get_field(ref_tag, In::PRIMARY)
            .map(|r| {
                let ref_str = r.display_value().to_string();
                ref_str.contains('S') || ref_str.contains('W')
            })
            .unwrap_or(false);

        Some(if negative { -degrees } else { degrees })
    }

    /// Parse GPS rationals (degrees, minutes, seconds) to decimal degrees.
    ///
    /// Zero denominators yield `None` rather than infinities.
    pub(crate) fn parse_gps_rationals(value: &Value) -> Option<f64> {
        match value {
            Value::Rational(rationals) if rationals.len() >= 3 => {
                if rationals[..3].iter().any(|r| r.denom == 0) {
                    return None;
                }
                let degrees = rationals[0].to_f64();
                let minutes = rationals[1].to_f64();
                let seconds = rationals[2].to_f64();
                Some(degrees + minutes / 60.0 + seconds / 3600.0)
            }
            _ => None,
        }
    }
}
