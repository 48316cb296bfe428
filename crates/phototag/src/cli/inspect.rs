//! The `phototag inspect` command: a metadata report for a folder of photos.

use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use console::style;
use phototag_core::{Config, Inspector, OutputWriter, PhotoRecord};

use super::types::{MachineFormat, ReportFormat};

/// Arguments for the `inspect` command.
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Directory containing photos
    pub directory: PathBuf,

    /// Descend into subdirectories
    #[arg(short, long)]
    pub recursive: bool,

    /// Skip resolving GPS coordinates to place names
    #[arg(long)]
    pub no_geocode: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: ReportFormat,
}

const NAME_WIDTH: usize = 40;
const LOCATION_WIDTH: usize = 32;

/// Execute the inspect command.
///
/// Unreadable files are reported in the listing and do not affect the exit
/// status; only a missing or non-directory root fails.
pub fn execute(args: InspectArgs, config: &Config) -> anyhow::Result<()> {
    let mut inspector = Inspector::new(&config.scan);
    inspector.set_reverse_geocode(config.scan.reverse_geocode && !args.no_geocode);
    let recursive = args.recursive || config.scan.recursive;

    let records = inspector
        .scan(&args.directory, recursive)
        .with_context(|| format!("Cannot inspect {}", args.directory.display()))?;

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    let (total, unreadable) = match args.format.machine_format() {
        Some(format) => {
            let mut writer = OutputWriter::new(out, format, true);
            let mut unreadable = 0;
            for record in records {
                if !record.is_readable() {
                    unreadable += 1;
                }
                writer.write(&record)?;
            }
            let total = writer.items_written();
            writer.finish()?;
            (total, unreadable)
        }
        None => {
            let (total, unreadable) = write_table(&mut out, records)?;
            if total == 0 {
                writeln!(out, "No photos found in {}", args.directory.display())?;
            }
            out.flush()?;
            (total, unreadable)
        }
    };

    tracing::info!("Inspected {total} photo(s), {unreadable} unreadable");
    Ok(())
}

/// Stream records as an aligned table. Returns (total, unreadable) counts.
fn write_table<W: Write>(
    out: &mut W,
    records: impl Iterator<Item = PhotoRecord>,
) -> io::Result<(usize, usize)> {
    let mut total = 0;
    let mut unreadable = 0;

    for record in records {
        if total == 0 {
            let header = header_line();
            writeln!(out, "{}", style(&header).bold())?;
            writeln!(out, "{}", "─".repeat(header.chars().count()))?;
        }
        total += 1;

        let row = format_row(&record);
        if record.is_readable() {
            writeln!(out, "{row}")?;
        } else {
            unreadable += 1;
            writeln!(out, "{}", style(row).yellow())?;
        }
    }

    Ok((total, unreadable))
}

fn header_line() -> String {
    format!(
        "{:NAME_WIDTH$} {:>10} {:>12} {:>8} {:>5} {:>LOCATION_WIDTH$} {:>17}",
        "File name", "Size", "Dimensions", "Format", "GPS", "Location", "Modified"
    )
}

fn format_row(record: &PhotoRecord) -> String {
    let dims = format!(
        "{}×{}",
        record.width.map_or("?".to_string(), |w| w.to_string()),
        record.height.map_or("?".to_string(), |h| h.to_string()),
    );
    let gps = if record.gps().is_some() { "yes" } else { "no" };
    let location = match (&record.unreadable, &record.place) {
        (Some(reason), _) => format!("unreadable: {reason}"),
        (None, Some(place)) => place.to_string(),
        (None, None) => String::new(),
    };
    let modified = record
        .modified
        .map(|m| m.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "Unknown".to_string());

    format!(
        "{:NAME_WIDTH$} {:>10} {:>12} {:>8} {:>5} {:>LOCATION_WIDTH$} {:>17}",
        truncate(&record.file_name, NAME_WIDTH),
        format_size(record.file_size),
        dims,
        truncate(record.format.as_deref().unwrap_or("?"), 8),
        gps,
        truncate(&location, LOCATION_WIDTH),
        modified,
    )
}

fn format_size(bytes: u64) -> String {
    format!("{:.1} KB", bytes as f64 / 1024.0)
}

/// Cut to `width` characters, marking the cut with an ellipsis.
fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        return s.to_string();
    }
    let mut cut: String = s.chars().take(width.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

#[cfg(test)]
mod tests {
    use super::*;
    use phototag_core::{ExifData, Place};

    fn record(name: &str) -> PhotoRecord {
        let mut r = PhotoRecord::new(PathBuf::from(format!("/photos/{name}")));
        r.file_size = 2048;
        r.width = Some(640);
        r.height = Some(480);
        r.format = Some("jpeg".to_string());
        r
    }

    #[test]
    fn test_row_aligns_with_header() {
        let row = format_row(&record("a.jpg"));
        assert_eq!(row.chars().count(), header_line().chars().count());
        assert!(row.contains("640×480"));
        assert!(row.contains("2.0 KB"));
        assert!(row.contains("Unknown"));
    }

    #[test]
    fn test_row_with_place() {
        let mut r = record("paris.jpg");
        r.exif = Some(ExifData {
            gps_latitude: Some(48.85),
            gps_longitude: Some(2.35),
            ..ExifData::default()
        });
        r.place = Some(Place {
            name: "Paris".to_string(),
            region: "Ile-de-France".to_string(),
            country_code: "FR".to_string(),
        });
        let row = format_row(&r);
        assert!(row.contains("yes"));
        assert!(row.contains("Paris, Ile-de-France, FR"));
        assert_eq!(row.chars().count(), header_line().chars().count());
    }

    #[test]
    fn test_header_has_no_country_name_column() {
        // Places carry an ISO code, not a country name; it is shown inside Location.
        let header = header_line();
        assert!(!header.contains("Country"));
        assert!(header.contains("Location"));
    }

    #[test]
    fn test_unreadable_row() {
        let mut r = PhotoRecord::new(PathBuf::from("/photos/broken.jpg"));
        r.unreadable = Some("corrupt header".to_string());
        let row = format_row(&r);
        assert!(row.contains("?×?"));
        assert!(row.contains("unreadable: corrupt"));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghij", 5), "abcd…");
        assert_eq!(truncate("日本語の写真", 4).chars().count(), 4);
    }

    #[test]
    fn test_table_counts_and_empty_scan() {
        let mut bad = record("b.jpg");
        bad.unreadable = Some("bad".to_string());
        let mut out = Vec::new();
        let (total, unreadable) =
            write_table(&mut out, vec![record("a.jpg"), bad].into_iter()).unwrap();
        assert_eq!((total, unreadable), (2, 1));
        // header, rule, two rows
        assert_eq!(String::from_utf8(out).unwrap().lines().count(), 4);

        let mut out = Vec::new();
        assert_eq!(write_table(&mut out, std::iter::empty()).unwrap(), (0, 0));
        assert!(out.is_empty());
    }

    #[test]
    fn test_execute_empty_directory_succeeds() {
        let dir = tempfile::tempdir().unwrap();
        let args = InspectArgs {
            directory: dir.path().to_path_buf(),
            recursive: false,
            no_geocode: true,
            format: ReportFormat::Jsonl,
        };
        assert!(execute(args, &Config::default()).is_ok());
    }

    #[test]
    fn test_execute_missing_directory_fails() {
        let args = InspectArgs {
            directory: PathBuf::from("/definitely/not/here"),
            recursive: false,
            no_geocode: true,
            format: ReportFormat::Table,
        };
        assert!(execute(args, &Config::default()).is_err());
    }
}
