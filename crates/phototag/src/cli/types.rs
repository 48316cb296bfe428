//! CLI enum types: report formats and image detail level.

use clap::ValueEnum;
use phototag_core::{Detail, OutputFormat as CoreOutputFormat};

/// Output formats for `inspect`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Aligned, human-readable table
    Table,
    /// Single JSON array
    Json,
    /// One JSON object per line (newline-delimited)
    Jsonl,
}

/// Output formats for `tag`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum TagFormat {
    /// Comma-separated keywords per photo
    Text,
    /// Single JSON array
    Json,
    /// One JSON object per line (newline-delimited)
    Jsonl,
}

/// Maps a machine-readable format onto the core writer; `None` for human output.
pub trait MachineFormat {
    fn machine_format(self) -> Option<CoreOutputFormat>;
}

impl MachineFormat for ReportFormat {
    fn machine_format(self) -> Option<CoreOutputFormat> {
        match self {
            ReportFormat::Table => None,
            ReportFormat::Json => Some(CoreOutputFormat::Json),
            ReportFormat::Jsonl => Some(CoreOutputFormat::JsonLines),
        }
    }
}

impl MachineFormat for TagFormat {
    fn machine_format(self) -> Option<CoreOutputFormat> {
        match self {
            TagFormat::Text => None,
            TagFormat::Json => Some(CoreOutputFormat::Json),
            TagFormat::Jsonl => Some(CoreOutputFormat::JsonLines),
        }
    }
}

/// Image detail level sent to the vision API.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum DetailArg {
    /// Cheaper and faster, low-resolution view
    Low,
    /// Full-resolution view (default)
    High,
    /// Let the API decide
    Auto,
}

impl From<DetailArg> for Detail {
    fn from(arg: DetailArg) -> Self {
        match arg {
            DetailArg::Low => Detail::Low,
            DetailArg::High => Detail::High,
            DetailArg::Auto => Detail::Auto,
        }
    }
}
