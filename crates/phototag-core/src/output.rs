//! Streaming JSON and JSONL output.
//!
//! Records are written as they are produced, so a directory scan never has to
//! be collected in memory before printing. In JSON mode the writer emits a
//! single array and must be closed with [`OutputWriter::finish`].

use serde::Serialize;
use std::io::{self, Write};

/// Machine-readable output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// One JSON array holding every record
    Json,
    /// One JSON object per line (newline-delimited JSON)
    JsonLines,
}

/// Serializes a stream of records to a writer.
pub struct OutputWriter<W: Write> {
    writer: W,
    format: OutputFormat,
    pretty: bool,
    items_written: usize,
}

impl<W: Write> OutputWriter<W> {
    /// `pretty` only affects JSON; JSONL is always one compact object per line.
    pub fn new(writer: W, format: OutputFormat, pretty: bool) -> Self {
        Self {
            writer,
            format,
            pretty,
            items_written: 0,
        }
    }

    /// Append one record.
    pub fn write<T: Serialize>(&mut self, item: &T) -> io::Result<()> {
        match self.format {
            OutputFormat::Json => {
                let sep = if self.items_written == 0 { "[" } else { "," };
                if self.pretty {
                    writeln!(self.writer, "{sep}")?;
                    let body = serde_json::to_string_pretty(item).map_err(io::Error::other)?;
                    for line in body.lines() {
                        writeln!(self.writer, "  {line}")?;
                    }
                } else {
                    write!(self.writer, "{sep}")?;
                    serde_json::to_writer(&mut self.writer, item).map_err(io::Error::other)?;
                }
            }
            OutputFormat::JsonLines => {
                serde_json::to_writer(&mut self.writer, item).map_err(io::Error::other)?;
                writeln!(self.writer)?;
            }
        }
        self.items_written += 1;
        Ok(())
    }

    /// Number of records written so far.
    pub fn items_written(&self) -> usize {
        self.items_written
    }

    /// Close the JSON array (an empty stream becomes `[]`), flush, and hand
    /// back the underlying writer.
    pub fn finish(mut self) -> io::Result<W> {
        if self.format == OutputFormat::Json {
            if self.items_written == 0 {
                writeln!(self.writer, "[]")?;
            } else {
                writeln!(self.writer, "]")?;
            }
        }
        self.writer.flush()?;
        Ok(self.writer)
    }
}
