//! The `phototag tag` command: keyword generation with a persistent cache.

use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use phototag_core::pipeline::FileDiscovery;
use phototag_core::{
    CacheError, Config, OutputWriter, TagOptions, TaggedPhoto, Tagger, TaggingResult,
};

use super::types::{DetailArg, MachineFormat, TagFormat};

/// Arguments for the `tag` command.
#[derive(Args, Debug)]
pub struct TagArgs {
    /// Photo files or directories to tag
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Vision model to call
    #[arg(long)]
    pub model: Option<String>,

    /// Image detail level: low is cheaper and faster, high is more accurate
    #[arg(long, value_enum)]
    pub detail: Option<DetailArg>,

    /// Maximum number of keywords to request
    #[arg(long)]
    pub max_tags: Option<usize>,

    /// Ignore the tag cache (always call the API, store nothing)
    #[arg(long)]
    pub no_cache: bool,

    /// Tag cache file to use instead of the configured one
    #[arg(long, value_name = "FILE")]
    pub cache: Option<PathBuf>,

    /// Retries for rate limits, timeouts and server errors
    #[arg(long)]
    pub retries: Option<u32>,

    /// Descend into subdirectories of directory arguments
    #[arg(short, long)]
    pub recursive: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: TagFormat,
}

/// Execute the tag command.
///
/// The API key is resolved before any photo is read; a missing key aborts
/// immediately. Individual photo failures are reported and the remaining
/// photos still get tagged, but the command exits non-zero. So does a failure
/// to write the tag cache back.
pub async fn execute(args: TagArgs, mut config: Config) -> anyhow::Result<()> {
    apply_overrides(&args, &mut config)?;

    let mut tagger = Tagger::from_config(&config).context("Cannot start tagging")?;
    let options = TagOptions::from_config(&config.tagger);

    let photos = expand_paths(&args.paths, &config, args.recursive || config.scan.recursive);
    if photos.is_empty() {
        tracing::warn!("No supported photos found");
        return Ok(());
    }
    tracing::debug!(
        "Tagging {} photo(s) with {} (detail {}, cache {})",
        photos.len(),
        options.model,
        options.detail,
        if options.use_cache { "on" } else { "off" }
    );

    let progress = create_progress_bar(photos.len() as u64);
    let stdout = io::stdout();
    let out = BufWriter::new(stdout.lock());
    let mut sink = match args.format.machine_format() {
        Some(format) => Sink::Machine(OutputWriter::new(out, format, true)),
        None => Sink::Text(out),
    };
    let mut write_error: Option<io::Error> = None;

    let stats = tagger
        .tag_batch(&photos, &options, |path, result| {
            progress.inc(1);
            let written = progress.suspend(|| sink.emit(path, result));
            if let Err(e) = written {
                write_error.get_or_insert(e);
            }
        })
        .await;
    progress.finish_and_clear();

    sink.finish()?;
    if let Some(e) = write_error {
        return Err(e).context("Failed to write output");
    }

    let saved = check_cache_saved(tagger.save_cache(), tagger.cache().len());

    if photos.len() > 1 {
        eprintln!(
            "{} tagged, {} from cache, {} failed",
            stats.tagged, stats.cache_hits, stats.failed
        );
    }

    saved?;
    if stats.failed > 0 {
        anyhow::bail!("{} of {} photo(s) failed", stats.failed, stats.total());
    }
    Ok(())
}

/// Log the outcome of writing the tag cache back; a failed write is an error.
fn check_cache_saved(result: Result<bool, CacheError>, entries: usize) -> anyhow::Result<()> {
    match result {
        Ok(true) => tracing::debug!("Saved tag cache ({entries} entries)"),
        Ok(false) => {}
        Err(e) => {
            tracing::error!("Failed to save tag cache: {e}");
            return Err(e).context("New tags were not cached");
        }
    }
    Ok(())
}

/// Fold command-line flags into the loaded config.
fn apply_overrides(args: &TagArgs, config: &mut Config) -> anyhow::Result<()> {
    if let Some(model) = &args.model {
        config.tagger.model = model.clone();
    }
    if let Some(detail) = args.detail {
        config.tagger.detail = phototag_core::Detail::from(detail).to_string();
    }
    if let Some(max_tags) = args.max_tags {
        if max_tags == 0 {
            anyhow::bail!("--max-tags must be at least 1");
        }
        config.tagger.max_tags = max_tags;
    }
    if args.no_cache {
        config.tagger.use_cache = false;
    }
    if let Some(cache) = &args.cache {
        config.cache.path = cache.to_string_lossy().into_owned();
    }
    if let Some(retries) = args.retries {
        config.tagger.retry_attempts = retries;
    }
    Ok(())
}

/// Directories become their supported photos; files are kept as given so a
/// missing file is reported as a per-photo failure.
fn expand_paths(paths: &[PathBuf], config: &Config, recursive: bool) -> Vec<PathBuf> {
    let discovery = FileDiscovery::new(config.scan.clone());
    let mut photos = Vec::new();
    for path in paths {
        if path.is_dir() {
            let found = discovery.discover(path, recursive);
            if found.is_empty() {
                tracing::warn!("No supported photos in {}", path.display());
            }
            photos.extend(found);
        } else {
            photos.push(path.clone());
        }
    }
    photos
}

/// Where per-photo results go as they complete.
enum Sink<W: Write> {
    Text(W),
    Machine(OutputWriter<W>),
}

impl<W: Write> Sink<W> {
    fn emit(&mut self, path: &Path, result: &TaggingResult<TaggedPhoto>) -> io::Result<()> {
        let tagged = match result {
            Ok(tagged) => tagged,
            Err(e) => {
                eprintln!(
                    "{} {}: {e}",
                    style("✗").red().for_stderr(),
                    path.display()
                );
                return Ok(());
            }
        };

        match self {
            Sink::Machine(writer) => writer.write(tagged),
            Sink::Text(out) => {
                let name = path.file_name().unwrap_or(path.as_os_str()).to_string_lossy();
                let source = if tagged.cached { " (cached)" } else { "" };
                writeln!(out, "\nTags for {}{source}:", style(name).bold())?;
                writeln!(out, "{}", tagged.tags.join(", "))?;
                writeln!(out, "\nTotal: {} tags", tagged.tags.len())?;
                out.flush()
            }
        }
    }

    fn finish(self) -> io::Result<()> {
        match self {
            Sink::Machine(writer) => writer.finish().map(|_| ()),
            Sink::Text(mut out) => out.flush(),
        }
    }
}

/// Progress bar for multi-photo runs; hidden for a single photo.
fn create_progress_bar(total: u64) -> ProgressBar {
    if total <= 1 {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new(total);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("##-");
    pb.set_style(style);
    pb
}
