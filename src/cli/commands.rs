use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use serde_json::Value;

use crate::accessor::history_duration_ms;
use crate::config::Config;
use crate::filters::{
    SortDirection, SortSpec, apply_filters, display_field_values, parse_filter, record_display_name,
    record_summary, should_display_item, sort_records,
};
use crate::logging;
use crate::models::{ActorType, EntryType, ParsedDiffFile, TimelineEntry};
use crate::normalizer::normalize;
use crate::parsers::jsonl::{ERROR_KEY, WARNING_KEY};
use crate::parsers::{is_placeholder, parse_jsonl_file, parse_unified_diff};
use crate::utils::{
    format_duration, is_jsonl_path, read_to_string_limited, single_line, strip_ansi_codes,
};

/// Widest title printed on one timeline line
const TITLE_WIDTH: usize = 100;

#[derive(Parser)]
#[command(name = "trajectory-viewer")]
#[command(version = "0.1.0")]
#[command(
    about = "Inspect AI agent trajectories, JSONL result batches and git patches",
    long_about = None
)]
pub struct Cli {
    /// Config file to use instead of the default location
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the normalized timeline of a trajectory
    Timeline {
        /// Trajectory file (.json, or .jsonl with --record)
        file: PathBuf,

        /// Filter query, e.g. "type:edit actor:assistant"
        #[arg(long)]
        filter: Option<String>,

        /// Print entries as JSON
        #[arg(long)]
        json: bool,

        /// 1-based record number in a JSONL file
        #[arg(long, default_value_t = 1)]
        record: usize,
    },

    /// List the records of a JSONL file
    Records {
        file: PathBuf,

        /// Sort key: a dotted path, `duration` or `len(<path>)`
        #[arg(long, value_name = "FIELD")]
        sort_by: Option<String>,

        /// Sort in descending order
        #[arg(long)]
        desc: bool,

        /// Comma-separated paths to show for each record
        #[arg(long, value_delimiter = ',')]
        fields: Vec<String>,
    },

    /// Show the files and hunks of a patch
    Diff {
        /// Patch file, or a .json/.jsonl trajectory with test_result.git_patch
        file: PathBuf,

        /// Print the reconstructed old side of every file
        #[arg(long, conflicts_with = "new")]
        old: bool,

        /// Print the reconstructed new side of every file
        #[arg(long)]
        new: bool,

        /// 1-based record number in a JSONL file
        #[arg(long, default_value_t = 1)]
        record: usize,
    },

    /// Count timeline entries by type and actor
    Stats {
        file: PathBuf,

        /// 1-based record number in a JSONL file
        #[arg(long, default_value_t = 1)]
        record: usize,
    },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    logging::init(&config.logging, cli.verbose);

    match &cli.command {
        Some(Commands::Timeline { file, filter, json, record }) => {
            show_timeline(&config, file, filter.as_deref(), *json, *record)?;
        }
        Some(Commands::Records { file, sort_by, desc, fields }) => {
            show_records(&config, file, sort_by.as_deref(), *desc, fields)?;
        }
        Some(Commands::Diff { file, old, new, record }) => {
            show_diff(&config, file, *old, *new, *record)?;
        }
        Some(Commands::Stats { file, record }) => {
            show_stats(&config, file, *record)?;
        }
        None => {
            println!("Use --help for usage information");
        }
    }

    Ok(())
}

/// Load one trajectory: the whole file for JSON, the chosen record for JSONL
fn load_trajectory(config: &Config, path: &Path, record: usize) -> Result<Value> {
    let max_bytes = config.limits.max_file_bytes;

    if !is_jsonl_path(path) {
        let content = read_to_string_limited(path, max_bytes)?;
        return serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse JSON: {}", path.display()));
    }

    let mut records = parse_jsonl_file(path, max_bytes)?;
    let total = records.len();
    if record == 0 || record > total {
        bail!("Record {} out of range ({} has {} records)", record, path.display(), total);
    }

    let selected = records.swap_remove(record - 1);
    if is_placeholder(&selected) {
        let reason = selected.get(ERROR_KEY).and_then(Value::as_str).unwrap_or_default();
        bail!("Record {} could not be parsed: {}", record, reason);
    }
    Ok(selected)
}

fn show_timeline(
    config: &Config,
    file: &Path,
    filter: Option<&str>,
    json: bool,
    record: usize,
) -> Result<()> {
    let trajectory = load_trajectory(config, file, record)?;
    let mut entries = normalize(&trajectory)?;

    if let Some(query) = filter {
        let expr = parse_filter(query).with_context(|| format!("Invalid filter: {}", query))?;
        entries = apply_filters(entries, &expr);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    for (index, entry) in entries.iter().enumerate() {
        print_entry(index + 1, entry);
    }
    Ok(())
}

fn print_entry(number: usize, entry: &TimelineEntry) {
    println!(
        "{:>4}  {}  {:<7}  {:<9}  {}",
        number,
        single_line(&entry.timestamp, 32),
        entry.entry_type.as_str(),
        entry.actor_type.as_str(),
        single_line(&entry.title, TITLE_WIDTH)
    );
    if let Some(command) = &entry.command {
        println!("      $ {}", single_line(command, TITLE_WIDTH));
    }
    if let Some(path) = &entry.path {
        println!("      path: {}", single_line(path, TITLE_WIDTH));
    }
}

fn show_records(
    config: &Config,
    file: &Path,
    sort_by: Option<&str>,
    desc: bool,
    fields: &[String],
) -> Result<()> {
    let mut records = parse_jsonl_file(file, config.limits.max_file_bytes)?;

    let mut spec: SortSpec = config.viewer.sort_spec();
    if let Some(field) = sort_by {
        spec = SortSpec::new(field, SortDirection::Asc);
    }
    if desc {
        spec.direction = SortDirection::Desc;
    }
    sort_records(&mut records, &spec);

    let fields = if fields.is_empty() { config.viewer.display_fields.as_slice() } else { fields };

    println!("{} records (sorted by {} {:?})", records.len(), spec.field, spec.direction);
    for (index, record) in records.iter().enumerate() {
        print_record(index, record, fields);
    }
    Ok(())
}

fn print_record(index: usize, record: &Value, fields: &[String]) {
    let name = single_line(&record_display_name(record, index), TITLE_WIDTH);

    if is_placeholder(record) {
        let reason = record.get(ERROR_KEY).and_then(Value::as_str).unwrap_or_default();
        println!("{}  [unreadable] {}", name, strip_ansi_codes(reason));
        return;
    }

    let history = record.get("history").and_then(Value::as_array);
    let shown = history
        .map(|items| items.iter().filter(|item| should_display_item(item)).count())
        .unwrap_or(0);
    let duration = history_duration_ms(record).filter(|ms| *ms > 0).map(format_duration);

    match duration {
        Some(duration) => println!("{}  ({} events, {})", name, shown, duration),
        None => println!("{}  ({} events)", name, shown),
    }

    if fields.is_empty() {
        println!("    {}", single_line(&record_summary(record), TITLE_WIDTH));
    } else {
        for (label, value) in display_field_values(record, fields) {
            let label = single_line(&label, TITLE_WIDTH);
            println!("    {}: {}", label, single_line(&value, TITLE_WIDTH));
        }
    }

    if let Some(warning) = record.get(WARNING_KEY).and_then(Value::as_str) {
        println!("    warning: {}", strip_ansi_codes(warning));
    }
}

/// Patch text from a raw diff file or a trajectory's `test_result.git_patch`
fn load_patch(config: &Config, file: &Path, record: usize) -> Result<String> {
    let extension = file.extension().and_then(|ext| ext.to_str());
    let is_json = extension.is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if !is_json && !is_jsonl_path(file) {
        return read_to_string_limited(file, config.limits.max_file_bytes);
    }

    let trajectory = load_trajectory(config, file, record)?;
    match trajectory.pointer("/test_result/git_patch").and_then(Value::as_str) {
        Some(patch) => Ok(patch.to_string()),
        None => bail!("No test_result.git_patch in {}", file.display()),
    }
}

fn show_diff(config: &Config, file: &Path, old: bool, new: bool, record: usize) -> Result<()> {
    let patch = load_patch(config, file, record)?;
    let files = parse_unified_diff(&patch);

    if files.is_empty() {
        println!("No file changes found");
        return Ok(());
    }

    for diff in &files {
        if old || new {
            println!("==> {} <==", strip_ansi_codes(&diff.new_path));
            let content = if old { diff.old_content() } else { diff.new_content() };
            print!("{}", strip_ansi_codes(&content));
        } else {
            print_diff_summary(diff);
        }
    }
    Ok(())
}

fn print_diff_summary(diff: &ParsedDiffFile) {
    let stats = diff.stats();
    let name = if diff.old_path == diff.new_path {
        strip_ansi_codes(&diff.new_path)
    } else {
        format!("{} -> {}", strip_ansi_codes(&diff.old_path), strip_ansi_codes(&diff.new_path))
    };

    println!("{}  +{} -{}  ({} hunks)", name, stats.added, stats.removed, diff.hunks.len());
    for hunk in &diff.hunks {
        println!(
            "    @@ -{},{} +{},{} @@",
            hunk.old_start, hunk.old_line_count, hunk.new_start, hunk.new_line_count
        );
    }
}

fn show_stats(config: &Config, file: &Path, record: usize) -> Result<()> {
    let trajectory = load_trajectory(config, file, record)?;
    let entries = normalize(&trajectory)?;

    let mut by_type: BTreeMap<&str, usize> = BTreeMap::new();
    let mut by_actor: BTreeMap<&str, usize> = BTreeMap::new();
    for entry in &entries {
        *by_type.entry(entry.entry_type.as_str()).or_default() += 1;
        *by_actor.entry(entry.actor_type.as_str()).or_default() += 1;
    }

    println!("Trajectory Statistics");
    println!("=====================");
    println!("Total entries: {}", entries.len());
    for entry_type in EntryType::ALL {
        let count = by_type.get(entry_type.as_str()).copied().unwrap_or(0);
        println!("  {}: {}", entry_type.as_str(), count);
    }
    println!();
    println!("By actor:");
    for actor in [ActorType::User, ActorType::Assistant, ActorType::System] {
        let count = by_actor.get(actor.as_str()).copied().unwrap_or(0);
        println!("  {}: {}", actor.as_str(), count);
    }

    if let Some(ms) = history_duration_ms(&trajectory).filter(|ms| *ms > 0) {
        println!();
        println!("Duration: {}", format_duration(ms));
    }

    Ok(())
}
