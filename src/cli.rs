use std::io::Write;

use clap::Parser;

use crate::config::SourceMode;
use crate::error::{AppError, Result};
use crate::feed::{visible, Aggregator};
use crate::models::{Entry, KindFilter};
use crate::store::RecordStore;

const WRAP_WIDTH: usize = 80;

/// Read public diary summaries and novel chapters.
#[derive(Debug, Parser)]
#[command(name = "diary-reader", version, about)]
pub struct Cli {
    /// Print the feed and exit instead of opening the reader
    #[arg(long)]
    pub list: bool,

    /// Only list entries whose title, content or tags contain TEXT
    #[arg(long, value_name = "TEXT", default_value = "")]
    pub search: String,

    /// Only list entries of this kind: all, summary or novel
    #[arg(long, value_name = "KIND", default_value = "all")]
    pub kind: KindFilter,

    /// Print one entry in full and exit
    #[arg(long, value_name = "ID", conflicts_with = "list")]
    pub show: Option<String>,
}

impl Cli {
    pub fn is_headless(&self) -> bool {
        self.list || self.show.is_some()
    }
}

/// Runs one aggregation and prints the result instead of starting the reader.
pub async fn run_headless<S, W>(cli: &Cli, aggregator: &Aggregator<S>, out: &mut W) -> Result<()>
where
    S: RecordStore,
    W: Write,
{
    let entries = aggregator.fetch_all().await?;

    if let Some(id) = &cli.show {
        // Ids are only unique per collection, so every match is printed.
        let matches: Vec<&Entry> = entries.iter().filter(|e| &e.id == id).collect();
        if matches.is_empty() {
            return Err(AppError::Other(anyhow::anyhow!("No entry with id {id}")));
        }
        for (i, entry) in matches.into_iter().enumerate() {
            if i > 0 {
                writeln!(out)?;
            }
            write!(out, "{}", format_detail(entry, WRAP_WIDTH))?;
        }
        return Ok(());
    }

    let kind = match aggregator.mode() {
        SourceMode::Dual => cli.kind,
        SourceMode::Single => KindFilter::All,
    };

    for entry in visible(&entries, &cli.search, kind) {
        writeln!(out, "{}", format_list_line(entry))?;
    }

    Ok(())
}

pub fn format_list_line(entry: &Entry) -> String {
    let mut line = format!(
        "{}  {:<7} {:<12} {}",
        entry.display_date(),
        format!("[{}]", entry.source.label()),
        entry.id,
        entry.title
    );

    let tags = entry.display_tags(Some(2));
    if !tags.is_empty() {
        line.push_str("  ");
        line.push_str(&tags.join(" "));
    }

    line
}

pub fn format_detail(entry: &Entry, width: usize) -> String {
    let mut text = format!(
        "{}  [{}]\n{}\n\n{}\n",
        entry.display_date(),
        entry.source.label(),
        entry.title,
        textwrap::fill(&entry.content, width)
    );

    let tags = entry.display_tags(None);
    if !tags.is_empty() {
        text.push('\n');
        text.push_str(&tags.join(" "));
        text.push('\n');
    }

    text
}
