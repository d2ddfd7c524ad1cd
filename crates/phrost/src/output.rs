use std::io::IsTerminal;

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use phrost_pack::{catalog, channel_name, DecodedEvent, Layout, Unpacked};
use serde::Serialize;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

/// Decoded events from one blob, plus where they came from.
pub struct EventBatch<'a> {
    pub frame: Option<u64>,
    pub dt: Option<f64>,
    pub channel: Option<u32>,
    pub payload_size: usize,
    pub unpacked: &'a Unpacked,
}

#[derive(Serialize)]
struct BatchOutput<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    frame: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    dt: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    channel: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    channel_name: Option<&'static str>,
    payload_size: usize,
    declared: u32,
    events: &'a [DecodedEvent],
    #[serde(skip_serializing_if = "Option::is_none")]
    halted: Option<String>,
}

pub fn print_batch(batch: &EventBatch<'_>, format: OutputFormat) {
    let unpacked = batch.unpacked;
    match format {
        OutputFormat::Json => {
            let out = BatchOutput {
                frame: batch.frame,
                dt: batch.dt,
                channel: batch.channel,
                channel_name: batch.channel.map(channel_name),
                payload_size: batch.payload_size,
                declared: unpacked.declared,
                events: &unpacked.events,
                halted: unpacked.halted.as_ref().map(ToString::to_string),
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            println!("{}", batch_heading(batch));
            if !unpacked.events.is_empty() {
                let mut table = Table::new();
                table
                    .load_preset(UTF8_FULL)
                    .set_content_arrangement(ContentArrangement::Dynamic)
                    .set_header(vec!["CODE", "KIND", "FIELDS"]);
                for event in &unpacked.events {
                    table.add_row(vec![
                        event.kind.code().to_string(),
                        event.kind.name().to_string(),
                        field_list(event),
                    ]);
                }
                println!("{table}");
            }
            if let Some(err) = &unpacked.halted {
                println!("halted: {err}");
            }
        }
        OutputFormat::Pretty => {
            println!("{}", batch_heading(batch));
            for event in &unpacked.events {
                println!(
                    "  {} ({}) {}",
                    event.kind.name(),
                    event.kind.code(),
                    field_list(event)
                );
            }
            if let Some(err) = &unpacked.halted {
                println!("  halted: {err}");
            }
        }
    }
}

fn batch_heading(batch: &EventBatch<'_>) -> String {
    let mut parts = Vec::new();
    if let Some(frame) = batch.frame {
        parts.push(format!("frame={frame}"));
    }
    if let Some(dt) = batch.dt {
        parts.push(format!("dt={dt}"));
    }
    if let Some(channel) = batch.channel {
        parts.push(format!("channel={channel} ({})", channel_name(channel)));
    }
    parts.push(format!("size={}", batch.payload_size));
    parts.push(format!(
        "events={}/{}",
        batch.unpacked.events.len(),
        batch.unpacked.declared
    ));
    parts.join(" ")
}

fn field_list(event: &DecodedEvent) -> String {
    event
        .fields
        .iter()
        .map(|(name, value)| format!("{name}={value}"))
        .collect::<Vec<_>>()
        .join(" ")
}

#[derive(Serialize)]
struct CatalogEntry {
    code: u32,
    name: &'static str,
    #[serde(flatten)]
    layout: &'static Layout,
    min_size: usize,
}

pub fn print_catalog(format: OutputFormat) {
    let entries: Vec<CatalogEntry> = catalog::entries()
        .map(|(kind, layout)| CatalogEntry {
            code: kind.code(),
            name: kind.name(),
            layout,
            min_size: layout.size(),
        })
        .collect();

    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string(&entries).unwrap_or_else(|_| "[]".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["CODE", "KIND", "LAYOUT", "SIZE", "ARGUMENTS"]);
            for entry in &entries {
                table.add_row(vec![
                    entry.code.to_string(),
                    entry.name.to_string(),
                    layout_label(entry.layout).to_string(),
                    size_label(entry.layout),
                    entry.layout.arg_names().collect::<Vec<_>>().join(", "),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            for entry in &entries {
                println!(
                    "{:>5} {:<28} {:<8} {}",
                    entry.code,
                    entry.name,
                    layout_label(entry.layout),
                    size_label(entry.layout)
                );
            }
        }
    }
}

fn layout_label(layout: &Layout) -> &'static str {
    if layout.is_variable() {
        "variable"
    } else {
        "fixed"
    }
}

fn size_label(layout: &Layout) -> String {
    if layout.is_variable() {
        format!("{}+N", layout.size())
    } else {
        layout.size().to_string()
    }
}
