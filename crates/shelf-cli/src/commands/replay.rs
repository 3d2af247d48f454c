use std::collections::BTreeMap;
use std::fmt::Display;
use std::path::PathBuf;

use clap::Parser;
use comfy_table::{ContentArrangement, Table, presets::UTF8_FULL_CONDENSED};
use shelf::config::Config;

use super::replay_script;
use crate::error::CliResult;
use crate::output::{OutputFormat, format_timestamp, single_line, truncate_string};

#[derive(Parser)]
pub struct ReplayCommand {
    #[clap(help = "Path to a session script (TOML)")]
    pub script: PathBuf,

    #[clap(long, short, help = "Also list every entry left on the shelf")]
    pub entries: bool,
}

impl ReplayCommand {
    pub fn execute(&self, config: &Config, format: OutputFormat) -> CliResult<()> {
        let (session, log) = replay_script(&self.script, config)?;
        let status = session.status();

        match format {
            OutputFormat::Json => {
                let mut output = serde_json::json!({
                    "replay": log,
                    "shelf": status.shelf,
                    "index": status.index,
                });
                if self.entries {
                    let entries: Vec<_> = session.shelf().entries().collect();
                    output["entries"] = serde_json::to_value(entries)?;
                }
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
            OutputFormat::Table => {
                println!("Shelf");
                println!("=====\n");

                let mut table = Table::new();
                table
                    .load_preset(UTF8_FULL_CONDENSED)
                    .set_content_arrangement(ContentArrangement::Dynamic)
                    .set_header(["Tier", "Entries", "Tokens"]);
                for usage in &status.shelf.tiers {
                    table.add_row([
                        usage.tier.to_string(),
                        usage.count.to_string(),
                        usage.size.to_string(),
                    ]);
                }
                println!("{table}\n");
                println!(
                    "Used: {} / {} tokens ({:.1}%), {} remaining\n",
                    status.shelf.used,
                    status.shelf.capacity,
                    status.shelf.utilization * 100.0,
                    status.shelf.remaining
                );

                if self.entries && !session.shelf().is_empty() {
                    let mut table = Table::new();
                    table
                        .load_preset(UTF8_FULL_CONDENSED)
                        .set_content_arrangement(ContentArrangement::Dynamic)
                        .set_header(["ID", "Tier", "Source", "Tokens", "Accesses", "Last Access", "Content"]);
                    for entry in session.shelf().entries() {
                        table.add_row([
                            truncate_string(&entry.id.to_string(), 8),
                            entry.tier.to_string(),
                            entry.source.clone(),
                            entry.size.to_string(),
                            entry.access_count.to_string(),
                            format_timestamp(&entry.last_accessed),
                            truncate_string(&single_line(&entry.content), 40),
                        ]);
                    }
                    println!("{table}\n");
                }

                println!("Index");
                println!("=====\n");

                let index = &status.index;
                let mut table = Table::new();
                table
                    .load_preset(UTF8_FULL_CONDENSED)
                    .set_content_arrangement(ContentArrangement::Dynamic)
                    .set_header(["Dimension", "Value", "Tokens"]);
                add_dimension_rows(&mut table, "kind", &index.by_kind);
                add_dimension_rows(&mut table, "relevance", &index.by_relevance);
                add_dimension_rows(&mut table, "volatility", &index.by_volatility);
                add_dimension_rows(&mut table, "scope", &index.by_scope);
                add_dimension_rows(&mut table, "trust", &index.by_trust);
                println!("{table}\n");
                println!(
                    "Total: {} items ({} tokens)",
                    index.total_items, index.total_size
                );

                println!(
                    "\nReplay: {} applied, {} rejected, {} auto-compressions, {} tokens freed",
                    log.applied,
                    log.rejected.len(),
                    log.auto_compressions,
                    log.freed
                );
                for rejected in &log.rejected {
                    println!("  step {}: {}", rejected.step, rejected.reason);
                }
            }
        }

        Ok(())
    }
}

fn add_dimension_rows<K: Display>(table: &mut Table, dimension: &str, values: &BTreeMap<K, usize>) {
    for (value, size) in values {
        table.add_row([dimension.to_string(), value.to_string(), size.to_string()]);
    }
}
