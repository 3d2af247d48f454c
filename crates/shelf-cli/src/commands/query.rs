use std::path::PathBuf;

use clap::Parser;
use comfy_table::{ContentArrangement, Table, presets::UTF8_FULL_CONDENSED};
use shelf::config::Config;
use shelf::index::{IndexedItem, TagQuery};
use shelf::{Kind, Relevance, Scope, Trust, Volatility};

use super::replay_script;
use crate::error::CliResult;
use crate::output::{OutputFormat, single_line, truncate_string};

#[derive(Parser)]
pub struct QueryCommand {
    #[clap(help = "Path to a session script (TOML)")]
    pub script: PathBuf,

    #[clap(long, help = "Filter by kind (source-code, config, test, docs, ...)")]
    pub kind: Option<Kind>,

    #[clap(long, help = "Filter by relevance (critical, useful, ambient, noise)")]
    pub relevance: Option<Relevance>,

    #[clap(long, help = "Filter by volatility (static, stale-risk, live, ephemeral)")]
    pub volatility: Option<Volatility>,

    #[clap(long, help = "Filter by scope (this-function, this-file, ...)")]
    pub scope: Option<Scope>,

    #[clap(long, help = "Filter by trust (verified, reported, inferred, stale)")]
    pub trust: Option<Trust>,

    #[clap(
        long,
        help = "Items that may be outdated (stale trust or stale-risk volatility)",
        conflicts_with_all = ["kind", "relevance", "volatility", "scope", "trust", "critical", "source"]
    )]
    pub stale: bool,

    #[clap(
        long,
        help = "Items tagged critical",
        conflicts_with_all = ["kind", "relevance", "volatility", "scope", "trust", "source"]
    )]
    pub critical: bool,

    #[clap(
        long,
        help = "Items with this exact source label",
        conflicts_with_all = ["kind", "relevance", "volatility", "scope", "trust"]
    )]
    pub source: Option<String>,

    #[clap(long, short, default_value = "20", help = "Maximum number of items to display")]
    pub limit: usize,
}

impl QueryCommand {
    pub fn execute(&self, config: &Config, format: OutputFormat) -> CliResult<()> {
        let (session, _log) = replay_script(&self.script, config)?;
        let index = session.index();

        let mut items = if self.stale {
            index.stale()
        } else if self.critical {
            index.critical()
        } else if let Some(source) = &self.source {
            index.by_source(source)
        } else {
            index.query(&self.tag_query())
        };
        let total = items.len();
        items.truncate(self.limit);

        match format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&items)?);
            }
            OutputFormat::Table => {
                if items.is_empty() {
                    println!("No matching items.");
                    return Ok(());
                }
                print_items(&items);
                println!("\nShowing {} of {} matching items", items.len(), total);
            }
        }

        Ok(())
    }

    pub fn tag_query(&self) -> TagQuery {
        let mut query = TagQuery::new();
        if let Some(kind) = self.kind {
            query = query.kind(kind);
        }
        if let Some(relevance) = self.relevance {
            query = query.relevance(relevance);
        }
        if let Some(volatility) = self.volatility {
            query = query.volatility(volatility);
        }
        if let Some(scope) = self.scope {
            query = query.scope(scope);
        }
        if let Some(trust) = self.trust {
            query = query.trust(trust);
        }
        query
    }
}

fn print_items(items: &[&IndexedItem]) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(["Source", "Tokens", "Tag", "Content"]);

    for item in items {
        table.add_row([
            item.source.clone(),
            item.size.to_string(),
            item.tag.to_string(),
            truncate_string(&single_line(&item.content), 50),
        ]);
    }

    println!("{table}");
}
