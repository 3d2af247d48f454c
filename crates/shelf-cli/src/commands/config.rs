use std::path::Path;

use clap::Parser;
use shelf::config::Config;

use crate::error::CliResult;
use crate::output::OutputFormat;

#[derive(Parser)]
pub struct ConfigCommand {
    #[clap(long, help = "List the locations searched for a config file")]
    pub paths: bool,
}

impl ConfigCommand {
    pub fn execute(&self, config_path: Option<&Path>, format: OutputFormat) -> CliResult<()> {
        if self.paths {
            return Self::show_paths(config_path, format);
        }

        let config = Config::load(config_path)?;
        match format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&config)?),
            OutputFormat::Table => print!("{}", toml::to_string_pretty(&config)?),
        }
        Ok(())
    }

    fn show_paths(config_path: Option<&Path>, format: OutputFormat) -> CliResult<()> {
        let paths = match config_path {
            Some(path) => vec![path.to_path_buf()],
            None => Config::default_paths(),
        };

        match format {
            OutputFormat::Json => {
                let output: Vec<_> = paths
                    .iter()
                    .map(|p| {
                        serde_json::json!({
                            "path": p.display().to_string(),
                            "exists": p.exists(),
                        })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
            OutputFormat::Table => {
                for path in &paths {
                    let marker = if path.exists() { "found" } else { "missing" };
                    println!("{:<8} {}", marker, path.display());
                }
            }
        }
        Ok(())
    }
}
