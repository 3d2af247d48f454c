pub mod commands;
pub mod error;
pub mod output;
pub mod script;

pub use commands::{ConfigCommand, QueryCommand, ReplayCommand};
pub use error::{CliError, CliResult};
pub use output::{OutputFormat, format_timestamp, truncate_string};
pub use script::{ReplayLog, Script, Step};
