pub mod config;
pub mod query;
pub mod replay;

pub use config::ConfigCommand;
pub use query::QueryCommand;
pub use replay::ReplayCommand;

use std::path::Path;

use shelf::ContextSession;
use shelf::config::Config;

use crate::error::CliResult;
use crate::script::{ReplayLog, Script};

/// Build a fresh session from `config` and replay the script at `path` into it
pub fn replay_script(path: &Path, config: &Config) -> CliResult<(ContextSession, ReplayLog)> {
    let script = Script::from_file(path)?;
    let mut session = ContextSession::new(config);
    let log = script.replay(&mut session)?;
    Ok((session, log))
}
