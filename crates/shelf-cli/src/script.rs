//! Session scripts: a TOML list of shelf operations replayed in order
//!
//! ```toml
//! [[step]]
//! op = "feed"
//! source = "src/auth.rs"
//! content = "fn login() {}"
//! tier = "warm"
//!
//! [[step]]
//! op = "promote"
//! source = "src/auth.rs"
//! tier = "hot"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use shelf::session::SOURCE_TAG;
use shelf::{ContextSession, EntryId, Tier};
use tracing::{debug, warn};

use crate::error::CliResult;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum Step {
    Feed {
        content: String,
        source: String,
        #[serde(default = "default_feed_tier")]
        tier: Tier,
    },
    Retrieve {
        #[serde(default)]
        tier: Option<Tier>,
    },
    Compress {
        tier: Tier,
    },
    Promote {
        source: String,
        tier: Tier,
    },
    Demote {
        source: String,
        tier: Tier,
    },
}

fn default_feed_tier() -> Tier {
    Tier::Warm
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Script {
    #[serde(default, rename = "step")]
    pub steps: Vec<Step>,
}

/// A step the shelf refused, e.g. a feed that did not fit
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RejectedStep {
    /// Zero-based position in the script
    pub step: usize,
    pub reason: String,
}

/// What happened while replaying a script
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReplayLog {
    pub applied: usize,
    pub rejected: Vec<RejectedStep>,
    /// Net tokens freed by explicit and automatic compression
    pub freed: i64,
    pub auto_compressions: usize,
}

impl Script {
    pub fn from_toml_str(content: &str) -> CliResult<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_file(path: &Path) -> CliResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read script {}: {e}", path.display()))?;
        Self::from_toml_str(&content)
    }

    /// Apply every step to `session`, in order.
    ///
    /// Capacity failures are recorded and replay continues with the next
    /// step. After each step the session gets a chance to auto-compress.
    pub fn replay(&self, session: &mut ContextSession) -> CliResult<ReplayLog> {
        let mut log = ReplayLog::default();

        for (i, step) in self.steps.iter().enumerate() {
            match apply(session, step) {
                Ok(freed) => {
                    log.applied += 1;
                    log.freed += freed;
                }
                Err(e) if e.is_capacity() => {
                    warn!(step = i, error = %e, "Script step rejected");
                    log.rejected.push(RejectedStep {
                        step: i,
                        reason: e.to_string(),
                    });
                }
                Err(e) => return Err(e.into()),
            }

            if let Some(freed) = session.maybe_auto_compress() {
                log.auto_compressions += 1;
                log.freed += freed;
            }
        }

        debug!(
            applied = log.applied,
            rejected = log.rejected.len(),
            freed = log.freed,
            "Replayed script"
        );
        Ok(log)
    }
}

/// Returns tokens freed, which is only non-zero for `compress`
fn apply(session: &mut ContextSession, step: &Step) -> shelf::Result<i64> {
    match step {
        Step::Feed {
            content,
            source,
            tier,
        } => {
            session.feed(content, source, *tier)?;
            Ok(0)
        }
        Step::Retrieve { tier } => {
            session.shelf_mut().retrieve(*tier, None);
            Ok(0)
        }
        Step::Compress { tier } => Ok(session.shelf_mut().compress(*tier)),
        Step::Promote { source, tier } => {
            for id in ids_for_source(session, source) {
                session.shelf_mut().promote(id, *tier)?;
            }
            Ok(0)
        }
        Step::Demote { source, tier } => {
            for id in ids_for_source(session, source) {
                session.shelf_mut().demote(id, *tier)?;
            }
            Ok(0)
        }
    }
}

fn ids_for_source(session: &ContextSession, source: &str) -> Vec<EntryId> {
    session
        .shelf()
        .entries()
        .filter(|e| e.tags.get(SOURCE_TAG) == Some(source))
        .map(|e| e.id)
        .collect()
}
