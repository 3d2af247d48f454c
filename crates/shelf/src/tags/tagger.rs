//! Heuristic tag assignment
//!
//! Deciding how to tag content is a collaborator concern; the index takes
//! whatever tag it is handed. `KeywordTagger` is a cheap starting point that
//! callers are expected to override when they know better.

use super::{Kind, Relevance, Scope, Tag, Trust, Volatility};

const SOURCE_EXTENSIONS: &[&str] = &[".py", ".ts", ".js", ".rs", ".go"];
const CONFIG_EXTENSIONS: &[&str] = &[".json", ".yaml", ".yml", ".toml", ".env"];
const LOCKFILE_EXTENSIONS: &[&str] = &[".lock", ".sum"];

/// Assigns a [`Tag`] to content based on the content and its source label
pub trait Tagger: Send + Sync {
    fn tag(&self, content: &str, source: &str) -> Tag;
}

/// Keyword and file-extension heuristics.
///
/// Scope is always `this-file` and trust is always `verified`, since the
/// tagger assumes the caller read the content itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordTagger;

impl KeywordTagger {
    pub fn new() -> Self {
        Self
    }

    fn kind(source: &str) -> Kind {
        let lower = source.to_lowercase();
        if ends_with_any(source, SOURCE_EXTENSIONS) {
            Kind::SourceCode
        } else if ends_with_any(source, CONFIG_EXTENSIONS) {
            Kind::Config
        } else if lower.contains("test") || lower.contains("spec") {
            Kind::Test
        } else if source == "user" {
            Kind::UserIntent
        } else {
            Kind::ToolResult
        }
    }

    fn relevance(content: &str) -> Relevance {
        let lower = content.to_lowercase();
        if ["error", "fail", "assert"].iter().any(|k| lower.contains(k)) {
            Relevance::Critical
        } else if ["import", "def ", "class ", "todo", "fixme"]
            .iter()
            .any(|k| lower.contains(k))
        {
            Relevance::Useful
        } else {
            Relevance::Ambient
        }
    }

    fn volatility(source: &str) -> Volatility {
        if ends_with_any(source, LOCKFILE_EXTENSIONS) {
            Volatility::Static
        } else if source.to_lowercase().contains("test") {
            Volatility::Live
        } else {
            Volatility::StaleRisk
        }
    }
}

impl Tagger for KeywordTagger {
    fn tag(&self, content: &str, source: &str) -> Tag {
        Tag::new(
            Self::kind(source),
            Self::relevance(content),
            Self::volatility(source),
            Scope::ThisFile,
            Trust::Verified,
        )
    }
}

fn ends_with_any(source: &str, suffixes: &[&str]) -> bool {
    suffixes.iter().any(|s| source.ends_with(s))
}
