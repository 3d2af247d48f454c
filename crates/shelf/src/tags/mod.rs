//! Five-dimension tag model for indexed content
//!
//! Every indexed item carries exactly one value in each of five independent
//! dimensions. There is no cross-dimension validation: any combination is a
//! legal tag.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod tagger;

pub use tagger::{KeywordTagger, Tagger};

/// Returned when a string does not name a value of a tag dimension
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown {dimension} value: {value}")]
pub struct ParseTagError {
    pub dimension: &'static str,
    pub value: String,
}

macro_rules! tag_dimension {
    (
        $(#[$meta:meta])*
        $name:ident, $dimension:literal {
            $($(#[$vmeta:meta])* $variant:ident => $label:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "kebab-case")]
        pub enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl $name {
            /// Every value of this dimension, in declaration order
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Kebab-case label, matching the serde representation
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ParseTagError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($label => Ok($name::$variant),)+
                    other => Err(ParseTagError {
                        dimension: $dimension,
                        value: other.to_string(),
                    }),
                }
            }
        }
    };
}

tag_dimension! {
    /// What sort of content this is
    Kind, "kind" {
        SourceCode => "source-code",
        Config => "config",
        Test => "test",
        Docs => "docs",
        ErrorLog => "error-log",
        UserIntent => "user-intent",
        ToolResult => "tool-result",
    }
}

tag_dimension! {
    /// How much the content matters to the current work
    Relevance, "relevance" {
        /// Blocks progress without it
        Critical => "critical",
        /// Informs the approach
        Useful => "useful",
        /// Nice to have
        Ambient => "ambient",
        /// Actively ignore
        Noise => "noise",
    }
}

tag_dimension! {
    /// How likely the content is to change under us
    Volatility, "volatility" {
        /// Won't change
        Static => "static",
        /// May have changed since it was read
        StaleRisk => "stale-risk",
        /// Changes every run, e.g. test output
        Live => "live",
        /// One-time value, don't cache
        Ephemeral => "ephemeral",
    }
}

tag_dimension! {
    /// How far the content's influence reaches
    Scope, "scope" {
        ThisFunction => "this-function",
        ThisFile => "this-file",
        ThisModule => "this-module",
        CrossModule => "cross-module",
        WholeProject => "whole-project",
        ExternalDependency => "external-dependency",
    }
}

tag_dimension! {
    /// How the content was obtained
    Trust, "trust" {
        /// Read first-hand
        Verified => "verified",
        /// Someone said so
        Reported => "reported",
        /// Guessed from context
        Inferred => "inferred",
        /// Read long ago, may be outdated
        Stale => "stale",
    }
}

/// One value in each of the five classification dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tag {
    pub kind: Kind,
    pub relevance: Relevance,
    pub volatility: Volatility,
    pub scope: Scope,
    pub trust: Trust,
}

impl Tag {
    pub fn new(
        kind: Kind,
        relevance: Relevance,
        volatility: Volatility,
        scope: Scope,
        trust: Trust,
    ) -> Self {
        Self {
            kind,
            relevance,
            volatility,
            scope,
            trust,
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}/{}/{}",
            self.kind, self.relevance, self.volatility, self.scope, self.trust
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_parse_back() {
        for kind in Kind::ALL {
            assert_eq!(kind.as_str().parse::<Kind>().unwrap(), *kind);
        }
        for scope in Scope::ALL {
            assert_eq!(scope.as_str().parse::<Scope>().unwrap(), *scope);
        }
    }

    #[test]
    fn test_dimension_sizes() {
        assert_eq!(Kind::ALL.len(), 7);
        assert_eq!(Relevance::ALL.len(), 4);
        assert_eq!(Volatility::ALL.len(), 4);
        assert_eq!(Scope::ALL.len(), 6);
        assert_eq!(Trust::ALL.len(), 4);
    }

    #[test]
    fn test_serde_matches_labels() {
        let json = serde_json::to_string(&Volatility::StaleRisk).unwrap();
        assert_eq!(json, "\"stale-risk\"");

        let json = serde_json::to_string(&Scope::ExternalDependency).unwrap();
        assert_eq!(json, "\"external-dependency\"");

        let kind: Kind = serde_json::from_str("\"error-log\"").unwrap();
        assert_eq!(kind, Kind::ErrorLog);
    }

    #[test]
    fn test_unknown_label_is_rejected() {
        let err = "CRITICAL".parse::<Relevance>().unwrap_err();
        assert_eq!(err.dimension, "relevance");
        assert_eq!(err.value, "CRITICAL");
    }

    #[test]
    fn test_tag_display() {
        let tag = Tag::new(
            Kind::Test,
            Relevance::Noise,
            Volatility::Live,
            Scope::ThisModule,
            Trust::Inferred,
        );
        assert_eq!(tag.to_string(), "test/noise/live/this-module/inferred");
    }
}
