//! Integration tests for the retrieval index query surface

use shelf::index::{IndexedItem, RetrievalIndex, TagQuery};
use shelf::{Kind, Relevance, Scope, Tag, Trust, Volatility};

/// A small index resembling one session's worth of reads
fn create_session_index() -> RetrievalIndex {
    let mut index = RetrievalIndex::new();
    index.index_raw(
        "fn authenticate(user: &User) -> Result<Token>",
        "src/auth.rs",
        Kind::SourceCode,
        Relevance::Critical,
        Volatility::StaleRisk,
        Scope::ThisModule,
        Trust::Verified,
        None,
    );
    index.index_raw(
        "test auth::expired_token ... FAILED",
        "cargo test",
        Kind::ErrorLog,
        Relevance::Critical,
        Volatility::Live,
        Scope::ThisFunction,
        Trust::Verified,
        None,
    );
    index.index_raw(
        "token_ttl = 3600",
        "config/app.toml",
        Kind::Config,
        Relevance::Useful,
        Volatility::Static,
        Scope::WholeProject,
        Trust::Stale,
        None,
    );
    index.index_raw(
        "Tokens should last an hour",
        "user",
        Kind::UserIntent,
        Relevance::Critical,
        Volatility::Static,
        Scope::WholeProject,
        Trust::Reported,
        None,
    );
    index.index_raw(
        "## Authentication\nSee docs/auth.md",
        "README.md",
        Kind::Docs,
        Relevance::Noise,
        Volatility::StaleRisk,
        Scope::ExternalDependency,
        Trust::Stale,
        None,
    );
    index
}

fn sources(items: &[&IndexedItem]) -> Vec<String> {
    items.iter().map(|i| i.source.clone()).collect()
}

mod and_queries {
    use super::*;

    #[test]
    fn test_each_extra_dimension_narrows() {
        let index = create_session_index();

        let critical = index.query(&TagQuery::new().relevance(Relevance::Critical));
        let critical_verified = index.query(
            &TagQuery::new()
                .relevance(Relevance::Critical)
                .trust(Trust::Verified),
        );
        let critical_verified_live = index.query(
            &TagQuery::new()
                .relevance(Relevance::Critical)
                .trust(Trust::Verified)
                .volatility(Volatility::Live),
        );

        assert_eq!(critical.len(), 3);
        assert_eq!(critical_verified.len(), 2);
        assert_eq!(sources(&critical_verified_live), vec!["cargo test"]);
    }

    #[test]
    fn test_all_five_dimensions() {
        let index = create_session_index();
        let query = TagQuery::new()
            .kind(Kind::Config)
            .relevance(Relevance::Useful)
            .volatility(Volatility::Static)
            .scope(Scope::WholeProject)
            .trust(Trust::Stale);

        assert_eq!(sources(&index.query(&query)), vec!["config/app.toml"]);
    }

    #[test]
    fn test_contradicting_dimensions_match_nothing() {
        let index = create_session_index();
        let query = TagQuery::new().kind(Kind::Docs).relevance(Relevance::Critical);
        assert!(index.query(&query).is_empty());
    }

    #[test]
    fn test_no_filters_returns_everything_in_order() {
        let index = create_session_index();
        assert_eq!(
            sources(&index.query(&TagQuery::new())),
            vec!["src/auth.rs", "cargo test", "config/app.toml", "user", "README.md"]
        );
    }
}

mod stale_queries {
    use super::*;

    #[test]
    fn test_stale_unions_trust_and_volatility() {
        let index = create_session_index();
        // auth.rs: stale-risk only, app.toml: stale trust only, README: both
        assert_eq!(
            sources(&index.stale()),
            vec!["src/auth.rs", "config/app.toml", "README.md"]
        );
    }

    #[test]
    fn test_stale_is_wider_than_either_single_dimension() {
        let index = create_session_index();
        let by_trust = index.query(&TagQuery::new().trust(Trust::Stale));
        let by_volatility = index.query(&TagQuery::new().volatility(Volatility::StaleRisk));
        let both = index.query(
            &TagQuery::new()
                .trust(Trust::Stale)
                .volatility(Volatility::StaleRisk),
        );

        assert_eq!(by_trust.len(), 2);
        assert_eq!(by_volatility.len(), 2);
        assert_eq!(both.len(), 1);
        assert_eq!(index.stale().len(), by_trust.len() + by_volatility.len() - both.len());
    }
}

mod sources_and_summary {
    use super::*;

    #[test]
    fn test_by_source_returns_every_item_for_label() {
        let mut index = create_session_index();
        let retag = Tag::new(
            Kind::SourceCode,
            Relevance::Useful,
            Volatility::Static,
            Scope::ThisModule,
            Trust::Verified,
        );
        index.index_tagged("fn authenticate() // rewritten", "src/auth.rs", retag, None);

        let items = index.by_source("src/auth.rs");
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].tag.relevance, Relevance::Critical);
        assert_eq!(items[1].tag.relevance, Relevance::Useful);
        assert!(index.by_source("auth.rs").is_empty());
    }

    #[test]
    fn test_summary_covers_every_item() {
        let index = create_session_index();
        let summary = index.summary();

        assert_eq!(summary.total_items, index.len());
        assert_eq!(summary.total_size, index.total_size());
        assert_eq!(summary.by_kind.values().sum::<usize>(), summary.total_size);
        assert_eq!(summary.by_scope.values().sum::<usize>(), summary.total_size);
        assert_eq!(summary.by_trust.len(), 3);
    }

    #[test]
    fn test_summary_json_shape() {
        let index = create_session_index();
        let json = serde_json::to_value(index.summary()).unwrap();

        assert_eq!(json["total_items"], 5);
        assert!(json["by_kind"]["user-intent"].is_number());
        assert!(json["by_scope"]["external-dependency"].is_number());
        assert!(json["by_relevance"].get("ambient").is_none());
    }
}
