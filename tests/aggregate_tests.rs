use std::collections::BTreeMap;
use std::sync::Arc;

use jobscout::{
    rank_by_recency, AggregationResult, Aggregator, ConfigError, ErrorResponse, FixedRecency,
    JobListing, ListingsResponse, Source, StaticRenderer,
};

const INDEED_PAGE: &str = r#"
    <div class="job_seen_beacon">
        <h2 class="jobTitle"><a class="jcs-JobTitle" href="/rc/clk?jk=1">
            <span title="Poste Indeed">Poste Indeed</span>
        </a></h2>
        <span data-testid="company-name">Acme</span>
    </div>
"#;

const WTTJ_PAGE: &str = r#"
    <ul>
    <li data-testid="job-list-item">
        <a href="/fr/companies/jungle/jobs/dev">
            <h3>Poste Jungle</h3>
            <h4 class="company">Jungle Inc</h4>
        </a>
    </li>
    </ul>
"#;

fn listing(title: &str, days: Option<u32>) -> JobListing {
    JobListing {
        title: title.to_string(),
        company: "Acme".to_string(),
        location: "Paris".to_string(),
        salary: None,
        description: String::new(),
        url: String::new(),
        posted: String::new(),
        posted_days_ago: days,
        contract: "CDI".to_string(),
        source: "Test".to_string(),
    }
}

/// Renderer with fixtures for Indeed and WTTJ page 0; HelloWork always fails.
fn two_of_three_renderer(query: &str, location: &str) -> StaticRenderer {
    StaticRenderer::new()
        .with_page(
            Source::Indeed.adapter().build_page_request(query, location, 0),
            INDEED_PAGE,
        )
        .with_page(
            Source::WelcomeToTheJungle
                .adapter()
                .build_page_request(query, location, 0),
            WTTJ_PAGE,
        )
        .with_failure("hellowork.com")
}

fn deterministic_aggregator(renderer: &StaticRenderer) -> Aggregator {
    Aggregator::builder(Arc::new(renderer.clone()))
        .no_pacing()
        .recency_sampler(Arc::new(FixedRecency(0)))
        .build()
        .unwrap()
}

mod fan_out {
    use super::*;

    #[tokio::test]
    async fn one_failed_source_never_sinks_the_others() {
        let renderer = two_of_three_renderer("rust", "Paris");
        let aggregator = deterministic_aggregator(&renderer);

        let result = aggregator
            .fetch_all_listings("rust", "Paris", 1)
            .await
            .unwrap();

        let titles: Vec<&str> = result
            .records
            .iter()
            .map(|record| record.title.as_str())
            .collect();
        assert!(titles.contains(&"Poste Indeed"));
        assert!(titles.contains(&"Poste Jungle"));

        assert_eq!(result.per_source_counts["Indeed"], 1);
        assert_eq!(result.per_source_counts["HelloWork"], 0);
        assert_eq!(result.per_source_counts["Welcome to the Jungle"], 1);
        assert!(result.per_source_errors.contains_key("HelloWork"));
        assert!(!result.per_source_errors.contains_key("Indeed"));
    }

    #[tokio::test]
    async fn every_source_opens_and_closes_its_own_session() {
        let renderer = two_of_three_renderer("rust", "Paris");
        let aggregator = deterministic_aggregator(&renderer);

        aggregator
            .fetch_all_listings("rust", "Paris", 1)
            .await
            .unwrap();

        assert_eq!(renderer.sessions_opened(), 3);
        assert_eq!(renderer.sessions_closed(), 3);
    }

    #[tokio::test]
    async fn single_source_fetch_only_touches_that_source() {
        let renderer = two_of_three_renderer("rust", "Paris");
        let aggregator = deterministic_aggregator(&renderer);

        let result = aggregator
            .fetch_listings(Source::Indeed, "rust", "Paris", 1)
            .await
            .unwrap();

        assert_eq!(result.records.len(), 1);
        assert_eq!(result.per_source_counts.len(), 1);
        assert!(renderer
            .rendered_urls()
            .iter()
            .all(|url| url.contains("indeed")));
    }

    #[tokio::test]
    async fn zero_max_pages_is_the_only_caller_visible_error() {
        let renderer = StaticRenderer::new();
        let aggregator = deterministic_aggregator(&renderer);

        let result = aggregator.fetch_all_listings("rust", "Paris", 0).await;

        assert!(matches!(result, Err(ConfigError::InvalidMaxPages(0))));
    }
}

mod ranking {
    use super::*;

    #[test]
    fn sort_is_stable_for_equal_recency() {
        let mut records = vec![
            listing("X", Some(0)),
            listing("Y", Some(5)),
            listing("Z", Some(0)),
        ];

        rank_by_recency(&mut records);

        let titles: Vec<&str> = records.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["X", "Z", "Y"]);
    }

    #[test]
    fn unknown_recency_ranks_last() {
        let mut records = vec![
            listing("Unknown", None),
            listing("Week", Some(7)),
            listing("Today", Some(0)),
        ];

        rank_by_recency(&mut records);

        let titles: Vec<&str> = records.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["Today", "Week", "Unknown"]);
    }
}

mod determinism {
    use super::*;

    #[tokio::test]
    async fn identical_inputs_yield_byte_identical_results() {
        let renderer = two_of_three_renderer("rust", "Paris");
        let aggregator = deterministic_aggregator(&renderer);

        let first = aggregator
            .fetch_all_listings("rust", "Paris", 1)
            .await
            .unwrap();
        let second = aggregator
            .fetch_all_listings("rust", "Paris", 1)
            .await
            .unwrap();

        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }
}

mod wire_shape {
    use super::*;

    #[test]
    fn success_response_shape() {
        let result = AggregationResult {
            records: vec![listing("X", Some(0))],
            per_source_counts: BTreeMap::from([("Indeed".to_string(), 1)]),
            per_source_errors: BTreeMap::new(),
        };

        let value = serde_json::to_value(ListingsResponse::from(result)).unwrap();

        assert_eq!(value["success"], true);
        assert_eq!(value["count"], 1);
        assert_eq!(value["perSourceCounts"]["Indeed"], 1);
        assert!(value.get("perSourceErrors").is_none());

        let job = &value["jobs"][0];
        assert_eq!(job["title"], "X");
        assert_eq!(job["type"], "CDI");
        assert_eq!(job["postedDaysAgo"], 0);
        assert!(job["salary"].is_null());
    }

    #[test]
    fn failed_sources_appear_in_the_response() {
        let result = AggregationResult {
            records: Vec::new(),
            per_source_counts: BTreeMap::from([("Indeed".to_string(), 0)]),
            per_source_errors: BTreeMap::from([(
                "Indeed".to_string(),
                "page 1: navigation failed".to_string(),
            )]),
        };

        let value = serde_json::to_value(ListingsResponse::from(result)).unwrap();

        assert_eq!(value["perSourceErrors"]["Indeed"], "page 1: navigation failed");
    }

    #[test]
    fn error_response_shape() {
        let value =
            serde_json::to_value(ErrorResponse::new(ConfigError::InvalidMaxPages(0))).unwrap();

        assert_eq!(value["success"], false);
        assert_eq!(value["error"], "maxPages must be at least 1, got 0");
    }
}
