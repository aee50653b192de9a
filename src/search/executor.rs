//! Marketplace search execution and aggregation

use super::models::{AggregatedListings, MarketplaceQuery, ValidationError};
use crate::listings::{sort_listings, Listing, SortKey, SourceError, SourceUnavailable, Timing};
use crate::marketplace::{Marketplace, MarketplaceRegistry};
use crate::metrics::Metrics;
use futures::future::join_all;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// Outcome of searching a single marketplace
enum SourceOutcome {
    Listings(Vec<Listing>, Timing),
    Failed(SourceUnavailable),
}

/// Searches several marketplaces at once and merges their listings
pub struct Aggregator {
    /// Marketplace registry
    registry: Arc<MarketplaceRegistry>,
    /// Shared metrics
    metrics: Arc<Metrics>,
    /// Default per-marketplace timeout
    default_timeout: Duration,
    /// Maximum per-marketplace timeout
    max_timeout: Duration,
}

impl Aggregator {
    /// Create a new aggregator
    pub fn new(registry: Arc<MarketplaceRegistry>) -> Self {
        Self {
            registry,
            metrics: Arc::new(Metrics::new()),
            default_timeout: Duration::from_secs(5),
            max_timeout: Duration::from_secs(30),
        }
    }

    /// Record into shared metrics
    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Set default timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = timeout;
        self
    }

    /// Set maximum timeout
    pub fn with_max_timeout(mut self, timeout: Duration) -> Self {
        self.max_timeout = timeout;
        self
    }

    pub fn registry(&self) -> &MarketplaceRegistry {
        &self.registry
    }

    pub fn metrics(&self) -> &Arc<Metrics> {
        &self.metrics
    }

    /// Search `sources` for `query` and order the merged listings by `sort`
    pub async fn search<I, S>(
        &self,
        query: &str,
        sources: I,
        sort: SortKey,
    ) -> Result<AggregatedListings, ValidationError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let query = MarketplaceQuery::new(query, sources).with_sort(sort);
        self.execute(&query).await
    }

    /// Execute a marketplace query.
    ///
    /// Every enabled marketplace is searched concurrently; merging starts
    /// only once all of them have answered, failed or timed out. Listings
    /// are concatenated in enabled-source order before the stable sort.
    pub async fn execute(
        &self,
        query: &MarketplaceQuery,
    ) -> Result<AggregatedListings, ValidationError> {
        if let Err(e) = query.validate() {
            debug!("Rejected marketplace search: {}", e);
            self.metrics.inc_rejected();
            return Err(e);
        }
        self.metrics.inc_search();

        let text = query.query.trim();
        let sources = query.enabled_sources();

        info!(
            "Searching '{}' on {} marketplaces",
            text,
            sources.len()
        );

        let futures: Vec<_> = sources
            .iter()
            .map(|source| self.search_source(source, text, query.timeout_limit))
            .collect();

        let outcomes = join_all(futures).await;

        let mut listings = Vec::new();
        let mut unavailable = Vec::new();
        let mut timings = Vec::new();

        for outcome in outcomes {
            match outcome {
                SourceOutcome::Listings(found, timing) => {
                    listings.extend(found);
                    timings.push(timing);
                }
                SourceOutcome::Failed(failure) => unavailable.push(failure),
            }
        }

        sort_listings(&mut listings, query.sort);

        if !unavailable.is_empty() {
            warn!(
                "{} of {} marketplaces failed for '{}'",
                unavailable.len(),
                sources.len(),
                text
            );
        }

        Ok(AggregatedListings {
            query: text.to_string(),
            sort: query.sort,
            sources: sources.iter().map(|s| s.to_string()).collect(),
            listings,
            unavailable,
            timings,
        })
    }

    /// Search a single marketplace
    async fn search_source(
        &self,
        source: &str,
        query: &str,
        timeout_limit: Option<f64>,
    ) -> SourceOutcome {
        let marketplace: Arc<dyn Marketplace> = match self.registry.get(source) {
            Some(m) => m.clone(),
            None => {
                // Ids come straight from the request; keep them out of metrics
                warn!("Unknown marketplace requested: {}", source);
                return SourceOutcome::Failed(SourceUnavailable {
                    source: source.to_string(),
                    error: SourceError::NotRegistered,
                });
            }
        };

        if !self.registry.is_available(source) {
            debug!("Marketplace {} is not available", source);
            return self.failed(source, SourceError::Unavailable);
        }

        let seconds = timeout_limit
            .filter(|t| t.is_finite() && *t > 0.0)
            .unwrap_or_else(|| {
                self.registry
                    .get_timeout(source, self.default_timeout.as_secs_f64())
            });
        let source_timeout = Duration::try_from_secs_f64(seconds)
            .unwrap_or(self.max_timeout)
            .min(self.max_timeout);

        debug!("Searching {} with timeout {:?}", source, source_timeout);

        let start = Instant::now();
        let result = timeout(source_timeout, marketplace.fetch_listings(query)).await;
        let elapsed = start.elapsed();

        match result {
            Ok(Ok(listings)) => {
                let time_ms = elapsed.as_millis() as u64;
                self.metrics.record_success(source, time_ms);
                debug!(
                    "Marketplace {} returned {} listings in {:?}",
                    source,
                    listings.len(),
                    elapsed
                );
                let timing = Timing {
                    source: source.to_string(),
                    time_ms,
                    listing_count: listings.len(),
                };
                SourceOutcome::Listings(listings, timing)
            }
            Ok(Err(e)) => {
                warn!("Marketplace {} failed: {}", source, e);
                self.failed(source, SourceError::Failed(e.to_string()))
            }
            Err(_) => {
                warn!("Timeout for marketplace {}", source);
                self.failed(source, SourceError::Timeout)
            }
        }
    }

    fn failed(&self, source: &str, error: SourceError) -> SourceOutcome {
        self.metrics.record_error(source);
        SourceOutcome::Failed(SourceUnavailable {
            source: source.to_string(),
            error,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MarketplaceConfig;
    use crate::marketplace::mock::MockMarketplace;
    use crate::marketplace::MarketplaceAbout;
    use async_trait::async_trait;
    use chrono::{Duration as ChronoDuration, Utc};

    struct FailingMarketplace;

    #[async_trait]
    impl Marketplace for FailingMarketplace {
        fn id(&self) -> &str {
            "broken"
        }

        fn name(&self) -> &str {
            "Broken"
        }

        fn about(&self) -> MarketplaceAbout {
            MarketplaceAbout::new("always fails")
        }

        async fn fetch_listings(&self, _query: &str) -> anyhow::Result<Vec<Listing>> {
            Err(anyhow::anyhow!("connection refused"))
        }
    }

    /// Serves a fixed listing set
    struct FixedMarketplace {
        id: String,
        listings: Vec<Listing>,
        delay: Duration,
    }

    #[async_trait]
    impl Marketplace for FixedMarketplace {
        fn id(&self) -> &str {
            &self.id
        }

        fn name(&self) -> &str {
            &self.id
        }

        fn about(&self) -> MarketplaceAbout {
            MarketplaceAbout::new("fixed")
        }

        async fn fetch_listings(&self, _query: &str) -> anyhow::Result<Vec<Listing>> {
            tokio::time::sleep(self.delay).await;
            Ok(self.listings.clone())
        }
    }

    fn mock(id: &str, name: &str) -> (Arc<dyn Marketplace>, MarketplaceConfig) {
        let mut marketplace = MockMarketplace::new(id, name);
        let config = MarketplaceConfig::new(id, name);
        marketplace.init(&config).unwrap();
        (Arc::new(marketplace), config)
    }

    fn default_registry() -> MarketplaceRegistry {
        let mut registry = MarketplaceRegistry::new();
        for (id, name) in [
            ("ebay", "eBay"),
            ("goldin", "Goldin"),
            ("pwcc", "PWCC"),
            ("comc", "COMC"),
            ("myslabs", "MySlabs"),
        ] {
            let (marketplace, config) = mock(id, name);
            registry.register(marketplace, config);
        }
        registry
    }

    fn aggregator(registry: MarketplaceRegistry) -> Aggregator {
        Aggregator::new(Arc::new(registry))
    }

    fn prices(result: &AggregatedListings) -> Vec<f64> {
        result.listings.iter().map(|l| l.price.amount).collect()
    }

    #[tokio::test]
    async fn test_price_desc_across_sources() {
        let search = aggregator(default_registry());
        let result = search
            .search("LeBron James", ["ebay", "goldin", "pwcc"], SortKey::PriceDesc)
            .await
            .unwrap();

        assert_eq!(prices(&result), vec![15000.0, 14500.0, 12000.0, 8500.0]);
        assert!(result.is_complete());
        assert_eq!(result.timings.len(), 3);
    }

    #[tokio::test]
    async fn test_single_source_sorted_descending() {
        let search = aggregator(default_registry());
        let result = search
            .search("LeBron James", ["comc"], SortKey::PriceDesc)
            .await
            .unwrap();

        let prices = prices(&result);
        assert!(prices.windows(2).all(|w| w[0] > w[1]));
        assert!(result.listings[0].title.starts_with("LeBron James"));
    }

    #[tokio::test]
    async fn test_price_asc() {
        let search = aggregator(default_registry());
        let result = search
            .search("Mike Trout", ["comc", "myslabs"], SortKey::PriceAsc)
            .await
            .unwrap();
        assert_eq!(prices(&result), vec![2500.0, 4200.0, 11000.0]);
    }

    #[tokio::test]
    async fn test_ending_soonest_across_sources() {
        let search = aggregator(default_registry());
        let result = search
            .search("Tom Brady", ["comc", "goldin", "pwcc", "ebay"], SortKey::EndingSoonest)
            .await
            .unwrap();

        let ids: Vec<&str> = result.listings.iter().map(|l| l.id.as_str()).collect();
        // Auctions by end date (+3, +5, +7 days), then untimed in source order
        assert_eq!(ids, vec!["eb1", "p1", "g1", "c1", "c2", "g2"]);
    }

    #[tokio::test]
    async fn test_empty_query_rejected() {
        let search = aggregator(default_registry());
        let err = search
            .search("", ["ebay"], SortKey::PriceDesc)
            .await
            .unwrap_err();
        assert_eq!(err, ValidationError::EmptyQuery);

        let err = search
            .search(" \t ", ["ebay"], SortKey::PriceDesc)
            .await
            .unwrap_err();
        assert_eq!(err, ValidationError::EmptyQuery);
        assert_eq!(search.metrics().get_rejected_searches(), 2);
    }

    #[tokio::test]
    async fn test_no_sources_rejected() {
        let search = aggregator(default_registry());
        let err = search
            .search("LeBron James", Vec::<String>::new(), SortKey::PriceDesc)
            .await
            .unwrap_err();
        assert_eq!(err, ValidationError::NoSources);
    }

    #[tokio::test]
    async fn test_failing_source_is_isolated() {
        let mut registry = default_registry();
        registry.register(
            Arc::new(FailingMarketplace),
            MarketplaceConfig::new("broken", "Broken"),
        );
        let search = aggregator(registry);

        let result = search
            .search("Wayne Gretzky", ["broken", "ebay"], SortKey::PriceDesc)
            .await
            .unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result.unavailable.len(), 1);
        assert_eq!(result.unavailable[0].source, "broken");
        assert!(matches!(result.unavailable[0].error, SourceError::Failed(_)));
        assert_eq!(search.metrics().get_reliability("broken"), 0.0);
    }

    #[tokio::test]
    async fn test_unknown_and_unavailable_sources_recorded() {
        let mut registry = default_registry();
        let alt_config = MarketplaceConfig {
            available: false,
            requires_auth: true,
            ..MarketplaceConfig::new("alt", "Alt")
        };
        let mut alt = MockMarketplace::new("alt", "Alt");
        alt.init(&alt_config).unwrap();
        registry.register(Arc::new(alt), alt_config);
        let search = aggregator(registry);

        let result = search
            .search("q", ["nope", "alt", "pwcc"], SortKey::PriceDesc)
            .await
            .unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(
            result.unavailable,
            vec![
                SourceUnavailable {
                    source: "nope".to_string(),
                    error: SourceError::NotRegistered,
                },
                SourceUnavailable {
                    source: "alt".to_string(),
                    error: SourceError::Unavailable,
                },
            ]
        );

        let stats = search.metrics().get_source_stats();
        assert!(!stats.contains_key("nope"));
        assert!(stats.contains_key("alt"));
    }

    #[tokio::test]
    async fn test_unknown_sources_leave_metrics_untouched() {
        let search = aggregator(default_registry());
        for i in 0..50 {
            let junk = format!("junk-{}", i);
            let result = search
                .search("q", [junk.as_str()], SortKey::PriceDesc)
                .await
                .unwrap();
            assert_eq!(result.unavailable[0].error, SourceError::NotRegistered);
        }

        assert!(search.metrics().get_source_stats().is_empty());
        assert_eq!(search.metrics().get_total_searches(), 50);
    }

    /// Implements only the required methods
    struct PlainMarketplace;

    #[async_trait]
    impl Marketplace for PlainMarketplace {
        fn id(&self) -> &str {
            "plain"
        }

        fn name(&self) -> &str {
            "Plain"
        }

        async fn fetch_listings(&self, query: &str) -> anyhow::Result<Vec<Listing>> {
            Ok(vec![Listing::new("pl1", "Plain", query, 99.0, "https://plain.test/1")])
        }
    }

    #[tokio::test]
    async fn test_source_with_default_about_is_searched() {
        let mut registry = MarketplaceRegistry::new();
        registry.register(
            Arc::new(PlainMarketplace),
            MarketplaceConfig::new("plain", "Plain"),
        );
        let search = aggregator(registry);

        let result = search
            .search("Mike Trout", ["plain"], SortKey::PriceDesc)
            .await
            .unwrap();

        assert!(result.is_complete());
        assert_eq!(result.listings[0].id, "pl1");
    }

    #[tokio::test]
    async fn test_slow_source_times_out() {
        let mut registry = default_registry();
        registry.register(
            Arc::new(FixedMarketplace {
                id: "slow".to_string(),
                listings: vec![Listing::new("s1", "slow", "s", 1.0, "https://slow.example")],
                delay: Duration::from_secs(10),
            }),
            MarketplaceConfig::new("slow", "Slow"),
        );
        let search = aggregator(registry);

        let query = MarketplaceQuery::new("q", ["slow", "ebay"]).with_timeout(0.05);
        let result = search.execute(&query).await.unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result.unavailable[0].error, SourceError::Timeout);
    }

    #[tokio::test]
    async fn test_duplicate_sources_searched_once() {
        let search = aggregator(default_registry());
        let result = search
            .search("q", ["goldin", "goldin", "goldin"], SortKey::PriceAsc)
            .await
            .unwrap();
        assert_eq!(result.len(), 2);
        assert_eq!(result.sources, vec!["goldin"]);
    }

    #[tokio::test]
    async fn test_ties_keep_source_order_despite_completion_order() {
        let listing =
            |id: &str, source: &str| Listing::new(id, source, id, 100.0, "https://example.com");

        let mut registry = MarketplaceRegistry::new();
        registry.register(
            Arc::new(FixedMarketplace {
                id: "first".to_string(),
                listings: vec![listing("a", "first"), listing("b", "first")],
                delay: Duration::from_millis(40),
            }),
            MarketplaceConfig::new("first", "First"),
        );
        registry.register(
            Arc::new(FixedMarketplace {
                id: "second".to_string(),
                listings: vec![listing("c", "second")],
                delay: Duration::ZERO,
            }),
            MarketplaceConfig::new("second", "Second"),
        );
        let search = aggregator(registry);

        let result = search
            .search("q", ["first", "second"], SortKey::PriceDesc)
            .await
            .unwrap();
        let ids: Vec<&str> = result.listings.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_price_range_of_result() {
        let search = aggregator(default_registry());
        let result = search
            .search("q", ["comc"], SortKey::PriceAsc)
            .await
            .unwrap();
        let range = result.price_range();
        assert_eq!(range.min, 2500.0);
        assert_eq!(range.max, 4200.0);
        assert_eq!(range.average, 3350.0);
    }

    #[tokio::test]
    async fn test_auction_dates_relative_to_now() {
        let search = aggregator(default_registry());
        let result = search
            .search("q", ["ebay"], SortKey::EndingSoonest)
            .await
            .unwrap();
        let end = result.listings[0].auction_end.unwrap();
        assert!(end < Utc::now() + ChronoDuration::days(4));
    }
}
