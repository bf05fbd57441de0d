//! In-memory listing catalogue.
//!
//! Stands in for the marketplace backend: answers paged, searchable queries
//! after a simulated network delay, supports deleting listings and can be
//! told to fail.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use log::debug;
use nucleo_matcher::pattern::{AtomKind, CaseMatching, Normalization, Pattern};
use nucleo_matcher::{Config, Matcher, Utf32Str};
use thiserror::Error;
use uuid::Uuid;

/// Catalogue errors.
#[derive(Debug, Clone, Error)]
pub enum CatalogError {
    #[error("catalogue unavailable (simulated outage)")]
    Unavailable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpaceSize {
    Small,
    Medium,
    Large,
}

impl fmt::Display for SpaceSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SpaceSize::Small => "Small",
            SpaceSize::Medium => "Medium",
            SpaceSize::Large => "Large",
        };
        f.write_str(label)
    }
}

/// A space offered on the marketplace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    pub id: Uuid,
    pub location: String,
    pub country: String,
    pub size: SpaceSize,
    /// Monthly price in whole currency units.
    pub monthly_price: u32,
}

impl Listing {
    /// Text the search box matches against.
    fn haystack(&self) -> String {
        format!("{} {} {}", self.location, self.country, self.size)
    }
}

/// One page request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub search: String,
    pub page: u32,
    pub per_page: u32,
}

/// One page of results.
#[derive(Debug, Clone)]
pub struct Page {
    pub rows: Vec<Listing>,
    /// Matching listings across all pages.
    pub total: u64,
}

const CITIES: &[(&str, &str)] = &[
    ("São Paulo, SP", "Brazil"),
    ("Rio de Janeiro, RJ", "Brazil"),
    ("Belo Horizonte, MG", "Brazil"),
    ("Porto Alegre, RS", "Brazil"),
    ("Brasília, DF", "Brazil"),
    ("Salvador, BA", "Brazil"),
    ("Curitiba, PR", "Brazil"),
    ("Recife, PE", "Brazil"),
    ("Lisboa", "Portugal"),
    ("Porto", "Portugal"),
    ("Buenos Aires", "Argentina"),
    ("Montevideo", "Uruguay"),
];

const SIZES: [SpaceSize; 3] = [SpaceSize::Small, SpaceSize::Medium, SpaceSize::Large];

/// Shared, cheaply cloneable catalogue handle.
#[derive(Clone)]
pub struct Catalog {
    listings: Arc<RwLock<Vec<Listing>>>,
    latency: Duration,
    failing: Arc<AtomicBool>,
}

impl Catalog {
    pub fn new(listings: Vec<Listing>, latency: Duration) -> Self {
        Self {
            listings: Arc::new(RwLock::new(listings)),
            latency,
            failing: Arc::new(AtomicBool::new(false)),
        }
    }

    /// A catalogue with every city in every size.
    pub fn sample(latency: Duration) -> Self {
        let listings = CITIES
            .iter()
            .enumerate()
            .flat_map(|(i, (location, country))| {
                SIZES.iter().enumerate().map(move |(j, size)| Listing {
                    id: Uuid::new_v4(),
                    location: location.to_string(),
                    country: country.to_string(),
                    size: *size,
                    monthly_price: 400 + (i as u32 * 137 + j as u32 * 350) % 2400,
                })
            })
            .collect();
        Self::new(listings, latency)
    }

    pub fn len(&self) -> usize {
        self.listings.read().map(|g| g.len()).unwrap_or(0)
    }

    /// Answer a query after the configured latency.
    pub async fn fetch(&self, query: &Query) -> Result<Page, CatalogError> {
        tokio::time::sleep(self.latency).await;

        if self.failing.load(Ordering::SeqCst) {
            return Err(CatalogError::Unavailable);
        }

        let matches = {
            let guard = self.listings.read().map_err(|_| CatalogError::Unavailable)?;
            search(&query.search, &guard)
        };

        let total = matches.len() as u64;
        let per_page = query.per_page.max(1) as usize;
        let offset = (query.page.max(1) as usize - 1) * per_page;
        let rows = matches.into_iter().skip(offset).take(per_page).collect();

        debug!(
            "Fetched page {} ({} per page) for {:?}: {} matches",
            query.page, query.per_page, query.search, total
        );
        Ok(Page { rows, total })
    }

    /// Delete a listing. Returns whether it existed.
    pub fn remove(&self, id: Uuid) -> bool {
        let Ok(mut guard) = self.listings.write() else {
            return false;
        };
        let before = guard.len();
        guard.retain(|listing| listing.id != id);
        guard.len() != before
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn is_failing(&self) -> bool {
        self.failing.load(Ordering::SeqCst)
    }
}

/// Fuzzy-match listings against `query`.
///
/// An empty query keeps catalogue order; otherwise best matches come first.
fn search(query: &str, listings: &[Listing]) -> Vec<Listing> {
    if query.is_empty() {
        return listings.to_vec();
    }

    let mut matcher = Matcher::new(Config::DEFAULT);
    let pattern = Pattern::new(
        query,
        CaseMatching::Ignore,
        Normalization::Smart,
        AtomKind::Fuzzy,
    );

    let mut scored: Vec<(u32, &Listing)> = listings
        .iter()
        .filter_map(|listing| {
            let text = listing.haystack();
            let mut buf = Vec::new();
            pattern
                .score(Utf32Str::new(&text, &mut buf), &mut matcher)
                .map(|score| (score, listing))
        })
        .collect();

    // Stable sort keeps catalogue order among equal scores
    scored.sort_by(|a, b| b.0.cmp(&a.0));

    scored.into_iter().map(|(_, listing)| listing.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(search: &str, page: u32, per_page: u32) -> Query {
        Query {
            search: search.to_string(),
            page,
            per_page,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_pages() {
        let catalog = Catalog::sample(Duration::from_millis(200));
        let all = catalog.len() as u64;

        let page = catalog.fetch(&query("", 1, 5)).await.unwrap();
        assert_eq!(page.total, all);
        assert_eq!(page.rows.len(), 5);

        let last_page = (all as u32).div_ceil(5);
        let page = catalog.fetch(&query("", last_page, 5)).await.unwrap();
        assert!(!page.rows.is_empty() && page.rows.len() <= 5);

        let past_end = catalog.fetch(&query("", last_page + 1, 5)).await.unwrap();
        assert!(past_end.rows.is_empty());
        assert_eq!(past_end.total, all);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_filters_by_search() {
        let catalog = Catalog::sample(Duration::ZERO);
        let page = catalog.fetch(&query("portugal", 1, 50)).await.unwrap();
        assert_eq!(page.total, 6);
        assert!(page.rows.iter().all(|l| l.country == "Portugal"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_remove_shrinks_results() {
        let catalog = Catalog::sample(Duration::ZERO);
        let before = catalog.fetch(&query("montevideo", 1, 15)).await.unwrap();
        assert_eq!(before.total, 3);

        assert!(catalog.remove(before.rows[0].id));
        assert!(!catalog.remove(before.rows[0].id));

        let after = catalog.fetch(&query("montevideo", 1, 15)).await.unwrap();
        assert_eq!(after.total, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_simulated_failure() {
        let catalog = Catalog::sample(Duration::ZERO);
        catalog.set_failing(true);
        assert!(catalog.fetch(&query("", 1, 5)).await.is_err());
        catalog.set_failing(false);
        assert!(catalog.fetch(&query("", 1, 5)).await.is_ok());
    }
}
