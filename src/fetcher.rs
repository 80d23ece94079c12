//! Bounded, rank-ordered contributor retrieval.

use futures::future::try_join_all;

use crate::error::GridError;
use crate::model::{Contributor, RepoId};
use crate::ports::ContributorSource;

/// Upstream maximum for `per_page`.
pub const PAGE_SIZE: usize = 100;

/// Fetches up to `max_count` contributors, preserving upstream rank order.
pub struct ContributorFetcher<'a> {
    source: &'a dyn ContributorSource,
}

impl<'a> ContributorFetcher<'a> {
    /// Create a fetcher over the given contributor source.
    #[must_use]
    pub fn new(source: &'a dyn ContributorSource) -> Self {
        Self { source }
    }

    /// Fetch at most `max_count` contributors of `repo`.
    ///
    /// Page 1 is requested first; if more contributors are wanted, every
    /// remaining page is requested at once and the results are joined in page
    /// order. An empty page marks the end of the listing: it and all later
    /// pages contribute nothing.
    ///
    /// # Errors
    ///
    /// Any failed page request fails the whole fetch; no partial list is
    /// returned.
    pub async fn fetch(
        &self,
        repo: &RepoId,
        max_count: usize,
    ) -> Result<Vec<Contributor>, GridError> {
        if max_count == 0 {
            return Ok(Vec::new());
        }

        let mut contributors = self.source.fetch_page(repo, 1, PAGE_SIZE).await?;
        if contributors.is_empty() {
            tracing::debug!(%repo, "repository has no contributors");
            return Ok(contributors);
        }

        let remaining = max_count.saturating_sub(contributors.len());
        let additional_pages = remaining.div_ceil(PAGE_SIZE);

        if additional_pages > 0 {
            tracing::debug!(%repo, additional_pages, "requesting remaining pages concurrently");
            let pending = (2..).take(additional_pages).map(|page| {
                self.source.fetch_page(repo, page, PAGE_SIZE)
            });
            // try_join_all yields results in input (page) order.
            let pages = try_join_all(pending).await?;

            for page in pages {
                if page.is_empty() {
                    break;
                }
                contributors.extend(page);
            }
        }

        contributors.truncate(max_count);
        tracing::debug!(%repo, count = contributors.len(), "fetched contributors");
        Ok(contributors)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::time::Duration;

    use super::*;
    use crate::ports::contributor_source::PageFuture;

    fn contributor(rank: usize) -> Contributor {
        Contributor {
            login: format!("user{rank}"),
            avatar_url: format!("https://avatars.example.com/u/{rank}?v=4"),
        }
    }

    /// In-memory source over explicit pages. Later pages answer sooner, so
    /// completion order is the reverse of page order.
    struct FakeSource {
        pages: Vec<Vec<Contributor>>,
        fail_page: Option<u32>,
        requested: Mutex<Vec<u32>>,
    }

    impl FakeSource {
        fn with_total(total: usize) -> Self {
            let all: Vec<Contributor> = (0..total).map(contributor).collect();
            Self::with_pages(all.chunks(PAGE_SIZE).map(<[Contributor]>::to_vec).collect())
        }

        fn with_pages(pages: Vec<Vec<Contributor>>) -> Self {
            Self { pages, fail_page: None, requested: Mutex::new(Vec::new()) }
        }

        fn requested(&self) -> Vec<u32> {
            let mut pages = self.requested.lock().unwrap().clone();
            pages.sort_unstable();
            pages
        }
    }

    impl ContributorSource for FakeSource {
        fn fetch_page(&self, _repo: &RepoId, page: u32, per_page: usize) -> PageFuture<'_> {
            assert_eq!(per_page, PAGE_SIZE);
            self.requested.lock().unwrap().push(page);
            let index = page as usize - 1;
            let result = if self.fail_page == Some(page) {
                Err(GridError::Upstream { status: 403, message: "rate limited".into() })
            } else {
                Ok(self.pages.get(index).cloned().unwrap_or_default())
            };
            let delay = Duration::from_millis(40u64.saturating_sub(u64::from(page) * 5));
            Box::pin(async move {
                tokio::time::sleep(delay).await;
                result
            })
        }
    }

    fn repo() -> RepoId {
        "octo/demo".parse().unwrap()
    }

    fn logins(contributors: &[Contributor]) -> Vec<String> {
        contributors.iter().map(|c| c.login.clone()).collect()
    }

    #[tokio::test]
    async fn zero_max_makes_no_request() {
        let source = FakeSource::with_total(250);
        let result = ContributorFetcher::new(&source).fetch(&repo(), 0).await.unwrap();
        assert!(result.is_empty());
        assert!(source.requested().is_empty());
    }

    #[tokio::test]
    async fn max_within_one_page_makes_single_request() {
        let source = FakeSource::with_total(250);
        let result = ContributorFetcher::new(&source).fetch(&repo(), 100).await.unwrap();
        assert_eq!(result.len(), 100);
        assert_eq!(source.requested(), vec![1]);

        let source = FakeSource::with_total(250);
        let result = ContributorFetcher::new(&source).fetch(&repo(), 7).await.unwrap();
        assert_eq!(logins(&result), (0..7).map(|i| format!("user{i}")).collect::<Vec<_>>());
        assert_eq!(source.requested(), vec![1]);
    }

    #[tokio::test]
    async fn length_is_min_of_max_and_available() {
        for (total, max) in [(0, 50), (30, 50), (250, 120), (250, 250), (250, 1000), (300, 300)] {
            let source = FakeSource::with_total(total);
            let result = ContributorFetcher::new(&source).fetch(&repo(), max).await.unwrap();
            assert_eq!(result.len(), max.min(total), "total={total} max={max}");
        }
    }

    #[tokio::test]
    async fn preserves_rank_order_across_concurrent_pages() {
        let source = FakeSource::with_total(450);
        let result = ContributorFetcher::new(&source).fetch(&repo(), 420).await.unwrap();
        assert_eq!(source.requested(), vec![1, 2, 3, 4, 5]);
        assert_eq!(logins(&result), (0..420).map(|i| format!("user{i}")).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn empty_first_page_returns_immediately() {
        let source = FakeSource::with_total(0);
        let result = ContributorFetcher::new(&source).fetch(&repo(), 500).await.unwrap();
        assert!(result.is_empty());
        assert_eq!(source.requested(), vec![1]);
    }

    #[tokio::test]
    async fn empty_page_stops_later_pages() {
        let page = |start: usize| (start..start + PAGE_SIZE).map(contributor).collect::<Vec<_>>();
        // Page 3 is empty; page 4 must not be appended even though it has data.
        let source = FakeSource::with_pages(vec![page(0), page(100), Vec::new(), page(300)]);
        let result = ContributorFetcher::new(&source).fetch(&repo(), 400).await.unwrap();
        assert_eq!(source.requested(), vec![1, 2, 3, 4]);
        assert_eq!(result.len(), 200);
        assert_eq!(result[199].login, "user199");
    }

    #[tokio::test]
    async fn any_page_failure_is_fatal() {
        let mut source = FakeSource::with_total(350);
        source.fail_page = Some(3);
        let err = ContributorFetcher::new(&source).fetch(&repo(), 350).await.unwrap_err();
        assert!(err.is_upstream());
    }

    #[tokio::test]
    async fn first_page_failure_is_fatal() {
        let mut source = FakeSource::with_total(10);
        source.fail_page = Some(1);
        assert!(ContributorFetcher::new(&source).fetch(&repo(), 10).await.is_err());
        assert_eq!(source.requested(), vec![1]);
    }
}
