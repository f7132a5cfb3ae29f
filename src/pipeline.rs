use reqwest::Client;
use std::collections::{BTreeMap, HashSet, VecDeque};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use crate::assembler::assemble;
use crate::collector::sorted;
use crate::config::Config;
use crate::error::ScrapeError;
use crate::models::{Category, ItemStub, ProductDetail};
use crate::scrapers::SiteAdapter;
use crate::storage::RecordSink;
use crate::utils::http::{fetch_text, fetch_with_retry, RetryPolicy};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineSettings {
    pub retry: RetryPolicy,
    pub request_delay: Duration,
    pub category_delay: Duration,
    pub max_pages: usize,
}

impl PipelineSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            retry: RetryPolicy::from_config(config),
            request_delay: config.request_delay(),
            category_delay: config.category_delay(),
            max_pages: config.max_pages,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub categories: usize,
    pub rows: usize,
    /// Categories aborted by a listing-page fetch failure.
    pub failed: Vec<Category>,
    /// Categories that produced no rows.
    pub empty: Vec<Category>,
}

/// Sequential scrape of one site: seed → listing pages → stubs → details → rows.
pub struct Pipeline<'a> {
    client: &'a Client,
    adapter: &'a dyn SiteAdapter,
    settings: PipelineSettings,
}

impl<'a> Pipeline<'a> {
    pub fn new(client: &'a Client, adapter: &'a dyn SiteAdapter, settings: PipelineSettings) -> Self {
        Self {
            client,
            adapter,
            settings,
        }
    }

    async fn pause(&self, delay: Duration) {
        if !delay.is_zero() {
            sleep(delay).await;
        }
    }

    /// Listing pages are not retried; a failure aborts the category.
    async fn fetch_listing(&self, category: &Category, url: &str) -> Result<String, ScrapeError> {
        fetch_text(self.client, url)
            .await
            .map_err(|source| ScrapeError::Category {
                category: category.clone(),
                url: url.to_string(),
                source: Box::new(source),
            })
    }

    /// Follow pagination breadth-first from an already fetched start page,
    /// returning every page keyed by URL.
    pub async fn paginated_collect(
        &self,
        category: &Category,
        start_url: &str,
        start_html: String,
    ) -> Result<BTreeMap<String, String>, ScrapeError> {
        let mut pages = BTreeMap::new();
        let mut seen = HashSet::from([start_url.to_string()]);
        let mut queue = VecDeque::from([(start_url.to_string(), Some(start_html))]);

        while let Some((url, html)) = queue.pop_front() {
            if pages.len() >= self.settings.max_pages {
                warn!(
                    "{}: stopping pagination at {} pages ({} unvisited)",
                    category,
                    pages.len(),
                    queue.len() + 1
                );
                break;
            }

            let html = match html {
                Some(html) => html,
                None => {
                    self.pause(self.settings.request_delay).await;
                    self.fetch_listing(category, &url).await?
                }
            };

            for next in sorted(self.adapter.pager_urls(&html)) {
                if seen.insert(next.clone()) {
                    queue.push_back((next, None));
                }
            }

            pages.insert(url, html);
        }

        Ok(pages)
    }

    /// Every listing page reachable from a seed. Lineups keep the order
    /// they appear on the seed page; each lineup's own pages are sorted by
    /// URL. A page reachable from two lineups is kept once.
    pub async fn listing_pages(
        &self,
        category: &Category,
        seed_url: &str,
    ) -> Result<Vec<(String, String)>, ScrapeError> {
        let seed_html = self.fetch_listing(category, seed_url).await?;
        let lineups = self.adapter.collect_urls(&seed_html);

        if lineups.is_empty() {
            let pages = self.paginated_collect(category, seed_url, seed_html).await?;
            return Ok(pages.into_iter().collect());
        }

        debug!("{}: {} lineup pages", category, lineups.len());
        let mut pages = Vec::new();
        let mut seen = HashSet::new();
        for lineup in lineups {
            if seen.contains(&lineup) {
                continue;
            }
            self.pause(self.settings.request_delay).await;
            let html = self.fetch_listing(category, &lineup).await?;
            for (url, html) in self.paginated_collect(category, &lineup, html).await? {
                if seen.insert(url.clone()) {
                    pages.push((url, html));
                }
            }
        }

        Ok(pages)
    }

    /// Detail failures never propagate: the product is kept with empty
    /// detail fields.
    async fn fetch_detail(&self, url: &str) -> ProductDetail {
        if url.is_empty() {
            return ProductDetail::default();
        }

        match fetch_with_retry(self.client, url, self.settings.retry).await {
            Ok(html) => self.adapter.extract_detail(&html),
            Err(e) => {
                warn!("No detail data for {}: {}", url, e);
                ProductDetail::default()
            }
        }
    }

    async fn emit_items<S: RecordSink>(
        &self,
        category: &Category,
        stubs: Vec<ItemStub>,
        sink: &mut S,
    ) -> Result<usize, ScrapeError> {
        let mut rows = 0;

        for stub in stubs {
            let detail = self.fetch_detail(&stub.url).await;
            sink.append(&assemble(category, &stub, &detail))?;
            rows += 1;
            self.pause(self.settings.request_delay).await;
        }

        Ok(rows)
    }

    /// Scrape one seed URL into `sink`, returning the number of rows.
    pub async fn scrape_seed<S: RecordSink>(
        &self,
        seed_url: &str,
        sink: &mut S,
    ) -> Result<usize, ScrapeError> {
        let category = self.adapter.category(seed_url);
        let pages = self.listing_pages(&category, seed_url).await?;
        info!("{}: {} listing pages", category, pages.len());

        let mut rows = 0;
        for (page_url, html) in pages {
            let stubs = self.adapter.extract_listing(&html);
            debug!("{}: {} items on {}", category, stubs.len(), page_url);
            rows += self.emit_items(&category, stubs, sink).await?;
            self.pause(self.settings.category_delay).await;
        }

        Ok(rows)
    }

    /// Scrape every seed in order. Category failures are logged and
    /// skipped; output failures end the run.
    pub async fn run<S: RecordSink>(
        &self,
        seeds: &[String],
        sink: &mut S,
    ) -> Result<RunSummary, ScrapeError> {
        let mut summary = RunSummary::default();

        for (index, seed) in seeds.iter().enumerate() {
            let category = self.adapter.category(seed);
            info!("[{}/{}] {} ({})", index + 1, seeds.len(), category, seed);
            summary.categories += 1;

            match self.scrape_seed(seed, sink).await {
                Ok(0) => {
                    warn!("{}: no items extracted", category);
                    summary.empty.push(category);
                }
                Ok(rows) => {
                    info!("{}: {} rows", category, rows);
                    summary.rows += rows;
                }
                Err(e) if e.is_category_scoped() => {
                    error!("{}", e);
                    summary.failed.push(category);
                }
                Err(e) => return Err(e),
            }
        }

        Ok(summary)
    }

    /// Re-run from a saved URL list where every URL is a detail page.
    pub async fn scrape_detail_urls<S: RecordSink>(
        &self,
        category: &Category,
        urls: &[String],
        sink: &mut S,
    ) -> Result<usize, ScrapeError> {
        let stubs = urls.iter().map(|url| ItemStub::from_url(url.as_str())).collect();
        self.emit_items(category, stubs, sink).await
    }

    /// Sorted product URLs reachable from a seed, for persisting to a URL list.
    pub async fn collect_product_urls(
        &self,
        seed_url: &str,
    ) -> Result<(Category, Vec<String>), ScrapeError> {
        let category = self.adapter.category(seed_url);
        let pages = self.listing_pages(&category, seed_url).await?;

        let urls: HashSet<String> = pages
            .iter()
            .flat_map(|(_, html)| self.adapter.extract_listing(html))
            .map(|stub| stub.url)
            .filter(|url| !url.is_empty())
            .collect();

        Ok((category, sorted(urls)))
    }
}
