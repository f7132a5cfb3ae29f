use std::collections::HashSet;

use crate::config::{Config, SiteConfig};
use crate::error::ScrapeError;
use crate::models::{Category, ItemStub, ProductDetail, Site};

mod familymart;
mod lawson;
mod seveneleven;

pub use familymart::FamilyMartAdapter;
pub use lawson::LawsonAdapter;
pub use seveneleven::SevenElevenAdapter;

/// Per-chain HTML knowledge. Every method is a pure function of the page
/// it is given and never fails: absent markup yields empty values.
pub trait SiteAdapter: Send + Sync {
    fn site(&self) -> Site;
    fn site_config(&self) -> &SiteConfig;

    fn base_url(&self) -> &str {
        &self.site_config().base_url
    }

    fn category(&self, seed_url: &str) -> Category {
        Category::from_url(seed_url)
    }

    /// Listing pages linked from a seed page, in page order without
    /// repeats. An empty list means the seed page is itself the listing.
    fn collect_urls(&self, seed_html: &str) -> Vec<String>;

    /// Further pages of the same listing.
    fn pager_urls(&self, _listing_html: &str) -> HashSet<String> {
        HashSet::new()
    }

    fn extract_listing(&self, listing_html: &str) -> Vec<ItemStub>;

    fn extract_detail(&self, detail_html: &str) -> ProductDetail;
}

pub fn adapter_for(site: Site, config: &Config) -> Result<Box<dyn SiteAdapter>, ScrapeError> {
    let site_config = config.site(site)?.clone();

    let adapter: Box<dyn SiteAdapter> = match site {
        Site::SevenEleven => Box::new(SevenElevenAdapter::new(site_config)),
        Site::FamilyMart => Box::new(FamilyMartAdapter::new(site_config)),
        Site::Lawson => Box::new(LawsonAdapter::new(site_config)),
    };

    Ok(adapter)
}
