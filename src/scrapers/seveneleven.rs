use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use tracing::debug;

use crate::collector::{collect_in_order, collect_within, LinkPredicate};
use crate::config::SiteConfig;
use crate::models::{DetailNutrition, ItemStub, ProductDetail, Site};
use crate::parsers::{
    element_text, normalize_tax_included_price, parse_nutrition_text, resolve_url, select_all,
    select_first, select_text, selector,
};
use crate::scrapers::SiteAdapter;

const LINEUP_LINK_TEXT: &str = "ラインナップを見る";
const NUTRITION_HEADER: &str = "栄養成分";

static PAGER_LINK: Lazy<Selector> = Lazy::new(|| selector(".pager a"));
static ITEM_BLOCK: Lazy<Selector> = Lazy::new(|| selector("div.list_inner"));
static NAME_LINK: Lazy<Selector> = Lazy::new(|| selector(".item_ttl a"));
static PRICE: Lazy<Selector> = Lazy::new(|| selector(".item_price p"));
static IMAGE: Lazy<Selector> = Lazy::new(|| selector("img"));
static TABLE_HEADER: Lazy<Selector> = Lazy::new(|| selector("th"));

pub struct SevenElevenAdapter {
    config: SiteConfig,
}

impl SevenElevenAdapter {
    pub fn new(config: SiteConfig) -> Self {
        Self { config }
    }

    fn image_url(&self, block: ElementRef<'_>) -> String {
        select_first(block, &IMAGE)
            .and_then(|img| {
                img.value()
                    .attr("data-original")
                    .or_else(|| img.value().attr("src"))
            })
            .map(|src| resolve_url(src.trim(), self.base_url()))
            .unwrap_or_default()
    }
}

impl SiteAdapter for SevenElevenAdapter {
    fn site(&self) -> Site {
        Site::SevenEleven
    }

    fn site_config(&self) -> &SiteConfig {
        &self.config
    }

    fn collect_urls(&self, seed_html: &str) -> Vec<String> {
        collect_in_order(seed_html, self.base_url(), LinkPredicate::TextContains(LINEUP_LINK_TEXT))
    }

    fn pager_urls(&self, listing_html: &str) -> HashSet<String> {
        let document = Html::parse_document(listing_html);
        collect_within(document.root_element(), &PAGER_LINK, self.base_url(), LinkPredicate::Any)
    }

    fn extract_listing(&self, listing_html: &str) -> Vec<ItemStub> {
        let document = Html::parse_document(listing_html);
        let mut stubs = Vec::new();

        for block in select_all(document.root_element(), &ITEM_BLOCK) {
            let Some(name_link) = select_first(block, &NAME_LINK) else {
                continue;
            };
            let Some(href) = name_link.value().attr("href") else {
                continue;
            };

            let price = select_text(block, &PRICE)
                .map(|text| normalize_tax_included_price(&text))
                .unwrap_or_default();

            stubs.push(ItemStub {
                name: element_text(name_link),
                url: resolve_url(href.trim(), self.base_url()),
                image_url: self.image_url(block),
                price,
                ..Default::default()
            });
        }

        stubs
    }

    fn extract_detail(&self, detail_html: &str) -> ProductDetail {
        let document = Html::parse_document(detail_html);

        let nutrition_cell = select_all(document.root_element(), &TABLE_HEADER)
            .into_iter()
            .find(|th| element_text(*th) == NUTRITION_HEADER)
            .and_then(|th| {
                th.next_siblings()
                    .filter_map(ElementRef::wrap)
                    .find(|sibling| sibling.value().name() == "td")
            });

        let nutrition = match nutrition_cell {
            Some(td) => DetailNutrition::Fixed(parse_nutrition_text(&element_text(td))),
            None => {
                debug!("No nutrition row on Seven-Eleven detail page");
                DetailNutrition::Absent
            }
        };

        ProductDetail {
            nutrition,
            ..Default::default()
        }
    }
}
