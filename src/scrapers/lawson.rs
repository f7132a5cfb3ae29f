use once_cell::sync::Lazy;
use scraper::{Html, Selector};

use crate::collector::{collect, sorted, LinkPredicate};
use crate::config::SiteConfig;
use crate::models::{DetailNutrition, ItemStub, ProductDetail, Site};
use crate::parsers::{
    resolve_url, select_all, select_first, select_text, selector, strip_price_boilerplate,
};
use crate::scrapers::SiteAdapter;

const DETAIL_PATH: &str = "/recommend/original/detail/";
const DETAIL_IMAGE_PATH: &str = "/recommend/original/detail/img/";

static TITLE: Lazy<Selector> = Lazy::new(|| selector("h2.ttl"));
static HEADING: Lazy<Selector> = Lazy::new(|| selector("h1"));
static IMAGE: Lazy<Selector> = Lazy::new(|| selector("img[src]"));
static PRICE: Lazy<Selector> = Lazy::new(|| selector("dl.price"));
static NUTRITION_TABLE: Lazy<Selector> = Lazy::new(|| selector("div.nutritionFacts_table"));
static FACT: Lazy<Selector> = Lazy::new(|| selector("dl"));
static FACT_LABEL: Lazy<Selector> = Lazy::new(|| selector("dt"));
static FACT_VALUE: Lazy<Selector> = Lazy::new(|| selector("dd"));

pub struct LawsonAdapter {
    config: SiteConfig,
}

impl LawsonAdapter {
    pub fn new(config: SiteConfig) -> Self {
        Self { config }
    }
}

impl SiteAdapter for LawsonAdapter {
    fn site(&self) -> Site {
        Site::Lawson
    }

    fn site_config(&self) -> &SiteConfig {
        &self.config
    }

    // Category pages list products directly.
    fn collect_urls(&self, _seed_html: &str) -> Vec<String> {
        Vec::new()
    }

    /// The category page only yields detail links; everything else comes
    /// from the detail page.
    fn extract_listing(&self, listing_html: &str) -> Vec<ItemStub> {
        let urls = collect(listing_html, self.base_url(), LinkPredicate::PathContains(DETAIL_PATH));
        sorted(urls).into_iter().map(ItemStub::from_url).collect()
    }

    fn extract_detail(&self, detail_html: &str) -> ProductDetail {
        let document = Html::parse_document(detail_html);
        let root = document.root_element();

        let name = select_text(root, &TITLE)
            .filter(|title| !title.is_empty())
            .or_else(|| select_text(root, &HEADING))
            .filter(|title| !title.is_empty());

        let image_url = select_all(root, &IMAGE)
            .into_iter()
            .filter_map(|img| img.value().attr("src"))
            .find(|src| src.contains(DETAIL_IMAGE_PATH))
            .map(|src| resolve_url(src.trim(), self.base_url()));

        let price = select_text(root, &PRICE)
            .map(|text| strip_price_boilerplate(&text))
            .filter(|price| !price.is_empty());

        let nutrition = match select_first(root, &NUTRITION_TABLE) {
            Some(table) => {
                let pairs = select_all(table, &FACT)
                    .into_iter()
                    .filter_map(|dl| {
                        let label = select_text(dl, &FACT_LABEL)?;
                        let value = select_text(dl, &FACT_VALUE)?;
                        Some((label, value))
                    })
                    .collect();
                DetailNutrition::Labeled(pairs)
            }
            None => DetailNutrition::Absent,
        };

        ProductDetail {
            name,
            price,
            image_url,
            nutrition,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use pretty_assertions::assert_eq;

    fn adapter() -> LawsonAdapter {
        let config = Config::default();
        LawsonAdapter::new(config.site(Site::Lawson).unwrap().clone())
    }

    #[test]
    fn listing_yields_sorted_unique_detail_links() {
        let html = r#"
            <a href="/recommend/original/detail/1452000_2996.html">B</a>
            <a href="/recommend/original/detail/1449000_2996.html"><img src="x.jpg"></a>
            <a href="/recommend/original/detail/1449000_2996.html">A</a>
            <a href="/recommend/original/rice/">おにぎり</a>
        "#;
        let urls: Vec<String> = adapter()
            .extract_listing(html)
            .into_iter()
            .map(|stub| stub.url)
            .collect();
        assert_eq!(
            urls,
            vec![
                "https://www.lawson.co.jp/recommend/original/detail/1449000_2996.html".to_string(),
                "https://www.lawson.co.jp/recommend/original/detail/1452000_2996.html".to_string(),
            ]
        );
    }

    #[test]
    fn detail_reads_labeled_nutrition_verbatim() {
        let html = r#"
            <h1>ローソン</h1>
            <h2 class="ttl">悪魔のおにぎり</h2>
            <img src="/recommend/original/detail/img/l1449000.jpg">
            <dl class="price"><dt>ローソン標準価格</dt><dd>138円(税込149円)</dd></dl>
            <div class="nutritionFacts_table">
              <dl><dt>熱量</dt><dd>250kcal</dd></dl>
              <dl><dt>食塩相当量</dt><dd>1.4g</dd></dl>
              <dl><dt>カリウム</dt><dd>80mg</dd></dl>
              <dl><dt>注記</dt></dl>
            </div>
        "#;
        let detail = adapter().extract_detail(html);

        assert_eq!(detail.name.as_deref(), Some("悪魔のおにぎり"));
        assert_eq!(detail.price.as_deref(), Some("138円(税込149円)"));
        assert_eq!(
            detail.image_url.as_deref(),
            Some("https://www.lawson.co.jp/recommend/original/detail/img/l1449000.jpg")
        );
        assert_eq!(
            detail.nutrition,
            DetailNutrition::Labeled(vec![
                ("熱量".to_string(), "250kcal".to_string()),
                ("食塩相当量".to_string(), "1.4g".to_string()),
                ("カリウム".to_string(), "80mg".to_string()),
            ])
        );
    }

    #[test]
    fn detail_falls_back_to_h1_and_tolerates_absence() {
        let detail = adapter().extract_detail("<h1>からあげクン</h1>");
        assert_eq!(detail.name.as_deref(), Some("からあげクン"));
        assert_eq!(detail.price, None);
        assert_eq!(detail.image_url, None);
        assert_eq!(detail.nutrition, DetailNutrition::Absent);

        let empty = adapter().extract_detail("");
        assert_eq!(empty, ProductDetail::default());
    }
}
