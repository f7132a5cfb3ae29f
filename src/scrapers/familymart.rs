use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

use crate::config::SiteConfig;
use crate::models::{ItemStub, ProductDetail, Site};
use crate::parsers::{
    element_text, map_nutrition_cells, normalize_tax_included_price, resolve_url, select_all,
    select_first, select_text, selector,
};
use crate::scrapers::SiteAdapter;

static ITEM: Lazy<Selector> = Lazy::new(|| selector("li"));
static NAME_LINK: Lazy<Selector> = Lazy::new(|| selector(".item_basic_info .name a"));
static IMAGE: Lazy<Selector> = Lazy::new(|| selector("img"));
static PRICE: Lazy<Selector> = Lazy::new(|| selector(".price"));
static NUTRITION_CELL: Lazy<Selector> =
    Lazy::new(|| selector(".item_nutritional_info td.con_nut"));
static DETAIL_PRICE: Lazy<Selector> = Lazy::new(|| selector("span.ly-kakaku-usual"));

pub struct FamilyMartAdapter {
    config: SiteConfig,
}

impl FamilyMartAdapter {
    pub fn new(config: SiteConfig) -> Self {
        Self { config }
    }
}

/// Whether `item` is the nearest `li` around `link`. Grid wrappers are
/// `li`s too, and their first name link belongs to an inner item.
fn owns_link(item: ElementRef<'_>, link: ElementRef<'_>) -> bool {
    link.ancestors()
        .filter_map(ElementRef::wrap)
        .find(|ancestor| ancestor.value().name() == "li")
        .is_some_and(|nearest| nearest.id() == item.id())
}

/// Tax-inclusive price from the price node, else from anywhere in the item.
fn listing_price(item: ElementRef<'_>) -> String {
    select_text(item, &PRICE)
        .map(|text| normalize_tax_included_price(&text))
        .filter(|price| !price.is_empty())
        .unwrap_or_else(|| normalize_tax_included_price(&element_text(item)))
}

impl SiteAdapter for FamilyMartAdapter {
    fn site(&self) -> Site {
        Site::FamilyMart
    }

    fn site_config(&self) -> &SiteConfig {
        &self.config
    }

    // Seed pages are the listings themselves.
    fn collect_urls(&self, _seed_html: &str) -> Vec<String> {
        Vec::new()
    }

    fn extract_listing(&self, listing_html: &str) -> Vec<ItemStub> {
        let document = Html::parse_document(listing_html);
        let mut stubs = Vec::new();

        for item in select_all(document.root_element(), &ITEM) {
            let Some(name_link) = select_first(item, &NAME_LINK) else {
                continue;
            };
            if !owns_link(item, name_link) {
                continue;
            }
            let Some(href) = name_link.value().attr("href") else {
                continue;
            };

            let image_url = select_first(item, &IMAGE)
                .and_then(|img| img.value().attr("src"))
                .map(|src| resolve_url(src.trim(), self.base_url()))
                .unwrap_or_default();

            let cells: Vec<String> = select_all(item, &NUTRITION_CELL)
                .into_iter()
                .map(element_text)
                .collect();

            stubs.push(ItemStub {
                name: element_text(name_link),
                url: resolve_url(href.trim(), self.base_url()),
                image_url,
                price: listing_price(item),
                nutrition: map_nutrition_cells(&cells),
            });
        }

        stubs
    }

    fn extract_detail(&self, detail_html: &str) -> ProductDetail {
        let document = Html::parse_document(detail_html);

        let price = select_text(document.root_element(), &DETAIL_PRICE)
            .map(|text| normalize_tax_included_price(&text))
            .filter(|price| !price.is_empty());

        ProductDetail {
            price,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::models::DetailNutrition;
    use pretty_assertions::assert_eq;

    fn adapter() -> FamilyMartAdapter {
        let config = Config::default();
        FamilyMartAdapter::new(config.site(Site::FamilyMart).unwrap().clone())
    }

    fn item(href: &str, name: &str, cells: &[&str]) -> String {
        let cells: String = cells
            .iter()
            .map(|c| format!("<td class=\"con_nut\">{}</td>", c))
            .collect();
        format!(
            r#"<li>
                 <p class="ly-mod-photo"><img src="{href}.jpg"></p>
                 <div class="item_basic_info"><p class="name"><a href="{href}">{name}</a></p></div>
                 <table class="item_nutritional_info"><tr>{cells}</tr></table>
               </li>"#
        )
    }

    #[test]
    fn inline_table_is_all_or_nothing() {
        let html = format!(
            "<ul>{}{}<li class=\"ad\">広告</li></ul>",
            item("/goods/1.html", "Rice Ball A", &["200", "5.0", "3.0", "40.0", "1.2"]),
            item("/goods/2.html", "Rice Ball B", &["200", "5.0", "3.0", "40.0"]),
        );

        let stubs = adapter().extract_listing(&html);
        assert_eq!(stubs.len(), 2);

        assert_eq!(stubs[0].name, "Rice Ball A");
        assert_eq!(stubs[0].url, "https://www.family.co.jp/goods/1.html");
        assert_eq!(stubs[0].nutrition.energy, "200kcal");
        assert_eq!(stubs[0].nutrition.salt_equivalent, "1.2g");
        assert_eq!(stubs[0].price, "");

        assert!(stubs[1].nutrition.is_empty());
    }

    #[test]
    fn wrapping_list_items_are_not_products() {
        let html = format!(
            "<ul><li><ul>{}{}</ul></li></ul>",
            item("/goods/1.html", "A", &[]),
            item("/goods/2.html", "B", &[]),
        );
        let names: Vec<String> = adapter()
            .extract_listing(&html)
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["A".to_string(), "B".to_string()]);
    }

    #[test]
    fn icon_lists_inside_a_card_keep_the_product() {
        let html = r#"<ul><li>
              <ul class="icons"><li>新商品</li><li>地域限定</li></ul>
              <div class="item_basic_info"><p class="name"><a href="/goods/1.html">Rice Ball A</a></p></div>
            </li></ul>"#;
        let stubs = adapter().extract_listing(html);
        assert_eq!(stubs.len(), 1);
        assert_eq!(stubs[0].name, "Rice Ball A");
        assert_eq!(stubs[0].url, "https://www.family.co.jp/goods/1.html");
    }

    #[test]
    fn listing_price_is_read_from_the_card() {
        let html = r#"<li>
              <div class="item_basic_info">
                <p class="name"><a href="/goods/1.html">Rice Ball A</a></p>
                <p class="price">税込150円</p>
              </div>
            </li>
            <li>
              <div class="item_basic_info"><p class="name"><a href="/goods/2.html">Rice Ball B</a></p></div>
              <p class="ly-price">本体価格 200円（税込 216円）</p>
            </li>"#;
        let stubs = adapter().extract_listing(html);
        assert_eq!(stubs[0].price, "150円(税込)");
        assert_eq!(stubs[1].price, "216円(税込)");
    }

    #[test]
    fn item_without_image_gets_empty_image_url() {
        let html = r#"<li><div class="item_basic_info"><p class="name"><a href="https://www.family.co.jp/goods/9.html">X</a></p></div></li>"#;
        let stubs = adapter().extract_listing(html);
        assert_eq!(stubs.len(), 1);
        assert_eq!(stubs[0].image_url, "");
        assert_eq!(stubs[0].url, "https://www.family.co.jp/goods/9.html");
    }

    #[test]
    fn detail_price_is_normalized() {
        let html = r#"<p><span class="ly-kakaku-usual">本体価格 139円（税込 150円）</span></p>"#;
        let detail = adapter().extract_detail(html);
        assert_eq!(detail.price.as_deref(), Some("150円(税込)"));
        assert_eq!(detail.nutrition, DetailNutrition::Absent);

        let withheld = adapter().extract_detail("<span class=\"ly-kakaku-usual\">オープン価格</span>");
        assert_eq!(withheld.price, None);
    }
}
