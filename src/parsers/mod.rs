pub mod nutrition;
pub mod price;

pub use nutrition::*;
pub use price::*;

use html_escape::decode_html_entities;
use scraper::{ElementRef, Selector};

/// Clean and normalize text by removing extra whitespace and decoding HTML entities
pub fn clean_text(text: &str) -> String {
    let decoded = decode_html_entities(text);
    decoded
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string()
}

/// All descendant text of an element, cleaned
pub fn element_text(element: ElementRef<'_>) -> String {
    clean_text(&element.text().collect::<String>())
}

/// Make an href absolute: site-rooted paths get the base URL prepended,
/// everything else is taken as-is.
pub fn resolve_url(href: &str, base_url: &str) -> String {
    if href.starts_with('/') {
        format!("{}{}", base_url, href)
    } else {
        href.to_string()
    }
}

/// Compile a fixed selector. Callers keep the result in a `Lazy` static so
/// each selector is parsed once per process.
pub fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("Invalid CSS selector")
}

/// First element under `scope` matching `selector`.
pub fn select_first<'a>(scope: ElementRef<'a>, selector: &Selector) -> Option<ElementRef<'a>> {
    scope.select(selector).next()
}

pub fn select_all<'a>(scope: ElementRef<'a>, selector: &Selector) -> Vec<ElementRef<'a>> {
    scope.select(selector).collect()
}

/// Text of the first element matching `selector`, if any.
pub fn select_text(scope: ElementRef<'_>, selector: &Selector) -> Option<String> {
    select_first(scope, selector).map(element_text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    #[test]
    fn resolve_prepends_base_for_rooted_paths() {
        assert_eq!(
            resolve_url("/item/1", "https://www.sej.co.jp"),
            "https://www.sej.co.jp/item/1"
        );
        assert_eq!(
            resolve_url("https://cdn.example.com/a.jpg", "https://www.sej.co.jp"),
            "https://cdn.example.com/a.jpg"
        );
        // Only a leading slash counts as relative.
        assert_eq!(resolve_url("item/1", "https://www.sej.co.jp"), "item/1");
        assert_eq!(resolve_url("", "https://www.sej.co.jp"), "");
    }

    #[test]
    fn clean_text_collapses_whitespace_and_entities() {
        assert_eq!(clean_text("  おにぎり&amp;\n  パン  "), "おにぎり& パン");
    }

    #[test]
    fn missing_elements_are_none() {
        let document = Html::parse_document("<div class=\"a\"><p>x</p></div>");
        let root = document.root_element();
        assert_eq!(select_text(root, &selector("div.a p")).as_deref(), Some("x"));
        assert!(select_first(root, &selector("span.price")).is_none());
        assert!(select_all(root, &selector("li")).is_empty());
    }
}
