use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;

use crate::parsers::{element_text, resolve_url, select_all, selector};

/// Decides whether an anchor points at something worth collecting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkPredicate<'a> {
    /// Every anchor with an href.
    Any,
    /// The href contains the given path fragment.
    PathContains(&'a str),
    /// The anchor's visible text contains the given phrase.
    TextContains(&'a str),
}

impl LinkPredicate<'_> {
    pub fn matches(&self, href: &str, text: &str) -> bool {
        match self {
            LinkPredicate::Any => true,
            LinkPredicate::PathContains(fragment) => href.contains(fragment),
            LinkPredicate::TextContains(phrase) => text.contains(phrase),
        }
    }
}

static ANCHOR: Lazy<Selector> = Lazy::new(|| selector("a[href]"));

/// Scan every anchor of a page and return the absolute URLs accepted by
/// `predicate`. The set is unordered; sort before persisting.
pub fn collect(html: &str, base_url: &str, predicate: LinkPredicate<'_>) -> HashSet<String> {
    let document = Html::parse_document(html);
    collect_within(document.root_element(), &ANCHOR, base_url, predicate)
}

/// Like [`collect`] but in page order, keeping the first occurrence of
/// each URL.
pub fn collect_in_order(html: &str, base_url: &str, predicate: LinkPredicate<'_>) -> Vec<String> {
    let document = Html::parse_document(html);
    let mut seen = HashSet::new();
    matching_urls(document.root_element(), &ANCHOR, base_url, predicate)
        .into_iter()
        .filter(|url| seen.insert(url.clone()))
        .collect()
}

/// Same as [`collect`] but restricted to anchors matched by `anchors`
/// inside `scope`, e.g. `.pager a`.
pub fn collect_within(
    scope: ElementRef<'_>,
    anchors: &Selector,
    base_url: &str,
    predicate: LinkPredicate<'_>,
) -> HashSet<String> {
    matching_urls(scope, anchors, base_url, predicate)
        .into_iter()
        .collect()
}

fn matching_urls(
    scope: ElementRef<'_>,
    anchors: &Selector,
    base_url: &str,
    predicate: LinkPredicate<'_>,
) -> Vec<String> {
    let mut urls = Vec::new();

    for anchor in select_all(scope, anchors) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        let href = href.trim();
        if href.is_empty() {
            continue;
        }

        if predicate.matches(href, &element_text(anchor)) {
            urls.push(resolve_url(href, base_url));
        }
    }

    urls
}

/// Deterministic order for persisted URL lists.
pub fn sorted(urls: HashSet<String>) -> Vec<String> {
    let mut urls: Vec<String> = urls.into_iter().collect();
    urls.sort();
    urls
}
