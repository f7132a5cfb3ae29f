use once_cell::sync::Lazy;
use regex::Regex;

static TAX_INCLUDED_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"税込\s*([0-9][0-9,.]*)\s*円")
        .expect("Invalid tax-included price regex")
});

/// Boilerplate labels printed in front of the amount on detail pages.
const PRICE_BOILERPLATE: &[&str] = &["ローソン標準価格", "標準価格"];

/// Normalize a tax-inclusive yen price to `"<amount>円(税込)"`.
///
/// Returns an empty string when the text carries no tax-inclusive amount;
/// a withheld price is a normal outcome, not an error.
pub fn normalize_tax_included_price(text: &str) -> String {
    match TAX_INCLUDED_REGEX.captures(text) {
        Some(captures) => format!("{}円(税込)", &captures[1]),
        None => String::new(),
    }
}

/// Strip known label phrases from a price element's text, leaving the amount.
pub fn strip_price_boilerplate(text: &str) -> String {
    let stripped = PRICE_BOILERPLATE
        .iter()
        .fold(text.to_string(), |acc, phrase| acc.replace(phrase, ""));
    super::clean_text(&stripped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tax_included_amounts_are_normalized() {
        assert_eq!(normalize_tax_included_price("税込1,234円"), "1,234円(税込)");
        assert_eq!(normalize_tax_included_price("税込600円"), "600円(税込)");
        assert_eq!(normalize_tax_included_price("138円（税込 149.04円）"), "149.04円(税込)");
    }

    #[test]
    fn missing_price_is_empty_not_an_error() {
        assert_eq!(normalize_tax_included_price(""), "");
        assert_eq!(normalize_tax_included_price("価格は店舗によって異なります"), "");
        assert_eq!(normalize_tax_included_price("税込円"), "");
    }

    #[test]
    fn boilerplate_is_removed() {
        assert_eq!(strip_price_boilerplate("ローソン標準価格 150円(税込162円)"), "150円(税込162円)");
        assert_eq!(strip_price_boilerplate("198円"), "198円");
    }
}
