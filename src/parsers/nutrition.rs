use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::models::{Nutrient, NutritionFacts};

/// One `<label>：<number><unit>` pattern per nutrient. Both the full-width
/// and the ASCII colon appear in the wild.
static NUTRIENT_PATTERNS: Lazy<Vec<(Nutrient, Regex)>> = Lazy::new(|| {
    Nutrient::ALL
        .iter()
        .map(|nutrient| {
            let pattern = format!(
                r"{}\s*[：:]\s*([0-9]+(?:\.[0-9]+)?)\s*{}",
                regex::escape(nutrient.label()),
                nutrient.unit()
            );
            let regex = Regex::new(&pattern).expect("Invalid nutrient regex");
            (*nutrient, regex)
        })
        .collect()
});

/// Positional layout of the five-cell inline nutrition table.
const INLINE_TABLE_LAYOUT: [Nutrient; 5] = [
    Nutrient::Energy,
    Nutrient::Protein,
    Nutrient::Fat,
    Nutrient::Carbohydrate,
    Nutrient::SaltEquivalent,
];

/// Parse a free-text nutrition blob such as
/// `熱量：215kcal、たんぱく質：4.6g、脂質：1.5g、...`.
///
/// Nutrients without a match stay empty; nothing is inferred.
pub fn parse_nutrition_text(text: &str) -> NutritionFacts {
    let mut facts = NutritionFacts::default();

    for (nutrient, regex) in NUTRIENT_PATTERNS.iter() {
        if let Some(captures) = regex.captures(text) {
            facts.set(*nutrient, format!("{}{}", &captures[1], nutrient.unit()));
        }
    }

    facts
}

/// Map the inline listing table onto the schema, all or nothing: exactly
/// five cells are required, otherwise every field stays empty.
pub fn map_nutrition_cells(cells: &[String]) -> NutritionFacts {
    let mut facts = NutritionFacts::default();

    if cells.len() != INLINE_TABLE_LAYOUT.len() {
        if !cells.is_empty() {
            debug!("Ignoring nutrition table with {} cells", cells.len());
        }
        return facts;
    }

    for (nutrient, value) in INLINE_TABLE_LAYOUT.iter().zip(cells) {
        facts.set(*nutrient, format!("{}{}", value.trim(), nutrient.unit()));
    }

    facts
}

/// Fold label/value pairs onto the fixed schema by exact label lookup.
/// Labels outside the schema are dropped.
pub fn facts_from_labels(pairs: &[(String, String)]) -> NutritionFacts {
    let mut facts = NutritionFacts::default();

    for (label, value) in pairs {
        match Nutrient::from_label(label) {
            Some(nutrient) => facts.set(nutrient, value.trim()),
            None => debug!("Dropping unmapped nutrition label: {}", label),
        }
    }

    facts
}
