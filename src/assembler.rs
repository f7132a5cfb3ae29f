use crate::models::{
    Category, DetailNutrition, ItemStub, NutritionFacts, ProductDetail, ProductRecord,
    UNKNOWN_NAME,
};
use crate::parsers::facts_from_labels;

/// A present, non-empty detail value wins over the listing value.
fn prefer(detail: Option<&str>, stub: &str) -> String {
    match detail.map(str::trim) {
        Some(value) if !value.is_empty() => value.to_string(),
        _ => stub.to_string(),
    }
}

fn detail_facts(nutrition: &DetailNutrition) -> NutritionFacts {
    match nutrition {
        DetailNutrition::Absent => NutritionFacts::default(),
        DetailNutrition::Fixed(facts) => facts.clone(),
        DetailNutrition::Labeled(pairs) => facts_from_labels(pairs),
    }
}

/// Merge a listing stub and its detail page into one output row.
pub fn assemble(category: &Category, stub: &ItemStub, detail: &ProductDetail) -> ProductRecord {
    let mut name = prefer(detail.name.as_deref(), &stub.name);
    if name.is_empty() {
        name = UNKNOWN_NAME.to_string();
    }

    let nutrition = detail_facts(&detail.nutrition).or(&stub.nutrition);

    ProductRecord {
        category: category.to_string(),
        name,
        price: prefer(detail.price.as_deref(), &stub.price),
        image_url: prefer(detail.image_url.as_deref(), &stub.image_url),
        product_url: stub.url.clone(),
        energy: nutrition.energy,
        protein: nutrition.protein,
        fat: nutrition.fat,
        carbohydrate: nutrition.carbohydrate,
        sugar: nutrition.sugar,
        fiber: nutrition.fiber,
        salt_equivalent: nutrition.salt_equivalent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::map_nutrition_cells;
    use pretty_assertions::assert_eq;

    fn rice_ball_stub() -> ItemStub {
        let cells: Vec<String> = ["200", "5.0", "3.0", "40.0", "1.2"]
            .iter()
            .map(|c| c.to_string())
            .collect();
        ItemStub {
            name: "Rice Ball A".to_string(),
            url: "https://www.family.co.jp/item/1".to_string(),
            image_url: String::new(),
            price: "150円(税込)".to_string(),
            nutrition: map_nutrition_cells(&cells),
        }
    }

    #[test]
    fn stub_values_survive_an_empty_detail() {
        let record = assemble(&Category("rice".into()), &rice_ball_stub(), &ProductDetail::default());

        assert_eq!(
            record,
            ProductRecord {
                category: "rice".into(),
                name: "Rice Ball A".into(),
                price: "150円(税込)".into(),
                image_url: String::new(),
                product_url: "https://www.family.co.jp/item/1".into(),
                energy: "200kcal".into(),
                protein: "5.0g".into(),
                fat: "3.0g".into(),
                carbohydrate: "40.0g".into(),
                sugar: String::new(),
                fiber: String::new(),
                salt_equivalent: "1.2g".into(),
            }
        );
    }

    #[test]
    fn detail_values_win_when_present() {
        let mut facts = NutritionFacts::default();
        facts.energy = "210kcal".into();
        let detail = ProductDetail {
            name: Some("Rice Ball A (large)".into()),
            price: Some("160円(税込)".into()),
            image_url: Some(" ".into()),
            nutrition: DetailNutrition::Fixed(facts),
        };

        let record = assemble(&Category("rice".into()), &rice_ball_stub(), &detail);
        assert_eq!(record.name, "Rice Ball A (large)");
        assert_eq!(record.price, "160円(税込)");
        assert_eq!(record.image_url, "");
        assert_eq!(record.energy, "210kcal");
        assert_eq!(record.protein, "5.0g");
    }

    #[test]
    fn empty_detail_price_falls_back_to_stub() {
        let detail = ProductDetail {
            price: Some(String::new()),
            ..Default::default()
        };
        let record = assemble(&Category("rice".into()), &rice_ball_stub(), &detail);
        assert_eq!(record.price, "150円(税込)");
    }

    #[test]
    fn labeled_nutrition_maps_known_labels_only() {
        let detail = ProductDetail {
            nutrition: DetailNutrition::Labeled(vec![
                ("糖質".into(), "30.1g".into()),
                ("ビタミンC".into(), "10mg".into()),
            ]),
            ..Default::default()
        };
        let record = assemble(&Category("rice".into()), &ItemStub::from_url("https://x/1"), &detail);
        assert_eq!(record.sugar, "30.1g");
        assert_eq!(record.nutrition().energy, "");
    }

    #[test]
    fn missing_name_everywhere_uses_sentinel() {
        let record = assemble(
            &Category("rice".into()),
            &ItemStub::from_url("https://x/1"),
            &ProductDetail::default(),
        );
        assert_eq!(record.name, UNKNOWN_NAME);
        assert_eq!(record.price, "");
    }
}
