use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use url::Url;

// NewType pattern for type safety
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Category(pub String);

impl Category {
    /// Derive a category from a seed URL's final path segment.
    ///
    /// `https://www.lawson.co.jp/recommend/original/rice/` → `rice`,
    /// `https://www.family.co.jp/goods/goods010.html` → `goods010`.
    pub fn from_url(seed_url: &str) -> Self {
        let segment = match Url::parse(seed_url) {
            Ok(url) => {
                let last = url
                    .path()
                    .trim_end_matches('/')
                    .rsplit('/')
                    .next()
                    .unwrap_or_default()
                    .to_string();
                if last.is_empty() {
                    url.host_str().unwrap_or_default().to_string()
                } else {
                    last
                }
            }
            Err(_) => seed_url
                .trim_end_matches('/')
                .rsplit('/')
                .next()
                .unwrap_or_default()
                .to_string(),
        };

        Category(segment.trim_end_matches(".html").to_string())
    }

    /// Derive a category from a URL-list file name: `urls_rice.txt` → `rice`.
    pub fn from_url_list(path: &Path) -> Self {
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        Category(stem.strip_prefix("urls_").unwrap_or(&stem).to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Nutrient {
    Energy,
    Protein,
    Fat,
    Carbohydrate,
    Sugar,
    Fiber,
    SaltEquivalent,
}

impl Nutrient {
    /// Canonical column order.
    pub const ALL: [Nutrient; 7] = [
        Nutrient::Energy,
        Nutrient::Protein,
        Nutrient::Fat,
        Nutrient::Carbohydrate,
        Nutrient::Sugar,
        Nutrient::Fiber,
        Nutrient::SaltEquivalent,
    ];

    /// Label as printed on the retailers' pages and in the CSV header.
    pub fn label(&self) -> &'static str {
        match self {
            Nutrient::Energy => "熱量",
            Nutrient::Protein => "たんぱく質",
            Nutrient::Fat => "脂質",
            Nutrient::Carbohydrate => "炭水化物",
            Nutrient::Sugar => "糖質",
            Nutrient::Fiber => "食物繊維",
            Nutrient::SaltEquivalent => "食塩相当量",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            Nutrient::Energy => "kcal",
            _ => "g",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL.into_iter().find(|n| n.label() == label)
    }
}

/// Fixed seven-field nutrition schema. Empty string means "not supplied".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NutritionFacts {
    pub energy: String,
    pub protein: String,
    pub fat: String,
    pub carbohydrate: String,
    pub sugar: String,
    pub fiber: String,
    pub salt_equivalent: String,
}

impl NutritionFacts {
    pub fn get(&self, nutrient: Nutrient) -> &str {
        match nutrient {
            Nutrient::Energy => &self.energy,
            Nutrient::Protein => &self.protein,
            Nutrient::Fat => &self.fat,
            Nutrient::Carbohydrate => &self.carbohydrate,
            Nutrient::Sugar => &self.sugar,
            Nutrient::Fiber => &self.fiber,
            Nutrient::SaltEquivalent => &self.salt_equivalent,
        }
    }

    pub fn set(&mut self, nutrient: Nutrient, value: impl Into<String>) {
        let slot = match nutrient {
            Nutrient::Energy => &mut self.energy,
            Nutrient::Protein => &mut self.protein,
            Nutrient::Fat => &mut self.fat,
            Nutrient::Carbohydrate => &mut self.carbohydrate,
            Nutrient::Sugar => &mut self.sugar,
            Nutrient::Fiber => &mut self.fiber,
            Nutrient::SaltEquivalent => &mut self.salt_equivalent,
        };
        *slot = value.into();
    }

    pub fn is_empty(&self) -> bool {
        Nutrient::ALL.iter().all(|n| self.get(*n).is_empty())
    }

    /// Field-wise merge: non-empty values from `self` win over `fallback`.
    pub fn or(&self, fallback: &NutritionFacts) -> NutritionFacts {
        let mut merged = NutritionFacts::default();
        for nutrient in Nutrient::ALL {
            let value = self.get(nutrient);
            let value = if value.is_empty() { fallback.get(nutrient) } else { value };
            merged.set(nutrient, value);
        }
        merged
    }
}

/// Partial record produced from a listing page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemStub {
    pub name: String,
    pub url: String,
    pub image_url: String,
    pub price: String,
    pub nutrition: NutritionFacts,
}

impl ItemStub {
    pub fn from_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DetailNutrition {
    #[default]
    Absent,
    /// Already normalized onto the seven-field schema.
    Fixed(NutritionFacts),
    /// Label/value pairs exactly as printed on the page.
    Labeled(Vec<(String, String)>),
}

/// Supplementary fields read from a product detail page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductDetail {
    pub name: Option<String>,
    pub price: Option<String>,
    pub image_url: Option<String>,
    pub nutrition: DetailNutrition,
}

/// One output row. Field order is the CSV column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    #[serde(rename = "カテゴリ")]
    pub category: String,
    #[serde(rename = "商品名")]
    pub name: String,
    #[serde(rename = "価格")]
    pub price: String,
    #[serde(rename = "画像URL")]
    pub image_url: String,
    #[serde(rename = "商品URL")]
    pub product_url: String,
    #[serde(rename = "熱量")]
    pub energy: String,
    #[serde(rename = "たんぱく質")]
    pub protein: String,
    #[serde(rename = "脂質")]
    pub fat: String,
    #[serde(rename = "炭水化物")]
    pub carbohydrate: String,
    #[serde(rename = "糖質")]
    pub sugar: String,
    #[serde(rename = "食物繊維")]
    pub fiber: String,
    #[serde(rename = "食塩相当量")]
    pub salt_equivalent: String,
}

impl ProductRecord {
    pub fn nutrition(&self) -> NutritionFacts {
        NutritionFacts {
            energy: self.energy.clone(),
            protein: self.protein.clone(),
            fat: self.fat.clone(),
            carbohydrate: self.carbohydrate.clone(),
            sugar: self.sugar.clone(),
            fiber: self.fiber.clone(),
            salt_equivalent: self.salt_equivalent.clone(),
        }
    }
}
