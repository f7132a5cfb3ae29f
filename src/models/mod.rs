pub mod product;
pub mod site;

pub use product::*;
pub use site::*;

/// Placeholder used when a product page carries no recognizable title.
pub const UNKNOWN_NAME: &str = "商品名不明";

/// Canonical CSV header, identical for every site and every run.
pub const COLUMNS: [&str; 12] = [
    "カテゴリ",
    "商品名",
    "価格",
    "画像URL",
    "商品URL",
    "熱量",
    "たんぱく質",
    "脂質",
    "炭水化物",
    "糖質",
    "食物繊維",
    "食塩相当量",
];
