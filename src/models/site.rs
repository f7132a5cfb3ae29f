use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Site {
    SevenEleven,
    FamilyMart,
    Lawson,
}

impl Site {
    pub const ALL: [Site; 3] = [Site::SevenEleven, Site::FamilyMart, Site::Lawson];

    pub fn key(&self) -> &'static str {
        match self {
            Site::SevenEleven => "seveneleven",
            Site::FamilyMart => "familymart",
            Site::Lawson => "lawson",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "seveneleven" => Some(Site::SevenEleven),
            "familymart" => Some(Site::FamilyMart),
            "lawson" => Some(Site::Lawson),
            _ => None,
        }
    }
}

impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}
