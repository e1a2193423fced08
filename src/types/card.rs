use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::LinkItem;

/// Layout section a card belongs to.
///
/// Unrecognized section values are preserved as [`Section::Other`]; they are
/// aggregated like any other section but no layout currently renders them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Section {
    Grid,
    Row,
    Wide,
    Other(String),
}

impl Section {
    /// Normalize a raw section cell: trim, lowercase, empty means grid.
    #[must_use]
    pub fn normalize(raw: &str) -> Self {
        let s = raw.trim().to_lowercase();
        match s.as_str() {
            "" | "grid" => Self::Grid,
            "row" => Self::Row,
            "wide" => Self::Wide,
            _ => Self::Other(s),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Grid => "grid",
            Self::Row => "row",
            Self::Wide => "wide",
            Self::Other(s) => s,
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Section {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Section {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Self::normalize(&s))
    }
}

/// Card identity: two rows with the same key land in the same card.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CardKey {
    pub section: Section,
    pub title: String,
    pub color: String,
}

impl CardKey {
    /// The flat aggregation-map key. The separator cannot occur in trimmed
    /// natural values.
    #[must_use]
    pub fn joined(&self) -> String {
        format!("{}||{}||{}", self.section.as_str(), self.title, self.color)
    }
}

/// A visual card: a titled group of link lines within one layout section.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub section: Section,
    pub title: String,
    /// Style tag appended to the card's class list; empty means unstyled.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub color: String,
    /// Sort key within the section; ties keep first-seen order.
    pub order: i64,
    /// Items in spreadsheet row order.
    pub items: Vec<LinkItem>,
}
