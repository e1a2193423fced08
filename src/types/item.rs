use serde::{Deserialize, Serialize};

use super::is_false;

/// Kind of a single spreadsheet row inside a card.
///
/// Anything that is not a heading renders as a link (or a plain text run
/// when the row carries no URL).
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ItemKind {
    Heading,
    #[default]
    Link,
}

impl ItemKind {
    /// Parse the `item_kind` cell; empty or unrecognized values mean link.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("heading") {
            Self::Heading
        } else {
            Self::Link
        }
    }
}

/// One normalized spreadsheet row: a heading or a link inside a card line.
///
/// Built once during normalization and owned by its parent [`Card`]
/// (never mutated afterwards).
///
/// [`Card`]: super::Card
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LinkItem {
    /// Column of a wide card this item belongs to (1-based).
    /// `None` means "not specified"; the renderer places those in column 1.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wide_col: Option<u32>,
    /// Items sharing a group key render on one visual line.
    pub item_group: String,
    pub item_kind: ItemKind,
    pub text: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub bold: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub underline: bool,
}
