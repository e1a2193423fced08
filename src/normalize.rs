//! Row normalization - one raw row record becomes one typed link item plus
//! the identity of the card it belongs to.
//!
//! Every coercion is lossy-by-default: malformed cells degrade to documented
//! defaults and never error. The only control-flow branch is the
//! empty-title skip.

use crate::reader::RowRecord;
use crate::types::{CardKey, ItemKind, LinkItem, Section};

/// Sort key assigned to cards whose `card_order` cell is missing or unusable.
pub const DEFAULT_ORDER: i64 = 999;

/// A normalized row: where the item goes and what it is.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRow {
    pub key: CardKey,
    pub order: i64,
    pub item: LinkItem,
}

/// Normalize one row record at positional `index` (0-based).
///
/// Returns `None` iff the trimmed `card_title` is empty; such rows produce
/// neither a card nor an item.
#[must_use]
pub fn normalize_row(record: &RowRecord, index: usize) -> Option<NormalizedRow> {
    let title = record.get("card_title").trim();
    if title.is_empty() {
        return None;
    }

    let key = CardKey {
        section: Section::normalize(record.get("section")),
        title: title.to_string(),
        color: record.get("card_color").trim().to_string(),
    };

    let item = LinkItem {
        wide_col: parse_wide_col(record.get("wide_col")),
        item_group: parse_item_group(record.get("item_group"), index),
        item_kind: ItemKind::parse(record.get("item_kind")),
        text: record.get("text").to_string(),
        url: record.get("url").to_string(),
        bold: parse_flag(record.get("bold")),
        underline: parse_flag(record.get("underline")),
    };

    Some(NormalizedRow {
        key,
        order: parse_order(record.get("card_order")),
        item,
    })
}

/// Normalize a whole record sequence, dropping title-less rows.
#[must_use]
pub fn normalize_rows(records: &[RowRecord]) -> Vec<NormalizedRow> {
    records
        .iter()
        .enumerate()
        .filter_map(|(index, record)| normalize_row(record, index))
        .collect()
}

/// `card_order` coercion: numeric and nonzero, else [`DEFAULT_ORDER`].
/// A zero cell falls back as well, not just missing and non-numeric ones.
#[allow(clippy::cast_possible_truncation, clippy::float_cmp)]
fn parse_order(raw: &str) -> i64 {
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() && v != 0.0 => v.trunc() as i64,
        _ => DEFAULT_ORDER,
    }
}

/// `wide_col` coercion: a positive numeric cell selects a column; empty,
/// zero, negative, and non-numeric values all mean "unspecified", which the
/// renderer treats as column 1.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn parse_wide_col(raw: &str) -> Option<u32> {
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 1.0 => Some(v.trunc().min(f64::from(u32::MAX)) as u32),
        _ => None,
    }
}

/// `item_group` coercion: the cell text, or the 1-based row number when the
/// cell is empty. The default key is injective per row.
fn parse_item_group(raw: &str, index: usize) -> String {
    if raw.is_empty() {
        (index + 1).to_string()
    } else {
        raw.to_string()
    }
}

/// `bold` / `underline` coercion: true iff the cell reads `"true"`
/// case-insensitively.
fn parse_flag(raw: &str) -> bool {
    raw.trim().eq_ignore_ascii_case("true")
}
