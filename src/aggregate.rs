//! Card aggregation - merges the normalized row stream into ordered cards.
//!
//! Identity is `(section, title, color)`; the first row with a new identity
//! creates the card and fixes its sort order, later rows only append items.

use std::collections::HashMap;

use crate::normalize::NormalizedRow;
use crate::types::{Card, LinkItem, Section};

/// Collect normalized rows into cards, preserving first-seen card order.
#[must_use]
pub fn aggregate(rows: Vec<NormalizedRow>) -> Vec<Card> {
    let mut cards: Vec<Card> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for row in rows {
        let joined = row.key.joined();
        let slot = *index.entry(joined).or_insert_with(|| {
            cards.push(Card {
                section: row.key.section.clone(),
                title: row.key.title.clone(),
                color: row.key.color.clone(),
                order: row.order,
                items: Vec::new(),
            });
            cards.len() - 1
        });
        if let Some(card) = cards.get_mut(slot) {
            card.items.push(row.item);
        }
    }

    cards
}

/// The cards of one section, sorted ascending by `order`.
///
/// The sort is stable: cards sharing an order keep their first-seen
/// (insertion) order.
#[must_use]
pub fn cards_in_section<'a>(cards: &'a [Card], section: &Section) -> Vec<&'a Card> {
    let mut selected: Vec<&Card> = cards.iter().filter(|c| &c.section == section).collect();
    selected.sort_by_key(|c| c.order);
    selected
}

/// Partition a card's items into visual lines by `item_group`, preserving
/// the first-seen order of distinct group keys.
#[must_use]
pub fn group_items<'a>(items: impl IntoIterator<Item = &'a LinkItem>) -> Vec<Vec<&'a LinkItem>> {
    let mut groups: Vec<Vec<&LinkItem>> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for item in items {
        let slot = *index.entry(item.item_group.as_str()).or_insert_with(|| {
            groups.push(Vec::new());
            groups.len() - 1
        });
        if let Some(group) = groups.get_mut(slot) {
            group.push(item);
        }
    }

    groups
}

/// Partition a wide card's items by column (unspecified means column 1),
/// columns ascending.
#[must_use]
pub fn group_columns(items: &[LinkItem]) -> Vec<(u32, Vec<&LinkItem>)> {
    let mut columns: Vec<(u32, Vec<&LinkItem>)> = Vec::new();
    let mut index: HashMap<u32, usize> = HashMap::new();

    for item in items {
        let col = item.wide_col.unwrap_or(1);
        let slot = *index.entry(col).or_insert_with(|| {
            columns.push((col, Vec::new()));
            columns.len() - 1
        });
        if let Some((_, column)) = columns.get_mut(slot) {
            column.push(item);
        }
    }

    columns.sort_by_key(|(col, _)| *col);
    columns
}
