//! Search filtering - computes visibility over the rendered tree.
//!
//! A pure function of (query, rendered tree): no retained state, idempotent,
//! and the only thing it ever changes is visibility; the card data model is
//! untouched.

use crate::types::{ElementNode, Node};

/// Visibility assignment for one filter pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterOutcome {
    /// One entry per rendered card, in document order.
    pub cards: Vec<CardVisibility>,
    /// True when at least one card stays visible: the page-level
    /// empty-state flag.
    pub any_visible: bool,
}

/// Per-card visibility: the card plus each of its lines, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardVisibility {
    pub visible: bool,
    pub lines: Vec<bool>,
}

/// Trim + lowercase, the canonical query form.
#[must_use]
pub fn normalize_query(query: &str) -> String {
    query.trim().to_lowercase()
}

/// Compute visibility for `query` over a rendered tree.
///
/// A line stays visible when the query is empty, its visible text contains
/// the query, or any of its hyperlink targets does (all case-insensitive).
/// A card stays visible while it has at least one visible line.
#[must_use]
pub fn evaluate(root: &ElementNode, query: &str) -> FilterOutcome {
    let term = normalize_query(query);
    let mut cards = Vec::new();
    collect_cards(root, &term, &mut cards);
    let any_visible = cards.iter().any(|c| c.visible);
    FilterOutcome { cards, any_visible }
}

/// Evaluate and write the result back into the tree's `hidden` flags,
/// including the container's `data-hasresults` attribute.
pub fn apply(root: &mut ElementNode, query: &str) -> FilterOutcome {
    let outcome = evaluate(root, query);
    apply_outcome(root, &outcome);
    outcome
}

/// Write a previously computed assignment into the tree. The walk order is
/// the same as [`evaluate`]'s, so outcomes and elements line up by index.
pub fn apply_outcome(root: &mut ElementNode, outcome: &FilterOutcome) {
    let mut cursor = 0;
    apply_cards(root, outcome, &mut cursor);
    root.set_attr(
        "data-hasresults",
        if outcome.any_visible { "1" } else { "0" },
    );
}

fn collect_cards(node: &ElementNode, term: &str, out: &mut Vec<CardVisibility>) {
    if node.has_class("card") {
        let mut lines = Vec::new();
        collect_lines(node, term, &mut lines);
        let visible = lines.iter().any(|&line| line);
        out.push(CardVisibility { visible, lines });
        return; // cards don't nest
    }
    for child in &node.children {
        if let Node::Element(e) = child {
            collect_cards(e, term, out);
        }
    }
}

fn collect_lines(node: &ElementNode, term: &str, out: &mut Vec<bool>) {
    if node.tag == "li" {
        out.push(line_matches(node, term));
        return;
    }
    for child in &node.children {
        if let Node::Element(e) = child {
            collect_lines(e, term, out);
        }
    }
}

fn line_matches(line: &ElementNode, term: &str) -> bool {
    if term.is_empty() {
        return true;
    }
    if line.visible_text().to_lowercase().contains(term) {
        return true;
    }
    any_href_contains(line, term)
}

fn any_href_contains(node: &ElementNode, term: &str) -> bool {
    if node.tag == "a" {
        if let Some(href) = node.attr_value("href") {
            if href.to_lowercase().contains(term) {
                return true;
            }
        }
    }
    node.children.iter().any(|child| match child {
        Node::Element(e) => any_href_contains(e, term),
        Node::Text(_) => false,
    })
}

fn apply_cards(node: &mut ElementNode, outcome: &FilterOutcome, cursor: &mut usize) {
    if node.has_class("card") {
        if let Some(card) = outcome.cards.get(*cursor) {
            node.hidden = !card.visible;
            let mut line_cursor = 0;
            apply_lines(node, &card.lines, &mut line_cursor);
        }
        *cursor += 1;
        return;
    }
    for child in &mut node.children {
        if let Node::Element(e) = child {
            apply_cards(e, outcome, cursor);
        }
    }
}

fn apply_lines(node: &mut ElementNode, lines: &[bool], cursor: &mut usize) {
    if node.tag == "li" {
        if let Some(&visible) = lines.get(*cursor) {
            node.hidden = !visible;
        }
        *cursor += 1;
        return;
    }
    for child in &mut node.children {
        if let Node::Element(e) = child {
            apply_lines(e, lines, cursor);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::aggregate::aggregate;
    use crate::normalize::normalize_rows;
    use crate::reader::RowRecord;
    use crate::render::render_page;

    fn record(pairs: &[(&str, &str)]) -> RowRecord {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn sample_tree() -> ElementNode {
        let rows = vec![
            record(&[
                ("card_title", "Docs"),
                ("text", "Manual"),
                ("url", "http://docs.example.com"),
            ]),
            record(&[
                ("card_title", "Docs"),
                ("text", "Guide"),
                ("url", "http://guide.example.com"),
            ]),
            record(&[
                ("card_title", "Tools"),
                ("text", "Dashboard"),
                ("url", "http://dash.internal"),
            ]),
        ];
        render_page(&aggregate(normalize_rows(&rows)))
    }

    #[test]
    fn test_empty_query_everything_visible() {
        let tree = sample_tree();
        let outcome = evaluate(&tree, "");
        assert!(outcome.any_visible);
        assert!(outcome
            .cards
            .iter()
            .all(|c| c.visible && c.lines.iter().all(|&l| l)));
    }

    #[test]
    fn test_text_match_is_case_insensitive_and_per_line() {
        let tree = sample_tree();
        let outcome = evaluate(&tree, "  MANUAL ");
        assert!(outcome.any_visible);
        // Card "Docs": line 1 visible, line 2 hidden; card "Tools" hidden.
        assert_eq!(outcome.cards.len(), 2);
        assert!(outcome.cards[0].visible);
        assert_eq!(outcome.cards[0].lines, vec![true, false]);
        assert!(!outcome.cards[1].visible);
    }

    #[test]
    fn test_href_match_counts() {
        let tree = sample_tree();
        let outcome = evaluate(&tree, "dash.internal");
        assert!(!outcome.cards[0].visible);
        assert!(outcome.cards[1].visible);
    }

    #[test]
    fn test_no_match_hides_everything() {
        let mut tree = sample_tree();
        let outcome = apply(&mut tree, "zzz-nothing");
        assert!(!outcome.any_visible);
        assert!(outcome.cards.iter().all(|c| !c.visible));
        assert_eq!(tree.attr_value("data-hasresults"), Some("0"));

        // Every card and line node ends up hidden.
        let grid = tree.children[0].as_element().unwrap();
        let docs = grid.children[0].as_element().unwrap();
        assert!(docs.hidden);
        let ul = docs.children[1].as_element().unwrap();
        assert!(ul.children.iter().all(|li| li
            .as_element()
            .map_or(false, |e| e.hidden)));
    }

    #[test]
    fn test_filter_is_idempotent_and_recoverable() {
        let mut tree = sample_tree();
        let first = apply(&mut tree, "guide");
        let second = apply(&mut tree, "guide");
        assert_eq!(first, second);

        // Empty query restores full visibility.
        let restored = apply(&mut tree, "");
        assert!(restored.any_visible);
        assert_eq!(tree.attr_value("data-hasresults"), Some("1"));
        let grid = tree.children[0].as_element().unwrap();
        assert!(grid
            .children
            .iter()
            .filter_map(Node::as_element)
            .all(|card| !card.hidden));
    }

    #[test]
    fn test_wide_card_lines_participate() {
        let rows = vec![record(&[
            ("section", "wide"),
            ("card_title", "Everything"),
            ("text", "Portal"),
            ("url", "http://portal"),
        ])];
        let tree = render_page(&aggregate(normalize_rows(&rows)));
        let outcome = evaluate(&tree, "portal");
        assert_eq!(outcome.cards.len(), 1);
        assert!(outcome.cards[0].visible);
        assert!(!evaluate(&tree, "absent").any_visible);
    }
}
