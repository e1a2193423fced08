//! Card rendering - maps aggregated cards onto the renderable [`Node`] tree.
//!
//! Three layouts exist: a four-column grid, a horizontal flow row, and the
//! hover-expandable wide card with its own column split. The tree mirrors
//! the page markup one-to-one; an adapter materializes it on the host.

use crate::aggregate::{cards_in_section, group_columns, group_items};
use crate::types::{Card, ElementNode, ItemKind, LinkItem, Node, Section};

/// Render the full card collection as the mount container's content.
///
/// Sections without cards are omitted entirely, no empty layout wrappers.
/// Cards in sections no layout recognizes render nothing.
#[must_use]
pub fn render_page(cards: &[Card]) -> ElementNode {
    let mut root = ElementNode::new("div");

    // Top grid (4 columns)
    let grid_cards = cards_in_section(cards, &Section::Grid);
    if !grid_cards.is_empty() {
        let mut grid = ElementNode::new("div").class("grid");
        for card in grid_cards {
            grid.push(render_normal_card(card));
        }
        root.push(grid);
    }

    // Horizontal flow row
    let row_cards = cards_in_section(cards, &Section::Row);
    if !row_cards.is_empty() {
        let mut row = ElementNode::new("div").class("row").class("flow");
        for card in row_cards {
            row.push(render_normal_card(card));
        }
        root.push(row);
    }

    // Wide expandable card(s), each in its own wrapper
    for card in cards_in_section(cards, &Section::Wide) {
        root.push(
            ElementNode::new("div")
                .class("card_wide")
                .child(render_wide_card(card)),
        );
    }

    root
}

/// A grid- or row-section card: `section.card` with a title and one `ul`.
fn render_normal_card(card: &Card) -> ElementNode {
    let mut section = ElementNode::new("section").class("card");
    if !card.color.is_empty() {
        section = section.class(card.color.as_str());
    }

    section.push(ElementNode::new("h2").text(card.title.as_str()));

    let mut ul = ElementNode::new("ul");
    for group in group_items(&card.items) {
        let mut li = ElementNode::new("li").child(ElementNode::new("span").class("ph"));
        render_line(&mut li, &group);
        ul.push(li);
    }
    section.push(ul);

    section
}

/// A wide-section card: title plus a `div.cols` with one `ul` per column.
///
/// Items group twice here (first by column, then by item group) where the
/// normal card only groups once.
fn render_wide_card(card: &Card) -> ElementNode {
    let mut div = ElementNode::new("div").class("card").class("wide");
    if !card.color.is_empty() {
        div = div.class(card.color.as_str());
    }

    div.push(ElementNode::new("h2").text(card.title.as_str()));

    let mut cols = ElementNode::new("div").class("cols");
    for (_, column_items) in group_columns(&card.items) {
        let mut ul = ElementNode::new("ul");
        for group in group_items(column_items.iter().copied()) {
            let mut li = ElementNode::new("li");
            render_line(&mut li, &group);
            ul.push(li);
        }
        cols.push(ul);
    }
    div.push(cols);

    div
}

/// Render one item group as the contents of a line.
///
/// Headings (and url-less text rows) append a text run, bold wrapper
/// outside, underline wrapper inside. Link rows append an anchor, preceded
/// by a literal `" | "` separator for every item after the group's first.
fn render_line(li: &mut ElementNode, group: &[&LinkItem]) {
    for (index, item) in group.iter().enumerate() {
        if item.item_kind == ItemKind::Heading || (item.url.is_empty() && !item.text.is_empty()) {
            let mut run = Node::Text(item.text.clone());
            if item.underline {
                run = ElementNode::new("u").child(run).into();
            }
            if item.bold {
                run = ElementNode::new("b").child(run).into();
            }
            li.push(run);
        } else if !item.url.is_empty() {
            if index > 0 {
                li.push(Node::text(" | "));
            }
            li.push(
                ElementNode::new("a")
                    .attr("href", item.url.as_str())
                    .attr("target", "_blank")
                    .attr("rel", "noopener noreferrer")
                    .text(item.text.as_str()),
            );
        }
    }
}
