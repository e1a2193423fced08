//! DOM materialization - turns the renderable tree into live elements.
//!
//! The tree stays the source of truth; this adapter only mirrors it. While
//! building, it records handles to every card and line element (in the same
//! document order the filter walks) so visibility updates never re-query the
//! document.

use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use web_sys::{Document, Element, HtmlElement};

use crate::types::{ElementNode, Node};

/// Handles to one rendered card and its line elements.
#[derive(Clone)]
pub(crate) struct CardDom {
    pub(crate) element: HtmlElement,
    pub(crate) lines: Vec<HtmlElement>,
}

/// Everything the controller needs to drive a mounted page.
pub(crate) struct MountedPage {
    pub(crate) cards: Vec<CardDom>,
    pub(crate) wide_cards: Vec<HtmlElement>,
}

#[derive(Default)]
struct MountRegistry {
    cards: Vec<CardDom>,
    wide_cards: Vec<HtmlElement>,
}

/// Materialize the tree's children into `container`.
///
/// The tree root itself stands for the container and is not created; its
/// children append directly, so the resulting markup matches the page
/// contract (`#blocks > div.grid | div.row.flow | div.card_wide`).
pub(crate) fn mount(
    document: &Document,
    container: &Element,
    tree: &ElementNode,
) -> Result<MountedPage, JsValue> {
    let mut registry = MountRegistry::default();

    for child in &tree.children {
        match child {
            Node::Element(e) => {
                let el = build(document, e, &mut registry, None)?;
                container.append_child(&el)?;
            }
            Node::Text(t) => {
                let text = document.create_text_node(t);
                container.append_child(&text)?;
            }
        }
    }

    Ok(MountedPage {
        cards: registry.cards,
        wide_cards: registry.wide_cards,
    })
}

fn build(
    document: &Document,
    node: &ElementNode,
    registry: &mut MountRegistry,
    mut current_card: Option<usize>,
) -> Result<Element, JsValue> {
    let el = document.create_element(&node.tag)?;

    if !node.classes.is_empty() {
        el.set_class_name(&node.class_attr());
    }
    for (name, value) in &node.attrs {
        el.set_attribute(name, value)?;
    }

    if node.has_class("card") {
        let html: HtmlElement = el.clone().dyn_into().map_err(JsValue::from)?;
        if node.has_class("wide") {
            registry.wide_cards.push(html.clone());
        }
        registry.cards.push(CardDom {
            element: html,
            lines: Vec::new(),
        });
        current_card = Some(registry.cards.len() - 1);
    } else if node.tag == "li" {
        if let Some(index) = current_card {
            if let Some(card) = registry.cards.get_mut(index) {
                card.lines
                    .push(el.clone().dyn_into().map_err(JsValue::from)?);
            }
        }
    }

    for child in &node.children {
        match child {
            Node::Text(t) => {
                let text = document.create_text_node(t);
                el.append_child(&text)?;
            }
            Node::Element(e) => {
                let child_el = build(document, e, registry, current_card)?;
                el.append_child(&child_el)?;
            }
        }
    }

    Ok(el)
}

/// Show or hide one element the way the page stylesheet expects:
/// hidden elements get `display: none`, visible ones drop the override.
pub(crate) fn set_displayed(element: &HtmlElement, visible: bool) {
    let style = element.style();
    if visible {
        let _ = style.remove_property("display");
    } else {
        let _ = style.set_property("display", "none");
    }
}
